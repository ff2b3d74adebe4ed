//! Fixed-shape Lyra2 used by Lyra2REv2
//!
//! R = 4, C = 4, T = 1, 32-byte output, password and salt both 32 bytes.
//! The matrix is 1.5 KB on the stack and the row schedule is unrolled,
//! so there is no failure path. Output equals the general form at the same
//! parameters.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::params::{
    FIXED_COLS, FIXED_INPUT_BYTES, FIXED_OUTPUT_BYTES, FIXED_ROWS, INPUT_BLOCK_WORDS, RATE_WORDS,
};
use crate::sponge::{Block, Sponge, add_blocks, load_words, rot_w, store_words, xor_blocks, xor_into};

type FixedMatrix = [[Block; FIXED_COLS]; FIXED_ROWS];

/// Basil for k = 32, |pwd| = |salt| = 32, T = 1, R = 4, C = 4, followed by
/// the 0x80 pad byte and the closing 0x01 in the last byte of the block
const FIXED_BASIL: [u64; INPUT_BLOCK_WORDS] = [32, 32, 32, 1, 4, 4, 0x80, 0x01 << 56];

/// Setup steps as (prev, row, rowa)
const SETUP: [(usize, usize, usize); 2] = [(1, 2, 0), (2, 3, 1)];

/// Wandering steps as (prev, row), except the last one
const WANDER: [(usize, usize); 3] = [(3, 0), (0, 1), (1, 2)];

/// Fixed-shape derivation over a 64-byte `pwd || salt` input
pub fn derive_fixed(out: &mut [u8; FIXED_OUTPUT_BYTES], input: &[u8; FIXED_INPUT_BYTES]) {
    let mut sponge = Sponge::new();
    let mut m: FixedMatrix = [[[0u64; RATE_WORDS]; FIXED_COLS]; FIXED_ROWS];

    // pwd || salt fill exactly one input block, basil and padding the next
    sponge.absorb_input(&load_words(input));
    sponge.absorb_input(&FIXED_BASIL);

    for col in (0..FIXED_COLS).rev() {
        m[0][col] = sponge.squeeze_reduced();
    }
    for col in 0..FIXED_COLS {
        let rand = sponge.duplex_reduced(&m[0][col]);
        m[1][FIXED_COLS - 1 - col] = xor_blocks(&m[0][col], &rand);
    }

    for (prev, row, rowa) in SETUP {
        for col in 0..FIXED_COLS {
            let rand = sponge.duplex_reduced(&add_blocks(&m[prev][col], &m[rowa][col]));
            m[row][FIXED_COLS - 1 - col] = xor_blocks(&m[prev][col], &rand);
            xor_into(&mut m[rowa][col], &rot_w(&rand));
        }
    }

    for (prev, row) in WANDER {
        let rowa = (sponge.first_word() & 3) as usize;
        for col in 0..FIXED_COLS {
            let rand = sponge.duplex_reduced(&add_blocks(&m[prev][col], &m[rowa][col]));
            xor_into(&mut m[row][col], &rand);
            xor_into(&mut m[rowa][col], &rot_w(&rand));
        }
    }

    // Last step (prev 2, row 3): only M[rowa][0] reaches the wrap-up, so the
    // other columns are duplexed without writing back
    let rowa = (sponge.first_word() & 3) as usize;
    let rand = sponge.duplex_reduced(&add_blocks(&m[2][0], &m[rowa][0]));
    let mut last = xor_blocks(&m[rowa][0], &rot_w(&rand));
    if rowa == 3 {
        xor_into(&mut last, &rand);
    }
    for col in 1..FIXED_COLS {
        sponge.duplex_reduced(&add_blocks(&m[2][col], &m[rowa][col]));
    }

    let rate = sponge.duplex_full(&last);
    store_words(&rate[..FIXED_OUTPUT_BYTES / 8], out);
}

/// The Lyra2REv2 core step: `hash` is both password and salt
pub fn lyra2v2(hash: &[u8; 32]) -> [u8; 32] {
    let mut input = [0u8; FIXED_INPUT_BYTES];
    input[..32].copy_from_slice(hash);
    input[32..].copy_from_slice(hash);

    let mut out = [0u8; FIXED_OUTPUT_BYTES];
    derive_fixed(&mut out, &input);
    out
}

/// Apply [`lyra2v2`] to independent lanes in place
#[cfg(feature = "parallel")]
pub fn lyra2v2_batch(lanes: &mut [[u8; 32]]) {
    lanes.par_iter_mut().for_each(|lane| *lane = lyra2v2(lane));
}

/// Apply [`lyra2v2`] to independent lanes in place (sequential fallback)
#[cfg(not(feature = "parallel"))]
pub fn lyra2v2_batch(lanes: &mut [[u8; 32]]) {
    for lane in lanes.iter_mut() {
        *lane = lyra2v2(lane);
    }
}
