//! Duplex sponge over the BLAKE2b round function
//!
//! Only the rate (words 0..12) is ever touched by absorb, duplex and
//! squeeze. Words 12..16 change only through the permutation.

use crate::params::{BLAKE2B_IV, BLOCK_BYTES, INPUT_BLOCK_WORDS, RATE_WORDS, STATE_WORDS};
use crate::permutation::{permute, permute_reduced};

/// One rate-sized block (a matrix cell)
pub type Block = [u64; RATE_WORDS];

/// Lyra2 sponge state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sponge {
    state: [u64; STATE_WORDS],
}

impl Sponge {
    /// Fresh sponge: words 0..8 zero, words 8..16 the BLAKE2b IV
    pub fn new() -> Self {
        let mut state = [0u64; STATE_WORDS];
        state[8..].copy_from_slice(&BLAKE2B_IV);
        Self { state }
    }

    /// Absorb one 64-byte input block with the full permutation
    #[inline]
    pub fn absorb_input(&mut self, block: &[u64; INPUT_BLOCK_WORDS]) {
        for (s, b) in self.state.iter_mut().zip(block) {
            *s ^= b;
        }
        permute(&mut self.state);
    }

    /// Absorb one rate-sized block with the full permutation
    #[inline]
    pub fn absorb(&mut self, block: &Block) {
        self.xor_rate(block);
        permute(&mut self.state);
    }

    /// Absorb a block with the full permutation and return the new rate
    #[inline]
    pub fn duplex_full(&mut self, block: &Block) -> Block {
        self.absorb(block);
        self.rate()
    }

    /// Absorb a block with the reduced permutation and return the new rate
    #[inline(always)]
    pub fn duplex_reduced(&mut self, block: &Block) -> Block {
        self.xor_rate(block);
        permute_reduced(&mut self.state);
        self.rate()
    }

    /// Emit the current rate, then run the reduced permutation
    #[inline(always)]
    pub fn squeeze_reduced(&mut self) -> Block {
        let out = self.rate();
        permute_reduced(&mut self.state);
        out
    }

    /// Fill `out` from the rate, with a full permutation after every
    /// complete block. A trailing partial block copies only its prefix.
    pub fn squeeze(&mut self, out: &mut [u8]) {
        let mut chunks = out.chunks_exact_mut(BLOCK_BYTES);
        for chunk in &mut chunks {
            store_words(&self.state[..RATE_WORDS], chunk);
            permute(&mut self.state);
        }
        let tail = chunks.into_remainder();
        if !tail.is_empty() {
            let mut block = [0u8; BLOCK_BYTES];
            store_words(&self.state[..RATE_WORDS], &mut block);
            tail.copy_from_slice(&block[..tail.len()]);
        }
    }

    /// Copy of the rate
    #[inline(always)]
    pub fn rate(&self) -> Block {
        let mut block = [0u64; RATE_WORDS];
        block.copy_from_slice(&self.state[..RATE_WORDS]);
        block
    }

    /// First state word, used to pick rows while wandering
    #[inline(always)]
    pub fn first_word(&self) -> u64 {
        self.state[0]
    }

    #[inline(always)]
    fn xor_rate(&mut self, block: &Block) {
        for (s, b) in self.state.iter_mut().zip(block) {
            *s ^= b;
        }
    }
}

impl Default for Sponge {
    fn default() -> Self {
        Self::new()
    }
}

/// Word-wise wrapping addition of two blocks
#[inline(always)]
pub fn add_blocks(a: &Block, b: &Block) -> Block {
    core::array::from_fn(|i| a[i].wrapping_add(b[i]))
}

/// Word-wise XOR of two blocks
#[inline(always)]
pub fn xor_blocks(a: &Block, b: &Block) -> Block {
    core::array::from_fn(|i| a[i] ^ b[i])
}

/// XOR `src` into `dst`
#[inline(always)]
pub fn xor_into(dst: &mut Block, src: &Block) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Rotate the rate's words by one position: word `j` moves to `j + 1`,
/// the last word wraps to position 0
#[inline(always)]
pub fn rot_w(block: &Block) -> Block {
    let mut out = *block;
    out.rotate_right(1);
    out
}

/// Read little-endian words from `bytes`
#[inline]
pub fn load_words<const N: usize>(bytes: &[u8]) -> [u64; N] {
    let mut words = [0u64; N];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *word = u64::from_le_bytes(buf);
    }
    words
}

/// Write words to `out` in little-endian order
#[inline]
pub fn store_words(words: &[u64], out: &mut [u8]) {
    for (chunk, word) in out.chunks_exact_mut(8).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}
