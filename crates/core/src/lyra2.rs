//! General-form Lyra2
//!
//! A call runs through five phases over an R x C matrix of 96-byte cells:
//! - Absorb: password || salt || basil, padded 10*1 into 64-byte blocks
//! - Row init: row 0 squeezed backwards, row 1 duplexed from row 0
//! - Setup: rows 2..R built from `prev` and a scheduled earlier row
//! - Wandering: `time_cost` passes with data-dependent row selection
//! - Wrap-up: one full-strength absorb of `M[rowa][0]`, then squeeze

use crate::error::Lyra2Error;
use crate::matrix::MemoryMatrix;
use crate::params::*;
use crate::schedule::SetupSchedule;
use crate::sponge::{Sponge, add_blocks, load_words, rot_w, xor_blocks, xor_into};

/// Reusable Lyra2 hasher
///
/// Owns the matrix and the input staging area for one parameter set, so
/// repeated derivations skip the allocation.
pub struct Lyra2 {
    params: Params,
    sponge: Sponge,
    matrix: MemoryMatrix,
    staging: Vec<u8>,
}

impl Lyra2 {
    /// Create a hasher and allocate its matrix
    ///
    /// Fails on an invalid shape or when the matrix cannot be allocated.
    pub fn new(params: Params) -> Result<Self, Lyra2Error> {
        params.validate_shape()?;
        let matrix = MemoryMatrix::with_shape(params.rows as usize, params.cols as usize)?;
        Ok(Self {
            params,
            sponge: Sponge::new(),
            matrix,
            staging: Vec::new(),
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Derive `out.len()` key bytes from `pwd` and `salt`
    ///
    /// `out` is left untouched when an error is returned.
    pub fn derive(&mut self, out: &mut [u8], pwd: &[u8], salt: &[u8]) -> Result<(), Lyra2Error> {
        self.params.validate_input(pwd.len(), salt.len())?;
        self.stage_input(out.len(), pwd, salt)?;

        // Phase 1: absorb the staged input
        self.sponge = Sponge::new();
        self.absorb_input(pwd.len(), salt.len());

        // Phase 2: rows 0 and 1
        self.init_rows();

        // Phase 3: remaining rows
        let (prev, rowa) = self.setup();

        // Phase 4: data-dependent passes
        let rowa = self.wander(prev, rowa);

        // Phase 5: wrap-up and squeeze
        self.sponge.absorb(self.matrix.cell(rowa, 0));
        self.sponge.squeeze(out);
        Ok(())
    }

    /// Lay out `pwd || salt || basil || 10*1` in the zeroed staging area
    fn stage_input(&mut self, out_len: usize, pwd: &[u8], salt: &[u8]) -> Result<(), Lyra2Error> {
        let len = self.params.staging_bytes(pwd.len(), salt.len());
        self.staging.clear();
        self.staging
            .try_reserve_exact(len)
            .map_err(|_| Lyra2Error::Allocation { bytes: len })?;
        self.staging.resize(len, 0);

        let basil = [
            out_len as u64,
            pwd.len() as u64,
            salt.len() as u64,
            self.params.time_cost,
            self.params.rows as u64,
            self.params.cols as u64,
        ];

        let mut at = 0;
        for part in [pwd, salt] {
            self.staging[at..at + part.len()].copy_from_slice(part);
            at += part.len();
        }
        for word in basil {
            self.staging[at..at + 8].copy_from_slice(&word.to_le_bytes());
            at += 8;
        }

        let blocks = Params::input_blocks(pwd.len(), salt.len());
        self.staging[at] = 0x80;
        self.staging[blocks * INPUT_BLOCK_BYTES - 1] ^= 0x01;
        Ok(())
    }

    fn absorb_input(&mut self, pwd_len: usize, salt_len: usize) {
        let stride = self.params.stride.bytes();
        for i in 0..Params::input_blocks(pwd_len, salt_len) {
            let start = i * stride;
            let block: [u64; INPUT_BLOCK_WORDS] =
                load_words(&self.staging[start..start + INPUT_BLOCK_BYTES]);
            self.sponge.absorb_input(&block);
        }
    }

    /// Row 0 is squeezed in reverse column order; row 1 is written in
    /// reverse while row 0 is read forward.
    fn init_rows(&mut self) {
        let cols = self.matrix.cols();

        for col in (0..cols).rev() {
            *self.matrix.cell_mut(0, col) = self.sponge.squeeze_reduced();
        }

        for col in 0..cols {
            let input = *self.matrix.cell(0, col);
            let rand = self.sponge.duplex_reduced(&input);
            *self.matrix.cell_mut(1, cols - 1 - col) = xor_blocks(&input, &rand);
        }
    }

    /// Returns the last written row and the final `rowa`
    fn setup(&mut self) -> (usize, usize) {
        let cols = self.matrix.cols();
        let mut schedule = SetupSchedule::new(self.matrix.rows());

        for step in &mut schedule {
            debug_assert!(step.prev < step.row && step.rowa < step.row);

            for col in 0..cols {
                let prev = *self.matrix.cell(step.prev, col);
                let input = add_blocks(&prev, self.matrix.cell(step.rowa, col));
                let rand = self.sponge.duplex_reduced(&input);

                *self.matrix.cell_mut(step.row, cols - 1 - col) = xor_blocks(&prev, &rand);
                xor_into(self.matrix.cell_mut(step.rowa, col), &rot_w(&rand));
            }
        }

        (schedule.prev(), schedule.rowa())
    }

    /// `rowa` may coincide with `row` or `prev`; every read of a column
    /// happens before its two in-place updates.
    fn wander(&mut self, mut prev: usize, mut rowa: usize) -> usize {
        let rows = self.matrix.rows();
        let cols = self.matrix.cols();
        let mut row = 0;

        for tau in 1..=self.params.time_cost {
            // -1 on even passes, R/2 - 1 on odd ones, both mod R
            let step = if tau % 2 == 0 { rows - 1 } else { rows / 2 - 1 };

            loop {
                rowa = select_row(self.sponge.first_word(), rows);

                for col in 0..cols {
                    let input = add_blocks(self.matrix.cell(prev, col), self.matrix.cell(rowa, col));
                    let rand = self.sponge.duplex_reduced(&input);

                    xor_into(self.matrix.cell_mut(row, col), &rand);
                    xor_into(self.matrix.cell_mut(rowa, col), &rot_w(&rand));
                }

                prev = row;
                row = (row + step) % rows;
                if row == 0 {
                    break;
                }
            }
        }

        rowa
    }
}

/// Map a sponge word onto a row index
#[inline(always)]
fn select_row(word: u64, rows: usize) -> usize {
    if rows.is_power_of_two() {
        (word as usize) & (rows - 1)
    } else {
        (word % rows as u64) as usize
    }
}

/// Single-shot derivation
///
/// Allocates a matrix for this call only. For repeated derivations with
/// the same shape, keep a [`Lyra2`] around instead.
pub fn derive(
    out: &mut [u8],
    pwd: &[u8],
    salt: &[u8],
    time_cost: u64,
    rows: u16,
    cols: u16,
) -> Result<(), Lyra2Error> {
    let mut hasher = Lyra2::new(Params::new(time_cost, rows, cols))?;
    hasher.derive(out, pwd, salt)
}
