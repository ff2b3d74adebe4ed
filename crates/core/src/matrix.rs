//! Owned R x C matrix of rate-sized cells
//!
//! Cells live in one row-major allocation. The buffer can be reshaped and
//! reused across calls; it is never re-zeroed because every cell is written
//! before it is read.

use crate::error::Lyra2Error;
use crate::params::BLOCK_BYTES;
use crate::sponge::Block;

pub struct MemoryMatrix {
    cells: Vec<Block>,
    rows: usize,
    cols: usize,
}

impl MemoryMatrix {
    /// Allocate a `rows x cols` matrix
    pub fn with_shape(rows: usize, cols: usize) -> Result<Self, Lyra2Error> {
        let mut matrix = Self {
            cells: Vec::new(),
            rows: 0,
            cols: 0,
        };
        matrix.reshape(rows, cols)?;
        Ok(matrix)
    }

    /// Resize to `rows x cols`, growing the allocation if needed
    pub fn reshape(&mut self, rows: usize, cols: usize) -> Result<(), Lyra2Error> {
        let len = rows
            .checked_mul(cols)
            .ok_or(Lyra2Error::Allocation { bytes: usize::MAX })?;
        if len > self.cells.len() {
            self.cells
                .try_reserve_exact(len - self.cells.len())
                .map_err(|_| Lyra2Error::Allocation {
                    bytes: len.saturating_mul(BLOCK_BYTES),
                })?;
        }
        self.cells.resize(len, [0u64; crate::params::RATE_WORDS]);
        self.rows = rows;
        self.cols = cols;
        Ok(())
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Footprint in bytes
    pub fn bytes(&self) -> usize {
        self.cells.len() * BLOCK_BYTES
    }

    #[inline(always)]
    fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    #[inline(always)]
    pub fn cell(&self, row: usize, col: usize) -> &Block {
        &self.cells[self.offset(row, col)]
    }

    #[inline(always)]
    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut Block {
        let offset = self.offset(row, col);
        &mut self.cells[offset]
    }
}
