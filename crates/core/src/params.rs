//! Lyra2 parameters and sponge geometry
//!
//! The sponge runs the BLAKE2b round function over a 16-word state. The
//! first 12 words are the rate, and every matrix cell is exactly one rate
//! wide (96 bytes).

use crate::error::Lyra2Error;

/// Words in the sponge state
pub const STATE_WORDS: usize = 16;

/// Words in the rate (one matrix cell)
pub const RATE_WORDS: usize = 12;

/// Bytes in one matrix cell
pub const BLOCK_BYTES: usize = RATE_WORDS * 8;

/// Bytes absorbed per block while taking in password, salt and basil
pub const INPUT_BLOCK_BYTES: usize = 64;

/// Words absorbed per input block
pub const INPUT_BLOCK_WORDS: usize = INPUT_BLOCK_BYTES / 8;

/// Basil size: output length, password length, salt length, time cost,
/// rows and columns as little-endian u64
pub const BASIL_BYTES: usize = 6 * 8;

/// Rounds of the full permutation
pub const FULL_ROUNDS: usize = 12;

/// Rounds of the reduced permutation used inside the matrix
pub const REDUCED_ROUNDS: usize = 1;

/// BLAKE2b initialization vector, loaded into state words 8..16
pub const BLAKE2B_IV: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

/// Output size of the fixed-shape form
pub const FIXED_OUTPUT_BYTES: usize = 32;

/// Input size of the fixed-shape form (password and salt, 32 bytes each)
pub const FIXED_INPUT_BYTES: usize = 64;

/// Matrix rows of the fixed-shape form
pub const FIXED_ROWS: usize = 4;

/// Matrix columns of the fixed-shape form
pub const FIXED_COLS: usize = 4;

/// Where consecutive 64-byte input blocks sit in the staging area.
///
/// Every shape absorbs the padded input contiguously by default, so the
/// basil and the closing pad bit always reach the sponge. `Legacy` reads
/// one input block per 512 bytes of a zero-filled staging area and is only
/// used when asked for through [`Params::with_stride`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputStride {
    /// 64 bytes between input blocks
    #[default]
    Packed,
    /// 512 bytes between input blocks
    Legacy,
}

impl InputStride {
    /// Distance in bytes between the starts of consecutive input blocks
    pub const fn bytes(self) -> usize {
        match self {
            Self::Packed => INPUT_BLOCK_BYTES,
            Self::Legacy => 512,
        }
    }
}

/// Matrix shape and cost of one Lyra2 configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Params {
    /// Number of Wandering passes over the matrix
    pub time_cost: u64,
    /// Matrix rows (at least 2)
    pub rows: u16,
    /// Matrix columns (at least 1)
    pub cols: u16,
    /// Input staging layout
    pub stride: InputStride,
}

/// Lyra2RE core: T=1, 8x8 matrix
pub const LYRA2RE: Params = Params::new(1, 8, 8);

/// Lyra2REv2 core: T=1, 4x4 matrix
pub const LYRA2REV2: Params = Params::new(1, 4, 4);

impl Params {
    /// Parameters with contiguous input absorption
    pub const fn new(time_cost: u64, rows: u16, cols: u16) -> Self {
        Self {
            time_cost,
            rows,
            cols,
            stride: InputStride::Packed,
        }
    }

    /// Override the input stride
    pub const fn with_stride(mut self, stride: InputStride) -> Self {
        self.stride = stride;
        self
    }

    /// Number of cells in the matrix
    pub const fn cells(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Matrix footprint in bytes
    pub const fn matrix_bytes(&self) -> usize {
        self.cells() * BLOCK_BYTES
    }

    /// Number of 64-byte blocks the padded `pwd || salt || basil` occupies
    pub const fn input_blocks(pwd_len: usize, salt_len: usize) -> usize {
        (pwd_len + salt_len + BASIL_BYTES) / INPUT_BLOCK_BYTES + 1
    }

    /// Staging bytes needed to absorb a password and salt of these lengths
    pub const fn staging_bytes(&self, pwd_len: usize, salt_len: usize) -> usize {
        let blocks = Self::input_blocks(pwd_len, salt_len);
        let padded = blocks * INPUT_BLOCK_BYTES;
        let strided = (blocks - 1) * self.stride.bytes() + INPUT_BLOCK_BYTES;
        if padded > strided { padded } else { strided }
    }

    /// Reject shapes the algorithm cannot run on
    pub fn validate_shape(&self) -> Result<(), Lyra2Error> {
        if self.rows < 2 || self.cols < 1 {
            return Err(Lyra2Error::InvalidShape {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Reject inputs whose staged form exceeds the matrix footprint
    pub fn validate_input(&self, pwd_len: usize, salt_len: usize) -> Result<(), Lyra2Error> {
        self.validate_shape()?;
        let needed = self.staging_bytes(pwd_len, salt_len);
        let capacity = self.matrix_bytes();
        if needed > capacity {
            return Err(Lyra2Error::InputTooLong { needed, capacity });
        }
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        LYRA2RE
    }
}
