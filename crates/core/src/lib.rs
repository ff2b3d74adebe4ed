//! # Lyra2 Core
//!
//! The memory-hard sponge at the center of the Lyra2RE and Lyra2REv2
//! proof-of-work hashes.
//!
//! ## Construction
//!
//! - **Permutation**: the BLAKE2b round function on a 16-word state, 12
//!   rounds for full-strength mixing and 1 round inside the matrix
//! - **Sponge**: 768-bit rate, 256-bit capacity, BLAKE2b IV in words 8..16
//! - **Matrix**: R rows x C columns of 96-byte cells, filled by Setup and
//!   revisited `time_cost` times by Wandering with data-dependent rows
//!
//! ## Parameter Variants
//!
//! - General form: any output length, password, salt and shape
//!   (Lyra2RE uses T=1, R=8, C=8)
//! - Fixed form: R=4, C=4, T=1, 32-byte output on a stack matrix
//!   (Lyra2REv2)
//!
//! ## Example
//!
//! ```rust
//! use lyra2_core::{LYRA2RE, Lyra2, derive, lyra2v2};
//!
//! // Single-shot derivation
//! let mut key = [0u8; 32];
//! derive(&mut key, b"password", b"salt", 1, 8, 8)?;
//!
//! // Reusable hasher (avoids re-allocation)
//! let mut hasher = Lyra2::new(LYRA2RE)?;
//! let mut again = [0u8; 32];
//! hasher.derive(&mut again, b"password", b"salt")?;
//! assert_eq!(key, again);
//!
//! // Fixed-shape Lyra2REv2 step
//! let out = lyra2v2(&[0u8; 32]);
//! assert_eq!(out.len(), 32);
//! # Ok::<(), lyra2_core::Lyra2Error>(())
//! ```

mod error;
mod fixed;
mod lyra2;
mod matrix;
mod params;
mod permutation;
mod schedule;
mod sponge;

#[cfg(feature = "std")]
mod ffi;

pub use error::Lyra2Error;
pub use fixed::{derive_fixed, lyra2v2, lyra2v2_batch};
pub use lyra2::{Lyra2, derive};
pub use matrix::MemoryMatrix;
pub use params::*;
pub use permutation::{permute, permute_reduced};
pub use schedule::{SetupSchedule, SetupStep};
pub use sponge::{Block, Sponge};

#[cfg(test)]
mod tests;
