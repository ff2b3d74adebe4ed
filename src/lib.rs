//! Lyra2 Proof-of-Work Library
//!
//! Lyra2RE and Lyra2REv2 hashing on top of the Lyra2 memory-hard core.
//!
//! # Overview
//!
//! An 80-byte block header runs through a chain of fixed-function hashes
//! with the Lyra2 core in the middle. Mining scans the header's nonce until
//! the final digest falls at or below a 256-bit target.
//!
//! # Modules
//!
//! - [`algorithm`]: the Lyra2 core (general and fixed-shape forms)
//! - [`pipeline`]: hash chains with pluggable surrounding stages
//! - [`scan`]: header layout, target comparison and the nonce search
//! - [`config`]: scan settings file
//!
//! # Example
//!
//! ```rust
//! use lyra2::pipeline::{Pipeline, Variant};
//! use lyra2::scan::{Header, ScanControl, Target, scan};
//!
//! let mut pipeline = Pipeline::keccak_stand_in(Variant::Lyra2rev2)?;
//! let header = Header { words: [0; 20] };
//! let control = ScanControl::new();
//!
//! let outcome = scan(&mut pipeline, &header, &Target::benchmark(), 0..4, &control)?;
//! assert!(outcome.hashes_done <= 4);
//! # Ok::<(), lyra2::algorithm::Lyra2Error>(())
//! ```

// Re-export the core algorithm
pub use lyra2_core as algorithm;

pub mod config;
pub mod pipeline;
pub mod scan;

// Convenience re-exports
pub use algorithm::{derive, lyra2v2, Lyra2, Lyra2Error, Params};
pub use pipeline::{Hash256, Keccak256, Pipeline, Variant};
pub use scan::{Header, ScanControl, ScanOutcome, Target};
