//! Proof-of-work hash pipelines around the Lyra2 core
//!
//! Both chains hash the 80-byte header with a couple of fixed-function
//! 256-bit hashes, run the Lyra2 core on the 32-byte result (used as both
//! password and salt), then pass the core output through more hashes:
//!
//! ```text
//! Lyra2RE:   blake256 -> keccak256 -> LYRA2(T=1, R=8, C=8) -> skein256 -> groestl256
//! Lyra2REv2: blake256 -> keccak256 -> cubehash256 -> lyra2v2 -> skein256 -> cubehash256 -> bmw256
//! ```
//!
//! The surrounding hashes are supplied by the caller as [`Hash256`] stages.
//! Only Keccak-256 ships with this crate.

use std::fmt;
use std::sync::Arc;

use lyra2_core::{LYRA2RE, LYRA2REV2, Lyra2, Lyra2Error, Params, lyra2v2, lyra2v2_batch};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256 as Keccak256Hasher};

/// A fixed-function hash with a 256-bit output
pub trait Hash256 {
    fn hash(&self, data: &[u8]) -> [u8; 32];
}

impl<F> Hash256 for F
where
    F: Fn(&[u8]) -> [u8; 32],
{
    fn hash(&self, data: &[u8]) -> [u8; 32] {
        self(data)
    }
}

/// Keccak-256 with the pre-FIPS 202 padding
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256;

impl Hash256 for Keccak256 {
    fn hash(&self, data: &[u8]) -> [u8; 32] {
        Keccak256Hasher::digest(data).into()
    }
}

/// Shared, thread-safe pipeline stage
pub type Stage = Arc<dyn Hash256 + Send + Sync>;

/// Candidates hashed together by a fixed-form pipeline
pub const FIXED_LANES: usize = 8;

/// Proof-of-work variants built on the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Variant {
    /// General form, 8x8 matrix
    Lyra2re,
    /// Fixed 4x4 form
    #[default]
    Lyra2rev2,
}

impl Variant {
    /// Core parameters this variant runs with
    pub const fn params(self) -> Params {
        match self {
            Self::Lyra2re => LYRA2RE,
            Self::Lyra2rev2 => LYRA2REV2,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lyra2re => write!(f, "lyra2re"),
            Self::Lyra2rev2 => write!(f, "lyra2rev2"),
        }
    }
}

/// How the pipeline invokes the core
pub enum CoreStage {
    /// General form with a reusable matrix
    General(Lyra2),
    /// Fixed 4x4 form on the stack
    Fixed,
}

impl CoreStage {
    /// General form for `params`, allocating its matrix up front
    pub fn general(params: Params) -> Result<Self, Lyra2Error> {
        Ok(Self::General(Lyra2::new(params)?))
    }

    fn run(&mut self, hash: &[u8; 32]) -> Result<[u8; 32], Lyra2Error> {
        match self {
            Self::General(hasher) => {
                let mut out = [0u8; 32];
                hasher.derive(&mut out, hash, hash)?;
                Ok(out)
            }
            Self::Fixed => Ok(lyra2v2(hash)),
        }
    }

    fn run_batch(&mut self, lanes: &mut [[u8; 32]]) -> Result<(), Lyra2Error> {
        match self {
            Self::General(hasher) => {
                for lane in lanes.iter_mut() {
                    let mut out = [0u8; 32];
                    hasher.derive(&mut out, &lane[..], &lane[..])?;
                    *lane = out;
                }
                Ok(())
            }
            Self::Fixed => {
                lyra2v2_batch(lanes);
                Ok(())
            }
        }
    }

    fn fork(&self) -> Result<Self, Lyra2Error> {
        match self {
            Self::General(hasher) => Self::general(*hasher.params()),
            Self::Fixed => Ok(Self::Fixed),
        }
    }
}

/// Upstream stages, the Lyra2 core, downstream stages
pub struct Pipeline {
    upstream: Vec<Stage>,
    core: CoreStage,
    downstream: Vec<Stage>,
}

impl Pipeline {
    /// Assemble a pipeline
    ///
    /// The core always takes a 32-byte hash. Without upstream stages,
    /// [`Pipeline::hash`] feeds it the first 32 bytes of the input and
    /// ignores the rest; shorter inputs are zero-padded.
    pub fn new(upstream: Vec<Stage>, core: CoreStage, downstream: Vec<Stage>) -> Self {
        Self {
            upstream,
            core,
            downstream,
        }
    }

    /// Lyra2RE chain
    pub fn lyra2re(
        blake256: Stage,
        keccak256: Stage,
        skein256: Stage,
        groestl256: Stage,
    ) -> Result<Self, Lyra2Error> {
        Ok(Self::new(
            vec![blake256, keccak256],
            CoreStage::general(LYRA2RE)?,
            vec![skein256, groestl256],
        ))
    }

    /// Lyra2REv2 chain; CubeHash runs on both sides of the core
    pub fn lyra2rev2(
        blake256: Stage,
        keccak256: Stage,
        cubehash256: Stage,
        skein256: Stage,
        bmw256: Stage,
    ) -> Self {
        Self::new(
            vec![blake256, keccak256, Arc::clone(&cubehash256)],
            CoreStage::Fixed,
            vec![skein256, cubehash256, bmw256],
        )
    }

    /// Pipeline for `variant` with Keccak-256 standing in for every
    /// surrounding hash
    ///
    /// The digests differ from the real chains; the core and the scan
    /// loop run exactly as they would with the real stages.
    pub fn keccak_stand_in(variant: Variant) -> Result<Self, Lyra2Error> {
        let keccak: Stage = Arc::new(Keccak256);
        match variant {
            Variant::Lyra2re => Self::lyra2re(
                Arc::clone(&keccak),
                Arc::clone(&keccak),
                Arc::clone(&keccak),
                keccak,
            ),
            Variant::Lyra2rev2 => Ok(Self::lyra2rev2(
                Arc::clone(&keccak),
                Arc::clone(&keccak),
                Arc::clone(&keccak),
                Arc::clone(&keccak),
                keccak,
            )),
        }
    }

    /// Independent pipeline with the same stages and its own matrix, for
    /// another thread
    pub fn fork(&self) -> Result<Self, Lyra2Error> {
        Ok(Self {
            upstream: self.upstream.clone(),
            core: self.core.fork()?,
            downstream: self.downstream.clone(),
        })
    }

    /// Candidates [`Pipeline::hash_batch`] hashes together: eight for the
    /// fixed form, one for the general form
    pub fn lanes(&self) -> usize {
        match self.core {
            CoreStage::General(_) => 1,
            CoreStage::Fixed => FIXED_LANES,
        }
    }

    /// Hash `input` through every stage
    ///
    /// With no upstream stages only `input[..32]` reaches the core.
    pub fn hash(&mut self, input: &[u8]) -> Result<[u8; 32], Lyra2Error> {
        let state = self.core.run(&self.upstream_hash(input))?;
        Ok(self.downstream_hash(state))
    }

    /// Hash every input, running the core over all lanes at once
    ///
    /// Each output equals [`Pipeline::hash`] of the matching input.
    pub fn hash_batch<T: AsRef<[u8]>>(&mut self, inputs: &[T]) -> Result<Vec<[u8; 32]>, Lyra2Error> {
        let mut lanes: Vec<[u8; 32]> = inputs
            .iter()
            .map(|input| self.upstream_hash(input.as_ref()))
            .collect();
        self.core.run_batch(&mut lanes)?;
        Ok(lanes
            .into_iter()
            .map(|lane| self.downstream_hash(lane))
            .collect())
    }

    fn upstream_hash(&self, input: &[u8]) -> [u8; 32] {
        let mut stages = self.upstream.iter();
        let mut state = match stages.next() {
            Some(first) => first.hash(input),
            None => {
                let mut padded = [0u8; 32];
                let len = input.len().min(32);
                padded[..len].copy_from_slice(&input[..len]);
                padded
            }
        };
        for stage in stages {
            state = stage.hash(&state);
        }
        state
    }

    fn downstream_hash(&self, mut state: [u8; 32]) -> [u8; 32] {
        for stage in &self.downstream {
            state = stage.hash(&state);
        }
        state
    }
}
