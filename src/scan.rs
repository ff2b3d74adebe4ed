//! Nonce search over an 80-byte block header
//!
//! The header is 20 32-bit words, each serialized big-endian; the nonce is
//! word 19. A hash wins when, read as eight little-endian words compared
//! from the most significant (word 7) down, it is at or below the target.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use lyra2_core::Lyra2Error;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::pipeline::Pipeline;

/// Words in a block header
pub const HEADER_WORDS: usize = 20;

/// Serialized header size
pub const HEADER_BYTES: usize = HEADER_WORDS * 4;

/// Index of the nonce word
pub const NONCE_WORD: usize = 19;

/// Block header as 32-bit words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub words: [u32; HEADER_WORDS],
}

impl Header {
    /// Parse serialized header bytes
    pub fn from_bytes(bytes: &[u8; HEADER_BYTES]) -> Self {
        let mut words = [0u32; HEADER_WORDS];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self { words }
    }

    /// Serialize with every word big-endian
    pub fn to_bytes(&self) -> [u8; HEADER_BYTES] {
        let mut bytes = [0u8; HEADER_BYTES];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.words) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        bytes
    }

    pub fn nonce(&self) -> u32 {
        self.words[NONCE_WORD]
    }

    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.words[NONCE_WORD] = nonce;
        self
    }
}

/// 256-bit target as eight words, least significant first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub words: [u32; 8],
}

impl Target {
    pub const fn from_words(words: [u32; 8]) -> Self {
        Self { words }
    }

    /// Easy target used in benchmark mode: top word 0x000000ff
    ///
    /// This is a complete target with every lower word at its maximum, so
    /// only the top word of a hash decides. Miners that patch just word 7
    /// of the target received with their work keep that work's lower words
    /// and can reject hashes this target accepts.
    pub const fn benchmark() -> Self {
        Self {
            words: [u32::MAX, u32::MAX, u32::MAX, u32::MAX, u32::MAX, u32::MAX, u32::MAX, 0xff],
        }
    }

    /// Decode compact difficulty bits (`0x1d00ffff` style)
    ///
    /// Returns `None` for negative or overflowing encodings.
    pub fn from_compact(bits: u32) -> Option<Self> {
        if bits & 0x0080_0000 != 0 {
            return None;
        }
        let exponent = (bits >> 24) as usize;
        let mut mantissa = bits & 0x007f_ffff;

        let mut bytes = [0u8; 32];
        if exponent <= 3 {
            mantissa >>= 8 * (3 - exponent);
            bytes[..4].copy_from_slice(&mantissa.to_le_bytes());
        } else {
            let shift = exponent - 3;
            for (i, byte) in mantissa.to_le_bytes()[..3].iter().enumerate() {
                if *byte == 0 {
                    continue;
                }
                *bytes.get_mut(shift + i)? = *byte;
            }
        }

        let mut words = [0u32; 8];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Some(Self { words })
    }

    /// Whether `hash` is at or below this target
    pub fn is_met_by(&self, hash: &[u8; 32]) -> bool {
        for i in (0..8).rev() {
            let word = u32::from_le_bytes([hash[i * 4], hash[i * 4 + 1], hash[i * 4 + 2], hash[i * 4 + 3]]);
            if word > self.words[i] {
                return false;
            }
            if word < self.words[i] {
                return true;
            }
        }
        true
    }
}

/// A nonce whose hash meets the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    pub nonce: u32,
    pub hash: [u8; 32],
}

/// Result of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    pub solution: Option<Solution>,
    /// Hashes fully computed by this scan
    pub hashes_done: u64,
}

/// Stop flag and hash counter shared with the scanning threads
///
/// The stop flag is only checked between batches of hashes; a batch in
/// progress always completes.
#[derive(Debug, Default)]
pub struct ScanControl {
    stop: AtomicBool,
    hashes: AtomicU64,
}

impl ScanControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every scan using this control to return after its current batch
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Hashes computed so far across all scans using this control
    pub fn hashes(&self) -> u64 {
        self.hashes.load(Ordering::Relaxed)
    }

    /// Clear the flag and counter for a new round
    pub fn reset(&self) {
        self.stop.store(false, Ordering::SeqCst);
        self.hashes.store(0, Ordering::Relaxed);
    }
}

/// Try `nonces` in order until one meets `target`, the nonces run out, or
/// `control` is stopped
///
/// Nonces are hashed [`Pipeline::lanes`] at a time. Every hash of a batch
/// counts towards `hashes_done`; the first winning nonce of the batch is
/// reported.
pub fn scan<I>(
    pipeline: &mut Pipeline,
    header: &Header,
    target: &Target,
    nonces: I,
    control: &ScanControl,
) -> Result<ScanOutcome, Lyra2Error>
where
    I: IntoIterator<Item = u32>,
{
    let template = header.to_bytes();
    let lanes = pipeline.lanes().max(1);
    let mut nonces = nonces.into_iter();
    let mut batch: Vec<u32> = Vec::with_capacity(lanes);
    let mut inputs: Vec<[u8; HEADER_BYTES]> = Vec::with_capacity(lanes);
    let mut hashes_done = 0u64;

    while !control.is_stopped() {
        batch.clear();
        batch.extend(nonces.by_ref().take(lanes));
        if batch.is_empty() {
            break;
        }

        inputs.clear();
        inputs.extend(batch.iter().map(|nonce| {
            let mut bytes = template;
            bytes[NONCE_WORD * 4..].copy_from_slice(&nonce.to_be_bytes());
            bytes
        }));

        let hashes = pipeline.hash_batch(&inputs)?;
        hashes_done += hashes.len() as u64;
        control.hashes.fetch_add(hashes.len() as u64, Ordering::Relaxed);

        let winner = batch
            .iter()
            .zip(hashes)
            .find(|(_, hash)| target.is_met_by(hash));
        if let Some((&nonce, hash)) = winner {
            debug!(nonce, hash = %hex::encode(hash), "solution found");
            return Ok(ScanOutcome {
                solution: Some(Solution { nonce, hash }),
                hashes_done,
            });
        }
    }

    Ok(ScanOutcome {
        solution: None,
        hashes_done,
    })
}

/// Scan `[start, end)` on `threads` threads
///
/// Thread `i` tries `start + i`, `start + i + threads`, ... with its own
/// fork of `pipeline`. The first solution stops the other threads, and so
/// does an error or a panic in any of them. A worker panic is resumed on
/// the calling thread once the others have returned.
#[instrument(level = "debug", skip(pipeline, header, target, control))]
pub fn scan_parallel(
    pipeline: &Pipeline,
    header: &Header,
    target: &Target,
    start: u32,
    end: u32,
    threads: usize,
    control: &ScanControl,
) -> Result<ScanOutcome, Lyra2Error> {
    let threads = threads.max(1);
    let mut forks = Vec::with_capacity(threads);
    for _ in 0..threads {
        forks.push(pipeline.fork()?);
    }

    let found = Mutex::new(None::<Solution>);
    let results: Vec<Result<u64, Lyra2Error>> = std::thread::scope(|s| {
        let handles: Vec<_> = forks
            .into_iter()
            .enumerate()
            .map(|(thread_id, mut fork)| {
                let found = &found;
                s.spawn(move || {
                    let first = start.saturating_add(thread_id as u32);
                    let nonces = (first..end).step_by(threads);
                    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| {
                        scan(&mut fork, header, target, nonces, control)
                    })) {
                        Ok(Ok(outcome)) => outcome,
                        Ok(Err(e)) => {
                            control.stop();
                            return Err(e);
                        }
                        Err(payload) => {
                            control.stop();
                            panic::resume_unwind(payload)
                        }
                    };

                    if let Some(solution) = outcome.solution {
                        let mut guard = found.lock().unwrap_or_else(|e| e.into_inner());
                        if guard.is_none() {
                            *guard = Some(solution);
                        }
                        control.stop();
                    }
                    Ok(outcome.hashes_done)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(result) => result,
                Err(payload) => {
                    control.stop();
                    panic::resume_unwind(payload)
                }
            })
            .collect()
    });

    let mut hashes_done = 0;
    for result in results {
        hashes_done += result?;
    }
    let solution = found.into_inner().unwrap_or_else(|e| e.into_inner());

    info!(hashes_done, found = solution.is_some(), "scan finished");
    Ok(ScanOutcome {
        solution,
        hashes_done,
    })
}
