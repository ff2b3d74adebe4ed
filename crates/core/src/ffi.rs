//! C FFI bindings for native miners

use crate::{LYRA2RE, Lyra2, Params, lyra2v2};
use core::slice;

/// Opaque hasher handle for FFI
pub struct Lyra2Hasher {
    inner: Lyra2,
}

/// Create a hasher for the given shape
/// Returns null if the shape is invalid or the matrix cannot be allocated
/// (caller must free a non-null result with lyra2_free)
#[unsafe(no_mangle)]
pub extern "C" fn lyra2_new(time_cost: u64, rows: u16, cols: u16) -> *mut Lyra2Hasher {
    match Lyra2::new(Params::new(time_cost, rows, cols)) {
        Ok(inner) => Box::into_raw(Box::new(Lyra2Hasher { inner })),
        Err(_) => core::ptr::null_mut(),
    }
}

/// Free a hasher instance
#[unsafe(no_mangle)]
pub extern "C" fn lyra2_free(hasher: *mut Lyra2Hasher) {
    if !hasher.is_null() {
        unsafe {
            let _ = Box::from_raw(hasher);
        }
    }
}

/// Derive `out_len` key bytes
/// - hasher: pointer from lyra2_new()
/// - pwd/salt: input bytes (may be null when the length is 0)
/// - out: buffer of out_len bytes, untouched on failure
///
/// Returns 0 on success, -1 on failure.
#[unsafe(no_mangle)]
pub extern "C" fn lyra2_derive(
    hasher: *mut Lyra2Hasher,
    pwd: *const u8,
    pwd_len: usize,
    salt: *const u8,
    salt_len: usize,
    out: *mut u8,
    out_len: usize,
) -> i32 {
    if hasher.is_null() || out.is_null() {
        return -1;
    }
    if (pwd.is_null() && pwd_len > 0) || (salt.is_null() && salt_len > 0) {
        return -1;
    }

    unsafe {
        let hasher = &mut *hasher;
        let pwd = if pwd_len == 0 { &[][..] } else { slice::from_raw_parts(pwd, pwd_len) };
        let salt = if salt_len == 0 { &[][..] } else { slice::from_raw_parts(salt, salt_len) };
        let out = slice::from_raw_parts_mut(out, out_len);

        match hasher.inner.derive(out, pwd, salt) {
            Ok(()) => 0,
            Err(_) => -1,
        }
    }
}

/// Lyra2REv2 core step
/// - input: pointer to 32 bytes (used as both password and salt)
/// - output: pointer to 32-byte buffer for result
#[unsafe(no_mangle)]
pub extern "C" fn lyra2v2_hash(input: *const u8, output: *mut u8) {
    if input.is_null() || output.is_null() {
        return;
    }

    unsafe {
        let mut hash = [0u8; 32];
        hash.copy_from_slice(slice::from_raw_parts(input, 32));
        let result = lyra2v2(&hash);

        let output_slice = slice::from_raw_parts_mut(output, 32);
        output_slice.copy_from_slice(&result);
    }
}

/// Benchmark: run N Lyra2RE core derivations and return total microseconds
/// Returns 0 if the matrix cannot be allocated
#[unsafe(no_mangle)]
pub extern "C" fn lyra2_benchmark(iterations: u32) -> u64 {
    use std::time::Instant;

    let Ok(mut hasher) = Lyra2::new(LYRA2RE) else {
        return 0;
    };
    let mut key = [0u8; 32];

    let start = Instant::now();
    for i in 0..iterations {
        let mut input = [0u8; 32];
        input[..4].copy_from_slice(&i.to_le_bytes());
        if hasher.derive(&mut key, &input, &input).is_err() {
            return 0;
        }
    }
    let elapsed = start.elapsed();

    elapsed.as_micros() as u64
}

/// Get hash rate (hashes per second) from a benchmark run
#[unsafe(no_mangle)]
pub extern "C" fn lyra2_hashrate(iterations: u32, microseconds: u64) -> f64 {
    if microseconds == 0 {
        return 0.0;
    }
    (iterations as f64) / (microseconds as f64 / 1_000_000.0)
}
