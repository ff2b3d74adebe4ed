//! BLAKE2b round function without message words
//!
//! One round mixes the four columns of the 4x4 word state, then its four
//! diagonals. The full permutation runs 12 rounds; the reduced one runs a
//! single round and carries almost all of the matrix traffic.

use crate::params::{FULL_ROUNDS, REDUCED_ROUNDS, STATE_WORDS};

/// Word indices mixed by each G call: four columns, then four diagonals
const G_LANES: [[usize; 4]; 8] = [
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
    [0, 5, 10, 15],
    [1, 6, 11, 12],
    [2, 7, 8, 13],
    [3, 4, 9, 14],
];

#[inline(always)]
fn g(v: &mut [u64; STATE_WORDS], a: usize, b: usize, c: usize, d: usize) {
    v[a] = v[a].wrapping_add(v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

#[inline(always)]
fn round(v: &mut [u64; STATE_WORDS]) {
    for [a, b, c, d] in G_LANES {
        g(v, a, b, c, d);
    }
}

/// Full-strength permutation (12 rounds)
#[inline]
pub fn permute(state: &mut [u64; STATE_WORDS]) {
    for _ in 0..FULL_ROUNDS {
        round(state);
    }
}

/// Reduced permutation (1 round)
#[inline(always)]
pub fn permute_reduced(state: &mut [u64; STATE_WORDS]) {
    for _ in 0..REDUCED_ROUNDS {
        round(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_is_twelve_reduced() {
        let mut a: [u64; STATE_WORDS] = core::array::from_fn(|i| i as u64 * 0x0101_0101_0101_0101);
        let mut b = a;

        permute(&mut a);
        for _ in 0..FULL_ROUNDS {
            permute_reduced(&mut b);
        }

        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_state_and_single_bit() {
        // G is linear over zero, so the all-zero state stays zero
        let mut zero = [0u64; STATE_WORDS];
        permute(&mut zero);
        assert_eq!(zero, [0u64; STATE_WORDS]);

        let mut one = [0u64; STATE_WORDS];
        one[0] = 1;
        permute_reduced(&mut one);
        assert_eq!(one[0], 0x10201);
        assert_eq!(one[1], 0x0100_0000_0100_0001);
        assert_eq!(one[15], 0x0201_0000_0101_0001);
    }
}
