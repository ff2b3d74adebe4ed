//! Tests for the Lyra2 core

use proptest::prelude::*;

use crate::{
    BLOCK_BYTES, InputStride, LYRA2RE, LYRA2REV2, Lyra2, Lyra2Error, Params, derive, derive_fixed,
    lyra2v2, lyra2v2_batch,
};

fn derive_vec(k: usize, pwd: &[u8], salt: &[u8], t: u64, r: u16, c: u16) -> Vec<u8> {
    let mut out = vec![0u8; k];
    derive(&mut out, pwd, salt, t, r, c).unwrap();
    out
}

fn counting(range: core::ops::Range<u8>) -> Vec<u8> {
    range.collect()
}

/// Reference vectors for the general form
#[test]
fn test_known_answer_vectors() {
    let zero = [0u8; 32];

    // Lyra2RE core shape
    assert_eq!(
        hex::encode(derive_vec(32, &zero, &zero, 1, 8, 8)),
        "8a4aed60fd4b60338a003a2fb850438777f144c2877d499e5916a27ebb2b1623"
    );

    // Lyra2REv2 core shape
    assert_eq!(
        hex::encode(derive_vec(32, &zero, &zero, 1, 4, 4)),
        "a7e79103b9c0bb08bbd13d8ceb3bca62e3efef67e35868d320379b00a4458a67"
    );

    assert_eq!(
        hex::encode(derive_vec(32, b"password", b"salt", 1, 8, 8)),
        "c76fe17470a7ff6a7c9fa0196b351cc7a015ee6c410ec4ef4fc97d5c48e21544"
    );

    assert_eq!(
        hex::encode(derive_vec(32, b"password", b"salt", 2, 6, 3)),
        "8bfd295a852bbef68223898e6c549f79cad874524f0f4a1f87aa7cd0ce3c597b"
    );

    assert_eq!(
        hex::encode(derive_vec(32, b"password", b"salt", 3, 5, 4)),
        "018adf359d66b1f48ffe487f04d49c92bbcbbdd04000f6e1f4d6c73e218042b6"
    );

    assert_eq!(
        hex::encode(derive_vec(32, b"password", b"salt", 2, 2, 2)),
        "19a79978ab50b2fb01a25314345ec5430bef6f802b3043e90673e18f0b69784b"
    );

    assert_eq!(
        hex::encode(derive_vec(16, b"password", b"salt", 1, 3, 1)),
        "79c09c85110962f77504147bb0dc0285"
    );

    // Lyra2RE calls the core with the same 32-byte hash as password and salt
    let hash = counting(0..32);
    assert_eq!(
        hex::encode(derive_vec(32, &hash, &hash, 1, 8, 8)),
        "6e01bfcf287c2504aefdced7b921743d475ce63c4cfd5bcbc1a901f4fa3c2416"
    );
}

#[test]
fn test_zero_time_cost_skips_wandering() {
    let zero = [0u8; 32];
    let out = derive_vec(32, &zero, &zero, 0, 8, 8);

    assert_eq!(
        hex::encode(&out),
        "d7d850400cf517c3d6fe32875678a8c5d5a587feeea1a894fb3f3b5a029bee27"
    );
    assert_ne!(out, derive_vec(32, &zero, &zero, 1, 8, 8));
}

#[test]
fn test_multi_block_input() {
    let pwd = counting(0..100);
    let salt = counting(200..250);

    assert_eq!(
        hex::encode(derive_vec(48, &pwd, &salt, 1, 8, 8)),
        "4266fd34e9a0b77669354d50935cd222c09fb1ee28a7962426eb7bd028e98cec598011753c977b3b965f44b81ac49973"
    );
    assert_eq!(
        hex::encode(derive_vec(48, &pwd, &salt, 1, 8, 4)),
        "db70f9783de47573170df3a1142bdc73344c8bab3bc1d1f251defd17d794f20e497aa07b1119c807e1db1fa6585aa121"
    );
}

/// Every shape absorbs a 32+32-byte input contiguously, so the output
/// length, the password/salt split and the salt all reach the sponge
#[test]
fn test_two_block_input_binds_every_field() {
    let x = counting(0..64);
    let base = derive_vec(32, &x[..32], &x[32..], 1, 8, 8);
    assert_eq!(
        hex::encode(&base),
        "aa431ee0c6b317ef141ccdeb09d7d0f6dac115143a55f8d6b2a00f342d0af66f"
    );

    let all_salt = derive_vec(32, &[], &x, 1, 8, 8);
    let all_pwd = derive_vec(32, &x, &[], 1, 8, 8);
    assert_eq!(
        hex::encode(&all_salt),
        "27aad759772e17d7c2fd76f656742496abce3306643311796cc705bf879ed1bf"
    );
    assert_eq!(
        hex::encode(&all_pwd),
        "d92f567496046f4ded8d524f6b984e5a7be03b436416a87338c93293e55e5be6"
    );
    assert_ne!(base, all_salt);
    assert_ne!(base, all_pwd);
    assert_ne!(all_salt, all_pwd);

    let zero = [0u8; 32];
    let k32 = derive_vec(32, &zero, &zero, 1, 8, 8);
    let k33 = derive_vec(33, &zero, &zero, 1, 8, 8);
    assert_eq!(
        hex::encode(&k33),
        "7cbea77e6b61543ddaaabab7db042b806f6cda570df95a83978a0cee27bc00453d"
    );
    assert_ne!(&k33[..32], &k32[..]);

    let mut salt = x[32..].to_vec();
    salt[31] ^= 1;
    assert_ne!(derive_vec(32, &x[..32], &salt, 1, 8, 8), base);
}

#[test]
fn test_stride_override() {
    let zero = [0u8; 32];
    let legacy = Params::new(1, 8, 8).with_stride(InputStride::Legacy);
    let mut hasher = Lyra2::new(legacy).unwrap();
    let mut out = [0u8; 32];
    hasher.derive(&mut out, &zero, &zero).unwrap();

    assert_eq!(
        hex::encode(out),
        "ba7e4eca116155fc767d81ff1c2b98eb95768ae3e3d4104bf048d703c46c4324"
    );

    let pwd = counting(0..100);
    let salt = counting(200..250);
    let mut out = [0u8; 48];
    hasher.derive(&mut out, &pwd, &salt).unwrap();
    assert_eq!(
        hex::encode(out),
        "a02c7c9d342fd87574a307edfac67662927e32cc3e2fdb79c42137fed312063cb66d6afd681a28a055036683b02bda31"
    );

    assert_eq!(Params::new(1, 8, 8).stride, InputStride::Packed);
    assert_eq!(LYRA2RE.stride, InputStride::Packed);
    assert_eq!(InputStride::default(), InputStride::Packed);
}

#[test]
fn test_output_boundaries() {
    let expected_95 = "82ed14f7cd490a94be71e3e6257c3142227128f4fc15cf2667d2959de2123baee80e18b393c3a7df248518e1076dc4b3ca05006adddccff1f9717f229cf854903f83152389496c01964a8ea52fc7de3954ec3ba9d460a002a204c97ab67fa0";
    let expected_96 = "5a581a2bce3336556526595cb88c6e5b4eb2580bbb737b190d27ef65bb934dae92ff3b72b285052c610e666f59e3eb44e08ab5e774cd1acf8dc99f937f77c4561467c7e348d5c8eca3a1a5ec951c52a56562ba63c99de783cc0d70ae12661bae";
    let expected_97 = "356ebd170bcb3f5cc0b0155b92b29dec41414f4e405d23d8f30bb182249aad683ad4927b6ab0a2d2016265b1c9d574fc967bb04311236bd4751b6199ccd9ab820abd8ee8dd5a9301a53b948bb4ecd73d7c5b1af1a4401857ffd4e4259d2134652b";

    let out_95 = derive_vec(BLOCK_BYTES - 1, b"password", b"salt", 1, 4, 4);
    let out_96 = derive_vec(BLOCK_BYTES, b"password", b"salt", 1, 4, 4);
    let out_97 = derive_vec(BLOCK_BYTES + 1, b"password", b"salt", 1, 4, 4);

    assert_eq!(hex::encode(&out_95), expected_95);
    assert_eq!(hex::encode(&out_96), expected_96);
    assert_eq!(hex::encode(&out_97), expected_97);
    assert_eq!(out_97.len(), 97);
}

#[test]
fn test_fixed_matches_general() {
    let mut hasher = Lyra2::new(LYRA2REV2).unwrap();

    for seed in 0u8..8 {
        let hash: [u8; 32] = core::array::from_fn(|i| (i as u8).wrapping_mul(31).wrapping_add(seed));

        let mut general = [0u8; 32];
        hasher.derive(&mut general, &hash, &hash).unwrap();

        assert_eq!(lyra2v2(&hash), general, "lane seed {}", seed);
    }
}

#[test]
fn test_fixed_known_answers() {
    assert_eq!(
        hex::encode(lyra2v2(&[0u8; 32])),
        "a7e79103b9c0bb08bbd13d8ceb3bca62e3efef67e35868d320379b00a4458a67"
    );

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&counting(0..32));
    assert_eq!(
        hex::encode(lyra2v2(&hash)),
        "6e30062cecbe4c53612da9305a36d7e89ca9983efcf86498596d1751e718aa73"
    );

    let mut input = [0u8; 64];
    input[..32].copy_from_slice(&hash);
    input[32..].copy_from_slice(&hash);
    let mut out = [0u8; 32];
    derive_fixed(&mut out, &input);
    assert_eq!(out, lyra2v2(&hash));
}

#[test]
fn test_fixed_with_distinct_password_and_salt() {
    let mut input = [0u8; 64];
    input[32..].copy_from_slice(&[0x5a; 32]);

    let mut fixed = [0u8; 32];
    derive_fixed(&mut fixed, &input);

    let general = derive_vec(32, &input[..32], &input[32..], 1, 4, 4);
    assert_eq!(&fixed[..], &general[..]);
}

#[test]
fn test_batch_matches_single() {
    let mut lanes: Vec<[u8; 32]> = (0u8..8).map(|i| [i; 32]).collect();
    let expected: Vec<[u8; 32]> = lanes.iter().map(lyra2v2).collect();

    lyra2v2_batch(&mut lanes);
    assert_eq!(lanes, expected);
}

#[test]
fn test_parameter_sensitivity() {
    let base = derive_vec(32, b"password", b"salt", 1, 8, 8);

    let variants = [
        ("password", derive_vec(32, b"passwore", b"salt", 1, 8, 8)),
        ("salt", derive_vec(32, b"password", b"salu", 1, 8, 8)),
        ("time cost", derive_vec(32, b"password", b"salt", 2, 8, 8)),
        ("rows", derive_vec(32, b"password", b"salt", 1, 16, 8)),
        ("cols", derive_vec(32, b"password", b"salt", 1, 8, 6)),
    ];
    for (field, out) in &variants {
        assert_ne!(&base, out, "changing {} did not change the output", field);
    }

    // Output length is bound through the basil
    let longer = derive_vec(33, b"password", b"salt", 1, 8, 8);
    assert_ne!(&longer[..32], &base[..]);

    // Swapping bytes between password and salt moves the length fields
    let shifted = derive_vec(32, b"passwords", b"alt", 1, 8, 8);
    assert_ne!(base, shifted);
}

#[test]
fn test_hasher_reusability() {
    let mut hasher = Lyra2::new(LYRA2RE).unwrap();
    let mut first = [0u8; 32];
    let mut second = [0u8; 32];
    let mut again = [0u8; 32];

    hasher.derive(&mut first, b"first input", b"salt").unwrap();
    hasher.derive(&mut second, &[0xab; 200], b"a much longer salt").unwrap();
    hasher.derive(&mut again, b"first input", b"salt").unwrap();

    assert_ne!(first, second);
    assert_eq!(first, again);
    assert_eq!(hasher.params(), &LYRA2RE);
}

#[test]
fn test_invalid_shapes() {
    let mut out = [0u8; 32];

    assert_eq!(
        derive(&mut out, b"pwd", b"salt", 1, 1, 8),
        Err(Lyra2Error::InvalidShape { rows: 1, cols: 8 })
    );
    assert_eq!(
        derive(&mut out, b"pwd", b"salt", 1, 8, 0),
        Err(Lyra2Error::InvalidShape { rows: 8, cols: 0 })
    );
    assert!(Lyra2::new(Params::new(1, 0, 0)).is_err());
}

#[test]
fn test_input_too_long_leaves_output_untouched() {
    let mut out = [0x77u8; 32];
    let pwd = vec![1u8; 400];

    // 2x2 matrix holds 384 bytes; 400 + 4 + 48 bytes pad out to 8 blocks
    let err = derive(&mut out, &pwd, b"salt", 1, 2, 2).unwrap_err();
    assert_eq!(
        err,
        Lyra2Error::InputTooLong {
            needed: 512,
            capacity: 384
        }
    );
    assert_eq!(out, [0x77u8; 32]);
    assert!(err.to_string().contains("384"));

    // The same 2x2 matrix takes 200 bytes packed but not at a 512-byte stride
    let pwd = vec![1u8; 200];
    assert!(derive(&mut out, &pwd, b"salt", 1, 2, 2).is_ok());
    let legacy = Params::new(1, 2, 2).with_stride(InputStride::Legacy);
    let err = Lyra2::new(legacy)
        .unwrap()
        .derive(&mut [0u8; 32], &pwd, b"salt")
        .unwrap_err();
    assert_eq!(
        err,
        Lyra2Error::InputTooLong {
            needed: 3 * 512 + 64,
            capacity: 384
        }
    );
}

#[test]
fn test_staging_sizes() {
    let re = LYRA2RE;
    assert_eq!(Params::input_blocks(32, 32), 2);
    assert_eq!(Params::input_blocks(8, 7), 1);
    assert_eq!(re.staging_bytes(32, 32), 128);
    assert_eq!(
        re.with_stride(InputStride::Legacy).staging_bytes(32, 32),
        512 + 64
    );
    assert_eq!(LYRA2REV2.staging_bytes(32, 32), 128);
    assert_eq!(re.matrix_bytes(), 6144);
    assert_eq!(LYRA2REV2.matrix_bytes(), 1536);
}

#[test]
fn test_empty_output_and_inputs() {
    let mut out = [0u8; 0];
    assert!(derive(&mut out, b"", b"", 1, 4, 4).is_ok());

    let a = derive_vec(32, b"", b"", 1, 4, 4);
    let b = derive_vec(32, b"", b"", 1, 4, 4);
    assert_eq!(a, b);
    assert_ne!(a, vec![0u8; 32]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_deterministic(
        pwd in proptest::collection::vec(any::<u8>(), 0..40),
        salt in proptest::collection::vec(any::<u8>(), 0..40),
        t in 0u64..3,
        r in 2u16..10,
        c in 1u16..6,
        k in 1usize..200,
    ) {
        let mut a = vec![0u8; k];
        let mut b = vec![0u8; k];
        derive(&mut a, &pwd, &salt, t, r, c).unwrap();

        let mut hasher = Lyra2::new(Params::new(t, r, c)).unwrap();
        hasher.derive(&mut b, &pwd, &salt).unwrap();
        prop_assert_eq!(&a, &b);

        hasher.derive(&mut b, &pwd, &salt).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_fixed_equals_general(hash in any::<[u8; 32]>()) {
        let mut general = [0u8; 32];
        derive(&mut general, &hash, &hash, 1, 4, 4).unwrap();
        prop_assert_eq!(lyra2v2(&hash), general);
    }
}
