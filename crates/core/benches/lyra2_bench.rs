//! Benchmark for the Lyra2 core

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lyra2_core::{LYRA2RE, Lyra2, lyra2v2, lyra2v2_batch};

fn bench_general(c: &mut Criterion) {
    let Ok(mut hasher) = Lyra2::new(LYRA2RE) else {
        return;
    };
    let input = [0x42u8; 32];
    let mut key = [0u8; 32];

    c.bench_function("lyra2re_core", |b| {
        b.iter(|| hasher.derive(black_box(&mut key), black_box(&input), black_box(&input)))
    });
}

fn bench_fixed(c: &mut Criterion) {
    c.bench_function("lyra2v2_core", |b| {
        let mut nonce: u32 = 0;
        b.iter(|| {
            let mut input = [0u8; 32];
            input[..4].copy_from_slice(&nonce.to_le_bytes());
            nonce = nonce.wrapping_add(1);
            lyra2v2(black_box(&input))
        })
    });
}

fn bench_fixed_batch(c: &mut Criterion) {
    c.bench_function("lyra2v2_batch_8", |b| {
        let mut lanes = [[0u8; 32]; 8];
        b.iter(|| lyra2v2_batch(black_box(&mut lanes)))
    });
}

criterion_group!(benches, bench_general, bench_fixed, bench_fixed_batch);
criterion_main!(benches);
