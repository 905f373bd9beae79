use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_bigint::BigInt;
use rand::Rng;
use shardsolve::input::{parse_document, SharePolicy};
use shardsolve::share::{decode, BaseToken, Share};
use shardsolve::sss::{reconstruct, ReconstructionProblem};

fn honest_shares(threshold: usize, shares: usize) -> Vec<Share> {
    let mut rng = rand::thread_rng();
    let coefficients: Vec<BigInt> = (0..threshold)
        .map(|_| {
            let mut bytes = [0u8; 32];
            rng.fill(&mut bytes);
            BigInt::from_bytes_be(num_bigint::Sign::Plus, &bytes)
        })
        .collect();

    (1..=shares as i64)
        .map(|x| {
            let x = BigInt::from(x);
            let y = coefficients
                .iter()
                .rev()
                .fold(BigInt::from(0), |acc, coeff| acc * &x + coeff);
            Share { x, y }
        })
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    c.bench_function("decode", |b| {
        let value = "f".repeat(64);
        let base = BaseToken::from(16);
        b.iter(|| decode(black_box("7"), black_box(&base), black_box(&value)))
    });
}

fn bench_reconstruct(c: &mut Criterion) {
    c.bench_function("reconstruct_k5", |b| {
        let problem = ReconstructionProblem::new(5, honest_shares(5, 10));
        b.iter(|| reconstruct(black_box(&problem)))
    });

    c.bench_function("reconstruct_k10", |b| {
        let problem = ReconstructionProblem::new(10, honest_shares(10, 10));
        b.iter(|| reconstruct(black_box(&problem)))
    });
}

fn bench_solve_document(c: &mut Criterion) {
    c.bench_function("solve_document", |b| {
        let json = include_str!("../demos/shares2.json");
        b.iter(|| {
            let document = parse_document(black_box(json), SharePolicy::Abort).unwrap();
            document.reconstruct()
        })
    });
}

criterion_group!(benches, bench_decode, bench_reconstruct, bench_solve_document);
criterion_main!(benches);
