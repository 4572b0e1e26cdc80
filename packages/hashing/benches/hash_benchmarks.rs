//! Throughput benchmarks for hashing operations across algorithms and data sizes

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::runtime::Runtime;
use unihash::{registry, Identifier};

/// Benchmark every registered algorithm with different data sizes
fn benchmark_hash_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_throughput");

    // 1KB, 64KB, 1MB
    let sizes = [1024, 65536, 1_048_576];

    for size in &sizes {
        group.throughput(Throughput::Bytes(*size as u64));
        let data = vec![0u8; *size];

        for id in registry::registered() {
            group.bench_with_input(BenchmarkId::new(id.name(), size), &data, |b, data| {
                b.iter(|| {
                    let hash = id.hash([data]).expect("registered hash should succeed");
                    std::hint::black_box(hash);
                });
            });
        }
    }
    group.finish();
}

/// Benchmark extendable-output reads of increasing length
fn benchmark_xof_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("xof_output");
    let data = vec![0u8; 1024];

    for output in [32usize, 256, 4096] {
        group.throughput(Throughput::Bytes(output as u64));
        for id in [
            Identifier::SHAKE128,
            Identifier::SHAKE256,
            Identifier::BLAKE2XB,
            Identifier::BLAKE2XS,
            Identifier::BLAKE3,
        ] {
            group.bench_with_input(BenchmarkId::new(id.name(), output), &output, |b, &output| {
                let mut hasher = id.hasher().expect("XOF should be available");
                b.iter(|| {
                    let hash = hasher.hash(output, [&data]).expect("XOF read should succeed");
                    std::hint::black_box(hash);
                });
            });
        }
    }
    group.finish();
}

/// Benchmark HMAC and HKDF on the fixed-output functions
fn benchmark_keyed_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_operations");
    let message = vec![0u8; 1024];

    for id in [
        Identifier::SHA256,
        Identifier::SHA512,
        Identifier::SHA3_256,
        Identifier::BLAKE2B_512,
    ] {
        let hasher = id.fixed().expect("fixed hash should be available");
        let key = vec![0x0bu8; id.size()];

        group.bench_function(BenchmarkId::new("hmac", id.name()), |b| {
            b.iter(|| {
                let tag = hasher.hmac(&message, &key).expect("HMAC should succeed");
                std::hint::black_box(tag);
            });
        });

        group.bench_function(BenchmarkId::new("hkdf", id.name()), |b| {
            b.iter(|| {
                let okm = hasher
                    .hkdf(&key, b"salt", b"info", 3 * id.size())
                    .expect("HKDF should succeed");
                std::hint::black_box(okm);
            });
        });
    }
    group.finish();
}

/// Benchmark the tokio task path against direct computation
fn benchmark_async_overhead(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("async_overhead");
    let data = vec![0u8; 65536];

    group.bench_function("SHA-256_direct", |b| {
        b.iter(|| {
            let hash = Identifier::SHA256
                .hash([&data])
                .expect("Hash should succeed");
            std::hint::black_box(hash);
        });
    });

    group.bench_function("SHA-256_compute", |b| {
        b.iter(|| {
            rt.block_on(async {
                let hash = Identifier::SHA256
                    .compute(data.clone())
                    .await
                    .expect("Hash should succeed");
                std::hint::black_box(hash);
            });
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_hash_algorithms,
    benchmark_xof_output,
    benchmark_keyed_operations,
    benchmark_async_overhead
);
criterion_main!(benches);
