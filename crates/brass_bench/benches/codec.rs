//! Revision file codec benchmarks.

use brass_bench::roots;
use brass_codec::{pack_uint, unpack_uint, RevisionRecord, MAX_TABLES};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use uuid::Uuid;

const UUID: Uuid = Uuid::from_u128(0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10);

/// Benchmark the packed integer primitive.
fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_uint");

    for value in [0u64, 127, 16_383, u64::from(u32::MAX)] {
        group.bench_with_input(BenchmarkId::new("pack", value), &value, |b, &value| {
            let mut buf = Vec::with_capacity(10);
            b.iter(|| {
                buf.clear();
                pack_uint(&mut buf, black_box(value));
                black_box(&buf);
            });
        });

        let mut packed = Vec::new();
        pack_uint(&mut packed, value);
        group.bench_with_input(BenchmarkId::new("unpack", value), &packed, |b, packed| {
            b.iter(|| {
                let mut slice = black_box(packed.as_slice());
                black_box(unpack_uint(&mut slice).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark encoding and decoding whole revision records.
fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("revision_record");

    for tables in [0, 3, MAX_TABLES] {
        let record = RevisionRecord::new(UUID, roots(tables, 1 << 20));
        let encoded = record.encode();
        group.throughput(Throughput::Bytes(encoded.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", tables), &record, |b, record| {
            b.iter(|| black_box(record.encode()));
        });

        group.bench_with_input(BenchmarkId::new("decode", tables), &encoded, |b, encoded| {
            b.iter(|| black_box(RevisionRecord::decode(black_box(encoded)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pack, bench_record);
criterion_main!(benches);
