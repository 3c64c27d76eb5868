use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use watchlog_core::{decode_all, FileHeader, PayloadData, StreamDecoder, WatchLogWriter};

/// Лог из `messages` сообщений по `elements` элементов, каждое четвёртое SPARSE.
fn build_log(
    messages: u32,
    elements: usize,
) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let header = FileHeader::new("watcher", "bench", 1, 0x1000);
    let mut writer = WatchLogWriter::new(Vec::new(), &header).unwrap();

    for i in 0..messages {
        let data: Vec<f32> = (0..elements).map(|_| rng.gen()).collect();
        let ts: Vec<u32> = (0..elements as u32).collect();
        let sparse = (i % 4 == 3).then_some(ts.as_slice());
        writer
            .write_message(u64::from(i), "f", i % 8, &PayloadData::Float32(data), sparse)
            .unwrap();
    }

    writer.finish().unwrap()
}

fn bench_decode_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_all");

    for elements in [1usize, 64, 4096] {
        let buf = build_log(1_000, elements);
        group.throughput(Throughput::Bytes(buf.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(elements), &buf, |b, buf| {
            b.iter(|| decode_all(black_box(buf)).unwrap())
        });
    }

    group.finish();
}

fn bench_stream_count(c: &mut Criterion) {
    let buf = build_log(10_000, 16);

    c.bench_function("stream_decoder: count 10k small messages", |b| {
        b.iter(|| {
            let decoder = StreamDecoder::new(black_box(&buf)).unwrap();
            decoder.map(|m| m.unwrap().data.len()).sum::<usize>()
        })
    });
}

criterion_group!(decoder, bench_decode_all, bench_stream_count);
criterion_main!(decoder);
