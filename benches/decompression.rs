use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rawflate::{inflate_bytes, Flush, InflateStream, Status};
use std::hint::black_box;
use std::io::Write;
use std::time::Duration;

fn generate_original(size: usize, pattern: &str) -> Vec<u8> {
    match pattern {
        "text" => {
            let base = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
            let mut data = Vec::with_capacity(size);
            while data.len() < size {
                data.extend_from_slice(base);
            }
            data.truncate(size);
            data
        }
        "repetitive" => {
            let pattern = b"ABCDEFGHIJ";
            let mut data = Vec::with_capacity(size);
            while data.len() < size {
                data.extend_from_slice(pattern);
            }
            data.truncate(size);
            data
        }
        "random" => (0..size)
            .map(|i| {
                let x = i as u32;
                ((x.wrapping_mul(1664525).wrapping_add(1013904223)) >> 16) as u8
            })
            .collect(),
        _ => panic!("Unknown pattern: {}", pattern),
    }
}

fn generate_compressed_data(size: usize, pattern: &str, level: u32) -> Vec<u8> {
    let original = generate_original(size, pattern);
    let mut encoder =
        flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::new(level));
    encoder.write_all(&original).expect("Compression failed");
    encoder.finish().expect("Compression failed")
}

fn decompression_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression_throughput");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(100);

    for size in [1024, 10240, 102400, 1048576].iter() {
        let size_label = match *size {
            1024 => "1KB",
            10240 => "10KB",
            102400 => "100KB",
            1048576 => "1MB",
            _ => "unknown",
        };

        for pattern in ["text", "repetitive", "random"].iter() {
            for level in [1u32, 6, 9].iter() {
                let compressed_data = generate_compressed_data(*size, pattern, *level);

                let benchmark_id = BenchmarkId::from_parameter(format!(
                    "{}/{}/level{}",
                    size_label, pattern, level
                ));

                // Throughput is based on uncompressed size
                group.throughput(Throughput::Bytes(*size as u64));
                group.bench_with_input(benchmark_id, &compressed_data, |b, data| {
                    b.iter(|| inflate_bytes(black_box(data)).expect("Decompression failed"));
                });
            }
        }
    }

    group.finish();
}

fn streaming_output_windows(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming_output_windows");
    group.measurement_time(Duration::from_secs(5));

    let size = 1048576;
    let compressed = generate_compressed_data(size, "text", 6);

    // how output-buffer granularity affects throughput: tiny windows run
    // the one-symbol path, large ones stay on the inlined loop
    for out_chunk in [64usize, 512, 4096, 65536].iter() {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}B", out_chunk)),
            out_chunk,
            |b, &chunk| {
                b.iter(|| {
                    let mut stream = InflateStream::new();
                    let mut out = vec![0u8; chunk];
                    let mut pos = 0;
                    let mut total = 0usize;
                    loop {
                        let inf = stream
                            .inflate(black_box(&compressed[pos..]), &mut out, Flush::None)
                            .expect("Decompression failed");
                        pos += inf.bytes_consumed;
                        total += inf.bytes_written;
                        if inf.status == Status::StreamEnd {
                            break;
                        }
                    }
                    assert_eq!(total, size);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, decompression_throughput, streaming_output_windows);
criterion_main!(benches);
