//! Benchmarks for datagram decoding and the per-tick drain loop
//!
//! Covers:
//! - Header parsing alone
//! - Full decode of each packet type
//! - A tick over a batch shaped like one simulator frame
//!
//! Platform: Cross-platform (synthetic packets, CI-safe)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::net::SocketAddr;
use trackside::datagram::RawDatagram;
use trackside::packets::{FormatPolicy, PacketHeader, PacketType, decode_packet};
use trackside::pump::PacketPump;
use trackside::queue::handoff;
use trackside::test_utils::{event_packet, sized_packet};

fn sample(packet_type: PacketType) -> Vec<u8> {
    match packet_type {
        PacketType::Event => event_packet(2020, b"FTLP", &[3, 0, 0, 0xB0, 0x42]),
        other => sized_packet(2020, other),
    }
}

fn bench_header(c: &mut Criterion) {
    let bytes = sample(PacketType::CarTelemetry);
    c.bench_function("header_parse", |b| {
        b.iter(|| black_box(PacketHeader::parse(black_box(&bytes))))
    });
}

fn bench_decode_by_type(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_packet");

    for packet_type in PacketType::ALL {
        let bytes = sample(packet_type);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{packet_type:?}")),
            &bytes,
            |b, bytes| b.iter(|| black_box(decode_packet(black_box(bytes)))),
        );
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    // One frame's worth at 60Hz: the per-car streams plus occasional extras.
    let frame: Vec<Vec<u8>> = [
        PacketType::Motion,
        PacketType::LapData,
        PacketType::CarTelemetry,
        PacketType::CarStatus,
        PacketType::Event,
    ]
    .into_iter()
    .map(sample)
    .collect();
    let source: SocketAddr = "127.0.0.1:20777".parse().expect("valid address");

    let (sender, receiver) = handoff();
    let mut pump = PacketPump::new(receiver, FormatPolicy::Accept);

    let mut group = c.benchmark_group("pump");
    group.throughput(Throughput::Elements(frame.len() as u64));
    group.bench_function("tick_one_frame", |b| {
        b.iter(|| {
            for bytes in &frame {
                sender.push(RawDatagram::new(bytes, source));
            }
            black_box(pump.tick())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_header, bench_decode_by_type, bench_tick);
criterion_main!(benches);
