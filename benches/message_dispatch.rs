//! Inbound frame classification benchmarks.
//!
//! Measures parsing and shape dispatch for the frames a bridge sends:
//! - Discovery results of 1, 16, 256 printers
//! - Status frames
//!
//! Run with: cargo bench --bench message_dispatch
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use printer_websocket::{InboundMessage, SessionToken};
use printer_websocket::protocol::{Call, Request};
use serde_json::json;

// ============================================================================
// Benchmark Parameters
// ============================================================================

const PRINTER_COUNTS: &[usize] = &[1, 16, 256];

fn discovery_frame(count: usize) -> String {
    let printers: Vec<_> = (0..count)
        .map(|i| json!({ "name": format!("Printer {i}"), "port": format!("USB{i:03}") }))
        .collect();
    json!({ "uid": "uid-0123456789abcdef", "result": printers, "status_code": 0 }).to_string()
}

// ============================================================================
// Benchmark: Discovery Parsing
// ============================================================================

fn bench_discovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("discovery_parse");

    for &count in PRINTER_COUNTS {
        let frame = discovery_frame(count);
        group.bench_with_input(BenchmarkId::new("printers", count), &frame, |b, frame| {
            b.iter(|| InboundMessage::parse(black_box(frame)));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Status Parsing
// ============================================================================

fn bench_status(c: &mut Criterion) {
    let frame = r#"{"status":"error","status_code":2,"message":"The printer is paused."}"#;

    c.bench_function("status_parse", |b| {
        b.iter(|| InboundMessage::parse(black_box(frame)));
    });
}

// ============================================================================
// Benchmark: Print Request Encoding
// ============================================================================

fn bench_print_request(c: &mut Criterion) {
    let uid = SessionToken::generate();
    let label = "SIZE 50 mm,30 mm\r\nGAP 2 mm,0\r\nCLS\r\nTEXT 10,10,\"3\",0,1,1,\"Hello\"\r\nPRINT 1\r\n"
        .repeat(8);

    c.bench_function("print_request_encode", |b| {
        b.iter(|| {
            Request::new(uid.clone(), Call::print("LabelPrinter", black_box(label.as_str())))
                .to_frame()
        });
    });
}

criterion_group!(benches, bench_discovery, bench_status, bench_print_request);
criterion_main!(benches);
