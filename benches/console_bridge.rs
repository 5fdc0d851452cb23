//! Console bridge benchmark suite.
//!
//! Benchmarks the per-line work on the UI context and the per-document
//! work of the fallback interceptor:
//! - Bridge message decoding
//! - Console routing of bridge and non-bridge lines
//! - `<head>` injection at several document sizes
//!
//! Run with: cargo bench --bench console_bridge
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tokio::runtime::Runtime;

use webview_bridge::injection::inject_into_head;
use webview_bridge::protocol::{BridgeMessage, bootstrap_script};
use webview_bridge::transport::MessageBridge;
use webview_bridge::{CallbackId, ConsoleMessage};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const DOCUMENT_SIZES_KB: &[usize] = &[4, 64, 512];

const CALLBACK_LINE: &str = r#"__GJ__:{"t":"cb","id":"c1","result":"\"some result text\""}"#;

// ============================================================================
// Benchmark: Message Decoding
// ============================================================================

fn bench_decode(c: &mut Criterion) {
    let payload = &CALLBACK_LINE["__GJ__:".len()..];

    c.bench_function("bridge_message_decode", |b| {
        b.iter(|| BridgeMessage::decode(black_box(payload)))
    });
}

// ============================================================================
// Benchmark: Console Routing
// ============================================================================

fn bench_console_routing(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let bridge = MessageBridge::new(rt.handle().clone());

    let mut group = c.benchmark_group("console_routing");

    group.bench_function("bridge_line", |b| {
        let message = ConsoleMessage::info(CALLBACK_LINE);
        b.iter(|| {
            bridge.register_pending(CallbackId::new("c1"), Box::new(|_| {}));
            bridge.on_console_message(black_box(&message))
        });
    });

    group.bench_function("plain_line", |b| {
        let message = ConsoleMessage::info("page says hello");
        b.iter(|| bridge.on_console_message(black_box(&message)));
    });

    group.finish();
}

// ============================================================================
// Benchmark: Head Injection
// ============================================================================

fn bench_inject(c: &mut Criterion) {
    let js = bootstrap_script();

    let mut group = c.benchmark_group("inject_into_head");

    for &kb in DOCUMENT_SIZES_KB {
        let body = "<p>lorem ipsum</p>".repeat(kb * 1024 / 18);
        let html = format!("<!doctype html><html><head><title>t</title></head><body>{body}</body></html>");

        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("kb", kb), &html, |b, html| {
            b.iter(|| inject_into_head(black_box(html), &js));
        });
    }

    group.finish();
}

// ============================================================================
// Main
// ============================================================================

criterion_group!(benches, bench_decode, bench_console_routing, bench_inject);
criterion_main!(benches);
