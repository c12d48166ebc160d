//! Benchmarks for payload building and the full send path.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use thingsboard_http::{
    ClientConfig, DEFAULT_PAYLOAD_SIZE, HttpResponse, JsonDocument, NullLogger, PostRequest,
    Telemetry, ThingsBoard, Transport, TransportError,
};

/// Answers 200 without doing any I/O.
struct Accepting;

impl Transport for Accepting {
    fn post(&self, request: &PostRequest<'_>) -> Result<HttpResponse, TransportError> {
        black_box(request.body);
        Ok(HttpResponse::with_status(200))
    }
}

fn batch() -> [Telemetry<'static>; 4] {
    [
        Telemetry::new("temp", 21),
        Telemetry::new("hum", 40.5_f32),
        Telemetry::new("door", "open"),
        Telemetry::new("alarm", false),
    ]
}

fn payload_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload");
    let records = batch();

    group.bench_function("serialize_and_render_batch", |b| {
        let mut buf = vec![0u8; DEFAULT_PAYLOAD_SIZE];
        b.iter(|| {
            let mut doc = JsonDocument::with_capacity(records.len());
            for record in &records {
                record.serialize_keyval(&mut doc).expect("serialize");
            }
            black_box(doc.render_into(&mut buf).expect("render"))
        });
    });

    let config = ClientConfig {
        host: "tb.local".into(),
        access_token: Some("TOKEN".into()),
        ..ClientConfig::default()
    };
    let mut client = ThingsBoard::with_config(config, Some(Accepting));
    client.set_logger(Some(Arc::new(NullLogger)));

    group.bench_function("send_single_value", |b| {
        b.iter(|| black_box(client.send_telemetry_int("temp", 25)))
    });

    group.finish();
}

criterion_group!(benches, payload_benchmarks);
criterion_main!(benches);
