//! # Event Bus Benchmarks
//!
//! Publisher-side cost of `EventBus::publish`:
//!
//! | Case | Path |
//! |------|------|
//! | no subscribers | snapshot only |
//! | roomy queue | `try_send` into the worker queue |
//! | one-slot queue | mostly fallback `spawn` |
//! | fan-out | one job per subscriber |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_bus::{EventBus, EventContext, HandlerResult};
use shared_types::{topics, ConnectorEvent, Transaction};
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .expect("benchmark runtime")
}

fn bus(rt: &Runtime, workers: usize, capacity: usize, subscribers: usize) -> EventBus<ConnectorEvent> {
    let bus = EventBus::builder()
        .workers(workers)
        .queue_capacity(capacity)
        .runtime(rt.handle().clone())
        .build();
    for _ in 0..subscribers {
        let _sub = bus.subscribe_fn(topics::TRANSACTION_CREATED, |_ctx, event| async move {
            black_box(event);
            HandlerResult::Ok(())
        });
    }
    bus
}

fn event() -> ConnectorEvent {
    ConnectorEvent::TransactionCreated(Transaction {
        id: "bench".into(),
        chain: "ETH".into(),
        gas: 21_000,
        ..Default::default()
    })
}

fn bench_publish_paths(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("bus-publish");
    group.throughput(Throughput::Elements(1));

    let cases = [
        ("no_subscribers", bus(&rt, 4, 1024, 0)),
        ("roomy_queue", bus(&rt, 4, 1 << 16, 1)),
        ("one_slot_queue", bus(&rt, 1, 1, 1)),
    ];
    for (name, bus) in &cases {
        group.bench_function(*name, |b| {
            b.iter(|| bus.publish(EventContext::background(), topics::TRANSACTION_CREATED, event()))
        });
    }
    group.finish();

    for (_, bus) in cases {
        rt.block_on(async move {
            let _ = bus.close().await;
        });
    }
}

fn bench_fan_out(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("bus-fan-out");

    for subscribers in [1usize, 4, 16] {
        let bus = bus(&rt, 4, 1 << 16, subscribers);
        group.throughput(Throughput::Elements(subscribers as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| {
                    bus.publish(EventContext::background(), topics::TRANSACTION_CREATED, event())
                })
            },
        );
        rt.block_on(async move {
            let _ = bus.close().await;
        });
    }
    group.finish();
}

criterion_group!(benches, bench_publish_paths, bench_fan_out);
criterion_main!(benches);
