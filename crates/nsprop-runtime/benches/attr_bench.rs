//! Benchmarks for the attribute access paths.
//!
//! The interesting comparison is the overhead a computed attribute adds over
//! a plain table read, and what the (already-disarmed) first-access guard
//! costs on the hot path.
//!
//! Run with: cargo bench -p nsprop-runtime --bench attr_bench

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use nsprop_core::{Property, Value};
use nsprop_runtime::{LiveEntry, Loader, Registry};

fn loaded_entry(registry: &Registry) -> std::sync::Arc<LiveEntry> {
    Loader::new(registry)
        .load("bench", |scope| {
            scope.define("plain", Value::from(7));
            scope.define("value", Value::Null);
            scope.define(
                "computed",
                Value::Property(
                    Property::with_getter(|_| Ok(Value::from(7)))
                        .setter(|cx, v| cx.set_attr("value", v)),
                ),
            );
        })
        .unwrap()
}

fn bench_reads(c: &mut Criterion) {
    let registry = Registry::new();
    let entry = loaded_entry(&registry);

    let mut group = c.benchmark_group("attr/read");

    group.bench_function("plain", |b| {
        b.iter(|| black_box(entry.get(black_box("plain")).unwrap()))
    });

    group.bench_function("computed", |b| {
        b.iter(|| black_box(entry.get(black_box("computed")).unwrap()))
    });

    group.bench_function("registry_lookup_then_read", |b| {
        b.iter(|| {
            let entry = registry.lookup(black_box("bench")).unwrap();
            black_box(entry.get("plain").unwrap())
        })
    });

    group.finish();
}

fn bench_writes(c: &mut Criterion) {
    let registry = Registry::new();
    let entry = loaded_entry(&registry);

    let mut group = c.benchmark_group("attr/write");

    group.bench_function("plain", |b| {
        b.iter(|| entry.set(black_box("plain"), Value::from(9)).unwrap())
    });

    group.bench_function("through_setter", |b| {
        b.iter(|| entry.set(black_box("computed"), Value::from(9)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_reads, bench_writes);
criterion_main!(benches);
