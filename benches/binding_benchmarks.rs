//! Binding Assembly Benchmarks
//!
//! Measures the cost of turning one request into bindings and filters,
//! including principal resolution against directories of different sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kafka_acl::security::acl::{
    build_query_filter, parse_operations, AclOperation, BindingAssembler, BindingRequest, QueryRequest,
    ResourceSelector,
};
use kafka_acl::security::auth::{DirectoryEntry, DirectorySnapshot, PrincipalResolver};
use std::time::Duration;

fn snapshot(size: i32) -> DirectorySnapshot {
    DirectorySnapshot::from_entries((0..size).map(|id| DirectoryEntry::new(id, format!("sa-{}", id))))
}

fn all_operations() -> String {
    AclOperation::valid_tokens().join(",")
}

fn parse_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("operation_parsing");
    let operations = vec![all_operations()];

    group.throughput(Throughput::Elements(AclOperation::CONCRETE.len() as u64));
    group.bench_function("all_operations", |b| {
        b.iter(|| parse_operations(black_box(&operations)))
    });

    group.finish();
}

fn assembly_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("binding_assembly");
    group.measurement_time(Duration::from_secs(5));

    for size in [10, 1_000, 100_000].iter() {
        let snapshot = snapshot(*size);
        let assembler = BindingAssembler::new(PrincipalResolver::new(&snapshot));
        let request = BindingRequest {
            resource: ResourceSelector::topic("orders").with_prefix(true),
            allow: true,
            service_account: Some(format!("sa-{}", size / 2)),
            operations: vec![all_operations()],
            ..BindingRequest::default()
        };

        group.bench_with_input(BenchmarkId::new("directory_size", size), &request, |b, request| {
            b.iter(|| assembler.bindings(black_box(request)))
        });
    }

    group.finish();
}

fn filter_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_building");
    let snapshot = snapshot(1_000);
    let resolver = PrincipalResolver::new(&snapshot);
    let assembler = BindingAssembler::new(resolver);

    let query = QueryRequest {
        resource: ResourceSelector::topic("*"),
        principal: Some("User:sa-500".to_string()),
        operation: Some("describe".to_string()),
        ..QueryRequest::default()
    };
    group.bench_function("list_filter", |b| {
        b.iter(|| build_query_filter(black_box(&query), &resolver))
    });

    let delete = BindingRequest {
        resource: ResourceSelector::cluster(),
        deny: true,
        service_account: Some("sa-1".to_string()),
        operations: vec!["alter,alter-configs".to_string()],
        ..BindingRequest::default()
    };
    group.bench_function("delete_filters", |b| {
        b.iter(|| assembler.delete_filters(black_box(&delete)))
    });

    group.finish();
}

criterion_group!(
    binding_benchmarks,
    parse_benchmarks,
    assembly_benchmarks,
    filter_benchmarks
);
criterion_main!(binding_benchmarks);
