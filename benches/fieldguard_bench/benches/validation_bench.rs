//! Validation benchmarks
//!
//! Measures wildcard expansion, result projection and full validation in
//! parallel and sequential mode over payloads of growing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fieldguard::prelude::*;
use fieldguard::{expand_rules, project, PathCache, ValidatedPaths};
use serde_json::json;
use std::sync::Arc;

/// Payload with `n` users, each holding a few nested fields
fn payload(n: usize) -> Value {
    let users: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "name": format!("user{}", i),
                "email": format!("user{}@example.com", i),
                "age": 20 + (i % 50),
                "password": "secret",
                "roles": ["reader", "writer"]
            })
        })
        .collect();
    json!({"team": "core", "users": users, "internal": {"flag": true}})
}

fn rules() -> RuleSet {
    RuleSet::new()
        .field("team", vec![rule(RequiredRule::new()), rule(LengthRule::new(2, 50))])
        .field(
            "users.*.name",
            vec![rule(RequiredRule::new()), rule(TypeRule::string())],
        )
        .field(
            "users.*.email",
            vec![rule(RequiredRule::new()), rule(EmailRule::new())],
        )
        .field(
            "users.*.age",
            vec![rule(NullableRule::new()), rule(RangeRule::new(18.0, 120.0))],
        )
        .field("users.*.roles.*", vec![rule(InRule::new(["reader", "writer", "admin"]))])
}

/// Benchmark wildcard expansion
fn bench_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("expansion");
    let rules = rules();

    for size in [10, 100, 1000] {
        let input = payload(size);

        group.bench_with_input(BenchmarkId::new("cached", size), &input, |b, input| {
            let cache = PathCache::new();
            b.iter(|| expand_rules(black_box(&rules), black_box(input), &cache).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("cold_cache", size), &input, |b, input| {
            b.iter(|| {
                let cache = PathCache::new();
                expand_rules(black_box(&rules), black_box(input), &cache).unwrap()
            })
        });
    }

    group.finish();
}

/// Benchmark projection of validated paths
fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");
    let rules = rules();

    for size in [10, 100, 1000] {
        let input = payload(size);
        let expansion = expand_rules(&rules, &input, &PathCache::new()).unwrap();
        let validated = ValidatedPaths {
            fields: expansion.fields.keys().cloned().collect(),
            placeholders: expansion.placeholders.iter().cloned().collect(),
        };

        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| project(black_box(input), black_box(&validated)))
        });
    }

    group.finish();
}

/// Benchmark full validation in both modes
fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let rules = rules();
    let parallel = Validator::new().cache(Arc::new(PathCache::new()));
    let sequential = Validator::new()
        .parallel(false)
        .cache(Arc::new(PathCache::new()));

    for size in [10, 100, 1000] {
        let input = payload(size);

        group.bench_with_input(BenchmarkId::new("parallel", size), &input, |b, input| {
            b.iter(|| {
                runtime
                    .block_on(parallel.validate(black_box(input), &rules))
                    .unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("sequential", size), &input, |b, input| {
            b.iter(|| {
                runtime
                    .block_on(sequential.validate(black_box(input), &rules))
                    .unwrap()
            })
        });
    }

    // Failing payload: sequential mode stops at the first missing required field
    let mut failing = payload(1000);
    failing["team"] = Value::Null;

    group.bench_function("parallel_failing", |b| {
        b.iter(|| runtime.block_on(parallel.validate(black_box(&failing), &rules)).is_err())
    });

    group.bench_function("sequential_failing", |b| {
        b.iter(|| runtime.block_on(sequential.validate(black_box(&failing), &rules)).is_err())
    });

    group.finish();
}

criterion_group!(benches, bench_expansion, bench_projection, bench_validation);
criterion_main!(benches);
