//! Benchmarks for breakpoint queries.
//!
//! These benchmarks measure:
//! - Predicate construction from breakpoint definitions
//! - Parsing and evaluating predicates against a width
//! - Viewport resize dispatch with many live queries
//!
//! Run with: cargo bench --bench breakpoints

use std::hint::black_box;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use floem_breakpoints::{BreakpointMap, Breakpoints, MediaQuery, Viewport};
use floem_reactive::{Scope, with_scope};

fn bench_predicates(c: &mut Criterion) {
    let map = BreakpointMap::bootstrap();
    c.bench_function("predicate_all_bootstrap", |b| {
        b.iter(|| {
            for name in map.names() {
                black_box(map.predicate(black_box(name)));
            }
        })
    });

    let query = MediaQuery::new("(min-width: 768px) and (max-width: 991.98px)");
    c.bench_function("evaluate_range", |b| {
        b.iter(|| black_box(query.evaluate_width(black_box(800.0))))
    });
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport_resize");
    for queries in [10, 100, 1000] {
        let viewport = Viewport::new(0.0);
        let breakpoints =
            Breakpoints::with_environment(BreakpointMap::bootstrap(), Rc::new(viewport.clone()));
        let scope = Scope::new();
        for i in 0..queries {
            let name = ["xs", "sm", "md", "lg", "xl", "xxl"][i % 6];
            with_scope(scope, {
                let breakpoints = breakpoints.clone();
                move || {
                    breakpoints.query(name, false);
                }
            });
        }

        group.bench_with_input(BenchmarkId::from_parameter(queries), &queries, |b, _| {
            let mut wide = false;
            b.iter(|| {
                wide = !wide;
                viewport.set_width(if wide { 1300.0 } else { 300.0 });
            })
        });
        scope.dispose();
    }
    group.finish();
}

criterion_group!(benches, bench_predicates, bench_resize);
criterion_main!(benches);
