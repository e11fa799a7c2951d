//! Benchmarks for trellis-graph using criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trellis_graph::{Graph, Tree};

fn ring(size: usize) -> Graph {
    let graph = Graph::new(true);
    for _ in 0..size {
        graph.add_node().unwrap();
    }
    for i in 0..size {
        graph.add_edge(i, (i + 1) % size).unwrap();
        graph.add_edge(i, (i * 7 + 3) % size).unwrap();
    }
    graph
}

fn add_edge_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_add_edge");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(ring(size)));
        });
    }

    group.finish();
}

fn hub_degree_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_hub_edges");

    // A single node accumulating many out-links exercises link array growth
    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let graph = Graph::new(true);
                let hub = graph.add_node().unwrap();
                for _ in 0..size {
                    let leaf = graph.add_node().unwrap();
                    graph.add_edge(hub, leaf).unwrap();
                }
                black_box(graph.out_degree(hub).unwrap())
            });
        });
    }

    group.finish();
}

fn remove_edge_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_remove_edge");

    for size in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let graph = ring(size);
                for edge in graph.edges().into_iter().rev() {
                    graph.remove_edge(edge).unwrap();
                }
                black_box(graph.edge_count())
            });
        });
    }

    group.finish();
}

fn spanning_tree_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("spanning_tree");

    for size in [100, 1000, 10000].iter() {
        let graph = ring(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                graph.clear_spanning_tree();
                black_box(graph.spanning_tree().unwrap().edge_count())
            });
        });
    }

    group.finish();
}

fn tree_navigation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_depth");

    for size in [100, 1000].iter() {
        let tree = Tree::new();
        let root = tree.add_root().unwrap();
        for i in 0..*size {
            tree.add_child(root + i / 4).unwrap();
        }
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let total: usize = tree.nodes().into_iter().map(|n| tree.depth(n).unwrap()).sum();
                black_box(total)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    add_edge_benchmark,
    hub_degree_benchmark,
    remove_edge_benchmark,
    spanning_tree_benchmark,
    tree_navigation_benchmark,
);
criterion_main!(benches);
