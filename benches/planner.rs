//! Benchmarks for selector planning.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use prax_mapper::prelude::*;
use std::hint::black_box;

/// A chain of `depth` models, each with `width` columns, a derived property
/// and a to-many association to the next model.
fn chain_graph(depth: usize) -> ResourceGraph {
    let resources = (0..depth).map(|i| {
        let mut resource = Resource::new(format!("Model{}", i))
            .with_property("label", ["title", "subtitle"]);
        if i + 1 < depth {
            resource = resource
                .with_association("children", Association::to_many(format!("Model{}", i + 1), "parent_id"))
                .with_property("first_child_title", ["children.title"]);
        }
        resource
    });

    ResourceGraph::builder().resources(resources).build().unwrap()
}

fn chain_request(depth: usize, width: usize) -> FieldTree {
    let mut tree = FieldTree::new();
    for level in (0..depth).rev() {
        let mut node = FieldTree::new();
        for column in 0..width {
            node = node.field(format!("column_{}", column));
        }
        node = node.field("label");
        if level + 1 < depth {
            node = node.field("first_child_title").nested("children", tree);
        }
        tree = node;
    }
    tree
}

fn bench_plan_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_chain");

    for depth in [2usize, 8, 32] {
        let graph = chain_graph(depth);
        let request = chain_request(depth, 16);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &request, |b, request| {
            b.iter(|| black_box(plan(&graph, "Model0", request).unwrap()))
        });
    }

    group.finish();
}

fn bench_many_to_many(c: &mut Criterion) {
    let graph = ResourceGraph::builder()
        .resource(
            Resource::new("Post")
                .with_association("taggings", Association::to_many("Tagging", "post_id"))
                .with_association(
                    "tags",
                    Association::many_to_many("Tag", ["taggings", "tag"]).unwrap(),
                ),
        )
        .resource(Resource::new("Tagging").with_association("tag", Association::to_one("Tag", "tag_id")))
        .resource(Resource::new("Tag"))
        .build()
        .unwrap();

    let request = fields! { title, body, tags: { name, slug } };

    c.bench_function("plan_many_to_many", |b| {
        b.iter(|| black_box(plan(&graph, "Post", &request).unwrap()))
    });
}

fn bench_field_parsing(c: &mut Criterion) {
    let json = r#"{"id": true, "name": true, "posts": {"title": true, "tags": {"*": true}}}"#;

    c.bench_function("parse_field_tree", |b| {
        b.iter(|| black_box(FieldTree::parse(black_box(json)).unwrap()))
    });
}

criterion_group!(benches, bench_plan_chain, bench_many_to_many, bench_field_parsing);
criterion_main!(benches);
