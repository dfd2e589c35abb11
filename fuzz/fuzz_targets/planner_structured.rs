//! Structured fuzz target for the planner.
//!
//! Generates arbitrary resource graphs, including cyclic dependency webs
//! and through paths, and checks that planning terminates with either a
//! plan or an error.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_planner_structured
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mapper_query::{FieldRequest, FieldTree, SelectorGenerator};
use mapper_schema::{Association, Resource, ResourceGraph};

const MODELS: [&str; 3] = ["A", "B", "C"];
const NAMES: [&str; 6] = ["x", "y", "z", "next", "many", "*"];

#[derive(Debug, Arbitrary)]
enum FuzzAssociation {
    ToOne { target: u8, name: u8 },
    ToMany { target: u8, name: u8 },
    Through { target: u8, name: u8, steps: Vec<u8> },
}

#[derive(Debug, Arbitrary)]
struct FuzzModel {
    properties: Vec<(u8, Vec<(u8, Option<u8>)>)>,
    associations: Vec<FuzzAssociation>,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    models: [FuzzModel; 3],
    request: Vec<(u8, Option<Vec<u8>>)>,
    max_depth: u8,
}

fn model(index: u8) -> &'static str {
    MODELS[index as usize % MODELS.len()]
}

fn name(index: u8) -> &'static str {
    NAMES[index as usize % NAMES.len()]
}

fn build(input: &FuzzInput) -> Option<ResourceGraph> {
    let resources = input.models.iter().enumerate().map(|(i, fuzz)| {
        let mut resource = Resource::new(MODELS[i]);
        for (property, deps) in &fuzz.properties {
            let deps: Vec<String> = deps
                .iter()
                .map(|(head, tail)| match tail {
                    Some(tail) => format!("{}.{}", name(*head), name(*tail)),
                    None => name(*head).to_string(),
                })
                .collect();
            resource = resource.with_property(name(*property), deps);
        }
        for association in &fuzz.associations {
            resource = match association {
                FuzzAssociation::ToOne { target, name: n } => resource
                    .with_association(name(*n), Association::to_one(model(*target), "fk")),
                FuzzAssociation::ToMany { target, name: n } => resource
                    .with_association(name(*n), Association::to_many(model(*target), "fk")),
                FuzzAssociation::Through { target, name: n, steps } => {
                    match Association::many_to_many(model(*target), steps.iter().map(|s| name(*s))) {
                        Some(association) => resource.with_association(name(*n), association),
                        None => resource,
                    }
                }
            };
        }
        resource
    });

    ResourceGraph::builder().resources(resources).build().ok()
}

fuzz_target!(|input: FuzzInput| {
    let Some(graph) = build(&input) else {
        return;
    };

    let mut request = FieldTree::new();
    for (field, nested) in &input.request {
        let sub = match nested {
            None => FieldRequest::Leaf,
            Some(names) => FieldRequest::Nested(
                names.iter().fold(FieldTree::new(), |tree, n| tree.field(name(*n))),
            ),
        };
        request.insert(name(*field), sub);
    }

    let mut generator = SelectorGenerator::new(&graph).with_max_depth(input.max_depth as usize);
    if generator.add_model("A", &request).is_ok() {
        let plan = generator.finish();
        for (_, entry) in plan.iter() {
            assert!(!entry.is_empty());
        }
    }
});
