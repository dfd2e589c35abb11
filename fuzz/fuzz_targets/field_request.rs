//! Fuzz target for field request parsing and planning.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_field_request
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use mapper_query::{FieldTree, plan};
use mapper_schema::{Association, Resource, ResourceGraph};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(fields) = FieldTree::parse(input) else {
        return;
    };

    let Ok(graph) = ResourceGraph::builder()
        .resource(
            Resource::new("User")
                .with_property("display_name", ["profile_picture"])
                .with_association("posts", Association::to_many("Post", "user_id")),
        )
        .resource(
            Resource::new("Post")
                .with_property("teaser", ["author.display_name"])
                .with_association("author", Association::to_one("User", "user_id")),
        )
        .build()
    else {
        return;
    };

    let _ = plan(&graph, "User", &fields);
});
