//! Fuzz target for the mapper config parser.
//!
//! Feeds arbitrary TOML to the config loader and, when it parses, builds
//! the resource graph it declares.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use mapper_schema::MapperConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Loading and graph construction return errors, never panic
        if let Ok(config) = MapperConfig::from_str(input) {
            let _ = config.resource_graph();
        }
    }
});
