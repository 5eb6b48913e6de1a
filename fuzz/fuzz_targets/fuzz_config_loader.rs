#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use phasegate::config::ConfigLoader;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        let loader = ConfigLoader::default();

        // Loading may fail; it must not panic, and anything that validates
        // must also materialize.
        if let Ok(result) = loader.load_str(yaml_str, Path::new("fuzz.yaml")) {
            assert!(result.config.to_store().is_ok());
        }
    }
});
