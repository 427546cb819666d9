#![no_main]

use libfuzzer_sys::fuzz_target;
use strongbox::core::header::resolve;

fuzz_target!(|data: &str| {
    // Resolution must never panic, whatever the input
    if let Ok(config) = resolve(data) {
        assert!(data.len() >= strongbox::core::header::MIN_BLOB_LENGTH);
        let _ = config.min_encoded_length();
    }
});
