//! Fuzz target for provider schema JSON decoding.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_provider_schema
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = tfguard_repo::fuzz::parse_schema(text);
    }
});
