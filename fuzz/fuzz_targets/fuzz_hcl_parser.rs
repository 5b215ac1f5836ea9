//! Fuzz target for Terraform file parsing and block-tree construction.
//!
//! Goal: The parser should **never panic** on any input.
//! It may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_hcl_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Terraform sources must be UTF-8
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = tfguard_repo::fuzz::parse_terraform(text);
    }
});
