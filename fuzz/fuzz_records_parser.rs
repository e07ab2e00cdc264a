//! Fuzz target for the record store JSON parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_records_parser
//!
//! Feeds arbitrary byte sequences to `RecordStore::from_json_str()` and, when
//! a store parses, runs an unconstrained search over it to exercise the
//! filter engine's scan path.

#![no_main]

use libfuzzer_sys::fuzz_target;

use contentd_core::search::{search, SearchFilter};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(store) = contentd_core::record::RecordStore::from_json_str(s) {
            let _ = search(&store, &SearchFilter::all());
        }
    }
});
