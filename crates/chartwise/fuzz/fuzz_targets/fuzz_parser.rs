//! Fuzz target for the data parser.
//!
//! This fuzzer tests that the CSV/TSV parser:
//! 1. Never panics on malformed input
//! 2. Handles all delimiter combinations
//! 3. Doesn't allocate unbounded memory

#![no_main]

use chartwise::{Parser, ParserConfig};
use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    // Auto-detection straight from memory
    let _ = Parser::new().parse_bytes(data);

    // Each fixed delimiter, through a temp file for the metadata path
    for delimiter in [b',', b'\t', b';', b'|'] {
        let parser = Parser::with_config(ParserConfig {
            delimiter: Some(delimiter),
            ..Default::default()
        });
        let _ = parser.parse_bytes(data);
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let _ = Parser::new().parse_file(temp_file.path());
        }
    }
});
