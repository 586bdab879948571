//! Fuzz target for the full analysis pipeline.
//!
//! Any table the parser accepts must analyze without panicking, and
//! analyzing it twice must give the same result.

#![no_main]

use chartwise::{Chartwise, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 20_000 {
        return;
    }

    let Ok(table) = Parser::new().parse_bytes(data) else {
        return;
    };

    let engine = Chartwise::new();
    let first = engine.analyze_table("fuzz.csv", &table);
    let second = engine.analyze_table("fuzz.csv", &table);
    if let (Ok(a), Ok(b)) = (first, second) {
        assert_eq!(a, b);
        assert_eq!(a.alternatives[0], a.recommended_chart);
    }
});
