//! Fuzz target for cell value parsing and header splitting.

#![no_main]

use arbitrary::Arbitrary;
use chartwise::profile::likert::match_scale;
use chartwise::profile::split_grid_header;
use chartwise::profile::values::{parse_number, parse_temporal};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    cell: String,
    distinct: Vec<String>,
}

fuzz_target!(|input: Input| {
    if let Some(n) = parse_number(&input.cell) {
        assert!(n.is_finite());
    }
    let _ = parse_temporal(&input.cell);

    if let Some((stem, item)) = split_grid_header(&input.cell) {
        assert!(!stem.is_empty() && !item.is_empty());
    }

    if input.distinct.len() <= 64 {
        if let Some(found) = match_scale(&input.distinct, 2) {
            assert_eq!(found.order.len(), input.distinct.len());
        }
    }
});
