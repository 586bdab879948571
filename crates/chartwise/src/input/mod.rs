//! Input parsing and data source handling.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{CellValue, DataTable, Record, SourceMetadata, sanitize_filename};
