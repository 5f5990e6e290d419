//! Report generation for scored artifacts
//!
//! Every generator consumes [`ScoreRow`](crate::scoring::ScoreRow) values:
//! - **NDJSON**: One compact JSON object per line, the primary machine-readable output. Rows
//!   can be written one at a time as they are produced.
//! - **CSV**: Spreadsheet-compatible format with per-device size columns and proper escaping
//! - **Console**: Terminal summary with ANSI colors, metrics grouped by `MetricCategory`

mod console;
mod csv;
mod ndjson;

pub use console::generate as generate_console;
pub use csv::generate as generate_csv;
pub use ndjson::{generate as generate_ndjson, write_row as write_ndjson_row};
