//! CSV reading and writing.

mod reader;
mod writer;

pub use reader::{read_csv_frame, read_csv_headers, require_columns};
pub use writer::{StagedOutput, write_indexed_csv};
