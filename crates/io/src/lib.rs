// File I/O: parsing uploads into workbooks, serializing processed rows

pub mod csv;
pub mod error;
pub mod rows;
pub mod source;
pub mod xlsx;

pub use error::{ExportError, ParseError};
pub use source::{detect_kind, load_path, parse_bytes, ParseOptions};

/// File name given to the serialized grid when it is submitted.
pub const PROCESSED_FILE_NAME: &str = "processed_dataset.csv";

/// Content type of the serialized grid.
pub const PROCESSED_CONTENT_TYPE: &str = "text/csv";
