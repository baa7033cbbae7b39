use std::path::PathBuf;

use thiserror::Error;

/// A file that could not be turned into a workbook. No partial grid is
/// produced when one of these is returned.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("failed to read sheet '{name}': {source}")]
    Sheet {
        name: String,
        #[source]
        source: calamine::Error,
    },

    #[error("spreadsheet contains no sheets")]
    NoSheets,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("file has more than {limit} cells")]
    TooLarge { limit: usize },
}

/// Processed rows that could not be serialized.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
