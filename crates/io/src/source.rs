// Picking a decoder for an uploaded file

use std::path::Path;

use log::debug;

use datashelf_engine::{SourceKind, Workbook};

use crate::csv::{self, CsvMode};
use crate::error::ParseError;
use crate::xlsx;

/// Extensions decoded as spreadsheets. Everything else is read as CSV text.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "xlsb", "ods"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub csv_mode: CsvMode,
}

/// Decide how to decode a file from its name (case-insensitive extension).
pub fn detect_kind(file_name: &str) -> SourceKind {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext {
        Some(ext) if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) => SourceKind::Spreadsheet,
        _ => SourceKind::Csv,
    }
}

/// Parse an in-memory file of a declared kind.
pub fn parse_bytes(bytes: Vec<u8>, kind: SourceKind, options: &ParseOptions) -> Result<Workbook, ParseError> {
    debug!("Parsing {} bytes as {:?}", bytes.len(), kind);
    match kind {
        SourceKind::Csv => {
            let text = csv::decode_text(bytes);
            let grid = csv::parse(&text, options.csv_mode)?;
            Ok(Workbook::from_csv(grid))
        }
        SourceKind::Spreadsheet => xlsx::import_bytes(bytes),
    }
}

/// Read and parse a file, choosing the decoder from its extension.
pub fn load_path(path: &Path, options: &ParseOptions) -> Result<Workbook, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    parse_bytes(bytes, detect_kind(name), options)
}
