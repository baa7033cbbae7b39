// CSV import and export

use log::warn;

use datashelf_engine::{Grid, Row};

use crate::error::{ExportError, ParseError};

/// How CSV text is split into cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsvMode {
    /// Split lines on `\n` and cells on `,`, trimming each cell. Quotes are
    /// not interpreted, so a quoted comma splits the cell.
    #[default]
    Split,
    /// RFC 4180 reading via the `csv` crate (quoted fields, embedded commas
    /// and newlines). Cells are trimmed the same way.
    Quoted,
}

/// Decode raw bytes as text. Invalid UTF-8 falls back to Windows-1252
/// (common for Excel-exported CSVs). A leading byte-order mark is dropped.
pub fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            warn!("CSV is not valid UTF-8, decoding as Windows-1252");
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

pub fn parse(content: &str, mode: CsvMode) -> Result<Grid, ParseError> {
    match mode {
        CsvMode::Split => Ok(parse_split(content)),
        CsvMode::Quoted => parse_quoted(content),
    }
}

/// Line/comma split. A terminating newline does not add an empty last row.
/// Rows shorter than the widest one are padded with empty cells.
pub fn parse_split(content: &str) -> Grid {
    let mut lines: Vec<&str> = content.split('\n').collect();
    if lines.len() > 1 && lines.last() == Some(&"") {
        lines.pop();
    }

    let rows = lines
        .into_iter()
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect();
    Grid::from_rows(rows)
}

fn parse_quoted(content: &str) -> Result<Grid, ParseError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows: Vec<Row> = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|field| field.trim().to_string()).collect());
    }
    if rows.is_empty() {
        rows.push(vec![String::new()]);
    }
    Ok(Grid::from_rows(rows))
}

/// Serialize rows: cells joined by `,`, rows by `\n`, no trailing newline.
/// Cells are quoted only when needed, so a row whose only cell is empty
/// comes out as `""` rather than a blank line.
pub fn to_csv(rows: &[Row]) -> Result<String, ExportError> {
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .quote_style(::csv::QuoteStyle::Necessary)
        .flexible(true)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
