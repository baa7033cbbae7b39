// Excel import (xlsx, xls, xlsb, ods) from an in-memory buffer

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use log::debug;

use datashelf_engine::{Grid, Row, Workbook};

use crate::error::ParseError;

/// Maximum number of cells across all sheets. The whole file is held in
/// memory, so anything above this is refused outright.
const MAX_CELLS: usize = 5_000_000;

/// Decode a spreadsheet. Every sheet becomes one grid covering the sheet's
/// used range; missing cells are empty strings.
pub fn import_bytes(bytes: Vec<u8>) -> Result<Workbook, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    if sheet_names.is_empty() {
        return Err(ParseError::NoSheets);
    }

    let mut total_cells = 0usize;
    let mut sheets: Vec<(String, Grid)> = Vec::with_capacity(sheet_names.len());

    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| ParseError::Sheet { name: name.clone(), source })?;

        let (height, width) = range.get_size();
        total_cells = total_cells.saturating_add(height.saturating_mul(width));
        if total_cells > MAX_CELLS {
            return Err(ParseError::TooLarge { limit: MAX_CELLS });
        }

        debug!("Sheet '{}': {}x{}", name, height, width);
        sheets.push((name, range_to_grid(&range)));
    }

    Workbook::from_sheets(sheets).ok_or(ParseError::NoSheets)
}

fn range_to_grid(range: &Range<Data>) -> Grid {
    let rows: Vec<Row> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Grid::from_rows(rows)
}

/// Text shown for a cell, the way a spreadsheet displays unformatted values.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        // Date cells carry no display format here; keep the serial number
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}
