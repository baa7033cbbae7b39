use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// What kind of file a workbook was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Csv,
    Spreadsheet,
}

/// A named grid at a fixed position in its workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub index: usize,
    pub grid: Grid,
}

/// Parsed source of truth for an editing session.
///
/// Never mutated after parsing; the session edits snapshots of its grids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    kind: SourceKind,
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// A CSV source: exactly one implicit sheet.
    pub fn from_csv(grid: Grid) -> Self {
        Self {
            kind: SourceKind::Csv,
            sheets: vec![Sheet { name: "csv".to_string(), index: 0, grid }],
        }
    }

    /// A spreadsheet source. Returns None when there are no sheets.
    pub fn from_sheets(sheets: Vec<(String, Grid)>) -> Option<Self> {
        if sheets.is_empty() {
            return None;
        }
        let sheets = sheets
            .into_iter()
            .enumerate()
            .map(|(index, (name, grid))| Sheet { name, index, grid })
            .collect();
        Some(Self { kind: SourceKind::Spreadsheet, sheets })
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Selectable sheet names. Empty for CSV sources, whose single sheet is
    /// implicit and not selectable.
    pub fn sheet_names(&self) -> Vec<&str> {
        match self.kind {
            SourceKind::Csv => Vec::new(),
            SourceKind::Spreadsheet => self.sheets.iter().map(|s| s.name.as_str()).collect(),
        }
    }
}
