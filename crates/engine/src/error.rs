use thiserror::Error;

/// Rejected edit, window or sheet operation. State is unchanged when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Nothing has been loaded yet, or a load is still pending.
    #[error("no file loaded")]
    NoFileLoaded,

    #[error("cell ({row}, {col}) is out of bounds for a {rows}x{cols} grid")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("row {index} is out of bounds ({rows} rows)")]
    RowOutOfBounds { index: usize, rows: usize },

    #[error("column {index} is out of bounds ({cols} columns)")]
    ColumnOutOfBounds { index: usize, cols: usize },

    /// The grid has no rows, so there is no width to size a new row by.
    #[error("grid has no rows")]
    EmptyGrid,

    #[error("invalid sheet index {index} ({count} sheets available)")]
    InvalidSheetIndex { index: usize, count: usize },
}

impl EditError {
    /// True for the out-of-bounds family (cell, row, column).
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            EditError::CellOutOfBounds { .. }
                | EditError::RowOutOfBounds { .. }
                | EditError::ColumnOutOfBounds { .. }
        )
    }
}
