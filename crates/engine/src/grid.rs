//! Rectangular grid of string cells.
//!
//! Invariants:
//! - every row has the same width (ragged input is padded on construction)
//! - structural edits validate first and mutate second, so a partially
//!   widened or narrowed grid is never observable
//! - a non-empty grid never becomes empty through editing

use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// One row of cells. An empty string is a real value, not a missing cell.
pub type Row = Vec<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Row>", into = "Vec<Row>")]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid, padding short rows with empty cells up to the widest row.
    pub fn from_rows(mut rows: Vec<Row>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells per row. Zero for an empty grid.
    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Independent owned copy. Edits to the copy never reach `self`.
    pub fn snapshot(&self) -> Grid {
        self.clone()
    }

    /// Replace one cell. The grid never grows to fit.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> Result<(), EditError> {
        let (rows, cols) = (self.row_count(), self.width());
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(EditError::CellOutOfBounds { row, col, rows, cols })?;
        *cell = value.into();
        Ok(())
    }

    /// Append a row of empty cells sized to the current width.
    pub fn insert_row(&mut self) -> Result<(), EditError> {
        if self.rows.is_empty() {
            return Err(EditError::EmptyGrid);
        }
        let width = self.width();
        self.rows.push(vec![String::new(); width]);
        Ok(())
    }

    /// Remove the row at `index`.
    ///
    /// Returns `Ok(false)` without touching the grid when it is the last row.
    pub fn delete_row(&mut self, index: usize) -> Result<bool, EditError> {
        let rows = self.row_count();
        if index >= rows {
            return Err(EditError::RowOutOfBounds { index, rows });
        }
        if rows == 1 {
            return Ok(false);
        }
        self.rows.remove(index);
        Ok(true)
    }

    /// Append one empty cell to every row.
    pub fn insert_column(&mut self) {
        for row in &mut self.rows {
            row.push(String::new());
        }
    }

    /// Remove the cell at `index` from every row.
    ///
    /// Returns `Ok(false)` without touching the grid when it is the last column.
    pub fn delete_column(&mut self, index: usize) -> Result<bool, EditError> {
        let cols = self.width();
        if index >= cols {
            return Err(EditError::ColumnOutOfBounds { index, cols });
        }
        if cols == 1 {
            return Ok(false);
        }
        for row in &mut self.rows {
            row.remove(index);
        }
        Ok(true)
    }
}

impl From<Vec<Row>> for Grid {
    fn from(rows: Vec<Row>) -> Self {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Row> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

#[cfg(test)]
pub(crate) fn grid_of(rows: &[&[&str]]) -> Grid {
    Grid::from_rows(
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_rows_pads_ragged_input() {
        let grid = Grid::from_rows(vec![
            vec!["a".into(), "b".into(), "c".into()],
            vec!["1".into()],
            vec![],
        ]);
        assert_eq!(grid.width(), 3);
        assert!(grid.rows().iter().all(|r| r.len() == 3));
        assert_eq!(grid.cell(1, 0), Some("1"));
        assert_eq!(grid.cell(1, 2), Some(""));
        assert_eq!(grid.cell(2, 1), Some(""));
    }

    #[test]
    fn test_set_cell_in_bounds() {
        let mut grid = grid_of(&[&["a", "b"], &["c", "d"]]);
        grid.set_cell(1, 0, "x").unwrap();
        assert_eq!(grid.cell(1, 0), Some("x"));
    }

    #[test]
    fn test_set_cell_out_of_bounds_never_grows() {
        let mut grid = grid_of(&[&["a", "b"]]);
        let err = grid.set_cell(0, 2, "x").unwrap_err();
        assert_eq!(err, EditError::CellOutOfBounds { row: 0, col: 2, rows: 1, cols: 2 });
        assert!(grid.set_cell(1, 0, "x").unwrap_err().is_out_of_bounds());
        assert_eq!(grid, grid_of(&[&["a", "b"]]));
    }

    #[test]
    fn test_insert_row_uses_current_width() {
        let mut grid = grid_of(&[&["a", "b", "c"]]);
        grid.insert_row().unwrap();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.row(1).unwrap(), &vec![String::new(); 3]);
    }

    #[test]
    fn test_insert_row_on_empty_grid_fails() {
        let mut grid = Grid::new();
        assert_eq!(grid.insert_row(), Err(EditError::EmptyGrid));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_delete_row() {
        let mut grid = grid_of(&[&["a"], &["b"], &["c"]]);
        assert_eq!(grid.delete_row(1), Ok(true));
        assert_eq!(grid, grid_of(&[&["a"], &["c"]]));
        assert_eq!(
            grid.delete_row(5),
            Err(EditError::RowOutOfBounds { index: 5, rows: 2 })
        );
    }

    #[test]
    fn test_delete_last_remaining_row_is_refused() {
        let mut grid = grid_of(&[&["only", "row"]]);
        assert_eq!(grid.delete_row(0), Ok(false));
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn test_delete_column_removes_from_every_row() {
        let mut grid = grid_of(&[&["a", "b", "c"], &["1", "2", "3"]]);
        assert_eq!(grid.delete_column(1), Ok(true));
        assert_eq!(grid, grid_of(&[&["a", "c"], &["1", "3"]]));
    }

    #[test]
    fn test_delete_last_remaining_column_is_refused() {
        let mut grid = grid_of(&[&["a"], &["b"]]);
        assert_eq!(grid.delete_column(0), Ok(false));
        assert_eq!(grid.width(), 1);
        assert_eq!(
            grid.delete_column(3),
            Err(EditError::ColumnOutOfBounds { index: 3, cols: 1 })
        );
    }

    #[test]
    fn test_snapshot_is_independent() {
        let source = grid_of(&[&["a", "b"]]);
        let mut copy = source.snapshot();
        copy.set_cell(0, 0, "changed").unwrap();
        copy.insert_column();
        assert_eq!(source, grid_of(&[&["a", "b"]]));
    }

    #[test]
    fn test_deserialize_pads_rows() {
        let grid: Grid = serde_json::from_str(r#"[["a","b"],["c"]]"#).unwrap();
        assert_eq!(grid.cell(1, 1), Some(""));
        assert_eq!(serde_json::to_string(&grid).unwrap(), r#"[["a","b"],["c",""]]"#);
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
            proptest::collection::vec(
                proptest::collection::vec("[a-z0-9 ]{0,4}", cols),
                rows,
            )
            .prop_map(Grid::from_rows)
        })
    }

    proptest! {
        #[test]
        fn prop_single_row_delete_is_noop(cells in proptest::collection::vec("[a-z]{0,3}", 1..5)) {
            let mut grid = Grid::from_rows(vec![cells]);
            let before = grid.clone();
            prop_assert_eq!(grid.delete_row(0), Ok(false));
            prop_assert_eq!(grid, before);
        }

        #[test]
        fn prop_insert_then_delete_last_column_restores(grid in arb_grid()) {
            let mut edited = grid.clone();
            edited.insert_column();
            prop_assert_eq!(edited.width(), grid.width() + 1);
            let last = edited.width() - 1;
            prop_assert_eq!(edited.delete_column(last), Ok(true));
            prop_assert_eq!(edited, grid);
        }

        #[test]
        fn prop_edits_keep_uniform_width(grid in arb_grid(), ops in proptest::collection::vec(0u8..4, 0..12)) {
            let mut grid = grid;
            for op in ops {
                match op {
                    0 => { grid.insert_row().unwrap(); }
                    1 => { let _ = grid.delete_row(0); }
                    2 => grid.insert_column(),
                    _ => { let _ = grid.delete_column(0); }
                }
                let width = grid.width();
                prop_assert!(grid.row_count() >= 1);
                prop_assert!(grid.rows().iter().all(|r| r.len() == width));
            }
        }
    }
}
