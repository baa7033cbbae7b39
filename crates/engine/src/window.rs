//! Skip-rows / skip-footer window over a grid.
//!
//! The window is a view: it slices the grid and never mutates it. Out-of-range
//! skips are clamped so a non-empty grid always yields at least one row; footer
//! skipping gives way first.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::grid::Row;

/// Rows shown at each end of a preview before the middle is elided.
pub const DEFAULT_PREVIEW_EDGE: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Rows dropped from the top.
    pub skip_rows: usize,
    /// Rows dropped from the bottom.
    pub skip_footer: usize,
}

impl Window {
    pub fn new(skip_rows: usize, skip_footer: usize) -> Self {
        Self { skip_rows, skip_footer }
    }

    /// Row range kept out of `total` rows. Empty only when `total` is zero.
    pub fn range(&self, total: usize) -> Range<usize> {
        if total == 0 {
            return 0..0;
        }
        let start = self.skip_rows.min(total - 1);
        let end = total.saturating_sub(self.skip_footer).max(start + 1);
        start..end
    }

    /// The processed rows.
    pub fn apply<'a>(&self, rows: &'a [Row]) -> &'a [Row] {
        &rows[self.range(rows.len())]
    }

    /// Display rows for the processed window. Each data row carries its index
    /// in the full grid so edits made from a preview hit the right row.
    ///
    /// More than `2 * edge` processed rows are shown as the first `edge`, an
    /// ellipsis, and the last `edge`. An `edge` of 0 shows every row.
    pub fn preview<'a>(&self, rows: &'a [Row], edge: usize) -> Vec<PreviewRow<'a>> {
        let range = self.range(rows.len());
        let offset = range.start;
        let processed = &rows[range];
        let data = |i: usize| PreviewRow::Data {
            index: offset + i,
            cells: processed[i].as_slice(),
        };

        if edge == 0 || processed.len() <= edge.saturating_mul(2) {
            return (0..processed.len()).map(data).collect();
        }

        let tail_start = processed.len() - edge;
        let mut out: Vec<PreviewRow<'a>> = (0..edge).map(data).collect();
        out.push(PreviewRow::Ellipsis { omitted: tail_start - edge });
        out.extend((tail_start..processed.len()).map(data));
        out
    }
}

/// One line of a grid preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewRow<'a> {
    Data { index: usize, cells: &'a [String] },
    Ellipsis { omitted: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{grid_of, Grid};
    use proptest::prelude::*;

    #[test]
    fn test_skip_rows_scenario() {
        let grid = grid_of(&[&["h1", "h2"], &["1", "2"], &["3", "4"]]);
        let out = Window::new(1, 0).apply(grid.rows());
        assert_eq!(out, grid_of(&[&["1", "2"], &["3", "4"]]).rows());
    }

    #[test]
    fn test_skip_footer() {
        let grid = grid_of(&[&["h"], &["1"], &["2"], &["total"]]);
        let out = Window::new(1, 1).apply(grid.rows());
        assert_eq!(out, grid_of(&[&["1"], &["2"]]).rows());
    }

    #[test]
    fn test_footer_gives_way_before_grid_empties() {
        let grid = grid_of(&[&["a"], &["b"], &["c"]]);
        assert_eq!(Window::new(1, 10).range(3), 1..2);
        assert_eq!(Window::new(1, 10).apply(grid.rows()), grid_of(&[&["b"]]).rows());
    }

    #[test]
    fn test_skip_rows_past_end_keeps_last_row() {
        let grid = grid_of(&[&["a"], &["b"], &["c"]]);
        assert_eq!(Window::new(7, 0).apply(grid.rows()), grid_of(&[&["c"]]).rows());
    }

    #[test]
    fn test_empty_grid_stays_empty() {
        let grid = Grid::new();
        assert_eq!(Window::new(2, 2).range(0), 0..0);
        assert!(Window::default().apply(grid.rows()).is_empty());
    }

    #[test]
    fn test_preview_small_window_shows_everything() {
        let grid = grid_of(&[&["h"], &["1"], &["2"]]);
        let preview = Window::new(1, 0).preview(grid.rows(), DEFAULT_PREVIEW_EDGE);
        assert_eq!(preview.len(), 2);
        assert_eq!(preview[0], PreviewRow::Data { index: 1, cells: &["1".to_string()] });
    }

    #[test]
    fn test_preview_elides_middle() {
        let rows: Vec<Row> = (0..50).map(|i| vec![i.to_string()]).collect();
        let grid = Grid::from_rows(rows);
        let preview = Window::new(2, 0).preview(grid.rows(), 3);

        assert_eq!(preview.len(), 7);
        assert!(matches!(preview[0], PreviewRow::Data { index: 2, .. }));
        assert_eq!(preview[3], PreviewRow::Ellipsis { omitted: 42 });
        match &preview[6] {
            PreviewRow::Data { index, cells } => {
                assert_eq!(*index, 49);
                assert_eq!(cells[0], "49");
            }
            other => panic!("expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_zero_edge_shows_everything() {
        let grid = grid_of(&[&["a"], &["b"]]);
        let preview = Window::default().preview(grid.rows(), 0);
        assert_eq!(
            preview,
            vec![
                PreviewRow::Data { index: 0, cells: &["a".to_string()] },
                PreviewRow::Data { index: 1, cells: &["b".to_string()] },
            ]
        );
    }

    #[test]
    fn test_preview_huge_edge_does_not_overflow() {
        let grid = grid_of(&[&["a"], &["b"], &["c"]]);
        let preview = Window::default().preview(grid.rows(), usize::MAX);
        assert_eq!(preview.len(), 3);
        assert!(preview.iter().all(|row| matches!(row, PreviewRow::Data { .. })));
    }

    proptest! {
        #[test]
        fn prop_window_never_empties(total in 1usize..40, skip_rows in 0usize..60, skip_footer in 0usize..60) {
            let range = Window::new(skip_rows, skip_footer).range(total);
            prop_assert!(range.start < range.end);
            prop_assert!(range.end <= total);
        }

        #[test]
        fn prop_skip_past_end_yields_one_row(total in 1usize..40, extra in 0usize..10, skip_footer in 0usize..60) {
            let range = Window::new(total + extra, skip_footer).range(total);
            prop_assert_eq!(range.len(), 1);
        }
    }
}
