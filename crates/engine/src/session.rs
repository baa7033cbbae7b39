//! The editing session: one aggregate for everything the upload flow mutates.
//!
//! A session owns the parsed workbook (never edited), the working grid (a
//! snapshot of the active sheet) and the window. Every edit, sheet switch and
//! window change goes through here, so the grid invariants are checked in one
//! place.
//!
//! Loading is split in two so a slow read can be superseded: `begin_load`
//! discards the current state and hands out a ticket, `finish_load` installs
//! the result only if that ticket is still the latest one.

use log::{debug, warn};

use crate::error::EditError;
use crate::grid::{Grid, Row};
use crate::window::{PreviewRow, Window};
use crate::workbook::Workbook;

/// Identifies one `begin_load` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone)]
struct Loaded {
    workbook: Workbook,
    active: usize,
    grid: Grid,
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    loaded: Option<Loaded>,
    window: Window,
    generation: u64,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session with `workbook` already installed.
    pub fn with_workbook(workbook: Workbook) -> Self {
        let mut session = Self::new();
        session.load(workbook);
        session
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Start loading a new file. The previous workbook and edits are dropped
    /// immediately; edits fail with `NoFileLoaded` until `finish_load`.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loaded = None;
        self.window = Window::default();
        LoadTicket(self.generation)
    }

    /// Install the outcome of the load identified by `ticket`.
    ///
    /// Returns `Ok(false)` and leaves the session untouched when a newer load
    /// has started since (the result, success or failure, is discarded).
    /// A parse failure for the latest load is returned as-is and leaves the
    /// session empty.
    pub fn finish_load<E>(&mut self, ticket: LoadTicket, result: Result<Workbook, E>) -> Result<bool, E> {
        if ticket.0 != self.generation {
            warn!(
                "Discarding stale load (ticket {}, latest {})",
                ticket.0, self.generation
            );
            return Ok(false);
        }
        let workbook = result?;
        self.install(workbook);
        Ok(true)
    }

    /// Load a workbook synchronously, replacing anything loaded before.
    pub fn load(&mut self, workbook: Workbook) {
        self.begin_load();
        self.install(workbook);
    }

    fn install(&mut self, workbook: Workbook) {
        let grid = workbook.sheet(0).map(|s| s.grid.snapshot()).unwrap_or_default();
        debug!(
            "Loaded {:?} workbook: {} sheet(s), active grid {}x{}",
            workbook.kind(),
            workbook.sheet_count(),
            grid.row_count(),
            grid.width()
        );
        self.loaded = Some(Loaded { workbook, active: 0, grid });
        self.window = Window::default();
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn workbook(&self) -> Option<&Workbook> {
        self.loaded.as_ref().map(|l| &l.workbook)
    }

    /// The working grid being edited.
    pub fn grid(&self) -> Option<&Grid> {
        self.loaded.as_ref().map(|l| &l.grid)
    }

    fn loaded_mut(&mut self) -> Result<&mut Loaded, EditError> {
        self.loaded.as_mut().ok_or(EditError::NoFileLoaded)
    }

    fn grid_mut(&mut self) -> Result<&mut Grid, EditError> {
        Ok(&mut self.loaded_mut()?.grid)
    }

    // ── Sheet selection ─────────────────────────────────────────────

    /// Selectable sheet names (empty for CSV or when nothing is loaded).
    pub fn sheet_names(&self) -> Vec<&str> {
        self.workbook().map(Workbook::sheet_names).unwrap_or_default()
    }

    pub fn active_sheet_index(&self) -> Option<usize> {
        self.loaded.as_ref().map(|l| l.active)
    }

    pub fn active_sheet_name(&self) -> Option<&str> {
        let loaded = self.loaded.as_ref()?;
        loaded.workbook.sheet(loaded.active).map(|s| s.name.as_str())
    }

    /// Switch to another sheet, discarding edits to the current one.
    ///
    /// The new working grid is a fresh snapshot of the parsed sheet and the
    /// window resets to (0, 0).
    pub fn select_sheet(&mut self, index: usize) -> Result<(), EditError> {
        let loaded = self.loaded_mut()?;
        let count = loaded.workbook.sheet_names().len();
        if index >= count {
            return Err(EditError::InvalidSheetIndex { index, count });
        }
        let sheet = loaded
            .workbook
            .sheet(index)
            .ok_or(EditError::InvalidSheetIndex { index, count })?;
        debug!("Switching to sheet {} ({:?})", index, sheet.name);
        loaded.grid = sheet.grid.snapshot();
        loaded.active = index;
        self.window = Window::default();
        Ok(())
    }

    // ── Grid edits ──────────────────────────────────────────────────

    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> Result<(), EditError> {
        self.grid_mut()?.set_cell(row, col, value)
    }

    pub fn insert_row(&mut self) -> Result<(), EditError> {
        self.grid_mut()?.insert_row()
    }

    /// See [`Grid::delete_row`]; `Ok(false)` means the last row was kept.
    pub fn delete_row(&mut self, index: usize) -> Result<bool, EditError> {
        self.grid_mut()?.delete_row(index)
    }

    pub fn insert_column(&mut self) -> Result<(), EditError> {
        self.grid_mut()?.insert_column();
        Ok(())
    }

    /// See [`Grid::delete_column`]; `Ok(false)` means the last column was kept.
    pub fn delete_column(&mut self, index: usize) -> Result<bool, EditError> {
        self.grid_mut()?.delete_column(index)
    }

    // ── Window ──────────────────────────────────────────────────────

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn set_skip_rows(&mut self, skip_rows: usize) {
        self.window.skip_rows = skip_rows;
    }

    pub fn set_skip_footer(&mut self, skip_footer: usize) {
        self.window.skip_footer = skip_footer;
    }

    pub fn set_window(&mut self, window: Window) {
        self.window = window;
    }

    /// Rows of the working grid inside the window. Empty when nothing is loaded.
    pub fn processed(&self) -> &[Row] {
        match self.grid() {
            Some(grid) => self.window.apply(grid.rows()),
            None => &[],
        }
    }

    pub fn preview(&self, edge: usize) -> Vec<PreviewRow<'_>> {
        match self.grid() {
            Some(grid) => self.window.preview(grid.rows(), edge),
            None => Vec::new(),
        }
    }
}
