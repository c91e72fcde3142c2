//! The session-type specific timing grid.
//!
//! Each session type shows its own column set. A grid owns one row per driver,
//! ordered by an explicit row index derived from the driver's position rather
//! than by arrival order.
//!
//! | Kind     | Timing columns                                          | Cleared by `ClearGridRow`   |
//! |----------|---------------------------------------------------------|-----------------------------|
//! | Practice | LapTime, Gap, Laps, Unknown, S1-S3                      | all timing columns          |
//! | Qually   | Q1-Q3, Laps, S1-S3                                      | Q1-Q3, S1-S3                |
//! | Race     | Gap, Interval, LapTime, PitCount, PitLap1-3, S1-S3      | all timing columns          |
//!
//! Position, CarNumber and DriverName are present in every grid and are never
//! cleared. The grid for [`SessionType::None`] ignores every update.

use serde::Serialize;
use std::cmp::Ordering;
use tracing::trace;

use super::sortable::SortableRows;
use crate::types::{GridColumn, GridColumnColour, SessionType};
use crate::{Result, TimingError};

use GridColumn::*;

const IDENTITY: [GridColumn; 3] = [Position, CarNumber, DriverName];

/// Which column set a grid uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum GridKind {
    #[default]
    None,
    Practice,
    Qually,
    Race,
}

impl GridKind {
    pub fn for_session(session_type: SessionType) -> Self {
        match session_type {
            SessionType::None => GridKind::None,
            SessionType::Practice => GridKind::Practice,
            SessionType::Qually => GridKind::Qually,
            SessionType::Race => GridKind::Race,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GridKind::None => "empty",
            GridKind::Practice => "practice",
            GridKind::Qually => "qualifying",
            GridKind::Race => "race",
        }
    }

    /// Timing columns cleared by a row reset.
    fn clearable(self) -> &'static [GridColumn] {
        match self {
            GridKind::None => &[],
            GridKind::Practice => &[S1, S2, S3, LapTime, Gap, Laps, Unknown],
            GridKind::Qually => &[S1, S2, S3, Q1, Q2, Q3],
            GridKind::Race => &[S1, S2, S3, Gap, Interval, LapTime, PitCount, PitLap1, PitLap2, PitLap3],
        }
    }

    /// Timing columns that survive a row reset.
    fn retained(self) -> &'static [GridColumn] {
        match self {
            GridKind::Qually => &[Laps],
            _ => &[],
        }
    }

    /// Every column of this grid, identity columns first.
    pub fn columns(self) -> Vec<GridColumn> {
        if self == GridKind::None {
            return Vec::new();
        }
        IDENTITY.iter().chain(self.clearable()).chain(self.retained()).copied().collect()
    }
}

/// Text and colour of one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub column: GridColumn,
    pub text: Option<String>,
    pub colour: GridColumnColour,
}

impl GridCell {
    fn new(column: GridColumn) -> Self {
        Self { column, text: None, colour: GridColumnColour::Black }
    }

    fn reset(&mut self) {
        self.text = None;
        self.colour = GridColumnColour::Black;
    }
}

/// One driver's row.
#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub driver_id: i32,
    pub row_index: usize,
    cells: Vec<GridCell>,
}

impl GridRow {
    fn new(driver_id: i32, kind: GridKind) -> Self {
        let cells = kind.columns().into_iter().map(GridCell::new).collect();
        Self { driver_id, row_index: 0, cells }
    }

    pub fn cell(&self, column: GridColumn) -> Option<&GridCell> {
        self.cells.iter().find(|cell| cell.column == column)
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    fn cell_mut(&mut self, column: GridColumn) -> Option<&mut GridCell> {
        self.cells.iter_mut().find(|cell| cell.column == column)
    }
}

fn by_row_index(a: &GridRow, b: &GridRow) -> Ordering {
    a.row_index.cmp(&b.row_index)
}

/// Rows of the active grid, kept in row-index order.
#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    kind: GridKind,
    rows: SortableRows<GridRow>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GridKind::None)
    }
}

impl Grid {
    pub fn new(kind: GridKind) -> Self {
        Self { kind, rows: SortableRows::new(by_row_index) }
    }

    pub fn kind(&self) -> GridKind {
        self.kind
    }

    pub fn rows(&self) -> &SortableRows<GridRow> {
        &self.rows
    }

    pub fn row(&self, driver_id: i32) -> Option<&GridRow> {
        self.rows.find(|row| row.driver_id == driver_id)
    }

    /// Moves a driver's row to match a new position. Returns whether the row
    /// index changed.
    pub fn set_position(&mut self, driver_id: i32, position: i32) -> bool {
        if self.kind == GridKind::None {
            return false;
        }
        let index = usize::try_from(position.saturating_sub(1)).unwrap_or(0);
        let row = self.row_mut(driver_id);
        if row.row_index == index {
            return false;
        }
        row.row_index = index;
        let moves = self.rows.sort();
        trace!("Grid row {} moved to {} ({} moves)", driver_id, index, moves.len());
        true
    }

    /// Sets a cell's text and colour. `None` clears the text.
    pub fn set_value(
        &mut self,
        driver_id: i32,
        column: GridColumn,
        colour: GridColumnColour,
        text: Option<&str>,
    ) -> Result<()> {
        if let Some(cell) = self.cell_mut(driver_id, column)? {
            cell.text = text.map(str::to_owned);
            cell.colour = colour;
        }
        Ok(())
    }

    /// Sets a cell's colour, keeping its text.
    pub fn set_colour(
        &mut self,
        driver_id: i32,
        column: GridColumn,
        colour: GridColumnColour,
    ) -> Result<()> {
        if let Some(cell) = self.cell_mut(driver_id, column)? {
            cell.colour = colour;
        }
        Ok(())
    }

    /// Resets the row's timing columns. Identity columns are kept.
    pub fn clear_row(&mut self, driver_id: i32) {
        if self.kind == GridKind::None {
            return;
        }
        let clearable = self.kind.clearable();
        let row = self.row_mut(driver_id);
        for cell in row.cells.iter_mut().filter(|cell| clearable.contains(&cell.column)) {
            cell.reset();
        }
    }

    fn cell_mut(&mut self, driver_id: i32, column: GridColumn) -> Result<Option<&mut GridCell>> {
        if self.kind == GridKind::None {
            return Ok(None);
        }
        let grid = self.kind.name();
        let cell = self.row_mut(driver_id).cell_mut(column);
        match cell {
            Some(cell) => Ok(Some(cell)),
            None => Err(TimingError::UnsupportedColumn { column, grid }),
        }
    }

    fn row_mut(&mut self, driver_id: i32) -> &mut GridRow {
        let index = match self.rows.position(|row| row.driver_id == driver_id) {
            Some(index) => index,
            None => self.rows.push(GridRow::new(driver_id, self.kind)),
        };
        &mut self.rows[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(grid: &Grid, driver_id: i32, column: GridColumn) -> Option<String> {
        grid.row(driver_id)?.cell(column)?.text.clone()
    }

    fn order(grid: &Grid) -> Vec<i32> {
        grid.rows().iter().map(|row| row.driver_id).collect()
    }

    #[test]
    fn column_sets_differ_by_kind() {
        assert!(GridKind::None.columns().is_empty());
        assert!(GridKind::Race.columns().contains(&PitLap3));
        assert!(!GridKind::Race.columns().contains(&Q1));
        assert!(GridKind::Qually.columns().contains(&Laps));
        assert!(GridKind::Practice.columns().contains(&Unknown));
        assert_eq!(GridKind::Race.columns().len(), 13);
        assert_eq!(GridKind::for_session(SessionType::Qually), GridKind::Qually);
    }

    #[test]
    fn values_and_colours_update_cells() {
        let mut grid = Grid::new(GridKind::Race);
        grid.set_value(4, S1, GridColumnColour::Green, Some("29.1")).expect("race column");
        grid.set_colour(4, S1, GridColumnColour::Magenta).expect("race column");

        let cell = grid.row(4).and_then(|row| row.cell(S1)).cloned().expect("cell");
        assert_eq!(cell.text.as_deref(), Some("29.1"));
        assert_eq!(cell.colour, GridColumnColour::Magenta);
        assert_eq!(grid.row(4).and_then(|row| row.cell(Gap)).map(|c| c.colour), Some(GridColumnColour::Black));
    }

    #[test]
    fn unsupported_columns_are_reported() {
        let mut grid = Grid::new(GridKind::Race);
        let error = grid.set_value(4, Q2, GridColumnColour::White, Some("1:20.0")).expect_err("no Q2");
        assert!(matches!(error, TimingError::UnsupportedColumn { column: Q2, grid: "race" }));
    }

    #[test]
    fn empty_grid_ignores_everything() {
        let mut grid = Grid::default();
        grid.set_value(4, Q2, GridColumnColour::White, Some("x")).expect("ignored");
        grid.clear_row(4);
        assert!(!grid.set_position(4, 2));
        assert!(grid.rows().is_empty());
    }

    #[test]
    fn clearing_keeps_identity_and_retained_columns() {
        let mut grid = Grid::new(GridKind::Qually);
        grid.set_value(9, DriverName, GridColumnColour::White, Some("VER")).expect("column");
        grid.set_value(9, Q1, GridColumnColour::Green, Some("1:21.0")).expect("column");
        grid.set_value(9, Laps, GridColumnColour::White, Some("7")).expect("column");
        grid.set_value(9, S2, GridColumnColour::Yellow, Some("30.2")).expect("column");

        grid.clear_row(9);
        assert_eq!(text(&grid, 9, DriverName).as_deref(), Some("VER"));
        assert_eq!(text(&grid, 9, Laps).as_deref(), Some("7"));
        assert_eq!(text(&grid, 9, Q1), None);
        assert_eq!(grid.row(9).and_then(|row| row.cell(S2)).map(|c| c.colour), Some(GridColumnColour::Black));
    }

    #[test]
    fn positions_drive_row_order() {
        let mut grid = Grid::new(GridKind::Race);
        assert!(grid.set_position(1, 3));
        // A new row already sits at index 0, so position 1 is not a move.
        assert!(!grid.set_position(2, 1));
        assert!(grid.set_position(3, 2));
        assert_eq!(order(&grid), vec![2, 3, 1]);

        assert!(!grid.set_position(3, 2));
        assert!(grid.set_position(1, 1));
        assert_eq!(grid.row(1).map(|row| row.row_index), Some(0));
        assert_eq!(order(&grid), vec![2, 1, 3]);
    }

    #[test]
    fn position_zero_maps_to_the_first_row() {
        let mut grid = Grid::new(GridKind::Practice);
        grid.set_position(5, 4);
        assert!(grid.set_position(5, 0));
        assert_eq!(grid.row(5).map(|row| row.row_index), Some(0));
    }
}
