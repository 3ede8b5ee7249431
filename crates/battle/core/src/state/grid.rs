//! The 3x5 battle grid.
//!
//! Cells are addressed by linear index `0..15`; `row = index / 5` and
//! `col = index % 5`.

use core::fmt;

use strum::EnumString;

use crate::config::BattleConfig;
use crate::state::CombatantId;

/// A cell on the battle grid. Always in bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell(u8);

impl Cell {
    pub const FIRST: Cell = Cell(0);
    pub const LAST: Cell = Cell((BattleConfig::GRID_CELLS - 1) as u8);

    pub fn new(index: usize) -> Option<Self> {
        (index < BattleConfig::GRID_CELLS).then_some(Self(index as u8))
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn row(self) -> usize {
        self.index() / BattleConfig::GRID_WIDTH
    }

    pub const fn col(self) -> usize {
        self.index() % BattleConfig::GRID_WIDTH
    }

    /// Chebyshev distance: the larger of the row and column deltas.
    pub fn distance(self, other: Cell) -> u32 {
        let rows = self.row().abs_diff(other.row());
        let cols = self.col().abs_diff(other.col());
        rows.max(cols) as u32
    }

    /// One orthogonal step. `None` when the step leaves the grid or wraps
    /// across a row boundary.
    pub fn step(self, direction: Direction) -> Option<Cell> {
        let index = self.index();
        let width = BattleConfig::GRID_WIDTH;
        let next = match direction {
            Direction::Up => index.checked_sub(width)?,
            Direction::Down => index + width,
            Direction::Left => {
                if self.col() == 0 {
                    return None;
                }
                index - 1
            }
            Direction::Right => {
                if self.col() == width - 1 {
                    return None;
                }
                index + 1
            }
        };
        Cell::new(next)
    }

    pub fn all() -> impl Iterator<Item = Cell> {
        (0..BattleConfig::GRID_CELLS).map(|i| Cell(i as u8))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Orthogonal move direction, parsed from `w`/`a`/`s`/`d` (or the full name).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[strum(serialize = "w", serialize = "up")]
    Up,
    #[strum(serialize = "s", serialize = "down")]
    Down,
    #[strum(serialize = "a", serialize = "left")]
    Left,
    #[strum(serialize = "d", serialize = "right")]
    Right,
}

/// Cell occupancy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    cells: [Option<CombatantId>; BattleConfig::GRID_CELLS],
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupant(&self, cell: Cell) -> Option<CombatantId> {
        self.cells[cell.index()]
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        self.occupant(cell).is_none()
    }

    /// Places `id` on an empty cell. Returns false if the cell is taken.
    pub fn place(&mut self, cell: Cell, id: CombatantId) -> bool {
        if !self.is_free(cell) {
            return false;
        }
        self.cells[cell.index()] = Some(id);
        true
    }

    /// Moves whoever stands on `from` to the empty cell `to`.
    pub fn relocate(&mut self, from: Cell, to: Cell) -> bool {
        if from == to || !self.is_free(to) {
            return false;
        }
        match self.cells[from.index()].take() {
            Some(id) => {
                self.cells[to.index()] = Some(id);
                true
            }
            None => false,
        }
    }

    pub fn free_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        Cell::all().filter(|cell| self.is_free(*cell))
    }
}
