//! Static board topology and the path-to-grid mapping used for rendering.
//!
//! The rules engine only ever looks at [`Position`] values. The grid here
//! exists so that renderers can place pieces, and [`grid_position`] is the
//! single mapping between the two representations.

use super::types::{Color, LAST_PATH_INDEX, PIECES_PER_PLAYER, Position};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use strum::IntoEnumIterator;
use tracing::instrument;

/// Width and height of the board grid.
pub const BOARD_SIZE: u8 = 15;

/// Number of cells on the outer loop of the cross.
const RING_LEN: usize = 52;

/// Path indices past this one run up the home column toward the center.
const RING_PATH_END: u8 = 50;

/// A grid coordinate, `x` is the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct GridPoint {
    /// Column.
    pub x: u8,
    /// Row.
    pub y: u8,
}

/// What a board cell is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Part of the track or an unused border cell.
    Path,
    /// The inert 3x3 center block.
    Center,
    /// Inside a color's home quadrant.
    Home,
    /// A color's entry square.
    Start,
}

/// A single cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct BoardCell {
    /// Row-major index, `y * 15 + x`.
    id: u16,
    /// Column.
    x: u8,
    /// Row.
    y: u8,
    /// Cell tag.
    #[serde(rename = "type")]
    kind: CellKind,
    /// Owning color for home and start cells.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    color: Option<Color>,
}

/// The 15x15 cross-shaped board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: Vec<BoardCell>,
}

static BOARD: LazyLock<Arc<Board>> = LazyLock::new(|| Arc::new(Board::build()));

impl Board {
    /// Returns the shared board, built on first use.
    pub fn shared() -> Arc<Board> {
        Arc::clone(&BOARD)
    }

    /// Builds the board topology.
    #[instrument]
    pub fn build() -> Self {
        let mut cells = Vec::with_capacity(usize::from(BOARD_SIZE) * usize::from(BOARD_SIZE));
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                cells.push(BoardCell {
                    id: u16::from(y) * u16::from(BOARD_SIZE) + u16::from(x),
                    x,
                    y,
                    kind: CellKind::Path,
                    color: None,
                });
            }
        }
        let mut board = Self { cells };

        let center = BOARD_SIZE / 2;
        for y in center - 1..=center + 1 {
            for x in center - 1..=center + 1 {
                board.tag(x, y, CellKind::Center, None);
            }
        }

        // Each quadrant is 6x6; only its 4x4 interior is home.
        for color in Color::iter() {
            let origin = quadrant_origin(color);
            for y in origin.y + 1..=origin.y + 4 {
                for x in origin.x + 1..=origin.x + 4 {
                    board.tag(x, y, CellKind::Home, Some(color));
                }
            }
            let start = start_square(color);
            board.tag(start.x, start.y, CellKind::Start, Some(color));
        }

        board
    }

    fn tag(&mut self, x: u8, y: u8, kind: CellKind, color: Option<Color>) {
        let index = usize::from(y) * usize::from(BOARD_SIZE) + usize::from(x);
        if let Some(cell) = self.cells.get_mut(index) {
            cell.kind = kind;
            cell.color = color;
        }
    }

    /// Returns the cell at a coordinate.
    pub fn cell(&self, point: GridPoint) -> Option<&BoardCell> {
        if point.x >= BOARD_SIZE || point.y >= BOARD_SIZE {
            return None;
        }
        self.cells
            .get(usize::from(point.y) * usize::from(BOARD_SIZE) + usize::from(point.x))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[BoardCell] {
        &self.cells
    }
}

/// Top-left corner of a color's 6x6 quadrant.
pub fn quadrant_origin(color: Color) -> GridPoint {
    match color {
        Color::Red => GridPoint::new(0, 0),
        Color::Green => GridPoint::new(9, 0),
        Color::Yellow => GridPoint::new(0, 9),
        Color::Blue => GridPoint::new(9, 9),
    }
}

/// A color's entry square, next to its quadrant's exit.
pub fn start_square(color: Color) -> GridPoint {
    match color {
        Color::Red => GridPoint::new(1, 6),
        Color::Green => GridPoint::new(8, 1),
        Color::Yellow => GridPoint::new(6, 13),
        Color::Blue => GridPoint::new(13, 8),
    }
}

/// Where finished pieces of a color are drawn, inside the center block.
pub fn finish_square(color: Color) -> GridPoint {
    match color {
        Color::Red => GridPoint::new(6, 7),
        Color::Green => GridPoint::new(7, 6),
        Color::Yellow => GridPoint::new(7, 8),
        Color::Blue => GridPoint::new(8, 7),
    }
}

static RING: LazyLock<Vec<GridPoint>> = LazyLock::new(build_ring);

/// Walks the outer loop clockwise starting at red's entry square.
fn build_ring() -> Vec<GridPoint> {
    // (start x, start y, dx, dy, length)
    const SEGMENTS: [(i8, i8, i8, i8, i8); 13] = [
        (1, 6, 1, 0, 5),
        (6, 5, 0, -1, 6),
        (7, 0, 0, 0, 1),
        (8, 0, 0, 1, 6),
        (9, 6, 1, 0, 6),
        (14, 7, 0, 0, 1),
        (14, 8, -1, 0, 6),
        (8, 9, 0, 1, 6),
        (7, 14, 0, 0, 1),
        (6, 14, 0, -1, 6),
        (5, 8, -1, 0, 6),
        (0, 7, 0, 0, 1),
        (0, 6, 0, 0, 1),
    ];

    let mut ring = Vec::with_capacity(RING_LEN);
    for (x, y, dx, dy, len) in SEGMENTS {
        for step in 0..len {
            ring.push(GridPoint::new(
                (x + dx * step).unsigned_abs(),
                (y + dy * step).unsigned_abs(),
            ));
        }
    }
    ring
}

/// Maps a piece's logical position to a grid coordinate.
///
/// Home pieces are laid out by their stable index inside the quadrant,
/// path indices 1..=50 follow the outer loop and 51..=55 climb red's home
/// column, which is the single shared route every color travels.
pub fn grid_position(color: Color, piece_index: usize, position: Position) -> GridPoint {
    match position {
        Position::Home => {
            let origin = quadrant_origin(color);
            let slot = (piece_index % PIECES_PER_PLAYER) as u8;
            GridPoint::new(origin.x + 1 + slot % 2, origin.y + 1 + slot / 2)
        }
        Position::Start => start_square(color),
        Position::Finished => finish_square(color),
        Position::Path(index) => {
            let n = index.get();
            if n <= RING_PATH_END {
                RING[usize::from(n)]
            } else {
                // 51..=55 -> (1,7)..=(5,7)
                debug_assert!(n <= LAST_PATH_INDEX);
                GridPoint::new(n - RING_PATH_END, 7)
            }
        }
    }
}
