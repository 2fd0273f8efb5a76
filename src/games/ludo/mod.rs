//! Four-player Ludo: board topology, pieces, and rules.

mod action;
mod board;
mod error;
mod player;
pub mod rules;
mod types;

pub use action::{Action, ActionRequest};
pub use board::{
    BOARD_SIZE, Board, BoardCell, CellKind, GridPoint, finish_square, grid_position,
    quadrant_origin, start_square,
};
pub use error::LudoError;
pub use player::{Piece, PieceId, Player, PlayerId, create_player};
pub use types::{
    Color, DieValue, FINISH_LINE, GameStatus, LAST_PATH_INDEX, MAX_PLAYERS, MIN_PLAYERS,
    PIECES_PER_PLAYER, PathIndex, Position, RELEASE_ROLL,
};
