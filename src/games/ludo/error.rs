//! Error kinds reported by the rules engine and the session layer.

use super::types::{Color, GameStatus};
use derive_more::{Display, Error};

/// A rejected action. Every variant is recoverable and leaves the room
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum LudoError {
    /// Read of a room that was never referenced.
    #[display("Room {} not found", _0)]
    RoomNotFound(#[error(not(source))] String),

    /// Another player already holds the color.
    #[display("Color {} is already taken", _0)]
    ColorTaken(#[error(not(source))] Color),

    /// The room already has four players.
    #[display("Room is full")]
    RoomFull,

    /// Fewer than two players joined.
    #[display("Need at least 2 players, have {}", _0)]
    NotEnoughPlayers(#[error(not(source))] usize),

    /// The action is not allowed in the current status.
    #[display("Action requires status {}, game is {}", expected, actual)]
    InvalidGameStatus {
        /// Status the action needs.
        expected: GameStatus,
        /// Status the room is in.
        actual: GameStatus,
    },

    /// No piece with this id exists in the room.
    #[display("Piece {} not found", _0)]
    PieceNotFound(#[error(not(source))] String),

    /// The piece cannot move with the given die value.
    #[display("Invalid move: {}", _0)]
    InvalidMove(#[error(not(source))] String),

    /// It is the given color's turn, not the caller's.
    #[display("Not your turn, {} is to play", _0)]
    NotYourTurn(#[error(not(source))] Color),

    /// A field required by the action was absent.
    #[display("Missing field {}", _0)]
    MissingField(#[error(not(source))] &'static str),

    /// The action string is absent or not one of the known actions.
    #[display("Unrecognized action '{}'", _0)]
    UnrecognizedAction(#[error(not(source))] String),

    /// The color string names no player color.
    #[display("Invalid color {}", _0)]
    InvalidColor(#[error(not(source))] String),

    /// The body is not a JSON object of the expected shape.
    #[display("Malformed request: {}", _0)]
    MalformedRequest(#[error(not(source))] String),

    /// Unexpected fault; the message is logged, never returned to clients.
    #[display("Internal error: {}", _0)]
    Internal(#[error(not(source))] String),
}

impl LudoError {
    /// Creates an invalid move error.
    pub fn invalid_move(reason: impl Into<String>) -> Self {
        LudoError::InvalidMove(reason.into())
    }

    /// Error for an action attempted in the wrong status.
    pub fn status(expected: GameStatus, actual: GameStatus) -> Self {
        LudoError::InvalidGameStatus { expected, actual }
    }
}
