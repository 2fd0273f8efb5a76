//! Players, their pieces, and the factory that creates them.

use super::types::{Color, PIECES_PER_PLAYER, Position};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Unique identifier for a player.
pub type PlayerId = String;

/// Unique identifier for a piece, stable for the lifetime of a room.
pub type PieceId = String;

/// A single Ludo piece.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    /// Derived from player id, color and index.
    id: PieceId,
    /// Fixed at creation.
    color: Color,
    /// Current location.
    position: Position,
    /// Owning player (back-reference by id).
    player_id: PlayerId,
}

impl Piece {
    /// Creates a piece at home with a deterministic identity.
    #[instrument]
    pub fn new(player_id: &str, color: Color, index: usize) -> Self {
        Self {
            id: format!("{}-{}-{}", player_id, color, index),
            color,
            position: Position::Home,
            player_id: player_id.to_string(),
        }
    }

    /// Returns a copy of this piece at a different position.
    pub fn with_position(&self, position: Position) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    /// Moves this piece in place.
    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// True once the piece completed its circuit.
    pub fn is_finished(&self) -> bool {
        self.position == Position::Finished
    }
}

/// A player in a room.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Player's unique ID.
    id: PlayerId,
    /// Display name.
    name: String,
    /// Unique within a room.
    color: Color,
    /// Always four pieces, ordered by index.
    pieces: Vec<Piece>,
    /// True only for the player whose turn it is.
    is_active: bool,
}

impl Player {
    /// Creates a player with four fresh pieces at home.
    #[instrument(skip(name), fields(name = %name))]
    pub fn new(id: PlayerId, name: String, color: Color) -> Self {
        let pieces = (0..PIECES_PER_PLAYER)
            .map(|index| Piece::new(&id, color, index))
            .collect();
        debug!(player_id = %id, %color, "Created player");
        Self {
            id,
            name,
            color,
            pieces,
            is_active: false,
        }
    }

    /// Number of pieces that reached the finish.
    pub fn finished_count(&self) -> usize {
        self.pieces.iter().filter(|piece| piece.is_finished()).count()
    }

    /// True when every piece is finished.
    pub fn has_won(&self) -> bool {
        self.finished_count() == PIECES_PER_PLAYER
    }

    /// Index of the piece with the given id.
    pub fn piece_index(&self, piece_id: &str) -> Option<usize> {
        self.pieces.iter().position(|piece| piece.id == piece_id)
    }

    /// Returns this player with one piece moved, for setting up positions.
    ///
    /// An index past the last piece leaves the player unchanged.
    pub fn with_piece_at(mut self, index: usize, position: Position) -> Self {
        if let Some(piece) = self.pieces.get_mut(index) {
            piece.set_position(position);
        }
        self
    }

    pub(crate) fn pieces_mut(&mut self) -> &mut [Piece] {
        &mut self.pieces
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

/// Creates a player with four pieces at home.
///
/// Piece ids are `<id>-<color>-<index>` so clients can reconcile pieces
/// across polls.
pub fn create_player(id: impl Into<PlayerId>, name: impl Into<String>, color: Color) -> Player {
    Player::new(id.into(), name.into(), color)
}
