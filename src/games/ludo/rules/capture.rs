//! Capture resolution.

use super::super::player::{PieceId, Player};
use super::super::types::{Color, Position};
use tracing::{info, instrument};

/// Sends every opposing piece sharing `landed_on` back home.
///
/// Only path squares are contested; home, start and finish never capture.
/// All matches are captured, not just the first, and pieces of `mover`
/// color are never touched. Returns the captured piece ids in player then
/// piece order.
#[instrument(skip(players))]
pub fn resolve_captures(players: &mut [Player], mover: Color, landed_on: Position) -> Vec<PieceId> {
    let Some(square) = landed_on.path_index() else {
        return Vec::new();
    };

    let mut captured = Vec::new();
    for player in players.iter_mut().filter(|p| *p.color() != mover) {
        for piece in player.pieces_mut() {
            if piece.position().path_index() == Some(square) {
                piece.set_position(Position::Home);
                captured.push(piece.id().clone());
            }
        }
    }

    if !captured.is_empty() {
        info!(%square, count = captured.len(), "Captured pieces");
    }
    captured
}
