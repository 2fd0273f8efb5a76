//! Win detection.

use super::super::player::Player;
use super::super::types::Color;
use tracing::instrument;

/// Returns the color of the first player, in join order, whose four pieces
/// are all finished.
#[instrument(skip(players), fields(players = players.len()))]
pub fn check_winner(players: &[Player]) -> Option<Color> {
    players
        .iter()
        .find(|player| player.has_won())
        .map(|player| *player.color())
}
