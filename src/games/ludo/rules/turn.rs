//! Turn rotation.

/// Index of the player after `current`, wrapping around.
///
/// Returns 0 for an empty player list.
pub fn next_player_index(current: usize, player_count: usize) -> usize {
    if player_count == 0 {
        return 0;
    }
    (current + 1) % player_count
}
