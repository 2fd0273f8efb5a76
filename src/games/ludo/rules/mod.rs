//! Game rules for Ludo.
//!
//! Pure functions over pieces and players. The session layer decides
//! when to call them; nothing here touches shared state.

pub mod capture;
pub mod dice;
pub mod movement;
pub mod turn;
pub mod win;

pub use capture::resolve_captures;
pub use dice::roll_die;
pub use movement::{apply_move, can_leave_home, can_move, is_legal, leave_home, move_piece};
pub use turn::next_player_index;
pub use win::check_winner;
