//! Strictly Ludo library - four-player Ludo rules and room server
//!
//! # Architecture
//!
//! - **Games**: Board topology, pieces and pure movement/capture/win rules
//! - **Session**: Per-room turn state machine and the room registry
//! - **Server**: REST endpoints over the registry (axum)
//! - **Client**: Polling REST client
//!
//! # Example
//!
//! ```
//! use strictly_ludo::{Action, Color, RoomRegistry};
//!
//! # fn example() -> Result<(), strictly_ludo::LudoError> {
//! let rooms = RoomRegistry::new();
//! rooms.apply("lobby", Action::Join { name: "Alice".into(), color: Color::Red })?;
//! rooms.apply("lobby", Action::Join { name: "Bob".into(), color: Color::Blue })?;
//! let report = rooms.apply("lobby", Action::Start)?;
//! assert!(*report.session.players()[0].is_active());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
pub mod games;
mod server;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Client
pub use client::LudoClient;

// Crate-level exports - Server types
pub use server::{ActionResponse, ApiError, ErrorBody, router, serve, status_for};

// Crate-level exports - Session management
pub use session::{ActionOutcome, ActionReport, GameSession, MoveReport, RoomId, RoomRegistry};

// Crate-level exports - Game types
pub use games::ludo::{
    Action, ActionRequest, Board, BoardCell, CellKind, Color, DieValue, GameStatus, GridPoint,
    LudoError, PathIndex, Piece, PieceId, Player, PlayerId, Position, create_player,
    grid_position,
};
