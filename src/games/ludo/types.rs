//! Core domain types for Ludo.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Number of pieces every player owns.
pub const PIECES_PER_PLAYER: usize = 4;

/// Maximum number of players in a room.
pub const MAX_PLAYERS: usize = 4;

/// Minimum number of players needed to start a game.
pub const MIN_PLAYERS: usize = 2;

/// Path length; reaching or passing this index finishes a piece.
pub const FINISH_LINE: u8 = 56;

/// Highest index a piece can rest on while still on the path.
pub const LAST_PATH_INDEX: u8 = FINISH_LINE - 1;

/// Die value required to bring a piece into play.
pub const RELEASE_ROLL: u8 = 6;

/// Player color. Exactly one player per color per room.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Color {
    /// Top-left quadrant.
    Red,
    /// Top-right quadrant.
    Green,
    /// Bottom-left quadrant.
    Yellow,
    /// Bottom-right quadrant.
    Blue,
}

/// Lifecycle of a room.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    /// Accepting players.
    #[default]
    Waiting,
    /// Turns are being played.
    Playing,
    /// A winner was recorded; terminal.
    Finished,
}

/// An index along the shared path, always within `1..=55`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{}", _0)]
pub struct PathIndex(u8);

impl PathIndex {
    /// First square after leaving the start square.
    pub const FIRST: PathIndex = PathIndex(1);

    /// Creates a path index, or `None` when outside `1..=55`.
    pub fn new(index: u8) -> Option<Self> {
        (1..=LAST_PATH_INDEX).contains(&index).then_some(Self(index))
    }

    /// Returns the raw index.
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Where a piece currently is.
///
/// Serialized as `"home"`, `"start"`, `"finish"` or a bare path index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "PositionRepr", try_from = "PositionRepr")]
pub enum Position {
    /// Not yet in play.
    Home,
    /// On the color's entry square, not yet on the shared path.
    Start,
    /// On the shared path.
    Path(PathIndex),
    /// Completed the circuit.
    Finished,
}

impl Position {
    /// Returns the path index if the piece is on the path.
    pub fn path_index(self) -> Option<PathIndex> {
        match self {
            Position::Path(index) => Some(index),
            _ => None,
        }
    }

    /// Convenience constructor for a path position; `None` when out of range.
    pub fn path(index: u8) -> Option<Self> {
        PathIndex::new(index).map(Position::Path)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Home => write!(f, "home"),
            Position::Start => write!(f, "start"),
            Position::Path(index) => write!(f, "{}", index),
            Position::Finished => write!(f, "finish"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PositionRepr {
    Label(PositionLabel),
    Index(u8),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PositionLabel {
    Home,
    Start,
    Finish,
}

impl From<Position> for PositionRepr {
    fn from(position: Position) -> Self {
        match position {
            Position::Home => PositionRepr::Label(PositionLabel::Home),
            Position::Start => PositionRepr::Label(PositionLabel::Start),
            Position::Path(index) => PositionRepr::Index(index.get()),
            Position::Finished => PositionRepr::Label(PositionLabel::Finish),
        }
    }
}

impl TryFrom<PositionRepr> for Position {
    type Error = String;

    fn try_from(repr: PositionRepr) -> Result<Self, Self::Error> {
        match repr {
            PositionRepr::Label(PositionLabel::Home) => Ok(Position::Home),
            PositionRepr::Label(PositionLabel::Start) => Ok(Position::Start),
            PositionRepr::Label(PositionLabel::Finish) => Ok(Position::Finished),
            PositionRepr::Index(index) => Position::path(index)
                .ok_or_else(|| format!("path index {} outside 1..={}", index, LAST_PATH_INDEX)),
        }
    }
}

/// A single die value, always within `1..=6`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[display("{}", _0)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieValue(u8);

impl DieValue {
    /// Smallest face.
    pub const MIN: u8 = 1;
    /// Largest face.
    pub const MAX: u8 = 6;

    /// Every face, in ascending order.
    pub const FACES: [DieValue; 6] = [
        DieValue(1),
        DieValue(2),
        DieValue(3),
        DieValue(4),
        DieValue(5),
        DieValue(6),
    ];

    /// Creates a die value, or `None` when outside `1..=6`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Returns the raw face value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// True for the roll that releases a piece from home or start.
    pub fn is_six(self) -> bool {
        self.0 == RELEASE_ROLL
    }
}

impl TryFrom<u8> for DieValue {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DieValue::new(value).ok_or_else(|| format!("die value {} outside 1..=6", value))
    }
}

impl From<DieValue> for u8 {
    fn from(value: DieValue) -> Self {
        value.0
    }
}
