//! First-class action types for Ludo.
//!
//! Clients post a loosely shaped [`ActionRequest`]; it is converted into a
//! closed [`Action`] before anything touches a room.

use super::error::LudoError;
use super::player::PieceId;
use super::types::Color;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// An action against a room, one variant per action kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Add a player.
    Join {
        /// Display name, non-empty.
        name: String,
        /// Requested color.
        color: Color,
    },
    /// Begin play.
    Start,
    /// Roll the die for the active player.
    RollDice {
        /// When present, must be the active player's color.
        color: Option<Color>,
    },
    /// Move one piece by the rolled value.
    MovePiece {
        /// Piece to move.
        piece_id: PieceId,
        /// Die value the client believes it rolled.
        dice_value: u8,
    },
}

impl Action {
    /// Wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Join { .. } => "join",
            Action::Start => "start",
            Action::RollDice { .. } => "roll_dice",
            Action::MovePiece { .. } => "move_piece",
        }
    }
}

/// JSON body accepted by the room endpoint.
///
/// Fields are kept loose so that every malformed value is reported as a
/// [`LudoError`] by the conversion into [`Action`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    /// One of `join`, `start`, `roll_dice`, `move_piece`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Required by `join`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    /// Required by `join`, optional for `roll_dice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_color: Option<String>,
    /// Required by `move_piece`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece_id: Option<PieceId>,
    /// Required by `move_piece`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice_value: Option<i64>,
}

impl ActionRequest {
    /// Builds the request for a given action.
    pub fn from_action(action: &Action) -> Self {
        let base = Self {
            action: Some(action.name().to_string()),
            ..Self::default()
        };
        match action {
            Action::Join { name, color } => Self {
                player_name: Some(name.clone()),
                player_color: Some(color.to_string()),
                ..base
            },
            Action::Start => base,
            Action::RollDice { color } => Self {
                player_color: color.map(|color| color.to_string()),
                ..base
            },
            Action::MovePiece {
                piece_id,
                dice_value,
            } => Self {
                piece_id: Some(piece_id.clone()),
                dice_value: Some(i64::from(*dice_value)),
                ..base
            },
        }
    }

    fn color(&self) -> Result<Option<Color>, LudoError> {
        self.player_color
            .as_deref()
            .map(|raw| {
                raw.parse::<Color>()
                    .map_err(|_| LudoError::InvalidColor(raw.to_string()))
            })
            .transpose()
    }
}

impl TryFrom<ActionRequest> for Action {
    type Error = LudoError;

    #[instrument(name = "parse_action", skip(request), fields(action = ?request.action))]
    fn try_from(request: ActionRequest) -> Result<Self, Self::Error> {
        match request.action.as_deref().unwrap_or_default() {
            "join" => {
                let color = request.color()?;
                let name = request
                    .player_name
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .ok_or(LudoError::MissingField("playerName"))?;
                let color = color.ok_or(LudoError::MissingField("playerColor"))?;
                Ok(Action::Join { name, color })
            }
            "start" => Ok(Action::Start),
            "roll_dice" => Ok(Action::RollDice {
                color: request.color()?,
            }),
            "move_piece" => {
                let raw = request
                    .dice_value
                    .ok_or(LudoError::MissingField("diceValue"))?;
                let dice_value = u8::try_from(raw).map_err(|_| {
                    LudoError::invalid_move(format!("die value {} outside 1..=6", raw))
                })?;
                Ok(Action::MovePiece {
                    piece_id: request.piece_id.ok_or(LudoError::MissingField("pieceId"))?,
                    dice_value,
                })
            }
            other => Err(LudoError::UnrecognizedAction(other.to_string())),
        }
    }
}
