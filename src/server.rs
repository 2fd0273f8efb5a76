//! HTTP interface: one resource per room, read with GET, act with POST.

use crate::games::ludo::{Action, ActionRequest, DieValue, LudoError, PieceId, PlayerId, Position};
use crate::session::{ActionOutcome, ActionReport, GameSession, RoomId, RoomRegistry};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

/// Body returned for an accepted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    /// Always true; failures use [`ErrorBody`].
    pub success: bool,
    /// The room after the action.
    pub game_state: GameSession,
    /// Set by `join`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    /// Set by `roll_dice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice_value: Option<DieValue>,
    /// Set by `roll_dice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_passed: Option<bool>,
    /// Set by `move_piece`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece_id: Option<PieceId>,
    /// Set by `move_piece`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_position: Option<Position>,
    /// Set by `move_piece`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_position: Option<Position>,
    /// Set by `move_piece`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<Vec<PieceId>>,
}

impl From<ActionReport> for ActionResponse {
    fn from(report: ActionReport) -> Self {
        let mut response = Self {
            success: true,
            game_state: report.session,
            player_id: None,
            dice_value: None,
            turn_passed: None,
            piece_id: None,
            original_position: None,
            new_position: None,
            captured: None,
        };
        match report.outcome {
            ActionOutcome::Joined { player_id } => response.player_id = Some(player_id),
            ActionOutcome::Started => {}
            ActionOutcome::Rolled {
                dice_value,
                turn_passed,
            } => {
                response.dice_value = Some(dice_value);
                response.turn_passed = Some(turn_passed);
            }
            ActionOutcome::Moved(report) => {
                response.piece_id = Some(report.piece_id);
                response.original_position = Some(report.original_position);
                response.new_position = Some(report.new_position);
                response.captured = Some(report.captured);
            }
        }
        response
    }
}

/// Body returned for a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}

/// Maps a rejection to its HTTP status.
pub fn status_for(error: &LudoError) -> StatusCode {
    match error {
        LudoError::RoomNotFound(_) | LudoError::PieceNotFound(_) => StatusCode::NOT_FOUND,
        LudoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        LudoError::ColorTaken(_)
        | LudoError::RoomFull
        | LudoError::NotEnoughPlayers(_)
        | LudoError::InvalidGameStatus { .. }
        | LudoError::InvalidMove(_)
        | LudoError::NotYourTurn(_)
        | LudoError::MissingField(_)
        | LudoError::UnrecognizedAction(_)
        | LudoError::InvalidColor(_)
        | LudoError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
    }
}

/// Rejection wrapper implementing [`IntoResponse`].
#[derive(Debug)]
pub struct ApiError(LudoError);

impl From<LudoError> for ApiError {
    fn from(error: LudoError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = match &self.0 {
            LudoError::Internal(detail) => {
                error!(detail = %detail, "Internal error while handling request");
                "Internal server error".to_string()
            }
            other => {
                warn!(status = %status, error = %other, "Request rejected");
                other.to_string()
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Builds the router over a shared registry.
#[instrument(skip(rooms))]
pub fn router(rooms: RoomRegistry) -> Router {
    info!("Building game router");
    Router::new()
        .route("/api/game", get(list_rooms))
        .route("/api/game/{room_id}", get(get_room).post(post_action))
        .with_state(rooms)
}

#[instrument(skip(rooms))]
async fn list_rooms(State(rooms): State<RoomRegistry>) -> Result<Json<Vec<RoomId>>, ApiError> {
    Ok(Json(rooms.list_rooms()?))
}

#[instrument(skip(rooms))]
async fn get_room(
    State(rooms): State<RoomRegistry>,
    Path(room_id): Path<RoomId>,
) -> Result<Json<GameSession>, ApiError> {
    debug!(room_id = %room_id, "Reading room");
    Ok(Json(rooms.get_session(&room_id)?))
}

#[instrument(skip(rooms, payload))]
async fn post_action(
    State(rooms): State<RoomRegistry>,
    Path(room_id): Path<RoomId>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| LudoError::MalformedRequest(rejection.body_text()))?;
    let action = Action::try_from(request)?;
    let report = rooms.apply(&room_id, action)?;
    info!(room_id = %room_id, status = %report.session.status(), "Action applied");
    Ok(Json(ActionResponse::from(report)))
}

/// Binds and serves the router until the process stops.
///
/// # Errors
///
/// Fails if the address cannot be bound or the server stops with an error.
#[instrument(skip(rooms))]
pub async fn serve(host: &str, port: u16, rooms: RoomRegistry) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(address = %listener.local_addr()?, "Ludo server ready");
    axum::serve(listener, router(rooms)).await?;
    Ok(())
}
