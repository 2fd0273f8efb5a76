//! Polling HTTP client for the room API.

use crate::games::ludo::{Action, ActionRequest, Color, PieceId};
use crate::server::{ActionResponse, ErrorBody};
use crate::session::GameSession;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Client bound to one room on one server.
#[derive(Debug, Clone)]
pub struct LudoClient {
    base_url: String,
    room_id: String,
    client: reqwest::Client,
}

impl LudoClient {
    /// Creates a client for a room.
    #[instrument]
    pub fn new(base_url: String, room_id: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            room_id,
            client: reqwest::Client::new(),
        }
    }

    fn room_url(&self) -> String {
        format!("{}/api/game/{}", self.base_url, self.room_id)
    }

    /// Fetches the room's state.
    #[instrument(skip(self), fields(room_id = %self.room_id))]
    pub async fn get_session(&self) -> Result<GameSession> {
        debug!("Getting room state via REST");
        let response = self.client.get(self.room_url()).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body: ErrorBody = response.json().await.context("Malformed error body")?;
            anyhow::bail!("Get room failed: {} - {}", status, body.error);
        }
        Ok(response.json().await?)
    }

    /// Posts an action and returns the server's response.
    #[instrument(skip(self), fields(room_id = %self.room_id, action = action.name()))]
    pub async fn send(&self, action: &Action) -> Result<ActionResponse> {
        let request = ActionRequest::from_action(action);
        let response = self
            .client
            .post(self.room_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: ErrorBody = response.json().await.context("Malformed error body")?;
            warn!(%status, error = %body.error, "Action rejected");
            anyhow::bail!("{} failed: {} - {}", action.name(), status, body.error);
        }
        Ok(response.json().await?)
    }

    /// Joins the room.
    pub async fn join(&self, name: &str, color: Color) -> Result<ActionResponse> {
        self.send(&Action::Join {
            name: name.to_string(),
            color,
        })
        .await
    }

    /// Starts the game.
    pub async fn start(&self) -> Result<ActionResponse> {
        self.send(&Action::Start).await
    }

    /// Rolls the die, optionally asserting whose turn it is.
    pub async fn roll_dice(&self, color: Option<Color>) -> Result<ActionResponse> {
        self.send(&Action::RollDice { color }).await
    }

    /// Moves a piece by the rolled value.
    pub async fn move_piece(&self, piece_id: &PieceId, dice_value: u8) -> Result<ActionResponse> {
        self.send(&Action::MovePiece {
            piece_id: piece_id.clone(),
            dice_value,
        })
        .await
    }

    /// Polls the room and calls `on_change` whenever its state changed.
    ///
    /// Stops when the callback returns `false` or the game finished. Failed
    /// polls are logged and retried on the next tick.
    #[instrument(skip(self, on_change), fields(room_id = %self.room_id))]
    pub async fn watch<F>(&self, interval: Duration, mut on_change: F) -> Result<GameSession>
    where
        F: FnMut(&GameSession) -> bool,
    {
        info!(?interval, "Watching room");
        let mut ticker = tokio::time::interval(interval);
        let mut last_seen: Option<DateTime<Utc>> = None;

        loop {
            ticker.tick().await;
            let session = match self.get_session().await {
                Ok(session) => session,
                Err(e) => {
                    warn!(error = %e, "Polling error");
                    continue;
                }
            };

            if last_seen == Some(*session.last_updated()) {
                continue;
            }
            last_seen = Some(*session.last_updated());

            let keep_going = on_change(&session);
            if !keep_going || session.winner().is_some() {
                return Ok(session);
            }
        }
    }
}
