//! Room session state machine and the registry that owns all rooms.

use crate::games::ludo::rules::{
    apply_move, check_winner, is_legal, next_player_index, resolve_captures, roll_die,
};
use crate::games::ludo::{
    Action, Board, Color, DieValue, GameStatus, LudoError, MAX_PLAYERS, MIN_PLAYERS, PieceId,
    Player, PlayerId, Position,
};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Unique identifier for a room.
pub type RoomId = String;

/// Full mutable game state of one room.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    /// Room ID.
    id: RoomId,
    /// Players in join order.
    players: Vec<Player>,
    /// Index into `players` of the player to act.
    current_player_index: usize,
    /// Pending die value; serialized as 0 when nothing was rolled.
    #[serde(with = "die_or_zero")]
    dice_value: Option<DieValue>,
    /// Lifecycle status.
    status: GameStatus,
    /// Set once a player finished all pieces.
    winner: Option<Color>,
    /// Time of the last accepted action.
    last_updated: DateTime<Utc>,
    /// Static topology, shared by all rooms.
    board: Arc<Board>,
}

/// What an accepted action produced, besides the new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A player joined.
    Joined {
        /// The new player's id.
        player_id: PlayerId,
    },
    /// Play began.
    Started,
    /// The die was rolled.
    Rolled {
        /// Rolled value.
        dice_value: DieValue,
        /// True when no legal move existed and the turn moved on.
        turn_passed: bool,
    },
    /// A piece moved.
    Moved(MoveReport),
}

/// Result of a successful move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    /// The moved piece.
    pub piece_id: PieceId,
    /// Where it was.
    pub original_position: Position,
    /// Where it is now.
    pub new_position: Position,
    /// Opposing pieces sent home.
    pub captured: Vec<PieceId>,
}

impl GameSession {
    /// Creates an empty room waiting for players.
    #[instrument]
    pub fn new(id: RoomId) -> Self {
        info!(room_id = %id, "Creating new game session");
        Self {
            id,
            players: Vec::new(),
            current_player_index: 0,
            dice_value: None,
            status: GameStatus::Waiting,
            winner: None,
            last_updated: Utc::now(),
            board: Board::shared(),
        }
    }

    /// The player whose turn it is, while playing.
    pub fn active_player(&self) -> Option<&Player> {
        match self.status {
            GameStatus::Playing => self.players.get(self.current_player_index),
            GameStatus::Waiting | GameStatus::Finished => None,
        }
    }

    /// Locates a piece as `(player index, piece index)`.
    pub fn find_piece(&self, piece_id: &str) -> Option<(usize, usize)> {
        self.players
            .iter()
            .enumerate()
            .find_map(|(p, player)| player.piece_index(piece_id).map(|i| (p, i)))
    }

    /// Pieces of the active player that may act with `die`.
    pub fn legal_moves(&self, die: DieValue) -> Vec<PieceId> {
        self.active_player()
            .map(|player| {
                player
                    .pieces()
                    .iter()
                    .filter(|piece| is_legal(piece, die))
                    .map(|piece| piece.id().clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Applies an action to this room.
    ///
    /// # Errors
    ///
    /// Returns the action's rejection; the session is unchanged in that case.
    #[instrument(skip(self), fields(room_id = %self.id, action = action.name()))]
    pub fn apply(&mut self, action: Action) -> Result<ActionOutcome, LudoError> {
        let outcome = match action {
            Action::Join { name, color } => ActionOutcome::Joined {
                player_id: self.join(name, color)?,
            },
            Action::Start => {
                self.start()?;
                ActionOutcome::Started
            }
            Action::RollDice { color } => {
                let (dice_value, turn_passed) = self.roll_dice(color)?;
                ActionOutcome::Rolled {
                    dice_value,
                    turn_passed,
                }
            }
            Action::MovePiece {
                piece_id,
                dice_value,
            } => ActionOutcome::Moved(self.move_piece(&piece_id, dice_value)?),
        };
        Ok(outcome)
    }

    /// Adds a player while the room is waiting.
    ///
    /// # Errors
    ///
    /// `InvalidGameStatus` once started, `ColorTaken`, or `RoomFull`.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn join(&mut self, name: String, color: Color) -> Result<PlayerId, LudoError> {
        self.require_status(GameStatus::Waiting)?;

        if self.players.iter().any(|player| *player.color() == color) {
            warn!(%color, "Color already taken");
            return Err(LudoError::ColorTaken(color));
        }
        if self.players.len() >= MAX_PLAYERS {
            warn!("Room is full");
            return Err(LudoError::RoomFull);
        }

        let player_id = format!("player-{}", Uuid::new_v4().simple());
        info!(player_id = %player_id, %color, name = %name, "Player joined");
        self.players.push(Player::new(player_id.clone(), name, color));
        self.touch();
        Ok(player_id)
    }

    /// Starts play with the first player to join.
    ///
    /// # Errors
    ///
    /// `InvalidGameStatus` unless waiting, `NotEnoughPlayers` below two.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn start(&mut self) -> Result<(), LudoError> {
        self.require_status(GameStatus::Waiting)?;
        if self.players.len() < MIN_PLAYERS {
            warn!(players = self.players.len(), "Not enough players to start");
            return Err(LudoError::NotEnoughPlayers(self.players.len()));
        }

        self.status = GameStatus::Playing;
        self.set_current_player(0);
        self.dice_value = None;
        info!(players = self.players.len(), "Game started");
        self.touch();
        Ok(())
    }

    /// Rolls the die for the active player.
    ///
    /// Returns the value and whether the turn passed for lack of a legal move.
    ///
    /// # Errors
    ///
    /// `InvalidGameStatus` unless playing, `NotYourTurn` if `color` is given
    /// and is not the active player's.
    pub fn roll_dice(&mut self, color: Option<Color>) -> Result<(DieValue, bool), LudoError> {
        self.check_roll(color)?;
        Ok(self.apply_roll(roll_die()))
    }

    /// Records an externally produced roll for the active player.
    ///
    /// Overwrites any pending value. When the active player has no legal
    /// move with `die`, the turn passes immediately.
    ///
    /// # Errors
    ///
    /// Same as [`GameSession::roll_dice`].
    pub fn record_roll(
        &mut self,
        color: Option<Color>,
        die: DieValue,
    ) -> Result<(DieValue, bool), LudoError> {
        self.check_roll(color)?;
        Ok(self.apply_roll(die))
    }

    #[instrument(skip(self), fields(room_id = %self.id))]
    fn apply_roll(&mut self, die: DieValue) -> (DieValue, bool) {
        self.dice_value = Some(die);
        let legal = self.legal_moves(die);
        let turn_passed = legal.is_empty();
        if turn_passed {
            info!(%die, "No legal move, passing turn");
            self.advance_turn();
        } else {
            debug!(%die, legal = ?legal, "Die rolled");
        }
        self.touch();
        (die, turn_passed)
    }

    fn check_roll(&self, color: Option<Color>) -> Result<(), LudoError> {
        self.require_status(GameStatus::Playing)?;
        let active = self.active_color()?;
        match color {
            Some(color) if color != active => {
                warn!(%color, %active, "Roll out of turn");
                Err(LudoError::NotYourTurn(active))
            }
            _ => Ok(()),
        }
    }

    /// Moves a piece of the active player by the rolled die.
    ///
    /// Applies the movement rules, sends captured opponents home, passes
    /// the turn and checks for a winner.
    ///
    /// # Errors
    ///
    /// `InvalidGameStatus` unless playing, `PieceNotFound`, `InvalidMove`
    /// for an out-of-range or unrolled die or an illegal move, and
    /// `NotYourTurn` for another player's piece.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn move_piece(&mut self, piece_id: &str, dice_value: u8) -> Result<MoveReport, LudoError> {
        self.require_status(GameStatus::Playing)?;

        let (player_index, piece_index) = self.find_piece(piece_id).ok_or_else(|| {
            warn!(piece_id, "Piece not found");
            LudoError::PieceNotFound(piece_id.to_string())
        })?;

        let die = DieValue::new(dice_value).ok_or_else(|| {
            LudoError::invalid_move(format!("die value {} outside 1..=6", dice_value))
        })?;
        if self.dice_value != Some(die) {
            warn!(dice_value, pending = ?self.dice_value, "Die value does not match roll");
            return Err(LudoError::invalid_move(format!(
                "die value {} was not rolled this turn",
                dice_value
            )));
        }

        let active = self.active_color()?;
        let player = &self.players[player_index];
        if *player.color() != active {
            warn!(piece_id, owner = %player.color(), %active, "Move out of turn");
            return Err(LudoError::NotYourTurn(active));
        }

        let piece = &player.pieces()[piece_index];
        let moved = apply_move(piece, die).inspect_err(|e| warn!(error = %e, "Invalid move"))?;
        let original_position = *piece.position();
        let new_position = *moved.position();

        self.players[player_index].pieces_mut()[piece_index].set_position(new_position);
        let captured = resolve_captures(&mut self.players, active, new_position);

        self.advance_turn();
        if let Some(winner) = check_winner(&self.players) {
            self.finish(winner);
        }

        info!(
            piece_id,
            from = %original_position,
            to = %new_position,
            captured = captured.len(),
            status = %self.status,
            "Move completed"
        );
        self.touch();

        Ok(MoveReport {
            piece_id: piece_id.to_string(),
            original_position,
            new_position,
            captured,
        })
    }

    fn require_status(&self, expected: GameStatus) -> Result<(), LudoError> {
        if self.status == expected {
            Ok(())
        } else {
            warn!(%expected, actual = %self.status, "Action not allowed in current status");
            Err(LudoError::status(expected, self.status))
        }
    }

    fn active_color(&self) -> Result<Color, LudoError> {
        self.active_player()
            .map(|player| *player.color())
            .ok_or_else(|| LudoError::Internal("playing room without an active player".into()))
    }

    fn advance_turn(&mut self) {
        let next = next_player_index(self.current_player_index, self.players.len());
        self.set_current_player(next);
        self.dice_value = None;
    }

    fn set_current_player(&mut self, index: usize) {
        self.current_player_index = index;
        for (i, player) in self.players.iter_mut().enumerate() {
            player.set_active(i == index);
        }
    }

    fn finish(&mut self, winner: Color) {
        info!(%winner, "Game finished");
        self.status = GameStatus::Finished;
        self.winner = Some(winner);
        self.dice_value = None;
        for player in &mut self.players {
            player.set_active(false);
        }
    }

    fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    #[cfg(test)]
    pub(crate) fn place_piece(&mut self, piece_id: &str, position: Position) {
        if let Some((p, i)) = self.find_piece(piece_id) {
            self.players[p].pieces_mut()[i].set_position(position);
        }
    }
}

mod die_or_zero {
    use crate::games::ludo::DieValue;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DieValue>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(value.map_or(0, DieValue::get))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DieValue>, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(None),
            raw => DieValue::new(raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("die value {} outside 0..=6", raw))),
        }
    }
}

/// A session snapshot together with what the action produced.
#[derive(Debug, Clone)]
pub struct ActionReport {
    /// What happened.
    pub outcome: ActionOutcome,
    /// The room after the action.
    pub session: GameSession,
}

/// Owns every room, one lock per room.
///
/// Rooms are created lazily on first write and live until the registry is
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<HashMap<RoomId, Arc<Mutex<GameSession>>>>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating room registry");
        Self::default()
    }

    /// Returns the room, creating it if it does not exist yet.
    ///
    /// # Errors
    ///
    /// `Internal` if the registry lock was poisoned.
    #[instrument(skip(self))]
    pub fn get_or_create(&self, room_id: &str) -> Result<Arc<Mutex<GameSession>>, LudoError> {
        if let Some(room) = self.find(room_id)? {
            return Ok(room);
        }

        let mut rooms = self
            .rooms
            .write()
            .map_err(|_| LudoError::Internal("room registry lock poisoned".into()))?;
        let room = rooms
            .entry(room_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(GameSession::new(room_id.to_string()))));
        Ok(Arc::clone(room))
    }

    fn find(&self, room_id: &str) -> Result<Option<Arc<Mutex<GameSession>>>, LudoError> {
        let rooms = self
            .rooms
            .read()
            .map_err(|_| LudoError::Internal("room registry lock poisoned".into()))?;
        Ok(rooms.get(room_id).cloned())
    }

    /// Returns a snapshot of the room's current state.
    ///
    /// # Errors
    ///
    /// `RoomNotFound` for a room never referenced before.
    #[instrument(skip(self))]
    pub fn get_session(&self, room_id: &str) -> Result<GameSession, LudoError> {
        let room = self.find(room_id)?.ok_or_else(|| {
            debug!(room_id, "Room not found");
            LudoError::RoomNotFound(room_id.to_string())
        })?;
        let session = lock(&room)?;
        Ok(session.clone())
    }

    /// Applies an action to a room, creating the room on first reference.
    ///
    /// The room's lock is held for the whole transition.
    ///
    /// # Errors
    ///
    /// The action's rejection; the room is left unchanged.
    #[instrument(skip(self, action), fields(action = action.name()))]
    pub fn apply(&self, room_id: &str, action: Action) -> Result<ActionReport, LudoError> {
        let room = self.get_or_create(room_id)?;
        let mut session = lock(&room)?;
        let outcome = session.apply(action)?;
        Ok(ActionReport {
            outcome,
            session: session.clone(),
        })
    }

    /// Lists all room ids, sorted.
    ///
    /// # Errors
    ///
    /// `Internal` if the registry lock was poisoned.
    pub fn list_rooms(&self) -> Result<Vec<RoomId>, LudoError> {
        let rooms = self
            .rooms
            .read()
            .map_err(|_| LudoError::Internal("room registry lock poisoned".into()))?;
        let mut ids: Vec<_> = rooms.keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed rooms");
        Ok(ids)
    }
}

fn lock(room: &Mutex<GameSession>) -> Result<MutexGuard<'_, GameSession>, LudoError> {
    room.lock()
        .map_err(|_| LudoError::Internal("room lock poisoned".into()))
}
