//! Movement legality and application.

use super::super::error::LudoError;
use super::super::player::Piece;
use super::super::types::{DieValue, FINISH_LINE, PathIndex, Position};
use tracing::{debug, instrument};

/// Checks whether a piece in play may advance by `die`.
///
/// Home and finished pieces never move here; a start piece needs a six;
/// a path piece may not overshoot the finish line.
#[instrument(skip(piece), fields(piece_id = %piece.id(), position = %piece.position()))]
pub fn can_move(piece: &Piece, die: DieValue) -> bool {
    match piece.position() {
        Position::Home | Position::Finished => false,
        Position::Start => die.is_six(),
        Position::Path(index) => index.get() + die.get() <= FINISH_LINE,
    }
}

/// Checks whether a home piece may enter its start square.
pub fn can_leave_home(piece: &Piece, die: DieValue) -> bool {
    *piece.position() == Position::Home && die.is_six()
}

/// True if either the release rule or the movement rule allows the piece
/// to act with this die.
pub fn is_legal(piece: &Piece, die: DieValue) -> bool {
    can_leave_home(piece, die) || can_move(piece, die)
}

/// Computes the piece's position after advancing by `die`.
///
/// # Errors
///
/// Returns [`LudoError::InvalidMove`] when [`can_move`] rejects the pair.
#[instrument(skip(piece), fields(piece_id = %piece.id(), position = %piece.position()))]
pub fn move_piece(piece: &Piece, die: DieValue) -> Result<Piece, LudoError> {
    if !can_move(piece, die) {
        return Err(LudoError::invalid_move(format!(
            "piece {} at {} cannot move {}",
            piece.id(),
            piece.position(),
            die
        )));
    }

    let next = match piece.position() {
        Position::Start => Position::Path(PathIndex::FIRST),
        Position::Path(index) => {
            let target = index.get() + die.get();
            if target >= FINISH_LINE {
                Position::Finished
            } else {
                PathIndex::new(target).map(Position::Path).ok_or_else(|| {
                    LudoError::Internal(format!("path index {} out of range", target))
                })?
            }
        }
        Position::Home | Position::Finished => {
            return Err(LudoError::invalid_move("piece is not in play"));
        }
    };

    debug!(to = %next, "Piece moved");
    Ok(piece.with_position(next))
}

/// Moves a home piece onto its start square.
///
/// # Errors
///
/// Returns [`LudoError::InvalidMove`] unless the piece is home and `die` is six.
pub fn leave_home(piece: &Piece, die: DieValue) -> Result<Piece, LudoError> {
    if !can_leave_home(piece, die) {
        return Err(LudoError::invalid_move(format!(
            "piece {} needs a 6 to leave home, rolled {}",
            piece.id(),
            die
        )));
    }
    Ok(piece.with_position(Position::Start))
}

/// Applies whichever rule allows the piece to act.
///
/// # Errors
///
/// Returns [`LudoError::InvalidMove`] when neither rule applies.
pub fn apply_move(piece: &Piece, die: DieValue) -> Result<Piece, LudoError> {
    if can_leave_home(piece, die) {
        leave_home(piece, die)
    } else {
        move_piece(piece, die)
    }
}
