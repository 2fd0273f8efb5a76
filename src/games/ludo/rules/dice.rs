//! Die rolls.

use super::super::types::DieValue;
use rand::Rng;
use tracing::{debug, instrument};

/// Rolls a fair six-sided die.
#[instrument]
pub fn roll_die() -> DieValue {
    roll_die_with(&mut rand::thread_rng())
}

/// Rolls using the supplied generator.
pub fn roll_die_with<R: Rng + ?Sized>(rng: &mut R) -> DieValue {
    let face = DieValue::FACES[rng.gen_range(0..DieValue::FACES.len())];
    debug!(%face, "Rolled die");
    face
}
