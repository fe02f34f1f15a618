//! Error taxonomy for caller-state misuse.
//!
//! Per-cell illegal moves (out of bounds or occupied) are deliberately not
//! part of this type: the board treats those as an observable no-op with a
//! logged warning, never a propagated error. Only genuine misuse of the
//! higher-level APIs — wrong turn, a finished game, bad construction
//! parameters — surfaces here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GomokuError {
  #[error("invalid engine configuration: {reason}")]
  InvalidConfiguration { reason: &'static str },
  #[error("it is not this side's turn to move")]
  NotYourTurn,
  #[error("the game has already ended")]
  GameOver,
}
