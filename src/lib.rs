//! A Gomoku (15x15 five-in-a-row) game engine: board state with incremental candidate-move
//! tracking, a stateless position analyzer, a heuristic evaluator, and a root-parallel
//! alpha-beta search, composed into a turn-enforcing game manager.

mod analyzer;
mod board;
mod error;
mod evaluator;
mod game_manager;
mod search;
mod types;

pub use analyzer::{poses_threat, would_win};
pub use board::{manhattan_to_center, Board, BOARD_SIZE};
pub use error::GomokuError;
pub use evaluator::{evaluate, SequenceSummary};
pub use game_manager::{GameManager, MoveResult};
pub use search::Engine;
pub use types::{BoardPosition, Cell, Color, GameResult};
