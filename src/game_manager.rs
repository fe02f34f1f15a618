//! Top-level game orchestration: turn enforcement, move application, and result tracking.

use crate::board::Board;
use crate::error::GomokuError;
use crate::search::Engine;
use crate::types::{BoardPosition, Color, GameResult};

/// Outcome of a single applied (or rejected) move attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveResult {
  pub applied: bool,
  pub winner: Option<GameResult>,
  pub board_full: bool,
  pub position: BoardPosition,
  pub placed_color: Option<Color>,
}

/// Owns the board and the AI engine for a single game between one human side and one AI side.
pub struct GameManager {
  board: Board,
  engine: Engine,
  human_color: Color,
  result: Option<GameResult>,
}

impl GameManager {
  pub fn new(human_color: Color, max_depth: i32) -> Result<Self, GomokuError> {
    let engine = Engine::new(human_color.other(), max_depth)?;
    Ok(Self {
      board: Board::new(),
      engine,
      human_color,
      result: None,
    })
  }

  /// Resets the board and result, reassigning which color the human plays. If the AI now
  /// plays first (human chose White), immediately plays that opening move and returns it.
  pub fn new_game(&mut self, human_color: Color) -> Option<MoveResult> {
    self.board.reset();
    self.result = None;
    self.human_color = human_color;
    self.engine.set_color(human_color.other());
    self.engine.clear_cancel();

    if self.is_ai_turn() {
      self.play_ai_move().ok()
    } else {
      None
    }
  }

  pub fn board(&self) -> &Board {
    &self.board
  }

  pub fn human_color(&self) -> Color {
    self.human_color
  }

  pub fn is_human_turn(&self) -> bool {
    !self.is_game_over() && self.board.side_to_move() == self.human_color
  }

  pub fn is_ai_turn(&self) -> bool {
    !self.is_game_over() && self.board.side_to_move() == self.human_color.other()
  }

  pub fn is_game_over(&self) -> bool {
    self.result.is_some()
  }

  pub fn winner(&self) -> Option<GameResult> {
    self.result
  }

  pub fn play_human_move(&mut self, pos: BoardPosition) -> Result<MoveResult, GomokuError> {
    if self.is_game_over() {
      return Err(GomokuError::GameOver);
    }
    if self.board.side_to_move() != self.human_color {
      return Err(GomokuError::NotYourTurn);
    }
    Ok(self.apply_move(pos))
  }

  /// Asks the engine for a move and applies it. Returns [`GomokuError::GameOver`] if the
  /// game already ended, or a no-op-shaped [`MoveResult`] (`applied: false`) if the engine
  /// was cancelled or found no legal move.
  pub fn play_ai_move(&mut self) -> Result<MoveResult, GomokuError> {
    if self.is_game_over() {
      return Err(GomokuError::GameOver);
    }
    if self.board.side_to_move() != self.human_color.other() {
      return Err(GomokuError::NotYourTurn);
    }

    let chosen = self.engine.get_best_move(&self.board);
    if chosen == BoardPosition::INVALID {
      tracing::warn!("engine returned no move (cancelled or no candidates)");
      return Ok(MoveResult {
        applied: false,
        winner: self.result,
        board_full: self.board.is_board_full(),
        position: BoardPosition::INVALID,
        placed_color: None,
      });
    }

    Ok(self.apply_move(chosen))
  }

  fn apply_move(&mut self, pos: BoardPosition) -> MoveResult {
    if !self.board.is_valid_move(pos) {
      return MoveResult {
        applied: false,
        winner: self.result,
        board_full: self.board.is_board_full(),
        position: pos,
        placed_color: None,
      };
    }

    let placed_color = self.board.side_to_move();
    let winner = self.board.make_move(pos);
    let board_full = self.board.is_board_full();

    if let Some(color) = winner {
      self.result = Some(GameResult::Win(color));
      tracing::info!(?color, "game won");
    } else if board_full {
      self.result = Some(GameResult::Draw);
      tracing::info!("game drawn: board full");
    }

    MoveResult {
      applied: true,
      winner: self.result,
      board_full,
      position: pos,
      placed_color: Some(placed_color),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pos(row: i32, col: i32) -> BoardPosition {
    BoardPosition::new(row, col)
  }

  #[test]
  fn human_out_of_turn_move_is_rejected() {
    let mut manager = GameManager::new(Color::White, 2).unwrap();
    // Black moves first; human is White, so this is not their turn.
    let result = manager.play_human_move(pos(7, 7));
    assert!(matches!(result, Err(GomokuError::NotYourTurn)));
  }

  #[test]
  fn human_move_then_ai_move_alternates_turns() {
    let mut manager = GameManager::new(Color::Black, 2).unwrap();
    let human_result = manager.play_human_move(pos(7, 7)).unwrap();
    assert!(human_result.applied);
    assert_eq!(human_result.placed_color, Some(Color::Black));

    let ai_result = manager.play_ai_move().unwrap();
    assert!(ai_result.applied);
    assert_eq!(ai_result.placed_color, Some(Color::White));
    assert!(manager.is_human_turn());
  }

  #[test]
  fn new_game_clears_result_and_restores_blacks_turn() {
    let mut manager = GameManager::new(Color::Black, 2).unwrap();
    manager.play_human_move(pos(7, 7)).unwrap();
    let opening = manager.new_game(Color::Black);
    assert!(opening.is_none()); // human (Black) moves first, no AI auto-move
    assert!(!manager.is_game_over());
    assert!(manager.is_human_turn());
    assert_eq!(manager.board().move_count(), 0);
  }

  #[test]
  fn new_game_as_white_triggers_ais_opening_move() {
    let mut manager = GameManager::new(Color::Black, 2).unwrap();
    let opening = manager.new_game(Color::White).unwrap();
    assert!(opening.applied);
    assert_eq!(opening.placed_color, Some(Color::Black));
    assert_eq!(opening.position, pos(7, 7));
    assert!(manager.is_human_turn());
  }

  #[test]
  fn illegal_human_move_reports_not_applied() {
    let mut manager = GameManager::new(Color::Black, 2).unwrap();
    manager.play_human_move(pos(7, 7)).unwrap();
    manager.play_ai_move().unwrap();
    // (7, 7) is now occupied and it is Black's turn again.
    let result = manager.play_human_move(pos(7, 7)).unwrap();
    assert!(!result.applied);
    assert_eq!(result.placed_color, None);
  }
}
