//! Root-parallel alpha-beta search: classic `isMaximizing`-bool minimax, fanned out across a
//! fixed, reusable thread pool at the root ply only.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::analyzer::{poses_threat, would_win};
use crate::board::{manhattan_to_center, Board};
use crate::error::GomokuError;
use crate::evaluator::evaluate;
use crate::types::{BoardPosition, Color};

/// Terminal score for a board where one side has completed five in a row: `+inf/2 + 10000`
/// for the engine's color, its negation for the opponent's.
const WIN_SENTINEL: i32 = i32::MAX / 2 + 10_000;

/// Root chunk size cap: `T = min(thread count, 12)`.
const MAX_CHUNK_SIZE: usize = 12;

/// Candidates ordered by the analyzer's priority classes. If any move would win immediately
/// for `mover` or the opponent, that bucket alone is returned — it cannot be beaten, so
/// deepening anything else is wasted. Otherwise: threat moves (either color), then the
/// remainder sorted ascending by distance from center.
fn ordered_candidates(board: &Board, mover: Color) -> Vec<BoardPosition> {
  let opponent = mover.other();
  let mut candidates: Vec<BoardPosition> = board.candidate_moves().collect();
  candidates.sort();

  let mut immediate = Vec::new();
  let mut threats = Vec::new();
  let mut others = Vec::new();

  for pos in candidates {
    if would_win(board, pos, mover) || would_win(board, pos, opponent) {
      immediate.push(pos);
    } else if poses_threat(board, pos, mover) || poses_threat(board, pos, opponent) {
      threats.push(pos);
    } else {
      others.push(pos);
    }
  }

  if !immediate.is_empty() {
    return immediate;
  }

  others.sort_by_key(|&pos| manhattan_to_center(pos));
  threats.extend(others);
  threats
}

/// Owns a fixed-size thread pool, reused across searches, plus cooperative cancellation.
pub struct Engine {
  color: Color,
  max_depth: i32,
  pool: rayon::ThreadPool,
  cancel: Arc<AtomicBool>,
}

impl Engine {
  pub fn new(color: Color, max_depth: i32) -> Result<Self, GomokuError> {
    Self::with_threads(color, max_depth, None)
  }

  /// `num_threads` of `None` uses rayon's default (available parallelism). Exposed
  /// explicitly so determinism can be tested across different pool sizes.
  pub fn with_threads(color: Color, max_depth: i32, num_threads: Option<usize>) -> Result<Self, GomokuError> {
    if max_depth < 1 {
      return Err(GomokuError::InvalidConfiguration {
        reason: "max_depth must be at least 1",
      });
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = num_threads {
      builder = builder.num_threads(n);
    }
    let pool = builder.build().map_err(|_| GomokuError::InvalidConfiguration {
      reason: "failed to build search thread pool",
    })?;

    Ok(Self {
      color,
      max_depth,
      pool,
      cancel: Arc::new(AtomicBool::new(false)),
    })
  }

  pub fn color(&self) -> Color {
    self.color
  }

  pub fn set_color(&mut self, color: Color) {
    self.color = color;
  }

  pub fn set_max_depth(&mut self, max_depth: i32) -> Result<(), GomokuError> {
    if max_depth < 1 {
      return Err(GomokuError::InvalidConfiguration {
        reason: "max_depth must be at least 1",
      });
    }
    self.max_depth = max_depth;
    Ok(())
  }

  pub fn request_cancel(&self) {
    self.cancel.store(true, Ordering::Relaxed);
  }

  pub fn clear_cancel(&self) {
    self.cancel.store(false, Ordering::Relaxed);
  }

  fn is_cancelled(&self) -> bool {
    self.cancel.load(Ordering::Relaxed)
  }

  /// Picks a move for `self.color` to play on `board`. Returns [`BoardPosition::INVALID`]
  /// if there are no legal candidates (a full board) or the search is cancelled before a
  /// single root move is evaluated.
  pub fn get_best_move(&self, board: &Board) -> BoardPosition {
    if board.is_board_empty() {
      let center = (crate::board::BOARD_SIZE / 2) as i32;
      return BoardPosition::new(center, center);
    }

    if self.is_cancelled() {
      return BoardPosition::INVALID;
    }

    let candidates = ordered_candidates(board, self.color);
    if candidates.is_empty() {
      return BoardPosition::INVALID;
    }

    self.search_root(board, candidates)
  }

  fn search_root(&self, board: &Board, candidates: Vec<BoardPosition>) -> BoardPosition {
    let global_alpha = AtomicI32::new(i32::MIN / 2);
    let beta = i32::MAX / 2;
    let chunk_size = self.pool.current_num_threads().clamp(1, MAX_CHUNK_SIZE);

    let mut best_move = candidates[0];
    let mut best_score = i32::MIN / 2;

    for chunk in candidates.chunks(chunk_size) {
      if self.is_cancelled() {
        break;
      }

      let results: Vec<(BoardPosition, i32)> = self.pool.install(|| {
        chunk
          .par_iter()
          .map(|&pos| {
            let mut local = board.clone();
            local.make_move(pos);
            let alpha = global_alpha.load(Ordering::Relaxed);
            let score = self.minimax(&mut local, self.max_depth - 1, false, alpha, beta);
            (pos, score)
          })
          .collect()
      });

      for (pos, score) in results {
        if score > best_score {
          best_score = score;
          best_move = pos;
        }
        if score > global_alpha.load(Ordering::Relaxed) {
          global_alpha.store(score, Ordering::Relaxed);
        }
      }
    }

    tracing::debug!(row = best_move.row, col = best_move.col, score = best_score, "root move chosen");
    best_move
  }

  /// Classic bool-flag alpha-beta: `maximizing` tracks whether the side to move at this
  /// node is `self.color`, not a sign-flipped negamax convention.
  fn minimax(&self, board: &mut Board, depth: i32, maximizing: bool, mut alpha: i32, mut beta: i32) -> i32 {
    if self.is_cancelled() {
      return evaluate(board, self.color);
    }

    if let Some(winner) = board.winner() {
      return if winner == self.color { WIN_SENTINEL } else { -WIN_SENTINEL };
    }

    if depth == 0 || board.is_board_full() {
      return evaluate(board, self.color);
    }

    let mover = board.side_to_move();
    let candidates = ordered_candidates(board, mover);
    if candidates.is_empty() {
      return evaluate(board, self.color);
    }

    if maximizing {
      let mut value = -WIN_SENTINEL;
      for pos in candidates {
        board.make_move(pos);
        let score = self.minimax(board, depth - 1, false, alpha, beta);
        board.undo_move();
        value = value.max(score);
        alpha = alpha.max(value);
        if alpha >= beta {
          break;
        }
      }
      value
    } else {
      let mut value = WIN_SENTINEL;
      for pos in candidates {
        board.make_move(pos);
        let score = self.minimax(board, depth - 1, true, alpha, beta);
        board.undo_move();
        value = value.min(score);
        beta = beta.min(value);
        if alpha >= beta {
          break;
        }
      }
      value
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
  fn first_move_on_empty_board_is_center() {
    let board = Board::new();
    let engine = Engine::new(Color::Black, 3).unwrap();
    assert_eq!(engine.get_best_move(&board), pos(7, 7));
  }

  #[test]
  fn engine_takes_an_immediate_win() {
    let mut board = Board::new();
    board.make_move(pos(7, 3)); // Black
    board.make_move(pos(0, 0)); // White
    board.make_move(pos(7, 4)); // Black
    board.make_move(pos(0, 1)); // White
    board.make_move(pos(7, 5)); // Black
    board.make_move(pos(0, 2)); // White
    board.make_move(pos(7, 6)); // Black: open four, cols 3..=6
    board.make_move(pos(0, 3)); // White

    let engine = Engine::new(Color::Black, 3).unwrap();
    let chosen = engine.get_best_move(&board);
    assert!(chosen == pos(7, 7) || chosen == pos(7, 2));
  }

  #[test]
  fn engine_blocks_opponents_immediate_win() {
    let mut board = Board::new();
    board.make_move(pos(3, 7)); // Black (engine plays White here)
    board.make_move(pos(7, 3)); // White
    board.make_move(pos(3, 8)); // Black
    board.make_move(pos(7, 4)); // White
    board.make_move(pos(3, 9)); // Black
    board.make_move(pos(7, 5)); // White
    board.make_move(pos(3, 10)); // Black: open four, cols 7..=10

    let engine = Engine::new(Color::White, 3).unwrap();
    let chosen = engine.get_best_move(&board);
    assert!(chosen == pos(3, 11) || chosen == pos(3, 6));
  }

  #[test]
  fn search_is_deterministic_across_thread_pool_sizes() {
    let mut board = Board::new();
    board.make_move(pos(7, 7));
    board.make_move(pos(7, 8));
    board.make_move(pos(6, 6));

    let single = Engine::with_threads(Color::Black, 3, Some(1)).unwrap();
    let multi = Engine::with_threads(Color::Black, 3, Some(4)).unwrap();
    assert_eq!(single.get_best_move(&board), multi.get_best_move(&board));
  }

  #[test]
  fn cancellation_before_search_returns_invalid() {
    let mut board = Board::new();
    board.make_move(pos(7, 7));
    let engine = Engine::new(Color::White, 3).unwrap();
    engine.request_cancel();
    assert_eq!(engine.get_best_move(&board), BoardPosition::INVALID);
  }

  #[test]
  fn rejects_non_positive_depth() {
    assert!(Engine::new(Color::Black, 0).is_err());
  }
}
