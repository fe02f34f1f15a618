//! Heuristic position scoring: weighted sequence counts plus a small center-bias term.
//!
//! The sequence-score table and composition formula are load-bearing constants, not style
//! choices — they are cross-checked against the original engine's scoring function and must
//! not be "simplified" without re-deriving them.

use crate::analyzer::scan_runs;
use crate::board::{manhattan_to_center, Board, BOARD_SIZE};
use crate::types::{BoardPosition, Cell, Color};

/// Points awarded for one run of `length` stones (clamped to 5) with `open_sides` open ends.
fn sequence_score(length: i32, open_sides: i32) -> i32 {
  match (length, open_sides) {
    (1, 0) => 1,
    (1, 1) => 5,
    (1, 2) => 20,
    (2, 0) => 10,
    (2, 1) => 60,
    (2, 2) => 200,
    (3, 0) => 50,
    (3, 1) => 400,
    (3, 2) => 2000,
    (4, 0) => 300,
    (4, 1) => 10000,
    (4, 2) => 50000,
    (_, _) if length >= 5 => 1_000_000,
    _ => 0,
  }
}

/// Aggregate counts and total score for one color's runs on a board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceSummary {
  pub score: i32,
  pub open_threes: i32,
  pub semi_open_threes: i32,
  pub open_fours: i32,
  pub semi_open_fours: i32,
}

/// Scans every run of `color`'s stones and tallies the score and named threat counts.
pub fn summarize(board: &Board, color: Color) -> SequenceSummary {
  let mut summary = SequenceSummary::default();

  for run in scan_runs(board, color) {
    summary.score += sequence_score(run.length.min(5), run.open_sides);

    match run.length {
      3 if run.open_sides == 2 => summary.open_threes += 1,
      3 if run.open_sides == 1 => summary.semi_open_threes += 1,
      4 if run.open_sides == 1 => summary.semi_open_fours += 1,
      4 if run.open_sides == 2 => summary.open_fours += 1,
      length if length >= 5 && run.open_sides >= 1 => summary.open_fours += 1,
      _ => {}
    }
  }

  summary
}

/// `Σ max(1, 15 - manhattan_to_center(pos))` over every stone of `color`.
fn center_bias(board: &Board, color: Color) -> i32 {
  let target = Cell::from(color);
  let mut bias = 0;

  for row in 0..BOARD_SIZE as i32 {
    for col in 0..BOARD_SIZE as i32 {
      let pos = BoardPosition::new(row, col);
      if board.cell(pos) == target {
        bias += (15 - manhattan_to_center(pos)).max(1);
      }
    }
  }
  bias
}

/// Static evaluation of `board` from `player`'s perspective: positive favors `player`.
///
/// A player with any open-fours-class run (length >= 5 with an open side) short-circuits
/// to a fixed "virtually won" score rather than the weighted sum; an opposing one
/// short-circuits to the mirrored loss score. Otherwise the weighted sequence-score
/// difference is adjusted by threat-count and center-control bonuses.
pub fn evaluate(board: &Board, player: Color) -> i32 {
  let opponent = player.other();
  let p = summarize(board, player);
  let o = summarize(board, opponent);

  if p.open_fours > 0 {
    return 400_000 + 2_000 * p.open_fours;
  }
  if o.open_fours > 0 {
    return -400_000 - 2_000 * o.open_fours;
  }

  let mut score = p.score - o.score;
  score += 15_000 * (p.open_threes - o.open_threes);
  if p.open_threes >= 2 {
    score += 60_000;
  }
  if o.open_threes >= 2 {
    score -= 60_000;
  }
  score += 4_000 * (p.semi_open_threes - o.semi_open_threes);
  score += 20_000 * (p.semi_open_fours - o.semi_open_fours);
  score += 2 * (center_bias(board, player) - center_bias(board, opponent));
  score
}
