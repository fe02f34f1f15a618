//! The 15x15 board: stone placement, undo, and the incrementally maintained candidate set.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::types::{BoardPosition, Cell, Color};

pub const BOARD_SIZE: usize = 15;
const CANDIDATE_RADIUS: i32 = 2;

/// What changed in the candidate set as a result of one move, enough to undo it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct CandidatesDelta {
  added: Vec<BoardPosition>,
  removed_from_set: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct MoveRecord {
  position: BoardPosition,
  placed_color: Color,
  candidates_delta: CandidatesDelta,
}

/// Dual representation of the candidate set: a bitmap for O(1) membership tests and a hash
/// set for cheap, order-independent iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
struct CandidateSet {
  bitmap: [[bool; BOARD_SIZE]; BOARD_SIZE],
  members: HashSet<BoardPosition>,
}

impl CandidateSet {
  fn new() -> Self {
    Self {
      bitmap: [[false; BOARD_SIZE]; BOARD_SIZE],
      members: HashSet::new(),
    }
  }

  fn contains(&self, pos: BoardPosition) -> bool {
    self.bitmap[pos.row as usize][pos.col as usize]
  }

  /// Inserts `pos`, returning whether it was newly added.
  fn insert(&mut self, pos: BoardPosition) -> bool {
    if self.bitmap[pos.row as usize][pos.col as usize] {
      return false;
    }
    self.bitmap[pos.row as usize][pos.col as usize] = true;
    self.members.insert(pos);
    true
  }

  fn remove(&mut self, pos: BoardPosition) {
    self.bitmap[pos.row as usize][pos.col as usize] = false;
    self.members.remove(&pos);
  }

  fn iter(&self) -> impl Iterator<Item = BoardPosition> + '_ {
    self.members.iter().copied()
  }
}

/// The authoritative, mutable game state: cells, side to move, move history, and candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
  cells: [Cell; BOARD_SIZE * BOARD_SIZE],
  side_to_move: Color,
  history: Vec<MoveRecord>,
  candidates: CandidateSet,
}

impl Default for Board {
  fn default() -> Self {
    Self::new()
  }
}

impl Board {
  pub fn new() -> Self {
    Self {
      cells: [Cell::Empty; BOARD_SIZE * BOARD_SIZE],
      side_to_move: Color::Black,
      history: Vec::new(),
      candidates: CandidateSet::new(),
    }
  }

  pub fn reset(&mut self) {
    *self = Self::new();
  }

  fn index(pos: BoardPosition) -> usize {
    pos.row as usize * BOARD_SIZE + pos.col as usize
  }

  /// Contents of `pos`. Out-of-bounds access is a programming fault, not a runtime error.
  pub fn cell(&self, pos: BoardPosition) -> Cell {
    debug_assert!(pos.is_in_bounds(), "cell() called with out-of-bounds position {pos:?}");
    self.cells[Self::index(pos)]
  }

  fn set_cell(&mut self, pos: BoardPosition, cell: Cell) {
    debug_assert!(pos.is_in_bounds(), "set_cell() called with out-of-bounds position {pos:?}");
    let idx = Self::index(pos);
    self.cells[idx] = cell;
  }

  pub fn is_valid_move(&self, pos: BoardPosition) -> bool {
    pos.is_in_bounds() && self.cell(pos) == Cell::Empty
  }

  pub fn side_to_move(&self) -> Color {
    self.side_to_move
  }

  pub fn move_count(&self) -> usize {
    self.history.len()
  }

  pub fn last_move(&self) -> Option<BoardPosition> {
    self.history.last().map(|record| record.position)
  }

  pub fn is_board_full(&self) -> bool {
    self.cells.iter().all(|&cell| cell != Cell::Empty)
  }

  pub fn is_board_empty(&self) -> bool {
    self.history.is_empty()
  }

  /// Empty cells within Chebyshev distance 2 of any stone. Iteration order is unspecified;
  /// callers that need determinism (the search) must sort before relying on it.
  pub fn candidate_moves(&self) -> impl Iterator<Item = BoardPosition> + '_ {
    self.candidates.iter()
  }

  /// Places a stone for the side to move. Returns the winning color if this completes
  /// five in a row. An illegal move (out of bounds or occupied) is a logged no-op.
  pub fn make_move(&mut self, pos: BoardPosition) -> Option<Color> {
    if !self.is_valid_move(pos) {
      tracing::warn!(row = pos.row, col = pos.col, "illegal move attempted; ignoring");
      return None;
    }

    let color = self.side_to_move;
    self.set_cell(pos, Cell::from(color));
    let delta = self.update_candidates_for_move(pos);
    self.history.push(MoveRecord {
      position: pos,
      placed_color: color,
      candidates_delta: delta,
    });
    self.side_to_move = color.other();

    let winner = self.winner();
    debug_assert!(
      self.candidate_set_is_consistent(),
      "candidate set invariant violated after make_move at {pos:?}"
    );
    winner
  }

  /// Undoes the last move, restoring the board, side-to-move, and candidate set exactly.
  pub fn undo_move(&mut self) {
    let Some(record) = self.history.pop() else {
      return;
    };
    self.set_cell(record.position, Cell::Empty);
    self.side_to_move = record.placed_color;

    for added in &record.candidates_delta.added {
      self.candidates.remove(*added);
    }
    if record.candidates_delta.removed_from_set {
      self.candidates.insert(record.position);
    }
    debug_assert!(
      self.candidate_set_is_consistent(),
      "candidate set invariant violated after undo_move"
    );
  }

  /// Winner through the last-placed stone only: four axes, not a full-board scan.
  pub fn winner(&self) -> Option<Color> {
    let record = self.history.last()?;
    self.winner_through(record.position, record.placed_color)
  }

  fn winner_through(&self, pos: BoardPosition, color: Color) -> Option<Color> {
    const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
    let target = Cell::from(color);

    for (dr, dc) in DIRECTIONS {
      let mut count = 1;
      count += self.count_matching(pos, dr, dc, target);
      count += self.count_matching(pos, -dr, -dc, target);
      if count >= 5 {
        return Some(color);
      }
    }
    None
  }

  fn count_matching(&self, from: BoardPosition, dr: i32, dc: i32, target: Cell) -> i32 {
    let mut count = 0;
    let mut cur = BoardPosition::new(from.row + dr, from.col + dc);
    while cur.is_in_bounds() && self.cell(cur) == target {
      count += 1;
      cur = BoardPosition::new(cur.row + dr, cur.col + dc);
    }
    count
  }

  fn update_candidates_for_move(&mut self, pos: BoardPosition) -> CandidatesDelta {
    let removed_from_set = self.candidates.contains(pos);
    self.candidates.remove(pos);

    let mut added = Vec::new();
    for dr in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
      for dc in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
        if dr == 0 && dc == 0 {
          continue;
        }
        let neighbor = BoardPosition::new(pos.row + dr, pos.col + dc);
        if !neighbor.is_in_bounds() || self.cell(neighbor) != Cell::Empty {
          continue;
        }
        if self.candidates.insert(neighbor) {
          added.push(neighbor);
        }
      }
    }

    CandidatesDelta { added, removed_from_set }
  }

  /// I1/I2 checked exhaustively. Only ever invoked from `debug_assert!`.
  fn candidate_set_is_consistent(&self) -> bool {
    for row in 0..BOARD_SIZE as i32 {
      for col in 0..BOARD_SIZE as i32 {
        let pos = BoardPosition::new(row, col);
        let should_be_candidate = self.cell(pos) == Cell::Empty && self.has_neighboring_stone(pos);
        if should_be_candidate != self.candidates.contains(pos) {
          return false;
        }
      }
    }
    true
  }

  fn has_neighboring_stone(&self, pos: BoardPosition) -> bool {
    for dr in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
      for dc in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
        if dr == 0 && dc == 0 {
          continue;
        }
        let neighbor = BoardPosition::new(pos.row + dr, pos.col + dc);
        if neighbor.is_in_bounds() && self.cell(neighbor) != Cell::Empty {
          return true;
        }
      }
    }
    false
  }
}

/// Manhattan distance from the board center, via a precomputed, process-wide table.
pub fn manhattan_to_center(pos: BoardPosition) -> i32 {
  static TABLE: OnceLock<[[i32; BOARD_SIZE]; BOARD_SIZE]> = OnceLock::new();
  let table = TABLE.get_or_init(|| {
    let center = (BOARD_SIZE / 2) as i32;
    let mut table = [[0; BOARD_SIZE]; BOARD_SIZE];
    for (row, row_slice) in table.iter_mut().enumerate() {
      for (col, distance) in row_slice.iter_mut().enumerate() {
        *distance = (center - row as i32).abs() + (center - col as i32).abs();
      }
    }
    table
  });
  table[pos.row as usize][pos.col as usize]
}


#[cfg(test)]
mod properties {
  use super::*;
  use proptest::prelude::*;

  fn raw_position() -> impl Strategy<Value = BoardPosition> {
    (0..BOARD_SIZE as i32, 0..BOARD_SIZE as i32).prop_map(|(row, col)| BoardPosition::new(row, col))
  }

  proptest! {
    // P1: after any legal sequence of moves, a cell is a candidate iff it is empty and has
    // a stone within Chebyshev distance 2.
    #[test]
    fn candidate_set_matches_its_definition(moves in proptest::collection::vec(raw_position(), 0..40)) {
      let mut board = Board::new();
      for pos in moves {
        board.make_move(pos);
      }
      for row in 0..BOARD_SIZE as i32 {
        for col in 0..BOARD_SIZE as i32 {
          let pos = BoardPosition::new(row, col);
          let expected = board.cell(pos) == Cell::Empty && board.has_neighboring_stone(pos);
          prop_assert_eq!(board.candidates.contains(pos), expected);
        }
      }
    }

    // P2: make_move then undo_move restores the exact prior board.
    #[test]
    fn make_then_undo_is_identity(moves in proptest::collection::vec(raw_position(), 0..40), extra in raw_position()) {
      let mut board = Board::new();
      for pos in moves {
        board.make_move(pos);
      }
      prop_assume!(board.is_valid_move(extra));
      let before = board.clone();
      board.make_move(extra);
      board.undo_move();
      prop_assert_eq!(board, before);
    }

    // P3: applying a sequence then undoing all of it yields the empty board.
    #[test]
    fn full_undo_restores_empty_board(moves in proptest::collection::vec(raw_position(), 0..40)) {
      let mut board = Board::new();
      for pos in moves {
        board.make_move(pos);
      }
      for _ in 0..board.move_count() {
        board.undo_move();
      }
      prop_assert!(board.is_board_empty());
      prop_assert_eq!(board.candidate_moves().count(), 0);
      prop_assert_eq!(board.side_to_move(), Color::Black);
    }

    // P4: make_move(p) returns Some(c) iff placing c at p completes five in a row through p.
    #[test]
    fn winner_return_matches_five_in_a_row(moves in proptest::collection::vec(raw_position(), 0..40), probe in raw_position()) {
      let mut board = Board::new();
      for pos in moves {
        if board.make_move(pos).is_some() {
          break;
        }
      }
      if board.is_valid_move(probe) {
        let mover = board.side_to_move();
        let result = board.make_move(probe);
        let has_five = board.winner_through(probe, mover).is_some();
        prop_assert_eq!(result, if has_five { Some(mover) } else { None });
      }
    }
  }
}
