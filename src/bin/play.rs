//! Text-mode demo: play Gomoku against the engine over stdin/stdout.

use std::io::{self, Write};

use clap::Parser;
use gomoku_engine::{BoardPosition, Cell, Color, GameManager};

#[derive(Parser, Debug)]
#[command(about = "Play Gomoku against the engine from the terminal")]
struct Args {
  /// Color the human plays: "black" or "white". Black always moves first.
  #[arg(long, default_value = "black")]
  human_color: String,

  /// Search depth for the engine's alpha-beta search.
  #[arg(long, default_value_t = 7)]
  depth: i32,
}

fn main() {
  tracing_subscriber::fmt::init();

  let args = Args::parse();
  let human_color = match args.human_color.to_lowercase().as_str() {
    "black" => Color::Black,
    "white" => Color::White,
    other => {
      eprintln!("unrecognized --human-color {other:?}, expected \"black\" or \"white\"");
      std::process::exit(1);
    }
  };

  let mut manager = match GameManager::new(human_color, args.depth) {
    Ok(manager) => manager,
    Err(err) => {
      eprintln!("failed to start engine: {err}");
      std::process::exit(1);
    }
  };

  println!("Playing as {human_color:?}. Enter moves as \"row col\" (0-indexed).");

  loop {
    print_board(&manager);

    if manager.is_game_over() {
      match manager.winner() {
        Some(gomoku_engine::GameResult::Win(color)) => println!("{color:?} wins."),
        Some(gomoku_engine::GameResult::Draw) => println!("Draw."),
        None => unreachable!("is_game_over implies a result"),
      }
      break;
    }

    if manager.is_ai_turn() {
      match manager.play_ai_move() {
        Ok(result) if result.applied => {
          println!("Engine plays ({}, {}).", result.position.row, result.position.col);
        }
        Ok(_) => println!("Engine found no move to play."),
        Err(err) => {
          eprintln!("engine move failed: {err}");
          break;
        }
      }
      continue;
    }

    print!("Your move > ");
    io::stdout().flush().ok();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).unwrap_or(0) == 0 {
      break;
    }
    let Some(pos) = parse_move(&line) else {
      println!("Couldn't parse that move; expected two numbers, e.g. \"7 7\".");
      continue;
    };

    match manager.play_human_move(pos) {
      Ok(result) if result.applied => {}
      Ok(_) => println!("That cell is occupied or off the board."),
      Err(err) => println!("Move rejected: {err}"),
    }
  }
}

fn parse_move(line: &str) -> Option<BoardPosition> {
  let mut parts = line.split_whitespace();
  let row: i32 = parts.next()?.parse().ok()?;
  let col: i32 = parts.next()?.parse().ok()?;
  Some(BoardPosition::new(row, col))
}

fn print_board(manager: &GameManager) {
  let board = manager.board();
  for row in 0..gomoku_engine::BOARD_SIZE as i32 {
    for col in 0..gomoku_engine::BOARD_SIZE as i32 {
      let symbol = match board.cell(BoardPosition::new(row, col)) {
        Cell::Empty => '.',
        Cell::Black => 'X',
        Cell::White => 'O',
      };
      print!("{symbol} ");
    }
    println!();
  }
}
