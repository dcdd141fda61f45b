use std::{
    io::{self, BufRead, Write},
    sync::LazyLock,
};

use chess88::{Game, MoveRequest};
use log::{debug, error};
use regex::Regex;

static MOVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-h][1-8])-?([a-h][1-8])([nbrqNBRQ])?$").expect("move pattern is valid"));

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Move(MoveRequest),
    Undo,
    Fen,
    Turn,
    Moves,
    Status,
    Board,
    Load(String),
    Help,
    Quit,
}

/// Accepts `e2e3`, `e2-e3` and an optional trailing promotion letter for moves.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();

    if let Some(captures) = MOVE_PATTERN.captures(line) {
        return Some(Command::Move(MoveRequest {
            from: captures[1].to_string(),
            to: captures[2].to_string(),
            promotion: captures.get(3).and_then(|m| m.as_str().chars().next()),
        }));
    }

    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match word {
        "undo" => Some(Command::Undo),
        "fen" => Some(Command::Fen),
        "turn" => Some(Command::Turn),
        "moves" => Some(Command::Moves),
        "status" => Some(Command::Status),
        "board" | "d" => Some(Command::Board),
        "load" | "position" if !rest.trim().is_empty() => Some(Command::Load(rest.trim().to_string())),
        "help" | "?" => Some(Command::Help),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

pub fn status(game: &Game) -> &'static str {
    if game.in_checkmate() {
        "checkmate"
    } else if game.in_draw() {
        "draw"
    } else if game.game_over() {
        "king captured"
    } else if game.in_check() {
        "check"
    } else {
        "in progress"
    }
}

/// Runs until `quit` or end of input. Rejected moves print `illegal` and leave the game untouched.
pub fn run_repl(game: &mut Game, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        debug!("Received command '{line}'");
        let Some(command) = parse_command(&line) else {
            writeln!(output, "unknown command '{}', try 'help'", line.trim())?;
            continue;
        };

        match command {
            Command::Move(request) => match game.try_move(&request) {
                Ok(Some(r#move)) => writeln!(output, "{}", r#move)?,
                Ok(None) => writeln!(output, "illegal")?,
                Err(e) => {
                    error!("{e}");
                    writeln!(output, "error: {e}")?
                }
            },
            Command::Undo => match game.undo() {
                Some(r#move) => writeln!(output, "undid {}", r#move)?,
                None => writeln!(output, "nothing to undo")?,
            },
            Command::Fen => writeln!(output, "{}", game.fen())?,
            Command::Turn => writeln!(output, "{}", game.turn().to_char())?,
            Command::Moves => {
                let moves: Vec<String> = game.moves().iter().map(ToString::to_string).collect();
                writeln!(output, "{}", moves.join(" "))?
            }
            Command::Status => writeln!(output, "{}", status(game))?,
            Command::Board => write!(output, "{}", game.board().pretty_print())?,
            Command::Load(fen) => match game.load(&fen) {
                Ok(()) => writeln!(output, "{}", game.fen())?,
                Err(e) => writeln!(output, "error: {e}")?,
            },
            Command::Help => writeln!(
                output,
                "commands: <from><to> (e.g. e2e3), undo, fen, turn, moves, status, board, load <fen>, quit"
            )?,
            Command::Quit => break,
        }
    }

    Ok(())
}
