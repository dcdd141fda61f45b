use std::{error::Error, io, path::PathBuf, process::ExitCode};

use chess88::{Game, MoveRequest};
use clap::{Parser, Subcommand};
use log::{LevelFilter, error, info};

use logging::init_logging;
use repl::{Command, parse_command, run_repl};

mod logging;
mod repl;

#[derive(Parser, Debug)]
#[command(version, about = "Pawn and knight move engine on a 0x88 board")]
struct Cli {
    /// off, error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Print the moves available to the side to move
    Moves {
        #[arg(long)]
        fen: Option<String>,
    },
    /// Apply moves like e2e3 in order and print the resulting position
    Play {
        #[arg(long)]
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// Count leaf nodes of the move tree
    Perft {
        #[arg(long)]
        depth: u8,
        #[arg(long)]
        fen: Option<String>,
    },
    /// Read commands from stdin. This is the default.
    Repl {
        #[arg(long)]
        fen: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level, cli.log_file.as_deref()) {
        eprintln!("Failed to set up logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli.command.unwrap_or(Action::Repl { fen: None })) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(action: Action) -> Result<(), Box<dyn Error>> {
    match action {
        Action::Moves { fen } => {
            let game = Game::new(fen.as_deref())?;
            for r#move in game.moves() {
                println!("{}", r#move);
            }
        }
        Action::Play { fen, moves } => {
            let mut game = Game::new(fen.as_deref())?;
            for text in moves {
                let Some(Command::Move(request)) = parse_command(&text) else {
                    return Err(format!("'{text}' is not a move").into());
                };
                apply(&mut game, &request)?;
            }
            println!("{}", game.fen());
        }
        Action::Perft { depth, fen } => {
            let game = Game::new(fen.as_deref())?;
            println!("{}", game.perft(depth));
        }
        Action::Repl { fen } => {
            let mut game = Game::new(fen.as_deref())?;
            info!("Starting from {}", game.fen());
            run_repl(&mut game, io::stdin().lock(), io::stdout().lock())?;
        }
    }

    Ok(())
}

fn apply(game: &mut Game, request: &MoveRequest) -> Result<(), Box<dyn Error>> {
    match game.try_move(request)? {
        Some(_) => Ok(()),
        None => Err(format!("{}{} is not a legal move in {}", request.from, request.to, game.fen()).into()),
    }
}
