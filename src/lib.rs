//! Position tracking and move execution on a 0x88 board.
//!
//! Only pawn single pushes and knight moves are generated. Everything else a UI needs (turn, piece lookup,
//! position strings, undo and game status) is on [`Game`].

pub mod board;
pub mod error;
pub mod fen;
pub mod game;
pub mod move_generator;
pub mod moves;
pub mod perft;
pub mod square;

pub use board::{Board, Color, Piece, PieceKind};
pub use error::ChessError;
pub use fen::STARTING_FEN;
pub use game::{Game, MoveRequest};
pub use moves::Move;
