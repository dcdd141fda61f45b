use std::fmt::{Display, Formatter};

/// Failures the engine reports to its caller. Rejected moves are not errors, see `Game::try_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// An algebraic coordinate like "e4" could not be parsed. Holds the offending input.
    InvalidCoordinate(String),
    /// A position description broke the layout or field rules. Holds a description of the problem.
    MalformedPosition(String),
}

impl Display for ChessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ChessError::InvalidCoordinate(coord) => write!(f, "invalid coordinate '{coord}'"),
            ChessError::MalformedPosition(msg) => write!(f, "malformed position: {msg}"),
        }
    }
}

impl std::error::Error for ChessError {}
