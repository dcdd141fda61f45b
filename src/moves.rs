use std::fmt::Display;

use crate::{
    board::{
        Board, CASTLE_BLACK_KING_FLAG, CASTLE_BLACK_QUEEN_FLAG, CASTLE_WHITE_KING_FLAG, CASTLE_WHITE_QUEEN_FLAG, Color,
        Piece, PieceKind,
    },
    square::to_coordinate,
};

/// Home squares of the pieces that carry castling rights, with the rights lost when they leave or are captured
const CASTLING_HOME_SQUARES: [(u8, u8); 6] = [
    (0x74, CASTLE_WHITE_KING_FLAG | CASTLE_WHITE_QUEEN_FLAG), // e1
    (0x70, CASTLE_WHITE_QUEEN_FLAG),                          // a1
    (0x77, CASTLE_WHITE_KING_FLAG),                           // h1
    (0x04, CASTLE_BLACK_KING_FLAG | CASTLE_BLACK_QUEEN_FLAG), // e8
    (0x00, CASTLE_BLACK_QUEEN_FLAG),                          // a8
    (0x07, CASTLE_BLACK_KING_FLAG),                           // h8
];

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct Move {
    pub from: u8,
    pub to: u8,
    pub piece: PieceKind,
    /// Whatever stood on `to` before the move
    pub captured: Option<Piece>,
}

impl Move {
    pub fn new(from: u8, to: u8, piece: PieceKind, captured: Option<Piece>) -> Move {
        Move {
            from,
            to,
            piece,
            captured,
        }
    }

    pub fn from_coordinate(&self) -> String {
        to_coordinate(self.from)
    }

    pub fn to_coordinate(&self) -> String {
        to_coordinate(self.to)
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn simple_long_algebraic_notation(&self) -> String {
        format!("{}{}", self.from_coordinate(), self.to_coordinate())
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.simple_long_algebraic_notation())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MoveRollback {
    pub captured_pieces: Vec<Option<Piece>>,
    pub ep_index: Vec<Option<u8>>,
    pub castling_rights: Vec<u8>,
    pub halfmove_clocks: Vec<u16>,
    pub fullmove_counters: Vec<u16>,
}

impl MoveRollback {
    pub fn is_empty(&self) -> bool {
        self.captured_pieces.is_empty()
            && self.ep_index.is_empty()
            && self.castling_rights.is_empty()
            && self.halfmove_clocks.is_empty()
            && self.fullmove_counters.is_empty()
    }
}

impl Board {
    /// `move` must come from `generate_moves` on this board. There is no legality check here.
    pub fn make_move(&mut self, r#move: &Move, rollback: &mut MoveRollback) {
        let mover = self.side_to_move;

        rollback.ep_index.push(self.en_passant_target_square_index);
        rollback.castling_rights.push(self.castling_rights);
        rollback.halfmove_clocks.push(self.halfmove_clock);
        rollback.fullmove_counters.push(self.fullmove_counter);

        let moved_piece = self.remove(r#move.from).unwrap_or(Piece::new(r#move.piece, mover));
        let captured_piece = self.piece_at(r#move.to);
        debug_assert_eq!(captured_piece, r#move.captured);
        rollback.captured_pieces.push(captured_piece);
        self.place(moved_piece, r#move.to);

        if moved_piece.kind == PieceKind::King {
            self.king_squares[mover.index()] = Some(r#move.to);
        }
        if let Some(captured) = captured_piece {
            if captured.kind == PieceKind::King {
                self.king_squares[captured.color.index()] = None;
            }
        }

        if self.castling_rights != 0 {
            for (square, flags) in CASTLING_HOME_SQUARES {
                if r#move.from == square || r#move.to == square {
                    self.castling_rights &= !flags;
                }
            }
        }

        self.en_passant_target_square_index = None;

        if captured_piece.is_some() || moved_piece.kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if mover == Color::Black {
            self.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }
        self.side_to_move = mover.opposite();
    }

    /// Must be given the same move and rollback that the matching `make_move` used.
    pub fn unmake_move(&mut self, r#move: &Move, rollback: &mut MoveRollback) {
        let mover = self.side_to_move.opposite();

        let moved_piece = self.remove(r#move.to).unwrap_or(Piece::new(r#move.piece, mover));
        self.place(moved_piece, r#move.from);

        let captured_piece = rollback.captured_pieces.pop().flatten();
        if let Some(captured) = captured_piece {
            self.place(captured, r#move.to);
            if captured.kind == PieceKind::King {
                self.king_squares[captured.color.index()] = Some(r#move.to);
            }
        }

        if moved_piece.kind == PieceKind::King {
            self.king_squares[mover.index()] = Some(r#move.from);
        }

        if let Some(ep) = rollback.ep_index.pop() {
            self.en_passant_target_square_index = ep;
        }
        if let Some(castling_rights) = rollback.castling_rights.pop() {
            self.castling_rights = castling_rights;
        }
        if let Some(halfmove_clock) = rollback.halfmove_clocks.pop() {
            self.halfmove_clock = halfmove_clock;
        }
        if let Some(fullmove_counter) = rollback.fullmove_counters.pop() {
            self.fullmove_counter = fullmove_counter;
        }

        self.side_to_move = mover;
    }
}
