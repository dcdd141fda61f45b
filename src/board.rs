use std::fmt::Debug;

use crate::square::{BOARD_ARRAY_SIZE, is_on_board, valid_squares};

pub const CASTLE_WHITE_KING_FLAG: u8 = 1;
pub const CASTLE_WHITE_QUEEN_FLAG: u8 = 1 << 1;
pub const CASTLE_BLACK_KING_FLAG: u8 = 1 << 2;
pub const CASTLE_BLACK_QUEEN_FLAG: u8 = 1 << 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 'w' or 'b', as written in a position description
    pub fn to_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }

    /// Uppercase for white, lowercase for black
    pub fn to_name(self) -> char {
        let name = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        match self.color {
            Color::White => name.to_ascii_uppercase(),
            Color::Black => name,
        }
    }

    pub fn from_name(name: char) -> Option<Piece> {
        let kind = match name.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        let color = if name.is_ascii_uppercase() { Color::White } else { Color::Black };

        Some(Piece { kind, color })
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; BOARD_ARRAY_SIZE],
    pub side_to_move: Color,
    pub castling_rights: u8,
    pub en_passant_target_square_index: Option<u8>,
    pub halfmove_clock: u16,
    pub fullmove_counter: u16,
    /// Indexed by `Color::index`. None until a king is placed, or after one is captured.
    pub king_squares: [Option<u8>; 2],
}

impl Board {
    pub fn clear(&mut self) {
        *self = Board::default();
    }

    /// Overwrites whatever is on `square_index`. Keeping `king_squares` current is up to the caller.
    #[inline]
    pub fn place(&mut self, piece: Piece, square_index: u8) {
        debug_assert!(is_on_board(square_index as isize));
        self.squares[square_index as usize] = Some(piece);
    }

    #[inline]
    pub fn remove(&mut self, square_index: u8) -> Option<Piece> {
        debug_assert!(is_on_board(square_index as isize));
        self.squares[square_index as usize].take()
    }

    #[inline]
    pub fn piece_at(&self, square_index: u8) -> Option<Piece> {
        self.squares[square_index as usize]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<u8> {
        self.king_squares[color.index()]
    }

    /// Occupied squares in board-scan order
    pub fn pieces(&self) -> impl Iterator<Item = (u8, Piece)> + '_ {
        valid_squares().filter_map(|i| self.piece_at(i).map(|p| (i, p)))
    }

    pub fn pretty_print(&self) -> String {
        let mut result = String::new();
        for (n, i) in valid_squares().enumerate() {
            result.push(self.piece_at(i).map_or('.', Piece::to_name));
            if n % 8 == 7 {
                result.push('\n');
            } else {
                result.push(' ');
            }
        }

        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            squares: [None; BOARD_ARRAY_SIZE],
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_target_square_index: None,
            halfmove_clock: 0,
            fullmove_counter: 1,
            king_squares: [None; 2],
        }
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("squares", &"See end value")
            .field("side_to_move", &self.side_to_move)
            .field("castling_rights", &self.castling_rights)
            .field("en_passant_target_square_index", &self.en_passant_target_square_index)
            .field("halfmove_clock", &self.halfmove_clock)
            .field("fullmove_counter", &self.fullmove_counter)
            .field("king_squares", &self.king_squares)
            .finish()?;

        // a8 is printed first so it reads like viewing the board as white
        writeln!(f, "\nsquares: \n{}", self.pretty_print())
    }
}

#[cfg(test)]
mod board_tests {
    use super::*;
    use crate::square::to_index;

    #[test]
    pub fn place_overwrites_without_touching_king_cache() {
        let mut board = Board::default();
        let e1 = to_index("e1").unwrap();

        board.place(Piece::new(PieceKind::Rook, Color::White), e1);
        board.place(Piece::new(PieceKind::King, Color::White), e1);

        assert_eq!(Some(Piece::new(PieceKind::King, Color::White)), board.piece_at(e1));
        assert_eq!(None, board.king_square(Color::White));
    }

    #[test]
    pub fn clear_resets_all_state() {
        let mut board = Board::default();
        board.place(Piece::new(PieceKind::Queen, Color::Black), 0x33);
        board.side_to_move = Color::Black;
        board.castling_rights = CASTLE_WHITE_KING_FLAG | CASTLE_BLACK_QUEEN_FLAG;
        board.en_passant_target_square_index = Some(0x25);
        board.halfmove_clock = 12;
        board.fullmove_counter = 40;
        board.king_squares = [Some(0x74), Some(0x04)];

        board.clear();

        assert_eq!(Board::default(), board);
        assert_eq!(0, board.pieces().count());
        assert_eq!(Color::White, board.side_to_move);
        assert_eq!(1, board.fullmove_counter);
    }

    #[test]
    pub fn remove_returns_previous_occupant() {
        let mut board = Board::default();
        let knight = Piece::new(PieceKind::Knight, Color::White);
        board.place(knight, 0x71);

        assert_eq!(Some(knight), board.remove(0x71));
        assert_eq!(None, board.remove(0x71));
    }

    #[test]
    pub fn piece_names_round_trip() {
        for name in "pnbrqkPNBRQK".chars() {
            assert_eq!(name, Piece::from_name(name).unwrap().to_name());
        }
        assert_eq!(None, Piece::from_name('x'));
        assert_eq!(None, Piece::from_name('1'));
    }
}
