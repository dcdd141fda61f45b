use log::trace;

use crate::{
    board::{
        Board, CASTLE_BLACK_KING_FLAG, CASTLE_BLACK_QUEEN_FLAG, CASTLE_WHITE_KING_FLAG, CASTLE_WHITE_QUEEN_FLAG, Color,
        Piece, PieceKind,
    },
    error::ChessError,
    square::{from_file_rank, rank_of, to_coordinate, to_index, valid_squares},
};

pub static STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const CASTLING_CHARS: [(u8, char); 4] = [
    (CASTLE_WHITE_KING_FLAG, 'K'),
    (CASTLE_WHITE_QUEEN_FLAG, 'Q'),
    (CASTLE_BLACK_KING_FLAG, 'k'),
    (CASTLE_BLACK_QUEEN_FLAG, 'q'),
];

fn malformed(msg: String) -> ChessError {
    ChessError::MalformedPosition(msg)
}

impl Board {
    /// Piece placement and side to move are required. Castling, en passant and the two clocks
    /// keep their `Board::default` values when left off.
    pub fn from_fen(fen: &str) -> Result<Board, ChessError> {
        let fen_pieces: Vec<&str> = fen.split_whitespace().collect();
        if fen_pieces.len() < 2 || fen_pieces.len() > 6 {
            return Err(malformed(format!(
                "Expected 2 to 6 whitespace-delimited fields but there were {}",
                fen_pieces.len()
            )));
        }

        let mut board = Board::default();
        parse_placement(&mut board, fen_pieces[0])?;

        board.side_to_move = match fen_pieces[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(malformed(format!("Encountered unexpected side to move value '{other}'"))),
        };

        if let Some(castling) = fen_pieces.get(2) {
            board.castling_rights = parse_castling_rights(castling)?;
        }

        if let Some(&ep) = fen_pieces.get(3) {
            if ep != "-" {
                let ep_index = to_index(ep)
                    .map_err(|_| malformed(format!("Encountered unexpected en passant target square '{ep}'")))?;
                let rank = rank_of(ep_index);
                if rank != 3 && rank != 6 {
                    return Err(malformed(format!(
                        "Expected en passant target square to be on rank 3 or 6 but it was '{ep}'"
                    )));
                }
                board.en_passant_target_square_index = Some(ep_index);
            }
        }

        if let Some(hmc) = fen_pieces.get(4) {
            board.halfmove_clock = hmc.parse::<u16>().map_err(|e| {
                malformed(format!("Encountered error while parsing halfmove clock value '{hmc}': {e}"))
            })?;
        }

        if let Some(fmc) = fen_pieces.get(5) {
            board.fullmove_counter = fmc.parse::<u16>().map_err(|e| {
                malformed(format!("Encountered error while parsing fullmove counter value '{fmc}': {e}"))
            })?;
            if board.fullmove_counter == 0 {
                return Err(malformed(String::from("Fullmove counter must start at 1")));
            }
        }

        trace!("Loaded position {fen}");
        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut result = String::new();
        let mut empty_run = 0;

        for (n, i) in valid_squares().enumerate() {
            match self.piece_at(i) {
                Some(piece) => {
                    if empty_run > 0 {
                        result.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    result.push(piece.to_name());
                }
                None => empty_run += 1,
            }

            if n % 8 == 7 {
                if empty_run > 0 {
                    result.push_str(&empty_run.to_string());
                    empty_run = 0;
                }
                if n != 63 {
                    result.push('/');
                }
            }
        }

        result.push(' ');
        result.push(self.side_to_move.to_char());

        result.push(' ');
        if self.castling_rights == 0 {
            result.push('-');
        } else {
            for (flag, c) in CASTLING_CHARS {
                if self.castling_rights & flag != 0 {
                    result.push(c);
                }
            }
        }

        result.push(' ');
        match self.en_passant_target_square_index {
            Some(ep) => result.push_str(&to_coordinate(ep)),
            None => result.push('-'),
        }

        format!("{result} {} {}", self.halfmove_clock, self.fullmove_counter)
    }
}

fn parse_placement(board: &mut Board, placement: &str) -> Result<(), ChessError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(malformed(format!(
            "Expected piece placement to have 8 ranks but it had {}",
            ranks.len()
        )));
    }

    for (row, rank_str) in ranks.iter().enumerate() {
        let rank = 8 - row as u8;
        let mut file: u8 = 0;

        for c in rank_str.chars() {
            let width = match c {
                '1'..='8' => c as u8 - b'0',
                _ => {
                    let piece = Piece::from_name(c).ok_or_else(|| {
                        malformed(format!("Encountered unexpected character '{c}' while processing rank {rank}"))
                    })?;
                    if file < 8 {
                        let square_index = from_file_rank(file, rank);
                        board.place(piece, square_index);
                        if piece.kind == PieceKind::King {
                            board.king_squares[piece.color.index()] = Some(square_index);
                        }
                    }
                    1
                }
            };

            file += width;
            if file > 8 {
                return Err(malformed(format!("Rank {rank} '{rank_str}' describes more than 8 files")));
            }
        }

        if file != 8 {
            return Err(malformed(format!(
                "Rank {rank} '{rank_str}' describes {file} files instead of 8"
            )));
        }
    }

    Ok(())
}

fn parse_castling_rights(castling: &str) -> Result<u8, ChessError> {
    if castling == "-" {
        return Ok(0);
    }

    let mut rights = 0;
    for c in castling.chars() {
        let flag = CASTLING_CHARS
            .iter()
            .find(|(_, name)| *name == c)
            .map(|(flag, _)| *flag)
            .ok_or_else(|| {
                malformed(format!("Encountered unexpected character '{c}' while processing castling rights"))
            })?;
        rights |= flag;
    }

    Ok(rights)
}
