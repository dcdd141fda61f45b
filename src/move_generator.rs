use log::trace;

use crate::{
    board::{Board, Color, PieceKind},
    moves::Move,
    square::{is_on_board, valid_squares},
};

/// 0x88 offsets in the order knight moves are generated
pub const KNIGHT_OFFSETS: [isize; 8] = [-33, -31, -18, -14, 14, 18, 31, 33];
const BISHOP_OFFSETS: [isize; 4] = [-17, -15, 15, 17];
const ROOK_OFFSETS: [isize; 4] = [-16, -1, 1, 16];
const KING_OFFSETS: [isize; 8] = [-17, -16, -15, -1, 1, 15, 16, 17];

/// Rank direction a pawn of this color advances in
#[inline]
fn pawn_push_offset(color: Color) -> isize {
    match color {
        Color::White => -16,
        Color::Black => 16,
    }
}

/// Only pawn single pushes and knight moves are generated. Moves are pseudo legal: they may leave the
/// mover's king attacked. Ordered by board scan (a8 to h1) and then by `KNIGHT_OFFSETS`.
pub fn generate_moves(board: &Board) -> Vec<Move> {
    let mut result = Vec::new();
    let us = board.side_to_move;

    for i in valid_squares() {
        let Some(piece) = board.piece_at(i) else {
            continue;
        };
        if piece.color != us {
            continue;
        }

        match piece.kind {
            PieceKind::Pawn => {
                let to = i as isize + pawn_push_offset(us);
                if is_on_board(to) && board.piece_at(to as u8).is_none() {
                    result.push(Move::new(i, to as u8, PieceKind::Pawn, None));
                }
            }
            PieceKind::Knight => {
                for offset in KNIGHT_OFFSETS {
                    let to = i as isize + offset;
                    if !is_on_board(to) {
                        continue;
                    }

                    let target = board.piece_at(to as u8);
                    match target {
                        Some(target_piece) if target_piece.color == us => {}
                        _ => result.push(Move::new(i, to as u8, PieceKind::Knight, target)),
                    }
                }
            }
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen | PieceKind::King => {}
        }
    }

    trace!("Generated {} moves for {:?}", result.len(), us);
    result
}

/// Full attack geometry for every piece kind, independent of what `generate_moves` supports.
pub fn is_square_attacked(board: &Board, square_index: u8, by: Color) -> bool {
    let target = square_index as isize;

    // A pawn attacks diagonally forward, so look one rank behind the target from the attacker's view
    let pawn_origin = target - pawn_push_offset(by);
    for side in [-1, 1] {
        if attacker_at(board, pawn_origin + side, by, |kind| kind == PieceKind::Pawn) {
            return true;
        }
    }

    for offset in KNIGHT_OFFSETS {
        if attacker_at(board, target + offset, by, |kind| kind == PieceKind::Knight) {
            return true;
        }
    }

    for offset in KING_OFFSETS {
        if attacker_at(board, target + offset, by, |kind| kind == PieceKind::King) {
            return true;
        }
    }

    let diagonal = |kind: PieceKind| kind == PieceKind::Bishop || kind == PieceKind::Queen;
    let straight = |kind: PieceKind| kind == PieceKind::Rook || kind == PieceKind::Queen;
    BISHOP_OFFSETS
        .iter()
        .any(|&offset| slider_attacks(board, target, offset, by, diagonal))
        || ROOK_OFFSETS
            .iter()
            .any(|&offset| slider_attacks(board, target, offset, by, straight))
}

/// A side without a king on the board is never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(king) => is_square_attacked(board, king, color.opposite()),
        None => false,
    }
}

#[inline]
fn attacker_at(board: &Board, index: isize, by: Color, is_kind: impl Fn(PieceKind) -> bool) -> bool {
    if !is_on_board(index) {
        return false;
    }

    match board.piece_at(index as u8) {
        Some(piece) => piece.color == by && is_kind(piece.kind),
        None => false,
    }
}

fn slider_attacks(board: &Board, target: isize, offset: isize, by: Color, is_kind: impl Fn(PieceKind) -> bool) -> bool {
    let mut cur_pos = target;
    loop {
        cur_pos += offset;
        if !is_on_board(cur_pos) {
            return false;
        }

        if let Some(piece) = board.piece_at(cur_pos as u8) {
            return piece.color == by && is_kind(piece.kind);
        }
    }
}
