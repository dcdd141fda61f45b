use crate::error::ChessError;

/// Mask that is non-zero for every index in the right-hand padding or past the last rank.
pub const OFF_BOARD_MASK: isize = 0x88;
pub const BOARD_ARRAY_SIZE: usize = 128;

const FILE_NAMES: &[u8; 8] = b"abcdefgh";

#[inline]
pub fn is_on_board(index: isize) -> bool {
    index >= 0 && index < BOARD_ARRAY_SIZE as isize && index & OFF_BOARD_MASK == 0
}

/// 0 = a-file, 7 = h-file
#[inline]
pub fn file_of(index: u8) -> u8 {
    index & 15
}

/// 1 = first rank, 8 = eighth rank
#[inline]
pub fn rank_of(index: u8) -> u8 {
    8 - (index >> 4)
}

/// `file` is 0..8, `rank` is 1..=8
#[inline]
pub fn from_file_rank(file: u8, rank: u8) -> u8 {
    ((8 - rank) << 4) | file
}

/// The 64 real squares in board-scan order: a8..h8, a7..h7, down to a1..h1.
pub fn valid_squares() -> impl Iterator<Item = u8> {
    (0..BOARD_ARRAY_SIZE as u8).filter(|i| i & 0x88 == 0)
}

pub fn to_index(coord: &str) -> Result<u8, ChessError> {
    let bytes = coord.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidCoordinate(coord.to_string()));
    }

    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidCoordinate(coord.to_string()));
    }

    Ok(from_file_rank(file - b'a', rank - b'0'))
}

/// Callers must only pass indices that pass the off-board test.
pub fn to_coordinate(index: u8) -> String {
    debug_assert!(is_on_board(index as isize), "{index:#04x} is not a board square");

    format!("{}{}", FILE_NAMES[file_of(index) as usize] as char, rank_of(index))
}
