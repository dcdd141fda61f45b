use std::time::Instant;

use log::info;
use num_format::{Locale, ToFormattedString};

use crate::{
    board::Board,
    game::Game,
    move_generator::generate_moves,
    moves::MoveRollback,
};

impl Board {
    /// Counts the leaves of the generated move tree `depth` plies deep. The board is left as it was.
    pub fn perft(&mut self, depth: u8) -> u64 {
        let mut rollback = MoveRollback::default();

        let start_time = Instant::now();
        let nodes = do_perft(depth, self, &mut rollback);
        let elapsed = start_time.elapsed();

        let nps = nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        info!(
            "depth {depth} in {elapsed:#?}. Nodes: {}. Nodes per second: {}",
            nodes.to_formatted_string(&Locale::en),
            (nps as u64).to_formatted_string(&Locale::en)
        );
        debug_assert!(rollback.is_empty());

        nodes
    }
}

impl Game {
    pub fn perft(&self, depth: u8) -> u64 {
        self.board().clone().perft(depth)
    }
}

// Code referenced from https://www.chessprogramming.org/Perft
fn do_perft(draft: u8, board: &mut Board, rollback: &mut MoveRollback) -> u64 {
    if draft == 0 {
        return 1;
    }

    let mut nodes = 0;
    for r#move in generate_moves(board) {
        board.make_move(&r#move, rollback);
        nodes += do_perft(draft - 1, board, rollback);
        board.unmake_move(&r#move, rollback);
    }

    nodes
}

#[cfg(test)]
mod perft_tests {
    use crate::fen::STARTING_FEN;

    use super::*;

    #[test]
    pub fn starting_position_node_counts() {
        let mut board = Board::from_fen(STARTING_FEN).unwrap();
        let original = board.clone();

        assert_eq!(1, board.perft(0));
        assert_eq!(12, board.perft(1));
        assert_eq!(144, board.perft(2));
        assert_eq!(1752, board.perft(3));
        assert_eq!(21310, board.perft(4));
        assert_eq!(original, board);
    }

    #[test]
    pub fn game_perft_does_not_touch_the_game() {
        let game = Game::default();

        assert_eq!(144, game.perft(2));
        assert_eq!(STARTING_FEN, game.fen());
    }
}
