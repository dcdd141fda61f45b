use log::{debug, warn};

use crate::{
    board::{Board, Color, Piece, PieceKind},
    error::ChessError,
    fen::STARTING_FEN,
    move_generator::{generate_moves, is_in_check},
    moves::{Move, MoveRollback},
    square::to_index,
};

/// Halfmove clock value at which the fifty-move rule applies
const FIFTY_MOVE_RULE_PLIES: u16 = 100;

/// A move as requested by a user interface, in algebraic coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    /// Accepted so callers can always send one, but promotion is not supported and this is ignored.
    pub promotion: Option<char>,
}

impl MoveRequest {
    pub fn new(from: &str, to: &str) -> MoveRequest {
        MoveRequest {
            from: from.to_string(),
            to: to.to_string(),
            promotion: None,
        }
    }
}

/// Owns one position plus the moves that led to it from the last load.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    history: Vec<Move>,
    rollback: MoveRollback,
}

impl Game {
    /// Uses the standard starting position when `fen` is None.
    pub fn new(fen: Option<&str>) -> Result<Game, ChessError> {
        let board = Board::from_fen(fen.unwrap_or(STARTING_FEN))?;

        Ok(Game {
            board,
            history: Vec::new(),
            rollback: MoveRollback::default(),
        })
    }

    /// Replaces the position and clears history. On error the current position is left as it was.
    pub fn load(&mut self, fen: &str) -> Result<(), ChessError> {
        let board = Board::from_fen(fen).inspect_err(|e| warn!("Rejected position '{fen}': {e}"))?;

        self.board = board;
        self.history.clear();
        self.rollback = MoveRollback::default();
        debug!("Loaded position '{fen}'");

        Ok(())
    }

    /// Ok(None) means the move was rejected and nothing changed. Err is only returned for coordinates
    /// that cannot be parsed.
    pub fn try_move(&mut self, request: &MoveRequest) -> Result<Option<Move>, ChessError> {
        let from = to_index(&request.from)?;
        let to = to_index(&request.to)?;

        match self.board.piece_at(from) {
            None => {
                debug!("Rejected {}{}: no piece on {}", request.from, request.to, request.from);
                return Ok(None);
            }
            Some(piece) if piece.color != self.board.side_to_move => {
                debug!("Rejected {}{}: not {:?}'s turn", request.from, request.to, piece.color);
                return Ok(None);
            }
            Some(_) => {}
        }

        let Some(r#move) = generate_moves(&self.board)
            .into_iter()
            .find(|m| m.from == from && m.to == to)
        else {
            debug!("Rejected {}{}: not a generated move", request.from, request.to);
            return Ok(None);
        };

        self.board.make_move(&r#move, &mut self.rollback);
        self.history.push(r#move);
        debug!("Made move {}", r#move);

        Ok(Some(r#move))
    }

    /// Takes back the last move, restoring any captured piece. None when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Move> {
        let r#move = self.history.pop()?;
        self.board.unmake_move(&r#move, &mut self.rollback);
        debug!("Undid move {}", r#move);

        Some(r#move)
    }

    pub fn get(&self, coord: &str) -> Result<Option<Piece>, ChessError> {
        Ok(self.board.piece_at(to_index(coord)?))
    }

    pub fn turn(&self) -> Color {
        self.board.side_to_move
    }

    /// Serialized from the current position, not from what was loaded.
    pub fn fen(&self) -> String {
        self.board.to_fen()
    }

    pub fn moves(&self) -> Vec<Move> {
        generate_moves(&self.board)
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn in_check(&self) -> bool {
        is_in_check(&self.board, self.board.side_to_move)
    }

    /// Only considers the moves this engine generates, so a side that has nothing but a king and sliders
    /// left is checkmated as soon as it is in check.
    pub fn in_checkmate(&self) -> bool {
        self.in_check() && self.moves().is_empty()
    }

    pub fn in_stalemate(&self) -> bool {
        !self.in_check() && self.moves().is_empty()
    }

    /// Bare kings, or kings plus a single bishop or knight.
    pub fn insufficient_material(&self) -> bool {
        let mut minor_pieces = 0;
        for (_, piece) in self.board.pieces() {
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Bishop | PieceKind::Knight => minor_pieces += 1,
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            }
        }

        minor_pieces <= 1
    }

    /// Repetition is not tracked.
    pub fn in_draw(&self) -> bool {
        self.board.halfmove_clock >= FIFTY_MOVE_RULE_PLIES || self.in_stalemate() || self.insufficient_material()
    }

    /// Also true once a king has been captured, which pseudo legal moves allow.
    pub fn game_over(&self) -> bool {
        self.board.king_square(Color::White).is_none()
            || self.board.king_square(Color::Black).is_none()
            || self.in_checkmate()
            || self.in_draw()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self {
            board: Board::from_fen(STARTING_FEN).unwrap_or_default(),
            history: Vec::new(),
            rollback: MoveRollback::default(),
        }
    }
}

#[cfg(test)]
mod game_tests {
    use super::*;

    fn play(game: &mut Game, from: &str, to: &str) -> Option<Move> {
        game.try_move(&MoveRequest::new(from, to)).unwrap()
    }

    #[test]
    pub fn turn_alternates_after_a_move() {
        let mut game = Game::default();
        assert_eq!(Color::White, game.turn());

        assert!(play(&mut game, "e2", "e3").is_some());
        assert_eq!(Color::Black, game.turn());

        assert!(play(&mut game, "g8", "f6").is_some());
        assert_eq!(Color::White, game.turn());
    }

    #[test]
    pub fn pawn_single_step_only() {
        let mut game = Game::default();

        assert_eq!(None, play(&mut game, "e2", "e4"));
        assert_eq!(Color::White, game.turn());

        let m = play(&mut game, "e2", "e3").unwrap();
        assert_eq!("e2", m.from_coordinate());
        assert_eq!("e3", m.to_coordinate());
        assert_eq!(PieceKind::Pawn, m.piece);
    }

    #[test]
    pub fn knight_l_shape_only() {
        let mut game = Game::default();

        assert_eq!(None, play(&mut game, "b1", "b3"));
        assert!(play(&mut game, "b1", "c3").is_some());
        assert_eq!(Some(Piece::new(PieceKind::Knight, Color::White)), game.get("c3").unwrap());
        assert_eq!(None, game.get("b1").unwrap());
    }

    #[test]
    pub fn empty_square_and_wrong_color_are_rejected() {
        let mut game = Game::default();
        let before = game.fen();

        assert_eq!(None, play(&mut game, "e4", "e5"));
        assert_eq!(None, play(&mut game, "e7", "e6"));
        assert_eq!(None, play(&mut game, "g8", "f6"));
        assert_eq!(None, play(&mut game, "d1", "d2"));
        assert_eq!(before, game.fen());
        assert!(game.history().is_empty());
    }

    #[test]
    pub fn unparsable_coordinates_are_errors() {
        let mut game = Game::default();

        assert_eq!(
            Err(ChessError::InvalidCoordinate(String::from("z9"))),
            game.try_move(&MoveRequest::new("z9", "e4"))
        );
        assert!(game.get("e22").is_err());
    }

    #[test]
    pub fn promotion_field_is_ignored() {
        let mut game = Game::default();
        let request = MoveRequest {
            from: String::from("g1"),
            to: String::from("f3"),
            promotion: Some('q'),
        };

        assert!(game.try_move(&request).unwrap().is_some());
    }

    #[test]
    pub fn undo_restores_every_kind_of_move() {
        let mut game = Game::new(Some("4k3/8/8/2p5/8/3N4/4P3/4K3 w - - 4 20")).unwrap();

        for (from, to) in [("e2", "e3"), ("d3", "f4"), ("d3", "c5")] {
            let before_fen = game.fen();
            let before_from = game.get(from).unwrap();
            let before_to = game.get(to).unwrap();
            let before_turn = game.turn();

            let m = play(&mut game, from, to).unwrap();
            assert_ne!(before_fen, game.fen());

            assert_eq!(Some(m), game.undo());
            assert_eq!(before_from, game.get(from).unwrap());
            assert_eq!(before_to, game.get(to).unwrap());
            assert_eq!(before_turn, game.turn());
            assert_eq!(before_fen, game.fen());
        }
    }

    #[test]
    pub fn undo_walks_back_several_moves() {
        let mut game = Game::default();
        play(&mut game, "g1", "f3").unwrap();
        play(&mut game, "b8", "c6").unwrap();
        play(&mut game, "f3", "e5").unwrap();
        play(&mut game, "c6", "e5").unwrap();
        assert_eq!(4, game.history().len());
        assert_eq!("r1bqkbnr/pppppppp/8/4n3/8/8/PPPPPPPP/RNBQKB1R w KQkq - 0 3", game.fen());

        while game.undo().is_some() {}

        assert_eq!(STARTING_FEN, game.fen());
        assert_eq!(None, game.undo());
    }

    #[test]
    pub fn undo_at_the_last_fullmove_number() {
        let fen = "4k3/4p3/8/8/8/8/8/4K3 b - - 0 65535";
        let mut game = Game::new(Some(fen)).unwrap();

        play(&mut game, "e7", "e6").unwrap();
        assert_eq!("4k3/8/4p3/8/8/8/8/4K3 w - - 0 65535", game.fen());

        game.undo().unwrap();
        assert_eq!(fen, game.fen());
    }

    #[test]
    pub fn fen_reflects_the_live_position() {
        let mut game = Game::default();
        play(&mut game, "e2", "e3").unwrap();

        assert_eq!("rnbqkbnr/pppppppp/8/8/8/4P3/PPPP1PPP/RNBQKBNR b KQkq - 0 1", game.fen());
    }

    #[test]
    pub fn load_keeps_clocks_and_castling() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R b Kq - 17 42";
        let mut game = Game::default();
        game.load(fen).unwrap();

        assert_eq!(fen, game.fen());
        assert_eq!(Color::Black, game.turn());
    }

    #[test]
    pub fn failed_load_leaves_position_unchanged() {
        let mut game = Game::default();
        play(&mut game, "e2", "e3").unwrap();
        let before = game.fen();

        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/4P3/PPPP1PP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/4P3/PPPP1PPPP/RNBQKBNR w KQkq - 0 1",
        ] {
            assert!(matches!(game.load(fen), Err(ChessError::MalformedPosition(_))));
            assert_eq!(before, game.fen());
            assert_eq!(1, game.history().len());
        }

        assert!(game.undo().is_some());
        assert_eq!(STARTING_FEN, game.fen());
    }

    #[test]
    pub fn load_clears_history() {
        let mut game = Game::default();
        play(&mut game, "e2", "e3").unwrap();
        game.load(STARTING_FEN).unwrap();

        assert_eq!(None, game.undo());
    }

    #[test]
    pub fn games_are_independent() {
        let mut first = Game::default();
        let second = Game::default();
        play(&mut first, "a2", "a3").unwrap();

        assert_eq!(STARTING_FEN, second.fen());
        assert_ne!(first.fen(), second.fen());
    }

    #[test]
    pub fn king_moves_are_not_generated() {
        let mut game = Game::new(Some("4k3/8/8/8/8/8/8/4K3 w - - 0 1")).unwrap();

        assert_eq!(None, play(&mut game, "e1", "e2"));
    }

    #[test]
    pub fn moves_that_leave_king_attacked_are_accepted() {
        // The knight is pinned against the king by the rook
        let mut game = Game::new(Some("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1")).unwrap();

        assert!(play(&mut game, "e2", "c3").is_some());
        assert_eq!(Color::Black, game.turn());
    }

    #[test]
    pub fn checkmate_and_stalemate() {
        // Black king in check from the knight with no generated replies
        let mated = Game::new(Some("7k/5N2/8/8/8/8/8/K7 b - - 0 1")).unwrap();
        assert!(mated.in_check());
        assert!(mated.in_checkmate());
        assert!(!mated.in_stalemate());
        assert!(mated.game_over());

        let stalemated = Game::new(Some("7k/8/8/8/8/8/8/K5R1 b - - 0 1")).unwrap();
        assert!(!stalemated.in_check());
        assert!(stalemated.in_stalemate());
        assert!(stalemated.in_draw());
        assert!(stalemated.game_over());

        let escapes = Game::new(Some("7k/5N1p/8/8/8/8/8/K7 b - - 0 1")).unwrap();
        assert!(escapes.in_check());
        assert!(!escapes.in_checkmate());
        assert!(!escapes.game_over());
    }

    #[test]
    pub fn draw_rules() {
        assert!(Game::new(Some("4k3/8/8/8/8/8/8/4K3 w - - 0 1")).unwrap().insufficient_material());
        assert!(Game::new(Some("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1")).unwrap().insufficient_material());
        assert!(!Game::new(Some("4k3/8/8/8/8/8/8/1NB1K3 w - - 0 1")).unwrap().insufficient_material());
        assert!(!Game::default().insufficient_material());
        assert!(!Game::default().in_draw());

        let fifty_moves = Game::new(Some("4k3/p7/8/8/8/8/P7/4K3 w - - 100 80")).unwrap();
        assert!(fifty_moves.in_draw());
        let not_yet = Game::new(Some("4k3/p7/8/8/8/8/P7/4K3 w - - 99 80")).unwrap();
        assert!(!not_yet.in_draw());
    }

    #[test]
    pub fn capturing_a_king_ends_the_game() {
        let mut game = Game::new(Some("8/8/8/3k4/8/4N3/P7/4K3 w - - 0 1")).unwrap();
        assert!(!game.game_over());

        play(&mut game, "e3", "d5").unwrap();
        assert!(game.game_over());
        assert_eq!(None, game.board().king_square(Color::Black));

        game.undo().unwrap();
        assert!(!game.game_over());
    }
}
