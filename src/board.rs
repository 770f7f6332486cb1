//! The board adapter contract.
//!
//! The controller never owns game state. It asks a [`Board`] for legal moves
//! and piece layout, and drives it through selection, marking and move
//! commands. [`BoardExt`] layers the lookups the controller needs on top of
//! the raw contract.

use std::collections::BTreeMap;

use crate::domain::keys::closer_piece;
use crate::domain::{Coord, Piece, PieceColor, PieceKind};
use crate::error::BoardError;

/// A legal move as reported by the board, recomputed on every query
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LegalMove {
    pub from: Coord,
    pub to: Coord,
    pub piece: PieceKind,
}

/// Occupied squares of the current position
pub type PieceSetup = BTreeMap<Coord, Piece>;

/// Notifications the board queues for the session to drain
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    /// A move was played on the board
    Moved { from: Coord, to: Coord, san: String },
    /// Side, orientation or game changed underneath the controller
    OptionsUpdated,
}

pub trait Board {
    fn legal_moves(&self) -> Vec<LegalMove>;
    fn pieces(&self) -> PieceSetup;
    /// The side the user is playing, `None` when only spectating
    fn playing_as(&self) -> Option<PieceColor>;
    fn is_players_turn(&self) -> bool;
    fn is_legal_move(&self, from: Coord, to: Coord) -> bool;

    fn select_area(&mut self, square: Coord);
    fn unselect_area(&mut self, square: Coord);
    fn mark_area(&mut self, square: Coord);
    fn unmark_area(&mut self, square: Coord);
    fn mark_arrow(&mut self, from: Coord, to: Coord);
    fn unmark_arrow(&mut self, from: Coord, to: Coord);
    fn clear_all_markings(&mut self);
    /// Preview a pending move
    fn target_area(&mut self, from: Coord, to: Coord);

    fn make_move(
        &mut self,
        from: Coord,
        to: Coord,
        promotion: Option<PieceKind>,
    ) -> Result<(), BoardError>;

    fn flip_board(&mut self);
    fn next_move(&mut self);
    fn prev_move(&mut self);
    fn first_move(&mut self);
    fn last_move(&mut self);
    fn press_menu(&mut self, index: usize) -> Result<(), BoardError>;

    /// Show a notice the user has to acknowledge
    fn alert(&mut self, message: &str);

    /// Drain queued events
    fn take_events(&mut self) -> Vec<BoardEvent>;
}

/// Outcome of a lookup that must resolve to exactly one square
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Lookup {
    Found(Coord),
    Missing,
    Ambiguous(usize),
}

impl Lookup {
    fn from_candidates(candidates: &[Coord]) -> Self {
        match candidates {
            [] => Lookup::Missing,
            [only] => Lookup::Found(*only),
            many => Lookup::Ambiguous(many.len()),
        }
    }
}

/// Lookups derived from the raw [`Board`] contract
pub trait BoardExt: Board {
    fn piece_at(&self, square: Coord) -> Option<Piece> {
        self.pieces().get(&square).copied()
    }

    /// Find a piece of the given kind and color. Twins are told apart with
    /// [`closer_piece`] towards the requested wing.
    fn find_piece(&self, kind: PieceKind, color: PieceColor, kingside: bool) -> Option<Coord> {
        self.pieces()
            .into_iter()
            .filter(|(_, piece)| piece.kind == kind && piece.color == color)
            .map(|(square, _)| square)
            .reduce(|a, b| closer_piece(a, b, kingside))
    }

    /// The single pawn of `color` standing on `file`
    fn unique_pawn_on_file(&self, color: PieceColor, file: i8) -> Lookup {
        let pawns: Vec<Coord> = self
            .pieces()
            .into_iter()
            .filter(|(square, piece)| {
                piece.kind == PieceKind::Pawn && piece.color == color && square.file == file
            })
            .map(|(square, _)| square)
            .collect();
        Lookup::from_candidates(&pawns)
    }

    /// Legal moves from `from` to `to`
    fn moves_between(&self, from: Coord, to: Coord) -> Vec<LegalMove> {
        self.legal_moves()
            .into_iter()
            .filter(|m| m.from == from && m.to == to)
            .collect()
    }

    /// Legal destinations of the piece on `from`
    fn destinations_from(&self, from: Coord) -> Vec<Coord> {
        self.legal_moves()
            .into_iter()
            .filter(|m| m.from == from)
            .map(|m| m.to)
            .collect()
    }

    /// Pawn moves that land on `square`
    fn pawn_moves_onto(&self, square: Coord) -> Vec<LegalMove> {
        self.legal_moves()
            .into_iter()
            .filter(|m| m.to == square && m.piece == PieceKind::Pawn)
            .collect()
    }

    /// Mark every legal destination of the piece on `from`
    fn highlight_moves_from(&mut self, from: Coord) {
        for to in self.destinations_from(from) {
            self.mark_area(to);
        }
    }
}

impl<B: Board + ?Sized> BoardExt for B {}


#[cfg(test)]
mod tests {
    use super::testing::{FakeBoard, sq};
    use super::*;

    #[test]
    fn test_find_piece_disambiguates_twins() {
        let board = FakeBoard::new(PieceColor::White)
            .with_piece("b1", PieceKind::Knight, PieceColor::White)
            .with_piece("f1", PieceKind::Knight, PieceColor::White)
            .with_piece("g8", PieceKind::Knight, PieceColor::Black);

        assert_eq!(
            board.find_piece(PieceKind::Knight, PieceColor::White, true),
            Some(sq("f1"))
        );
        assert_eq!(
            board.find_piece(PieceKind::Knight, PieceColor::White, false),
            Some(sq("b1"))
        );
        assert_eq!(
            board.find_piece(PieceKind::Knight, PieceColor::Black, false),
            Some(sq("g8"))
        );
        assert_eq!(board.find_piece(PieceKind::Queen, PieceColor::White, false), None);
    }

    #[test]
    fn test_unique_pawn_on_file() {
        let board = FakeBoard::new(PieceColor::White)
            .with_piece("e2", PieceKind::Pawn, PieceColor::White)
            .with_piece("c2", PieceKind::Pawn, PieceColor::White)
            .with_piece("c3", PieceKind::Pawn, PieceColor::White)
            .with_piece("e7", PieceKind::Pawn, PieceColor::Black);

        assert_eq!(board.unique_pawn_on_file(PieceColor::White, 4), Lookup::Found(sq("e2")));
        assert_eq!(board.unique_pawn_on_file(PieceColor::White, 2), Lookup::Ambiguous(2));
        assert_eq!(board.unique_pawn_on_file(PieceColor::White, 0), Lookup::Missing);
        assert_eq!(board.unique_pawn_on_file(PieceColor::Black, 4), Lookup::Found(sq("e7")));
    }

    #[test]
    fn test_highlight_marks_destinations() {
        let mut board = FakeBoard::new(PieceColor::White)
            .with_move("g1", "f3", PieceKind::Knight)
            .with_move("g1", "h3", PieceKind::Knight)
            .with_move("e2", "e4", PieceKind::Pawn);

        board.highlight_moves_from(sq("g1"));
        assert_eq!(
            board.calls,
            vec![
                testing::Call::Mark(sq("f3")),
                testing::Call::Mark(sq("h3")),
            ]
        );
    }
}
