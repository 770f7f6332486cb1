//! Input symbol vocabulary: the logical keys the controller understands and
//! the fixed tables that map them to files, ranks, pieces and directions.

use std::fmt;

use crate::domain::chess::{Coord, PieceKind};

/// Logical key identity, after the keyboard layout has been applied.
///
/// `A1`..`H8` are coordinate symbols: the same key names a file when one is
/// pending and a rank when it completes a square. Piece symbols come in a
/// queenside (`Q*`) and kingside (`K*`) flavour for the twin pieces, and each
/// has a capture (`Take*`) form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Key {
    Esc,
    Invalid,
    Enter,

    // Menu / navigation
    Menu1,
    Menu2,
    Menu3,
    Menu4,
    Next,
    Previous,
    First,
    Last,

    // Coordinates
    A1,
    B2,
    C3,
    D4,
    E5,
    F6,
    G7,
    H8,

    // Pieces
    Pawn,
    Queen,
    King,
    KingRook,
    KingKnight,
    KingBishop,
    QueenRook,
    QueenKnight,
    QueenBishop,

    // Piece captures
    TakePawn,
    TakeQueen,
    TakeKing,
    TakeKingRook,
    TakeKingKnight,
    TakeKingBishop,
    TakeQueenRook,
    TakeQueenKnight,
    TakeQueenBishop,

    // Pawns by file
    PawnA,
    PawnB,
    PawnC,
    PawnD,
    PawnE,
    PawnF,
    PawnG,
    PawnH,
    TakePawnA,
    TakePawnB,
    TakePawnC,
    TakePawnD,
    TakePawnE,
    TakePawnF,
    TakePawnG,
    TakePawnH,

    // Numeric pad directions
    Num1,
    Num2,
    Num3,
    Num4,
    Num6,
    Num7,
    Num8,
    Num9,

    Search,
    Highlight,
    Toggle,
    FlipBoard,
}

pub const COORD_KEYS: [Key; 8] = [
    Key::A1,
    Key::B2,
    Key::C3,
    Key::D4,
    Key::E5,
    Key::F6,
    Key::G7,
    Key::H8,
];

pub const PIECE_KEYS: [Key; 8] = [
    Key::Queen,
    Key::King,
    Key::QueenRook,
    Key::KingRook,
    Key::QueenKnight,
    Key::KingKnight,
    Key::QueenBishop,
    Key::KingBishop,
];

pub const CAPTURE_PIECE_KEYS: [Key; 8] = [
    Key::TakeQueen,
    Key::TakeKing,
    Key::TakeQueenRook,
    Key::TakeKingRook,
    Key::TakeQueenKnight,
    Key::TakeKingKnight,
    Key::TakeQueenBishop,
    Key::TakeKingBishop,
];

pub const PAWN_KEYS: [Key; 8] = [
    Key::PawnA,
    Key::PawnB,
    Key::PawnC,
    Key::PawnD,
    Key::PawnE,
    Key::PawnF,
    Key::PawnG,
    Key::PawnH,
];

pub const CAPTURE_PAWN_KEYS: [Key; 8] = [
    Key::TakePawnA,
    Key::TakePawnB,
    Key::TakePawnC,
    Key::TakePawnD,
    Key::TakePawnE,
    Key::TakePawnF,
    Key::TakePawnG,
    Key::TakePawnH,
];

pub const NUMPAD: [Key; 8] = [
    Key::Num1,
    Key::Num2,
    Key::Num3,
    Key::Num4,
    Key::Num6,
    Key::Num7,
    Key::Num8,
    Key::Num9,
];

/// Menu symbols, in button order for the first four
pub const MENU_KEYS: [Key; 8] = [
    Key::Menu1,
    Key::Menu2,
    Key::Menu3,
    Key::Menu4,
    Key::First,
    Key::Next,
    Key::Previous,
    Key::Last,
];

/// Directions a bishop may be steered in
pub const DIAGONALS: [Key; 4] = [Key::Num7, Key::Num9, Key::Num1, Key::Num3];
/// Directions a rook may be steered in
pub const ORTHOGONALS: [Key; 4] = [Key::Num8, Key::Num4, Key::Num6, Key::Num2];
/// Directions a pawn may be steered in
pub const PAWN_DIRECTIONS: [Key; 3] = [Key::Num7, Key::Num8, Key::Num9];

impl Key {
    /// File index of a coordinate symbol
    pub fn file(self) -> Option<i8> {
        index_of(&COORD_KEYS, self)
    }

    /// Rank index of a coordinate symbol
    pub fn rank(self) -> Option<i8> {
        index_of(&COORD_KEYS, self)
    }

    /// File of a pawn symbol (plain or capture form)
    pub fn pawn_file(self) -> Option<i8> {
        index_of(&PAWN_KEYS, self).or_else(|| index_of(&CAPTURE_PAWN_KEYS, self))
    }

    /// Piece kind named by a piece symbol; `None` for every other symbol
    pub fn piece_kind(self) -> Option<PieceKind> {
        match self {
            Key::Pawn | Key::TakePawn => Some(PieceKind::Pawn),
            Key::Queen | Key::TakeQueen => Some(PieceKind::Queen),
            Key::King | Key::TakeKing => Some(PieceKind::King),
            Key::QueenRook | Key::KingRook | Key::TakeQueenRook | Key::TakeKingRook => {
                Some(PieceKind::Rook)
            }
            Key::QueenKnight | Key::KingKnight | Key::TakeQueenKnight | Key::TakeKingKnight => {
                Some(PieceKind::Knight)
            }
            Key::QueenBishop | Key::KingBishop | Key::TakeQueenBishop | Key::TakeKingBishop => {
                Some(PieceKind::Bishop)
            }
            _ => None,
        }
    }

    /// Whether a piece symbol names the kingside twin
    pub fn is_kingside(self) -> bool {
        matches!(
            self,
            Key::KingRook
                | Key::KingKnight
                | Key::KingBishop
                | Key::TakeKingRook
                | Key::TakeKingKnight
                | Key::TakeKingBishop
        )
    }

    /// Position of a menu symbol in [`MENU_KEYS`]
    pub fn menu_index(self) -> Option<usize> {
        MENU_KEYS.iter().position(|k| *k == self)
    }

    /// L-shaped jump for a numeric pad symbol, `(file, rank)`
    pub fn knight_offset(self) -> Option<(i8, i8)> {
        match self {
            Key::Num7 => Some((-2, 1)),
            Key::Num8 => Some((-1, 2)),
            Key::Num9 => Some((1, 2)),
            Key::Num4 => Some((-2, -1)),
            Key::Num6 => Some((2, 1)),
            Key::Num1 => Some((-1, -2)),
            Key::Num2 => Some((1, -2)),
            Key::Num3 => Some((2, -1)),
            _ => None,
        }
    }

    /// Unit step for a numeric pad symbol, `(file, rank)`
    pub fn step_offset(self) -> Option<(i8, i8)> {
        match self {
            Key::Num7 => Some((-1, 1)),
            Key::Num8 => Some((0, 1)),
            Key::Num9 => Some((1, 1)),
            Key::Num4 => Some((-1, 0)),
            Key::Num6 => Some((1, 0)),
            Key::Num1 => Some((-1, -1)),
            Key::Num2 => Some((0, -1)),
            Key::Num3 => Some((1, -1)),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

fn index_of(table: &[Key; 8], key: Key) -> Option<i8> {
    table.iter().position(|k| *k == key).map(|i| i as i8)
}

/// Pick between two same-kind pieces.
///
/// Kingside prefers the higher file (the higher rank when the files match);
/// queenside prefers the lower.
pub fn closer_piece(a: Coord, b: Coord, kingside: bool) -> Coord {
    let (a_key, b_key) = if a.file == b.file {
        (a.rank, b.rank)
    } else {
        (a.file, b.file)
    };
    match (kingside, a_key > b_key, a_key < b_key) {
        (true, true, _) | (false, _, true) => a,
        _ => b,
    }
}
