//! Pure chess domain types and utilities.
//! No GPUI dependencies - this is the domain layer.

use std::fmt;

use shakmaty::{Color as SColor, File, Rank, Role, Square};

/// Number of files (and ranks) on the board
pub const BOARD_SIZE: i8 = 8;

const FILES: &str = "abcdefgh";
const RANKS: &str = "12345678";
const PIECE_CODES: &str = "prnbqk";

/// A board coordinate. Both fields are either in `[0, 8)` or `-1` (unset).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Coord {
    pub file: i8,
    pub rank: i8,
}

impl Coord {
    /// The unset coordinate
    pub const EMPTY: Coord = Coord { file: -1, rank: -1 };

    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    /// Check if this coordinate is the unset sentinel
    pub fn is_empty(&self) -> bool {
        self.file == -1 && self.rank == -1
    }

    /// Check if both components are on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.file) && (0..BOARD_SIZE).contains(&self.rank)
    }

    /// Shift by a file/rank delta. The result may leave the board.
    pub fn offset(self, df: i8, dr: i8) -> Self {
        Self {
            file: self.file + df,
            rank: self.rank + dr,
        }
    }

    /// Square string such as "e4", or an empty string when off the board
    pub fn to_square(self) -> String {
        if !self.is_valid() {
            return String::new();
        }
        let mut square = String::with_capacity(2);
        square.push(char::from(FILES.as_bytes()[self.file as usize]));
        square.push(char::from(RANKS.as_bytes()[self.rank as usize]));
        square
    }

    /// Parse a square string, or `EMPTY` unless both characters are on the board
    pub fn from_square(square: &str) -> Self {
        let mut chars = square.chars();
        let file = chars.next().and_then(|c| FILES.find(c));
        let rank = chars.next().and_then(|c| RANKS.find(c));
        match (file, rank) {
            (Some(file), Some(rank)) => Self::new(file as i8, rank as i8),
            _ => Self::EMPTY,
        }
    }

    /// File letter for display, if the file is on the board
    pub fn file_char(file: i8) -> Option<char> {
        if (0..BOARD_SIZE).contains(&file) {
            Some(char::from(FILES.as_bytes()[file as usize]))
        } else {
            None
        }
    }
}

impl Default for Coord {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            f.write_str(&self.to_square())
        } else {
            f.write_str("-")
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
    Empty,
}

impl PieceKind {
    const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Single-character code from "prnbqk"; `None` for `Empty`
    pub fn code(self) -> Option<char> {
        Self::ALL
            .iter()
            .position(|k| *k == self)
            .map(|i| char::from(PIECE_CODES.as_bytes()[i]))
    }

    /// Inverse of [`PieceKind::code`]; unknown codes map to `Empty`
    pub fn from_code(code: char) -> Self {
        PIECE_CODES
            .find(code.to_ascii_lowercase())
            .map_or(PieceKind::Empty, |i| Self::ALL[i])
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub fn opponent(self) -> Self {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// Direction of "forward" along the rank axis for this side
    pub fn forward(self) -> i8 {
        match self {
            PieceColor::White => 1,
            PieceColor::Black => -1,
        }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceColor::White => f.write_str("white"),
            PieceColor::Black => f.write_str("black"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

impl Piece {
    /// Unicode chess glyph used by the board renderer
    pub fn glyph(&self) -> &'static str {
        match (self.kind, self.color) {
            (PieceKind::Pawn, PieceColor::White) => "♙",
            (PieceKind::Pawn, PieceColor::Black) => "♟",
            (PieceKind::Rook, PieceColor::White) => "♖",
            (PieceKind::Rook, PieceColor::Black) => "♜",
            (PieceKind::Knight, PieceColor::White) => "♘",
            (PieceKind::Knight, PieceColor::Black) => "♞",
            (PieceKind::Bishop, PieceColor::White) => "♗",
            (PieceKind::Bishop, PieceColor::Black) => "♝",
            (PieceKind::Queen, PieceColor::White) => "♕",
            (PieceKind::Queen, PieceColor::Black) => "♛",
            (PieceKind::King, PieceColor::White) => "♔",
            (PieceKind::King, PieceColor::Black) => "♚",
            (PieceKind::Empty, _) => "",
        }
    }
}

/// Convert a coordinate to a shakmaty Square, if it is on the board
pub fn to_square(coord: Coord) -> Option<Square> {
    if !coord.is_valid() {
        return None;
    }
    let file = File::new(coord.file as u32);
    let rank = Rank::new(coord.rank as u32);
    Some(Square::from_coords(file, rank))
}

/// Convert a shakmaty Square back to a coordinate
pub fn from_square(square: Square) -> Coord {
    Coord::from_square(&square.to_string())
}

pub fn role_to_kind(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

pub fn kind_to_role(kind: PieceKind) -> Option<Role> {
    match kind {
        PieceKind::Pawn => Some(Role::Pawn),
        PieceKind::Knight => Some(Role::Knight),
        PieceKind::Bishop => Some(Role::Bishop),
        PieceKind::Rook => Some(Role::Rook),
        PieceKind::Queen => Some(Role::Queen),
        PieceKind::King => Some(Role::King),
        PieceKind::Empty => None,
    }
}

pub fn color_from_shakmaty(color: SColor) -> PieceColor {
    match color {
        SColor::White => PieceColor::White,
        SColor::Black => PieceColor::Black,
    }
}

/// Convert shakmaty piece to our domain Piece
pub fn shakmaty_to_piece(piece: shakmaty::Piece) -> Piece {
    Piece {
        kind: role_to_kind(piece.role),
        color: color_from_shakmaty(piece.color),
    }
}
