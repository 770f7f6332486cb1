//! Directional numeric-pad moves.
//!
//! A direction key walks away from the selected piece (or from the previous
//! target when the same direction is repeated) and lands on the nearest legal
//! destination. With shift held it lands on the farthest one instead.

use crate::domain::keys::{DIAGONALS, NUMPAD, ORTHOGONALS, PAWN_DIRECTIONS};
use crate::domain::{Coord, Key, PieceColor, PieceKind};

/// Longest walk along one direction
const MAX_STEPS: usize = 7;

/// Direction keys that make sense for a piece kind
pub fn directions(kind: PieceKind) -> &'static [Key] {
    match kind {
        PieceKind::Queen | PieceKind::King | PieceKind::Knight => &NUMPAD,
        PieceKind::Bishop => &DIAGONALS,
        PieceKind::Rook => &ORTHOGONALS,
        PieceKind::Pawn => &PAWN_DIRECTIONS,
        PieceKind::Empty => &[],
    }
}

/// Offset walked per step, from white's point of view
fn offset(kind: PieceKind, direction: Key) -> Option<(i8, i8)> {
    match kind {
        PieceKind::Knight => direction.knight_offset(),
        _ => direction.step_offset(),
    }
}

fn max_steps(kind: PieceKind) -> usize {
    match kind {
        PieceKind::Knight => 1,
        _ => MAX_STEPS,
    }
}

/// Squares reached by repeatedly applying `(df, dr)` from `start`, stopping
/// at the board edge. `start` itself is not included.
pub fn scan(start: Coord, (df, dr): (i8, i8), steps: usize) -> Vec<Coord> {
    let mut squares = Vec::new();
    let mut square = start;
    for _ in 0..steps {
        square = square.offset(df, dr);
        if !square.is_valid() {
            break;
        }
        squares.push(square);
    }
    squares
}

/// One quick-move request
#[derive(Clone, Debug)]
pub struct QuickMove<'a> {
    pub piece: PieceKind,
    pub direction: Key,
    /// Shift held: jump to the farthest legal square
    pub farthest: bool,
    pub selected: Coord,
    /// Where the previous quick-move in the same direction landed
    pub previous_target: Option<Coord>,
    pub mover: PieceColor,
    /// Legal destinations of the piece on `selected`
    pub destinations: &'a [Coord],
}

impl QuickMove<'_> {
    pub fn resolve(&self) -> Option<Coord> {
        if !directions(self.piece).contains(&self.direction) {
            return None;
        }
        let (df, dr) = offset(self.piece, self.direction)?;
        let forward = self.mover.forward();

        let start = match self.previous_target {
            Some(target) if !self.farthest && target.is_valid() => target,
            _ => self.selected,
        };
        let candidates = scan(start, (df * forward, dr * forward), max_steps(self.piece));

        let is_legal = |square: &&Coord| {
            self.destinations.iter().filter(|d| *d == *square).count() == 1
        };
        if self.farthest {
            candidates.iter().rev().find(is_legal).copied()
        } else {
            candidates.iter().find(is_legal).copied()
        }
    }
}
