pub mod chess;
pub mod keys;
pub mod move_tree;

pub use chess::{Coord, Piece, PieceColor, PieceKind, shakmaty_to_piece};
pub use keys::Key;
pub use move_tree::{MoveNodeId, MoveTree, PlayedMove};
