//! Piece rendering component.

use crate::domain::{Piece, PieceColor};
use gpui::{div, prelude::*, px, rgb};

/// Render a chess piece glyph centered in its container
pub fn render_piece(piece: Piece, piece_size: f32) -> impl IntoElement {
    let color = match piece.color {
        PieceColor::White => 0xffffff,
        PieceColor::Black => 0x000000,
    };
    div()
        .size_full()
        .flex()
        .items_center()
        .justify_center()
        .text_size(px(piece_size))
        .text_color(rgb(color))
        .child(piece.glyph())
}
