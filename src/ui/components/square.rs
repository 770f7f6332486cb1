//! Square rendering component.

use crate::domain::{Coord, Piece};
use crate::models::Marks;
use crate::ui::components::render_piece;
use crate::ui::theme::{
    ARROW_COLOR, MARKED_SQUARE, SELECTED_SQUARE, TARGET_SQUARE, TEXT_SECONDARY, square_color,
};
use gpui::{div, prelude::*, px, rgb};

/// Render a single board square with its overlay and optional piece
pub fn render_square(
    coord: Coord,
    piece: Option<Piece>,
    marks: &Marks,
    bottom_row: bool,
    square_size: f32,
    piece_size: f32,
) -> impl IntoElement {
    let is_target = marks.target.is_some_and(|(_, to)| to == coord);
    let bg = if is_target {
        rgb(TARGET_SQUARE)
    } else if marks.selected.contains(&coord) {
        rgb(SELECTED_SQUARE)
    } else if marks.marked.contains(&coord) {
        rgb(MARKED_SQUARE)
    } else {
        square_color(coord.file, coord.rank)
    };
    let on_arrow = marks
        .arrows
        .iter()
        .any(|(from, to)| *from == coord || *to == coord);

    div()
        .flex_shrink_0() // never shrink - maintain aspect ratio
        .relative()
        .size(px(square_size))
        .bg(bg)
        .flex()
        .items_center()
        .justify_center()
        .when(on_arrow, |el| el.border_4().border_color(rgb(ARROW_COLOR)))
        .when_some(piece, |el, p| el.child(render_piece(p, piece_size)))
        .when(bottom_row, |el| {
            el.child(
                div()
                    .absolute()
                    .bottom_0()
                    .right(px(3.0))
                    .text_xs()
                    .text_color(rgb(TEXT_SECONDARY))
                    .child(Coord::file_char(coord.file).map(String::from).unwrap_or_default()),
            )
        })
}
