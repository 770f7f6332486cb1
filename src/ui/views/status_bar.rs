//! Mode line under the board.

use gpui::{div, prelude::*, px, rgb};

use crate::ui::theme::{ALERT_BG, BORDER_COLOR, STATUS_BG, STATUS_HEIGHT, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::vim::StatusLine;

/// Render the mode label, the move being typed and the last key. A pending
/// alert takes the whole bar until a key dismisses it.
pub fn render_status_bar(status: &StatusLine, alert: Option<&str>) -> impl IntoElement {
    let bar = div()
        .flex()
        .flex_row()
        .items_center()
        .gap_4()
        .h(px(STATUS_HEIGHT))
        .px_3()
        .border_t_1()
        .border_color(rgb(BORDER_COLOR))
        .text_sm();

    if let Some(message) = alert {
        return bar
            .bg(rgb(ALERT_BG))
            .text_color(rgb(TEXT_PRIMARY))
            .child(format!("{message} (press any key)"));
    }

    bar.bg(rgb(STATUS_BG))
        .child(
            div()
                .text_color(rgb(TEXT_PRIMARY))
                .child(format!("-- {} --", status.status)),
        )
        .child(div().text_color(rgb(TEXT_PRIMARY)).child(status.message.clone()))
        .child(
            div()
                .ml_auto()
                .text_color(rgb(TEXT_SECONDARY))
                .child(status.buffer.clone()),
        )
}
