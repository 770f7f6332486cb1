//! Application setup and window creation.

use gpui::{App, Bounds, WindowBounds, WindowOptions, prelude::*, px, size};
use gpui_component::Root;
use tracing::{error, info};

use crate::models::GameModel;
use crate::ui::views::VimBoardView;
use crate::vim::IllegalTargetPolicy;

/// Initialize and run the chess application
pub fn run(cx: &mut App, game: GameModel, illegal_target: IllegalTargetPolicy) {
    gpui_component::init(cx);

    let bounds = Bounds::centered(None, size(px(900.0), px(640.0)), cx);
    let opened = cx.open_window(
        WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            ..Default::default()
        },
        |window, cx| {
            let view = cx.new(|cx| VimBoardView::new(game, illegal_target, window, cx));
            cx.new(|cx| Root::new(view, window, cx))
        },
    );
    match opened {
        Ok(_) => info!("window opened"),
        Err(err) => {
            error!("failed to open window: {err:#}");
            cx.quit();
        }
    }
}
