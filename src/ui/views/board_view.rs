//! Chess board view driven entirely from the keyboard.
//!
//! Key presses are pushed into a channel; a background task reads them back
//! through the session's input source and applies them to the view.

use gpui::{
    App, AsyncApp, Context, FocusHandle, Focusable, KeyDownEvent, Pixels, Task, WeakEntity,
    Window, div, prelude::*, px, rgb,
};
use gpui_component::resizable::{h_resizable, resizable_panel};
use tracing::{debug, warn};

use crate::board::Board;
use crate::domain::{Coord, PieceColor};
use crate::input::{InputSource, KeyPress, KeySender, RawKey, keyboard_channel};
use crate::models::{GameModel, MenuEntry};
use crate::ui::components::render_square;
use crate::ui::theme::{
    BOARD_PADDING, BORDER_COLOR, INITIAL_LEFT_PANEL, INITIAL_RIGHT_PANEL, PANEL_BG, PIECE_SCALE,
    SQUARE_SIZE, STATUS_BG, TEXT_PRIMARY, TEXT_SECONDARY,
};
use crate::ui::views::render_status_bar;
use crate::vim::{IllegalTargetPolicy, StatusLine, Vim};

pub struct VimBoardView {
    vim: Vim<GameModel>,
    status: StatusLine,
    keys: KeySender,
    focus_handle: FocusHandle,
    _input_task: Task<()>,
}

impl VimBoardView {
    pub fn new(
        game: GameModel,
        illegal_target: IllegalTargetPolicy,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let vim = Vim::new(game, illegal_target);
        let status = StatusLine::from_snapshot(&vim.snapshot());
        let (keys, reader) = keyboard_channel();

        let focus_handle = cx.focus_handle();
        window.focus(&focus_handle);

        let input_task = cx.spawn(async move |this: WeakEntity<VimBoardView>, cx: &mut AsyncApp| {
            Self::run_input_loop(this, reader, cx).await;
        });

        Self {
            vim,
            status,
            keys,
            focus_handle,
            _input_task: input_task,
        }
    }

    /// Read translated keys until the channel closes or the view is dropped
    async fn run_input_loop(
        this: WeakEntity<VimBoardView>,
        mut reader: impl InputSource,
        cx: &mut AsyncApp,
    ) {
        loop {
            let Ok(is_white) = this.read_with(cx, |view, _| view.vim.is_white()) else {
                break;
            };
            let Some(press) = reader.read(is_white).await else {
                break;
            };
            if this.update(cx, |view, cx| view.apply(press, cx)).is_err() {
                break;
            }
        }
        debug!("input loop finished");
    }

    fn apply(&mut self, press: KeyPress, cx: &mut Context<Self>) {
        // An open alert swallows the key that dismisses it
        if self.vim.board_mut().dismiss_alert().is_some() {
            cx.notify();
            return;
        }
        let snapshot = self.vim.handle(press);
        self.status = StatusLine::from_snapshot(&snapshot);
        cx.notify();
    }

    fn on_key_down(&mut self, event: &KeyDownEvent, _window: &mut Window, cx: &mut Context<Self>) {
        let keystroke = &event.keystroke;
        let raw = RawKey {
            key: keystroke.key.clone(),
            shift: keystroke.modifiers.shift,
            control: keystroke.modifiers.control,
            alt: keystroke.modifiers.alt,
        };
        if self.keys.unbounded_send(raw).is_err() {
            warn!("input loop has stopped, dropping key");
        }
        cx.stop_propagation();
    }

    fn render_board(&self) -> impl IntoElement {
        let game = self.vim.board();
        let marks = game.marks();
        let white_bottom = game.orientation() == PieceColor::White;
        let piece_size = SQUARE_SIZE * PIECE_SCALE;
        let pieces = game.pieces();

        div()
            .flex_shrink_0()
            .flex()
            .flex_col()
            .w(px(SQUARE_SIZE * 8.0))
            .h(px(SQUARE_SIZE * 8.0))
            .overflow_hidden()
            .rounded_md()
            .children((0..8).map(|row: i8| {
                div().flex().flex_shrink_0().children((0..8).map(|col: i8| {
                    let coord = if white_bottom {
                        Coord::new(col, 7 - row)
                    } else {
                        Coord::new(7 - col, row)
                    };
                    render_square(
                        coord,
                        pieces.get(&coord).copied(),
                        marks,
                        row == 7,
                        SQUARE_SIZE,
                        piece_size,
                    )
                }))
            }))
    }

    fn render_side_panel(&self) -> impl IntoElement {
        let game = self.vim.board();
        let history = game.history();
        let turn = match game.current_turn() {
            PieceColor::White => "White to move",
            PieceColor::Black => "Black to move",
        };
        let moves = history.chunks(2).enumerate().map(|(i, pair)| {
            let line = match pair {
                [white, black] => format!("{}. {white} {black}", i + 1),
                [white] => format!("{}. {white}", i + 1),
                _ => String::new(),
            };
            div().text_color(rgb(TEXT_PRIMARY)).child(line)
        });
        let menu = MenuEntry::ALL.iter().enumerate().map(|(i, entry)| {
            div()
                .text_color(rgb(TEXT_SECONDARY))
                .child(format!("C-{}  {}", i + 1, entry.label()))
        });

        div()
            .id("side-panel")
            .size_full()
            .flex()
            .flex_col()
            .gap_1()
            .p_3()
            .bg(rgb(STATUS_BG))
            .border_l_1()
            .border_color(rgb(BORDER_COLOR))
            .text_sm()
            .overflow_y_scroll()
            .child(div().text_color(rgb(TEXT_SECONDARY)).child(turn))
            .children(moves)
            .child(div().mt_4().text_color(rgb(TEXT_SECONDARY)).child("Menu"))
            .children(menu)
    }
}

impl Focusable for VimBoardView {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for VimBoardView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let board_panel = div()
            .size_full()
            .flex()
            .flex_col()
            .bg(rgb(PANEL_BG))
            .child(div().flex_1().p(px(BOARD_PADDING)).child(self.render_board()))
            .child(render_status_bar(
                &self.status,
                self.vim.board().alert_message(),
            ));

        // Main resizable layout
        div()
            .track_focus(&self.focus_handle)
            .on_key_down(cx.listener(Self::on_key_down))
            .size_full()
            .font_family("Berkeley Mono")
            .child(
                h_resizable("vim-chess-layout")
                    .child(
                        resizable_panel()
                            .size(px(INITIAL_LEFT_PANEL))
                            .size_range(px(360.)..px(1200.))
                            .child(board_panel),
                    )
                    .child(
                        resizable_panel()
                            .size(px(INITIAL_RIGHT_PANEL))
                            .size_range(px(150.)..Pixels::MAX)
                            .child(self.render_side_panel()),
                    ),
            )
    }
}
