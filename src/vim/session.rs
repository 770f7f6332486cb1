//! Dispatch loop tying an input source, the controller and a presenter.

use tracing::{debug, error, info};

use crate::board::{Board, BoardEvent};
use crate::domain::PieceColor;
use crate::input::{InputSource, KeyPress};
use crate::vim::controller::{Controller, IllegalTargetPolicy};
use crate::vim::fsm::Fsm;
use crate::vim::state::StatusSnapshot;
use crate::vim::status::Presenter;

/// A move-input session over one board
pub struct Vim<B: Board> {
    fsm: Fsm<Controller<B>>,
    controller: Controller<B>,
}

impl<B: Board> Vim<B> {
    pub fn new(board: B, illegal_target: IllegalTargetPolicy) -> Self {
        let mut fsm = Fsm::new();
        Controller::register(&mut fsm);
        Self {
            fsm,
            controller: Controller::new(board, illegal_target),
        }
    }

    pub fn board(&self) -> &B {
        self.controller.board()
    }

    pub fn board_mut(&mut self) -> &mut B {
        self.controller.board_mut()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.controller.snapshot()
    }

    /// Which keyboard layout applies. Spectators get the white layout.
    pub fn is_white(&self) -> bool {
        self.controller.mover() != Some(PieceColor::Black)
    }

    /// Process one key press and return the resulting status.
    ///
    /// Handler failures are logged and swallowed; the session keeps going.
    pub fn handle(&mut self, press: KeyPress) -> StatusSnapshot {
        debug!(key = %press.key, shift = press.shift, mode = ?self.controller.state().mode, "dispatch");
        self.controller.state_mut().input_shift_held = press.shift;

        match self.fsm.dispatch(&mut self.controller, press.key) {
            Ok(dispatched) if dispatched.ignored() => {
                debug!(key = %press.key, "no handler in this mode");
            }
            Ok(_) => {}
            Err(err) => error!("handler for {} failed: {err}", press.key),
        }

        self.controller.state_mut().message = press.key.to_string();
        self.sync_board_events();
        self.controller.snapshot()
    }

    /// Drain the board's event queue, resetting on option changes
    pub fn sync_board_events(&mut self) {
        for event in self.controller.board_mut().take_events() {
            match event {
                BoardEvent::Moved { from, to, san } => info!("moved {from}-{to} ({san})"),
                BoardEvent::OptionsUpdated => self.controller.reset(),
            }
        }
    }

    /// Read keys until the source closes, reporting status after each one
    pub async fn run<I, P>(&mut self, input: &mut I, presenter: &mut P)
    where
        I: InputSource,
        P: Presenter,
    {
        presenter.on_input(&self.snapshot());
        while let Some(press) = input.read(self.is_white()).await {
            let status = self.handle(press);
            presenter.on_input(&status);
        }
        info!("input closed, ending session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::testing::{Call, FakeBoard, sq};
    use crate::domain::{Key, PieceKind};
    use crate::input::{KeyReader, parse_script};
    use crate::vim::state::Mode;

    fn board() -> FakeBoard {
        FakeBoard::new(PieceColor::White)
            .with_piece("e2", PieceKind::Pawn, PieceColor::White)
            .with_move("e2", "e4", PieceKind::Pawn)
    }

    #[test]
    fn test_handle_echoes_key() {
        let mut vim = Vim::new(board(), IllegalTargetPolicy::Reselect);

        let status = vim.handle(KeyPress::new(Key::PawnE));
        assert_eq!(status.mode, Mode::Selected);
        assert_eq!(status.selected, sq("e2"));
        assert_eq!(status.message, "PawnE");
    }

    #[test]
    fn test_options_updated_resets() {
        let mut vim = Vim::new(board(), IllegalTargetPolicy::Reselect);

        vim.handle(KeyPress::new(Key::PawnE));
        let status = vim.handle(KeyPress::new(Key::Toggle));
        assert_eq!(status.mode, Mode::Normal);
        assert_eq!(vim.board().calls.last(), Some(&Call::ClearAll));
    }

    #[test]
    fn test_handler_failure_keeps_session_alive() {
        let mut vim = Vim::new(board(), IllegalTargetPolicy::Reselect);
        vim.board_mut().reject_moves = true;

        for key in [Key::PawnE, Key::E5, Key::D4] {
            vim.handle(KeyPress::new(key));
        }
        let status = vim.handle(KeyPress::new(Key::Enter));
        assert_eq!(status.mode, Mode::Confirm);
        assert_eq!(status.message, "Enter");
        assert!(vim.board().made_moves().is_empty());

        let status = vim.handle(KeyPress::new(Key::Esc));
        assert_eq!(status.mode, Mode::Selected);
        assert_eq!(status.selected, sq("e2"));

        vim.board_mut().reject_moves = false;
        vim.handle(KeyPress::new(Key::E5));
        vim.handle(KeyPress::new(Key::D4));
        let status = vim.handle(KeyPress::new(Key::Enter));
        assert_eq!(status.mode, Mode::Normal);
        assert_eq!(vim.board().made_moves(), vec![(sq("e2"), sq("e4"))]);
    }

    #[test]
    fn test_run_continues_after_handler_failure() {
        let mut vim = Vim::new(board(), IllegalTargetPolicy::Reselect);
        vim.board_mut().reject_moves = true;
        let keys = parse_script("njf<enter><esc><esc>").expect("valid script");
        let mut reader = KeyReader::new(futures::stream::iter(keys));
        let mut modes = Vec::new();
        let mut presenter = |s: &StatusSnapshot| modes.push(s.mode);

        futures::executor::block_on(vim.run(&mut reader, &mut presenter));
        assert_eq!(
            modes,
            vec![
                Mode::Normal,
                Mode::Selected,
                Mode::SelectedRank,
                Mode::Confirm,
                Mode::Confirm,
                Mode::Selected,
                Mode::Normal,
            ]
        );
    }

    #[test]
    fn test_black_uses_mirrored_layout() {
        let vim = Vim::new(FakeBoard::new(PieceColor::Black), IllegalTargetPolicy::Reselect);
        assert!(!vim.is_white());

        let vim = Vim::new(FakeBoard::default(), IllegalTargetPolicy::Reselect);
        assert!(vim.is_white());
    }

    #[test]
    fn test_run_until_input_closes() {
        let mut vim = Vim::new(board(), IllegalTargetPolicy::Reselect);
        let keys = parse_script("njf<enter>").expect("valid script");
        let mut reader = KeyReader::new(futures::stream::iter(keys));
        let mut modes = Vec::new();
        let mut presenter = |s: &StatusSnapshot| modes.push(s.mode);

        futures::executor::block_on(vim.run(&mut reader, &mut presenter));
        assert_eq!(
            modes,
            vec![
                Mode::Normal,
                Mode::Selected,
                Mode::SelectedRank,
                Mode::Confirm,
                Mode::Normal,
            ]
        );
        assert_eq!(vim.board().made_moves(), vec![(sq("e2"), sq("e4"))]);
    }
}
