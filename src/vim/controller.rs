//! Move-input controller: the mode handlers behind the dispatch table.
//!
//! Every handler reads the injected [`Board`], updates [`VimState`] in place
//! and issues board commands. Nothing else is mutated.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{Board, BoardExt, Lookup};
use crate::domain::keys::{
    CAPTURE_PAWN_KEYS, CAPTURE_PIECE_KEYS, COORD_KEYS, MENU_KEYS, NUMPAD, PAWN_KEYS, PIECE_KEYS,
};
use crate::domain::{Coord, Key, PieceColor, PieceKind};
use crate::error::VimError;
use crate::vim::fsm::{Fsm, Machine};
use crate::vim::quick_move::QuickMove;
use crate::vim::state::{Mode, StatusSnapshot, VimState};

/// What to do when a typed target turns out to be illegal
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IllegalTargetPolicy {
    /// Re-run selection on the current square
    #[default]
    Reselect,
    /// Drop the target and stay selected
    ClearTarget,
}

pub struct Controller<B> {
    board: B,
    state: VimState,
    illegal_target: IllegalTargetPolicy,
}

impl<B: Board> Machine for Controller<B> {
    type Mode = Mode;
    type Key = Key;
    type Error = VimError;

    fn mode(&self) -> Mode {
        self.state.mode
    }

    fn set_input(&mut self, key: Key) {
        self.state.input_key = key;
    }
}

impl<B: Board> Controller<B> {
    pub fn new(board: B, illegal_target: IllegalTargetPolicy) -> Self {
        Self {
            board,
            state: VimState::new(),
            illegal_target,
        }
    }

    pub fn state(&self) -> &VimState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut VimState {
        &mut self.state
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.state.snapshot()
    }

    /// Fill `fsm` with this controller's handlers
    pub fn register(fsm: &mut Fsm<Self>) {
        fsm.on(&MENU_KEYS, Self::menu).on(&[Key::Toggle], Self::toggle);
        fsm.mode(Mode::Normal)
            .on(&[Key::Esc], Self::n_esc)
            .on(&COORD_KEYS, Self::n_coords)
            .on(&PIECE_KEYS, Self::n_piece)
            .on(&PAWN_KEYS, Self::n_pawn)
            .on(&CAPTURE_PAWN_KEYS, Self::n_pawn)
            .on(&[Key::Highlight], Self::n_highlight);
        fsm.mode(Mode::NormalRank)
            .on(&COORD_KEYS, Self::nr_coords)
            .on(&[Key::Esc], Self::nr_esc);
        fsm.mode(Mode::Selected)
            .on(&[Key::Esc], Self::s_esc)
            .on(&COORD_KEYS, Self::s_coords)
            .on(&PIECE_KEYS, Self::s_piece)
            .on(&CAPTURE_PIECE_KEYS, Self::s_capture_piece)
            .on(&PAWN_KEYS, Self::s_pawn)
            .on(&CAPTURE_PAWN_KEYS, Self::s_capture_pawn)
            .on(&[Key::Highlight], Self::s_highlight)
            .on(&[Key::Enter], Self::s_enter)
            .on(&NUMPAD, Self::s_quick_move);
        fsm.mode(Mode::SelectedRank)
            .on(&COORD_KEYS, Self::sr_coords)
            .on(&[Key::Esc], Self::sr_esc);
        fsm.mode(Mode::Confirm)
            .on(&[Key::Esc], Self::c_esc)
            .on(&[Key::Enter], Self::c_enter)
            .on(&NUMPAD, Self::s_quick_move);
        fsm.mode(Mode::Highlight)
            .on(&[Key::Esc], Self::h_esc)
            .on(&PIECE_KEYS, Self::h_piece)
            .on(&PAWN_KEYS, Self::h_pawn)
            .on(&CAPTURE_PAWN_KEYS, Self::h_pawn);
    }

    /// Drop back to Normal after the board changed side or orientation
    pub fn reset(&mut self) {
        info!("board options changed, resetting to normal mode");
        self.state.mode = Mode::Normal;
        self.state.selected = Coord::EMPTY;
        self.state.target = Coord::EMPTY;
        self.state.pending_file = None;
        self.state.arrow_direction = None;
        self.board.clear_all_markings();
    }

    /// Side whose pieces the piece keys refer to
    pub fn mover(&self) -> Option<PieceColor> {
        self.board.playing_as()
    }

    fn key_file(&self) -> Result<i8, VimError> {
        let key = self.state.input_key;
        key.file().ok_or(VimError::UnexpectedKey {
            key,
            expected: "file",
        })
    }

    fn key_rank(&self) -> Result<i8, VimError> {
        let key = self.state.input_key;
        key.rank().ok_or(VimError::UnexpectedKey {
            key,
            expected: "rank",
        })
    }

    fn key_pawn_file(&self) -> Result<i8, VimError> {
        let key = self.state.input_key;
        key.pawn_file().ok_or(VimError::UnexpectedKey {
            key,
            expected: "pawn file",
        })
    }

    fn key_piece(&self) -> Result<PieceKind, VimError> {
        let key = self.state.input_key;
        key.piece_kind().ok_or(VimError::UnexpectedKey {
            key,
            expected: "piece",
        })
    }

    /// Resolve the piece key against `color`
    fn resolve_piece(&self, color: PieceColor) -> Result<Option<Coord>, VimError> {
        let kind = self.key_piece()?;
        let kingside = self.state.input_key.is_kingside();
        let found = self.board.find_piece(kind, color, kingside);
        if found.is_none() {
            debug!(?kind, %color, kingside, "no matching piece");
        }
        Ok(found)
    }

    /// Resolve the pawn key to the single `color` pawn on its file
    fn resolve_pawn(&self, color: PieceColor) -> Result<Option<Coord>, VimError> {
        let file = self.key_pawn_file()?;
        let file_name = Coord::file_char(file).unwrap_or('?');
        match self.board.unique_pawn_on_file(color, file) {
            Lookup::Found(square) => Ok(Some(square)),
            Lookup::Missing => {
                warn!("no {file_name}-file pawn for {color}");
                Ok(None)
            }
            Lookup::Ambiguous(count) => {
                warn!("ambiguous: {count} {file_name}-file pawns for {color}");
                Ok(None)
            }
        }
    }

    // ---------  Universal keys  -------------

    fn menu(&mut self) -> Result<(), VimError> {
        match self.state.input_key {
            Key::Menu1 | Key::Menu2 | Key::Menu3 | Key::Menu4 => {
                let index = self.state.input_key.menu_index().unwrap_or_default();
                self.board.press_menu(index)?;
            }
            Key::Next => self.board.next_move(),
            Key::Previous => self.board.prev_move(),
            Key::First => self.board.first_move(),
            Key::Last => self.board.last_move(),
            _ => {}
        }
        Ok(())
    }

    fn toggle(&mut self) -> Result<(), VimError> {
        self.board.flip_board();
        Ok(())
    }

    // ---------  Normal  -------------

    fn n_esc(&mut self) -> Result<(), VimError> {
        self.dispatch_normal();
        Ok(())
    }

    fn n_coords(&mut self) -> Result<(), VimError> {
        self.state.pending_file = Some(self.key_file()?);
        self.state.mode = Mode::NormalRank;
        Ok(())
    }

    fn n_piece(&mut self) -> Result<(), VimError> {
        let Some(color) = self.mover() else {
            debug!("no active player, ignoring piece key");
            return Ok(());
        };
        if let Some(square) = self.resolve_piece(color)? {
            self.state.selected = square;
            self.dispatch_select();
        }
        Ok(())
    }

    fn n_pawn(&mut self) -> Result<(), VimError> {
        let Some(color) = self.mover() else {
            return Ok(());
        };
        if let Some(square) = self.resolve_pawn(color)? {
            self.state.selected = square;
            self.dispatch_select();
        }
        Ok(())
    }

    fn n_highlight(&mut self) -> Result<(), VimError> {
        self.state.mode = Mode::Highlight;
        Ok(())
    }

    // ---------  Normal rank  -------------

    fn nr_coords(&mut self) -> Result<(), VimError> {
        let rank = self.key_rank()?;
        let Some(file) = self.state.pending_file.take() else {
            self.dispatch_normal();
            return Ok(());
        };
        self.state.selected = Coord::new(file, rank);
        self.dispatch_select();
        Ok(())
    }

    fn nr_esc(&mut self) -> Result<(), VimError> {
        self.dispatch_normal();
        Ok(())
    }

    // ---------  Selected  -------------

    fn s_esc(&mut self) -> Result<(), VimError> {
        self.dispatch_normal();
        Ok(())
    }

    fn s_coords(&mut self) -> Result<(), VimError> {
        let file = self.key_file()?;
        self.unmark_target_arrow();
        self.state.pending_file = Some(file);
        self.state.mode = Mode::SelectedRank;
        Ok(())
    }

    fn s_piece(&mut self) -> Result<(), VimError> {
        let Some(color) = self.mover() else {
            return Ok(());
        };
        if let Some(square) = self.resolve_piece(color)? {
            self.unmark_target_arrow();
            self.state.selected = square;
            self.dispatch_select();
        }
        Ok(())
    }

    fn s_capture_piece(&mut self) -> Result<(), VimError> {
        let Some(color) = self.mover() else {
            return Ok(());
        };
        if let Some(square) = self.resolve_piece(color.opponent())? {
            self.target_capture(square);
        }
        Ok(())
    }

    fn s_pawn(&mut self) -> Result<(), VimError> {
        let Some(color) = self.mover() else {
            return Ok(());
        };
        match self.resolve_pawn(color)? {
            Some(square) => {
                self.unmark_target_arrow();
                self.state.selected = square;
                self.dispatch_select();
            }
            None => self.dispatch_normal(),
        }
        Ok(())
    }

    fn s_capture_pawn(&mut self) -> Result<(), VimError> {
        let Some(color) = self.mover() else {
            return Ok(());
        };
        if let Some(square) = self.resolve_pawn(color.opponent())? {
            self.target_capture(square);
        }
        Ok(())
    }

    /// Target an enemy piece, provided exactly one legal move reaches it
    fn target_capture(&mut self, square: Coord) {
        let moves = self.board.moves_between(self.state.selected, square);
        match moves.len() {
            1 => {
                self.unmark_target_arrow();
                self.state.target = square;
                self.dispatch_confirm();
            }
            0 => {
                warn!("no move from {} captures on {square}", self.state.selected);
                self.clear_target();
            }
            n => {
                warn!("ambiguous: {n} moves from {} to {square}", self.state.selected);
                self.clear_target();
            }
        }
    }

    fn s_highlight(&mut self) -> Result<(), VimError> {
        self.board.highlight_moves_from(self.state.selected);
        self.dispatch_deselect();
        Ok(())
    }

    /// Play the one move that is either a pawn move onto the selected square
    /// or the move from the selection to the current target.
    fn s_enter(&mut self) -> Result<(), VimError> {
        let selected = self.state.selected;
        let target = self.state.target;
        let moves: Vec<_> = self
            .board
            .legal_moves()
            .into_iter()
            .filter(|m| {
                (m.to == selected && m.piece == PieceKind::Pawn)
                    || (target.is_valid() && m.from == selected && m.to == target)
            })
            .collect();
        let [only] = moves.as_slice() else {
            debug!(count = moves.len(), "enter does not pin down a single move");
            return Ok(());
        };
        info!("playing {}-{}", only.from, only.to);
        self.board.make_move(only.from, only.to, None)?;
        self.dispatch_normal();
        Ok(())
    }

    fn s_quick_move(&mut self) -> Result<(), VimError> {
        let direction = self.state.input_key;
        let selected = self.state.selected;
        let destinations = self.board.destinations_from(selected);
        let previous_target = (self.state.arrow_direction == Some(direction))
            .then_some(self.state.target)
            .filter(Coord::is_valid);

        let quick = QuickMove {
            piece: self.state.selected_piece,
            direction,
            farthest: self.state.input_shift_held,
            selected,
            previous_target,
            mover: self.mover().unwrap_or(PieceColor::White),
            destinations: &destinations,
        };
        let Some(target) = quick.resolve() else {
            debug!(%direction, piece = ?self.state.selected_piece, "no quick move");
            return Ok(());
        };

        // the old preview stays up when there is nowhere further to go
        self.unmark_target_arrow();
        self.state.arrow_direction = Some(direction);
        self.state.target = target;
        self.dispatch_confirm();
        Ok(())
    }

    // ---------  Selected rank  -------------

    fn sr_coords(&mut self) -> Result<(), VimError> {
        let rank = self.key_rank()?;
        let Some(file) = self.state.pending_file.take() else {
            self.state.mode = Mode::Selected;
            return Ok(());
        };
        self.state.target = Coord::new(file, rank);

        if self.board.is_legal_move(self.state.selected, self.state.target) {
            self.dispatch_confirm();
            return Ok(());
        }

        warn!("illegal move {}-{}", self.state.selected, self.state.target);
        match self.illegal_target {
            IllegalTargetPolicy::Reselect => self.dispatch_select(),
            IllegalTargetPolicy::ClearTarget => self.clear_target(),
        }
        Ok(())
    }

    fn sr_esc(&mut self) -> Result<(), VimError> {
        self.state.pending_file = None;
        self.state.mode = Mode::Selected;
        Ok(())
    }

    // ---------  Confirm  -------------

    fn c_esc(&mut self) -> Result<(), VimError> {
        self.unmark_target_arrow();
        if self.state.target.is_valid() {
            self.board.unmark_area(self.state.target);
        }
        self.state.arrow_direction = None;
        self.clear_target();
        Ok(())
    }

    fn c_enter(&mut self) -> Result<(), VimError> {
        let (from, to) = (self.state.selected, self.state.target);
        if self.board.is_legal_move(from, to) {
            info!("playing {from}-{to}");
            self.board.make_move(from, to, None)?;
            self.dispatch_normal();
        } else {
            warn!("illegal move {from}-{to}");
            self.board.alert("Illegal move");
            self.unmark_target_arrow();
            if to.is_valid() {
                self.board.unmark_area(to);
            }
            self.clear_target();
        }
        Ok(())
    }

    // ---------  Highlight  -------------

    fn h_esc(&mut self) -> Result<(), VimError> {
        self.dispatch_normal();
        Ok(())
    }

    fn h_piece(&mut self) -> Result<(), VimError> {
        let Some(color) = self.mover() else {
            return Ok(());
        };
        if let Some(square) = self.resolve_piece(color)? {
            self.board.highlight_moves_from(square);
        }
        Ok(())
    }

    fn h_pawn(&mut self) -> Result<(), VimError> {
        let Some(color) = self.mover() else {
            return Ok(());
        };
        if let Some(square) = self.resolve_pawn(color)? {
            self.board.highlight_moves_from(square);
        }
        Ok(())
    }

    // ---------  Shared transitions  -------------

    /// Enter Selected on `state.selected`. Assumes the selection is set.
    fn dispatch_select(&mut self) {
        self.unmark_target_arrow();
        self.state.target = Coord::EMPTY;
        self.state.pending_file = None;
        self.state.mode = Mode::Selected;
        self.state.arrow_direction = None;

        let selected = self.state.selected;
        self.board.select_area(selected);

        let pawn_moves = self.board.pawn_moves_onto(selected);
        if let [only] = pawn_moves.as_slice() {
            self.board.mark_arrow(only.from, selected);
        }

        self.state.selected_piece = self
            .board
            .piece_at(selected)
            .map_or(PieceKind::Empty, |p| p.kind);
        debug!(square = %selected, piece = ?self.state.selected_piece, "selected");
    }

    /// Leave Selected for Normal but keep highlight marks on the board
    fn dispatch_deselect(&mut self) {
        self.unmark_target_arrow();
        if self.state.selected.is_valid() {
            self.board.unselect_area(self.state.selected);
        }
        self.state.mode = Mode::Normal;
        self.state.arrow_direction = None;
        self.state.pending_file = None;
        self.state.selected = Coord::EMPTY;
        self.state.target = Coord::EMPTY;
    }

    /// Back to Normal with nothing selected and no marks left
    fn dispatch_normal(&mut self) {
        self.unmark_target_arrow();
        if self.state.selected.is_valid() {
            self.board.unselect_area(self.state.selected);
        }
        if self.state.target.is_valid() {
            self.board.unselect_area(self.state.target);
        }
        self.state.mode = Mode::Normal;
        self.state.arrow_direction = None;
        self.state.pending_file = None;
        self.state.selected = Coord::EMPTY;
        self.state.target = Coord::EMPTY;
        self.board.clear_all_markings();
    }

    fn dispatch_confirm(&mut self) {
        self.state.mode = Mode::Confirm;
        self.board.target_area(self.state.selected, self.state.target);
        debug!("confirm {}-{}", self.state.selected, self.state.target);
    }

    fn clear_target(&mut self) {
        self.state.target = Coord::EMPTY;
        self.state.mode = Mode::Selected;
    }

    fn unmark_target_arrow(&mut self) {
        if self.state.target.is_valid() && self.state.selected.is_valid() {
            self.board.unmark_arrow(self.state.selected, self.state.target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::testing::{Call, FakeBoard, sq};

    struct Harness {
        fsm: Fsm<Controller<FakeBoard>>,
        controller: Controller<FakeBoard>,
    }

    impl Harness {
        fn new(board: FakeBoard) -> Self {
            Self::with_policy(board, IllegalTargetPolicy::Reselect)
        }

        fn with_policy(board: FakeBoard, policy: IllegalTargetPolicy) -> Self {
            let mut fsm = Fsm::new();
            Controller::register(&mut fsm);
            Self {
                fsm,
                controller: Controller::new(board, policy),
            }
        }

        fn press(&mut self, key: Key) {
            self.press_with(key, false);
        }

        fn press_with(&mut self, key: Key, shift: bool) {
            self.controller.state_mut().input_shift_held = shift;
            self.fsm
                .dispatch(&mut self.controller, key)
                .expect("handler succeeds");
        }

        fn state(&self) -> &VimState {
            self.controller.state()
        }

        fn board(&self) -> &FakeBoard {
            self.controller.board()
        }

        fn clear_calls(&mut self) {
            self.controller.board_mut().calls.clear();
        }
    }

    fn opening() -> FakeBoard {
        FakeBoard::new(PieceColor::White)
            .with_piece("e2", PieceKind::Pawn, PieceColor::White)
            .with_piece("d2", PieceKind::Pawn, PieceColor::White)
            .with_piece("g1", PieceKind::Knight, PieceColor::White)
            .with_piece("b1", PieceKind::Knight, PieceColor::White)
            .with_piece("a1", PieceKind::Rook, PieceColor::White)
            .with_piece("e1", PieceKind::King, PieceColor::White)
            .with_piece("e8", PieceKind::King, PieceColor::Black)
            .with_move("e2", "e3", PieceKind::Pawn)
            .with_move("e2", "e4", PieceKind::Pawn)
            .with_move("d2", "d3", PieceKind::Pawn)
            .with_move("d2", "d4", PieceKind::Pawn)
            .with_move("g1", "f3", PieceKind::Knight)
            .with_move("g1", "h3", PieceKind::Knight)
            .with_move("b1", "a3", PieceKind::Knight)
            .with_move("b1", "c3", PieceKind::Knight)
    }

    #[test]
    fn test_file_then_rank_selects() {
        let mut h = Harness::new(opening());

        h.press(Key::E5);
        assert_eq!(h.state().mode, Mode::NormalRank);
        assert_eq!(h.state().pending_file, Some(4));
        assert_eq!(h.state().selected, Coord::EMPTY);

        h.press(Key::B2);
        assert_eq!(h.state().mode, Mode::Selected);
        assert_eq!(h.state().selected, sq("e2"));
        assert_eq!(h.state().selected_piece, PieceKind::Pawn);
        assert!(h.board().calls.contains(&Call::Select(sq("e2"))));
    }

    #[test]
    fn test_selecting_empty_square_draws_pawn_arrow() {
        let mut h = Harness::new(opening());

        h.press(Key::E5);
        h.press(Key::D4);
        assert_eq!(h.state().selected, sq("e4"));
        assert_eq!(h.state().selected_piece, PieceKind::Empty);
        assert!(h.board().calls.contains(&Call::MarkArrow(sq("e2"), sq("e4"))));

        h.press(Key::Enter);
        assert_eq!(h.board().made_moves(), vec![(sq("e2"), sq("e4"))]);
        assert_eq!(h.state().mode, Mode::Normal);
    }

    #[test]
    fn test_piece_key_selects_kingside_twin() {
        let mut h = Harness::new(opening());

        h.press(Key::KingKnight);
        assert_eq!(h.state().mode, Mode::Selected);
        assert_eq!(h.state().selected, sq("g1"));

        h.press(Key::QueenKnight);
        assert_eq!(h.state().selected, sq("b1"));
        assert_eq!(h.state().selected_piece, PieceKind::Knight);
    }

    #[test]
    fn test_single_queenside_rook() {
        let mut h = Harness::new(opening());

        h.press(Key::QueenRook);
        assert_eq!(h.state().mode, Mode::Selected);
        assert_eq!(h.state().selected, sq("a1"));
        assert_eq!(h.state().selected_piece, PieceKind::Rook);
        assert!(!h.board().calls.iter().any(|c| matches!(c, Call::MarkArrow(..))));
    }

    #[test]
    fn test_missing_piece_is_noop() {
        let mut h = Harness::new(opening());

        h.press(Key::Queen);
        assert_eq!(h.state().mode, Mode::Normal);
        assert_eq!(h.state().selected, Coord::EMPTY);
    }

    #[test]
    fn test_pawn_key_selects_unique_pawn() {
        let mut h = Harness::new(opening());

        h.press(Key::PawnD);
        assert_eq!(h.state().selected, sq("d2"));
        assert_eq!(h.state().mode, Mode::Selected);

        h.press(Key::PawnE);
        assert_eq!(h.state().selected, sq("e2"));
    }

    #[test]
    fn test_ambiguous_pawn_aborts() {
        let board = opening().with_piece("e3", PieceKind::Pawn, PieceColor::White);
        let mut h = Harness::new(board);

        h.press(Key::PawnE);
        assert_eq!(h.state().mode, Mode::Normal);
        assert_eq!(h.state().selected, Coord::EMPTY);

        h.press(Key::PawnD);
        assert_eq!(h.state().mode, Mode::Selected);
        h.press(Key::PawnA);
        assert_eq!(h.state().mode, Mode::Normal);
        assert_eq!(h.state().selected, Coord::EMPTY);
    }

    #[test]
    fn test_typed_target_goes_to_confirm_then_plays() {
        let mut h = Harness::new(opening());

        h.press(Key::PawnE);
        h.press(Key::E5);
        assert_eq!(h.state().mode, Mode::SelectedRank);
        h.press(Key::D4);
        assert_eq!(h.state().mode, Mode::Confirm);
        assert_eq!(h.state().target, sq("e4"));
        assert!(h.board().calls.contains(&Call::Target(sq("e2"), sq("e4"))));

        h.press(Key::Enter);
        assert_eq!(h.board().made_moves(), vec![(sq("e2"), sq("e4"))]);
        assert_eq!(h.state().mode, Mode::Normal);
        assert_eq!(h.state().selected, Coord::EMPTY);
        assert_eq!(h.state().target, Coord::EMPTY);
    }

    #[test]
    fn test_illegal_typed_target_reselects() {
        let mut h = Harness::new(opening());

        h.press(Key::PawnE);
        h.clear_calls();
        h.press(Key::E5);
        h.press(Key::E5);
        assert_eq!(h.state().mode, Mode::Selected);
        assert_eq!(h.state().target, Coord::EMPTY);
        assert!(h.board().calls.contains(&Call::Select(sq("e2"))));
    }

    #[test]
    fn test_illegal_typed_target_clear_policy() {
        let mut h = Harness::with_policy(opening(), IllegalTargetPolicy::ClearTarget);

        h.press(Key::PawnE);
        h.clear_calls();
        h.press(Key::E5);
        h.press(Key::E5);
        assert_eq!(h.state().mode, Mode::Selected);
        assert_eq!(h.state().target, Coord::EMPTY);
        assert!(!h.board().calls.contains(&Call::Select(sq("e2"))));
    }

    #[test]
    fn test_confirm_illegal_never_moves() {
        let mut h = Harness::new(opening());

        h.press(Key::PawnE);
        h.press(Key::E5);
        h.press(Key::D4);
        assert_eq!(h.state().mode, Mode::Confirm);

        h.controller.board_mut().legality_override = Some(false);
        h.press(Key::Enter);
        assert!(h.board().made_moves().is_empty());
        assert_eq!(h.state().mode, Mode::Selected);
        assert_eq!(h.state().target, Coord::EMPTY);
        assert_eq!(h.state().selected, sq("e2"));
        assert!(h.board().calls.contains(&Call::Alert("Illegal move".into())));
    }

    #[test]
    fn test_confirm_escape_returns_to_selected() {
        let mut h = Harness::new(opening());

        h.press(Key::KingKnight);
        h.press(Key::F6);
        h.press(Key::C3);
        assert_eq!(h.state().mode, Mode::Confirm);

        h.press(Key::Esc);
        assert_eq!(h.state().mode, Mode::Selected);
        assert_eq!(h.state().target, Coord::EMPTY);
        assert!(h.board().calls.contains(&Call::Unmark(sq("f3"))));
    }

    #[test]
    fn test_escape_to_normal_clears_marks() {
        for setup in [
            vec![],
            vec![Key::E5],
            vec![Key::PawnE],
            vec![Key::Highlight],
        ] {
            let mut h = Harness::new(opening());
            for key in setup {
                h.press(key);
            }
            h.clear_calls();
            h.press(Key::Esc);
            assert_eq!(h.state().mode, Mode::Normal);
            assert_eq!(h.state().selected, Coord::EMPTY);
            assert_eq!(h.state().target, Coord::EMPTY);
            assert_eq!(h.state().pending_file, None);
            assert!(h.board().calls.contains(&Call::ClearAll));
        }
    }

    #[test]
    fn test_selected_rank_escape_keeps_selection() {
        let mut h = Harness::new(opening());

        h.press(Key::PawnE);
        h.press(Key::E5);
        h.press(Key::Esc);
        assert_eq!(h.state().mode, Mode::Selected);
        assert_eq!(h.state().selected, sq("e2"));
        assert_eq!(h.state().pending_file, None);
    }

    #[test]
    fn test_capture_piece_targets_unique_move() {
        let board = FakeBoard::new(PieceColor::White)
            .with_piece("d4", PieceKind::Rook, PieceColor::White)
            .with_piece("d7", PieceKind::Queen, PieceColor::Black)
            .with_move("d4", "d7", PieceKind::Rook);
        let mut h = Harness::new(board);

        h.press(Key::QueenRook);
        h.press(Key::TakeQueen);
        assert_eq!(h.state().mode, Mode::Confirm);
        assert_eq!(h.state().target, sq("d7"));
    }

    #[test]
    fn test_capture_piece_without_move_clears_target() {
        let board = FakeBoard::new(PieceColor::White)
            .with_piece("d4", PieceKind::Rook, PieceColor::White)
            .with_piece("e7", PieceKind::Queen, PieceColor::Black);
        let mut h = Harness::new(board);

        h.press(Key::QueenRook);
        h.press(Key::TakeQueen);
        assert_eq!(h.state().mode, Mode::Selected);
        assert_eq!(h.state().target, Coord::EMPTY);
    }

    #[test]
    fn test_capture_pawn_targets_enemy_pawn() {
        let board = FakeBoard::new(PieceColor::White)
            .with_piece("e4", PieceKind::Pawn, PieceColor::White)
            .with_piece("d5", PieceKind::Pawn, PieceColor::Black)
            .with_move("e4", "d5", PieceKind::Pawn)
            .with_move("e4", "e5", PieceKind::Pawn);
        let mut h = Harness::new(board);

        h.press(Key::PawnE);
        h.press(Key::TakePawnD);
        assert_eq!(h.state().mode, Mode::Confirm);
        assert_eq!(h.state().target, sq("d5"));
    }

    #[test]
    fn test_quick_move_repeats_from_previous_target() {
        let board = FakeBoard::new(PieceColor::White)
            .with_piece("d4", PieceKind::Rook, PieceColor::White)
            .with_move("d4", "d5", PieceKind::Rook)
            .with_move("d4", "d6", PieceKind::Rook)
            .with_move("d4", "d7", PieceKind::Rook)
            .with_move("d4", "c4", PieceKind::Rook);
        let mut h = Harness::new(board);

        h.press(Key::QueenRook);
        h.press(Key::Num8);
        assert_eq!(h.state().mode, Mode::Confirm);
        assert_eq!(h.state().target, sq("d5"));

        h.press(Key::Num8);
        assert_eq!(h.state().target, sq("d6"));
        assert!(h.board().calls.contains(&Call::UnmarkArrow(sq("d4"), sq("d5"))));

        h.press(Key::Num4);
        assert_eq!(h.state().target, sq("c4"));

        h.press_with(Key::Num8, true);
        assert_eq!(h.state().target, sq("d7"));

        h.press(Key::Enter);
        assert_eq!(h.board().made_moves(), vec![(sq("d4"), sq("d7"))]);
    }

    #[test]
    fn test_quick_move_past_the_edge_keeps_preview() {
        let board = FakeBoard::new(PieceColor::White)
            .with_piece("d4", PieceKind::Rook, PieceColor::White)
            .with_move("d4", "d5", PieceKind::Rook)
            .with_move("d4", "d6", PieceKind::Rook);
        let mut h = Harness::new(board);

        h.press(Key::QueenRook);
        h.press_with(Key::Num8, true);
        assert_eq!(h.state().target, sq("d6"));
        h.clear_calls();

        h.press(Key::Num8);
        assert_eq!(h.state().mode, Mode::Confirm);
        assert_eq!(h.state().target, sq("d6"));
        assert!(h.board().calls.is_empty());

        h.press(Key::Enter);
        assert_eq!(h.board().made_moves(), vec![(sq("d4"), sq("d6"))]);
    }

    #[test]
    fn test_quick_move_rejects_wrong_direction() {
        let board = FakeBoard::new(PieceColor::White)
            .with_piece("d4", PieceKind::Rook, PieceColor::White)
            .with_move("d4", "e5", PieceKind::Rook);
        let mut h = Harness::new(board);

        h.press(Key::QueenRook);
        h.press(Key::Num9);
        assert_eq!(h.state().mode, Mode::Selected);
        assert_eq!(h.state().target, Coord::EMPTY);
    }

    #[test]
    fn test_highlight_mode_marks_without_selecting() {
        let mut h = Harness::new(opening());

        h.press(Key::Highlight);
        h.press(Key::KingKnight);
        assert_eq!(h.state().mode, Mode::Highlight);
        assert!(h.board().calls.contains(&Call::Mark(sq("f3"))));
        assert!(h.board().calls.contains(&Call::Mark(sq("h3"))));

        h.press(Key::PawnD);
        assert!(h.board().calls.contains(&Call::Mark(sq("d4"))));
        assert_eq!(h.state().selected, Coord::EMPTY);
    }

    #[test]
    fn test_selected_highlight_deselects() {
        let mut h = Harness::new(opening());

        h.press(Key::KingKnight);
        h.clear_calls();
        h.press(Key::Highlight);
        assert_eq!(h.state().mode, Mode::Normal);
        assert_eq!(h.state().selected, Coord::EMPTY);
        assert!(h.board().calls.contains(&Call::Mark(sq("f3"))));
        assert!(!h.board().calls.contains(&Call::ClearAll));
    }

    #[test]
    fn test_master_keys_fire_in_any_mode() {
        let mut h = Harness::new(opening());

        h.press(Key::PawnE);
        h.press(Key::Menu3);
        h.press(Key::Next);
        h.press(Key::Previous);
        h.press(Key::Toggle);
        assert_eq!(
            h.board().calls[h.board().calls.len() - 4..],
            [Call::Menu(2), Call::Next, Call::Prev, Call::Flip]
        );
        assert_eq!(h.state().mode, Mode::Selected);
    }

    #[test]
    fn test_spectator_piece_keys_do_nothing() {
        let mut board = opening();
        board.side = None;
        let mut h = Harness::new(board);

        h.press(Key::KingKnight);
        h.press(Key::PawnE);
        assert_eq!(h.state().mode, Mode::Normal);
    }

    #[test]
    fn test_reset_returns_to_normal() {
        let mut h = Harness::new(opening());

        h.press(Key::PawnE);
        h.press(Key::E5);
        h.controller.reset();
        assert_eq!(h.state().mode, Mode::Normal);
        assert_eq!(h.state().selected, Coord::EMPTY);
        assert_eq!(h.state().pending_file, None);
        assert_eq!(h.board().calls.last(), Some(&Call::ClearAll));
    }

    #[test]
    fn test_every_mode_handles_escape() {
        let mut fsm = Fsm::new();
        Controller::<FakeBoard>::register(&mut fsm);
        for mode in [
            Mode::Normal,
            Mode::NormalRank,
            Mode::Selected,
            Mode::SelectedRank,
            Mode::Confirm,
            Mode::Highlight,
        ] {
            assert!(fsm.handles(mode, Key::Esc), "{mode:?} ignores escape");
        }
    }

    #[test]
    fn test_each_mode_handles_exactly_its_keys() {
        use std::collections::HashSet;

        let mut fsm = Fsm::new();
        Controller::<FakeBoard>::register(&mut fsm);

        let tables: [&[Key]; 7] = [
            &COORD_KEYS,
            &PIECE_KEYS,
            &CAPTURE_PIECE_KEYS,
            &PAWN_KEYS,
            &CAPTURE_PAWN_KEYS,
            &NUMPAD,
            &MENU_KEYS,
        ];
        let loose = [
            Key::Esc,
            Key::Invalid,
            Key::Enter,
            Key::Pawn,
            Key::TakePawn,
            Key::Search,
            Key::Highlight,
            Key::Toggle,
            Key::FlipBoard,
        ];
        let every_key: HashSet<Key> = tables
            .iter()
            .flat_map(|t| t.iter().copied())
            .chain(loose)
            .collect();

        let set = |groups: &[&[Key]]| -> HashSet<Key> {
            groups
                .iter()
                .flat_map(|g| g.iter().copied())
                .chain(MENU_KEYS)
                .chain([Key::Toggle])
                .collect()
        };
        let expected = [
            (
                Mode::Normal,
                set(&[
                    &[Key::Esc, Key::Highlight],
                    &COORD_KEYS,
                    &PIECE_KEYS,
                    &PAWN_KEYS,
                    &CAPTURE_PAWN_KEYS,
                ]),
            ),
            (Mode::NormalRank, set(&[&[Key::Esc], &COORD_KEYS])),
            (
                Mode::Selected,
                set(&[
                    &[Key::Esc, Key::Highlight, Key::Enter],
                    &COORD_KEYS,
                    &PIECE_KEYS,
                    &CAPTURE_PIECE_KEYS,
                    &PAWN_KEYS,
                    &CAPTURE_PAWN_KEYS,
                    &NUMPAD,
                ]),
            ),
            (Mode::SelectedRank, set(&[&[Key::Esc], &COORD_KEYS])),
            (Mode::Confirm, set(&[&[Key::Esc, Key::Enter], &NUMPAD])),
            (
                Mode::Highlight,
                set(&[&[Key::Esc], &PIECE_KEYS, &PAWN_KEYS, &CAPTURE_PAWN_KEYS]),
            ),
        ];

        for (mode, keys) in expected {
            for key in &every_key {
                assert_eq!(
                    fsm.handles(mode, *key),
                    keys.contains(key),
                    "{mode:?} / {key:?}"
                );
            }
        }
    }
}
