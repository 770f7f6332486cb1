//! Interaction state threaded through every handler.

use crate::domain::{Coord, Key, PieceKind};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Mode {
    /// Nothing selected
    #[default]
    Normal,
    /// A file has been typed, waiting for its rank
    NormalRank,
    /// A source square is selected
    Selected,
    /// A target file has been typed, waiting for its rank
    SelectedRank,
    /// Source and target are both set, waiting for enter
    Confirm,
    /// Piece keys highlight destinations instead of selecting
    Highlight,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::NormalRank => "NORMAL-R",
            Mode::Selected => "SELECTED",
            Mode::SelectedRank => "SELECTED-R",
            Mode::Confirm => "CONFIRM",
            Mode::Highlight => "HIGHLIGHT",
        }
    }
}

#[derive(Clone, Debug)]
pub struct VimState {
    pub mode: Mode,
    /// Origin of the move being built
    pub selected: Coord,
    /// Candidate destination
    pub target: Coord,
    /// File typed in NR/SR, waiting for a rank
    pub pending_file: Option<i8>,
    pub input_key: Key,
    pub input_shift_held: bool,
    /// Kind of the piece on `selected`, cached at selection time
    pub selected_piece: PieceKind,
    /// Direction of the last quick-move, for repeat detection
    pub arrow_direction: Option<Key>,
    /// Echo of the last key, for the status bar
    pub message: String,
}

impl VimState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            selected: Coord::EMPTY,
            target: Coord::EMPTY,
            pending_file: None,
            input_key: Key::Invalid,
            input_shift_held: false,
            selected_piece: PieceKind::Empty,
            arrow_direction: None,
            message: String::new(),
        }
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            mode: self.mode,
            selected: self.selected,
            target: self.target,
            pending_file: self.pending_file,
            message: self.message.clone(),
        }
    }
}

impl Default for VimState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the state handed to the status presenter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub mode: Mode,
    pub selected: Coord,
    pub target: Coord,
    pub pending_file: Option<i8>,
    pub message: String,
}
