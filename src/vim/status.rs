//! Status line shown under the board.

use crate::domain::Coord;
use crate::vim::state::{Mode, StatusSnapshot};

/// Receives a snapshot after every processed key
pub trait Presenter {
    fn on_input(&mut self, status: &StatusSnapshot);
}

impl<F: FnMut(&StatusSnapshot)> Presenter for F {
    fn on_input(&mut self, status: &StatusSnapshot) {
        self(status)
    }
}

/// Text projection of a [`StatusSnapshot`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusLine {
    /// Mode label, e.g. "SELECTED"
    pub status: String,
    /// What has been typed for the move in progress
    pub message: String,
    /// Echo of the last key
    pub buffer: String,
}

impl StatusLine {
    pub fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        let pending = snapshot
            .pending_file
            .and_then(Coord::file_char)
            .map(String::from)
            .unwrap_or_default();

        let message = match snapshot.mode {
            Mode::Normal | Mode::Highlight => String::new(),
            Mode::NormalRank => pending,
            Mode::Selected => snapshot.selected.to_square(),
            Mode::SelectedRank => format!("{} {pending}", snapshot.selected),
            Mode::Confirm => format!("{}-{}", snapshot.selected, snapshot.target),
        };

        Self {
            status: snapshot.mode.label().to_string(),
            message,
            buffer: snapshot.message.clone(),
        }
    }
}

impl std::fmt::Display for StatusLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "-- {} --", self.status)?;
        if !self.message.is_empty() {
            write!(f, " {}", self.message)?;
        }
        if !self.buffer.is_empty() {
            write!(f, " [{}]", self.buffer)?;
        }
        Ok(())
    }
}
