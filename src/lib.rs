//! Modal, vim-style keyboard move entry for chess.
//!
//! Keys are read from an [`input::InputSource`], run through a per-mode
//! dispatch table and turned into selection, marking and move commands on a
//! [`board::Board`].

pub mod board;
pub mod config;
pub mod domain;
pub mod error;
pub mod input;
pub mod models;
pub mod vim;

#[cfg(feature = "gui")]
pub mod app;
#[cfg(feature = "gui")]
pub mod ui;

pub use board::{Board, BoardEvent, BoardExt, LegalMove};
pub use config::{Config, PlayAs};
pub use error::{BoardError, ScriptError, VimError};
pub use models::GameModel;
pub use vim::{IllegalTargetPolicy, Mode, StatusLine, StatusSnapshot, Vim};
