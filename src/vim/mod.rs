//! Modal keyboard move entry.

pub mod controller;
pub mod fsm;
pub mod quick_move;
pub mod session;
pub mod state;
pub mod status;

pub use controller::{Controller, IllegalTargetPolicy};
pub use session::Vim;
pub use state::{Mode, StatusSnapshot, VimState};
pub use status::{Presenter, StatusLine};
