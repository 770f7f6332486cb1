mod game;

pub use game::{GameModel, Marks, MenuEntry};
