//! Theme constants and colors for the chess UI.

use gpui::{Rgba, rgb};

// Layout constants
pub const BOARD_PADDING: f32 = 20.0;
pub const SQUARE_SIZE: f32 = 64.0;
pub const PIECE_SCALE: f32 = 0.8; // glyph size relative to square
pub const STATUS_HEIGHT: f32 = 28.0;

// Initial panel sizes
pub const INITIAL_LEFT_PANEL: f32 = 560.0;
pub const INITIAL_RIGHT_PANEL: f32 = 240.0;

// Board colors
pub const LIGHT_SQUARE: u32 = 0xEFD9B5;
pub const DARK_SQUARE: u32 = 0xB48764;

// Overlay colors
pub const SELECTED_SQUARE: u32 = 0x7FA650;
pub const MARKED_SQUARE: u32 = 0x6A9FC8;
pub const TARGET_SQUARE: u32 = 0xD9A53F;
pub const ARROW_COLOR: u32 = 0x15781B;

// Panel colors
pub const PANEL_BG: u32 = 0x2a2a2a;
pub const STATUS_BG: u32 = 0x1e1e1e;
pub const ALERT_BG: u32 = 0x8b2e2e;
pub const BORDER_COLOR: u32 = 0x4a4a4a;
pub const TEXT_PRIMARY: u32 = 0xffffff;
pub const TEXT_SECONDARY: u32 = 0x888888;

/// Get the color for a board square. a1 is dark.
pub fn square_color(file: i8, rank: i8) -> Rgba {
    if (file + rank) % 2 == 0 {
        rgb(DARK_SQUARE)
    } else {
        rgb(LIGHT_SQUARE)
    }
}
