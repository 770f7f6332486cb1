//! Keyboard input: raw key presses, layouts and the async reader.

pub mod keymap;

use std::future::Future;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};
use tracing::trace;

use crate::domain::Key;

pub use keymap::{parse_script, translate};

/// A physical key press before layout translation.
///
/// `key` is the unshifted key name: a single character such as `"a"` or
/// `";"`, or one of `"escape"`, `"enter"`, `"space"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawKey {
    pub key: String,
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl RawKey {
    pub fn named(key: &str) -> Self {
        Self {
            key: key.to_string(),
            shift: false,
            control: false,
            alt: false,
        }
    }

    /// The key that types `c`. Uppercase letters and `<`/`>` imply shift.
    pub fn from_char(c: char) -> Self {
        let (key, shift) = match c {
            ' ' => return Self::named("space"),
            '\n' | '\r' => return Self::named("enter"),
            '<' => (',', true),
            '>' => ('.', true),
            c if c.is_ascii_uppercase() => (c.to_ascii_lowercase(), true),
            c => (c, false),
        };
        Self {
            key: key.to_string(),
            shift,
            control: false,
            alt: false,
        }
    }
}

/// A translated key press
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// Where the session reads its keys from
pub trait InputSource {
    /// Next key press, translated for the side to play. `None` once the
    /// source has closed.
    fn read(&mut self, is_white: bool) -> impl Future<Output = Option<KeyPress>>;
}

/// Translates a stream of raw keys with the layout of the side to play
pub struct KeyReader<S> {
    keys: S,
}

impl<S> KeyReader<S>
where
    S: Stream<Item = RawKey> + Unpin,
{
    pub fn new(keys: S) -> Self {
        Self { keys }
    }
}

impl<S> InputSource for KeyReader<S>
where
    S: Stream<Item = RawKey> + Unpin,
{
    async fn read(&mut self, is_white: bool) -> Option<KeyPress> {
        let raw = self.keys.next().await?;
        let key = translate(&raw, is_white);
        trace!(raw = %raw.key, shift = raw.shift, %key, "translated");
        Some(KeyPress {
            key,
            shift: raw.shift,
        })
    }
}

pub type KeySender = UnboundedSender<RawKey>;

/// A sender for a window to push key presses into, and the reader draining it
pub fn keyboard_channel() -> (KeySender, KeyReader<UnboundedReceiver<RawKey>>) {
    let (tx, rx) = mpsc::unbounded();
    (tx, KeyReader::new(rx))
}
