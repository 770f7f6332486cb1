//! Table-driven dispatcher mapping (mode, key) to a handler.
//!
//! The engine holds no state of its own. Handlers are plain function
//! pointers over the machine they drive, so the table can live next to the
//! machine without borrowing it.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Something a [`Fsm`] can drive
pub trait Machine {
    type Mode: Copy + Eq + Hash + Debug;
    type Key: Copy + Eq + Hash + Debug;
    type Error;

    fn mode(&self) -> Self::Mode;

    /// Record the key being dispatched, before any handler runs
    fn set_input(&mut self, key: Self::Key);
}

pub type Handler<M> = fn(&mut M) -> Result<(), <M as Machine>::Error>;

/// What a dispatch call ended up doing
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Dispatched {
    pub master: bool,
    pub mode: bool,
}

impl Dispatched {
    pub fn ignored(&self) -> bool {
        !self.master && !self.mode
    }
}

pub struct Fsm<M: Machine> {
    modes: HashMap<M::Mode, HashMap<M::Key, Handler<M>>>,
    master: HashMap<M::Key, Handler<M>>,
}

impl<M: Machine> Fsm<M> {
    pub fn new() -> Self {
        Self {
            modes: HashMap::new(),
            master: HashMap::new(),
        }
    }

    /// Register a handler that fires in every mode, ahead of the mode table
    pub fn on(&mut self, keys: &[M::Key], handler: Handler<M>) -> &mut Self {
        for key in keys {
            self.master.insert(*key, handler);
        }
        self
    }

    /// Start registering handlers for one mode
    pub fn mode(&mut self, mode: M::Mode) -> ModeEvents<'_, M> {
        ModeEvents {
            events: self.modes.entry(mode).or_default(),
        }
    }

    /// Whether `key` does anything in `mode`
    pub fn handles(&self, mode: M::Mode, key: M::Key) -> bool {
        self.master.contains_key(&key)
            || self
                .modes
                .get(&mode)
                .is_some_and(|events| events.contains_key(&key))
    }

    /// Run one key through the tables.
    ///
    /// The master handler runs first; the mode handler is looked up against
    /// the mode as it stands afterwards. Keys with no handler are ignored.
    pub fn dispatch(&self, machine: &mut M, key: M::Key) -> Result<Dispatched, M::Error> {
        machine.set_input(key);
        let mut dispatched = Dispatched::default();

        if let Some(handler) = self.master.get(&key) {
            handler(machine)?;
            dispatched.master = true;
        }

        let handler = self
            .modes
            .get(&machine.mode())
            .and_then(|events| events.get(&key));
        if let Some(handler) = handler {
            handler(machine)?;
            dispatched.mode = true;
        }

        Ok(dispatched)
    }
}

impl<M: Machine> Default for Fsm<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder returned by [`Fsm::mode`]
pub struct ModeEvents<'a, M: Machine> {
    events: &'a mut HashMap<M::Key, Handler<M>>,
}

impl<M: Machine> ModeEvents<'_, M> {
    pub fn on(self, keys: &[M::Key], handler: Handler<M>) -> Self {
        for key in keys {
            self.events.insert(*key, handler);
        }
        self
    }
}
