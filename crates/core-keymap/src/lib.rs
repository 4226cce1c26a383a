//! core-keymap: key-binding tables keyed by physical key.
//!
//! A [`Keymap`] maps a [`KeyEvent`] (key code plus modifiers) to a handler of
//! any type. The shell keeps one global table; every view may carry a local
//! one. Lookup is exact: `Ctrl+S` and `S` are different keys, and printable
//! characters are matched by the character the terminal reported.
//!
//! Binding a key twice replaces the earlier handler (later binding wins) and
//! logs the override at `warn`.

use std::collections::HashMap;

use core_events::KeyEvent;
use tracing::{trace, warn};

pub struct Keymap<H> {
    bindings: HashMap<KeyEvent, H>,
}

impl<H> Default for Keymap<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Keymap<H> {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `key` to `handler`, returning the handler it replaced, if any.
    pub fn bind(&mut self, key: KeyEvent, handler: H) -> Option<H> {
        let previous = self.bindings.insert(key, handler);
        if previous.is_some() {
            warn!(target: "view.keymap", key = %key, "binding_override");
        } else {
            trace!(target: "view.keymap", key = %key, "bind");
        }
        previous
    }

    pub fn unbind(&mut self, key: &KeyEvent) -> Option<H> {
        self.bindings.remove(key)
    }

    pub fn get(&self, key: &KeyEvent) -> Option<&H> {
        self.bindings.get(key)
    }

    pub fn get_mut(&mut self, key: &KeyEvent) -> Option<&mut H> {
        self.bindings.get_mut(key)
    }

    pub fn contains(&self, key: &KeyEvent) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &KeyEvent> {
        self.bindings.keys()
    }
}
