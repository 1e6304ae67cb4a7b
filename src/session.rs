use std::{cell::Cell, rc::Rc};

use crate::{nfa::Symbol, Nfa, StateId};

/// A construction session hands out the labels of NFA states.
///
/// Every fragment remembers the session it was created in and fragments can only be combined
/// with fragments of the same session. Labels start at 0 for each session, so building the same
/// expression twice in two fresh sessions yields identically numbered automata.
///
/// Cloning a session is cheap, all clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct Session {
    next_state: Rc<Cell<usize>>,
}

impl Session {
    /// Create a new session whose first state label is 0.
    pub fn new() -> Self {
        Session::default()
    }

    /// Allocate a fresh state label.
    pub fn state(&self) -> StateId {
        let id = self.next_state.get();
        self.next_state.set(id + 1);
        StateId::new(id)
    }

    /// Get the number of state labels allocated so far.
    pub fn state_count(&self) -> usize {
        self.next_state.get()
    }

    /// Create a fragment that recognizes exactly the given symbol.
    pub fn literal<S: Symbol>(&self, symbol: S) -> Nfa<S> {
        Nfa::literal(self, symbol)
    }

    /// Create a fragment that recognizes only the empty string.
    pub fn epsilon<S: Symbol>(&self) -> Nfa<S> {
        Nfa::epsilon(self)
    }

    // Make sure that labels handed out later don't collide with the given one.
    pub(crate) fn reserve_through(&self, id: StateId) {
        if id.as_usize() >= self.next_state.get() {
            self.next_state.set(id.as_usize() + 1);
        }
    }

    pub(crate) fn is_same(&self, other: &Session) -> bool {
        Rc::ptr_eq(&self.next_state, &other.next_state)
    }
}
