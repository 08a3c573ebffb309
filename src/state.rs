//! States and the registry that owns them.
//!
//! A [`State`] is a passive holder of up to three callbacks. States are handed to a
//! [`StateRegistry`], which is the only thing that can mint a [`StateId`]. The engine
//! takes the registry by value, so a transition can never point at a state that has
//! already been dropped.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// A zero-argument callback run by the engine.
///
/// Callbacks must return promptly: they run inside the host's tick.
pub type Action = Box<dyn FnMut() + Send>;

static NEXT_REGISTRY: AtomicU32 = AtomicU32::new(0);

/// Identity of a state inside a [`StateRegistry`].
///
/// Carries the tag of the registry that issued it, so ids never resolve
/// against another registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId {
    registry: u32,
    index: usize,
}

impl StateId {
    /// Position of the state in its registry.
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.index)
    }
}

/// A state with optional enter, during and exit callbacks.
#[derive(Default)]
pub struct State {
    name: Option<String>,
    on_enter: Option<Action>,
    on_state: Option<Action>,
    on_exit: Option<Action>,
}

impl State {
    /// A state with no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// A state with no callbacks and a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Build a state from three optional callbacks in one go.
    pub fn from_callbacks(
        on_enter: Option<Action>,
        on_state: Option<Action>,
        on_exit: Option<Action>,
    ) -> Self {
        Self {
            name: None,
            on_enter,
            on_state,
            on_exit,
        }
    }

    /// Set the callback run when the state is entered.
    pub fn on_enter<F>(mut self, f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_enter = Some(Box::new(f));
        self
    }

    /// Set the callback run on every tick while the state is current.
    pub fn on_state<F>(mut self, f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_state = Some(Box::new(f));
        self
    }

    /// Set the callback run when the state is left.
    pub fn on_exit<F>(mut self, f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_exit = Some(Box::new(f));
        self
    }

    /// Display name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn enter(&mut self) {
        if let Some(f) = self.on_enter.as_mut() {
            f();
        }
    }

    pub(crate) fn during(&mut self) {
        if let Some(f) = self.on_state.as_mut() {
            f();
        }
    }

    pub(crate) fn exit(&mut self) {
        if let Some(f) = self.on_exit.as_mut() {
            f();
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_state", &self.on_state.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

/// Append-only arena of states.
#[derive(Debug)]
pub struct StateRegistry {
    tag: u32,
    states: Vec<State>,
}

impl StateRegistry {
    /// An empty registry with its own id space.
    pub fn new() -> Self {
        Self {
            tag: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            states: Vec::new(),
        }
    }

    /// Store a state and return its identity.
    pub fn insert(&mut self, state: State) -> StateId {
        self.states.push(state);
        StateId {
            registry: self.tag,
            index: self.states.len() - 1,
        }
    }

    /// Whether `id` was issued by this registry.
    pub fn contains(&self, id: StateId) -> bool {
        id.registry == self.tag && id.index < self.states.len()
    }

    /// Look up a state.
    pub fn get(&self, id: StateId) -> Option<&State> {
        if self.contains(id) {
            self.states.get(id.index)
        } else {
            None
        }
    }

    pub(crate) fn get_mut(&mut self, id: StateId) -> Option<&mut State> {
        if self.contains(id) {
            self.states.get_mut(id.index)
        } else {
            None
        }
    }

    /// Label used in logs and diagrams: the state's name, or its id.
    pub fn label(&self, id: StateId) -> String {
        match self.get(id).and_then(State::name) {
            Some(name) => name.to_string(),
            None => id.to_string(),
        }
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no state has been registered.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All issued ids, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = StateId> + '_ {
        let registry = self.tag;
        (0..self.states.len()).map(move |index| StateId { registry, index })
    }
}

impl Default for StateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
