//! Builder pattern implementation for state machines

use std::fmt::Debug;
use std::time::Duration;

use crate::error::FsmResult;
use crate::state::{Action, State, StateId, StateRegistry};
use crate::Fsm;

enum Pending<E> {
    Event {
        from: Option<StateId>,
        to: Option<StateId>,
        event: E,
        on_transition: Option<Action>,
    },
    Timed {
        from: Option<StateId>,
        to: Option<StateId>,
        interval: Duration,
        on_transition: Option<Action>,
    },
}

/// Builder for constructing state machines
///
/// States are registered first so their ids can be used to declare transitions.
/// Transitions are registered on the machine in declaration order by
/// [`FsmBuilder::build`], under the same rules as [`Fsm::add_transition`].
pub struct FsmBuilder<E = i32>
where
    E: PartialEq + Debug,
{
    states: StateRegistry,
    pending: Vec<Pending<E>>,
}

impl<E> FsmBuilder<E>
where
    E: PartialEq + Debug,
{
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            states: StateRegistry::new(),
            pending: Vec::new(),
        }
    }

    /// Add a state to the state machine
    pub fn state(&mut self, state: State) -> StateId {
        self.states.insert(state)
    }

    /// Declare an event transition
    pub fn transition(
        &mut self,
        from: impl Into<Option<StateId>>,
        to: impl Into<Option<StateId>>,
        event: E,
        on_transition: Option<Action>,
    ) -> &mut Self {
        self.pending.push(Pending::Event {
            from: from.into(),
            to: to.into(),
            event,
            on_transition,
        });
        self
    }

    /// Declare a timed transition
    pub fn timed_transition(
        &mut self,
        from: impl Into<Option<StateId>>,
        to: impl Into<Option<StateId>>,
        interval: Duration,
        on_transition: Option<Action>,
    ) -> &mut Self {
        self.pending.push(Pending::Timed {
            from: from.into(),
            to: to.into(),
            interval,
            on_transition,
        });
        self
    }

    /// Build the state machine
    pub fn build(self, initial: StateId) -> FsmResult<Fsm<E>> {
        let mut fsm = Fsm::new(self.states, initial)?;
        for pending in self.pending {
            match pending {
                Pending::Event {
                    from,
                    to,
                    event,
                    on_transition,
                } => fsm.add_transition(from, to, event, on_transition),
                Pending::Timed {
                    from,
                    to,
                    interval,
                    on_transition,
                } => fsm.add_timed_transition(from, to, interval, on_transition),
            }
        }
        Ok(fsm)
    }
}

impl<E> Default for FsmBuilder<E>
where
    E: PartialEq + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
