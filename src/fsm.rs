//! A tick-driven finite state machine (FSM) with event-triggered and timed transitions,
//! meant to be stepped once per iteration of an embedded control loop.
//!
//! # Type Parameters
//! - `E`: Event code type. Must implement `PartialEq` and `Debug`. Defaults to `i32`.
//!
//! # Features
//! - Enter / during / exit callbacks per state, all optional.
//! - Event transitions matched on `(current state, event)`, first registered wins.
//! - Timed transitions that fire once the machine has spent an interval in a state.
//! - Optional PlantUML export of the registered graph (enabled with the `plantuml` feature in debug builds).
//!
//! # Usage
//! 1. Register each [`State`](crate::State) in a [`StateRegistry`].
//! 2. Build the machine with [`Fsm::new`] and an initial state.
//! 3. Register transitions with [`Fsm::add_transition`] and [`Fsm::add_timed_transition`].
//! 4. Call [`Fsm::run`] once per tick and [`Fsm::trigger`] whenever an event occurs.
//!
//! # Errors
//! The tick path never fails. Invalid registrations are dropped silently; use the
//! `try_add_*` variants to observe why with an [`FsmError`].
//!
//! # See Also
//! - [`Clock`]: Time source passed into every time-aware call.
//! - [`FsmBuilder`](crate::FsmBuilder): Collects states and transitions before construction.
use std::fmt::Debug;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::clock::Clock;
use crate::error::{FsmError, FsmResult};
use crate::state::{Action, StateId, StateRegistry};

/// A directed edge between two states.
struct Transition<E> {
    from: StateId,
    to: StateId,
    // `None` for timed transitions, which never go through the event channel.
    event: Option<E>,
    on_transition: Option<Action>,
}

/// A transition that fires after `interval` in its from-state.
struct TimedTransition<E> {
    transition: Transition<E>,
    interval: Duration,
    start: Option<u64>,
}

impl<E> TimedTransition<E> {
    fn expired(&self, start: u64, now: u64) -> bool {
        Duration::from_millis(now.saturating_sub(start)) >= self.interval
    }
}

#[derive(Clone, Copy)]
enum Slot {
    Event(usize),
    Timed(usize),
}

/// The transition engine.
pub struct Fsm<E = i32>
where
    E: PartialEq + Debug,
{
    states: StateRegistry,
    current_state: StateId,
    transitions: Vec<Transition<E>>,
    timed_transitions: Vec<TimedTransition<E>>,
    initialized: bool,
}

impl<E> Fsm<E>
where
    E: PartialEq + Debug,
{
    /// Create a machine over `states`, starting in `initial`.
    ///
    /// Nothing runs until the first [`Fsm::run`].
    pub fn new(states: StateRegistry, initial: StateId) -> FsmResult<Self> {
        if !states.contains(initial) {
            return Err(FsmError::StateNotRegistered(initial));
        }
        Ok(Self {
            states,
            current_state: initial,
            transitions: Vec::new(),
            timed_transitions: Vec::new(),
            initialized: false,
        })
    }

    fn endpoint(&self, id: Option<StateId>) -> FsmResult<StateId> {
        let id = id.ok_or(FsmError::MissingEndpoint)?;
        if self.states.contains(id) {
            Ok(id)
        } else {
            Err(FsmError::StateNotRegistered(id))
        }
    }

    /// Register an event transition, reporting why it was rejected.
    pub fn try_add_transition(
        &mut self,
        from: impl Into<Option<StateId>>,
        to: impl Into<Option<StateId>>,
        event: E,
        on_transition: Option<Action>,
    ) -> FsmResult<()> {
        let from = self.endpoint(from.into())?;
        let to = self.endpoint(to.into())?;
        self.transitions.try_reserve(1)?;
        self.transitions.push(Transition {
            from,
            to,
            event: Some(event),
            on_transition,
        });
        Ok(())
    }

    /// Register an event transition from `from` to `to` on `event`.
    ///
    /// Absent or unknown endpoints and storage exhaustion drop the transition
    /// without touching existing ones. Registration order is match priority.
    pub fn add_transition(
        &mut self,
        from: impl Into<Option<StateId>>,
        to: impl Into<Option<StateId>>,
        event: E,
        on_transition: Option<Action>,
    ) {
        if let Err(e) = self.try_add_transition(from, to, event, on_transition) {
            warn!(error = %e, "event transition rejected");
        }
    }

    /// Register a timed transition, reporting why it was rejected.
    pub fn try_add_timed_transition(
        &mut self,
        from: impl Into<Option<StateId>>,
        to: impl Into<Option<StateId>>,
        interval: Duration,
        on_transition: Option<Action>,
    ) -> FsmResult<()> {
        let from = self.endpoint(from.into())?;
        let to = self.endpoint(to.into())?;
        self.timed_transitions.try_reserve(1)?;
        self.timed_transitions.push(TimedTransition {
            transition: Transition {
                from,
                to,
                event: None,
                on_transition,
            },
            interval,
            start: None,
        });
        Ok(())
    }

    /// Register a transition that fires once the machine has been in `from` for `interval`.
    ///
    /// Same rejection rules as [`Fsm::add_transition`]. Intervals are compared in whole
    /// milliseconds; a zero interval fires on the tick after the timer is armed.
    pub fn add_timed_transition(
        &mut self,
        from: impl Into<Option<StateId>>,
        to: impl Into<Option<StateId>>,
        interval: Duration,
        on_transition: Option<Action>,
    ) {
        if let Err(e) = self.try_add_timed_transition(from, to, interval, on_transition) {
            warn!(error = %e, "timed transition rejected");
        }
    }

    /// Deliver an event.
    ///
    /// Ignored until the first [`Fsm::run`]. At most one transition fires: the first
    /// registered one leaving the current state on `event`.
    pub fn trigger<C>(&mut self, event: E, clock: &C)
    where
        C: Clock + ?Sized,
    {
        if !self.initialized {
            trace!(?event, "event ignored before first run");
            return;
        }

        let current = self.current_state;
        let matched = self
            .transitions
            .iter()
            .position(|t| t.from == current && t.event.as_ref() == Some(&event));

        match matched {
            Some(index) => self.make_transition(Slot::Event(index), clock),
            None => trace!(?event, state = %self.states.label(current), "no transition for event"),
        }
    }

    /// Arm or fire every timed transition leaving the current state.
    ///
    /// Called by [`Fsm::run`]; exposed for hosts that want to poll timers without
    /// running the during callback.
    pub fn check_timed_transitions<C>(&mut self, clock: &C)
    where
        C: Clock + ?Sized,
    {
        let now = clock.now_millis();
        for index in 0..self.timed_transitions.len() {
            let timed = &mut self.timed_transitions[index];
            if timed.transition.from != self.current_state {
                continue;
            }
            match timed.start {
                None => {
                    timed.start = Some(now);
                    trace!(
                        state = %self.states.label(self.current_state),
                        now,
                        "timer armed"
                    );
                }
                Some(start) if timed.expired(start, now) => {
                    self.make_transition(Slot::Timed(index), clock);
                    self.timed_transitions[index].start = None;
                }
                Some(_) => {}
            }
        }
    }

    /// Step the machine once. Call this every tick.
    ///
    /// The first call enters the initial state. Every call runs the current state's
    /// during callback, then checks timed transitions.
    pub fn run<C>(&mut self, clock: &C)
    where
        C: Clock + ?Sized,
    {
        if !self.initialized {
            self.initialized = true;
            debug!(state = %self.states.label(self.current_state), "entering initial state");
            if let Some(state) = self.states.get_mut(self.current_state) {
                state.enter();
            }
        }

        if let Some(state) = self.states.get_mut(self.current_state) {
            state.during();
        }

        self.check_timed_transitions(clock);
    }

    /// Exit, act, enter, switch, then re-arm timers leaving the new state.
    fn make_transition<C>(&mut self, slot: Slot, clock: &C)
    where
        C: Clock + ?Sized,
    {
        let (transition, cause) = match slot {
            Slot::Event(index) => (&mut self.transitions[index], "event"),
            Slot::Timed(index) => (&mut self.timed_transitions[index].transition, "timer"),
        };
        let (from, to) = (transition.from, transition.to);

        debug!(
            from = %self.states.label(from),
            to = %self.states.label(to),
            event = ?transition.event,
            cause,
            "transition"
        );

        if let Some(state) = self.states.get_mut(from) {
            state.exit();
        }
        if let Some(action) = transition.on_transition.as_mut() {
            action();
        }
        if let Some(state) = self.states.get_mut(to) {
            state.enter();
        }

        self.current_state = to;

        let now = clock.now_millis();
        for timed in self.timed_transitions.iter_mut() {
            if timed.transition.from == to {
                timed.start = Some(now);
            }
        }
    }

    /// Get the current state
    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    /// Whether [`Fsm::run`] has been called at least once.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of registered event transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Number of registered timed transitions.
    pub fn timed_transition_count(&self) -> usize {
        self.timed_transitions.len()
    }

    /// The states this machine runs over.
    pub fn states(&self) -> &StateRegistry {
        &self.states
    }

    /// Render the registered states and transitions as a PlantUML state diagram.
    #[cfg(all(feature = "plantuml", debug_assertions))]
    pub fn export_plantuml(&self) -> String {
        let event_edges = self.transitions.iter().map(|t| crate::plantuml::Edge {
            from: t.from,
            to: t.to,
            label: t
                .event
                .as_ref()
                .map(|event| format!("{:?}", event))
                .unwrap_or_default(),
        });
        let timed_edges = self.timed_transitions.iter().map(|t| crate::plantuml::Edge {
            from: t.transition.from,
            to: t.transition.to,
            label: format!("after {}ms", t.interval.as_millis()),
        });
        crate::plantuml::generate_plantuml(
            &self.states,
            event_edges.chain(timed_edges),
            self.current_state,
        )
    }

    /// Stub for export_plantuml when feature is disabled
    #[cfg(not(all(feature = "plantuml", debug_assertions)))]
    pub fn export_plantuml(&self) -> String {
        String::from("PlantUML export not available (requires 'plantuml' feature and debug build)")
    }
}

impl<E> Debug for Fsm<E>
where
    E: PartialEq + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fsm")
            .field("current_state", &self.current_state)
            .field("initialized", &self.initialized)
            .field("transitions", &self.transitions.len())
            .field("timed_transitions", &self.timed_transitions.len())
            .finish()
    }
}
