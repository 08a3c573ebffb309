//! # Tick FSM
//!
//! A small finite state machine for embedded control loops. The host calls
//! [`Fsm::run`] once per tick and [`Fsm::trigger`] whenever something happens;
//! the machine runs state callbacks in a fixed order and fires timed transitions
//! against a millisecond [`Clock`] supplied by the caller.
//!
//! ## Features
//!
//! - **Tick Driven**: Nothing blocks, sleeps or spawns. One call, one step.
//! - **Event Transitions**: Matched on `(current state, event)`, first registered wins.
//! - **Timed Transitions**: Fire after an interval spent in a state, re-armed on every entry.
//! - **Injectable Time**: Any [`Clock`] works, including [`ManualClock`] for tests.
//! - **PlantUML Export**: Diagram of the registered graph (debug builds only).
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use tick_fsm::*;
//!
//! let mut states = StateRegistry::new();
//! let idle = states.insert(State::named("IDLE"));
//! let active = states.insert(State::named("ACTIVE").on_enter(|| println!("active")));
//!
//! let mut fsm = Fsm::new(states, idle)?;
//! fsm.add_transition(idle, active, 1, None);
//! fsm.add_timed_transition(active, idle, Duration::from_millis(500), None);
//!
//! let clock = ManualClock::new(0);
//! fsm.run(&clock);
//! fsm.trigger(1, &clock);
//! assert_eq!(fsm.current_state(), active);
//!
//! clock.advance(500);
//! fsm.run(&clock);
//! assert_eq!(fsm.current_state(), idle);
//! # Ok::<(), tick_fsm::FsmError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

mod builder;
mod clock;
mod error;
mod fsm;
mod state;

#[cfg(all(feature = "plantuml", debug_assertions))]
mod plantuml;

pub use builder::FsmBuilder;
pub use clock::{Clock, ManualClock, StdClock};
pub use error::{FsmError, FsmResult};
pub use fsm::Fsm;
pub use state::{Action, State, StateId, StateRegistry};

#[cfg(feature = "tokio-integration")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio-integration")))]
pub use clock::TokioClock;

pub use std::time::Duration;

pub mod prelude {
    //! Prelude module for convenient imports
    pub use crate::{
        Action, Clock, Fsm, FsmBuilder, FsmError, FsmResult, ManualClock, State, StateId,
        StateRegistry, StdClock,
    };
    pub use std::time::Duration;
}
