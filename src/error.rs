//! Error types for the state machine

use std::collections::TryReserveError;
use thiserror::Error;

use crate::state::StateId;

/// Result type alias for state machine operations
pub type FsmResult<T> = std::result::Result<T, FsmError>;

/// Errors reported by the checked construction and registration paths.
///
/// The tick path (`run`, `trigger`, timed checks) never fails; these only surface
/// through [`Fsm::new`](crate::Fsm::new) and the `try_add_*` methods.
#[derive(Error, Debug)]
pub enum FsmError {
    /// A transition endpoint was absent
    #[error("Transition endpoint missing")]
    MissingEndpoint,

    /// A state id that does not belong to this machine's registry
    #[error("State {0} not registered")]
    StateNotRegistered(StateId),

    /// Transition storage could not grow; existing entries are untouched
    #[error("Transition storage exhausted: {0}")]
    StorageExhausted(#[from] TryReserveError),
}
