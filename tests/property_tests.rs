//! Property-based tests for the transition engine.
//!
//! Random state graphs and event/time sequences are replayed against a tiny
//! reference model of the dispatch rules.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use tick_fsm::{Duration, Fsm, ManualClock, State, StateId, StateRegistry};

const STATE_COUNT: usize = 4;

type Log = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Clone)]
enum Step {
    Run { advance: u64 },
    Trigger(i32),
}

prop_compose! {
    fn arbitrary_edge()(from in 0..STATE_COUNT, to in 0..STATE_COUNT, event in 0..4i32)
        -> (usize, usize, i32) {
        (from, to, event)
    }
}

fn arbitrary_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..300u64).prop_map(|advance| Step::Run { advance }),
        (0..4i32).prop_map(Step::Trigger),
    ]
}

fn build(log: &Log, edges: &[(usize, usize, i32)]) -> (Fsm, Vec<StateId>) {
    let mut states = StateRegistry::new();
    let ids: Vec<StateId> = (0..STATE_COUNT)
        .map(|i| {
            let (enter, exit) = (log.clone(), log.clone());
            states.insert(
                State::new()
                    .on_enter(move || enter.lock().unwrap().push(format!("enter {i}")))
                    .on_exit(move || exit.lock().unwrap().push(format!("exit {i}"))),
            )
        })
        .collect();

    let mut fsm = Fsm::new(states, ids[0]).unwrap();
    for &(from, to, event) in edges {
        let action = log.clone();
        fsm.add_transition(
            ids[from],
            ids[to],
            event,
            Some(Box::new(move || {
                action.lock().unwrap().push(format!("act {from}->{to}"))
            })),
        );
    }
    (fsm, ids)
}

proptest! {
    #[test]
    fn trigger_before_run_never_moves(
        edges in prop::collection::vec(arbitrary_edge(), 0..12),
        events in prop::collection::vec(0..4i32, 0..8),
    ) {
        let log = Log::default();
        let (mut fsm, ids) = build(&log, &edges);
        let clock = ManualClock::new(0);

        for event in events {
            fsm.trigger(event, &clock);
        }
        prop_assert_eq!(fsm.current_state(), ids[0]);
        prop_assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn dispatch_matches_first_registered_edge(
        edges in prop::collection::vec(arbitrary_edge(), 0..12),
        events in prop::collection::vec(0..4i32, 0..16),
    ) {
        let log = Log::default();
        let (mut fsm, ids) = build(&log, &edges);
        let clock = ManualClock::new(0);
        fsm.run(&clock);
        log.lock().unwrap().clear();

        let mut expected_state = 0usize;
        for event in events {
            let matched = edges
                .iter()
                .find(|(from, _, e)| *from == expected_state && *e == event)
                .copied();
            fsm.trigger(event, &clock);

            let fired = std::mem::take(&mut *log.lock().unwrap());
            match matched {
                Some((from, to, _)) => {
                    prop_assert_eq!(
                        fired,
                        vec![format!("exit {from}"), format!("act {from}->{to}"), format!("enter {to}")]
                    );
                    expected_state = to;
                }
                None => prop_assert!(fired.is_empty()),
            }
            prop_assert_eq!(fsm.current_state(), ids[expected_state]);
        }
    }

    #[test]
    fn initial_enter_runs_exactly_once(runs in 1..20usize) {
        let log = Log::default();
        let (mut fsm, _) = build(&log, &[]);
        let clock = ManualClock::new(0);

        for _ in 0..runs {
            fsm.run(&clock);
        }
        prop_assert_eq!(log.lock().unwrap().clone(), vec!["enter 0".to_string()]);
    }

    #[test]
    fn timed_transition_fires_once_after_interval(
        interval in 1..1_000u64,
        steps in prop::collection::vec(arbitrary_step(), 1..40),
    ) {
        let mut states = StateRegistry::new();
        let a = states.insert(State::new());
        let b = states.insert(State::new());
        let mut fsm: Fsm = Fsm::new(states, a).unwrap();
        fsm.add_timed_transition(a, b, Duration::from_millis(interval), None);

        let clock = ManualClock::new(0);
        fsm.run(&clock);
        // First observation arms the timer at 0.
        prop_assert_eq!(fsm.current_state(), a);

        for step in steps {
            match step {
                Step::Run { advance } => {
                    let now = clock.advance(advance);
                    fsm.run(&clock);
                    let expected = if now >= interval { b } else { a };
                    prop_assert_eq!(fsm.current_state(), expected);
                }
                // No event transitions: events must not disturb the timer.
                Step::Trigger(event) => fsm.trigger(event, &clock),
            }
        }
    }

    #[test]
    fn null_endpoints_never_register(event in any::<i32>(), interval in 0..10_000u64) {
        let mut states = StateRegistry::new();
        let a = states.insert(State::new());
        let mut fsm: Fsm = Fsm::new(states, a).unwrap();

        fsm.add_transition(a, None, event, None);
        fsm.add_transition(None, a, event, None);
        fsm.add_timed_transition(None, None, Duration::from_millis(interval), None);

        prop_assert_eq!(fsm.transition_count(), 0);
        prop_assert_eq!(fsm.timed_transition_count(), 0);
    }
}
