//! Traffic light control loop
//!
//! A pedestrian crossing driven by a 10ms tick:
//! - Green: cars go until a pedestrian presses the button
//! - Yellow: fixed 300ms warning, then red
//! - Red: pedestrians cross for 1s, then back to green
//!
//! The example shows:
//! - Event and timed transitions on the same machine
//! - A host tick loop driven by `StdClock`
//! - Transition logging through `tracing`
//! - PlantUML export (with `--features plantuml`, debug builds only)
//!
//! Run with: `RUST_LOG=tick_fsm=debug cargo run --example traffic_light`

use std::thread::sleep;

use tick_fsm::{Clock, Duration, FsmBuilder, State, StdClock};
use tracing_subscriber::EnvFilter;

const BUTTON_PRESSED: i32 = 1;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let mut builder = FsmBuilder::new();
    let green = builder.state(State::named("Green").on_enter(|| println!("🟢 cars go")));
    let yellow = builder.state(State::named("Yellow").on_enter(|| println!("🟡 slow down")));
    let red = builder.state(
        State::named("Red")
            .on_enter(|| println!("🔴 pedestrians cross"))
            .on_exit(|| println!("🚶 crossing closed")),
    );

    builder
        .transition(green, yellow, BUTTON_PRESSED, None)
        .timed_transition(yellow, red, Duration::from_millis(300), None)
        .timed_transition(
            red,
            green,
            Duration::from_secs(1),
            Some(Box::new(|| println!("🔁 cycle complete"))),
        );

    let mut light = builder.build(green)?;
    println!("{}", light.export_plantuml());

    let clock = StdClock::new();
    let tick = Duration::from_millis(10);

    while clock.now_millis() < 2_000 {
        // Simulated button press half a second in
        if clock.now_millis() >= 500 && light.current_state() == green {
            light.trigger(BUTTON_PRESSED, &clock);
        }
        light.run(&clock);
        sleep(tick);
    }

    println!("final state: {}", light.states().label(light.current_state()));
    Ok(())
}
