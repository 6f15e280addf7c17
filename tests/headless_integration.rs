use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use spinwheel::app::WheelApp;
use spinwheel::controller::{
    AnimationController, SpinDuration, SpinRequest, SpinResult, SpinSettings, WheelPhase,
    DEFAULT_DRIFT_DEGREES_PER_TICK, TICK_MS,
};
use spinwheel::persistence::{ManualClock, MemoryMedium, PersistenceStore};
use spinwheel::runtime::{Runner, TestEventSource, WheelEvent};

type TestApp<'a> = WheelApp<&'a MemoryMedium, &'a ManualClock, StdRng>;

fn wheel_app<'a>(medium: &'a MemoryMedium, clock: &'a ManualClock, spin_ms: u64) -> TestApp<'a> {
    let settings =
        SpinSettings::new(SpinDuration::Fixed(spin_ms), 1.0, DEFAULT_DRIFT_DEGREES_PER_TICK)
            .unwrap();
    WheelApp::new(
        AnimationController::with_rng(settings, StdRng::seed_from_u64(7)),
        PersistenceStore::with_clock(medium, clock),
    )
}

fn key(c: char) -> WheelEvent {
    WheelEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless flow through Runner/TestEventSource without a TTY: each tick is
// fed a fixed step so the run is deterministic.
#[test]
fn headless_spin_flow_picks_one_winner() {
    let medium = MemoryMedium::new();
    let clock = ManualClock::new(0);
    let mut app = wheel_app(&medium, &clock, 600);
    app.edit_entries("Alice\nBob\nCharlie\nDiana");

    let (tx, rx) = mpsc::channel();
    let runner = Runner::with_interval(TestEventSource::new(rx), Duration::from_millis(1));

    // two presses while the first spin runs: the second is ignored
    tx.send(key(' ')).unwrap();
    tx.send(key(' ')).unwrap();

    let mut handles = Vec::new();
    let mut winners = Vec::new();
    for _ in 0..200u32 {
        match runner.step() {
            WheelEvent::Key(k) if k.code == KeyCode::Char(' ') => {
                if let SpinRequest::Started(handle) = app.request_spin().unwrap() {
                    handles.push(handle);
                }
            }
            WheelEvent::Tick => {
                if let Some(winner) = app.tick(Duration::from_millis(TICK_MS)).winner {
                    winners.push(winner);
                }
            }
            _ => {}
        }
        if !winners.is_empty() && app.controller().phase() == WheelPhase::Drifting {
            break;
        }
    }

    assert_eq!(handles.len(), 1);
    assert_eq!(winners.len(), 1);
    let winner = &winners[0];
    assert_eq!(handles[0].try_winner(), Ok(winner.clone()));
    assert_eq!(
        app.controller().wheel().selected_entry(),
        Some(winner.name.as_str())
    );
    assert_eq!(app.controller().phase(), WheelPhase::Drifting);
}

#[test]
fn headless_clearing_entries_mid_spin_cancels() {
    let medium = MemoryMedium::new();
    let clock = ManualClock::new(0);
    let mut app = wheel_app(&medium, &clock, 5_000);
    app.edit_entries("Alice\nBob");

    let handle = match app.request_spin().unwrap() {
        SpinRequest::Started(handle) => handle,
        SpinRequest::Ignored => panic!("spin should start"),
    };
    app.tick(Duration::from_millis(300));
    assert_eq!(handle.try_winner(), Err(SpinResult::Pending));

    app.edit_entries("\n  \n");
    assert_eq!(app.controller().phase(), WheelPhase::Idle);
    assert_eq!(handle.try_winner(), Err(SpinResult::Cancelled));

    // Idle wheels do not move
    let before = app.controller().wheel().rotation_angle();
    let outcome = app.tick(Duration::from_secs(1));
    assert!(!outcome.redraw);
    assert_eq!(app.controller().wheel().rotation_angle(), before);
}

#[test]
fn headless_remembered_list_survives_restart() {
    let medium = MemoryMedium::new();
    let clock = ManualClock::new(1_000);
    wheel_app(&medium, &clock, 300).edit_entries("Alice\nBob\nCharlie");

    clock.advance(60_000);
    let mut next = wheel_app(&medium, &clock, 300);
    assert!(next.load_saved());
    assert_eq!(next.controller().wheel().len(), 3);
    assert_eq!(next.saved_at(), Some(1_000));
    assert_eq!(next.controller().phase(), WheelPhase::Drifting);
}
