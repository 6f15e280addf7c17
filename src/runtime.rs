use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

use crate::controller::TICK;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum WheelEvent {
    /// A key press. Release and repeat reports are not forwarded.
    Key(KeyEvent),
    Resize,
    /// No input arrived within one animation step.
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait WheelEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<WheelEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<WheelEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(WheelEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(WheelEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WheelEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<WheelEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<WheelEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<WheelEvent>) -> Self {
        Self { rx }
    }
}

impl WheelEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<WheelEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// Waits at most one animation step ([`TICK`]) for input so an idle terminal
/// still sees the wheel drift.
pub struct Runner<E: WheelEventSource> {
    event_source: E,
    interval: Duration,
    last_step: Instant,
}

impl<E: WheelEventSource> Runner<E> {
    pub fn new(event_source: E) -> Self {
        Self::with_interval(event_source, TICK)
    }

    /// Shorter waits keep headless tests fast.
    pub fn with_interval(event_source: E, interval: Duration) -> Self {
        Self {
            event_source,
            interval,
            last_step: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Blocks up to one interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> WheelEvent {
        match self.event_source.recv_timeout(self.interval) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => WheelEvent::Tick,
        }
    }

    /// Like [`step`](Self::step), also reporting the wall time since the previous call.
    /// Animation is fed from this so keystrokes never stall the wheel.
    pub fn step_timed(&mut self) -> (WheelEvent, Duration) {
        let event = self.step();
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_step);
        self.last_step = now;
        (event, elapsed)
    }
}
