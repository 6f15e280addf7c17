use std::f64::consts::PI;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::easing::ease_out;
use crate::error::{Result, WheelError};
use crate::wheel::WheelState;

/// Fixed controller step in milliseconds.
pub const TICK_MS: u64 = 30;
pub const TICK: Duration = Duration::from_millis(TICK_MS);

/// Range of the randomized start velocity, in degrees per tick before the speed multiplier.
pub const START_VELOCITY_MIN: f64 = 10.0;
pub const START_VELOCITY_MAX: f64 = 15.0;

pub const DEFAULT_DURATION_MIN_MS: u64 = 4000;
pub const DEFAULT_DURATION_MAX_MS: u64 = 7000;
pub const DEFAULT_DRIFT_DEGREES_PER_TICK: f64 = 1.0 / 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum WheelPhase {
    Idle,
    Drifting,
    Spinning,
    Resolving,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinDuration {
    Fixed(u64),
    Between { min_ms: u64, max_ms: u64 },
}

/// Validated spin parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinSettings {
    duration: SpinDuration,
    speed_multiplier: f64,
    drift_degrees_per_tick: f64,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            duration: SpinDuration::Between {
                min_ms: DEFAULT_DURATION_MIN_MS,
                max_ms: DEFAULT_DURATION_MAX_MS,
            },
            speed_multiplier: 1.0,
            drift_degrees_per_tick: DEFAULT_DRIFT_DEGREES_PER_TICK,
        }
    }
}

impl SpinSettings {
    pub fn new(
        duration: SpinDuration,
        speed_multiplier: f64,
        drift_degrees_per_tick: f64,
    ) -> Result<Self> {
        match duration {
            SpinDuration::Fixed(0) => {
                return Err(WheelError::invalid_settings("spin duration must be positive"))
            }
            SpinDuration::Between { min_ms, max_ms } if min_ms == 0 || max_ms < min_ms => {
                return Err(WheelError::invalid_settings(format!(
                    "spin duration range {min_ms}..{max_ms} ms is empty or starts at zero"
                )))
            }
            _ => {}
        }
        if !(speed_multiplier.is_finite() && speed_multiplier > 0.0) {
            return Err(WheelError::invalid_settings(
                "speed multiplier must be a positive number",
            ));
        }
        if !drift_degrees_per_tick.is_finite() {
            return Err(WheelError::invalid_settings("drift must be a finite angle"));
        }
        Ok(Self {
            duration,
            speed_multiplier,
            drift_degrees_per_tick,
        })
    }

    pub fn duration(&self) -> SpinDuration {
        self.duration
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn drift_degrees_per_tick(&self) -> f64 {
        self.drift_degrees_per_tick
    }
}

/// One decelerating rotation. Velocities are in degrees per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSession {
    pub start_velocity: f64,
    pub elapsed_ms: f64,
    pub total_duration_ms: f64,
}

impl SpinSession {
    fn roll<R: Rng>(settings: &SpinSettings, rng: &mut R) -> Self {
        let start_velocity =
            rng.gen_range(START_VELOCITY_MIN..START_VELOCITY_MAX) * settings.speed_multiplier;
        let total_duration_ms = match settings.duration {
            SpinDuration::Fixed(ms) => ms as f64,
            SpinDuration::Between { min_ms, max_ms } if min_ms == max_ms => min_ms as f64,
            SpinDuration::Between { min_ms, max_ms } => {
                rng.gen_range(min_ms as f64..max_ms as f64)
            }
        };
        Self {
            start_velocity,
            elapsed_ms: 0.0,
            total_duration_ms,
        }
    }

    fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.total_duration_ms
    }

    /// Degrees to rotate on the current tick.
    fn step_degrees(&self) -> f64 {
        let remaining = ease_out(
            self.elapsed_ms,
            0.0,
            self.start_velocity,
            self.total_duration_ms,
        );
        self.start_velocity - remaining
    }

    pub fn progress(&self) -> f64 {
        (self.elapsed_ms / self.total_duration_ms).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinResult {
    Cancelled,
    Pending,
}

/// Receives the winner of one spin session.
#[derive(Debug)]
pub struct SpinHandle {
    rx: Receiver<Winner>,
}

impl SpinHandle {
    /// `Ok` once the session resolved, `Err(Pending)` while in flight and
    /// `Err(Cancelled)` if the session ended without a winner.
    pub fn try_winner(&self) -> std::result::Result<Winner, SpinResult> {
        match self.rx.try_recv() {
            Ok(winner) => Ok(winner),
            Err(TryRecvError::Empty) => Err(SpinResult::Pending),
            Err(TryRecvError::Disconnected) => Err(SpinResult::Cancelled),
        }
    }
}

#[derive(Debug)]
pub enum SpinRequest {
    Started(SpinHandle),
    /// A spin is already running; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub redraw: bool,
    pub winner: Option<Winner>,
}

/// Drives one wheel between idle drift and active spins.
///
/// The controller owns no timers: a tick source calls [`tick`](Self::tick)
/// with the real time elapsed and the controller runs as many fixed
/// [`TICK_MS`] steps as fit.
#[derive(Debug)]
pub struct AnimationController<R: Rng = StdRng> {
    wheel: WheelState,
    phase: WheelPhase,
    session: Option<(SpinSession, Sender<Winner>)>,
    settings: SpinSettings,
    pending: Duration,
    rng: R,
}

impl AnimationController<StdRng> {
    pub fn new(settings: SpinSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }
}

impl<R: Rng> AnimationController<R> {
    pub fn with_rng(settings: SpinSettings, rng: R) -> Self {
        Self {
            wheel: WheelState::default(),
            phase: WheelPhase::Idle,
            session: None,
            settings,
            pending: Duration::ZERO,
            rng,
        }
    }

    pub fn wheel(&self) -> &WheelState {
        &self.wheel
    }

    pub fn phase(&self) -> WheelPhase {
        self.phase
    }

    pub fn settings(&self) -> &SpinSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: SpinSettings) {
        self.settings = settings;
    }

    pub fn is_spinning(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SpinSession> {
        self.session.as_ref().map(|(session, _)| session)
    }

    pub fn spin_progress(&self) -> Option<f64> {
        self.session().map(SpinSession::progress)
    }

    /// Replaces the entries. Returns true when the wheel needs a redraw.
    pub fn set_entries(&mut self, entries: Vec<String>) -> bool {
        self.wheel.set_entries(entries);
        match (self.phase, self.wheel.is_empty()) {
            (WheelPhase::Idle, false) => self.enter(WheelPhase::Drifting),
            (WheelPhase::Drifting, true) => self.enter(WheelPhase::Idle),
            (WheelPhase::Spinning | WheelPhase::Resolving, true) => {
                // Dropping the sender tells the handle the spin was cancelled.
                self.session = None;
                self.enter(WheelPhase::Idle);
            }
            _ => {}
        }
        true
    }

    pub fn request_spin(&mut self) -> Result<SpinRequest> {
        if self.session.is_some() {
            debug!("spin already running, ignoring request");
            return Ok(SpinRequest::Ignored);
        }
        if self.wheel.is_empty() {
            return Err(WheelError::EmptyEntryList);
        }

        let session = SpinSession::roll(&self.settings, &mut self.rng);
        debug!(
            start_velocity = session.start_velocity,
            duration_ms = session.total_duration_ms,
            "spin started"
        );
        let (tx, rx) = mpsc::channel();
        self.session = Some((session, tx));
        self.enter(WheelPhase::Spinning);
        Ok(SpinRequest::Started(SpinHandle { rx }))
    }

    /// Feeds elapsed time into the controller.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.phase == WheelPhase::Idle {
            return outcome;
        }

        self.pending = self.pending.saturating_add(dt);
        while self.pending >= TICK {
            self.pending -= TICK;
            let phase = self.phase;
            match phase {
                WheelPhase::Drifting => {
                    self.wheel
                        .advance_angle(self.settings.drift_degrees_per_tick * PI / 180.0);
                    outcome.redraw = true;
                }
                WheelPhase::Spinning => {
                    outcome.redraw = true;
                    if let Some(winner) = self.step_spin() {
                        outcome.winner = Some(winner);
                    }
                }
                WheelPhase::Idle | WheelPhase::Resolving => break,
            }
            // A state change drops whatever time was left for the old state.
            if self.phase != phase {
                break;
            }
        }
        outcome
    }

    fn step_spin(&mut self) -> Option<Winner> {
        let (session, _) = self.session.as_mut()?;
        session.elapsed_ms += TICK_MS as f64;
        if !session.is_finished() {
            let degrees = session.step_degrees();
            self.wheel.advance_angle(degrees * PI / 180.0);
            return None;
        }

        self.phase = WheelPhase::Resolving;
        let (_, tx) = self.session.take()?;
        let winner = self.wheel.selected_index().and_then(|index| {
            self.wheel.entries().get(index).map(|name| Winner {
                index,
                name: name.clone(),
            })
        });
        if let Some(winner) = &winner {
            info!(index = winner.index, name = %winner.name, "wheel stopped");
            let _ = tx.send(winner.clone());
        }
        self.enter(if self.wheel.is_empty() {
            WheelPhase::Idle
        } else {
            WheelPhase::Drifting
        });
        winner
    }

    fn enter(&mut self, phase: WheelPhase) {
        if self.phase != phase {
            debug!(from = %self.phase, to = %phase, "wheel phase change");
        }
        self.phase = phase;
        self.pending = Duration::ZERO;
    }
}
