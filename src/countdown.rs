//! Countdown engine for Bubble Tea applications.
//!
//! The engine owns a remaining duration and a [`Status`], and counts down by a
//! fixed one-second step while running. It follows the Elm architecture used
//! by the rest of the crate: control methods mutate state directly and hand
//! back the command that schedules the next tick, and [`Model::update`]
//! consumes the resulting [`TickMsg`]s.
//!
//! # State machine
//!
//! ```text
//!            start               pause
//!   Idle ─────────────► Running ───────► Paused
//!    ▲                  │  ▲               │
//!    │ reconfigure      │  └───── start ───┘
//!    │                  │ reaches zero
//!    │                  ▼
//!   (any) ── reset ──► Stopped ── start ──► Running
//! ```
//!
//! # Basic usage
//!
//! ```rust
//! use scoreclock::countdown::{new, Status};
//! use std::time::Duration;
//!
//! let mut engine = new(Duration::from_secs(600));
//! assert_eq!(engine.status(), Status::Idle);
//!
//! let _tick_cmd = engine.start();
//! assert_eq!(engine.status(), Status::Running);
//!
//! engine.pause();
//! assert_eq!(engine.status(), Status::Paused);
//!
//! engine.reset();
//! assert_eq!(engine.status(), Status::Stopped);
//! assert_eq!(engine.remaining(), Duration::from_secs(600));
//! ```
//!
//! # bubbletea-rs integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use scoreclock::countdown::{new, Model, TimeoutMsg};
//! use std::time::Duration;
//!
//! struct App {
//!     engine: Model,
//!     done: bool,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut engine = new(Duration::from_secs(30));
//!         let cmd = engine.start();
//!         (Self { engine, done: false }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(timeout) = msg.downcast_ref::<TimeoutMsg>() {
//!             if timeout.id == self.engine.id() {
//!                 self.done = true;
//!                 return None;
//!             }
//!         }
//!         self.engine.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.engine.view()
//!     }
//! }
//! ```

use crate::duration::ClockFace;
use crate::schedule::{RuntimeScheduler, Scheduler};
use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Internal ID management for engine instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Amount removed from the remaining time on every tick.
pub const STEP: Duration = Duration::from_secs(1);

/// Lifecycle of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Freshly created or reconfigured; never started.
    Idle,
    /// Counting down.
    Running,
    /// Halted by [`Model::pause`]; resumes from the frozen value.
    Paused,
    /// Reset, or ran out of time.
    Stopped,
}

impl Status {
    /// Whether the countdown is at rest: idle or stopped, but not paused.
    ///
    /// The clock only allows its value to be edited in this state.
    pub fn is_at_rest(self) -> bool {
        matches!(self, Status::Idle | Status::Stopped)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Idle => "idle",
            Status::Running => "running",
            Status::Paused => "paused",
            Status::Stopped => "stopped",
        })
    }
}

/// Message delivered once per step while the countdown runs.
///
/// # Message filtering
///
/// An engine only accepts ticks that carry its own id and its current tag.
/// Every start, pause, reset and reconfigure moves the tag forward, so ticks
/// scheduled before that point are dropped when they arrive. This is what
/// keeps a pause/start cycle from ticking twice per second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickMsg {
    /// Identifier of the engine that scheduled this tick.
    pub id: i64,
    /// Tick chain this message belongs to.
    pub tag: i64,
}

/// Message sent when a countdown reaches zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutMsg {
    /// Identifier of the engine that ran out.
    pub id: i64,
}

/// Countdown state machine.
///
/// # Invariants
///
/// - `remaining` never goes below zero and never exceeds what it was when the
///   engine last started, reset or reconfigured.
/// - `remaining` only changes while [`Status::Running`], by exactly [`STEP`]
///   per accepted tick.
/// - Reaching zero moves the engine to [`Status::Stopped`] and ends the tick
///   chain.
///
/// # Examples
///
/// Driving the engine with a fake clock:
///
/// ```rust
/// use scoreclock::countdown::{Model, Status};
/// use scoreclock::schedule::ManualScheduler;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = ManualScheduler::new();
/// let mut engine = Model::with_scheduler(Duration::from_secs(600), Arc::new(clock.clone()));
///
/// let _ = engine.start();
/// for _ in 0..3 {
///     for tick in clock.advance() {
///         let _ = engine.update(tick);
///     }
/// }
/// assert_eq!(engine.remaining(), Duration::from_secs(597));
/// assert_eq!(engine.view(), "09:57");
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    /// Time between ticks. The decrement per tick is always [`STEP`].
    pub interval: Duration,

    initial: Duration,
    remaining: Duration,
    status: Status,
    scheduler: Arc<dyn Scheduler>,
    id: i64,
    tag: i64,
}

/// Creates an idle countdown from `initial` using the runtime scheduler.
pub fn new(initial: Duration) -> Model {
    Model::new(initial)
}

impl Model {
    /// Creates an idle countdown from `initial` using the runtime scheduler.
    pub fn new(initial: Duration) -> Self {
        Self::with_scheduler(initial, Arc::new(RuntimeScheduler))
    }

    /// Creates an idle countdown that asks `scheduler` for its ticks.
    pub fn with_scheduler(initial: Duration, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            interval: STEP,
            initial,
            remaining: initial,
            status: Status::Idle,
            scheduler,
            id: next_id(),
            tag: 0,
        }
    }

    /// Unique identifier of this engine.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Current lifecycle state.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Time left on the clock.
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// The value [`Model::reset`] returns to.
    pub fn initial(&self) -> Duration {
        self.initial
    }

    /// Amount removed per tick.
    pub fn step(&self) -> Duration {
        STEP
    }

    /// Whether the engine is counting down.
    pub fn running(&self) -> bool {
        self.status == Status::Running
    }

    /// Whether the remaining time has hit zero.
    pub fn timed_out(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Minutes and seconds left, for display.
    pub fn face(&self) -> ClockFace {
        ClockFace::from_duration(self.remaining)
    }

    /// Starts or resumes the countdown.
    ///
    /// Returns the command for the first tick, or `None` when the engine is
    /// already running or has no time left.
    pub fn start(&mut self) -> Option<Cmd> {
        if self.running() {
            return None;
        }
        if self.timed_out() {
            tracing::debug!(id = self.id, "start ignored, no time left");
            return None;
        }

        tracing::debug!(
            id = self.id,
            from = %self.status,
            remaining_ms = self.remaining.as_millis() as u64,
            "countdown started",
        );
        self.status = Status::Running;
        self.tag += 1;
        Some(self.tick())
    }

    /// Freezes the countdown. Does nothing unless running.
    pub fn pause(&mut self) {
        if !self.running() {
            return;
        }

        tracing::debug!(
            id = self.id,
            remaining_ms = self.remaining.as_millis() as u64,
            "countdown paused",
        );
        self.status = Status::Paused;
        self.tag += 1;
    }

    /// Pauses a running countdown, starts any other.
    pub fn toggle(&mut self) -> Option<Cmd> {
        if self.running() {
            self.pause();
            None
        } else {
            self.start()
        }
    }

    /// Stops the countdown and restores the initial value. Never resumes on
    /// its own.
    pub fn reset(&mut self) {
        tracing::debug!(id = self.id, from = %self.status, "countdown reset");
        self.status = Status::Stopped;
        self.remaining = self.initial;
        self.tag += 1;
    }

    /// Replaces the initial value, discarding all countdown progress.
    ///
    /// Outstanding ticks are cancelled and the engine goes back to
    /// [`Status::Idle`], exactly as if it had just been created with
    /// `initial`, but keeping its id.
    pub fn reconfigure(&mut self, initial: Duration) {
        tracing::debug!(
            id = self.id,
            initial_ms = initial.as_millis() as u64,
            "countdown reconfigured"
        );
        self.initial = initial;
        self.remaining = initial;
        self.status = Status::Idle;
        self.tag += 1;
    }

    fn tick(&self) -> Cmd {
        self.scheduler.schedule(
            self.interval,
            TickMsg {
                id: self.id,
                tag: self.tag,
            },
        )
    }

    fn timeout_cmd(&self) -> Cmd {
        self.scheduler.notify(TimeoutMsg { id: self.id })
    }

    /// Processes a tick.
    ///
    /// Ticks for other engines, from a cancelled chain, or arriving while not
    /// running are ignored. An accepted tick removes one [`STEP`] and
    /// schedules the next; the tick that reaches zero stops the engine and
    /// returns a command delivering [`TimeoutMsg`] instead.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let tick = msg.downcast_ref::<TickMsg>()?;
        if tick.id != self.id || tick.tag != self.tag || !self.running() {
            tracing::trace!(
                id = self.id,
                tick_id = tick.id,
                tick_tag = tick.tag,
                "stale tick dropped",
            );
            return None;
        }

        self.remaining = self.remaining.saturating_sub(STEP);
        tracing::trace!(
            id = self.id,
            remaining_ms = self.remaining.as_millis() as u64,
            "tick",
        );

        if self.timed_out() {
            tracing::debug!(id = self.id, "countdown reached zero");
            self.status = Status::Stopped;
            self.tag += 1;
            return Some(self.timeout_cmd());
        }

        Some(self.tick())
    }

    /// Renders the remaining time as `MM:SS`.
    pub fn view(&self) -> String {
        self.face().to_string()
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (Model::default(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    fn default() -> Self {
        new(Duration::from_secs(600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;

    fn engine(secs: u64) -> (Model, ManualScheduler) {
        let clock = ManualScheduler::new();
        let model = Model::with_scheduler(Duration::from_secs(secs), Arc::new(clock.clone()));
        (model, clock)
    }

    fn run_ticks(model: &mut Model, clock: &ManualScheduler, n: usize) {
        for _ in 0..n {
            for tick in clock.advance() {
                let _ = model.update(tick);
            }
        }
    }

    #[test]
    fn test_new_is_idle_and_full() {
        let (model, clock) = engine(30);
        assert_eq!(model.status(), Status::Idle);
        assert_eq!(model.remaining(), Duration::from_secs(30));
        assert_eq!(model.initial(), Duration::from_secs(30));
        assert_eq!(model.step(), Duration::from_secs(1));
        assert!(model.id() > 0);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_unique_ids() {
        let a = new(Duration::from_secs(10));
        let b = new(Duration::from_secs(10));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_start_schedules_one_tick() {
        let (mut model, clock) = engine(10);
        assert!(model.start().is_some());
        assert_eq!(model.status(), Status::Running);
        assert_eq!(clock.pending(), 1);
        assert_eq!(clock.peek()[0].interval, STEP);

        // Already running: no second chain.
        assert!(model.start().is_none());
        assert_eq!(clock.pending(), 1);
    }

    #[test]
    fn test_ticks_decrement_by_step() {
        let (mut model, clock) = engine(600);
        let _ = model.start();
        run_ticks(&mut model, &clock, 3);
        assert_eq!(model.remaining(), Duration::from_millis(597_000));
        assert_eq!(model.view(), "09:57");
    }

    #[test]
    fn test_pause_freezes_and_drops_pending_tick() {
        let (mut model, clock) = engine(10);
        let _ = model.start();
        run_ticks(&mut model, &clock, 2);
        model.pause();
        assert_eq!(model.status(), Status::Paused);

        // The tick scheduled before the pause still fires, and is ignored.
        run_ticks(&mut model, &clock, 5);
        assert_eq!(model.remaining(), Duration::from_secs(8));
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_pause_when_not_running_is_noop() {
        let (mut model, _clock) = engine(10);
        model.pause();
        assert_eq!(model.status(), Status::Idle);
    }

    #[test]
    fn test_pause_start_cycle_does_not_double_tick() {
        let (mut model, clock) = engine(10);
        let _ = model.start();
        model.pause();
        let _ = model.start();

        // Two ticks are queued (old chain and new chain); only one counts.
        assert_eq!(clock.pending(), 2);
        run_ticks(&mut model, &clock, 1);
        assert_eq!(model.remaining(), Duration::from_secs(9));
        assert_eq!(clock.pending(), 1);
    }

    #[test]
    fn test_toggle() {
        let (mut model, _clock) = engine(10);
        assert!(model.toggle().is_some());
        assert!(model.running());
        assert!(model.toggle().is_none());
        assert_eq!(model.status(), Status::Paused);
    }

    #[test]
    fn test_reset_restores_initial_and_stops() {
        let (mut model, clock) = engine(600);
        let _ = model.start();
        run_ticks(&mut model, &clock, 3);
        model.pause();
        model.reset();
        assert_eq!(model.status(), Status::Stopped);
        assert_eq!(model.remaining(), Duration::from_secs(600));

        // Reset never resumes by itself.
        run_ticks(&mut model, &clock, 3);
        assert_eq!(model.remaining(), Duration::from_secs(600));
    }

    #[test]
    fn test_reset_then_start_matches_fresh_engine() {
        let (mut used, used_clock) = engine(5);
        let _ = used.start();
        run_ticks(&mut used, &used_clock, 2);
        used.reset();
        let _ = used.start();

        let (mut fresh, fresh_clock) = engine(5);
        let _ = fresh.start();

        for _ in 0..6 {
            run_ticks(&mut used, &used_clock, 1);
            run_ticks(&mut fresh, &fresh_clock, 1);
            assert_eq!(used.remaining(), fresh.remaining());
            assert_eq!(used.status(), fresh.status());
        }
    }

    #[test]
    fn test_reaching_zero_stops_and_times_out() {
        let (mut model, clock) = engine(2);
        let _ = model.start();

        let first = clock.fire_next().expect("first tick");
        assert!(model.update(first).is_some());
        assert!(model.running());

        let last = clock.fire_next().expect("second tick");
        assert!(model.update(last).is_some()); // timeout command
        assert_eq!(model.status(), Status::Stopped);
        assert!(model.timed_out());
        assert_eq!(model.view(), "00:00");
        assert_eq!(clock.pending(), 0, "no ticks after zero");

        let timeouts = clock.timeouts();
        assert_eq!(timeouts.len(), 1);
        assert_eq!(
            timeouts[0].downcast_ref::<TimeoutMsg>(),
            Some(&TimeoutMsg { id: model.id() })
        );

        // Nothing left to count.
        assert!(model.start().is_none());
        assert_eq!(model.status(), Status::Stopped);
    }

    #[test]
    fn test_sub_step_initial_value_floors_at_zero() {
        let clock = ManualScheduler::new();
        let mut model =
            Model::with_scheduler(Duration::from_millis(1_500), Arc::new(clock.clone()));
        let _ = model.start();
        run_ticks(&mut model, &clock, 1);
        assert_eq!(model.remaining(), Duration::from_millis(500));
        run_ticks(&mut model, &clock, 1);
        assert_eq!(model.remaining(), Duration::ZERO);
        assert_eq!(model.status(), Status::Stopped);
    }

    #[test]
    fn test_remaining_is_monotonic_while_running() {
        let (mut model, clock) = engine(4);
        let _ = model.start();
        let mut last = model.remaining();
        for _ in 0..10 {
            run_ticks(&mut model, &clock, 1);
            assert!(model.remaining() <= last);
            last = model.remaining();
        }
        assert_eq!(last, Duration::ZERO);
    }

    #[test]
    fn test_rejects_foreign_and_non_tick_messages() {
        let (mut model, _clock) = engine(10);
        let _ = model.start();

        let foreign = TickMsg {
            id: model.id() + 999,
            tag: model.tag,
        };
        assert!(model.update(Box::new(foreign)).is_none());
        assert!(model.update(Box::new("not a tick")).is_none());
        assert_eq!(model.remaining(), Duration::from_secs(10));
    }

    #[test]
    fn test_reconfigure_cancels_chain_and_goes_idle() {
        let (mut model, clock) = engine(10);
        let id = model.id();
        let _ = model.start();
        model.reconfigure(Duration::from_secs(90));

        assert_eq!(model.status(), Status::Idle);
        assert_eq!(model.remaining(), Duration::from_secs(90));
        assert_eq!(model.initial(), Duration::from_secs(90));
        assert_eq!(model.id(), id);

        run_ticks(&mut model, &clock, 3);
        assert_eq!(model.remaining(), Duration::from_secs(90));

        model.reset();
        assert_eq!(model.remaining(), Duration::from_secs(90));
    }

    #[test]
    fn test_status_at_rest() {
        assert!(Status::Idle.is_at_rest());
        assert!(Status::Stopped.is_at_rest());
        assert!(!Status::Running.is_at_rest());
        assert!(!Status::Paused.is_at_rest());
        assert_eq!(Status::Paused.to_string(), "paused");
    }
}
