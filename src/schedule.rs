//! Tick scheduling for the countdown engine.
//!
//! The engine never sleeps or reads the wall clock itself. Every time it
//! wants another tick it asks a [`Scheduler`] for a command that will deliver
//! a [`TickMsg`] later, and when it runs out it asks the same scheduler to
//! deliver its [`TimeoutMsg`]. Cancelling is done on the receiving side: each tick
//! carries the engine's id and tag, and the engine bumps its tag whenever the
//! outstanding tick chain should die. A cancelled tick that still arrives is
//! simply ignored.
//!
//! [`RuntimeScheduler`] is what applications use. [`ManualScheduler`] is a
//! fake clock for tests: it parks ticks in a queue until the test fires them.
//!
//! ```rust
//! use scoreclock::countdown;
//! use scoreclock::schedule::ManualScheduler;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = ManualScheduler::new();
//! let mut engine = countdown::Model::with_scheduler(
//!     Duration::from_secs(3),
//!     Arc::new(clock.clone()),
//! );
//!
//! let _ = engine.start();
//! for tick in clock.advance() {
//!     let _ = engine.update(tick);
//! }
//! assert_eq!(engine.remaining(), Duration::from_secs(2));
//! ```

use crate::countdown::{TickMsg, TimeoutMsg};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Source of delayed tick messages.
pub trait Scheduler: fmt::Debug + Send + Sync {
    /// Returns a command that delivers `tick` after `interval`.
    fn schedule(&self, interval: Duration, tick: TickMsg) -> Cmd;

    /// Returns a command that delivers `timeout` as soon as possible.
    fn notify(&self, timeout: TimeoutMsg) -> Cmd;
}

/// Schedules ticks on the bubbletea runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeScheduler;

impl Scheduler for RuntimeScheduler {
    fn schedule(&self, interval: Duration, tick: TickMsg) -> Cmd {
        bubbletea_tick(interval, move |_| Box::new(tick.clone()) as Msg)
    }

    fn notify(&self, timeout: TimeoutMsg) -> Cmd {
        Box::pin(async move { Some(Box::new(timeout) as Msg) })
    }
}

/// A tick waiting in a [`ManualScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTick {
    /// Delay the engine asked for.
    pub interval: Duration,
    /// The message to deliver.
    pub tick: TickMsg,
}

/// Fake clock that holds ticks and timeouts until they are fired explicitly.
///
/// Clones share the same queues, so a test keeps one handle and gives another
/// to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<VecDeque<PendingTick>>>,
    timeouts: Arc<Mutex<Vec<TimeoutMsg>>>,
}

impl ManualScheduler {
    /// Creates an empty fake clock.
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<PendingTick>> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn timeouts_lock(&self) -> MutexGuard<'_, Vec<TimeoutMsg>> {
        self.timeouts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of ticks waiting to fire.
    pub fn pending(&self) -> usize {
        self.queue().len()
    }

    /// A copy of the waiting ticks, oldest first.
    pub fn peek(&self) -> Vec<PendingTick> {
        self.queue().iter().cloned().collect()
    }

    /// Fires the oldest waiting tick, as if its interval had elapsed.
    pub fn fire_next(&self) -> Option<Msg> {
        self.queue()
            .pop_front()
            .map(|pending| Box::new(pending.tick) as Msg)
    }

    /// Fires every tick that was waiting when called.
    ///
    /// Ticks scheduled while the returned messages are processed stay queued
    /// for the next call, so each call advances the clock by one interval.
    pub fn advance(&self) -> Vec<Msg> {
        self.queue()
            .drain(..)
            .map(|pending| Box::new(pending.tick) as Msg)
            .collect()
    }

    /// Delivers every timeout raised since the last call.
    pub fn timeouts(&self) -> Vec<Msg> {
        self.timeouts_lock()
            .drain(..)
            .map(|timeout| Box::new(timeout) as Msg)
            .collect()
    }

    /// Drops every waiting tick and timeout without delivering them.
    pub fn clear(&self) {
        self.queue().clear();
        self.timeouts_lock().clear();
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, interval: Duration, tick: TickMsg) -> Cmd {
        self.queue().push_back(PendingTick { interval, tick });
        Box::pin(async { None })
    }

    fn notify(&self, timeout: TimeoutMsg) -> Cmd {
        self.timeouts_lock().push(timeout);
        Box::pin(async { None })
    }
}
