#![warn(missing_docs)]

//! # scoreclock
//!
//! A terminal countdown clock and scoreboard built as
//! [bubbletea-rs](https://github.com/whit3rabbit/bubbletea-rs) components.
//!
//! ## Overview
//!
//! Every widget follows the Elm Architecture: state lives in a `Model`,
//! `update(msg)` reacts to key presses and timer ticks and may return a
//! command, and `view()` renders a string. The widgets nest: the
//! [`board`] owns a [`clock`] and, optionally, two [`score`] panels.
//!
//! ## Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`countdown::Model`] | Start/pause/reset countdown state machine |
//! | [`clock::Model`] | Countdown display with in-place `MM:SS` editing |
//! | [`score::Model`] | Team label and +1/+2/+3 counter |
//! | [`board::Model`] | Root view laying the panels out |
//! | [`field::Model`] | Single-line edit field with input filtering |
//!
//! Utilities: [`mask`] constrains text to a fixed pattern, [`duration`]
//! formats clock faces and parses timer values, [`schedule`] lets tests
//! drive the countdown with a fake clock.
//!
//! ## Example
//!
//! ```rust
//! use scoreclock::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let fake = ManualScheduler::new();
//! let mut clock = Clock::with_scheduler(TimerValue::new("10:00"), Arc::new(fake.clone()));
//!
//! let _ = clock.start();
//! for _ in 0..3 {
//!     for tick in fake.advance() {
//!         let _ = clock.update(tick);
//!     }
//! }
//! assert_eq!(clock.display(), "09:57");
//! assert_eq!(clock.remaining(), Duration::from_secs(597));
//! ```

pub mod board;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod cursor;
pub mod digits;
pub mod duration;
pub mod error;
pub mod field;
pub mod help;
pub mod key;
pub mod mask;
pub mod schedule;
pub mod score;

use bubbletea_rs::Cmd;

/// Components that take keyboard focus.
///
/// Losing focus ends any in-place editing the component was doing.
///
/// ```rust
/// use scoreclock::prelude::*;
///
/// let mut score = Score::new("Home");
/// let _ = score.focus();
/// assert!(score.focused());
/// score.blur();
/// assert!(!score.focused());
/// ```
pub trait Component {
    /// Gives the component focus. May return a command, for example to
    /// start a caret blinking.
    fn focus(&mut self) -> Option<Cmd>;

    /// Takes focus away.
    fn blur(&mut self);

    /// Whether the component has focus.
    fn focused(&self) -> bool;
}

pub use board::Model as Board;
pub use clock::Model as Clock;
pub use countdown::{Model as Countdown, Status, TickMsg, TimeoutMsg};
pub use duration::{format, ClockFace, TimerValue};
pub use error::{Error, Result};
pub use field::Model as EditField;
pub use mask::Mask;
pub use score::{Model as Score, Points};

/// Commonly used types in one import.
pub mod prelude {
    pub use crate::board::{Model as Board, Panel, Settings};
    pub use crate::clock::{Model as Clock, Tone};
    pub use crate::countdown::{Model as Countdown, Status, TickMsg, TimeoutMsg};
    pub use crate::duration::{format, ClockFace, TimerValue};
    pub use crate::key::{Binding, KeyMap};
    pub use crate::mask::Mask;
    pub use crate::schedule::{ManualScheduler, RuntimeScheduler, Scheduler};
    pub use crate::score::{Model as Score, Points};
    pub use crate::Component;
}
