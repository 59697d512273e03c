//! Editable countdown clock widget.
//!
//! The clock shows the remaining time of a [countdown](crate::countdown) as
//! `MM:SS`, with a start/pause button and a reset button underneath. While
//! the countdown is at rest (idle or stopped) the face can be edited in
//! place: the user types a new `MM:SS` value, each keystroke goes through the
//! time [mask](crate::mask), and every change reconfigures the countdown with
//! the new target duration.
//!
//! The face changes colour as time runs low: yellow under four minutes, red
//! under one. While editing it is drawn in a neutral editing style instead.
//!
//! # Example
//!
//! ```rust
//! use scoreclock::clock::{Model, Tone};
//! use scoreclock::countdown::Status;
//! use std::time::Duration;
//!
//! let mut clock = Model::new();
//! assert_eq!(clock.display(), "10:00");
//! assert_eq!(clock.target(), Duration::from_secs(600));
//!
//! let _ = clock.begin_edit();
//! assert!(clock.editing());
//! clock.set_value("0230");
//! clock.end_edit();
//! assert_eq!(clock.display(), "02:30");
//! assert_eq!(clock.tone(), Tone::Warning);
//!
//! let _ = clock.start();
//! assert_eq!(clock.status(), Status::Running);
//! assert!(clock.begin_edit().is_none());
//! assert!(!clock.editing());
//! ```

use crate::countdown::{self, Status};
use crate::digits;
use crate::duration::{ClockFace, TimerValue};
use crate::field;
use crate::key::{self, Binding};
use crate::mask::Mask;
use crate::schedule::{RuntimeScheduler, Scheduler};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use std::sync::Arc;
use std::time::Duration;

/// Visual urgency of the clock face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Four minutes or more left.
    Neutral,
    /// Under four minutes left.
    Warning,
    /// Under one minute left.
    Urgent,
    /// The face is being edited.
    Editing,
}

impl Tone {
    /// Tone for a remaining duration, ignoring edit state.
    pub fn for_remaining(remaining: Duration) -> Self {
        match ClockFace::from_duration(remaining).minutes {
            0 => Tone::Urgent,
            1..=3 => Tone::Warning,
            _ => Tone::Neutral,
        }
    }
}

/// Styles used by the clock.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Face with plenty of time left.
    pub neutral: Style,
    /// Face under four minutes.
    pub warning: Style,
    /// Face under one minute.
    pub urgent: Style,
    /// Face while editing.
    pub editing: Style,
    /// Control buttons.
    pub button: Style,
}

impl Default for Styles {
    fn default() -> Self {
        let face = Style::new().bold(true).padding(0, 1, 0, 1);
        Self {
            neutral: face.clone(),
            warning: face.clone().foreground(Color::from("#FACC15")),
            urgent: face.clone().foreground(Color::from("#EF4444")),
            editing: face
                .foreground(Color::from("#000000"))
                .background(Color::from("#E5E5E5")),
            button: Style::new()
                .foreground(Color::from("#171717"))
                .background(Color::from("#E5E5E5"))
                .padding(0, 1, 0, 1),
        }
    }
}

impl Styles {
    fn for_tone(&self, tone: Tone) -> &Style {
        match tone {
            Tone::Neutral => &self.neutral,
            Tone::Warning => &self.warning,
            Tone::Urgent => &self.urgent,
            Tone::Editing => &self.editing,
        }
    }
}

/// Key bindings of the clock.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Turn the face into an edit field.
    pub edit: Binding,
    /// Leave edit mode.
    pub finish_edit: Binding,
    /// Start or pause.
    pub toggle: Binding,
    /// Reset to the target duration.
    pub reset: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            edit: Binding::new(vec![KeyCode::Enter, KeyCode::Char('e')])
                .with_help("e", "edit"),
            finish_edit: Binding::new(vec![KeyCode::Enter, KeyCode::Esc, KeyCode::Tab])
                .with_help("enter", "done"),
            toggle: Binding::new(vec![KeyCode::Char(' '), KeyCode::Char('s')])
                .with_help("space", "start"),
            reset: Binding::new(vec![KeyCode::Char('r')])
                .with_help("r", "reset"),
        }
    }
}

/// Countdown clock widget.
#[derive(Debug, Clone)]
pub struct Model {
    /// Styles.
    pub styles: Styles,
    /// Key bindings.
    pub key_map: KeyMap,
    /// Render the face with large block digits.
    pub big_digits: bool,

    value: TimerValue,
    target: Duration,
    engine: countdown::Model,
    field: field::Model,
    editing: bool,
    focus: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// A clock set to `10:00`.
    pub fn new() -> Self {
        Self::with_value(TimerValue::default())
    }

    /// A clock set to `value`.
    pub fn with_value(value: TimerValue) -> Self {
        Self::with_scheduler(value, Arc::new(RuntimeScheduler))
    }

    /// A clock set to `value` whose countdown ticks through `scheduler`.
    pub fn with_scheduler(value: TimerValue, scheduler: Arc<dyn Scheduler>) -> Self {
        let target = value.target();
        let mut key_map = KeyMap::default();
        key_map.finish_edit.set_enabled(false);
        Self {
            styles: Styles::default(),
            key_map,
            big_digits: false,
            engine: countdown::Model::with_scheduler(target, scheduler),
            field: field::Model::masked(Mask::time()),
            value,
            target,
            editing: false,
            focus: false,
        }
    }

    /// Enables or disables large block digits.
    pub fn with_big_digits(mut self, big: bool) -> Self {
        self.big_digits = big;
        self
    }

    /// The `MM:SS` text the countdown was configured from.
    pub fn value(&self) -> &TimerValue {
        &self.value
    }

    /// Duration parsed from [`Model::value`].
    pub fn target(&self) -> Duration {
        self.target
    }

    /// Whether the face is an edit field.
    pub fn editing(&self) -> bool {
        self.editing
    }

    /// The underlying countdown.
    pub fn engine(&self) -> &countdown::Model {
        &self.engine
    }

    /// Countdown status.
    pub fn status(&self) -> Status {
        self.engine.status()
    }

    /// Time left.
    pub fn remaining(&self) -> Duration {
        self.engine.remaining()
    }

    /// Current visual tone.
    pub fn tone(&self) -> Tone {
        if self.editing {
            Tone::Editing
        } else {
            Tone::for_remaining(self.engine.remaining())
        }
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        self.engine.view()
    }

    fn sync_bindings(&mut self) {
        let editing = self.editing;
        let at_rest = self.status().is_at_rest();
        self.key_map.edit.set_enabled(!editing && at_rest);
        self.key_map.finish_edit.set_enabled(editing);
        self.key_map.toggle.set_enabled(!editing);
        self.key_map.reset.set_enabled(!editing);
        let label = if self.engine.running() {
            "pause"
        } else {
            "start"
        };
        self.key_map.toggle.set_help("space", label);
    }

    /// Enters edit mode, seeding the field with the current value.
    ///
    /// Only possible while the countdown is idle or stopped; otherwise
    /// nothing changes. Returns the caret blink command.
    pub fn begin_edit(&mut self) -> Option<Cmd> {
        if self.editing || !self.status().is_at_rest() {
            return None;
        }
        tracing::debug!(value = %self.value, "editing clock");
        self.editing = true;
        self.field.set_value(self.value.as_str());
        let cmd = self.field.focus();
        self.sync_bindings();
        cmd
    }

    /// Leaves edit mode. The value typed so far is kept as is.
    pub fn end_edit(&mut self) {
        if !self.editing {
            return;
        }
        tracing::debug!(
            value = %self.value,
            target_ms = self.target.as_millis() as u64,
            "clock edit finished",
        );
        self.editing = false;
        self.field.blur();
        self.sync_bindings();
    }

    /// Sets the `MM:SS` value through the time mask.
    ///
    /// A changed target duration reconfigures the countdown. Ignored unless
    /// the countdown is at rest; returns whether the value was applied.
    pub fn set_value(&mut self, raw: &str) -> bool {
        if !self.status().is_at_rest() {
            return false;
        }
        self.value = TimerValue::new(raw);
        if self.editing && self.field.value() != self.value.as_str() {
            self.field.set_value(self.value.as_str());
        }
        let target = self.value.target();
        if target != self.target {
            self.target = target;
            self.engine.reconfigure(target);
        }
        self.sync_bindings();
        true
    }

    /// Starts the countdown, leaving edit mode first.
    pub fn start(&mut self) -> Option<Cmd> {
        self.end_edit();
        let cmd = self.engine.start();
        self.sync_bindings();
        cmd
    }

    /// Pauses the countdown.
    pub fn pause(&mut self) {
        self.engine.pause();
        self.sync_bindings();
    }

    /// Start when not running, pause when running.
    pub fn toggle(&mut self) -> Option<Cmd> {
        if self.engine.running() {
            self.pause();
            None
        } else {
            self.start()
        }
    }

    /// Stops the countdown and restores the target duration.
    pub fn reset(&mut self) {
        self.end_edit();
        self.engine.reset();
        self.sync_bindings();
    }

    /// Handles keys, countdown ticks and edit field messages.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.editing {
                if self.key_map.finish_edit.matches(key_msg) {
                    self.end_edit();
                    return None;
                }
                let cmd = self.field.update(msg);
                let typed = self.field.value().to_string();
                if typed != self.value.as_str() {
                    self.set_value(&typed);
                }
                return cmd;
            }

            if self.key_map.edit.matches(key_msg) {
                return self.begin_edit();
            }
            if self.key_map.toggle.matches(key_msg) {
                return self.toggle();
            }
            if self.key_map.reset.matches(key_msg) {
                self.reset();
            }
            return None;
        }

        if msg.downcast_ref::<countdown::TickMsg>().is_some() {
            let cmd = self.engine.update(msg);
            self.sync_bindings();
            return cmd;
        }

        if self.editing {
            let cmd = self.field.update(msg);
            let typed = self.field.value().to_string();
            if typed != self.value.as_str() {
                self.set_value(&typed);
            }
            return cmd;
        }

        None
    }

    fn face_lines(&self) -> Vec<String> {
        let style = self.styles.for_tone(self.tone()).clone();
        if self.editing {
            return vec![style.inline(true).render(&self.field.view())];
        }
        if self.big_digits {
            return digits::render(&self.display())
                .iter()
                .map(|row| style.clone().inline(true).render(row))
                .collect();
        }
        vec![style.inline(true).render(&self.display())]
    }

    fn controls(&self) -> String {
        let toggle = if self.engine.running() {
            "⏸ pause"
        } else {
            "▶ start"
        };
        let button = self.styles.button.clone().inline(true);
        format!("{}  {}", button.render(toggle), button.render("↺ reset"))
    }

    /// Renders the face above the controls, each line centred.
    pub fn view(&self) -> String {
        let mut lines = self.face_lines();
        lines.push(String::new());
        lines.push(self.controls());
        center_lines(&lines)
    }
}

/// Centres each line within the widest one.
pub(crate) fn center_lines(lines: &[String]) -> String {
    let width = lines
        .iter()
        .map(|l| lipgloss::width_visible(l))
        .max()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| {
            let pad = width.saturating_sub(lipgloss::width_visible(line));
            format!(
                "{}{}{}",
                " ".repeat(pad / 2),
                line,
                " ".repeat(pad - pad / 2)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl key::KeyMap for Model {
    fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.key_map.toggle,
            &self.key_map.reset,
            &self.key_map.edit,
            &self.key_map.finish_edit,
        ]
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        self.sync_bindings();
        None
    }

    /// Losing focus always ends editing.
    fn blur(&mut self) {
        self.focus = false;
        self.end_edit();
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (Model::new(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;
    use crossterm::event::KeyModifiers;

    fn clock(value: &str) -> (Model, ManualScheduler) {
        let fake = ManualScheduler::new();
        let model = Model::with_scheduler(TimerValue::new(value), Arc::new(fake.clone()));
        (model, fake)
    }

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn tick(model: &mut Model, fake: &ManualScheduler, n: usize) {
        for _ in 0..n {
            for msg in fake.advance() {
                let _ = model.update(msg);
            }
        }
    }

    #[test]
    fn test_tone_thresholds() {
        assert_eq!(Tone::for_remaining(Duration::from_secs(600)), Tone::Neutral);
        assert_eq!(Tone::for_remaining(Duration::from_secs(240)), Tone::Neutral);
        assert_eq!(Tone::for_remaining(Duration::from_secs(239)), Tone::Warning);
        assert_eq!(Tone::for_remaining(Duration::from_secs(60)), Tone::Warning);
        assert_eq!(Tone::for_remaining(Duration::from_secs(59)), Tone::Urgent);
        assert_eq!(Tone::for_remaining(Duration::ZERO), Tone::Urgent);
    }

    #[test]
    fn test_default_clock() {
        let model = Model::new();
        assert_eq!(model.value().as_str(), "10:00");
        assert_eq!(model.target(), Duration::from_secs(600));
        assert_eq!(model.status(), Status::Idle);
        assert_eq!(model.tone(), Tone::Neutral);
        assert!(!model.editing());
    }

    #[test]
    fn test_edit_key_enters_edit_mode_at_rest() {
        let (mut model, _) = clock("10:00");
        let _ = model.update(key(KeyCode::Char('e')));
        assert!(model.editing());
        assert_eq!(model.tone(), Tone::Editing);
    }

    #[test]
    fn test_edit_refused_while_running_or_paused() {
        let (mut model, _) = clock("10:00");
        let _ = model.start();
        assert!(model.begin_edit().is_none());
        assert!(!model.editing());

        model.pause();
        assert!(model.begin_edit().is_none());
        assert!(!model.editing());

        model.reset();
        let _ = model.begin_edit();
        assert!(model.editing());
    }

    #[test]
    fn test_typing_reconfigures_countdown() {
        let (mut model, _) = clock("10:00");
        let _ = model.begin_edit();
        let _ = model.update(key(KeyCode::Char('u'))); // dropped by the mask
        let _ = model.update(Box::new(KeyMsg {
            key: KeyCode::Char('u'),
            modifiers: KeyModifiers::CONTROL,
        }));
        assert_eq!(model.value().as_str(), "");
        assert_eq!(model.target(), Duration::ZERO);

        for ch in "0130".chars() {
            let _ = model.update(key(KeyCode::Char(ch)));
        }
        assert_eq!(model.value().as_str(), "01:30");
        assert_eq!(model.target(), Duration::from_secs(90));
        assert_eq!(model.remaining(), Duration::from_secs(90));

        let _ = model.update(key(KeyCode::Enter));
        assert!(!model.editing());
        assert_eq!(model.display(), "01:30");
    }

    #[test]
    fn test_blur_exits_edit_mode() {
        let (mut model, _) = clock("10:00");
        let _ = model.focus();
        let _ = model.begin_edit();
        model.blur();
        assert!(!model.editing());
    }

    #[test]
    fn test_toggle_and_reset_keys() {
        let (mut model, fake) = clock("10:00");
        assert!(model.update(key(KeyCode::Char(' '))).is_some());
        assert_eq!(model.status(), Status::Running);
        assert_eq!(model.key_map.toggle.help().desc, "pause");

        tick(&mut model, &fake, 3);
        assert_eq!(model.display(), "09:57");

        let _ = model.update(key(KeyCode::Char(' ')));
        assert_eq!(model.status(), Status::Paused);
        assert_eq!(model.key_map.toggle.help().desc, "start");

        let _ = model.update(key(KeyCode::Char('r')));
        assert_eq!(model.status(), Status::Stopped);
        assert_eq!(model.display(), "10:00");
    }

    #[test]
    fn test_start_while_editing_finishes_edit() {
        let (mut model, _) = clock("05:00");
        let _ = model.begin_edit();
        assert!(model.start().is_some());
        assert!(!model.editing());
        assert!(model.engine().running());
    }

    #[test]
    fn test_set_value_refused_while_running() {
        let (mut model, _) = clock("05:00");
        let _ = model.start();
        assert!(!model.set_value("0100"));
        assert_eq!(model.value().as_str(), "05:00");
    }

    #[test]
    fn test_same_target_keeps_engine_state() {
        let (mut model, fake) = clock("00:05");
        let _ = model.start();
        tick(&mut model, &fake, 2);
        model.reset();
        assert!(model.set_value("00:05"));
        assert_eq!(model.status(), Status::Stopped);
    }

    #[test]
    fn test_tone_follows_countdown() {
        let (mut model, fake) = clock("01:01");
        let _ = model.start();
        assert_eq!(model.tone(), Tone::Warning);
        tick(&mut model, &fake, 2);
        assert_eq!(model.tone(), Tone::Urgent);
    }

    #[test]
    fn test_view_shows_face_and_controls() {
        let (mut model, _) = clock("10:00");
        let view = strip_ansi_escapes::strip_str(&model.view());
        assert!(view.contains("10:00"));
        assert!(view.contains("start"));
        assert!(view.contains("reset"));

        let _ = model.start();
        let view = strip_ansi_escapes::strip_str(&model.view());
        assert!(view.contains("pause"));
    }

    #[test]
    fn test_big_digits_view() {
        let model = Model::new().with_big_digits(true);
        let view = strip_ansi_escapes::strip_str(&model.view());
        assert!(view.contains('█'));
        assert!(!view.contains("10:00"));
    }
}
