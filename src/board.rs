//! Root view: the clock, optionally flanked by two score panels.
//!
//! With scores enabled the board is laid out in three columns, home score,
//! clock, away score, and `tab` moves focus between them. Keys go to the
//! focused panel. While a panel is editing text every key belongs to it, so
//! only `ctrl+c` quits.
//!
//! The bubbletea runtime builds models through the argument-less
//! [`BubbleTeaModel::init`], so the binary hands its [`Settings`] over with
//! [`install`] before starting the program.

use crate::clock;
use crate::countdown::TimeoutMsg;
use crate::duration::TimerValue;
use crate::help;
use crate::key::{self, new_binding, with_help, with_keys_str, Binding};
use crate::schedule::{RuntimeScheduler, Scheduler};
use crate::score;
use crate::Component;
use bubbletea_rs::{quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg, WindowSizeMsg};
use crossterm::event::KeyCode;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use once_cell::sync::OnceCell;
use std::sync::Arc;

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Installs the settings used by [`BubbleTeaModel::init`].
///
/// Returns `false` if settings were already installed; the first call wins.
pub fn install(settings: Settings) -> bool {
    SETTINGS.set(settings).is_ok()
}

/// How the board is put together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Starting clock value.
    pub timer: TimerValue,
    /// Labels of the home and away panels; `None` shows the clock alone.
    pub scores: Option<(String, String)>,
    /// Large block digits on the clock.
    pub big_digits: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer: TimerValue::default(),
            scores: None,
            big_digits: false,
        }
    }
}

/// Which panel has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Left score panel.
    Home,
    /// The clock.
    Clock,
    /// Right score panel.
    Away,
}

/// Board-level key bindings.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Focus the next panel.
    pub next_panel: Binding,
    /// Quit when nothing is being edited.
    pub quit: Binding,
    /// Quit unconditionally.
    pub force_quit: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            next_panel: Binding::new(vec![KeyCode::Tab])
                .with_help("tab", "next panel"),
            quit: Binding::new(vec![KeyCode::Char('q')])
                .with_help("q", "quit"),
            force_quit: new_binding(vec![
                with_keys_str(&["ctrl+c"]),
                with_help("ctrl+c", "quit"),
            ]),
        }
    }
}

/// The root model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Key bindings.
    pub key_map: KeyMap,
    /// Help line renderer.
    pub help: help::Model,

    clock: clock::Model,
    scores: Option<(score::Model, score::Model)>,
    focused: Panel,
    timed_out: bool,
}

impl Model {
    /// Builds a board from settings, ticking on the bubbletea runtime.
    pub fn new(settings: &Settings) -> Self {
        Self::with_scheduler(settings, Arc::new(RuntimeScheduler))
    }

    /// Builds a board whose clock ticks through `scheduler`.
    pub fn with_scheduler(settings: &Settings, scheduler: Arc<dyn Scheduler>) -> Self {
        let mut clock = clock::Model::with_scheduler(settings.timer.clone(), scheduler)
            .with_big_digits(settings.big_digits);
        let _ = clock.focus();

        let scores = settings
            .scores
            .as_ref()
            .map(|(home, away)| (score::Model::new(home), score::Model::new(away)));
        let mut key_map = KeyMap::default();
        key_map.next_panel.set_enabled(scores.is_some());

        Self {
            key_map,
            help: help::Model::new(),
            clock,
            scores,
            focused: Panel::Clock,
            timed_out: false,
        }
    }

    /// The clock.
    pub fn clock(&self) -> &clock::Model {
        &self.clock
    }

    /// The home and away panels, if shown.
    pub fn scores(&self) -> Option<(&score::Model, &score::Model)> {
        self.scores.as_ref().map(|(home, away)| (home, away))
    }

    /// The focused panel.
    pub fn focused(&self) -> Panel {
        self.focused
    }

    /// Whether the clock has run out since it was last started.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    fn panel(&mut self, panel: Panel) -> &mut dyn Component {
        match (panel, self.scores.as_mut()) {
            (Panel::Home, Some((home, _))) => home,
            (Panel::Away, Some((_, away))) => away,
            _ => &mut self.clock,
        }
    }

    fn editing(&self) -> bool {
        self.clock.editing()
            || self
                .scores
                .as_ref()
                .is_some_and(|(home, away)| home.editing() || away.editing())
    }

    /// Moves focus to the next panel, left to right, wrapping around.
    pub fn focus_next(&mut self) -> Option<Cmd> {
        if self.scores.is_none() {
            return None;
        }
        let next = match self.focused {
            Panel::Home => Panel::Clock,
            Panel::Clock => Panel::Away,
            Panel::Away => Panel::Home,
        };
        self.panel(self.focused).blur();
        self.focused = next;
        tracing::debug!(panel = ?next, "focus moved");
        self.panel(next).focus()
    }

    fn forward(&mut self, msg: Msg) -> Option<Cmd> {
        match (self.focused, self.scores.as_mut()) {
            (Panel::Home, Some((home, _))) => home.update(msg),
            (Panel::Away, Some((_, away))) => away.update(msg),
            _ => self.clock.update(msg),
        }
    }

    /// Routes a message to the board, the clock and the focused panel.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.help.width = size.width as usize;
            return None;
        }

        if let Some(timeout) = msg.downcast_ref::<TimeoutMsg>() {
            if timeout.id == self.clock.engine().id() {
                tracing::info!("time is up");
                self.timed_out = true;
            }
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.key_map.force_quit.matches(key_msg) {
                return Some(quit());
            }
            if !self.editing() {
                if self.key_map.quit.matches(key_msg) {
                    return Some(quit());
                }
                if self.key_map.next_panel.matches(key_msg) {
                    return self.focus_next();
                }
            }
            let cmd = self.forward(msg);
            if self.clock.engine().running() {
                self.timed_out = false;
            }
            return cmd;
        }

        // Ticks, blinks and paste results: the clock owns ticks, the focused
        // panel owns the rest.
        if msg.downcast_ref::<crate::countdown::TickMsg>().is_some() || self.focused == Panel::Clock
        {
            return self.clock.update(msg);
        }
        self.forward(msg)
    }

    fn framed(&self, panel: Panel, content: String) -> String {
        if self.scores.is_none() {
            return content;
        }
        let width = content
            .lines()
            .map(lipgloss::width_visible)
            .max()
            .unwrap_or(0);
        let marker = if self.focused == panel {
            Style::new()
                .foreground(Color::from("#EE6FF8"))
                .inline(true)
                .render(&"▔".repeat(width))
        } else {
            " ".repeat(width)
        };
        format!("{}\n{}", content, marker)
    }

    /// Renders the panels side by side with the help line underneath.
    pub fn view(&self) -> String {
        let clock = self.framed(Panel::Clock, self.clock.view());
        let body = match &self.scores {
            Some((home, away)) => {
                let home = self.framed(Panel::Home, home.view());
                let away = self.framed(Panel::Away, away.view());
                lipgloss::join_horizontal(
                    lipgloss::TOP,
                    &[home.as_str(), "    ", clock.as_str(), "    ", away.as_str()],
                )
            }
            None => clock,
        };

        let help = match (self.focused, &self.scores) {
            (Panel::Home, Some((home, _))) => self.help.view(home),
            (Panel::Away, Some((_, away))) => self.help.view(away),
            _ => self.help.view(&self.clock),
        };
        let board_help = self.help.view(&self.key_map);

        format!("\n{}\n\n{}\n{}", body, help, board_help)
    }
}

impl key::KeyMap for KeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.next_panel, &self.quit]
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let settings = SETTINGS.get().cloned().unwrap_or_default();
        tracing::info!(
            timer = %settings.timer,
            scores = settings.scores.is_some(),
            "board starting",
        );
        (Model::new(&settings), None)
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
    use crate::countdown::Status;
    use crate::schedule::ManualScheduler;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn board(scores: bool) -> (Model, ManualScheduler) {
        let fake = ManualScheduler::new();
        let settings = Settings {
            scores: scores.then(|| ("Home".to_string(), "Away".to_string())),
            ..Settings::default()
        };
        (Model::with_scheduler(&settings, Arc::new(fake.clone())), fake)
    }

    #[test]
    fn test_clock_only_board() {
        let (mut model, _) = board(false);
        assert!(model.scores().is_none());
        assert_eq!(model.focused(), Panel::Clock);
        assert!(model.update(key(KeyCode::Tab)).is_none());
        assert_eq!(model.focused(), Panel::Clock);
        assert!(model.clock().focused());
    }

    #[test]
    fn test_keys_reach_clock() {
        let (mut model, fake) = board(false);
        let _ = model.update(key(KeyCode::Char(' ')));
        assert_eq!(model.clock().status(), Status::Running);
        for msg in fake.advance() {
            let _ = model.update(msg);
        }
        assert_eq!(model.clock().display(), "09:59");
    }

    #[test]
    fn test_tab_cycles_focus() {
        let (mut model, _) = board(true);
        let _ = model.update(key(KeyCode::Tab));
        assert_eq!(model.focused(), Panel::Away);
        assert!(!model.clock().focused());
        let _ = model.update(key(KeyCode::Tab));
        assert_eq!(model.focused(), Panel::Home);
        let _ = model.update(key(KeyCode::Tab));
        assert_eq!(model.focused(), Panel::Clock);
    }

    #[test]
    fn test_score_keys_go_to_focused_panel() {
        let (mut model, _) = board(true);
        let _ = model.update(key(KeyCode::Tab)); // away
        let _ = model.update(key(KeyCode::Char('3')));
        let (home, away) = model.scores().unwrap();
        assert_eq!(home.value(), 0);
        assert_eq!(away.value(), 3);
    }

    #[test]
    fn test_quit_blocked_while_editing() {
        let (mut model, _) = board(false);
        let _ = model.update(key(KeyCode::Char('e')));
        assert!(model.clock().editing());
        assert!(model.update(key(KeyCode::Char('q'))).is_none());

        let _ = model.update(key(KeyCode::Esc));
        assert!(model.update(key(KeyCode::Char('q'))).is_some());
    }

    #[test]
    fn test_tab_ends_edit_before_switching() {
        let (mut model, _) = board(true);
        let _ = model.update(key(KeyCode::Char('e')));
        let _ = model.update(key(KeyCode::Tab));
        assert!(!model.clock().editing());
        assert_eq!(model.focused(), Panel::Clock);
    }

    #[test]
    fn test_timeout_is_recorded() {
        let (mut model, _) = board(false);
        let id = model.clock().engine().id();
        let _ = model.update(Box::new(TimeoutMsg { id: id + 1 }));
        assert!(!model.timed_out());
        let _ = model.update(Box::new(TimeoutMsg { id }));
        assert!(model.timed_out());
    }

    #[test]
    fn test_view_lays_out_panels() {
        let (model, _) = board(true);
        let view = strip_ansi_escapes::strip_str(&model.view());
        assert!(view.contains("HOME"));
        assert!(view.contains("AWAY"));
        assert!(view.contains("10:00"));
        assert!(view.contains("next panel"));
    }
}
