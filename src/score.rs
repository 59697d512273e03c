//! Team score panel.
//!
//! A score panel is a label plus a counter. The counter goes up by one, two
//! or three points and can be reset to zero; there is no other way down. The
//! label is edited in place as plain text: escape sequences and control
//! characters are stripped, and anything that looks like markup is shown
//! literally.
//!
//! ```rust
//! use scoreclock::score::{Model, Points};
//!
//! let mut score = Model::new("Home");
//! score.increase(Points::One);
//! score.increase(Points::Three);
//! score.increase(Points::Two);
//! assert_eq!(score.value(), 6);
//!
//! score.reset();
//! assert_eq!(score.value(), 0);
//! ```

use crate::field;
use crate::key::{self, Binding};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::prelude::*;

/// Label used when none is given.
pub const DEFAULT_LABEL: &str = "Team";

/// Longest label, in terminal columns.
pub const LABEL_WIDTH: usize = 16;

/// Points a single button adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Points {
    /// +1
    One = 1,
    /// +2
    Two = 2,
    /// +3
    Three = 3,
}

impl Points {
    /// The number of points.
    pub fn value(self) -> u64 {
        self as u64
    }
}

/// Styles of the panel.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Label above the score.
    pub label: Style,
    /// The score itself.
    pub value: Style,
    /// Increment and reset buttons.
    pub button: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            label: Style::new().bold(true).foreground(Color::from("#737373")),
            value: Style::new().bold(true),
            button: Style::new()
                .bold(true)
                .foreground(Color::from("#171717"))
                .background(Color::from("#E5E5E5"))
                .padding(0, 1, 0, 1),
        }
    }
}

/// Key bindings of the panel.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Add one point.
    pub add_one: Binding,
    /// Add two points.
    pub add_two: Binding,
    /// Add three points.
    pub add_three: Binding,
    /// Back to zero.
    pub reset: Binding,
    /// Edit the label.
    pub edit_label: Binding,
    /// Stop editing the label.
    pub finish_edit: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut finish_edit = Binding::new(vec![KeyCode::Enter, KeyCode::Esc, KeyCode::Tab])
            .with_help("enter", "done");
        finish_edit.set_enabled(false);
        Self {
            add_one: Binding::new(vec![KeyCode::Char('1')]).with_help("1", "+1"),
            add_two: Binding::new(vec![KeyCode::Char('2')]).with_help("2", "+2"),
            add_three: Binding::new(vec![KeyCode::Char('3')]).with_help("3", "+3"),
            reset: Binding::new(vec![KeyCode::Char('0'), KeyCode::Char('x')])
                .with_help("0", "reset"),
            edit_label: Binding::new(vec![KeyCode::Char('n'), KeyCode::Enter])
                .with_help("n", "rename"),
            finish_edit,
        }
    }
}

/// Score panel state.
#[derive(Debug, Clone)]
pub struct Model {
    /// Styles.
    pub styles: Styles,
    /// Key bindings.
    pub key_map: KeyMap,

    label: field::Model,
    value: u64,
    editing: bool,
    focus: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}

impl Model {
    /// A panel at zero with the given label.
    pub fn new(label: &str) -> Self {
        let mut field = field::Model::plain().with_width_limit(LABEL_WIDTH);
        field.set_value(label);
        Self {
            styles: Styles::default(),
            key_map: KeyMap::default(),
            label: field,
            value: 0,
            editing: false,
            focus: false,
        }
    }

    /// Current score.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Current label, as plain text.
    pub fn label(&self) -> &str {
        self.label.value()
    }

    /// Replaces the label. Input is treated as plain text.
    pub fn set_label(&mut self, label: &str) {
        self.label.set_value(label);
    }

    /// Whether the label is being edited.
    pub fn editing(&self) -> bool {
        self.editing
    }

    /// Adds points.
    pub fn increase(&mut self, points: Points) {
        self.value = self.value.saturating_add(points.value());
        tracing::debug!(label = self.label(), score = self.value, "score increased");
    }

    /// Sets the score back to zero.
    pub fn reset(&mut self) {
        tracing::debug!(label = self.label(), "score reset");
        self.value = 0;
    }

    /// Starts editing the label.
    pub fn begin_edit(&mut self) -> Option<Cmd> {
        if self.editing {
            return None;
        }
        self.editing = true;
        self.sync_bindings();
        self.label.focus()
    }

    /// Stops editing the label.
    pub fn end_edit(&mut self) {
        if !self.editing {
            return;
        }
        self.editing = false;
        self.label.blur();
        self.sync_bindings();
    }

    fn sync_bindings(&mut self) {
        let editing = self.editing;
        for binding in [
            &mut self.key_map.add_one,
            &mut self.key_map.add_two,
            &mut self.key_map.add_three,
            &mut self.key_map.reset,
            &mut self.key_map.edit_label,
        ] {
            binding.set_enabled(!editing);
        }
        self.key_map.finish_edit.set_enabled(editing);
    }

    /// Handles panel keys, or label edits while editing.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if self.editing {
            if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
                if self.key_map.finish_edit.matches(key_msg) {
                    self.end_edit();
                    return None;
                }
            }
            return self.label.update(msg);
        }

        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        if self.key_map.add_one.matches(key_msg) {
            self.increase(Points::One);
        } else if self.key_map.add_two.matches(key_msg) {
            self.increase(Points::Two);
        } else if self.key_map.add_three.matches(key_msg) {
            self.increase(Points::Three);
        } else if self.key_map.reset.matches(key_msg) {
            self.reset();
        } else if self.key_map.edit_label.matches(key_msg) {
            return self.begin_edit();
        }
        None
    }

    /// Renders label, score and buttons, each line centred.
    pub fn view(&self) -> String {
        let label = if self.editing {
            self.label.view()
        } else {
            self.label.value().to_uppercase()
        };
        let button = self.styles.button.clone().inline(true);
        let buttons = ["+1", "+2", "+3"]
            .iter()
            .map(|b| button.render(b))
            .collect::<Vec<_>>()
            .join(" ");

        let lines = vec![
            self.styles.label.clone().inline(true).render(&label),
            self.styles
                .value
                .clone()
                .inline(true)
                .render(&format!("{:02}", self.value)),
            String::new(),
            buttons,
            button.render("↺"),
        ];
        crate::clock::center_lines(&lines)
    }
}

impl key::KeyMap for Model {
    fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.key_map.add_one,
            &self.key_map.add_two,
            &self.key_map.add_three,
            &self.key_map.reset,
            &self.key_map.edit_label,
            &self.key_map.finish_edit,
        ]
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

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
        (Model::default(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
