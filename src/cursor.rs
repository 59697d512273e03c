//! Blinking caret for in-place edit fields.
//!
//! The caret is a single cell drawn in reverse video while "on" and plain
//! while "off", toggling every [`BLINK_SPEED`] while focused. Blink
//! messages carry the caret's id and a tag so that a caret only reacts to the
//! blink chain it started most recently.

use bubbletea_rs::{tick, Cmd, Msg};
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

static LAST_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    LAST_ID.fetch_add(1, Ordering::Relaxed) + 1
}

/// Time between caret blinks.
pub const BLINK_SPEED: Duration = Duration::from_millis(530);

/// Toggles a caret between its visible and hidden phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlinkMsg {
    /// Caret that scheduled the blink.
    pub id: usize,
    /// Blink chain the message belongs to.
    pub tag: usize,
}

/// Caret state.
#[derive(Debug, Clone)]
pub struct Model {
    /// Style of a visible caret cell.
    pub style: Style,
    /// Style of a hidden caret cell.
    pub text_style: Style,

    id: usize,
    tag: usize,
    focus: bool,
    visible: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            style: Style::new(),
            text_style: Style::new(),
            id: next_id(),
            tag: 0,
            focus: false,
            visible: false,
        }
    }
}

impl Model {
    /// Creates an unfocused caret.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier carried by this caret's blink messages.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Whether the caret is currently drawn.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Shows the caret and starts blinking.
    pub fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        self.visible = true;
        Some(self.blink_cmd())
    }

    /// Hides the caret and lets the blink chain lapse.
    pub fn blur(&mut self) {
        self.focus = false;
        self.visible = false;
        self.tag += 1;
    }

    fn blink_cmd(&mut self) -> Cmd {
        self.tag += 1;
        let (id, tag) = (self.id, self.tag);
        tick(BLINK_SPEED, move |_| Box::new(BlinkMsg { id, tag }) as Msg)
    }

    /// Handles this caret's [`BlinkMsg`]s; everything else is ignored.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let blink = msg.downcast_ref::<BlinkMsg>()?;
        if !self.focus || blink.id != self.id || blink.tag != self.tag {
            return None;
        }
        self.visible = !self.visible;
        Some(self.blink_cmd())
    }

    /// Renders the caret cell.
    pub fn view(&self) -> String {
        if self.visible {
            self.style.clone().inline(true).reverse(true).render(" ")
        } else {
            self.text_style.clone().inline(true).render(" ")
        }
    }
}
