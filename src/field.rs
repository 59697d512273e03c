//! Single-line edit field used for in-place editing.
//!
//! The clock edits its `MM:SS` value and the score panel edits its label with
//! this field. Every change, typed or pasted, goes through a [`Filter`]
//! before it is stored: either an input [`Mask`] or the plain-text sanitiser
//! that keeps the value free of escape sequences and control characters.
//!
//! The caret always sits at the end of the value.

use crate::cursor::Model as Caret;
use crate::key::{matches_binding, new_binding, with_help, with_keys_str, Binding};
use crate::mask::Mask;
use crate::Component;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::prelude::*;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Clipboard text delivered by [`paste`].
#[derive(Debug, Clone)]
pub struct PasteMsg(pub String);

/// Clipboard read failure delivered by [`paste`].
#[derive(Debug, Clone)]
pub struct PasteErrMsg(pub String);

/// Reads the clipboard and delivers a [`PasteMsg`] or [`PasteErrMsg`].
pub fn paste() -> Cmd {
    bubbletea_tick(Duration::from_nanos(1), |_| {
        #[cfg(feature = "clipboard-support")]
        {
            use clipboard::{ClipboardContext, ClipboardProvider};
            let res: Result<String, String> = (|| {
                let mut ctx: ClipboardContext = ClipboardProvider::new()
                    .map_err(|e| format!("Failed to create clipboard context: {}", e))?;
                ctx.get_contents()
                    .map_err(|e| format!("Failed to read clipboard: {}", e))
            })();
            match res {
                Ok(s) => Box::new(PasteMsg(s)) as Msg,
                Err(e) => Box::new(PasteErrMsg(e)) as Msg,
            }
        }
        #[cfg(not(feature = "clipboard-support"))]
        {
            Box::new(PasteErrMsg("Clipboard support not enabled".to_string())) as Msg
        }
    })
}

/// Turns user input into plain text: escape sequences are removed and
/// control characters dropped. Anything else, markup included, is kept as
/// literal characters.
pub fn sanitize(raw: &str) -> String {
    let stripped = strip_ansi_escapes::strip(raw.as_bytes());
    String::from_utf8_lossy(&stripped)
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}

/// How input is constrained before it is stored.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Keep the longest prefix matching the mask.
    Mask(Mask),
    /// Plain text, see [`sanitize`].
    PlainText,
}

impl Filter {
    /// Applies the filter to a candidate value.
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Filter::Mask(mask) => mask.apply(raw),
            Filter::PlainText => sanitize(raw),
        }
    }
}

/// Keys handled by the field.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Delete the last character.
    pub delete_backward: Binding,
    /// Clear the value.
    pub clear: Binding,
    /// Paste from the clipboard.
    pub paste: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            delete_backward: new_binding(vec![
                with_keys_str(&["backspace", "ctrl+h"]),
                with_help("backspace", "delete"),
            ]),
            clear: new_binding(vec![
                with_keys_str(&["ctrl+u"]),
                with_help("ctrl+u", "clear"),
            ]),
            paste: new_binding(vec![
                with_keys_str(&["ctrl+v"]),
                with_help("ctrl+v", "paste"),
            ]),
        }
    }
}

/// Edit field state.
#[derive(Debug, Clone)]
pub struct Model {
    /// Style of the text.
    pub text_style: Style,
    /// Key bindings.
    pub key_map: KeyMap,
    /// Maximum display width of the value; `0` means unlimited.
    pub width_limit: usize,
    /// Last clipboard error, cleared by the next successful edit.
    pub err: Option<String>,

    filter: Filter,
    value: String,
    caret: Caret,
    focus: bool,
}

impl Model {
    /// Creates a field with the given filter.
    pub fn new(filter: Filter) -> Self {
        Self {
            text_style: Style::new(),
            key_map: KeyMap::default(),
            width_limit: 0,
            err: None,
            filter,
            value: String::new(),
            caret: Caret::new(),
            focus: false,
        }
    }

    /// A field constrained by `mask`.
    pub fn masked(mask: Mask) -> Self {
        Self::new(Filter::Mask(mask))
    }

    /// A plain-text field.
    pub fn plain() -> Self {
        Self::new(Filter::PlainText)
    }

    /// Sets the maximum display width.
    pub fn with_width_limit(mut self, width: usize) -> Self {
        self.width_limit = width;
        self
    }

    /// The stored value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value, running it through the filter.
    pub fn set_value(&mut self, raw: &str) {
        let mut value = self.filter.apply(raw);
        if self.width_limit > 0 {
            while value.width() > self.width_limit {
                value.pop();
            }
        }
        self.value = value;
    }

    fn insert(&mut self, text: &str) {
        let candidate = format!("{}{}", self.value, text);
        self.set_value(&candidate);
        self.err = None;
    }

    /// Handles keys and paste results while focused.
    ///
    /// Returns a command for caret blinking or clipboard reads.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if !self.focus {
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if matches_binding(key_msg, &self.key_map.paste) {
                return Some(paste());
            }
            if matches_binding(key_msg, &self.key_map.delete_backward) {
                self.value.pop();
                // Re-filter so a now-dangling literal does not linger.
                let value = self.value.clone();
                self.set_value(&value);
            } else if matches_binding(key_msg, &self.key_map.clear) {
                self.value.clear();
            } else if let KeyCode::Char(ch) = key_msg.key {
                if !key_msg.modifiers.contains(KeyModifiers::CONTROL)
                    && !key_msg.modifiers.contains(KeyModifiers::ALT)
                {
                    self.insert(&ch.to_string());
                }
            }
            return None;
        }

        if let Some(paste_msg) = msg.downcast_ref::<PasteMsg>() {
            let text = paste_msg.0.clone();
            self.insert(&text);
            return None;
        }

        if let Some(paste_err) = msg.downcast_ref::<PasteErrMsg>() {
            tracing::warn!(error = %paste_err.0, "paste failed");
            self.err = Some(paste_err.0.clone());
            return None;
        }

        self.caret.update(&msg)
    }

    /// Renders the value followed by the caret.
    pub fn view(&self) -> String {
        let mut out = self.text_style.clone().inline(true).render(&self.value);
        if self.focus {
            out.push_str(&self.caret.view());
        }
        out
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        self.caret.focus()
    }

    fn blur(&mut self) {
        self.focus = false;
        self.caret.blur();
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
