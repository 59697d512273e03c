//! Input masks for fixed-shape text fields.
//!
//! A mask is a sequence of slots. A slot is either a character class written
//! in brackets (`[0-9]`, `[a-fA-F]`, `[+-]`) or a literal character. Applying
//! a mask to free text keeps the longest prefix that fits the pattern:
//!
//! - a class slot consumes the next input character it accepts, and input
//!   characters it rejects are dropped;
//! - a literal slot consumes the input character when it is that literal, and
//!   is otherwise filled in automatically as soon as more input arrives.
//!
//! ```rust
//! use scoreclock::mask::Mask;
//!
//! let mask = Mask::time();
//! assert_eq!(mask.apply("1000"), "10:00");
//! assert_eq!(mask.apply("1a2:b3"), "12:3");
//! assert_eq!(mask.apply("123456"), "12:34");
//! ```

use crate::error::{Error, Result};
use once_cell::sync::Lazy;

/// The `MM:SS` pattern used by the countdown clock.
pub const TIME_PATTERN: &str = "[0-9][0-9]:[0-9][0-9]";

static TIME: Lazy<Mask> = Lazy::new(|| Mask::parse(TIME_PATTERN).expect("valid time pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Class(Vec<(char, char)>),
    Literal(char),
}

impl Slot {
    fn accepts(&self, ch: char) -> bool {
        match self {
            Slot::Class(ranges) => ranges.iter().any(|&(lo, hi)| lo <= ch && ch <= hi),
            Slot::Literal(lit) => *lit == ch,
        }
    }
}

/// A compiled input mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pattern: String,
    slots: Vec<Slot>,
}

impl Mask {
    /// Compiles a mask pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMask`] for an empty pattern, an unterminated
    /// or empty class, or a reversed range such as `[9-0]`.
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidMask {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let mut slots = Vec::new();
        let mut chars = pattern.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != '[' {
                slots.push(Slot::Literal(ch));
                continue;
            }

            let mut members = Vec::new();
            loop {
                match chars.next() {
                    None => return Err(invalid("unterminated character class")),
                    Some(']') => break,
                    Some(lo) => {
                        if chars.peek() == Some(&'-') {
                            chars.next();
                            match chars.next() {
                                None => return Err(invalid("unterminated character class")),
                                // A trailing '-' is a literal member: "[+-]".
                                Some(']') => {
                                    members.push((lo, lo));
                                    members.push(('-', '-'));
                                    break;
                                }
                                Some(hi) if hi < lo => {
                                    return Err(invalid("reversed range in character class"))
                                }
                                Some(hi) => members.push((lo, hi)),
                            }
                        } else {
                            members.push((lo, lo));
                        }
                    }
                }
            }
            if members.is_empty() {
                return Err(invalid("empty character class"));
            }
            slots.push(Slot::Class(members));
        }

        if slots.is_empty() {
            return Err(invalid("pattern has no slots"));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            slots,
        })
    }

    /// The [`TIME_PATTERN`] mask.
    pub fn time() -> Self {
        TIME.clone()
    }

    /// The pattern this mask was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of characters in a completely filled value.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false: [`Mask::parse`] rejects empty patterns.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Constrains `raw` to the mask, dropping characters that do not fit.
    pub fn apply(&self, raw: &str) -> String {
        let mut out = String::with_capacity(self.slots.len());
        let mut slot = 0;

        for ch in raw.chars() {
            if slot >= self.slots.len() {
                break;
            }

            match &self.slots[slot] {
                Slot::Literal(lit) if *lit == ch => {
                    out.push(ch);
                    slot += 1;
                }
                Slot::Literal(_) => {
                    // Look past the run of literals for a class slot that
                    // takes this character; the literals get filled in.
                    let mut next = slot;
                    let mut fill = Vec::new();
                    while let Some(Slot::Literal(lit)) = self.slots.get(next) {
                        fill.push(*lit);
                        next += 1;
                    }
                    if self.slots.get(next).is_some_and(|s| s.accepts(ch)) {
                        out.extend(fill);
                        out.push(ch);
                        slot = next + 1;
                    }
                }
                class => {
                    if class.accepts(ch) {
                        out.push(ch);
                        slot += 1;
                    }
                }
            }
        }

        out
    }

    /// Whether `value` fills every slot of the mask.
    pub fn is_complete(&self, value: &str) -> bool {
        value.chars().count() == self.slots.len()
            && value
                .chars()
                .zip(self.slots.iter())
                .all(|(ch, slot)| slot.accepts(ch))
    }
}

impl Default for Mask {
    fn default() -> Self {
        Self::time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_mask_is_compiled_from_pattern() {
        let mask = Mask::time();
        assert_eq!(mask.pattern(), TIME_PATTERN);
        assert_eq!(mask.len(), 5);
        assert_eq!(
            mask.slots,
            vec![
                Slot::Class(vec![('0', '9')]),
                Slot::Class(vec![('0', '9')]),
                Slot::Literal(':'),
                Slot::Class(vec![('0', '9')]),
                Slot::Class(vec![('0', '9')]),
            ]
        );
    }

    #[test]
    fn test_fills_literal_between_digits() {
        let mask = Mask::time();
        assert_eq!(mask.apply("1000"), "10:00");
        assert_eq!(mask.apply("0930"), "09:30");
        assert_eq!(mask.apply("10:00"), "10:00");
    }

    #[test]
    fn test_partial_input_is_prefix() {
        let mask = Mask::time();
        assert_eq!(mask.apply(""), "");
        assert_eq!(mask.apply("1"), "1");
        assert_eq!(mask.apply("10"), "10");
        assert_eq!(mask.apply("10:"), "10:");
        assert_eq!(mask.apply("100"), "10:0");
    }

    #[test]
    fn test_drops_rejected_characters() {
        let mask = Mask::time();
        assert_eq!(mask.apply("1a2:b3"), "12:3");
        assert_eq!(mask.apply("ab"), "");
        assert_eq!(mask.apply("1:2"), "12");
        assert_eq!(mask.apply("12::34"), "12:34");
    }

    #[test]
    fn test_truncates_overflow() {
        assert_eq!(Mask::time().apply("123456789"), "12:34");
    }

    #[test]
    fn test_every_output_fits_the_shape() {
        let mask = Mask::time();
        let inputs = ["", "9", "99", "99:", "99:5", "99:59", "x9y9z5w9", "00000"];
        for input in inputs {
            let out = mask.apply(input);
            for (ch, slot) in out.chars().zip(mask.slots.iter()) {
                assert!(slot.accepts(ch), "{out:?} from {input:?} breaks the mask");
            }
            assert!(out.chars().count() <= mask.len());
        }
    }

    #[test]
    fn test_is_complete() {
        let mask = Mask::time();
        assert!(mask.is_complete("10:00"));
        assert!(!mask.is_complete("10:0"));
        assert!(!mask.is_complete("1000"));
    }

    #[test]
    fn test_parse_classes_and_errors() {
        let mask = Mask::parse("[a-fA-F][+-]#").unwrap();
        assert_eq!(mask.apply("zB-#"), "B-#");
        assert_eq!(mask.len(), 3);

        assert!(matches!(Mask::parse(""), Err(Error::InvalidMask { .. })));
        assert!(matches!(Mask::parse("[0-9"), Err(Error::InvalidMask { .. })));
        assert!(matches!(Mask::parse("[]"), Err(Error::InvalidMask { .. })));
        assert!(matches!(Mask::parse("[9-0]"), Err(Error::InvalidMask { .. })));
    }
}
