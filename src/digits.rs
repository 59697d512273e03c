//! Large block-glyph rendering for clock faces.
//!
//! Each glyph is [`HEIGHT`] rows tall. Characters without a glyph render as
//! blank columns of the same height so the layout never shifts.

/// Rows per glyph.
pub const HEIGHT: usize = 5;

const DIGITS: [[&str; HEIGHT]; 10] = [
    ["███", "█ █", "█ █", "█ █", "███"],
    [" ██", "  █", "  █", "  █", "  █"],
    ["███", "  █", "███", "█  ", "███"],
    ["███", "  █", "███", "  █", "███"],
    ["█ █", "█ █", "███", "  █", "  █"],
    ["███", "█  ", "███", "  █", "███"],
    ["███", "█  ", "███", "█ █", "███"],
    ["███", "  █", "  █", "  █", "  █"],
    ["███", "█ █", "███", "█ █", "███"],
    ["███", "█ █", "███", "  █", "███"],
];

const COLON: [&str; HEIGHT] = [" ", "█", " ", "█", " "];
const BLANK: [&str; HEIGHT] = ["   ", "   ", "   ", "   ", "   "];

fn glyph(ch: char) -> [&'static str; HEIGHT] {
    match ch {
        ':' => COLON,
        d => d.to_digit(10).map(|n| DIGITS[n as usize]).unwrap_or(BLANK),
    }
}

/// Renders `text` as [`HEIGHT`] lines of block glyphs separated by one
/// column of space.
pub fn render(text: &str) -> Vec<String> {
    (0..HEIGHT)
        .map(|row| {
            text.chars()
                .map(|ch| glyph(ch)[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_height_and_width() {
        let rows = render("09:57");
        assert_eq!(rows.len(), HEIGHT);
        // Four 3-wide digits, a 1-wide colon, four separators.
        for row in &rows {
            assert_eq!(row.chars().count(), 4 * 3 + 1 + 4);
        }
    }

    #[test]
    fn test_render_one() {
        let rows = render("1");
        assert_eq!(rows[0], " ██");
        assert_eq!(rows[4], "  █");
    }

    #[test]
    fn test_unknown_char_is_blank() {
        assert!(render("?").iter().all(|r| r.trim().is_empty()));
    }
}
