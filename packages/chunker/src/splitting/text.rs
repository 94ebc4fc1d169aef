//! Word-boundary splitting of text values.

use crate::html::escaped_char_width;

/// Result of splitting one text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSplit {
    /// Pieces in order. Concatenated they equal the input exactly.
    pub pieces: Vec<String>,

    /// Number of cuts made at the budget boundary rather than at whitespace.
    pub hard_splits: usize,
}

/// Serialized width of a text value.
#[must_use]
pub fn text_width(text: &str) -> usize {
    text.chars().map(escaped_char_width).sum()
}

fn is_boundary_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Split text into pieces whose serialized width fits `budget`.
///
/// Each cut prefers the last whitespace inside the next `budget` width
/// units, provided it sits at or beyond `boundary_ratio * budget`; the
/// whitespace stays at the end of the emitted piece. Without such a
/// whitespace the text is cut exactly at the budget. A budget of zero is
/// treated as one, and every cut consumes at least one character.
///
/// # Examples
/// ```
/// use html_chunker::splitting::split_text;
///
/// let split = split_text("alpha beta gamma", 11, 0.7);
/// assert_eq!(split.pieces, vec!["alpha beta ", "gamma"]);
/// assert_eq!(split.hard_splits, 0);
/// ```
#[must_use]
pub fn split_text(text: &str, budget: usize, boundary_ratio: f64) -> TextSplit {
    let budget = budget.max(1);
    let threshold = budget as f64 * boundary_ratio;

    let mut pieces = Vec::new();
    let mut hard_splits = 0;
    let mut rest = text;

    while text_width(rest) > budget {
        let mut width = 0;
        let mut window_end = 0;
        // (width before the whitespace, byte offset just after it)
        let mut last_whitespace: Option<(usize, usize)> = None;

        for (idx, c) in rest.char_indices() {
            let w = escaped_char_width(c);
            if width + w > budget {
                break;
            }
            if is_boundary_whitespace(c) {
                last_whitespace = Some((width, idx + c.len_utf8()));
            }
            width += w;
            window_end = idx + c.len_utf8();
        }

        let cut = match last_whitespace {
            Some((position, after)) if position as f64 >= threshold => after,
            _ => {
                hard_splits += 1;
                if window_end == 0 {
                    rest.chars().next().map_or(rest.len(), char::len_utf8)
                } else {
                    window_end
                }
            }
        };

        let (piece, remainder) = rest.split_at(cut);
        pieces.push(piece.to_string());
        rest = remainder;
    }

    if !rest.is_empty() || pieces.is_empty() {
        pieces.push(rest.to_string());
    }

    TextSplit {
        pieces,
        hard_splits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fits_unchanged() {
        let split = split_text("short text", 80, 0.7);
        assert_eq!(split.pieces, vec!["short text"]);
        assert_eq!(split.hard_splits, 0);
    }

    #[test]
    fn test_empty_text() {
        let split = split_text("", 10, 0.7);
        assert_eq!(split.pieces, vec![""]);
    }

    #[test]
    fn test_prefers_last_whitespace_past_threshold() {
        // Whitespace at index 60 and 70, budget 80: last one (70) wins
        let mut text = "a".repeat(60);
        text.push(' ');
        text.push_str(&"b".repeat(9));
        text.push(' ');
        text.push_str(&"c".repeat(29));
        assert_eq!(text.len(), 100);

        let split = split_text(&text, 80, 0.7);
        assert_eq!(split.pieces.len(), 2);
        assert_eq!(split.pieces[0].len(), 71);
        assert!(split.pieces[0].ends_with(' '));
        assert_eq!(split.hard_splits, 0);
        assert_eq!(split.pieces.concat(), text);
    }

    #[test]
    fn test_whitespace_exactly_at_threshold() {
        // 70% of 80 is 56: whitespace at index 56 qualifies
        let mut text = "a".repeat(56);
        text.push(' ');
        text.push_str(&"b".repeat(43));

        let split = split_text(&text, 80, 0.7);
        assert_eq!(split.pieces[0].len(), 57);
        assert_eq!(split.hard_splits, 0);
    }

    #[test]
    fn test_whitespace_before_threshold_hard_splits() {
        // Only whitespace at index 55, just below 56
        let mut text = "a".repeat(55);
        text.push(' ');
        text.push_str(&"b".repeat(44));

        let split = split_text(&text, 80, 0.7);
        assert_eq!(split.pieces[0].len(), 80);
        assert_eq!(split.pieces[1].len(), 20);
        assert_eq!(split.hard_splits, 1);
    }

    #[test]
    fn test_no_whitespace_hard_splits_at_budget() {
        let text = "x".repeat(250);
        let split = split_text(&text, 100, 0.7);
        assert_eq!(
            split.pieces.iter().map(String::len).collect::<Vec<_>>(),
            vec![100, 100, 50]
        );
        assert_eq!(split.hard_splits, 2);
    }

    #[test]
    fn test_tabs_and_newlines_are_boundaries() {
        let text = format!("{}\n{}\t{}", "a".repeat(8), "b".repeat(3), "c".repeat(5));
        let split = split_text(&text, 13, 0.5);
        assert_eq!(split.pieces[0], format!("{}\n{}\t", "a".repeat(8), "b".repeat(3)));
        assert_eq!(split.pieces.concat(), text);
    }

    #[test]
    fn test_escaped_width_respected() {
        let text = "&".repeat(10);
        let split = split_text(&text, 12, 0.7);
        // Each '&' serializes to 5 chars, so two fit per piece
        assert!(split.pieces.iter().all(|p| text_width(p) <= 12));
        assert_eq!(split.pieces.len(), 5);
        assert_eq!(split.pieces.concat(), text);
    }

    #[test]
    fn test_progress_when_char_wider_than_budget() {
        let split = split_text("<<", 2, 0.7);
        assert_eq!(split.pieces, vec!["<", "<"]);
        assert_eq!(split.hard_splits, 2);
    }

    #[test]
    fn test_multibyte_characters() {
        let text = "é".repeat(30);
        let split = split_text(&text, 10, 0.7);
        assert_eq!(split.pieces.len(), 3);
        assert!(split.pieces.iter().all(|p| p.chars().count() == 10));
    }
}
