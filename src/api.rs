//! # One-Call Entry Points
//!
//! Parse and render a chord sheet body in a single call. [`render_song`]
//! never fails: a parse failure aborts the whole document and comes back as
//! an error message alongside an empty line list, which is what a display
//! layer needs to show "could not render" instead of a half-drawn song.

use crate::config::RenderOptions;
use crate::error::ChordProError;
use crate::parser::parse;
use crate::render::{render_with, RenderedLine};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RenderOutcome {
    pub lines: Vec<RenderedLine>,
    /// User-facing message when the body could not be parsed
    pub error: Option<String>,
}

impl RenderOutcome {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Parse and render, keeping the error.
///
/// # Errors
/// [`ChordProError::EmptyInput`] for an empty or whitespace-only body, or
/// the parse error for malformed notation.
pub fn try_render_song(
    text: &str,
    options: &RenderOptions,
) -> Result<Vec<RenderedLine>, ChordProError> {
    if text.trim().is_empty() {
        return Err(ChordProError::EmptyInput);
    }
    let song = parse(text)?;
    Ok(render_with(&song, options).collect())
}

/// Parse and render, folding any error into the outcome.
///
/// # Example
/// ```
/// use chordsheet::api::render_song;
/// use chordsheet::RenderOptions;
///
/// let outcome = render_song("[C]la [G]la", &RenderOptions::with_transpose(2));
/// assert!(!outcome.is_error());
/// assert_eq!(outcome.lines[0].items[1].chord_text, "A");
///
/// let outcome = render_song("[C la", &RenderOptions::default());
/// assert!(outcome.is_error());
/// assert!(outcome.lines.is_empty());
/// ```
pub fn render_song(text: &str, options: &RenderOptions) -> RenderOutcome {
    match try_render_song(text, options) {
        Ok(lines) => RenderOutcome { lines, error: None },
        Err(e) => {
            log::debug!("Render failed: {}", e);
            RenderOutcome {
                lines: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_an_error() {
        for text in ["", "   ", "\n\n"] {
            let outcome = render_song(text, &RenderOptions::default());
            assert!(outcome.is_error());
            assert_eq!(outcome.error.as_deref(), Some("Invalid chord sheet input"));
        }
    }

    #[test]
    fn test_parse_failure_reports_offending_line() {
        let text = "{title: Ok}\n[C]fine\n{broken\n[G]fine";
        let err = try_render_song(text, &RenderOptions::default()).unwrap_err();
        assert_eq!(err.line(), Some(3));

        let outcome = render_song(text, &RenderOptions::default());
        assert!(outcome.is_error());
        assert!(outcome.lines.is_empty());
        assert!(outcome.error.unwrap().contains("line 3"));
    }

    #[test]
    fn test_bad_chord_does_not_abort() {
        let outcome = render_song("[X9]odd [C]fine", &RenderOptions::with_transpose(1));
        assert!(!outcome.is_error());
        let chords: Vec<&str> = outcome.lines[0]
            .items
            .iter()
            .map(|i| i.chord_text.as_str())
            .collect();
        assert_eq!(chords, vec!["X9", "C#"]);
    }

    #[test]
    fn test_options_are_applied() {
        let options = RenderOptions {
            transpose: -1,
            current_line: Some(0),
            ..RenderOptions::default()
        };
        let outcome = render_song("[D]la", &options);
        assert_eq!(outcome.lines[0].items[0].chord_text, "C#");
        assert!(outcome.lines[0].is_current);
    }
}
