//! # Transposition
//!
//! Semitone shifting for chord tokens as they appear in a chord sheet.
//!
//! - [`transpose`] - one chord token (`"Am"`, `"C/G"`, `"Bbmaj7"`)
//! - [`transpose_text`] - chord-like words inside free text, used for section
//!   headers such as `[SOLO: Am - G - C]`
//!
//! Malformed tokens are never an error here: they come back exactly as written.

use crate::chord::Chord;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Transpose a single chord token by `semitones` (any integer, negative is down).
///
/// The result is always spelled with sharps, so flat roots normalize even at
/// zero transposition. Tokens that do not parse as a chord are returned unchanged.
///
/// # Examples
/// ```
/// use chordsheet::transpose;
///
/// assert_eq!(transpose("Am", 3), "Cm");
/// assert_eq!(transpose("G", -2), "F");
/// assert_eq!(transpose("Db", 0), "C#");
/// assert_eq!(transpose("C/G", 2), "D/A");
/// assert_eq!(transpose("N.C.", 5), "N.C.");
/// ```
pub fn transpose(token: &str, semitones: i32) -> String {
    match token.parse::<Chord>() {
        Ok(chord) => chord.transpose(semitones).to_string(),
        Err(e) => {
            log::debug!("{}; leaving it as written", e);
            token.to_string()
        }
    }
}

const CHORD_WORD: &str = r"[A-G][#b]?(?:m|maj|dim|aug|sus|add)?[0-9]*";

// Dash-joined runs with a trailing dash, e.g. "D#m-C#-"
static COMPOUND_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b{CHORD_WORD}(?:-{CHORD_WORD})*-")).unwrap());

// A lone chord word followed by whitespace, a slash, or the end of the text
static SINGLE_CHORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b({CHORD_WORD})(\s|/|$)")).unwrap());

/// Transpose every chord-like word in a piece of free text.
///
/// Two passes: first dash-joined runs (`C-G-Am-`), then single words that
/// are followed by whitespace, `/`, or the end of the text. Anything else
/// (including words that merely start with A-G) is left alone.
///
/// # Example
/// ```
/// use chordsheet::transpose_text;
///
/// assert_eq!(transpose_text("SOLO: Am - G - C", 2), "SOLO: Bm - A - D");
/// assert_eq!(transpose_text("Em-D-C-", 1), "Fm-D#-C#-");
/// ```
pub fn transpose_text(text: &str, semitones: i32) -> String {
    let text = COMPOUND_RUN.replace_all(text, |caps: &Captures| {
        let run = caps[0]
            .split('-')
            .filter(|part| !part.is_empty())
            .map(|part| transpose(part, semitones))
            .collect::<Vec<_>>()
            .join("-");
        format!("{run}-")
    });

    SINGLE_CHORD
        .replace_all(&text, |caps: &Captures| {
            format!("{}{}", transpose(&caps[1], semitones), &caps[2])
        })
        .into_owned()
}
