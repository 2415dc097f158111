//! # Error Types
//!
//! This module defines all error types for the chord sheet parser and renderer.
//!
//! Parse errors carry location information (line/column, or the raw text of the
//! offending line once the recovery scan has isolated it) so the caller can show
//! a useful diagnostic instead of a bare failure.
//!
//! ## Error Types
//! - `ParseError` - Tokenizer errors with line and column information
//! - `LineError` - A parse failure isolated to one physical line
//! - `MalformedChordToken` - A chord token that does not match the chord grammar
//! - `EmptyInput` - Nothing to render
//! - `ConfigError` - Invalid render configuration
//!
//! ## Usage
//! ```rust
//! use chordsheet::{parse, ChordProError};
//!
//! match parse("[C]Hello {broken") {
//!     Ok(song) => println!("{} lines", song.lines.len()),
//!     Err(ChordProError::LineError { line, text, message }) => {
//!         eprintln!("line {}: {} ({})", line, message, text);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChordProError {
    /// Parse error with location information.
    ///
    /// Produced by the whole-text tokenizer when a bracket or brace is left
    /// open, closed without being opened, or nested.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChordProError;
    /// let err = ChordProError::ParseError {
    ///     line: 3,
    ///     column: 7,
    ///     message: "Unterminated chord '['".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Parse error at line 3, column 7: Unterminated chord '['");
    /// ```
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Parse error localized to a single line by the line-by-line scan.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChordProError;
    /// let err = ChordProError::LineError {
    ///     line: 2,
    ///     text: "{title: Oops".to_string(),
    ///     message: "Unterminated directive '{'".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Parse error at line 2 (\"{title: Oops\"): Unterminated directive '{'"
    /// );
    /// ```
    #[error("Parse error at line {line} ({text:?}): {message}")]
    LineError {
        line: usize,
        text: String,
        message: String,
    },

    /// A chord token that is not `<A-G><#|b>?<quality>[/<bass>]`.
    ///
    /// Never fatal during rendering: the token is shown as written.
    #[error("Malformed chord token: {0:?}")]
    MalformedChordToken(String),

    #[error("Invalid chord sheet input")]
    EmptyInput,

    #[error("Invalid render config: {0}")]
    ConfigError(String),
}

impl ChordProError {
    /// Line number (1-indexed) the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ChordProError::ParseError { line, .. } | ChordProError::LineError { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }
}
