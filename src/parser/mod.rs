//! # Parser Module
//!
//! This module turns the lexer's token stream into a [`Song`].
//!
//! ## Line Shapes
//! Every physical line becomes exactly one [`Line`]:
//!
//! | Source                     | Items                                        |
//! |----------------------------|----------------------------------------------|
//! | *(empty)*                  | none                                         |
//! | `# note`                   | `Comment`                                    |
//! | `{name}` / `{name: value}` | one `Directive`                              |
//! | `[C]la {c: softly}`        | `ChordLyric` pairs and `Directive`s in order |
//! | `[Verse 1]`, `[SOLO: Am]`  | one `Annotation` (section header)            |
//! | `[C]Hello [G]world`        | `ChordLyric` pairs                           |
//!
//! Section headers are bracketed lines whose first word is verse, chorus,
//! bridge, intro, outro, pre-chorus, solo or music (any case, optionally
//! numbered as in `Verse2`). They win over chord parsing, so `[Chorus]` is
//! never read as a C chord, while `[Musical]` is not a header.
//!
//! Several directives may share a line (`{title: A} {artist: B}`); each keeps
//! its own item.
//!
//! ## Section Tracking
//! `start_of_X` / `end_of_X` directives tag the lines between them with
//! [`SectionType`]. The start line carries the opened section, the end line
//! the section it closes.
//!
//! ## Error Recovery
//! [`parse`] first parses the whole text. If that fails it re-parses each
//! line on its own, and reports the first line that fails alone as a
//! [`ChordProError::LineError`] naming that line's raw text.
//!
//! ## Example
//! ```rust
//! use chordsheet::{parse, Item};
//!
//! let song = parse("{title: Test}\n[C]Hello [G]world").unwrap();
//! assert_eq!(song.lines.len(), 2);
//! assert_eq!(song.lines[1].items, vec![
//!     Item::chord_lyric("C", "Hello "),
//!     Item::chord_lyric("G", "world"),
//! ]);
//! ```

use crate::ast::{Item, Line, Song};
use crate::directive::{canonical_name, section_boundary, SectionBoundary, SectionType};
use crate::error::ChordProError;
use crate::lexer::{Lexer, LocatedToken, Token};
use regex::Regex;
use std::sync::LazyLock;

static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(verse|chorus|bridge|intro|outro|pre-chorus|pre chorus|solo|music)(\b|\d)")
        .unwrap()
});

/// Whether a bracket body names a section rather than a chord.
pub fn is_section_header(body: &str) -> bool {
    SECTION_HEADER.is_match(body.trim())
}

/// Parser for chord sheet tokens
pub struct Parser {
    tokens: Vec<LocatedToken>,
    position: usize,
    line_number: usize,
    current_section: SectionType,
}

impl Parser {
    pub fn new(tokens: Vec<LocatedToken>) -> Self {
        Self {
            tokens,
            position: 0,
            line_number: 1,
            current_section: SectionType::None,
        }
    }

    fn current(&self) -> Option<&LocatedToken> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&LocatedToken> {
        let token = self.tokens.get(self.position);
        self.position += 1;
        token
    }

    /// Take the tokens of the current physical line, consuming its newline.
    fn next_line_tokens(&mut self) -> Vec<LocatedToken> {
        let mut line = Vec::new();
        while let Some(t) = self.advance() {
            if t.token == Token::Newline {
                break;
            }
            line.push(t.clone());
        }
        line
    }

    pub fn parse_song(&mut self) -> Result<Song, ChordProError> {
        let mut lines = Vec::new();

        // A final newline terminates the last line rather than starting a new one
        while self.current().is_some() {
            let tokens = self.next_line_tokens();
            lines.push(self.parse_line(tokens)?);
            self.line_number += 1;
        }

        Ok(Song::new(lines))
    }

    fn parse_line(&mut self, tokens: Vec<LocatedToken>) -> Result<Line, ChordProError> {
        let number = self.line_number;

        // Whitespace-only text around a directive or header does not count
        let significant: Vec<&LocatedToken> = tokens
            .iter()
            .filter(|t| !matches!(&t.token, Token::Text(text) if text.trim().is_empty()))
            .collect();

        if let [only] = significant.as_slice() {
            match &only.token {
                Token::Comment(text) => {
                    let item = Item::Comment {
                        text: text.trim().to_string(),
                    };
                    return Ok(Line::new(number, self.current_section, vec![item]));
                }
                Token::Directive(body) => {
                    let (item, section) = self.directive_item(number, only, body)?;
                    return Ok(Line::new(number, section, vec![item]));
                }
                Token::Chord(body) if is_section_header(body) => {
                    let item = Item::Annotation {
                        text: body.trim().to_string(),
                    };
                    return Ok(Line::new(number, self.current_section, vec![item]));
                }
                _ => {}
            }
        }

        if !significant
            .iter()
            .any(|t| matches!(t.token, Token::Directive(_)))
        {
            return Ok(Line::new(number, self.current_section, chord_lyric_items(&tokens)));
        }

        // Directives sharing a line keep their place among the chord-lyric pairs
        let mut section = self.current_section;
        let mut items = Vec::new();
        let mut segment: Vec<LocatedToken> = Vec::new();

        for token in tokens {
            if let Token::Directive(body) = &token.token {
                items.extend(segment_items(&segment));
                segment.clear();
                let (item, directive_section) = self.directive_item(number, &token, body)?;
                section = directive_section;
                items.push(item);
                continue;
            }
            segment.push(token);
        }
        items.extend(segment_items(&segment));

        Ok(Line::new(number, section, items))
    }

    /// Build a directive item and the section its line belongs to.
    fn directive_item(
        &mut self,
        number: usize,
        token: &LocatedToken,
        body: &str,
    ) -> Result<(Item, SectionType), ChordProError> {
        let (raw_name, value) = match body.split_once(':') {
            Some((name, value)) => {
                let value = value.trim();
                (name.trim(), (!value.is_empty()).then_some(value))
            }
            None => (body.trim(), None),
        };

        if raw_name.is_empty() {
            return Err(ChordProError::ParseError {
                line: token.line,
                column: token.column,
                message: "Directive without a name".to_string(),
            });
        }

        let name = canonical_name(raw_name);
        let section = match section_boundary(&name) {
            Some(SectionBoundary::Start(section)) => {
                if self.current_section != SectionType::None {
                    log::debug!(
                        "Line {}: {} opens while {:?} is still open",
                        number,
                        name,
                        self.current_section
                    );
                }
                self.current_section = section;
                section
            }
            Some(SectionBoundary::End(section)) => {
                let closing = self.current_section;
                if closing == section {
                    self.current_section = SectionType::None;
                } else {
                    log::debug!("Line {}: {} does not match open {:?}", number, name, closing);
                }
                closing
            }
            None => self.current_section,
        };

        Ok((Item::directive(&name, raw_name, value), section))
    }
}

/// Pair each chord with the lyric text that follows it on the line.
fn chord_lyric_items(tokens: &[LocatedToken]) -> Vec<Item> {
    let mut items: Vec<Item> = Vec::new();

    for t in tokens {
        match &t.token {
            Token::Chord(chord) => items.push(Item::chord_lyric(chord.trim(), "")),
            Token::Text(text) => match items.last_mut() {
                Some(Item::ChordLyric { lyrics, .. }) => lyrics.push_str(text),
                _ => items.push(Item::chord_lyric("", text)),
            },
            // Comments only start a line; directives are split out by the caller
            _ => {}
        }
    }

    items
}

/// Chord-lyric pairs around inline directives, minus the bare spacing between them.
fn segment_items(tokens: &[LocatedToken]) -> impl Iterator<Item = Item> {
    chord_lyric_items(tokens)
        .into_iter()
        .filter(Item::is_renderable)
}

fn parse_document(source: &str) -> Result<Song, ChordProError> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(tokens);
    parser.parse_song()
}

/// Re-parse line by line to find the first line that fails on its own.
fn isolate_failure(source: &str, error: ChordProError) -> ChordProError {
    log::debug!("Whole-text parse failed ({}), scanning line by line", error);

    for (index, raw) in source.lines().enumerate() {
        if let Err(line_error) = parse_document(raw) {
            let message = match line_error {
                ChordProError::ParseError { message, .. } => message,
                other => other.to_string(),
            };
            return ChordProError::LineError {
                line: index + 1,
                text: raw.to_string(),
                message,
            };
        }
    }

    error
}

/// Parse a chord sheet into a [`Song`].
///
/// # Errors
/// Returns [`ChordProError::LineError`] naming the offending line when a
/// bracket or brace is unbalanced, nested, or a directive shares its line
/// with other content. Falls back to [`ChordProError::ParseError`] if no
/// single line can be blamed.
pub fn parse(source: &str) -> Result<Song, ChordProError> {
    parse_document(source).map_err(|error| isolate_failure(source, error))
}
