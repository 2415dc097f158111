//! # Section-State Renderer
//!
//! Walks a parsed [`Song`] and yields display-ready [`RenderedLine`] records.
//! The renderer only decides *what* is shown and *where chords sit relative to
//! lyrics*; turning that into pixels or markup is up to the caller.
//!
//! ## Block State
//! A single [`BlockState`] is carried across the walk:
//!
//! | From        | Directive kind    | To          |
//! |-------------|-------------------|-------------|
//! | any         | ChordOnlyStart    | ChordOnly   |
//! | any         | LyricChordStart   | LyricChord  |
//! | ChordOnly   | ChordOnlyEnd      | Normal      |
//! | LyricChord  | LyricChordEnd     | Normal      |
//! | otherwise   | anything          | unchanged   |
//!
//! Opening a block while another is open replaces it; an end directive for
//! the wrong kind of block is ignored. Both are logged as warnings.
//!
//! ## Line Output
//! - Every directive on a line updates the block state. On a line of only
//!   directives, the first one decides the output: comment directives with
//!   text become `Comment` lines, other directives with a value become
//!   `SectionHeader` lines, and metadata directives (title, key, ...) produce
//!   nothing. A valueless directive gives an empty `Content` spacer row while
//!   a block is open after it, and nothing otherwise.
//! - `[Verse 1]`-style annotations become `SectionHeader` lines; chords after
//!   a `:` in the header are transposed.
//! - `#` comments become `Comment` lines.
//! - Anything else is a `Content` line when it has a chord or visible lyric,
//!   or when a block is open (so chord-only rows and spacers are kept).
//!
//! ## Example
//! ```rust
//! use chordsheet::{parse, render};
//!
//! let song = parse("{start_of_solo}\n[Dm] [Am] [G]\n{end_of_solo}").unwrap();
//! let lines: Vec<_> = render(&song, 2).collect();
//! // {start_of_solo} leaves a spacer row, {end_of_solo} closes the block
//! assert_eq!(lines.len(), 2);
//! assert!(lines[0].items.is_empty());
//! let chords: Vec<&str> = lines[1].items.iter().map(|i| i.chord_text.as_str()).collect();
//! assert_eq!(chords, vec!["Em", "Bm", "A"]);
//! ```

use crate::ast::{Item, Line, Song};
use crate::config::{Layout, RenderOptions};
use crate::directive::{classify, is_comment, is_metadata, DirectiveKind, SectionType};
use crate::transpose::{transpose, transpose_text};
use serde::Serialize;
use std::iter::Enumerate;
use std::slice::Iter;

/// Which kind of block the walk is currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockState {
    #[default]
    Normal,
    /// Intro, solo, music: chords with no lyric baseline
    ChordOnly,
    /// Pre-chorus, bridge: lyrics with chords above
    LyricChord,
}

impl BlockState {
    pub fn transition(self, kind: DirectiveKind) -> BlockState {
        match (self, kind) {
            (_, DirectiveKind::ChordOnlyStart) => BlockState::ChordOnly,
            (_, DirectiveKind::LyricChordStart) => BlockState::LyricChord,
            (BlockState::ChordOnly, DirectiveKind::ChordOnlyEnd) => BlockState::Normal,
            (BlockState::LyricChord, DirectiveKind::LyricChordEnd) => BlockState::Normal,
            (state, _) => state,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderedLineKind {
    Content,
    SectionHeader,
    Comment,
}

/// Chord placement relative to its lyric segment, in em
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChordPosition {
    pub left: f32,
    pub top: f32,
    pub margin_top: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedItem {
    /// Lyric segment; a single space when the source had none
    pub lyric_text: String,
    /// Transposed chord, or empty
    pub chord_text: String,
    pub is_annotation_header: bool,
    /// None for header and comment items
    pub position: Option<ChordPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedLine {
    /// Index of the source line in `Song::lines`
    pub line_index: usize,
    pub kind: RenderedLineKind,
    pub section: SectionType,
    /// Header label or comment text
    pub section_label: Option<String>,
    pub is_current: bool,
    pub items: Vec<RenderedItem>,
}

/// Lazy walk over a song. Create a new one to render again from the start.
pub struct Renderer<'a> {
    lines: Enumerate<Iter<'a, Line>>,
    state: BlockState,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(song: &'a Song, options: RenderOptions) -> Self {
        Self {
            lines: song.lines.iter().enumerate(),
            state: BlockState::Normal,
            options,
        }
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    fn apply_directive(&mut self, line: &Line, name: &str) {
        let kind = classify(name);
        let next = self.state.transition(kind);

        match kind {
            DirectiveKind::ChordOnlyStart | DirectiveKind::LyricChordStart
                if self.state != BlockState::Normal =>
            {
                log::warn!(
                    "Line {}: {} opens a new block while {:?} is open; closing it",
                    line.number,
                    name,
                    self.state
                );
            }
            DirectiveKind::ChordOnlyEnd | DirectiveKind::LyricChordEnd if next == self.state => {
                log::warn!(
                    "Line {}: {} does not close the current {:?} block; ignored",
                    line.number,
                    name,
                    self.state
                );
            }
            _ => {}
        }

        log::trace!("Line {}: {:?} -> {:?}", line.number, self.state, next);
        self.state = next;
    }

    fn label_line(
        &self,
        index: usize,
        line: &Line,
        kind: RenderedLineKind,
        label: String,
    ) -> RenderedLine {
        RenderedLine {
            line_index: index,
            kind,
            section: line.section,
            section_label: Some(label.clone()),
            is_current: self.options.current_line == Some(index),
            items: vec![RenderedItem {
                lyric_text: label,
                chord_text: String::new(),
                is_annotation_header: true,
                position: None,
            }],
        }
    }

    fn content_line(&self, index: usize, line: &Line) -> RenderedLine {
        let items = line
            .items
            .iter()
            .filter_map(|item| match item {
                Item::ChordLyric { chords, lyrics } => Some(self.content_item(chords, lyrics)),
                _ => None,
            })
            .collect();

        RenderedLine {
            line_index: index,
            kind: RenderedLineKind::Content,
            section: line.section,
            section_label: None,
            is_current: self.options.current_line == Some(index),
            items,
        }
    }

    fn content_item(&self, chords: &str, lyrics: &str) -> RenderedItem {
        let chord_text = if chords.is_empty() {
            String::new()
        } else {
            transpose(chords, self.options.transpose)
        };
        let lyric_text = if lyrics.is_empty() {
            " ".to_string()
        } else {
            lyrics.to_string()
        };

        RenderedItem {
            position: Some(chord_position(&self.options.layout, self.state, lyrics)),
            lyric_text,
            chord_text,
            is_annotation_header: false,
        }
    }

    fn render_line(&mut self, index: usize, line: &Line) -> Option<RenderedLine> {
        for item in &line.items {
            if let Item::Directive { name, .. } = item {
                self.apply_directive(line, name);
            }
        }

        match line.first_item() {
            Some(Item::Directive { name, value, .. }) if !line.has_renderable_items() => {
                match value.as_deref() {
                    _ if is_metadata(name) => None,
                    Some(text) if is_comment(name) => Some(self.label_line(
                        index,
                        line,
                        RenderedLineKind::Comment,
                        text.to_string(),
                    )),
                    Some(label) => Some(self.label_line(
                        index,
                        line,
                        RenderedLineKind::SectionHeader,
                        label.to_string(),
                    )),
                    // spacer row inside an open block
                    None if self.state != BlockState::Normal => {
                        Some(self.content_line(index, line))
                    }
                    None => None,
                }
            }
            Some(Item::Annotation { text }) => {
                let label = header_label(text, self.options.transpose);
                Some(self.label_line(index, line, RenderedLineKind::SectionHeader, label))
            }
            Some(Item::Comment { text }) => {
                Some(self.label_line(index, line, RenderedLineKind::Comment, text.clone()))
            }
            _ if line.has_renderable_items() || self.state != BlockState::Normal => {
                Some(self.content_line(index, line))
            }
            _ => None,
        }
    }
}

impl Iterator for Renderer<'_> {
    type Item = RenderedLine;

    fn next(&mut self) -> Option<RenderedLine> {
        while let Some((index, line)) = self.lines.next() {
            if let Some(rendered) = self.render_line(index, line) {
                return Some(rendered);
            }
        }
        None
    }
}

/// Chords shift right with the length of their lyric segment; inside
/// chord-only blocks there is no baseline, so chords drop to a fixed spot.
pub fn chord_position(layout: &Layout, state: BlockState, lyrics: &str) -> ChordPosition {
    match state {
        BlockState::ChordOnly => ChordPosition {
            left: layout.chord_only_left,
            top: layout.chord_only_top,
            margin_top: layout.chord_only_margin,
        },
        BlockState::Normal | BlockState::LyricChord => ChordPosition {
            left: lyrics.chars().count() as f32 * layout.chord_step,
            top: layout.chord_top,
            margin_top: layout.lyric_margin,
        },
    }
}

/// `SOLO: Am G` keeps its name and transposes what follows the colon.
fn header_label(text: &str, semitones: i32) -> String {
    match text.split_once(':') {
        Some((name, chords)) => format!("{}:{}", name, transpose_text(chords, semitones)),
        None => text.to_string(),
    }
}

/// Render a song at the given transposition.
pub fn render(song: &Song, transpose: i32) -> Renderer<'_> {
    Renderer::new(song, RenderOptions::with_transpose(transpose))
}

pub fn render_with<'a>(song: &'a Song, options: &RenderOptions) -> Renderer<'a> {
    Renderer::new(song, options.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn rendered(source: &str, transpose: i32) -> Vec<RenderedLine> {
        let song = parse(source).unwrap();
        render(&song, transpose).collect()
    }

    fn chord_texts(line: &RenderedLine) -> Vec<&str> {
        line.items.iter().map(|i| i.chord_text.as_str()).collect()
    }

    #[test]
    fn test_transition_table() {
        let s = BlockState::Normal;
        assert_eq!(s.transition(DirectiveKind::ChordOnlyStart), BlockState::ChordOnly);
        assert_eq!(s.transition(DirectiveKind::LyricChordStart), BlockState::LyricChord);
        assert_eq!(s.transition(DirectiveKind::ChordOnlyEnd), BlockState::Normal);
        assert_eq!(s.transition(DirectiveKind::Other), BlockState::Normal);

        let c = BlockState::ChordOnly;
        assert_eq!(c.transition(DirectiveKind::ChordOnlyEnd), BlockState::Normal);
        assert_eq!(c.transition(DirectiveKind::LyricChordEnd), BlockState::ChordOnly);
        assert_eq!(c.transition(DirectiveKind::LyricChordStart), BlockState::LyricChord);

        let l = BlockState::LyricChord;
        assert_eq!(l.transition(DirectiveKind::LyricChordEnd), BlockState::Normal);
        assert_eq!(l.transition(DirectiveKind::ChordOnlyEnd), BlockState::LyricChord);
        assert_eq!(l.transition(DirectiveKind::Other), BlockState::LyricChord);
    }

    #[test]
    fn test_content_line_transposed() {
        let lines = rendered("{title: Test}\n[C]Hello [G]world", 2);
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.kind, RenderedLineKind::Content);
        assert_eq!(line.line_index, 1);
        assert_eq!(chord_texts(line), vec!["D", "A"]);
        assert_eq!(line.items[0].lyric_text, "Hello ");
        assert_eq!(line.items[1].lyric_text, "world");
    }

    #[test]
    fn test_chord_only_block_renders_and_positions_low() {
        let lines = rendered("{start_of_solo}\n[Dm] [Am] [G]\n{end_of_solo}", 0);
        assert_eq!(lines.len(), 2);
        let position = lines[1].items[0].position.unwrap();
        assert_eq!(position.top, -0.3);
        assert_eq!(position.left, -0.8);
        assert_eq!(position.margin_top, 0.5);
    }

    #[test]
    fn test_empty_line_kept_inside_block() {
        let lines = rendered("{soi}\n[C]\n\n[G]\n{eoi}\n\n[D]x", 0);
        let indices: Vec<usize> = lines.iter().map(|l| l.line_index).collect();
        // the blank line inside the intro stays, the one after it does not
        assert_eq!(indices, vec![0, 1, 2, 3, 6]);
        assert!(lines[2].items.is_empty());
    }

    #[test]
    fn test_normal_position_grows_with_lyric() {
        let lines = rendered("[C]a [G]longer words", 0);
        let short = lines[0].items[0].position.unwrap();
        let long = lines[0].items[1].position.unwrap();
        assert!(long.left > short.left);
        assert_eq!(short.top, -1.5);
        assert_eq!(short.margin_top, 1.5);
    }

    #[test]
    fn test_lyric_chord_block_uses_normal_offsets() {
        let lines = rendered("{sop}\n[E]rising [F#]up\n{eop}", 0);
        let position = lines[1].items[0].position.unwrap();
        assert_eq!(position.top, -1.5);
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let lines = rendered("[C][G]la", 0);
        assert_eq!(lines[0].items[0].lyric_text, " ");
        let lines = rendered("just lyrics", 5);
        assert_eq!(lines[0].items[0].chord_text, "");
    }

    #[test]
    fn test_malformed_chord_passes_through() {
        let lines = rendered("[H7]odd [N.C.]stop [Am]fine", 3);
        assert_eq!(chord_texts(&lines[0]), vec!["H7", "N.C.", "Cm"]);
    }

    #[test]
    fn test_comment_line() {
        let lines = rendered("# note\n[C]la", 0);
        assert_eq!(lines[0].kind, RenderedLineKind::Comment);
        assert_eq!(lines[0].section_label.as_deref(), Some("note"));
        assert!(lines[0].items.iter().all(|i| i.is_annotation_header));
        assert!(lines[0].items.iter().all(|i| i.chord_text.is_empty()));
    }

    #[test]
    fn test_comment_directive() {
        let lines = rendered("{c: Softly}", 0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, RenderedLineKind::Comment);
        assert_eq!(lines[0].section_label.as_deref(), Some("Softly"));
    }

    #[test]
    fn test_directive_with_value_is_header() {
        let lines = rendered("{start_of_verse: Verse 1}\n[C]la\n{end_of_verse}", 0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].kind, RenderedLineKind::SectionHeader);
        assert_eq!(lines[0].section_label.as_deref(), Some("Verse 1"));
        assert_eq!(lines[0].section, SectionType::Verse);
        assert_eq!(lines[1].section, SectionType::Verse);
    }

    #[test]
    fn test_metadata_directives_not_rendered() {
        let lines = rendered("{title: T}\n{artist: A}\n{key: G}\n{start_of_chorus}", 0);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_annotation_header_transposes_chords() {
        let lines = rendered("[Verse 1]\n[SOLO: Am - G - C]", 2);
        assert_eq!(lines[0].section_label.as_deref(), Some("Verse 1"));
        assert_eq!(lines[1].section_label.as_deref(), Some("SOLO: Bm - A - D"));
        assert_eq!(lines[1].kind, RenderedLineKind::SectionHeader);
    }

    #[test]
    fn test_block_start_leaves_spacer_row() {
        let lines = rendered("{sos}\n[Dm] [Am]\n{eos}\n[C]la", 0);
        let indices: Vec<usize> = lines.iter().map(|l| l.line_index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
        assert_eq!(lines[0].kind, RenderedLineKind::Content);
        assert!(lines[0].items.is_empty());
    }

    #[test]
    fn test_valueless_directive_inside_block_is_spacer() {
        let lines = rendered("{sob}\n{start_of_chorus}\n[C]la\n{eob}", 0);
        let indices: Vec<usize> = lines.iter().map(|l| l.line_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(lines[1].items.is_empty());
    }

    #[test]
    fn test_metadata_inside_block_not_rendered() {
        let lines = rendered("{sos}\n{key: G}\n[G]\n{eos}", 0);
        let indices: Vec<usize> = lines.iter().map(|l| l.line_index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_inline_directive_updates_block_state() {
        let song = parse("[C]la {sos}\n[Dm]").unwrap();
        let lines: Vec<RenderedLine> = render(&song, 0).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].items[0].chord_text, "C");
        assert_eq!(lines[1].items[0].position.unwrap().top, -0.3);
    }

    #[test]
    fn test_nested_block_replaces_previous() {
        let song = parse("{sos}\n{sob}\n[C]words\n{eos}\n[D]after\n{eob}").unwrap();
        let mut renderer = render(&song, 0);
        assert_eq!(renderer.next().unwrap().line_index, 0);
        assert_eq!(renderer.state(), BlockState::ChordOnly);
        assert_eq!(renderer.next().unwrap().line_index, 1);
        assert_eq!(renderer.state(), BlockState::LyricChord);
        let words = renderer.next().unwrap();
        assert_eq!(words.items[0].position.unwrap().top, -1.5);
        // end_of_solo does not close the bridge, so its line is a spacer
        assert_eq!(renderer.next().unwrap().line_index, 3);
        assert_eq!(renderer.state(), BlockState::LyricChord);
        assert_eq!(renderer.next().unwrap().line_index, 4);
        assert!(renderer.next().is_none());
        assert_eq!(renderer.state(), BlockState::Normal);
    }

    #[test]
    fn test_current_line_flag() {
        let song = parse("[C]one\n[G]two").unwrap();
        let options = RenderOptions {
            current_line: Some(1),
            ..RenderOptions::default()
        };
        let lines: Vec<RenderedLine> = render_with(&song, &options).collect();
        assert!(!lines[0].is_current);
        assert!(lines[1].is_current);
    }

    #[test]
    fn test_render_is_restartable_and_deterministic() {
        let song = parse("{sos}\n[Dm] [Am]\n{eos}\n[C]Hello [G]world\n# end").unwrap();
        let first: Vec<RenderedLine> = render(&song, -3).collect();
        let second: Vec<RenderedLine> = render(&song, -3).collect();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
