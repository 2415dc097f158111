//! # Directive Classifier
//!
//! Directives are the `{name}` / `{name: value}` lines of a chord sheet.
//! This module knows three things about a directive name:
//!
//! 1. Its canonical long form (`soc` -> `start_of_chorus`, `c` -> `comment`)
//! 2. How it drives the renderer's block state ([`DirectiveKind`])
//! 3. Which section it opens or closes for line tagging ([`SectionType`])
//!
//! ## Block Directives
//!
//! | Kind             | Names                                                        |
//! |------------------|--------------------------------------------------------------|
//! | ChordOnlyStart   | start_of_intro soi start_of_solo sos start_of_music som      |
//! | ChordOnlyEnd     | end_of_intro eoi end_of_solo eos end_of_music eom            |
//! | LyricChordStart  | start_of_pre sop start_of_bridge sob                         |
//! | LyricChordEnd    | end_of_pre eop end_of_bridge eob                             |
//!
//! Everything else (title, comment, start_of_chorus, unknown names) is
//! [`DirectiveKind::Other`] and never touches the block state.

use serde::Serialize;

/// Role of a directive in the renderer's block state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Opens a block of chords without lyrics (intro, solo, music)
    ChordOnlyStart,
    ChordOnlyEnd,
    /// Opens a block of lyrics with chords above them (pre-chorus, bridge)
    LyricChordStart,
    LyricChordEnd,
    /// Anything that does not open or close a block
    Other,
}

/// Classify a directive name (short or long form, lowercase).
pub fn classify(name: &str) -> DirectiveKind {
    match name {
        "start_of_intro" | "soi" | "start_of_solo" | "sos" | "start_of_music" | "som" => {
            DirectiveKind::ChordOnlyStart
        }
        "end_of_intro" | "eoi" | "end_of_solo" | "eos" | "end_of_music" | "eom" => {
            DirectiveKind::ChordOnlyEnd
        }
        "start_of_pre" | "sop" | "start_of_bridge" | "sob" => DirectiveKind::LyricChordStart,
        "end_of_pre" | "eop" | "end_of_bridge" | "eob" => DirectiveKind::LyricChordEnd,
        _ => DirectiveKind::Other,
    }
}

/// Map a raw directive name to its canonical long form.
///
/// Case and surrounding whitespace are ignored; unknown names are returned
/// lowercased.
pub fn canonical_name(raw: &str) -> String {
    let name = raw.trim().to_lowercase();
    let canonical = match name.as_str() {
        "t" => "title",
        "st" => "subtitle",
        "c" => "comment",
        "ci" => "comment_italic",
        "cb" => "comment_box",
        "soc" => "start_of_chorus",
        "eoc" => "end_of_chorus",
        "sov" => "start_of_verse",
        "eov" => "end_of_verse",
        "sob" => "start_of_bridge",
        "eob" => "end_of_bridge",
        "sot" => "start_of_tab",
        "eot" => "end_of_tab",
        "soi" => "start_of_intro",
        "eoi" => "end_of_intro",
        "sos" => "start_of_solo",
        "eos" => "end_of_solo",
        "som" => "start_of_music",
        "eom" => "end_of_music",
        "sop" => "start_of_pre",
        "eop" => "end_of_pre",
        _ => return name,
    };
    canonical.to_string()
}

/// Directives that carry song metadata rather than display content.
pub fn is_metadata(name: &str) -> bool {
    matches!(
        name,
        "title"
            | "subtitle"
            | "artist"
            | "composer"
            | "lyricist"
            | "writer"
            | "album"
            | "year"
            | "key"
            | "time"
            | "tempo"
            | "bpm"
            | "duration"
            | "capo"
            | "copyright"
    )
}

pub fn is_comment(name: &str) -> bool {
    matches!(name, "comment" | "comment_italic" | "comment_box")
}

/// Structural section a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    #[default]
    None,
    Chorus,
    Verse,
    Bridge,
    PreChorus,
    Intro,
    Solo,
    Music,
    Tab,
}

/// Whether a (canonical) directive opens or closes a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionBoundary {
    Start(SectionType),
    End(SectionType),
}

pub fn section_boundary(name: &str) -> Option<SectionBoundary> {
    let (is_start, section) = if let Some(rest) = name.strip_prefix("start_of_") {
        (true, rest)
    } else if let Some(rest) = name.strip_prefix("end_of_") {
        (false, rest)
    } else {
        return None;
    };

    let section = match section {
        "chorus" => SectionType::Chorus,
        "verse" => SectionType::Verse,
        "bridge" => SectionType::Bridge,
        "pre" => SectionType::PreChorus,
        "intro" => SectionType::Intro,
        "solo" => SectionType::Solo,
        "music" => SectionType::Music,
        "tab" => SectionType::Tab,
        _ => return None,
    };

    Some(if is_start {
        SectionBoundary::Start(section)
    } else {
        SectionBoundary::End(section)
    })
}
