//! # Song Structure
//!
//! Types produced by the parser. A parse call builds one [`Song`] and nothing
//! mutates it afterwards; transposing returns a new song.
//!
//! ## Type Hierarchy
//! ```text
//! Song
//!   └── Vec<Line>
//!         ├── number: usize (1-indexed source line)
//!         ├── section: SectionType (chorus, verse, ... or none)
//!         └── Vec<Item>
//!               ├── Directive  { name, original_name, value }
//!               ├── ChordLyric { chords, lyrics }
//!               ├── Annotation { text }     ([Verse 1], [SOLO: Am G])
//!               └── Comment    { text }     (# note)
//! ```
//!
//! ## Chord-Lyric Pairing
//! A chord decorates the lyric segment that follows it, up to the next chord
//! or the end of the line:
//!
//! ```text
//! [C]Hello [G]world   ->   (C, "Hello ") (G, "world")
//! Oh [Am]yes          ->   ("", "Oh ") (Am, "yes")
//! ```

use crate::directive::SectionType;
use crate::metadata::SongMetadata;
use crate::transpose::transpose;
use serde::Serialize;

/// One element of a line. An item is exactly one of these, never a mix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    /// `{name}` or `{name: value}`. `name` is canonical, `original_name` as written.
    Directive {
        name: String,
        original_name: String,
        value: Option<String>,
    },
    /// A chord token (possibly empty) and the lyric text sung under it
    ChordLyric { chords: String, lyrics: String },
    /// Section header body, e.g. `Verse 1` from `[Verse 1]`
    Annotation { text: String },
    /// Text of a `#` comment line, without the `#`
    Comment { text: String },
}

impl Item {
    pub fn directive(name: &str, original_name: &str, value: Option<&str>) -> Self {
        Item::Directive {
            name: name.to_string(),
            original_name: original_name.to_string(),
            value: value.map(str::to_string),
        }
    }

    pub fn chord_lyric(chords: &str, lyrics: &str) -> Self {
        Item::ChordLyric {
            chords: chords.to_string(),
            lyrics: lyrics.to_string(),
        }
    }

    /// True for a chord-lyric pair with a chord or some visible lyric text.
    pub fn is_renderable(&self) -> bool {
        match self {
            Item::ChordLyric { chords, lyrics } => {
                !chords.is_empty() || !lyrics.trim().is_empty()
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    /// Source line number (1-indexed)
    pub number: usize,
    pub section: SectionType,
    pub items: Vec<Item>,
}

impl Line {
    pub fn new(number: usize, section: SectionType, items: Vec<Item>) -> Self {
        Self {
            number,
            section,
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_renderable_items(&self) -> bool {
        self.items.iter().any(Item::is_renderable)
    }

    pub fn first_item(&self) -> Option<&Item> {
        self.items.first()
    }

    /// Canonical name and value when this is a directive line.
    pub fn directive(&self) -> Option<(&str, Option<&str>)> {
        match self.first_item()? {
            Item::Directive { name, value, .. } => Some((name.as_str(), value.as_deref())),
            _ => None,
        }
    }
}

/// A parsed chord sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Song {
    pub lines: Vec<Line>,
}

impl Song {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Metadata collected from `{title: ...}`, `{artist: ...}` and friends.
    /// Later directives win over earlier ones.
    pub fn metadata(&self) -> SongMetadata {
        let mut metadata = SongMetadata::default();
        for item in self.lines.iter().flat_map(|line| line.items.iter()) {
            if let Item::Directive {
                name,
                value: Some(value),
                ..
            } = item
            {
                metadata.set(name, value);
            }
        }
        metadata
    }

    /// Every chord token in order of appearance, as written.
    pub fn chords(&self) -> Vec<&str> {
        self.lines
            .iter()
            .flat_map(|line| line.items.iter())
            .filter_map(|item| match item {
                Item::ChordLyric { chords, .. } if !chords.is_empty() => Some(chords.as_str()),
                _ => None,
            })
            .collect()
    }

    /// A copy of this song with every chord token transposed.
    pub fn transpose(&self, semitones: i32) -> Song {
        let lines = self
            .lines
            .iter()
            .map(|line| {
                let items = line
                    .items
                    .iter()
                    .map(|item| match item {
                        Item::ChordLyric { chords, lyrics } if !chords.is_empty() => {
                            Item::ChordLyric {
                                chords: transpose(chords, semitones),
                                lyrics: lyrics.clone(),
                            }
                        }
                        other => other.clone(),
                    })
                    .collect();
                Line::new(line.number, line.section, items)
            })
            .collect();
        Song { lines }
    }
}
