//! # Upload Metadata
//!
//! Best-effort scrape of `{key: value}` pairs from a raw chord sheet, used to
//! prefill the song form when a file is uploaded, and the flat record handed
//! to whatever persists songs.
//!
//! | Directive key    | Field        |
//! |------------------|--------------|
//! | `title`          | `title`      |
//! | `artist`         | `singer`     |
//! | `writer`         | `songwriter` |
//! | `album`          | `album`      |
//! | `key`            | `key`        |
//! | `tempo` / `bpm`  | `bpm`        |
//!
//! Unknown keys are ignored and the last occurrence of a key wins. Missing
//! fields stay empty; they are never an error.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static METADATA_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+):\s*(.+?)\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SongMetadata {
    pub title: String,
    pub singer: String,
    pub songwriter: String,
    pub album: String,
    pub key: String,
    pub bpm: String,
}

impl SongMetadata {
    /// Store `value` under the field mapped from directive `key`.
    /// Returns false when the key is not a metadata key we track.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let field = match key.to_lowercase().as_str() {
            "title" => &mut self.title,
            "artist" => &mut self.singer,
            "writer" => &mut self.songwriter,
            "album" => &mut self.album,
            "key" => &mut self.key,
            "tempo" | "bpm" => &mut self.bpm,
            _ => return false,
        };
        *field = value.trim().to_string();
        true
    }

    /// Leading integer of the bpm field ("120", "96 bpm"), if any.
    pub fn tempo(&self) -> Option<u32> {
        let digits: String = self
            .bpm
            .trim()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }

    /// Combine with the song body into the record the persistence layer stores.
    pub fn into_record(self, body: &str) -> SongRecord {
        let tempo = self.tempo();
        SongRecord {
            title: self.title,
            singer: non_empty(self.singer),
            writer: non_empty(self.songwriter),
            album: non_empty(self.album),
            key: non_empty(self.key),
            tempo,
            body: body.to_string(),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Scan a whole chord sheet for `{key: value}` pairs.
///
/// # Example
/// ```
/// use chordsheet::metadata::scrape;
///
/// let metadata = scrape("{title: Hallelujah}\n{artist: Leonard Cohen}\n{bpm: 56}");
/// assert_eq!(metadata.title, "Hallelujah");
/// assert_eq!(metadata.singer, "Leonard Cohen");
/// assert_eq!(metadata.tempo(), Some(56));
/// ```
pub fn scrape(text: &str) -> SongMetadata {
    let mut metadata = SongMetadata::default();
    for caps in METADATA_PAIR.captures_iter(text) {
        if !metadata.set(&caps[1], &caps[2]) {
            log::trace!("Ignoring metadata key {:?}", &caps[1]);
        }
    }
    metadata
}

/// Song as stored by the surrounding application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongRecord {
    pub title: String,
    pub singer: Option<String>,
    pub writer: Option<String>,
    pub album: Option<String>,
    pub key: Option<String>,
    pub tempo: Option<u32>,
    pub body: String,
}
