//! # Chord Model
//!
//! A chord is a root pitch class, a free-form quality suffix (`m`, `maj7`,
//! `sus4`, ...) and an optional bass pitch class for slash chords.
//!
//! ## Pitch Classes
//! Roots are always stored as one of the 12 chromatic pitch classes and are
//! always spelled with sharps on output. The five flat aliases normalize on
//! parse:
//!
//! | Flat | Sharp |
//! |------|-------|
//! | Db   | C#    |
//! | Eb   | D#    |
//! | Gb   | F#    |
//! | Ab   | G#    |
//! | Bb   | A#    |
//!
//! Other spellings (`Cb`, `Fb`, `E#`, `B#`) do not resolve and the token is
//! considered malformed.
//!
//! ## Example
//! ```rust
//! use chordsheet::Chord;
//!
//! let chord: Chord = "Bbm7/F".parse().unwrap();
//! assert_eq!(chord.to_string(), "A#m7/F");
//! assert_eq!(chord.transpose(2).to_string(), "Cm7/G");
//! ```

use crate::error::ChordProError;
use std::fmt;
use std::str::FromStr;

/// The chromatic scale in sharp spelling, indexed by semitone above C.
pub const CHROMATIC_SCALE: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// One of the 12 equal-tempered pitch classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Resolve a note name like "C", "F#" or "Bb".
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = match name {
            "Db" => "C#",
            "Eb" => "D#",
            "Gb" => "F#",
            "Ab" => "G#",
            "Bb" => "A#",
            other => other,
        };
        CHROMATIC_SCALE
            .iter()
            .position(|&n| n == normalized)
            .map(Self::from_semitone)
    }

    /// Semitones above C (0-11)
    pub fn semitone(self) -> usize {
        self as usize
    }

    fn from_semitone(semitone: usize) -> Self {
        Self::ALL[semitone % 12]
    }

    /// Sharp spelling of this pitch class.
    pub fn name(self) -> &'static str {
        CHROMATIC_SCALE[self.semitone()]
    }

    /// Shift by any number of semitones, wrapping around the octave.
    pub fn transpose(self, semitones: i32) -> Self {
        // rem_euclid keeps the shift in 0..12 for negative and huge inputs alike
        let shift = semitones.rem_euclid(12) as usize;
        Self::from_semitone(self.semitone() + shift)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Split a token into its root name (letter plus optional accidental) and the rest.
pub(crate) fn split_root(token: &str) -> Option<(&str, &str)> {
    let mut chars = token.char_indices();
    let (_, letter) = chars.next()?;
    if !matches!(letter, 'A'..='G') {
        return None;
    }
    let root_len = match chars.next() {
        Some((_, '#')) | Some((_, 'b')) => 2,
        _ => 1,
    };
    Some(token.split_at(root_len))
}

/// A parsed chord symbol. Immutable: transposition returns a new chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    pub root: PitchClass,
    pub quality: String,
    pub bass: Option<PitchClass>,
}

impl Chord {
    pub fn new(root: PitchClass, quality: impl Into<String>, bass: Option<PitchClass>) -> Self {
        Self {
            root,
            quality: quality.into(),
            bass,
        }
    }

    /// Transpose root and bass by the same interval; the quality is kept as written.
    pub fn transpose(&self, semitones: i32) -> Chord {
        Chord {
            root: self.root.transpose(semitones),
            quality: self.quality.clone(),
            bass: self.bass.map(|b| b.transpose(semitones)),
        }
    }

    pub fn is_slash_chord(&self) -> bool {
        self.bass.is_some()
    }
}

impl FromStr for Chord {
    type Err = ChordProError;

    /// Parse `<A-G><#|b>?<quality>[/<bass>]`.
    ///
    /// A `/` only introduces a bass note when what follows is exactly a note
    /// name, so `C6/9` keeps `6/9` as its quality. Only one bass note is
    /// allowed: `C/G/B` and `C/` are malformed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let malformed = || ChordProError::MalformedChordToken(s.to_string());

        if token.split('/').any(str::is_empty) {
            return Err(malformed());
        }

        let (main, bass) = match token.rsplit_once('/') {
            Some((head, tail)) if !head.is_empty() => match PitchClass::from_name(tail) {
                Some(bass) => (head, Some(bass)),
                None => (token, None),
            },
            _ => (token, None),
        };

        if main
            .split('/')
            .skip(1)
            .any(|part| PitchClass::from_name(part).is_some())
        {
            return Err(malformed());
        }

        let (root_name, quality) = split_root(main).ok_or_else(malformed)?;
        let root = PitchClass::from_name(root_name).ok_or_else(malformed)?;

        Ok(Chord::new(root, quality, bass))
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)?;
        if let Some(bass) = self.bass {
            write!(f, "/{}", bass)?;
        }
        Ok(())
    }
}
