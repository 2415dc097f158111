//! # Render Configuration
//!
//! Options for one render call, loadable from YAML:
//!
//! ```yaml
//! transpose: -2
//! current-line: 4
//! layout:
//!   chord-step: 0.1
//!   chord-top: -1.5
//! ```
//!
//! Every field is optional; missing fields take the defaults below.

use crate::error::ChordProError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Chord positioning constants, in em units relative to the lyric baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Layout {
    /// Horizontal shift per character of the lyric segment under a chord
    pub chord_step: f32,
    /// Chord height above lyrics outside chord-only blocks
    pub chord_top: f32,
    /// Fixed horizontal offset inside chord-only blocks
    pub chord_only_left: f32,
    pub chord_only_top: f32,
    pub lyric_margin: f32,
    pub chord_only_margin: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            chord_step: 0.1,
            chord_top: -1.5,
            chord_only_left: -0.8,
            chord_only_top: -0.3,
            lyric_margin: 1.5,
            chord_only_margin: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RenderOptions {
    /// Semitones to shift every chord (negative is down)
    pub transpose: i32,
    /// Line flagged as currently playing (0-indexed, as in `RenderedLine::line_index`)
    pub current_line: Option<usize>,
    pub layout: Layout,
}

impl RenderOptions {
    pub fn with_transpose(transpose: i32) -> Self {
        Self {
            transpose,
            ..Self::default()
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ChordProError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ChordProError::ConfigError(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ChordProError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ChordProError::ConfigError(format!("Could not read {}: {}", path.display(), e))
        })?;
        log::debug!("Loaded render options from {}", path.display());
        Self::from_yaml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_layout_constants() {
        let options = RenderOptions::default();
        assert_eq!(options.transpose, 0);
        assert_eq!(options.current_line, None);
        assert_eq!(options.layout.chord_step, 0.1);
        assert_eq!(options.layout.chord_only_top, -0.3);
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = "transpose: -2\ncurrent-line: 4\nlayout:\n  chord-top: -2.0\n";
        let options = RenderOptions::from_yaml(yaml).unwrap();
        assert_eq!(options.transpose, -2);
        assert_eq!(options.current_line, Some(4));
        assert_eq!(options.layout.chord_top, -2.0);
        assert_eq!(options.layout.chord_step, 0.1);
    }

    #[test]
    fn test_from_yaml_empty_is_default() {
        assert_eq!(RenderOptions::from_yaml("").unwrap(), RenderOptions::default());
    }

    #[test]
    fn test_from_yaml_rejects_unknown_fields() {
        let err = RenderOptions::from_yaml("transposition: 3").unwrap_err();
        assert!(matches!(err, ChordProError::ConfigError(_)));
    }

    #[test]
    fn test_from_yaml_rejects_bad_types() {
        assert!(RenderOptions::from_yaml("transpose: up").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = RenderOptions::load(Path::new("/nonexistent/render.yaml")).unwrap_err();
        assert!(err.to_string().contains("Could not read"));
    }
}
