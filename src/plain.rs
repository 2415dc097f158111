//! Monospace text output: each content line becomes a chord row above a lyric
//! row, with every chord aligned to the start of its lyric segment.
//!
//! ```text
//! [Verse 1]
//! D      A
//! Hello  world
//! ```

use crate::render::{RenderedLine, RenderedLineKind};

/// Lay out rendered lines as plain text.
pub fn to_plain_text(lines: &[RenderedLine]) -> String {
    let mut output = String::new();

    for line in lines {
        match line.kind {
            RenderedLineKind::SectionHeader => {
                output.push_str(&format!("[{}]\n", label_of(line)));
            }
            RenderedLineKind::Comment => {
                output.push_str(&format!("# {}\n", label_of(line)));
            }
            RenderedLineKind::Content => write_content(&mut output, line),
        }
    }

    output
}

fn label_of(line: &RenderedLine) -> &str {
    line.section_label.as_deref().unwrap_or_default()
}

fn write_content(output: &mut String, line: &RenderedLine) {
    let mut chord_row = String::new();
    let mut lyric_row = String::new();

    for item in &line.items {
        let lyric_width = item.lyric_text.chars().count();
        let chord_width = item.chord_text.chars().count();
        // keep a gap between adjacent chords
        let width = if chord_width > 0 {
            lyric_width.max(chord_width + 1)
        } else {
            lyric_width
        };
        chord_row.push_str(&format!("{:<width$}", item.chord_text));
        lyric_row.push_str(&format!("{:<width$}", item.lyric_text));
    }

    let has_chords = line.items.iter().any(|i| !i.chord_text.is_empty());
    let has_lyrics = line.items.iter().any(|i| !i.lyric_text.trim().is_empty());

    if has_chords {
        output.push_str(chord_row.trim_end());
        output.push('\n');
    }
    if has_lyrics || !has_chords {
        output.push_str(lyric_row.trim_end());
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, render};

    fn plain(source: &str, transpose: i32) -> String {
        let song = parse(source).unwrap();
        let lines: Vec<RenderedLine> = render(&song, transpose).collect();
        to_plain_text(&lines)
    }

    #[test]
    fn test_chords_above_lyrics() {
        assert_eq!(plain("[C]Hello [G]world", 2), "D     A\nHello world\n");
    }

    #[test]
    fn test_short_lyric_is_padded_for_chord() {
        assert_eq!(plain("[Cmaj7]a[G]b", 0), "Cmaj7 G\na     b\n");
    }

    #[test]
    fn test_chord_only_line_has_no_lyric_row() {
        assert_eq!(plain("{sos}\n[Dm][Am][G]\n{eos}", 0), "\nDm Am G\n");
    }

    #[test]
    fn test_headers_comments_and_blank_lines() {
        let text = plain("[Verse 1]\n[C]la\n\n# softly\n{c: repeat}", 0);
        assert_eq!(text, "[Verse 1]\nC\nla\n# softly\n# repeat\n");
    }

    #[test]
    fn test_plain_lyrics_only() {
        assert_eq!(plain("no chords here", 0), "no chords here\n");
    }

    #[test]
    fn test_blank_line_inside_block() {
        assert_eq!(plain("{soi}\n[C]\n\n[G]\n{eoi}", 0), "\nC\n\nG\n");
    }
}
