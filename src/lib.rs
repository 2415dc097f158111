pub mod api;
pub mod ast;
pub mod chord;
pub mod config;
pub mod directive;
pub mod error;
pub mod lexer;
pub mod metadata;
pub mod parser;
pub mod plain;
pub mod render;
pub mod transpose;

pub use api::{render_song, RenderOutcome};
pub use ast::*;
pub use chord::{Chord, PitchClass};
pub use config::{Layout, RenderOptions};
pub use directive::{DirectiveKind, SectionType};
pub use error::*;
pub use metadata::{SongMetadata, SongRecord};
pub use parser::parse;
pub use plain::to_plain_text;
pub use render::{render, render_with, BlockState, RenderedItem, RenderedLine, RenderedLineKind};
pub use transpose::{transpose, transpose_text};

/// Parse a chord sheet and lay it out as plain text at the given transposition.
/// This is the shortest path from a song body to something printable.
pub fn render_plain(source: &str, transpose: i32) -> Result<String, ChordProError> {
    let song = parse(source)?;
    let lines: Vec<RenderedLine> = render(&song, transpose).collect();
    Ok(to_plain_text(&lines))
}
