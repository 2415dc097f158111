use chordsheet::metadata::scrape;
use chordsheet::{parse, render_with, to_plain_text, ChordProError, RenderOptions, RenderedLine};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io;
use std::path::PathBuf;

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            log::error!("{err}");
            1
        }
    });
}

pub fn main_result() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("chordsheet=info"))
        .init();

    let args = CliArgs::parse();

    if !args.file.exists() {
        return Err(AppError::InputError(format!(
            "Chord sheet not found {:?}",
            args.file
        )));
    }
    let source = fs::read_to_string(&args.file)?;

    if args.metadata {
        let record = scrape(&source).into_record(&source);
        let json = serde_json::to_string_pretty(&record)?;
        println!("{json}");
        return Ok(());
    }

    let options = args.render_options()?;
    log::debug!("Rendering {:?} with {:?}", args.file, options);

    if source.trim().is_empty() {
        return Err(ChordProError::EmptyInput.into());
    }
    let song = parse(&source)?;
    let lines: Vec<RenderedLine> = render_with(&song, &options).collect();

    match args.format {
        Format::Text => print!("{}", to_plain_text(&lines)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&lines)?),
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Chord rows above lyric rows
    Text,
    /// Rendered lines as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Chord sheet to render.
    file: PathBuf,
    /// Semitones to transpose (negative is down).
    #[arg(long, short, allow_hyphen_values = true)]
    transpose: Option<i32>,
    /// Line to flag as currently playing (0-indexed).
    #[arg(long)]
    current_line: Option<usize>,
    /// YAML render configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Print the song metadata record instead of rendering.
    #[arg(long, default_value_t = false)]
    metadata: bool,
}

impl CliArgs {
    /// Config file first, then command line flags on top.
    fn render_options(&self) -> Result<RenderOptions, AppError> {
        let mut options = match &self.config {
            Some(path) => RenderOptions::load(path)?,
            None => RenderOptions::default(),
        };
        if let Some(transpose) = self.transpose {
            options.transpose = transpose;
        }
        if let Some(line) = self.current_line {
            options.current_line = Some(line);
        }
        Ok(options)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("input error: {0}")]
    InputError(String),
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("{0}")]
    ChordSheet(ChordProError),
    #[error("output error: {0}")]
    OutputError(String),
}

impl From<ChordProError> for AppError {
    fn from(error: ChordProError) -> Self {
        match error {
            ChordProError::ConfigError(s) => Self::ConfigError(s),
            other => Self::ChordSheet(other),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::InputError(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::OutputError(error.to_string())
    }
}
