//! Command-line front end: one JSON object per parsed name.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as _;
use kaiseki_core::{ElementCategory, ElementValue, ParseOptions, ParseResult, Parser};
use serde::Serialize;
use tracing::{debug, Level};

#[derive(clap::Parser)]
#[command(name = "kaiseki-parse")]
#[command(about = "Extract metadata from anime and media release file names")]
#[command(version)]
struct Cli {
    /// File names to parse; read one per line from stdin when omitted
    names: Vec<String>,

    /// JSON file with parse options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the episode number search
    #[arg(long)]
    no_episode_number: bool,

    /// Skip the episode title search
    #[arg(long)]
    no_episode_title: bool,

    /// Skip the release group search
    #[arg(long)]
    no_release_group: bool,

    /// Keep the file extension as part of the name
    #[arg(long)]
    no_file_extension: bool,

    /// Characters that separate words
    #[arg(short, long)]
    delimiters: Option<String>,

    /// Substring to remove before parsing (repeatable)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Pretty-print each result
    #[arg(long)]
    pretty: bool,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> Result<ParseOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing options from {}", path.display()))?
            }
            None => ParseOptions::default(),
        };

        if self.no_episode_number {
            options.parse_episode_number = false;
        }
        if self.no_episode_title {
            options.parse_episode_title = false;
        }
        if self.no_release_group {
            options.parse_release_group = false;
        }
        if self.no_file_extension {
            options.parse_file_extension = false;
        }
        if let Some(delimiters) = &self.delimiters {
            options.allowed_delimiters = delimiters.clone();
        }
        options.ignored_strings.extend(self.ignore.iter().cloned());
        Ok(options)
    }
}

#[derive(Serialize)]
struct Output<'a> {
    input: &'a str,
    success: bool,
    elements: BTreeMap<ElementCategory, ElementValue>,
}

impl<'a> From<&'a ParseResult> for Output<'a> {
    fn from(result: &'a ParseResult) -> Self {
        Self {
            input: &result.input,
            success: result.success,
            elements: result.to_dictionary(),
        }
    }
}

fn emit(out: &mut impl Write, result: &ParseResult, pretty: bool) -> Result<()> {
    let output = Output::from(result);
    if pretty {
        serde_json::to_writer_pretty(&mut *out, &output)?;
    } else {
        serde_json::to_writer(&mut *out, &output)?;
    }
    writeln!(out)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let options = cli.options()?;
    debug!(?options, "starting");
    let parser = Parser::new(options).context("invalid parse options")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.names.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("reading stdin")?;
            let name = line.trim();
            if name.is_empty() {
                continue;
            }
            emit(&mut out, &parser.parse(name), cli.pretty)?;
        }
    } else {
        for name in &cli.names {
            emit(&mut out, &parser.parse(name), cli.pretty)?;
        }
    }

    Ok(())
}
