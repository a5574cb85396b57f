//! krystal CLI - browse a structure ledger from the terminal
//!
//! Prints either the provenance tree of one structure or the filtered
//! family forest of the whole ledger.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, ValueEnum};
use krystal_observatory::core::{Config, ForestFilter, JsonStorage, Navigator, StructureContent};
use krystal_observatory::formats::{write_forest, write_json, write_provenance};
use krystal_observatory::{CanonicalCodec, OutputFormat};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Browse provenance trees and family forests of a Krystal structure ledger.
#[derive(Parser, Debug)]
#[command(name = "krystal")]
#[command(version = krystal_observatory::VERSION)]
#[command(about = "Browse provenance trees and family forests of a structure ledger")]
#[command(after_help = "EXAMPLES:
  # Whole family forest
  krystal ledger.json

  # Only roots with domain <= 3 and shape compatible with 2.2
  krystal ledger.json --domain 3 --shape 2.2

  # What was this expansion generated from?
  krystal ledger.json --ancestors exp_3_2-2_14
")]
struct Cli {
    /// Ledger file (default: `ledger` from the config file)
    #[arg(value_name = "LEDGER")]
    ledger: Option<PathBuf>,

    /// Config file path (default: ./.krystal_config.json when present)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory of per-structure content files
    #[arg(long = "content-dir", value_name = "DIR")]
    content_dir: Option<PathBuf>,

    /// Print the provenance tree of this structure instead of the forest
    #[arg(short = 'a', long = "ancestors", value_name = "NAME")]
    ancestors: Option<String>,

    /// Only admit forest roots with domain <= N
    #[arg(long = "domain", value_name = "N")]
    domain: Option<u32>,

    /// Only admit forest roots whose shape is compatible, e.g. 3.2.1
    #[arg(long = "shape", value_name = "SHAPE")]
    shape: Option<String>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "outline")]
    format: FormatArg,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Outline,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Outline => OutputFormat::Outline,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        return Config::from_file(path).with_context(|| format!("loading {}", path.display()));
    }
    let default_path = Config::default_path(Path::new("."));
    if default_path.exists() {
        debug!(path = %default_path.display(), "using default config");
        return Ok(Config::from_file(&default_path)?);
    }
    Ok(Config::default())
}

fn write_content<W: Write>(out: &mut W, content: &StructureContent) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Content of {}", content.name)?;
    if let Some(level) = content.level {
        writeln!(out, "  level: {}", level)?;
    }
    writeln!(out, "  strands: {}", content.strands.len())?;
    if let (Some(min), Some(max)) = (content.min_value, content.max_value) {
        writeln!(out, "  range: {}..{}", min, max)?;
    }
    if !content.shape.is_empty() {
        let shape: Vec<String> = content.shape.iter().map(|s| s.to_string()).collect();
        writeln!(out, "  shape: {}", shape.join("."))?;
    }
    for missing in &content.missing {
        writeln!(out, "  missing: {}", missing)?;
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Fix broken pipe panic when piping to head/tail/etc.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    let Some(ledger_path) = cli.ledger.clone().or_else(|| config.ledger.clone()) else {
        bail!("no ledger given (pass LEDGER or set \"ledger\" in {})", Config::FILE_NAME);
    };

    let mut storage = JsonStorage::new();
    if let Some(dir) = cli.content_dir.clone().or_else(|| config.content_dir.clone()) {
        storage = storage.with_content_dir(dir);
    }

    // CLI flags override the configured default filter
    let mut filter = config.default_filter();
    if cli.domain.is_some() {
        filter.max_domain = cli.domain;
    }
    if let Some(text) = &cli.shape {
        filter.shape = ForestFilter::parse_shape(text)?;
    }

    let mut navigator = Navigator::open(
        Box::new(storage),
        &ledger_path,
        Box::new(CanonicalCodec::new()),
        filter,
    )?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let format = OutputFormat::from(cli.format);

    match &cli.ancestors {
        Some(name) => {
            let tree = navigator.select(name)?.clone();
            match format {
                OutputFormat::Outline => {
                    write_provenance(&mut out, &tree)?;
                    if let Some(content) = navigator.content() {
                        write_content(&mut out, content)?;
                    }
                }
                OutputFormat::Json => write_json(&mut out, &tree)?,
            }
        }
        None => match format {
            OutputFormat::Outline => write_forest(&mut out, navigator.forest())?,
            OutputFormat::Json => write_json(&mut out, navigator.forest())?,
        },
    }

    out.flush()?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
