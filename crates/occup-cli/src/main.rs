//! occup: extract occupation facts (who, where, job) from annotated text.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use occup_core::{DocumentPaths, OccupConfig, OutputFormat};
use occup_extract::Extractor;

#[derive(Parser)]
#[command(name = "occup")]
#[command(about = "Extract occupation facts from a tagged, entity-annotated document", long_about = None)]
#[command(version)]
struct Cli {
    /// Document base name: reads BASE.txt, BASE.spans, BASE.objects
    base: PathBuf,

    /// Template file
    templates: PathBuf,

    /// Phrase dictionaries, referenced from templates as @1, @2, ...
    dictionaries: Vec<PathBuf>,

    /// Write JSON instead of text blocks
    #[arg(long)]
    json: bool,

    /// Always run the tagger, ignoring and not writing BASE.tokens
    #[arg(long)]
    no_cache: bool,

    /// Tagger executable (overrides OCCUP_TAGGER)
    #[arg(long)]
    tagger: Option<PathBuf>,

    /// Output file (default BASE.occupations)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = OccupConfig::from_env().context("invalid environment configuration")?;
    if cli.json {
        config.output_format = OutputFormat::Json;
    }
    if cli.no_cache {
        config.use_token_cache = false;
    }
    if let Some(tagger) = cli.tagger {
        config.tagger.program = tagger;
    }

    let mut paths = DocumentPaths::from_base(&cli.base);
    if let Some(output) = cli.output {
        paths.output = output;
    }

    let extractor = Extractor::load(&cli.templates, &cli.dictionaries, config)?;
    let count = extractor
        .run(&paths)
        .with_context(|| format!("failed to process {}", cli.base.display()))?;
    info!("{}: {} occupations", cli.base.display(), count);
    Ok(())
}
