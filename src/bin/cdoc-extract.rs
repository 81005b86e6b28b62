//! cdoc-extract: write the reStructuredText documented in a C source file.
//!
//! `cdoc-extract src/blob.c doc/blob.rst`
//!
//! Links for `-*` call lists and constant mappings come from the sqlite.org
//! catalogs; `--catalog-dir` reads saved copies instead.

use anyhow::{Context, Result};
use cdoc::catalog::{CacheDirSource, HttpSource, PageSource};
use cdoc::config::ExtractConfig;
use cdoc::extract::{extract, SourceFile};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "cdoc-extract",
    about = "Extract reStructuredText from /** */ comments in a C source file"
)]
struct Cli {
    /// C source file
    input: PathBuf,

    /// reStructuredText file to write (replaced)
    output: PathBuf,

    /// Directory of saved catalog pages, used instead of fetching them
    #[arg(long)]
    catalog_dir: Option<PathBuf>,

    /// File name of the module source whose DICT/ADDINT groups are documented
    #[arg(long)]
    module_source: Option<String>,

    /// Module name for `.. currentmodule::`
    #[arg(long)]
    namespace: Option<String>,
}

fn main() -> Result<()> {
    cdoc::logging::init_logger();
    let cli = Cli::parse();

    let mut config = ExtractConfig::default();
    if let Some(module_source) = cli.module_source {
        config.module_source = module_source;
    }
    if let Some(namespace) = cli.namespace {
        config.namespace = namespace;
    }

    // A failed run must not leave the previous output behind.
    if cli.output.exists() {
        fs::remove_file(&cli.output)
            .with_context(|| format!("failed to remove {}", cli.output.display()))?;
    }

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let pages: Box<dyn PageSource> = match cli.catalog_dir {
        Some(dir) => Box::new(CacheDirSource::new(dir)),
        None => Box::new(HttpSource::new()),
    };

    let input = cli.input.to_string_lossy();
    let output = cli.output.to_string_lossy();
    let file = SourceFile {
        path: &input,
        text: &text,
    };
    let rst = extract(&file, &output, &config, pages.as_ref())
        .with_context(|| format!("failed to extract documentation from {}", input))?;

    fs::write(&cli.output, &rst)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(input = %input, output = %output, lines = rst.lines().count(), "written");

    Ok(())
}
