//! cdoc-docstrings: compile reStructuredText into C docstring `#define`s.
//!
//! `cdoc-docstrings src/docstrings.h doc/*.rst`
//!
//! The header is only rewritten when its contents change. Every generated
//! symbol must be used somewhere in the C sources; otherwise the unused ones
//! are listed and the exit status is 2.

use anyhow::{Context, Result};
use cdoc::compile::{emit, verify, Compiler};
use cdoc::config::CompileConfig;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing::info;

/// Exit status when a generated docstring is never referenced.
const EXIT_UNREFERENCED: i32 = 2;

#[derive(Parser)]
#[command(
    name = "cdoc-docstrings",
    about = "Generate C docstring constants from reStructuredText"
)]
struct Cli {
    /// Header file to write
    output: PathBuf,

    /// reStructuredText input files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Glob for the C sources that must reference every docstring
    #[arg(long)]
    sources: Option<String>,

    /// Prefix for unqualified names
    #[arg(long)]
    namespace: Option<String>,
}

fn main() -> Result<()> {
    cdoc::logging::init_logger();
    let cli = Cli::parse();

    let mut config = CompileConfig::default();
    if let Some(sources) = cli.sources {
        config.sources = sources;
    }
    if let Some(namespace) = cli.namespace {
        config.namespace = namespace;
    }

    let mut compiler = Compiler::new(&config);
    for path in &cli.inputs {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let kept = compiler
            .add_markup(&text)
            .with_context(|| format!("failed to process {}", path.display()))?;
        info!(input = %path.display(), records = kept, "read");
    }

    let header = compiler.render()?;
    let written = emit::write_if_changed(&cli.output, &header)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    if written {
        info!(output = %cli.output.display(), "written");
    } else {
        info!(output = %cli.output.display(), "unchanged");
    }

    let unseen = compiler.unseen_skips();
    if !unseen.is_empty() {
        eprintln!("in skip, but not seen\n");
        for name in &unseen {
            eprintln!("   {}", name);
        }
        eprintln!();
    }

    let code = verify::read_sources(&config.sources)?;
    let unreferenced = verify::unreferenced(compiler.symbols(), &code);
    if !unreferenced.is_empty() {
        eprintln!("Unreferenced doc\n");
        for symbol in &unreferenced {
            eprintln!("   {}", symbol);
        }
        process::exit(EXIT_UNREFERENCED);
    }

    Ok(())
}
