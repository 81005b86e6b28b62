//! reStructuredText → C docstring constants.

pub mod classify;
pub mod emit;
pub mod signature;
pub mod verify;

use crate::config::CompileConfig;
use crate::error::CompileError;
use crate::model::DocRecord;
use classify::{classify, Classified};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

const DIRECTIVE_PREFIX: &str = ".. ";

/// Split markup into directive blocks. A block starts at a `.. kind::` line
/// and runs until the next `.. ` line; trailing blank lines are dropped.
/// Text outside any such block is ignored.
pub fn markup_blocks(text: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in text.lines() {
        if line.starts_with(DIRECTIVE_PREFIX) {
            finish_block(&mut current, &mut blocks);
            let is_directive = line
                .split_whitespace()
                .nth(1)
                .is_some_and(|kind| kind.ends_with("::"));
            if is_directive {
                current.push(line.to_string());
                continue;
            }
        }
        if !current.is_empty() {
            current.push(line.to_string());
        }
    }
    finish_block(&mut current, &mut blocks);
    blocks
}

fn finish_block(current: &mut Vec<String>, blocks: &mut Vec<Vec<String>>) {
    while current.last().is_some_and(|l| l.trim().is_empty()) {
        current.pop();
    }
    if !current.is_empty() {
        blocks.push(std::mem::take(current));
    }
}

/// Collects records from any number of markup files.
pub struct Compiler<'a> {
    config: &'a CompileConfig,
    records: Vec<DocRecord>,
    names: HashSet<String>,
    skipped: BTreeSet<String>,
}

impl<'a> Compiler<'a> {
    pub fn new(config: &'a CompileConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            names: HashSet::new(),
            skipped: BTreeSet::new(),
        }
    }

    /// Add every record in one markup file. Returns how many were kept.
    pub fn add_markup(&mut self, text: &str) -> Result<usize, CompileError> {
        let mut kept = 0;
        for block in markup_blocks(text) {
            match classify(&block, self.config)? {
                Classified::Keep(record) => {
                    if !self.names.insert(record.name.clone()) {
                        return Err(CompileError::DuplicateRecord(record.name));
                    }
                    debug!(name = %record.name, symbol = %record.symbol, "record");
                    self.records.push(record);
                    kept += 1;
                }
                Classified::Skipped(name) => {
                    debug!(%name, "skipped");
                    self.skipped.insert(name);
                }
                Classified::Dropped => {}
            }
        }
        Ok(kept)
    }

    /// Generated symbols, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.records.iter().map(|r| r.symbol.as_str()).collect();
        symbols.sort_unstable();
        symbols
    }

    /// Skip set entries that were encountered.
    pub fn skipped(&self) -> &BTreeSet<String> {
        &self.skipped
    }

    /// Skip set entries that never showed up.
    pub fn unseen_skips(&self) -> Vec<&str> {
        self.config
            .skip
            .difference(&self.skipped)
            .map(String::as_str)
            .collect()
    }

    pub fn render(&self) -> Result<String, CompileError> {
        emit::render(&self.records)
    }
}
