//! Checks after the docstrings are written.

use crate::error::CompileError;
use std::fs;
use std::path::PathBuf;

/// Concatenated text of every file matching `pattern`, in path order.
pub fn read_sources(pattern: &str) -> Result<String, CompileError> {
    let entries = glob::glob(pattern)?.map(|entry| {
        entry.map_err(|e| CompileError::Read {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })
    });

    let paths = source_files(entries)?;
    let mut code = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path).map_err(|source| CompileError::Read { path, source })?;
        code.push(text);
    }
    Ok(code.join("\n"))
}

/// Regular files among `entries`, sorted. A match that could not be read
/// fails the whole scan, otherwise its symbols would look unreferenced.
fn source_files(
    entries: impl IntoIterator<Item = Result<PathBuf, CompileError>>,
) -> Result<Vec<PathBuf>, CompileError> {
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Symbols that never appear in `code`.
pub fn unreferenced<'a>(symbols: impl IntoIterator<Item = &'a str>, code: &str) -> Vec<&'a str> {
    symbols.into_iter().filter(|s| !code.contains(s)).collect()
}
