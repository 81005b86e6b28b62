//! `-* sqlite3_open sqlite3_close` lines: which C API functions an item calls.

use crate::catalog::FunctionCatalog;
use crate::error::CatalogError;

const CALLS_MARKER: &str = "-*";

/// Lines generated from the `-*` directives of one block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallAnnotation {
    /// Goes before the documented item.
    pub index: Vec<String>,
    /// Goes after the body, indented to match it.
    pub calls: Vec<String>,
}

impl CallAnnotation {
    fn new(functions: &[&str], catalog: &FunctionCatalog) -> Result<Self, CatalogError> {
        let index = vec![
            String::new(),
            format!(".. index:: {}", functions.join(", ")),
            String::new(),
        ];

        let mut calls = vec![String::new()];
        if let [single] = functions {
            calls.push(format!("Calls: {}", link(single, catalog)?));
        } else {
            calls.push("Calls:".to_string());
            for function in functions {
                calls.push(format!("  * {}", link(function, catalog)?));
            }
        }
        calls.push(String::new());

        Ok(Self { index, calls })
    }
}

fn link(function: &str, catalog: &FunctionCatalog) -> Result<String, CatalogError> {
    let url = catalog
        .url(function)
        .ok_or_else(|| CatalogError::UnknownFunction(function.to_string()))?;
    Ok(format!("`{} <{}>`_", function, url))
}

/// Remove `-*` lines from `body`, returning the remaining lines and the
/// annotation for every function they named.
pub fn split_calls(
    body: &[String],
    catalog: &FunctionCatalog,
) -> Result<(Vec<String>, Option<CallAnnotation>), CatalogError> {
    let mut kept = Vec::with_capacity(body.len());
    let mut functions: Vec<&str> = Vec::new();

    for line in body {
        let mut words = line.split_whitespace();
        if words.next() == Some(CALLS_MARKER) {
            functions.extend(words);
        } else {
            kept.push(line.clone());
        }
    }

    if functions.is_empty() {
        return Ok((kept, None));
    }
    Ok((kept, Some(CallAnnotation::new(&functions, catalog)?)))
}
