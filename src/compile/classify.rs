//! Turn one markup block into a [`DocRecord`], or decide to leave it out.

use crate::config::CompileConfig;
use crate::error::CompileError;
use crate::model::DocRecord;
use tracing::debug;

/// Directives that never carry a docstring.
const IGNORED_KINDS: &[&str] = &[
    "index",
    "currentmodule",
    "code-block",
    "note",
    "seealso",
    "module",
    "data",
];

const CONSTRUCTOR_SUFFIX: &str = ".__init__";

#[derive(Debug, PartialEq, Eq)]
pub enum Classified {
    Keep(DocRecord),
    /// Named in the skip set.
    Skipped(String),
    Dropped,
}

/// `block[0]` is the directive line, e.g. `.. method:: close(force=False)`.
pub fn classify(block: &[String], config: &CompileConfig) -> Result<Classified, CompileError> {
    let Some((line, body)) = block.split_first() else {
        return Ok(Classified::Dropped);
    };
    let kind = line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .trim_end_matches(':');

    if IGNORED_KINDS.contains(&kind) {
        return Ok(Classified::Dropped);
    }
    if !matches!(kind, "class" | "method" | "attribute") {
        return Err(CompileError::UnknownKind {
            kind: kind.to_string(),
            line: line.clone(),
        });
    }

    let rest = line
        .split_once("::")
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default();
    let (name, signature) = match rest.split_once('(') {
        Some((name, signature)) => (name.trim(), format!("({}", signature).trim().to_string()),
        None => (rest, String::new()),
    };

    let name = if kind == "class" {
        format!("{}{}", name, CONSTRUCTOR_SUFFIX)
    } else if !name.contains('.') {
        format!("{}.{}", config.namespace, name)
    } else {
        name.to_string()
    };

    let start = body.iter().position(|l| !l.trim().is_empty());
    let Some(start) = start else {
        debug!(%name, "empty, dropped");
        return Ok(Classified::Dropped);
    };

    if config.skip.contains(&name) {
        return Ok(Classified::Skipped(name));
    }
    let owner = name.split('.').next().unwrap_or_default();
    if config.internal_types.contains(owner) {
        debug!(%name, "internal type, dropped");
        return Ok(Classified::Dropped);
    }

    let symbol = make_symbol(&name, &config.symbol_suffix);
    Ok(Classified::Keep(DocRecord {
        doc: dedent(&body[start..]),
        name,
        symbol,
        signature,
    }))
}

/// `Connection.close` → `Connection_close_DOC`
pub fn make_symbol(name: &str, suffix: &str) -> String {
    let mut chars = name.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{}{}", capitalized.replace('.', "_").replace("__", "_"), suffix)
}

/// Remove the whitespace prefix shared by every non-blank line, then trim
/// the block as a whole.
pub fn dedent(lines: &[String]) -> Vec<String> {
    let margin = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| &l[..l.len() - l.trim_start().len()])
        .reduce(common_prefix)
        .unwrap_or_default();

    let text = lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                &l[margin.len()..]
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    text.trim().split('\n').map(str::to_string).collect()
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}
