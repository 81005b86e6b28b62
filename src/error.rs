//! Error types for each stage. Binaries wrap these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning C comments into markup.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("directive needs a double colon: {0}")]
    MissingDoubleColon(String),

    #[error("directive has no name: {0}")]
    MissingName(String),

    #[error("comment block opened on line {line} is never closed")]
    UnterminatedBlock { line: usize },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Failures fetching or reading the reference catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to read cached page {path}: {source}")]
    Cache {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid catalog url: {0}")]
    BadUrl(#[from] url::ParseError),

    #[error("no title found on {url}")]
    MissingTitle { url: String },

    #[error("no catalog entry for called function {0}")]
    UnknownFunction(String),
}

/// Inconsistencies between the module's constant groups and the catalog.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("mapping {group}: no catalog entry for {constant}")]
    UnknownConstant { group: String, constant: String },

    #[error("mapping {group}: constants don't all map to the same page\n{}", format_pages(.members))]
    PageMismatch {
        group: String,
        /// (page url, constant) for every member of the group
        members: Vec<(String, String)>,
    },

    #[error("mapping {group} is missing {constant}")]
    MissingMember { group: String, constant: String },
}

fn format_pages(members: &[(String, String)]) -> String {
    members
        .iter()
        .map(|(page, constant)| format!("   {}\t{}", page, constant))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Failures reducing a documented signature.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature must be parenthesized: {0}")]
    Unbalanced(String),

    #[error("empty parameter in signature: {0}")]
    EmptyParameter(String),
}

/// Failures turning markup into docstrings.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unknown kind {kind} in {line}")]
    UnknownKind { kind: String, line: String },

    #[error("{0} is documented more than once")]
    DuplicateRecord(String),

    #[error("{name}: {source}")]
    Signature {
        name: String,
        source: SignatureError,
    },

    #[error("invalid source pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
