//! Data model shared by the extractor and the docstring compiler.

use crate::error::ExtractError;

/// What a comment block documents, taken from its header directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Class,
    Method,
    Attribute,
    Data,
    /// Any other directive (`.. index::`, prose sections, ...).
    Other,
    /// `/**` with nothing after it.
    Untitled,
}

impl BlockKind {
    /// Method-like blocks wait for their class scope to close.
    pub fn is_deferred(self) -> bool {
        matches!(self, BlockKind::Method | BlockKind::Attribute | BlockKind::Data)
    }
}

/// Parsed header line of a comment block, e.g. `.. method:: close(force=False)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: BlockKind,
    pub name: Option<String>,
    /// Everything after the name, e.g. `(force=False)`.
    pub signature: Option<String>,
}

impl Directive {
    pub fn parse(header: &str) -> Result<Self, ExtractError> {
        let mut tokens = header.split_whitespace();
        let keyword = match (tokens.next(), tokens.next()) {
            (None, _) => {
                return Ok(Self {
                    kind: BlockKind::Untitled,
                    name: None,
                    signature: None,
                })
            }
            (Some(_), Some(keyword)) => keyword,
            (Some(_), None) => "",
        };

        let kind = match keyword {
            "class::" => BlockKind::Class,
            "method::" => BlockKind::Method,
            "attribute::" => BlockKind::Attribute,
            "data::" => BlockKind::Data,
            k if k.ends_with(':') && !k.ends_with("::") => {
                return Err(ExtractError::MissingDoubleColon(header.to_string()))
            }
            _ => BlockKind::Other,
        };

        if kind == BlockKind::Other {
            return Ok(Self {
                kind,
                name: None,
                signature: None,
            });
        }

        let rest = header
            .split_once(keyword)
            .map(|(_, rest)| rest.trim())
            .unwrap_or_default();
        let end = rest
            .find(|c: char| c == '(' || c.is_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..end];
        if name.is_empty() {
            return Err(ExtractError::MissingName(header.to_string()));
        }
        let signature = rest[end..].trim();

        Ok(Self {
            kind,
            name: Some(name.to_string()),
            signature: (!signature.is_empty()).then(|| signature.to_string()),
        })
    }
}

/// A closed comment block. `body[0]` is the header line.
#[derive(Debug, Clone)]
pub struct CommentBlock {
    pub directive: Directive,
    pub body: Vec<String>,
}

impl CommentBlock {
    pub fn kind(&self) -> BlockKind {
        self.directive.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.directive.name.as_deref()
    }
}

/// One docstring to compile: a class constructor, method or attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocRecord {
    /// Qualified name, e.g. `Connection.close` or `apsw.format_sql_value`.
    pub name: String,
    /// C preprocessor symbol, e.g. `Connection_close_DOC`.
    pub symbol: String,
    /// Documented signature as written, possibly empty.
    pub signature: String,
    /// Dedented documentation lines.
    pub doc: Vec<String>,
}
