//! Class scope: method, attribute and data blocks are held here until the
//! class they belong to is finished, then written in name order.

use super::calls::split_calls;
use super::output::Output;
use crate::catalog::FunctionCatalog;
use crate::error::CatalogError;
use crate::model::{BlockKind, CommentBlock};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Documented as part of the class itself rather than as a method.
const CONSTRUCTOR: &str = "__init__";

static RE_MEMBER_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\.\.\s+(?:method|attribute)::\s+)").unwrap());

#[derive(Debug, Default)]
pub struct Scope {
    class: Option<String>,
    pending: BTreeMap<String, CommentBlock>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the previous class and start documenting `name`.
    pub fn enter_class(
        &mut self,
        name: &str,
        out: &mut Output,
        catalog: &FunctionCatalog,
    ) -> Result<(), CatalogError> {
        self.flush(out, catalog)?;
        self.class = Some(name.to_string());
        Ok(())
    }

    /// Hold a method-like block. A later block with the same name wins.
    pub fn defer(&mut self, block: CommentBlock) {
        debug_assert!(block.kind().is_deferred());
        let name = block.name().unwrap_or_default().to_string();
        debug!(class = ?self.class, %name, "deferred");
        if self.pending.insert(name.clone(), block).is_some() {
            warn!(%name, "documented twice, keeping the later block");
        }
    }

    /// Write every pending block: the constructor into the class header,
    /// then the rest sorted by name.
    pub fn flush(&mut self, out: &mut Output, catalog: &FunctionCatalog) -> Result<(), CatalogError> {
        let mut pending = std::mem::take(&mut self.pending);

        if let Some(ctor) = pending.remove(CONSTRUCTOR) {
            self.write_constructor(ctor, out, catalog)?;
        }
        for block in pending.into_values() {
            self.write_member(block, out, catalog)?;
        }
        Ok(())
    }

    fn write_constructor(
        &self,
        block: CommentBlock,
        out: &mut Output,
        catalog: &FunctionCatalog,
    ) -> Result<(), CatalogError> {
        let signature = block.directive.signature.clone().unwrap_or_default();
        let (body, annotation) = split_calls(&block.body[1..], catalog)?;
        let annotation = annotation.unwrap_or_default();

        if !out.splice_class(&signature, &annotation.index) {
            warn!("constructor documented outside any class");
            return self.write_member(block, out, catalog);
        }

        out.blank();
        out.extend(body);
        out.blank();
        let calls = out.indented(&annotation.calls);
        out.extend(calls);
        out.blank();
        Ok(())
    }

    fn write_member(
        &self,
        block: CommentBlock,
        out: &mut Output,
        catalog: &FunctionCatalog,
    ) -> Result<(), CatalogError> {
        out.blank();
        let (body, annotation) = split_calls(&block.body[1..], catalog)?;
        let annotation = annotation.unwrap_or_default();

        out.extend(annotation.index);
        out.push(self.qualify(&block));
        out.extend(body);
        out.blank();
        let calls = out.indented(&annotation.calls);
        out.extend(calls);
        Ok(())
    }

    /// `.. method:: close()` → `.. method:: Connection.close()`
    fn qualify(&self, block: &CommentBlock) -> String {
        let header = &block.body[0];
        match (&self.class, block.kind()) {
            (Some(class), BlockKind::Method | BlockKind::Attribute) => RE_MEMBER_DIRECTIVE
                .replace(header, |caps: &Captures| format!("{}{}.", &caps[1], class))
                .into_owned(),
            _ => header.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Directive;
    use pretty_assertions::assert_eq;

    fn block(lines: &[&str]) -> CommentBlock {
        CommentBlock {
            directive: Directive::parse(lines[0]).unwrap(),
            body: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn catalog() -> FunctionCatalog {
        [("sqlite3_open", "https://www.sqlite.org/c3ref/open.html")]
            .into_iter()
            .collect()
    }

    #[test]
    fn members_flush_sorted_and_qualified() {
        let mut scope = Scope::new();
        let mut out = Output::new();
        scope.enter_class("Connection", &mut out, &catalog()).unwrap();
        scope.defer(block(&[".. method:: zap()", "", "  Zaps."]));
        scope.defer(block(&[".. attribute:: filename", "", "  The file."]));
        scope.defer(block(&[".. method:: close()", "", "  Closes."]));
        assert_eq!(scope.pending.len(), 3);

        scope.flush(&mut out, &catalog()).unwrap();
        assert!(scope.pending.is_empty());

        let headers: Vec<&str> = out
            .lines()
            .iter()
            .map(String::as_str)
            .filter(|l| l.starts_with(".. "))
            .collect();
        assert_eq!(
            headers,
            vec![
                ".. method:: Connection.close()",
                ".. attribute:: Connection.filename",
                ".. method:: Connection.zap()",
            ]
        );
    }

    #[test]
    fn data_blocks_are_not_qualified() {
        let mut scope = Scope::new();
        let mut out = Output::new();
        scope.enter_class("Connection", &mut out, &catalog()).unwrap();
        scope.defer(block(&[".. data:: SQLITE_VERSION", "", "  Version."]));
        scope.flush(&mut out, &catalog()).unwrap();
        assert!(out.lines().contains(&".. data:: SQLITE_VERSION".to_string()));
    }

    #[test]
    fn constructor_is_spliced_into_class() {
        let mut scope = Scope::new();
        let mut out = Output::new();
        scope.enter_class("Connection", &mut out, &catalog()).unwrap();
        out.extend([".. class:: Connection", "", "  A connection."]);
        scope.defer(block(&[
            ".. method:: __init__(filename, flags)",
            "",
            "  Opens the file.",
            "",
            "  -* sqlite3_open",
        ]));
        scope.flush(&mut out, &catalog()).unwrap();

        let text: Vec<&str> = out.lines().iter().map(String::as_str).collect();
        assert_eq!(
            text,
            vec![
                "",
                ".. index:: sqlite3_open",
                "",
                ".. class:: Connection(filename, flags)",
                "",
                "  A connection.",
                "",
                "",
                "  Opens the file.",
                "",
                "",
                "  ",
                "  Calls: `sqlite3_open <https://www.sqlite.org/c3ref/open.html>`_",
                "  ",
                "",
            ]
        );
    }

    #[test]
    fn class_switch_flushes_previous_members() {
        let mut scope = Scope::new();
        let mut out = Output::new();
        scope.enter_class("blob", &mut out, &catalog()).unwrap();
        scope.defer(block(&[".. method:: read()", "", "  Reads."]));
        scope.enter_class("zeroblob", &mut out, &catalog()).unwrap();
        assert_eq!(scope.class.as_deref(), Some("zeroblob"));
        assert!(scope.pending.is_empty());
        assert!(out.lines().contains(&".. method:: blob.read()".to_string()));
    }
}
