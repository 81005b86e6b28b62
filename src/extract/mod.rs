//! C source comments → reStructuredText.
//!
//! Blocks opened with `/**` and closed with `*/` are copied into the output.
//! The header (text after `/**`) decides what happens to them:
//!
//! - `.. class:: Name` starts a class section with a title
//! - `.. method::`, `.. attribute::`, `.. data::` are held until the class
//!   is finished, then written sorted by name
//! - an empty header flushes held blocks before its own text
//! - anything else is written as is

pub mod calls;
pub mod mapping;
pub mod output;
pub mod scanner;
pub mod scope;

use crate::catalog::{ConstantCatalog, FunctionCatalog, PageSource};
use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::model::{BlockKind, CommentBlock, Directive};
use calls::split_calls;
use mapping::MappingTable;
use output::Output;
use scanner::{RawBlock, Scanner, Transition};
use scope::Scope;
use tracing::debug;

/// Name the generated files credit.
pub const TOOL_NAME: &str = "cdoc-extract";

/// A C source file to extract from.
#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'a> {
    pub path: &'a str,
    pub text: &'a str,
}

/// Extract the documentation in `file`, fetching catalogs through `pages`.
/// `output_name` only appears in the generated preamble.
pub fn extract(
    file: &SourceFile,
    output_name: &str,
    config: &ExtractConfig,
    pages: &dyn PageSource,
) -> Result<String, ExtractError> {
    let functions = FunctionCatalog::load(pages, &config.function_list_url)?;
    let is_module = config.is_module_source(file.path);

    let mut extractor = Extractor::new(&functions);
    extractor.preamble(file.path, output_name, (!is_module).then_some(config.namespace.as_str()));

    let mut table = is_module.then(MappingTable::new);
    let mut scanner = Scanner::new();

    for line in file.text.lines() {
        let line = line.trim_end();
        if let Some(table) = table.as_mut() {
            table.feed(line);
        }
        match scanner.feed(line) {
            Transition::Opened(header) => extractor.open(&header)?,
            Transition::Closed(block) => extractor.close(block)?,
            Transition::Line | Transition::Ignored => {}
        }
    }
    scanner.finish()?;
    extractor.end_of_file()?;

    // The constant catalog is only needed to check groups.
    if let Some(table) = table.filter(|t| !t.is_empty()) {
        let constants =
            ConstantCatalog::load(pages, &config.constant_list_url, &config.unlisted_constants)?;
        let rendered = table.render(&constants, &config.shared_constant)?;
        extractor.out.extend(rendered);
    }

    Ok(extractor.out.finish())
}

struct Extractor<'a> {
    functions: &'a FunctionCatalog,
    scope: Scope,
    out: Output,
}

impl<'a> Extractor<'a> {
    fn new(functions: &'a FunctionCatalog) -> Self {
        Self {
            functions,
            scope: Scope::new(),
            out: Output::new(),
        }
    }

    fn preamble(&mut self, input: &str, output: &str, current_module: Option<&str>) {
        self.out
            .push(format!(".. Automatically generated by {}", TOOL_NAME));
        self.out.push(format!("   {} {} {}", TOOL_NAME, input, output));
        self.out.push(format!("   Edit {} not this file!", input));
        self.out.blank();
        if let Some(module) = current_module {
            self.out.push(format!(".. currentmodule:: {}", module));
            self.out.blank();
        }
    }

    /// A class header ends the previous class scope as soon as it opens.
    fn open(&mut self, header: &str) -> Result<(), ExtractError> {
        let directive = Directive::parse(header)?;
        if let (BlockKind::Class, Some(name)) = (directive.kind, directive.name.as_deref()) {
            self.scope.enter_class(name, &mut self.out, self.functions)?;
        }
        Ok(())
    }

    fn close(&mut self, raw: RawBlock) -> Result<(), ExtractError> {
        let directive = Directive::parse(&raw.header)?;
        let mut body = Vec::with_capacity(raw.lines.len() + 1);
        body.push(raw.header);
        body.extend(raw.lines);
        let block = CommentBlock { directive, body };
        debug!(kind = ?block.kind(), name = ?block.name(), lines = block.body.len(), "block");

        self.out.blank();
        match block.kind() {
            kind if kind.is_deferred() => self.scope.defer(block),
            BlockKind::Class => {
                let title = format!("{} class", block.name().unwrap_or_default());
                let underline = "=".repeat(title.chars().count());
                self.out.blank();
                self.out.push(title);
                self.out.push(underline);
                self.out.blank();
                self.write_body(&block.body)?;
            }
            BlockKind::Untitled => {
                self.scope.flush(&mut self.out, self.functions)?;
                self.write_body(&block.body)?;
            }
            _ => self.write_body(&block.body)?,
        }
        Ok(())
    }

    fn end_of_file(&mut self) -> Result<(), ExtractError> {
        self.scope.flush(&mut self.out, self.functions)?;
        Ok(())
    }

    /// Body text with any `-*` calls turned into index and call annotations.
    fn write_body(&mut self, body: &[String]) -> Result<(), ExtractError> {
        let (body, annotation) = split_calls(body, self.functions)?;
        match annotation {
            None => self.out.extend(body),
            Some(annotation) => {
                self.out.extend(annotation.index);
                self.out.extend(body);
                let calls = self.out.indented(&annotation.calls);
                self.out.extend(calls);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemorySource;
    use crate::error::MappingError;
    use pretty_assertions::assert_eq;

    const FUNCLIST: &str = "https://www.sqlite.org/c3ref/funclist.html";
    const CONSTLIST: &str = "https://www.sqlite.org/c3ref/constlist.html";

    fn pages() -> MemorySource {
        MemorySource::new().with_page(
            FUNCLIST,
            r#"<a href="../c3ref/close.html">sqlite3_close</a>"#,
        )
    }

    fn run(path: &str, text: &str, pages: &MemorySource) -> Result<String, ExtractError> {
        let file = SourceFile { path, text };
        extract(&file, "doc/out.rst", &ExtractConfig::default(), pages)
    }

    #[test]
    fn class_members_follow_class_in_name_order() {
        let source = r#"#include "apsw.h"

/** .. class:: Connection

  A database connection.
*/
typedef struct Connection Connection;

/** .. method:: close()

  Closes it.
*/
/** .. method:: __init__(filename)

  Opens.
*/
/** .. attribute:: filename

  The file.
*/
"#;
        let out = run("src/connection.c", source, &pages()).unwrap();
        assert_eq!(
            out,
            r#".. Automatically generated by cdoc-extract
   cdoc-extract src/connection.c doc/out.rst
   Edit src/connection.c not this file!

.. currentmodule:: apsw

Connection class
================

.. class:: Connection(filename)

  A database connection.

  Opens.

.. method:: Connection.close()

  Closes it.

.. attribute:: Connection.filename

  The file.

"#
        );
    }

    #[test]
    fn untitled_block_flushes_pending_members_first() {
        let source = "/** .. class:: blob\n  Blob.\n*/\n/** .. method:: read()\n  Reads.\n*/\n/**\nLater prose\n*/\n";
        let out = run("src/blob.c", source, &pages()).unwrap();
        let read = out.find(".. method:: blob.read()").unwrap();
        let prose = out.find("Later prose").unwrap();
        assert!(read < prose);
    }

    #[test]
    fn calls_annotation_in_member() {
        let source = "/** .. class:: Connection\n  C.\n*/\n/** .. method:: close()\n\n    Closes.\n\n    -* sqlite3_close\n*/\n";
        let out = run("src/connection.c", source, &pages()).unwrap();
        assert!(out.contains(".. index:: sqlite3_close\n\n.. method:: Connection.close()"));
        assert!(out.contains(
            "    Closes.\n\n    Calls: `sqlite3_close <https://www.sqlite.org/c3ref/close.html>`_\n"
        ));
    }

    #[test]
    fn no_consecutive_blank_lines() {
        let source = "/** .. class:: A\n\n\n\n  a\n\n\n*/\n/**\n\n\n*/\n";
        let out = run("src/a.c", source, &pages()).unwrap();
        assert!(!out.contains("\n\n\n"));
    }

    #[test]
    fn single_colon_directive_is_fatal() {
        let err = run("src/a.c", "/** .. method: close()\n*/\n", &pages()).unwrap_err();
        assert!(matches!(err, ExtractError::MissingDoubleColon(_)));
    }

    #[test]
    fn unclosed_block_is_fatal() {
        let err = run("src/a.c", "/** .. class:: A\n  text\n", &pages()).unwrap_err();
        assert!(matches!(err, ExtractError::UnterminatedBlock { line: 1 }));
    }

    fn module_pages() -> MemorySource {
        pages()
            .with_page(
                CONSTLIST,
                r#"<a href="../c3ref/c_abort.html">SQLITE_OK</a>
<a href="../c3ref/c_abort.html">SQLITE_ERROR</a>
<a href="../c3ref/c_abort.html">SQLITE_DONE</a>
<a href="../c3ref/c_access_exists.html">SQLITE_ACCESS_EXISTS</a>"#,
            )
            .with_page(
                "https://www.sqlite.org/c3ref/c_abort.html",
                "<h2>banner</h2><h2>Result Codes</h2>",
            )
            .with_page(
                "https://www.sqlite.org/c3ref/c_access_exists.html",
                "<h2>banner</h2><h2>Flags for the xAccess VFS method</h2>",
            )
    }

    #[test]
    fn module_source_renders_mappings() {
        let source = r#"/** .. data:: SQLITE_VERSION_NUMBER

  The version.
*/
  DICT("mapping_result_codes");
  ADDINT(SQLITE_OK);
  ADDINT(SQLITE_ERROR);
"#;
        let out = run("src/apsw.c", source, &module_pages()).unwrap();
        assert!(!out.contains(".. currentmodule::"));
        assert!(out.ends_with(
            ".. data:: mapping_result_codes\n\n   `Result Codes <https://www.sqlite.org/c3ref/c_abort.html>`_\n\n    :const:`SQLITE_ERROR`, :const:`SQLITE_OK`\n\n"
        ));
        let data = out.find(".. data:: SQLITE_VERSION_NUMBER").unwrap();
        assert!(data < out.find("mapping_result_codes").unwrap());
    }

    #[test]
    fn mixed_page_mapping_aborts() {
        let source = "DICT(\"mapping_bad\");\nADDINT(SQLITE_ERROR);\nADDINT(SQLITE_ACCESS_EXISTS);\n";
        let err = run("src/apsw.c", source, &module_pages()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Mapping(MappingError::PageMismatch { .. })
        ));
    }

    #[test]
    fn mappings_only_for_module_source() {
        let source = "DICT(\"mapping_bad\");\nADDINT(SQLITE_ERROR);\n";
        // no constant list page: would fail if the table were rendered
        let out = run("src/blob.c", source, &pages()).unwrap();
        assert!(!out.contains("mapping_bad"));
    }

    #[test]
    fn module_source_without_groups_skips_constant_catalog() {
        let source = "/** .. data:: SQLITE_VERSION_NUMBER\n\n  The version.\n*/\n";
        // pages() has no constant list, so loading it would fail
        let out = run("src/apsw.c", source, &pages()).unwrap();
        assert!(out.contains(".. data:: SQLITE_VERSION_NUMBER"));
        assert!(!out.contains("mapping_"));
    }
}
