//! C output: one `#define` per record, each line an escaped string literal.

use super::signature::Signature;
use crate::error::CompileError;
use crate::model::DocRecord;
use std::fs;
use std::io;
use std::path::Path;

pub const BANNER: &str = "/* This file is generated by cdoc-docstrings */";

const CONSTRUCTOR: &str = "__init__";

/// Make `line` safe inside a C string literal.
pub fn escape(line: &str) -> String {
    line.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// The literal for one record: a `__text_signature__` header when it has a
/// signature, then its documentation, one literal per line.
pub fn docstring(record: &DocRecord) -> Result<String, CompileError> {
    let mut lines = Vec::with_capacity(record.doc.len() + 1);

    if !record.signature.is_empty() {
        let signature =
            Signature::parse(&record.signature).map_err(|source| CompileError::Signature {
                name: record.name.clone(),
                source,
            })?;
        let func = record.name.split('.').nth(1).unwrap_or(&record.name);
        let text_signature = if func == CONSTRUCTOR {
            signature.to_string()
        } else {
            signature.with_receiver()
        };
        lines.push(format!(
            "{}{}\n--\n\n{}{}\n\n",
            func, text_signature, record.name, record.signature
        ));
    }
    lines.extend(record.doc.iter().map(|l| format!("{}\n", l)));

    Ok(lines
        .iter()
        .map(|l| format!("\"{}\"", escape(l)))
        .collect::<Vec<_>>()
        .join(" \\\n"))
}

/// The whole header file, records sorted by symbol.
pub fn render(records: &[DocRecord]) -> Result<String, CompileError> {
    let mut sorted: Vec<&DocRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    let mut out = format!("{}\n\n", BANNER);
    for record in sorted {
        out.push_str(&format!("#define {} {}\n\n", record.symbol, docstring(record)?));
    }
    Ok(out)
}

/// Write `contents` unless `path` already holds exactly that.
/// Returns whether the file was written.
pub fn write_if_changed(path: &Path, contents: &str) -> io::Result<bool> {
    match fs::read_to_string(path) {
        Ok(existing) if existing == contents => Ok(false),
        _ => fs::write(path, contents).map(|_| true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str, symbol: &str, signature: &str, doc: &[&str]) -> DocRecord {
        DocRecord {
            name: name.to_string(),
            symbol: symbol.to_string(),
            signature: signature.to_string(),
            doc: doc.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn escapes_quotes_newlines_and_backslashes() {
        assert_eq!(escape(r#"say "hi"\n"#), r#"say \"hi\"\\n"#);
        assert_eq!(escape("a\nb"), r"a\nb");
    }

    #[test]
    fn literal_backslash_sequence_survives() {
        // markup text `a \n b` must reach Python as a backslash and an n
        assert_eq!(escape(r"a \n b"), r"a \\n b");
    }

    #[test]
    fn method_docstring_has_text_signature() {
        let r = record(
            "Connection.close",
            "Connection_close_DOC",
            "(force: bool = False) -> None",
            &["Closes the \"connection\".", "", "Twice is fine."],
        );
        assert_eq!(
            docstring(&r).unwrap(),
            r#""close($self, force, /)\n--\n\nConnection.close(force: bool = False) -> None\n\n" \
"Closes the \"connection\".\n" \
"\n" \
"Twice is fine.\n""#
        );
    }

    #[test]
    fn constructor_has_no_receiver() {
        let r = record("zeroblob.__init__", "Zeroblob__init__DOC", "(size: int)", &["Zeros."]);
        let doc = docstring(&r).unwrap();
        assert!(doc.starts_with(r#""__init__(size, /)\n--\n\nzeroblob.__init__(size: int)\n\n""#));
    }

    #[test]
    fn attribute_is_plain_text() {
        let r = record("Cursor.description", "Cursor_description_DOC", "", &["Columns."]);
        assert_eq!(docstring(&r).unwrap(), r#""Columns.\n""#);
    }

    #[test]
    fn bad_signature_names_the_record() {
        let r = record("apsw.f", "Apsw_f_DOC", "(a, , b)", &["x"]);
        let err = docstring(&r).unwrap_err();
        assert!(err.to_string().starts_with("apsw.f: "));
    }

    #[test]
    fn render_sorts_by_symbol() {
        let records = vec![
            record("b.x", "B_x_DOC", "", &["b"]),
            record("a.x", "A_x_DOC", "", &["a"]),
        ];
        let out = render(&records).unwrap();
        assert_eq!(
            out,
            format!(
                "{}\n\n#define A_x_DOC \"a\\n\"\n\n#define B_x_DOC \"b\\n\"\n\n",
                BANNER
            )
        );
    }

    #[test]
    fn unchanged_output_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docstrings.h");
        assert!(write_if_changed(&path, "one").unwrap());
        assert!(!write_if_changed(&path, "one").unwrap());
        assert!(write_if_changed(&path, "two").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }
}
