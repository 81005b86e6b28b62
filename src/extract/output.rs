//! Accumulated reStructuredText output.

const DIRECTIVE_PREFIX: &str = ".. ";
const CLASS_DIRECTIVE: &str = ".. class::";

#[derive(Debug, Default)]
pub struct Output {
    lines: Vec<String>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Append `signature` to the most recent `.. class::` line and insert
    /// `before` ahead of it. Returns false when no class line exists.
    pub fn splice_class(&mut self, signature: &str, before: &[String]) -> bool {
        let Some(pos) = self
            .lines
            .iter()
            .rposition(|l| l.starts_with(CLASS_DIRECTIVE))
        else {
            return false;
        };
        self.lines[pos].push_str(signature);
        self.lines
            .splice(pos..pos, before.iter().cloned())
            .for_each(drop);
        true
    }

    /// Indent `lines` to the shallowest non-blank line written since the
    /// last directive.
    pub fn indented(&self, lines: &[String]) -> Vec<String> {
        if lines.is_empty() {
            return Vec::new();
        }
        let prefix = self
            .lines
            .iter()
            .rev()
            .take_while(|l| !l.starts_with(DIRECTIVE_PREFIX))
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.len() - l.trim_start().len())
            .min()
            .unwrap_or(0);
        let pad = " ".repeat(prefix);
        lines.iter().map(|l| format!("{}{}", pad, l)).collect()
    }

    /// Final text: blank runs collapsed, trailing whitespace removed.
    pub fn finish(self) -> String {
        let mut text = collapse_blank_lines(&self.lines).join("\n");
        text.push('\n');
        text
    }
}

/// Collapse runs of blank (or whitespace-only) lines into a single empty line
/// and strip trailing whitespace from the rest.
pub fn collapse_blank_lines(lines: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        let line = line.trim_end();
        if line.is_empty() && out.last().is_some_and(|l| l.is_empty()) {
            continue;
        }
        out.push(line.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn collapse_keeps_single_blanks() {
        let input = strings(&["a", "", "  ", "", "b", "", "c  ", "", ""]);
        assert_eq!(collapse_blank_lines(&input), strings(&["a", "", "b", "", "c", ""]));
    }

    #[test]
    fn collapse_never_leaves_adjacent_blanks() {
        let input = strings(&["", "", "x", " ", "\t", "y", "", "", "", "z"]);
        let out = collapse_blank_lines(&input);
        assert!(out.windows(2).all(|w| !(w[0].is_empty() && w[1].is_empty())));
        assert_eq!(out, strings(&["", "x", "", "y", "", "z"]));
    }

    #[test]
    fn splice_targets_latest_class() {
        let mut out = Output::new();
        out.extend([".. class:: A", "", "body", ".. class:: B", "", "body"]);
        let index = strings(&["", ".. index:: sqlite3_open", ""]);
        assert!(out.splice_class("(filename)", &index));
        assert_eq!(
            out.lines(),
            strings(&[
                ".. class:: A",
                "",
                "body",
                "",
                ".. index:: sqlite3_open",
                "",
                ".. class:: B(filename)",
                "",
                "body"
            ])
        );
    }

    #[test]
    fn splice_without_class_line() {
        let mut out = Output::new();
        out.push("text");
        assert!(!out.splice_class("(x)", &[]));
        assert_eq!(out.lines(), strings(&["text"]));
    }

    #[test]
    fn indent_matches_shallowest_body_line() {
        let mut out = Output::new();
        out.extend([
            "    not counted",
            ".. method:: close()",
            "",
            "      deeper",
            "    body",
            "",
        ]);
        assert_eq!(
            out.indented(&strings(&["Calls:", "", "x"])),
            strings(&["    Calls:", "    ", "    x"])
        );
    }

    #[test]
    fn indent_defaults_to_zero() {
        let mut out = Output::new();
        out.push(".. method:: close()");
        assert_eq!(out.indented(&strings(&["Calls:"])), strings(&["Calls:"]));
    }

    #[test]
    fn finish_ends_with_newline() {
        let mut out = Output::new();
        out.extend(["a", "", "", "b"]);
        assert_eq!(out.finish(), "a\n\nb\n");
    }
}
