//! `/** ... */` block scanner: three-state machine over source lines.

use crate::error::ExtractError;

const OPEN_MARKER: &str = "/**";
const CLOSE_MARKER: &str = "*/";

#[derive(Debug, Default)]
enum State {
    #[default]
    Outside,
    /// Opened on the previous line, no body yet.
    Header { header: String, opened_at: usize },
    Body {
        header: String,
        opened_at: usize,
        lines: Vec<String>,
    },
}

/// Text of a closed block, split into header and body lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub header: String,
    pub lines: Vec<String>,
}

/// What a line did to the scanner.
#[derive(Debug, PartialEq, Eq)]
pub enum Transition {
    /// Outside any block; nothing to do.
    Ignored,
    /// A block started with this header text.
    Opened(String),
    /// A body line was recorded.
    Line,
    Closed(RawBlock),
}

#[derive(Debug, Default)]
pub struct Scanner {
    state: State,
    line_no: usize,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line with its trailing newline removed.
    pub fn feed(&mut self, line: &str) -> Transition {
        self.line_no += 1;
        let trimmed = line.trim_start();

        match std::mem::take(&mut self.state) {
            State::Outside => {
                if trimmed.starts_with(OPEN_MARKER) {
                    let header = strip_open_marker(line);
                    self.state = State::Header {
                        header: header.clone(),
                        opened_at: self.line_no,
                    };
                    Transition::Opened(header)
                } else {
                    Transition::Ignored
                }
            }
            State::Header { header, .. } if trimmed.starts_with(CLOSE_MARKER) => {
                Transition::Closed(RawBlock {
                    header,
                    lines: Vec::new(),
                })
            }
            State::Body { header, lines, .. } if trimmed.starts_with(CLOSE_MARKER) => {
                Transition::Closed(RawBlock { header, lines })
            }
            State::Header { header, opened_at } => {
                self.state = State::Body {
                    header,
                    opened_at,
                    lines: vec![line.to_string()],
                };
                Transition::Line
            }
            State::Body {
                header,
                opened_at,
                mut lines,
            } => {
                lines.push(line.to_string());
                self.state = State::Body {
                    header,
                    opened_at,
                    lines,
                };
                Transition::Line
            }
        }
    }

    /// End of input. A block still open is an error.
    pub fn finish(self) -> Result<(), ExtractError> {
        match self.state {
            State::Outside => Ok(()),
            State::Header { opened_at, .. } | State::Body { opened_at, .. } => {
                Err(ExtractError::UnterminatedBlock { line: opened_at })
            }
        }
    }
}

/// `/** .. class:: blob` → `.. class:: blob`
fn strip_open_marker(line: &str) -> String {
    line.trim_start_matches([' ', '\t', '/', '*'])
        .trim_end()
        .to_string()
}
