//! Reduce a documented signature to what CPython accepts in
//! `__text_signature__`: parameter names only, no annotations, defaults or
//! return type.

use crate::error::SignatureError;
use std::fmt;

const NEST_OPEN: [char; 2] = ['[', '('];
const NEST_CLOSE: [char; 2] = [']', ')'];
const RETURN_MARKER: &str = "->";
const POSITIONAL_ONLY: &str = "/";

/// Bare parameter list, e.g. `(a, b, /)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<String>,
}

impl Signature {
    /// `(a: int, b: Dict[str, int] = {}) -> bool` → `(a, b, /)`
    pub fn parse(signature: &str) -> Result<Self, SignatureError> {
        let s = signature
            .split(RETURN_MARKER)
            .next()
            .unwrap_or_default()
            .trim();
        let inner = s
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| SignatureError::Unbalanced(signature.to_string()))?;

        let mut params = Vec::new();
        let mut name = String::new();
        let mut depth = 0usize;
        let mut discard = false;

        for c in inner.chars() {
            if depth > 0 || NEST_OPEN.contains(&c) {
                if NEST_OPEN.contains(&c) {
                    depth += 1;
                } else if NEST_CLOSE.contains(&c) {
                    depth -= 1;
                }
                continue;
            }

            if c == ',' {
                if name.is_empty() {
                    return Err(SignatureError::EmptyParameter(signature.to_string()));
                }
                params.push(std::mem::take(&mut name));
                discard = false;
                continue;
            }

            if discard {
                continue;
            }

            if name.is_empty() {
                if is_ident_start(c) || c == '/' || c == '*' {
                    name.push(c);
                }
                continue;
            }

            name.push(c);
            if !is_param_token(&name) {
                // annotation or default value: keep only the name
                name.pop();
                discard = true;
            }
        }

        if !name.is_empty() {
            params.push(name);
        }

        let marked = params
            .iter()
            .any(|p| p == POSITIONAL_ONLY || p.starts_with('*'));
        if !marked {
            params.push(POSITIONAL_ONLY.to_string());
        }

        Ok(Self { params })
    }

    /// The same list with the bound receiver first: `($self, a, /)`.
    pub fn with_receiver(&self) -> String {
        format!("($self, {})", self.params.join(", "))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.params.join(", "))
    }
}

/// Simplify a signature string in one step.
pub fn simplify(signature: &str) -> Result<String, SignatureError> {
    Signature::parse(signature).map(|s| s.to_string())
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// `/`, an identifier, or one that may still become `*name` / `**name`.
fn is_param_token(token: &str) -> bool {
    if token == POSITIONAL_ONLY {
        return true;
    }
    let rest = token
        .strip_prefix("**")
        .or_else(|| token.strip_prefix('*'));
    match rest {
        Some(rest) => rest.is_empty() || is_identifier(rest),
        None => is_identifier(token),
    }
}
