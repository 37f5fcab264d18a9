//! Prompt templates with `{name}` placeholders.
//!
//! Literal braces are written doubled (`{{` and `}}`), so JSON examples in a
//! prompt read `{{"content": "..."}}`.

use postwright_common::{PostwrightError, Result};
use std::collections::HashMap;

/// Variable mapping used to render a template.
pub type TemplateVars = HashMap<&'static str, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    source: &'static str,
}

enum Piece<'a> {
    Text(&'a str),
    Brace(char),
    Var(&'a str),
}

impl PromptTemplate {
    pub const fn new(source: &'static str) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Names of the placeholders, in order of first appearance.
    pub fn input_variables(&self) -> Result<Vec<&'static str>> {
        let mut names = Vec::new();
        for piece in self.pieces()? {
            if let Piece::Var(name) = piece {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    /// Substitute every placeholder from `vars`.
    ///
    /// A placeholder without a value is an error; extra variables are ignored.
    pub fn render(&self, vars: &TemplateVars) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        for piece in self.pieces()? {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Brace(c) => out.push(c),
                Piece::Var(name) => {
                    let value = vars.get(name).ok_or_else(|| {
                        PostwrightError::Template(format!("missing variable '{name}'"))
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    fn pieces(&self) -> Result<Vec<Piece<'static>>> {
        let src = self.source;
        let bytes = src.as_bytes();
        let mut pieces = Vec::new();
        let mut text_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'{' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                    pieces.push(Piece::Text(&src[text_start..i]));
                    pieces.push(Piece::Brace(bytes[i] as char));
                    i += 2;
                    text_start = i;
                }
                b'{' => {
                    let close = src[i + 1..].find('}').ok_or_else(|| {
                        PostwrightError::Template(format!("unclosed placeholder at byte {i}"))
                    })?;
                    let name = src[i + 1..i + 1 + close].trim();
                    if name.is_empty() || name.contains('{') {
                        return Err(PostwrightError::Template(format!(
                            "invalid placeholder at byte {i}"
                        )));
                    }
                    pieces.push(Piece::Text(&src[text_start..i]));
                    pieces.push(Piece::Var(name));
                    i += close + 2;
                    text_start = i;
                }
                b'}' => {
                    return Err(PostwrightError::Template(format!(
                        "unmatched '}}' at byte {i}"
                    )));
                }
                _ => i += 1,
            }
        }
        pieces.push(Piece::Text(&src[text_start..]));
        Ok(pieces)
    }
}
