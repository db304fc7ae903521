// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Keyword template parsing and pattern compilation
//!
//! A template is human-readable text with `${name}` placeholders, e.g.
//! `"Add ${first} and ${second}"`. Compiling it replaces each placeholder
//! with a capturing wildcard and anchors the result at both ends, so an
//! instruction matches only when the whole string fits the template:
//!
//! ```
//! use keywords::template::{LiteralMode, Template};
//!
//! let template = Template::new("Add ${first} and ${second}");
//! let pattern = template.compile(LiteralMode::Escaped).unwrap();
//! assert_eq!(
//!     pattern.captures("Add 1 and 2"),
//!     Some(vec!["1".to_string(), "2".to_string()])
//! );
//! assert_eq!(pattern.captures("Please Add 1 and 2"), None);
//! ```

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;

/// Prefix of the named groups that carry placeholder captures
const ARG_GROUP_PREFIX: &str = "kwarg";

/// How literal (non-placeholder) template text is placed into the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiteralMode {
    /// Literal text matches itself, metacharacters included
    #[default]
    Escaped,
    /// Literal text is inserted as regex syntax, unescaped
    ///
    /// `"Cost is $5.00"` then matches `"Cost is $5x00"` too, and a stray `(`
    /// makes the template fail to compile.
    Raw,
}

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Literal(String),
    /// Placeholder name, without the `${` `}` delimiters
    Placeholder(String),
}

/// A parsed keyword template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
    parts: Vec<TemplatePart>,
}

impl Template {
    /// Parse template text into literal and placeholder parts
    ///
    /// A placeholder is `${`, then at least one character, then the first
    /// `}` after that character. Placeholders never span lines. Anything
    /// else, including `${}` on its own, is literal text.
    #[must_use]
    pub fn new<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = text.as_str();

        while let Some(start) = rest.find("${") {
            let after = &rest[start + 2..];
            match placeholder_end(after) {
                Some(end) => {
                    literal.push_str(&rest[..start]);
                    if !literal.is_empty() {
                        parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(TemplatePart::Placeholder(after[..end].to_string()));
                    rest = &after[end + 1..];
                }
                None => {
                    // Keep the '$' and rescan from the '{'
                    literal.push_str(&rest[..=start]);
                    rest = &rest[start + 1..];
                }
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            parts.push(TemplatePart::Literal(literal));
        }

        Self { text, parts }
    }

    /// The template text as declared
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    /// Placeholder names in left-to-right order
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            TemplatePart::Placeholder(name) => Some(name.as_str()),
            TemplatePart::Literal(_) => None,
        })
    }

    /// Number of placeholders, which is the number of arguments a match yields
    #[must_use]
    pub fn arity(&self) -> usize {
        self.placeholders().count()
    }

    /// Compile into an anchored pattern with one capture per placeholder
    pub fn compile(&self, mode: LiteralMode) -> Result<CompiledPattern> {
        let mut pattern = String::from("^(?:");
        let mut arity = 0;

        for part in &self.parts {
            match part {
                TemplatePart::Literal(text) => match mode {
                    LiteralMode::Escaped => pattern.push_str(&regex::escape(text)),
                    LiteralMode::Raw => pattern.push_str(text),
                },
                TemplatePart::Placeholder(_) => {
                    pattern.push_str(&format!("(?P<{}>.*)", group_name(arity)));
                    arity += 1;
                }
            }
        }
        pattern.push_str(")$");

        let regex = Regex::new(&pattern).map_err(|source| Error::InvalidTemplate {
            template: self.text.clone(),
            source,
        })?;

        Ok(CompiledPattern { regex, arity })
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Byte offset of the closing '}' in the text following "${"
fn placeholder_end(after: &str) -> Option<usize> {
    let first = after.chars().next()?;
    if first == '\n' {
        return None;
    }
    let skip = first.len_utf8();
    let offset = after[skip..].find(['}', '\n'])?;
    let end = skip + offset;
    (after.as_bytes()[end] == b'}').then_some(end)
}

fn group_name(index: usize) -> String {
    format!("{ARG_GROUP_PREFIX}{index}")
}

/// A template compiled to an anchored regular expression
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    arity: usize,
}

impl CompiledPattern {
    /// Match the whole input, returning one captured string per placeholder
    ///
    /// Returns `None` unless the entire input matches.
    #[must_use]
    pub fn captures(&self, input: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(input)?;
        Some(
            (0..self.arity)
                .map(|index| {
                    caps.name(&group_name(index))
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default()
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The generated regular expression
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
