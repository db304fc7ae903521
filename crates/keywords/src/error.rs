// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

/// Error returned by a keyword handler
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while compiling templates or dispatching instructions
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Zero or several keywords matched one instruction
    #[error(
        "instruction {instruction:?} matched {} keywords, expected exactly one{}",
        .candidates.len(),
        format_candidates(.candidates)
    )]
    AmbiguousOrUnmatchedInstruction {
        instruction: String,
        /// Names of the keywords that matched, in registration order
        candidates: Vec<String>,
    },

    /// A template produced a pattern the regex engine rejected
    #[error("invalid keyword template {template:?}: {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: regex::Error,
    },

    /// The matched keyword's handler failed
    #[error("keyword '{keyword}' failed on {instruction:?}: {source}")]
    Invocation {
        keyword: String,
        instruction: String,
        #[source]
        source: BoxError,
    },

    #[error("unknown keyword library: {0}")]
    UnknownLibrary(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for the zero-or-many match failure
    #[must_use]
    pub fn is_ambiguous_or_unmatched(&self) -> bool {
        matches!(self, Error::AmbiguousOrUnmatchedInstruction { .. })
    }

    /// Number of keywords that matched, when dispatch failed on the match count
    #[must_use]
    pub fn match_count(&self) -> Option<usize> {
        match self {
            Error::AmbiguousOrUnmatchedInstruction { candidates, .. } => Some(candidates.len()),
            _ => None,
        }
    }
}

fn format_candidates(candidates: &[String]) -> String {
    if candidates.is_empty() {
        String::new()
    } else {
        format!(" ({})", candidates.join(", "))
    }
}
