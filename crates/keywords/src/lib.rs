// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Keyword-driven dispatch of plain-text instructions
//!
//! Methods are tagged with human-readable templates such as
//! `"Add ${first} and ${second}"`. An instruction like `"Add 1 and 2"` is
//! matched against every template of a [`Registry`]; when exactly one
//! matches, its method runs with the captured text as arguments.
//!
//! ```
//! use keywords::{Arithmetic, LiteralMode, register};
//!
//! let registry = register(Arithmetic, LiteralMode::Escaped).unwrap();
//! assert_eq!(registry.dispatch("Multiply 3 and 4").unwrap(), 12.0);
//! ```

pub mod arithmetic;
pub mod catalog;
pub mod error;
pub mod registry;
pub mod template;

pub use arithmetic::Arithmetic;
pub use catalog::{KeywordLibraryEntry, LibraryCatalog};
pub use error::{BoxError, Error, Result};
pub use registry::{Handler, Keyword, KeywordLibrary, Match, RegisteredKeyword, Registry, register};
pub use template::{CompiledPattern, LiteralMode, Template, TemplatePart};
