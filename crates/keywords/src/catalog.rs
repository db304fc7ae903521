// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Catalog of keyword libraries available by name
//!
//! Libraries are registered at compile-time using linkme's distributed slice
//! mechanism, through the `register_keyword_library!` macro, so a binary can
//! offer every library it links without a hand-maintained list.

// linkme uses #[link_section] which is considered unsafe by rustc
#![allow(unsafe_code)]

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::template::LiteralMode;
use linkme::distributed_slice;

/// A named keyword library that can populate a registry
pub struct KeywordLibraryEntry {
    /// Library name (unique identifier)
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Register a fresh instance of the library
    pub register: fn(registry: &mut Registry) -> Result<()>,
}

/// Distributed slice containing all registered keyword libraries
#[allow(unsafe_code)]
#[allow(clippy::declare_interior_mutable_const)]
#[distributed_slice]
pub static KEYWORD_LIBRARIES: [KeywordLibraryEntry];

/// Lookup of linked keyword libraries
pub struct LibraryCatalog;

impl LibraryCatalog {
    /// Get a library by name
    #[must_use]
    pub fn get(name: &str) -> Option<&'static KeywordLibraryEntry> {
        KEYWORD_LIBRARIES.iter().find(|entry| entry.name == name)
    }

    /// All linked libraries, sorted by name
    #[must_use]
    pub fn list() -> Vec<&'static KeywordLibraryEntry> {
        let mut entries: Vec<_> = KEYWORD_LIBRARIES.iter().collect();
        entries.sort_by_key(|entry| entry.name);
        entries
    }

    /// Build a registry holding a fresh instance of the named library
    pub fn instantiate(name: &str, mode: LiteralMode) -> Result<Registry> {
        let entry = Self::get(name).ok_or_else(|| Error::UnknownLibrary(name.to_string()))?;
        let mut registry = Registry::new(mode);
        (entry.register)(&mut registry)?;
        Ok(registry)
    }
}

/// Add a [`KeywordLibrary`](crate::KeywordLibrary) to the catalog
///
/// ```ignore
/// register_keyword_library!(
///     name: "arithmetic",
///     description: "Add, subtract and multiply two numbers",
///     library: Arithmetic::default
/// );
/// ```
#[macro_export]
macro_rules! register_keyword_library {
    (
        name: $name:expr,
        description: $description:expr,
        library: $constructor:expr
    ) => {
        paste::paste! {
            fn [<register_library_ $name:snake>](
                registry: &mut $crate::registry::Registry,
            ) -> $crate::error::Result<()> {
                registry.register($constructor()).map(|_| ())
            }

            #[allow(unsafe_code)]
            #[linkme::distributed_slice($crate::catalog::KEYWORD_LIBRARIES)]
            static [<KEYWORD_LIBRARY_ $name:snake:upper>]: $crate::catalog::KeywordLibraryEntry = $crate::catalog::KeywordLibraryEntry {
                name: $name,
                description: $description,
                register: [<register_library_ $name:snake>],
            };
        }
    };
}
