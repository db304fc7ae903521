// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

// Force-link the keyword crate so its `linkme` distributed slice entries
// are visible to `LibraryCatalog` in lib tests.
use keywords as _;

pub mod commands;
pub mod common;
