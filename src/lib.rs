// SPDX-License-Identifier: PMPL-1.0-or-later

//! ltf-engine: localization text files, parsed eagerly or indexed lazily.
//!
//! An LTF file is a sequence of `[id]` blocks, each followed by one or more
//! `[lang]` / `[lang.variant]` lines of text. This crate maps the file
//! read-only and walks it once with a byte-level state machine, producing
//! either an owned translation table or a byte-offset index that slices the
//! mapping on demand.
//!
//! MODULES:
//! 1. **mapped**: read-only memory-mapped file source.
//! 2. **i18n**: the closed language catalog and language tags.
//! 3. **ltf**: lexer, entry builder and documents.
//! 4. **localization**: a manager over many loaded files with fallback.

pub mod config;
pub mod error;
pub mod i18n;
pub mod localization;
pub mod ltf;
pub mod mapped;
pub mod report;

pub use error::{LtfError, Result};
