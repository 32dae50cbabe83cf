// SPDX-License-Identifier: PMPL-1.0-or-later

//! Language catalog used by the LTF parser.
//!
//! ## Supported languages
//!
//! | Code | Language   | Native name |
//! |------|------------|-------------|
//! | en   | English    | English     |
//! | ru   | Russian    | Русский     |
//! | ja   | Japanese   | 日本語       |
//! | zh   | Chinese    | 中文         |
//! | es   | Spanish    | Español     |
//! | ar   | Arabic     | العربية     |
//! | de   | German     | Deutsch     |
//! | pt   | Portuguese | Português   |
//! | fr   | French     | Français    |
//! | hi   | Hindi      | हिन्दी        |
//!
//! The catalog is static data: nothing at run time can add or remove a
//! language, so the parser can rely on it without synchronisation.

mod catalog;
mod iso639;

pub use catalog::{code_to_language, language_to_code, Language, LanguageTag};
pub use iso639::{is_catalog_code, language_name, native_name};
