// SPDX-License-Identifier: PMPL-1.0-or-later

//! Language catalog for LTF files.
//!
//! The catalog is a closed set: language brackets in an LTF file must name
//! one of these codes, and entry ids must never collide with them.
//!
//! ## Adding a new language
//!
//! 1. Add a variant to [`Language`]
//! 2. Add a `Language::Xx => "xx"` arm to `Language::code()`
//! 3. Add a `"xx" => Some(Language::Xx)` arm to `Language::from_code()`
//! 4. Add the variant to `Language::all()`
//! 5. Add the names to `iso639.rs`

use crate::error::{LtfError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Languages an LTF file may declare text for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "hi")]
    Hindi,
}

impl Language {
    /// ISO 639-1 two-letter code for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
            Language::Japanese => "ja",
            Language::Chinese => "zh",
            Language::Spanish => "es",
            Language::Arabic => "ar",
            Language::German => "de",
            Language::Portuguese => "pt",
            Language::French => "fr",
            Language::Hindi => "hi",
        }
    }

    /// Parse a catalog code. Case-sensitive; `None` for anything outside
    /// the catalog.
    pub fn from_code(code: &str) -> Option<Language> {
        match code {
            "en" => Some(Language::English),
            "ru" => Some(Language::Russian),
            "ja" => Some(Language::Japanese),
            "zh" => Some(Language::Chinese),
            "es" => Some(Language::Spanish),
            "ar" => Some(Language::Arabic),
            "de" => Some(Language::German),
            "pt" => Some(Language::Portuguese),
            "fr" => Some(Language::French),
            "hi" => Some(Language::Hindi),
            _ => None,
        }
    }

    /// Every catalog language, in declaration order.
    pub fn all() -> &'static [Language] {
        &[
            Language::English,
            Language::Russian,
            Language::Japanese,
            Language::Chinese,
            Language::Spanish,
            Language::Arabic,
            Language::German,
            Language::Portuguese,
            Language::French,
            Language::Hindi,
        ]
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = LtfError;

    fn from_str(code: &str) -> Result<Self> {
        Language::from_code(code.trim())
            .ok_or_else(|| LtfError::lookup(format!("unknown language code '{}'", code)))
    }
}

/// Code to language lookup. Unknown codes are a normal outcome.
pub fn code_to_language(code: &str) -> Option<Language> {
    Language::from_code(code)
}

pub fn language_to_code(language: Language) -> &'static str {
    language.code()
}

/// A language plus an optional dialect variant (`en`, `en.formal`).
///
/// A tag without a variant never equals a tag with an empty variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageTag {
    pub language: Language,
    pub variant: Option<String>,
}

impl LanguageTag {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            variant: None,
        }
    }

    pub fn with_variant(language: Language, variant: impl Into<String>) -> Self {
        Self {
            language,
            variant: Some(variant.into()),
        }
    }
}

impl From<Language> for LanguageTag {
    fn from(language: Language) -> Self {
        LanguageTag::new(language)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "{}.{}", self.language.code(), variant),
            None => write!(f, "{}", self.language.code()),
        }
    }
}

/// Parses `en` or `en.formal`. A variant is one or more of
/// `[A-Za-z0-9_-]`.
impl FromStr for LanguageTag {
    type Err = LtfError;

    fn from_str(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        match raw.split_once('.') {
            Some((code, variant)) => {
                let canonical = !variant.is_empty()
                    && variant
                        .bytes()
                        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
                if code.is_empty() || !canonical {
                    return Err(LtfError::lookup(format!(
                        "malformed language tag '{}'",
                        raw
                    )));
                }
                Ok(LanguageTag::with_variant(code.parse()?, variant))
            }
            None => Ok(LanguageTag::new(raw.parse()?)),
        }
    }
}

impl Serialize for LanguageTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
