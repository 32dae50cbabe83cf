// SPDX-License-Identifier: PMPL-1.0-or-later

//! Parse results: an owned translation table or a lazy byte-offset index.

use crate::error::{LtfError, Result};
use crate::i18n::{Language, LanguageTag};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Half-open `[begin, end)` range into the mapped source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ByteRange {
    pub begin: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end);
        Self { begin, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

/// Per-id storage shared by both document kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntryMap<V> {
    entries: BTreeMap<String, BTreeMap<LanguageTag, V>>,
}

impl<V> Default for EntryMap<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> EntryMap<V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<LanguageTag, V>)> {
        self.entries.iter().map(|(id, langs)| (id.as_str(), langs))
    }

    pub fn get(&self, id: &str, tag: &LanguageTag) -> Result<&V> {
        let langs = self
            .entries
            .get(id)
            .ok_or_else(|| LtfError::lookup(format!("no entry with id '{}'", id)))?;
        langs
            .get(tag)
            .ok_or_else(|| LtfError::lookup(format!("entry '{}' has no text for '{}'", id, tag)))
    }

    pub fn languages_present(&self, id: &str) -> Result<Vec<&LanguageTag>> {
        self.entries
            .get(id)
            .map(|langs| langs.keys().collect())
            .ok_or_else(|| LtfError::lookup(format!("no entry with id '{}'", id)))
    }

    /// Drops tags whose language is not in `keep`, then ids left with none.
    pub fn retain_languages(&mut self, keep: &[Language]) {
        self.entries.retain(|_, langs| {
            langs.retain(|tag, _| keep.contains(&tag.language));
            !langs.is_empty()
        });
    }

    /// Merges one entry's languages. Returns `true` when `id` was already
    /// present.
    pub(crate) fn merge(&mut self, id: String, languages: BTreeMap<LanguageTag, V>) -> bool {
        match self.entries.get_mut(&id) {
            Some(existing) => {
                existing.extend(languages);
                true
            }
            None => {
                self.entries.insert(id, languages);
                false
            }
        }
    }
}

/// Id to language to owned text. Independent of the source once built.
pub type TranslationTable = EntryMap<String>;

/// Id to language to byte range. Only meaningful while the originating
/// source stays mapped.
pub type LazyIndex = EntryMap<ByteRange>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Table,
    Index,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Table => write!(f, "table"),
            DocumentKind::Index => write!(f, "index"),
        }
    }
}

/// The result of one parse. At most one kind is active at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Document {
    #[default]
    Empty,
    Table(TranslationTable),
    Index(LazyIndex),
}

impl Document {
    pub fn kind(&self) -> Option<DocumentKind> {
        match self {
            Document::Empty => None,
            Document::Table(_) => Some(DocumentKind::Table),
            Document::Index(_) => Some(DocumentKind::Index),
        }
    }

    pub fn count_entries(&self) -> usize {
        match self {
            Document::Empty => 0,
            Document::Table(table) => table.len(),
            Document::Index(index) => index.len(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        match self {
            Document::Empty => false,
            Document::Table(table) => table.contains(id),
            Document::Index(index) => index.contains(id),
        }
    }

    pub fn languages_present(&self, id: &str) -> Result<Vec<&LanguageTag>> {
        match self {
            Document::Empty => Err(LtfError::lookup("no document has been built")),
            Document::Table(table) => table.languages_present(id),
            Document::Index(index) => index.languages_present(id),
        }
    }

    pub fn retain_languages(&mut self, keep: &[Language]) {
        match self {
            Document::Empty => {}
            Document::Table(table) => table.retain_languages(keep),
            Document::Index(index) => index.retain_languages(keep),
        }
    }

    pub fn as_table(&self) -> Option<&TranslationTable> {
        match self {
            Document::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<&LazyIndex> {
        match self {
            Document::Index(index) => Some(index),
            _ => None,
        }
    }
}
