// SPDX-License-Identifier: PMPL-1.0-or-later

//! Entry builder: gathers one entry across several lexer transitions and
//! commits it to the document at the next id boundary.

use super::document::{ByteRange, Document, EntryMap};
use crate::error::{LtfError, Result};
use crate::i18n::{Language, LanguageTag};
use std::collections::BTreeMap;
use tracing::warn;

/// What a parse builds, and for which languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTarget {
    /// Owned text. `None` keeps every language.
    Map(Option<Language>),
    /// Byte ranges into the source. `None` keeps every language.
    Index(Option<Language>),
}

impl ParseTarget {
    fn filter(&self) -> Option<Language> {
        match self {
            ParseTarget::Map(filter) | ParseTarget::Index(filter) => *filter,
        }
    }

    fn keeps(&self, tag: &LanguageTag) -> bool {
        self.filter().is_none_or(|lang| lang == tag.language)
    }

    /// A fresh, empty document of the kind this target builds.
    pub(crate) fn empty_document(&self) -> Document {
        match self {
            ParseTarget::Map(_) => Document::Table(EntryMap::default()),
            ParseTarget::Index(_) => Document::Index(EntryMap::default()),
        }
    }
}

#[derive(Debug)]
struct PendingId {
    id: String,
    position: usize,
}

/// Text being read for the current language declaration. `raw` is the
/// source span the owned bytes were taken from, escapes included.
#[derive(Debug)]
enum PendingText {
    Owned { bytes: Vec<u8>, raw: ByteRange },
    Range(ByteRange),
}

#[derive(Debug)]
enum Payload {
    Text(String),
    Range(ByteRange),
}

#[derive(Debug)]
pub(crate) struct EntryBuilder {
    target: ParseTarget,
    pending_id: Option<PendingId>,
    /// Tag of the body being read; `None` once the body ends or when the
    /// declaration was filtered out.
    pending_tag: Option<LanguageTag>,
    pending_text: Option<PendingText>,
    /// Language declarations seen for the pending id, filtered or not.
    declared: usize,
    languages: BTreeMap<LanguageTag, Payload>,
}

impl EntryBuilder {
    pub(crate) fn new(target: ParseTarget) -> Self {
        Self {
            target,
            pending_id: None,
            pending_tag: None,
            pending_text: None,
            declared: 0,
            languages: BTreeMap::new(),
        }
    }

    pub(crate) fn has_pending_id(&self) -> bool {
        self.pending_id.is_some()
    }

    pub(crate) fn pending_id(&self) -> Option<&str> {
        self.pending_id.as_ref().map(|pending| pending.id.as_str())
    }

    /// Starts a new entry, committing the previous one first.
    pub(crate) fn begin_id(
        &mut self,
        bytes: &[u8],
        id: String,
        position: usize,
        document: &mut Document,
    ) -> Result<()> {
        if self.pending_id.is_some() {
            if self.declared == 0 {
                return Err(LtfError::format(
                    bytes,
                    position,
                    "expected language declaration after identifier",
                ));
            }
            self.commit(bytes, document)?;
        }
        self.pending_id = Some(PendingId { id, position });
        Ok(())
    }

    /// Records a language declaration. Text for a filtered-out language is
    /// read past but not kept.
    pub(crate) fn begin_language(&mut self, bytes: &[u8], tag: LanguageTag, position: usize) -> Result<()> {
        if self.pending_id.is_none() {
            return Err(LtfError::format(
                bytes,
                position,
                "language declaration without identifier",
            ));
        }
        self.declared += 1;
        self.pending_tag = self.target.keeps(&tag).then_some(tag);
        Ok(())
    }

    /// Appends the byte at `position` to the body. Skipped for filtered
    /// declarations.
    pub(crate) fn push_text(&mut self, position: usize, byte: u8) {
        if self.pending_tag.is_none() {
            return;
        }
        match (&mut self.pending_text, self.target) {
            (Some(PendingText::Owned { bytes, raw }), _) => {
                bytes.push(byte);
                raw.end = position + 1;
            }
            (Some(PendingText::Range(range)), _) => range.end = position + 1,
            (None, ParseTarget::Map(_)) => {
                self.pending_text = Some(PendingText::Owned {
                    bytes: vec![byte],
                    raw: ByteRange::new(position, position + 1),
                })
            }
            (None, ParseTarget::Index(_)) => {
                self.pending_text = Some(PendingText::Range(ByteRange::new(position, position + 1)))
            }
        }
    }

    /// Takes an escaped line break into the body: the backslash before it is
    /// dropped from owned text, while a range simply grows over it.
    pub(crate) fn push_escaped_newline(&mut self, position: usize) {
        if let Some(PendingText::Owned { bytes, .. }) = &mut self.pending_text {
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            if bytes.last() == Some(&b'\\') {
                bytes.pop();
            }
        }
        self.push_text(position, b'\n');
    }

    /// Ends the current body. Trailing `\r` is excluded.
    pub(crate) fn end_text(&mut self, bytes: &[u8]) -> Result<()> {
        let Some(tag) = self.pending_tag.take() else {
            self.pending_text = None;
            return Ok(());
        };
        let payload = match self.pending_text.take() {
            Some(PendingText::Owned { bytes: mut body, raw }) => {
                check_utf8(bytes, raw)?;
                if body.last() == Some(&b'\r') {
                    body.pop();
                }
                let text = String::from_utf8(body).map_err(|err| {
                    LtfError::format(bytes, raw.begin + err.utf8_error().valid_up_to(), "text is not valid UTF-8")
                })?;
                Payload::Text(text)
            }
            Some(PendingText::Range(mut range)) => {
                check_utf8(bytes, range)?;
                if range.end > range.begin && bytes[range.end - 1] == b'\r' {
                    range.end -= 1;
                }
                Payload::Range(range)
            }
            None => return Ok(()),
        };
        if self.languages.insert(tag.clone(), payload).is_some() {
            warn!(
                id = self.pending_id().unwrap_or_default(),
                tag = %tag,
                "language declared twice for one entry; keeping the later text"
            );
        }
        Ok(())
    }

    /// Commits the pending entry, then clears every pending field.
    pub(crate) fn commit(&mut self, bytes: &[u8], document: &mut Document) -> Result<()> {
        let Some(pending) = self.pending_id.take() else {
            return Ok(());
        };
        let declared = std::mem::take(&mut self.declared);
        let languages = std::mem::take(&mut self.languages);
        self.pending_tag = None;
        self.pending_text = None;

        if declared == 0 {
            return Err(LtfError::format(
                bytes,
                pending.position,
                format!("identifier '{}' has no language declarations", pending.id),
            ));
        }
        if languages.is_empty() {
            return Ok(());
        }

        let merged = match document {
            Document::Table(table) => table.merge(
                pending.id.clone(),
                languages
                    .into_iter()
                    .filter_map(|(tag, payload)| match payload {
                        Payload::Text(text) => Some((tag, text)),
                        Payload::Range(_) => None,
                    })
                    .collect(),
            ),
            Document::Index(index) => index.merge(
                pending.id.clone(),
                languages
                    .into_iter()
                    .filter_map(|(tag, payload)| match payload {
                        Payload::Range(range) => Some((tag, range)),
                        Payload::Text(_) => None,
                    })
                    .collect(),
            ),
            Document::Empty => {
                return Err(LtfError::io("no document to commit entries into"));
            }
        };
        if merged {
            warn!(id = %pending.id, "identifier declared more than once; merging languages");
        }
        Ok(())
    }
}

/// Validates the source span of a body, so the error names the offending
/// byte where it sits in the file.
fn check_utf8(bytes: &[u8], span: ByteRange) -> Result<()> {
    std::str::from_utf8(&bytes[span.begin..span.end])
        .map(|_| ())
        .map_err(|err| LtfError::format(bytes, span.begin + err.valid_up_to(), "text is not valid UTF-8"))
}
