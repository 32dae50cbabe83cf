// SPDX-License-Identifier: PMPL-1.0-or-later

//! LTF (localization text file) documents.
//!
//! ```text
//! // line comment
//! /* block
//!    comment */
//! [entry_id]
//! [en] English text, backslash-\
//! continued onto next line.
//! [en.formal] A dialect-specific variant.
//! [ru] Русский текст.
//! ```
//!
//! An [`LtfFile`] owns a [`MappedFile`] and at most one [`Document`]. Build
//! an owned table with [`LtfFile::create_map`] / [`LtfFile::create_map_all`]
//! for small files, or a byte-offset index with [`LtfFile::create_index`] /
//! [`LtfFile::create_index_all`] for large ones. Index lookups slice the
//! mapped bytes on demand, so the index is only usable while the file stays
//! mapped; closing the file discards it.

mod builder;
mod document;
mod lexer;

pub use builder::ParseTarget;
pub use document::{ByteRange, Document, DocumentKind, EntryMap, LazyIndex, TranslationTable};
pub use lexer::is_valid_entry_id;

use crate::error::{LtfError, Result};
use crate::i18n::{Language, LanguageTag};
use crate::mapped::{FileMode, MappedFile};
use builder::EntryBuilder;
use lexer::Lexer;
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

/// Parses `bytes` into `document`, replacing whatever it held.
///
/// On a format error the entries committed before the failure stay in
/// `document`; treat it as incomplete.
pub fn parse_into(bytes: &[u8], target: ParseTarget, document: &mut Document) -> Result<()> {
    *document = target.empty_document();
    let mut builder = EntryBuilder::new(target);
    let lexer = Lexer::new(bytes, &mut builder)?;
    let outcome = lexer.run(document);
    debug!(
        ?target,
        bytes = bytes.len(),
        entries = document.count_entries(),
        ok = outcome.is_ok(),
        "parsed LTF content"
    );
    outcome
}

/// Parses an in-memory LTF string into an owned table.
pub fn parse_str(input: &str, language: Option<Language>) -> Result<TranslationTable> {
    let mut document = Document::Empty;
    parse_into(input.as_bytes(), ParseTarget::Map(language), &mut document)?;
    match document {
        Document::Table(table) => Ok(table),
        _ => Ok(TranslationTable::default()),
    }
}

/// Decodes a raw text body: escaped line breaks collapse to `\n` and a
/// trailing `\r` is dropped.
pub fn decode_text(raw: &[u8]) -> Result<Cow<'_, str>> {
    let text = std::str::from_utf8(raw).map_err(|err| {
        LtfError::format(raw, err.valid_up_to(), "text is not valid UTF-8")
    })?;
    let text = text.strip_suffix('\r').unwrap_or(text);
    if !text.contains('\\') {
        return Ok(Cow::Borrowed(text));
    }
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(slash) = rest.find('\\') {
        decoded.push_str(&rest[..slash]);
        let after = &rest[slash + 1..];
        if let Some(tail) = after.strip_prefix('\n') {
            decoded.push('\n');
            rest = tail;
        } else if let Some(tail) = after.strip_prefix("\r\n") {
            decoded.push('\n');
            rest = tail;
        } else {
            decoded.push('\\');
            rest = after;
        }
    }
    decoded.push_str(rest);
    Ok(Cow::Owned(decoded))
}

#[derive(Debug, Default)]
pub struct LtfFile {
    source: MappedFile,
    document: Document,
}

impl LtfFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens and maps `path`, ready for one of the `create_*` calls.
    pub fn prepare(path: &Path) -> Result<Self> {
        let mut file = Self::new();
        file.source.open(path, FileMode::Read)?;
        file.source.map()?;
        Ok(file)
    }

    /// Owned text for `language` only.
    pub fn create_map(&mut self, language: Language) -> Result<()> {
        self.build(ParseTarget::Map(Some(language)))
    }

    /// Owned text for every language.
    pub fn create_map_all(&mut self) -> Result<()> {
        self.build(ParseTarget::Map(None))
    }

    /// Byte ranges for `language` only.
    pub fn create_index(&mut self, language: Language) -> Result<()> {
        self.build(ParseTarget::Index(Some(language)))
    }

    /// Byte ranges for every language.
    pub fn create_index_all(&mut self) -> Result<()> {
        self.build(ParseTarget::Index(None))
    }

    /// Re-parses the mapped content with `target`. Any previous document is
    /// discarded first.
    pub fn build(&mut self, target: ParseTarget) -> Result<()> {
        self.document = Document::Empty;
        let bytes = self.source.content()?;
        parse_into(bytes, target, &mut self.document)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn path(&self) -> Option<&Path> {
        self.source.path()
    }

    /// Raw mapped bytes.
    pub fn content(&self) -> Result<&[u8]> {
        self.source.content()
    }

    /// Text for `id` in table mode.
    pub fn get(&self, id: &str, tag: &LanguageTag) -> Result<&str> {
        match &self.document {
            Document::Table(table) => table.get(id, tag).map(String::as_str),
            Document::Index(_) => Err(LtfError::lookup(
                "document is an index; use get_range or text",
            )),
            Document::Empty => Err(LtfError::lookup("no document has been built")),
        }
    }

    /// Byte range for `id` in index mode.
    pub fn get_range(&self, id: &str, tag: &LanguageTag) -> Result<ByteRange> {
        match &self.document {
            Document::Index(index) => index.get(id, tag).copied(),
            Document::Table(_) => Err(LtfError::lookup(
                "document is a table; use get or text",
            )),
            Document::Empty => Err(LtfError::lookup("no document has been built")),
        }
    }

    /// Decodes `range` from the mapped source.
    pub fn slice_from_source(&self, range: ByteRange) -> Result<Cow<'_, str>> {
        let bytes = self.source.content()?;
        if range.begin > range.end || range.end > bytes.len() {
            return Err(LtfError::lookup(format!(
                "range {} is outside the {} mapped bytes",
                range,
                bytes.len()
            )));
        }
        let raw = &bytes[range.begin..range.end];
        if let Err(err) = std::str::from_utf8(raw) {
            return Err(LtfError::format(
                bytes,
                range.begin + err.valid_up_to(),
                "text is not valid UTF-8",
            ));
        }
        decode_text(raw)
    }

    /// Text for `id` whichever kind of document was built.
    pub fn text(&self, id: &str, tag: &LanguageTag) -> Result<Cow<'_, str>> {
        match &self.document {
            Document::Table(table) => table.get(id, tag).map(|text| Cow::Borrowed(text.as_str())),
            Document::Index(index) => {
                let range = *index.get(id, tag)?;
                self.slice_from_source(range)
            }
            Document::Empty => Err(LtfError::lookup("no document has been built")),
        }
    }

    pub fn count_entries(&self) -> usize {
        self.document.count_entries()
    }

    /// Narrows the built document to the languages in `keep`.
    pub fn retain_languages(&mut self, keep: &[Language]) {
        self.document.retain_languages(keep);
    }

    pub fn languages_present(&self, id: &str) -> Result<Vec<&LanguageTag>> {
        self.document.languages_present(id)
    }

    /// Releases the mapping and the file handle. An index is dropped with
    /// them; an owned table stays queryable.
    pub fn close(&mut self) -> Result<()> {
        if matches!(self.document, Document::Index(_)) {
            self.document = Document::Empty;
        }
        self.source.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn en() -> LanguageTag {
        Language::English.into()
    }

    fn ru() -> LanguageTag {
        Language::Russian.into()
    }

    #[test]
    fn parses_two_languages() {
        let table = parse_str("[greet]\n[en] Hello\n[ru] Привет\n", None).unwrap();
        assert_eq!(table.get("greet", &en()).unwrap(), "Hello");
        assert_eq!(table.get("greet", &ru()).unwrap(), "Привет");
    }

    #[test]
    fn escaped_newline_continues_text() {
        let table = parse_str("[greet]\n[en] Hi\\\nthere\n", None).unwrap();
        assert_eq!(table.get("greet", &en()).unwrap(), "Hi\nthere");
    }

    #[test]
    fn digit_first_id_fails_and_leaves_document_empty() {
        let mut document = Document::Empty;
        let err = parse_into(b"[123bad]\n[en] x\n", ParseTarget::Map(None), &mut document)
            .unwrap_err();
        assert!(err.is_format());
        assert_eq!(err.position(), Some(1));
        assert_eq!(document.count_entries(), 0);
    }

    #[test]
    fn variants_are_separate_tags() {
        let table = parse_str("[a]\n[en] plain\n[en.formal] formal\n", None).unwrap();
        assert_eq!(table.get("a", &en()).unwrap(), "plain");
        assert_eq!(
            table
                .get("a", &LanguageTag::with_variant(Language::English, "formal"))
                .unwrap(),
            "formal"
        );
        assert!(table
            .get("a", &LanguageTag::with_variant(Language::English, "casual"))
            .unwrap_err()
            .is_lookup());
    }

    #[test]
    fn filtered_map_keeps_only_requested_language() {
        let table = parse_str("[a]\n[en] one\n[ru] один\n[b]\n[en] two\n", Some(Language::Russian))
            .unwrap();
        assert_eq!(table.get("a", &ru()).unwrap(), "один");
        assert!(table.get("a", &en()).unwrap_err().is_lookup());
        assert!(!table.contains("b"));
    }

    #[test]
    fn filter_matches_variants_of_the_language() {
        let table = parse_str("[a]\n[en] x\n[ru.informal] привет\n", Some(Language::Russian))
            .unwrap();
        assert_eq!(
            table
                .get("a", &LanguageTag::with_variant(Language::Russian, "informal"))
                .unwrap(),
            "привет"
        );
    }

    #[test]
    fn id_without_language_fails() {
        let err = parse_str("[a]\n[b]\n[en] x\n", None).unwrap_err();
        assert!(err.to_string().contains("expected language declaration"));

        let err = parse_str("[a]\n[en] x\n[b]\n", None).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn partial_results_survive_a_format_error() {
        let mut document = Document::Empty;
        let err = parse_into(
            b"[a]\n[en] one\n[b]\n[en] two\n[c]\n[xx.formal] three\n",
            ParseTarget::Map(None),
            &mut document,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unrecognized language code 'xx'"));
        assert!(document.contains("a"));
        assert!(document.contains("b"));
        assert!(!document.contains("c"));
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(parse_str("[a]\n[en]\n", None).unwrap_err().is_format());
        assert!(parse_str("[a]\n[en]   \r\n", None).unwrap_err().is_format());
        assert!(parse_str("[a]\n[en]", None).unwrap_err().is_format());
    }

    #[test]
    fn malformed_language_tags_fail() {
        assert!(parse_str("[a]\n[en.] x\n", None).unwrap_err().is_format());
        assert!(parse_str("[a]\n[.formal] x\n", None).unwrap_err().is_format());
        assert!(parse_str("[a]\n[xx.formal] x\n", None).unwrap_err().is_format());
    }

    #[test]
    fn variants_must_be_canonical() {
        let err = parse_str("[a]\n[en. formal] x\n", None).unwrap_err();
        assert!(err.to_string().contains("malformed language declaration"));
        assert_eq!(err.position(), Some(5));
        assert!(parse_str("[a]\n[en.a.b] x\n", None).unwrap_err().is_format());

        let table = parse_str("[a]\n[ en.du-2 ] x\n", None).unwrap();
        assert_eq!(
            table
                .get("a", &LanguageTag::with_variant(Language::English, "du-2"))
                .unwrap(),
            "x"
        );
    }

    #[test]
    fn crlf_line_endings() {
        let table = parse_str("[a]\r\n[en] one\\\r\ntwo\r\n[ru] три\r\n", None).unwrap();
        assert_eq!(table.get("a", &en()).unwrap(), "one\ntwo");
        assert_eq!(table.get("a", &ru()).unwrap(), "три");
    }

    #[test]
    fn final_line_without_newline_is_kept() {
        let table = parse_str("[a]\n[en] last", None).unwrap();
        assert_eq!(table.get("a", &en()).unwrap(), "last");
    }

    #[test]
    fn repeated_id_merges_languages() {
        let table = parse_str("[a]\n[en] x\n[b]\n[en] y\n[a]\n[ru] z\n", None).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.languages_present("a").unwrap().len(), 2);
    }

    #[test]
    fn comments_and_brackets_inside_text_are_literal() {
        let table = parse_str("[a]\n[en] see [b] // not a comment\n", None).unwrap();
        assert_eq!(table.get("a", &en()).unwrap(), "see [b] // not a comment");
    }

    #[test]
    fn decode_text_collapses_escapes() {
        assert_eq!(decode_text(b"plain").unwrap(), "plain");
        assert_eq!(decode_text(b"a\\\nb\\\r\nc\r").unwrap(), "a\nb\nc");
        assert_eq!(decode_text(b"a\\\\\r\nb").unwrap(), "a\\\nb");
        assert_eq!(decode_text(b"c:\\dir").unwrap(), "c:\\dir");
        assert!(decode_text(b"\xff").unwrap_err().is_format());
    }
}
