// SPDX-License-Identifier: PMPL-1.0-or-later

//! Single-pass LTF state machine.
//!
//! The lexer walks the byte view once, left to right. Each call to
//! [`Lexer::step`] dispatches on the current [`State`] and performs exactly
//! one transition; [`Lexer::run`] loops until input is exhausted and then
//! asks the builder to commit whatever entry is still pending.

use super::builder::EntryBuilder;
use super::document::Document;
use crate::error::{LtfError, Result};
use crate::i18n::{is_catalog_code, Language, LanguageTag};
use regex::Regex;
use std::sync::LazyLock;

const O_BRACKET: u8 = b'[';
const C_BRACKET: u8 = b']';
const DOT: u8 = b'.';
const F_SLASH: u8 = b'/';
const B_SLASH: u8 = b'\\';
const STAR: u8 = b'*';

static ENTRY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("entry id pattern compiles"));

/// Lexer states. Bracket states carry the span of the trimmed text between
/// the brackets and the position just after the closing `]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Global,
    Id { start: usize, end: usize, next: usize },
    Lang { start: usize, end: usize, next: usize },
    Text { body_start: usize },
    Comment { opened_at: usize },
}

/// Whether `candidate` is a valid entry id: `[A-Za-z0-9_-]+`, not starting
/// with a digit, and not a catalog language code.
pub fn is_valid_entry_id(candidate: &str) -> bool {
    ENTRY_ID.is_match(candidate)
        && !candidate.starts_with(|c: char| c.is_ascii_digit())
        && !is_catalog_code(candidate)
}

pub(crate) struct Lexer<'a, 'b> {
    bytes: &'a [u8],
    cursor: usize,
    state: State,
    builder: &'b mut EntryBuilder,
}

impl<'a, 'b> Lexer<'a, 'b> {
    pub(crate) fn new(bytes: &'a [u8], builder: &'b mut EntryBuilder) -> Result<Self> {
        let cursor = skip_byte_order_mark(bytes)?;
        Ok(Self {
            bytes,
            cursor,
            state: State::Global,
            builder,
        })
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> State {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// Runs to the end of input, committing the final entry.
    pub(crate) fn run(mut self, document: &mut Document) -> Result<()> {
        while !self.is_finished() {
            self.step(document)?;
        }
        if let State::Text { .. } = self.state {
            self.builder.end_text(self.bytes)?;
        }
        self.builder.commit(self.bytes, document)
    }

    /// Whether input is exhausted and no bracket transition is pending.
    pub(crate) fn is_finished(&self) -> bool {
        self.cursor >= self.bytes.len()
            && matches!(self.state, State::Global | State::Text { .. })
    }

    /// Performs one transition from the current state.
    pub(crate) fn step(&mut self, document: &mut Document) -> Result<()> {
        self.state = match self.state {
            State::Global => self.global()?,
            State::Id { start, end, next } => self.id(start, end, next, document)?,
            State::Lang { start, end, next } => self.lang(start, end, next)?,
            State::Text { body_start } => self.text(body_start)?,
            State::Comment { opened_at } => self.comment(opened_at)?,
        };
        Ok(())
    }

    fn global(&mut self) -> Result<State> {
        let i = self.cursor;
        match self.bytes[i] {
            b' ' | b'\t' | b'\r' | b'\n' => {
                self.cursor += 1;
                Ok(State::Global)
            }
            F_SLASH => match self.bytes.get(i + 1) {
                Some(&F_SLASH) => {
                    self.cursor = memchr_newline(self.bytes, i).map_or(self.bytes.len(), |nl| nl + 1);
                    Ok(State::Global)
                }
                Some(&STAR) => {
                    self.cursor = i + 2;
                    Ok(State::Comment { opened_at: i })
                }
                _ => Err(LtfError::format(self.bytes, i, "unexpected '/' outside a comment")),
            },
            O_BRACKET => self.bracket(i),
            _ => Err(LtfError::format(self.bytes, i, "unexpected byte")),
        }
    }

    /// Reads `[ ... ]` starting at `open` and picks the id or language state.
    fn bracket(&mut self, open: usize) -> Result<State> {
        let close = self.bytes[open + 1..]
            .iter()
            .position(|&b| b == C_BRACKET || b == b'\n')
            .map(|offset| open + 1 + offset)
            .filter(|&pos| self.bytes[pos] == C_BRACKET)
            .ok_or_else(|| LtfError::format(self.bytes, open, "unterminated bracket"))?;

        let (start, end) = trim_span(self.bytes, open + 1, close);
        let inner = &self.bytes[start..end];
        let next = close + 1;
        self.cursor = next;

        let names_language = std::str::from_utf8(inner).is_ok_and(is_catalog_code);
        if inner.contains(&DOT) || names_language {
            Ok(State::Lang { start, end, next })
        } else {
            Ok(State::Id { start, end, next })
        }
    }

    fn id(&mut self, start: usize, end: usize, next: usize, document: &mut Document) -> Result<State> {
        let candidate = std::str::from_utf8(&self.bytes[start..end])
            .ok()
            .filter(|text| is_valid_entry_id(text))
            .ok_or_else(|| {
                let message = if start == end {
                    "empty identifier".to_string()
                } else {
                    format!(
                        "invalid identifier '{}'",
                        String::from_utf8_lossy(&self.bytes[start..end])
                    )
                };
                LtfError::format(self.bytes, start, message)
            })?;

        self.builder
            .begin_id(self.bytes, candidate.to_string(), start, document)?;
        self.cursor = next;
        Ok(State::Global)
    }

    fn lang(&mut self, start: usize, end: usize, next: usize) -> Result<State> {
        let raw = std::str::from_utf8(&self.bytes[start..end])
            .map_err(|_| LtfError::format(self.bytes, start, "language declaration is not valid UTF-8"))?;
        let (code, variant) = match raw.split_once('.') {
            Some((code, variant)) => {
                if code.is_empty() || !ENTRY_ID.is_match(variant) {
                    return Err(LtfError::format(
                        self.bytes,
                        start,
                        format!("malformed language declaration '{}'", raw),
                    ));
                }
                (code, Some(variant))
            }
            None => (raw, None),
        };
        let language = Language::from_code(code).ok_or_else(|| {
            LtfError::format(self.bytes, start, format!("unrecognized language code '{}'", code))
        })?;
        let tag = LanguageTag {
            language,
            variant: variant.map(str::to_string),
        };
        self.builder.begin_language(self.bytes, tag, start)?;

        let mut body_start = next;
        while matches!(self.bytes.get(body_start), Some(b' ' | b'\t')) {
            body_start += 1;
        }
        let empty = match self.bytes.get(body_start) {
            None | Some(b'\n') => true,
            Some(b'\r') => matches!(self.bytes.get(body_start + 1), None | Some(b'\n')),
            Some(_) => false,
        };
        if empty {
            return Err(LtfError::format(
                self.bytes,
                body_start,
                "expected text after language declaration",
            ));
        }
        self.cursor = body_start;
        Ok(State::Text { body_start })
    }

    fn text(&mut self, body_start: usize) -> Result<State> {
        let i = self.cursor;
        let byte = self.bytes[i];
        self.cursor += 1;
        if byte != b'\n' {
            self.builder.push_text(i, byte);
            return Ok(State::Text { body_start });
        }
        if is_escaped_newline(self.bytes, body_start, i) {
            self.builder.push_escaped_newline(i);
            Ok(State::Text { body_start })
        } else {
            self.builder.end_text(self.bytes)?;
            Ok(State::Global)
        }
    }

    fn comment(&mut self, opened_at: usize) -> Result<State> {
        let closer = self.bytes[self.cursor..]
            .windows(2)
            .position(|pair| pair == [STAR, F_SLASH])
            .ok_or_else(|| LtfError::format(self.bytes, opened_at, "unterminated comment"))?;
        self.cursor += closer + 2;
        Ok(State::Global)
    }
}

/// Skips a UTF-8 BOM; any other BOM means the file is not UTF-8.
fn skip_byte_order_mark(bytes: &[u8]) -> Result<usize> {
    match encoding_rs::Encoding::for_bom(bytes) {
        Some((encoding, len)) if encoding == encoding_rs::UTF_8 => Ok(len),
        Some((encoding, _)) => Err(LtfError::format(
            bytes,
            0,
            format!("LTF files must be UTF-8, found a {} byte order mark", encoding.name()),
        )),
        None => Ok(0),
    }
}

fn memchr_newline(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == b'\n').map(|offset| from + offset)
}

fn trim_span(bytes: &[u8], mut start: usize, mut end: usize) -> (usize, usize) {
    while start < end && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    while end > start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    (start, end)
}

/// A newline at `newline` is escaped when the byte before it (ignoring one
/// `\r`) is a backslash inside the body.
fn is_escaped_newline(bytes: &[u8], body_start: usize, newline: usize) -> bool {
    let mut before = newline;
    if before > body_start && bytes[before - 1] == b'\r' {
        before -= 1;
    }
    before > body_start && bytes[before - 1] == B_SLASH
}
