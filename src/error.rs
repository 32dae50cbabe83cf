// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error taxonomy shared by the file source, the parser and the queries.

use thiserror::Error;

/// Errors raised while opening, parsing or querying LTF files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LtfError {
    /// File missing or unreadable, empty file, mapping or close failure.
    #[error("io error: {0}")]
    Io(String),
    /// Malformed input. Parsing stops at the first one.
    #[error("format error at byte {position} (line {line}, found {found}): {message}")]
    Format {
        /// Byte offset of the offending input.
        position: usize,
        /// 1-based line containing `position`.
        line: usize,
        /// The offending byte, escaped, or `end of input`.
        found: String,
        message: String,
    },
    /// Id, language or variant absent from a completed document.
    #[error("lookup error: {0}")]
    Lookup(String),
}

impl LtfError {
    pub(crate) fn io(message: impl Into<String>) -> Self {
        LtfError::Io(message.into())
    }

    pub(crate) fn lookup(message: impl Into<String>) -> Self {
        LtfError::Lookup(message.into())
    }

    /// Builds a format error for `bytes[position]`, or end of input when
    /// `position` is past the end.
    pub(crate) fn format(bytes: &[u8], position: usize, message: impl Into<String>) -> Self {
        let found = match bytes.get(position) {
            Some(byte) => format!("'{}'", byte.escape_ascii()),
            None => "end of input".to_string(),
        };
        let scanned = &bytes[..position.min(bytes.len())];
        let line = scanned.iter().filter(|&&b| b == b'\n').count() + 1;
        LtfError::Format {
            position,
            line,
            found,
            message: message.into(),
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, LtfError::Format { .. })
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, LtfError::Lookup(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, LtfError::Io(_))
    }

    /// Byte position of a format error.
    pub fn position(&self) -> Option<usize> {
        match self {
            LtfError::Format { position, .. } => Some(*position),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LtfError>;
