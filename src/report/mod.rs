// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialisable document dumps and terminal summaries

pub mod formatter;
pub mod output;

use crate::error::Result;
use crate::ltf::{Document, DocumentKind, LtfFile};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use formatter::ReportFormatter;
pub use output::ReportOutputFormat;

/// Snapshot of one parsed file: every id with its decoded text per tag.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub file: Option<PathBuf>,
    pub kind: Option<DocumentKind>,
    pub generated_at: String,
    pub entry_count: usize,
    pub entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl DocumentReport {
    /// Decodes every entry of `file`'s document. Index documents are
    /// sliced from the mapped source.
    pub fn from_file(file: &LtfFile) -> Result<Self> {
        let mut entries = BTreeMap::new();
        match file.document() {
            Document::Empty => {}
            Document::Table(table) => {
                for (id, langs) in table.iter() {
                    let texts = langs
                        .iter()
                        .map(|(tag, text)| (tag.to_string(), text.clone()))
                        .collect();
                    entries.insert(id.to_string(), texts);
                }
            }
            Document::Index(index) => {
                for (id, langs) in index.iter() {
                    let mut texts = BTreeMap::new();
                    for (tag, range) in langs {
                        texts.insert(tag.to_string(), file.slice_from_source(*range)?.into_owned());
                    }
                    entries.insert(id.to_string(), texts);
                }
            }
        }

        Ok(Self {
            file: file.path().map(PathBuf::from),
            kind: file.document().kind(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            entry_count: entries.len(),
            entries,
        })
    }
}

/// Outcome of checking one file.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub file: PathBuf,
    pub entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Prepares and fully parses `path`, reporting instead of failing.
pub fn check_file(path: &std::path::Path) -> CheckResult {
    let outcome = LtfFile::prepare(path).and_then(|mut file| {
        file.create_map_all()?;
        Ok(file.count_entries())
    });
    match outcome {
        Ok(entries) => CheckResult {
            file: path.to_path_buf(),
            entries,
            error: None,
        },
        Err(err) => CheckResult {
            file: path.to_path_buf(),
            entries: 0,
            error: Some(err.to_string()),
        },
    }
}
