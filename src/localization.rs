// SPDX-License-Identifier: PMPL-1.0-or-later

//! Multi-file localization manager.
//!
//! Files are keyed by file name. A file that fails to load is logged and
//! skipped; the others still load. Lookups walk the loaded files in name
//! order and try the current language before the fallback.

use crate::config::{Config, LoadMode};
use crate::error::{LtfError, Result};
use crate::i18n::{Language, LanguageTag};
use crate::ltf::{LtfFile, ParseTarget};
use rayon::prelude::*;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

pub const LTF_EXTENSION: &str = "ltf";

/// Outcome of a batch load: names that loaded, paths that did not.
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub loaded: Vec<String>,
    pub failed: Vec<(PathBuf, LtfError)>,
}

impl LoadSummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn absorb(&mut self, other: LoadSummary) {
        self.loaded.extend(other.loaded);
        self.failed.extend(other.failed);
    }
}

#[derive(Debug)]
struct LoadedFile {
    path: PathBuf,
    file: LtfFile,
}

#[derive(Debug)]
pub struct Localization {
    language: Language,
    fallback: Option<Language>,
    mode: LoadMode,
    all_languages: bool,
    files: BTreeMap<String, LoadedFile>,
}

impl Default for Localization {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Localization {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            fallback: Some(Language::English),
            mode: LoadMode::Table,
            all_languages: true,
            files: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            language: config.language,
            fallback: config.fallback_language,
            mode: config.mode,
            all_languages: config.all_languages,
            files: BTreeMap::new(),
        }
    }

    pub fn with_fallback(mut self, fallback: Option<Language>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Sets how files loaded from now on are kept. Already loaded files keep
    /// the document they were built with.
    pub fn with_mode(mut self, mode: LoadMode, all_languages: bool) -> Self {
        self.mode = mode;
        self.all_languages = all_languages;
        self
    }

    /// Languages kept in memory, or `None` for all of them. Single-language
    /// loading still keeps the fallback so lookups can reach it.
    fn kept_languages(&self) -> Option<Vec<Language>> {
        if self.all_languages {
            return None;
        }
        let mut keep = vec![self.language];
        if let Some(fallback) = self.fallback.filter(|&lang| lang != self.language) {
            keep.push(fallback);
        }
        Some(keep)
    }

    fn target(&self, keep: Option<&[Language]>) -> ParseTarget {
        let filter = match keep {
            Some(&[only]) => Some(only),
            _ => None,
        };
        match self.mode {
            LoadMode::Table => ParseTarget::Map(filter),
            LoadMode::Index => ParseTarget::Index(filter),
        }
    }

    /// Loads every file named in `config`, directories included.
    pub fn load_config(&mut self, config: &Config) -> LoadSummary {
        let mut summary = self.load_files(&config.files);
        for dir in &config.directories {
            match self.load_dir(dir) {
                Ok(loaded) => summary.absorb(loaded),
                Err(err) => {
                    error!(dir = %dir.display(), %err, "failed to scan localization directory");
                    summary.failed.push((dir.clone(), err));
                }
            }
        }
        summary
    }

    /// Loads `paths`, parsing them in parallel. Names already loaded, or
    /// repeated within `paths`, are reported as failures.
    pub fn load_files(&mut self, paths: &[PathBuf]) -> LoadSummary {
        let mut summary = LoadSummary::default();
        let mut seen: HashSet<String> = self.files.keys().cloned().collect();
        let mut pending = Vec::new();

        for path in paths {
            let Some(name) = file_name(path) else {
                summary
                    .failed
                    .push((path.clone(), LtfError::io(format!("{} has no file name", path.display()))));
                continue;
            };
            if !seen.insert(name.clone()) {
                let err = LtfError::io(format!("localization file '{}' is already loaded", name));
                error!(path = %path.display(), %err, "skipping localization file");
                summary.failed.push((path.clone(), err));
                continue;
            }
            pending.push((name, path.clone()));
        }

        let keep = self.kept_languages();
        let keep = keep.as_deref();
        let target = self.target(keep);
        let mode = self.mode;
        let parsed: Vec<_> = pending
            .into_par_iter()
            .map(|(name, path)| {
                let outcome = open_file(&path, target, keep, mode);
                (name, path, outcome)
            })
            .collect();

        for (name, path, outcome) in parsed {
            match outcome {
                Ok(file) => {
                    debug!(name = %name, entries = file.count_entries(), "loaded localization file");
                    self.files.insert(name.clone(), LoadedFile { path, file });
                    summary.loaded.push(name);
                }
                Err(err) => {
                    error!(path = %path.display(), %err, "failed to load localization file");
                    summary.failed.push((path, err));
                }
            }
        }
        summary
    }

    /// Loads every `*.ltf` file under `dir`, recursively.
    pub fn load_dir(&mut self, dir: &Path) -> Result<LoadSummary> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry
                .map_err(|err| LtfError::io(format!("scanning {}: {}", dir.display(), err)))?;
            let path = entry.path();
            let is_ltf = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(LTF_EXTENSION));
            if entry.file_type().is_file() && is_ltf {
                paths.push(path.to_path_buf());
            }
        }
        Ok(self.load_files(&paths))
    }

    /// Unloads the named files. Unknown names are returned as lookup errors.
    pub fn unload_files(&mut self, names: &[&str]) -> Vec<LtfError> {
        let mut errors = Vec::new();
        for name in names {
            match self.files.remove(*name) {
                Some(mut loaded) => {
                    if let Err(err) = loaded.file.close() {
                        errors.push(err);
                    }
                }
                None => {
                    let err = LtfError::lookup(format!(
                        "cannot unload '{}': no localization file with that name is loaded",
                        name
                    ));
                    error!(%err, "unload failed");
                    errors.push(err);
                }
            }
        }
        errors
    }

    pub fn unload_all(&mut self) {
        for (_, mut loaded) in std::mem::take(&mut self.files) {
            if let Err(err) = loaded.file.close() {
                error!(path = %loaded.path.display(), %err, "failed to close localization file");
            }
        }
    }

    pub fn loaded_count(&self) -> usize {
        self.files.len()
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn file(&self, name: &str) -> Option<&LtfFile> {
        self.files.get(name).map(|loaded| &loaded.file)
    }

    /// Raw content of a loaded file. Only index-mode files stay mapped.
    pub fn file_contents(&self, name: &str) -> Result<Cow<'_, str>> {
        let loaded = self
            .files
            .get(name)
            .ok_or_else(|| LtfError::lookup(format!("no localization file named '{}'", name)))?;
        Ok(String::from_utf8_lossy(loaded.file.content()?))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn fallback(&self) -> Option<Language> {
        self.fallback
    }

    /// Switches the current language. When only one language is kept in
    /// memory, every loaded file is rebuilt for the new one; files that fail
    /// to rebuild are unloaded and reported.
    pub fn set_language(&mut self, language: Language) -> LoadSummary {
        self.language = language;
        if self.all_languages || self.files.is_empty() {
            return LoadSummary::default();
        }

        let paths: Vec<PathBuf> = self.files.values().map(|loaded| loaded.path.clone()).collect();
        self.unload_all();
        self.load_files(&paths)
    }

    /// Text for `id` in the current language, then the fallback.
    pub fn get(&self, id: &str) -> Result<Cow<'_, str>> {
        self.lookup(id, None)
    }

    /// Text for `id` in a variant of the current language, then the
    /// fallback's same variant.
    pub fn get_variant(&self, id: &str, variant: &str) -> Result<Cow<'_, str>> {
        self.lookup(id, Some(variant))
    }

    fn lookup(&self, id: &str, variant: Option<&str>) -> Result<Cow<'_, str>> {
        let mut languages = vec![self.language];
        if let Some(fallback) = self.fallback.filter(|&lang| lang != self.language) {
            languages.push(fallback);
        }

        for language in languages {
            let tag = LanguageTag {
                language,
                variant: variant.map(str::to_string),
            };
            if let Some(text) = self
                .files
                .values()
                .find_map(|loaded| loaded.file.text(id, &tag).ok())
            {
                return Ok(text);
            }
        }

        let tag = LanguageTag {
            language: self.language,
            variant: variant.map(str::to_string),
        };
        Err(LtfError::lookup(format!(
            "no loaded file has '{}' for '{}'",
            id, tag
        )))
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Opens, parses and, in table mode, unmaps one file.
fn open_file(
    path: &Path,
    target: ParseTarget,
    keep: Option<&[Language]>,
    mode: LoadMode,
) -> Result<LtfFile> {
    let mut file = LtfFile::prepare(path)?;
    file.build(target)?;
    if let Some(keep) = keep {
        file.retain_languages(keep);
    }
    if mode == LoadMode::Table {
        file.close()?;
    }
    Ok(file)
}
