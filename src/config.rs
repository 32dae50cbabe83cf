// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the localization manager and the `ltf` CLI.
//!
//! Loaded from JSON or YAML depending on the file extension. Missing keys
//! take their defaults, so an empty file is a valid configuration.

use crate::i18n::Language;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "ltf.yaml";

/// How loaded files are kept in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Owned text; the file is unmapped as soon as it is parsed.
    #[default]
    Table,
    /// Byte offsets; the file stays mapped while it is loaded.
    Index,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Language lookups use first.
    pub language: Language,
    /// Language tried when the current one has no text.
    pub fallback_language: Option<Language>,
    pub mode: LoadMode,
    /// Keep every language in memory instead of only the current one.
    pub all_languages: bool,
    /// LTF files to load.
    pub files: Vec<PathBuf>,
    /// Directories searched recursively for `*.ltf` files.
    pub directories: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::English,
            fallback_language: Some(Language::English),
            mode: LoadMode::Table,
            all_languages: true,
            files: Vec::new(),
            directories: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        load_json_or_yaml(path)
    }

    /// Loads `path` if given, else `ltf.yaml` when it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Resolves relative file and directory entries against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in self.files.iter_mut().chain(self.directories.iter_mut()) {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

fn load_json_or_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str::<T>(&raw).with_context(|| format!("parsing {}", path.display()))
        }
        _ => serde_json::from_str::<T>(&raw).with_context(|| format!("parsing {}", path.display())),
    }
}
