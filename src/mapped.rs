// SPDX-License-Identifier: PMPL-1.0-or-later

//! Read-only memory-mapped file source.
//!
//! Lifecycle is `Closed -> Opened -> Mapped -> Closed`. The byte view lives
//! exactly as long as the mapped state; dropping the source releases the
//! mapping and the file handle on every exit path.

use crate::error::{LtfError, Result};
use memmap2::Mmap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    #[default]
    Read,
    Write,
    ReadWrite,
}

#[derive(Debug, Default)]
enum SourceState {
    #[default]
    Closed,
    Opened(File),
    Mapped { file: File, map: Mmap },
}

#[derive(Debug, Default)]
pub struct MappedFile {
    path: Option<PathBuf>,
    mode: FileMode,
    state: SourceState,
}

impl MappedFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `path`. In read mode the file must exist and be non-empty.
    pub fn open(&mut self, path: &Path, mode: FileMode) -> Result<()> {
        if !matches!(self.state, SourceState::Closed) {
            return Err(LtfError::io(format!(
                "{} is already open; close it before reopening",
                self.display_path()
            )));
        }

        let mut options = OpenOptions::new();
        match mode {
            FileMode::Read => options.read(true),
            FileMode::Write => options.write(true).create(true).truncate(false),
            FileMode::ReadWrite => options.read(true).write(true).create(true).truncate(false),
        };
        let file = options
            .open(path)
            .map_err(|err| LtfError::io(format!("opening {}: {}", path.display(), err)))?;

        if mode == FileMode::Read {
            let len = file
                .metadata()
                .map_err(|err| LtfError::io(format!("reading metadata of {}: {}", path.display(), err)))?
                .len();
            if len == 0 {
                return Err(LtfError::io(format!("{} is empty", path.display())));
            }
        }

        debug!(path = %path.display(), ?mode, "opened file");
        self.path = Some(path.to_path_buf());
        self.mode = mode;
        self.state = SourceState::Opened(file);
        Ok(())
    }

    /// Maps the whole opened file read-only. Mapping an already mapped
    /// source is a no-op.
    pub fn map(&mut self) -> Result<()> {
        let file = match std::mem::take(&mut self.state) {
            SourceState::Opened(file) => file,
            mapped @ SourceState::Mapped { .. } => {
                self.state = mapped;
                return Ok(());
            }
            SourceState::Closed => return Err(LtfError::io("cannot map a file that is not open")),
        };

        let len = match file.metadata() {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                let message = format!("reading metadata of {}: {}", self.display_path(), err);
                self.state = SourceState::Opened(file);
                return Err(LtfError::io(message));
            }
        };
        if len == 0 {
            self.state = SourceState::Opened(file);
            return Err(LtfError::io(format!(
                "cannot map empty file {}",
                self.display_path()
            )));
        }

        // SAFETY: the map is read-only and lives no longer than `file`.
        // Truncating the file from another process while it is mapped is
        // outside what this type can guard against.
        match unsafe { Mmap::map(&file) } {
            Ok(map) => {
                debug!(path = %self.display_path(), bytes = map.len(), "mapped file");
                self.state = SourceState::Mapped { file, map };
                Ok(())
            }
            Err(err) => {
                let message = format!("mapping {}: {}", self.display_path(), err);
                self.state = SourceState::Opened(file);
                Err(LtfError::io(message))
            }
        }
    }

    /// Unmaps (if mapped) and releases the handle. Closing a closed source
    /// succeeds.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::take(&mut self.state) {
            SourceState::Closed => {}
            SourceState::Opened(file) => drop(file),
            SourceState::Mapped { file, map } => {
                drop(map);
                drop(file);
            }
        }
        if let Some(path) = &self.path {
            debug!(path = %path.display(), "closed file");
        }
        Ok(())
    }

    /// The mapped bytes, without copying.
    pub fn content(&self) -> Result<&[u8]> {
        match &self.state {
            SourceState::Mapped { map, .. } => Ok(&map[..]),
            _ => Err(LtfError::io(format!(
                "{} is not mapped",
                self.display_path()
            ))),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, SourceState::Closed)
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.state, SourceState::Mapped { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    fn display_path(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<no file>".to_string())
    }
}
