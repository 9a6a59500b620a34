// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Progress persistence.
//!
//! Octogit keeps learner progress in a small key-value __storage__ that
//! belongs to the current user. The progress record is written as a JSON
//! object under one fixed key, [`PROGRESS_KEY`]:
//!
//! ```json
//! {"completedCommands":["git init"],"level":1,"experience":10}
//! ```
//!
//! # Storage Layout
//!
//! The default storage is [`FileStorage`], which maps each key to a file
//! named `<key>.json` inside the data directory, i.e.,
//! `$XDG_DATA_HOME/octogit/gitProgress.json`. The data directory is created
//! on first write.
//!
//! # Recovery
//!
//! Loading never fails. A missing, unreadable, or malformed record is
//! treated as absent, and the default progress is returned instead. There is
//! no locking, so two processes writing at once simply race, and the last
//! write wins.

use crate::progress::Progress;

use std::{
    cell::RefCell,
    collections::HashMap,
    fs::{read_to_string, write},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

/// Fixed storage key of the progress record.
pub const PROGRESS_KEY: &str = "gitProgress";

/// Raw key-value storage.
pub trait Storage {
    /// Read value of target key.
    ///
    /// Returns `None` if key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write value to target key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Storage that keeps one file per key in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    /// Construct new file storage rooted at target directory.
    ///
    /// Does not touch the file system until the first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory holding the storage files.
    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_path()
    }

    /// Path of the file backing target key.
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    #[instrument(skip(self), level = "debug")]
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no value stored at {:?}", path.display());
                Ok(None)
            }
            Err(err) => Err(StoreError::Read { source: err, path }),
        }
    }

    #[instrument(skip(self, value), level = "debug")]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        // INVARIANT: Data directory must exist before writing to it.
        mkdirp::mkdirp(&self.data_dir).map_err(|err| StoreError::CreateDataDir {
            source: err,
            path: self.data_dir.clone(),
        })?;

        let path = self.key_path(key);
        write(&path, value.as_bytes()).map_err(|err| StoreError::Write { source: err, path })
    }
}

/// Storage living in memory only.
///
/// Useful as a stand-in for [`FileStorage`] in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Construct new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct memory storage holding one raw entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::default();
        storage
            .entries
            .borrow_mut()
            .insert(key.into(), value.into());
        storage
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Load and save learner progress through a storage.
#[derive(Debug)]
pub struct ProgressStore<S = FileStorage>
where
    S: Storage,
{
    storage: S,
}

impl<S> ProgressStore<S>
where
    S: Storage,
{
    /// Construct new progress store on top of target storage.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Access underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load persisted progress.
    ///
    /// Falls back to [`Progress::default`] if nothing was saved yet, or if the
    /// saved record cannot be read or does not have the expected shape.
    #[instrument(skip(self), level = "debug")]
    pub fn load(&self) -> Progress {
        let raw = match self.storage.get(PROGRESS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no saved progress, start from scratch");
                return Progress::default();
            }
            Err(error) => {
                warn!("cannot read saved progress, start from scratch: {error}");
                return Progress::default();
            }
        };

        match serde_json::from_str::<Progress>(&raw) {
            Ok(progress) => progress,
            Err(error) => {
                warn!("saved progress is malformed, start from scratch: {error}");
                Progress::default()
            }
        }
    }

    /// Save progress, overwriting any previously saved progress.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Serialize`] if progress cannot be serialized.
    /// - Return [`StoreError::CreateDataDir`] or [`StoreError::Write`] if the
    ///   storage cannot be written to.
    #[instrument(skip(self, progress), level = "debug")]
    pub fn save(&self, progress: &Progress) -> Result<()> {
        let raw = serde_json::to_string(progress)?;
        self.storage.set(PROGRESS_KEY, &raw)?;
        info!(
            "saved progress: {} commands, {} xp",
            progress.completed_count(),
            progress.experience
        );

        Ok(())
    }
}

/// Progress storage error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Data directory cannot be created.
    #[error("failed to create data directory at {:?}", path.display())]
    CreateDataDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Stored value cannot be read.
    #[error("failed to read stored value at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Stored value cannot be written.
    #[error("failed to write stored value at {:?}", path.display())]
    Write {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Progress cannot be serialized.
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Friendly result alias :3
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
