// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT


use anyhow::Result;
use octogit::{
    catalog::Catalog,
    clipboard::MemoryClipboard,
    session::Session,
    store::{FileStorage, ProgressStore, PROGRESS_KEY},
};
use std::{fs::write, path::PathBuf};
use tempfile::TempDir;

/// Data directory living for the duration of a test.
pub(crate) struct DataDirFixture {
    dir: TempDir,
}

impl DataDirFixture {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Nested path that does not exist yet.
    pub(crate) fn data_dir(&self) -> PathBuf {
        self.dir.path().join("share").join("octogit")
    }

    pub(crate) fn store(&self) -> ProgressStore<FileStorage> {
        ProgressStore::new(FileStorage::new(self.data_dir()))
    }

    pub(crate) fn session(&self) -> Result<Session<FileStorage, MemoryClipboard>> {
        Ok(Session::new(
            Catalog::builtin()?,
            self.store(),
            MemoryClipboard::new(),
        ))
    }

    /// Plant raw content as saved progress.
    pub(crate) fn plant_progress(&self, content: impl AsRef<str>) -> Result<()> {
        mkdirp::mkdirp(self.data_dir())?;
        write(
            FileStorage::new(self.data_dir()).key_path(PROGRESS_KEY),
            content.as_ref(),
        )?;
        Ok(())
    }
}
