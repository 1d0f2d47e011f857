// Copyright © 2025 Denis Morel
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option) any
// later version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License and
// a copy of the GNU General Public License along with this program. If not, see
// <https://www.gnu.org/licenses/>.

//! A filesystem-backed local mirror of one board section, rooted at `dataStorePath`.
//! Each key becomes one file directly under the root directory;
//! `sync()` is a no-op here because pulling from the remote transport (a git server)
//! is an external collaborator this core does not implement —
//! `FileBoard` models the *local* half of the git-backed board, the half the core
//! actually reads and writes against.

use super::{Board, BoardError, BoardErrorImpl, LocalPreShuffleStore};
use crate::names::Name;
use std::collections::HashSet;
use std::path::PathBuf;

pub struct FileBoard {
    root: PathBuf,
    local: LocalPreShuffleStore,
}

impl FileBoard {
    pub fn new(root: PathBuf) -> Result<Self, BoardError> {
        std::fs::create_dir_all(&root).map_err(BoardErrorImpl::from)?;
        Ok(Self {
            root,
            local: LocalPreShuffleStore::default(),
        })
    }

    fn path_for(&self, key: &Name) -> PathBuf {
        self.root.join(key.key())
    }
}

impl Board for FileBoard {
    /// No-op: the remote git transport is an external collaborator;
    /// `FileBoard` only ever reflects what has already landed locally.
    fn sync(&self) -> Result<(), BoardError> {
        Ok(())
    }

    fn file_set(&self) -> Result<HashSet<String>, BoardError> {
        let mut keys = HashSet::new();
        for entry in std::fs::read_dir(&self.root).map_err(BoardErrorImpl::from)? {
            let entry = entry.map_err(BoardErrorImpl::from)?;
            if let Some(name) = entry.file_name().to_str() {
                keys.insert(name.to_string());
            }
        }
        keys.extend(self.local.keys());
        Ok(keys)
    }

    fn get(&self, key: &Name) -> Result<Option<Vec<u8>>, BoardError> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(&path).map_err(BoardErrorImpl::from)?))
    }

    fn put(&self, key: &Name, bytes: Vec<u8>) -> Result<(), BoardError> {
        std::fs::write(self.path_for(key), bytes).map_err(|e| BoardErrorImpl::from(e).into())
    }

    fn local_store(&self) -> &LocalPreShuffleStore {
        &self.local
    }
}
