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

//! An in-process `Board` fixture: a `Mutex`-guarded map shared across `Arc` clones,
//! letting end-to-end tests run several "trustees" against one board within a
//! single test process without any transport.

use super::{Board, BoardError, LocalPreShuffleStore};
use crate::names::Name;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryBoard {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    local: LocalPreShuffleStore,
}

impl InMemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Board for InMemoryBoard {
    fn sync(&self) -> Result<(), BoardError> {
        Ok(())
    }

    fn file_set(&self) -> Result<HashSet<String>, BoardError> {
        let mut keys: HashSet<String> =
            self.entries.lock().expect("board lock poisoned").keys().cloned().collect();
        keys.extend(self.local.keys());
        Ok(keys)
    }

    fn get(&self, key: &Name) -> Result<Option<Vec<u8>>, BoardError> {
        Ok(self.entries.lock().expect("board lock poisoned").get(&key.key()).cloned())
    }

    fn put(&self, key: &Name, bytes: Vec<u8>) -> Result<(), BoardError> {
        self.entries.lock().expect("board lock poisoned").insert(key.key(), bytes);
        Ok(())
    }

    fn local_store(&self) -> &LocalPreShuffleStore {
        &self.local
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_put_then_get_roundtrips() {
        let board = InMemoryBoard::new();
        board.put(&Name::Config, b"hello".to_vec()).unwrap();
        assert_eq!(board.get(&Name::Config).unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn test_missing_key_is_none() {
        let board = InMemoryBoard::new();
        assert_eq!(board.get(&Name::Config).unwrap(), None);
    }

    #[test]
    fn test_file_set_includes_local_only_keys() {
        let board = InMemoryBoard::new();
        board.put(&Name::Config, b"x".to_vec()).unwrap();
        let local_key = Name::PermData(1, crate::ids::TrusteeId::new(1).unwrap());
        board.add_pre_shuffle_data_local(
            local_key,
            crate::artifacts::PreShuffleData::new(vec![0], vec![]),
        );
        let keys = board.file_set().unwrap();
        assert!(keys.contains("CONFIG"));
        assert!(keys.contains("PERM_DATA:1:1"));
    }

    #[test]
    fn test_add_triple_is_idempotent() {
        let board = InMemoryBoard::new();
        board
            .add_triple(
                Name::Config,
                b"payload".to_vec(),
                Name::ConfigStmt,
                b"stmt".to_vec(),
                Name::ConfigSig(crate::ids::TrusteeId::new(1).unwrap()),
                b"sig".to_vec(),
            )
            .unwrap();
        board
            .add_triple(
                Name::Config,
                b"other-payload".to_vec(),
                Name::ConfigStmt,
                b"other-stmt".to_vec(),
                Name::ConfigSig(crate::ids::TrusteeId::new(1).unwrap()),
                b"other-sig".to_vec(),
            )
            .unwrap();
        assert_eq!(board.get(&Name::Config).unwrap(), Some(b"payload".to_vec()));
    }
}
