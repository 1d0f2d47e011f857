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

//! The abstract append-only board interface. The concrete
//! (git-backed) implementation is an external collaborator outside this core's
//! scope; what lives here is the abstract interface plus two implementations
//! useful within the core: a filesystem-backed local mirror (`FileBoard`) and an
//! in-process fixture (`InMemoryBoard`) for end-to-end tests.

pub mod file;
pub mod memory;

pub use file::FileBoard;
pub use memory::InMemoryBoard;

use crate::artifacts::PreShuffleData;
use crate::consts::DEFAULT_BOARD_PUSH_RETRIES;
use crate::ids::TrusteeId;
use crate::names::Name;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct BoardError(#[from] BoardErrorImpl);

#[derive(Error, Debug)]
pub(crate) enum BoardErrorImpl {
    #[error("I/O error accessing board storage")]
    Io(#[from] std::io::Error),
    #[error("board push for {0} did not land within {DEFAULT_BOARD_PUSH_RETRIES} attempts")]
    RetriesExhausted(String),
}

/// Process-local map of in-flight `PreShuffleData`, the only mutable process-wide
/// state in the core, guarded by a mutex.
#[derive(Default)]
pub struct LocalPreShuffleStore(Mutex<HashMap<String, PreShuffleData>>);

impl LocalPreShuffleStore {
    pub fn add(&self, key: Name, data: PreShuffleData) {
        self.0.lock().expect("pre-shuffle store lock poisoned").insert(key.key(), data);
    }

    pub fn get(&self, key: &Name) -> Option<PreShuffleData> {
        self.0
            .lock()
            .expect("pre-shuffle store lock poisoned")
            .get(&key.key())
            .cloned()
    }

    pub fn remove(&self, key: &Name) {
        self.0.lock().expect("pre-shuffle store lock poisoned").remove(&key.key());
    }

    pub fn keys(&self) -> HashSet<String> {
        self.0
            .lock()
            .expect("pre-shuffle store lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

/// Abstract operations the core consumes. `get`/`put` are keyed by the
/// stable string produced by [`Name`]; per-artifact-kind typing lives one layer up, in
/// `crate::actions`, which knows how to serialize/deserialize each payload.
pub trait Board: Send + Sync {
    /// Atomically refresh the local view from the remote, discarding unpushed
    /// changes — the core is idempotent, so on crash/restart there is nothing worth
    /// keeping.
    fn sync(&self) -> Result<(), BoardError>;

    /// All keys present, including local-only `PreShuffleData` keys.
    fn file_set(&self) -> Result<HashSet<String>, BoardError>;

    fn get(&self, key: &Name) -> Result<Option<Vec<u8>>, BoardError>;

    fn put(&self, key: &Name, bytes: Vec<u8>) -> Result<(), BoardError>;

    fn local_store(&self) -> &LocalPreShuffleStore;

    /// Atomic publication of a (payload, statement, signature) triple:
    /// syncs before pushing, and is itself idempotent — if `payload_key` already
    /// exists after a sync (another trustee, or a retried call, won the race) this is
    /// a no-op success rather than a duplicate write.
    fn add_triple(
        &self,
        payload_key: Name,
        payload: Vec<u8>,
        stmt_key: Name,
        stmt: Vec<u8>,
        sig_key: Name,
        sig: Vec<u8>,
    ) -> Result<(), BoardError> {
        for _ in 0..DEFAULT_BOARD_PUSH_RETRIES {
            self.sync()?;
            if self.get(&payload_key)?.is_some() {
                return Ok(());
            }
            if self.put(&payload_key, payload.clone()).is_err() {
                continue;
            }
            if self.put(&stmt_key, stmt.clone()).is_err() {
                continue;
            }
            if self.put(&sig_key, sig.clone()).is_err() {
                continue;
            }
            return Ok(());
        }
        Err(BoardErrorImpl::RetriesExhausted(payload_key.key()).into())
    }

    /// Append a co-signature to an existing artifact (`VerifyMix`,
    /// `AddOrSignPublicKey`, …): unlike [`Board::add_triple`] there is no payload to
    /// race on, just the signature key itself.
    fn add_signature(&self, sig_key: Name, sig: Vec<u8>) -> Result<(), BoardError> {
        self.sync()?;
        if self.get(&sig_key)?.is_some() {
            return Ok(());
        }
        self.put(&sig_key, sig)
    }

    fn add_error(&self, auth: TrusteeId, message: &str) -> Result<(), BoardError> {
        self.put(&Name::ErrorFor(auth), message.as_bytes().to_vec())
    }

    fn add_pre_shuffle_data_local(&self, key: Name, data: PreShuffleData) {
        self.local_store().add(key, data);
    }

    fn get_pre_shuffle_data_local(&self, key: &Name) -> Option<PreShuffleData> {
        self.local_store().get(key)
    }

    fn rm_pre_shuffle_data_local(&self, key: &Name) {
        self.local_store().remove(key);
    }
}
