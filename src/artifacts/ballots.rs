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

//! The `Ballots` artifact: the ordered list of ElGamal ciphertexts
//! delivered by the ballotbox for one item.

use super::signable::Statement;
use crate::envelope::{hex_encode, sha512};
use mixlib::Ciphertext;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct BallotsError(#[from] BallotsErrorImpl);

#[derive(Error, Debug)]
pub(crate) enum BallotsErrorImpl {
    #[error("failed to canonicalize ballots to JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to compute ballots hash")]
    Hash(#[from] crate::envelope::HashError),
    #[error("ballots payload is malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ballots {
    pub ciphertexts: Vec<Ciphertext>,
}

impl Ballots {
    /// Parse ballots from their on-wire JSON-array encoding, surfacing malformed
    /// entries as an `Error` rather than panicking: when ballots are malformed, the
    /// trustee that notices posts `ERROR(self)` instead of crashing.
    pub fn parse(json: &[u8]) -> Result<Self, BallotsError> {
        serde_json::from_slice(json)
            .map_err(|e| BallotsErrorImpl::Malformed(e.to_string()).into())
    }

    pub fn statement(&self, config_hash: &str, item: usize) -> Result<BallotsStatement, BallotsError> {
        let bytes = crate::envelope::canonical_json(self).map_err(BallotsErrorImpl::from)?;
        let hash = sha512(&bytes).map_err(BallotsErrorImpl::from)?;
        Ok(BallotsStatement {
            ballots_hash: hex_encode(hash),
            config_hash: config_hash.to_string(),
            item,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotsStatement {
    pub ballots_hash: String,
    pub config_hash: String,
    pub item: usize,
}

impl Statement for BallotsStatement {}
