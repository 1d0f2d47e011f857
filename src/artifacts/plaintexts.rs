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

//! The `Plaintexts` artifact: the decoded messages for one item,
//! produced by the elected decryptor and co-signed by every trustee.

use super::signable::Statement;
use crate::envelope::hash::{hex_encode, sha512, Sha512Digest};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct PlaintextsError(#[from] PlaintextsErrorImpl);

#[derive(Error, Debug)]
enum PlaintextsErrorImpl {
    #[error("failed to canonicalize plaintexts to JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to compute plaintexts hash")]
    Hash(#[from] crate::envelope::HashError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plaintexts {
    pub messages: Vec<u64>,
}

impl Plaintexts {
    pub fn decryptions_hash(decryption_hashes: &[String]) -> Result<String, PlaintextsError> {
        let mut digest = Sha512Digest::new().map_err(PlaintextsErrorImpl::from)?;
        for h in decryption_hashes {
            digest.update_line(h).map_err(PlaintextsErrorImpl::from)?;
        }
        Ok(hex_encode(
            digest.finish().map_err(PlaintextsErrorImpl::from)?,
        ))
    }

    pub fn statement(
        &self,
        decryptions_hash: &str,
        config_hash: &str,
        item: usize,
    ) -> Result<PlaintextsStatement, PlaintextsError> {
        let bytes = crate::envelope::canonical_json(self).map_err(PlaintextsErrorImpl::from)?;
        let hash = sha512(&bytes).map_err(PlaintextsErrorImpl::from)?;
        Ok(PlaintextsStatement {
            plaintexts_hash: hex_encode(hash),
            decryptions_hash: decryptions_hash.to_string(),
            config_hash: config_hash.to_string(),
            item,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextsStatement {
    pub plaintexts_hash: String,
    pub decryptions_hash: String,
    pub config_hash: String,
    pub item: usize,
}

impl Statement for PlaintextsStatement {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decryptions_hash_order_sensitive() {
        let h1 = Plaintexts::decryptions_hash(&["a".to_string(), "b".to_string()]).unwrap();
        let h2 = Plaintexts::decryptions_hash(&["b".to_string(), "a".to_string()]).unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_statement_is_deterministic() {
        let p = Plaintexts {
            messages: vec![1, 2, 3],
        };
        let dh = Plaintexts::decryptions_hash(&["h1".to_string()]).unwrap();
        let s1 = p.statement(&dh, "cfg", 1).unwrap();
        let s2 = p.statement(&dh, "cfg", 1).unwrap();
        assert_eq!(s1, s2);
    }
}
