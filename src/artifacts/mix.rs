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

//! The `Mix` artifact: one trustee's re-encryption shuffle of the
//! previous element of the mix chain, plus its shuffle proof.
//!
//! On-wire encoding is newline-delimited flat text: one line of JSON
//! for the output ciphertexts, one line of JSON for the proof. Hashing walks the
//! same two lines in the same order whether writing or reading, so
//! `hash(write(x)) == hash(read(write(x)))`.

use super::signable::Statement;
use crate::envelope::hash::{hex_encode, Sha512Digest};
use mixlib::{Ciphertext, ShuffleProof};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct MixError(#[from] MixErrorImpl);

#[derive(Error, Debug)]
pub(crate) enum MixErrorImpl {
    #[error("failed to canonicalize mix field to JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to compute mix hash")]
    Hash(#[from] crate::envelope::HashError),
    #[error("malformed flat-text mix encoding: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mix {
    pub ciphertexts: Vec<Ciphertext>,
    pub proof: ShuffleProof,
}

impl Mix {
    /// Flat-text encode: one JSON line per field, in read/write order.
    pub fn encode(&self) -> Result<String, MixError> {
        let ciphertexts_line = serde_json::to_string(&self.ciphertexts).map_err(MixErrorImpl::from)?;
        let proof_line = serde_json::to_string(&self.proof).map_err(MixErrorImpl::from)?;
        Ok(format!("{ciphertexts_line}\n{proof_line}\n"))
    }

    /// Inverse of [`Mix::encode`].
    pub fn decode(text: &str) -> Result<Self, MixError> {
        let mut lines = text.lines();
        let ciphertexts_line = lines
            .next()
            .ok_or_else(|| MixErrorImpl::Malformed("missing ciphertexts line".to_string()))?;
        let proof_line = lines
            .next()
            .ok_or_else(|| MixErrorImpl::Malformed("missing proof line".to_string()))?;
        let ciphertexts = serde_json::from_str(ciphertexts_line).map_err(MixErrorImpl::from)?;
        let proof = serde_json::from_str(proof_line).map_err(MixErrorImpl::from)?;
        Ok(Mix { ciphertexts, proof })
    }

    /// Hash of the flat-text encoding, computed by streaming the same two lines a
    /// reader would consume.
    pub fn hash(&self) -> Result<String, MixError> {
        let ciphertexts_line = serde_json::to_string(&self.ciphertexts).map_err(MixErrorImpl::from)?;
        let proof_line = serde_json::to_string(&self.proof).map_err(MixErrorImpl::from)?;
        let mut digest = Sha512Digest::new().map_err(MixErrorImpl::from)?;
        digest.update_line(&ciphertexts_line).map_err(MixErrorImpl::from)?;
        digest.update_line(&proof_line).map_err(MixErrorImpl::from)?;
        Ok(hex_encode(digest.finish().map_err(MixErrorImpl::from)?))
    }

    pub fn statement(
        &self,
        parent_hash: &str,
        config_hash: &str,
        item: usize,
        auth: usize,
    ) -> Result<MixStatement, MixError> {
        Ok(MixStatement {
            mix_hash: self.hash()?,
            parent_hash: parent_hash.to_string(),
            config_hash: config_hash.to_string(),
            item,
            auth,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixStatement {
    pub mix_hash: String,
    pub parent_hash: String,
    pub config_hash: String,
    pub item: usize,
    pub auth: usize,
}

impl Statement for MixStatement {}

#[cfg(test)]
mod test {
    use super::*;
    use mixlib::{shuffle, GroupParams, KeyShare};
    use num_bigint_dig::BigUint;

    fn params() -> GroupParams {
        GroupParams::new(BigUint::from(23u32), BigUint::from(4u32))
    }

    fn sample_mix() -> Mix {
        let params = params();
        let share = KeyShare::generate(&params);
        let m1 = mixlib::encode_message(&params, 1).unwrap();
        let m2 = mixlib::encode_message(&params, 2).unwrap();
        let inputs = vec![
            Ciphertext::encrypt(&params, &share.public, &m1, &params.random_exponent()),
            Ciphertext::encrypt(&params, &share.public, &m2, &params.random_exponent()),
        ];
        let result = shuffle(&params, &share.public, &inputs, &[1, 0], b"item-1").unwrap();
        Mix {
            ciphertexts: result.outputs,
            proof: result.proof,
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let mix = sample_mix();
        let encoded = mix.encode().unwrap();
        let decoded = Mix::decode(&encoded).unwrap();
        assert_eq!(decoded.ciphertexts, mix.ciphertexts);
        assert_eq!(decoded.proof, mix.proof);
    }

    #[test]
    fn test_hash_matches_read_while_hashing() {
        let mix = sample_mix();
        let encoded = mix.encode().unwrap();
        let decoded = Mix::decode(&encoded).unwrap();
        assert_eq!(mix.hash().unwrap(), decoded.hash().unwrap());
    }

    #[test]
    fn test_decode_rejects_truncated_input() {
        assert!(Mix::decode("only one line").is_err());
    }

    #[test]
    fn test_statement_binds_parent_hash() {
        let mix = sample_mix();
        let stmt = mix.statement("parent-hash", "cfg-hash", 1, 1).unwrap();
        assert_eq!(stmt.parent_hash, "parent-hash");
        assert_eq!(stmt.mix_hash, mix.hash().unwrap());
    }
}
