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

//! The `PartialDecryption` artifact: one trustee's contribution to
//! jointly decrypting the final mix's ciphertexts, with a Sigma proof per entry,
//! bound to the hash of the final mix.

use super::signable::Statement;
use crate::envelope::hash::{hex_encode, Sha512Digest};
use mixlib::DecryptionProof;
use num_bigint_dig::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct PartialDecryptionError(#[from] PartialDecryptionErrorImpl);

#[derive(Error, Debug)]
pub(crate) enum PartialDecryptionErrorImpl {
    #[error("failed to canonicalize partial decryption field to JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to compute partial decryption hash")]
    Hash(#[from] crate::envelope::HashError),
    #[error("malformed flat-text partial decryption encoding: {0}")]
    Malformed(String),
    #[error("partial decryption has {parts} parts but {proofs} proofs")]
    LengthMismatch { parts: usize, proofs: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialDecryption {
    pub parts: Vec<BigUint>,
    pub proofs: Vec<DecryptionProof>,
}

impl PartialDecryption {
    pub fn new(parts: Vec<BigUint>, proofs: Vec<DecryptionProof>) -> Result<Self, PartialDecryptionError> {
        if parts.len() != proofs.len() {
            return Err(PartialDecryptionErrorImpl::LengthMismatch {
                parts: parts.len(),
                proofs: proofs.len(),
            }
            .into());
        }
        Ok(PartialDecryption { parts, proofs })
    }

    pub fn encode(&self) -> Result<String, PartialDecryptionError> {
        let parts_line = serde_json::to_string(&self.parts).map_err(PartialDecryptionErrorImpl::from)?;
        let proofs_line = serde_json::to_string(&self.proofs).map_err(PartialDecryptionErrorImpl::from)?;
        Ok(format!("{parts_line}\n{proofs_line}\n"))
    }

    pub fn decode(text: &str) -> Result<Self, PartialDecryptionError> {
        let mut lines = text.lines();
        let parts_line = lines
            .next()
            .ok_or_else(|| PartialDecryptionErrorImpl::Malformed("missing parts line".to_string()))?;
        let proofs_line = lines
            .next()
            .ok_or_else(|| PartialDecryptionErrorImpl::Malformed("missing proofs line".to_string()))?;
        let parts = serde_json::from_str(parts_line).map_err(PartialDecryptionErrorImpl::from)?;
        let proofs = serde_json::from_str(proofs_line).map_err(PartialDecryptionErrorImpl::from)?;
        Self::new(parts, proofs)
    }

    pub fn hash(&self) -> Result<String, PartialDecryptionError> {
        let parts_line = serde_json::to_string(&self.parts).map_err(PartialDecryptionErrorImpl::from)?;
        let proofs_line = serde_json::to_string(&self.proofs).map_err(PartialDecryptionErrorImpl::from)?;
        let mut digest = Sha512Digest::new().map_err(PartialDecryptionErrorImpl::from)?;
        digest
            .update_line(&parts_line)
            .map_err(PartialDecryptionErrorImpl::from)?;
        digest
            .update_line(&proofs_line)
            .map_err(PartialDecryptionErrorImpl::from)?;
        Ok(hex_encode(
            digest.finish().map_err(PartialDecryptionErrorImpl::from)?,
        ))
    }

    pub fn statement(
        &self,
        mix_hash: &str,
        config_hash: &str,
        item: usize,
    ) -> Result<DecryptionStatement, PartialDecryptionError> {
        Ok(DecryptionStatement {
            decryption_hash: self.hash()?,
            mix_hash: mix_hash.to_string(),
            config_hash: config_hash.to_string(),
            item,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionStatement {
    pub decryption_hash: String,
    pub mix_hash: String,
    pub config_hash: String,
    pub item: usize,
}

impl Statement for DecryptionStatement {}

#[cfg(test)]
mod test {
    use super::*;
    use mixlib::{Ciphertext, GroupParams, KeyShare};

    fn params() -> GroupParams {
        GroupParams::new(BigUint::from(23u32), BigUint::from(4u32))
    }

    fn sample() -> PartialDecryption {
        let params = params();
        let share = KeyShare::generate(&params);
        let m = mixlib::encode_message(&params, 2).unwrap();
        let ct = Ciphertext::encrypt(&params, &share.public, &m, &params.random_exponent());
        let part = ct.partial_decrypt(&params, &share.secret);
        let proof = DecryptionProof::generate(&params, &share.secret, &share.public, &ct.a, &part, b"item-1:0");
        PartialDecryption::new(vec![part], vec![proof]).unwrap()
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(PartialDecryption::new(vec![BigUint::from(1u32)], vec![]).is_err());
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let pd = sample();
        let decoded = PartialDecryption::decode(&pd.encode().unwrap()).unwrap();
        assert_eq!(decoded.parts, pd.parts);
        assert_eq!(decoded.proofs, pd.proofs);
    }

    #[test]
    fn test_hash_matches_after_roundtrip() {
        let pd = sample();
        let decoded = PartialDecryption::decode(&pd.encode().unwrap()).unwrap();
        assert_eq!(pd.hash().unwrap(), decoded.hash().unwrap());
    }
}
