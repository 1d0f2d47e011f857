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

//! The `Share` artifact: a trustee's ElGamal public-share with its
//! Schnorr proof of knowledge, plus the AES-wrapped private share.

use super::signable::Statement;
use crate::envelope::{hex_encode, sha512, AesKey};
use mixlib::SchnorrProof;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ShareError(#[from] ShareErrorImpl);

#[derive(Error, Debug)]
pub(crate) enum ShareErrorImpl {
    #[error("failed to canonicalize share to JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to compute share hash")]
    Hash(#[from] crate::envelope::HashError),
    #[error("failed to AES-wrap the private share")]
    Aes(#[from] crate::envelope::AesError),
}

/// The public half of a `Share`, published on the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share {
    pub public: String,
    pub pok: SchnorrProof,
    /// Base64-in-JSON ciphertext of the AES-wrapped private exponent: a pair
    /// (ciphertext, IV), each base64 where embedded in JSON.
    pub wrapped_private_b64: String,
    pub iv_b64: String,
}

impl Share {
    /// Wrap a freshly generated private exponent under the trustee's AES master
    /// key and build the public `Share` record.
    pub fn wrap(
        public: &str,
        pok: SchnorrProof,
        private_decimal: &str,
        aes_key: &AesKey,
    ) -> Result<Self, ShareError> {
        let (ciphertext, iv) = aes_key
            .encrypt(private_decimal.as_bytes())
            .map_err(ShareErrorImpl::from)?;
        Ok(Share {
            public: public.to_string(),
            pok,
            wrapped_private_b64: base64_encode(&ciphertext),
            iv_b64: base64_encode(&iv),
        })
    }

    /// AES-unwrap the private exponent, as `AddDecryption` does with its own share.
    pub fn unwrap_private(&self, aes_key: &AesKey) -> Result<String, ShareError> {
        let ciphertext = base64_decode(&self.wrapped_private_b64);
        let iv_bytes = base64_decode(&self.iv_b64);
        let mut iv = [0u8; crate::consts::AES_IV_LEN_BYTES];
        iv.copy_from_slice(&iv_bytes[..crate::consts::AES_IV_LEN_BYTES]);
        let plaintext = aes_key.decrypt(&ciphertext, &iv).map_err(ShareErrorImpl::from)?;
        Ok(String::from_utf8_lossy(&plaintext).to_string())
    }

    pub fn statement(&self, config_hash: &str, item: usize) -> Result<ShareStatement, ShareError> {
        let bytes = crate::envelope::canonical_json(self).map_err(ShareErrorImpl::from)?;
        let hash = sha512(&bytes).map_err(ShareErrorImpl::from)?;
        Ok(ShareStatement {
            share_hash: hex_encode(hash),
            config_hash: config_hash.to_string(),
            item,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareStatement {
    pub share_hash: String,
    pub config_hash: String,
    pub item: usize,
}

impl Statement for ShareStatement {}

pub fn base64_encode(bytes: &[u8]) -> String {
    data_encoding::BASE64.encode(bytes)
}

pub fn base64_decode(s: &str) -> Vec<u8> {
    data_encoding::BASE64
        .decode(s.as_bytes())
        .unwrap_or_default()
}

#[cfg(test)]
mod test {
    use super::*;
    use mixlib::GroupParams;
    use num_bigint_dig::BigUint;

    fn params() -> GroupParams {
        GroupParams::new(BigUint::from(23u32), BigUint::from(4u32))
    }

    #[test]
    fn test_base64_roundtrip() {
        for sample in ["", "a", "ab", "abc", "abcd", "hello trustee"] {
            let encoded = base64_encode(sample.as_bytes());
            assert_eq!(base64_decode(&encoded), sample.as_bytes());
        }
    }

    #[test]
    fn test_wrap_and_unwrap_private_share() {
        let params = params();
        let x = BigUint::from(7u32);
        let y = params.g_pow(&x);
        let pok = SchnorrProof::prove(&params, &x, &y, b"trustee-modulus");
        let aes_key = AesKey::from_bytes(&[3u8; crate::consts::AES_KEY_LEN_BYTES]).unwrap();
        let share = Share::wrap(&y.to_string(), pok, &x.to_string(), &aes_key).unwrap();
        assert_eq!(share.unwrap_private(&aes_key).unwrap(), x.to_string());
    }

    #[test]
    fn test_statement_is_deterministic() {
        let params = params();
        let x = BigUint::from(7u32);
        let y = params.g_pow(&x);
        let pok = SchnorrProof::prove(&params, &x, &y, b"dom");
        let aes_key = AesKey::from_bytes(&[1u8; crate::consts::AES_KEY_LEN_BYTES]).unwrap();
        let share = Share::wrap(&y.to_string(), pok, &x.to_string(), &aes_key).unwrap();
        let s1 = share.statement("cfg-hash", 1).unwrap();
        let s2 = share.statement("cfg-hash", 1).unwrap();
        assert_eq!(s1, s2);
    }
}
