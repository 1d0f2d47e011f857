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

//! A signature-verification trait for statement records: a `Statement` is
//! signed/verified directly over its canonical JSON bytes against a plain
//! `RsaPublicKey`/`RsaPrivateKey`, with no certificate-authority keystore in
//! between.

use crate::envelope::{canonical_json, RsaError, RsaPrivateKey, RsaPublicKey};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct SignableError(#[from] SignableErrorImpl);

#[derive(Error, Debug)]
enum SignableErrorImpl {
    #[error("could not canonicalize statement to JSON")]
    Json(#[from] serde_json::Error),
    #[error("RSA operation failed")]
    Rsa(#[from] RsaError),
}

/// A Statement record: "a small, canonically encoded record of hashes and indices
/// that gets signed in place of large payloads" (GLOSSARY).
pub trait Statement: Serialize {
    /// Canonical bytes of this statement.
    fn canonical_bytes(&self) -> Result<Vec<u8>, SignableError> {
        canonical_json(self).map_err(|e| SignableErrorImpl::from(e).into())
    }

    /// Sign this statement with `key`: a signature is valid iff the canonical JSON
    /// of the matching Statement record verifies under the claimed RSA public key.
    fn sign(&self, key: &RsaPrivateKey) -> Result<Vec<u8>, SignableError> {
        let bytes = self.canonical_bytes()?;
        key.sign(&bytes).map_err(|e| SignableErrorImpl::from(e).into())
    }

    /// Verify a signature over this statement against `key`.
    fn verify(&self, key: &RsaPublicKey, signature: &[u8]) -> Result<bool, SignableError> {
        let bytes = self.canonical_bytes()?;
        key.verify(&bytes, signature)
            .map_err(|e| SignableErrorImpl::from(e).into())
    }
}
