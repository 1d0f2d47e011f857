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

//! RSA key parsing and RSA-SHA-256 sign/verify over canonical statement bytes
//!.

use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private, Public};
use openssl::rsa::Rsa;
use openssl::sign::{Signer, Verifier};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct RsaError(#[from] RsaErrorImpl);

#[derive(Error, Debug)]
enum RsaErrorImpl {
    #[error("could not parse PEM key material")]
    Pem(#[from] openssl::error::ErrorStack),
}

pub struct RsaPublicKey(PKey<Public>);

pub struct RsaPrivateKey(PKey<Private>);

impl RsaPublicKey {
    pub fn from_pem(pem: &[u8]) -> Result<Self, RsaError> {
        let rsa = Rsa::public_key_from_pem(pem).map_err(RsaErrorImpl::from)?;
        let pkey = PKey::from_rsa(rsa).map_err(RsaErrorImpl::from)?;
        Ok(Self(pkey))
    }

    pub fn to_pem(&self) -> Result<Vec<u8>, RsaError> {
        self.0
            .rsa()
            .map_err(RsaErrorImpl::from)?
            .public_key_to_pem()
            .map_err(|e| RsaErrorImpl::from(e).into())
    }

    /// Verify an RSA-SHA-256 signature over `canonical_bytes`, the UTF-8 encoding of
    /// a statement record's canonical JSON.
    pub fn verify(&self, canonical_bytes: &[u8], signature: &[u8]) -> Result<bool, RsaError> {
        let mut verifier =
            Verifier::new(MessageDigest::sha256(), &self.0).map_err(RsaErrorImpl::from)?;
        verifier
            .update(canonical_bytes)
            .map_err(RsaErrorImpl::from)?;
        verifier
            .verify(signature)
            .map_err(|e| RsaErrorImpl::from(e).into())
    }
}

impl RsaPrivateKey {
    pub fn from_pem(pem: &[u8]) -> Result<Self, RsaError> {
        let rsa = Rsa::private_key_from_pem(pem).map_err(RsaErrorImpl::from)?;
        let pkey = PKey::from_rsa(rsa).map_err(RsaErrorImpl::from)?;
        Ok(Self(pkey))
    }

    /// Sign `canonical_bytes` with RSA-SHA-256.
    pub fn sign(&self, canonical_bytes: &[u8]) -> Result<Vec<u8>, RsaError> {
        let mut signer =
            Signer::new(MessageDigest::sha256(), &self.0).map_err(RsaErrorImpl::from)?;
        signer
            .update(canonical_bytes)
            .map_err(RsaErrorImpl::from)?;
        signer.sign_to_vec().map_err(|e| RsaErrorImpl::from(e).into())
    }

    /// Derive the matching public key, e.g. to self-check a loaded keypair at
    /// startup.
    pub fn public_key(&self) -> Result<RsaPublicKey, RsaError> {
        let rsa = self.0.rsa().map_err(RsaErrorImpl::from)?;
        let pub_pem = rsa.public_key_to_pem().map_err(RsaErrorImpl::from)?;
        RsaPublicKey::from_pem(&pub_pem)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_keypair() -> (RsaPrivateKey, RsaPublicKey) {
        let rsa = Rsa::generate(2048).unwrap();
        let priv_pem = rsa.private_key_to_pem().unwrap();
        let pub_pem = rsa.public_key_to_pem().unwrap();
        (
            RsaPrivateKey::from_pem(&priv_pem).unwrap(),
            RsaPublicKey::from_pem(&pub_pem).unwrap(),
        )
    }

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let (sk, pk) = test_keypair();
        let msg = b"{\"configHash\":\"abcd\"}";
        let sig = sk.sign(msg).unwrap();
        assert!(pk.verify(msg, &sig).unwrap());
    }

    #[test]
    fn test_verify_rejects_tampered_message() {
        let (sk, pk) = test_keypair();
        let sig = sk.sign(b"message one").unwrap();
        assert!(!pk.verify(b"message two", &sig).unwrap());
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let (sk, _pk) = test_keypair();
        let (_sk2, pk2) = test_keypair();
        let msg = b"some statement bytes";
        let sig = sk.sign(msg).unwrap();
        assert!(!pk2.verify(msg, &sig).unwrap());
    }

    #[test]
    fn test_public_key_matches_private() {
        let (sk, pk) = test_keypair();
        let derived = sk.public_key().unwrap();
        assert_eq!(derived.to_pem().unwrap(), pk.to_pem().unwrap());
    }
}
