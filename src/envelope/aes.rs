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

//! AES-128-CBC-PKCS#7 wrapping of a trustee's private key share at rest. Only
//! random-IV is supported here — a fixed IV would leak equal-plaintext shares
//! across trustees, so there is no fixed-IV code path to fall back to.

use crate::consts::{AES_IV_LEN_BYTES, AES_KEY_LEN_BYTES};
use openssl::rand::rand_bytes;
use openssl::symm::{Cipher, Crypter, Mode};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct AesError(#[from] AesErrorImpl);

#[derive(Error, Debug)]
enum AesErrorImpl {
    #[error("AES key must be exactly {AES_KEY_LEN_BYTES} bytes, got {0}")]
    BadKeyLen(usize),
    #[error("wrapped ciphertext is shorter than one IV")]
    TooShort,
    #[error("openssl cipher error (wrong key is detected this way via padding failure)")]
    Openssl(#[from] openssl::error::ErrorStack),
}

/// An AES-128 master key held in process memory only: loaded once at startup,
/// immutable, and shared read-only for the life of the process.
pub struct AesKey([u8; AES_KEY_LEN_BYTES]);

impl AesKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AesError> {
        if bytes.len() != AES_KEY_LEN_BYTES {
            return Err(AesErrorImpl::BadKeyLen(bytes.len()).into());
        }
        let mut buf = [0u8; AES_KEY_LEN_BYTES];
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Encrypt `plaintext` under a fresh random IV. Returns `(ciphertext, iv)`; both
    /// are stored together on disk/board; the IV is not secret.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<(Vec<u8>, [u8; AES_IV_LEN_BYTES]), AesError> {
        let mut iv = [0u8; AES_IV_LEN_BYTES];
        rand_bytes(&mut iv).map_err(AesErrorImpl::from)?;
        let cipher = Cipher::aes_128_cbc();
        let mut crypter =
            Crypter::new(cipher, Mode::Encrypt, &self.0, Some(&iv)).map_err(AesErrorImpl::from)?;
        let mut out = vec![0u8; plaintext.len() + cipher.block_size()];
        let mut count = crypter
            .update(plaintext, &mut out)
            .map_err(AesErrorImpl::from)?;
        count += crypter.finalize(&mut out[count..]).map_err(AesErrorImpl::from)?;
        out.truncate(count);
        Ok((out, iv))
    }

    /// Decrypt `ciphertext` with the given `iv`. A padding failure (wrong key) is
    /// surfaced as [`AesError`]. A wrong key is detected with overwhelming
    /// probability via padding failure; callers must map that to a hard error.
    pub fn decrypt(&self, ciphertext: &[u8], iv: &[u8; AES_IV_LEN_BYTES]) -> Result<Vec<u8>, AesError> {
        let cipher = Cipher::aes_128_cbc();
        let mut crypter =
            Crypter::new(cipher, Mode::Decrypt, &self.0, Some(iv)).map_err(AesErrorImpl::from)?;
        let mut out = vec![0u8; ciphertext.len() + cipher.block_size()];
        let mut count = crypter
            .update(ciphertext, &mut out)
            .map_err(AesErrorImpl::from)?;
        count += crypter.finalize(&mut out[count..]).map_err(AesErrorImpl::from)?;
        out.truncate(count);
        Ok(out)
    }
}

/// Split a `(iv || ciphertext)` wire encoding back into its parts, for formats that
/// concatenate the public IV ahead of the ciphertext bytes.
pub fn split_iv_ciphertext(wire: &[u8]) -> Result<([u8; AES_IV_LEN_BYTES], &[u8]), AesError> {
    if wire.len() < AES_IV_LEN_BYTES {
        return Err(AesErrorImpl::TooShort.into());
    }
    let mut iv = [0u8; AES_IV_LEN_BYTES];
    iv.copy_from_slice(&wire[..AES_IV_LEN_BYTES]);
    Ok((iv, &wire[AES_IV_LEN_BYTES..]))
}

#[cfg(test)]
mod test {
    use super::*;

    fn key() -> AesKey {
        AesKey::from_bytes(&[7u8; AES_KEY_LEN_BYTES]).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let k = key();
        let plaintext = b"this is a private ElGamal share exponent, base-10 encoded";
        let (ct, iv) = k.encrypt(plaintext).unwrap();
        let recovered = k.decrypt(&ct, &iv).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn test_fresh_iv_each_call() {
        let k = key();
        let (_ct1, iv1) = k.encrypt(b"same message").unwrap();
        let (_ct2, iv2) = k.encrypt(b"same message").unwrap();
        assert_ne!(iv1, iv2);
    }

    #[test]
    fn test_wrong_key_fails_with_padding_error() {
        let k1 = key();
        let k2 = AesKey::from_bytes(&[9u8; AES_KEY_LEN_BYTES]).unwrap();
        let (ct, iv) = k1.encrypt(b"a secret share").unwrap();
        assert!(k2.decrypt(&ct, &iv).is_err());
    }

    #[test]
    fn test_bad_key_length_rejected() {
        assert!(AesKey::from_bytes(&[1u8; 15]).is_err());
    }
}
