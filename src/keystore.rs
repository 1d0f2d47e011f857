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

//! Key material loaded once at startup, immutable, and shared read-only for the
//! lifetime of the process: this trustee's RSA keypair, its AES master
//! key, and the set of peer RSA public keys it trusts. Modeled on a
//! `Keystore::try_from(&Path)` constructor loading every key referenced by one
//! config file, minus the PKCS#12/certificate-authority machinery this crate
//! does not carry forward — the trustee config file already names each key file
//! explicitly, so there is no "find the unique file by extension" step to repeat.

use crate::config::TrusteeConfig;
use crate::envelope::{AesKey, RsaError, RsaPrivateKey, RsaPublicKey};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct KeystoreError(#[from] KeystoreErrorImpl);

#[derive(Error, Debug)]
enum KeystoreErrorImpl {
    #[error("could not read key file {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse RSA key material in {path}")]
    Rsa { path: PathBuf, source: RsaError },
    #[error("could not load AES master key")]
    Aes(#[from] crate::envelope::AesError),
    #[error("could not read trustee configuration")]
    Config(#[from] crate::config::TrusteeConfigError),
}

/// This trustee's key material: RSA keypair, AES master key, and trusted peer set.
/// Loaded once at startup, immutable, and shared read-only thereafter.
pub struct Keystore {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    pub aes_key: AesKey,
    peer_pems: HashSet<String>,
}

impl Keystore {
    /// Load every key referenced by `config`: `publicKey`, `privateKey`, `aesKey`,
    /// `peers`.
    pub fn load(config: &TrusteeConfig) -> Result<Self, KeystoreError> {
        let public_key_path = config.public_key_path().map_err(KeystoreErrorImpl::from)?;
        let private_key_path = config.private_key_path().map_err(KeystoreErrorImpl::from)?;
        let aes_key_path = config.aes_key_path().map_err(KeystoreErrorImpl::from)?;
        let peers_path = config.peers_path().map_err(KeystoreErrorImpl::from)?;

        let public_key = read_rsa_public(&public_key_path)?;
        let private_key = read_rsa_private(&private_key_path)?;
        let aes_bytes = read_file(&aes_key_path)?;
        let aes_key = AesKey::from_bytes(&aes_bytes).map_err(KeystoreErrorImpl::from)?;
        let peers_text = String::from_utf8_lossy(&read_file(&peers_path)?).into_owned();
        let peer_pems = split_pem_blocks(&peers_text).into_iter().collect();

        Ok(Self {
            public_key,
            private_key,
            aes_key,
            peer_pems,
        })
    }

    /// Is `pem` (a trustee or ballotbox public key listed in Config) in this
    /// trustee's local trust policy?
    pub fn trusts(&self, pem: &str) -> bool {
        self.peer_pems.contains(pem.trim())
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, KeystoreError> {
    std::fs::read(path)
        .map_err(|source| {
            KeystoreErrorImpl::Io {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
}

fn read_rsa_public(path: &Path) -> Result<RsaPublicKey, KeystoreError> {
    let bytes = read_file(path)?;
    RsaPublicKey::from_pem(&bytes).map_err(|source| {
        KeystoreErrorImpl::Rsa {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

fn read_rsa_private(path: &Path) -> Result<RsaPrivateKey, KeystoreError> {
    let bytes = read_file(path)?;
    RsaPrivateKey::from_pem(&bytes).map_err(|source| {
        KeystoreErrorImpl::Rsa {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

/// Split a file concatenating several PEM blocks back into one trimmed string per
/// block.
fn split_pem_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.starts_with("-----BEGIN") && !current.is_empty() {
            blocks.push(current.trim().to_string());
            current = String::new();
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        blocks.push(current.trim().to_string());
    }
    blocks
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_split_pem_blocks_separates_concatenated_keys() {
        let combined = "-----BEGIN PUBLIC KEY-----\nAAA\n-----END PUBLIC KEY-----\n-----BEGIN PUBLIC KEY-----\nBBB\n-----END PUBLIC KEY-----\n";
        let blocks = split_pem_blocks(combined);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("AAA"));
        assert!(blocks[1].contains("BBB"));
    }

    #[test]
    fn test_split_pem_blocks_handles_single_block() {
        let single = "-----BEGIN PUBLIC KEY-----\nAAA\n-----END PUBLIC KEY-----\n";
        assert_eq!(split_pem_blocks(single).len(), 1);
    }
}
