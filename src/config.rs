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

//! The trustee's own flat key/value configuration file. Grounded on the
//! teacher's `VerifierConfig` (`dotenvy::var` plus typed accessors with documented
//! defaults) but reading a file handed to it rather than the process environment: a
//! standalone config file whose *location* (not content) comes from the
//! environment.

use crate::consts::{
    CONFIG_KEY_AES_KEY, CONFIG_KEY_DATA_STORE_PATH, CONFIG_KEY_GIT_NO_COMPRESSION,
    CONFIG_KEY_GIT_REMOVE_LOCK, CONFIG_KEY_OFFLINE_SPLIT, CONFIG_KEY_PEERS,
    CONFIG_KEY_PRIVATE_KEY, CONFIG_KEY_PUBLIC_KEY, CONFIG_KEY_REPO_BASE_URI,
    CONFIG_KEY_SINGLETON_PORT, DEFAULT_SINGLETON_PORT,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
/// Error with the trustee's configuration file.
pub struct TrusteeConfigError(#[from] TrusteeConfigErrorImpl);

#[derive(Error, Debug)]
enum TrusteeConfigErrorImpl {
    #[error("could not read configuration file {path}")]
    Read {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("required configuration key {0} is missing")]
    MissingKey(&'static str),
    #[error("configuration key {key} has value {value:?} which is not a valid {expected}")]
    BadValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Typed view over the trustee's flat key/value configuration file.
///
/// Parsed with [`dotenvy::from_path_iter`] — `dotenvy`'s `.env` grammar already *is* a
/// flat key/value format, so no bespoke parser is needed.
pub struct TrusteeConfig {
    values: HashMap<String, String>,
}

impl TrusteeConfig {
    pub fn from_path(path: &Path) -> Result<Self, TrusteeConfigError> {
        let mut values = HashMap::new();
        let iter = dotenvy::from_path_iter(path).map_err(|source| TrusteeConfigErrorImpl::Read {
            path: path.to_path_buf(),
            source,
        })?;
        for item in iter {
            let (key, value) = item.map_err(|source| TrusteeConfigErrorImpl::Read {
                path: path.to_path_buf(),
                source,
            })?;
            values.insert(key, value);
        }
        Ok(Self { values })
    }

    fn required(&self, key: &'static str) -> Result<&str, TrusteeConfigError> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| TrusteeConfigErrorImpl::MissingKey(key).into())
    }

    fn required_path(&self, key: &'static str) -> Result<PathBuf, TrusteeConfigError> {
        Ok(PathBuf::from(self.required(key)?))
    }

    fn bool_with_default(&self, key: &'static str, default: bool) -> Result<bool, TrusteeConfigError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(v) => v.parse::<bool>().map_err(|_| {
                TrusteeConfigErrorImpl::BadValue {
                    key,
                    value: v.clone(),
                    expected: "bool",
                }
                .into()
            }),
        }
    }

    /// Root directory for local mirrors of board sections.
    pub fn data_store_path(&self) -> Result<PathBuf, TrusteeConfigError> {
        self.required_path(CONFIG_KEY_DATA_STORE_PATH)
    }

    /// Base URI of the remote board transport.
    pub fn repo_base_uri(&self) -> Result<String, TrusteeConfigError> {
        self.required(CONFIG_KEY_REPO_BASE_URI).map(str::to_string)
    }

    /// Path to this trustee's RSA public key (PEM).
    pub fn public_key_path(&self) -> Result<PathBuf, TrusteeConfigError> {
        self.required_path(CONFIG_KEY_PUBLIC_KEY)
    }

    /// Path to this trustee's RSA private key (PEM).
    pub fn private_key_path(&self) -> Result<PathBuf, TrusteeConfigError> {
        self.required_path(CONFIG_KEY_PRIVATE_KEY)
    }

    /// Path to this trustee's master AES key (raw 16 bytes).
    pub fn aes_key_path(&self) -> Result<PathBuf, TrusteeConfigError> {
        self.required_path(CONFIG_KEY_AES_KEY)
    }

    /// Path to the file concatenating every trusted peer RSA public key.
    pub fn peers_path(&self) -> Result<PathBuf, TrusteeConfigError> {
        self.required_path(CONFIG_KEY_PEERS)
    }

    /// `offlineSplit` (bool, default false): enable offline/online shuffle split, as
    /// a first-class configuration option rather than hardwired on or off.
    pub fn offline_split(&self) -> Result<bool, TrusteeConfigError> {
        self.bool_with_default(CONFIG_KEY_OFFLINE_SPLIT, false)
    }

    /// `gitNoCompression` (bool, default false): disable transport-level compression.
    pub fn git_no_compression(&self) -> Result<bool, TrusteeConfigError> {
        self.bool_with_default(CONFIG_KEY_GIT_NO_COMPRESSION, false)
    }

    /// `gitRemoveLock` (bool, default true): clear stale transport locks at startup.
    pub fn git_remove_lock(&self) -> Result<bool, TrusteeConfigError> {
        self.bool_with_default(CONFIG_KEY_GIT_REMOVE_LOCK, true)
    }

    /// `singletonPort` (int, default 9999; 0 = disabled): single-instance guard.
    pub fn singleton_port(&self) -> Result<u16, TrusteeConfigError> {
        match self.values.get(CONFIG_KEY_SINGLETON_PORT) {
            None => Ok(DEFAULT_SINGLETON_PORT),
            Some(v) => v.parse::<u16>().map_err(|_| {
                TrusteeConfigErrorImpl::BadValue {
                    key: CONFIG_KEY_SINGLETON_PORT,
                    value: v.clone(),
                    expected: "u16",
                }
                .into()
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use std::io::Write;

    pub(crate) fn write_sample_config(dir: &Path) -> PathBuf {
        let path = dir.join("trustee.conf");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "dataStorePath={}", dir.join("store").display()).unwrap();
        writeln!(f, "repoBaseUri=https://board.example/election").unwrap();
        writeln!(f, "publicKey={}", dir.join("pub.pem").display()).unwrap();
        writeln!(f, "privateKey={}", dir.join("priv.pem").display()).unwrap();
        writeln!(f, "aesKey={}", dir.join("aes.key").display()).unwrap();
        writeln!(f, "peers={}", dir.join("peers.pem").display()).unwrap();
        writeln!(f, "offlineSplit=true").unwrap();
        writeln!(f, "singletonPort=0").unwrap();
        path
    }

    #[test]
    fn test_required_fields_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample_config(dir.path());
        let cfg = TrusteeConfig::from_path(&path).unwrap();
        assert_eq!(cfg.data_store_path().unwrap(), dir.path().join("store"));
        assert_eq!(cfg.repo_base_uri().unwrap(), "https://board.example/election");
        assert!(cfg.offline_split().unwrap());
        assert_eq!(cfg.singleton_port().unwrap(), 0);
    }

    #[test]
    fn test_defaults_apply_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.join("minimal.conf");
        std::fs::write(
            &path,
            format!(
                "dataStorePath={}\nrepoBaseUri=u\npublicKey=a\nprivateKey=b\naesKey=c\npeers=d\n",
                dir.join("store").display()
            ),
        )
        .unwrap();
        let cfg = TrusteeConfig::from_path(&path).unwrap();
        assert!(!cfg.offline_split().unwrap());
        assert!(!cfg.git_no_compression().unwrap());
        assert!(cfg.git_remove_lock().unwrap());
        assert_eq!(cfg.singleton_port().unwrap(), DEFAULT_SINGLETON_PORT);
    }

    #[test]
    fn test_missing_required_key_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.join("broken.conf");
        std::fs::write(&path, "repoBaseUri=u\n").unwrap();
        let cfg = TrusteeConfig::from_path(&path).unwrap();
        assert!(cfg.data_store_path().is_err());
    }
}
