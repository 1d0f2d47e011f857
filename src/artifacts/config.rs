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

//! The election `Config` artifact. Canonicalizes on a `modulus`+`generator` group
//! description rather than a `bits`-only variant.

use super::signable::Statement;
use crate::envelope::{hex_encode, sha512};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ConfigError(#[from] ConfigErrorImpl);

#[derive(Error, Debug)]
enum ConfigErrorImpl {
    #[error("config must list at least {min} trustees, found {got}")]
    TooFewTrustees { min: usize, got: usize },
    #[error("config lists a duplicate trustee public key")]
    DuplicateTrusteeKey,
    #[error("config item count must be at least 1")]
    ZeroItems,
    #[error("failed to canonicalize config to JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to compute config hash")]
    Hash(#[from] crate::envelope::HashError),
}

/// Election parameters, posted once by the authority and immutable thereafter
///.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub election_id: String,
    pub name: String,
    /// Large safe-prime group modulus, decimal-encoded.
    pub group_modulus: String,
    /// Encoded group generator element, decimal-encoded.
    pub group_generator: String,
    pub item_count: usize,
    /// PEM-encoded ballotbox RSA public key.
    pub ballotbox_public_key_pem: String,
    /// Ordered PEM-encoded trustee RSA public keys; position in this list is the
    /// 1-based trustee position.
    pub trustee_public_keys_pem: Vec<String>,
}

impl Config {
    pub fn trustee_count(&self) -> usize {
        self.trustee_public_keys_pem.len()
    }

    /// At least `minimum_trustees` trustees, and no duplicate public keys.
    pub fn validate_shape(&self, minimum_trustees: usize) -> Result<(), ConfigError> {
        if self.trustee_count() < minimum_trustees {
            return Err(ConfigErrorImpl::TooFewTrustees {
                min: minimum_trustees,
                got: self.trustee_count(),
            }
            .into());
        }
        let mut sorted = self.trustee_public_keys_pem.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != self.trustee_public_keys_pem.len() {
            return Err(ConfigErrorImpl::DuplicateTrusteeKey.into());
        }
        if self.item_count == 0 {
            return Err(ConfigErrorImpl::ZeroItems.into());
        }
        Ok(())
    }

    /// Recompute the `ConfigStatement` binding this Config.
    pub fn statement(&self) -> Result<ConfigStatement, ConfigError> {
        let bytes = crate::envelope::canonical_json(self).map_err(ConfigErrorImpl::from)?;
        let hash = sha512(&bytes).map_err(ConfigErrorImpl::from)?;
        Ok(ConfigStatement {
            config_hash: hex_encode(&hash),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigStatement {
    pub config_hash: String,
}

impl Statement for ConfigStatement {}
