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

//! The joint `PublicKey` artifact: the product of all trustee
//! public-shares for one item.

use super::signable::Statement;
use crate::envelope::hash::{hex_encode, sha512, Sha512Digest};
use mixlib::GroupParams;
use num_bigint_dig::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct PublicKeyError(#[from] PublicKeyErrorImpl);

#[derive(Error, Debug)]
enum PublicKeyErrorImpl {
    #[error("failed to canonicalize public key to JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to compute public key hash")]
    Hash(#[from] crate::envelope::HashError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKey {
    pub value: String,
}

impl PublicKey {
    /// Combine every trustee's public share by group multiplication.
    pub fn combine(params: &GroupParams, shares: &[BigUint]) -> Self {
        PublicKey {
            value: mixlib::combine_public_keys(params, shares).to_string(),
        }
    }

    /// Hash binding every trustee's public-share value, in trustee order, so two
    /// trustees re-deriving the same key from the same Shares produce the same
    /// `sharesHash`.
    pub fn shares_hash(share_public_values: &[String]) -> Result<String, PublicKeyError> {
        let mut digest = Sha512Digest::new().map_err(PublicKeyErrorImpl::from)?;
        for value in share_public_values {
            digest
                .update_line(value)
                .map_err(PublicKeyErrorImpl::from)?;
        }
        Ok(hex_encode(digest.finish().map_err(PublicKeyErrorImpl::from)?))
    }

    pub fn statement(
        &self,
        shares_hash: &str,
        config_hash: &str,
        item: usize,
    ) -> Result<PublicKeyStatement, PublicKeyError> {
        let bytes = crate::envelope::canonical_json(self).map_err(PublicKeyErrorImpl::from)?;
        let hash = sha512(&bytes).map_err(PublicKeyErrorImpl::from)?;
        Ok(PublicKeyStatement {
            public_key_hash: hex_encode(hash),
            shares_hash: shares_hash.to_string(),
            config_hash: config_hash.to_string(),
            item,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyStatement {
    pub public_key_hash: String,
    pub shares_hash: String,
    pub config_hash: String,
    pub item: usize,
}

impl Statement for PublicKeyStatement {}
