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

//! The protocol's actions: one pure function per action, each taking
//! a board/keystore/identity context and returning a tagged `Ok | Stop | Error`
//! outcome rather than throwing ("model these as tagged sum
//! types... Result = Ok | Stop | Error").

pub mod add_decryption;
pub mod add_mix;
pub mod add_or_sign_plaintexts;
pub mod add_or_sign_public_key;
pub mod add_pre_shuffle_data;
pub mod add_share;
pub mod validate_config;
pub mod verify_mix;

#[cfg(test)]
pub(crate) mod test_support;

use crate::artifacts::config::{Config, ConfigError, ConfigStatement};
use crate::board::{Board, BoardError};
use crate::envelope::{RsaError, SignableError};
use crate::ids::TrusteeId;
use crate::keystore::Keystore;
use crate::names::Name;
use mixlib::GroupParams;
use num_bigint_dig::BigUint;
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ActionError(#[from] ActionErrorImpl);

#[derive(Error, Debug)]
pub(crate) enum ActionErrorImpl {
    #[error("board I/O error")]
    Board(#[from] BoardError),
    #[error("required artifact {0} is missing")]
    Missing(String),
    #[error("could not deserialize artifact {what}")]
    Deserialize {
        what: &'static str,
        source: serde_json::Error,
    },
    #[error("recomputed ConfigStatement does not match the one published on the board")]
    ConfigStatementMismatch,
    #[error("this trustee's own signature over ConfigStatement does not verify")]
    ConfigSelfSignatureInvalid,
    #[error("config group parameters are not valid decimal integers")]
    BadGroupParams,
    #[error("config validation failed")]
    Config(#[from] ConfigError),
    #[error("RSA operation failed")]
    Rsa(#[from] RsaError),
    #[error("statement signing/verification failed")]
    Signable(#[from] SignableError),
    #[error("{0}")]
    Protocol(String),
}

impl ActionError {
    /// Render as the message stored on the board by `ERROR(self)`.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// `Ok | Stop(msg) | Error(msg)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Ok,
    Stop(String),
    Error(String),
}

/// Everything an action needs: the board, this trustee's key material, and this
/// trustee's own identity.
pub struct ActionContext<'a> {
    pub board: &'a dyn Board,
    pub keystore: &'a Keystore,
    pub self_id: TrusteeId,
}

pub(crate) fn load_required(board: &dyn Board, key: Name) -> Result<Vec<u8>, ActionError> {
    board
        .get(&key)?
        .ok_or_else(|| ActionErrorImpl::Missing(key.key()).into())
}

pub(crate) fn load_optional(board: &dyn Board, key: Name) -> Result<Option<Vec<u8>>, ActionError> {
    Ok(board.get(&key)?)
}

pub(crate) fn deserialize<T: serde::de::DeserializeOwned>(
    what: &'static str,
    bytes: &[u8],
) -> Result<T, ActionError> {
    serde_json::from_slice(bytes).map_err(|source| ActionErrorImpl::Deserialize { what, source }.into())
}

/// Every action's mandatory first step: load Config, recompute its
/// ConfigStatement, compare to the published statement, and verify this trustee's
/// own signature over it. Returns the Config, its group parameters, and its hash.
pub fn valid_config_hash(ctx: &ActionContext) -> Result<(Config, GroupParams, String), ActionError> {
    let config_bytes = load_required(ctx.board, Name::Config)?;
    let config: Config = deserialize("Config", &config_bytes)?;

    let published_bytes = load_required(ctx.board, Name::ConfigStmt)?;
    let published: ConfigStatement = deserialize("ConfigStatement", &published_bytes)?;
    let recomputed = config.statement()?;
    if recomputed != published {
        return Err(ActionErrorImpl::ConfigStatementMismatch.into());
    }

    let sig = load_required(ctx.board, Name::ConfigSig(ctx.self_id))?;
    let verifies = recomputed.verify(&ctx.keystore.public_key, &sig)?;
    if !verifies {
        return Err(ActionErrorImpl::ConfigSelfSignatureInvalid.into());
    }

    let modulus = BigUint::parse_bytes(config.group_modulus.as_bytes(), 10)
        .ok_or(ActionErrorImpl::BadGroupParams)?;
    let generator = BigUint::parse_bytes(config.group_generator.as_bytes(), 10)
        .ok_or(ActionErrorImpl::BadGroupParams)?;
    let params = GroupParams::new(modulus, generator);

    Ok((config, params, recomputed.config_hash))
}
