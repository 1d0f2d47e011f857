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

//! `AddOrSignPublicKey(item)`: combine every trustee's verified
//! share into the joint public key; trustee #1 publishes it, everyone else
//! re-derives and co-signs.

use super::{deserialize, load_required, valid_config_hash, ActionContext, ActionError, ActionErrorImpl, ActionOutcome};
use crate::artifacts::public_key::{PublicKey, PublicKeyStatement};
use crate::artifacts::share::{Share, ShareStatement};
use crate::artifacts::signable::Statement;
use crate::envelope::RsaPublicKey;
use crate::ids::TrusteeId;
use crate::names::Name;
use num_bigint_dig::BigUint;

pub fn add_or_sign_public_key(ctx: &ActionContext, item: usize) -> Result<ActionOutcome, ActionError> {
    let (config, params, config_hash) = valid_config_hash(ctx)?;

    let mut share_values = Vec::with_capacity(config.trustee_count());
    for id in TrusteeId::all(config.trustee_count()) {
        let trustee_pem = &config.trustee_public_keys_pem[id.position() - 1];
        let trustee_key = RsaPublicKey::from_pem(trustee_pem.as_bytes())?;

        let share: Share = deserialize("Share", &load_required(ctx.board, Name::Share(item, id))?)?;
        let stmt: ShareStatement =
            deserialize("ShareStatement", &load_required(ctx.board, Name::ShareStmt(item, id))?)?;
        let recomputed = share.statement(&config_hash, item)?;
        if recomputed != stmt {
            return Err(ActionErrorImpl::Protocol(format!(
                "share statement for trustee {id} does not match its recomputation"
            ))
            .into());
        }
        let sig = load_required(ctx.board, Name::ShareSig(item, id))?;
        if !stmt.verify(&trustee_key, &sig)? {
            return Err(ActionErrorImpl::Protocol(format!(
                "share signature for trustee {id} does not verify"
            ))
            .into());
        }
        let public_value = BigUint::parse_bytes(share.public.as_bytes(), 10)
            .ok_or_else(|| ActionErrorImpl::Protocol(format!("share public value for trustee {id} is not decimal")))?;
        if !share.pok.verify(&params, &public_value, trustee_pem.as_bytes()) {
            return Err(
                ActionErrorImpl::Protocol(format!("proof of knowledge for trustee {id} does not verify")).into(),
            );
        }
        share_values.push(public_value);
    }

    let combined = PublicKey::combine(&params, &share_values);
    let share_public_values: Vec<String> = share_values.iter().map(ToString::to_string).collect();
    let shares_hash = PublicKey::shares_hash(&share_public_values)?;
    let recomputed_statement = combined.statement(&shares_hash, &config_hash, item)?;

    match load_required_optional(ctx, item)? {
        None => {
            if ctx.self_id.position() != 1 {
                // The dispatch rules only route this action to trustee #1 while no
                // PublicKey exists; reaching here otherwise means the board and
                // rules disagree.
                return Err(ActionErrorImpl::Protocol(
                    "no PublicKey on the board and this trustee is not #1".to_string(),
                )
                .into());
            }
            let signature = recomputed_statement.sign(&ctx.keystore.private_key)?;
            ctx.board.add_triple(
                Name::PublicKey(item),
                serde_json::to_vec(&combined).map_err(|e| ActionErrorImpl::Deserialize {
                    what: "PublicKey",
                    source: e,
                })?,
                Name::PublicKeyStmt(item),
                serde_json::to_vec(&recomputed_statement).map_err(|e| ActionErrorImpl::Deserialize {
                    what: "PublicKeyStatement",
                    source: e,
                })?,
                Name::PublicKeySig(item, ctx.self_id),
                signature,
            )?;
        }
        Some(published) => {
            if published != recomputed_statement {
                return Err(ActionErrorImpl::Protocol(
                    "recomputed PublicKeyStatement does not match the published one".to_string(),
                )
                .into());
            }
            let signature = recomputed_statement.sign(&ctx.keystore.private_key)?;
            ctx.board
                .add_signature(Name::PublicKeySig(item, ctx.self_id), signature)?;
        }
    }
    Ok(ActionOutcome::Ok)
}

fn load_required_optional(
    ctx: &ActionContext,
    item: usize,
) -> Result<Option<PublicKeyStatement>, ActionError> {
    match ctx.board.get(&Name::PublicKeyStmt(item))? {
        None => Ok(None),
        Some(bytes) => Ok(Some(deserialize("PublicKeyStatement", &bytes)?)),
    }
}
