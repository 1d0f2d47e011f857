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

//! `AddMix(item)`: re-encrypt and shuffle the previous element of
//! the mix chain and publish the result with its shuffle proof.
//!
//! `mixlib::shuffle` always draws fresh re-encryption randomness for the online
//! phase; when `offlineSplit` is enabled this action still reuses the permutation
//! precomputed by `AddPreShuffleData`, which is the expensive half of the
//! Terelius-Wikstrom split to precompute, while the randomness itself is cheap to
//! draw at online time and is not carried across the split (see `DESIGN.md`).

use super::{deserialize, load_required, valid_config_hash, ActionContext, ActionError, ActionErrorImpl, ActionOutcome};
use crate::artifacts::ballots::BallotsStatement;
use crate::artifacts::mix::{Mix, MixStatement};
use crate::artifacts::public_key::PublicKey;
use crate::artifacts::signable::Statement;
use crate::ids::TrusteeId;
use crate::names::Name;
use crate::permutation;
use mixlib::Ciphertext;
use num_bigint_dig::BigUint;
use rand::seq::SliceRandom;
use rand::rngs::OsRng;

pub fn add_mix(ctx: &ActionContext, item: usize) -> Result<ActionOutcome, ActionError> {
    let (config, params, config_hash) = valid_config_hash(ctx)?;
    let n = config.trustee_count();
    let self_position = permutation::position(ctx.self_id.position(), item, n);

    for k in 1..self_position {
        let earlier_mixer = TrusteeId::new(permutation::trustee_at_position(k, item, n))
            .expect("positions are 1-based");
        load_required(ctx.board, Name::Mix(item, earlier_mixer))?;
        load_required(ctx.board, Name::MixSig(item, earlier_mixer, ctx.self_id))?;
    }

    let (parent_ciphertexts, parent_hash): (Vec<Ciphertext>, String) = if self_position == 1 {
        let ballots: crate::artifacts::ballots::Ballots =
            deserialize("Ballots", &load_required(ctx.board, Name::Ballots(item))?)?;
        let ballots_stmt: BallotsStatement =
            deserialize("BallotsStatement", &load_required(ctx.board, Name::BallotsStmt(item))?)?;
        (ballots.ciphertexts, ballots_stmt.ballots_hash)
    } else {
        let prev_mixer = TrusteeId::new(permutation::trustee_at_position(self_position - 1, item, n))
            .expect("positions are 1-based");
        let prev_mix_text = String::from_utf8(load_required(ctx.board, Name::Mix(item, prev_mixer))?)
            .map_err(|_| ActionErrorImpl::Protocol("previous mix payload is not UTF-8".to_string()))?;
        let prev_mix = Mix::decode(&prev_mix_text)?;
        let prev_stmt: MixStatement =
            deserialize("MixStatement", &load_required(ctx.board, Name::MixStmt(item, prev_mixer))?)?;
        (prev_mix.ciphertexts, prev_stmt.mix_hash)
    };

    let public_key: PublicKey = deserialize("PublicKey", &load_required(ctx.board, Name::PublicKey(item))?)?;
    let pk = BigUint::parse_bytes(public_key.value.as_bytes(), 10)
        .ok_or_else(|| ActionErrorImpl::Protocol("public key value is not decimal".to_string()))?;

    let permutation = match ctx.board.get_pre_shuffle_data_local(&Name::PermData(item, ctx.self_id)) {
        Some(data) if data.permutation.len() == parent_ciphertexts.len() => data.permutation,
        _ => {
            let mut perm: Vec<usize> = (0..parent_ciphertexts.len()).collect();
            perm.shuffle(&mut OsRng);
            perm
        }
    };

    let domain = format!("item-{item}:trustee-{}", ctx.self_id);
    let result = mixlib::shuffle(&params, &pk, &parent_ciphertexts, &permutation, domain.as_bytes())?;
    ctx.board.rm_pre_shuffle_data_local(&Name::PermData(item, ctx.self_id));

    let mix = Mix {
        ciphertexts: result.outputs,
        proof: result.proof,
    };
    let statement = mix.statement(&parent_hash, &config_hash, item, ctx.self_id.position())?;
    let signature = statement.sign(&ctx.keystore.private_key)?;

    ctx.board.add_triple(
        Name::Mix(item, ctx.self_id),
        mix.encode()?.into_bytes(),
        Name::MixStmt(item, ctx.self_id),
        serde_json::to_vec(&statement).map_err(|e| ActionErrorImpl::Deserialize {
            what: "MixStatement",
            source: e,
        })?,
        Name::MixSig(item, ctx.self_id, ctx.self_id),
        signature,
    )?;
    Ok(ActionOutcome::Ok)
}

impl From<mixlib::MixlibError> for super::ActionError {
    fn from(e: mixlib::MixlibError) -> Self {
        ActionErrorImpl::Protocol(format!("shuffle failed: {e}")).into()
    }
}

impl From<crate::artifacts::mix::MixError> for super::ActionError {
    fn from(e: crate::artifacts::mix::MixError) -> Self {
        ActionErrorImpl::Protocol(format!("mix encoding failed: {e}")).into()
    }
}
