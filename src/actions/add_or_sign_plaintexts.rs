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

//! `AddOrSignPlaintexts(item)`: once every trustee's
//! `PartialDecryption` is present and verifies, combine them into the final
//! plaintexts. The designated decryptor
//! publishes; everyone else re-derives and co-signs.

use super::{deserialize, load_required, valid_config_hash, ActionContext, ActionError, ActionErrorImpl, ActionOutcome};
use crate::artifacts::decryption::{DecryptionStatement, PartialDecryption};
use crate::artifacts::mix::Mix;
use crate::artifacts::plaintexts::{Plaintexts, PlaintextsStatement};
use crate::artifacts::share::Share;
use crate::artifacts::signable::Statement;
use crate::envelope::RsaPublicKey;
use crate::ids::TrusteeId;
use crate::names::Name;
use crate::permutation;
use num_bigint_dig::BigUint;

pub fn add_or_sign_plaintexts(ctx: &ActionContext, item: usize) -> Result<ActionOutcome, ActionError> {
    let (config, params, config_hash) = valid_config_hash(ctx)?;
    let n = config.trustee_count();
    let final_mixer = TrusteeId::new(permutation::trustee_at_position(n, item, n))
        .expect("positions are 1-based");
    let final_mix_text = String::from_utf8(load_required(ctx.board, Name::Mix(item, final_mixer))?)
        .map_err(|_| ActionErrorImpl::Protocol("final mix payload is not UTF-8".to_string()))?;
    let final_mix = Mix::decode(&final_mix_text)?;

    let mut decryption_hashes = Vec::with_capacity(n);
    let mut parts_by_entry: Vec<Vec<BigUint>> = vec![Vec::with_capacity(n); final_mix.ciphertexts.len()];
    let mut mix_hash: Option<String> = None;

    for trustee in TrusteeId::all(n) {
        let trustee_pem = &config.trustee_public_keys_pem[trustee.position() - 1];
        let trustee_key = RsaPublicKey::from_pem(trustee_pem.as_bytes())?;

        let payload_text = String::from_utf8(load_required(ctx.board, Name::Decryption(item, trustee))?)
            .map_err(|_| ActionErrorImpl::Protocol(format!("decryption payload for trustee {trustee} is not UTF-8")))?;
        let partial = PartialDecryption::decode(&payload_text)?;
        if partial.parts.len() != final_mix.ciphertexts.len() {
            return Err(ActionErrorImpl::Protocol(format!(
                "trustee {trustee}'s partial decryption has the wrong number of parts"
            ))
            .into());
        }

        let stmt: DecryptionStatement =
            deserialize("DecryptionStatement", &load_required(ctx.board, Name::DecryptionStmt(item, trustee))?)?;
        let recomputed = partial.statement(&stmt.mix_hash, &config_hash, item)?;
        if recomputed != stmt {
            return Err(ActionErrorImpl::Protocol(format!(
                "recomputed DecryptionStatement for trustee {trustee} does not match the published one"
            ))
            .into());
        }
        let sig = load_required(ctx.board, Name::DecryptionSig(item, trustee))?;
        if !stmt.verify(&trustee_key, &sig)? {
            return Err(ActionErrorImpl::Protocol(format!(
                "decryption signature for trustee {trustee} does not verify"
            ))
            .into());
        }
        match &mix_hash {
            None => mix_hash = Some(stmt.mix_hash.clone()),
            Some(existing) if *existing != stmt.mix_hash => {
                return Err(ActionErrorImpl::Protocol(
                    "trustees disagree on which mix they decrypted".to_string(),
                )
                .into())
            }
            _ => {}
        }

        // Every verifier may skip re-checking its own Sigma proof.
        if trustee != ctx.self_id {
            let share: Share = deserialize("Share", &load_required(ctx.board, Name::Share(item, trustee))?)?;
            let public = BigUint::parse_bytes(share.public.as_bytes(), 10).ok_or_else(|| {
                ActionErrorImpl::Protocol(format!("share public value for trustee {trustee} is not decimal"))
            })?;
            for (i, ct) in final_mix.ciphertexts.iter().enumerate() {
                let domain = format!("item-{item}:decryptor-{trustee}:{i}");
                if !partial.proofs[i].verify(&params, &public, &ct.a, &partial.parts[i], domain.as_bytes()) {
                    return Err(ActionErrorImpl::Protocol(format!(
                        "Sigma proof for trustee {trustee}'s partial decryption of entry {i} does not verify"
                    ))
                    .into());
                }
            }
        }

        decryption_hashes.push(stmt.decryption_hash.clone());
        for (i, part) in partial.parts.into_iter().enumerate() {
            parts_by_entry[i].push(part);
        }
    }

    let messages: Vec<u64> = final_mix
        .ciphertexts
        .iter()
        .zip(parts_by_entry.iter())
        .map(|(ct, parts)| {
            let combined = mixlib::combine_partial_decryptions(&params, parts);
            let y = mixlib::finish_decryption(&params, ct, &combined);
            mixlib::decode_message(&params, &y)
        })
        .collect();

    let plaintexts = Plaintexts { messages };
    let decryptions_hash = Plaintexts::decryptions_hash(&decryption_hashes)?;
    let recomputed_statement = plaintexts.statement(&decryptions_hash, &config_hash, item)?;

    match load_optional_statement(ctx, item)? {
        None => {
            let decryptor = permutation::decryptor_for_item(item, n);
            if ctx.self_id.position() != decryptor {
                return Err(ActionErrorImpl::Protocol(format!(
                    "no Plaintexts on the board and this trustee is not the designated decryptor ({decryptor})"
                ))
                .into());
            }
            let signature = recomputed_statement.sign(&ctx.keystore.private_key)?;
            ctx.board.add_triple(
                Name::Plaintexts(item),
                serde_json::to_vec(&plaintexts).map_err(|e| ActionErrorImpl::Deserialize {
                    what: "Plaintexts",
                    source: e,
                })?,
                Name::PlaintextsStmt(item),
                serde_json::to_vec(&recomputed_statement).map_err(|e| ActionErrorImpl::Deserialize {
                    what: "PlaintextsStatement",
                    source: e,
                })?,
                Name::PlaintextsSig(item, ctx.self_id),
                signature,
            )?;
        }
        Some(published) => {
            if published != recomputed_statement {
                return Err(ActionErrorImpl::Protocol(
                    "recomputed PlaintextsStatement does not match the published one".to_string(),
                )
                .into());
            }
            let signature = recomputed_statement.sign(&ctx.keystore.private_key)?;
            ctx.board
                .add_signature(Name::PlaintextsSig(item, ctx.self_id), signature)?;
        }
    }
    Ok(ActionOutcome::Ok)
}

fn load_optional_statement(ctx: &ActionContext, item: usize) -> Result<Option<PlaintextsStatement>, ActionError> {
    match ctx.board.get(&Name::PlaintextsStmt(item))? {
        None => Ok(None),
        Some(bytes) => Ok(Some(deserialize("PlaintextsStatement", &bytes)?)),
    }
}

impl From<crate::artifacts::mix::MixError> for super::ActionError {
    fn from(e: crate::artifacts::mix::MixError) -> Self {
        ActionErrorImpl::Protocol(format!("mix encoding failed: {e}")).into()
    }
}

impl From<crate::artifacts::decryption::PartialDecryptionError> for super::ActionError {
    fn from(e: crate::artifacts::decryption::PartialDecryptionError) -> Self {
        ActionErrorImpl::Protocol(format!("partial decryption encoding failed: {e}")).into()
    }
}
