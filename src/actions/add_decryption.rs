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

//! `AddDecryption(item)`: this is the privacy-critical gate. Before
//! touching this trustee's private key share, reconstruct the mix chain out of
//! nothing but the edges this trustee has personally verified and self-signed, and
//! require it to reduce to a single path from the ballotbox's signed Ballots to a
//! published Mix. Any break in that chain MUST abort with an error and MUST NOT
//! produce a `PartialDecryption` — silently decrypting a ciphertext this trustee
//! never actually verified was shuffled would defeat the entire protocol.

use super::{deserialize, load_required, valid_config_hash, ActionContext, ActionError, ActionErrorImpl, ActionOutcome};
use crate::artifacts::ballots::BallotsStatement;
use crate::artifacts::decryption::PartialDecryption;
use crate::artifacts::mix::{Mix, MixStatement};
use crate::artifacts::share::Share;
use crate::artifacts::signable::Statement;
use crate::envelope::RsaPublicKey;
use crate::ids::TrusteeId;
use crate::names::Name;
use mixlib::{Ciphertext, DecryptionProof};
use num_bigint_dig::BigUint;
use std::collections::HashMap;

pub fn add_decryption(ctx: &ActionContext, item: usize) -> Result<ActionOutcome, ActionError> {
    if ctx
        .board
        .get(&Name::Decryption(item, ctx.self_id))?
        .is_some()
    {
        return Ok(ActionOutcome::Ok);
    }

    let (config, params, config_hash) = valid_config_hash(ctx)?;
    let n = config.trustee_count();

    let ballotbox_key = RsaPublicKey::from_pem(config.ballotbox_public_key_pem.as_bytes())?;
    let ballots_stmt: BallotsStatement =
        deserialize("BallotsStatement", &load_required(ctx.board, Name::BallotsStmt(item))?)?;
    let ballots_sig = load_required(ctx.board, Name::BallotsSig(item))?;
    if !ballots_stmt.verify(&ballotbox_key, &ballots_sig)? {
        return Err(ActionErrorImpl::Protocol(
            "ballotbox signature over BallotsStatement does not verify: refusing to decrypt".to_string(),
        )
        .into());
    }

    // Only edges this trustee has personally self-signed (via AddMix for its own
    // mix or VerifyMix for someone else's) are admitted into the chain.
    let mut edges: HashMap<String, (TrusteeId, String)> = HashMap::new();
    for mixer in TrusteeId::all(n) {
        if ctx
            .board
            .get(&Name::MixSig(item, mixer, ctx.self_id))?
            .is_none()
        {
            return Err(ActionErrorImpl::Protocol(format!(
                "mix chain is not fully self-signed: trustee {mixer}'s mix is missing this trustee's countersignature"
            ))
            .into());
        }
        let stmt: MixStatement =
            deserialize("MixStatement", &load_required(ctx.board, Name::MixStmt(item, mixer))?)?;
        if edges.insert(stmt.parent_hash.clone(), (mixer, stmt.mix_hash.clone())).is_some() {
            return Err(ActionErrorImpl::Protocol(
                "mix chain has two mixes claiming the same parent hash: refusing to decrypt".to_string(),
            )
            .into());
        }
    }

    let mut current_hash = ballots_stmt.ballots_hash.clone();
    let mut final_mixer = None;
    for _ in 0..n {
        let (mixer, next_hash) = edges.remove(&current_hash).ok_or_else(|| {
            ActionErrorImpl::Protocol(
                "mix chain is broken: no self-signed mix extends the current hash; refusing to decrypt".to_string(),
            )
        })?;
        current_hash = next_hash;
        final_mixer = Some(mixer);
    }
    let final_mixer = final_mixer.expect("n >= 2 per ValidateConfig");

    let final_mix_text = String::from_utf8(load_required(ctx.board, Name::Mix(item, final_mixer))?)
        .map_err(|_| ActionErrorImpl::Protocol("final mix payload is not UTF-8".to_string()))?;
    let final_mix = Mix::decode(&final_mix_text)?;
    let final_mix_stmt: MixStatement =
        deserialize("MixStatement", &load_required(ctx.board, Name::MixStmt(item, final_mixer))?)?;
    if final_mix_stmt.mix_hash != current_hash {
        return Err(ActionErrorImpl::Protocol(
            "final mix hash does not match the chain's reconstructed tip: refusing to decrypt".to_string(),
        )
        .into());
    }
    let mix_hash = final_mix_stmt.mix_hash;

    let share: Share = deserialize("Share", &load_required(ctx.board, Name::Share(item, ctx.self_id))?)?;
    let secret_decimal = share.unwrap_private(&ctx.keystore.aes_key)?;
    let secret = BigUint::parse_bytes(secret_decimal.as_bytes(), 10)
        .ok_or_else(|| ActionErrorImpl::Protocol("unwrapped private share is not decimal".to_string()))?;
    let public = BigUint::parse_bytes(share.public.as_bytes(), 10)
        .ok_or_else(|| ActionErrorImpl::Protocol("share public value is not decimal".to_string()))?;

    let domain_prefix = format!("item-{item}:decryptor-{}", ctx.self_id);
    let mut parts = Vec::with_capacity(final_mix.ciphertexts.len());
    let mut proofs = Vec::with_capacity(final_mix.ciphertexts.len());
    for (i, ct) in final_mix.ciphertexts.iter().enumerate() {
        let Ciphertext { a, .. } = ct;
        let partial = ct.partial_decrypt(&params, &secret);
        let domain = format!("{domain_prefix}:{i}");
        let proof = DecryptionProof::generate(&params, &secret, &public, a, &partial, domain.as_bytes());
        parts.push(partial);
        proofs.push(proof);
    }

    let partial_decryption = PartialDecryption::new(parts, proofs)?;
    let statement = partial_decryption.statement(&mix_hash, &config_hash, item)?;
    let signature = statement.sign(&ctx.keystore.private_key)?;

    ctx.board.add_triple(
        Name::Decryption(item, ctx.self_id),
        partial_decryption.encode()?.into_bytes(),
        Name::DecryptionStmt(item, ctx.self_id),
        serde_json::to_vec(&statement).map_err(|e| ActionErrorImpl::Deserialize {
            what: "DecryptionStatement",
            source: e,
        })?,
        Name::DecryptionSig(item, ctx.self_id),
        signature,
    )?;
    Ok(ActionOutcome::Ok)
}

impl From<crate::artifacts::mix::MixError> for super::ActionError {
    fn from(e: crate::artifacts::mix::MixError) -> Self {
        ActionErrorImpl::Protocol(format!("mix encoding failed: {e}")).into()
    }
}

impl From<crate::artifacts::share::ShareError> for super::ActionError {
    fn from(e: crate::artifacts::share::ShareError) -> Self {
        ActionErrorImpl::Protocol(format!("share unwrap failed: {e}")).into()
    }
}

impl From<crate::artifacts::decryption::PartialDecryptionError> for super::ActionError {
    fn from(e: crate::artifacts::decryption::PartialDecryptionError) -> Self {
        ActionErrorImpl::Protocol(format!("partial decryption encoding failed: {e}")).into()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::{Board, InMemoryBoard};
    use crate::names::Name as N;

    fn setup_two_trustee_chain(item: usize) -> (crate::actions::test_support::Fixture, InMemoryBoard, BigUint) {
        let fixture = crate::actions::test_support::fixture();
        let board = InMemoryBoard::new();
        fixture.publish_valid_config(&board);

        for (i, keystore) in fixture.trustees.iter().enumerate() {
            let ctx = ActionContext {
                board: &board,
                keystore,
                self_id: fixture.trustee_id(i),
            };
            super::super::add_share::add_share(&ctx, item).unwrap();
        }
        for (i, keystore) in fixture.trustees.iter().enumerate() {
            let ctx = ActionContext {
                board: &board,
                keystore,
                self_id: fixture.trustee_id(i),
            };
            super::super::add_or_sign_public_key::add_or_sign_public_key(&ctx, item).unwrap();
        }

        let params = fixture.params();
        let public_key: crate::artifacts::public_key::PublicKey =
            serde_json::from_slice(&board.get(&N::PublicKey(item)).unwrap().unwrap()).unwrap();
        let pk = BigUint::parse_bytes(public_key.value.as_bytes(), 10).unwrap();
        let m = mixlib::encode_message(&params, 7).unwrap();
        let ct = mixlib::Ciphertext::encrypt(&params, &pk, &m, &params.random_exponent());
        let ballots = crate::artifacts::ballots::Ballots {
            ciphertexts: vec![ct],
        };
        board.put(&N::Ballots(item), serde_json::to_vec(&ballots).unwrap()).unwrap();
        let ballots_stmt = ballots.statement("whatever-config-hash", item).unwrap();
        board
            .put(&N::BallotsStmt(item), serde_json::to_vec(&ballots_stmt).unwrap())
            .unwrap();
        let ballotbox_sig = ballots_stmt.sign(&fixture.ballotbox_private_key).unwrap();
        board.put(&N::BallotsSig(item), ballotbox_sig).unwrap();

        let n = fixture.config.trustee_count();
        for position in 1..=n {
            let mixer_position = (1..=n)
                .find(|&t| crate::permutation::position(t, item, n) == position)
                .unwrap();
            let mixer = fixture.trustee_id(mixer_position - 1);
            let ctx = ActionContext {
                board: &board,
                keystore: &fixture.trustees[mixer.position() - 1],
                self_id: mixer,
            };
            super::super::add_mix::add_mix(&ctx, item).unwrap();
            for (i, keystore) in fixture.trustees.iter().enumerate() {
                let verifier = fixture.trustee_id(i);
                if verifier == mixer {
                    continue;
                }
                let vctx = ActionContext {
                    board: &board,
                    keystore,
                    self_id: verifier,
                };
                super::super::verify_mix::verify_mix(&vctx, item, mixer).unwrap();
            }
        }
        (fixture, board, pk)
    }

    #[test]
    fn test_publishes_partial_decryption_once_chain_is_fully_self_signed() {
        let (fixture, board, _pk) = setup_two_trustee_chain(1);
        let ctx = ActionContext {
            board: &board,
            keystore: &fixture.trustees[0],
            self_id: fixture.trustee_id(0),
        };
        let outcome = add_decryption(&ctx, 1);
        assert!(outcome.is_ok(), "{outcome:?}");
        assert!(board.get(&N::Decryption(1, fixture.trustee_id(0))).unwrap().is_some());
    }

    #[test]
    fn test_refuses_to_decrypt_when_chain_is_incomplete() {
        let fixture = crate::actions::test_support::fixture();
        let board = InMemoryBoard::new();
        fixture.publish_valid_config(&board);
        let ctx = ActionContext {
            board: &board,
            keystore: &fixture.trustees[0],
            self_id: fixture.trustee_id(0),
        };
        let outcome = add_decryption(&ctx, 1);
        assert!(outcome.is_err());
        assert!(board.get(&N::Decryption(1, fixture.trustee_id(0))).unwrap().is_none());
    }
}
