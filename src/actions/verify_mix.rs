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

//! `VerifyMix(item, mixer)`: check another trustee's published
//! `Mix` — statement shape, the mixer's own self-signature, and the shuffle proof
//! against the correct parent votes — then co-sign.

use super::{deserialize, load_required, valid_config_hash, ActionContext, ActionError, ActionErrorImpl, ActionOutcome};
use crate::artifacts::ballots::BallotsStatement;
use crate::artifacts::mix::{Mix, MixStatement};
use crate::artifacts::public_key::PublicKey;
use crate::artifacts::signable::Statement;
use crate::envelope::RsaPublicKey;
use crate::ids::TrusteeId;
use crate::names::Name;
use crate::permutation;
use mixlib::Ciphertext;
use num_bigint_dig::BigUint;

pub fn verify_mix(ctx: &ActionContext, item: usize, mixer: TrusteeId) -> Result<ActionOutcome, ActionError> {
    if mixer == ctx.self_id {
        return Err(ActionErrorImpl::Protocol("VerifyMix cannot target this trustee's own Mix".to_string()).into());
    }
    if ctx
        .board
        .get(&Name::MixSig(item, mixer, ctx.self_id))?
        .is_some()
    {
        return Ok(ActionOutcome::Ok);
    }

    let (config, params, config_hash) = valid_config_hash(ctx)?;
    let n = config.trustee_count();
    let mixer_position = permutation::position(mixer.position(), item, n);

    let (parent_ciphertexts, parent_hash): (Vec<Ciphertext>, String) = if mixer_position == 1 {
        let ballots: crate::artifacts::ballots::Ballots =
            deserialize("Ballots", &load_required(ctx.board, Name::Ballots(item))?)?;
        let ballots_stmt: BallotsStatement =
            deserialize("BallotsStatement", &load_required(ctx.board, Name::BallotsStmt(item))?)?;
        (ballots.ciphertexts, ballots_stmt.ballots_hash)
    } else {
        let prev_mixer = TrusteeId::new(permutation::trustee_at_position(mixer_position - 1, item, n))
            .expect("positions are 1-based");
        let prev_mix_text = String::from_utf8(load_required(ctx.board, Name::Mix(item, prev_mixer))?)
            .map_err(|_| ActionErrorImpl::Protocol("previous mix payload is not UTF-8".to_string()))?;
        let prev_mix = Mix::decode(&prev_mix_text)?;
        let prev_stmt: MixStatement =
            deserialize("MixStatement", &load_required(ctx.board, Name::MixStmt(item, prev_mixer))?)?;
        (prev_mix.ciphertexts, prev_stmt.mix_hash)
    };

    let mix_text = String::from_utf8(load_required(ctx.board, Name::Mix(item, mixer))?)
        .map_err(|_| ActionErrorImpl::Protocol("mix payload is not UTF-8".to_string()))?;
    let mix = Mix::decode(&mix_text)?;
    let published_stmt: MixStatement =
        deserialize("MixStatement", &load_required(ctx.board, Name::MixStmt(item, mixer))?)?;
    let recomputed_stmt = mix.statement(&parent_hash, &config_hash, item, mixer.position())?;
    if recomputed_stmt != published_stmt {
        return Err(ActionErrorImpl::Protocol(format!(
            "recomputed MixStatement for trustee {mixer} does not match the published one"
        ))
        .into());
    }

    let mixer_pem = &config.trustee_public_keys_pem[mixer.position() - 1];
    let mixer_key = RsaPublicKey::from_pem(mixer_pem.as_bytes())?;
    let self_sig = load_required(ctx.board, Name::MixSig(item, mixer, mixer))?;
    if !published_stmt.verify(&mixer_key, &self_sig)? {
        return Err(ActionErrorImpl::Protocol(format!("trustee {mixer}'s self-signature over its Mix does not verify")).into());
    }

    let public_key: PublicKey = deserialize("PublicKey", &load_required(ctx.board, Name::PublicKey(item))?)?;
    let pk = BigUint::parse_bytes(public_key.value.as_bytes(), 10)
        .ok_or_else(|| ActionErrorImpl::Protocol("public key value is not decimal".to_string()))?;

    let domain = format!("item-{item}:trustee-{mixer}");
    let valid = mixlib::verify_shuffle(
        &params,
        &pk,
        &parent_ciphertexts,
        &mix.ciphertexts,
        &mix.proof,
        domain.as_bytes(),
    );
    if !valid {
        return Err(ActionErrorImpl::Protocol(format!("shuffle proof for trustee {mixer} does not verify")).into());
    }

    let signature = published_stmt.sign(&ctx.keystore.private_key)?;
    ctx.board
        .add_signature(Name::MixSig(item, mixer, ctx.self_id), signature)?;
    Ok(ActionOutcome::Ok)
}

impl From<crate::artifacts::mix::MixError> for super::ActionError {
    fn from(e: crate::artifacts::mix::MixError) -> Self {
        ActionErrorImpl::Protocol(format!("mix encoding failed: {e}")).into()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::{Board, InMemoryBoard};
    use crate::names::Name as N;

    #[test]
    fn test_cosigns_a_valid_mix() {
        let fixture = crate::actions::test_support::fixture();
        let board = InMemoryBoard::new();
        fixture.publish_valid_config(&board);
        let params = fixture.params();
        let share = mixlib::KeyShare::generate(&params);
        let pk = PublicKey::combine(&params, &[share.public.clone()]);
        board.put(&N::PublicKey(1), serde_json::to_vec(&pk).unwrap()).unwrap();

        let m1 = mixlib::encode_message(&params, 2).unwrap();
        let ct = mixlib::Ciphertext::encrypt(&params, &share.public, &m1, &params.random_exponent());
        let ballots = crate::artifacts::ballots::Ballots {
            ciphertexts: vec![ct],
        };
        board.put(&N::Ballots(1), serde_json::to_vec(&ballots).unwrap()).unwrap();
        let ballots_stmt = ballots.statement("whatever-config-hash", 1).unwrap();
        board
            .put(&N::BallotsStmt(1), serde_json::to_vec(&ballots_stmt).unwrap())
            .unwrap();

        let trustee_count = fixture.config.trustee_count();
        let mixer_position1 = (1..=trustee_count)
            .find(|&t| permutation::position(t, 1, trustee_count) == 1)
            .unwrap();
        let mixer = fixture.trustee_id(mixer_position1 - 1);
        let mixer_keystore = &fixture.trustees[mixer.position() - 1];
        let mixer_ctx = ActionContext {
            board: &board,
            keystore: mixer_keystore,
            self_id: mixer,
        };
        super::super::add_mix::add_mix(&mixer_ctx, 1).unwrap();

        let verifier = (1..=trustee_count)
            .map(|t| fixture.trustee_id(t - 1))
            .find(|&t| t != mixer)
            .unwrap();
        let verifier_ctx = ActionContext {
            board: &board,
            keystore: &fixture.trustees[verifier.position() - 1],
            self_id: verifier,
        };
        let outcome = verify_mix(&verifier_ctx, 1, mixer);
        assert!(outcome.is_ok(), "{outcome:?}");
        assert!(board.get(&N::MixSig(1, mixer, verifier)).unwrap().is_some());
    }
}
