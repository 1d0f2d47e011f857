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

//! `AddShare(item)`: a fresh ElGamal key share with Schnorr POK,
//! AES-wrapped at rest.

use super::{valid_config_hash, ActionContext, ActionError, ActionOutcome};
use crate::artifacts::share::Share;
use crate::artifacts::signable::Statement;
use crate::names::Name;
use mixlib::{KeyShare, SchnorrProof};

pub fn add_share(ctx: &ActionContext, item: usize) -> Result<ActionOutcome, ActionError> {
    let (_config, params, config_hash) = valid_config_hash(ctx)?;

    let key_share = KeyShare::generate(&params);
    // The RSA modulus binds the proof to this trustee
    let domain = ctx.keystore.public_key.to_pem()?;
    let pok = SchnorrProof::prove(&params, &key_share.secret, &key_share.public, &domain);

    let share = Share::wrap(
        &key_share.public.to_string(),
        pok,
        &key_share.secret.to_string(),
        &ctx.keystore.aes_key,
    )?;
    let statement = share.statement(&config_hash, item)?;
    let signature = statement.sign(&ctx.keystore.private_key)?;

    ctx.board.add_triple(
        Name::Share(item, ctx.self_id),
        serde_json::to_vec(&share).map_err(|e| super::ActionErrorImpl::Deserialize {
            what: "Share",
            source: e,
        })?,
        Name::ShareStmt(item, ctx.self_id),
        serde_json::to_vec(&statement).map_err(|e| super::ActionErrorImpl::Deserialize {
            what: "ShareStatement",
            source: e,
        })?,
        Name::ShareSig(item, ctx.self_id),
        signature,
    )?;
    Ok(ActionOutcome::Ok)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::artifacts::share::ShareStatement;
    use crate::board::{Board, InMemoryBoard};

    #[test]
    fn test_publishes_share_triple() {
        let fixture = crate::actions::test_support::fixture();
        let board = InMemoryBoard::new();
        fixture.publish_valid_config(&board);
        let ctx = ActionContext {
            board: &board,
            keystore: &fixture.trustees[0],
            self_id: crate::ids::TrusteeId::new(1).unwrap(),
        };
        let outcome = add_share(&ctx, 1).unwrap();
        assert_eq!(outcome, ActionOutcome::Ok);
        assert!(board.get(&Name::Share(1, ctx.self_id)).unwrap().is_some());
        let stmt_bytes = board.get(&Name::ShareStmt(1, ctx.self_id)).unwrap().unwrap();
        let stmt: ShareStatement = serde_json::from_slice(&stmt_bytes).unwrap();
        assert_eq!(stmt.item, 1);
    }
}
