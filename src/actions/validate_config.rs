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

//! `ValidateConfig`: runs once per trustee at startup, ahead of
//! `getValidConfigHash` (there is no prior self-signature to check yet).

use super::{deserialize, load_required, ActionContext, ActionError, ActionErrorImpl, ActionOutcome};
use crate::artifacts::config::{Config, ConfigStatement};
use crate::artifacts::signable::Statement;
use crate::consts::MINIMUM_NUMBER_OF_TRUSTEES;
use crate::names::Name;

pub fn validate_config(ctx: &ActionContext) -> Result<ActionOutcome, ActionError> {
    let config_bytes = load_required(ctx.board, Name::Config)?;
    let config: Config = deserialize("Config", &config_bytes)?;

    // (i) shape: at least 2 trustees, no duplicate public keys.
    config.validate_shape(MINIMUM_NUMBER_OF_TRUSTEES)?;

    // (ii) every listed trustee and the ballotbox are in this trustee's trust policy.
    for pem in config
        .trustee_public_keys_pem
        .iter()
        .chain(std::iter::once(&config.ballotbox_public_key_pem))
    {
        if !ctx.keystore.trusts(pem) {
            return Err(ActionErrorImpl::Protocol(
                "config lists a public key not in this trustee's peer set".to_string(),
            )
            .into());
        }
    }

    // (iii) the published ConfigStatement matches recomputation.
    let published_bytes = load_required(ctx.board, Name::ConfigStmt)?;
    let published: ConfigStatement = deserialize("ConfigStatement", &published_bytes)?;
    let recomputed = config.statement()?;
    if recomputed != published {
        return Err(ActionErrorImpl::Protocol(
            "recomputed ConfigStatement does not match the published one".to_string(),
        )
        .into());
    }

    let signature = recomputed.sign(&ctx.keystore.private_key)?;
    ctx.board
        .add_signature(Name::ConfigSig(ctx.self_id), signature)?;
    Ok(ActionOutcome::Ok)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::{Board, InMemoryBoard};
    use crate::keystore::Keystore;
    use openssl::rsa::Rsa;

    fn sample_config(trustee_pems: Vec<String>, ballotbox_pem: String) -> Config {
        Config {
            election_id: "election-1".to_string(),
            name: "Sample".to_string(),
            group_modulus: "23".to_string(),
            group_generator: "4".to_string(),
            item_count: 1,
            ballotbox_public_key_pem: ballotbox_pem,
            trustee_public_keys_pem: trustee_pems,
        }
    }

    fn pem_pair() -> String {
        let rsa = Rsa::generate(2048).unwrap();
        String::from_utf8(rsa.public_key_to_pem().unwrap()).unwrap()
    }

    fn keystore_trusting(trusted: Vec<String>) -> Keystore {
        let dir = tempfile::tempdir().unwrap();
        let priv_path = dir.path().join("priv.pem");
        let pub_path = dir.path().join("pub.pem");
        let aes_path = dir.path().join("aes.key");
        let peers_path = dir.path().join("peers.pem");
        let rsa = Rsa::generate(2048).unwrap();
        std::fs::write(&priv_path, rsa.private_key_to_pem().unwrap()).unwrap();
        std::fs::write(&pub_path, rsa.public_key_to_pem().unwrap()).unwrap();
        std::fs::write(&aes_path, [1u8; crate::consts::AES_KEY_LEN_BYTES]).unwrap();
        std::fs::write(&peers_path, trusted.join("\n")).unwrap();
        let config_path = dir.path().join("trustee.conf");
        std::fs::write(
            &config_path,
            format!(
                "dataStorePath={}\nrepoBaseUri=u\npublicKey={}\nprivateKey={}\naesKey={}\npeers={}\n",
                dir.path().join("store").display(),
                pub_path.display(),
                priv_path.display(),
                aes_path.display(),
                peers_path.display(),
            ),
        )
        .unwrap();
        let cfg = crate::config::TrusteeConfig::from_path(&config_path).unwrap();
        Keystore::load(&cfg).unwrap()
    }

    #[test]
    fn test_rejects_untrusted_peer() {
        let pub_pem = pem_pair();
        let bb_pem = pem_pair();
        let keystore = keystore_trusting(vec!["not-the-right-key".to_string()]);
        let board = InMemoryBoard::new();
        let config = sample_config(vec![pub_pem.clone(), "other-trustee".to_string()], bb_pem);
        board
            .put(&Name::Config, serde_json::to_vec(&config).unwrap())
            .unwrap();
        let stmt = config.statement().unwrap();
        board
            .put(&Name::ConfigStmt, serde_json::to_vec(&stmt).unwrap())
            .unwrap();
        let ctx = ActionContext {
            board: &board,
            keystore: &keystore,
            self_id: crate::ids::TrusteeId::new(1).unwrap(),
        };
        assert!(validate_config(&ctx).is_err());
    }

    #[test]
    fn test_rejects_config_statement_mismatch() {
        let pub_pem = pem_pair();
        let bb_pem = pem_pair();
        let keystore = keystore_trusting(vec![pub_pem.clone(), bb_pem.clone()]);
        let board = InMemoryBoard::new();
        let config = sample_config(vec![pub_pem, "other-trustee".to_string()], bb_pem);
        board
            .put(&Name::Config, serde_json::to_vec(&config).unwrap())
            .unwrap();
        board
            .put(
                &Name::ConfigStmt,
                serde_json::to_vec(&ConfigStatement {
                    config_hash: "wrong-hash".to_string(),
                })
                .unwrap(),
            )
            .unwrap();
        let ctx = ActionContext {
            board: &board,
            keystore: &keystore,
            self_id: crate::ids::TrusteeId::new(1).unwrap(),
        };
        assert!(validate_config(&ctx).is_err());
    }
}
