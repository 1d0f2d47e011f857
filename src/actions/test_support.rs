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

//! Shared fixtures for action tests: a two-trustee election over the same small
//! (insecure, test-only) group used throughout `mixlib`'s own tests.

use crate::artifacts::config::Config;
use crate::artifacts::signable::Statement;
use crate::board::Board;
use crate::config::TrusteeConfig;
use crate::envelope::RsaPrivateKey;
use crate::ids::TrusteeId;
use crate::keystore::Keystore;
use crate::names::Name;
use mixlib::GroupParams;
use num_bigint_dig::BigUint;
use openssl::rsa::Rsa;

pub struct Fixture {
    pub trustees: Vec<Keystore>,
    pub config: Config,
    pub ballotbox_private_key: RsaPrivateKey,
    #[allow(dead_code)]
    pub _tempdirs: Vec<tempfile::TempDir>,
}

fn load_keystore(peers: &[String]) -> (Keystore, tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let rsa = Rsa::generate(2048).unwrap();
    let priv_path = dir.path().join("priv.pem");
    let pub_path = dir.path().join("pub.pem");
    let aes_path = dir.path().join("aes.key");
    let peers_path = dir.path().join("peers.pem");
    std::fs::write(&priv_path, rsa.private_key_to_pem().unwrap()).unwrap();
    let pub_pem = String::from_utf8(rsa.public_key_to_pem().unwrap()).unwrap();
    std::fs::write(&pub_path, pub_pem.as_bytes()).unwrap();
    std::fs::write(&aes_path, [7u8; crate::consts::AES_KEY_LEN_BYTES]).unwrap();
    std::fs::write(&peers_path, peers.join("\n")).unwrap();
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
    let cfg = TrusteeConfig::from_path(&config_path).unwrap();
    (Keystore::load(&cfg).unwrap(), dir, pub_pem)
}

pub fn fixture() -> Fixture {
    fixture_with_item_count(1)
}

pub fn fixture_with_item_count(item_count: usize) -> Fixture {
    let bb_rsa = Rsa::generate(2048).unwrap();
    let bb_pem = String::from_utf8(bb_rsa.public_key_to_pem().unwrap()).unwrap();
    let ballotbox_private_key = RsaPrivateKey::from_pem(&bb_rsa.private_key_to_pem().unwrap()).unwrap();

    // First pass generates keys without knowing peers; second pass rewrites the
    // peers file once every public key is known, so everyone trusts everyone.
    let mut provisional = Vec::new();
    for _ in 0..2 {
        provisional.push(load_keystore(&[]));
    }
    let pub_pems: Vec<String> = provisional.iter().map(|(_, _, pem)| pem.clone()).collect();
    let mut all_trusted = pub_pems.clone();
    all_trusted.push(bb_pem.clone());

    let mut trustees = Vec::new();
    let mut tempdirs = Vec::new();
    for (keystore, dir, _) in provisional {
        let peers_path = dir.path().join("peers.pem");
        std::fs::write(&peers_path, all_trusted.join("\n")).unwrap();
        let config_path = dir.path().join("trustee.conf");
        let cfg = TrusteeConfig::from_path(&config_path).unwrap();
        trustees.push(Keystore::load(&cfg).unwrap());
        let _ = keystore;
        tempdirs.push(dir);
    }

    let config = Config {
        election_id: "election-fixture".to_string(),
        name: "Fixture Election".to_string(),
        group_modulus: "23".to_string(),
        group_generator: "4".to_string(),
        item_count,
        ballotbox_public_key_pem: bb_pem,
        trustee_public_keys_pem: pub_pems,
    };

    Fixture {
        trustees,
        config,
        ballotbox_private_key,
        _tempdirs: tempdirs,
    }
}

impl Fixture {
    pub fn params(&self) -> GroupParams {
        GroupParams::new(
            BigUint::parse_bytes(self.config.group_modulus.as_bytes(), 10).unwrap(),
            BigUint::parse_bytes(self.config.group_generator.as_bytes(), 10).unwrap(),
        )
    }

    /// Publish Config/ConfigStmt and every trustee's self-signature, so
    /// `valid_config_hash` succeeds for any trustee in the fixture.
    pub fn publish_valid_config(&self, board: &dyn Board) {
        board
            .put(&Name::Config, serde_json::to_vec(&self.config).unwrap())
            .unwrap();
        let stmt = self.config.statement().unwrap();
        board
            .put(&Name::ConfigStmt, serde_json::to_vec(&stmt).unwrap())
            .unwrap();
        for (i, keystore) in self.trustees.iter().enumerate() {
            let id = TrusteeId::new(i + 1).unwrap();
            let sig = stmt.sign(&keystore.private_key).unwrap();
            board.add_signature(Name::ConfigSig(id), sig).unwrap();
        }
    }

    pub fn trustee_id(&self, index: usize) -> TrusteeId {
        TrusteeId::new(index + 1).unwrap()
    }
}
