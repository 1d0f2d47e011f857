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

//! The dispatch rules: a pure
//! function of one cycle's observed key-set to the action(s) that cycle should run.
//! Evaluated against a single snapshot per cycle: the driver may snapshot once per
//! cycle rather than re-reading the board between rule checks.

use crate::artifacts::config::Config;
use crate::condition::Condition;
use crate::ids::TrusteeId;
use crate::names::Name;
use std::collections::HashSet;

/// What a cycle should do globally, before any per-item work (first match wins).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalDispatch {
    Stop(String),
    ValidateConfig,
}

/// What a cycle should do for one item (first match wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
pub enum ItemAction {
    AddShare,
    AddOrSignPublicKey,
    AddPreShuffleData,
    AddMix,
    VerifyMix(TrusteeId),
    AddDecryption,
    AddOrSignPlaintexts,
}

/// Rules 1-3: `PAUSE` present, any `ERROR` present, or this
/// trustee's own ConfigSig missing while Config/ConfigStatement are present.
pub fn global_dispatch(observed: &HashSet<String>, self_id: TrusteeId) -> Option<GlobalDispatch> {
    if observed.contains(&Name::Pause.key()) {
        return Some(GlobalDispatch::Stop("PAUSE is set".to_string()));
    }
    if observed.contains(&Name::Error.key()) || observed.iter().any(|k| k.starts_with("ERROR:")) {
        return Some(GlobalDispatch::Stop("an ERROR artifact is present on the board".to_string()));
    }
    let ready_to_validate = Condition::new()
        .present(Name::Config.key())
        .present(Name::ConfigStmt.key())
        .absent(Name::ConfigSig(self_id).key())
        .eval(observed);
    if ready_to_validate {
        return Some(GlobalDispatch::ValidateConfig);
    }
    None
}

/// Rules 1-9 for a single item, first match wins.
#[allow(clippy::too_many_arguments)]
pub fn item_dispatch(
    observed: &HashSet<String>,
    config: &Config,
    offline_split: bool,
    self_id: TrusteeId,
    item: usize,
) -> Option<ItemAction> {
    let n = config.trustee_count();
    let all_config_sigs_present = TrusteeId::all(n).all(|t| observed.contains(&Name::ConfigSig(t).key()));

    // Rule 1: AddShare.
    if all_config_sigs_present && !observed.contains(&Name::Share(item, self_id).key()) {
        return Some(ItemAction::AddShare);
    }

    let all_shares_present = TrusteeId::all(n).all(|t| {
        observed.contains(&Name::Share(item, t).key())
            && observed.contains(&Name::ShareStmt(item, t).key())
            && observed.contains(&Name::ShareSig(item, t).key())
    });

    // Rule 2: AddOrSignPublicKey (trustee #1, publishing).
    if all_shares_present && self_id.position() == 1 && !observed.contains(&Name::PublicKey(item).key()) {
        return Some(ItemAction::AddOrSignPublicKey);
    }

    // Rule 3: AddOrSignPublicKey (co-signing).
    if all_shares_present
        && observed.contains(&Name::PublicKey(item).key())
        && !observed.contains(&Name::PublicKeySig(item, self_id).key())
    {
        return Some(ItemAction::AddOrSignPublicKey);
    }

    let ballots_present = observed.contains(&Name::Ballots(item).key());
    let self_mix_present = observed.contains(&Name::Mix(item, self_id).key());

    // Rule 4: AddPreShuffleData (offline phase, only when the option is enabled).
    if ballots_present
        && offline_split
        && !observed.contains(&Name::PermData(item, self_id).key())
        && !self_mix_present
    {
        return Some(ItemAction::AddPreShuffleData);
    }

    // Rule 5: AddMix, once every earlier mix-chain position is self-signed.
    let self_position = crate::permutation::position(self_id.position(), item, n);
    let earlier_positions_self_signed = (1..self_position).all(|k| {
        let mixer = crate::permutation::trustee_at_position(k, item, n);
        let mixer_id = TrusteeId::new(mixer).expect("positions are 1-based");
        observed.contains(&Name::Mix(item, mixer_id).key())
            && observed.contains(&Name::MixSig(item, mixer_id, self_id).key())
    });
    if ballots_present && earlier_positions_self_signed && !self_mix_present {
        return Some(ItemAction::AddMix);
    }

    // Rule 6: VerifyMix, for the first other trustee whose Mix this trustee has not
    // yet co-signed.
    for mixer in TrusteeId::all(n) {
        if mixer == self_id {
            continue;
        }
        if observed.contains(&Name::Mix(item, mixer).key())
            && !observed.contains(&Name::MixSig(item, mixer, self_id).key())
        {
            return Some(ItemAction::VerifyMix(mixer));
        }
    }

    // Rule 7: AddDecryption, once every mix in the chain carries this trustee's
    // co-signature.
    let all_mixes_self_signed =
        TrusteeId::all(n).all(|mixer| observed.contains(&Name::MixSig(item, mixer, self_id).key()));
    if all_mixes_self_signed && !observed.contains(&Name::Decryption(item, self_id).key()) {
        return Some(ItemAction::AddDecryption);
    }

    let all_decryptions_present = TrusteeId::all(n).all(|t| observed.contains(&Name::Decryption(item, t).key()));
    let is_decryptor = self_id.position() == crate::permutation::decryptor_for_item(item, n);

    // Rule 8: AddOrSignPlaintexts (decryptor, publishing).
    if all_decryptions_present && is_decryptor && !observed.contains(&Name::Plaintexts(item).key()) {
        return Some(ItemAction::AddOrSignPlaintexts);
    }

    // Rule 9: AddOrSignPlaintexts (co-signing).
    if observed.contains(&Name::Plaintexts(item).key())
        && !observed.contains(&Name::PlaintextsSig(item, self_id).key())
    {
        return Some(ItemAction::AddOrSignPlaintexts);
    }

    None
}

#[cfg(test)]
mod test {
    use super::*;

    fn t(p: usize) -> TrusteeId {
        TrusteeId::new(p).unwrap()
    }

    fn set(keys: &[String]) -> HashSet<String> {
        keys.iter().cloned().collect()
    }

    fn sample_config(n: usize) -> Config {
        Config {
            election_id: "e".to_string(),
            name: "n".to_string(),
            group_modulus: "23".to_string(),
            group_generator: "4".to_string(),
            item_count: 1,
            ballotbox_public_key_pem: "bb".to_string(),
            trustee_public_keys_pem: (0..n).map(|i| format!("key-{i}")).collect(),
        }
    }

    #[test]
    fn test_pause_halts_everything() {
        let observed = set(&[Name::Pause.key()]);
        assert_eq!(
            global_dispatch(&observed, t(1)),
            Some(GlobalDispatch::Stop("PAUSE is set".to_string()))
        );
    }

    #[test]
    fn test_error_halts_everything() {
        let observed = set(&[Name::ErrorFor(t(2)).key()]);
        assert!(matches!(global_dispatch(&observed, t(1)), Some(GlobalDispatch::Stop(_))));
    }

    #[test]
    fn test_validate_config_dispatched_when_self_sig_missing() {
        let observed = set(&[Name::Config.key(), Name::ConfigStmt.key()]);
        assert_eq!(global_dispatch(&observed, t(1)), Some(GlobalDispatch::ValidateConfig));
    }

    #[test]
    fn test_no_global_dispatch_once_validated() {
        let observed = set(&[Name::Config.key(), Name::ConfigStmt.key(), Name::ConfigSig(t(1)).key()]);
        assert_eq!(global_dispatch(&observed, t(1)), None);
    }

    #[test]
    fn test_rule_1_add_share() {
        let config = sample_config(2);
        let observed = set(&[Name::ConfigSig(t(1)).key(), Name::ConfigSig(t(2)).key()]);
        assert_eq!(
            item_dispatch(&observed, &config, false, t(1), 1),
            Some(ItemAction::AddShare)
        );
    }

    #[test]
    fn test_rule_2_trustee_one_publishes_public_key() {
        let config = sample_config(2);
        let mut keys = vec![Name::ConfigSig(t(1)).key(), Name::ConfigSig(t(2)).key()];
        for id in [t(1), t(2)] {
            keys.push(Name::Share(1, id).key());
            keys.push(Name::ShareStmt(1, id).key());
            keys.push(Name::ShareSig(1, id).key());
        }
        let observed = set(&keys);
        assert_eq!(
            item_dispatch(&observed, &config, false, t(1), 1),
            Some(ItemAction::AddOrSignPublicKey)
        );
    }

    #[test]
    fn test_rule_6_verify_mix_targets_unsigned_peer() {
        let config = sample_config(2);
        let mut keys = vec![Name::Ballots(1).key(), Name::Mix(1, t(2)).key()];
        keys.push(Name::MixSig(1, t(2), t(2)).key());
        let observed = set(&keys);
        assert_eq!(
            item_dispatch(&observed, &config, false, t(1), 1),
            Some(ItemAction::VerifyMix(t(2)))
        );
    }

    #[test]
    fn test_no_dispatch_once_idle() {
        let config = sample_config(2);
        let mut keys = vec![Name::ConfigSig(t(1)).key(), Name::ConfigSig(t(2)).key()];
        keys.push(Name::Plaintexts(1).key());
        keys.push(Name::PlaintextsSig(1, t(1)).key());
        for id in [t(1), t(2)] {
            keys.push(Name::Share(1, id).key());
            keys.push(Name::ShareStmt(1, id).key());
            keys.push(Name::ShareSig(1, id).key());
            keys.push(Name::Decryption(1, id).key());
        }
        keys.push(Name::PublicKey(1).key());
        keys.push(Name::PublicKeySig(1, t(1)).key());
        let observed = set(&keys);
        assert_eq!(item_dispatch(&observed, &config, false, t(1), 1), None);
    }
}
