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

//! Canonical string keys for every artifact on the board. A total
//! function from (kind, item, trustee[, cosigner]) to a stable key string, used both
//! as condition-engine tokens and as board keys.

use crate::ids::TrusteeId;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Name {
    Config,
    ConfigStmt,
    ConfigSig(TrusteeId),
    Pause,
    Error,
    ErrorFor(TrusteeId),

    Share(usize, TrusteeId),
    ShareStmt(usize, TrusteeId),
    ShareSig(usize, TrusteeId),

    PublicKey(usize),
    PublicKeyStmt(usize),
    PublicKeySig(usize, TrusteeId),

    Ballots(usize),
    BallotsStmt(usize),
    BallotsSig(usize),

    /// Local only (never published): the offline-phase permutation data.
    PermData(usize, TrusteeId),

    Mix(usize, TrusteeId),
    MixStmt(usize, TrusteeId),
    /// item, mixer (whose Mix is being signed), signer.
    MixSig(usize, TrusteeId, TrusteeId),

    Decryption(usize, TrusteeId),
    DecryptionStmt(usize, TrusteeId),
    DecryptionSig(usize, TrusteeId),

    Plaintexts(usize),
    PlaintextsStmt(usize),
    PlaintextsSig(usize, TrusteeId),
}

impl Name {
    /// Whether this key denotes a local-only artifact that must never be published
    /// to the board.
    pub fn is_local_only(&self) -> bool {
        matches!(self, Name::PermData(_, _))
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Name::Config => write!(f, "CONFIG"),
            Name::ConfigStmt => write!(f, "CONFIG_STMT"),
            Name::ConfigSig(auth) => write!(f, "CONFIG_SIG:{auth}"),
            Name::Pause => write!(f, "PAUSE"),
            Name::Error => write!(f, "ERROR"),
            Name::ErrorFor(auth) => write!(f, "ERROR:{auth}"),

            Name::Share(item, auth) => write!(f, "SHARE:{item}:{auth}"),
            Name::ShareStmt(item, auth) => write!(f, "SHARE_STMT:{item}:{auth}"),
            Name::ShareSig(item, auth) => write!(f, "SHARE_SIG:{item}:{auth}"),

            Name::PublicKey(item) => write!(f, "PUBLIC_KEY:{item}"),
            Name::PublicKeyStmt(item) => write!(f, "PUBLIC_KEY_STMT:{item}"),
            Name::PublicKeySig(item, auth) => write!(f, "PUBLIC_KEY_SIG:{item}:{auth}"),

            Name::Ballots(item) => write!(f, "BALLOTS:{item}"),
            Name::BallotsStmt(item) => write!(f, "BALLOTS_STMT:{item}"),
            Name::BallotsSig(item) => write!(f, "BALLOTS_SIG:{item}"),

            Name::PermData(item, auth) => write!(f, "PERM_DATA:{item}:{auth}"),

            Name::Mix(item, auth) => write!(f, "MIX:{item}:{auth}"),
            Name::MixStmt(item, auth) => write!(f, "MIX_STMT:{item}:{auth}"),
            Name::MixSig(item, mixer, signer) => write!(f, "MIX_SIG:{item}:{mixer}:{signer}"),

            Name::Decryption(item, auth) => write!(f, "DECRYPTION:{item}:{auth}"),
            Name::DecryptionStmt(item, auth) => write!(f, "DECRYPTION_STMT:{item}:{auth}"),
            Name::DecryptionSig(item, auth) => write!(f, "DECRYPTION_SIG:{item}:{auth}"),

            Name::Plaintexts(item) => write!(f, "PLAINTEXTS:{item}"),
            Name::PlaintextsStmt(item) => write!(f, "PLAINTEXTS_STMT:{item}"),
            Name::PlaintextsSig(item, auth) => write!(f, "PLAINTEXTS_SIG:{item}:{auth}"),
        }
    }
}
