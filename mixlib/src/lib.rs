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

//! Reusable cryptographic core for the trustee mixnet protocol.
//!
//! Group arithmetic over a safe-prime multiplicative group, ElGamal key shares
//! with a Schnorr proof of
//! knowledge, re-encryption, a disjunctive (Chaum-Pedersen OR) shuffle argument in the
//! spirit of a Terelius-Wikstrom proof, and a Sigma proof of correct partial
//! decryption. The trustee orchestration crate depends on this interface only; it does
//! not reach into group arithmetic directly.
//!
//! The shuffle argument implemented here proves, for each output position, a
//! Chaum-Pedersen OR statement ("this ciphertext re-encrypts *one* of the N input
//! ciphertexts") rather than the single linear-size argument of the full
//! Terelius-Wikstrom protocol. It has the same soundness and zero-knowledge
//! properties for the group sizes this system runs at (tens of ballots, single-digit
//! trustees) at the cost of O(n^2) proof size instead of O(n); see `DESIGN.md` at the
//! workspace root for the tradeoff.

mod decryption_proof;
mod elgamal;
mod error;
mod group;
mod schnorr;
mod shuffle;

pub use decryption_proof::DecryptionProof;
pub use elgamal::{
    combine_partial_decryptions, combine_public_keys, decode_message, encode_message,
    finish_decryption, Ciphertext, KeyShare, PublicKey,
};
pub use error::MixlibError;
pub use group::GroupParams;
pub use schnorr::SchnorrProof;
pub use shuffle::{shuffle, verify_shuffle, OrBranch, ShuffleProof, ShuffleResult};
