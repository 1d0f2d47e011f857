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

//! ElGamal key shares and ciphertexts over the group described by [`GroupParams`].

use crate::group::GroupParams;
use num_bigint_dig::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

/// A trustee's ElGamal key share: `secret` is kept AES-wrapped at rest by the
/// caller; `public = g^secret mod p` is posted in the clear alongside a
/// [`crate::SchnorrProof`] of knowledge of `secret`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyShare {
    pub secret: BigUint,
    pub public: BigUint,
}

impl KeyShare {
    /// Generate a fresh key share.
    pub fn generate(params: &GroupParams) -> Self {
        let secret = params.random_exponent();
        let public = params.g_pow(&secret);
        KeyShare { secret, public }
    }
}

/// The joint public key: the product of every trustee's public share.
pub type PublicKey = BigUint;

/// Combine per-trustee public shares into the joint public key via group
/// multiplication.
pub fn combine_public_keys(params: &GroupParams, shares: &[BigUint]) -> PublicKey {
    shares
        .iter()
        .fold(BigUint::one(), |acc, share| params.mul(&acc, share))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub a: BigUint,
    pub b: BigUint,
}

impl Ciphertext {
    /// Encrypt group element `m` (see [`encode_message`]) under `pk` with the given
    /// randomness `r`.
    pub fn encrypt(params: &GroupParams, pk: &PublicKey, m: &BigUint, r: &BigUint) -> Self {
        let a = params.g_pow(r);
        let b = params.mul(m, &params.modpow(pk, r));
        Ciphertext { a, b }
    }

    /// Re-randomize this ciphertext under the same public key with fresh randomness
    /// `rho`, without changing the plaintext it decrypts to. Used by `AddMix` to
    /// produce one output entry of the shuffle.
    pub fn re_encrypt(&self, params: &GroupParams, pk: &PublicKey, rho: &BigUint) -> Self {
        Ciphertext {
            a: params.mul(&self.a, &params.g_pow(rho)),
            b: params.mul(&self.b, &params.modpow(pk, rho)),
        }
    }

    /// This trustee's contribution to decrypting the ciphertext: `a^secret mod p`.
    pub fn partial_decrypt(&self, params: &GroupParams, secret: &BigUint) -> BigUint {
        params.modpow(&self.a, secret)
    }
}

/// Combine every trustee's partial decryption of one ciphertext into `a^x mod p`
/// where `x` is the joint private key (never reconstructed).
pub fn combine_partial_decryptions(params: &GroupParams, parts: &[BigUint]) -> BigUint {
    parts
        .iter()
        .fold(BigUint::one(), |acc, part| params.mul(&acc, part))
}

/// Recover the plaintext group element from a ciphertext and the combined partial
/// decryption: `b / (a^x) mod p`.
pub fn finish_decryption(params: &GroupParams, ciphertext: &Ciphertext, combined: &BigUint) -> BigUint {
    params.div(&ciphertext.b, combined)
}

/// Encode a small non-negative integer message into the order-`q` quadratic-residue
/// subgroup of `Z/pZ*`, so that it is a valid ElGamal plaintext: try `m + 1`, and if
/// it is not a quadratic residue use its negation `p - (m + 1)` (exactly one of the
/// two is, since `p` is a safe prime).
pub fn encode_message(params: &GroupParams, m: u64) -> Result<BigUint, crate::MixlibError> {
    let candidate = BigUint::from(m) + BigUint::one();
    if candidate >= params.p {
        return Err(crate::error::E::MessageTooLarge(m.to_string()).into());
    }
    let q = params.q();
    if params.modpow(&candidate, &q) == BigUint::one() {
        Ok(candidate)
    } else {
        Ok(&params.p - &candidate)
    }
}

/// Inverse of [`encode_message`].
pub fn decode_message(params: &GroupParams, y: &BigUint) -> u64 {
    let half = &params.p / BigUint::from(2u8);
    let raw = if y <= &half {
        y.clone()
    } else {
        &params.p - y
    };
    (raw - BigUint::one())
        .to_u64_digits()
        .first()
        .copied()
        .unwrap_or(0)
}
