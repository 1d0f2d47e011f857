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

//! Schnorr proof of knowledge of a discrete logarithm, used for the per-trustee
//! ElGamal key share.

use crate::group::{hash_challenge, GroupParams};
use num_bigint_dig::BigUint;
use serde::{Deserialize, Serialize};

const DOMAIN_TAG: &[u8] = b"mixlib/schnorr-pok-v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchnorrProof {
    pub commitment: BigUint,
    pub response: BigUint,
}

impl SchnorrProof {
    /// Prove knowledge of `x` such that `y = g^x mod p`. `domain` binds the proof to a
    /// specific prover (callers pass the trustee's RSA modulus) so a proof cannot be
    /// replayed by another trustee.
    pub fn prove(params: &GroupParams, x: &BigUint, y: &BigUint, domain: &[u8]) -> Self {
        let w = params.random_exponent();
        let t = params.g_pow(&w);
        let c = Self::challenge(params, y, &t, domain);
        let cx = (&c * x) % params.q();
        let s = (&w + &cx) % params.q();
        SchnorrProof {
            commitment: t,
            response: s,
        }
    }

    pub fn verify(&self, params: &GroupParams, y: &BigUint, domain: &[u8]) -> bool {
        let c = Self::challenge(params, y, &self.commitment, domain);
        let lhs = params.g_pow(&self.response);
        let rhs = params.mul(&self.commitment, &params.modpow(y, &c));
        lhs == rhs
    }

    fn challenge(params: &GroupParams, y: &BigUint, t: &BigUint, domain: &[u8]) -> BigUint {
        let mut tag = DOMAIN_TAG.to_vec();
        tag.extend_from_slice(domain);
        hash_challenge(params, &tag, &[y, t])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> GroupParams {
        GroupParams::new(BigUint::from(23u32), BigUint::from(4u32))
    }

    #[test]
    fn test_prove_and_verify() {
        let params = params();
        let x = BigUint::from(7u32);
        let y = params.g_pow(&x);
        let proof = SchnorrProof::prove(&params, &x, &y, b"trustee-1-modulus");
        assert!(proof.verify(&params, &y, b"trustee-1-modulus"));
    }

    #[test]
    fn test_verify_rejects_wrong_domain() {
        let params = params();
        let x = BigUint::from(7u32);
        let y = params.g_pow(&x);
        let proof = SchnorrProof::prove(&params, &x, &y, b"trustee-1-modulus");
        assert!(!proof.verify(&params, &y, b"trustee-2-modulus"));
    }

    #[test]
    fn test_verify_rejects_wrong_public_value() {
        let params = params();
        let x = BigUint::from(7u32);
        let y = params.g_pow(&x);
        let proof = SchnorrProof::prove(&params, &x, &y, b"dom");
        let wrong_y = params.g_pow(&BigUint::from(8u32));
        assert!(!proof.verify(&params, &wrong_y, b"dom"));
    }
}
