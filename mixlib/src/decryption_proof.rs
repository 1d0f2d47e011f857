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

//! Sigma proof that a partial decryption was computed with the same secret exponent
//! as the trustee's public share, as checked during `AddDecryption`: a
//! Chaum-Pedersen proof of equality of discrete logarithms,
//! `log_g(public) == log_a(partial)`.

use crate::group::{hash_challenge, GroupParams};
use num_bigint_dig::BigUint;
use serde::{Deserialize, Serialize};

const DOMAIN_TAG: &[u8] = b"mixlib/decryption-proof-v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionProof {
    pub commitment_g: BigUint,
    pub commitment_a: BigUint,
    pub response: BigUint,
}

impl DecryptionProof {
    /// `secret` is the trustee's key share exponent; `public = g^secret`; `a` is the
    /// ciphertext's first component; `partial = a^secret` is the value being attested.
    pub fn generate(
        params: &GroupParams,
        secret: &BigUint,
        public: &BigUint,
        a: &BigUint,
        partial: &BigUint,
        domain: &[u8],
    ) -> Self {
        let w = params.random_exponent();
        let t1 = params.g_pow(&w);
        let t2 = params.modpow(a, &w);
        let c = Self::challenge(params, public, a, partial, &t1, &t2, domain);
        let cx = (&c * secret) % params.q();
        let s = (&w + &cx) % params.q();
        DecryptionProof {
            commitment_g: t1,
            commitment_a: t2,
            response: s,
        }
    }

    pub fn verify(
        &self,
        params: &GroupParams,
        public: &BigUint,
        a: &BigUint,
        partial: &BigUint,
        domain: &[u8],
    ) -> bool {
        let c = Self::challenge(params, public, a, partial, &self.commitment_g, &self.commitment_a, domain);
        let lhs1 = params.g_pow(&self.response);
        let rhs1 = params.mul(&self.commitment_g, &params.modpow(public, &c));
        let lhs2 = params.modpow(a, &self.response);
        let rhs2 = params.mul(&self.commitment_a, &params.modpow(partial, &c));
        lhs1 == rhs1 && lhs2 == rhs2
    }

    #[allow(clippy::too_many_arguments)]
    fn challenge(
        params: &GroupParams,
        public: &BigUint,
        a: &BigUint,
        partial: &BigUint,
        t1: &BigUint,
        t2: &BigUint,
        domain: &[u8],
    ) -> BigUint {
        let mut tag = DOMAIN_TAG.to_vec();
        tag.extend_from_slice(domain);
        hash_challenge(params, &tag, &[public, a, partial, t1, t2])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::elgamal::{Ciphertext, KeyShare};

    fn params() -> GroupParams {
        GroupParams::new(BigUint::from(23u32), BigUint::from(4u32))
    }

    #[test]
    fn test_generate_and_verify() {
        let params = params();
        let share = KeyShare::generate(&params);
        let m = BigUint::from(2u32);
        let ct = Ciphertext::encrypt(&params, &share.public, &m, &params.random_exponent());
        let partial = ct.partial_decrypt(&params, &share.secret);
        let proof = DecryptionProof::generate(&params, &share.secret, &share.public, &ct.a, &partial, b"item-0");
        assert!(proof.verify(&params, &share.public, &ct.a, &partial, b"item-0"));
    }

    #[test]
    fn test_verify_rejects_forged_partial() {
        let params = params();
        let share = KeyShare::generate(&params);
        let other = KeyShare::generate(&params);
        let m = BigUint::from(2u32);
        let ct = Ciphertext::encrypt(&params, &share.public, &m, &params.random_exponent());
        // partial decryption computed with the WRONG secret
        let forged_partial = ct.partial_decrypt(&params, &other.secret);
        let proof = DecryptionProof::generate(&params, &other.secret, &share.public, &ct.a, &forged_partial, b"item-0");
        // proof is internally consistent for `other`'s key, but claims to speak for `share.public`
        assert!(!proof.verify(&params, &share.public, &ct.a, &forged_partial, b"item-0"));
    }

    #[test]
    fn test_verify_rejects_wrong_domain() {
        let params = params();
        let share = KeyShare::generate(&params);
        let m = BigUint::from(2u32);
        let ct = Ciphertext::encrypt(&params, &share.public, &m, &params.random_exponent());
        let partial = ct.partial_decrypt(&params, &share.secret);
        let proof = DecryptionProof::generate(&params, &share.secret, &share.public, &ct.a, &partial, b"item-0");
        assert!(!proof.verify(&params, &share.public, &ct.a, &partial, b"item-1"));
    }
}
