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

//! Arithmetic over the prime-order subgroup of `(Z/pZ)*` for a safe prime `p`.

use num_bigint_dig::{BigInt, BigUint, RandBigInt};
use num_traits::{One, Zero};
use openssl::hash::{Hasher, MessageDigest};
use rand::rngs::OsRng;

/// The group description shared by every trustee: `p` is a safe prime (`p = 2q + 1`
/// with `q` itself prime), `g` generates the order-`q` subgroup of quadratic residues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupParams {
    pub p: BigUint,
    pub g: BigUint,
}

impl GroupParams {
    pub fn new(p: BigUint, g: BigUint) -> Self {
        Self { p, g }
    }

    /// The order of the subgroup generated by `g`: `(p - 1) / 2`.
    pub fn q(&self) -> BigUint {
        (&self.p - BigUint::one()) / BigUint::from(2u8)
    }

    pub fn modpow(&self, base: &BigUint, exp: &BigUint) -> BigUint {
        base.modpow(exp, &self.p)
    }

    pub fn g_pow(&self, exp: &BigUint) -> BigUint {
        self.modpow(&self.g, exp)
    }

    /// Multiply two group elements mod `p`.
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    /// Divide `a` by `b` mod `p` (`a * b^-1`).
    pub fn div(&self, a: &BigUint, b: &BigUint) -> BigUint {
        self.mul(a, &self.inverse(b))
    }

    /// Modular inverse of `a` in `(Z/pZ)*`, via the extended Euclidean algorithm.
    pub fn inverse(&self, a: &BigUint) -> BigUint {
        mod_inverse(a, &self.p)
    }

    /// A fresh random exponent in `[1, q)`, drawn with the OS RNG.
    pub fn random_exponent(&self) -> BigUint {
        let q = self.q();
        let mut rng = OsRng;
        loop {
            let r = rng.gen_biguint_below(&q);
            if !r.is_zero() {
                return r;
            }
        }
    }

    /// Deterministically derive the `i`-th independent generator of the subgroup by
    /// hashing the index and squaring into the subgroup of quadratic residues. Used to
    /// build the permutation-commitment bases; every trustee derives the same bases
    /// from the same `(p, g, i)`, so no separate setup/CRS step is required.
    pub fn independent_generator(&self, i: usize, domain: &[u8]) -> BigUint {
        let mut seed = domain.to_vec();
        seed.extend_from_slice(&i.to_le_bytes());
        let mut counter: u32 = 0;
        loop {
            let mut input = seed.clone();
            input.extend_from_slice(&counter.to_le_bytes());
            let digest = sha256(&input);
            let candidate = BigUint::from_bytes_be(&digest) % &self.p;
            if !candidate.is_zero() {
                let sq = self.modpow(&candidate, &BigUint::from(2u8));
                if sq != BigUint::one() {
                    return sq;
                }
            }
            counter += 1;
        }
    }
}

fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Hasher::new(MessageDigest::sha256()).expect("openssl hasher init");
    hasher.update(data).expect("openssl hasher update");
    hasher.finish().expect("openssl hasher finish").to_vec()
}

/// Extended-Euclidean modular inverse; `a` must be coprime with `m`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> BigUint {
    let (mut old_r, mut r) = (BigInt::from_biguint(num_bigint_dig::Sign::Plus, a.clone()), {
        BigInt::from_biguint(num_bigint_dig::Sign::Plus, m.clone())
    });
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    while !r.is_zero() {
        let quotient = &old_r / &r;
        let tmp_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, tmp_r);
        let tmp_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, tmp_s);
    }
    let m_signed = BigInt::from_biguint(num_bigint_dig::Sign::Plus, m.clone());
    let result = ((old_s % &m_signed) + &m_signed) % &m_signed;
    result.to_biguint().expect("non-negative by construction")
}

/// Fiat-Shamir: hash an ordered list of group elements and a domain tag to a
/// challenge in `[0, q)`.
pub fn hash_challenge(params: &GroupParams, domain: &[u8], elements: &[&BigUint]) -> BigUint {
    let mut hasher = Hasher::new(MessageDigest::sha256()).expect("openssl hasher init");
    hasher.update(domain).expect("hasher update");
    for e in elements {
        hasher.update(&e.to_bytes_be()).expect("hasher update");
    }
    let digest = hasher.finish().expect("hasher finish");
    BigUint::from_bytes_be(&digest) % params.q()
}
