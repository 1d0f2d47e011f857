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

//! `PreShuffleData`: per trustee, per item, LOCAL only, never
//! published — the permutation and blinding values precomputed for the online
//! shuffle phase. "If ever published it MUST be encrypted", so this type
//! deliberately has no `Serialize`/canonical-JSON path to the board.

use num_bigint_dig::BigUint;

/// The offline phase of the Terelius-Wikstrom split: which input index feeds each
/// output position, and the re-encryption randomness for each. Erased once the
/// matching `Mix` is published.
#[derive(Debug, Clone)]
pub struct PreShuffleData {
    pub permutation: Vec<usize>,
    pub randomness: Vec<BigUint>,
}

impl PreShuffleData {
    pub fn new(permutation: Vec<usize>, randomness: Vec<BigUint>) -> Self {
        Self {
            permutation,
            randomness,
        }
    }
}
