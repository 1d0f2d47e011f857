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

//! Cyclic permutation scheme mapping (trustee, item) to mix-chain position
//!.

/// Mix-chain position of trustee `t` for item `p`, among `n` trustees.
/// `pos(t, p, n) = ((t - 1) + (p - 1)) mod n + 1`.
pub fn position(trustee: usize, item: usize, trustee_count: usize) -> usize {
    ((trustee - 1) + (item - 1)) % trustee_count + 1
}

/// Inverse of [`position`]: which trustee mixes at position `k` for item `p`.
/// `inv(k, p, n) = ((k - 1) + (n - (p - 1))) mod n + 1`.
pub fn trustee_at_position(position: usize, item: usize, trustee_count: usize) -> usize {
    ((position - 1) + (trustee_count - (item - 1) % trustee_count)) % trustee_count + 1
}

/// The trustee designated to assemble and first-sign Plaintexts for item `p`:
/// `((p - 1) mod n) + 1`. This load-spreading variant is used instead of always
/// designating trustee #1, so the decryption-publishing work rotates across items.
pub fn decryptor_for_item(item: usize, trustee_count: usize) -> usize {
    (item - 1) % trustee_count + 1
}
