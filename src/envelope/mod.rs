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

//! RSA signing/verification, AES wrapping of private shares, and streaming digests,
//! built directly against the `openssl` crate for PEM RSA keys and AES-CBC rather
//! than routing through a byte-array wrapper type.

pub mod aes;
pub mod hash;
pub mod rsa;

pub use aes::{AesError, AesKey};
pub use hash::{hex_encode, sha512, sha512_stream, HashError, Sha512Digest};
pub use rsa::{RsaError, RsaPrivateKey, RsaPublicKey};

/// Canonical JSON bytes of a serializable Statement record: UTF-8, no insignificant
/// whitespace, field order following the record's declared struct field order
///. `serde_json::to_vec` already produces field-declaration-ordered,
/// whitespace-free output for a `#[derive(Serialize)]` struct, which is exactly this
/// contract.
pub fn canonical_json<T: serde::Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(value)
}
