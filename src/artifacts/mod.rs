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

//! The artifact model: every record type the board can hold, and the
//! `Statement` each one is signed through — one file per artifact kind.

pub mod ballots;
pub mod config;
pub mod decryption;
pub mod mix;
pub mod plaintexts;
pub mod pre_shuffle_data;
pub mod public_key;
pub mod share;
pub mod signable;

pub use ballots::{Ballots, BallotsError, BallotsStatement};
pub use config::{Config, ConfigError, ConfigStatement};
pub use decryption::{DecryptionStatement, PartialDecryption, PartialDecryptionError};
pub use mix::{Mix, MixError, MixStatement};
pub use plaintexts::{Plaintexts, PlaintextsError, PlaintextsStatement};
pub use pre_shuffle_data::PreShuffleData;
pub use public_key::{PublicKey, PublicKeyError, PublicKeyStatement};
pub use share::{Share, ShareError, ShareStatement};
pub use signable::{SignableError, Statement};
