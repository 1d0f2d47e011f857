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

//! # Library for the trustee orchestration loop of a mixnet e-voting system
//!
//! ## Introduction
//!
//! This crate is the core library driving one trustee's participation in a
//! distributed-key-generation, re-encryption-mix, and threshold-decryption
//! protocol run over an append-only bulletin board. It is a reactive engine: each
//! cycle it observes the board's current key-set, evaluates a fixed set of
//! dispatch rules against that snapshot, and runs whichever single action the
//! rules select (or none, if the trustee is caught up).
//!
//! ## Structure of the project
//!
//! - [`ids`]: 1-based trustee identity.
//! - [`names`]: stable board key naming for every artifact kind.
//! - [`envelope`]: RSA signing, AES wrapping, and SHA-512 hashing primitives.
//! - [`artifacts`]: the wire/on-disk types posted to the board (Config, Share,
//!   PublicKey, Ballots, Mix, PartialDecryption, Plaintexts) and their signable
//!   Statements.
//! - [`condition`]: the small presence/absence predicate algebra the dispatch
//!   rules are built from.
//! - [`permutation`]: the cyclic mix-chain position and decryptor-selection
//!   scheme.
//! - [`config`]: the trustee's own process configuration (`dotenvy`-style flat
//!   key/value file).
//! - [`keystore`]: this trustee's loaded key material and trust list.
//! - [`board`]: the abstract append-only board interface plus a filesystem-backed
//!   and an in-process implementation.
//! - [`rules`]: the pure dispatch-rule evaluation.
//! - [`actions`]: one function per protocol action.
//! - [`driver`]: the cycle loop tying the above together.
//!
//! The library depends on:
//! - [openssl](https://crates.io/crates/openssl) for RSA and AES
//! - [num-bigint-dig](https://crates.io/crates/num-bigint-dig) for group arithmetic
//! - [rayon](https://crates.io/crates/rayon) for the intra-cycle parallel
//!   AddPreShuffleData phase
//! - [tracing](https://crates.io/crates/tracing) for structured logging
//!
//! ## Integration Guide
//!
//! ### Environment Variables
//! | Variable             | Description                                   | Required | Default |
//! | --------------------- | ---------------------------------------------- | :------: | ------- |
//! | `TRUSTEE_CONFIG_PATH` | Path to this trustee's `dotenvy`-style config   |    X     | n/a     |
//! | `RUST_LOG`            | `tracing-subscriber` log filter directive       |          | `info`  |

pub mod actions;
pub mod artifacts;
pub mod board;
pub mod condition;
pub mod config;
pub mod consts;
pub mod driver;
mod error_utils;
pub mod envelope;
pub mod ids;
pub mod keystore;
pub mod names;
pub mod permutation;
pub mod rules;

pub use config::TrusteeConfig;
pub use error_utils::{ErrorChain, Report};
pub use keystore::Keystore;
