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

//! `AddPreShuffleData(item)`: the offline phase of the
//! Terelius-Wikstrom split — a fresh permutation and re-encryption randomness,
//! kept LOCAL only. Safe to run in parallel across
//! items since it touches no shared board state.

use super::{deserialize, load_required, valid_config_hash, ActionContext, ActionError, ActionOutcome};
use crate::artifacts::ballots::Ballots;
use crate::artifacts::pre_shuffle_data::PreShuffleData;
use crate::names::Name;
use rand::seq::SliceRandom;
use rand::rngs::OsRng;

pub fn add_pre_shuffle_data(ctx: &ActionContext, item: usize) -> Result<ActionOutcome, ActionError> {
    let (_config, params, _config_hash) = valid_config_hash(ctx)?;

    let ballots: Ballots = deserialize("Ballots", &load_required(ctx.board, Name::Ballots(item))?)?;
    let n = ballots.ciphertexts.len();

    let mut permutation: Vec<usize> = (0..n).collect();
    permutation.shuffle(&mut OsRng);
    let randomness = (0..n).map(|_| params.random_exponent()).collect();

    ctx.board.add_pre_shuffle_data_local(
        Name::PermData(item, ctx.self_id),
        PreShuffleData::new(permutation, randomness),
    );
    Ok(ActionOutcome::Ok)
}
