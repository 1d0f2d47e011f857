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

//! Typed trustee identity: a trustee is identified by its 1-based position,
//! derived from the order of its public key in `Config.trustees`. Position 0 is
//! "not a trustee" and is fatal.

use std::fmt::Display;
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrusteeId(NonZeroUsize);

#[derive(Error, Debug)]
#[error(transparent)]
pub struct TrusteeIdError(#[from] TrusteeIdErrorImpl);

#[derive(Error, Debug)]
enum TrusteeIdErrorImpl {
    #[error("trustee position 0 is not a valid trustee")]
    Zero,
    #[error("trustee position {got} is out of range for {trustee_count} trustees")]
    OutOfRange { got: usize, trustee_count: usize },
}

impl TrusteeId {
    /// Build a `TrusteeId` from a 1-based position, rejecting 0.
    pub fn new(position: usize) -> Result<Self, TrusteeIdError> {
        NonZeroUsize::new(position)
            .map(TrusteeId)
            .ok_or_else(|| TrusteeIdErrorImpl::Zero.into())
    }

    /// Build a `TrusteeId`, also checking it is within `[1, trustee_count]`.
    pub fn new_checked(position: usize, trustee_count: usize) -> Result<Self, TrusteeIdError> {
        let id = Self::new(position)?;
        if position > trustee_count {
            return Err(TrusteeIdErrorImpl::OutOfRange {
                got: position,
                trustee_count,
            }
            .into());
        }
        Ok(id)
    }

    pub fn position(&self) -> usize {
        self.0.get()
    }

    /// Iterate every trustee id for a `Config` listing `trustee_count` trustees.
    pub fn all(trustee_count: usize) -> impl Iterator<Item = TrusteeId> {
        (1..=trustee_count).map(|p| TrusteeId::new(p).expect("p >= 1 by construction"))
    }
}

impl Display for TrusteeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
