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

use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct MixlibError(#[from] MixlibErrorImpl);

#[derive(Error, Debug)]
pub(crate) enum MixlibErrorImpl {
    #[error("group element {0} is not a member of the prime-order subgroup")]
    NotAGroupElement(String),
    #[error("message {0} is too large to encode as a group element")]
    MessageTooLarge(String),
    #[error("ciphertext vector length {got} does not match expected length {expected}")]
    LengthMismatch { got: usize, expected: usize },
    #[error("empty input where at least one element is required")]
    Empty,
}

pub(crate) use MixlibErrorImpl as E;
