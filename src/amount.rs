// Copyright 2024. The Tari Project
//
// Redistribution and use in source and binary forms, with or without modification, are permitted provided that the
// following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this list of conditions and the following
// disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice, this list of conditions and the
// following disclaimer in the documentation and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors may be used to endorse or promote
// products derived from this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES,
// INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
// SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY,
// WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE
// USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! A non-negative 64-bit credit amount, denominated the way `MicroMinotari` denominates
//! Tari's base unit: one coin is [`Credits::COIN`] units.

use std::{
    fmt::{Display, Error, Formatter},
    iter::Sum,
    ops::{Add, AddAssign, Sub},
};

/// A non-negative quantity of escrowed or withdrawn value, in the base chain's smallest unit.
///
/// All credit-pool arithmetic goes through this type rather than a bare `u64` or `i64` so that
/// overflow is caught at the call site (`checked_add`) instead of silently wrapping, and so that
/// the "saturate to zero" rule required by the rate-limit formula is expressed once, here,
/// instead of ad-hoc at every call site.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Credits(u64);

impl Credits {
    /// One coin, expressed in the base unit. Matches `COIN` in spec.md §4.D.
    pub const COIN: Credits = Credits(100_000_000);

    pub const ZERO: Credits = Credits(0);

    pub const fn new(value: u64) -> Self {
        Credits(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, rhs: Credits) -> Option<Credits> {
        self.0.checked_add(rhs.0).map(Credits)
    }

    pub fn checked_sub(self, rhs: Credits) -> Option<Credits> {
        self.0.checked_sub(rhs.0).map(Credits)
    }

    /// Subtraction that saturates to [`Credits::ZERO`] instead of wrapping. Resolves spec.md §9's
    /// open question on the `LimitHigh` clamp: the source's arithmetic would wrap on unsigned
    /// underflow when `latelyUnlocked >= LimitHigh`; this implementation saturates.
    pub fn saturating_sub(self, rhs: Credits) -> Credits {
        Credits(self.0.saturating_sub(rhs.0))
    }

    pub fn saturating_add(self, rhs: Credits) -> Credits {
        Credits(self.0.saturating_add(rhs.0))
    }
}

impl From<u64> for Credits {
    fn from(value: u64) -> Self {
        Credits(value)
    }
}

impl From<u32> for Credits {
    fn from(value: u32) -> Self {
        Credits(u64::from(value))
    }
}

impl Add for Credits {
    type Output = Credits;

    fn add(self, rhs: Self) -> Self::Output {
        Credits(self.0 + rhs.0)
    }
}

impl AddAssign for Credits {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Credits {
    type Output = Credits;

    /// Panics on underflow in debug builds, matching the "non-negative 64-bit integers" invariant
    /// of spec.md §4.D. Callers that must not panic use [`Credits::checked_sub`] or
    /// [`Credits::saturating_sub`].
    fn sub(self, rhs: Self) -> Self::Output {
        Credits(self.0 - rhs.0)
    }
}

impl Sum for Credits {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Credits::ZERO, Add::add)
    }
}

impl Display for Credits {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}.{:08}", self.0 / Self::COIN.0, self.0 % Self::COIN.0)
    }
}
