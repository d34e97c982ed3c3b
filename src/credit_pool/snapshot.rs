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

//! The immutable per-block credit-pool view. Spec.md §3/§4.C.

use crate::{amount::Credits, skip_set::SkipSet};

/// Snapshot of the credit pool as witnessed at a particular block. Shared by reference from the
/// builder's cache; a [`crate::credit_pool::diff::CreditPoolDiff`] exclusively owns its own
/// mutable working copy of the fields it needs and never mutates a shared snapshot in place.
#[derive(Debug, Clone)]
pub struct CreditPoolSnapshot {
    /// Coins currently escrowed: running sum of lock burn values minus running sum of unlock
    /// outputs and fees. Authoritative figure, also carried in the coinbase payload.
    pub locked: Credits,

    /// Maximum further unlocks allowed in the very next block.
    pub current_limit: Credits,

    /// Sum of unlocks in the last `W` blocks.
    pub lately_unlocked: Credits,

    /// Every withdrawal index used in the last `W` blocks.
    pub indexes: SkipSet,
}

impl CreditPoolSnapshot {
    /// The empty snapshot before any lock/unlock transaction has ever been mined, e.g. the
    /// platform-chain activation block.
    pub fn genesis(skip_set_capacity: usize) -> Self {
        CreditPoolSnapshot {
            locked: Credits::ZERO,
            current_limit: Credits::ZERO,
            lately_unlocked: Credits::ZERO,
            indexes: SkipSet::new(skip_set_capacity),
        }
    }
}

impl std::fmt::Display for CreditPoolSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CreditPoolSnapshot(locked={}, currentLimit={}, latelyUnlocked={}, indexes.len={})",
            self.locked,
            self.current_limit,
            self.lately_unlocked,
            self.indexes.len()
        )
    }
}
