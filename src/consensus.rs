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

//! Per-network constants, the Rust analogue of `tari_core::consensus::ConsensusConstants`.
//!
//! The source hard-codes the window, the two limit thresholds and the 48-block expiry directly
//! in `creditpool.cpp`/`assetlocktx.cpp`. SPEC_FULL.md resolves spec.md §9's open question on the
//! expiry constant by lifting all five numbers here, so a network fork can change them without
//! touching validator logic.

use crate::amount::Credits;

/// Identifies which quorum type is authorized to sign asset-unlock withdrawals.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct QuorumType(pub u8);

#[derive(Debug, Clone)]
pub struct ConsensusParams {
    /// Window `W`: number of trailing blocks over which `latelyUnlocked` and `indexes` are
    /// retained. Spec.md §3/§4.D: 576.
    pub window: u32,

    /// `LimitLow`: floor below which the rate-limit formula never clamps. Spec.md §4.D: 100 coin.
    pub limit_low: Credits,

    /// `LimitHigh`: ceiling the rate-limit formula never exceeds. Spec.md §4.D: 1000 coin.
    pub limit_high: Credits,

    /// Number of blocks after `requestedHeight` during which an unlock remains valid. Spec.md
    /// §4.F: 48. The source hard-codes this; this crate makes it per-network configuration.
    pub unlock_expiry_blocks: u32,

    /// SkipSet capacity bound `K`. Spec.md §5: e.g. 10,000.
    pub skip_set_capacity: usize,

    /// How many of the most recent quorums of `asset_locks_quorum_type` are considered "active".
    /// Spec.md §4.F: 2.
    pub active_quorum_count: usize,

    /// Snapshot cache capacity. Spec.md §4.D: 1000, LRU eviction.
    pub snapshot_cache_capacity: usize,

    /// The quorum type configured for asset-lock withdrawals. Spec.md §6.2
    /// `ChainParams::asset_locks_quorum_type`.
    pub asset_locks_quorum_type: QuorumType,
}

impl ConsensusParams {
    /// Constants exactly as literal in spec.md §3/§4.D/§4.F/§5.
    pub fn mainnet() -> Self {
        ConsensusParams {
            window: 576,
            limit_low: Credits::new(100 * Credits::COIN.as_u64()),
            limit_high: Credits::new(1000 * Credits::COIN.as_u64()),
            unlock_expiry_blocks: 48,
            skip_set_capacity: 10_000,
            active_quorum_count: 2,
            snapshot_cache_capacity: 1000,
            asset_locks_quorum_type: QuorumType(1),
        }
    }
}
