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

//! In-memory fakes of the [`crate::chain`] collaborator traits, for unit and scenario tests.
//!
//! Exposed behind `#[cfg(any(test, feature = "test-support"))]` the same way `tari_core` exposes
//! `test_utils` modules beside the code they exercise, rather than as a separate dev-only crate —
//! this crate has no integration-test harness large enough to warrant that split.

use std::collections::HashMap;

use crate::{
    chain::{Block, BlockHash, BlockIndex, BlockStore, ChainError, CoinbasePayload, Quorum, QuorumManager},
    consensus::QuorumType,
    payload::{BlsSignature, Hash256},
};

/// A linear, in-memory chain of block headers. Each block's parent is the previously pushed one;
/// `ancestor_at` walks backward through an index-by-height map rather than following
/// `parent_hash` pointer-chasing, since that's all a fake needs.
#[derive(Debug, Clone, Default)]
pub struct FakeBlockIndex {
    hash: BlockHash,
    height: i32,
    by_height: HashMap<i32, BlockHash>,
}

impl FakeBlockIndex {
    /// A single free-standing block at `height`, with no reachable ancestors. Sufficient for
    /// validator tests that only inspect `height()`.
    pub fn new(hash: BlockHash, height: i32) -> Self {
        let mut by_height = HashMap::new();
        by_height.insert(height, hash);
        FakeBlockIndex { hash, height, by_height }
    }

    /// Builds a chain of `count` blocks, heights `0..count`, with deterministic hashes, suitable
    /// for exercising [`crate::credit_pool::builder::CreditPoolBuilder`]'s ancestor walk.
    pub fn chain(count: i32) -> Self {
        let mut by_height = HashMap::with_capacity(count as usize);
        for h in 0..count {
            by_height.insert(h, hash_for_height(h));
        }
        FakeBlockIndex {
            hash: hash_for_height(count - 1),
            height: count - 1,
            by_height,
        }
    }
}

fn hash_for_height(height: i32) -> BlockHash {
    let mut hash = [0u8; 32];
    hash[..4].copy_from_slice(&height.to_le_bytes());
    hash
}

impl BlockIndex for FakeBlockIndex {
    fn height(&self) -> i32 {
        self.height
    }

    fn parent_hash(&self) -> BlockHash {
        self.by_height.get(&(self.height - 1)).copied().unwrap_or_default()
    }

    fn block_hash(&self) -> BlockHash {
        self.hash
    }

    fn median_time_past(&self) -> u64 {
        self.height.max(0) as u64 * 600
    }

    fn ancestor_at(&self, height: i32) -> Option<Self> {
        if height > self.height {
            return None;
        }
        let hash = *self.by_height.get(&height)?;
        Some(FakeBlockIndex {
            hash,
            height,
            by_height: self.by_height.clone(),
        })
    }
}

/// An in-memory [`BlockStore`]: blocks and coinbase payloads keyed by hash, populated by the test
/// that constructs one.
#[derive(Default)]
pub struct FakeBlockStore {
    blocks: HashMap<BlockHash, Block>,
    coinbase: HashMap<BlockHash, u64>,
}

impl FakeBlockStore {
    pub fn new() -> Self {
        FakeBlockStore::default()
    }

    pub fn insert_block(&mut self, hash: BlockHash, transactions: Vec<crate::transaction::Transaction>) {
        self.blocks.insert(hash, Block { transactions });
    }

    pub fn insert_coinbase(&mut self, hash: BlockHash, asset_locked_amount: u64) {
        self.coinbase.insert(hash, asset_locked_amount);
    }
}

impl BlockStore for FakeBlockStore {
    fn read_block(&self, hash: BlockHash) -> Result<Block, ChainError> {
        self.blocks.get(&hash).cloned().ok_or(ChainError::BlockNotFound(hash))
    }

    fn read_coinbase_payload(&self, hash: BlockHash) -> Result<CoinbasePayload, ChainError> {
        self.coinbase
            .get(&hash)
            .map(|&asset_locked_amount| CoinbasePayload { asset_locked_amount })
            .ok_or(ChainError::MissingCoinbasePayload(hash))
    }
}

/// A quorum that either always verifies or always refuses, standing in for the BLS aggregate
/// public key the real quorum manager would carry. Spec.md §1 Non-goals excludes wallet key
/// management / real BLS verification from this crate's scope.
#[derive(Debug, Clone, Copy)]
pub struct FakeQuorum {
    hash: BlockHash,
    accepts: bool,
}

impl Quorum for FakeQuorum {
    fn quorum_hash(&self) -> BlockHash {
        self.hash
    }

    fn verify(&self, _sign_hash: &Hash256, _sig: &BlsSignature) -> bool {
        self.accepts
    }
}

/// A [`QuorumManager`] fake with a single configured quorum, either accepting or refusing every
/// signature it is asked to verify. `Default` yields a manager with no known quorums at all,
/// matching the shape of an unlock-less lock-only test.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeQuorumManager {
    quorum: Option<FakeQuorum>,
}

impl FakeQuorumManager {
    pub fn accepting(hash: BlockHash) -> Self {
        FakeQuorumManager {
            quorum: Some(FakeQuorum { hash, accepts: true }),
        }
    }

    pub fn refusing(hash: BlockHash) -> Self {
        FakeQuorumManager {
            quorum: Some(FakeQuorum { hash, accepts: false }),
        }
    }
}

impl QuorumManager for FakeQuorumManager {
    type Quorum = FakeQuorum;

    fn scan_quorums(&self, _quorum_type: QuorumType, _tip: &impl BlockIndex, n: usize) -> Vec<Self::Quorum> {
        self.quorum.into_iter().take(n).collect()
    }

    fn get_quorum(&self, _quorum_type: QuorumType, hash: BlockHash) -> Result<Self::Quorum, ChainError> {
        self.quorum
            .filter(|q| q.hash == hash)
            .ok_or_else(|| ChainError::QuorumNotFound(hash, QuorumType(0)))
    }
}
