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

//! The collaborator interfaces this crate consumes but does not implement: a block/header index,
//! a coin/block store, a quorum lookup. Spec.md §6.2. A concrete node wires real implementations
//! of these traits into [`crate::credit_pool::builder::CreditPoolBuilder`] and
//! [`crate::validation::unlock::validate_asset_unlock`]; this crate is deliberately generic over
//! them, the way `tari_core`'s validators are generic over `B: BlockchainBackend` rather than
//! depending on one concrete storage engine.

use thiserror::Error;

use crate::{consensus::QuorumType, payload::Hash256, transaction::Transaction};

pub type BlockHash = Hash256;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("block {0:?} not found")]
    BlockNotFound(BlockHash),
    #[error("coinbase payload for block {0:?} not found or malformed")]
    MissingCoinbasePayload(BlockHash),
    #[error("quorum {0:?} of type {1:?} not found")]
    QuorumNotFound(BlockHash, QuorumType),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A single block header's position in the active chain. Spec.md §6.2.
pub trait BlockIndex: Clone {
    fn height(&self) -> i32;
    fn parent_hash(&self) -> BlockHash;
    fn block_hash(&self) -> BlockHash;
    fn median_time_past(&self) -> u64;

    /// The ancestor of this block at `height`, or `None` if `height` is not on the chain leading
    /// to this block (including `height` above `self.height()`).
    fn ancestor_at(&self, height: i32) -> Option<Self>
    where
        Self: Sized;
}

/// A block body, reduced to what the credit-pool builder needs: the coinbase's extra payload and
/// the asset-lock/unlock transactions, in block order (spec.md §5 "Ordering guarantees").
#[derive(Clone)]
pub struct Block {
    pub transactions: Vec<Transaction>,
}

/// The coinbase special-transaction payload. Spec.md §3: "this authoritative figure is also
/// carried in the coinbase payload so light clients can verify it."
pub struct CoinbasePayload {
    pub asset_locked_amount: u64,
}

/// Read-only access to block bodies and coinbase payloads. Spec.md §6.2.
pub trait BlockStore {
    fn read_block(&self, hash: BlockHash) -> Result<Block, ChainError>;
    fn read_coinbase_payload(&self, hash: BlockHash) -> Result<CoinbasePayload, ChainError>;
}

/// A long-lived quorum committee with an aggregate public key. Spec.md GLOSSARY.
pub trait Quorum {
    fn quorum_hash(&self) -> BlockHash;

    /// Verifies `sig` against this quorum's aggregate public key over `sign_hash`. The BLS
    /// primitive itself is a collaborator concern (spec.md §1 Non-goals: wallet key management);
    /// this crate only calls through this trait.
    fn verify(&self, sign_hash: &Hash256, sig: &crate::payload::BlsSignature) -> bool;
}

/// Lookup of quorums by type, for the active-set and exact-hash queries of spec.md §4.F.
pub trait QuorumManager {
    type Quorum: Quorum;

    /// The `n` most recently mined quorums of `quorum_type`, as seen from `tip`, most recent
    /// first. Spec.md §6.2 `scan_quorums`.
    fn scan_quorums(&self, quorum_type: QuorumType, tip: &impl BlockIndex, n: usize) -> Vec<Self::Quorum>;

    /// The quorum of `quorum_type` identified by `hash`, if it exists.
    fn get_quorum(&self, quorum_type: QuorumType, hash: BlockHash) -> Result<Self::Quorum, ChainError>;
}

/// Per-network knobs the host chain is authoritative for beyond [`crate::consensus::ConsensusParams`]'s
/// asset-lock-specific constants. Spec.md §6.2 `ChainParams`.
pub trait ChainParams {
    fn asset_locks_quorum_type(&self) -> QuorumType;

    /// The configured signing-active quorum count for `quorum_type`, if that type is known to
    /// this network. Spec.md §4.F caps the number actually consulted at 2 regardless of what this
    /// returns (`ConsensusParams::active_quorum_count`).
    fn llmq_signing_active_quorum_count(&self, quorum_type: QuorumType) -> Option<usize>;
}
