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

//! Per-block transaction gauntlet. Spec.md §4.G.
//!
//! `CreditPoolDiff` has two purposes: it helps decide which asset-unlock transactions can be
//! included in a block being built, within the current rate limit, filtering duplicate indices;
//! and it validates a mined block's lock/unlock transactions, since the standalone structural
//! checks (component E/F) cannot see credit-pool limits by themselves.

use std::collections::HashSet;

use crate::{
    amount::Credits,
    chain::{BlockIndex, QuorumManager},
    consensus::ConsensusParams,
    credit_pool::snapshot::CreditPoolSnapshot,
    error::ValidationError,
    transaction::{Transaction, TxKind},
    validation::{lock::validate_asset_lock, unlock::validate_asset_unlock},
};

const LOG_TARGET: &str = "c::creditpool::diff";

/// A transaction-by-transaction mutation of a [`CreditPoolSnapshot`], scoped to the single block
/// currently being built or validated. Exclusively owns its pending mutation of the snapshot it
/// was built from; dropped at the end of block validation. Spec.md §3 "Relationships & ownership".
pub struct CreditPoolDiff<'s> {
    pool: &'s CreditPoolSnapshot,
    new_indexes: HashSet<u64>,
    session_locked: Credits,
    session_unlocked: Credits,
    target_locked: Option<Credits>,
}

impl<'s> CreditPoolDiff<'s> {
    pub fn new(pool: &'s CreditPoolSnapshot) -> Self {
        CreditPoolDiff {
            pool,
            new_indexes: HashSet::new(),
            session_locked: Credits::ZERO,
            session_unlocked: Credits::ZERO,
            target_locked: None,
        }
    }

    /// Records the coinbase's claimed `locked` figure for this block, to be reconciled against
    /// `get_total_locked()` once every transaction has been processed. Spec.md §4.G.
    pub fn set_target_locked(&mut self, target: Credits) {
        self.target_locked = Some(target);
    }

    pub fn target_locked(&self) -> Option<Credits> {
        self.target_locked
    }

    /// `pool.locked + session_locked - session_unlocked`, or `None` if that would underflow.
    ///
    /// `session_unlocked` is bounded by `pool.current_limit`, not by `pool.locked + session_locked`
    /// directly, so a block that nets more unlocked than was ever locked is representable here
    /// rather than panicking — [`Self::finalize`] rejects it the same way a negative total in the
    /// original's signed accounting would fail its target comparison.
    pub fn get_total_locked(&self) -> Option<Credits> {
        self.pool
            .locked
            .checked_add(self.session_locked)
            .and_then(|v| v.checked_sub(self.session_unlocked))
    }

    /// Validates and applies the effect of a single transaction. If `tx` is neither an asset-lock
    /// nor an asset-unlock, this is a no-op accept. Spec.md §4.G.
    pub fn process_transaction<B, Q>(
        &mut self,
        tx: &Transaction,
        parent: &B,
        quorum_manager: &Q,
        params: &ConsensusParams,
    ) -> Result<(), ValidationError>
    where
        B: BlockIndex,
        Q: QuorumManager,
    {
        match tx.kind {
            TxKind::AssetLock => self.apply_lock(tx),
            TxKind::AssetUnlock => self.apply_unlock(tx, parent, quorum_manager, params),
            TxKind::Other(_) => Ok(()),
        }
    }

    fn apply_lock(&mut self, tx: &Transaction) -> Result<(), ValidationError> {
        let burn_value = validate_asset_lock(tx)?;
        self.session_locked = self
            .session_locked
            .checked_add(burn_value)
            .ok_or(ValidationError::FailedCreditPoolLockInvalid)?;
        log::trace!(target: LOG_TARGET, "applied lock: +{}", burn_value);
        Ok(())
    }

    fn apply_unlock<B, Q>(
        &mut self,
        tx: &Transaction,
        parent: &B,
        quorum_manager: &Q,
        params: &ConsensusParams,
    ) -> Result<(), ValidationError>
    where
        B: BlockIndex,
        Q: QuorumManager,
    {
        let payload = validate_asset_unlock(tx, parent, self.pool, quorum_manager, params)?;

        let mut to_unlock = Credits::from(payload.fee);
        for out in &tx.outputs {
            // Negative output values cannot occur for a well-formed `Credits` (unsigned by
            // construction); this is the codec post-condition spec.md §4.G restates, so the
            // overflow check below is the only failure mode left to guard against.
            to_unlock = to_unlock
                .checked_add(out.value)
                .ok_or(ValidationError::FailedCreditPoolUnlockNegativeAmount)?;
        }

        let prospective = self
            .session_unlocked
            .checked_add(to_unlock)
            .ok_or(ValidationError::FailedCreditPoolUnlockTooMuch)?;
        if prospective > self.pool.current_limit {
            return Err(ValidationError::FailedCreditPoolUnlockTooMuch);
        }

        self.session_unlocked = prospective;
        self.new_indexes.insert(payload.index);
        log::trace!(target: LOG_TARGET, "applied unlock: index={} amount={}", payload.index, to_unlock);
        Ok(())
    }

    /// Checks the coinbase's claimed `locked` target against what this diff actually accumulated.
    /// Must be called after every transaction in the block has been processed. Spec.md §4.G.
    pub fn finalize(&self) -> Result<(), ValidationError> {
        if let Some(target) = self.target_locked {
            if self.get_total_locked() != Some(target) {
                return Err(ValidationError::FailedCreditPoolTargetMismatch);
            }
        }
        Ok(())
    }

    /// The withdrawal indices newly committed by this diff — `RESERVED` in the per-index state
    /// machine of spec.md §4.G, promoted to `COMMITTED` once this diff's block is accepted and a
    /// fresh snapshot is derived.
    pub fn new_indexes(&self) -> &HashSet<u64> {
        &self.new_indexes
    }

    pub fn session_locked(&self) -> Credits {
        self.session_locked
    }

    pub fn session_unlocked(&self) -> Credits {
        self.session_unlocked
    }
}

impl<'s> std::fmt::Display for CreditPoolDiff<'s> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CreditPoolDiff(target={}, sessionLocked={}, sessionUnlocked={}, newIndexes={}, pool={})",
            self.target_locked.map(|v| v.to_string()).unwrap_or_else(|| "-1".into()),
            self.session_locked,
            self.session_unlocked,
            self.new_indexes.len(),
            self.pool
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        payload::{AssetLockPayload, AssetUnlockPayload, BlsSignature, CreditOutput, P2pkhScript},
        skip_set::SkipSet,
        test_support::{FakeBlockIndex, FakeQuorumManager},
        transaction::{TxIn, TxOut, TxOutPoint},
    };

    fn snapshot_with_limit(limit: Credits) -> CreditPoolSnapshot {
        CreditPoolSnapshot {
            locked: Credits::ZERO,
            current_limit: limit,
            lately_unlocked: Credits::ZERO,
            indexes: SkipSet::new(10_000),
        }
    }

    fn lock_tx(burn_value: Credits, credit_values: &[Credits]) -> Transaction {
        let payload = AssetLockPayload::new(
            credit_values
                .iter()
                .map(|&v| CreditOutput {
                    value: v,
                    script: P2pkhScript::new([1u8; 20]).as_bytes().to_vec(),
                })
                .collect(),
        );
        Transaction {
            kind: TxKind::AssetLock,
            inputs: vec![TxIn {
                previous_output: TxOutPoint { txid: [0u8; 32], index: 0 },
            }],
            outputs: vec![TxOut {
                value: burn_value,
                script_pub_key: vec![0x6a, 0x00],
            }],
            extra_payload: crate::payload::encode_asset_lock(&payload),
        }
    }

    fn unlock_tx(index: u64, fee: u32, out_value: Credits, quorum_hash: [u8; 32], requested_height: u32) -> Transaction {
        let payload = AssetUnlockPayload {
            version: AssetUnlockPayload::CURRENT_VERSION,
            index,
            fee,
            requested_height,
            quorum_hash,
            signature: BlsSignature([1u8; 96]),
        };
        Transaction {
            kind: TxKind::AssetUnlock,
            inputs: vec![],
            outputs: vec![TxOut {
                value: out_value,
                script_pub_key: P2pkhScript::new([2u8; 20]).as_bytes().to_vec(),
            }],
            extra_payload: crate::payload::encode_asset_unlock(&payload),
        }
    }

    #[test]
    fn lock_transaction_increases_session_locked() {
        let pool = snapshot_with_limit(Credits::ZERO);
        let mut diff = CreditPoolDiff::new(&pool);
        let tx = lock_tx(Credits::new(30), &[Credits::new(17), Credits::new(13)]);
        let parent = FakeBlockIndex::new([0u8; 32], 100);
        let qm = FakeQuorumManager::default();
        let params = ConsensusParams::mainnet();
        diff.process_transaction(&tx, &parent, &qm, &params).unwrap();
        assert_eq!(diff.session_locked(), Credits::new(30));
    }

    #[test]
    fn second_unlock_exceeding_limit_is_rejected() {
        let limit = Credits::new(100);
        let pool = snapshot_with_limit(limit);
        let mut diff = CreditPoolDiff::new(&pool);
        let quorum_hash = [9u8; 32];
        let qm = FakeQuorumManager::accepting(quorum_hash);
        let parent = FakeBlockIndex::new([1u8; 32], 100);
        let params = ConsensusParams::mainnet();

        let first = unlock_tx(1, 0, Credits::new(60), quorum_hash, 80);
        let second = unlock_tx(2, 0, Credits::new(60), quorum_hash, 80);

        assert!(diff.process_transaction(&first, &parent, &qm, &params).is_ok());
        let err = diff.process_transaction(&second, &parent, &qm, &params).unwrap_err();
        assert_eq!(err, ValidationError::FailedCreditPoolUnlockTooMuch);
    }

    #[test]
    fn target_mismatch_is_rejected() {
        let pool = snapshot_with_limit(Credits::ZERO);
        let mut diff = CreditPoolDiff::new(&pool);
        diff.set_target_locked(Credits::new(5));
        assert_eq!(diff.finalize().unwrap_err(), ValidationError::FailedCreditPoolTargetMismatch);
    }

    #[test]
    fn unlock_exceeding_locked_supply_underflows_to_none_instead_of_panicking() {
        // pool.locked=0, no lock in this session, but current_limit still permits an unlock of
        // 50 — e.g. the tip's own coinbase net-unlocked relative to its ancestors. The diff must
        // not panic; it must report no representable total so `finalize` can reject the block.
        let pool = snapshot_with_limit(Credits::new(50));
        let mut diff = CreditPoolDiff::new(&pool);
        let tx = unlock_tx(1, 0, Credits::new(50), [9u8; 32], 80);
        let parent = FakeBlockIndex::new([1u8; 32], 100);
        let qm = FakeQuorumManager::accepting([9u8; 32]);
        let params = ConsensusParams::mainnet();

        diff.process_transaction(&tx, &parent, &qm, &params).unwrap();
        assert_eq!(diff.get_total_locked(), None);

        diff.set_target_locked(Credits::new(0));
        assert_eq!(diff.finalize().unwrap_err(), ValidationError::FailedCreditPoolTargetMismatch);
    }

    #[test]
    fn matching_target_is_accepted() {
        let pool = snapshot_with_limit(Credits::ZERO);
        let mut diff = CreditPoolDiff::new(&pool);
        let tx = lock_tx(Credits::new(30), &[Credits::new(30)]);
        let parent = FakeBlockIndex::new([0u8; 32], 100);
        let qm = FakeQuorumManager::default();
        let params = ConsensusParams::mainnet();
        diff.process_transaction(&tx, &parent, &qm, &params).unwrap();
        diff.set_target_locked(Credits::new(30));
        assert!(diff.finalize().is_ok());
    }
}
