//! End-to-end scenario tests S1-S7 of spec.md §8, driven through the public API rather than
//! any single component in isolation.

use credit_pool::{
    chain::BlockIndex,
    consensus::ConsensusParams,
    credit_pool::{diff::CreditPoolDiff, snapshot::CreditPoolSnapshot},
    error::ValidationError,
    payload::{AssetLockPayload, AssetUnlockPayload, BlsSignature, CreditOutput, P2pkhScript},
    skip_set::SkipSet,
    test_support::{FakeBlockIndex, FakeQuorumManager},
    transaction::{Transaction, TxIn, TxKind, TxOut, TxOutPoint},
    Credits,
};

fn burn_output(value: Credits) -> TxOut {
    TxOut {
        value,
        script_pub_key: vec![0x6a, 0x00],
    }
}

fn lock_tx(burn_value: Credits, credit_values: &[Credits]) -> Transaction {
    let payload = AssetLockPayload::new(
        credit_values
            .iter()
            .map(|&v| CreditOutput {
                value: v,
                script: P2pkhScript::new([4u8; 20]).as_bytes().to_vec(),
            })
            .collect(),
    );
    Transaction {
        kind: TxKind::AssetLock,
        inputs: vec![TxIn {
            previous_output: TxOutPoint { txid: [0u8; 32], index: 0 },
        }],
        outputs: vec![burn_output(burn_value)],
        extra_payload: credit_pool::payload::encode_asset_lock(&payload),
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
            script_pub_key: P2pkhScript::new([5u8; 20]).as_bytes().to_vec(),
        }],
        extra_payload: credit_pool::payload::encode_asset_unlock(&payload),
    }
}

fn empty_snapshot(limit: Credits) -> CreditPoolSnapshot {
    CreditPoolSnapshot {
        locked: Credits::ZERO,
        current_limit: limit,
        lately_unlocked: Credits::ZERO,
        indexes: SkipSet::new(10_000),
    }
}

fn cent(n: u64) -> Credits {
    Credits::new(n * (Credits::COIN.as_u64() / 100))
}

fn coin(n: u64) -> Credits {
    Credits::new(n * Credits::COIN.as_u64())
}

/// S1 — a well-formed lock with two credit outputs summing to the burn value is accepted and
/// increases the session's locked total by exactly the burn value.
#[test]
fn s1_simple_lock_accepted_and_locked_increases() {
    let _ = env_logger::try_init();
    let pool = empty_snapshot(Credits::ZERO);
    let mut diff = CreditPoolDiff::new(&pool);
    let tx = lock_tx(cent(30), &[cent(17), cent(13)]);
    let parent = FakeBlockIndex::new([0u8; 32], 100);
    let qm = FakeQuorumManager::default();
    let params = ConsensusParams::mainnet();

    diff.process_transaction(&tx, &parent, &qm, &params).unwrap();

    assert_eq!(diff.session_locked(), cent(30));
    assert_eq!(diff.get_total_locked(), Some(cent(30)));
}

/// S2 — credit outputs summing to more than the burn value are rejected.
#[test]
fn s2_credit_mismatch_rejected() {
    let pool = empty_snapshot(Credits::ZERO);
    let mut diff = CreditPoolDiff::new(&pool);
    let tx = lock_tx(cent(30), &[cent(31)]);
    let parent = FakeBlockIndex::new([0u8; 32], 100);
    let qm = FakeQuorumManager::default();
    let params = ConsensusParams::mainnet();

    let err = diff.process_transaction(&tx, &parent, &qm, &params).unwrap_err();
    assert_eq!(err, ValidationError::BadAssetLockCreditAmount);
}

/// S3 — a burn output carrying trailing bytes after the `OP_RETURN 0x00` marker is rejected, even
/// though its value matches the credit outputs exactly.
#[test]
fn s3_non_empty_return_rejected() {
    let pool = empty_snapshot(Credits::ZERO);
    let mut diff = CreditPoolDiff::new(&pool);
    let mut tx = lock_tx(cent(30), &[cent(30)]);
    tx.outputs[0].script_pub_key = vec![0x6a, 0x00, 0xff];
    let parent = FakeBlockIndex::new([0u8; 32], 100);
    let qm = FakeQuorumManager::default();
    let params = ConsensusParams::mainnet();

    let err = diff.process_transaction(&tx, &parent, &qm, &params).unwrap_err();
    assert_eq!(err, ValidationError::BadAssetLockNonEmptyReturn);
}

/// S4 — an asset-unlock transaction with a non-empty input list is rejected; unlocks mint coins
/// out of escrow rather than spending inputs.
#[test]
fn s4_unlock_with_input_rejected() {
    let pool = empty_snapshot(Credits::new(1_000));
    let mut diff = CreditPoolDiff::new(&pool);
    let quorum_hash = [9u8; 32];
    let mut tx = unlock_tx(1, 0, cent(10), quorum_hash, 80);
    tx.inputs.push(TxIn {
        previous_output: TxOutPoint { txid: [1u8; 32], index: 0 },
    });
    let parent = FakeBlockIndex::new([1u8; 32], 100);
    let qm = FakeQuorumManager::accepting(quorum_hash);
    let params = ConsensusParams::mainnet();

    let err = diff.process_transaction(&tx, &parent, &qm, &params).unwrap_err();
    assert_eq!(err, ValidationError::BadAssetUnlockHaveInput);
}

/// S5 — an unlock requested at height 100 is too stale once the parent height reaches 148
/// (100 + 48 expiry blocks).
#[test]
fn s5_unlock_too_late_rejected() {
    let pool = empty_snapshot(Credits::new(1_000));
    let mut diff = CreditPoolDiff::new(&pool);
    let quorum_hash = [9u8; 32];
    let tx = unlock_tx(1, 0, cent(10), quorum_hash, 100);
    let parent = FakeBlockIndex::new([1u8; 32], 148);
    let qm = FakeQuorumManager::accepting(quorum_hash);
    let params = ConsensusParams::mainnet();

    let err = diff.process_transaction(&tx, &parent, &qm, &params).unwrap_err();
    assert_eq!(err, ValidationError::BadAssetUnlockTooLate);
}

/// S6 — with `currentLimit = 100 coin`, two 60-coin unlocks in the same block: the first is
/// accepted, the second exceeds the limit and is rejected, failing the whole block.
#[test]
fn s6_second_unlock_exceeds_rate_limit() {
    let pool = empty_snapshot(coin(100));
    let mut diff = CreditPoolDiff::new(&pool);
    let quorum_hash = [9u8; 32];
    let qm = FakeQuorumManager::accepting(quorum_hash);
    let parent = FakeBlockIndex::new([1u8; 32], 100);
    let params = ConsensusParams::mainnet();

    let first = unlock_tx(1, 0, coin(60), quorum_hash, 80);
    let second = unlock_tx(2, 0, coin(60), quorum_hash, 80);

    assert!(diff.process_transaction(&first, &parent, &qm, &params).is_ok());
    let err = diff.process_transaction(&second, &parent, &qm, &params).unwrap_err();
    assert_eq!(err, ValidationError::FailedCreditPoolUnlockTooMuch);
}

/// S7 — SkipSet stress: with K = 32, adding {0, 1, 100} in order only the first two succeed; the
/// third is refused because the resulting gap would push `skipped.len()` over capacity.
#[test]
fn s7_skip_set_stress() {
    let mut set = SkipSet::new(32);
    assert!(set.add(0));
    assert!(set.add(1));
    assert!(!set.add(100));

    assert_eq!(set.current_max(), 2);
    assert_eq!(set.skipped_len(), 0);
    assert!(set.contains(0));
    assert!(set.contains(1));
    assert!(!set.contains(100));
}

/// Boundary: an unlock whose `fee + outputs` exactly equals `currentLimit` is accepted, not
/// rejected as "too much" by an off-by-one in the comparison.
#[test]
fn boundary_unlock_exactly_at_limit_is_accepted() {
    let limit = Credits::new(500);
    let pool = empty_snapshot(limit);
    let mut diff = CreditPoolDiff::new(&pool);
    let quorum_hash = [3u8; 32];
    let qm = FakeQuorumManager::accepting(quorum_hash);
    let parent = FakeBlockIndex::new([1u8; 32], 100);
    let params = ConsensusParams::mainnet();

    let tx = unlock_tx(1, 100, Credits::new(400), quorum_hash, 80);
    assert!(diff.process_transaction(&tx, &parent, &qm, &params).is_ok());
    assert_eq!(diff.session_unlocked(), limit);
}

/// Boundary: index 0 is a legitimate first withdrawal index, not a sentinel "unset" value.
#[test]
fn boundary_unlock_index_zero_is_accepted() {
    let pool = empty_snapshot(Credits::new(1_000));
    let mut diff = CreditPoolDiff::new(&pool);
    let quorum_hash = [2u8; 32];
    let qm = FakeQuorumManager::accepting(quorum_hash);
    let parent = FakeBlockIndex::new([1u8; 32], 100);
    let params = ConsensusParams::mainnet();

    let tx = unlock_tx(0, 0, Credits::new(10), quorum_hash, 80);
    assert!(diff.process_transaction(&tx, &parent, &qm, &params).is_ok());
    assert!(diff.new_indexes().contains(&0));
}

/// Boundary: a lock with `burnValue = 1` and a single credit output of value 1 is the smallest
/// legal lock.
#[test]
fn boundary_minimal_lock_of_value_one() {
    let pool = empty_snapshot(Credits::ZERO);
    let mut diff = CreditPoolDiff::new(&pool);
    let tx = lock_tx(Credits::new(1), &[Credits::new(1)]);
    let parent = FakeBlockIndex::new([0u8; 32], 100);
    let qm = FakeQuorumManager::default();
    let params = ConsensusParams::mainnet();

    diff.process_transaction(&tx, &parent, &qm, &params).unwrap();
    assert_eq!(diff.session_locked(), Credits::new(1));
}

/// Conservation invariant (spec.md §8.1): after a mixed sequence of locks and unlocks, the diff's
/// total locked figure equals `pool.locked + sessionLocked - sessionUnlocked` and matches a
/// coinbase target computed the same way.
#[test]
fn conservation_holds_across_mixed_lock_and_unlock() {
    let pool = empty_snapshot(Credits::new(1_000));
    let mut diff = CreditPoolDiff::new(&pool);
    let quorum_hash = [6u8; 32];
    let qm = FakeQuorumManager::accepting(quorum_hash);
    let parent = FakeBlockIndex::new([1u8; 32], 100);
    let params = ConsensusParams::mainnet();

    let lock = lock_tx(Credits::new(500), &[Credits::new(500)]);
    let unlock = unlock_tx(1, 0, Credits::new(200), quorum_hash, 80);

    diff.process_transaction(&lock, &parent, &qm, &params).unwrap();
    diff.process_transaction(&unlock, &parent, &qm, &params).unwrap();

    assert_eq!(diff.get_total_locked(), Some(Credits::new(300)));
    diff.set_target_locked(Credits::new(300));
    assert!(diff.finalize().is_ok());
}

/// No double withdrawal (spec.md §8.2): the same index cannot be committed twice within one
/// block's diff once it is already present in the snapshot's window.
#[test]
fn no_double_withdrawal_within_window() {
    let mut indexes = SkipSet::new(10_000);
    indexes.add(7);
    let pool = CreditPoolSnapshot {
        locked: Credits::ZERO,
        current_limit: Credits::new(1_000),
        lately_unlocked: Credits::ZERO,
        indexes,
    };
    let mut diff = CreditPoolDiff::new(&pool);
    let quorum_hash = [8u8; 32];
    let qm = FakeQuorumManager::accepting(quorum_hash);
    let parent = FakeBlockIndex::new([1u8; 32], 100);
    let params = ConsensusParams::mainnet();

    let tx = unlock_tx(7, 0, Credits::new(10), quorum_hash, 80);
    let err = diff.process_transaction(&tx, &parent, &qm, &params).unwrap_err();
    assert_eq!(err, ValidationError::BadAssetUnlockDuplicatedIndex);
}

/// Expiry invariant (spec.md §8.5): an unlock is valid only while
/// `requestedHeight <= parent.height < requestedHeight + 48`; confirm both the open start and
/// the open end of that window.
#[test]
fn expiry_window_is_half_open() {
    let quorum_hash = [4u8; 32];
    let qm = FakeQuorumManager::accepting(quorum_hash);
    let pool = empty_snapshot(Credits::new(1_000));
    let params = ConsensusParams::mainnet();

    // Exactly at requestedHeight: valid.
    {
        let mut diff = CreditPoolDiff::new(&pool);
        let tx = unlock_tx(1, 0, Credits::new(10), quorum_hash, 100);
        let parent = FakeBlockIndex::new([1u8; 32], 100);
        assert!(diff.process_transaction(&tx, &parent, &qm, &params).is_ok());
    }
    // One block before the expiry boundary: still valid.
    {
        let mut diff = CreditPoolDiff::new(&pool);
        let tx = unlock_tx(1, 0, Credits::new(10), quorum_hash, 100);
        let parent = FakeBlockIndex::new([1u8; 32], 147);
        assert!(diff.process_transaction(&tx, &parent, &qm, &params).is_ok());
    }
    // At the expiry boundary itself: rejected.
    {
        let mut diff = CreditPoolDiff::new(&pool);
        let tx = unlock_tx(1, 0, Credits::new(10), quorum_hash, 100);
        let parent = FakeBlockIndex::new([1u8; 32], 148);
        assert_eq!(
            diff.process_transaction(&tx, &parent, &qm, &params).unwrap_err(),
            ValidationError::BadAssetUnlockTooLate
        );
    }
}

/// Quorum-active invariant (spec.md §8.4): an unlock naming a quorum hash the manager does not
/// recognise as one of the active set is rejected, independent of signature verification.
#[test]
fn quorum_must_be_in_active_set() {
    let pool = empty_snapshot(Credits::new(1_000));
    let mut diff = CreditPoolDiff::new(&pool);
    let parent = FakeBlockIndex::new([1u8; 32], 100);
    let params = ConsensusParams::mainnet();
    let qm = FakeQuorumManager::accepting([1u8; 32]);

    let tx = unlock_tx(1, 0, Credits::new(10), [2u8; 32], 80);
    let err = diff.process_transaction(&tx, &parent, &qm, &params).unwrap_err();
    assert_eq!(err, ValidationError::BadAssetUnlockQuorumHash);
}

/// Builder round-trip (spec.md §8 "Building a snapshot at B from scratch equals applying Diff to
/// the snapshot at B.parent"): building directly over a two-block window that contains one
/// unlock reproduces the same `latelyUnlocked` and `indexes` a diff would have produced.
#[test]
fn builder_window_accumulates_unlocks_the_same_way_a_diff_would() {
    use credit_pool::{chain::BlockStore, credit_pool::builder::CreditPoolBuilder, test_support::FakeBlockStore};

    let quorum_hash = [5u8; 32];
    let unlock = unlock_tx(3, 10, Credits::new(90), quorum_hash, 0);

    let mut store = FakeBlockStore::new();
    let chain = FakeBlockIndex::chain(3);
    let genesis = chain.ancestor_at(0).unwrap();
    let middle = chain.ancestor_at(1).unwrap();
    let tip = chain.ancestor_at(2).unwrap();

    store.insert_coinbase(genesis.block_hash(), 0);
    store.insert_coinbase(middle.block_hash(), 1_000);
    store.insert_coinbase(tip.block_hash(), 900);
    store.insert_block(genesis.block_hash(), vec![]);
    store.insert_block(middle.block_hash(), vec![unlock.clone()]);
    store.insert_block(tip.block_hash(), vec![]);

    let params = ConsensusParams::mainnet();
    let builder = CreditPoolBuilder::new(params.snapshot_cache_capacity);
    let snapshot = builder.get_credit_pool(&tip, &store, &params).unwrap();

    assert_eq!(snapshot.locked, Credits::new(900));
    assert_eq!(snapshot.lately_unlocked, Credits::new(100));
    assert!(snapshot.indexes.contains(3));
    assert!(store.read_block(genesis.block_hash()).unwrap().transactions.is_empty());
}
