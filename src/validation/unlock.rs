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

//! Consensus validation of an asset-unlock (withdrawal) transaction. Spec.md §4.F.

use sha2::{Digest, Sha256};

use crate::{
    chain::{BlockIndex, Quorum, QuorumManager},
    consensus::ConsensusParams,
    credit_pool::snapshot::CreditPoolSnapshot,
    error::ValidationError,
    payload::{self, AssetUnlockPayload, CodecError, Hash256},
    transaction::Transaction,
};

/// Checks that `tx` is a well-formed, quorum-authorized asset-unlock not yet seen in `snapshot`'s
/// window, and returns its decoded payload for the caller to apply against the credit pool.
///
/// `parent` is the block the candidate unlock would be mined on top of: its height gates the
/// expiry window and its chain position gates which quorums are considered active. Spec.md §4.F.
pub fn validate_asset_unlock<B, Q>(
    tx: &Transaction,
    parent: &B,
    snapshot: &CreditPoolSnapshot,
    quorum_manager: &Q,
    params: &ConsensusParams,
) -> Result<AssetUnlockPayload, ValidationError>
where
    B: BlockIndex,
    Q: QuorumManager,
{
    if !tx.is_asset_unlock() {
        return Err(ValidationError::BadAssetUnlockType);
    }
    if !tx.inputs.is_empty() {
        return Err(ValidationError::BadAssetUnlockHaveInput);
    }
    if tx.outputs.len() > AssetUnlockPayload::MAX_WITHDRAWALS {
        return Err(ValidationError::BadAssetUnlockTooManyOuts);
    }

    let payload = payload::decode_asset_unlock(&tx.extra_payload).map_err(|e| match e {
        CodecError::UnknownVersion(_) => ValidationError::BadAssetUnlockVersion,
        other => ValidationError::BadAssetUnlockPayload(other),
    })?;

    if snapshot.indexes.contains(payload.index) {
        return Err(ValidationError::BadAssetUnlockDuplicatedIndex);
    }

    let quorum_type = params.asset_locks_quorum_type;
    let quorum = quorum_manager
        .get_quorum(quorum_type, payload.quorum_hash)
        .map_err(|_| ValidationError::BadAssetUnlockQuorumHash)?;

    let is_active = quorum_manager
        .scan_quorums(quorum_type, parent, params.active_quorum_count)
        .iter()
        .any(|q| q.quorum_hash() == payload.quorum_hash);
    if !is_active {
        return Err(ValidationError::BadAssetUnlockNotActiveQuorum);
    }

    let tip_height = parent.height();
    let expiry_height = payload.height_to_expiry(params.unlock_expiry_blocks);
    if tip_height < payload.requested_height as i32 || tip_height >= expiry_height as i32 {
        return Err(ValidationError::BadAssetUnlockTooLate);
    }

    let msg_hash = hash_cleared_payload(&payload);
    let request_id = request_id(payload.index);
    let sign_hash = build_sign_hash(quorum_type.0, &payload.quorum_hash, &request_id, &msg_hash);

    if !quorum.verify(&sign_hash, &payload.signature) {
        return Err(ValidationError::BadAssetUnlockNotVerified);
    }

    Ok(payload)
}

/// The hash an unlock's signature actually covers: the payload with its signature zeroed out, so
/// the signature cannot sign over itself. Spec.md §4.F.6.
fn hash_cleared_payload(payload: &AssetUnlockPayload) -> Hash256 {
    let cleared = payload.with_signature_cleared();
    let bytes = payload::encode_asset_unlock(&cleared);
    Sha256::digest(bytes).into()
}

/// `SHA256("plwdtx" || index)`, matching the per-withdrawal request id a quorum signs over.
/// Spec.md §4.F.6.
fn request_id(index: u64) -> Hash256 {
    let id = format!("plwdtx{}", index);
    Sha256::digest(id.as_bytes()).into()
}

/// Domain-separates a quorum's signature by type and identity before it is asked to vouch for a
/// particular request and message. Spec.md §4.F.6 "BuildSignHash".
fn build_sign_hash(quorum_type: u8, quorum_hash: &Hash256, request_id: &Hash256, msg_hash: &Hash256) -> Hash256 {
    let mut hasher = Sha256::new();
    hasher.update([quorum_type]);
    hasher.update(quorum_hash);
    hasher.update(request_id);
    hasher.update(msg_hash);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        payload::BlsSignature,
        skip_set::SkipSet,
        test_support::{FakeBlockIndex, FakeQuorumManager},
        transaction::{TxKind, TxOut},
    };

    fn snapshot() -> CreditPoolSnapshot {
        CreditPoolSnapshot {
            locked: crate::amount::Credits::ZERO,
            current_limit: crate::amount::Credits::new(1_000),
            lately_unlocked: crate::amount::Credits::ZERO,
            indexes: SkipSet::new(10_000),
        }
    }

    fn unlock_tx(index: u64, quorum_hash: [u8; 32], requested_height: u32) -> Transaction {
        let payload = AssetUnlockPayload {
            version: AssetUnlockPayload::CURRENT_VERSION,
            index,
            fee: 0,
            requested_height,
            quorum_hash,
            signature: BlsSignature::default(),
        };
        Transaction {
            kind: TxKind::AssetUnlock,
            inputs: vec![],
            outputs: vec![TxOut {
                value: crate::amount::Credits::new(10),
                script_pub_key: vec![],
            }],
            extra_payload: payload::encode_asset_unlock(&payload),
        }
    }

    #[test]
    fn accepts_a_properly_signed_unlock() {
        let quorum_hash = [9u8; 32];
        let tx = unlock_tx(1, quorum_hash, 80);
        let parent = FakeBlockIndex::new([1u8; 32], 100);
        let qm = FakeQuorumManager::accepting(quorum_hash);
        let pool = snapshot();
        let params = ConsensusParams::mainnet();
        assert!(validate_asset_unlock(&tx, &parent, &pool, &qm, &params).is_ok());
    }

    #[test]
    fn rejects_duplicate_index() {
        let quorum_hash = [9u8; 32];
        let tx = unlock_tx(7, quorum_hash, 80);
        let parent = FakeBlockIndex::new([1u8; 32], 100);
        let qm = FakeQuorumManager::accepting(quorum_hash);
        let mut pool = snapshot();
        pool.indexes.add(7);
        let params = ConsensusParams::mainnet();
        assert_eq!(
            validate_asset_unlock(&tx, &parent, &pool, &qm, &params).unwrap_err(),
            ValidationError::BadAssetUnlockDuplicatedIndex
        );
    }

    #[test]
    fn rejects_unknown_quorum_hash() {
        let tx = unlock_tx(1, [9u8; 32], 80);
        let parent = FakeBlockIndex::new([1u8; 32], 100);
        let qm = FakeQuorumManager::accepting([5u8; 32]);
        let pool = snapshot();
        let params = ConsensusParams::mainnet();
        assert_eq!(
            validate_asset_unlock(&tx, &parent, &pool, &qm, &params).unwrap_err(),
            ValidationError::BadAssetUnlockQuorumHash
        );
    }

    #[test]
    fn rejects_expired_request() {
        let quorum_hash = [9u8; 32];
        let tx = unlock_tx(1, quorum_hash, 10);
        // requestedHeight=10, expiry=10+48=58; tip at 58 is already at-or-past expiry.
        let parent = FakeBlockIndex::new([1u8; 32], 58);
        let qm = FakeQuorumManager::accepting(quorum_hash);
        let pool = snapshot();
        let params = ConsensusParams::mainnet();
        assert_eq!(
            validate_asset_unlock(&tx, &parent, &pool, &qm, &params).unwrap_err(),
            ValidationError::BadAssetUnlockTooLate
        );
    }

    #[test]
    fn rejects_request_not_yet_reached() {
        let quorum_hash = [9u8; 32];
        let tx = unlock_tx(1, quorum_hash, 200);
        let parent = FakeBlockIndex::new([1u8; 32], 100);
        let qm = FakeQuorumManager::accepting(quorum_hash);
        let pool = snapshot();
        let params = ConsensusParams::mainnet();
        assert_eq!(
            validate_asset_unlock(&tx, &parent, &pool, &qm, &params).unwrap_err(),
            ValidationError::BadAssetUnlockTooLate
        );
    }

    #[test]
    fn rejects_too_many_outputs() {
        let mut tx = unlock_tx(1, [9u8; 32], 80);
        for _ in 0..AssetUnlockPayload::MAX_WITHDRAWALS {
            tx.outputs.push(TxOut {
                value: crate::amount::Credits::new(1),
                script_pub_key: vec![],
            });
        }
        let parent = FakeBlockIndex::new([1u8; 32], 100);
        let qm = FakeQuorumManager::accepting([9u8; 32]);
        let pool = snapshot();
        let params = ConsensusParams::mainnet();
        assert_eq!(
            validate_asset_unlock(&tx, &parent, &pool, &qm, &params).unwrap_err(),
            ValidationError::BadAssetUnlockTooManyOuts
        );
    }

    #[test]
    fn rejects_an_unsigned_quorum() {
        let quorum_hash = [9u8; 32];
        let tx = unlock_tx(1, quorum_hash, 80);
        let parent = FakeBlockIndex::new([1u8; 32], 100);
        let qm = FakeQuorumManager::refusing(quorum_hash);
        let pool = snapshot();
        let params = ConsensusParams::mainnet();
        assert_eq!(
            validate_asset_unlock(&tx, &parent, &pool, &qm, &params).unwrap_err(),
            ValidationError::BadAssetUnlockNotVerified
        );
    }
}
