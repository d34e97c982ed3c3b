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

use thiserror::Error;

use crate::payload::CodecError;

/// Which of the four reject-reason kinds of spec.md §7 a [`ValidationError`] belongs to.
///
/// Peer-scoring and ban-duration policy (a collaborator concern, not implemented here) keys off
/// this classification rather than matching on individual tags, the way
/// `BlockSyncError::get_ban_reason` keys off variant groups in the teacher codebase.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Severity {
    /// Malformed or miscounted transaction structure.
    Structural,
    /// Credit-pool accounting failure.
    Semantic,
    /// Quorum, signature or expiry failure.
    Consensus,
    /// I/O or codec corruption encountered while building a snapshot.
    FatalInternal,
}

/// A single reject reason produced by the lock/unlock validators or the credit-pool diff.
///
/// Each variant's `#[error(...)]` string is the stable ASCII tag named in spec.md §4/§7. These
/// strings are part of the external contract (peer-scoring interop) and must never be renamed.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ValidationError {
    // --- STRUCTURAL: asset-lock ---
    #[error("bad-assetlocktx-type")]
    BadAssetLockType,
    #[error("bad-assetlocktx-version")]
    BadAssetLockVersion,
    #[error("bad-assetlocktx-emptycreditoutputs")]
    BadAssetLockEmptyCreditOutputs,
    #[error("bad-assetlocktx-pubKeyHash")]
    BadAssetLockPubKeyHash,
    #[error("bad-assetlocktx-no-return")]
    BadAssetLockNoReturn,
    #[error("bad-assetlocktx-multiple-return")]
    BadAssetLockMultipleReturn,
    #[error("bad-assetlocktx-non-empty-return")]
    BadAssetLockNonEmptyReturn,
    #[error("bad-assetlocktx-zeroout-return")]
    BadAssetLockZeroOutReturn,
    #[error("bad-assetlocktx-creditamount")]
    BadAssetLockCreditAmount,
    #[error("bad-assetlocktx-payload")]
    BadAssetLockPayload(#[source] CodecError),

    // --- STRUCTURAL: asset-unlock ---
    #[error("bad-assetunlocktx-type")]
    BadAssetUnlockType,
    #[error("bad-assetunlocktx-have-input")]
    BadAssetUnlockHaveInput,
    #[error("bad-assetunlocktx-too-many-outs")]
    BadAssetUnlockTooManyOuts,
    #[error("bad-assetunlocktx-version")]
    BadAssetUnlockVersion,
    #[error("bad-assetunlocktx-payload")]
    BadAssetUnlockPayload(#[source] CodecError),

    // --- CONSENSUS / CRYPTO: asset-unlock ---
    #[error("bad-assetunlock-duplicated-index")]
    BadAssetUnlockDuplicatedIndex,
    #[error("bad-assetunlock-quorum-hash")]
    BadAssetUnlockQuorumHash,
    #[error("bad-assetunlock-not-active-quorum")]
    BadAssetUnlockNotActiveQuorum,
    #[error("bad-assetunlock-too-late")]
    BadAssetUnlockTooLate,
    #[error("bad-assetunlock-not-verified")]
    BadAssetUnlockNotVerified,

    // --- SEMANTIC / ACCOUNTING ---
    #[error("failed-creditpool-lock-invalid")]
    FailedCreditPoolLockInvalid,
    #[error("failed-creditpool-unlock-too-much")]
    FailedCreditPoolUnlockTooMuch,
    #[error("failed-creditpool-unlock-negative-amount")]
    FailedCreditPoolUnlockNegativeAmount,
    #[error("failed-creditpool-unlock-mismatch")]
    FailedCreditPoolTargetMismatch,

    // --- FATAL INTERNAL ---
    #[error("failed-procassetlocksinblock")]
    FailedProcessAssetLocksInBlock,
}

impl ValidationError {
    /// The stable ASCII reject tag, for peer-scoring and logging. Identical to `Display`, exposed
    /// as a named accessor so callers never need to `.to_string()` to compare against a tag.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::BadAssetLockType => "bad-assetlocktx-type",
            ValidationError::BadAssetLockVersion => "bad-assetlocktx-version",
            ValidationError::BadAssetLockEmptyCreditOutputs => "bad-assetlocktx-emptycreditoutputs",
            ValidationError::BadAssetLockPubKeyHash => "bad-assetlocktx-pubKeyHash",
            ValidationError::BadAssetLockNoReturn => "bad-assetlocktx-no-return",
            ValidationError::BadAssetLockMultipleReturn => "bad-assetlocktx-multiple-return",
            ValidationError::BadAssetLockNonEmptyReturn => "bad-assetlocktx-non-empty-return",
            ValidationError::BadAssetLockZeroOutReturn => "bad-assetlocktx-zeroout-return",
            ValidationError::BadAssetLockCreditAmount => "bad-assetlocktx-creditamount",
            ValidationError::BadAssetLockPayload(_) => "bad-assetlocktx-payload",
            ValidationError::BadAssetUnlockType => "bad-assetunlocktx-type",
            ValidationError::BadAssetUnlockHaveInput => "bad-assetunlocktx-have-input",
            ValidationError::BadAssetUnlockTooManyOuts => "bad-assetunlocktx-too-many-outs",
            ValidationError::BadAssetUnlockVersion => "bad-assetunlocktx-version",
            ValidationError::BadAssetUnlockPayload(_) => "bad-assetunlocktx-payload",
            ValidationError::BadAssetUnlockDuplicatedIndex => "bad-assetunlock-duplicated-index",
            ValidationError::BadAssetUnlockQuorumHash => "bad-assetunlock-quorum-hash",
            ValidationError::BadAssetUnlockNotActiveQuorum => "bad-assetunlock-not-active-quorum",
            ValidationError::BadAssetUnlockTooLate => "bad-assetunlock-too-late",
            ValidationError::BadAssetUnlockNotVerified => "bad-assetunlock-not-verified",
            ValidationError::FailedCreditPoolLockInvalid => "failed-creditpool-lock-invalid",
            ValidationError::FailedCreditPoolUnlockTooMuch => "failed-creditpool-unlock-too-much",
            ValidationError::FailedCreditPoolUnlockNegativeAmount => "failed-creditpool-unlock-negative-amount",
            ValidationError::FailedCreditPoolTargetMismatch => "failed-creditpool-unlock-mismatch",
            ValidationError::FailedProcessAssetLocksInBlock => "failed-procassetlocksinblock",
        }
    }

    pub fn severity(&self) -> Severity {
        use ValidationError::*;
        match self {
            BadAssetLockType | BadAssetLockVersion | BadAssetLockEmptyCreditOutputs | BadAssetLockPubKeyHash |
            BadAssetLockNoReturn | BadAssetLockMultipleReturn | BadAssetLockNonEmptyReturn |
            BadAssetLockZeroOutReturn | BadAssetLockCreditAmount | BadAssetLockPayload(_) | BadAssetUnlockType |
            BadAssetUnlockHaveInput | BadAssetUnlockTooManyOuts | BadAssetUnlockVersion | BadAssetUnlockPayload(_) => {
                Severity::Structural
            },
            FailedCreditPoolLockInvalid | FailedCreditPoolUnlockTooMuch | FailedCreditPoolUnlockNegativeAmount |
            FailedCreditPoolTargetMismatch => Severity::Semantic,
            BadAssetUnlockDuplicatedIndex |
            BadAssetUnlockQuorumHash |
            BadAssetUnlockNotActiveQuorum |
            BadAssetUnlockTooLate |
            BadAssetUnlockNotVerified => Severity::Consensus,
            FailedProcessAssetLocksInBlock => Severity::FatalInternal,
        }
    }
}
