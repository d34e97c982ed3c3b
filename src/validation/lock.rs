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

//! Structural validation of an asset-lock transaction. Spec.md §4.E.

use crate::{
    amount::Credits,
    error::ValidationError,
    payload::{self, CodecError, P2pkhScript},
    transaction::Transaction,
};

/// Checks that `tx` is a well-formed asset-lock and returns the burn value it claims to escrow.
///
/// Does not touch credit-pool state; [`crate::credit_pool::diff::CreditPoolDiff::process_transaction`]
/// adds the returned value to the block's running `sessionLocked` total. Spec.md §4.E.
pub fn validate_asset_lock(tx: &Transaction) -> Result<Credits, ValidationError> {
    if !tx.is_asset_lock() {
        return Err(ValidationError::BadAssetLockType);
    }

    let mut return_amount = None;
    for out in &tx.outputs {
        if !out.starts_with_burn_opcode() {
            continue;
        }
        if !out.is_canonical_burn_script() {
            return Err(ValidationError::BadAssetLockNonEmptyReturn);
        }
        if out.value == Credits::ZERO {
            return Err(ValidationError::BadAssetLockZeroOutReturn);
        }
        if return_amount.is_some() {
            return Err(ValidationError::BadAssetLockMultipleReturn);
        }
        return_amount = Some(out.value);
    }
    let return_amount = return_amount.ok_or(ValidationError::BadAssetLockNoReturn)?;

    let decoded = payload::decode_asset_lock(&tx.extra_payload).map_err(|e| match e {
        CodecError::UnknownVersion(_) => ValidationError::BadAssetLockVersion,
        other => ValidationError::BadAssetLockPayload(other),
    })?;

    if decoded.credit_outputs.is_empty() {
        return Err(ValidationError::BadAssetLockEmptyCreditOutputs);
    }

    let mut credit_sum = Credits::ZERO;
    for out in &decoded.credit_outputs {
        credit_sum = credit_sum
            .checked_add(out.value)
            .ok_or(ValidationError::BadAssetLockCreditAmount)?;
        if !P2pkhScript::is_p2pkh(&out.script) {
            return Err(ValidationError::BadAssetLockPubKeyHash);
        }
    }

    if credit_sum != return_amount {
        return Err(ValidationError::BadAssetLockCreditAmount);
    }

    Ok(return_amount)
}
