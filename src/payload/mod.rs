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

//! Deterministic wire encoding for the two special-transaction payloads, per spec.md §6.1.
//!
//! Field order and widths are fixed by the format below; neither `encode` nor `decode` may be
//! changed without a version bump, since the tag is part of the external consensus contract.

mod codec;
mod script;

pub use codec::{decode_asset_lock, decode_asset_unlock, encode_asset_lock, encode_asset_unlock, CodecError};
pub use script::P2pkhScript;

use crate::amount::Credits;

/// The 32-byte hash identifying a quorum's DKG session, reused here as an opaque block/quorum
/// identifier matching spec.md's `quorumHash`.
pub type Hash256 = [u8; 32];

/// A 96-byte BLS12-381 aggregate threshold signature. Verification itself is delegated to
/// [`crate::chain::Quorum::verify`] — this crate only carries the bytes.
#[derive(Clone, Eq, PartialEq)]
pub struct BlsSignature(pub [u8; 96]);

impl std::fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlsSignature({})", hex::encode(self.0))
    }
}

impl Default for BlsSignature {
    fn default() -> Self {
        BlsSignature([0u8; 96])
    }
}

/// One beneficiary of an asset-lock: an on-chain value destined to be minted as a credit.
///
/// The wire format (spec.md §6.1) carries an arbitrary `scriptPubKey`; whether it is a canonical
/// P2PKH script is a semantic check made by [`crate::validation::lock::validate_asset_lock`]
/// (`bad-assetlocktx-pubKeyHash`), not a structural one enforced by the codec. Spec.md §3
/// `AssetLockPayload`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CreditOutput {
    pub value: Credits,
    pub script: Vec<u8>,
}

/// The versioned, variable-length-output payload of an `AssetLock` special transaction. Spec.md
/// §3/§6.1.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AssetLockPayload {
    pub version: u16,
    /// Reserved for future use; currently always 0. Spec.md §6.1 `type`.
    pub reserved_type: u16,
    pub credit_outputs: Vec<CreditOutput>,
}

impl AssetLockPayload {
    pub const CURRENT_VERSION: u16 = 1;

    pub fn new(credit_outputs: Vec<CreditOutput>) -> Self {
        AssetLockPayload {
            version: Self::CURRENT_VERSION,
            reserved_type: 0,
            credit_outputs,
        }
    }
}

impl std::fmt::Display for AssetLockPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AssetLockPayload(version={}, creditOutputs=[", self.version)?;
        for (i, out) in self.credit_outputs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", out.value)?;
        }
        write!(f, "])")
    }
}

/// The versioned payload of an `AssetUnlock` (withdrawal) special transaction. Spec.md §3/§6.1.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AssetUnlockPayload {
    pub version: u16,
    pub index: u64,
    pub fee: u32,
    pub requested_height: u32,
    pub quorum_hash: Hash256,
    pub signature: BlsSignature,
}

impl AssetUnlockPayload {
    pub const CURRENT_VERSION: u16 = 1;

    /// Maximum number of transaction outputs an asset-unlock may carry. Spec.md §4.F.2.
    pub const MAX_WITHDRAWALS: usize = 32;

    /// The height beyond which this unlock can no longer be mined, per spec.md §4.F and the
    /// per-network `unlock_expiry_blocks` constant (spec.md §9 Open Question 1).
    pub fn height_to_expiry(&self, expiry_blocks: u32) -> u32 {
        self.requested_height + expiry_blocks
    }

    /// Returns a copy of this payload with the signature cleared, used to compute `msgHash` per
    /// spec.md §4.F.6: "the hash of T with payload.sig substituted by the identity signature".
    pub fn with_signature_cleared(&self) -> Self {
        AssetUnlockPayload {
            signature: BlsSignature::default(),
            ..self.clone()
        }
    }
}

impl std::fmt::Display for AssetUnlockPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AssetUnlockPayload(version={}, index={}, fee={}, requestedHeight={}, quorumHash={})",
            self.version,
            self.index,
            Credits::from(self.fee),
            self.requested_height,
            hex::encode(self.quorum_hash)
        )
    }
}
