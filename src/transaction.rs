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

//! The minimal transaction shape this crate needs from its host chain: enough to dispatch on
//! special-transaction kind and inspect inputs/outputs. Everything else about a transaction
//! (scripts beyond P2PKH recognition, range proofs, signatures over ordinary inputs) belongs to
//! the host chain, not here. Spec.md §3 "Transaction wrapper".

use crate::{amount::Credits, payload::Hash256};

/// The special-transaction discriminant. A sum type over the wire `kind` field so validator
/// dispatch is total at compile time and the "unknown kind" branch vanishes — spec.md §9 redesign
/// note "Sum types over discriminants".
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TxKind {
    AssetLock,
    AssetUnlock,
    /// Any other special-transaction type or an ordinary transaction; this crate's validators
    /// always accept these without inspecting them (spec.md §4.G: "If T is neither lock nor
    /// unlock, return accept").
    Other(u16),
}

#[derive(Debug, Clone)]
pub struct TxOutPoint {
    pub txid: Hash256,
    pub index: u32,
}

#[derive(Debug, Clone)]
pub struct TxIn {
    pub previous_output: TxOutPoint,
}

#[derive(Debug, Clone)]
pub struct TxOut {
    pub value: Credits,
    /// Raw script bytes. Recognised as P2PKH via [`crate::payload::P2pkhScript::is_p2pkh`] where
    /// the spec requires it; otherwise opaque to this crate.
    pub script_pub_key: Vec<u8>,
}

impl TxOut {
    /// `true` for any output whose script begins with the burn opcode (`OP_RETURN`, `0x6a`),
    /// whether or not its shape is the canonical two-byte form. Spec.md §4.E distinguishes "no
    /// burn output at all" from "a malformed one" by checking this first.
    pub fn starts_with_burn_opcode(&self) -> bool {
        matches!(self.script_pub_key.first(), Some(0x6a))
    }

    /// The canonical burn marker used by asset-lock transactions: `OP_RETURN` followed by a
    /// single zero byte, and nothing else. Only meaningful once [`Self::starts_with_burn_opcode`]
    /// is known to hold. Spec.md §4.E `bad-assetlocktx-non-empty-return`.
    pub fn is_canonical_burn_script(&self) -> bool {
        self.script_pub_key.len() == 2 && self.script_pub_key[1] == 0
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub kind: TxKind,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    /// Opaque payload bytes; the codec (component A) parses these iff `kind` matches. Spec.md §3.
    pub extra_payload: Vec<u8>,
}

impl Transaction {
    pub fn is_asset_lock(&self) -> bool {
        matches!(self.kind, TxKind::AssetLock)
    }

    pub fn is_asset_unlock(&self) -> bool {
        matches!(self.kind, TxKind::AssetUnlock)
    }
}
