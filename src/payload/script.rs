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

/// A pay-to-public-key-hash script of the canonical fixed length used by asset-lock credit
/// outputs: `OP_DUP OP_HASH160 <20-byte hash> OP_EQUALVERIFY OP_CHECKSIG`, 25 bytes total.
///
/// This crate does not interpret scripts beyond recognising this one shape (spec.md §4.E "every
/// script in O is a pay-to-public-key-hash script of the canonical fixed length"); full script
/// evaluation is a collaborator concern outside this crate's scope.
#[derive(Clone, Eq, PartialEq)]
pub struct P2pkhScript(pub [u8; Self::LEN]);

impl P2pkhScript {
    pub const LEN: usize = 25;

    const OP_DUP: u8 = 0x76;
    const OP_HASH160: u8 = 0xa9;
    const OP_EQUALVERIFY: u8 = 0x88;
    const OP_CHECKSIG: u8 = 0xac;
    const PUSH_20: u8 = 0x14;

    pub fn new(pubkey_hash: [u8; 20]) -> Self {
        let mut bytes = [0u8; Self::LEN];
        bytes[0] = Self::OP_DUP;
        bytes[1] = Self::OP_HASH160;
        bytes[2] = Self::PUSH_20;
        bytes[3..23].copy_from_slice(&pubkey_hash);
        bytes[23] = Self::OP_EQUALVERIFY;
        bytes[24] = Self::OP_CHECKSIG;
        P2pkhScript(bytes)
    }

    /// Returns `true` iff `bytes` has the exact canonical P2PKH shape. Spec.md §4.E
    /// `bad-assetlocktx-pubKeyHash`.
    pub fn is_p2pkh(bytes: &[u8]) -> bool {
        bytes.len() == Self::LEN &&
            bytes[0] == Self::OP_DUP &&
            bytes[1] == Self::OP_HASH160 &&
            bytes[2] == Self::PUSH_20 &&
            bytes[23] == Self::OP_EQUALVERIFY &&
            bytes[24] == Self::OP_CHECKSIG
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if !Self::is_p2pkh(bytes) {
            return None;
        }
        let mut out = [0u8; Self::LEN];
        out.copy_from_slice(bytes);
        Some(P2pkhScript(out))
    }

    pub fn pubkey_hash(&self) -> [u8; 20] {
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&self.0[3..23]);
        hash
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for P2pkhScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P2pkhScript({})", hex::encode(self.0))
    }
}
