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

use integer_encoding::VarInt;
use thiserror::Error;

use super::{AssetLockPayload, AssetUnlockPayload, BlsSignature, CreditOutput, Hash256};
use crate::amount::Credits;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum CodecError {
    #[error("unexpected end of input while decoding {0}")]
    UnexpectedEof(&'static str),
    #[error("{0} bytes of trailing input left over after decoding the payload")]
    TrailingBytes(usize),
    #[error("payload version {0} is not supported")]
    UnknownVersion(u16),
    #[error("credit-output value must be positive, got {0}")]
    NonPositiveValue(i64),
    #[error("malformed varint while decoding {0}")]
    MalformedVarInt(&'static str),
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], CodecError> {
        let end = self.pos + n;
        if end > self.buf.len() {
            return Err(CodecError::UnexpectedEof(field));
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u16(&mut self, field: &'static str) -> Result<u16, CodecError> {
        let bytes = self.take(2, field)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn u32(&mut self, field: &'static str) -> Result<u32, CodecError> {
        let bytes = self.take(4, field)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn u64(&mut self, field: &'static str) -> Result<u64, CodecError> {
        let bytes = self.take(8, field)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(arr))
    }

    fn i64(&mut self, field: &'static str) -> Result<i64, CodecError> {
        let bytes = self.take(8, field)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(i64::from_le_bytes(arr))
    }

    fn array32(&mut self, field: &'static str) -> Result<Hash256, CodecError> {
        let bytes = self.take(32, field)?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(arr)
    }

    fn array96(&mut self, field: &'static str) -> Result<[u8; 96], CodecError> {
        let bytes = self.take(96, field)?;
        let mut arr = [0u8; 96];
        arr.copy_from_slice(bytes);
        Ok(arr)
    }

    fn varint(&mut self, field: &'static str) -> Result<u64, CodecError> {
        let (value, consumed) = u64::decode_var(&self.buf[self.pos..]).ok_or(CodecError::MalformedVarInt(field))?;
        self.pos += consumed;
        Ok(value)
    }

    fn varbytes(&mut self, field: &'static str) -> Result<&'a [u8], CodecError> {
        let len = self.varint(field)? as usize;
        self.take(len, field)
    }

    fn finish(self) -> Result<(), CodecError> {
        if self.pos != self.buf.len() {
            return Err(CodecError::TrailingBytes(self.buf.len() - self.pos));
        }
        Ok(())
    }
}

/// Encodes an [`AssetLockPayload`] per spec.md §6.1. Deterministic: equal values always produce
/// byte-identical output.
pub fn encode_asset_lock(payload: &AssetLockPayload) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&payload.version.to_le_bytes());
    out.extend_from_slice(&payload.reserved_type.to_le_bytes());
    out.extend_from_slice(&(payload.credit_outputs.len() as u64).encode_var_vec());
    for output in &payload.credit_outputs {
        out.extend_from_slice(&output.value.as_u64().to_le_bytes());
        let script = output.script.as_slice();
        out.extend_from_slice(&(script.len() as u64).encode_var_vec());
        out.extend_from_slice(script);
    }
    out
}

/// Decodes an [`AssetLockPayload`], rejecting any input that is not fully consumed or whose
/// version is 0 or exceeds [`AssetLockPayload::CURRENT_VERSION`]. Spec.md §4.A.
pub fn decode_asset_lock(bytes: &[u8]) -> Result<AssetLockPayload, CodecError> {
    let mut reader = Reader::new(bytes);
    let version = reader.u16("version")?;
    if version == 0 || version > AssetLockPayload::CURRENT_VERSION {
        return Err(CodecError::UnknownVersion(version));
    }
    let reserved_type = reader.u16("type")?;
    let count = reader.varint("creditOutputs.len")?;
    let mut credit_outputs = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let raw_value = reader.i64("creditOutputs[].value")?;
        if raw_value <= 0 {
            return Err(CodecError::NonPositiveValue(raw_value));
        }
        let script_bytes = reader.varbytes("creditOutputs[].scriptPubKey")?;
        credit_outputs.push(CreditOutput {
            value: Credits::new(raw_value as u64),
            script: script_bytes.to_vec(),
        });
    }
    reader.finish()?;
    Ok(AssetLockPayload {
        version,
        reserved_type,
        credit_outputs,
    })
}

/// Encodes an [`AssetUnlockPayload`] per spec.md §6.1.
pub fn encode_asset_unlock(payload: &AssetUnlockPayload) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + 8 + 4 + 4 + 32 + 96);
    out.extend_from_slice(&payload.version.to_le_bytes());
    out.extend_from_slice(&payload.index.to_le_bytes());
    out.extend_from_slice(&payload.fee.to_le_bytes());
    out.extend_from_slice(&payload.requested_height.to_le_bytes());
    out.extend_from_slice(&payload.quorum_hash);
    out.extend_from_slice(&payload.signature.0);
    out
}

/// Decodes an [`AssetUnlockPayload`], rejecting any input that is not fully consumed or whose
/// version is 0 or exceeds [`AssetUnlockPayload::CURRENT_VERSION`]. Spec.md §4.A.
pub fn decode_asset_unlock(bytes: &[u8]) -> Result<AssetUnlockPayload, CodecError> {
    let mut reader = Reader::new(bytes);
    let version = reader.u16("version")?;
    if version == 0 || version > AssetUnlockPayload::CURRENT_VERSION {
        return Err(CodecError::UnknownVersion(version));
    }
    let index = reader.u64("index")?;
    let fee = reader.u32("fee")?;
    let requested_height = reader.u32("requestedHeight")?;
    let quorum_hash = reader.array32("quorumHash")?;
    let signature = BlsSignature(reader.array96("blsSignature")?);
    reader.finish()?;
    Ok(AssetUnlockPayload {
        version,
        index,
        fee,
        requested_height,
        quorum_hash,
        signature,
    })
}
