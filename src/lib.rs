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

//! Asset-lock / asset-unlock validation and credit pool accounting.
//!
//! This crate decides, for every candidate block of a proof-of-work base chain that is
//! bridged to a companion platform chain, whether the block's asset-lock and asset-unlock
//! special transactions respect conservation of value, withdrawal rate limits, uniqueness of
//! withdrawal indices, quorum threshold-signature authorization and expiry windows.
//!
//! The crate does not implement peer protocol, mempool admission, RPC, wallet key management,
//! deterministic masternode list construction or block propagation. Those are represented only
//! as the collaborator traits in [`chain`].

pub mod amount;
pub mod chain;
pub mod consensus;
pub mod credit_pool;
pub mod error;
pub mod payload;
pub mod skip_set;
pub mod transaction;
pub mod validation;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use amount::Credits;
pub use consensus::ConsensusParams;
pub use error::{Severity, ValidationError};
