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

//! A memory-bounded set of monotonically-issued withdrawal indices.
//!
//! Conceptually a set of `u64`, represented as `(current_max, skipped)` so that membership of
//! `{0, 1, ..., current_max - 1} \ skipped` can be tested and extended without ever storing more
//! than `capacity` exceptions, even under an adversarial index pattern. This is the forward-only
//! sliding frontier described in spec.md §4.B; only `add` mutates it, and once added an index is
//! never removed.

use std::collections::HashSet;

/// See the module docs. Construct with [`SkipSet::new`], giving the capacity bound `K`.
#[derive(Debug, Clone)]
pub struct SkipSet {
    current_max: u64,
    skipped: HashSet<u64>,
    capacity: usize,
}

impl SkipSet {
    pub fn new(capacity: usize) -> Self {
        SkipSet {
            current_max: 0,
            skipped: HashSet::new(),
            capacity,
        }
    }

    /// `v < current_max ∧ v ∉ skipped`.
    pub fn contains(&self, v: u64) -> bool {
        v < self.current_max && !self.skipped.contains(&v)
    }

    /// Whether [`SkipSet::add`] would succeed for `v`, without mutating `self`.
    pub fn can_be_added(&self, v: u64) -> bool {
        if self.contains(v) {
            return false;
        }
        if v < self.current_max {
            // v is in `skipped`: re-adding it just removes the exception, never grows `skipped`.
            return true;
        }
        let gap = (v - self.current_max) as usize;
        self.skipped.len() + gap <= self.capacity
    }

    /// Adds `v` to the set. Returns `false` (without mutating) if `v` is already present, or if
    /// doing so would push `skipped.len()` over the capacity bound.
    ///
    /// # Semantics
    /// - `v == current_max`: advances `current_max` to `v + 1`.
    /// - `v > current_max`: inserts `current_max..v` into `skipped` and advances `current_max` to
    ///   `v + 1`.
    /// - `v < current_max`: removes `v` from `skipped` (it must have been there, since
    ///   `can_be_added` already ruled out `contains(v)`).
    pub fn add(&mut self, v: u64) -> bool {
        if !self.can_be_added(v) {
            return false;
        }
        if v >= self.current_max {
            for skipped in self.current_max..v {
                self.skipped.insert(skipped);
            }
            self.current_max = v + 1;
        } else {
            self.skipped.remove(&v);
        }
        true
    }

    /// `current_max - skipped.len()`: the number of indices currently considered "used". Named
    /// `len` rather than the source's `size()`, per spec.md §9 Open Question 2.
    pub fn len(&self) -> usize {
        (self.current_max as usize).saturating_sub(self.skipped.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of gaps currently tolerated below `current_max`. Named `skipped_len` rather than
    /// the source's `capacity()`, per spec.md §9 Open Question 2 (the source's naming conflated
    /// "number of skipped entries" with "capacity bound", which are different numbers).
    pub fn skipped_len(&self) -> usize {
        self.skipped.len()
    }

    pub fn current_max(&self) -> u64 {
        self.current_max
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
