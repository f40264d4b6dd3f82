// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Bloom filter for probabilistic set membership.
//!
//! A Bloom filter is an array of `m` bits plus `k` hash functions. Inserting
//! an item sets the `k` bits its hashes select; querying an item reports
//! [`Membership::Possible`] when all of those bits are set and
//! [`Membership::Impossible`] otherwise. There are no false negatives, and the
//! false positive rate after `n` insertions is approximately
//! `(1 - e^(-kn/m))^k`.
//!
//! # Usage
//!
//! ```rust
//! use sketchlab::bloom::BloomFilterBuilder;
//! use sketchlab::bloom::Membership;
//!
//! // Sized for 1300 sites with at most a 15% false positive rate.
//! let mut filter = BloomFilterBuilder::with_accuracy(1300, 0.15)
//!     .unwrap()
//!     .build();
//! filter.insert("malware.com");
//!
//! assert_eq!(filter.query("malware.com"), Membership::Possible);
//! assert!(filter.num_hashes() <= 6);
//! ```

mod sketch;

pub use self::sketch::BloomFilter;
pub use self::sketch::BloomFilterBuilder;

/// Upper bound on the number of hash functions a filter uses.
///
/// Sizing by accuracy may suggest more; the count is capped here to bound the
/// hashing cost per operation.
pub const MAX_NUM_HASHES: u16 = 6;

/// Upper bound on the number of bits in a filter.
pub const MAX_NUM_BITS: u64 = (1u64 << 35) - 64;

/// Result of a membership query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    /// All of the item's bits are set: it may have been inserted.
    Possible,
    /// At least one of the item's bits is clear: it was never inserted.
    Impossible,
}

impl Membership {
    /// Returns true for [`Membership::Possible`].
    pub fn is_possible(self) -> bool {
        matches!(self, Membership::Possible)
    }
}

impl std::fmt::Display for Membership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Membership::Possible => write!(f, "Possible"),
            Membership::Impossible => write!(f, "Impossible"),
        }
    }
}
