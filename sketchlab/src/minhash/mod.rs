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

//! MinHash signatures for estimating the Jaccard similarity of documents.
//!
//! A document is reduced to its set of *shingles*: runs of `n` consecutive
//! words after punctuation is stripped, case is folded and stopwords are
//! dropped. Each shingle is hashed, and the signature keeps the `k` smallest
//! distinct hash values. Two documents with similar shingle sets end up with
//! overlapping signatures, so signatures can be compared in place of the full
//! sets.
//!
//! # Usage
//!
//! ```rust
//! use sketchlab::minhash::MinHashConfig;
//! use sketchlab::minhash::MinHashSignature;
//! use sketchlab::minhash::Stopwords;
//! use sketchlab::minhash::jaccard_estimate;
//!
//! let config = MinHashConfig::new(2, 10)
//!     .unwrap()
//!     .stopwords(Stopwords::classroom());
//!
//! let a = MinHashSignature::from_text(
//!     "Jack and Jill went up the hill to fetch a pail of water",
//!     &config,
//! );
//! let b = MinHashSignature::from_text(
//!     "Up the hill, Jack and Jill went to get a pail of water",
//!     &config,
//! );
//!
//! // Four of the ten distinct shingles are shared.
//! assert_eq!(jaccard_estimate(&a, &b).unwrap(), 0.4);
//! ```

mod shingle;
mod signature;
mod similarity;

pub use self::shingle::Shingler;
pub use self::shingle::Stopwords;
pub use self::shingle::normalize_token;
pub use self::shingle::shingle_set;
pub use self::signature::MinHashConfig;
pub use self::signature::MinHashSignature;
pub use self::similarity::jaccard;
pub use self::similarity::jaccard_estimate;
pub use self::similarity::similarity;

/// Marker for a signature slot that holds no hash value yet.
///
/// Shingle hashes are 63-bit, so no real hash compares equal to it.
pub const EMPTY_SLOT: u64 = u64::MAX;

/// Default number of words per shingle.
pub const DEFAULT_SHINGLE_WIDTH: usize = 2;

/// Default number of hash values kept in a signature.
pub const DEFAULT_SIGNATURE_SIZE: usize = 10;
