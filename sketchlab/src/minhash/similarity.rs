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

//! Similarity measures over signatures and shingle sets.

use std::collections::BTreeSet;
use std::collections::HashSet;
use std::hash::Hash;

use super::EMPTY_SLOT;
use super::MinHashSignature;
use crate::error::Error;
use crate::error::ErrorKind;

/// Slot-wise signature similarity.
///
/// Counts the slots where both signatures hold the same hash value and
/// divides by the signature size. Empty slots never match, so a signature
/// that is not saturated is less than fully similar even to itself.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidParameter`] if the signatures are not
/// [compatible](MinHashSignature::is_compatible).
///
/// # Examples
///
/// ```
/// # use sketchlab::minhash::MinHashConfig;
/// # use sketchlab::minhash::MinHashSignature;
/// # use sketchlab::minhash::similarity;
/// let config = MinHashConfig::new(1, 3).unwrap();
/// let a = MinHashSignature::from_text("one two three four", &config);
/// assert_eq!(similarity(&a, &a.clone()).unwrap(), 1.0);
/// ```
pub fn similarity(a: &MinHashSignature, b: &MinHashSignature) -> Result<f64, Error> {
    check_compatible(a, b)?;

    let matches = a
        .slots()
        .iter()
        .zip(b.slots())
        .filter(|&(&x, &y)| x == y && x != EMPTY_SLOT)
        .count();
    Ok(matches as f64 / a.signature_size() as f64)
}

/// Estimates the Jaccard measure of the two documents' shingle sets.
///
/// The `k` smallest hash values of the union of both signatures are a
/// uniform sample of the union of the shingle sets; the estimate is the
/// fraction of that sample held by both signatures. When the documents have
/// fewer than `k` distinct shingles between them the sample is the whole
/// union and the estimate is exact.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidParameter`] if the signatures are not
/// [compatible](MinHashSignature::is_compatible).
pub fn jaccard_estimate(a: &MinHashSignature, b: &MinHashSignature) -> Result<f64, Error> {
    check_compatible(a, b)?;

    let in_a: HashSet<u64> = a.values().collect();
    let in_b: HashSet<u64> = b.values().collect();
    let union: BTreeSet<u64> = in_a.union(&in_b).copied().collect();

    let sample: Vec<u64> = union.into_iter().take(a.signature_size()).collect();
    if sample.is_empty() {
        return Ok(0.0);
    }

    let shared = sample
        .iter()
        .filter(|&&v| in_a.contains(&v) && in_b.contains(&v))
        .count();
    Ok(shared as f64 / sample.len() as f64)
}

/// Exact Jaccard measure `|A ∩ B| / |A ∪ B|`.
///
/// Two empty sets have a measure of 0.
///
/// # Examples
///
/// ```
/// # use std::collections::HashSet;
/// # use sketchlab::minhash::jaccard;
/// let a: HashSet<_> = [1, 2, 3, 4].into_iter().collect();
/// let b: HashSet<_> = [3, 4, 5].into_iter().collect();
/// assert_eq!(jaccard(&a, &b), 0.4);
/// ```
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

fn check_compatible(a: &MinHashSignature, b: &MinHashSignature) -> Result<(), Error> {
    if a.is_compatible(b) {
        return Ok(());
    }
    let versus = |x: &dyn std::fmt::Display, y: &dyn std::fmt::Display| format!("{x} vs {y}");
    Err(
        Error::new(ErrorKind::InvalidParameter, "incompatible signatures")
            .with_context(
                "signature_size",
                versus(&a.signature_size(), &b.signature_size()),
            )
            .with_context("shingle_width", versus(&a.shingle_width(), &b.shingle_width()))
            .with_context("seed", versus(&a.seed(), &b.seed())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minhash::MinHashConfig;
    use crate::minhash::Stopwords;
    use crate::minhash::shingle_set;

    const DOC_A: &str = "Jack and Jill went up the hill to fetch a pail of water";
    const DOC_B: &str = "Up the hill, Jack and Jill went to get a pail of water";

    fn classroom_config(size: usize) -> MinHashConfig {
        MinHashConfig::new(2, size)
            .unwrap()
            .stopwords(Stopwords::classroom())
    }

    #[test]
    fn test_exact_jaccard_of_documents() {
        let stopwords = Stopwords::classroom();
        let a = shingle_set(DOC_A, 2, &stopwords).unwrap();
        let b = shingle_set(DOC_B, 2, &stopwords).unwrap();
        assert_eq!(jaccard(&a, &b), 0.4);
    }

    #[test]
    fn test_jaccard_empty_sets() {
        let empty: HashSet<u8> = HashSet::new();
        assert_eq!(jaccard(&empty, &empty), 0.0);
    }

    #[test]
    fn test_estimate_exact_when_union_fits() {
        for size in [10, 16, 64] {
            let config = classroom_config(size);
            let a = MinHashSignature::from_text(DOC_A, &config);
            let b = MinHashSignature::from_text(DOC_B, &config);
            assert_eq!(jaccard_estimate(&a, &b).unwrap(), 0.4);
        }
    }

    #[test]
    fn test_similarity_bounds() {
        for size in [1, 3, 7, 10] {
            let config = classroom_config(size);
            let a = MinHashSignature::from_text(DOC_A, &config);
            let b = MinHashSignature::from_text(DOC_B, &config);
            let s = similarity(&a, &b).unwrap();
            assert!((0.0..=1.0).contains(&s));
            let e = jaccard_estimate(&a, &b).unwrap();
            assert!((0.0..=1.0).contains(&e));
        }
    }

    #[test]
    fn test_self_similarity() {
        let config = classroom_config(5);
        let a = MinHashSignature::from_text(DOC_A, &config);
        assert!(a.is_saturated());
        assert_eq!(similarity(&a, &a.clone()).unwrap(), 1.0);
        assert_eq!(jaccard_estimate(&a, &a.clone()).unwrap(), 1.0);
    }

    #[test]
    fn test_empty_slots_never_match() {
        let config = classroom_config(10);
        let a = MinHashSignature::from_text(DOC_A, &config);
        // 7 shingles in 10 slots.
        assert_eq!(similarity(&a, &a.clone()).unwrap(), 0.7);

        let empty = MinHashSignature::from_text("", &config);
        assert_eq!(similarity(&empty, &empty.clone()).unwrap(), 0.0);
        assert_eq!(jaccard_estimate(&empty, &empty.clone()).unwrap(), 0.0);
    }

    #[test]
    fn test_incompatible_signatures() {
        let a = MinHashSignature::from_text(DOC_A, &classroom_config(10));
        let b = MinHashSignature::from_text(DOC_B, &classroom_config(5));
        let err = similarity(&a, &b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.context_value("signature_size"), Some("10 vs 5"));
        assert!(jaccard_estimate(&a, &b).is_err());
    }
}
