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

use std::hash::Hash;

use super::MAX_NUM_BITS;
use super::MAX_NUM_HASHES;
use super::Membership;
use crate::error::Error;
use crate::hash::DEFAULT_UPDATE_SEED;
use crate::hash::hash128;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides membership queries with:
/// - No false negatives (inserted items always report [`Membership::Possible`])
/// - A false positive rate tuned at construction
/// - Constant space usage
///
/// Bits are only ever set, never cleared, so the set of items reported as
/// possible members can only grow.
///
/// Use [`BloomFilterBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter {
    /// Hash seed for all hash functions
    seed: u32,
    /// Number of hash functions to use (k)
    num_hashes: u16,
    /// Total number of bits in the filter (m)
    capacity_bits: u64,
    /// Count of bits set to 1
    num_bits_set: u64,
    /// Bit array packed into u64 words
    /// Length = ceil(capacity_bits / 64)
    bit_array: Vec<u64>,
}

impl BloomFilter {
    /// Returns a builder for the default filter: 64 bits and a single hash function.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchlab::bloom::BloomFilter;
    /// use sketchlab::bloom::BloomFilterBuilder;
    ///
    /// let filter = BloomFilter::builder().seed(7).build();
    /// assert_eq!(filter.capacity(), 64);
    ///
    /// // By accuracy (recommended)
    /// let filter = BloomFilterBuilder::with_accuracy(1000, 0.01).unwrap().build();
    ///
    /// // By size (manual)
    /// let filter = BloomFilterBuilder::with_size(50, 2).unwrap().build();
    /// assert_eq!(filter.capacity(), 50);
    /// ```
    pub fn builder() -> BloomFilterBuilder {
        BloomFilterBuilder::default()
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Queries whether an item may be in the set.
    ///
    /// Returns:
    /// - [`Membership::Possible`]: item was inserted, or this is a false positive
    /// - [`Membership::Impossible`]: item was **definitely not** inserted
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlab::bloom::BloomFilterBuilder;
    /// # use sketchlab::bloom::Membership;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
    /// filter.insert("virus.net");
    ///
    /// assert_eq!(filter.query("virus.net"), Membership::Possible);
    /// ```
    pub fn query<T: Hash + ?Sized>(&self, item: &T) -> Membership {
        if self.contains(item) {
            Membership::Possible
        } else {
            Membership::Impossible
        }
    }

    /// Tests whether an item is possibly in the set.
    ///
    /// Boolean form of [`query()`](Self::query).
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlab::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
    /// filter.insert("apple");
    ///
    /// assert!(filter.contains("apple")); // true - was inserted
    /// assert!(!filter.contains("grape")); // false - never inserted (probably)
    /// ```
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        if self.is_empty() {
            return false;
        }

        let (h1, h2) = hash128(item, self.seed);
        self.check_bits(h1, h2)
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlab::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
    ///
    /// let was_present = filter.contains_and_insert("apple");
    /// assert!(!was_present); // First insertion
    ///
    /// let was_present = filter.contains_and_insert("apple");
    /// assert!(was_present); // Now it's in the set
    /// ```
    pub fn contains_and_insert<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        let (h1, h2) = hash128(item, self.seed);
        let was_present = self.check_bits(h1, h2);
        self.set_bits(h1, h2);
        was_present
    }

    /// Counts how many items of a query batch are possible members.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlab::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
    /// filter.insert("worm.edu");
    ///
    /// let hits = filter.count_possible(["worm.edu", "worm.edu"]);
    /// assert_eq!(hits, 2);
    /// ```
    pub fn count_possible<I>(&self, items: I) -> usize
    where
        I: IntoIterator,
        I::Item: Hash,
    {
        items
            .into_iter()
            .filter(|item| self.contains(item))
            .count()
    }

    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Inserts an item into the filter.
    ///
    /// After insertion, `contains(item)` will always return `true`. Inserting
    /// the same item again has no further effect.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlab::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).unwrap().build();
    ///
    /// filter.insert("apple");
    /// filter.insert(String::from("banana"));
    ///
    /// assert!(filter.contains("apple"));
    /// assert!(filter.contains("banana"));
    /// ```
    pub fn insert<T: Hash>(&mut self, item: T) {
        let (h1, h2) = hash128(&item, self.seed);
        self.set_bits(h1, h2);
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns whether the filter is empty (no items inserted).
    pub fn is_empty(&self) -> bool {
        self.num_bits_set == 0
    }

    /// Returns the number of bits set to 1.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the total number of bits in the filter (capacity).
    pub fn capacity(&self) -> u64 {
        self.capacity_bits
    }

    /// Returns the number of hash functions used.
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Returns the fraction of bits set, i.e. how full the array is.
    pub fn load_factor(&self) -> f64 {
        self.num_bits_set as f64 / self.capacity_bits as f64
    }

    /// Estimates the current false positive probability from the load factor.
    ///
    /// A query of an item never inserted is a false positive when all of its
    /// `k` bits happen to be set, so the estimate is `load_factor^k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powi(i32::from(self.num_hashes))
    }

    /// Returns the theoretical false positive probability after `num_items`
    /// insertions.
    ///
    /// Formula: `(1 - e^(-k*n/m))^k`
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlab::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_accuracy(1300, 0.15).unwrap().build();
    /// let fpp = filter.theoretical_fpp(1300);
    /// assert!(fpp > 0.12 && fpp < 0.18);
    /// ```
    pub fn theoretical_fpp(&self, num_items: u64) -> f64 {
        let k = self.num_hashes as f64;
        let n = num_items as f64;
        let m = self.capacity_bits as f64;
        (1.0 - (-k * n / m).exp()).powf(k)
    }

    /// Returns the false positive probability after `num_items` insertions
    /// without the exponential approximation.
    ///
    /// Formula: `(1 - (1 - 1/m)^(k*n))^k`
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlab::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_size(50, 2).unwrap().build();
    /// let exact = filter.theoretical_fpp_exact(5);
    /// assert!(exact > filter.theoretical_fpp(5));
    /// assert!(exact - filter.theoretical_fpp(5) < 0.01);
    /// ```
    pub fn theoretical_fpp_exact(&self, num_items: u64) -> f64 {
        let k = self.num_hashes as f64;
        let n = num_items as f64;
        let m = self.capacity_bits as f64;
        // (1 - 1/m)^(kn) evaluated in log space for large m.
        let all_clear = (k * n * (-1.0 / m).ln_1p()).exp();
        (1.0 - all_clear).powf(k)
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Checks if all k bits are set for the given hash values.
    fn check_bits(&self, h1: u64, h2: u64) -> bool {
        (0..self.num_hashes).all(|i| self.get_bit(self.compute_bit_index(h1, h2, i)))
    }

    /// Sets all k bits for the given hash values.
    fn set_bits(&mut self, h1: u64, h2: u64) {
        for i in 0..self.num_hashes {
            let bit_index = self.compute_bit_index(h1, h2, i);
            self.set_bit(bit_index);
        }
    }

    /// Computes a bit index using double hashing (Kirsch-Mitzenmacher).
    /// Formula: (h1 + i * h2) mod capacity_bits
    fn compute_bit_index(&self, h1: u64, h2: u64, i: u16) -> u64 {
        let hash = h1.wrapping_add(u64::from(i).wrapping_mul(h2));
        hash % self.capacity_bits
    }

    /// Gets the value of a single bit.
    fn get_bit(&self, bit_index: u64) -> bool {
        let word_index = (bit_index / 64) as usize;
        let mask = 1u64 << (bit_index % 64);
        (self.bit_array[word_index] & mask) != 0
    }

    /// Sets a single bit and updates the count if it wasn't already set.
    fn set_bit(&mut self, bit_index: u64) {
        let word_index = (bit_index / 64) as usize;
        let mask = 1u64 << (bit_index % 64);

        if (self.bit_array[word_index] & mask) == 0 {
            self.bit_array[word_index] |= mask;
            self.num_bits_set += 1;
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for creating [`BloomFilter`] instances.
///
/// Provides two construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): Specify expected items and false positive rate
/// - [`with_size()`](Self::with_size): Specify exact bit count and hash functions
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    num_bits: u64,
    num_hashes: u16,
    seed: u32,
}

impl Default for BloomFilterBuilder {
    fn default() -> Self {
        BloomFilterBuilder {
            num_bits: 64,
            num_hashes: 1,
            seed: DEFAULT_UPDATE_SEED,
        }
    }
}

impl BloomFilterBuilder {
    /// Creates a builder sized for a target accuracy.
    ///
    /// Computes `m = ceil(-n * ln(p) / ln(2)^2)` bits and
    /// `k = min(floor(m / n * ln(2) + 0.5), 6)` hash functions.
    ///
    /// # Arguments
    ///
    /// - `max_items`: Anticipated number of items (n)
    /// - `fpp`: Target false positive probability (p), e.g. 0.15 for 15%
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `max_items` is 0, `fpp` is not in (0.0, 1.0), or the resulting bit
    /// count exceeds [`MAX_NUM_BITS`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlab::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_accuracy(1300, 0.15)
    ///     .unwrap()
    ///     .seed(42)
    ///     .build();
    /// assert_eq!(filter.capacity(), 5134);
    /// assert_eq!(filter.num_hashes(), 3);
    ///
    /// assert!(BloomFilterBuilder::with_accuracy(0, 0.15).is_err());
    /// ```
    pub fn with_accuracy(max_items: u64, fpp: f64) -> Result<Self, Error> {
        if max_items == 0 {
            return Err(Error::invalid_parameter(
                "max_items",
                max_items,
                "greater than 0",
            ));
        }
        if !(fpp > 0.0 && fpp < 1.0) {
            return Err(Error::invalid_parameter("fpp", fpp, "in (0, 1)"));
        }

        let num_bits = Self::suggest_num_bits(max_items, fpp);
        if num_bits > MAX_NUM_BITS {
            return Err(Error::invalid_parameter(
                "num_bits",
                num_bits,
                "at most MAX_NUM_BITS",
            )
            .with_context("max_items", max_items)
            .with_context("fpp", fpp));
        }
        let num_hashes = Self::suggest_num_hashes(max_items, num_bits);

        Ok(BloomFilterBuilder {
            num_bits,
            num_hashes,
            seed: DEFAULT_UPDATE_SEED,
        })
    }

    /// Creates a builder with an explicit size.
    ///
    /// # Arguments
    ///
    /// - `num_bits`: Total number of bits in the filter (m)
    /// - `num_hashes`: Number of hash functions to use (k), between 1 and 6
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `num_bits` is 0 or above [`MAX_NUM_BITS`], or `num_hashes` is outside
    /// `1..=6`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlab::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_size(50, 2).unwrap().build();
    /// assert_eq!(filter.capacity(), 50);
    /// assert_eq!(filter.num_hashes(), 2);
    /// ```
    pub fn with_size(num_bits: u64, num_hashes: u16) -> Result<Self, Error> {
        Self::validate_params(num_bits, num_hashes)?;

        Ok(BloomFilterBuilder {
            num_bits,
            num_hashes,
            seed: DEFAULT_UPDATE_SEED,
        })
    }

    /// Sets a custom hash seed (default: 9001).
    ///
    /// Filters with different seeds map the same item to different bits.
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the Bloom filter with every bit cleared.
    pub fn build(self) -> BloomFilter {
        let num_words = self.num_bits.div_ceil(64) as usize;
        let bit_array = vec![0u64; num_words];

        tracing::debug!(
            capacity_bits = self.num_bits,
            num_hashes = self.num_hashes,
            seed = self.seed,
            "built bloom filter"
        );

        BloomFilter {
            seed: self.seed,
            num_hashes: self.num_hashes,
            capacity_bits: self.num_bits,
            num_bits_set: 0,
            bit_array,
        }
    }

    // ========================================================================
    // Static Suggestion Methods
    // ========================================================================

    /// Suggests the number of bits for a given number of items and target FPP.
    ///
    /// Formula: `m = ceil(-n * ln(p) / (ln(2)^2))`
    /// where n = max_items, p = fpp
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlab::bloom::BloomFilterBuilder;
    /// let bits = BloomFilterBuilder::suggest_num_bits(1000, 0.01);
    /// assert_eq!(bits, 9586);
    /// ```
    pub fn suggest_num_bits(max_items: u64, fpp: f64) -> u64 {
        let n = max_items as f64;
        let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;

        (-n * fpp.ln() / ln2_squared).ceil() as u64
    }

    /// Suggests the number of hash functions for a given number of items and bits.
    ///
    /// Formula: `k = min(floor((m/n) * ln(2) + 0.5), 6)`, and at least 1.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlab::bloom::BloomFilterBuilder;
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes(1300, 5134), 3);
    /// // The optimum of ~6.9 is capped.
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes(1000, 10000), 6);
    /// ```
    pub fn suggest_num_hashes(max_items: u64, num_bits: u64) -> u16 {
        let m = num_bits as f64;
        let n = max_items as f64;

        let k = (m / n * std::f64::consts::LN_2 + 0.5).floor();

        (k.min(MAX_NUM_HASHES as f64) as u16).max(1)
    }

    /// Validates builder parameters.
    fn validate_params(num_bits: u64, num_hashes: u16) -> Result<(), Error> {
        if num_bits == 0 || num_bits > MAX_NUM_BITS {
            return Err(Error::invalid_parameter(
                "num_bits",
                num_bits,
                "between 1 and MAX_NUM_BITS",
            ));
        }
        if num_hashes == 0 || num_hashes > MAX_NUM_HASHES {
            return Err(Error::invalid_parameter(
                "num_hashes",
                num_hashes,
                "between 1 and 6",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
