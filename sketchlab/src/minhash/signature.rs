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

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::num::NonZeroUsize;
use std::path::Path;

use super::DEFAULT_SHINGLE_WIDTH;
use super::DEFAULT_SIGNATURE_SIZE;
use super::EMPTY_SLOT;
use super::Shingler;
use super::Stopwords;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::hash::DEFAULT_UPDATE_SEED;
use crate::hash::hash63;

/// Parameters for building [`MinHashSignature`]s.
///
/// Signatures are only comparable when they were built from the same
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinHashConfig {
    shingle_width: NonZeroUsize,
    signature_size: usize,
    stopwords: Stopwords,
    seed: u32,
}

impl Default for MinHashConfig {
    fn default() -> Self {
        MinHashConfig {
            shingle_width: NonZeroUsize::MIN.saturating_add(DEFAULT_SHINGLE_WIDTH - 1),
            signature_size: DEFAULT_SIGNATURE_SIZE,
            stopwords: Stopwords::new(),
            seed: DEFAULT_UPDATE_SEED,
        }
    }
}

impl MinHashConfig {
    /// Creates a configuration with `shingle_width` words per shingle and
    /// `signature_size` retained hash values, with no stopwords.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`] if either argument is 0.
    pub fn new(shingle_width: usize, signature_size: usize) -> Result<Self, Error> {
        let Some(shingle_width) = NonZeroUsize::new(shingle_width) else {
            return Err(Error::invalid_parameter(
                "shingle_width",
                shingle_width,
                "greater than 0",
            ));
        };
        if signature_size == 0 {
            return Err(Error::invalid_parameter(
                "signature_size",
                signature_size,
                "greater than 0",
            ));
        }
        Ok(MinHashConfig {
            shingle_width,
            signature_size,
            ..Default::default()
        })
    }

    /// Sets the words excluded from shingles.
    pub fn stopwords(mut self, stopwords: Stopwords) -> Self {
        self.stopwords = stopwords;
        self
    }

    /// Sets the shingle hash seed (default: 9001).
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the number of words per shingle (n).
    pub fn shingle_width(&self) -> usize {
        self.shingle_width.get()
    }

    /// Returns the number of hash values kept per signature (k).
    pub fn signature_size(&self) -> usize {
        self.signature_size
    }

    /// Returns the words excluded from shingles.
    pub fn stopword_set(&self) -> &Stopwords {
        &self.stopwords
    }

    /// Returns the shingle hash seed.
    pub fn hash_seed(&self) -> u32 {
        self.seed
    }
}

/// The `k` smallest distinct shingle hashes of a document.
///
/// A signature is extracted in full when it is constructed and is read-only
/// afterwards. Slots that never received a hash hold [`EMPTY_SLOT`]; this
/// happens when the document has fewer than `k` distinct shingles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinHashSignature {
    shingle_width: usize,
    seed: u32,
    slots: Vec<u64>,
    num_shingles: u64,
}

impl MinHashSignature {
    /// Builds the signature of the text file at `path`.
    ///
    /// The file is streamed line by line and split on whitespace; shingles
    /// run across line breaks.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::SourceUnavailable`] if the file cannot be opened
    /// or read (including invalid UTF-8). No partial signature is produced.
    pub fn from_path(path: impl AsRef<Path>, config: &MinHashConfig) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| Error::source_unavailable(path, err))?;
        let signature = Self::extract(BufReader::new(file), config)
            .map_err(|err| Error::source_unavailable(path, err))?;

        tracing::debug!(
            path = %path.display(),
            num_shingles = signature.num_shingles,
            num_filled = signature.num_filled(),
            "extracted minhash signature"
        );
        Ok(signature)
    }

    /// Builds the signature of everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::SourceUnavailable`] if reading fails.
    pub fn from_reader<R: BufRead>(reader: R, config: &MinHashConfig) -> Result<Self, Error> {
        Self::extract(reader, config).map_err(|err| {
            Error::new(ErrorKind::SourceUnavailable, "could not read document").set_source(err)
        })
    }

    /// Builds the signature of an in-memory text.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlab::minhash::MinHashConfig;
    /// # use sketchlab::minhash::MinHashSignature;
    /// let config = MinHashConfig::new(2, 4).unwrap();
    /// let signature = MinHashSignature::from_text("one two three", &config);
    ///
    /// assert_eq!(signature.num_filled(), 2);
    /// assert!(!signature.is_saturated());
    /// ```
    pub fn from_text(text: &str, config: &MinHashConfig) -> Self {
        let mut extractor = Extractor::new(config);
        for line in text.lines() {
            extractor.feed_line(line);
        }
        extractor.finish()
    }

    fn extract<R: BufRead>(reader: R, config: &MinHashConfig) -> io::Result<Self> {
        let mut extractor = Extractor::new(config);
        for line in reader.lines() {
            extractor.feed_line(&line?);
        }
        Ok(extractor.finish())
    }

    /// Returns k, the number of slots.
    pub fn signature_size(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of words per shingle it was built with.
    pub fn shingle_width(&self) -> usize {
        self.shingle_width
    }

    /// Returns the shingle hash seed it was built with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Returns the raw slots, [`EMPTY_SLOT`] included, in slot order.
    pub fn slots(&self) -> &[u64] {
        &self.slots
    }

    /// Returns the hash values held, in slot order.
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.slots.iter().copied().filter(|&v| v != EMPTY_SLOT)
    }

    /// Returns the number of slots holding a hash value.
    pub fn num_filled(&self) -> usize {
        self.values().count()
    }

    /// Returns true if every slot holds a hash value.
    pub fn is_saturated(&self) -> bool {
        self.num_filled() == self.signature_size()
    }

    /// Returns true if the document produced no shingles.
    pub fn is_empty(&self) -> bool {
        self.num_filled() == 0
    }

    /// Returns the number of shingles streamed, duplicates included.
    pub fn num_shingles(&self) -> u64 {
        self.num_shingles
    }

    /// Checks whether two signatures can be compared.
    ///
    /// Signatures are compatible if they have the same:
    /// - Number of slots
    /// - Shingle width
    /// - Seed
    pub fn is_compatible(&self, other: &MinHashSignature) -> bool {
        self.signature_size() == other.signature_size()
            && self.shingle_width == other.shingle_width
            && self.seed == other.seed
    }
}

/// Drives shingle formation and the signature update for one document.
struct Extractor<'a> {
    shingler: Shingler<'a>,
    seed: u32,
    slots: Vec<u64>,
    num_shingles: u64,
}

impl<'a> Extractor<'a> {
    fn new(config: &'a MinHashConfig) -> Self {
        Self {
            shingler: Shingler::with_width(config.shingle_width, &config.stopwords),
            seed: config.seed,
            slots: vec![EMPTY_SLOT; config.signature_size],
            num_shingles: 0,
        }
    }

    fn feed_line(&mut self, line: &str) {
        for word in line.split_whitespace() {
            if let Some(shingle) = self.shingler.push(word) {
                self.update(&shingle);
            }
        }
    }

    /// Replaces the largest slot with the shingle's hash if the hash is
    /// smaller and not already held.
    fn update(&mut self, shingle: &str) {
        self.num_shingles += 1;
        let hash = hash63(shingle, self.seed);

        let (max_index, max_value) = max_slot(&self.slots);
        if hash < max_value && !self.slots.contains(&hash) {
            tracing::trace!(shingle, hash, slot = max_index, "signature slot replaced");
            self.slots[max_index] = hash;
        }
    }

    fn finish(self) -> MinHashSignature {
        MinHashSignature {
            shingle_width: self.shingler.width(),
            seed: self.seed,
            slots: self.slots,
            num_shingles: self.num_shingles,
        }
    }
}

/// Returns the first slot holding the largest value.
fn max_slot(slots: &[u64]) -> (usize, u64) {
    let mut max = (0, slots[0]);
    for (index, &value) in slots.iter().enumerate().skip(1) {
        if value > max.1 {
            max = (index, value);
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn config(width: usize, size: usize) -> MinHashConfig {
        MinHashConfig::new(width, size).unwrap()
    }

    #[test]
    fn test_config_validation() {
        let err = MinHashConfig::new(0, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.context_value("parameter"), Some("shingle_width"));

        let err = MinHashConfig::new(2, 0).unwrap_err();
        assert_eq!(err.context_value("parameter"), Some("signature_size"));
    }

    #[test]
    fn test_default_config() {
        let config = MinHashConfig::default();
        assert_eq!(config.shingle_width(), DEFAULT_SHINGLE_WIDTH);
        assert_eq!(config.signature_size(), DEFAULT_SIGNATURE_SIZE);
        assert!(config.stopword_set().is_empty());
        assert_eq!(config.hash_seed(), DEFAULT_UPDATE_SEED);

        let signature = MinHashSignature::from_text("up the hill", &config);
        assert_eq!(signature.shingle_width(), 2);
        assert_eq!(signature.num_shingles(), 2);
        assert_eq!(signature.num_filled(), 2);
    }

    #[test]
    fn test_empty_text() {
        let signature = MinHashSignature::from_text("", &config(2, 5));
        assert!(signature.is_empty());
        assert_eq!(signature.slots(), &[EMPTY_SLOT; 5]);
        assert_eq!(signature.num_shingles(), 0);
    }

    #[test]
    fn test_fewer_words_than_width() {
        let signature = MinHashSignature::from_text("lonely", &config(2, 5));
        assert!(signature.is_empty());
    }

    #[test]
    fn test_duplicate_shingles_stored_once() {
        let signature = MinHashSignature::from_text("a b a b a b a b", &config(2, 5));
        // "a b" and "b a" only.
        assert_eq!(signature.num_filled(), 2);
        assert_eq!(signature.num_shingles(), 7);
    }

    #[test]
    fn test_repeated_shingle_leaves_signature_unchanged() {
        let config = config(2, 3);
        let mut extractor = Extractor::new(&config);
        extractor.feed_line("red green blue");
        let snapshot = extractor.slots.clone();
        extractor.update("red green");
        assert_eq!(extractor.slots, snapshot);

        // "blue red" is new, the trailing "red green" is not.
        let signature = MinHashSignature::from_text("red green blue red green", &config);
        assert_eq!(signature.num_filled(), 3);
    }

    #[test]
    fn test_keeps_k_smallest() {
        let config = config(1, 4);
        let words: Vec<String> = (0..50).map(|i| format!("w{i}")).collect();
        let signature = MinHashSignature::from_text(&words.join(" "), &config);

        let mut expected: Vec<u64> = words
            .iter()
            .map(|w| hash63(w.as_str(), DEFAULT_UPDATE_SEED))
            .collect();
        expected.sort_unstable();
        expected.truncate(4);

        let mut actual: Vec<u64> = signature.values().collect();
        actual.sort_unstable();
        assert_eq!(actual, expected);
        assert!(signature.is_saturated());
    }

    #[test]
    fn test_lines_join_into_one_stream() {
        let config = config(2, 8);
        let one_line = MinHashSignature::from_text("alpha beta gamma delta", &config);
        let two_lines = MinHashSignature::from_text("alpha beta\ngamma delta", &config);
        assert_eq!(one_line, two_lines);
    }

    #[test]
    fn test_from_reader_matches_from_text() {
        let config = config(2, 8);
        let text = "the quick brown fox\njumps over the lazy dog";
        let from_reader = MinHashSignature::from_reader(Cursor::new(text), &config).unwrap();
        assert_eq!(from_reader, MinHashSignature::from_text(text, &config));
    }

    #[test]
    fn test_from_reader_invalid_utf8() {
        let bytes: &[u8] = &[0x66, 0x6f, 0xff, 0xfe];
        let err = MinHashSignature::from_reader(bytes, &config(2, 4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
    }

    #[test]
    fn test_max_slot_picks_first() {
        assert_eq!(max_slot(&[3, 9, 9, 1]), (1, 9));
        assert_eq!(max_slot(&[EMPTY_SLOT, EMPTY_SLOT]), (0, EMPTY_SLOT));
    }

    #[test]
    fn test_seed_changes_signature() {
        let text = "seeds pick different hash functions";
        let a = MinHashSignature::from_text(text, &config(2, 4));
        let b = MinHashSignature::from_text(text, &config(2, 4).seed(7));
        assert_ne!(a.slots(), b.slots());
        assert!(!a.is_compatible(&b));
    }
}
