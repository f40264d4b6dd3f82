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

//! Word normalization, stopword filtering and shingle formation.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use crate::error::Error;

/// Common words excluded from shingles in the classroom exercise.
const CLASSROOM_STOPWORDS: [&str; 16] = [
    "I", "to", "with", "the", "for", "of", "be", "who", "are", "is", "in", "on", "an", "a", "and",
    "as",
];

/// Strips ASCII punctuation from a word and lowercases it.
///
/// # Examples
///
/// ```
/// # use sketchlab::minhash::normalize_token;
/// assert_eq!(normalize_token("Hill,"), "hill");
/// assert_eq!(normalize_token("don't"), "dont");
/// assert_eq!(normalize_token("--"), "");
/// ```
pub fn normalize_token(word: &str) -> String {
    word.chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .to_lowercase()
}

/// A set of words excluded from shingles.
///
/// Words are normalized on the way in, so `"I"` excludes the token `"i"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// Creates an empty stopword set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The common-word list used by the classroom exercise:
    /// `I, to, with, the, for, of, be, who, are, is, in, on, an, a, and, as`.
    pub fn classroom() -> Self {
        CLASSROOM_STOPWORDS.into_iter().collect()
    }

    /// Adds a word to the set.
    pub fn insert(&mut self, word: &str) {
        let word = normalize_token(word);
        if !word.is_empty() {
            self.words.insert(word);
        }
    }

    /// Returns true if the normalized token is a stopword.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Returns the number of distinct stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if no word is excluded.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Stopwords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut stopwords = Stopwords::new();
        for word in iter {
            stopwords.insert(word.as_ref());
        }
        stopwords
    }
}

/// Turns a stream of words into a stream of shingles.
///
/// Accepted words go into a circular buffer of `width` slots. Once the buffer
/// has been filled, every accepted word completes a shingle, read from the
/// oldest slot to the newest and joined by single spaces.
///
/// # Examples
///
/// ```
/// # use sketchlab::minhash::Shingler;
/// # use sketchlab::minhash::Stopwords;
/// let stopwords = Stopwords::classroom();
/// let mut shingler = Shingler::new(2, &stopwords).unwrap();
///
/// assert_eq!(shingler.push("Jack"), None);
/// assert_eq!(shingler.push("and"), None); // stopword
/// assert_eq!(shingler.push("Jill"), Some("jack jill".to_string()));
/// assert_eq!(shingler.push("went"), Some("jill went".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct Shingler<'a> {
    stopwords: &'a Stopwords,
    buffer: Vec<String>,
    // Slot the next accepted word is written to.
    pointer: usize,
    full: bool,
}

impl<'a> Shingler<'a> {
    /// Creates a shingler for shingles of `width` words.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `width` is 0.
    pub fn new(width: usize, stopwords: &'a Stopwords) -> Result<Self, Error> {
        let width = NonZeroUsize::new(width).ok_or_else(|| {
            Error::invalid_parameter("shingle_width", width, "greater than 0")
        })?;
        Ok(Self::with_width(width, stopwords))
    }

    pub(crate) fn with_width(width: NonZeroUsize, stopwords: &'a Stopwords) -> Self {
        Self {
            stopwords,
            buffer: vec![String::new(); width.get()],
            pointer: 0,
            full: false,
        }
    }

    /// Returns the number of words per shingle.
    pub fn width(&self) -> usize {
        self.buffer.len()
    }

    /// Feeds one raw word, returning the shingle it completes, if any.
    ///
    /// Words that normalize to nothing, and stopwords, are skipped without
    /// touching the buffer.
    pub fn push(&mut self, word: &str) -> Option<String> {
        let token = normalize_token(word);
        if token.is_empty() || self.stopwords.contains(&token) {
            return None;
        }

        let width = self.buffer.len();
        self.buffer[self.pointer] = token;
        if self.pointer == width - 1 {
            self.full = true;
        }
        self.pointer = (self.pointer + 1) % width;

        self.full.then(|| self.current_shingle())
    }

    /// Joins the buffer starting at the oldest slot, which is the one the
    /// next word will overwrite.
    fn current_shingle(&self) -> String {
        let (newer, older) = self.buffer.split_at(self.pointer);
        older
            .iter()
            .chain(newer)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Collects the distinct shingles of a text.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
/// if `width` is 0.
///
/// # Examples
///
/// ```
/// # use sketchlab::minhash::Stopwords;
/// # use sketchlab::minhash::shingle_set;
/// let shingles = shingle_set("a rose is a rose", 2, &Stopwords::new()).unwrap();
/// assert_eq!(shingles.len(), 3); // "a rose", "rose is", "is a"
/// ```
pub fn shingle_set(
    text: &str,
    width: usize,
    stopwords: &Stopwords,
) -> Result<HashSet<String>, Error> {
    let mut shingler = Shingler::new(width, stopwords)?;
    Ok(text
        .split_whitespace()
        .filter_map(|word| shingler.push(word))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("Water."), "water");
        assert_eq!(normalize_token("\"Quoted\""), "quoted");
        assert_eq!(normalize_token("e-mail"), "email");
        assert_eq!(normalize_token("ÉCOLE"), "école");
        assert_eq!(normalize_token("..."), "");
    }

    #[test]
    fn test_classroom_stopwords() {
        let stopwords = Stopwords::classroom();
        assert_eq!(stopwords.len(), 16);
        assert!(stopwords.contains("i"));
        assert!(stopwords.contains("the"));
        assert!(!stopwords.contains("I"));
        assert!(!stopwords.contains("jack"));
    }

    #[test]
    fn test_zero_width_rejected() {
        let stopwords = Stopwords::new();
        assert!(Shingler::new(0, &stopwords).is_err());
    }

    #[test]
    fn test_with_width_matches_new() {
        let stopwords = Stopwords::classroom();
        let checked = Shingler::new(3, &stopwords).unwrap();
        let unchecked = Shingler::with_width(NonZeroUsize::MIN.saturating_add(2), &stopwords);
        assert_eq!(checked.width(), 3);
        assert_eq!(unchecked.width(), 3);
    }

    #[test]
    fn test_width_one() {
        let stopwords = Stopwords::new();
        let mut shingler = Shingler::new(1, &stopwords).unwrap();
        assert_eq!(shingler.push("One"), Some("one".to_string()));
        assert_eq!(shingler.push("two"), Some("two".to_string()));
    }

    #[test]
    fn test_wraparound_keeps_reading_order() {
        let stopwords = Stopwords::new();
        let mut shingler = Shingler::new(3, &stopwords).unwrap();
        let shingles: Vec<_> = "one two three four five"
            .split_whitespace()
            .filter_map(|w| shingler.push(w))
            .collect();
        assert_eq!(
            shingles,
            vec!["one two three", "two three four", "three four five"]
        );
    }

    #[test]
    fn test_empty_tokens_skipped() {
        let stopwords = Stopwords::new();
        let mut shingler = Shingler::new(2, &stopwords).unwrap();
        assert_eq!(shingler.push("up"), None);
        assert_eq!(shingler.push("--"), None);
        assert_eq!(shingler.push("hill"), Some("up hill".to_string()));
    }

    #[test]
    fn test_jack_and_jill_shingles() {
        let stopwords = Stopwords::classroom();
        let shingles = shingle_set(
            "Jack and Jill went up the hill to fetch a pail of water",
            2,
            &stopwords,
        )
        .unwrap();

        let expected: HashSet<String> = [
            "jack jill",
            "jill went",
            "went up",
            "up hill",
            "hill fetch",
            "fetch pail",
            "pail water",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(shingles, expected);
    }
}
