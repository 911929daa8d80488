//! Character vocabulary shared by training and inference.

use std::collections::HashMap;

/// Index for characters outside the vocabulary, also used as padding.
pub const UNKNOWN_INDEX: u32 = 0;

/// Maps characters to positive indices, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    index: HashMap<char, u32>,
}

impl Vocabulary {
    /// Builds a vocabulary from training passwords. The first distinct
    /// character seen gets index 1.
    pub fn from_passwords<I, S>(passwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = HashMap::new();
        for password in passwords {
            for c in password.as_ref().chars() {
                let next = index.len() as u32 + 1;
                index.entry(c).or_insert(next);
            }
        }
        Self { index }
    }

    /// Index of `c`, or [`UNKNOWN_INDEX`].
    pub fn get(&self, c: char) -> u32 {
        self.index.get(&c).copied().unwrap_or(UNKNOWN_INDEX)
    }

    /// Number of known characters. Indices run from 1 to `len()`.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Encodes `password` as exactly `max_length` indices: longer input is
    /// truncated, shorter input is right-padded with [`UNKNOWN_INDEX`].
    pub fn encode(&self, password: &str, max_length: usize) -> Vec<u32> {
        let mut sequence: Vec<u32> = password
            .chars()
            .take(max_length)
            .map(|c| self.get(c))
            .collect();
        sequence.resize(max_length, UNKNOWN_INDEX);
        sequence
    }
}
