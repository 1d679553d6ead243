//! MasterKey derivation from the per-page client key and the server key

use crate::cipher::alphabet::ALPHABET_LEN;
use crate::cipher::hash::unbounded_hash;
use std::fmt;

const XOR_MASK: u32 = 247;
const PIVOT_OFFSET: usize = 5;
const MIN_KEY_LEN: usize = 96;
const KEY_LEN_SPREAD: u64 = 33;

/// Key shared by all three layers of one decode.
///
/// A pure function of the (client key, server key) pair, so callers may
/// cache it per pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MasterKey(String);

impl MasterKey {
    /// Wrap an already derived key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key for one layer: the master key followed by the iteration digit
    pub fn layer_key(&self, iteration: u8) -> String {
        format!("{}{}", self.0, iteration)
    }
}

impl fmt::Display for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the master key.
///
/// The result is `96 + (hash mod 33)` characters long when the keys are long
/// enough to fill it, and shorter otherwise. Every character lies in the
/// printable alphabet.
pub fn derive_master_key(client_key: &str, server_key: &str) -> MasterKey {
    let combined = format!("{}{}", server_key, client_key);
    let hash = unbounded_hash(&combined);

    let mut xored: Vec<u32> = combined.chars().map(|c| u32::from(c) ^ XOR_MASK).collect();
    if !xored.is_empty() {
        let pivot = (hash % xored.len() as u64) as usize + PIVOT_OFFSET;
        let len = xored.len();
        xored.rotate_left(pivot % len);
    }

    let leaf: Vec<u32> = client_key.chars().rev().map(u32::from).collect();

    let mut interleaved = Vec::with_capacity(xored.len() + leaf.len());
    for i in 0..xored.len().max(leaf.len()) {
        if let Some(&code) = xored.get(i) {
            interleaved.push(code);
        }
        if let Some(&code) = leaf.get(i) {
            interleaved.push(code);
        }
    }
    interleaved.truncate(MIN_KEY_LEN + (hash % KEY_LEN_SPREAD) as usize);

    MasterKey(interleaved.into_iter().map(normalize).collect())
}

/// Fold any code point into the 95-character printable range
fn normalize(code: u32) -> char {
    char::from((code % ALPHABET_LEN as u32) as u8 + 32)
}
