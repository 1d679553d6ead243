//! Alphabet substitution through a keyed Fisher-Yates shuffle

use crate::cipher::alphabet::{index_of, ALPHABET, ALPHABET_LEN};
use crate::cipher::hash::hash32;
use crate::cipher::prng::Lcg;

/// Shuffle a copy of the alphabet, drawing `j = next(i + 1)` for `i` from 94 down to 1
pub fn shuffled_alphabet(layer_key: &str) -> [u8; ALPHABET_LEN] {
    let mut rng = Lcg::new(hash32(layer_key));
    let mut shuffled = ALPHABET;
    for i in (1..ALPHABET_LEN).rev() {
        let j = rng.next(i + 1);
        shuffled.swap(i, j);
    }
    shuffled
}

/// Undo the substitution layer, mapping `shuffled[i]` back to `ALPHABET[i]`
pub fn decode(text: &[u8], layer_key: &str) -> Vec<u8> {
    let shuffled = shuffled_alphabet(layer_key);
    let mut map = [0u8; ALPHABET_LEN];
    for (i, &byte) in shuffled.iter().enumerate() {
        if let Some(position) = index_of(byte) {
            map[position] = ALPHABET[i];
        }
    }
    substitute(text, &map)
}

/// Inverse of [`decode`], mapping `ALPHABET[i]` to `shuffled[i]`
pub fn encode(text: &[u8], layer_key: &str) -> Vec<u8> {
    substitute(text, &shuffled_alphabet(layer_key))
}

fn substitute(text: &[u8], map: &[u8; ALPHABET_LEN]) -> Vec<u8> {
    text.iter()
        .map(|&byte| index_of(byte).map_or(byte, |position| map[position]))
        .collect()
}
