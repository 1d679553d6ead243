//! Keyed per-character shift over the printable alphabet

use crate::cipher::alphabet::{index_of, ALPHABET, ALPHABET_LEN};
use crate::cipher::hash::hash32;
use crate::cipher::prng::Lcg;

/// Undo the shift layer.
///
/// Each alphabet member consumes one draw and is shifted back by it;
/// non-members pass through without consuming a draw.
pub fn decode(text: &[u8], layer_key: &str) -> Vec<u8> {
    apply(text, layer_key, |position, draw| {
        (position + ALPHABET_LEN - draw) % ALPHABET_LEN
    })
}

/// Inverse of [`decode`]
pub fn encode(text: &[u8], layer_key: &str) -> Vec<u8> {
    apply(text, layer_key, |position, draw| (position + draw) % ALPHABET_LEN)
}

fn apply(text: &[u8], layer_key: &str, shift: impl Fn(usize, usize) -> usize) -> Vec<u8> {
    let mut rng = Lcg::new(hash32(layer_key));
    text.iter()
        .map(|&byte| match index_of(byte) {
            Some(position) => ALPHABET[shift(position, rng.next(ALPHABET_LEN))],
            None => byte,
        })
        .collect()
}
