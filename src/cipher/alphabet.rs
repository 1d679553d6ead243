//! The 95 printable ASCII characters shared by the shift and substitution layers

/// Number of characters in [`ALPHABET`]
pub const ALPHABET_LEN: usize = 95;

const FIRST: u8 = 0x20;
const LAST: u8 = 0x7E;

/// Code points 0x20..=0x7E in ascending order
pub const ALPHABET: [u8; ALPHABET_LEN] = build_alphabet();

const fn build_alphabet() -> [u8; ALPHABET_LEN] {
    let mut alphabet = [0u8; ALPHABET_LEN];
    let mut i = 0;
    while i < ALPHABET_LEN {
        alphabet[i] = FIRST + i as u8;
        i += 1;
    }
    alphabet
}

/// Position of `byte` in [`ALPHABET`], or `None` for non-members
#[inline]
pub fn index_of(byte: u8) -> Option<usize> {
    if (FIRST..=LAST).contains(&byte) {
        Some((byte - FIRST) as usize)
    } else {
        None
    }
}
