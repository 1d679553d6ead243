//! Keyed multi-layer cipher used by embed players to obfuscate source lists

pub mod alphabet;
pub mod decoder;
pub mod hash;
pub mod key;
pub mod prng;
pub mod shift;
pub mod substitution;
pub mod transposition;

pub use alphabet::{ALPHABET, ALPHABET_LEN};
pub use decoder::{decode, decode_with_master_key, encode, LAYER_COUNT};
pub use hash::{hash32, unbounded_hash};
pub use key::{derive_master_key, MasterKey};
pub use prng::Lcg;
