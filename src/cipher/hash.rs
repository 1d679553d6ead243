//! Polynomial string hashes that seed key derivation and the per-layer generators
//!
//! The two variants must stay separate: [`unbounded_hash`] models a
//! big-integer accumulator reduced once at the end, [`hash32`] wraps to
//! 32 bits after every character.

const UNBOUNDED_MULTIPLIER: u128 = 158;
const LAYER_MULTIPLIER: u32 = 31;

/// Modulus applied to the unbounded hash, `2^63 - 1`
pub const HASH_MODULUS: u64 = i64::MAX as u64;

/// Unbounded polynomial hash `h = h * 158 + code(c)`, reduced modulo `2^63 - 1`.
///
/// The accumulator is reduced after every step. Only multiplication and
/// addition are involved, so this equals the exact arbitrary-precision value
/// taken modulo [`HASH_MODULUS`]. The value is never negative, so the absolute
/// value step of the reduction is a no-op.
pub fn unbounded_hash(input: &str) -> u64 {
    let modulus = u128::from(HASH_MODULUS);
    let reduced = input.chars().fold(0u128, |hash, c| {
        (hash * UNBOUNDED_MULTIPLIER + u128::from(u32::from(c))) % modulus
    });
    // reduced < 2^63
    reduced as u64
}

/// 32-bit polynomial hash `h = (h * 31 + code(c)) & 0xFFFFFFFF`
pub fn hash32(input: &str) -> u32 {
    input.chars().fold(0u32, |hash, c| {
        hash.wrapping_mul(LAYER_MULTIPLIER).wrapping_add(u32::from(c))
    })
}
