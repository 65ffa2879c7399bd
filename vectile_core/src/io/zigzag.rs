//! ZigZag mapping between signed and unsigned 32-bit integers, as used by MVT geometry deltas.
//!
//! `0 → 0`, `-1 → 1`, `1 → 2`, `-2 → 3`, …

#[must_use]
pub fn encode_zigzag(value: i32) -> u32 {
	((value << 1) ^ (value >> 31)) as u32
}

#[must_use]
pub fn decode_zigzag(value: u32) -> i32 {
	((value >> 1) as i32) ^ -((value & 1) as i32)
}
