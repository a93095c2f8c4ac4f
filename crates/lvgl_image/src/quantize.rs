//! Per-channel bit depth reduction.

use crate::format::TrueColorDepth;

/// Rounds an 8-bit channel to the nearest value representable with `bits` bits.
///
/// The step size is `2^(8 - bits)`; ties round up and the result saturates at 255.
/// `bits` outside `1..=8` is clamped into that range.
#[inline]
pub fn classify(value: u8, bits: u8) -> u8 {
    let bits = bits.clamp(1, 8);
    let quantum = 1u32 << (8 - bits);
    let rounded = (value as u32 + quantum / 2) / quantum * quantum;
    rounded.min(255) as u8
}

/// Quantizes an (r, g, b) triple with the channel depths of `depth`.
#[inline]
pub fn classify_rgb(depth: TrueColorDepth, r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rb, gb, bb) = depth.channel_bits();
    (classify(r, rb), classify(g, gb), classify(b, bb))
}
