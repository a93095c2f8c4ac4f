//! Byte and bit layouts of single pixels in the LVGL color formats.

use crate::format::TrueColorDepth;
use crate::palette::PaletteColor;

/// Packs a quantized color into one 3-3-2 byte.
#[inline]
pub fn pack_332(r: u8, g: u8, b: u8) -> u8 {
    (r & 0xE0) | ((g & 0xE0) >> 3) | (b >> 6)
}

/// Packs a quantized color into a 5-6-5 word.
#[inline]
pub fn pack_565(r: u8, g: u8, b: u8) -> u16 {
    (((r & 0xF8) as u16) << 8) | (((g & 0xFC) as u16) << 3) | ((b >> 3) as u16)
}

/// Appends one true-color pixel to `out`.
///
/// `alpha` is only written when `with_alpha` is set, except for 8-8-8 whose
/// fourth byte is always present (0xFF without alpha).
#[inline]
pub fn push_true_color(
    out: &mut Vec<u8>,
    depth: TrueColorDepth,
    (r, g, b): (u8, u8, u8),
    alpha: u8,
    with_alpha: bool,
) {
    let alpha = if with_alpha { alpha } else { 0xFF };
    match depth {
        TrueColorDepth::Rgb332 => out.push(pack_332(r, g, b)),
        TrueColorDepth::Rgb565 => out.extend_from_slice(&pack_565(r, g, b).to_le_bytes()),
        TrueColorDepth::Rgb565Swap => out.extend_from_slice(&pack_565(r, g, b).to_be_bytes()),
        TrueColorDepth::Rgb888 => {
            out.extend_from_slice(&[b, g, r, alpha]);
            return;
        }
    }
    if with_alpha {
        out.push(alpha);
    }
}

/// Appends the BGRA palette footprint.
pub fn push_palette(out: &mut Vec<u8>, palette: &[PaletteColor]) {
    for color in palette {
        out.extend_from_slice(&color.to_bgra());
    }
}

/// Sets the bit of a 1-bit index at column `x` of the row starting at `row`.
///
/// Pixels are packed eight per byte, most significant bit first.
#[inline]
pub fn set_index_1bit(row: &mut [u8], x: usize, index: usize) {
    if index & 1 != 0 {
        row[x / 8] |= 0x80 >> (x % 8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(depth: TrueColorDepth, rgb: (u8, u8, u8), alpha: u8, with_alpha: bool) -> Vec<u8> {
        let mut out = Vec::new();
        push_true_color(&mut out, depth, rgb, alpha, with_alpha);
        out
    }

    #[test]
    fn test_332() {
        assert_eq!(pack_332(255, 255, 255), 0xFF);
        assert_eq!(pack_332(255, 0, 0), 0xE0);
        assert_eq!(pack_332(0, 255, 0), 0x1C);
        assert_eq!(pack_332(0, 0, 255), 0x03);
        assert_eq!(encode(TrueColorDepth::Rgb332, (255, 0, 0), 0x80, true), vec![0xE0, 0x80]);
    }

    #[test]
    fn test_565_byte_order() {
        assert_eq!(pack_565(255, 0, 0), 0xF800);
        assert_eq!(pack_565(0, 255, 0), 0x07E0);
        assert_eq!(pack_565(0, 0, 255), 0x001F);
        assert_eq!(encode(TrueColorDepth::Rgb565, (255, 0, 0), 255, false), vec![0x00, 0xF8]);
        assert_eq!(encode(TrueColorDepth::Rgb565Swap, (255, 0, 0), 255, false), vec![0xF8, 0x00]);
        assert_eq!(
            encode(TrueColorDepth::Rgb565, (255, 0, 0), 255, true),
            vec![0x00, 0xF8, 0xFF]
        );
    }

    #[test]
    fn test_888_order() {
        assert_eq!(encode(TrueColorDepth::Rgb888, (10, 20, 30), 255, false), vec![30, 20, 10, 255]);
        assert_eq!(encode(TrueColorDepth::Rgb888, (10, 20, 30), 7, false), vec![30, 20, 10, 255]);
        assert_eq!(encode(TrueColorDepth::Rgb888, (10, 20, 30), 7, true), vec![30, 20, 10, 7]);
    }

    #[test]
    fn test_index_bits_msb_first() {
        let mut row = [0u8; 2];
        for x in 0..9 {
            set_index_1bit(&mut row, x, if x % 2 == 0 { 1 } else { 0 });
        }
        assert_eq!(row, [0b1010_1010, 0b1000_0000]);
    }
}
