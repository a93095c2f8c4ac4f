//! Palette extraction for indexed formats.

use crate::format::{BitDepth, ColorFormat};
use crate::{LvglError, Result};

/// A palette entry. Palettes carry no alpha; it is written as 0xFF.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PaletteColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PaletteColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Luma scaled by 1000 (`299 R + 587 G + 114 B`), exact in integers.
    #[inline]
    pub fn luma(&self) -> u32 {
        299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32
    }

    /// Palette footprint of this entry in the output buffer.
    #[inline]
    pub fn to_bgra(self) -> [u8; 4] {
        [self.b, self.g, self.r, 0xFF]
    }

    #[inline]
    fn distance_sq(&self, r: u8, g: u8, b: u8) -> u32 {
        let dr = self.r as i32 - r as i32;
        let dg = self.g as i32 - g as i32;
        let db = self.b as i32 - b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

/// Derives the palette of an indexed format from every pixel of `rgba`.
///
/// Only 1-bit palettes exist: index 0 is the darkest color of the image and
/// index 1 the lightest, by luma. On ties the first pixel in row-major order
/// wins. Alpha is ignored.
pub fn build_palette(format: ColorFormat, rgba: &[u8]) -> Result<Vec<PaletteColor>> {
    match format {
        ColorFormat::Indexed(BitDepth::One) => Ok(darkest_and_lightest(rgba).to_vec()),
        other => Err(LvglError::UnsupportedFormat(other)),
    }
}

fn darkest_and_lightest(rgba: &[u8]) -> [PaletteColor; 2] {
    let mut pixels = rgba
        .chunks_exact(4)
        .map(|c| PaletteColor::new(c[0], c[1], c[2]));

    let Some(first) = pixels.next() else {
        return [PaletteColor::default(); 2];
    };
    let (mut darkest, mut lightest) = (first, first);
    let (mut min_luma, mut max_luma) = (first.luma(), first.luma());

    for color in pixels {
        let luma = color.luma();
        if luma < min_luma {
            min_luma = luma;
            darkest = color;
        }
        if luma > max_luma {
            max_luma = luma;
            lightest = color;
        }
    }

    tracing::trace!(?darkest, ?lightest, "extracted 1-bit palette");
    [darkest, lightest]
}

/// Index of the palette entry closest to (r, g, b) by Euclidean RGB distance.
///
/// Equal distances resolve to the lower index.
pub fn nearest_index(palette: &[PaletteColor], r: u8, g: u8, b: u8) -> usize {
    let mut best = 0;
    let mut best_distance = u32::MAX;
    for (i, color) in palette.iter().enumerate() {
        let distance = color.distance_sq(r, g, b);
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best
}
