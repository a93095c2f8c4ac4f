//! Color formats understood by LVGL and their numeric header codes.

use crate::{LvglError, Result};
use std::fmt;
use std::str::FromStr;

/// Pixel layout of a true-color format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrueColorDepth {
    /// 3 bits red, 3 bits green, 2 bits blue in one byte.
    Rgb332,
    /// 5-6-5 packed into a little-endian `u16`.
    Rgb565,
    /// 5-6-5 packed into a big-endian `u16` (`LV_COLOR_16_SWAP`).
    Rgb565Swap,
    /// Four bytes: blue, green, red, alpha.
    Rgb888,
}

impl TrueColorDepth {
    /// Every depth, in the order LVGL sources list them.
    pub const ALL: [TrueColorDepth; 4] = [
        TrueColorDepth::Rgb332,
        TrueColorDepth::Rgb565,
        TrueColorDepth::Rgb565Swap,
        TrueColorDepth::Rgb888,
    ];

    /// Bits kept per (red, green, blue) channel.
    pub const fn channel_bits(self) -> (u8, u8, u8) {
        match self {
            TrueColorDepth::Rgb332 => (3, 3, 2),
            TrueColorDepth::Rgb565 | TrueColorDepth::Rgb565Swap => (5, 6, 5),
            TrueColorDepth::Rgb888 => (8, 8, 8),
        }
    }

    /// Bytes per pixel, not counting an optional trailing alpha byte.
    ///
    /// 8-8-8 always carries its alpha byte, so it reports 4.
    pub const fn color_bytes(self) -> usize {
        match self {
            TrueColorDepth::Rgb332 => 1,
            TrueColorDepth::Rgb565 | TrueColorDepth::Rgb565Swap => 2,
            TrueColorDepth::Rgb888 => 4,
        }
    }

    /// Bytes per pixel including the alpha byte when requested.
    pub const fn pixel_bytes(self, with_alpha: bool) -> usize {
        match self {
            TrueColorDepth::Rgb888 => 4,
            _ if with_alpha => self.color_bytes() + 1,
            _ => self.color_bytes(),
        }
    }

    /// Preprocessor condition selecting this depth in firmware builds.
    pub const fn lvgl_guard(self) -> &'static str {
        match self {
            TrueColorDepth::Rgb332 => "LV_COLOR_DEPTH == 1 || LV_COLOR_DEPTH == 8",
            TrueColorDepth::Rgb565 => "LV_COLOR_DEPTH == 16 && LV_COLOR_16_SWAP == 0",
            TrueColorDepth::Rgb565Swap => "LV_COLOR_DEPTH == 16 && LV_COLOR_16_SWAP != 0",
            TrueColorDepth::Rgb888 => "LV_COLOR_DEPTH == 32",
        }
    }

    /// Human readable pixel layout, used as a comment in C sources.
    pub const fn description(self) -> &'static str {
        match self {
            TrueColorDepth::Rgb332 => "Red: 3 bit, Green: 3 bit, Blue: 2 bit",
            TrueColorDepth::Rgb565 => "Red: 5 bit, Green: 6 bit, Blue: 5 bit",
            TrueColorDepth::Rgb565Swap => {
                "Red: 5 bit, Green: 6 bit, Blue: 5 bit BUT the 2 bytes are swapped"
            }
            TrueColorDepth::Rgb888 => "Blue: 8 bit, Green: 8 bit, Red: 8 bit, Fix 0xFF: 8 bit",
        }
    }
}

/// Bits per pixel of the indexed and alpha-only families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    One,
    Two,
    Four,
    Eight,
}

impl BitDepth {
    pub const fn bits(self) -> usize {
        match self {
            BitDepth::One => 1,
            BitDepth::Two => 2,
            BitDepth::Four => 4,
            BitDepth::Eight => 8,
        }
    }

    fn from_bits(bits: usize) -> Option<Self> {
        match bits {
            1 => Some(BitDepth::One),
            2 => Some(BitDepth::Two),
            4 => Some(BitDepth::Four),
            8 => Some(BitDepth::Eight),
            _ => None,
        }
    }

    /// Bytes needed for one row of `width` packed pixels.
    pub const fn row_bytes(self, width: usize) -> usize {
        (width * self.bits()).div_ceil(8)
    }
}

/// Flavour of raw passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKind {
    Plain,
    Alpha,
    ChromaKeyed,
}

/// Target color format of a conversion, grouped by capability family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    /// All three channels at reduced depth, no palette.
    TrueColor(TrueColorDepth),
    /// Opacity only. No encoder exists for this family.
    Alpha(BitDepth),
    /// Index into a palette of `2^bits` colors prepended to the pixel data.
    Indexed(BitDepth),
    /// Byte-identical copy of the RGBA8 input.
    Raw(RawKind),
}

impl ColorFormat {
    /// Number of palette entries prepended to the pixel data.
    pub const fn palette_size(self) -> usize {
        match self {
            ColorFormat::Indexed(depth) => 1 << depth.bits(),
            _ => 0,
        }
    }

    /// Tag written into the descriptor and the binary header.
    pub const fn display(self, with_alpha: bool) -> DisplayFormat {
        match self {
            ColorFormat::TrueColor(_) if with_alpha => DisplayFormat::TrueColorAlpha,
            ColorFormat::TrueColor(_) => DisplayFormat::TrueColor,
            ColorFormat::Alpha(depth) => DisplayFormat::Alpha(depth),
            ColorFormat::Indexed(depth) => DisplayFormat::Indexed(depth),
            ColorFormat::Raw(RawKind::Plain) => DisplayFormat::Raw,
            ColorFormat::Raw(RawKind::Alpha) => DisplayFormat::RawAlpha,
            ColorFormat::Raw(RawKind::ChromaKeyed) => DisplayFormat::RawChroma,
        }
    }

    /// Number of bytes a conversion of a `width`x`height` image emits.
    ///
    /// Computed from the format alone, so it also answers for formats the
    /// converter refuses to encode.
    pub const fn encoded_len(self, width: usize, height: usize, with_alpha: bool) -> usize {
        match self {
            ColorFormat::TrueColor(depth) => width * height * depth.pixel_bytes(with_alpha),
            ColorFormat::Alpha(depth) => depth.row_bytes(width) * height,
            ColorFormat::Indexed(depth) => {
                self.palette_size() * 4 + depth.row_bytes(width) * height
            }
            ColorFormat::Raw(_) => width * height * 4,
        }
    }

    /// Number of bytes in one row of emitted pixel data, used for line grouping.
    pub const fn row_stride(self, width: usize, with_alpha: bool) -> usize {
        match self {
            ColorFormat::TrueColor(depth) => width * depth.pixel_bytes(with_alpha),
            ColorFormat::Alpha(depth) | ColorFormat::Indexed(depth) => depth.row_bytes(width),
            ColorFormat::Raw(_) => width * 4,
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorFormat::TrueColor(TrueColorDepth::Rgb332) => f.write_str("true_color_332"),
            ColorFormat::TrueColor(TrueColorDepth::Rgb565) => f.write_str("true_color_565"),
            ColorFormat::TrueColor(TrueColorDepth::Rgb565Swap) => {
                f.write_str("true_color_565_swap")
            }
            ColorFormat::TrueColor(TrueColorDepth::Rgb888) => f.write_str("true_color_888"),
            ColorFormat::Alpha(depth) => write!(f, "alpha_{}", depth.bits()),
            ColorFormat::Indexed(depth) => write!(f, "indexed_{}", depth.bits()),
            ColorFormat::Raw(RawKind::Plain) => f.write_str("raw"),
            ColorFormat::Raw(RawKind::Alpha) => f.write_str("raw_alpha"),
            ColorFormat::Raw(RawKind::ChromaKeyed) => f.write_str("raw_chroma"),
        }
    }
}

impl FromStr for ColorFormat {
    type Err = LvglError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        let format = match name.as_str() {
            "true_color_332" => ColorFormat::TrueColor(TrueColorDepth::Rgb332),
            "true_color_565" => ColorFormat::TrueColor(TrueColorDepth::Rgb565),
            "true_color_565_swap" => ColorFormat::TrueColor(TrueColorDepth::Rgb565Swap),
            "true_color_888" => ColorFormat::TrueColor(TrueColorDepth::Rgb888),
            "raw" => ColorFormat::Raw(RawKind::Plain),
            "raw_alpha" => ColorFormat::Raw(RawKind::Alpha),
            "raw_chroma" => ColorFormat::Raw(RawKind::ChromaKeyed),
            other => {
                let parsed = if let Some(bits) = other.strip_prefix("indexed_") {
                    parse_depth(bits).map(ColorFormat::Indexed)
                } else if let Some(bits) = other.strip_prefix("alpha_") {
                    parse_depth(bits).map(ColorFormat::Alpha)
                } else {
                    None
                };
                return parsed.ok_or_else(|| LvglError::UnknownFormat(s.to_string()));
            }
        };
        Ok(format)
    }
}

fn parse_depth(bits: &str) -> Option<BitDepth> {
    bits.parse::<usize>().ok().and_then(BitDepth::from_bits)
}

/// Format tag as seen by the firmware: true-color depths are collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayFormat {
    Raw,
    RawAlpha,
    RawChroma,
    TrueColor,
    TrueColorAlpha,
    TrueColorChroma,
    Indexed(BitDepth),
    Alpha(BitDepth),
}

impl DisplayFormat {
    /// Numeric code stored in bits 0..=9 of the binary header.
    pub const fn code(self) -> u32 {
        match self {
            DisplayFormat::Raw => 0,
            DisplayFormat::RawAlpha => 1,
            DisplayFormat::RawChroma => 2,
            DisplayFormat::TrueColor => 4,
            DisplayFormat::TrueColorAlpha => 5,
            DisplayFormat::TrueColorChroma => 6,
            DisplayFormat::Indexed(BitDepth::One) => 7,
            DisplayFormat::Indexed(BitDepth::Two) => 8,
            DisplayFormat::Indexed(BitDepth::Four) => 9,
            DisplayFormat::Indexed(BitDepth::Eight) => 10,
            DisplayFormat::Alpha(BitDepth::One) => 11,
            DisplayFormat::Alpha(BitDepth::Two) => 12,
            DisplayFormat::Alpha(BitDepth::Four) => 13,
            DisplayFormat::Alpha(BitDepth::Eight) => 14,
        }
    }

    pub const fn from_code(code: u32) -> Option<Self> {
        let format = match code {
            0 => DisplayFormat::Raw,
            1 => DisplayFormat::RawAlpha,
            2 => DisplayFormat::RawChroma,
            4 => DisplayFormat::TrueColor,
            5 => DisplayFormat::TrueColorAlpha,
            6 => DisplayFormat::TrueColorChroma,
            7 => DisplayFormat::Indexed(BitDepth::One),
            8 => DisplayFormat::Indexed(BitDepth::Two),
            9 => DisplayFormat::Indexed(BitDepth::Four),
            10 => DisplayFormat::Indexed(BitDepth::Eight),
            11 => DisplayFormat::Alpha(BitDepth::One),
            12 => DisplayFormat::Alpha(BitDepth::Two),
            13 => DisplayFormat::Alpha(BitDepth::Four),
            14 => DisplayFormat::Alpha(BitDepth::Eight),
            _ => return None,
        };
        Some(format)
    }

    /// `lv_img_cf_t` constant name used in C descriptors.
    pub const fn lvgl_name(self) -> &'static str {
        match self {
            DisplayFormat::Raw => "LV_IMG_CF_RAW",
            DisplayFormat::RawAlpha => "LV_IMG_CF_RAW_ALPHA",
            DisplayFormat::RawChroma => "LV_IMG_CF_RAW_CHROMA_KEYED",
            DisplayFormat::TrueColor => "LV_IMG_CF_TRUE_COLOR",
            DisplayFormat::TrueColorAlpha => "LV_IMG_CF_TRUE_COLOR_ALPHA",
            DisplayFormat::TrueColorChroma => "LV_IMG_CF_TRUE_COLOR_CHROMA_KEYED",
            DisplayFormat::Indexed(BitDepth::One) => "LV_IMG_CF_INDEXED_1BIT",
            DisplayFormat::Indexed(BitDepth::Two) => "LV_IMG_CF_INDEXED_2BIT",
            DisplayFormat::Indexed(BitDepth::Four) => "LV_IMG_CF_INDEXED_4BIT",
            DisplayFormat::Indexed(BitDepth::Eight) => "LV_IMG_CF_INDEXED_8BIT",
            DisplayFormat::Alpha(BitDepth::One) => "LV_IMG_CF_ALPHA_1BIT",
            DisplayFormat::Alpha(BitDepth::Two) => "LV_IMG_CF_ALPHA_2BIT",
            DisplayFormat::Alpha(BitDepth::Four) => "LV_IMG_CF_ALPHA_4BIT",
            DisplayFormat::Alpha(BitDepth::Eight) => "LV_IMG_CF_ALPHA_8BIT",
        }
    }

    /// Accepts either a constant name or its numeric value.
    pub fn from_lvgl_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Ok(code) = name.parse::<u32>() {
            return Self::from_code(code);
        }
        (0..=14)
            .filter_map(Self::from_code)
            .find(|format| format.lvgl_name() == name)
    }

    /// Same pixel bytes as the plain true-color tag, flagged as chroma keyed.
    pub const fn chroma_keyed(self) -> Self {
        match self {
            DisplayFormat::TrueColor | DisplayFormat::TrueColorAlpha => {
                DisplayFormat::TrueColorChroma
            }
            other => other,
        }
    }

    /// Whether each true-color pixel is followed by an alpha byte.
    pub const fn has_alpha_byte(self) -> bool {
        matches!(self, DisplayFormat::TrueColorAlpha)
    }

    /// True for the three collapsed true-color tags.
    pub const fn is_true_color(self) -> bool {
        matches!(
            self,
            DisplayFormat::TrueColor | DisplayFormat::TrueColorAlpha | DisplayFormat::TrueColorChroma
        )
    }
}
