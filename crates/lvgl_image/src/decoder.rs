//! Reading LVGL C sources and binary blobs back into RGBA pixels.

use crate::format::{BitDepth, ColorFormat, DisplayFormat, TrueColorDepth};
use crate::output::unpack_header;
use crate::{LvglError, Result};

/// An LVGL image as found in a C source or binary blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedImage {
    /// Descriptor symbol; `None` for binary blobs.
    pub name: Option<String>,
    pub format: DisplayFormat,
    pub width: usize,
    pub height: usize,
    /// Bytes outside of any `LV_COLOR_DEPTH` guard.
    pub data: Vec<u8>,
    /// Bytes of guarded blocks in sources holding every true-color depth.
    pub depth_variants: Vec<(TrueColorDepth, Vec<u8>)>,
}

impl ParsedImage {
    /// Bytes to decode for `depth`: the matching guarded block if the source
    /// has one, the unguarded bytes otherwise.
    pub fn data_for(&self, depth: TrueColorDepth) -> &[u8] {
        self.depth_variants
            .iter()
            .find(|(d, _)| *d == depth)
            .map(|(_, bytes)| bytes.as_slice())
            .unwrap_or(&self.data)
    }
}

/// Parses a C source defining `<name>_map[]` and an `lv_img_dsc_t <name>`.
pub fn parse_c_source(text: &str) -> Result<ParsedImage> {
    let map_pos = text
        .find("_map[]")
        .ok_or_else(|| invalid("could not find bitmap data array"))?;
    let name_start = text[..map_pos]
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(0, |i| i + 1);
    let name = &text[name_start..map_pos];
    if name.is_empty() {
        return Err(invalid("bitmap data array has no name"));
    }

    let body = braced(&text[map_pos..]).ok_or_else(|| invalid("unterminated bitmap data array"))?;
    let (data, depth_variants) = collect_array_bytes(body)?;

    let desc_key = format!("lv_img_dsc_t {}", name);
    let desc_pos = text
        .find(&desc_key)
        .ok_or_else(|| invalid("could not find image descriptor"))?;
    let desc = braced(&text[desc_pos..]).ok_or_else(|| invalid("unterminated image descriptor"))?;

    let cf = descriptor_field(desc, ".header.cf").ok_or_else(|| invalid("missing color format"))?;
    let format = DisplayFormat::from_lvgl_name(cf)
        .ok_or_else(|| invalid(&format!("unknown color format {}", cf)))?;
    let width = descriptor_number(desc, ".header.w")?;
    let height = descriptor_number(desc, ".header.h")?;

    tracing::trace!(name, %width, %height, cf, bytes = data.len(), "parsed C source");
    Ok(ParsedImage {
        name: Some(name.to_string()),
        format,
        width,
        height,
        data,
        depth_variants,
    })
}

/// Parses a binary blob: 4-byte little-endian header then payload.
pub fn parse_binary(bytes: &[u8]) -> Result<ParsedImage> {
    let Some((header, payload)) = bytes.split_first_chunk::<4>() else {
        return Err(invalid("blob shorter than its header"));
    };
    let (code, width, height) = unpack_header(u32::from_le_bytes(*header));
    let format = DisplayFormat::from_code(code)
        .ok_or_else(|| invalid(&format!("unknown color format code {}", code)))?;
    Ok(ParsedImage {
        name: None,
        format,
        width,
        height,
        data: payload.to_vec(),
        depth_variants: Vec::new(),
    })
}

/// Expands a parsed image into RGBA8 pixels.
///
/// `depth` selects how true-color bytes are read; other formats ignore it.
pub fn decode_to_rgba(image: &ParsedImage, depth: TrueColorDepth) -> Result<Vec<u8>> {
    let (width, height) = (image.width, image.height);
    // dimensions come from untrusted input
    let pixels = width
        .checked_mul(height)
        .filter(|&n| n > 0 && n.checked_mul(4).is_some())
        .ok_or(LvglError::InvalidDimensions { width, height })?;

    match image.format {
        DisplayFormat::Indexed(BitDepth::One) => decode_indexed_1bit(&image.data, width, height),
        DisplayFormat::TrueColor | DisplayFormat::TrueColorAlpha | DisplayFormat::TrueColorChroma => {
            decode_true_color(
                image.data_for(depth),
                pixels,
                depth,
                image.format.has_alpha_byte(),
            )
        }
        DisplayFormat::Raw | DisplayFormat::RawAlpha | DisplayFormat::RawChroma => {
            let expected = pixels * 4;
            if image.data.len() != expected {
                return Err(LvglError::BufferSizeMismatch {
                    expected,
                    actual: image.data.len(),
                });
            }
            Ok(image.data.clone())
        }
        DisplayFormat::Indexed(bits) => Err(LvglError::UnsupportedFormat(ColorFormat::Indexed(bits))),
        DisplayFormat::Alpha(bits) => Err(LvglError::UnsupportedFormat(ColorFormat::Alpha(bits))),
    }
}

fn decode_indexed_1bit(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    if data.len() < 8 {
        return Err(invalid("indexed image without palette"));
    }
    let (palette, bits) = data.split_at(8);
    // BGRA entries
    let colors = [
        [palette[2], palette[1], palette[0], palette[3]],
        [palette[6], palette[5], palette[4], palette[7]],
    ];

    // a truncated last row decodes as index 0; anything shorter is rejected
    let stride = BitDepth::One.row_bytes(width);
    let expected = stride
        .checked_mul(height)
        .ok_or(LvglError::InvalidDimensions { width, height })?;
    if bits.len() < stride || bits.len() + stride < expected {
        return Err(LvglError::BufferSizeMismatch {
            expected: 8 + expected,
            actual: data.len(),
        });
    }

    let mut rgba = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            // bytes missing at the end decode as index 0
            let index = bits
                .get(y * stride + x / 8)
                .map_or(0, |byte| (byte >> (7 - x % 8)) & 1);
            rgba.extend_from_slice(&colors[index as usize]);
        }
    }
    Ok(rgba)
}

fn decode_true_color(
    data: &[u8],
    pixels: usize,
    depth: TrueColorDepth,
    with_alpha: bool,
) -> Result<Vec<u8>> {
    let pixel_bytes = depth.pixel_bytes(with_alpha);
    let expected = pixels
        .checked_mul(pixel_bytes)
        .ok_or_else(|| invalid("image too large"))?;
    if data.len() < expected {
        return Err(LvglError::BufferSizeMismatch {
            expected,
            actual: data.len(),
        });
    }

    let mut rgba = Vec::with_capacity(pixels * 4);
    for px in data[..expected].chunks_exact(pixel_bytes) {
        let alpha = if with_alpha { px[pixel_bytes - 1] } else { 0xFF };
        let [r, g, b] = match depth {
            TrueColorDepth::Rgb332 => unpack_332(px[0]),
            TrueColorDepth::Rgb565 => unpack_565(u16::from_le_bytes([px[0], px[1]])),
            TrueColorDepth::Rgb565Swap => unpack_565(u16::from_be_bytes([px[0], px[1]])),
            TrueColorDepth::Rgb888 => [px[2], px[1], px[0]],
        };
        rgba.extend_from_slice(&[r, g, b, alpha]);
    }
    Ok(rgba)
}

/// Widens the top `bits` bits of `value` to 8 bits by replication.
#[inline]
fn widen(value: u8, bits: u32) -> u8 {
    let mut out = 0u32;
    let mut shift = 8i32 - bits as i32;
    while shift > -(bits as i32) {
        out |= if shift >= 0 {
            (value as u32) << shift
        } else {
            (value as u32) >> -shift
        };
        shift -= bits as i32;
    }
    (out & 0xFF) as u8
}

fn unpack_332(byte: u8) -> [u8; 3] {
    [
        widen(byte >> 5, 3),
        widen((byte >> 2) & 0x07, 3),
        widen(byte & 0x03, 2),
    ]
}

fn unpack_565(word: u16) -> [u8; 3] {
    [
        widen(((word >> 11) & 0x1F) as u8, 5),
        widen(((word >> 5) & 0x3F) as u8, 6),
        widen((word & 0x1F) as u8, 5),
    ]
}

fn invalid(message: &str) -> LvglError {
    LvglError::InvalidData(message.to_string())
}

/// Contents between the first `{` of `text` and its closing `}`.
fn braced(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = open + text[open..].find('}')?;
    Some(&text[open + 1..close])
}

type ArrayBytes = (Vec<u8>, Vec<(TrueColorDepth, Vec<u8>)>);

/// Collects every `0x..` literal, sorting guarded blocks by depth.
fn collect_array_bytes(body: &str) -> Result<ArrayBytes> {
    let mut data = Vec::new();
    let mut variants: Vec<(TrueColorDepth, Vec<u8>)> = Vec::new();
    let mut current: Option<usize> = None;

    for line in body.lines() {
        let line = strip_comments(line);
        let trimmed = line.trim();
        if let Some(condition) = trimmed.strip_prefix("#if ") {
            let condition = condition.trim();
            let depth = TrueColorDepth::ALL
                .into_iter()
                .find(|d| d.lvgl_guard() == condition)
                .ok_or_else(|| invalid(&format!("unknown guard {}", condition)))?;
            variants.push((depth, Vec::new()));
            current = Some(variants.len() - 1);
            continue;
        }
        if trimmed.starts_with("#endif") {
            current = None;
            continue;
        }

        let target = match current {
            Some(i) => &mut variants[i].1,
            None => &mut data,
        };
        for token in trimmed.split(|c: char| c == ',' || c.is_whitespace()) {
            let Some(hex) = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
            else {
                continue;
            };
            let byte = u8::from_str_radix(hex, 16)
                .map_err(|_| invalid(&format!("bad byte literal {}", token)))?;
            target.push(byte);
        }
    }
    Ok((data, variants))
}

fn strip_comments(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

fn descriptor_field<'a>(desc: &'a str, key: &str) -> Option<&'a str> {
    desc.split(',').find_map(|entry| {
        let (field, value) = entry.split_once('=')?;
        (field.trim() == key).then_some(value.trim())
    })
}

fn descriptor_number(desc: &str, key: &str) -> Result<usize> {
    let value = descriptor_field(desc, key)
        .ok_or_else(|| invalid(&format!("could not find {}", key)))?;
    value
        .parse()
        .map_err(|_| invalid(&format!("{} is not a number: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen() {
        assert_eq!(widen(0x1F, 5), 0xFF);
        assert_eq!(widen(0x3F, 6), 0xFF);
        assert_eq!(widen(0x07, 3), 0xFF);
        assert_eq!(widen(0x03, 2), 0xFF);
        assert_eq!(widen(0, 5), 0);
        assert_eq!(widen(0b10000, 5), 0b1000_0100);
        assert_eq!(widen(0b10, 2), 0b1010_1010);
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(
            strip_comments("  0x00, 0x01, \t/*Color of index 0*/"),
            "  0x00, 0x01, \t"
        );
        assert_eq!(strip_comments("a /* b */ c /* d"), "a  c ");
    }

    #[test]
    fn test_descriptor_fields() {
        let desc = "\n  .header.cf = LV_IMG_CF_INDEXED_1BIT,\n  .header.w = 40,\n  .header.h = 31,\n";
        assert_eq!(
            descriptor_field(desc, ".header.cf"),
            Some("LV_IMG_CF_INDEXED_1BIT")
        );
        assert_eq!(descriptor_number(desc, ".header.w").unwrap(), 40);
        assert!(descriptor_number(desc, ".data_size").is_err());
    }

    #[test]
    fn test_short_blob() {
        assert!(matches!(
            parse_binary(&[1, 2, 3]),
            Err(LvglError::InvalidData(_))
        ));
    }
}
