//! Serialization of a conversion as C source or as a binary blob.
//!
//! The C layout (include guard, attribute macros, `<name>_map[]` array and the
//! `lv_img_dsc_t` descriptor) and the binary header are consumed by firmware
//! builds and must stay byte-for-byte stable.

use crate::converter::{ConversionOutput, ConvertOptions, FrameConverter, Image};
use crate::format::{ColorFormat, DisplayFormat, TrueColorDepth};
use crate::{LvglError, Result};

/// Largest width or height representable in the binary header.
pub const HEADER_MAX_DIMENSION: usize = (1 << 11) - 1;

const HEADER_CODE_MASK: u32 = (1 << 10) - 1;
const HEADER_DIMENSION_MASK: u32 = (1 << 11) - 1;

/// Values per line for formats without a row structure.
const RAW_VALUES_PER_LINE: usize = 16;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Packs the 32-bit header: code in bits 0..=9, width in 10..=20, height in 21..=31.
pub fn pack_header(code: u32, width: usize, height: usize) -> Result<u32> {
    if width > HEADER_MAX_DIMENSION || height > HEADER_MAX_DIMENSION {
        return Err(LvglError::HeaderOverflow { width, height });
    }
    Ok((code & HEADER_CODE_MASK) | ((width as u32) << 10) | ((height as u32) << 21))
}

/// Splits a header word into (code, width, height).
pub fn unpack_header(header: u32) -> (u32, usize, usize) {
    (
        header & HEADER_CODE_MASK,
        ((header >> 10) & HEADER_DIMENSION_MASK) as usize,
        ((header >> 21) & HEADER_DIMENSION_MASK) as usize,
    )
}

/// Renders the binary blob: little-endian header followed by the output bytes.
pub fn render_binary(output: &ConversionOutput) -> Result<Vec<u8>> {
    let header = pack_header(output.display.code(), output.width, output.height)?;
    let mut blob = Vec::with_capacity(4 + output.data.len());
    blob.extend_from_slice(&header.to_le_bytes());
    blob.extend_from_slice(&output.data);
    Ok(blob)
}

/// Turns an arbitrary name (typically a file stem) into a C identifier.
pub fn sanitize_symbol(name: &str) -> String {
    let mut symbol: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if symbol.is_empty() {
        symbol.push_str("image");
    }
    if symbol.starts_with(|c: char| c.is_ascii_digit()) {
        symbol.insert(0, '_');
    }
    symbol
}

/// Renders `output` as a C source file defining `<name>_map` and `<name>`.
pub fn render_c_source(output: &ConversionOutput, name: &str) -> String {
    let symbol = sanitize_symbol(name);
    let mut out = String::with_capacity(output.data.len() * 6 + 1024);
    push_array_open(&mut out, &symbol);

    let footprint = output.palette.len() * 4;
    if footprint > 0 {
        for (i, entry) in output.data[..footprint].chunks(4).enumerate() {
            out.push_str("  ");
            for &byte in entry {
                push_hex(&mut out, byte);
            }
            out.push_str("\t/*Color of index ");
            out.push_str(&i.to_string());
            out.push_str("*/\n");
        }
        out.push('\n');
    }

    let per_line = match output.format {
        ColorFormat::Raw(_) => RAW_VALUES_PER_LINE,
        _ => output.row_stride(),
    };
    push_lines(&mut out, &output.data[footprint..], per_line);
    out.push_str("};\n\n");

    push_descriptor(
        &mut out,
        &symbol,
        output.display,
        output.width,
        output.height,
        &output.data.len().to_string(),
    );
    out
}

/// Renders one C source holding the image at every true-color depth.
///
/// Each depth sits under the preprocessor guard selecting it, so one file
/// serves firmware built with any `LV_COLOR_DEPTH`.
pub fn render_c_source_all_depths(
    image: &Image<'_>,
    name: &str,
    with_alpha: bool,
    options: &ConvertOptions,
) -> Result<String> {
    let symbol = sanitize_symbol(name);
    let mut out = String::new();
    push_array_open(&mut out, &symbol);

    for depth in TrueColorDepth::ALL {
        // fresh converter per depth so no diffusion state leaks between them
        let converter = FrameConverter::new(image, options.clone());
        let output = converter.convert(ColorFormat::TrueColor(depth), with_alpha)?;
        out.push_str("#if ");
        out.push_str(depth.lvgl_guard());
        out.push('\n');
        out.push_str("  /*Pixel format: ");
        out.push_str(depth.description());
        if with_alpha && depth != TrueColorDepth::Rgb888 {
            out.push_str(", Alpha 8 bit");
        }
        out.push_str("*/\n");
        push_lines(&mut out, &output.data, output.row_stride());
        out.push_str("#endif\n");
    }
    out.push_str("};\n\n");

    let size_macro = if with_alpha {
        "LV_IMG_PX_SIZE_ALPHA_BYTE"
    } else {
        "LV_COLOR_SIZE / 8"
    };
    let data_size = format!("{} * {}", image.width() * image.height(), size_macro);
    let display = ColorFormat::TrueColor(TrueColorDepth::Rgb888).display(with_alpha);
    push_descriptor(
        &mut out,
        &symbol,
        display,
        image.width(),
        image.height(),
        &data_size,
    );
    Ok(out)
}

fn push_array_open(out: &mut String, symbol: &str) {
    let upper = symbol.to_ascii_uppercase();
    out.push_str(concat!(
        "#ifdef __has_include\n",
        "    #if __has_include(\"lvgl.h\")\n",
        "        #ifndef LV_LVGL_H_INCLUDE_SIMPLE\n",
        "            #define LV_LVGL_H_INCLUDE_SIMPLE\n",
        "        #endif\n",
        "    #endif\n",
        "#endif\n",
        "\n",
        "#if defined(LV_LVGL_H_INCLUDE_SIMPLE)\n",
        "    #include \"lvgl.h\"\n",
        "#else\n",
        "    #include \"lvgl/lvgl.h\"\n",
        "#endif\n",
        "\n",
        "\n",
        "#ifndef LV_ATTRIBUTE_MEM_ALIGN\n",
        "#define LV_ATTRIBUTE_MEM_ALIGN\n",
        "#endif\n",
        "\n",
    ));
    out.push_str("#ifndef LV_ATTRIBUTE_IMG_");
    out.push_str(&upper);
    out.push_str("\n#define LV_ATTRIBUTE_IMG_");
    out.push_str(&upper);
    out.push_str("\n#endif\n\n");
    out.push_str("const LV_ATTRIBUTE_MEM_ALIGN LV_ATTRIBUTE_LARGE_CONST LV_ATTRIBUTE_IMG_");
    out.push_str(&upper);
    out.push_str(" uint8_t ");
    out.push_str(symbol);
    out.push_str("_map[] = {\n");
}

fn push_descriptor(
    out: &mut String,
    symbol: &str,
    display: DisplayFormat,
    width: usize,
    height: usize,
    data_size: &str,
) {
    out.push_str("const lv_img_dsc_t ");
    out.push_str(symbol);
    out.push_str(" = {\n");
    out.push_str("  .header.cf = ");
    out.push_str(display.lvgl_name());
    out.push_str(",\n");
    out.push_str("  .header.always_zero = 0,\n");
    out.push_str("  .header.reserved = 0,\n");
    out.push_str(&format!("  .header.w = {},\n", width));
    out.push_str(&format!("  .header.h = {},\n", height));
    out.push_str(&format!("  .data_size = {},\n", data_size));
    out.push_str("  .data = ");
    out.push_str(symbol);
    out.push_str("_map,\n");
    out.push_str("};\n");
}

fn push_lines(out: &mut String, bytes: &[u8], per_line: usize) {
    for line in bytes.chunks(per_line.max(1)) {
        out.push_str("  ");
        for &byte in line {
            push_hex(out, byte);
        }
        out.push('\n');
    }
}

/// Appends `0x??, ` without going through the formatter.
#[inline]
fn push_hex(out: &mut String, byte: u8) {
    out.push_str("0x");
    out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
    out.push(HEX_DIGITS[(byte & 0x0F) as usize] as char);
    out.push_str(", ");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BitDepth;

    #[test]
    fn test_header_round_trip() {
        let header = pack_header(7, 40, 31).unwrap();
        assert_eq!(unpack_header(header), (7, 40, 31));
        assert_eq!(header, 7 | (40 << 10) | (31 << 21));

        let header = pack_header(5, 2047, 2047).unwrap();
        assert_eq!(unpack_header(header), (5, 2047, 2047));
    }

    #[test]
    fn test_header_overflow() {
        assert!(matches!(
            pack_header(4, 2048, 1),
            Err(LvglError::HeaderOverflow { width: 2048, height: 1 })
        ));
        assert!(pack_header(4, 1, 4000).is_err());
    }

    #[test]
    fn test_sanitize_symbol() {
        assert_eq!(sanitize_symbol("batt_0"), "batt_0");
        assert_eq!(sanitize_symbol("batt-0.icon"), "batt_0_icon");
        assert_eq!(sanitize_symbol("0_layer"), "_0_layer");
        assert_eq!(sanitize_symbol(""), "image");
    }

    #[test]
    fn test_hex_lines() {
        let mut out = String::new();
        push_lines(&mut out, &[0x00, 0xab, 0x0f, 0xff, 0x10], 2);
        assert_eq!(out, "  0x00, 0xab, \n  0x0f, 0xff, \n  0x10, \n");
    }

    #[test]
    fn test_render_binary() {
        let rgba = [255u8, 255, 255, 255, 0, 0, 0, 255];
        let image = Image::new(2, 1, &rgba).unwrap();
        let output = FrameConverter::new(&image, ConvertOptions::default())
            .convert(ColorFormat::Indexed(BitDepth::One), false)
            .unwrap();
        let blob = render_binary(&output).unwrap();
        let header = u32::from_le_bytes([blob[0], blob[1], blob[2], blob[3]]);
        assert_eq!(unpack_header(header), (7, 2, 1));
        assert_eq!(&blob[4..], &output.data[..]);
        assert_eq!(blob.len(), 4 + 8 + 1);
    }
}
