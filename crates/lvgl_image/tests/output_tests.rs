use lvgl_image::*;
use pretty_assertions::assert_eq;

const PREAMBLE: &str = "#ifdef __has_include
    #if __has_include(\"lvgl.h\")
        #ifndef LV_LVGL_H_INCLUDE_SIMPLE
            #define LV_LVGL_H_INCLUDE_SIMPLE
        #endif
    #endif
#endif

#if defined(LV_LVGL_H_INCLUDE_SIMPLE)
    #include \"lvgl.h\"
#else
    #include \"lvgl/lvgl.h\"
#endif


#ifndef LV_ATTRIBUTE_MEM_ALIGN
#define LV_ATTRIBUTE_MEM_ALIGN
#endif

";

fn checker(width: usize, height: usize) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            rgba.extend_from_slice(&[v, v, v, 255]);
        }
    }
    rgba
}

fn convert(rgba: &[u8], width: usize, height: usize, format: ColorFormat, alpha: bool) -> ConversionOutput {
    let image = Image::new(width, height, rgba).unwrap();
    FrameConverter::new(&image, ConvertOptions::default())
        .convert(format, alpha)
        .unwrap()
}

#[test]
fn test_indexed_c_source() {
    let rgba = checker(9, 2);
    let output = convert(&rgba, 9, 2, ColorFormat::Indexed(BitDepth::One), false);
    let source = render_c_source(&output, "dots");

    let expected = [
        PREAMBLE,
        "#ifndef LV_ATTRIBUTE_IMG_DOTS\n",
        "#define LV_ATTRIBUTE_IMG_DOTS\n",
        "#endif\n",
        "\n",
        "const LV_ATTRIBUTE_MEM_ALIGN LV_ATTRIBUTE_LARGE_CONST LV_ATTRIBUTE_IMG_DOTS uint8_t dots_map[] = {\n",
        "  0x00, 0x00, 0x00, 0xff, \t/*Color of index 0*/\n",
        "  0xff, 0xff, 0xff, 0xff, \t/*Color of index 1*/\n",
        "\n",
        "  0xaa, 0x80, \n",
        "  0x55, 0x00, \n",
        "};\n",
        "\n",
        "const lv_img_dsc_t dots = {\n",
        "  .header.cf = LV_IMG_CF_INDEXED_1BIT,\n",
        "  .header.always_zero = 0,\n",
        "  .header.reserved = 0,\n",
        "  .header.w = 9,\n",
        "  .header.h = 2,\n",
        "  .data_size = 12,\n",
        "  .data = dots_map,\n",
        "};\n",
    ]
    .concat();
    assert_eq!(source, expected);
}

#[test]
fn test_true_color_c_source() {
    let rgba = [255u8, 0, 0, 0x80, 0, 0, 255, 0xFF];
    let output = convert(&rgba, 2, 1, ColorFormat::TrueColor(TrueColorDepth::Rgb565), true);
    let source = render_c_source(&output, "arrow-up");

    assert!(source.starts_with(PREAMBLE));
    assert!(source.contains("uint8_t arrow_up_map[] = {\n  0x00, 0xf8, 0x80, 0x1f, 0x00, 0xff, \n};\n"));
    assert!(source.contains("  .header.cf = LV_IMG_CF_TRUE_COLOR_ALPHA,\n"));
    assert!(source.contains("  .data_size = 6,\n"));
    assert!(source.contains("#ifndef LV_ATTRIBUTE_IMG_ARROW_UP\n"));
    assert!(source.ends_with("  .data = arrow_up_map,\n};\n"));
}

#[test]
fn test_raw_c_source_line_width() {
    let rgba: Vec<u8> = (0..40).collect();
    let output = convert(&rgba, 5, 2, ColorFormat::Raw(RawKind::Plain), false);
    let source = render_c_source(&output, "raw");
    let lines: Vec<&str> = source
        .lines()
        .filter(|line| line.starts_with("  0x"))
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].matches("0x").count(), 16);
    assert_eq!(lines[2].matches("0x").count(), 8);
    assert!(source.contains(".header.cf = LV_IMG_CF_RAW,"));
}

#[test]
fn test_data_size_matches_array() {
    let rgba = checker(13, 7);
    for format in [
        ColorFormat::TrueColor(TrueColorDepth::Rgb332),
        ColorFormat::TrueColor(TrueColorDepth::Rgb888),
        ColorFormat::Indexed(BitDepth::One),
    ] {
        let output = convert(&rgba, 13, 7, format, false);
        let source = render_c_source(&output, "grid");
        let literals = source.matches("0x").count();
        assert_eq!(literals, output.data.len());
        assert!(source.contains(&format!(".data_size = {},", output.data.len())));
    }
}

#[test]
fn test_all_depths_source() {
    let rgba = checker(3, 2);
    let image = Image::new(3, 2, &rgba).unwrap();
    let source =
        render_c_source_all_depths(&image, "tile", false, &ConvertOptions { dither: true }).unwrap();

    for depth in TrueColorDepth::ALL {
        assert!(source.contains(&format!("#if {}\n", depth.lvgl_guard())));
    }
    // six in the preamble and attribute guard, one per depth
    assert_eq!(source.matches("#endif\n").count(), 6 + 4);
    assert!(source.contains("  .header.cf = LV_IMG_CF_TRUE_COLOR,\n"));
    assert!(source.contains("  .data_size = 6 * LV_COLOR_SIZE / 8,\n"));

    let with_alpha =
        render_c_source_all_depths(&image, "tile", true, &ConvertOptions::default()).unwrap();
    assert!(with_alpha.contains("  .header.cf = LV_IMG_CF_TRUE_COLOR_ALPHA,\n"));
    assert!(with_alpha.contains("  .data_size = 6 * LV_IMG_PX_SIZE_ALPHA_BYTE,\n"));
}

#[test]
fn test_binary_blob() {
    let rgba = checker(40, 31);
    let output = convert(&rgba, 40, 31, ColorFormat::Indexed(BitDepth::One), false);
    let blob = render_binary(&output).unwrap();

    assert_eq!(blob.len(), 4 + 163);
    let header = u32::from_le_bytes([blob[0], blob[1], blob[2], blob[3]]);
    assert_eq!(header & 0x3FF, 7);
    assert_eq!((header >> 10) & 0x7FF, 40);
    assert_eq!((header >> 21) & 0x7FF, 31);
    assert_eq!(unpack_header(header), (7, 40, 31));
    assert_eq!(&blob[4..], &output.data[..]);
}

#[test]
fn test_binary_rejects_large_images() {
    let rgba = vec![0u8; 2048 * 4];
    let output = convert(&rgba, 2048, 1, ColorFormat::Raw(RawKind::Plain), false);
    assert!(matches!(
        render_binary(&output),
        Err(LvglError::HeaderOverflow { width: 2048, height: 1 })
    ));
    // the C source has no such limit
    assert!(render_c_source(&output, "wide").contains(".header.w = 2048,"));
}
