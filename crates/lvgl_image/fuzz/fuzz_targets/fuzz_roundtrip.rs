#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lvgl_image::{
    decode_to_rgba, parse_binary, parse_c_source, render_binary, render_c_source, ColorFormat,
    ConvertOptions, FrameConverter, Image, RawKind,
};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    pixels: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let width = (input.width as usize).clamp(1, 64);
    let height = (input.height as usize).clamp(1, 64);
    let expected_size = width * height * 4;
    if input.pixels.len() < expected_size {
        return;
    }
    let rgba = &input.pixels[..expected_size];
    let Ok(image) = Image::new(width, height, rgba) else {
        return;
    };

    // Raw output must survive both serializations unchanged
    let converter = FrameConverter::new(&image, ConvertOptions::default());
    let output = converter
        .convert(ColorFormat::Raw(RawKind::Plain), false)
        .expect("raw conversion never fails");

    let blob = render_binary(&output).expect("dimensions fit the header");
    let parsed = parse_binary(&blob).expect("rendered blob parses");
    let decoded = decode_to_rgba(&parsed, lvgl_image::TrueColorDepth::Rgb888).expect("decodes");
    assert_eq!(decoded, rgba);

    let source = render_c_source(&output, "fuzz");
    let parsed = parse_c_source(&source).expect("rendered source parses");
    assert_eq!(parsed.data, output.data);
});
