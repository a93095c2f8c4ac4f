#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lvgl_image::{ColorFormat, ConvertOptions, FrameConverter, Image};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    pixels: Vec<u8>,
    format: u8,
    with_alpha: bool,
    dither: bool,
}

const FORMATS: [&str; 15] = [
    "true_color_332",
    "true_color_565",
    "true_color_565_swap",
    "true_color_888",
    "alpha_1",
    "alpha_2",
    "alpha_4",
    "alpha_8",
    "indexed_1",
    "indexed_2",
    "indexed_4",
    "indexed_8",
    "raw",
    "raw_alpha",
    "raw_chroma",
];

fuzz_target!(|input: FuzzInput| {
    let width = (input.width as usize).max(1);
    let height = (input.height as usize).max(1);

    let expected_size = width * height * 4;
    if input.pixels.len() < expected_size {
        return;
    }
    let Ok(image) = Image::new(width, height, &input.pixels[..expected_size]) else {
        return;
    };
    let Ok(format) = FORMATS[input.format as usize % FORMATS.len()].parse::<ColorFormat>() else {
        return;
    };

    // The converter should never panic, and its size must be predictable
    let converter = FrameConverter::new(&image, ConvertOptions { dither: input.dither });
    if let Ok(output) = converter.convert(format, input.with_alpha) {
        assert_eq!(
            output.data.len(),
            format.encoded_len(width, height, input.with_alpha)
        );
    }
});
