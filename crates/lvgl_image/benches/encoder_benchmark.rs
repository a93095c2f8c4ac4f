use criterion::{criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};
use lvgl_image::{
    render_binary, render_c_source, BitDepth, ColorFormat, ConvertOptions, FrameConverter, Image,
    TrueColorDepth,
};
use std::hint::black_box;

fn generate_gradient_rgba(width: u32, height: u32) -> Vec<u8> {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = ((x * 255) / width.max(1)) as u8;
        let g = ((y * 255) / height.max(1)) as u8;
        Rgba([r, g, 128, 255])
    })
    .into_raw()
}

fn bench_format(c: &mut Criterion, name: &str, format: ColorFormat, dither: bool) {
    let (width, height) = (320, 240);
    let rgba = generate_gradient_rgba(width, height);
    let image = Image::new(width as usize, height as usize, &rgba).unwrap();
    let converter = FrameConverter::new(&image, ConvertOptions { dither });

    c.bench_function(name, |b| {
        b.iter(|| {
            let result = black_box(&converter).convert(format, false);
            assert!(result.is_ok());
            result
        })
    });
}

fn bench_convert_565(c: &mut Criterion) {
    bench_format(
        c,
        "convert_565_320x240",
        ColorFormat::TrueColor(TrueColorDepth::Rgb565),
        false,
    );
}

fn bench_convert_565_dither(c: &mut Criterion) {
    bench_format(
        c,
        "convert_565_dither_320x240",
        ColorFormat::TrueColor(TrueColorDepth::Rgb565),
        true,
    );
}

fn bench_convert_332_dither(c: &mut Criterion) {
    bench_format(
        c,
        "convert_332_dither_320x240",
        ColorFormat::TrueColor(TrueColorDepth::Rgb332),
        true,
    );
}

fn bench_convert_indexed(c: &mut Criterion) {
    bench_format(
        c,
        "convert_indexed_1bit_320x240",
        ColorFormat::Indexed(BitDepth::One),
        false,
    );
}

fn bench_render(c: &mut Criterion) {
    let rgba = generate_gradient_rgba(200, 200);
    let image = Image::new(200, 200, &rgba).unwrap();
    let output = FrameConverter::new(&image, ConvertOptions::default())
        .convert(ColorFormat::TrueColor(TrueColorDepth::Rgb565), true)
        .unwrap();

    c.bench_function("render_c_source_200x200", |b| {
        b.iter(|| render_c_source(black_box(&output), "gradient"))
    });
    c.bench_function("render_binary_200x200", |b| {
        b.iter(|| render_binary(black_box(&output)))
    });
}

criterion_group!(
    benches,
    bench_convert_565,
    bench_convert_565_dither,
    bench_convert_332_dither,
    bench_convert_indexed,
    bench_render,
);
criterion_main!(benches);
