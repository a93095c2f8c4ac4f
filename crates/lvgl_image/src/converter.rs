//! Conversion of an RGBA8 image into the byte stream of one color format.

use crate::dither::ErrorDiffusion;
use crate::encoder::{push_palette, push_true_color, set_index_1bit};
use crate::format::{BitDepth, ColorFormat, DisplayFormat, TrueColorDepth};
use crate::palette::{build_palette, nearest_index, PaletteColor};
use crate::quantize::classify_rgb;
use crate::{LvglError, Result};

/// A borrowed, validated RGBA8 image without row padding.
#[derive(Clone, Copy, Debug)]
pub struct Image<'a> {
    width: usize,
    height: usize,
    pixels: &'a [u8],
}

impl<'a> Image<'a> {
    /// Wraps `pixels` (4 bytes per pixel: R, G, B, A, row-major).
    pub fn new(width: usize, height: usize, pixels: &'a [u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LvglError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(LvglError::InvalidDimensions { width, height })?;
        if pixels.len() != expected {
            return Err(LvglError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    /// Iterates rows as slices of `width * 4` bytes.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> {
        self.pixels.chunks_exact(self.width * 4)
    }
}

/// Options shared by every conversion of a [`FrameConverter`].
#[derive(Clone, Debug, Default)]
pub struct ConvertOptions {
    /// Floyd-Steinberg dithering on the true-color path.
    /// Indexed and raw formats ignore it.
    pub dither: bool,
}

/// Result of a successful conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionOutput {
    pub width: usize,
    pub height: usize,
    pub format: ColorFormat,
    pub with_alpha: bool,
    /// Tag written into the descriptor and the binary header.
    pub display: DisplayFormat,
    /// Palette of indexed formats, empty otherwise.
    pub palette: Vec<PaletteColor>,
    /// Emitted bytes; for indexed formats the BGRA palette comes first.
    pub data: Vec<u8>,
}

impl ConversionOutput {
    /// Re-tags a true-color output as chroma keyed. Other formats are unchanged.
    #[must_use]
    pub fn chroma_keyed(mut self) -> Self {
        self.display = self.display.chroma_keyed();
        self
    }

    /// Pixel bytes after the palette footprint.
    pub fn pixel_data(&self) -> &[u8] {
        &self.data[self.format.palette_size() * 4..]
    }

    /// Bytes per line of pixel data.
    pub fn row_stride(&self) -> usize {
        self.format.row_stride(self.width, self.with_alpha)
    }
}

/// Converts one image into any supported color format.
///
/// Every call to [`convert`](Self::convert) works on a freshly allocated
/// context (output buffer, palette, error diffusion lines), so a converter may
/// be reused and a failed call never touches an earlier output.
#[derive(Clone, Debug)]
pub struct FrameConverter<'a> {
    image: Image<'a>,
    options: ConvertOptions,
}

impl<'a> FrameConverter<'a> {
    pub fn new(image: &Image<'a>, options: ConvertOptions) -> Self {
        Self {
            image: *image,
            options,
        }
    }

    /// Encodes the image as `format`, appending an alpha byte per pixel for
    /// true-color formats when `with_alpha` is set.
    pub fn convert(&self, format: ColorFormat, with_alpha: bool) -> Result<ConversionOutput> {
        let mut ctx = ConversionContext::new(self.image, format, with_alpha);
        match format {
            ColorFormat::TrueColor(depth) => ctx.emit_true_color(depth, self.options.dither),
            ColorFormat::Indexed(BitDepth::One) => {
                ctx.build_palette()?;
                ctx.emit_indexed_1bit()?;
            }
            ColorFormat::Raw(_) => ctx.copy_raw(),
            ColorFormat::Alpha(_) | ColorFormat::Indexed(_) => {
                return Err(LvglError::UnsupportedFormat(format));
            }
        }
        let output = ctx.finish();
        tracing::debug!(
            %format,
            with_alpha,
            width = output.width,
            height = output.height,
            bytes = output.data.len(),
            "converted image"
        );
        Ok(output)
    }
}

/// Mutable state of a single conversion.
struct ConversionContext<'a> {
    image: Image<'a>,
    format: ColorFormat,
    with_alpha: bool,
    palette: Vec<PaletteColor>,
    out: Vec<u8>,
}

impl<'a> ConversionContext<'a> {
    fn new(image: Image<'a>, format: ColorFormat, with_alpha: bool) -> Self {
        Self {
            image,
            format,
            with_alpha,
            palette: Vec::new(),
            out: Vec::with_capacity(format.encoded_len(image.width, image.height, with_alpha)),
        }
    }

    fn build_palette(&mut self) -> Result<()> {
        self.palette = build_palette(self.format, self.image.pixels)?;
        Ok(())
    }

    fn emit_true_color(&mut self, depth: TrueColorDepth, dither: bool) {
        let mut diffusion = dither.then(|| ErrorDiffusion::new(self.image.width));
        for row in self.image.rows() {
            if let Some(diffusion) = diffusion.as_mut() {
                diffusion.start_row();
            }
            for (x, px) in row.chunks_exact(4).enumerate() {
                let rgb = match diffusion.as_mut() {
                    Some(diffusion) => diffusion.next(depth, x, px[0], px[1], px[2]),
                    None => classify_rgb(depth, px[0], px[1], px[2]),
                };
                push_true_color(&mut self.out, depth, rgb, px[3], self.with_alpha);
            }
        }
    }

    fn emit_indexed_1bit(&mut self) -> Result<()> {
        let expected = self.format.palette_size();
        if self.palette.len() != expected {
            return Err(LvglError::PaletteSizeMismatch {
                expected,
                actual: self.palette.len(),
            });
        }
        push_palette(&mut self.out, &self.palette);

        let stride = BitDepth::One.row_bytes(self.image.width);
        let start = self.out.len();
        self.out.resize(start + stride * self.image.height, 0);

        for (y, row) in self.image.rows().enumerate() {
            let line = &mut self.out[start + y * stride..start + (y + 1) * stride];
            for (x, px) in row.chunks_exact(4).enumerate() {
                let index = nearest_index(&self.palette, px[0], px[1], px[2]);
                set_index_1bit(line, x, index);
            }
        }
        Ok(())
    }

    fn copy_raw(&mut self) {
        self.out.extend_from_slice(self.image.pixels);
    }

    fn finish(self) -> ConversionOutput {
        ConversionOutput {
            width: self.image.width,
            height: self.image.height,
            format: self.format,
            with_alpha: self.with_alpha,
            display: self.format.display(self.with_alpha),
            palette: self.palette,
            data: self.out,
        }
    }
}
