//! # lvgl_image
//!
//! A Rust converter from RGBA8 images to LVGL image descriptors.
//!
//! ## Features
//!
//! - **Converter**: Re-encodes RGBA pixels into the fixed-width color formats
//!   understood by LVGL (3-3-2, 5-6-5, 5-6-5 swapped, 8-8-8, indexed 1-bit and
//!   raw passthrough), with optional Floyd-Steinberg dithering.
//! - **Output**: Renders a conversion as C source (`<name>_map[]` plus an
//!   `lv_img_dsc_t` descriptor) or as a binary blob with a packed 4-byte header.
//! - **Decoder**: Parses C sources and binary blobs back into RGBA pixels.
//!
//! ## Quick Start
//!
//! ### Converting an image to C source
//!
//! ```ignore
//! use lvgl_image::{
//!     render_c_source, ColorFormat, ConvertOptions, FrameConverter, Image, TrueColorDepth,
//! };
//!
//! // RGBA image data (4 bytes per pixel)
//! let rgba = vec![255u8, 0, 0, 255, 0, 255, 0, 255]; // red and green pixels
//! let image = Image::new(2, 1, &rgba)?;
//! let converter = FrameConverter::new(&image, ConvertOptions::default());
//! let output = converter.convert(ColorFormat::TrueColor(TrueColorDepth::Rgb565), false)?;
//! print!("{}", render_c_source(&output, "two_pixels"));
//! ```
//!
//! ### Decoding a binary blob
//!
//! ```ignore
//! use lvgl_image::{decode_to_rgba, parse_binary, TrueColorDepth};
//!
//! let parsed = parse_binary(&blob)?;
//! let rgba = decode_to_rgba(&parsed, TrueColorDepth::Rgb565)?;
//! println!("{}x{}", parsed.width, parsed.height);
//! ```

use thiserror::Error;

pub mod converter;
pub mod decoder;
pub mod dither;
pub mod encoder;
pub mod format;
pub mod output;
pub mod palette;
pub mod quantize;

pub use converter::{ConversionOutput, ConvertOptions, FrameConverter, Image};
pub use decoder::{decode_to_rgba, parse_binary, parse_c_source, ParsedImage};
pub use format::{BitDepth, ColorFormat, DisplayFormat, RawKind, TrueColorDepth};
pub use output::{
    pack_header, render_binary, render_c_source, render_c_source_all_depths, sanitize_symbol,
    unpack_header,
};
pub use palette::PaletteColor;
pub use quantize::classify;

/// Errors that can occur during conversion, rendering or decoding.
#[derive(Debug, Error)]
pub enum LvglError {
    /// Invalid image dimensions (width or height is zero)
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Buffer size doesn't match expected size for dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// The color format has no encoder
    #[error("unsupported color format: {0}")]
    UnsupportedFormat(ColorFormat),

    /// Palette length differs from what the indexed format requires
    #[error("palette size mismatch: expected {expected} entries, got {actual}")]
    PaletteSizeMismatch { expected: usize, actual: usize },

    /// Dimensions do not fit into the 11-bit fields of the binary header
    #[error("dimensions {width}x{height} do not fit into the binary header (max 2047x2047)")]
    HeaderOverflow { width: usize, height: usize },

    /// A color format name could not be parsed
    #[error("unknown color format: {0}")]
    UnknownFormat(String),

    /// Malformed C source or binary input
    #[error("invalid LVGL image data: {0}")]
    InvalidData(String),
}

/// Result type for LVGL image operations.
pub type Result<T> = core::result::Result<T, LvglError>;
