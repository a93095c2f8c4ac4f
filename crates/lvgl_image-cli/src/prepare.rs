//! Pixel preparation ahead of conversion: trimming and resizing.

use crate::sizes::TargetSize;
use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Bounding box `(x, y, width, height)` of pixels with non-zero alpha.
pub fn opaque_bounds(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in img.enumerate_pixels() {
        if px[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

/// Crops fully transparent borders. Fully transparent images are returned as-is.
pub fn trim_transparent(img: RgbaImage) -> RgbaImage {
    match opaque_bounds(&img) {
        Some((x, y, w, h)) if (w, h) != img.dimensions() => {
            tracing::debug!(x, y, w, h, "trimmed transparent border");
            imageops::crop_imm(&img, x, y, w, h).to_image()
        }
        _ => img,
    }
}

pub fn prepare(img: RgbaImage, trim: bool, size: Option<TargetSize>) -> RgbaImage {
    let img = if trim { trim_transparent(img) } else { img };
    match size {
        Some(size) if (size.width, size.height) != img.dimensions() => {
            imageops::resize(&img, size.width, size.height, FilterType::Lanczos3)
        }
        _ => img,
    }
}
