//! Decode a produced icon with the `image` crate and check it is uniform.

use crate::raster::Rgb;
use anyhow::{Context, Result};
use image::ColorType;

#[derive(Debug, Clone, PartialEq)]
pub struct IconReport {
    pub width: u32,
    pub height: u32,
    pub color_type: ColorType,
    /// Color of the top-left pixel.
    pub sample: Rgb,
    /// Pixels whose color differs from `sample`.
    pub mismatched: u64,
}

impl IconReport {
    pub fn is_uniform(&self) -> bool {
        self.mismatched == 0
    }
}

pub fn inspect(bytes: &[u8]) -> Result<IconReport> {
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .context("Failed to decode icon")?;
    let color_type = img.color();
    let rgb = img.to_rgb8();

    let sample = rgb
        .pixels()
        .next()
        .map(|p| Rgb(p.0))
        .context("Icon has no pixels")?;
    let mismatched = rgb.pixels().filter(|p| p.0 != sample.0).count() as u64;

    Ok(IconReport {
        width: img.width(),
        height: img.height(),
        color_type,
        sample,
        mismatched,
    })
}
