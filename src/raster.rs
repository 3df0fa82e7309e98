//! In-memory description of a uniform RGB raster.

use crate::error::EncodeError;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Largest width or height a PNG header can carry.
pub const MAX_DIMENSION: u32 = i32::MAX as u32;

/// An 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const GREEN: Rgb = Rgb([0, 255, 0]);
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb([r, g, b])
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(channels: [u8; 3]) -> Self {
        Rgb(channels)
    }
}

/// Parses any CSS color (`#0f0`, `#00ff00`, `green`, `rgb(0, 255, 0)`).
/// Alpha is ignored.
impl FromStr for Rgb {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let color = css_color::Srgb::from_str(s.trim())
            .map_err(|_| anyhow!("Invalid CSS color: {s:?}"))?;

        Ok(Rgb([
            channel(color.red),
            channel(color.green),
            channel(color.blue),
        ]))
    }
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.).round() as u8
}

/// A single-color RGB image. Every scanline is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    fill: Rgb,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, fill: impl Into<Rgb>) -> Result<Self, EncodeError> {
        if !valid_dimension(width) || !valid_dimension(height) {
            return Err(EncodeError::InvalidDimension { width, height });
        }

        Ok(Self {
            width,
            height,
            fill: fill.into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// One unfiltered scanline: filter byte 0 followed by `width` copies of the fill.
    pub fn scanline(&self) -> Vec<u8> {
        let mut row = Vec::with_capacity(1 + self.width as usize * 3);
        row.push(0);
        for _ in 0..self.width {
            row.extend_from_slice(&self.fill.0);
        }
        row
    }

    /// Size of the uncompressed scanline data in bytes.
    pub fn raw_len(&self) -> u64 {
        (1 + u64::from(self.width) * 3) * u64::from(self.height)
    }
}

fn valid_dimension(value: u32) -> bool {
    (1..=MAX_DIMENSION).contains(&value)
}
