//! Generate uniform-color placeholder PNG icons.

pub mod error;
pub mod icon_gen;
pub mod png;
pub mod raster;
pub mod verify;

pub use error::EncodeError;
pub use png::{encode, encode_image, write_to_file, CompressionLevel};
pub use raster::{RasterImage, Rgb};
