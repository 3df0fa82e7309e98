use std::path::PathBuf;

/// Errors raised while encoding or persisting an icon.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Width or height is zero, larger than PNG allows (2^31 - 1), or the
    /// compressed data would not fit in a single chunk.
    #[error("invalid icon dimensions {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("failed to compress image data")]
    Compress(#[source] std::io::Error),

    #[error("failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
