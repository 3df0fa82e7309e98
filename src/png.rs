//! Minimal truecolor PNG encoder for uniform images.
//!
//! Output is a signature followed by exactly three chunks: `IHDR`, a single
//! `IDAT` holding the zlib stream of unfiltered scanlines, and `IEND`.

use crate::error::EncodeError;
use crate::raster::{RasterImage, Rgb};
use flate2::{write::ZlibEncoder, Compression, Crc};
use std::{
    fs,
    io::{self, Write},
    num::TryFromIntError,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

const BIT_DEPTH: u8 = 8;
const COLOR_TYPE_TRUECOLOR: u8 = 2;

/// Deflate effort used for the `IDAT` stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CompressionLevel {
    Fast,
    #[default]
    Default,
    Best,
}

impl From<CompressionLevel> for Compression {
    fn from(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Fast => Compression::fast(),
            CompressionLevel::Default => Compression::default(),
            CompressionLevel::Best => Compression::best(),
        }
    }
}

/// Encode a `width`x`height` image filled with `fill` at default compression.
pub fn encode(width: u32, height: u32, fill: impl Into<Rgb>) -> Result<Vec<u8>, EncodeError> {
    let image = RasterImage::new(width, height, fill)?;
    encode_image(&image, CompressionLevel::Default)
}

pub fn encode_image(
    image: &RasterImage,
    level: CompressionLevel,
) -> Result<Vec<u8>, EncodeError> {
    let idat = compress_scanlines(image, level, Vec::new()).map_err(EncodeError::Compress)?;

    debug!(
        width = image.width(),
        height = image.height(),
        raw = image.raw_len(),
        compressed = idat.len(),
        "compressed scanlines"
    );

    let too_large = |_: TryFromIntError| EncodeError::InvalidDimension {
        width: image.width(),
        height: image.height(),
    };

    // signature + three chunk frames (12 bytes each) + IHDR payload
    let mut out = Vec::with_capacity(SIGNATURE.len() + 3 * 12 + 13 + idat.len());
    out.extend_from_slice(&SIGNATURE);
    write_chunk(&mut out, b"IHDR", &header(image)).map_err(too_large)?;
    write_chunk(&mut out, b"IDAT", &idat).map_err(too_large)?;
    write_chunk(&mut out, b"IEND", &[]).map_err(too_large)?;
    Ok(out)
}

fn header(image: &RasterImage) -> [u8; 13] {
    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&image.width().to_be_bytes());
    ihdr[4..8].copy_from_slice(&image.height().to_be_bytes());
    ihdr[8] = BIT_DEPTH;
    ihdr[9] = COLOR_TYPE_TRUECOLOR;
    // compression, filter and interlace methods stay 0
    ihdr
}

fn compress_scanlines<W: Write>(
    image: &RasterImage,
    level: CompressionLevel,
    sink: W,
) -> io::Result<W> {
    let row = image.scanline();
    let mut encoder = ZlibEncoder::new(sink, level.into());

    for _ in 0..image.height() {
        encoder.write_all(&row)?;
    }
    encoder.finish()
}

/// Length field for a chunk payload; PNG stores it as a 4-byte integer.
fn chunk_len(len: usize) -> Result<u32, TryFromIntError> {
    u32::try_from(len)
}

/// Append one chunk: length, tag, payload, CRC-32 over tag and payload.
pub fn write_chunk(
    out: &mut Vec<u8>,
    tag: &[u8; 4],
    payload: &[u8],
) -> Result<(), TryFromIntError> {
    let len = chunk_len(payload.len())?;

    let mut crc = Crc::new();
    crc.update(tag);
    crc.update(payload);

    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    Ok(())
}

/// Write `bytes` to `path`, replacing any existing file.
///
/// Data lands in a temporary file beside `path` first and is renamed into
/// place once fully written, so a failed write never leaves a truncated icon.
/// The parent directory must already exist. A replaced file keeps its
/// permissions; a new one gets the same mode a plain create would.
pub fn write_to_file(path: &Path, bytes: &[u8]) -> Result<(), EncodeError> {
    let io_err = |source: io::Error| EncodeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let existing = fs::metadata(path)
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.permissions());

    let mut builder = tempfile::Builder::new();
    builder.prefix(".icon-").suffix(".png.tmp");
    // tempfile defaults to 0600; ask for 0666 so the umask decides, as with File::create.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    let mut tmp = builder.tempfile_in(&dir).map_err(io_err)?;
    if let Some(permissions) = existing {
        tmp.as_file().set_permissions(permissions).map_err(io_err)?;
    }

    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    info!(path = %path.display(), bytes = bytes.len(), "wrote icon");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    fn chunk_at(bytes: &[u8], offset: usize) -> (usize, [u8; 4], &[u8], u32) {
        let len = u32::from_be_bytes(bytes[offset..offset + 4].try_into().unwrap()) as usize;
        let tag: [u8; 4] = bytes[offset + 4..offset + 8].try_into().unwrap();
        let payload = &bytes[offset + 8..offset + 8 + len];
        let crc = u32::from_be_bytes(
            bytes[offset + 8 + len..offset + 12 + len]
                .try_into()
                .unwrap(),
        );
        (len, tag, payload, crc)
    }

    #[test]
    fn iend_chunk_has_well_known_crc() {
        let mut out = Vec::new();
        write_chunk(&mut out, b"IEND", &[]).unwrap();
        assert_eq!(out, [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]);
    }

    #[test]
    fn chunk_layout_is_signature_ihdr_idat_iend() {
        let bytes = encode(4, 3, (1, 2, 3)).unwrap();
        assert_eq!(bytes[..8], SIGNATURE);

        let (len, tag, payload, _) = chunk_at(&bytes, 8);
        assert_eq!(len, 13);
        assert_eq!(&tag, b"IHDR");
        assert_eq!(payload, [0, 0, 0, 4, 0, 0, 0, 3, 8, 2, 0, 0, 0]);

        let idat_offset = 8 + 12 + 13;
        let (idat_len, tag, _, _) = chunk_at(&bytes, idat_offset);
        assert_eq!(&tag, b"IDAT");

        let iend_offset = idat_offset + 12 + idat_len;
        let (len, tag, _, _) = chunk_at(&bytes, iend_offset);
        assert_eq!(len, 0);
        assert_eq!(&tag, b"IEND");
        assert_eq!(bytes.len(), iend_offset + 12);
    }

    #[test]
    fn chunk_crcs_cover_tag_and_payload() {
        let bytes = encode(2, 2, (9, 9, 9)).unwrap();
        let (_, tag, payload, stored) = chunk_at(&bytes, 8);

        let mut crc = Crc::new();
        crc.update(&tag);
        crc.update(payload);
        assert_eq!(crc.sum(), stored);
    }

    #[test]
    fn idat_inflates_to_unfiltered_scanlines() {
        let bytes = encode(2, 3, (10, 20, 30)).unwrap();
        let (_, _, idat, _) = chunk_at(&bytes, 8 + 12 + 13);

        let mut raw = Vec::new();
        ZlibDecoder::new(idat).read_to_end(&mut raw).unwrap();

        let row: [u8; 7] = [0, 10, 20, 30, 10, 20, 30];
        assert_eq!(raw, row.repeat(3));
    }

    #[test]
    fn compression_levels_all_inflate_to_same_data() {
        let image = RasterImage::new(16, 16, Rgb::GREEN).unwrap();
        for level in [
            CompressionLevel::Fast,
            CompressionLevel::Default,
            CompressionLevel::Best,
        ] {
            let bytes = encode_image(&image, level).unwrap();
            let (_, _, idat, _) = chunk_at(&bytes, 8 + 12 + 13);
            let mut raw = Vec::new();
            ZlibDecoder::new(idat).read_to_end(&mut raw).unwrap();
            assert_eq!(raw.len() as u64, image.raw_len());
        }
    }

    #[test]
    fn encode_rejects_zero_dimensions() {
        assert!(matches!(
            encode(0, 5, Rgb::GREEN),
            Err(EncodeError::InvalidDimension { .. })
        ));
        assert!(matches!(
            encode(5, 0, Rgb::GREEN),
            Err(EncodeError::InvalidDimension { .. })
        ));
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn compression_errors_are_propagated() {
        let image = RasterImage::new(64, 64, Rgb::GREEN).unwrap();
        let err = compress_scanlines(&image, CompressionLevel::Default, BrokenSink)
            .err()
            .expect("a failing sink should fail compression");
        assert_eq!(err.to_string(), "sink closed");
    }

    #[test]
    fn compress_error_reads_as_encode_failure() {
        let err = EncodeError::Compress(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(err.to_string(), "failed to compress image data");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn chunk_length_must_fit_in_four_bytes() {
        assert_eq!(chunk_len(u32::MAX as usize).unwrap(), u32::MAX);
        assert!(chunk_len(u32::MAX as usize + 1).is_err());
    }
}
