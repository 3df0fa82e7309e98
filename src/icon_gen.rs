use crate::png::{self, CompressionLevel};
use crate::raster::{RasterImage, Rgb};
use anyhow::{Context, Result};
use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
};

pub const DEFAULT_OUTPUT: &str = "assets/icon.png";
pub const DEFAULT_SIZE: u32 = 512;
pub const DEFAULT_COLOR: &str = "#00ff00";

/// Options for one `generate_icon` run; the CLI flags map onto these.
#[derive(Debug, Clone)]
pub struct Args {
    pub output: PathBuf,
    pub size: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub color: String,
    pub compression: CompressionLevel,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            size: DEFAULT_SIZE,
            width: None,
            height: None,
            color: DEFAULT_COLOR.to_string(),
            compression: CompressionLevel::Default,
        }
    }
}

/// What `generate_icon` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

pub fn generate_icon(args: Args) -> Result<Generated> {
    let fill: Rgb = args
        .color
        .parse()
        .with_context(|| format!("Can't use {:?} as the icon color", args.color))?;

    let width = args.width.unwrap_or(args.size);
    let height = args.height.unwrap_or(args.size);
    let image = RasterImage::new(width, height, fill)?;

    ensure_parent_dir(&args.output)?;

    println!("Generating {width}x{height} placeholder icon...");
    let bytes = png::encode_image(&image, args.compression)?;
    png::write_to_file(&args.output, &bytes)?;
    println!(
        "✓ Generated {} ({width}x{height}, {} bytes)",
        args.output.display(),
        bytes.len()
    );

    Ok(Generated {
        path: args.output,
        width,
        height,
        bytes: bytes.len(),
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            create_dir_all(parent).context("Can't create output directory")
        }
        _ => Ok(()),
    }
}
