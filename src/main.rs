use anyhow::Result;
use clap::Parser;
use placeholder_icon::icon_gen::{self, DEFAULT_COLOR, DEFAULT_OUTPUT, DEFAULT_SIZE};
use placeholder_icon::png::CompressionLevel;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "placeholder-icon",
    about = "Generate a uniform-color placeholder PNG icon"
)]
struct Args {
    /// Output file. Parent directories are created as needed.
    #[clap(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Edge length of the square icon in pixels.
    #[clap(short, long, value_name = "PX", default_value_t = DEFAULT_SIZE)]
    size: u32,

    /// Icon width in pixels (defaults to --size)
    #[clap(long, value_name = "PX")]
    width: Option<u32>,

    /// Icon height in pixels (defaults to --size)
    #[clap(long, value_name = "PX")]
    height: Option<u32>,

    /// The fill color (CSS color format)
    #[clap(short, long, default_value = DEFAULT_COLOR)]
    color: String,

    /// Deflate compression level for the image data
    #[clap(long, value_enum, default_value_t = CompressionLevel::Default)]
    compression: CompressionLevel,
}

impl From<Args> for icon_gen::Args {
    fn from(args: Args) -> Self {
        Self {
            output: args.output,
            size: args.size,
            width: args.width,
            height: args.height,
            color: args.color,
            compression: args.compression,
        }
    }
}

fn main() -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    icon_gen::generate_icon(args.into())?;
    Ok(())
}
