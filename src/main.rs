use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tower_icons::icon_gen::{self, Options};

#[derive(Debug, Parser)]
#[clap(
    name = "tower-icons",
    about = "Render the Word Tower app icon at every store and launcher size"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Custom icon sizes to render. When set, only these sizes are generated.
    #[clap(
        short,
        long,
        value_delimiter = ',',
        value_name = "SIZES",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    sizes: Option<Vec<u32>>,

    /// Seed for sparkle placement, making every run byte-for-byte reproducible
    #[clap(long)]
    seed: Option<u64>,

    /// Font file to try before the system fonts (repeatable)
    #[clap(long = "font", value_name = "PATH")]
    fonts: Vec<PathBuf>,

    /// JSON layout file replacing the built-in scene
    #[clap(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Shade the background with a true radial gradient instead of horizontal bands
    #[clap(long)]
    radial: bool,

    /// Skip icon.png, adaptive-icon.png and splash-icon.png
    #[clap(long)]
    no_roles: bool,
}

impl From<Args> for Options {
    fn from(args: Args) -> Self {
        Options {
            output: args.output,
            sizes: args.sizes,
            seed: args.seed,
            fonts: args.fonts,
            layout: args.layout,
            radial: args.radial,
            no_roles: args.no_roles,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    icon_gen::generate_icons(args.into())?;
    Ok(())
}
