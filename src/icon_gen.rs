use crate::fonts::{FontChain, Typeface};
use crate::layout::{GradientStyle, Layout};
use crate::render::create_icon;
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, RgbaImage,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    fs::create_dir_all,
    io::Write,
    path::{Path, PathBuf},
};

/// Edge lengths written as `icon-<N>x<N>.png` when no custom list is given
pub const DEFAULT_SIZES: [u32; 18] = [
    1024, 512, 192, 180, 167, 152, 144, 128, 120, 114, 96, 76, 72, 60, 57, 48, 40, 29,
];

/// Edge length of the app, adaptive and splash icons
pub const ROLE_SIZE: u32 = 1024;

/// File names of the role icons, all copies of one [`ROLE_SIZE`] render
pub const ROLE_FILES: [&str; 3] = ["icon.png", "adaptive-icon.png", "splash-icon.png"];

// Options struct for library callers; the binary fills it from the command line
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub output: PathBuf,
    pub sizes: Option<Vec<u32>>,
    pub seed: Option<u64>,
    pub fonts: Vec<PathBuf>,
    pub layout: Option<PathBuf>,
    pub radial: bool,
    pub no_roles: bool,
}

/// File name of the sized icon for `size`
pub fn sized_file_name(size: u32) -> String {
    format!("icon-{size}x{size}.png")
}

/// Render every requested size plus the role icons, returning the written paths in order
pub fn generate_icons(options: Options) -> Result<Vec<PathBuf>> {
    let sizes = options.sizes.as_deref().unwrap_or(&DEFAULT_SIZES[..]);
    if sizes.contains(&0) {
        anyhow::bail!("Icon sizes must be at least 1 pixel");
    }

    let mut layout = match &options.layout {
        Some(path) => Layout::from_file(path)?,
        None => Layout::builtin()?,
    };
    if options.radial {
        layout.background.style = GradientStyle::Radial;
    }

    // Ensure the output directory exists
    create_dir_all(&options.output).context("Can't create output directory")?;

    let typeface = FontChain::standard(&options.fonts).resolve();
    println!("Using font: {}", typeface.describe());

    println!("Generating Word Tower app icons...");
    let mut written = Vec::new();
    for &size in sizes {
        println!("Creating {size}x{size} icon...");
        let icon = render(size, &layout, &typeface, options.seed);
        let path = options.output.join(sized_file_name(size));
        save_png(&icon, &path)?;
        println!("  ✓ Generated {}", sized_file_name(size));
        written.push(path);
    }

    if !options.no_roles {
        written.extend(generate_role_icons(&layout, &typeface, &options)?);
    }

    println!("✓ All icons generated in {}", options.output.display());
    Ok(written)
}

fn generate_role_icons(
    layout: &Layout,
    typeface: &Typeface,
    options: &Options,
) -> Result<Vec<PathBuf>> {
    println!("Creating main app icons...");

    // One render, encoded once, shared by every role
    let icon = render(ROLE_SIZE, layout, typeface, options.seed);
    let mut buf = Vec::new();
    write_png(icon.as_raw(), &mut buf, ROLE_SIZE)?;

    let mut written = Vec::new();
    for name in ROLE_FILES {
        let path = options.output.join(name);
        std::fs::write(&path, &buf).with_context(|| format!("Failed to write {name}"))?;
        println!("  ✓ Generated {name}");
        written.push(path);
    }
    Ok(written)
}

fn render(size: u32, layout: &Layout, typeface: &Typeface, seed: Option<u64>) -> RgbaImage {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    create_icon(size, layout, typeface, &mut rng)
}

fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    write_png(image.as_raw(), &mut buf, image.width())?;
    std::fs::write(path, buf)
        .with_context(|| format!("Failed to write PNG {}", path.display()))
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, size: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, size, size, ColorType::Rgba8)?;
    Ok(())
}
