//! Procedural renderer for the Word Tower icon
//!
//! An icon is composed back to front onto a fresh canvas: background gradient,
//! the tower of letter blocks, the floating blocks, sparkles and the captions.
//! Every coordinate is derived from the icon edge so each size is drawn natively
//! rather than resampled from a master image.

use crate::fonts::Typeface;
use crate::layout::{Background, Band, Caption, GradientStyle, Layout, Outline, Sparkles};
use crate::shapes::{fill_ellipse, paste, rounded_rect, rounded_rect_outline};
use image::{Rgba, RgbaImage};
use rand::Rng;

/// Shadow offset along both axes, as a fraction of the block edge
pub const SHADOW_OFFSET: f64 = 0.06;

/// Corner radius as a fraction of the block edge
pub const CORNER_RADIUS: f64 = 0.1;

/// Label font size as a fraction of the block edge
pub const LABEL_SIZE: f64 = 0.6;

const LABEL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A square letter block in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub x: i64,
    pub y: i64,
    pub edge: u32,
    pub color: Rgba<u8>,
    pub label: Option<char>,
    pub shadow_alpha: u8,
}

impl Block {
    pub fn radius(&self) -> u32 {
        (self.edge as f64 * CORNER_RADIUS) as u32
    }

    pub fn shadow_offset(&self) -> i64 {
        (self.edge as f64 * SHADOW_OFFSET) as i64
    }

    pub fn label_size(&self) -> f32 {
        (self.edge as f64 * LABEL_SIZE) as u32 as f32
    }
}

/// A gold dot whose bounding box starts at (`x`, `y`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sparkle {
    pub x: u32,
    pub y: u32,
    pub diameter: u32,
}

/// Render the full icon at `size` x `size` pixels
pub fn create_icon<R: Rng + ?Sized>(
    size: u32,
    layout: &Layout,
    typeface: &Typeface,
    rng: &mut R,
) -> RgbaImage {
    let mut canvas = RgbaImage::new(size, size);

    fill_background(&mut canvas, &layout.background);

    for block in tower_blocks(size, layout) {
        draw_block(&mut canvas, &block, layout.tower.outline.as_ref(), typeface);
    }

    for block in floating_blocks(size, layout) {
        draw_block(&mut canvas, &block, layout.floating.outline.as_ref(), typeface);
    }

    let sparkle_color = layout.sparkles.color.0;
    for sparkle in scatter_sparkles(size, &layout.sparkles, rng) {
        fill_ellipse(
            &mut canvas,
            sparkle.x.into(),
            sparkle.y.into(),
            sparkle.diameter,
            sparkle.diameter,
            sparkle_color,
        );
    }

    for caption in &layout.captions {
        draw_caption(&mut canvas, caption, typeface);
    }

    canvas
}

/// `fraction` of `size`, truncated toward zero
pub fn scaled(size: u32, fraction: f64) -> i64 {
    (size as f64 * fraction) as i64
}

/// Offset that centers `content` pixels within `extent` pixels, rounding down
pub fn centered_offset(extent: u32, content: u32) -> i64 {
    (extent as i64 - content as i64).div_euclid(2)
}

/// Color of background row `y`.
///
/// The blend factor grows with the row's vertical distance from the center row,
/// normalized by the half-diagonal; the column never enters into it.
pub fn gradient_row_color(size: u32, y: u32, background: &Background) -> Rgba<u8> {
    let center = (size / 2) as f64;
    blend_stops(background, (center - y as f64).abs(), half_diagonal(size))
}

fn fill_background(canvas: &mut RgbaImage, background: &Background) {
    let size = canvas.width();
    match background.style {
        GradientStyle::Vertical => {
            for y in 0..canvas.height() {
                let color = gradient_row_color(size, y, background);
                for x in 0..size {
                    canvas.put_pixel(x, y, color);
                }
            }
        }
        GradientStyle::Radial => {
            let center = (size / 2) as f64;
            let max_distance = half_diagonal(size);
            for (x, y, pixel) in canvas.enumerate_pixels_mut() {
                let distance = (center - x as f64).hypot(center - y as f64);
                *pixel = blend_stops(background, distance, max_distance);
            }
        }
    }
}

fn half_diagonal(size: u32) -> f64 {
    let half = (size / 2) as f64;
    (half * half * 2.0).sqrt()
}

fn blend_stops(background: &Background, distance: f64, max_distance: f64) -> Rgba<u8> {
    let factor = if max_distance > 0.0 {
        1.0 - distance / max_distance
    } else {
        1.0
    };
    let t = (1.0 - factor).clamp(0.0, 1.0);

    let inner = background.inner.0;
    let outer = background.outer.0;
    let mix = |i: usize| (inner[i] as f64 + (outer[i] as f64 - inner[i] as f64) * t) as u8;
    Rgba([mix(0), mix(1), mix(2), 255])
}

/// The tower blocks, top to bottom, horizontally centered
pub fn tower_blocks(size: u32, layout: &Layout) -> Vec<Block> {
    let tower = &layout.tower;
    let edge = scaled(size, tower.block) as u32;
    let x = (size / 2) as i64 - (edge / 2) as i64;
    let top = scaled(size, tower.top);
    let step = (edge as f64 * tower.step) as i64;

    tower
        .letters
        .chars()
        .enumerate()
        .map(|(i, letter)| Block {
            x,
            y: top.saturating_add(step.saturating_mul(i as i64)),
            edge,
            color: layout.palette_color(i),
            label: Some(letter),
            shadow_alpha: tower.shadow_alpha,
        })
        .collect()
}

/// The smaller blocks scattered around the tower
pub fn floating_blocks(size: u32, layout: &Layout) -> Vec<Block> {
    let tower_edge = scaled(size, layout.tower.block) as u32;
    let edge = (tower_edge as f64 * layout.floating.scale) as u32;

    layout
        .floating
        .blocks
        .iter()
        .map(|block| Block {
            x: scaled(size, block.x),
            y: scaled(size, block.y),
            edge,
            color: layout.palette_color(block.color),
            label: Some(block.letter),
            shadow_alpha: layout.floating.shadow_alpha,
        })
        .collect()
}

/// Shadow, fill, optional outline and centered label of one block
pub fn draw_block(
    canvas: &mut RgbaImage,
    block: &Block,
    outline: Option<&Outline>,
    typeface: &Typeface,
) {
    let radius = block.radius();

    let offset = block.shadow_offset();
    let shadow = rounded_rect(block.edge, block.edge, radius, Rgba([0, 0, 0, block.shadow_alpha]));
    paste(
        canvas,
        &shadow,
        block.x.saturating_add(offset),
        block.y.saturating_add(offset),
    );

    let fill = rounded_rect(block.edge, block.edge, radius, block.color);
    paste(canvas, &fill, block.x, block.y);

    if let Some(outline) = outline {
        let stroke = ((block.edge as f64 * outline.width).round() as u32).max(1);
        let ring = rounded_rect_outline(block.edge, block.edge, radius, stroke, outline.color.0);
        paste(canvas, &ring, block.x, block.y);
    }

    if let Some(letter) = block.label {
        let text = letter.to_string();
        let px = block.label_size();
        let metrics = typeface.measure(&text, px);
        let x = block.x + centered_offset(block.edge, metrics.width);
        let y = block.y + centered_offset(block.edge, metrics.height);
        typeface.draw(canvas, &text, x, y, px, LABEL_COLOR);
    }
}

/// Pixel bounds `(left, top, right, bottom)`, inclusive, of a fractional band
pub fn band_bounds(size: u32, band: &Band) -> (u32, u32, u32, u32) {
    (
        scaled(size, band.left) as u32,
        scaled(size, band.top) as u32,
        scaled(size, band.right) as u32,
        scaled(size, band.bottom) as u32,
    )
}

/// Draw fresh sparkle positions and diameters, uniformly within the band
pub fn scatter_sparkles<R: Rng + ?Sized>(
    size: u32,
    sparkles: &Sparkles,
    rng: &mut R,
) -> Vec<Sparkle> {
    let (left, top, right, bottom) = band_bounds(size, &sparkles.band);
    (0..sparkles.count)
        .map(|_| Sparkle {
            x: rng.gen_range(left..=right),
            y: rng.gen_range(top..=bottom),
            diameter: rng.gen_range(sparkles.min_size..=sparkles.max_size),
        })
        .collect()
}

/// Top-left corner of a caption's inked box: centered horizontally, at its fractional top
pub fn caption_origin(size: u32, caption: &Caption, typeface: &Typeface) -> (i64, i64) {
    let metrics = typeface.measure(&caption.text, caption_size(size, caption));
    (centered_offset(size, metrics.width), scaled(size, caption.top))
}

fn caption_size(size: u32, caption: &Caption) -> f32 {
    scaled(size, caption.size) as f32
}

fn draw_caption(canvas: &mut RgbaImage, caption: &Caption, typeface: &Typeface) {
    let size = canvas.width();
    let (x, y) = caption_origin(size, caption, typeface);
    typeface.draw(
        canvas,
        &caption.text,
        x,
        y,
        caption_size(size, caption),
        caption.color.0,
    );
}
