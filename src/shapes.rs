//! Raster primitives: rounded rectangles, their outlines and filled ellipses

use image::{imageops, Rgba, RgbaImage};

/// Build a `width` x `height` patch filled with `fill`, whose alpha is shaped as
/// a rounded rectangle with the given corner radius.
///
/// Pixels inside the rounded shape carry the fill's own alpha, pixels beyond the
/// corner arcs are fully transparent, and the one-pixel rim along each arc is
/// anti-aliased.
pub fn rounded_rect(width: u32, height: u32, radius: u32, fill: Rgba<u8>) -> RgbaImage {
    let mut patch = RgbaImage::from_pixel(width, height, fill);
    apply_rounded_mask(&mut patch, radius);
    patch
}

/// Like [`rounded_rect`] but only the band of `stroke` pixels inside the edge is painted
pub fn rounded_rect_outline(
    width: u32,
    height: u32,
    radius: u32,
    stroke: u32,
    color: Rgba<u8>,
) -> RgbaImage {
    let mut patch = rounded_rect(width, height, radius, color);
    if stroke == 0 {
        for pixel in patch.pixels_mut() {
            pixel[3] = 0;
        }
        return patch;
    }

    let inner_w = width.saturating_sub(stroke.saturating_mul(2));
    let inner_h = height.saturating_sub(stroke.saturating_mul(2));
    if inner_w == 0 || inner_h == 0 {
        return patch;
    }

    let inner_radius = radius.saturating_sub(stroke);
    for y in 0..inner_h {
        for x in 0..inner_w {
            let hole = coverage(x, y, inner_w, inner_h, inner_radius);
            let pixel = patch.get_pixel_mut(x + stroke, y + stroke);
            pixel[3] = (pixel[3] as f32 * (1.0 - hole)).round() as u8;
        }
    }
    patch
}

/// Composite `patch` onto `canvas` with its top-left corner at (`x`, `y`).
/// Parts falling outside the canvas are clipped.
pub fn paste(canvas: &mut RgbaImage, patch: &RgbaImage, x: i64, y: i64) {
    imageops::overlay(canvas, patch, x, y);
}

/// Fill the ellipse inscribed in the inclusive box from (`x`, `y`) to
/// (`x + width`, `y + height`), overwriting the covered pixels.
pub fn fill_ellipse(
    canvas: &mut RgbaImage,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
    color: Rgba<u8>,
) {
    let rx = (width as f32 + 1.0) / 2.0;
    let ry = (height as f32 + 1.0) / 2.0;
    let cx = x as f32 + rx;
    let cy = y as f32 + ry;

    // Only the part of the box that overlaps the canvas is visited
    let x_range = x.max(0)..=x.saturating_add(width.into()).min(canvas.width() as i64 - 1);
    let y_range = y.max(0)..=y.saturating_add(height.into()).min(canvas.height() as i64 - 1);

    for py in y_range {
        for px in x_range.clone() {
            let dx = (px as f32 + 0.5 - cx) / rx;
            let dy = (py as f32 + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                canvas.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

fn apply_rounded_mask(patch: &mut RgbaImage, radius: u32) {
    let (width, height) = patch.dimensions();
    for (x, y, pixel) in patch.enumerate_pixels_mut() {
        let coverage = coverage(x, y, width, height, radius);
        if coverage < 1.0 {
            pixel[3] = (pixel[3] as f32 * coverage).round() as u8;
        }
    }
}

/// Fraction of pixel (`x`, `y`) covered by a `width` x `height` rounded rectangle
fn coverage(x: u32, y: u32, width: u32, height: u32, radius: u32) -> f32 {
    let radius = radius.min(width / 2).min(height / 2);
    if radius == 0 {
        return 1.0;
    }

    let r = radius as f32;
    let px = x as f32 + 0.5;
    let py = y as f32 + 0.5;

    // Distance from the pixel center to the rectangle shrunk by the radius
    let dx = px - px.clamp(r, width as f32 - r);
    let dy = py - py.clamp(r, height as f32 - r);
    if dx == 0.0 || dy == 0.0 {
        return 1.0;
    }
    let distance = (dx * dx + dy * dy).sqrt();

    (r - distance + 0.5).clamp(0.0, 1.0)
}
