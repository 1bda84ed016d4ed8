use image::Rgba;
use rand::{rngs::StdRng, SeedableRng};
use tower_icons::fonts::Typeface;
use tower_icons::layout::{GradientStyle, Layout};
use tower_icons::render::*;
use tower_icons::shapes::rounded_rect;

fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn quiet_layout() -> Layout {
    let mut layout = Layout::builtin().unwrap();
    layout.sparkles.count = 0;
    layout
}

#[test]
fn test_every_size_renders_exact_dimensions() {
    let layout = Layout::builtin().unwrap();
    let face = Typeface::builtin();

    for size in [1, 2, 7, 29, 40, 57, 128, 180] {
        let icon = create_icon(size, &layout, &face, &mut seeded(size as u64));
        assert_eq!(icon.dimensions(), (size, size), "Icon of size {size}");
    }
}

#[test]
fn test_rounded_rect_alpha() {
    let fill = Rgba([69, 183, 209, 180]);
    let patch = rounded_rect(100, 100, 10, fill);
    assert_eq!(patch.dimensions(), (100, 100));

    // Strictly inside the rounded interior
    for (x, y) in [(50, 50), (10, 10), (5, 50), (50, 95), (15, 3)] {
        assert_eq!(*patch.get_pixel(x, y), fill, "Interior pixel ({x}, {y})");
    }

    // Inside the corner squares but beyond the arcs
    for (x, y) in [(0, 0), (1, 1), (99, 0), (0, 99), (99, 99), (2, 0), (98, 99)] {
        assert_eq!(patch.get_pixel(x, y)[3], 0, "Corner pixel ({x}, {y})");
    }
}

#[test]
fn test_vertical_gradient_symmetry() {
    let layout = Layout::builtin().unwrap();
    for size in [29, 128, 512] {
        for y in 0..size {
            let top = gradient_row_color(size, y, &layout.background);
            let bottom = gradient_row_color(size, size - 1 - y, &layout.background);
            for channel in 0..3 {
                let diff = (top[channel] as i32 - bottom[channel] as i32).abs();
                assert!(diff <= 1, "Rows {y} and {} differ by {diff}", size - 1 - y);
            }
            assert_eq!(top[3], 255);
        }
    }
}

#[test]
fn test_gradient_center_row_is_inner_color() {
    let layout = Layout::builtin().unwrap();
    let inner = layout.background.inner.0;
    assert_eq!(gradient_row_color(1024, 512, &layout.background), inner);
    // Edge rows lean toward the outer color
    let edge = gradient_row_color(1024, 0, &layout.background);
    assert!(edge[0] < inner[0] && edge[1] < inner[1]);
}

#[test]
fn test_background_is_independent_of_column() {
    let layout = Layout::builtin().unwrap();
    let face = Typeface::builtin();
    let size = 128;
    let icon = create_icon(size, &layout, &face, &mut seeded(3));

    // The outermost columns are never reached by blocks, sparkles or captions
    for y in 0..size {
        let expected = gradient_row_color(size, y, &layout.background);
        assert_eq!(*icon.get_pixel(0, y), expected, "Left edge row {y}");
        assert_eq!(*icon.get_pixel(size - 1, y), expected, "Right edge row {y}");
    }
}

#[test]
fn test_radial_gradient_varies_along_rows() {
    let mut layout = quiet_layout();
    layout.background.style = GradientStyle::Radial;
    let face = Typeface::builtin();
    let size = 256;
    let icon = create_icon(size, &layout, &face, &mut seeded(0));

    let outer = layout.background.outer.0;
    let corner = icon.get_pixel(0, 0);
    for channel in 0..3 {
        assert!((corner[channel] as i32 - outer[channel] as i32).abs() <= 1);
    }
    // Same row, closer to the center: lighter than the corner
    let middle = icon.get_pixel(size / 2, 0);
    assert!(middle[0] > corner[0]);
}

#[test]
fn test_tower_geometry() {
    let layout = Layout::builtin().unwrap();
    let blocks = tower_blocks(1024, &layout);

    let letters: String = blocks.iter().filter_map(|b| b.label).collect();
    assert_eq!(letters, "WORD");

    for (i, block) in blocks.iter().enumerate() {
        assert_eq!(block.edge, 122);
        assert_eq!(block.x, 512 - 61);
        assert_eq!(block.y, 204 + i as i64 * 134);
        assert_eq!(block.color, layout.palette_color(i));
        assert_eq!(block.shadow_alpha, 50);
        assert_eq!(block.radius(), 12);
        assert_eq!(block.shadow_offset(), 7);
    }
}

#[test]
fn test_floating_geometry() {
    let layout = Layout::builtin().unwrap();
    let blocks = floating_blocks(1024, &layout);

    let letters: String = blocks.iter().filter_map(|b| b.label).collect();
    assert_eq!(letters, "TAESIN");

    let first = &blocks[0];
    assert_eq!(first.edge, 85);
    assert_eq!((first.x, first.y), (153, 307));
    assert_eq!(first.color, layout.palette_color(4));
    assert_eq!(first.shadow_alpha, 40);

    let last = &blocks[5];
    assert_eq!((last.x, last.y), (819, 768));
    assert_eq!(last.color, layout.palette_color(1));
}

#[test]
fn test_blocks_are_composited_with_shadow() {
    let layout = quiet_layout();
    let face = Typeface::builtin();
    let size = 1024;
    let icon = create_icon(size, &layout, &face, &mut seeded(0));
    let block = &tower_blocks(size, &layout)[0];

    // Fill just below the top edge, clear of the centered label
    let fill = icon.get_pixel((block.x + 61) as u32, (block.y + 2) as u32);
    assert_eq!(*fill, block.color);

    // Shadow peeking out to the right of the block
    let sx = (block.x + block.edge as i64 + 3) as u32;
    let sy = (block.y + 61) as u32;
    let shadowed = icon.get_pixel(sx, sy);
    let background = gradient_row_color(size, sy, &layout.background);
    for channel in 0..3 {
        assert!(shadowed[channel] < background[channel]);
    }
    assert_eq!(shadowed[3], 255);
}

#[test]
fn test_block_labels_are_drawn_in_white() {
    let layout = quiet_layout();
    let face = Typeface::builtin();
    let size = 512;
    let icon = create_icon(size, &layout, &face, &mut seeded(0));

    for block in tower_blocks(size, &layout) {
        let white = (0..block.edge)
            .flat_map(|dy| (0..block.edge).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| {
                let pixel = icon.get_pixel(block.x as u32 + dx, block.y as u32 + dy);
                *pixel == Rgba([255, 255, 255, 255])
            })
            .count();
        assert!(white > 0, "Block {:?} should carry a label", block.label);
    }
}

#[test]
fn test_outline_is_drawn_when_configured() {
    let mut layout = quiet_layout();
    let outline = r##"{ "color": "#000", "width": 0.03 }"##;
    layout.tower.outline = Some(serde_json::from_str(outline).unwrap());
    let face = Typeface::builtin();
    let icon = create_icon(1024, &layout, &face, &mut seeded(0));

    let block = &tower_blocks(1024, &layout)[1];
    let edge_pixel = icon.get_pixel((block.x + 61) as u32, (block.y + 1) as u32);
    assert_eq!(*edge_pixel, Rgba([0, 0, 0, 255]));
}

#[test]
fn test_caption_is_horizontally_centered() {
    let layout = Layout::builtin().unwrap();
    let face = Typeface::builtin();

    for size in [1024, 512, 180, 57] {
        for caption in &layout.captions {
            let px = (size as f64 * caption.size) as i64 as f32;
            let width = face.measure(&caption.text, px).width as i64;
            let (x, y) = caption_origin(size, caption, &face);
            assert_eq!(x, (size as i64 - width).div_euclid(2), "{} at {size}", caption.text);
            assert_eq!(y, (size as f64 * caption.top) as i64);
        }
    }
}

#[test]
fn test_caption_ink_starts_at_origin() {
    let layout = quiet_layout();
    let face = Typeface::builtin();
    let size = 1024;
    let icon = create_icon(size, &layout, &face, &mut seeded(0));

    // "TOWER" starts with the full-width bar of the T
    let title = &layout.captions[0];
    let (x, y) = caption_origin(size, title, &face);
    assert_eq!(*icon.get_pixel(x as u32, y as u32), title.color.0);
}

#[test]
fn test_sparkles_stay_inside_band() {
    let layout = Layout::builtin().unwrap();
    let sparkles = &layout.sparkles;

    for size in [29, 57, 128, 1024] {
        let (left, top, right, bottom) = band_bounds(size, &sparkles.band);
        for seed in 0..200 {
            let scattered = scatter_sparkles(size, sparkles, &mut seeded(seed));
            assert_eq!(scattered.len(), 20);
            for sparkle in scattered {
                assert!((left..=right).contains(&sparkle.x), "x {} at {size}", sparkle.x);
                assert!((top..=bottom).contains(&sparkle.y), "y {} at {size}", sparkle.y);
                assert!((3..=8).contains(&sparkle.diameter));
            }
        }
    }
}

#[test]
fn test_sparkle_band_bounds() {
    let layout = Layout::builtin().unwrap();
    assert_eq!(band_bounds(1024, &layout.sparkles.band), (307, 153, 716, 665));
    assert_eq!(band_bounds(1000, &layout.sparkles.band), (300, 150, 700, 650));
}

#[test]
fn test_centered_offset_rounds_down() {
    assert_eq!(centered_offset(100, 40), 30);
    assert_eq!(centered_offset(100, 41), 29);
    assert_eq!(centered_offset(3, 5), -1);
    assert_eq!(scaled(1024, 0.12), 122);
}
