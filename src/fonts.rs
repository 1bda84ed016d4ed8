//! Font resolution and text rasterization
//!
//! Fonts are looked up through a [`FontChain`]: an ordered list of sources tried
//! until one yields a parsable font. When none does, the chain falls back to a
//! small built-in bitmap face so text can always be drawn.

use image::{Pixel, Rgba, RgbaImage};
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Font files tried, in order, before any directory search
const PLATFORM_FONT_FILES: &[&str] = &[
    "/System/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

/// File names searched for under the system font directories
const GENERIC_FONT_NAMES: &[&str] = &["arial.ttf", "DejaVuSans.ttf", "LiberationSans-Regular.ttf"];

/// Width of a built-in glyph cell in font units, including one column of spacing
const BITMAP_ADVANCE: i64 = 6;
const BITMAP_ROWS: usize = 7;

/// Somewhere a font may be found
pub trait FontSource {
    /// Try to produce a typeface; `None` moves the chain on to the next source
    fn load(&self) -> Option<Typeface>;
}

/// A font file at a fixed path
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FontSource for FontFile {
    fn load(&self) -> Option<Typeface> {
        let data = std::fs::read(&self.path).ok()?;
        let font = Font::try_from_vec(data)?;
        Some(Typeface::Outline {
            font,
            origin: self.path.display().to_string(),
        })
    }
}

/// A font file looked up by name (case-insensitively) below a set of directories
pub struct FontName {
    file_name: String,
    search_dirs: Vec<PathBuf>,
}

impl FontName {
    pub fn new(file_name: impl Into<String>, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            search_dirs,
        }
    }

    /// Search the usual per-platform and per-user font directories
    pub fn system(file_name: impl Into<String>) -> Self {
        Self::new(file_name, system_font_dirs())
    }

    fn find(&self) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .flat_map(|dir| WalkDir::new(dir).follow_links(true).into_iter())
            .filter_map(|entry| entry.ok())
            .find(|entry| {
                entry.file_type().is_file()
                    && entry
                        .file_name()
                        .to_string_lossy()
                        .eq_ignore_ascii_case(&self.file_name)
            })
            .map(|entry| entry.into_path())
    }
}

impl FontSource for FontName {
    fn load(&self) -> Option<Typeface> {
        FontFile::new(self.find()?).load()
    }
}

fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/System/Library/Fonts",
        "/Library/Fonts",
        "C:\\Windows\\Fonts",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();

    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join("Library/Fonts"));
    }
    dirs
}

/// Ordered font lookup ending in the built-in bitmap face
#[derive(Default)]
pub struct FontChain {
    sources: Vec<Box<dyn FontSource>>,
}

impl FontChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl FontSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// `extra` font files first, then well-known platform paths, then a search
    /// of the system font directories for common sans-serif faces.
    pub fn standard(extra: &[PathBuf]) -> Self {
        let mut chain = Self::new();
        for path in extra {
            chain = chain.with_source(FontFile::new(path));
        }
        for path in PLATFORM_FONT_FILES {
            chain = chain.with_source(FontFile::new(*path));
        }
        for name in GENERIC_FONT_NAMES {
            chain = chain.with_source(FontName::system(*name));
        }
        chain
    }

    pub fn resolve(&self) -> Typeface {
        self.sources
            .iter()
            .find_map(|source| source.load())
            .unwrap_or(Typeface::Builtin)
    }
}

/// Size of the inked area of a rendered string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    pub width: u32,
    pub height: u32,
}

/// Inked bounds of a string laid out from the origin, in pixels
#[derive(Debug, Clone, Copy)]
struct InkBox {
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
}

impl InkBox {
    fn metrics(&self) -> TextMetrics {
        TextMetrics {
            width: (self.max_x - self.min_x) as u32,
            height: (self.max_y - self.min_y) as u32,
        }
    }

    fn union(this: Option<InkBox>, other: InkBox) -> InkBox {
        match this {
            None => other,
            Some(b) => InkBox {
                min_x: b.min_x.min(other.min_x),
                min_y: b.min_y.min(other.min_y),
                max_x: b.max_x.max(other.max_x),
                max_y: b.max_y.max(other.max_y),
            },
        }
    }
}

/// A resolved font able to measure and draw text at any pixel size
pub enum Typeface {
    Outline { font: Font<'static>, origin: String },
    Builtin,
}

impl Typeface {
    pub fn builtin() -> Self {
        Typeface::Builtin
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Typeface::Builtin)
    }

    /// Where the face came from, for progress output
    pub fn describe(&self) -> String {
        match self {
            Typeface::Outline { origin, .. } => origin.clone(),
            Typeface::Builtin => "built-in bitmap font".to_string(),
        }
    }

    /// Measure the inked bounding box of `text` at `px` pixels
    pub fn measure(&self, text: &str, px: f32) -> TextMetrics {
        self.ink_box(text, px)
            .map(|ink| ink.metrics())
            .unwrap_or_default()
    }

    /// Draw `text` so that the top-left corner of its inked box lands on (`x`, `y`).
    /// Coverage is alpha-blended over the canvas and clipped at its edges.
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: i64,
        y: i64,
        px: f32,
        color: Rgba<u8>,
    ) {
        let Some(ink) = self.ink_box(text, px) else {
            return;
        };

        match self {
            Typeface::Outline { font, .. } => {
                for glyph in layout_outline(font, text, px) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, v| {
                        let cx = x + bb.min.x as i64 + gx as i64 - ink.min_x;
                        let cy = y + bb.min.y as i64 + gy as i64 - ink.min_y;
                        blend(canvas, cx, cy, color, v);
                    });
                }
            }
            Typeface::Builtin => {
                let k = bitmap_scale(px);
                for (cx, cy) in bitmap_cells(text) {
                    let left = x + cx * k - ink.min_x;
                    let top = y + cy * k - ink.min_y;
                    for dy in 0..k {
                        for dx in 0..k {
                            blend(canvas, left + dx, top + dy, color, 1.0);
                        }
                    }
                }
            }
        }
    }

    fn ink_box(&self, text: &str, px: f32) -> Option<InkBox> {
        if px < 1.0 {
            return None;
        }

        match self {
            Typeface::Outline { font, .. } => layout_outline(font, text, px)
                .into_iter()
                .filter_map(|glyph| glyph.pixel_bounding_box())
                .map(|bb| InkBox {
                    min_x: bb.min.x as i64,
                    min_y: bb.min.y as i64,
                    max_x: bb.max.x as i64,
                    max_y: bb.max.y as i64,
                })
                .fold(None, |acc, b| Some(InkBox::union(acc, b))),
            Typeface::Builtin => {
                let k = bitmap_scale(px);
                bitmap_cells(text)
                    .map(|(cx, cy)| InkBox {
                        min_x: cx * k,
                        min_y: cy * k,
                        max_x: (cx + 1) * k,
                        max_y: (cy + 1) * k,
                    })
                    .fold(None, |acc, b| Some(InkBox::union(acc, b)))
            }
        }
    }
}

fn layout_outline<'font>(font: &Font<'font>, text: &str, px: f32) -> Vec<PositionedGlyph<'font>> {
    let scale = Scale::uniform(px);
    let ascent = font.v_metrics(scale).ascent;
    font.layout(text, scale, point(0.0, ascent)).collect()
}

fn blend(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = (color[3] as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
    if alpha == 0 {
        return;
    }
    canvas
        .get_pixel_mut(x as u32, y as u32)
        .blend(&Rgba([color[0], color[1], color[2], alpha]));
}

/// Integer magnification of the 5x7 face for a requested pixel size
fn bitmap_scale(px: f32) -> i64 {
    ((px / 10.0).round() as i64).max(1)
}

/// Every inked cell of `text` in the built-in face, as (column, row) font units
fn bitmap_cells(text: &str) -> impl Iterator<Item = (i64, i64)> + '_ {
    text.chars().enumerate().flat_map(|(index, ch)| {
        let rows = bitmap_glyph(ch).unwrap_or([0; BITMAP_ROWS]);
        (0..BITMAP_ROWS).flat_map(move |row| {
            (0..5).filter_map(move |col| {
                let lit = rows[row] & (0b10000 >> col) != 0;
                lit.then_some((index as i64 * BITMAP_ADVANCE + col, row as i64))
            })
        })
    })
}

#[rustfmt::skip]
fn bitmap_glyph(ch: char) -> Option<[u8; BITMAP_ROWS]> {
    let rows = match ch {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        'a' => [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111],
        'b' => [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b11110],
        'c' => [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110],
        'd' => [0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111],
        'e' => [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        'f' => [0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000],
        'g' => [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        'h' => [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
        'i' => [0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110],
        'j' => [0b00010, 0b00000, 0b00110, 0b00010, 0b00010, 0b10010, 0b01100],
        'k' => [0b10000, 0b10000, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010],
        'l' => [0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'm' => [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001],
        'n' => [0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
        'o' => [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'p' => [0b00000, 0b00000, 0b11110, 0b10001, 0b11110, 0b10000, 0b10000],
        'q' => [0b00000, 0b00000, 0b01101, 0b10011, 0b01111, 0b00001, 0b00001],
        'r' => [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000],
        's' => [0b00000, 0b00000, 0b01110, 0b10000, 0b01110, 0b00001, 0b11110],
        't' => [0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110],
        'u' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101],
        'v' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'w' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010],
        'x' => [0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
        'y' => [0b00000, 0b00000, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        'z' => [0b00000, 0b00000, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        _ => return None,
    };
    Some(rows)
}
