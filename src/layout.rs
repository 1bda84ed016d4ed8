//! Declarative scene description for the Word Tower icon
//!
//! Every shape and caption the renderer draws is described here as plain data:
//! palette, background gradient, the tower of letter blocks, the floating blocks,
//! the sparkle band and the caption lines. The built-in scene is an embedded JSON
//! document; a replacement can be loaded from disk with [`Layout::from_file`].

use anyhow::{Context, Result};
use image::Rgba;
use serde::Deserialize;
use std::{path::Path, str::FromStr};

/// Largest accepted distance between tower block tops, in block edges
const MAX_TOWER_STEP: f64 = 10.0;

/// Largest accepted sparkle diameter in pixels
pub const MAX_SPARKLE_SIZE: u32 = 1024;

const DEFAULT_LAYOUT: &str = r##"
{
  "palette": [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4",
    "#FECA57", "#FF9FF3", "#54A0FF", "#5F27CD"
  ],
  "background": { "inner": "#E3F2FD", "outer": "#BBDEFB", "style": "vertical" },
  "tower": {
    "letters": "WORD",
    "block": 0.12,
    "top": 0.2,
    "step": 1.1,
    "shadow_alpha": 50
  },
  "floating": {
    "scale": 0.7,
    "shadow_alpha": 40,
    "blocks": [
      { "letter": "T", "x": 0.15, "y": 0.3,  "color": 4 },
      { "letter": "A", "x": 0.76, "y": 0.25, "color": 5 },
      { "letter": "E", "x": 0.2,  "y": 0.6,  "color": 6 },
      { "letter": "S", "x": 0.73, "y": 0.55, "color": 7 },
      { "letter": "I", "x": 0.12, "y": 0.75, "color": 0 },
      { "letter": "N", "x": 0.8,  "y": 0.75, "color": 1 }
    ]
  },
  "sparkles": {
    "count": 20,
    "color": "#FFD700",
    "min_size": 3,
    "max_size": 8,
    "band": { "left": 0.3, "top": 0.15, "right": 0.7, "bottom": 0.65 }
  },
  "captions": [
    { "text": "TOWER", "size": 0.06, "top": 0.87, "color": "#2C3E50" },
    { "text": "Word Game", "size": 0.03, "top": 0.93, "color": "#7F8C8D" }
  ]
}
"##;

/// An RGBA color parsed from a CSS color string such as `#FECA57`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct Color(pub Rgba<u8>);

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let color = css_color::Srgb::from_str(s)
            .map_err(|_| anyhow::anyhow!("Invalid CSS color: {s}"))?;
        Ok(Color(Rgba([
            channel(color.red),
            channel(color.green),
            channel(color.blue),
            channel(color.alpha),
        ])))
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Root of a scene description
#[derive(Deserialize, Debug, Clone)]
pub struct Layout {
    /// Block colors, indexed modulo their count
    pub palette: Vec<Color>,

    pub background: Background,

    /// The vertical stack of letter blocks in the middle of the icon
    pub tower: Tower,

    /// Smaller letter blocks scattered around the tower
    pub floating: Floating,

    pub sparkles: Sparkles,

    /// Centered text lines, drawn top to bottom in declaration order
    #[serde(default)]
    pub captions: Vec<Caption>,
}

/// Two-stop background gradient
#[derive(Deserialize, Debug, Clone)]
pub struct Background {
    /// Color at the center of the icon
    pub inner: Color,

    /// Color at the half-diagonal distance from the center
    pub outer: Color,

    #[serde(default)]
    pub style: GradientStyle,
}

/// How the distance driving the background blend is measured
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GradientStyle {
    /// Only the vertical distance from the center row counts, giving horizontal bands
    #[default]
    Vertical,

    /// Full euclidean distance from the center pixel
    Radial,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Tower {
    /// One block per character, top to bottom
    pub letters: String,

    /// Block edge as a fraction of the icon edge
    pub block: f64,

    /// Top of the first block as a fraction of the icon edge
    pub top: f64,

    /// Distance between consecutive block tops, in block edges
    pub step: f64,

    pub shadow_alpha: u8,

    #[serde(default)]
    pub outline: Option<Outline>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Floating {
    /// Block edge relative to a tower block
    pub scale: f64,

    pub shadow_alpha: u8,

    pub blocks: Vec<FloatingBlock>,

    #[serde(default)]
    pub outline: Option<Outline>,
}

/// A single floating block placed at fractional icon coordinates
#[derive(Deserialize, Debug, Clone)]
pub struct FloatingBlock {
    pub letter: char,
    pub x: f64,
    pub y: f64,

    /// Palette index
    pub color: usize,
}

/// Stroke drawn around a block after its fill
#[derive(Deserialize, Debug, Clone)]
pub struct Outline {
    pub color: Color,

    /// Stroke width as a fraction of the block edge
    pub width: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Sparkles {
    pub count: u32,
    pub color: Color,

    /// Smallest sparkle diameter in pixels
    pub min_size: u32,

    /// Largest sparkle diameter in pixels
    pub max_size: u32,

    /// Region the sparkle origins are drawn from
    pub band: Band,
}

/// Rectangle in fractions of the icon edge
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Band {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Caption {
    pub text: String,

    /// Font size as a fraction of the icon edge
    pub size: f64,

    /// Top of the text line as a fraction of the icon edge
    pub top: f64,

    pub color: Color,
}

impl Layout {
    /// The scene drawn when no layout file is given
    pub fn builtin() -> Result<Self> {
        Self::from_json(DEFAULT_LAYOUT).context("Built-in layout is invalid")
    }

    /// Parses and validates a layout from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: Layout = serde_json::from_str(json).context("Failed to parse layout JSON")?;
        layout.validate()?;
        Ok(layout)
    }

    /// Reads a layout file from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid layout file {}", path.display()))
    }

    /// Palette entry for `index`, cycling through the palette
    pub fn palette_color(&self, index: usize) -> Rgba<u8> {
        self.palette[index % self.palette.len()].0
    }

    fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            anyhow::bail!("palette must contain at least one color");
        }

        ensure_within("tower.block", self.tower.block, 0.0, 1.0)?;
        ensure_within("tower.top", self.tower.top, 0.0, 1.0)?;
        ensure_within("tower.step", self.tower.step, 0.0, MAX_TOWER_STEP)?;
        ensure_within("floating.scale", self.floating.scale, 0.0, 1.0)?;
        for (i, block) in self.floating.blocks.iter().enumerate() {
            ensure_within(&format!("floating.blocks[{i}].x"), block.x, 0.0, 1.0)?;
            ensure_within(&format!("floating.blocks[{i}].y"), block.y, 0.0, 1.0)?;
        }

        let sparkles = &self.sparkles;
        if sparkles.min_size > sparkles.max_size {
            anyhow::bail!(
                "sparkles.min_size ({}) must not exceed sparkles.max_size ({})",
                sparkles.min_size,
                sparkles.max_size
            );
        }
        if sparkles.max_size > MAX_SPARKLE_SIZE {
            anyhow::bail!(
                "sparkles.max_size must be at most {MAX_SPARKLE_SIZE}, got {}",
                sparkles.max_size
            );
        }

        let band = sparkles.band;
        ensure_within("sparkles.band.left", band.left, 0.0, 1.0)?;
        ensure_within("sparkles.band.top", band.top, 0.0, 1.0)?;
        ensure_within("sparkles.band.right", band.right, 0.0, 1.0)?;
        ensure_within("sparkles.band.bottom", band.bottom, 0.0, 1.0)?;
        if band.left > band.right || band.top > band.bottom {
            anyhow::bail!("sparkles.band must have left <= right and top <= bottom");
        }

        for (section, outline) in [
            ("tower", &self.tower.outline),
            ("floating", &self.floating.outline),
        ] {
            if let Some(outline) = outline {
                ensure_within(&format!("{section}.outline.width"), outline.width, 0.0, 0.5)?;
            }
        }

        for (i, caption) in self.captions.iter().enumerate() {
            ensure_within(&format!("captions[{i}].size"), caption.size, 0.0, 1.0)?;
            ensure_within(&format!("captions[{i}].top"), caption.top, 0.0, 1.0)?;
        }

        Ok(())
    }
}

fn ensure_within(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !(min..=max).contains(&value) {
        anyhow::bail!("{field} must lie within [{min}, {max}], got {value}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_layout_parses() {
        let layout = Layout::builtin().unwrap();
        assert_eq!(layout.palette.len(), 8);
        assert_eq!(layout.tower.letters, "WORD");
        assert_eq!(layout.floating.blocks.len(), 6);
        assert_eq!(layout.sparkles.count, 20);
        assert_eq!(layout.captions.len(), 2);
        assert_eq!(layout.background.style, GradientStyle::Vertical);
        assert!(layout.tower.outline.is_none());
    }

    #[test]
    fn test_css_colors() {
        assert_eq!("#FF6B6B".parse::<Color>().unwrap().0, Rgba([255, 107, 107, 255]));
        assert_eq!("#E3F2FD".parse::<Color>().unwrap().0, Rgba([227, 242, 253, 255]));
        assert_eq!("#fff".parse::<Color>().unwrap().0, Rgba([255, 255, 255, 255]));
        assert!("not-a-color".parse::<Color>().is_err());
    }

    #[test]
    fn test_palette_cycles() {
        let layout = Layout::builtin().unwrap();
        assert_eq!(layout.palette_color(0), layout.palette_color(8));
        assert_eq!(layout.palette_color(3), layout.palette_color(19));
    }
}
