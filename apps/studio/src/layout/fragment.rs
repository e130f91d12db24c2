//! The rendered page: a flat list of positioned drawables in CSS pixels.
//!
//! A `Fragment` is what every template returns. It is sized to the physical A4
//! width and grows downward with the content; nothing in it depends on where it
//! will be shown. The preview scales it, the exporter rasterizes it.

use serde::Serialize;

use crate::layout::font_metrics::{FontFamily, FontWeight};

/// CSS pixels per millimetre at 96 dpi.
pub const PX_PER_MM: f32 = 96.0 / 25.4;

/// 210 mm at 96 dpi, rounded the way browsers lay out a `210mm` box.
pub const A4_WIDTH_PX: f32 = 794.0;

/// 297 mm at 96 dpi, rounded.
pub const A4_HEIGHT_PX: f32 = 1123.0;

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font: FontFamily,
    pub size_px: f32,
    pub weight: FontWeight,
    pub fill: String,
    /// Extra tracking in em, as `tracking-wider` / `tracking-widest` would add.
    pub letter_spacing_em: f32,
    pub uppercase: bool,
    pub line_height: f32,
}

impl TextStyle {
    pub fn new(font: FontFamily, size_px: f32, weight: FontWeight, fill: &str) -> Self {
        Self {
            font,
            size_px,
            weight,
            fill: fill.to_string(),
            letter_spacing_em: 0.0,
            uppercase: false,
            line_height: 1.45,
        }
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn tracking(mut self, em: f32) -> Self {
        self.letter_spacing_em = em;
        self
    }

    pub fn line_height(mut self, factor: f32) -> Self {
        self.line_height = factor;
        self
    }

    pub fn line_advance(&self) -> f32 {
        self.size_px * self.line_height
    }

    /// The string as it will be painted.
    pub fn display_text(&self, text: &str) -> String {
        if self.uppercase {
            text.to_uppercase()
        } else {
            text.to_string()
        }
    }
}

/// One painted line of text. `y` is the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub anchor: TextAnchor,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: String,
        width: f32,
    },
    Dot {
        cx: f32,
        cy: f32,
        r: f32,
        fill: String,
    },
    /// Circular-cropped profile photo. `href` is the data-URI from the résumé.
    Photo {
        cx: f32,
        cy: f32,
        r: f32,
        href: String,
        border: Option<(String, f32)>,
    },
    Text(TextRun),
}

/// A vertical range that must not be split across pages (an entry, or a section
/// header glued to its first entry).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Block {
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub template_id: String,
    pub width: f32,
    pub height: f32,
    /// Resolved accent hex used by the template.
    pub accent: String,
    pub export_mode: bool,
    pub background: String,
    pub elements: Vec<Element>,
    pub blocks: Vec<Block>,
}

impl Fragment {
    /// All text in paint order, one run per line.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn width_mm(&self) -> f32 {
        self.width / PX_PER_MM
    }

    pub fn height_mm(&self) -> f32 {
        self.height / PX_PER_MM
    }
}

#[cfg(test)]
impl Fragment {
    /// Plain-text content, lines joined by `\n`. Reflects the source strings, not their
    /// uppercase presentation, so it reads like the DOM's text content.
    pub fn text_content(&self) -> String {
        self.text_runs().map(|r| r.text.as_str()).collect::<Vec<_>>().join("\n")
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.text_runs().any(|r| r.text.contains(needle))
    }

    pub fn has_photo(&self) -> bool {
        self.elements.iter().any(|e| matches!(e, Element::Photo { .. }))
    }
}
