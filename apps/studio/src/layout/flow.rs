//! Vertical flow primitives shared by the templates.
//!
//! A `Column` is a cursor moving down a fixed-width strip of the page; it wraps
//! text with the font-metric tables and paints into a `Canvas`. Templates are
//! written as a sequence of column operations, the way the HTML versions are a
//! sequence of block elements.

use crate::layout::font_metrics::get_metrics;
use crate::layout::fragment::{Block, Element, Fragment, TextAnchor, TextRun, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Accumulates painted elements and unbreakable blocks for one fragment.
#[derive(Debug, Default)]
pub struct Canvas {
    elements: Vec<Element>,
    blocks: Vec<Block>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: &str) {
        self.push(Element::Rect { x, y, w, h, fill: fill.to_string() });
    }

    pub fn hline(&mut self, x1: f32, x2: f32, y: f32, stroke: &str, width: f32) {
        self.push(Element::Line { x1, y1: y, x2, y2: y, stroke: stroke.to_string(), width });
    }

    pub fn vline(&mut self, x: f32, y1: f32, y2: f32, stroke: &str, width: f32) {
        self.push(Element::Line { x1: x, y1, x2: x, y2, stroke: stroke.to_string(), width });
    }

    pub fn photo(&mut self, cx: f32, cy: f32, r: f32, href: &str, border: Option<(&str, f32)>) {
        self.push(Element::Photo {
            cx,
            cy,
            r,
            href: href.to_string(),
            border: border.map(|(color, w)| (color.to_string(), w)),
        });
    }

    /// Marks `[top, bottom)` as a range pagination must not cut through.
    pub fn keep_together(&mut self, top: f32, bottom: f32) {
        if bottom > top {
            self.blocks.push(Block { top, bottom });
        }
    }

    /// Inserts full-height backgrounds (sidebars) beneath everything painted so far.
    pub fn underlay(&mut self, elements: Vec<Element>) {
        let mut rest = std::mem::take(&mut self.elements);
        self.elements = elements;
        self.elements.append(&mut rest);
    }

    pub fn finish(
        self,
        template_id: &str,
        accent: &str,
        export_mode: bool,
        width: f32,
        height: f32,
        background: &str,
    ) -> Fragment {
        Fragment {
            template_id: template_id.to_string(),
            width,
            height,
            accent: accent.to_string(),
            export_mode,
            background: background.to_string(),
            elements: self.elements,
            blocks: self.blocks,
        }
    }
}

/// A cursor over a vertical strip `[x, x + width)` of the page.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub x: f32,
    pub width: f32,
    pub y: f32,
}

impl Column {
    pub fn new(x: f32, width: f32, top: f32) -> Self {
        Self { x, width, y: top }
    }

    pub fn gap(&mut self, px: f32) {
        self.y += px;
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Wraps `text` to the column width and paints one run per line.
    /// Returns the number of lines painted; blank text paints nothing.
    pub fn paragraph(&mut self, canvas: &mut Canvas, text: &str, style: &TextStyle, align: Align) -> usize {
        let x = match align {
            Align::Left => self.x,
            Align::Center => self.center_x(),
        };
        self.paragraph_at(canvas, text, style, align, x, self.width)
    }

    /// Paints a list item: a small dot followed by indented wrapped text.
    pub fn bullet(&mut self, canvas: &mut Canvas, text: &str, style: &TextStyle, dot_fill: &str) -> usize {
        let indent = style.size_px * 1.1;
        let first_line_mid = self.y + style.line_advance() / 2.0;
        let lines = self.paragraph_at(canvas, text, style, Align::Left, self.x + indent, self.width - indent);
        if lines > 0 {
            canvas.push(Element::Dot {
                cx: self.x + indent * 0.4,
                cy: first_line_mid,
                r: (style.size_px * 0.14).max(1.2),
                fill: dot_fill.to_string(),
            });
        }
        lines
    }

    /// Paints a horizontal rule across the column at the cursor and moves past it.
    pub fn rule(&mut self, canvas: &mut Canvas, stroke: &str, thickness: f32) {
        canvas.hline(self.x, self.x + self.width, self.y + thickness / 2.0, stroke, thickness);
        self.y += thickness;
    }

    fn paragraph_at(
        &mut self,
        canvas: &mut Canvas,
        text: &str,
        style: &TextStyle,
        align: Align,
        x: f32,
        width: f32,
    ) -> usize {
        let metrics = get_metrics(style.font);
        let painted = style.display_text(text);
        let wrapped = metrics.wrap(&painted, width, style.size_px, style.weight);
        let lines = source_lines(text, &painted, &wrapped);

        let anchor = match align {
            Align::Left => TextAnchor::Start,
            Align::Center => TextAnchor::Middle,
        };
        let advance = style.line_advance();
        for line in &lines {
            // Baseline sits at ~80% of the em box, centred in the line box.
            let baseline = self.y + (advance - style.size_px) / 2.0 + style.size_px * 0.8;
            canvas.push(Element::Text(TextRun {
                x,
                y: baseline,
                text: line.clone(),
                anchor,
                style: style.clone(),
            }));
            self.y += advance;
        }
        lines.len()
    }
}

/// Maps wrapped display lines back onto the source string so runs keep the
/// source casing. Wrapping only ever breaks at whitespace or inside an overlong
/// word, and casing changes never add whitespace, so word-for-word mapping holds
/// whenever the character counts agree; otherwise the display lines are used.
fn source_lines(source: &str, painted: &str, wrapped: &[String]) -> Vec<String> {
    if source == painted {
        return wrapped.to_vec();
    }
    let source_chars: Vec<char> = source.split_whitespace().flat_map(|w| w.chars().chain([' '])).collect();
    let painted_chars: Vec<char> = painted.split_whitespace().flat_map(|w| w.chars().chain([' '])).collect();
    if source_chars.len() != painted_chars.len() {
        return wrapped.to_vec();
    }

    let mut out = Vec::with_capacity(wrapped.len());
    let mut pos = 0usize;
    for line in wrapped {
        // Skip the separator space the wrapper dropped between lines.
        while pos < source_chars.len() && source_chars[pos] == ' ' && painted_chars[pos] == ' ' {
            pos += 1;
        }
        let len = line.chars().count();
        let end = (pos + len).min(source_chars.len());
        out.push(source_chars[pos..end].iter().collect());
        pos = end;
    }
    out
}
