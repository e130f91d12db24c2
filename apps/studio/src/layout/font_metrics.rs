//! Static font-metric tables for the two résumé type families.
//!
//! Advances are stored as fractions of the font size. They approximate the
//! real glyph advances closely enough to decide where a line
//! wraps inside a template column. The SVG consumer renders with real fonts, so a
//! line may come out a few percent shorter or longer than measured; column widths
//! leave slack for that.
//!
//! Each table holds the printable ASCII run from space to tilde, addressed by
//! code point minus 0x20.
//! Latin-1 accented letters are folded to their base letter before lookup, which
//! matters for Portuguese section labels ("Experiência", "Formação").

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Type families
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    /// Humanist sans-serif (Minimalist, Modern, Creative).
    Sans,
    /// Book serif (Classic).
    Serif,
}

impl FontFamily {
    /// CSS/SVG `font-family` stack emitted for this family.
    pub fn css_stack(&self) -> &'static str {
        match self {
            FontFamily::Sans => "Inter, 'Helvetica Neue', Arial, sans-serif",
            FontFamily::Serif => "Georgia, 'Times New Roman', serif",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    Light,
    Regular,
    Semibold,
    Bold,
}

impl FontWeight {
    pub fn css_value(&self) -> u16 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Regular => 400,
            FontWeight::Semibold => 600,
            FontWeight::Bold => 700,
        }
    }

    /// Heavier weights run wider than the regular-weight table.
    fn width_factor(&self) -> f32 {
        match self {
            FontWeight::Light => 0.98,
            FontWeight::Regular => 1.0,
            FontWeight::Semibold => 1.04,
            FontWeight::Bold => 1.07,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Advance tables
// ────────────────────────────────────────────────────────────────────────────

/// Per-family glyph advances plus the fallbacks used off-table.
///
/// `advances[c - 0x20]` is the advance of printable ASCII `c`; digits, capitals and
/// lowercase letters sit in contiguous runs, so the row comments below follow them.
pub struct FontMetricTable {
    pub font: FontFamily,
    widths: [f32; 95],
    /// Fallback width for characters outside the table after folding.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    fn char_em(&self, c: char) -> f32 {
        let code = fold_latin1(c) as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    /// Sum of advances for `text`, in fractions of the font size.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_em(c)).sum()
    }

    /// Width in CSS pixels at the given size and weight.
    #[cfg(test)]
    pub fn width_px(&self, s: &str, size_px: f32, weight: FontWeight) -> f32 {
        self.measure_str(s) * size_px * weight.width_factor()
    }

    /// Greedy word wrap at `max_width_px`: a word moves to the next line only when
    /// it would overflow the current one.
    ///
    /// Words wider than a whole line (long e-mails, URLs) are broken by character,
    /// the way `break-all` would. Returns no lines for blank input.
    pub fn wrap(&self, s: &str, max_width_px: f32, size_px: f32, weight: FontWeight) -> Vec<String> {
        let scale = size_px * weight.width_factor();
        let max_em = if scale > 0.0 { max_width_px / scale } else { f32::INFINITY };

        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in s.split_whitespace() {
            let word_w = self.measure_str(word);
            let space_w = if current.is_empty() { 0.0 } else { self.space_width };

            if current_width + space_w + word_w <= max_em {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += space_w + word_w;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }

            if word_w <= max_em {
                current.push_str(word);
                current_width = word_w;
            } else {
                for c in word.chars() {
                    let c_w = self.char_em(c);
                    if current_width + c_w > max_em && !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0.0;
                    }
                    current.push(c);
                    current_width += c_w;
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// Maps accented Latin-1 letters to their unaccented ASCII base.
fn fold_latin1(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        '•' | '·' => '.',
        _ => c,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Advance data
// ────────────────────────────────────────────────────────────────────────────

static SANS_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Sans,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.54,
    space_width: 0.278,
};

/// Times-style advances.
static SERIF_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Serif,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.180, 0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    average_char_width: 0.48,
    space_width: 0.25,
};

/// Advance table for `family`.
pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Sans => &SANS_TABLE,
        FontFamily::Serif => &SERIF_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
