//! Text measurement and glyph rasterization.
//!
//! Two measurers are provided:
//! - [`HeuristicMeasure`]: average character width, no font file needed.
//! - [`FontdueText`]: real advances from a TTF/OTF via `fontdue`; also used by
//!   the rasterizer to produce glyph coverage masks.

use std::path::Path;

use crate::scene::FontSpec;
use crate::surface::SurfaceError;

pub trait TextMeasure {
    /// Advance width of `text` in logical units.
    fn measure(&self, text: &str, font: &FontSpec) -> f32;
}

/// Width approximation: `chars * size * char_width_factor`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeuristicMeasure {
    pub char_width_factor: f32,
}

impl Default for HeuristicMeasure {
    fn default() -> Self {
        Self { char_width_factor: 0.55 }
    }
}

impl TextMeasure for HeuristicMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size * self.char_width_factor
    }
}

/// Grayscale coverage for one glyph, positioned relative to the run origin
/// (top-left of the line box).
#[derive(Clone, Debug)]
pub struct GlyphMask {
    pub offset: [f32; 2],
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
}

#[derive(Clone)]
pub struct FontdueText {
    font: fontdue::Font,
}

impl FontdueText {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SurfaceError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| SurfaceError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SurfaceError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Ascent above the baseline at `px`, falling back to 80% of the size.
    pub fn ascent(&self, px: f32) -> f32 {
        self.font
            .horizontal_line_metrics(px)
            .map(|lm| lm.ascent)
            .unwrap_or(px * 0.8)
    }

    pub fn rasterize_line(&self, text: &str, px: f32) -> Vec<GlyphMask> {
        use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x: 0.0,
            y: 0.0,
            ..LayoutSettings::default()
        });
        layout.append(&[&self.font], &TextStyle::new(text, px.max(1.0), 0));

        let mut out = Vec::new();
        for g in layout.glyphs() {
            let (metrics, bitmap) = self.font.rasterize_indexed(g.key.glyph_index, g.key.px);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }
            out.push(GlyphMask {
                offset: [g.x, g.y],
                width: metrics.width as u32,
                height: metrics.height as u32,
                coverage: bitmap,
            });
        }
        out
    }
}

impl TextMeasure for FontdueText {
    fn measure(&self, text: &str, font: &FontSpec) -> f32 {
        let px = font.size.max(1.0);
        text.chars().map(|c| self.font.metrics(c, px).advance_width).sum()
    }
}

/// Break `text` into lines no wider than `wrap_length`.
///
/// Words wider than the limit are truncated character by character until
/// they fit.
pub fn word_wrap(text: &str, wrap_length: f32, width: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for word in text.split(' ') {
        let mut w = word.to_string();
        let mut w_width = width(&w);
        while w_width > wrap_length && !w.is_empty() {
            w.pop();
            w_width = width(&w);
        }

        match lines.last_mut() {
            Some(last) if width(&format!("{last} ")) + w_width < wrap_length => {
                last.push(' ');
                last.push_str(&w);
            }
            _ => lines.push(w),
        }
    }
    lines
}

/// Widest line and total height (`lines * line_height`).
pub fn wrap_dimensions(lines: &[String], line_height: f32, width: impl Fn(&str) -> f32) -> [f32; 2] {
    let max_width = lines.iter().map(|l| width(l)).fold(0.0f32, f32::max);
    [max_width, lines.len() as f32 * line_height]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn heuristic_scales_with_size() {
        let m = HeuristicMeasure { char_width_factor: 0.5 };
        assert_eq!(m.measure("abcd", &FontSpec::new(10.0)), 20.0);
        assert_eq!(m.measure("", &FontSpec::new(10.0)), 0.0);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = word_wrap("aa bb cc dd", 6.0, chars);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn truncates_overlong_words() {
        let lines = word_wrap("abcdefgh", 4.0, chars);
        assert_eq!(lines, vec!["abcd"]);
    }

    #[test]
    fn dimensions_use_widest_line() {
        let lines = vec!["abc".to_string(), "abcdef".to_string()];
        assert_eq!(wrap_dimensions(&lines, 16.0, chars), [6.0, 32.0]);
    }

    #[test]
    fn invalid_font_bytes_are_reported() {
        assert!(matches!(FontdueText::from_bytes(&[0, 1, 2, 3]), Err(SurfaceError::Font(_))));
    }
}
