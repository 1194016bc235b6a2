// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement capability for graph layout.
//!
//! Every sizing decision made by the plot-area solver (axis label overhang, title height,
//! label stacking, bracket overlap) comes down to "how big is this string at this font and
//! scale". This crate is the seam for that question: layout code depends only on
//! [`TextMeasurer`], and callers inject whichever backend they render with.
//!
//! Implementations must be deterministic: the solver measures the same text several times per
//! layout cycle and assumes it gets identical answers back.

#![no_std]

extern crate alloc;

use alloc::sync::Arc;

/// Measures single lines of text.
///
/// Implementations can be heuristic ([`HeuristicTextMeasurer`]), backed by a shaping engine,
/// or backed by a platform measurement API.
pub trait TextMeasurer {
    /// Size of `text` laid out on one line.
    ///
    /// Newlines are not interpreted; use [`TextMeasurer::measure_block`] for text that
    /// contains `\n`.
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics;

    /// Measures text that may span several lines.
    ///
    /// Returns `(width, height)`: the widest line, and the sum of line heights plus
    /// `line_spacing` between consecutive lines. Empty text measures as `(0, 0)`.
    fn measure_block(&self, text: &str, style: &TextStyle, line_spacing: f64) -> (f64, f64) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        let mut width = 0.0_f64;
        let mut height = 0.0;
        for (i, line) in text.split('\n').enumerate() {
            let metrics = self.measure(line, style.clone());
            width = width.max(metrics.advance_width);
            if i > 0 {
                height += line_spacing;
            }
            height += metrics.line_height();
        }
        (width, height)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
        (**self).measure(text, style)
    }
}

/// The font inputs that change a measured size.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in drawing-surface units (typically pixels), before any scaling.
    pub font_size: f64,
    /// Family to measure with; backends fall back to their default when it is unavailable.
    pub font_family: FontFamily,
    /// Weight; bold labels measure wider on real backends.
    pub font_weight: FontWeight,
    /// Slant.
    pub font_style: FontStyle,
}

impl TextStyle {
    /// Creates a sans-serif, normal-weight `TextStyle` with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            ..Self::BASE
        }
    }

    const BASE: Self = Self {
        font_size: 12.0,
        font_family: FontFamily::SansSerif,
        font_weight: FontWeight::NORMAL,
        font_style: FontStyle::Normal,
    };

    /// Returns a copy of this style with the font size multiplied by `scale`.
    #[must_use]
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            font_size: self.font_size * scale,
            ..self.clone()
        }
    }

    /// Returns a bold copy of this style.
    #[must_use]
    pub fn bold(&self) -> Self {
        Self {
            font_weight: FontWeight::BOLD,
            ..self.clone()
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::BASE
    }
}

/// Which typeface a label asks for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A generic serif family.
    Serif,
    /// A generic sans-serif family.
    SansSerif,
    /// A generic monospace family.
    Monospace,
    /// A named family (e.g. `"Inter"`).
    Named(Arc<str>),
}

impl FontFamily {
    /// Value for an SVG `font-family` attribute.
    #[must_use]
    pub fn as_css_family(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }
}

/// Numeric weight on the usual 100 to 900 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Regular text.
    pub const NORMAL: Self = Self(400);
    /// Titles and emphasized labels.
    pub const BOLD: Self = Self(700);
}

/// Upright or slanted glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Upright.
    Normal,
    /// Cursive slanted face.
    Italic,
    /// Mechanically slanted upright face.
    Oblique,
}

/// Size of one measured line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Horizontal extent of the line.
    pub advance_width: f64,
    /// Height above the baseline.
    pub ascent: f64,
    /// Depth below the baseline.
    pub descent: f64,
    /// Extra gap the font asks for below each line.
    pub leading: f64,
}

impl TextMetrics {
    /// Vertical room one line takes, leading included.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }
}

/// A heuristic text measurer for tests, demos and headless layout.
///
/// Glyphs are assumed to average 0.6em wide, with the baseline at 0.8em. Results are linear
/// in font size, so scaling a style by `s` scales the measured width by exactly `s`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
        let glyphs = text.chars().count() as f64;
        TextMetrics {
            advance_width: 0.6 * style.font_size * glyphs,
            ascent: 0.8 * style.font_size,
            descent: 0.2 * style.font_size,
            leading: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn block_measurement_sums_lines_and_spacing() {
        let m = HeuristicTextMeasurer;
        let style = TextStyle::new(10.0);
        let (w, h) = m.measure_block("abcd\nab", &style, 2.0);
        assert!((w - 24.0).abs() < 1e-9, "widest line wins: {w}");
        assert!((h - 22.0).abs() < 1e-9, "two lines plus one gap: {h}");
        assert_eq!(m.measure_block("", &style, 2.0), (0.0, 0.0));
    }

    #[test]
    fn scaling_is_linear_for_heuristic_measurer() {
        let m = HeuristicTextMeasurer;
        let style = TextStyle::new(12.0);
        let full = m.measure("hello", style.clone()).advance_width;
        let half = m.measure("hello", style.scaled(0.5)).advance_width;
        assert!((full - 2.0 * half).abs() < 1e-9, "{full} vs {half}");
    }
}
