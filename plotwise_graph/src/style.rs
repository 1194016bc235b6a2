// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke and alignment types shared by axes, decorations and drawables.

use peniko::Brush;
use peniko::color::palette::css;
use smallvec::SmallVec;

/// A paint + width pair for stroked lines (axis lines, ticks, gridlines, connectors).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in drawing-surface units.
    pub stroke_width: f64,
    /// Dash pattern (alternating on/off lengths); empty for a solid line.
    pub dash: SmallVec<[f64; 2]>,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
            dash: SmallVec::new(),
        }
    }

    /// Convenience for a dashed stroke with equal on/off lengths.
    pub fn dashed(brush: impl Into<Brush>, stroke_width: f64, dash_length: f64) -> Self {
        let mut dash = SmallVec::new();
        dash.push(dash_length);
        dash.push(dash_length);
        Self {
            brush: brush.into(),
            stroke_width,
            dash,
        }
    }

    /// Returns `true` if this stroke has a dash pattern.
    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// Default gridline stroke: a faint solid line.
pub(crate) fn default_grid_stroke() -> StrokeStyle {
    StrokeStyle::solid(css::BLACK.with_alpha(40.0 / 255.0), 1.0)
}

/// Horizontal placement of a decoration or legend within its available width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RelativeAlignment {
    /// Flush left, ragged right.
    FlushLeft,
    /// Centered.
    #[default]
    Centered,
    /// Flush right, ragged left.
    FlushRight,
}

impl RelativeAlignment {
    /// Returns the x coordinate that a box of `width` should start at inside `[x0, x1]`.
    pub fn place(self, x0: f64, x1: f64, width: f64) -> f64 {
        match self {
            Self::FlushLeft => x0,
            Self::Centered => x0 + 0.5 * ((x1 - x0) - width),
            Self::FlushRight => x1 - width,
        }
    }
}
