// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graph titles, subtitles and captions.
//!
//! Decorations reserve vertical space above (title, subtitle) or below (caption) the plot
//! area. They are configured by the client before layout; the solver only ever shrinks their
//! font to make them fit the graph width.

extern crate alloc;

use alloc::string::String;

use peniko::Brush;
use plotwise_text::{TextMeasurer, TextStyle};

use crate::drawable::{Anchoring, Drawable, DrawableRole, IdAllocator, Primitive};
use crate::label::Label;
use crate::style::RelativeAlignment;
use crate::z_order;

/// Relative slack allowed before a decoration counts as too wide.
const FIT_TOLERANCE: f64 = 1e-9;

/// A title, subtitle or caption.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoration {
    label: Label,
    alignment: RelativeAlignment,
    font_scale: f64,
    fitted_scale: f64,
}

impl Decoration {
    fn with_font(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            label: Label::new(text).with_style(style),
            alignment: RelativeAlignment::Centered,
            font_scale: 1.0,
            fitted_scale: 1.0,
        }
    }

    /// A bold 16px title.
    pub fn title(text: impl Into<String>) -> Self {
        Self::with_font(text, TextStyle::new(16.0).bold())
    }

    /// A 12px subtitle.
    pub fn subtitle(text: impl Into<String>) -> Self {
        Self::with_font(text, TextStyle::new(12.0))
    }

    /// A 10px caption.
    pub fn caption(text: impl Into<String>) -> Self {
        Self::with_font(text, TextStyle::new(10.0))
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.label.text
    }

    /// Replaces the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.label.text = text.into();
    }

    /// Sets the base font.
    pub fn set_style(&mut self, style: TextStyle) {
        self.label.style = style;
    }

    /// Sets the text fill.
    pub fn set_fill(&mut self, fill: impl Into<Brush>) {
        self.label.fill = fill.into();
    }

    /// Horizontal alignment within the graph's bounding box.
    pub fn alignment(&self) -> RelativeAlignment {
        self.alignment
    }

    /// Sets the horizontal alignment.
    pub fn set_alignment(&mut self, alignment: RelativeAlignment) {
        self.alignment = alignment;
    }

    /// The client-requested font scale.
    pub fn font_scale(&self) -> f64 {
        self.font_scale
    }

    /// Sets the client-requested font scale.
    pub fn set_font_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.font_scale = scale;
            self.fitted_scale = scale;
        }
    }

    /// The scale the decoration is laid out at: the requested scale times the graph scaling,
    /// shrunk as needed to fit the graph width.
    pub fn fitted_scale(&self) -> f64 {
        self.fitted_scale
    }

    /// Whether the decoration takes up space.
    pub fn is_shown(&self) -> bool {
        self.label.is_visible()
    }

    /// Shows or hides the decoration.
    pub fn show(&mut self, show: bool) {
        self.label.shown = show;
    }

    /// Restarts fitting for a new layout cycle.
    pub(crate) fn reset_scale(&mut self, graph_scaling: f64) {
        self.fitted_scale = self.font_scale * graph_scaling;
    }

    /// `(width, height)` at the fitted scale.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> (f64, f64) {
        self.label.measure_at(measurer, self.fitted_scale)
    }

    /// Shrinks the fitted scale by `available_width / width` if the decoration is too wide.
    ///
    /// Returns `true` if the scale changed. Never grows the scale.
    pub(crate) fn shrink_to_fit(
        &mut self,
        available_width: f64,
        measurer: &dyn TextMeasurer,
    ) -> bool {
        if !self.is_shown() || available_width <= 0.0 {
            return false;
        }
        let (width, _) = self.measure(measurer);
        if width <= available_width * (1.0 + FIT_TOLERANCE) {
            return false;
        }
        self.fitted_scale *= available_width / width;
        true
    }

    /// The decoration drawn with its top edge at `y`, aligned within `[x0, x1]`.
    pub(crate) fn drawable(
        &self,
        x0: f64,
        x1: f64,
        y: f64,
        role: DrawableRole,
        measurer: &dyn TextMeasurer,
        ids: &mut IdAllocator,
    ) -> Option<Drawable> {
        if !self.is_shown() {
            return None;
        }
        let size = self.measure(measurer);
        let left = self.alignment.place(x0, x1, size.0);
        let origin = kurbo::Point::new(left, y);
        Some(Drawable::new(
            ids.next_id(),
            role,
            z_order::DECORATIONS,
            Primitive::Text {
                text: self.label.text.clone(),
                origin,
                anchoring: Anchoring::TopLeftCorner,
                style: self.label.style.scaled(self.fitted_scale),
                fill: self.label.fill.clone(),
                angle: 0.0,
                line_spacing: self.label.line_spacing * self.fitted_scale,
                bounds: Anchoring::TopLeftCorner.rect(origin, size),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use plotwise_text::HeuristicTextMeasurer;

    #[test]
    fn shrink_only_and_exact_ratio() {
        let m = HeuristicTextMeasurer;
        let mut title = Decoration::title("A fairly long title for a small graph");
        let (w, _) = title.measure(&m);
        assert!(title.shrink_to_fit(w / 2.0, &m));
        assert!((title.fitted_scale() - 0.5).abs() < 1e-12);
        // Already fits: unchanged, and never grows back.
        assert!(!title.shrink_to_fit(w * 4.0, &m));
        assert!((title.fitted_scale() - 0.5).abs() < 1e-12);
        // Re-fitting at the reduced size is stable.
        assert!(!title.shrink_to_fit(w / 2.0, &m));
    }

    #[test]
    fn alignment_positions_text() {
        let m = HeuristicTextMeasurer;
        let mut caption = Decoration::caption("abc");
        caption.set_alignment(RelativeAlignment::FlushRight);
        let mut ids = IdAllocator::default();
        let d = caption
            .drawable(0.0, 100.0, 10.0, DrawableRole::Caption, &m, &mut ids)
            .unwrap();
        assert!((d.bounds().x1 - 100.0).abs() < 1e-9);
        assert!((d.bounds().y0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_decorations_are_not_shown() {
        let m = HeuristicTextMeasurer;
        let mut sub = Decoration::subtitle("");
        assert!(!sub.is_shown());
        assert_eq!(sub.measure(&m), (0.0, 0.0));
        assert!(!sub.shrink_to_fit(10.0, &m));
        sub.set_text("now visible");
        assert!(sub.is_shown());
    }
}
