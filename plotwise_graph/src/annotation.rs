// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Client annotations: a label anchored at a data point, optionally with arrows pointing at
//! other data points.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Line, Point, Rect};
use plotwise_text::TextMeasurer;

use crate::drawable::{Anchoring, Drawable, DrawableRole, IdAllocator, Primitive};
use crate::label::Label;
use crate::solver::AxisSet;
use crate::style::StrokeStyle;
use crate::z_order;

/// Arrow head length, before scaling.
const ARROW_HEAD: f64 = 6.0;

/// A label pinned to data space.
///
/// An annotation whose anchor is out of range is skipped for that cycle but kept; it shows up
/// again once the axis ranges include it.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    label: Label,
    anchor: (f64, f64),
    anchoring: Anchoring,
    interest_points: Vec<(f64, f64)>,
    arrow: StrokeStyle,
}

impl Annotation {
    /// A label centered on the data point `anchor` (x, y).
    pub fn new(text: impl Into<String>, anchor: (f64, f64)) -> Self {
        Self {
            label: Label::new(text).with_font_size(10.0),
            anchor,
            anchoring: Anchoring::Center,
            interest_points: Vec::new(),
            arrow: StrokeStyle::default(),
        }
    }

    /// Adds data points the annotation points at.
    pub fn with_interest_points(mut self, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        self.interest_points.extend(points);
        self
    }

    /// Sets which point of the label sits on the anchor.
    pub fn with_anchoring(mut self, anchoring: Anchoring) -> Self {
        self.anchoring = anchoring;
        self
    }

    /// Sets the arrow stroke.
    pub fn with_arrow_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.arrow = stroke;
        self
    }

    /// The label.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Mutable access to the label.
    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    /// The data-space anchor.
    pub fn anchor(&self) -> (f64, f64) {
        self.anchor
    }

    /// The data-space interest points.
    pub fn interest_points(&self) -> &[(f64, f64)] {
        &self.interest_points
    }

    /// Label rectangle on the surface, if the anchor resolves.
    pub fn resolve(
        &self,
        axes: &AxisSet,
        scaling: f64,
        measurer: &dyn TextMeasurer,
    ) -> Option<Rect> {
        let origin = axes.data_point(self.anchor.0, self.anchor.1)?;
        let size = self.label.measure_at(measurer, self.label.scaling * scaling);
        Some(self.anchoring.rect(origin, size))
    }

    /// Label and arrows; empty if the anchor does not resolve.
    pub(crate) fn drawables(
        &self,
        axes: &AxisSet,
        scaling: f64,
        measurer: &dyn TextMeasurer,
        ids: &mut IdAllocator,
    ) -> Vec<Drawable> {
        let mut out = Vec::new();
        let Some(rect) = self.resolve(axes, scaling, measurer) else {
            return out;
        };
        if self.label.is_visible() {
            let scale = self.label.scaling * scaling;
            out.push(Drawable::new(
                ids.next_id(),
                DrawableRole::Annotation,
                z_order::ANNOTATIONS,
                Primitive::Text {
                    text: self.label.text.clone(),
                    origin: rect.origin(),
                    anchoring: Anchoring::TopLeftCorner,
                    style: self.label.style.scaled(scale),
                    fill: self.label.fill.clone(),
                    angle: 0.0,
                    line_spacing: self.label.line_spacing * scale,
                    bounds: rect,
                },
            ));
        }
        let mut stroke = self.arrow.clone();
        stroke.stroke_width *= scaling;
        for &(x, y) in &self.interest_points {
            let Some(target) = axes.data_point(x, y) else {
                continue;
            };
            if rect.contains(target) {
                continue;
            }
            out.push(Drawable::new(
                ids.next_id(),
                DrawableRole::Annotation,
                z_order::ANNOTATIONS,
                Primitive::Arrow {
                    line: Line::new(nearest_edge_midpoint(rect, target), target),
                    stroke: stroke.clone(),
                    head_length: ARROW_HEAD * scaling,
                },
            ));
        }
        out
    }
}

/// Midpoint of the side of `rect` closest to `target`.
fn nearest_edge_midpoint(rect: Rect, target: Point) -> Point {
    let c = rect.center();
    [
        Point::new(rect.x0, c.y),
        Point::new(rect.x1, c.y),
        Point::new(c.x, rect.y0),
        Point::new(c.x, rect.y1),
    ]
    .into_iter()
    .min_by(|a, b| a.distance(target).total_cmp(&b.distance(target)))
    .unwrap_or(c)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use plotwise_text::HeuristicTextMeasurer;

    fn axes() -> AxisSet {
        let mut axes = AxisSet::new();
        axes.set_points(Rect::new(0.0, 0.0, 100.0, 100.0));
        axes
    }

    #[test]
    fn arrows_start_at_nearest_edge() {
        let m = HeuristicTextMeasurer;
        let axes = axes();
        let note = Annotation::new("peak", (5.0, 5.0))
            .with_interest_points([(9.0, 5.0), (5.0, 9.0), (20.0, 5.0)]);
        let mut ids = IdAllocator::default();
        let out = note.drawables(&axes, 1.0, &m, &mut ids);
        // label + two arrows; the out-of-range point is skipped
        assert_eq!(out.len(), 3);
        let rect = note.resolve(&axes, 1.0, &m).unwrap();
        let Primitive::Arrow { line, .. } = &out[1].primitive else {
            panic!("expected an arrow");
        };
        assert_eq!(line.p0, Point::new(rect.x1, rect.center().y));
        assert_eq!(line.p1, Point::new(90.0, 50.0));
        let Primitive::Arrow { line, .. } = &out[2].primitive else {
            panic!("expected an arrow");
        };
        assert_eq!(line.p0, Point::new(rect.center().x, rect.y0));
    }

    #[test]
    fn unresolvable_anchor_skips_everything() {
        let m = HeuristicTextMeasurer;
        let axes = axes();
        let note = Annotation::new("far", (50.0, 5.0)).with_interest_points([(1.0, 1.0)]);
        let mut ids = IdAllocator::default();
        assert!(note.drawables(&axes, 1.0, &m, &mut ids).is_empty());
    }
}
