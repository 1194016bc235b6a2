// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference lines and areas.
//!
//! Both are anchored to one main axis by data value and span the whole plot area across it.
//! Values outside the parent axis's range are not an error: the primitive is just left out of
//! that cycle's drawables.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Line, Point, Rect};
use peniko::Color;
use peniko::color::palette::css;
use smallvec::smallvec;

use crate::axis::AxisType;
use crate::drawable::{Drawable, DrawableRole, IdAllocator, Primitive};
use crate::legend::LegendItem;
use crate::solver::AxisSet;
use crate::style::StrokeStyle;
use crate::z_order;

/// A line across the plot at one data value.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceLine {
    axis: AxisType,
    value: f64,
    stroke: StrokeStyle,
    label: String,
}

impl ReferenceLine {
    /// A dashed gray line at `value` on `axis`.
    pub fn new(axis: AxisType, value: f64) -> Self {
        Self {
            axis,
            value,
            stroke: StrokeStyle::dashed(css::GRAY, 1.0, 4.0),
            label: String::new(),
        }
    }

    /// Replaces the stroke.
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = stroke;
        self
    }

    /// Sets the legend label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// The parent axis.
    pub fn axis_type(&self) -> AxisType {
        self.axis
    }

    /// The anchored value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The legend label; empty for none.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The line across `plot`, or `None` if the value is out of range.
    pub fn resolve(&self, axes: &AxisSet, plot: Rect) -> Option<Line> {
        let c = axes.get(self.axis).get_physical_coordinate(self.value)?;
        Some(if self.axis.is_vertical() {
            Line::new((plot.x0, c), (plot.x1, c))
        } else {
            Line::new((c, plot.y0), (c, plot.y1))
        })
    }

    pub(crate) fn drawable(
        &self,
        axes: &AxisSet,
        plot: Rect,
        scaling: f64,
        ids: &mut IdAllocator,
    ) -> Option<Drawable> {
        let line = self.resolve(axes, plot)?;
        let mut stroke = self.stroke.clone();
        stroke.stroke_width *= scaling;
        Some(Drawable::new(
            ids.next_id(),
            DrawableRole::ReferenceLine,
            z_order::REFERENCE_LINES,
            Primitive::Lines {
                segments: alloc::vec![line],
                stroke,
            },
        ))
    }

    /// Legend row for the line, if it is labelled.
    pub(crate) fn legend_item(&self) -> Option<LegendItem> {
        if self.label.is_empty() {
            return None;
        }
        let color = match &self.stroke.brush {
            peniko::Brush::Solid(c) => *c,
            _ => css::GRAY,
        };
        Some(LegendItem::line(self.label.clone(), color))
    }
}

/// A band across the plot between two data values, edged by a line at each end.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceArea {
    axis: AxisType,
    start: f64,
    end: f64,
    fill: Color,
    edges: Option<StrokeStyle>,
    label: String,
}

impl ReferenceArea {
    /// A translucent gray band from `start` to `end` on `axis`, with dashed gray edges.
    pub fn new(axis: AxisType, start: f64, end: f64) -> Self {
        Self {
            axis,
            start,
            end,
            fill: css::GRAY.with_alpha(0.25),
            edges: Some(StrokeStyle::dashed(css::GRAY, 1.0, 4.0)),
            label: String::new(),
        }
    }

    /// Replaces the fill.
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    /// Replaces the stroke of the two edge lines.
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.edges = Some(stroke);
        self
    }

    /// Draws the band without edge lines.
    pub fn without_edges(mut self) -> Self {
        self.edges = None;
        self
    }

    /// Sets the legend label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// The parent axis.
    pub fn axis_type(&self) -> AxisType {
        self.axis
    }

    /// `(start, end)` in data units.
    pub fn span(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// The legend label; empty for none.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The band within `plot`, or `None` if either end is out of range.
    pub fn resolve(&self, axes: &AxisSet, plot: Rect) -> Option<Rect> {
        let axis = axes.get(self.axis);
        let a = axis.get_physical_coordinate(self.start)?;
        let b = axis.get_physical_coordinate(self.end)?;
        Some(if self.axis.is_vertical() {
            Rect::new(plot.x0, a.min(b), plot.x1, a.max(b))
        } else {
            Rect::new(a.min(b), plot.y0, a.max(b), plot.y1)
        })
    }

    /// The band's fill, followed by its edge lines when it has them.
    ///
    /// Empty if either end is out of range.
    pub(crate) fn drawables(
        &self,
        axes: &AxisSet,
        plot: Rect,
        scaling: f64,
        ids: &mut IdAllocator,
    ) -> Vec<Drawable> {
        let Some(r) = self.resolve(axes, plot) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        out.push(Drawable::new(
            ids.next_id(),
            DrawableRole::ReferenceArea,
            z_order::REFERENCE_AREAS,
            Primitive::Polygon {
                points: smallvec![
                    Point::new(r.x0, r.y0),
                    Point::new(r.x1, r.y0),
                    Point::new(r.x1, r.y1),
                    Point::new(r.x0, r.y1),
                ],
                fill: self.fill.into(),
                stroke: None,
            },
        ));
        if let Some(edges) = &self.edges {
            let mut stroke = edges.clone();
            stroke.stroke_width *= scaling;
            let segments = if self.axis.is_vertical() {
                alloc::vec![
                    Line::new((r.x0, r.y0), (r.x1, r.y0)),
                    Line::new((r.x0, r.y1), (r.x1, r.y1)),
                ]
            } else {
                alloc::vec![
                    Line::new((r.x0, r.y0), (r.x0, r.y1)),
                    Line::new((r.x1, r.y0), (r.x1, r.y1)),
                ]
            };
            out.push(Drawable::new(
                ids.next_id(),
                DrawableRole::ReferenceArea,
                z_order::REFERENCE_AREAS,
                Primitive::Lines { segments, stroke },
            ));
        }
        out
    }

    /// Legend row for the area, if it is labelled.
    pub(crate) fn legend_item(&self) -> Option<LegendItem> {
        (!self.label.is_empty()).then(|| LegendItem::solid(self.label.clone(), self.fill))
    }
}
