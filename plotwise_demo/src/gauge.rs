// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Half-circle gauge.
//!
//! The main axes are hidden; the bottom axis still carries the gauge range so the needle
//! angle comes from the same value-to-surface mapping as every other graph.

use core::f64::consts::PI;

use kurbo::{Circle, Line, Point, Rect, Shape, Vec2};
use peniko::Color;
use peniko::color::palette::css;
use plotwise_graph::{
    Anchoring, AxisSet, AxisType, Dataset, Drawable, DrawableProducer, DrawableRole, GraphError,
    IdAllocator, LayoutContext, Primitive, Result, SERIES, StrokeStyle, TextMeasurer as _,
    TextStyle,
};

/// Band thickness relative to the outer radius.
const BAND_WIDTH: f64 = 0.25;
const NEEDLE_HEAD: f64 = 10.0;

/// A gauge showing the mean of one column against colored bands.
#[derive(Clone, Debug)]
pub(crate) struct Gauge {
    range: (f64, f64),
    interval: f64,
    bands: Vec<(f64, f64, Color)>,
    value: Option<f64>,
}

impl Gauge {
    /// A gauge over `start..end` with ticks every `interval`.
    pub(crate) fn new(start: f64, end: f64, interval: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(GraphError::NonFiniteValue {
                context: "gauge range",
            });
        }
        if start >= end {
            return Err(GraphError::InvalidRange { start, end });
        }
        Ok(Self {
            range: (start, end),
            interval,
            bands: Vec::new(),
            value: None,
        })
    }

    /// Adds a colored band; bands are drawn in insertion order.
    pub(crate) fn with_band(mut self, from: f64, to: f64, color: Color) -> Self {
        self.bands.push((from, to, color));
        self
    }

    /// Shows the mean of the finite values in `column`.
    pub(crate) fn set_data(&mut self, data: &Dataset, column: &str) -> Result<()> {
        let (sum, n) = data
            .continuous(column)?
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0, 0_u32), |(s, n), v| (s + v, n + 1));
        if n == 0 {
            return Err(GraphError::EmptyData);
        }
        self.value = Some(sum / f64::from(n));
        Ok(())
    }

    /// Center and outer radius of the dial inside `plot`.
    fn dial(plot: Rect) -> (Point, f64) {
        let radius = (0.5 * plot.width()).min(plot.height()) * 0.9;
        (Point::new(plot.center().x, plot.y1), radius)
    }

    /// Angle for `value`, from π (left) clockwise to 2π (right), through the top.
    fn angle(ctx: &LayoutContext<'_>, value: f64) -> Option<f64> {
        let plot = ctx.plot_rect();
        let x = ctx.coordinate(AxisType::BottomX, value)?;
        Some(PI + PI * (x - plot.x0) / plot.width())
    }
}

impl DrawableProducer for Gauge {
    fn configure_axes(&self, axes: &mut AxisSet) {
        axes.get_mut(AxisType::BottomX).set_range(self.range.0, self.range.1, 0, self.interval, 1);
        for axis_type in AxisType::ALL {
            axes.get_mut(axis_type).show(false);
        }
    }

    fn produce_drawables(&self, ctx: &LayoutContext<'_>, ids: &mut IdAllocator) -> Vec<Drawable> {
        let mut out = Vec::new();
        let (center, radius) = Self::dial(ctx.plot_rect());
        let inner = radius * (1.0 - BAND_WIDTH);

        for &(from, to, color) in &self.bands {
            let (Some(a), Some(b)) = (Self::angle(ctx, from), Self::angle(ctx, to)) else {
                continue;
            };
            let segment = Circle::new(center, radius).segment(inner, a, b - a);
            out.push(Drawable::new(
                ids.next_id(),
                DrawableRole::Series,
                SERIES,
                Primitive::Path {
                    path: segment.path_elements(0.1).collect(),
                    fill: Some(color.into()),
                    stroke: None,
                },
            ));
        }

        let style = TextStyle::new(10.0).scaled(ctx.scaling);
        let bottom = ctx.axes.get(AxisType::BottomX);
        for point in bottom.get_axis_points() {
            let angle = Self::angle(ctx, point.value);
            let (Some(angle), Some(text)) = (angle, bottom.label_text(point.value)) else {
                continue;
            };
            let at = center + (radius + 4.0 * ctx.scaling) * Vec2::from_angle(angle);
            out.push(text_drawable(ctx, ids, text, at, Anchoring::Center, &style));
        }

        if let Some(value) = self.value {
            let clamped = value.clamp(self.range.0, self.range.1);
            if let Some(angle) = Self::angle(ctx, clamped) {
                let tip = center + inner * Vec2::from_angle(angle);
                out.push(Drawable::new(
                    ids.next_id(),
                    DrawableRole::Series,
                    SERIES,
                    Primitive::Arrow {
                        line: Line::new(center, tip),
                        stroke: StrokeStyle::solid(css::BLACK, 2.0 * ctx.scaling),
                        head_length: NEEDLE_HEAD * ctx.scaling,
                    },
                ));
            }
            let style = TextStyle::new(18.0).bold().scaled(ctx.scaling);
            let below = Point::new(center.x, center.y - 0.3 * inner);
            out.push(text_drawable(
                ctx,
                ids,
                format!("{value:.1}"),
                below,
                Anchoring::Center,
                &style,
            ));
        }
        out
    }
}

fn text_drawable(
    ctx: &LayoutContext<'_>,
    ids: &mut IdAllocator,
    text: String,
    origin: Point,
    anchoring: Anchoring,
    style: &TextStyle,
) -> Drawable {
    let size = ctx.measurer.measure_block(&text, style, 0.0);
    Drawable::new(
        ids.next_id(),
        DrawableRole::Series,
        SERIES,
        Primitive::Text {
            text,
            origin,
            anchoring,
            style: style.clone(),
            fill: css::BLACK.into(),
            angle: 0.0,
            line_spacing: 0.0,
            bounds: anchoring.rect(origin, size),
        },
    )
}

#[cfg(test)]
mod tests {
    use plotwise_graph::{Graph2D, HeuristicTextMeasurer};

    use super::*;

    #[test]
    fn rejects_bad_ranges() {
        assert_eq!(
            Gauge::new(5.0, 5.0, 1.0).unwrap_err(),
            GraphError::InvalidRange {
                start: 5.0,
                end: 5.0
            }
        );
        assert!(Gauge::new(f64::NAN, 5.0, 1.0).is_err());
    }

    #[test]
    fn needle_points_at_the_mean() {
        let data = Dataset::new().with_continuous("speed", vec![40.0, 60.0, f64::NAN]);
        let mut gauge = Gauge::new(0.0, 100.0, 20.0).unwrap();
        gauge.set_data(&data, "speed").unwrap();
        assert_eq!(gauge.value, Some(50.0));

        let mut graph = Graph2D::new(Rect::new(0.0, 0.0, 400.0, 300.0));
        graph.recalc_sizes_with(&HeuristicTextMeasurer, &gauge);
        let needle = graph
            .drawables()
            .iter()
            .find_map(|d| match d.primitive {
                Primitive::Arrow { line, .. } => Some(line),
                _ => None,
            })
            .unwrap();
        assert!((needle.p0.x - needle.p1.x).abs() < 1e-6, "{needle:?}");
        assert!(needle.p1.y < needle.p0.y);
    }
}
