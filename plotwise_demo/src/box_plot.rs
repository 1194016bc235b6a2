// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box-and-whisker plot with jittered data points.

use kurbo::{Circle, Line, Point, Shape};
use peniko::Color;
use peniko::color::palette::css;
use plotwise_graph::{
    AxisSet, AxisType, Dataset, Drawable, DrawableProducer, DrawableRole, GraphError,
    IdAllocator, LabelDisplay, LayoutContext, Legend, Primitive, Result, SERIES, StrokeStyle,
    TickMarkDisplay,
};
use rand::Rng;
use smallvec::{SmallVec, smallvec};

/// Half the box width, in category units.
const HALF_BOX: f64 = 0.25;
/// Horizontal jitter spread, in category units.
const JITTER: f64 = 0.15;
const POINT_RADIUS: f64 = 2.0;

/// Five-number summary of one group.
#[derive(Clone, Debug, PartialEq)]
struct GroupSummary {
    label: String,
    position: f64,
    low_whisker: f64,
    q1: f64,
    median: f64,
    q3: f64,
    high_whisker: f64,
    outliers: Vec<f64>,
}

impl GroupSummary {
    /// Summarizes sorted, finite `values`; whiskers stop at the last value inside 1.5 IQR.
    fn from_sorted(label: String, position: f64, values: &[f64]) -> Option<Self> {
        let (&first, &last) = (values.first()?, values.last()?);
        let q1 = quantile(values, 0.25);
        let median = quantile(values, 0.5);
        let q3 = quantile(values, 0.75);
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
        let inside = values.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let low_whisker = inside.clone().fold(last, f64::min);
        let high_whisker = inside.fold(first, f64::max);
        let outliers = values
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();
        Some(Self {
            label,
            position,
            low_whisker,
            q1,
            median,
            q3,
            high_whisker,
            outliers,
        })
    }

    fn extent(&self) -> (f64, f64) {
        self.outliers
            .iter()
            .fold((self.low_whisker, self.high_whisker), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Linear-interpolation quantile of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "rank is within 0..len"
    )]
    let below = rank.floor() as usize;
    let above = (below + 1).min(sorted.len() - 1);
    let t = rank - below as f64;
    sorted[below] + t * (sorted[above] - sorted[below])
}

/// A box plot of one continuous column grouped by one categorical column.
#[derive(Clone, Debug)]
pub(crate) struct BoxPlot {
    groups: Vec<GroupSummary>,
    points: Vec<(f64, f64)>,
    fill: Color,
    legend: Option<Legend>,
}

impl BoxPlot {
    pub(crate) fn new() -> Self {
        Self {
            groups: Vec::new(),
            points: Vec::new(),
            fill: css::LIGHT_STEEL_BLUE,
            legend: None,
        }
    }

    /// Draws `legend` in the top-right corner of the plot area.
    pub(crate) fn with_legend(mut self, legend: Legend) -> Self {
        self.legend = Some(legend);
        self
    }

    /// Binds `value` grouped by `group`, jittering the raw points with `rng`.
    ///
    /// Groups without finite values are dropped; a dataset where every group is empty is an
    /// error.
    pub(crate) fn set_data(
        &mut self,
        data: &Dataset,
        value: &str,
        group: &str,
        rng: &mut impl Rng,
    ) -> Result<()> {
        let values = data.continuous(value)?;
        let groups = data.categorical(group)?;

        let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); groups.labels().len()];
        for (&code, &v) in groups.codes().iter().zip(values) {
            if v.is_finite() {
                buckets[code].push(v);
            }
        }

        self.groups.clear();
        self.points.clear();
        for (code, mut bucket) in buckets.into_iter().enumerate() {
            bucket.sort_by(f64::total_cmp);
            let position = (self.groups.len() + 1) as f64;
            let label = groups.label(code).unwrap_or_default().to_owned();
            let Some(summary) = GroupSummary::from_sorted(label, position, &bucket) else {
                continue;
            };
            self.points.extend(
                bucket
                    .iter()
                    .map(|&v| (position + rng.random_range(-JITTER..=JITTER), v)),
            );
            self.groups.push(summary);
        }
        if self.groups.is_empty() {
            return Err(GraphError::EmptyData);
        }
        tracing::debug!(
            groups = self.groups.len(),
            points = self.points.len(),
            "box plot bound"
        );
        Ok(())
    }
}

impl DrawableProducer for BoxPlot {
    fn configure_axes(&self, axes: &mut AxisSet) {
        let bottom = axes.get_mut(AxisType::BottomX);
        bottom.set_range(0.0, (self.groups.len() + 1) as f64, 0, 1.0, 1);
        bottom.set_label_display(LabelDisplay::CustomOnly);
        bottom.set_tick_mark_display(TickMarkDisplay::None);
        bottom.clear_custom_labels();
        for group in &self.groups {
            bottom.set_custom_label(group.position, group.label.clone());
        }

        let (lo, hi) = self
            .groups
            .iter()
            .map(GroupSummary::extent)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), (lo, hi)| {
                (a.min(lo), b.max(hi))
            });
        axes.get_mut(AxisType::LeftY).set_range_auto(lo, hi, true);
    }

    fn produce_drawables(&self, ctx: &LayoutContext<'_>, ids: &mut IdAllocator) -> Vec<Drawable> {
        let mut out = Vec::new();
        let stroke = StrokeStyle::solid(css::BLACK, ctx.scaling);
        let mut push = |out: &mut Vec<Drawable>, primitive| {
            out.push(Drawable::new(ids.next_id(), DrawableRole::Series, SERIES, primitive));
        };

        for g in &self.groups {
            let (x0, x1) = (g.position - HALF_BOX, g.position + HALF_BOX);
            if let (Some(a), Some(b)) = (ctx.data_point(x0, g.q3), ctx.data_point(x1, g.q1)) {
                push(
                    &mut out,
                    Primitive::Polygon {
                        points: smallvec_rect(a, b),
                        fill: self.fill.into(),
                        stroke: Some(stroke.clone()),
                    },
                );
            }

            let mut segments = Vec::new();
            let horizontal = |y: f64, half: f64| {
                let a = ctx.data_point(g.position - half, y)?;
                let b = ctx.data_point(g.position + half, y)?;
                Some(Line::new(a, b))
            };
            segments.extend(horizontal(g.median, HALF_BOX));
            segments.extend(horizontal(g.low_whisker, 0.5 * HALF_BOX));
            segments.extend(horizontal(g.high_whisker, 0.5 * HALF_BOX));
            for (from, to) in [(g.q1, g.low_whisker), (g.q3, g.high_whisker)] {
                if let (Some(a), Some(b)) =
                    (ctx.data_point(g.position, from), ctx.data_point(g.position, to))
                {
                    segments.push(Line::new(a, b));
                }
            }
            if !segments.is_empty() {
                push(
                    &mut out,
                    Primitive::Lines {
                        segments,
                        stroke: stroke.clone(),
                    },
                );
            }

            for &v in &g.outliers {
                if let Some(p) = ctx.data_point(g.position, v) {
                    push(
                        &mut out,
                        Primitive::Path {
                            path: Circle::new(p, 1.5 * POINT_RADIUS * ctx.scaling).to_path(0.1),
                            fill: None,
                            stroke: Some(StrokeStyle::solid(css::DARK_RED, ctx.scaling)),
                        },
                    );
                }
            }
        }

        let dot = css::STEEL_BLUE.with_alpha(0.5);
        for &(x, y) in &self.points {
            if let Some(p) = ctx.data_point(x, y) {
                push(
                    &mut out,
                    Primitive::Path {
                        path: Circle::new(p, POINT_RADIUS * ctx.scaling).to_path(0.1),
                        fill: Some(dot.into()),
                        stroke: None,
                    },
                );
            }
        }

        if let Some(legend) = &self.legend {
            let plot = ctx.plot_rect();
            let (w, _) = legend.measure(ctx.measurer);
            let origin = Point::new(plot.x1 - w, plot.y0);
            out.extend(legend.drawables(origin, ctx.measurer, ids));
        }
        out
    }
}

fn smallvec_rect(a: Point, b: Point) -> SmallVec<[Point; 4]> {
    smallvec![
        Point::new(a.x, a.y),
        Point::new(b.x, a.y),
        Point::new(b.x, b.y),
        Point::new(a.x, b.y),
    ]
}
