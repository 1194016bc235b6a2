// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Heat map over two categorical columns, labelled with bracketed custom axes.

use kurbo::Point;
use peniko::Color;
use peniko::color::palette::css;
use plotwise_graph::{
    AxisSet, AxisType, Bracket, BracketLineStyle, CustomAxis, Dataset, Drawable,
    DrawableProducer, DrawableRole, GraphError, IdAllocator, LabelDisplay, LayoutContext, Legend,
    LegendItem, Primitive, Result, SERIES, TickMarkDisplay,
};
use smallvec::smallvec;

/// Number of color bins shown in the legend.
const LEGEND_BINS: usize = 5;

/// Mean `value` per (row, column) cell.
#[derive(Clone, Debug)]
pub(crate) struct HeatMap {
    rows: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Option<f64>>,
    range: (f64, f64),
    low: Color,
    high: Color,
}

impl HeatMap {
    pub(crate) fn new() -> Self {
        Self {
            rows: Vec::new(),
            columns: Vec::new(),
            cells: Vec::new(),
            range: (0.0, 1.0),
            low: css::LIGHT_YELLOW,
            high: css::DARK_RED,
        }
    }

    /// Binds `value` averaged over every (`row`, `column`) pair.
    pub(crate) fn set_data(
        &mut self,
        data: &Dataset,
        row: &str,
        column: &str,
        value: &str,
    ) -> Result<()> {
        let rows = data.categorical(row)?;
        let columns = data.categorical(column)?;
        let values = data.continuous(value)?;
        self.range = data.continuous_range(value)?;

        let width = columns.labels().len();
        let mut sums = vec![(0.0, 0_u32); rows.labels().len() * width];
        for ((&r, &c), &v) in rows.codes().iter().zip(columns.codes()).zip(values) {
            if v.is_finite() {
                let cell = &mut sums[r * width + c];
                cell.0 += v;
                cell.1 += 1;
            }
        }
        if sums.is_empty() {
            return Err(GraphError::EmptyData);
        }
        self.rows = rows.labels().to_vec();
        self.columns = columns.labels().to_vec();
        self.cells = sums
            .into_iter()
            .map(|(sum, n)| (n > 0).then(|| sum / f64::from(n)))
            .collect();
        Ok(())
    }

    fn color(&self, value: f64) -> Color {
        let (lo, hi) = self.range;
        let t = if hi > lo {
            ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        #[allow(clippy::cast_possible_truncation, reason = "color channels are f32")]
        let t = t as f32;
        let (a, b) = (self.low.components, self.high.components);
        Color::new([
            a[0] + t * (b[0] - a[0]),
            a[1] + t * (b[1] - a[1]),
            a[2] + t * (b[2] - a[2]),
            1.0,
        ])
    }

    /// Binned color scale for a legend docked beside the graph.
    pub(crate) fn legend(&self) -> Legend {
        let (lo, hi) = self.range;
        let step = (hi - lo) / LEGEND_BINS as f64;
        let items = (0..LEGEND_BINS)
            .map(|i| {
                let from = lo + i as f64 * step;
                let to = from + step;
                LegendItem::solid(
                    format!("{from:.1} to {to:.1}"),
                    self.color(from + 0.5 * step),
                )
            })
            .collect();
        Legend::new(items).with_header("Value")
    }

    fn bracket_axis(axis_type: AxisType, anchor: (f64, f64), labels: &[String]) -> CustomAxis {
        let mut custom = CustomAxis::new(axis_type, anchor);
        let axis = custom.axis_mut();
        axis.set_range(0.0, labels.len().max(1) as f64, 0, 1.0, 1);
        axis.set_label_display(LabelDisplay::None);
        axis.set_tick_mark_display(TickMarkDisplay::None);
        let n = labels.len();
        for (i, label) in labels.iter().enumerate() {
            // Rows run top to bottom while the vertical axis grows upward.
            let slot = if axis_type.is_vertical() {
                n - 1 - i
            } else {
                i
            };
            let start = slot as f64;
            custom.add_bracket(
                Bracket::centered(start, start + 1.0, label.clone())
                    .with_line_style(BracketLineStyle::NoConnectionLines),
            );
        }
        custom
    }
}

impl DrawableProducer for HeatMap {
    fn configure_axes(&self, axes: &mut AxisSet) {
        let (w, h) = (self.columns.len().max(1) as f64, self.rows.len().max(1) as f64);
        for (axis_type, end) in [(AxisType::BottomX, w), (AxisType::LeftY, h)] {
            let axis = axes.get_mut(axis_type);
            axis.set_range(0.0, end, 0, 1.0, 1);
            axis.set_label_display(LabelDisplay::None);
            axis.set_tick_mark_display(TickMarkDisplay::None);
        }
        axes.clear_custom();
        axes.add_custom(Self::bracket_axis(AxisType::BottomX, (w, 0.0), &self.columns));
        axes.add_custom(Self::bracket_axis(AxisType::LeftY, (0.0, h), &self.rows));
    }

    fn produce_drawables(&self, ctx: &LayoutContext<'_>, ids: &mut IdAllocator) -> Vec<Drawable> {
        let mut out = Vec::new();
        let width = self.columns.len();
        let height = self.rows.len();
        for (index, cell) in self.cells.iter().enumerate() {
            let Some(value) = *cell else {
                continue;
            };
            let (r, c) = (index / width, index % width);
            let (x, y) = (c as f64, (height - 1 - r) as f64);
            let (Some(a), Some(b)) = (ctx.data_point(x, y + 1.0), ctx.data_point(x + 1.0, y))
            else {
                continue;
            };
            out.push(Drawable::new(
                ids.next_id(),
                DrawableRole::Series,
                SERIES,
                Primitive::Polygon {
                    points: smallvec![
                        Point::new(a.x, a.y),
                        Point::new(b.x, a.y),
                        Point::new(b.x, b.y),
                        Point::new(a.x, b.y),
                    ],
                    fill: self.color(value).into(),
                    stroke: None,
                },
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use plotwise_graph::CategoricalColumn;

    use super::*;

    fn data() -> Dataset {
        Dataset::new()
            .with_categorical("day", CategoricalColumn::from_labels(["Mon", "Mon", "Tue"]))
            .with_categorical("hour", CategoricalColumn::from_labels(["9", "9", "10"]))
            .with_continuous("load", vec![2.0, 4.0, 10.0])
    }

    #[test]
    fn cells_average_duplicates() {
        let mut map = HeatMap::new();
        map.set_data(&data(), "day", "hour", "load").unwrap();
        assert_eq!(map.rows, ["Mon", "Tue"]);
        assert_eq!(map.columns, ["9", "10"]);
        assert_eq!(map.cells, [Some(3.0), None, None, Some(10.0)]);
        assert_eq!(map.range, (2.0, 10.0));
    }

    #[test]
    fn colors_span_the_value_range() {
        let mut map = HeatMap::new();
        map.set_data(&data(), "day", "hour", "load").unwrap();
        assert_eq!(map.color(2.0), Color::new(map.low.components));
        let top = map.color(10.0).components;
        for (got, want) in top.iter().zip(map.high.components) {
            assert!((got - want).abs() < 1e-6, "{top:?} vs {:?}", map.high);
        }
        assert_eq!(map.legend().items.len(), LEGEND_BINS);
    }

    #[test]
    fn wrong_column_kind_is_reported() {
        let mut map = HeatMap::new();
        assert_eq!(
            map.set_data(&data(), "load", "hour", "load"),
            Err(GraphError::ColumnTypeMismatch {
                name: "load".into(),
                expected: "categorical",
            })
        );
    }
}
