// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graph demos for `plotwise_graph`.
//!
//! Writes `box_plot.svg`, `heat_map.svg` and `gauge.svg` into the directory given as the first
//! argument (default: the current directory). Set `RUST_LOG=plotwise_graph=debug` to watch the
//! solver passes.

mod box_plot;
mod gauge;
mod heat_map;
mod svg;

use std::error::Error;
use std::path::{Path, PathBuf};

use kurbo::{Point, Rect};
use peniko::color::palette::css;
use plotwise_graph::{
    Annotation, AxisType, CategoricalColumn, ContentPins, Dataset, Graph2D, HeuristicTextMeasurer,
    IdAllocator, Legend, LegendCanvasPlacementHint, ReferenceArea, ReferenceLine, StrokeStyle,
    TextMeasurer, adjust_legend,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use crate::box_plot::BoxPlot;
use crate::gauge::Gauge;
use crate::heat_map::HeatMap;

const CANVAS: Rect = Rect::new(0.0, 0.0, 640.0, 420.0);
const SEED: u64 = 0x5eed;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    std::fs::create_dir_all(&out_dir)?;
    let measurer = HeuristicTextMeasurer;
    let mut rng = StdRng::seed_from_u64(SEED);
    let data = sample_data(&mut rng);

    let box_plot = box_plot_demo(&data, &measurer, &mut rng)?;
    write_svg(&out_dir, "box_plot.svg", &box_plot)?;
    write_svg(&out_dir, "heat_map.svg", &heat_map_demo(&data, &measurer)?)?;
    write_svg(&out_dir, "gauge.svg", &gauge_demo(&data, &measurer)?)?;
    Ok(())
}

fn write_svg(dir: &Path, name: &str, svg: &str) -> std::io::Result<()> {
    let path = dir.join(name);
    std::fs::write(&path, svg)?;
    tracing::info!(path = %path.display(), "wrote");
    Ok(())
}

/// Three weeks of synthetic response times per weekday and hour.
fn sample_data(rng: &mut impl Rng) -> Dataset {
    const DAYS: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];
    const HOURS: [&str; 6] = ["8", "10", "12", "14", "16", "18"];
    let mut days = Vec::new();
    let mut hours = Vec::new();
    let mut latency = Vec::new();
    for _week in 0..3 {
        for (d, day) in DAYS.iter().enumerate() {
            for (h, hour) in HOURS.iter().enumerate() {
                let base = 120.0 + 15.0 * d as f64 + if (2..=3).contains(&h) { 60.0 } else { 0.0 };
                let spike = if rng.random_bool(0.05) { 250.0 } else { 0.0 };
                days.push(*day);
                hours.push(*hour);
                latency.push(base + spike + rng.random_range(-25.0..25.0));
            }
        }
    }
    Dataset::new()
        .with_categorical("day", CategoricalColumn::from_labels(days))
        .with_categorical("hour", CategoricalColumn::from_labels(hours))
        .with_continuous("latency", latency)
}

fn box_plot_demo(
    data: &Dataset,
    measurer: &dyn TextMeasurer,
    rng: &mut impl Rng,
) -> Result<String, Box<dyn Error>> {
    let mut graph = Graph2D::new(CANVAS)
        .with_title("Response time by weekday")
        .with_subtitle("three weeks, all hours")
        .with_caption("Whiskers reach 1.5 IQR; circles mark outliers.");
    graph.set_background(Some(css::WHITE_SMOKE.into()));
    graph.axis_mut(AxisType::LeftY).set_title("latency (ms)");
    graph.axis_mut(AxisType::LeftY).enable_gridlines();
    graph.mirror_y_axis(true);

    let (lo, hi) = data.continuous_range("latency")?;
    let target = lo + 0.5 * (hi - lo);
    graph.add_reference_line(
        ReferenceLine::new(AxisType::LeftY, target)
            .with_stroke(StrokeStyle::dashed(css::CRIMSON, 1.0, 4.0))
            .with_label("Target"),
    );
    graph.add_reference_area(
        ReferenceArea::new(AxisType::BottomX, 0.5, 1.5)
            .with_fill(css::GOLD.with_alpha(0.2))
            .with_label("Start of week"),
    );
    graph.add_annotation(
        Annotation::new("Midweek", (3.0, hi)).with_interest_points([(3.0, target)]),
    );

    let mut legend = Legend::new(graph.reference_legend_items());
    adjust_legend(&mut legend, LegendCanvasPlacementHint::EmbeddedOnGraph);
    legend.background = Some(css::WHITE.into());

    let mut plot = BoxPlot::new().with_legend(legend);
    plot.set_data(data, "latency", "day", rng)?;
    graph.recalc_sizes_with(measurer, &plot);
    Ok(svg::render(graph.drawables(), CANVAS))
}

fn heat_map_demo(data: &Dataset, measurer: &dyn TextMeasurer) -> Result<String, Box<dyn Error>> {
    let mut map = HeatMap::new();
    map.set_data(data, "day", "hour", "latency")?;

    let mut legend = map.legend();
    adjust_legend(&mut legend, LegendCanvasPlacementHint::RightOfGraph);
    let (legend_w, _) = legend.measure(measurer);
    let graph_box = Rect::new(CANVAS.x0, CANVAS.y0, CANVAS.x1 - legend_w, CANVAS.y1);

    let mut graph = Graph2D::new(graph_box).with_title("Mean response time (ms)");
    // Keep the grid's top edge level with the legend.
    graph.set_content_pins(ContentPins {
        top: Some(40.0),
        ..ContentPins::default()
    });
    graph.recalc_sizes_with(measurer, &map);

    let mut drawables = graph.take_drawables();
    let mut ids = IdAllocator::default();
    // Legend ids only need to be unique among themselves; the renderer orders by layer first.
    drawables.extend(legend.drawables(Point::new(graph_box.x1, 40.0), measurer, &mut ids));
    Ok(svg::render(&drawables, CANVAS))
}

fn gauge_demo(data: &Dataset, measurer: &dyn TextMeasurer) -> Result<String, Box<dyn Error>> {
    let mut gauge = Gauge::new(0.0, 400.0, 50.0)?
        .with_band(0.0, 200.0, css::MEDIUM_SEA_GREEN)
        .with_band(200.0, 300.0, css::GOLD)
        .with_band(300.0, 400.0, css::TOMATO);
    gauge.set_data(data, "latency")?;

    let mut graph = Graph2D::new(CANVAS)
        .with_title("Mean response time")
        .with_caption("ms, all weekdays");
    graph.recalc_sizes_with(measurer, &gauge);
    Ok(svg::render(graph.drawables(), CANVAS))
}
