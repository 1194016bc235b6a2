// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis coordinate systems and plot-area layout for 2D statistical graphs.
//!
//! This crate sits between a graph type (box plot, heat map, gauge, ...) and a renderer:
//! - **Axes** map data values onto the surface and know how much room their labels need.
//! - **The solver** fits the plot area inside a bounding box so that axis labels, titles,
//!   custom axes and brackets all fit without overlapping.
//! - **[`Graph2D`]** runs the layout cycle and emits an ordered list of [`Drawable`]s.
//!
//! Text is never shaped here. Every size comes from an injected
//! [`TextMeasurer`](plotwise_text::TextMeasurer), and text drawables carry unshaped strings.
//!
//! ```
//! use kurbo::Rect;
//! use plotwise_graph::{AxisType, Graph2D};
//! use plotwise_text::HeuristicTextMeasurer;
//!
//! let mut graph = Graph2D::new(Rect::new(0.0, 0.0, 640.0, 480.0)).with_title("Rainfall");
//! graph.axis_mut(AxisType::BottomX).set_range_auto(0.0, 97.0, false);
//! graph.recalc_sizes(&HeuristicTextMeasurer);
//!
//! let plot = graph.plot_area().unwrap().plot_rect;
//! assert!(plot.width() > 0.0 && plot.height() > 0.0);
//! assert!(!graph.drawables().is_empty());
//! ```

#![no_std]

extern crate alloc;

mod annotation;
mod axis;
mod config;
mod custom_axis;
mod dataset;
mod decoration;
mod drawable;
mod engine;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod graph2d;
mod label;
mod label_fit;
mod legend;
mod measure;
mod producer;
mod reference;
mod solver;
mod style;
mod z_order;

pub use annotation::Annotation;
pub use axis::{
    Axis, AxisLabelOrientation, AxisLayout, AxisPoint, AxisPoints, AxisType, LabelDisplay,
    LabelWrapping, MAX_AXIS_POINTS, SPACING_BETWEEN_LABELS_AND_LINE, TickMarkDisplay,
};
pub use config::LayoutConfig;
pub use custom_axis::{BRACKET_CONNECTOR_LENGTH, Bracket, BracketLineStyle, CustomAxis};
pub use dataset::{CategoricalColumn, Dataset};
pub use decoration::Decoration;
pub use drawable::{
    Anchoring, Drawable, DrawableId, DrawableRole, IdAllocator, Primitive, arrow_head,
};
pub use engine::{LayoutEngine, LayoutOptions};
pub use error::{GraphError, Result};
pub use graph2d::Graph2D;
pub use label::{Label, Orientation};
pub use legend::{
    Legend, LegendCanvasPlacementHint, LegendFit, LegendIcon, LegendItem, MIN_LEGEND_WIDTH,
    adjust_legend,
};
pub use measure::MeasureCache;
pub use producer::{DrawableProducer, LayoutContext};
pub use reference::{ReferenceArea, ReferenceLine};
pub use solver::{AxisSet, ContentPins, DecorationSlot, Decorations, PlotAreaState};
pub use style::{RelativeAlignment, StrokeStyle};
pub use z_order::*;

pub use plotwise_text::{HeuristicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};
