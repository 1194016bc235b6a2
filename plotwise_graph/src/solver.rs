// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plot-area solver.
//!
//! One call to [`adjust_plot_area`] is one solver pass: starting from the whole bounding box,
//! it measures how far each axis sticks out, reserves room for decorations, applies content
//! pins and finally fixes every axis's physical endpoints. A pass always starts from the
//! bounding box, never from the previous pass's result, so repeated passes over unchanged
//! inputs give identical output.
//!
//! Passes are scheduled by [`crate::LayoutEngine`]; this module knows nothing about stacking or
//! font harmonization.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::{Insets, Point, Rect};
use plotwise_text::TextMeasurer;

use crate::axis::{Axis, AxisLayout, AxisType};
use crate::config::LayoutConfig;
use crate::custom_axis::CustomAxis;
use crate::decoration::Decoration;

/// The four main axes plus any custom axes.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisSet {
    left: Axis,
    right: Axis,
    bottom: Axis,
    top: Axis,
    custom: Vec<CustomAxis>,
}

impl AxisSet {
    /// Four default main axes and no custom axes.
    pub fn new() -> Self {
        Self {
            left: Axis::new(AxisType::LeftY),
            right: Axis::new(AxisType::RightY),
            bottom: Axis::new(AxisType::BottomX),
            top: Axis::new(AxisType::TopX),
            custom: Vec::new(),
        }
    }

    /// The main axis of the given type.
    pub fn get(&self, axis_type: AxisType) -> &Axis {
        match axis_type {
            AxisType::LeftY => &self.left,
            AxisType::RightY => &self.right,
            AxisType::BottomX => &self.bottom,
            AxisType::TopX => &self.top,
        }
    }

    /// Mutable access to the main axis of the given type.
    pub fn get_mut(&mut self, axis_type: AxisType) -> &mut Axis {
        match axis_type {
            AxisType::LeftY => &mut self.left,
            AxisType::RightY => &mut self.right,
            AxisType::BottomX => &mut self.bottom,
            AxisType::TopX => &mut self.top,
        }
    }

    /// The main axes in [`AxisType::ALL`] order.
    pub fn main(&self) -> [&Axis; 4] {
        [&self.left, &self.right, &self.bottom, &self.top]
    }

    pub(crate) fn main_mut(&mut self) -> [&mut Axis; 4] {
        [
            &mut self.left,
            &mut self.right,
            &mut self.bottom,
            &mut self.top,
        ]
    }

    /// Custom axes in insertion order.
    pub fn custom(&self) -> &[CustomAxis] {
        &self.custom
    }

    /// Mutable access to the custom axes.
    pub fn custom_mut(&mut self) -> &mut [CustomAxis] {
        &mut self.custom
    }

    /// Appends a custom axis and returns its index.
    pub fn add_custom(&mut self, axis: CustomAxis) -> usize {
        self.custom.push(axis);
        self.custom.len() - 1
    }

    /// Removes every custom axis.
    pub fn clear_custom(&mut self) {
        self.custom.clear();
    }

    /// Copies the bottom axis onto the top one, with labels shown.
    pub(crate) fn mirror_x(&mut self) {
        self.top.copy_settings_from(&self.bottom);
    }

    /// Copies the left axis onto the right one, with labels shown.
    pub(crate) fn mirror_y(&mut self) {
        self.right.copy_settings_from(&self.left);
    }

    /// Maps every main axis onto the edges of `plot`, then places the custom axes.
    pub(crate) fn set_points(&mut self, plot: Rect) {
        self.left
            .set_points(Point::new(plot.x0, plot.y1), Point::new(plot.x0, plot.y0));
        self.right
            .set_points(Point::new(plot.x1, plot.y1), Point::new(plot.x1, plot.y0));
        self.bottom
            .set_points(Point::new(plot.x0, plot.y1), Point::new(plot.x1, plot.y1));
        self.top
            .set_points(Point::new(plot.x0, plot.y0), Point::new(plot.x1, plot.y0));
        for custom in &mut self.custom {
            custom.position_from(&self.left, &self.bottom);
        }
    }

    /// Resolves a data-space point through the bottom (x) and left (y) axes.
    ///
    /// Returns `None` if either coordinate is out of range or the axes are not mapped yet.
    pub fn data_point(&self, x: f64, y: f64) -> Option<Point> {
        Some(Point::new(
            self.bottom.get_physical_coordinate(x)?,
            self.left.get_physical_coordinate(y)?,
        ))
    }

    /// Snapshots of the main axes in [`AxisType::ALL`] order.
    pub fn layouts(&self) -> [AxisLayout; 4] {
        self.main().map(Axis::layout)
    }
}

impl Default for AxisSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Title, subtitle and caption of a graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Decorations {
    /// Drawn above the plot.
    pub title: Decoration,
    /// Drawn between the title and the plot.
    pub subtitle: Decoration,
    /// Drawn below the plot.
    pub caption: Decoration,
}

impl Decorations {
    pub(crate) fn reset_scales(&mut self, graph_scaling: f64) {
        self.title.reset_scale(graph_scaling);
        self.subtitle.reset_scale(graph_scaling);
        self.caption.reset_scale(graph_scaling);
    }
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            title: Decoration::title(""),
            subtitle: Decoration::subtitle(""),
            caption: Decoration::caption(""),
        }
    }
}

/// Plot-area edges fixed by the caller, in surface coordinates.
///
/// Used to line up the plot areas of several graphs that share an axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContentPins {
    /// Fixed top edge.
    pub top: Option<f64>,
    /// Fixed bottom edge.
    pub bottom: Option<f64>,
    /// Fixed left edge.
    pub left: Option<f64>,
    /// Fixed right edge.
    pub right: Option<f64>,
}

impl ContentPins {
    /// Whether any edge is pinned.
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none() && self.left.is_none() && self.right.is_none()
    }
}

/// Where a decoration ended up in one pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorationSlot {
    /// Whether the decoration took up space.
    pub shown: bool,
    /// Fitted font scale.
    pub scale: f64,
    /// Top edge on the surface.
    pub top: f64,
    /// Height reserved for the text itself.
    pub height: f64,
}

/// Immutable result of one solver pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotAreaState {
    /// 1-based pass number within the cycle.
    pub pass: usize,
    /// Whole graph area, after content pins moved its edges.
    pub bounding_box: Rect,
    /// Interior bounded by the main axes. Always inside `bounding_box`.
    pub plot_rect: Rect,
    /// Room reserved for axis overhang on each side, rounded up to whole pixels
    /// (`x0` left, `y0` top, `x1` right, `y1` bottom).
    pub padding: Insets,
    /// Main axis snapshots in [`AxisType::ALL`] order.
    pub axes: [AxisLayout; 4],
    /// Custom axis snapshots in insertion order.
    pub custom_axes: Vec<AxisLayout>,
    /// Title placement.
    pub title: DecorationSlot,
    /// Subtitle placement.
    pub subtitle: DecorationSlot,
    /// Caption placement.
    pub caption: DecorationSlot,
}

impl PlotAreaState {
    /// Snapshot of the main axis of the given type.
    pub fn axis(&self, axis_type: AxisType) -> &AxisLayout {
        let index = match axis_type {
            AxisType::LeftY => 0,
            AxisType::RightY => 1,
            AxisType::BottomX => 2,
            AxisType::TopX => 3,
        };
        &self.axes[index]
    }
}

/// Replaces non-finite or sub-pixel boxes with something drawable.
fn sanitize_bounding_box(bounding_box: Rect) -> Rect {
    let finite = [
        bounding_box.x0,
        bounding_box.y0,
        bounding_box.x1,
        bounding_box.y1,
    ]
    .iter()
    .all(|v| v.is_finite());
    if !finite {
        tracing::warn!(?bounding_box, "non-finite bounding box; using a 1px box");
        return Rect::new(0.0, 0.0, 1.0, 1.0);
    }
    let mut b = bounding_box.abs();
    if b.width() < 1.0 || b.height() < 1.0 {
        tracing::warn!(?bounding_box, "bounding box smaller than 1px; enlarging");
        b.x1 = b.x1.max(b.x0 + 1.0);
        b.y1 = b.y1.max(b.y0 + 1.0);
    }
    b
}

/// Largest distance each axis reaches past the edges of `plot` (`x0` left, `y0` top, `x1`
/// right, `y1` bottom).
fn measure_overhang(axes: &AxisSet, plot: Rect, measurer: &dyn TextMeasurer) -> Insets {
    let mut overhang = Insets::ZERO;
    let mut grow = |bbox: Rect| {
        overhang.x0 = overhang.x0.max(plot.x0 - bbox.x0);
        overhang.y0 = overhang.y0.max(plot.y0 - bbox.y0);
        overhang.x1 = overhang.x1.max(bbox.x1 - plot.x1);
        overhang.y1 = overhang.y1.max(bbox.y1 - plot.y1);
    };
    for axis in axes.main() {
        if let Some(bbox) = axis.bounding_box(measurer) {
            tracing::trace!(axis = ?axis.axis_type(), ?bbox, "axis extent");
            grow(bbox);
        }
    }
    for (index, custom) in axes.custom().iter().enumerate() {
        if let Some(bbox) = custom.bounding_box(measurer) {
            tracing::trace!(custom_axis = index, ?bbox, "custom axis extent");
            grow(bbox);
        }
    }

    // Titles and brackets may stick out further than the tick labels alone.
    for axis in axes.main() {
        let thickness = axis.protruding_thickness(measurer);
        match axis.axis_type() {
            AxisType::LeftY => overhang.x0 = overhang.x0.max(thickness),
            AxisType::RightY => overhang.x1 = overhang.x1.max(thickness),
            AxisType::BottomX => overhang.y1 = overhang.y1.max(thickness),
            AxisType::TopX => overhang.y0 = overhang.y0.max(thickness),
        }
    }
    Insets::new(
        overhang.x0.max(0.0).ceil(),
        overhang.y0.max(0.0).ceil(),
        overhang.x1.max(0.0).ceil(),
        overhang.y1.max(0.0).ceil(),
    )
}

/// Moves the plot edges to the pinned values and drags the bounding box inward by the same
/// amount.
fn apply_pins(pins: &ContentPins, plot: &mut Rect, bbox: &mut Rect) {
    if pins.is_empty() {
        return;
    }
    if let Some(top) = pins.top {
        let delta = top - plot.y0;
        plot.y0 = top;
        bbox.y0 += delta.max(0.0);
    }
    if let Some(bottom) = pins.bottom {
        let delta = plot.y1 - bottom;
        plot.y1 = bottom;
        bbox.y1 -= delta.max(0.0);
    }
    if let Some(left) = pins.left {
        let delta = left - plot.x0;
        plot.x0 = left;
        bbox.x0 += delta.max(0.0);
    }
    if let Some(right) = pins.right {
        let delta = plot.x1 - right;
        plot.x1 = right;
        bbox.x1 -= delta.max(0.0);
    }
    if bbox.width() < 1.0 || bbox.height() < 1.0 {
        tracing::warn!(?bbox, "content pins collapsed the bounding box; enlarging");
        bbox.x1 = bbox.x1.max(bbox.x0 + 1.0);
        bbox.y1 = bbox.y1.max(bbox.y0 + 1.0);
    }
}

/// Clamps a too-small plot rect to 1px inside `bbox`.
fn clamp_degenerate(plot: Rect, bbox: Rect) -> Rect {
    let mut plot = plot;
    if plot.width() < 1.0 {
        tracing::warn!(
            width = plot.width(),
            "plot area too narrow; clamping to 1px"
        );
        let x0 = plot.x0.min(bbox.x1 - 1.0).max(bbox.x0);
        plot.x0 = x0;
        plot.x1 = x0 + 1.0;
    }
    if plot.height() < 1.0 {
        tracing::warn!(
            height = plot.height(),
            "plot area too short; clamping to 1px"
        );
        let y0 = plot.y0.min(bbox.y1 - 1.0).max(bbox.y0);
        plot.y0 = y0;
        plot.y1 = y0 + 1.0;
    }
    plot
}

fn slot(decoration: &Decoration, top: f64, measurer: &dyn TextMeasurer) -> DecorationSlot {
    DecorationSlot {
        shown: decoration.is_shown(),
        scale: decoration.fitted_scale(),
        top,
        height: decoration.measure(measurer).1,
    }
}

/// Runs one solver pass and leaves every axis mapped onto the resulting plot rect.
///
/// Never fails: empty, non-finite or over-constrained inputs produce a clamped layout and a
/// logged warning.
pub(crate) fn adjust_plot_area(
    bounding_box: Rect,
    axes: &mut AxisSet,
    decorations: &mut Decorations,
    pins: &ContentPins,
    config: &LayoutConfig,
    graph_scaling: f64,
    measurer: &dyn TextMeasurer,
    pass: usize,
) -> PlotAreaState {
    let mut bbox = sanitize_bounding_box(bounding_box);

    // Provisional mapping so labels can be measured.
    axes.set_points(bbox);
    let padding = measure_overhang(axes, bbox, measurer);

    let width = bbox.width();
    decorations.title.shrink_to_fit(width, measurer);
    decorations.subtitle.shrink_to_fit(width, measurer);
    decorations.caption.shrink_to_fit(width, measurer);

    let spacing = config.line_spacing * graph_scaling;
    let title_h = decorations.title.measure(measurer).1;
    let subtitle_h = decorations.subtitle.measure(measurer).1;
    let caption_h = decorations.caption.measure(measurer).1;
    let headings =
        usize::from(decorations.title.is_shown()) + usize::from(decorations.subtitle.is_shown());
    let mut top_reserve = title_h + subtitle_h;
    if headings > 0 {
        top_reserve += spacing * if headings == 2 { 2.0 } else { 1.0 };
    }
    let bottom_reserve = if decorations.caption.is_shown() {
        caption_h + spacing
    } else {
        0.0
    };

    let mut plot = Rect::new(
        bbox.x0 + padding.x0,
        bbox.y0 + top_reserve + padding.y0,
        bbox.x1 - padding.x1,
        bbox.y1 - bottom_reserve - padding.y1,
    );

    apply_pins(pins, &mut plot, &mut bbox);
    let plot = clamp_degenerate(plot.intersect(bbox), bbox);

    axes.set_points(plot);

    let title = slot(&decorations.title, bbox.y0, measurer);
    let subtitle_top = if decorations.title.is_shown() {
        bbox.y0 + title_h + spacing
    } else {
        bbox.y0
    };
    let subtitle = slot(&decorations.subtitle, subtitle_top, measurer);
    let caption = slot(&decorations.caption, bbox.y1 - caption_h, measurer);

    tracing::debug!(pass, ?plot, ?padding, "solved plot area");

    PlotAreaState {
        pass,
        bounding_box: bbox,
        plot_rect: plot,
        padding,
        axes: axes.layouts(),
        custom_axes: axes.custom().iter().map(|c| c.axis().layout()).collect(),
        title,
        subtitle,
        caption,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use plotwise_text::HeuristicTextMeasurer;

    fn inside(outer: Rect, inner: Rect) -> bool {
        inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
    }

    fn solve(bbox: Rect, axes: &mut AxisSet, decorations: &mut Decorations) -> PlotAreaState {
        adjust_plot_area(
            bbox,
            axes,
            decorations,
            &ContentPins::default(),
            &LayoutConfig::default(),
            1.0,
            &HeuristicTextMeasurer,
            1,
        )
    }

    #[test]
    fn plot_rect_stays_inside_bounding_box() {
        let mut axes = AxisSet::new();
        let mut decorations = Decorations::default();
        decorations.title.set_text("Title");
        decorations.caption.set_text("Caption");
        let bbox = Rect::new(10.0, 20.0, 410.0, 320.0);
        let state = solve(bbox, &mut axes, &mut decorations);
        assert!(inside(state.bounding_box, state.plot_rect));
        assert!(state.plot_rect.y0 > bbox.y0 + state.title.height);
        assert!(state.plot_rect.y1 < bbox.y1 - state.caption.height);
        assert_eq!(
            axes.get(AxisType::LeftY).points(),
            Some((
                Point::new(state.plot_rect.x0, state.plot_rect.y1),
                Point::new(state.plot_rect.x0, state.plot_rect.y0)
            ))
        );
    }

    #[test]
    fn degenerate_box_is_clamped() {
        let mut axes = AxisSet::new();
        let mut decorations = Decorations::default();
        let state = solve(Rect::new(0.0, 0.0, 20.0, 20.0), &mut axes, &mut decorations);
        assert!((state.plot_rect.width() - 1.0).abs() < 1e-9);
        assert!((state.plot_rect.height() - 1.0).abs() < 1e-9);
        assert!(inside(state.bounding_box, state.plot_rect));

        let state = solve(
            Rect::new(0.0, 0.0, f64::NAN, 10.0),
            &mut axes,
            &mut decorations,
        );
        assert_eq!(state.bounding_box, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(inside(state.bounding_box, state.plot_rect));
    }

    #[test]
    fn pins_move_the_bounding_box_inward() {
        let mut axes = AxisSet::new();
        let mut decorations = Decorations::default();
        decorations.title.set_text("Title");
        let bbox = Rect::new(0.0, 0.0, 400.0, 300.0);
        let free = solve(bbox, &mut axes, &mut decorations);
        let pins = ContentPins {
            top: Some(free.plot_rect.y0 + 30.0),
            left: Some(free.plot_rect.x0 + 10.0),
            ..ContentPins::default()
        };
        let pinned = adjust_plot_area(
            bbox,
            &mut axes,
            &mut decorations,
            &pins,
            &LayoutConfig::default(),
            1.0,
            &HeuristicTextMeasurer,
            1,
        );
        assert_eq!(pinned.plot_rect.y0, free.plot_rect.y0 + 30.0);
        assert_eq!(pinned.plot_rect.x0, free.plot_rect.x0 + 10.0);
        assert_eq!(pinned.bounding_box.y0, 30.0);
        assert_eq!(pinned.bounding_box.x0, 10.0);
        assert_eq!(pinned.title.top, 30.0);
    }

    #[test]
    fn hidden_decorations_reserve_nothing() {
        let mut axes = AxisSet::new();
        for axis in axes.main_mut() {
            axis.show(false);
        }
        let mut decorations = Decorations::default();
        let bbox = Rect::new(0.0, 0.0, 200.0, 100.0);
        let state = solve(bbox, &mut axes, &mut decorations);
        assert_eq!(state.plot_rect, bbox);
        assert_eq!(state.padding, Insets::ZERO);
    }
}
