// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The graph orchestrator.
//!
//! [`Graph2D`] owns the axes, decorations, reference lines and areas, and annotations of one
//! graph. Each call to [`Graph2D::recalc_sizes`] runs a full layout cycle and rebuilds the
//! drawable list from scratch, in paint order:
//!
//! background, gridlines, axes, decorations, custom axes and brackets, reference areas and
//! lines, annotations, then whatever the graph type produces.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Brush;
use plotwise_text::TextMeasurer;
use smallvec::smallvec;

use crate::annotation::Annotation;
use crate::axis::{Axis, AxisType, LabelDisplay, TickMarkDisplay};
use crate::config::LayoutConfig;
use crate::custom_axis::CustomAxis;
use crate::decoration::Decoration;
use crate::drawable::{Drawable, DrawableId, DrawableRole, IdAllocator, Primitive};
use crate::engine::{LayoutEngine, LayoutOptions};
use crate::error::Result;
use crate::legend::LegendItem;
use crate::measure::MeasureCache;
use crate::producer::{DrawableProducer, LayoutContext};
use crate::reference::{ReferenceArea, ReferenceLine};
use crate::solver::{AxisSet, ContentPins, Decorations, PlotAreaState};
use crate::z_order;

/// A laid-out 2D graph.
#[derive(Debug)]
pub struct Graph2D {
    bounding_box: Rect,
    options: LayoutOptions,
    axes: AxisSet,
    decorations: Decorations,
    background: Option<Brush>,
    reference_lines: Vec<ReferenceLine>,
    reference_areas: Vec<ReferenceArea>,
    annotations: Vec<Annotation>,
    engine: LayoutEngine,
    drawables: Vec<Drawable>,
    ids: IdAllocator,
}

impl Graph2D {
    /// A graph filling `bounding_box`, with default axes and no decorations.
    pub fn new(bounding_box: Rect) -> Self {
        Self {
            bounding_box,
            options: LayoutOptions::default(),
            axes: AxisSet::new(),
            decorations: Decorations::default(),
            background: None,
            reference_lines: Vec::new(),
            reference_areas: Vec::new(),
            annotations: Vec::new(),
            engine: LayoutEngine::default(),
            drawables: Vec::new(),
            ids: IdAllocator::default(),
        }
    }

    /// The area the graph lays itself out in.
    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    /// Moves or resizes the graph; takes effect on the next cycle.
    pub fn set_bounding_box(&mut self, bounding_box: Rect) {
        self.bounding_box = bounding_box;
    }

    /// Sets the overall scaling (DPI or zoom).
    pub fn with_scaling(mut self, scaling: f64) -> Self {
        self.set_scaling(scaling);
        self
    }

    /// Sets the overall scaling (DPI or zoom). Non-positive values are ignored.
    pub fn set_scaling(&mut self, scaling: f64) {
        if scaling.is_finite() && scaling > 0.0 {
            self.options.scaling = scaling;
        }
    }

    /// The overall scaling.
    pub fn scaling(&self) -> f64 {
        self.options.scaling
    }

    /// The layout tunables.
    pub fn layout_config(&self) -> &LayoutConfig {
        self.engine.config()
    }

    /// Replaces the layout tunables after validating them.
    pub fn set_layout_config(&mut self, config: LayoutConfig) -> Result<()> {
        config.validate()?;
        self.engine.set_config(config);
        Ok(())
    }

    /// The main axis of the given type.
    pub fn axis(&self, axis_type: AxisType) -> &Axis {
        self.axes.get(axis_type)
    }

    /// Mutable access to the main axis of the given type.
    pub fn axis_mut(&mut self, axis_type: AxisType) -> &mut Axis {
        self.axes.get_mut(axis_type)
    }

    /// All axes.
    pub fn axes(&self) -> &AxisSet {
        &self.axes
    }

    /// Mutable access to all axes.
    pub fn axes_mut(&mut self) -> &mut AxisSet {
        &mut self.axes
    }

    /// Maps `value` through the given main axis, as of the last cycle.
    pub fn get_physical_coordinate(&self, axis_type: AxisType, value: f64) -> Option<f64> {
        self.axes.get(axis_type).get_physical_coordinate(value)
    }

    /// Adds a custom axis and returns its index.
    pub fn add_custom_axis(&mut self, axis: CustomAxis) -> usize {
        self.axes.add_custom(axis)
    }

    /// Title, subtitle and caption.
    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    /// Mutable access to the title.
    pub fn title_mut(&mut self) -> &mut Decoration {
        &mut self.decorations.title
    }

    /// Mutable access to the subtitle.
    pub fn subtitle_mut(&mut self) -> &mut Decoration {
        &mut self.decorations.subtitle
    }

    /// Mutable access to the caption.
    pub fn caption_mut(&mut self) -> &mut Decoration {
        &mut self.decorations.caption
    }

    /// Sets the title text.
    pub fn with_title(mut self, text: impl Into<String>) -> Self {
        self.decorations.title.set_text(text);
        self
    }

    /// Sets the subtitle text.
    pub fn with_subtitle(mut self, text: impl Into<String>) -> Self {
        self.decorations.subtitle.set_text(text);
        self
    }

    /// Sets the caption text.
    pub fn with_caption(mut self, text: impl Into<String>) -> Self {
        self.decorations.caption.set_text(text);
        self
    }

    /// Makes the top axis a copy of the bottom axis, labels included.
    ///
    /// Turning mirroring off returns the top axis to drawing only its line.
    pub fn mirror_x_axis(&mut self, mirror: bool) {
        self.options.mirror_x_axis = mirror;
        Self::mirror_axis(self.axes.get_mut(AxisType::TopX), mirror);
    }

    /// Makes the right axis a copy of the left axis, labels included.
    ///
    /// Turning mirroring off returns the right axis to drawing only its line.
    pub fn mirror_y_axis(&mut self, mirror: bool) {
        self.options.mirror_y_axis = mirror;
        Self::mirror_axis(self.axes.get_mut(AxisType::RightY), mirror);
    }

    fn mirror_axis(axis: &mut Axis, mirror: bool) {
        if mirror {
            axis.show(true);
        } else {
            axis.set_label_display(LabelDisplay::None);
            axis.set_tick_mark_display(TickMarkDisplay::None);
        }
    }

    /// Pins plot-area edges, e.g. to align with a neighboring graph.
    pub fn set_content_pins(&mut self, pins: ContentPins) {
        self.options.pins = pins;
    }

    /// The pinned plot-area edges.
    pub fn content_pins(&self) -> ContentPins {
        self.options.pins
    }

    /// Sets (or removes) the plot-area background fill.
    pub fn set_background(&mut self, background: Option<Brush>) {
        self.background = background;
    }

    /// Adds a reference line.
    pub fn add_reference_line(&mut self, line: ReferenceLine) {
        self.reference_lines.push(line);
    }

    /// Adds a reference area.
    pub fn add_reference_area(&mut self, area: ReferenceArea) {
        self.reference_areas.push(area);
    }

    /// Adds an annotation.
    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Annotations in insertion order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Legend rows for labelled reference lines and areas, ordered by position along their
    /// axis, without duplicates.
    pub fn reference_legend_items(&self) -> Vec<LegendItem> {
        let mut keyed: Vec<(f64, LegendItem)> = self
            .reference_areas
            .iter()
            .filter_map(|a| {
                let (start, end) = a.span();
                a.legend_item().map(|item| (start.min(end), item))
            })
            .chain(
                self.reference_lines
                    .iter()
                    .filter_map(|l| l.legend_item().map(|item| (l.value(), item))),
            )
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut items: Vec<LegendItem> = Vec::with_capacity(keyed.len());
        for (_, item) in keyed {
            if !items
                .iter()
                .any(|i| i.label == item.label && i.color == item.color)
            {
                items.push(item);
            }
        }
        items
    }

    /// Runs a layout cycle with no graph-type drawables.
    pub fn recalc_sizes(&mut self, measurer: &dyn TextMeasurer) {
        self.run_cycle(measurer, None);
    }

    /// Runs a layout cycle, letting `producer` configure the axes first and appending its
    /// drawables after the graph's own.
    pub fn recalc_sizes_with(
        &mut self,
        measurer: &dyn TextMeasurer,
        producer: &dyn DrawableProducer,
    ) {
        self.run_cycle(measurer, Some(producer));
    }

    fn run_cycle(&mut self, measurer: &dyn TextMeasurer, producer: Option<&dyn DrawableProducer>) {
        let span = tracing::debug_span!("recalc_sizes");
        let _guard = span.enter();

        self.drawables.clear();
        self.ids = IdAllocator::default();
        let cache = MeasureCache::new(measurer);

        if let Some(producer) = producer {
            producer.configure_axes(&mut self.axes);
        }
        let state = self.engine.run_cycle(
            self.bounding_box,
            &mut self.axes,
            &mut self.decorations,
            &self.options,
            &cache,
        );
        self.emit(&state, &cache);

        if let Some(producer) = producer {
            let ctx = LayoutContext {
                state: &state,
                axes: &self.axes,
                measurer: &cache,
                scaling: self.options.scaling,
            };
            let produced = producer.produce_drawables(&ctx, &mut self.ids);
            self.drawables.extend(produced);
        }
        tracing::debug!(
            passes = self.engine.passes().len(),
            drawables = self.drawables.len(),
            measured = cache.len(),
            "layout cycle finished"
        );
    }

    fn emit(&mut self, state: &PlotAreaState, measurer: &dyn TextMeasurer) {
        let plot = state.plot_rect;
        let scaling = self.options.scaling;
        let ids = &mut self.ids;
        let out = &mut self.drawables;

        if let Some(fill) = &self.background {
            out.push(Drawable::new(
                ids.next_id(),
                DrawableRole::Background,
                z_order::PLOT_BACKGROUND,
                Primitive::Polygon {
                    points: smallvec![
                        Point::new(plot.x0, plot.y0),
                        Point::new(plot.x1, plot.y0),
                        Point::new(plot.x1, plot.y1),
                        Point::new(plot.x0, plot.y1),
                    ],
                    fill: fill.clone(),
                    stroke: None,
                },
            ));
        }

        for axis in self.axes.main() {
            out.extend(axis.gridlines(plot, ids));
        }
        for axis in self.axes.main() {
            out.extend(axis.drawables(
                measurer,
                DrawableRole::Axis(axis.axis_type()),
                z_order::AXES,
                ids,
            ));
        }

        let bbox = state.bounding_box;
        let decorations = [
            (&self.decorations.title, state.title.top, DrawableRole::Title),
            (
                &self.decorations.subtitle,
                state.subtitle.top,
                DrawableRole::Subtitle,
            ),
            (
                &self.decorations.caption,
                state.caption.top,
                DrawableRole::Caption,
            ),
        ];
        for (decoration, top, role) in decorations {
            out.extend(decoration.drawable(bbox.x0, bbox.x1, top, role, measurer, ids));
        }

        for (index, custom) in self.axes.custom().iter().enumerate() {
            out.extend(custom.drawables(index, measurer, ids));
        }

        for area in &self.reference_areas {
            out.extend(area.drawables(&self.axes, plot, scaling, ids));
        }
        for line in &self.reference_lines {
            out.extend(line.drawable(&self.axes, plot, scaling, ids));
        }

        for annotation in &self.annotations {
            out.extend(annotation.drawables(&self.axes, scaling, measurer, ids));
        }
    }

    /// States of every solver pass in the last cycle.
    pub fn passes(&self) -> &[PlotAreaState] {
        self.engine.passes()
    }

    /// The final layout of the last cycle.
    pub fn plot_area(&self) -> Option<&PlotAreaState> {
        self.engine.last_pass()
    }

    /// The drawables of the last cycle, in paint order.
    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    /// Moves the drawables out, leaving the list empty until the next cycle.
    pub fn take_drawables(&mut self) -> Vec<Drawable> {
        core::mem::take(&mut self.drawables)
    }

    /// Appends a drawable to the current cycle's list.
    ///
    /// The next cycle discards it, like everything else in the list.
    pub fn add_drawable(
        &mut self,
        role: DrawableRole,
        layer: i32,
        primitive: Primitive,
    ) -> DrawableId {
        let id = self.ids.next_id();
        self.drawables.push(Drawable::new(id, role, layer, primitive));
        id
    }

    /// The top-most drawable whose bounds contain `point`.
    pub fn hit_test(&self, point: Point) -> Option<DrawableId> {
        self.drawables
            .iter()
            .rev()
            .find(|d| d.contains(point))
            .map(|d| d.id)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use peniko::color::palette::css;
    use plotwise_text::HeuristicTextMeasurer;

    use super::*;
    use crate::style::StrokeStyle;

    #[test]
    fn emission_order_follows_paint_layers() {
        let mut graph = Graph2D::new(Rect::new(0.0, 0.0, 640.0, 480.0))
            .with_title("Title")
            .with_caption("Caption");
        graph.set_background(Some(Brush::Solid(css::WHITE)));
        graph.axis_mut(AxisType::LeftY).enable_gridlines();
        graph.add_reference_area(ReferenceArea::new(AxisType::BottomX, 2.0, 4.0));
        graph.add_reference_line(ReferenceLine::new(AxisType::LeftY, 5.0));
        graph.add_annotation(Annotation::new("note", (5.0, 5.0)));
        graph.recalc_sizes(&HeuristicTextMeasurer);

        let roles: Vec<DrawableRole> = graph.drawables().iter().map(|d| d.role).collect();
        let first = |role: DrawableRole| roles.iter().position(|r| *r == role).unwrap();
        assert_eq!(roles[0], DrawableRole::Background);
        let before = |a: DrawableRole, b: DrawableRole| first(a) < first(b);
        assert!(before(
            DrawableRole::Gridlines(AxisType::LeftY),
            DrawableRole::Axis(AxisType::LeftY)
        ));
        assert!(before(DrawableRole::Axis(AxisType::BottomX), DrawableRole::Title));
        assert!(before(DrawableRole::Caption, DrawableRole::ReferenceArea));
        assert!(before(DrawableRole::ReferenceArea, DrawableRole::ReferenceLine));
        assert!(before(DrawableRole::ReferenceLine, DrawableRole::Annotation));

        let ids: Vec<u64> = graph.drawables().iter().map(|d| d.id.0).collect();
        assert!(
            ids.windows(2).all(|w| w[0] < w[1]),
            "ids are unique and ordered"
        );
    }

    #[test]
    fn cycles_rebuild_the_list() {
        let mut graph = Graph2D::new(Rect::new(0.0, 0.0, 640.0, 480.0));
        graph.recalc_sizes(&HeuristicTextMeasurer);
        let count = graph.drawables().len();
        graph.add_drawable(
            DrawableRole::Series,
            z_order::SERIES,
            Primitive::Lines {
                segments: alloc::vec![kurbo::Line::new((0.0, 0.0), (1.0, 1.0))],
                stroke: StrokeStyle::default(),
            },
        );
        assert_eq!(graph.drawables().len(), count + 1);
        graph.recalc_sizes(&HeuristicTextMeasurer);
        assert_eq!(graph.drawables().len(), count);
        let taken = graph.take_drawables();
        assert_eq!(taken.len(), count);
        assert!(graph.drawables().is_empty());
    }

    #[test]
    fn hit_test_prefers_the_last_painted() {
        let mut graph = Graph2D::new(Rect::new(0.0, 0.0, 640.0, 480.0));
        graph.set_background(Some(Brush::Solid(css::WHITE)));
        graph.add_annotation(Annotation::new("note", (5.0, 5.0)));
        graph.recalc_sizes(&HeuristicTextMeasurer);
        let plot = graph.plot_area().unwrap().plot_rect;
        let center = plot.center();
        let hit = graph.hit_test(center).unwrap();
        let hit = graph.drawables().iter().find(|d| d.id == hit).unwrap();
        assert_eq!(hit.role, DrawableRole::Annotation);
        let corner = Point::new(plot.x0 + 20.0, plot.y0 + 20.0);
        let hit = graph.hit_test(corner).unwrap();
        let hit = graph.drawables().iter().find(|d| d.id == hit).unwrap();
        assert_eq!(hit.role, DrawableRole::Background);
        assert_eq!(graph.hit_test(Point::new(-50.0, -50.0)), None);
    }

    #[test]
    fn reference_legend_items_are_sorted_and_deduplicated() {
        let mut graph = Graph2D::new(Rect::new(0.0, 0.0, 640.0, 480.0));
        graph.add_reference_line(
            ReferenceLine::new(AxisType::LeftY, 8.0)
                .with_stroke(StrokeStyle::solid(css::RED, 1.0))
                .with_label("Target"),
        );
        graph.add_reference_line(
            ReferenceLine::new(AxisType::LeftY, 9.0)
                .with_stroke(StrokeStyle::solid(css::RED, 1.0))
                .with_label("Target"),
        );
        graph.add_reference_line(ReferenceLine::new(AxisType::LeftY, 1.0));
        graph.add_reference_area(
            ReferenceArea::new(AxisType::BottomX, 3.0, 2.0)
                .with_fill(css::LIGHT_BLUE)
                .with_label("Window"),
        );
        let items = graph.reference_legend_items();
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["Window", "Target"]);
    }

    #[test]
    fn unmirrored_axes_drop_copied_labels_and_ticks() {
        let m = HeuristicTextMeasurer;
        let mut graph = Graph2D::new(Rect::new(0.0, 0.0, 640.0, 480.0));
        graph.mirror_x_axis(true);
        graph.mirror_y_axis(true);
        graph.recalc_sizes(&m);
        let top = graph.axis(AxisType::TopX);
        assert_eq!(top.label_display(), LabelDisplay::Default);
        assert!(!top.displayed_labels().is_empty());
        let mirrored = graph.plot_area().unwrap().plot_rect;

        graph.mirror_x_axis(false);
        graph.mirror_y_axis(false);
        graph.recalc_sizes(&m);
        for axis_type in [AxisType::TopX, AxisType::RightY] {
            let axis = graph.axis(axis_type);
            assert_eq!(axis.label_display(), LabelDisplay::None, "{axis_type:?}");
            assert_eq!(
                axis.tick_mark_display(),
                TickMarkDisplay::None,
                "{axis_type:?}"
            );
            assert!(axis.displayed_labels().is_empty(), "{axis_type:?}");
        }
        let plain = graph.plot_area().unwrap().plot_rect;
        assert!(plain.y0 < mirrored.y0, "top labels no longer take room");
        assert!(plain.x1 > mirrored.x1, "right labels no longer take room");
    }
}
