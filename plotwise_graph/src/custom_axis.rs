// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Custom axes and their brackets.
//!
//! A custom axis is a secondary ruler anchored at a data-space position inside the main axes
//! (for example a threshold scale drawn through the middle of a gauge). It carries brackets:
//! labelled sub-ranges with a connector back to the axis. Bracket geometry is recomputed from
//! the axis endpoints every layout pass and never stored.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Line, Point, Rect};
use plotwise_text::TextMeasurer;
use smallvec::SmallVec;

use crate::axis::{Axis, AxisType, SPACING_BETWEEN_LABELS_AND_LINE};
use crate::drawable::{Anchoring, Drawable, DrawableRole, IdAllocator, Primitive};
use crate::label::Label;
use crate::style::StrokeStyle;
use crate::z_order;

/// Length of bracket connector lines, before scaling.
pub const BRACKET_CONNECTOR_LENGTH: f64 = 8.0;

/// How a bracket connects to its axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BracketLineStyle {
    /// A bracket line with straight connectors at both ends.
    #[default]
    Lines,
    /// Connectors end in arrows pointing at the axis.
    Arrow,
    /// Connectors end in arrows pointing at the bracket label.
    ReverseArrow,
    /// Only the bracket line, no connectors.
    NoConnectionLines,
    /// A curly brace whose tip points at the label.
    CurlyBraces,
}

/// A labelled sub-range on a custom axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Bracket {
    start: f64,
    end: f64,
    label_position: f64,
    label: Label,
    line_style: BracketLineStyle,
    stroke: StrokeStyle,
}

impl Bracket {
    /// Creates a bracket spanning `start..end` with its label centered at `label_position`.
    pub fn new(start: f64, end: f64, label_position: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label_position,
            label: Label::new(text).with_font_size(10.0),
            line_style: BracketLineStyle::default(),
            stroke: StrokeStyle::default(),
        }
    }

    /// Creates a bracket whose label sits halfway between `start` and `end`.
    pub fn centered(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self::new(start, end, start + 0.5 * (end - start), text)
    }

    /// Sets the connector style.
    pub fn with_line_style(mut self, style: BracketLineStyle) -> Self {
        self.line_style = style;
        self
    }

    /// Sets the stroke used for the bracket and connectors.
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = stroke;
        self
    }

    /// Data value where the bracket starts.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Data value where the bracket ends.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Data value the label is centered on.
    pub fn label_position(&self) -> f64 {
        self.label_position
    }

    /// The bracket label.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Mutable access to the bracket label.
    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    /// The connector style.
    pub fn line_style(&self) -> BracketLineStyle {
        self.line_style
    }
}

/// Placement of one bracket for the current pass.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BracketLayout {
    pub(crate) index: usize,
    /// Bracket ends along the axis.
    pub(crate) start: f64,
    pub(crate) end: f64,
    /// Label center along the axis.
    pub(crate) tip: f64,
    /// Distance from the axis line where connectors start.
    pub(crate) base: f64,
    /// Distance from the axis line of the bracket line.
    pub(crate) line: f64,
    pub(crate) label_rect: Rect,
}

/// An axis anchored at a data-space position relative to the main axes.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomAxis {
    axis: Axis,
    custom_position: (f64, f64),
    offset_from_parent_axis: f64,
    brackets: Vec<Bracket>,
    bracket_scaling: f64,
}

impl CustomAxis {
    /// Creates a custom axis of the given orientation anchored at `custom_position` (x, y).
    ///
    /// A vertical custom axis stands at `x` and rises from the bottom of the left axis's range
    /// to `y`; a horizontal one lies at `y` and runs from the start of the bottom axis's range
    /// to `x`.
    pub fn new(axis_type: AxisType, custom_position: (f64, f64)) -> Self {
        Self {
            axis: Axis::new(axis_type),
            custom_position,
            offset_from_parent_axis: 0.0,
            brackets: Vec::new(),
            bracket_scaling: 1.0,
        }
    }

    /// The underlying axis.
    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    /// Mutable access to the underlying axis.
    pub fn axis_mut(&mut self) -> &mut Axis {
        &mut self.axis
    }

    /// Anchor in the parent axes' data space.
    pub fn custom_position(&self) -> (f64, f64) {
        self.custom_position
    }

    /// Moves the anchor.
    pub fn set_custom_position(&mut self, position: (f64, f64)) {
        self.custom_position = position;
    }

    /// Sets how far (in parent data units) the far end starts from the parent range start.
    pub fn set_offset_from_parent_axis(&mut self, offset: f64) {
        self.offset_from_parent_axis = offset;
    }

    /// Appends a bracket.
    pub fn add_bracket(&mut self, bracket: Bracket) {
        self.brackets.push(bracket);
    }

    /// Brackets in insertion order.
    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Scale applied to every bracket label for the current cycle.
    pub fn bracket_scaling(&self) -> f64 {
        self.bracket_scaling
    }

    pub(crate) fn set_bracket_scaling(&mut self, scaling: f64) {
        self.bracket_scaling = scaling;
    }

    /// Places the axis from the main left and bottom axes' mappings.
    ///
    /// Clears the endpoints if the anchor or the offset start falls outside the parents'
    /// ranges; the axis is then skipped for the pass.
    pub(crate) fn position_from(&mut self, left: &Axis, bottom: &Axis) {
        let (cx, cy) = self.custom_position;
        let endpoints = if self.axis.axis_type().is_vertical() {
            let far = left.range().0 + self.offset_from_parent_axis;
            bottom.get_physical_coordinate(cx).and_then(|x| {
                let top = left.get_physical_coordinate(cy)?;
                let bottom_y = left.get_physical_coordinate(far)?;
                Some((Point::new(x, bottom_y), Point::new(x, top)))
            })
        } else {
            let far = bottom.range().0 + self.offset_from_parent_axis;
            left.get_physical_coordinate(cy).and_then(|y| {
                let right = bottom.get_physical_coordinate(cx)?;
                let left_x = bottom.get_physical_coordinate(far)?;
                Some((Point::new(left_x, y), Point::new(right, y)))
            })
        };
        match endpoints {
            Some((p0, p1)) => self.axis.set_points(p0, p1),
            None => self.axis.clear_points(),
        }
    }

    fn bracket_label_scale(&self, bracket: &Bracket) -> f64 {
        bracket.label.scaling * self.axis.scaling() * self.bracket_scaling
    }

    /// Surface point at `along` (a coordinate along the axis) and `distance` out from the line.
    fn at(&self, line_pos: f64, along: f64, distance: f64) -> Point {
        match self.axis.axis_type() {
            AxisType::LeftY => Point::new(line_pos - distance, along),
            AxisType::RightY => Point::new(line_pos + distance, along),
            AxisType::BottomX => Point::new(along, line_pos + distance),
            AxisType::TopX => Point::new(along, line_pos - distance),
        }
    }

    fn line_pos(&self) -> Option<f64> {
        let (p0, _) = self.axis.points()?;
        Some(if self.axis.axis_type().is_vertical() {
            p0.x
        } else {
            p0.y
        })
    }

    /// Bracket placements for brackets whose start, end and label are all in range.
    pub(crate) fn bracket_layouts(&self, measurer: &dyn TextMeasurer) -> Vec<BracketLayout> {
        let Some(line_pos) = self.line_pos() else {
            return Vec::new();
        };
        let scaling = self.axis.scaling();
        let gap = SPACING_BETWEEN_LABELS_AND_LINE * scaling;
        let base = self.axis.protruding_thickness(measurer) + gap;
        let line = base + BRACKET_CONNECTOR_LENGTH * scaling;
        let vertical = self.axis.axis_type().is_vertical();

        self.brackets
            .iter()
            .enumerate()
            .filter_map(|(index, bracket)| {
                let start = self.axis.get_physical_coordinate(bracket.start)?;
                let end = self.axis.get_physical_coordinate(bracket.end)?;
                let tip = self.axis.get_physical_coordinate(bracket.label_position)?;
                let (w, h) = bracket
                    .label
                    .measure_at(measurer, self.bracket_label_scale(bracket));
                let near = self.at(line_pos, tip, line + gap);
                let far_extent = if vertical { w } else { h };
                let far = self.at(line_pos, tip, line + gap + far_extent);
                let label_rect = if vertical {
                    Rect::new(
                        near.x.min(far.x),
                        tip - 0.5 * h,
                        near.x.max(far.x),
                        tip + 0.5 * h,
                    )
                } else {
                    Rect::new(
                        tip - 0.5 * w,
                        near.y.min(far.y),
                        tip + 0.5 * w,
                        near.y.max(far.y),
                    )
                };
                Some(BracketLayout {
                    index,
                    start,
                    end,
                    tip,
                    base,
                    line,
                    label_rect,
                })
            })
            .collect()
    }

    /// Axis and bracket extents on the surface.
    pub fn bounding_box(&self, measurer: &dyn TextMeasurer) -> Option<Rect> {
        let mut bbox = self.axis.bounding_box(measurer)?;
        let line_pos = self.line_pos()?;
        for layout in self.bracket_layouts(measurer) {
            bbox = bbox
                .union(layout.label_rect)
                .union(Rect::from_points(
                    self.at(line_pos, layout.start, layout.line),
                    self.at(line_pos, layout.end, layout.base),
                ));
        }
        Some(bbox)
    }

    /// Axis drawables followed by bracket drawables.
    pub(crate) fn drawables(
        &self,
        index: usize,
        measurer: &dyn TextMeasurer,
        ids: &mut IdAllocator,
    ) -> Vec<Drawable> {
        let mut out = self.axis.drawables(
            measurer,
            DrawableRole::CustomAxis(index),
            z_order::CUSTOM_AXES,
            ids,
        );
        let Some(line_pos) = self.line_pos() else {
            return out;
        };
        if !self.axis.is_shown() {
            return out;
        }
        let role = DrawableRole::Bracket(index);
        for layout in self.bracket_layouts(measurer) {
            let bracket = &self.brackets[layout.index];
            let mut stroke = bracket.stroke.clone();
            stroke.stroke_width *= self.axis.scaling();
            let head = 4.0 * self.axis.scaling();

            let start_base = self.at(line_pos, layout.start, layout.base);
            let start_line = self.at(line_pos, layout.start, layout.line);
            let end_base = self.at(line_pos, layout.end, layout.base);
            let end_line = self.at(line_pos, layout.end, layout.line);

            match bracket.line_style {
                BracketLineStyle::CurlyBraces => {
                    out.push(Drawable::new(
                        ids.next_id(),
                        role,
                        z_order::CUSTOM_AXES,
                        Primitive::Path {
                            path: self.curly_brace(line_pos, &layout),
                            fill: None,
                            stroke: Some(stroke),
                        },
                    ));
                }
                BracketLineStyle::Arrow | BracketLineStyle::ReverseArrow => {
                    out.push(Drawable::new(
                        ids.next_id(),
                        role,
                        z_order::CUSTOM_AXES,
                        Primitive::Lines {
                            segments: alloc::vec![Line::new(start_line, end_line)],
                            stroke: stroke.clone(),
                        },
                    ));
                    let toward_axis = bracket.line_style == BracketLineStyle::Arrow;
                    for (base, line) in [(start_base, start_line), (end_base, end_line)] {
                        let shaft = if toward_axis {
                            Line::new(line, base)
                        } else {
                            Line::new(base, line)
                        };
                        out.push(Drawable::new(
                            ids.next_id(),
                            role,
                            z_order::CUSTOM_AXES,
                            Primitive::Arrow {
                                line: shaft,
                                stroke: stroke.clone(),
                                head_length: head,
                            },
                        ));
                    }
                }
                BracketLineStyle::Lines | BracketLineStyle::NoConnectionLines => {
                    let mut segments = alloc::vec![Line::new(start_line, end_line)];
                    if bracket.line_style == BracketLineStyle::Lines {
                        segments.push(Line::new(start_base, start_line));
                        segments.push(Line::new(end_base, end_line));
                    }
                    out.push(Drawable::new(
                        ids.next_id(),
                        role,
                        z_order::CUSTOM_AXES,
                        Primitive::Lines { segments, stroke },
                    ));
                }
            }

            if bracket.label.is_visible() {
                let scale = self.bracket_label_scale(bracket);
                out.push(Drawable::new(
                    ids.next_id(),
                    role,
                    z_order::CUSTOM_AXES,
                    Primitive::Text {
                        text: bracket.label.text.clone(),
                        origin: layout.label_rect.center(),
                        anchoring: Anchoring::Center,
                        style: bracket.label.style.scaled(scale),
                        fill: bracket.label.fill.clone(),
                        angle: 0.0,
                        line_spacing: bracket.label.line_spacing * scale,
                        bounds: layout.label_rect,
                    },
                ));
            }
        }
        out
    }

    /// A brace from `start` to `end` whose tip reaches the bracket line at the label position.
    fn curly_brace(&self, line_pos: f64, layout: &BracketLayout) -> BezPath {
        let mid = 0.5 * (layout.base + layout.line);
        let (s, t, e) = (layout.start, layout.tip, layout.end);
        let dir = if e >= s { 1.0 } else { -1.0 };
        let q = dir
            * ((t - s).abs())
                .min((e - t).abs())
                .min(layout.line - layout.base)
                .max(0.0)
            * 0.5;
        let pts: SmallVec<[Point; 11]> = [
            (s, layout.base),
            (s, mid),
            (s + q, mid),
            (t - q, mid),
            (t, mid),
            (t, layout.line),
            (t, mid),
            (t + q, mid),
            (e - q, mid),
            (e, mid),
            (e, layout.base),
        ]
        .into_iter()
        .map(|(along, dist)| self.at(line_pos, along, dist))
        .collect();

        let mut path = BezPath::new();
        path.move_to(pts[0]);
        path.quad_to(pts[1], pts[2]);
        path.line_to(pts[3]);
        path.quad_to(pts[4], pts[5]);
        path.quad_to(pts[6], pts[7]);
        path.line_to(pts[8]);
        path.quad_to(pts[9], pts[10]);
        path
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use plotwise_text::HeuristicTextMeasurer;

    fn parents() -> (Axis, Axis) {
        let mut left = Axis::new(AxisType::LeftY);
        left.set_range(0.0, 100.0, 0, 10.0, 1);
        left.set_points(Point::new(50.0, 450.0), Point::new(50.0, 50.0));
        let mut bottom = Axis::new(AxisType::BottomX);
        bottom.set_range(0.0, 10.0, 0, 1.0, 1);
        bottom.set_points(Point::new(50.0, 450.0), Point::new(550.0, 450.0));
        (left, bottom)
    }

    #[test]
    fn vertical_custom_axis_anchors_in_parent_space() {
        let (left, bottom) = parents();
        let mut custom = CustomAxis::new(AxisType::LeftY, (5.0, 80.0));
        custom.set_offset_from_parent_axis(20.0);
        custom.position_from(&left, &bottom);
        let (p0, p1) = custom.axis().points().unwrap();
        assert_eq!(p0, Point::new(300.0, 370.0));
        assert_eq!(p1, Point::new(300.0, 130.0));
    }

    #[test]
    fn out_of_range_anchor_clears_points() {
        let (left, bottom) = parents();
        let mut custom = CustomAxis::new(AxisType::BottomX, (50.0, 80.0));
        custom.position_from(&left, &bottom);
        assert_eq!(custom.axis().points(), None);
        assert!(custom.bracket_layouts(&HeuristicTextMeasurer).is_empty());
    }

    #[test]
    fn brackets_sit_outside_the_axis_labels() {
        let (left, bottom) = parents();
        let m = HeuristicTextMeasurer;
        let mut custom = CustomAxis::new(AxisType::LeftY, (5.0, 100.0));
        custom.axis_mut().set_range(0.0, 10.0, 0, 1.0, 1);
        custom.add_bracket(Bracket::centered(0.0, 5.0, "low"));
        custom.add_bracket(
            Bracket::centered(5.0, 10.0, "high").with_line_style(BracketLineStyle::CurlyBraces),
        );
        custom.add_bracket(Bracket::centered(5.0, 20.0, "out of range"));
        custom.position_from(&left, &bottom);

        let layouts = custom.bracket_layouts(&m);
        assert_eq!(layouts.len(), 2);
        let axis_box = custom.axis().bounding_box(&m).unwrap();
        for l in &layouts {
            assert!(l.label_rect.x1 < axis_box.x0, "{l:?} vs {axis_box:?}");
        }
        let full = custom.bounding_box(&m).unwrap();
        assert!(full.x0 <= layouts[1].label_rect.x0);

        let mut ids = IdAllocator::default();
        let out = custom.drawables(0, &m, &mut ids);
        let brackets = out
            .iter()
            .filter(|d| d.role == DrawableRole::Bracket(0))
            .count();
        // one shape + one label per placed bracket
        assert_eq!(brackets, 4);
    }
}
