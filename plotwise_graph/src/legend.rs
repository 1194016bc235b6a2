// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legends: an optional header over a column of icon + label rows.
//!
//! Graph types build a [`Legend`] from their series (or from
//! [`crate::Graph2D::reference_legend_items`]), call [`adjust_legend`] with where they intend
//! to dock it, then measure it and place it beside or inside the graph.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Circle, Insets, Line, Point, Rect, RoundedRect, Shape};
use peniko::color::palette::css;
use peniko::{Brush, Color};
use plotwise_text::{TextMeasurer, TextStyle};

use crate::drawable::{Anchoring, Drawable, DrawableRole, IdAllocator, Primitive};
use crate::style::{RelativeAlignment, StrokeStyle};
use crate::z_order;

/// Width of the icon column, icon plus gap.
pub const MIN_LEGEND_WIDTH: f64 = ICON_SIZE + ICON_GAP;

const ICON_SIZE: f64 = 16.0;
const ICON_GAP: f64 = 2.0;
const CORNER_RADIUS: f64 = 4.0;
/// One "smaller font" step.
const FONT_STEP: f64 = 1.2;

/// Shape drawn next to a legend row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LegendIcon {
    /// No icon.
    None,
    /// A filled square swatch.
    #[default]
    Square,
    /// A filled circle.
    Circle,
    /// A short horizontal line.
    HorizontalLine,
}

impl LegendIcon {
    /// Outline path of a filled icon centered at `center`, `size` across.
    ///
    /// Returns `None` for icons that are not filled shapes.
    pub fn path(self, center: Point, size: f64) -> Option<BezPath> {
        let half = size * 0.5;
        match self {
            Self::Square => Some(
                Rect::new(
                    center.x - half,
                    center.y - half,
                    center.x + half,
                    center.y + half,
                )
                .to_path(0.1),
            ),
            Self::Circle => Some(Circle::new(center, half).path_elements(0.1).collect()),
            Self::None | Self::HorizontalLine => None,
        }
    }
}

/// One legend row.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    /// Label text.
    pub label: String,
    /// Icon shape.
    pub icon: LegendIcon,
    /// Icon color.
    pub color: Color,
}

impl LegendItem {
    /// A row with a filled square swatch.
    pub fn solid(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            icon: LegendIcon::Square,
            color,
        }
    }

    /// A row with a line swatch.
    pub fn line(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            icon: LegendIcon::HorizontalLine,
            color,
        }
    }

    /// Replaces the icon.
    pub fn with_icon(mut self, icon: LegendIcon) -> Self {
        self.icon = icon;
        self
    }
}

/// How a legend's canvas area relates to its content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LegendFit {
    /// The caller sizes the legend area.
    #[default]
    None,
    /// The area is exactly as wide as the legend.
    ContentWidth,
    /// The area is exactly as tall as the legend.
    ContentHeight,
}

/// Where a legend will be docked relative to its graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LegendCanvasPlacementHint {
    /// Drawn on top of the plot area.
    EmbeddedOnGraph,
    /// In its own column left of the graph.
    LeftOfGraph,
    /// In its own column right of the graph.
    RightOfGraph,
    /// In its own row above or below the graph.
    AboveOrBeneathGraph,
}

/// A legend box.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
    /// Optional bold header line.
    pub header: String,
    /// Rows in display order.
    pub items: Vec<LegendItem>,
    /// Space inside the box (`x0` left, `y0` top, `x1` right, `y1` bottom). Icons are drawn
    /// in the left padding.
    pub padding: Insets,
    /// Space between the box and the legend's canvas area.
    pub canvas_padding: f64,
    /// Box fill.
    pub background: Option<Brush>,
    /// Box outline.
    pub outline: Option<StrokeStyle>,
    /// Whether the box has rounded corners.
    pub rounded_corners: bool,
    /// Horizontal placement within the canvas area.
    pub alignment: RelativeAlignment,
    /// How the canvas area is sized.
    pub fit: LegendFit,
    /// Base font for rows; the header is a bold copy.
    pub style: TextStyle,
    /// Multiplier on `style`.
    pub font_scale: f64,
    /// Text fill.
    pub text_fill: Brush,
}

impl Legend {
    /// A plain legend with 10px text and no box.
    pub fn new(items: Vec<LegendItem>) -> Self {
        Self {
            header: String::new(),
            items,
            padding: Insets::ZERO,
            canvas_padding: 0.0,
            background: None,
            outline: None,
            rounded_corners: false,
            alignment: RelativeAlignment::FlushLeft,
            fit: LegendFit::None,
            style: TextStyle::new(10.0),
            font_scale: 1.0,
            text_fill: css::BLACK.into(),
        }
    }

    /// Sets the header line.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Whether any row draws an icon.
    pub fn has_icons(&self) -> bool {
        self.items.iter().any(|i| i.icon != LegendIcon::None)
    }

    fn row_style(&self) -> TextStyle {
        self.style.scaled(self.font_scale)
    }

    /// Left padding actually used: icons always get their column.
    fn left_padding(&self) -> f64 {
        if self.has_icons() {
            self.padding.x0.max(MIN_LEGEND_WIDTH)
        } else {
            self.padding.x0
        }
    }

    /// `(text, style, size)` for the header (if any) and each row, top to bottom.
    fn rows(&self, measurer: &dyn TextMeasurer) -> Vec<(String, TextStyle, (f64, f64))> {
        let style = self.row_style();
        let header = (!self.header.is_empty()).then(|| {
            let bold = style.bold();
            let size = measurer.measure_block(&self.header, &bold, 0.0);
            (self.header.clone(), bold, size)
        });
        header
            .into_iter()
            .chain(self.items.iter().map(|item| {
                let size = measurer.measure_block(&item.label, &style, 0.0);
                (item.label.clone(), style.clone(), size)
            }))
            .collect()
    }

    /// Size of the legend's canvas area: box plus canvas padding.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> (f64, f64) {
        let rows = self.rows(measurer);
        let text_w = rows.iter().map(|r| r.2.0).fold(0.0_f64, f64::max);
        let text_h: f64 = rows.iter().map(|r| r.2.1).sum();
        let pad = 2.0 * self.canvas_padding;
        (
            self.left_padding() + text_w + self.padding.x1 + pad,
            self.padding.y0 + text_h + self.padding.y1 + pad,
        )
    }

    /// Drawables for the legend with its canvas area's top-left corner at `origin`.
    pub fn drawables(
        &self,
        origin: Point,
        measurer: &dyn TextMeasurer,
        ids: &mut IdAllocator,
    ) -> Vec<Drawable> {
        let mut out = Vec::new();
        let (w, h) = self.measure(measurer);
        let frame = Rect::new(origin.x, origin.y, origin.x + w, origin.y + h)
            .inset(-self.canvas_padding);
        if self.background.is_some() || self.outline.is_some() {
            let radius = if self.rounded_corners {
                CORNER_RADIUS
            } else {
                0.0
            };
            out.push(Drawable::new(
                ids.next_id(),
                DrawableRole::Legend,
                z_order::LEGEND,
                Primitive::Path {
                    path: RoundedRect::from_rect(frame, radius).to_path(0.1),
                    fill: self.background.clone(),
                    stroke: self.outline.clone(),
                },
            ));
        }

        let left = frame.x0 + self.left_padding();
        let mut y = frame.y0 + self.padding.y0;
        let header_rows = usize::from(!self.header.is_empty());
        for (i, (text, style, size)) in self.rows(measurer).into_iter().enumerate() {
            let row = Rect::new(left, y, left + size.0, y + size.1);
            if let Some(item) = i
                .checked_sub(header_rows)
                .and_then(|index| self.items.get(index))
            {
                let icon_size = ICON_SIZE.min(size.1);
                let center = Point::new(frame.x0 + 0.5 * MIN_LEGEND_WIDTH, row.center().y);
                self.push_icon(item, center, icon_size, ids, &mut out);
            }
            out.push(Drawable::new(
                ids.next_id(),
                DrawableRole::Legend,
                z_order::LEGEND,
                Primitive::Text {
                    text,
                    origin: row.origin(),
                    anchoring: Anchoring::TopLeftCorner,
                    style,
                    fill: self.text_fill.clone(),
                    angle: 0.0,
                    line_spacing: 0.0,
                    bounds: row,
                },
            ));
            y += size.1;
        }
        out
    }

    fn push_icon(
        &self,
        item: &LegendItem,
        center: Point,
        size: f64,
        ids: &mut IdAllocator,
        out: &mut Vec<Drawable>,
    ) {
        let primitive = match item.icon {
            LegendIcon::None => return,
            LegendIcon::HorizontalLine => Primitive::Lines {
                segments: alloc::vec![Line::new(
                    (center.x - 0.5 * size, center.y),
                    (center.x + 0.5 * size, center.y),
                )],
                stroke: StrokeStyle::solid(item.color, 2.0),
            },
            icon => match icon.path(center, size) {
                Some(path) => Primitive::Path {
                    path,
                    fill: Some(Brush::Solid(item.color)),
                    stroke: None,
                },
                None => return,
            },
        };
        out.push(Drawable::new(
            ids.next_id(),
            DrawableRole::Legend,
            z_order::LEGEND,
            primitive,
        ));
    }
}

/// Sets a legend's padding, alignment, box and font for where it will be docked.
pub fn adjust_legend(legend: &mut Legend, hint: LegendCanvasPlacementHint) {
    legend.rounded_corners = true;
    let icon_column = if legend.has_icons() {
        MIN_LEGEND_WIDTH
    } else {
        0.0
    };
    match hint {
        LegendCanvasPlacementHint::EmbeddedOnGraph => {
            legend.outline = Some(StrokeStyle::solid(css::BLACK, 1.0));
            legend.padding = Insets::new(icon_column.max(4.0), 4.0, 4.0, 4.0);
            legend.background = Some(Brush::Solid(css::WHITE));
            legend.font_scale /= FONT_STEP;
        }
        LegendCanvasPlacementHint::LeftOfGraph | LegendCanvasPlacementHint::RightOfGraph => {
            legend.alignment = if hint == LegendCanvasPlacementHint::LeftOfGraph {
                RelativeAlignment::FlushLeft
            } else {
                RelativeAlignment::FlushRight
            };
            legend.fit = LegendFit::ContentWidth;
            legend.outline = None;
            legend.padding = Insets::new(icon_column, 0.0, 0.0, 0.0);
            legend.canvas_padding = 4.0;
            legend.font_scale /= FONT_STEP;
        }
        LegendCanvasPlacementHint::AboveOrBeneathGraph => {
            legend.alignment = RelativeAlignment::FlushLeft;
            legend.fit = LegendFit::ContentHeight;
            legend.outline = None;
            legend.padding = Insets::new(icon_column, 0.0, 0.0, 0.0);
            legend.canvas_padding = 4.0;
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use plotwise_text::HeuristicTextMeasurer;

    fn items() -> Vec<LegendItem> {
        vec![
            LegendItem::solid("A", css::BLACK),
            LegendItem::line("BBBB", css::RED),
            LegendItem::solid("CC", css::BLUE).with_icon(LegendIcon::Circle),
        ]
    }

    #[test]
    fn embedded_gets_opaque_box_and_icon_column() {
        let mut legend = Legend::new(items());
        adjust_legend(&mut legend, LegendCanvasPlacementHint::EmbeddedOnGraph);
        assert_eq!(legend.padding.x0, MIN_LEGEND_WIDTH);
        assert_eq!(legend.padding.y0, 4.0);
        assert_eq!(legend.background, Some(Brush::Solid(css::WHITE)));
        assert!(legend.outline.is_some());
        assert!(legend.rounded_corners);
        assert!(legend.font_scale < 1.0);

        let mut plain = Legend::new(vec![
            LegendItem::solid("x", css::BLACK).with_icon(LegendIcon::None),
        ]);
        adjust_legend(&mut plain, LegendCanvasPlacementHint::EmbeddedOnGraph);
        assert_eq!(plain.padding.x0, 4.0);
    }

    #[test]
    fn side_hints_flip_alignment_and_fit_width() {
        let mut left = Legend::new(items());
        adjust_legend(&mut left, LegendCanvasPlacementHint::LeftOfGraph);
        let mut right = Legend::new(items());
        adjust_legend(&mut right, LegendCanvasPlacementHint::RightOfGraph);
        assert_eq!(left.alignment, RelativeAlignment::FlushLeft);
        assert_eq!(right.alignment, RelativeAlignment::FlushRight);
        assert_eq!(right.fit, LegendFit::ContentWidth);
        assert!(right.font_scale < 1.0);
        assert_eq!(right.canvas_padding, 4.0);
        assert!(right.outline.is_none());
    }

    #[test]
    fn above_or_beneath_keeps_font_size() {
        let mut legend = Legend::new(items());
        adjust_legend(&mut legend, LegendCanvasPlacementHint::AboveOrBeneathGraph);
        assert_eq!(legend.font_scale, 1.0);
        assert_eq!(legend.fit, LegendFit::ContentHeight);
    }

    #[test]
    fn drawables_stay_inside_measured_area() {
        let m = HeuristicTextMeasurer;
        let mut legend = Legend::new(items()).with_header("Groups");
        adjust_legend(&mut legend, LegendCanvasPlacementHint::EmbeddedOnGraph);
        let (w, h) = legend.measure(&m);
        let origin = Point::new(100.0, 50.0);
        let area = Rect::new(origin.x, origin.y, origin.x + w, origin.y + h);
        let mut ids = IdAllocator::default();
        let out = legend.drawables(origin, &m, &mut ids);
        // box + header + three rows with icons
        assert_eq!(out.len(), 1 + 1 + 3 * 2);
        for d in &out {
            let b = d.bounds();
            assert!(
                b.x0 >= area.x0 - 1.0 && b.x1 <= area.x1 + 1.0,
                "{b:?} outside {area:?}"
            );
            assert!(b.y0 >= area.y0 - 1.0 && b.y1 <= area.y1 + 1.0);
        }
    }
}
