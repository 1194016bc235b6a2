// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Emitted drawables.
//!
//! A layout cycle produces a flat list of [`Drawable`]s in paint order (first = bottom-most).
//! The list is rebuilt from scratch every cycle; renderers walk it front to back, and
//! hit-testing walks it back to front.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Line, Point, Rect, Shape, Vec2};
use peniko::Brush;
use plotwise_text::TextStyle;
use smallvec::SmallVec;

use crate::axis::AxisType;
use crate::style::StrokeStyle;

/// Identity of a drawable within one layout cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(pub u64);

/// Hands out sequential [`DrawableId`]s for one cycle.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Returns the next unused id.
    pub fn next_id(&mut self) -> DrawableId {
        let id = DrawableId(self.next);
        self.next += 1;
        id
    }
}

/// What part of the graph a drawable belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawableRole {
    /// Plot-area background fill.
    Background,
    /// Gridlines of the given main axis.
    Gridlines(AxisType),
    /// Line, ticks, labels or title of a main axis.
    Axis(AxisType),
    /// A custom axis (by index of insertion).
    CustomAxis(usize),
    /// A bracket on a custom axis (by index of the custom axis).
    Bracket(usize),
    /// Graph title.
    Title,
    /// Graph subtitle.
    Subtitle,
    /// Graph caption.
    Caption,
    /// A reference line.
    ReferenceLine,
    /// A reference area.
    ReferenceArea,
    /// A client annotation or one of its arrows.
    Annotation,
    /// A legend.
    Legend,
    /// Data-derived content added by a graph type.
    Series,
}

/// Which point of a text block its `origin` refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Anchoring {
    /// The origin is the top-left corner.
    #[default]
    TopLeftCorner,
    /// The origin is the top-right corner.
    TopRightCorner,
    /// The origin is the center.
    Center,
    /// The origin is the bottom-left corner.
    BottomLeftCorner,
    /// The origin is the bottom-right corner.
    BottomRightCorner,
}

impl Anchoring {
    /// Returns the rectangle of a `size` block anchored at `origin`.
    pub fn rect(self, origin: Point, size: (f64, f64)) -> Rect {
        let (w, h) = size;
        let top_left = match self {
            Self::TopLeftCorner => origin,
            Self::TopRightCorner => Point::new(origin.x - w, origin.y),
            Self::Center => Point::new(origin.x - 0.5 * w, origin.y - 0.5 * h),
            Self::BottomLeftCorner => Point::new(origin.x, origin.y - h),
            Self::BottomRightCorner => Point::new(origin.x - w, origin.y - h),
        };
        Rect::from_origin_size(top_left, size)
    }
}

/// Renderable geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Independent straight segments sharing one stroke.
    Lines {
        /// The segments.
        segments: Vec<Line>,
        /// Stroke for every segment.
        stroke: StrokeStyle,
    },
    /// A closed polygon.
    Polygon {
        /// Vertices in drawing order.
        points: SmallVec<[Point; 4]>,
        /// Interior fill.
        fill: Brush,
        /// Optional outline.
        stroke: Option<StrokeStyle>,
    },
    /// An arbitrary path (curly braces, rounded boxes, legend icons).
    Path {
        /// The path.
        path: BezPath,
        /// Interior fill, for closed paths.
        fill: Option<Brush>,
        /// Optional outline.
        stroke: Option<StrokeStyle>,
    },
    /// A line with an arrow head at `line.p1`.
    Arrow {
        /// Shaft, pointing from `p0` to `p1`.
        line: Line,
        /// Stroke.
        stroke: StrokeStyle,
        /// Length of the arrow head along the shaft.
        head_length: f64,
    },
    /// Text, already measured.
    Text {
        /// The text; `\n` separates lines.
        text: String,
        /// Anchor point.
        origin: Point,
        /// What `origin` refers to (in the unrotated frame).
        anchoring: Anchoring,
        /// Font with scaling already applied.
        style: TextStyle,
        /// Fill.
        fill: Brush,
        /// Rotation in degrees, counter-clockwise, about `origin`.
        angle: f64,
        /// Gap between lines, with scaling already applied.
        line_spacing: f64,
        /// Bounds on the surface, rotation included.
        bounds: Rect,
    },
}

/// One emitted renderable object.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    /// Identity within the cycle.
    pub id: DrawableId,
    /// Graph part this belongs to.
    pub role: DrawableRole,
    /// Paint layer hint (see [`crate::z_order`]).
    pub layer: i32,
    /// The geometry.
    pub primitive: Primitive,
}

impl Drawable {
    /// Creates a drawable.
    pub fn new(id: DrawableId, role: DrawableRole, layer: i32, primitive: Primitive) -> Self {
        Self {
            id,
            role,
            layer,
            primitive,
        }
    }

    /// Bounding box of the drawable, stroke width included.
    pub fn bounds(&self) -> Rect {
        match &self.primitive {
            Primitive::Lines { segments, stroke } => {
                let half = 0.5 * stroke.stroke_width;
                segments
                    .iter()
                    .map(|seg| Rect::from_points(seg.p0, seg.p1))
                    .reduce(|a, b| a.union(b))
                    .unwrap_or(Rect::ZERO)
                    .inflate(half, half)
            }
            Primitive::Polygon { points, stroke, .. } => {
                let half = stroke.as_ref().map_or(0.0, |s| 0.5 * s.stroke_width);
                points
                    .iter()
                    .map(|p| Rect::from_points(*p, *p))
                    .reduce(|a, b| a.union(b))
                    .unwrap_or(Rect::ZERO)
                    .inflate(half, half)
            }
            Primitive::Path { path, stroke, .. } => {
                let half = stroke.as_ref().map_or(0.0, |s| 0.5 * s.stroke_width);
                path.bounding_box().inflate(half, half)
            }
            Primitive::Arrow {
                line,
                stroke,
                head_length,
            } => {
                let grow = (0.5 * stroke.stroke_width).max(0.5 * head_length);
                Rect::from_points(line.p0, line.p1).inflate(grow, grow)
            }
            Primitive::Text { bounds, .. } => *bounds,
        }
    }

    /// Simple containment test against [`Drawable::bounds`].
    ///
    /// Thin shapes get a small tolerance so one-pixel lines can still be picked.
    pub fn contains(&self, point: Point) -> bool {
        const TOLERANCE: f64 = 2.0;
        let b = self.bounds();
        point.x >= b.x0 - TOLERANCE
            && point.x <= b.x1 + TOLERANCE
            && point.y >= b.y0 - TOLERANCE
            && point.y <= b.y1 + TOLERANCE
    }
}

/// The three points of an arrow head at `line.p1`, `head_length` long and as wide.
pub fn arrow_head(line: Line, head_length: f64) -> [Point; 3] {
    let dir = line.p1 - line.p0;
    let len = dir.hypot();
    if len <= f64::EPSILON {
        return [line.p1; 3];
    }
    let unit = dir / len;
    let normal = Vec2::new(-unit.y, unit.x);
    let base = line.p1 - unit * head_length;
    [
        line.p1,
        base + normal * (0.5 * head_length),
        base - normal * (0.5 * head_length),
    ]
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use smallvec::smallvec;

    use super::*;
    use peniko::color::palette::css;

    #[test]
    fn ids_are_sequential() {
        let mut ids = IdAllocator::default();
        assert_eq!(ids.next_id(), DrawableId(0));
        assert_eq!(ids.next_id(), DrawableId(1));
    }

    #[test]
    fn anchoring_places_rect() {
        let r = Anchoring::Center.rect(Point::new(10.0, 10.0), (4.0, 2.0));
        assert_eq!(r, Rect::new(8.0, 9.0, 12.0, 11.0));
        let r = Anchoring::BottomRightCorner.rect(Point::new(10.0, 10.0), (4.0, 2.0));
        assert_eq!(r, Rect::new(6.0, 8.0, 10.0, 10.0));
    }

    #[test]
    fn bounds_cover_lines_and_polygons() {
        let lines = Drawable::new(
            DrawableId(0),
            DrawableRole::Series,
            0,
            Primitive::Lines {
                segments: vec![
                    Line::new((0.0, 0.0), (10.0, 0.0)),
                    Line::new((5.0, -5.0), (5.0, 5.0)),
                ],
                stroke: StrokeStyle::solid(css::BLACK, 2.0),
            },
        );
        assert_eq!(lines.bounds(), Rect::new(-1.0, -6.0, 11.0, 6.0));

        let poly = Drawable::new(
            DrawableId(1),
            DrawableRole::Series,
            0,
            Primitive::Polygon {
                points: smallvec![
                    Point::new(1.0, 1.0),
                    Point::new(3.0, 1.0),
                    Point::new(3.0, 4.0),
                ],
                fill: Brush::Solid(css::RED),
                stroke: None,
            },
        );
        assert_eq!(poly.bounds(), Rect::new(1.0, 1.0, 3.0, 4.0));
        assert!(poly.contains(Point::new(2.0, 2.0)));
        assert!(!poly.contains(Point::new(20.0, 2.0)));
    }

    #[test]
    fn arrow_head_points_at_tip() {
        let head = arrow_head(Line::new((0.0, 0.0), (10.0, 0.0)), 4.0);
        assert_eq!(head[0], Point::new(10.0, 0.0));
        assert!((head[1].x - 6.0).abs() < 1e-12);
        assert!((head[1].y.abs() - 2.0).abs() < 1e-12);
    }
}
