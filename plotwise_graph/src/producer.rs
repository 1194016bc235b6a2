// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the shared layout engine and individual graph types.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use plotwise_text::TextMeasurer;

use crate::axis::AxisType;
use crate::drawable::{Drawable, IdAllocator};
use crate::solver::{AxisSet, PlotAreaState};

/// Read-only view of a finished layout, handed to graph types.
pub struct LayoutContext<'a> {
    /// The final solver pass.
    pub state: &'a PlotAreaState,
    /// Axes, mapped onto `state.plot_rect`.
    pub axes: &'a AxisSet,
    /// The cycle's measurer.
    pub measurer: &'a dyn TextMeasurer,
    /// Overall graph scaling.
    pub scaling: f64,
}

impl LayoutContext<'_> {
    /// The plot area.
    pub fn plot_rect(&self) -> Rect {
        self.state.plot_rect
    }

    /// Maps `value` through the given main axis.
    pub fn coordinate(&self, axis_type: AxisType, value: f64) -> Option<f64> {
        self.axes.get(axis_type).get_physical_coordinate(value)
    }

    /// Maps a data point through the bottom and left axes.
    pub fn data_point(&self, x: f64, y: f64) -> Option<Point> {
        self.axes.data_point(x, y)
    }
}

impl core::fmt::Debug for LayoutContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutContext")
            .field("state", &self.state)
            .field("axes", &self.axes)
            .field("scaling", &self.scaling)
            .finish_non_exhaustive()
    }
}

/// A graph type: configures the axes for its data, then turns the laid-out axes into
/// drawables.
pub trait DrawableProducer {
    /// Sets ranges, custom labels and custom axes before layout.
    fn configure_axes(&self, _axes: &mut AxisSet) {}

    /// Data-derived drawables for the finished layout.
    ///
    /// Anything whose position does not resolve should be left out, not clamped.
    fn produce_drawables(&self, ctx: &LayoutContext<'_>, ids: &mut IdAllocator) -> Vec<Drawable>;
}
