// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axes: one-dimensional mappers between a data range and a pixel segment.
//!
//! An [`Axis`] owns a `[start, end]` data range and, once [`Axis::set_points`] has been called,
//! the two physical endpoints that range maps onto. [`Axis::get_physical_coordinate`] is the
//! single value-to-pixel transform that every drawable goes through.
//!
//! Axes also know how to measure themselves (tick labels, ticks, title) so the plot-area solver
//! can reserve room for them, and how to decide whether their labels need stacking or a smaller
//! font to avoid overlap.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::{Line, Point, Rect};
use peniko::Brush;
use peniko::color::palette::css;
use plotwise_text::{TextMeasurer, TextStyle};

use crate::drawable::{Anchoring, Drawable, DrawableRole, IdAllocator, Primitive};
use crate::error::{GraphError, Result};
use crate::format::format_number;
use crate::label::{Label, Orientation, fit_to_line_length, split_long_text};
use crate::style::{StrokeStyle, default_grid_stroke};

/// Gap between the end of the tick marks and the tick labels, before scaling.
pub const SPACING_BETWEEN_LABELS_AND_LINE: f64 = 5.0;

/// Most tick positions an axis will generate; finer intervals are widened to fit.
pub const MAX_AXIS_POINTS: usize = 1_000;

/// Which side of the plot area an axis belongs to.
///
/// Custom axes reuse these tags for their orientation and the side their labels face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxisType {
    /// Vertical axis, labels to the left.
    LeftY,
    /// Vertical axis, labels to the right.
    RightY,
    /// Horizontal axis, labels below.
    BottomX,
    /// Horizontal axis, labels above.
    TopX,
}

impl AxisType {
    /// All four main axis types, in solver order.
    pub const ALL: [Self; 4] = [Self::LeftY, Self::RightY, Self::BottomX, Self::TopX];

    /// Returns `true` for `LeftY` and `RightY`.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::LeftY | Self::RightY)
    }

    /// Returns `true` for `BottomX` and `TopX`.
    pub fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }

    /// The axis on the opposite side of the plot.
    pub fn opposite(self) -> Self {
        match self {
            Self::LeftY => Self::RightY,
            Self::RightY => Self::LeftY,
            Self::BottomX => Self::TopX,
            Self::TopX => Self::BottomX,
        }
    }

    /// Unit vector pointing away from the plot, toward the labels.
    fn outward(self) -> (f64, f64) {
        match self {
            Self::LeftY => (-1.0, 0.0),
            Self::RightY => (1.0, 0.0),
            Self::BottomX => (0.0, 1.0),
            Self::TopX => (0.0, -1.0),
        }
    }
}

/// Which tick labels an axis shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LabelDisplay {
    /// No labels.
    None,
    /// The custom label for a position if there is one, otherwise the formatted value.
    #[default]
    Default,
    /// Only custom labels; positions without one stay blank.
    CustomOnly,
    /// The custom label followed by the formatted value.
    CustomAndValues,
}

/// Where tick marks are drawn relative to the axis line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TickMarkDisplay {
    /// Outside the plot area.
    #[default]
    Outer,
    /// Inside the plot area.
    Inner,
    /// Across the axis line.
    Crossed,
    /// No tick marks.
    None,
}

/// How tick label text runs relative to the axis line.
///
/// Horizontal axes default to [`Parallel`](Self::Parallel) and vertical axes to
/// [`Perpendicular`](Self::Perpendicular), which keeps text upright in both cases. The other
/// choice rotates the labels by 90°.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisLabelOrientation {
    /// Text runs along the axis.
    Parallel,
    /// Text runs away from the axis.
    Perpendicular,
}

/// How long tick labels are broken into lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LabelWrapping {
    /// Labels keep their own line breaks.
    #[default]
    None,
    /// Lines break at the first space or hyphen past this many characters.
    LineLength(usize),
    /// Labels longer than this many characters split at a bracket, slash, list comma or
    /// conjunction.
    Auto(usize),
}

/// Total-ordered `f64` key for custom label lookup.
#[derive(Clone, Copy, Debug)]
struct DataKey(f64);

impl PartialEq for DataKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DataKey {}

impl PartialOrd for DataKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DataKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// One tick position along an axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisPoint {
    /// Position of the tick within the axis points.
    pub index: usize,
    /// Data value.
    pub value: f64,
    /// Physical coordinate along the axis, if endpoints are set.
    pub physical: Option<f64>,
}

/// Lazy iterator over an axis's tick positions.
#[derive(Clone, Debug)]
pub struct AxisPoints<'a> {
    axis: &'a Axis,
    next: usize,
    count: usize,
}

impl Iterator for AxisPoints<'_> {
    type Item = AxisPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        let value = self.axis.point_value(index);
        Some(AxisPoint {
            index,
            value,
            physical: self.axis.get_physical_coordinate(value),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AxisPoints<'_> {}

/// Immutable snapshot of an axis's layout-relevant state after one solver pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisLayout {
    /// The axis type.
    pub axis_type: AxisType,
    /// Data range `(start, end)`.
    pub range: (f64, f64),
    /// Physical endpoints for `range.start` and `range.end` (before reversal).
    pub endpoints: Option<(Point, Point)>,
    /// Label font scale.
    pub label_font_scale: f64,
    /// Whether labels are stacked.
    pub stacking: bool,
    /// Whether the axis is reversed.
    pub reversed: bool,
}

/// A tick label placed for drawing or measurement.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlacedLabel {
    pub(crate) text: String,
    pub(crate) rect: Rect,
    pub(crate) rotated: bool,
}

/// A one-dimensional affine mapper between a data range and a pixel segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    axis_type: AxisType,
    range: (f64, f64),
    interval: f64,
    display_interval: usize,
    precision: u8,
    reversed: bool,
    points: Option<(Point, Point)>,
    label_display: LabelDisplay,
    label_orientation: AxisLabelOrientation,
    label_wrapping: LabelWrapping,
    double_sided_labels: bool,
    custom_labels: BTreeMap<DataKey, String>,
    stacking: bool,
    auto_stacking: bool,
    base_label_font_scale: f64,
    label_font_scale: f64,
    scaling: f64,
    label_style: TextStyle,
    label_fill: Brush,
    title: Label,
    line: StrokeStyle,
    tick_mark_display: TickMarkDisplay,
    tick_mark_length: f64,
    gridlines: Option<StrokeStyle>,
    show_outer_labels: bool,
    shown: bool,
}

impl Axis {
    /// Creates an axis of the given type with a `0..10` range and an interval of 1.
    ///
    /// Top and right axes default to drawing only their line (no labels or ticks), so that the
    /// four main axes frame the plot without duplicating labels.
    pub fn new(axis_type: AxisType) -> Self {
        let primary = matches!(axis_type, AxisType::LeftY | AxisType::BottomX);
        let mut title = Label::new("").with_font_size(12.0);
        if axis_type.is_vertical() {
            title.orientation = Orientation::Vertical;
        }
        Self {
            axis_type,
            range: (0.0, 10.0),
            interval: 1.0,
            display_interval: 1,
            precision: 0,
            reversed: false,
            points: None,
            label_display: if primary {
                LabelDisplay::Default
            } else {
                LabelDisplay::None
            },
            label_orientation: if axis_type.is_vertical() {
                AxisLabelOrientation::Perpendicular
            } else {
                AxisLabelOrientation::Parallel
            },
            label_wrapping: LabelWrapping::None,
            double_sided_labels: false,
            custom_labels: BTreeMap::new(),
            stacking: false,
            auto_stacking: true,
            base_label_font_scale: 1.0,
            label_font_scale: 1.0,
            scaling: 1.0,
            label_style: TextStyle::new(10.0),
            label_fill: Brush::Solid(css::BLACK),
            title,
            line: StrokeStyle::default(),
            tick_mark_display: if primary {
                TickMarkDisplay::Outer
            } else {
                TickMarkDisplay::None
            },
            tick_mark_length: 5.0,
            gridlines: None,
            show_outer_labels: true,
            shown: true,
        }
    }

    /// The axis type.
    pub fn axis_type(&self) -> AxisType {
        self.axis_type
    }

    /// The data range `(start, end)`.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Tick interval in data units.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// A label is shown on every `display_interval`-th tick.
    pub fn display_interval(&self) -> usize {
        self.display_interval
    }

    /// Decimal places used when formatting tick values.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Sets the data range, tick interval and labeling cadence.
    ///
    /// Degenerate input never fails:
    /// - `start == end`, or a non-finite bound, installs a `0..1` range;
    /// - `start > end` leaves the current range untouched;
    /// - an interval that is not positive or exceeds the span becomes half the span;
    /// - an interval yielding more than [`MAX_AXIS_POINTS`] ticks is widened to a multiple
    ///   of itself that stays under the cap;
    /// - a `display_interval` of zero is treated as one.
    ///
    /// Use [`Axis::try_set_range`] where bad bounds should be reported instead.
    pub fn set_range(
        &mut self,
        start: f64,
        end: f64,
        precision: u8,
        interval: f64,
        display_interval: usize,
    ) {
        let (start, end) = if !start.is_finite() || !end.is_finite() || start == end {
            tracing::warn!(
                start,
                end,
                axis = ?self.axis_type,
                "degenerate axis range; using 0..1"
            );
            (0.0, 1.0)
        } else if start > end {
            tracing::warn!(
                start,
                end,
                axis = ?self.axis_type,
                "axis range start is after its end; keeping previous range"
            );
            return;
        } else {
            (start, end)
        };
        let span = end - start;
        self.range = (start, end);
        let mut interval = if interval.is_finite() && interval > 0.0 && interval <= span {
            interval
        } else {
            span / 2.0
        };
        let max_steps = (MAX_AXIS_POINTS - 1) as f64;
        let steps = span / interval;
        if steps > max_steps {
            let widened = interval * (steps / max_steps).ceil();
            tracing::warn!(
                interval,
                widened,
                axis = ?self.axis_type,
                "too many axis points; widening the interval"
            );
            interval = widened;
        }
        self.interval = interval;
        self.precision = precision;
        self.display_interval = display_interval.max(1);
    }

    /// Like [`Axis::set_range`], but rejects non-finite or unordered bounds.
    pub fn try_set_range(
        &mut self,
        start: f64,
        end: f64,
        precision: u8,
        interval: f64,
        display_interval: usize,
    ) -> Result<()> {
        if !start.is_finite() || !end.is_finite() {
            return Err(GraphError::NonFiniteValue {
                context: "axis range",
            });
        }
        if start >= end {
            return Err(GraphError::InvalidRange { start, end });
        }
        self.set_range(start, end, precision, interval, display_interval);
        Ok(())
    }

    /// Picks a readable interval for `[min, max]` and widens the range to interval multiples.
    ///
    /// The interval is a 1, 2 or 5 multiple of a power of ten giving at most ten steps. With
    /// `include_extra_interval`, one more interval of headroom is added past `max`.
    pub fn set_range_auto(&mut self, min: f64, max: f64, include_extra_interval: bool) {
        if !min.is_finite() || !max.is_finite() {
            self.set_range(f64::NAN, f64::NAN, 0, 0.0, 1);
            return;
        }
        let (mut min, mut max) = if min <= max { (min, max) } else { (max, min) };
        if min == max {
            let pad = (min.abs() * 0.1).max(1.0);
            min -= pad;
            max += pad;
        }
        let span = max - min;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "the exponent of a finite span fits an i32"
        )]
        let magnitude = 10.0_f64.powi(span.log10().floor() as i32);
        let interval = [0.1, 0.2, 0.5, 1.0]
            .into_iter()
            .map(|step| step * magnitude)
            .find(|step| span / step <= 10.0)
            .unwrap_or(magnitude);
        let start = (min / interval).floor() * interval;
        let mut end = (max / interval).ceil() * interval;
        if include_extra_interval {
            end += interval;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "interval decimals are small and non-negative"
        )]
        let precision = if interval >= 1.0 {
            0
        } else {
            (-interval.log10() - 1e-9).ceil().clamp(0.0, 15.0) as u8
        };
        self.set_range(start, end, precision, interval, 1);
    }

    /// Whether larger values map toward `p0` instead of `p1`.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Reverses (or restores) the axis direction.
    pub fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
    }

    /// Fixes the physical endpoints for `range.start` (`p0`) and `range.end` (`p1`).
    ///
    /// When the axis is reversed the mapping runs the other way: `range.start` lands on `p1`.
    pub fn set_points(&mut self, p0: Point, p1: Point) {
        self.points = Some((p0, p1));
    }

    /// Forgets the physical endpoints; every coordinate query returns `None` afterwards.
    pub fn clear_points(&mut self) {
        self.points = None;
    }

    /// The physical endpoints as given to [`Axis::set_points`].
    pub fn points(&self) -> Option<(Point, Point)> {
        self.points
    }

    /// Maps a data value to a physical coordinate along the axis.
    ///
    /// Returns the y coordinate for vertical axes and the x coordinate for horizontal ones, or
    /// `None` if `value` is outside `[range.start, range.end]` (or NaN) or no endpoints are set.
    pub fn get_physical_coordinate(&self, value: f64) -> Option<f64> {
        let (start, end) = self.range;
        if !(value >= start && value <= end) {
            return None;
        }
        let (p0, p1) = self.points?;
        let (a, b) = self.along(p0, p1);
        Some(if self.reversed {
            interpolate(b, a, start, end, value)
        } else {
            interpolate(a, b, start, end, value)
        })
    }

    /// Maps a physical coordinate along the axis back to a data value.
    ///
    /// Returns `None` if `coordinate` lies outside the endpoints or the endpoints coincide.
    pub fn get_value_from_physical_coordinate(&self, coordinate: f64) -> Option<f64> {
        let (p0, p1) = self.points?;
        let (a, b) = self.along(p0, p1);
        if a == b || coordinate < a.min(b) || coordinate > a.max(b) {
            return None;
        }
        let (start, end) = self.range;
        Some(if self.reversed {
            interpolate(end, start, a, b, coordinate)
        } else {
            interpolate(start, end, a, b, coordinate)
        })
    }

    /// The point on the axis line for `value`, if it is in range.
    pub fn point_at(&self, value: f64) -> Option<Point> {
        let (p0, _) = self.points?;
        let c = self.get_physical_coordinate(value)?;
        Some(if self.axis_type.is_vertical() {
            Point::new(p0.x, c)
        } else {
            Point::new(c, p0.y)
        })
    }

    /// Tick positions at `interval` steps from `range.start` through `range.end`.
    pub fn get_axis_points(&self) -> AxisPoints<'_> {
        AxisPoints {
            axis: self,
            next: 0,
            count: self.point_count(),
        }
    }

    /// Length of the axis in pixels, if endpoints are set.
    pub fn physical_length(&self) -> Option<f64> {
        let (p0, p1) = self.points?;
        let (a, b) = self.along(p0, p1);
        Some((b - a).abs())
    }

    /// Which labels are shown.
    pub fn label_display(&self) -> LabelDisplay {
        self.label_display
    }

    /// Sets which labels are shown.
    pub fn set_label_display(&mut self, display: LabelDisplay) {
        self.label_display = display;
    }

    /// How tick label text runs relative to the axis line.
    pub fn label_orientation(&self) -> AxisLabelOrientation {
        self.label_orientation
    }

    /// Sets how tick label text runs relative to the axis line.
    pub fn set_label_orientation(&mut self, orientation: AxisLabelOrientation) {
        self.label_orientation = orientation;
    }

    /// How long labels are broken into lines.
    pub fn label_wrapping(&self) -> LabelWrapping {
        self.label_wrapping
    }

    /// Sets how long labels are broken into lines.
    pub fn set_label_wrapping(&mut self, wrapping: LabelWrapping) {
        self.label_wrapping = wrapping;
    }

    /// Breaks labels into lines of about `line_length` characters.
    pub fn set_label_line_length(&mut self, line_length: usize) {
        self.label_wrapping = LabelWrapping::LineLength(line_length);
    }

    /// Splits labels longer than `max_length` characters at natural break points.
    pub fn set_label_length_auto(&mut self, max_length: usize) {
        self.label_wrapping = LabelWrapping::Auto(max_length);
    }

    /// Whether tick labels are drawn on both sides of the axis line.
    pub fn has_double_sided_labels(&self) -> bool {
        self.double_sided_labels
    }

    /// Draws tick labels on the inner side of the axis line as well.
    pub fn set_double_sided_labels(&mut self, double_sided: bool) {
        self.double_sided_labels = double_sided;
    }

    /// Sets (or replaces) the custom label at a data position.
    pub fn set_custom_label(&mut self, value: f64, text: impl Into<String>) {
        self.custom_labels.insert(DataKey(value), text.into());
    }

    /// The custom label at exactly `value`, if any.
    pub fn custom_label(&self, value: f64) -> Option<&str> {
        self.custom_labels.get(&DataKey(value)).map(String::as_str)
    }

    /// Iterates custom labels in ascending data order.
    pub fn custom_labels(&self) -> impl Iterator<Item = (f64, &str)> + '_ {
        self.custom_labels.iter().map(|(k, v)| (k.0, v.as_str()))
    }

    /// Removes all custom labels.
    pub fn clear_custom_labels(&mut self) {
        self.custom_labels.clear();
    }

    /// Whether tick labels are drawn in two staggered rows.
    pub fn is_stacking(&self) -> bool {
        self.stacking
    }

    /// Forces stacking on or off and disables automatic stacking.
    pub fn set_stacking(&mut self, stacking: bool) {
        self.stacking = stacking;
        self.auto_stacking = false;
    }

    /// Whether layout may toggle stacking on its own.
    pub fn is_auto_stacking(&self) -> bool {
        self.auto_stacking
    }

    /// Lets layout decide stacking (the default).
    pub fn enable_auto_stacking(&mut self, enable: bool) {
        self.auto_stacking = enable;
    }

    pub(crate) fn set_stacking_from_layout(&mut self, stacking: bool) {
        self.stacking = stacking;
    }

    /// Current label font scale (relative to the axis scaling).
    pub fn label_font_scale(&self) -> f64 {
        self.label_font_scale
    }

    /// Sets the label font scale layout starts from in each cycle.
    pub fn set_label_font_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.base_label_font_scale = scale;
            self.label_font_scale = scale;
        }
    }

    pub(crate) fn apply_label_font_scale(&mut self, scale: f64) {
        self.label_font_scale = scale;
    }

    /// Overall size multiplier (DPI or zoom) applied to fonts, ticks and spacing.
    pub fn scaling(&self) -> f64 {
        self.scaling
    }

    /// Sets the overall scaling and resets the label font scale to its configured base.
    pub fn set_scaling(&mut self, scaling: f64) {
        if scaling.is_finite() && scaling > 0.0 {
            self.scaling = scaling;
        }
        self.label_font_scale = self.base_label_font_scale;
    }

    /// Base font for tick labels.
    pub fn label_style(&self) -> &TextStyle {
        &self.label_style
    }

    /// Sets the base font for tick labels.
    pub fn set_label_style(&mut self, style: TextStyle) {
        self.label_style = style;
    }

    /// Sets the tick label fill.
    pub fn set_label_fill(&mut self, fill: impl Into<Brush>) {
        self.label_fill = fill.into();
    }

    /// The axis title.
    pub fn title(&self) -> &Label {
        &self.title
    }

    /// Mutable access to the axis title.
    pub fn title_mut(&mut self) -> &mut Label {
        &mut self.title
    }

    /// Sets the axis title text.
    pub fn set_title(&mut self, text: impl Into<String>) {
        self.title.text = text.into();
    }

    /// Sets the stroke for the axis line and tick marks.
    pub fn set_line(&mut self, line: StrokeStyle) {
        self.line = line;
    }

    /// Where tick marks are drawn.
    pub fn tick_mark_display(&self) -> TickMarkDisplay {
        self.tick_mark_display
    }

    /// Sets where tick marks are drawn.
    pub fn set_tick_mark_display(&mut self, display: TickMarkDisplay) {
        self.tick_mark_display = display;
    }

    /// Sets the tick mark length, before scaling.
    pub fn set_tick_mark_length(&mut self, length: f64) {
        self.tick_mark_length = length.max(0.0);
    }

    /// Enables gridlines with the default faint stroke.
    pub fn enable_gridlines(&mut self) {
        self.gridlines = Some(default_grid_stroke());
    }

    /// Sets (or removes) gridlines.
    pub fn set_gridlines(&mut self, stroke: Option<StrokeStyle>) {
        self.gridlines = stroke;
    }

    /// Whether the first and last tick labels are drawn.
    pub fn is_showing_outer_labels(&self) -> bool {
        self.show_outer_labels
    }

    /// Shows or hides the first and last tick labels.
    pub fn show_outer_labels(&mut self, show: bool) {
        self.show_outer_labels = show;
    }

    /// Whether the axis is drawn at all.
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Shows or hides the axis. Hidden axes still map coordinates.
    pub fn show(&mut self, show: bool) {
        self.shown = show;
    }

    /// Copies range, labeling and font state from `source`, keeping this axis's type, points,
    /// line style and visibility.
    pub fn copy_settings_from(&mut self, source: &Self) {
        self.range = source.range;
        self.interval = source.interval;
        self.display_interval = source.display_interval;
        self.precision = source.precision;
        self.reversed = source.reversed;
        self.label_display = source.label_display;
        self.label_orientation = source.label_orientation;
        self.label_wrapping = source.label_wrapping;
        self.double_sided_labels = source.double_sided_labels;
        self.custom_labels = source.custom_labels.clone();
        self.stacking = source.stacking;
        self.auto_stacking = source.auto_stacking;
        self.base_label_font_scale = source.base_label_font_scale;
        self.label_font_scale = source.label_font_scale;
        self.scaling = source.scaling;
        self.label_style = source.label_style.clone();
        self.label_fill = source.label_fill.clone();
        self.tick_mark_display = source.tick_mark_display;
        self.tick_mark_length = source.tick_mark_length;
        self.show_outer_labels = source.show_outer_labels;
    }

    /// Snapshot of the layout-relevant state.
    pub fn layout(&self) -> AxisLayout {
        AxisLayout {
            axis_type: self.axis_type,
            range: self.range,
            endpoints: self.points,
            label_font_scale: self.label_font_scale,
            stacking: self.stacking,
            reversed: self.reversed,
        }
    }

    /// The text shown at `value`, per the label display mode and wrapping.
    pub fn label_text(&self, value: f64) -> Option<String> {
        let custom = self.custom_label(value);
        let text = match self.label_display {
            LabelDisplay::None => None,
            LabelDisplay::CustomOnly => custom.map(String::from),
            LabelDisplay::Default => Some(
                custom.map_or_else(|| format_number(value, self.precision), String::from),
            ),
            LabelDisplay::CustomAndValues => {
                let number = format_number(value, self.precision);
                Some(match custom {
                    Some(c) => format!("{c} ({number})"),
                    None => number,
                })
            }
        };
        let text = text.filter(|t| !t.is_empty())?;
        Some(match self.label_wrapping {
            LabelWrapping::None => text,
            LabelWrapping::LineLength(length) => fit_to_line_length(&text, length),
            LabelWrapping::Auto(max_length) => split_long_text(&text, max_length),
        })
    }

    /// Tick labels that will be drawn, as `(point, text)` in axis order.
    pub fn displayed_labels(&self) -> Vec<(AxisPoint, String)> {
        if !self.shown {
            return Vec::new();
        }
        let last = self.point_count().saturating_sub(1);
        self.get_axis_points()
            .filter(|pt| pt.index % self.display_interval == 0)
            .filter(|pt| self.show_outer_labels || (pt.index != 0 && pt.index != last))
            .filter_map(|pt| self.label_text(pt.value).map(|t| (pt, t)))
            .collect()
    }

    /// The font tick labels are measured and drawn with.
    pub fn effective_label_style(&self) -> TextStyle {
        self.label_style.scaled(self.scaling * self.label_font_scale)
    }

    /// Whether label text is turned 90° to satisfy the label orientation.
    fn labels_rotated(&self) -> bool {
        self.axis_type.is_vertical() == (self.label_orientation == AxisLabelOrientation::Parallel)
    }

    /// Surface `(width, height)` of a tick label, rotation included.
    fn label_size(&self, measurer: &dyn TextMeasurer, text: &str, style: &TextStyle) -> (f64, f64) {
        let (w, h) = measurer.measure_block(text, style, self.scaling);
        if self.labels_rotated() {
            (h, w)
        } else {
            (w, h)
        }
    }

    /// Extent of a label's surface size along the axis line.
    fn along_extent(&self, (w, h): (f64, f64)) -> f64 {
        if self.axis_type.is_vertical() { h } else { w }
    }

    /// Decides whether labels must be staggered to avoid overlapping each other.
    ///
    /// With automatic stacking disabled this simply reports the current setting.
    pub fn should_labels_be_stacked_to_fit(&self, measurer: &dyn TextMeasurer) -> bool {
        if self.label_display == LabelDisplay::None || !self.shown {
            return false;
        }
        if !self.auto_stacking {
            return self.stacking;
        }
        let Some(length) = self.physical_length() else {
            return self.stacking;
        };
        let labels = self.displayed_labels();
        let count = self.fit_label_count(&labels);
        if count == 0 {
            return false;
        }
        let by_height = self.label_orientation == AxisLabelOrientation::Perpendicular;
        let max_size = length / count as f64 - if by_height { 2.0 * self.scaling } else { 0.0 };
        if max_size <= 0.0 {
            return false;
        }
        let style = self.effective_label_style();
        let last = self.point_count().saturating_sub(1);
        labels.iter().any(|(pt, text)| {
            let mut extent = self.along_extent(self.label_size(measurer, text, &style));
            if self.show_outer_labels && (pt.index == 0 || pt.index == last) {
                extent /= 2.0;
            }
            extent >= max_size
        })
    }

    /// The largest label font scale (never above the current one, never below `min_scale`)
    /// at which every label fits its share of the axis length.
    ///
    /// `label_padding` is the breathing room reserved per label, before scaling. Returns
    /// `None` when the axis shows no labels.
    pub fn calc_best_label_font_scale(
        &self,
        measurer: &dyn TextMeasurer,
        min_scale: f64,
        label_padding: f64,
    ) -> Option<f64> {
        if self.label_display == LabelDisplay::None || !self.shown {
            return None;
        }
        let length = self.physical_length()?;
        let labels = self.displayed_labels();
        let count = self.fit_label_count(&labels);
        if count == 0 {
            return None;
        }
        let mut max_width = length / count as f64 - label_padding * self.scaling;
        if self.stacking {
            max_width *= 2.0;
        }
        let current = self.label_font_scale;
        if max_width <= 0.0 {
            return Some(min_scale.min(current));
        }
        let style = self.effective_label_style();
        let widest = labels
            .iter()
            .map(|(_, text)| self.along_extent(self.label_size(measurer, text, &style)))
            .fold(0.0_f64, f64::max);
        let mut best = current;
        if widest > max_width {
            best *= max_width / widest;
        }
        Some(best.max(min_scale).min(current))
    }

    /// Displayed label count used by the fitting rules: when more than two labels are shown
    /// and both outer labels hang half outside the axis, they count as one.
    fn fit_label_count(&self, labels: &[(AxisPoint, String)]) -> usize {
        let last = self.point_count().saturating_sub(1);
        let mut count = labels.len();
        let first_shown = labels.first().is_some_and(|(pt, _)| pt.index == 0);
        let last_shown = labels.last().is_some_and(|(pt, _)| pt.index == last);
        if count > 2
            && self.point_count() > 2
            && self.show_outer_labels
            && first_shown
            && last_shown
        {
            count -= 1;
        }
        count
    }

    fn outer_tick(&self) -> f64 {
        match self.tick_mark_display {
            TickMarkDisplay::Outer | TickMarkDisplay::Crossed => {
                self.tick_mark_length * self.scaling
            }
            TickMarkDisplay::Inner | TickMarkDisplay::None => 0.0,
        }
    }

    fn inner_tick(&self) -> f64 {
        match self.tick_mark_display {
            TickMarkDisplay::Inner | TickMarkDisplay::Crossed => {
                self.tick_mark_length * self.scaling
            }
            TickMarkDisplay::Outer | TickMarkDisplay::None => 0.0,
        }
    }

    /// Tick labels with their rectangles on the surface.
    ///
    /// Double-sided axes list the outer labels first, then their mirror images inside the
    /// plot.
    pub(crate) fn placed_labels(&self, measurer: &dyn TextMeasurer) -> Vec<PlacedLabel> {
        let Some((p0, _)) = self.points else {
            return Vec::new();
        };
        let labels = self.displayed_labels();
        if labels.is_empty() {
            return Vec::new();
        }
        let style = self.effective_label_style();
        let sizes: Vec<(f64, f64)> = labels
            .iter()
            .map(|(_, text)| self.label_size(measurer, text, &style))
            .collect();
        let vertical = self.axis_type.is_vertical();
        let row_extent = sizes
            .iter()
            .map(|&(w, h)| if vertical { w } else { h })
            .fold(0.0_f64, f64::max);
        let rotated = self.labels_rotated();
        let gap = SPACING_BETWEEN_LABELS_AND_LINE * self.scaling;
        let (ox, oy) = self.axis_type.outward();
        let mut sides = Vec::from([(ox, oy, self.outer_tick() + gap)]);
        if self.double_sided_labels {
            sides.push((-ox, -oy, self.inner_tick() + gap));
        }

        let mut placed = Vec::new();
        for (dx, dy, offset) in sides {
            for (i, ((pt, text), &(w, h))) in labels.iter().zip(&sizes).enumerate() {
                let Some(c) = pt.physical else {
                    continue;
                };
                let row = if self.stacking { (i % 2) as f64 } else { 0.0 };
                let distance = offset + row * row_extent;
                let rect = if vertical {
                    let edge = p0.x + dx * distance;
                    let x0 = if dx < 0.0 { edge - w } else { edge };
                    Rect::new(x0, c - 0.5 * h, x0 + w, c + 0.5 * h)
                } else {
                    let edge = p0.y + dy * distance;
                    let y0 = if dy < 0.0 { edge - h } else { edge };
                    Rect::new(c - 0.5 * w, y0, c + 0.5 * w, y0 + h)
                };
                placed.push(PlacedLabel {
                    text: text.clone(),
                    rect,
                    rotated,
                });
            }
        }
        placed
    }

    /// Rectangle of the axis title, outside the tick labels.
    fn title_rect(&self, measurer: &dyn TextMeasurer, labels_outer: f64) -> Option<Rect> {
        if !self.title.is_visible() {
            return None;
        }
        let (p0, p1) = self.points?;
        let (w, h) = self.title.measure_at(measurer, self.title.scaling * self.scaling);
        let gap = SPACING_BETWEEN_LABELS_AND_LINE * self.scaling;
        let distance = labels_outer + gap;
        Some(match self.axis_type {
            AxisType::LeftY => {
                let cy = 0.5 * (p0.y + p1.y);
                let x1 = p0.x - distance;
                Rect::new(x1 - w, cy - 0.5 * h, x1, cy + 0.5 * h)
            }
            AxisType::RightY => {
                let cy = 0.5 * (p0.y + p1.y);
                let x0 = p0.x + distance;
                Rect::new(x0, cy - 0.5 * h, x0 + w, cy + 0.5 * h)
            }
            AxisType::BottomX => {
                let cx = 0.5 * (p0.x + p1.x);
                let y0 = p0.y + distance;
                Rect::new(cx - 0.5 * w, y0, cx + 0.5 * w, y0 + h)
            }
            AxisType::TopX => {
                let cx = 0.5 * (p0.x + p1.x);
                let y1 = p0.y - distance;
                Rect::new(cx - 0.5 * w, y1 - h, cx + 0.5 * w, y1)
            }
        })
    }

    /// Outward distance from the axis line covered by ticks and labels (no title).
    fn labels_outer_extent(&self, labels: &[PlacedLabel]) -> f64 {
        let Some((p0, _)) = self.points else {
            return 0.0;
        };
        let (ox, oy) = self.axis_type.outward();
        labels
            .iter()
            .map(|l| match self.axis_type {
                AxisType::LeftY | AxisType::RightY => {
                    if ox < 0.0 {
                        p0.x - l.rect.x0
                    } else {
                        l.rect.x1 - p0.x
                    }
                }
                AxisType::BottomX | AxisType::TopX => {
                    if oy < 0.0 {
                        p0.y - l.rect.y0
                    } else {
                        l.rect.y1 - p0.y
                    }
                }
            })
            .fold(self.outer_tick(), f64::max)
    }

    /// Everything the axis draws: line, ticks, labels and title.
    ///
    /// Returns `None` for hidden axes or axes without endpoints.
    pub fn bounding_box(&self, measurer: &dyn TextMeasurer) -> Option<Rect> {
        if !self.shown {
            return None;
        }
        let (p0, p1) = self.points?;
        let (ox, oy) = self.axis_type.outward();
        let outer = self.outer_tick();
        let inner = self.inner_tick();
        let line = Rect::from_points(p0, p1);
        let ticks = Rect::new(
            line.x0 + (ox * outer).min(-ox * inner),
            line.y0 + (oy * outer).min(-oy * inner),
            line.x1 + (ox * outer).max(-ox * inner),
            line.y1 + (oy * outer).max(-oy * inner),
        );
        let labels = self.placed_labels(measurer);
        let mut bbox = labels.iter().fold(ticks, |acc, l| acc.union(l.rect));
        if let Some(title) = self.title_rect(measurer, self.labels_outer_extent(&labels)) {
            bbox = bbox.union(title);
        }
        Some(bbox)
    }

    /// Outward thickness of the axis: distance from the axis line to the outer edge of its
    /// ticks, labels and title.
    pub fn protruding_thickness(&self, measurer: &dyn TextMeasurer) -> f64 {
        let Some(r) = self.protruding_bounding_box(measurer) else {
            return 0.0;
        };
        if self.axis_type.is_vertical() {
            r.width()
        } else {
            r.height()
        }
    }

    /// The part of [`Axis::bounding_box`] that sticks out from the axis line, spanning the
    /// axis length.
    pub fn protruding_bounding_box(&self, measurer: &dyn TextMeasurer) -> Option<Rect> {
        let bbox = self.bounding_box(measurer)?;
        let (p0, p1) = self.points?;
        let line = Rect::from_points(p0, p1);
        Some(match self.axis_type {
            AxisType::LeftY => Rect::new(bbox.x0.min(line.x0), line.y0, line.x0, line.y1),
            AxisType::RightY => Rect::new(line.x1, line.y0, bbox.x1.max(line.x1), line.y1),
            AxisType::BottomX => Rect::new(line.x0, line.y1, line.x1, bbox.y1.max(line.y1)),
            AxisType::TopX => Rect::new(line.x0, bbox.y0.min(line.y0), line.x1, line.y0),
        })
    }

    /// Gridlines across `plot_rect` at interior tick positions.
    pub(crate) fn gridlines(&self, plot_rect: Rect, ids: &mut IdAllocator) -> Option<Drawable> {
        let stroke = self.gridlines.clone()?;
        let vertical = self.axis_type.is_vertical();
        let (lo, hi) = if vertical {
            (plot_rect.y0, plot_rect.y1)
        } else {
            (plot_rect.x0, plot_rect.x1)
        };
        let segments: Vec<Line> = self
            .get_axis_points()
            .filter_map(|pt| pt.physical)
            .filter(|&c| c > lo + 0.5 && c < hi - 0.5)
            .map(|c| {
                if vertical {
                    Line::new((plot_rect.x0, c), (plot_rect.x1, c))
                } else {
                    Line::new((c, plot_rect.y0), (c, plot_rect.y1))
                }
            })
            .collect();
        if segments.is_empty() {
            return None;
        }
        Some(Drawable::new(
            ids.next_id(),
            DrawableRole::Gridlines(self.axis_type),
            crate::z_order::GRID_LINES,
            Primitive::Lines { segments, stroke },
        ))
    }

    /// Line, tick marks, labels and title as drawables.
    pub(crate) fn drawables(
        &self,
        measurer: &dyn TextMeasurer,
        role: DrawableRole,
        layer: i32,
        ids: &mut IdAllocator,
    ) -> Vec<Drawable> {
        let mut out = Vec::new();
        if !self.shown {
            return out;
        }
        let Some((p0, p1)) = self.points else {
            return out;
        };
        let (ox, oy) = self.axis_type.outward();
        let outer = self.outer_tick();
        let inner = self.inner_tick();

        let mut segments = Vec::new();
        segments.push(Line::new(p0, p1));
        if outer > 0.0 || inner > 0.0 {
            for pt in self.get_axis_points() {
                let Some(base) = self.point_at(pt.value) else {
                    continue;
                };
                segments.push(Line::new(
                    (base.x - ox * inner, base.y - oy * inner),
                    (base.x + ox * outer, base.y + oy * outer),
                ));
            }
        }
        let mut line = self.line.clone();
        line.stroke_width *= self.scaling;
        out.push(Drawable::new(
            ids.next_id(),
            role,
            layer,
            Primitive::Lines {
                segments,
                stroke: line,
            },
        ));

        let style = self.effective_label_style();
        let labels = self.placed_labels(measurer);
        let outer_extent = self.labels_outer_extent(&labels);
        for label in labels {
            let (origin, anchoring, angle) = if label.rotated {
                (label.rect.center(), Anchoring::Center, 90.0)
            } else {
                (label.rect.origin(), Anchoring::TopLeftCorner, 0.0)
            };
            out.push(Drawable::new(
                ids.next_id(),
                role,
                layer,
                Primitive::Text {
                    text: label.text,
                    origin,
                    anchoring,
                    style: style.clone(),
                    fill: self.label_fill.clone(),
                    angle,
                    line_spacing: self.scaling,
                    bounds: label.rect,
                },
            ));
        }

        if let Some(rect) = self.title_rect(measurer, outer_extent) {
            let scale = self.title.scaling * self.scaling;
            out.push(Drawable::new(
                ids.next_id(),
                role,
                layer,
                Primitive::Text {
                    text: self.title.text.clone(),
                    origin: rect.center(),
                    anchoring: Anchoring::Center,
                    style: self.title.style.scaled(scale),
                    fill: self.title.fill.clone(),
                    angle: match self.title.orientation {
                        Orientation::Horizontal => 0.0,
                        Orientation::Vertical => 90.0,
                    },
                    line_spacing: self.title.line_spacing * scale,
                    bounds: rect,
                },
            ));
        }
        out
    }

    fn point_count(&self) -> usize {
        let (start, end) = self.range;
        let steps = (end - start) / self.interval;
        if !steps.is_finite() || steps < 0.0 {
            return 0;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "steps is finite and non-negative; tick counts are small"
        )]
        let whole = (steps + 1e-9).floor() as usize;
        (whole + 1).min(MAX_AXIS_POINTS)
    }

    fn point_value(&self, index: usize) -> f64 {
        let (start, end) = self.range;
        (start + index as f64 * self.interval).min(end)
    }

    fn along(&self, p0: Point, p1: Point) -> (f64, f64) {
        if self.axis_type.is_vertical() {
            (p0.y, p1.y)
        } else {
            (p0.x, p1.x)
        }
    }
}

/// Affine map of `v` from `[from_a, from_b]` onto `[a, b]`, exact at both ends.
fn interpolate(a: f64, b: f64, from_a: f64, from_b: f64, v: f64) -> f64 {
    if v == from_a {
        a
    } else if v == from_b {
        b
    } else {
        a + (v - from_a) / (from_b - from_a) * (b - a)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec::Vec;

    use super::*;
    use plotwise_text::HeuristicTextMeasurer;

    fn vertical(start: f64, end: f64) -> Axis {
        let mut axis = Axis::new(AxisType::LeftY);
        axis.set_range(start, end, 0, 1.0, 1);
        axis.set_points(Point::new(0.0, 100.0), Point::new(0.0, 0.0));
        axis
    }

    #[test]
    fn maps_values_between_endpoints() {
        let axis = vertical(0.0, 10.0);
        assert_eq!(axis.get_physical_coordinate(5.0), Some(50.0));
        assert_eq!(axis.get_physical_coordinate(10.0), Some(0.0));
        assert_eq!(axis.get_physical_coordinate(0.0), Some(100.0));
        assert_eq!(axis.get_physical_coordinate(11.0), None);
        assert_eq!(axis.get_physical_coordinate(-0.5), None);
        assert_eq!(axis.get_physical_coordinate(f64::NAN), None);
    }

    #[test]
    fn mapping_is_monotonic_with_exact_ends() {
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(0.1, 0.7, 1, 0.1, 1);
        axis.set_points(Point::new(13.3, 0.0), Point::new(471.9, 0.0));
        assert_eq!(axis.get_physical_coordinate(0.1), Some(13.3));
        assert_eq!(axis.get_physical_coordinate(0.7), Some(471.9));
        let mut prev = f64::NEG_INFINITY;
        for i in 0..=600 {
            let v = 0.1 + 0.6 * f64::from(i) / 600.0;
            let c = axis.get_physical_coordinate(v.min(0.7)).unwrap();
            assert!(c >= prev, "not monotonic at {v}: {c} < {prev}");
            prev = c;
        }
    }

    #[test]
    fn reversed_axis_mirrors_plain_axis() {
        let plain = vertical(2.0, 12.0);
        let mut reversed = plain.clone();
        reversed.set_reversed(true);
        for v in [3.3, 7.0, 9.99] {
            let (start, end) = plain.range();
            let mirrored = plain.get_physical_coordinate(end - (v - start)).unwrap();
            let c = reversed.get_physical_coordinate(v).unwrap();
            assert!((c - mirrored).abs() < 1e-9, "value {v}: {c} vs {mirrored}");
        }
        assert_eq!(reversed.get_physical_coordinate(2.0), Some(0.0));
        assert_eq!(reversed.get_physical_coordinate(12.0), Some(100.0));
    }

    #[test]
    fn reversed_axis_hits_endpoints_exactly() {
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(0.1, 0.7, 1, 0.1, 1);
        axis.set_points(Point::new(13.3, 0.0), Point::new(471.9, 0.0));
        axis.set_reversed(true);
        assert_eq!(axis.get_physical_coordinate(0.7), Some(13.3));
        assert_eq!(axis.get_physical_coordinate(0.1), Some(471.9));
        assert_eq!(axis.get_value_from_physical_coordinate(13.3), Some(0.7));
        assert_eq!(axis.get_value_from_physical_coordinate(471.9), Some(0.1));
        // Interior values sit symmetrically about the middle of the segment.
        for v in [0.2, 0.25, 0.4, 0.55] {
            let c = axis.get_physical_coordinate(v).unwrap();
            let mirror = axis.get_physical_coordinate(0.8 - v).unwrap();
            assert!((c + mirror - (13.3 + 471.9)).abs() < 1e-9, "value {v}");
            let back = axis.get_value_from_physical_coordinate(c).unwrap();
            assert!((back - v).abs() < 1e-12, "value {v} came back as {back}");
        }
    }

    #[test]
    fn inverse_mapping_round_trips_within_tolerance() {
        let axis = vertical(0.0, 10.0);
        let v = axis.get_value_from_physical_coordinate(25.0).unwrap();
        assert!((v - 7.5).abs() < 1e-12, "{v}");
        assert_eq!(axis.get_value_from_physical_coordinate(120.0), None);
    }

    #[test]
    fn degenerate_ranges_fall_back_or_are_ignored() {
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(5.0, 5.0, 0, 1.0, 1);
        assert_eq!(axis.range(), (0.0, 1.0));
        assert_eq!(axis.interval(), 0.5);

        axis.set_range(0.0, 20.0, 0, 5.0, 1);
        axis.set_range(9.0, 3.0, 0, 1.0, 1);
        assert_eq!(
            axis.range(),
            (0.0, 20.0),
            "unordered bounds keep the old range"
        );

        assert_eq!(
            axis.try_set_range(9.0, 3.0, 0, 1.0, 1),
            Err(GraphError::InvalidRange {
                start: 9.0,
                end: 3.0
            })
        );
        assert!(axis.try_set_range(f64::INFINITY, 3.0, 0, 1.0, 1).is_err());
    }

    #[test]
    fn oversized_interval_is_halved_span() {
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(0.0, 4.0, 0, 10.0, 0);
        assert_eq!(axis.interval(), 2.0);
        assert_eq!(axis.display_interval(), 1);
    }

    #[test]
    fn tiny_interval_is_widened_to_point_cap() {
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(0.0, 1e9, 0, 1e-3, 1);
        assert!(
            axis.interval() > 1e-3,
            "interval kept at {}",
            axis.interval()
        );
        let count = axis.get_axis_points().len();
        assert!(count <= MAX_AXIS_POINTS, "{count} points");
        assert!(
            count > MAX_AXIS_POINTS / 2,
            "cap widens no more than needed: {count}"
        );
        let last = axis.get_axis_points().last().unwrap();
        assert!(last.value <= 1e9, "{last:?}");
    }

    #[test]
    fn axis_points_step_by_interval() {
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(0.0, 10.0, 0, 3.0, 1);
        let values: Vec<f64> = axis.get_axis_points().map(|p| p.value).collect();
        assert_eq!(values, [0.0, 3.0, 6.0, 9.0]);

        axis.set_range(0.0, 1.0, 1, 0.1, 1);
        assert_eq!(axis.get_axis_points().len(), 11);
        assert!(axis.get_axis_points().all(|p| p.physical.is_none()));
    }

    #[test]
    fn auto_range_picks_round_interval() {
        let mut axis = Axis::new(AxisType::LeftY);
        axis.set_range_auto(3.0, 97.0, false);
        assert_eq!(axis.range(), (0.0, 100.0));
        assert_eq!(axis.interval(), 10.0);

        axis.set_range_auto(0.0, 0.73, true);
        assert_eq!(axis.interval(), 0.1);
        assert!((axis.range().1 - 0.9).abs() < 1e-9);
        assert_eq!(axis.precision(), 1);
    }

    #[test]
    fn label_display_modes() {
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(0.0, 2000.0, 0, 1000.0, 1);
        axis.set_custom_label(1000.0, "mid");
        assert_eq!(axis.label_text(0.0).as_deref(), Some("0"));
        assert_eq!(axis.label_text(1000.0).as_deref(), Some("mid"));
        assert_eq!(axis.label_text(2000.0).as_deref(), Some("2,000"));

        axis.set_label_display(LabelDisplay::CustomOnly);
        assert_eq!(axis.label_text(0.0), None);
        assert_eq!(axis.label_text(1000.0).as_deref(), Some("mid"));

        axis.set_label_display(LabelDisplay::CustomAndValues);
        assert_eq!(axis.label_text(1000.0).as_deref(), Some("mid (1,000)"));

        axis.set_label_display(LabelDisplay::None);
        assert!(axis.displayed_labels().is_empty());
    }

    #[test]
    fn display_interval_and_outer_labels_filter_labels() {
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(0.0, 10.0, 0, 1.0, 2);
        let shown: Vec<f64> = axis.displayed_labels().iter().map(|(p, _)| p.value).collect();
        assert_eq!(shown, [0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        axis.show_outer_labels(false);
        let shown: Vec<f64> = axis.displayed_labels().iter().map(|(p, _)| p.value).collect();
        assert_eq!(shown, [2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn bounding_box_reaches_past_labels() {
        let m = HeuristicTextMeasurer;
        let mut axis = vertical(0.0, 10.0);
        axis.set_points(Point::new(100.0, 300.0), Point::new(100.0, 0.0));
        let bbox = axis.bounding_box(&m).unwrap();
        // "10" at 10px is 12px wide; tick 5 + gap 5.
        assert!((bbox.x0 - (100.0 - 22.0)).abs() < 1e-9, "{bbox:?}");
        assert!((axis.protruding_thickness(&m) - 22.0).abs() < 1e-9);
        // Half the top label hangs above the axis.
        assert!((bbox.y0 - -5.0).abs() < 1e-9, "{bbox:?}");

        axis.set_title("Count");
        let with_title = axis.bounding_box(&m).unwrap();
        assert!(with_title.x0 < bbox.x0 - 12.0);
    }

    #[test]
    fn hidden_axis_has_no_extent_but_still_maps() {
        let m = HeuristicTextMeasurer;
        let mut axis = vertical(0.0, 10.0);
        axis.show(false);
        assert_eq!(axis.bounding_box(&m), None);
        assert_eq!(axis.get_physical_coordinate(5.0), Some(50.0));
    }

    #[test]
    fn crowded_labels_request_stacking() {
        let m = HeuristicTextMeasurer;
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(0.0, 10.0, 0, 1.0, 1);
        for i in 0..=10 {
            axis.set_custom_label(f64::from(i), "category name");
        }
        axis.set_points(Point::new(0.0, 0.0), Point::new(200.0, 0.0));
        assert!(axis.should_labels_be_stacked_to_fit(&m));

        axis.set_points(Point::new(0.0, 0.0), Point::new(5000.0, 0.0));
        assert!(!axis.should_labels_be_stacked_to_fit(&m));

        axis.set_stacking(true);
        assert!(
            axis.should_labels_be_stacked_to_fit(&m),
            "manual stacking is reported as-is"
        );
    }

    #[test]
    fn best_font_scale_shrinks_but_respects_floor() {
        let m = HeuristicTextMeasurer;
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(0.0, 2.0, 0, 1.0, 1);
        for (i, text) in ["aaaaaaaaaa", "bbbbbbbbbb", "cccccccccc"].iter().enumerate() {
            axis.set_custom_label(i as f64, *text);
        }
        // 3 labels, outer pair counts once: 2 slots of 60px, minus 2px padding.
        axis.set_points(Point::new(0.0, 0.0), Point::new(120.0, 0.0));
        // Widest label is 60px at scale 1; max is 58px.
        let best = axis.calc_best_label_font_scale(&m, 0.75, 2.0).unwrap();
        assert!((best - 58.0 / 60.0).abs() < 1e-9, "{best}");

        axis.set_points(Point::new(0.0, 0.0), Point::new(40.0, 0.0));
        let floored = axis.calc_best_label_font_scale(&m, 0.75, 2.0).unwrap();
        assert_eq!(floored, 0.75);

        axis.set_points(Point::new(0.0, 0.0), Point::new(4000.0, 0.0));
        let roomy = axis.calc_best_label_font_scale(&m, 0.75, 2.0).unwrap();
        assert_eq!(roomy, 1.0, "never grows past the current scale");
    }

    #[test]
    fn mirrored_settings_copy_range_and_labels() {
        let mut source = vertical(5.0, 15.0);
        source.set_custom_label(10.0, "ten");
        source.set_reversed(true);
        source.set_label_line_length(12);
        source.set_double_sided_labels(true);
        let mut mirror = Axis::new(AxisType::RightY);
        mirror.copy_settings_from(&source);
        assert_eq!(mirror.axis_type(), AxisType::RightY);
        assert_eq!(mirror.range(), (5.0, 15.0));
        assert!(mirror.is_reversed());
        assert_eq!(mirror.custom_label(10.0), Some("ten"));
        assert_eq!(mirror.label_display(), LabelDisplay::Default);
        assert_eq!(mirror.label_wrapping(), LabelWrapping::LineLength(12));
        assert!(mirror.has_double_sided_labels());
        assert_eq!(mirror.points(), None);
    }

    #[test]
    fn label_orientation_defaults_keep_text_upright() {
        assert_eq!(
            Axis::new(AxisType::BottomX).label_orientation(),
            AxisLabelOrientation::Parallel
        );
        assert_eq!(
            Axis::new(AxisType::RightY).label_orientation(),
            AxisLabelOrientation::Perpendicular
        );
    }

    #[test]
    fn parallel_labels_on_vertical_axis_are_rotated() {
        let m = HeuristicTextMeasurer;
        let mut axis = vertical(0.0, 10.0);
        axis.set_points(Point::new(100.0, 300.0), Point::new(100.0, 0.0));
        axis.set_label_orientation(AxisLabelOrientation::Parallel);
        // Turned text is one 10px line thick; tick 5 + gap 5.
        assert!((axis.protruding_thickness(&m) - 20.0).abs() < 1e-9);
        let mut ids = IdAllocator::default();
        let out = axis.drawables(&m, DrawableRole::Axis(AxisType::LeftY), 30, &mut ids);
        let angles: Vec<f64> = out
            .iter()
            .filter_map(|d| match &d.primitive {
                Primitive::Text { angle, .. } => Some(*angle),
                _ => None,
            })
            .collect();
        assert_eq!(angles.len(), 11);
        assert!(angles.iter().all(|&a| a == 90.0), "{angles:?}");
    }

    #[test]
    fn perpendicular_labels_fit_by_line_height() {
        let m = HeuristicTextMeasurer;
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(0.0, 10.0, 0, 1.0, 1);
        for i in 0..=10 {
            axis.set_custom_label(f64::from(i), "category name");
        }
        axis.set_points(Point::new(0.0, 0.0), Point::new(200.0, 0.0));
        assert!(axis.should_labels_be_stacked_to_fit(&m));
        axis.set_label_orientation(AxisLabelOrientation::Perpendicular);
        // Each label takes one 10px line along the axis; slots are 20px less 2px padding.
        assert!(!axis.should_labels_be_stacked_to_fit(&m));
        let best = axis.calc_best_label_font_scale(&m, 0.75, 2.0).unwrap();
        assert_eq!(best, 1.0);
        // 78px of text now hangs below the line: tick 5 + gap 5 + 78.
        assert!((axis.protruding_thickness(&m) - 88.0).abs() < 1e-9);
    }

    #[test]
    fn line_length_wrapping_adds_label_lines() {
        let m = HeuristicTextMeasurer;
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(0.0, 2.0, 0, 1.0, 1);
        axis.set_custom_label(1.0, "High School Sophomore");
        axis.set_points(Point::new(0.0, 0.0), Point::new(600.0, 0.0));
        assert!((axis.protruding_thickness(&m) - 20.0).abs() < 1e-9);

        axis.set_label_line_length(10);
        assert_eq!(
            axis.label_text(1.0).as_deref(),
            Some("High School\nSophomore")
        );
        assert_eq!(axis.label_text(2.0).as_deref(), Some("2"));
        // Two 10px lines with 1px between them.
        assert!((axis.protruding_thickness(&m) - 31.0).abs() < 1e-9);
    }

    #[test]
    fn auto_length_splits_only_long_labels() {
        let mut axis = Axis::new(AxisType::BottomX);
        axis.set_range(0.0, 2.0, 0, 1.0, 1);
        axis.set_custom_label(0.0, "Revenue (millions)");
        axis.set_custom_label(1.0, "Arts, Humanities, & Communications");
        axis.set_label_length_auto(20);
        assert_eq!(axis.label_text(0.0).as_deref(), Some("Revenue (millions)"));
        assert_eq!(
            axis.label_text(1.0).as_deref(),
            Some("Arts, Humanities, &\nCommunications")
        );
        axis.set_label_wrapping(LabelWrapping::None);
        assert_eq!(
            axis.label_text(1.0).as_deref(),
            Some("Arts, Humanities, & Communications")
        );
    }

    #[test]
    fn double_sided_labels_mirror_inside_the_plot() {
        let m = HeuristicTextMeasurer;
        let mut axis = vertical(0.0, 10.0);
        axis.set_points(Point::new(100.0, 300.0), Point::new(100.0, 0.0));
        axis.set_double_sided_labels(true);
        let placed = axis.placed_labels(&m);
        assert_eq!(placed.len(), 22);
        let inner = &placed[11..];
        assert!(
            inner.iter().all(|l| l.rect.x0 == 105.0),
            "outer ticks leave the inside bare"
        );
        let bbox = axis.bounding_box(&m).unwrap();
        // "10" is 12px wide: gap 5 + 12 on the inside.
        assert!((bbox.x1 - 117.0).abs() < 1e-9, "{bbox:?}");
        assert!((axis.protruding_thickness(&m) - 22.0).abs() < 1e-9);
    }

    #[test]
    fn drawables_include_line_labels_and_title() {
        let m = HeuristicTextMeasurer;
        let mut axis = vertical(0.0, 10.0);
        axis.set_title("Y");
        let mut ids = IdAllocator::default();
        let out = axis.drawables(&m, DrawableRole::Axis(AxisType::LeftY), 30, &mut ids);
        // line+ticks, 11 labels, title
        assert_eq!(out.len(), 13);
        let Primitive::Lines { segments, .. } = &out[0].primitive else {
            panic!("first drawable is the axis line");
        };
        assert_eq!(segments.len(), 12);
    }

    #[test]
    fn gridlines_skip_plot_edges() {
        let mut axis = vertical(0.0, 10.0);
        axis.enable_gridlines();
        let mut ids = IdAllocator::default();
        let grid = axis
            .gridlines(Rect::new(0.0, 0.0, 200.0, 100.0), &mut ids)
            .unwrap();
        let Primitive::Lines { segments, .. } = grid.primitive else {
            panic!("gridlines are line segments");
        };
        assert_eq!(segments.len(), 9);
    }
}
