// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint-layer conventions for emitted drawables.
//!
//! Drawables are painted in emission order. The layer is carried alongside so that a renderer
//! merging drawables from several graphs can still sort them stably by `(layer, DrawableId)`.

/// Plot background fill.
pub const PLOT_BACKGROUND: i32 = -100;
/// Reference areas sit behind gridlines so the grid stays readable.
pub const REFERENCE_AREAS: i32 = -60;
/// Gridlines drawn behind series.
pub const GRID_LINES: i32 = -50;

/// Data-derived drawables produced by graph types.
pub const SERIES: i32 = 0;
/// Reference lines drawn above series.
pub const REFERENCE_LINES: i32 = 15;

/// Axis lines, tick marks and tick labels.
pub const AXES: i32 = 30;
/// Custom axes and their brackets.
pub const CUSTOM_AXES: i32 = 40;

/// Legends.
pub const LEGEND: i32 = 60;
/// Titles, subtitle and caption.
pub const DECORATIONS: i32 = 80;
/// Client annotations, always on top.
pub const ANNOTATIONS: i32 = 90;
