// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout cycle.
//!
//! [`LayoutEngine`] runs the fixed pass schedule over a graph's axes and decorations:
//!
//! 1. apply scaling, reset fitted fonts and mirror axes;
//! 2. solve;
//! 3. re-evaluate label stacking and solve again if anything toggled;
//! 4. harmonize label fonts, resolve bracket overlaps and solve a final time.
//!
//! The solver itself is not iterated to a fixed point. Each pass only reacts to smaller input
//! changes than the one before, and [`LayoutConfig::max_solve_passes`] bounds the cycle.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Rect;
use plotwise_text::TextMeasurer;

use crate::config::LayoutConfig;
use crate::label_fit;
use crate::solver::{AxisSet, ContentPins, Decorations, PlotAreaState, adjust_plot_area};

/// Per-cycle inputs that are not owned by the axes or decorations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutOptions {
    /// Overall size multiplier for fonts, ticks and spacing.
    pub scaling: f64,
    /// Caller-pinned plot edges.
    pub pins: ContentPins,
    /// Copy the bottom axis onto the top axis before solving.
    pub mirror_x_axis: bool,
    /// Copy the left axis onto the right axis before solving.
    pub mirror_y_axis: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            scaling: 1.0,
            pins: ContentPins::default(),
            mirror_x_axis: false,
            mirror_y_axis: false,
        }
    }
}

/// Schedules solver passes and keeps the states they produced.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    passes: Vec<PlotAreaState>,
}

impl LayoutEngine {
    /// Creates an engine with the given tunables.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            passes: Vec::new(),
        }
    }

    /// The tunables.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replaces the tunables; takes effect on the next cycle.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    /// States of every solver pass in the last cycle, in order.
    pub fn passes(&self) -> &[PlotAreaState] {
        &self.passes
    }

    /// The state the last cycle converged on.
    pub fn last_pass(&self) -> Option<&PlotAreaState> {
        self.passes.last()
    }

    fn pass_cap(&self) -> usize {
        self.config.max_solve_passes.max(1)
    }

    /// Runs one solver pass if the cycle has passes left.
    ///
    /// Returns `None`, leaving the axes as they were, once the cap is reached.
    pub fn solve(
        &mut self,
        bounding_box: Rect,
        axes: &mut AxisSet,
        decorations: &mut Decorations,
        options: &LayoutOptions,
        measurer: &dyn TextMeasurer,
    ) -> Option<PlotAreaState> {
        let cap = self.pass_cap();
        if self.passes.len() >= cap {
            tracing::warn!(cap, "solver pass cap reached; skipping pass");
            return None;
        }
        let state = adjust_plot_area(
            bounding_box,
            axes,
            decorations,
            &options.pins,
            &self.config,
            options.scaling,
            measurer,
            self.passes.len() + 1,
        );
        self.passes.push(state.clone());
        debug_assert!(self.passes.len() <= cap, "solver ran past its pass cap");
        Some(state)
    }

    /// Runs a full layout cycle and returns the final state.
    ///
    /// Axis endpoints, label stacking, label fonts, bracket scaling and decoration scales are
    /// all left as the final pass set them.
    pub fn run_cycle(
        &mut self,
        bounding_box: Rect,
        axes: &mut AxisSet,
        decorations: &mut Decorations,
        options: &LayoutOptions,
        measurer: &dyn TextMeasurer,
    ) -> PlotAreaState {
        self.passes.clear();

        for axis in axes.main_mut() {
            axis.set_scaling(options.scaling);
        }
        for custom in axes.custom_mut() {
            custom.axis_mut().set_scaling(options.scaling);
            custom.set_bracket_scaling(1.0);
        }
        decorations.reset_scales(options.scaling);

        if options.mirror_x_axis {
            axes.mirror_x();
        }
        if options.mirror_y_axis {
            axes.mirror_y();
        }

        let first = adjust_plot_area(
            bounding_box,
            axes,
            decorations,
            &options.pins,
            &self.config,
            options.scaling,
            measurer,
            1,
        );
        self.passes.push(first.clone());
        let mut state = first;

        if label_fit::evaluate_stacking(axes, measurer) {
            if let Some(next) = self.solve(bounding_box, axes, decorations, options, measurer) {
                state = next;
            }
        }

        label_fit::harmonize_label_scaling(axes, &self.config, measurer);
        label_fit::resolve_bracket_overlaps(axes.custom_mut(), &self.config, measurer);
        if let Some(next) = self.solve(bounding_box, axes, decorations, options, measurer) {
            state = next;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use plotwise_text::HeuristicTextMeasurer;

    use super::*;
    use crate::axis::AxisType;

    #[test]
    fn quiet_cycle_runs_two_passes() {
        let mut engine = LayoutEngine::default();
        let mut axes = AxisSet::new();
        let mut decorations = Decorations::default();
        let state = engine.run_cycle(
            Rect::new(0.0, 0.0, 800.0, 600.0),
            &mut axes,
            &mut decorations,
            &LayoutOptions::default(),
            &HeuristicTextMeasurer,
        );
        assert_eq!(engine.passes().len(), 2);
        assert_eq!(state.pass, 2);
        assert_eq!(engine.last_pass(), Some(&state));
    }

    #[test]
    fn pass_cap_limits_the_cycle() {
        let mut engine = LayoutEngine::new(LayoutConfig::default().with_max_solve_passes(1));
        let mut axes = AxisSet::new();
        let mut decorations = Decorations::default();
        let state = engine.run_cycle(
            Rect::new(0.0, 0.0, 800.0, 600.0),
            &mut axes,
            &mut decorations,
            &LayoutOptions::default(),
            &HeuristicTextMeasurer,
        );
        assert_eq!(engine.passes().len(), 1);
        assert_eq!(state.pass, 1);
    }

    #[test]
    fn mirroring_copies_range_before_solving() {
        let mut engine = LayoutEngine::default();
        let mut axes = AxisSet::new();
        axes.get_mut(AxisType::BottomX).set_range(-5.0, 5.0, 0, 1.0, 1);
        let mut decorations = Decorations::default();
        let options = LayoutOptions {
            mirror_x_axis: true,
            ..LayoutOptions::default()
        };
        let state = engine.run_cycle(
            Rect::new(0.0, 0.0, 800.0, 600.0),
            &mut axes,
            &mut decorations,
            &options,
            &HeuristicTextMeasurer,
        );
        assert_eq!(state.axis(AxisType::TopX).range, (-5.0, 5.0));
        let top = axes.get(AxisType::TopX);
        let bottom = axes.get(AxisType::BottomX);
        assert_eq!(
            top.get_physical_coordinate(2.5),
            bottom.get_physical_coordinate(2.5)
        );
        assert!(!top.displayed_labels().is_empty(), "mirror shows labels");
    }
}
