// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout tunables.

use crate::error::{GraphError, Result};

/// Tunables for the layout engine.
///
/// All lengths are in drawing-surface units before graph scaling.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Hard cap on solver passes per layout cycle.
    ///
    /// A cycle runs at most three passes (initial, after a stacking change, after font
    /// harmonization). Lowering the cap skips the later passes.
    pub max_solve_passes: usize,
    /// Smallest label font scale that font harmonization will pick.
    pub min_label_scaling: f64,
    /// Smallest bracket label scale that overlap resolution will pick.
    pub min_bracket_scaling: f64,
    /// Gap between stacked decorations, and between decorations and the plot.
    pub line_spacing: f64,
    /// Room reserved per axis label when fitting fonts.
    pub label_padding: f64,
}

impl LayoutConfig {
    /// Sets the solver pass cap.
    pub fn with_max_solve_passes(mut self, passes: usize) -> Self {
        self.max_solve_passes = passes;
        self
    }

    /// Sets the smallest label font scale.
    pub fn with_min_label_scaling(mut self, scale: f64) -> Self {
        self.min_label_scaling = scale;
        self
    }

    /// Sets the smallest bracket label scale.
    pub fn with_min_bracket_scaling(mut self, scale: f64) -> Self {
        self.min_bracket_scaling = scale;
        self
    }

    /// Sets the decoration line spacing.
    pub fn with_line_spacing(mut self, spacing: f64) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Checks that the tunables are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_solve_passes == 0 {
            return Err(GraphError::InvalidPassLimit(self.max_solve_passes));
        }
        for (value, context) in [
            (self.min_label_scaling, "minimum label font scale"),
            (self.min_bracket_scaling, "minimum bracket font scale"),
            (self.line_spacing, "line spacing"),
            (self.label_padding, "label padding"),
        ] {
            if !value.is_finite() {
                return Err(GraphError::NonFiniteValue { context });
            }
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_solve_passes: 3,
            min_label_scaling: 0.75,
            min_bracket_scaling: 0.5,
            line_spacing: 2.0,
            label_padding: 2.0,
        }
    }
}
