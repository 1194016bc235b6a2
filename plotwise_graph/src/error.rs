// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors raised while binding data to a graph.
//!
//! Layout itself never fails; see [`crate::Graph2D::recalc_sizes`].

extern crate alloc;

use alloc::string::String;

use thiserror::Error;

/// Errors raised by data binding and strict configuration calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A named column does not exist in the dataset.
    #[error("column '{name}' not found in dataset")]
    ColumnNotFound {
        /// The requested column name.
        name: String,
    },

    /// A column exists but holds a different kind of data.
    #[error("column '{name}' is not a {expected} column")]
    ColumnTypeMismatch {
        /// The requested column name.
        name: String,
        /// The kind of column the caller asked for.
        expected: &'static str,
    },

    /// The dataset has no rows to plot.
    #[error("dataset contains no rows")]
    EmptyData,

    /// A range was given with `start >= end`.
    #[error("invalid range: start ({start}) must be less than end ({end})")]
    InvalidRange {
        /// Requested range start.
        start: f64,
        /// Requested range end.
        end: f64,
    },

    /// A value that must be finite was NaN or infinite.
    #[error("non-finite value in {context}")]
    NonFiniteValue {
        /// What the value was for.
        context: &'static str,
    },

    /// The solver pass cap must allow at least one pass.
    #[error("solve pass limit must be at least 1 (got {0})")]
    InvalidPassLimit(usize),
}

/// Result alias for fallible graph configuration.
pub type Result<T, E = GraphError> = core::result::Result<T, E>;
