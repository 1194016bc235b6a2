// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal in-memory table for graph types to bind against.
//!
//! Layout never reads a dataset. Graph types look columns up by name while binding data, and
//! a failed lookup aborts binding with a [`GraphError`] before any layout happens.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{GraphError, Result};

/// A column of category codes with their labels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoricalColumn {
    codes: Vec<usize>,
    labels: Vec<String>,
}

impl CategoricalColumn {
    /// Builds a column from row labels; codes follow first appearance.
    pub fn from_labels<S: Into<String>>(rows: impl IntoIterator<Item = S>) -> Self {
        let mut column = Self::default();
        for row in rows {
            let row = row.into();
            let code = match column.labels.iter().position(|l| *l == row) {
                Some(code) => code,
                None => {
                    column.labels.push(row);
                    column.labels.len() - 1
                }
            };
            column.codes.push(code);
        }
        column
    }

    /// Per-row category codes.
    pub fn codes(&self) -> &[usize] {
        &self.codes
    }

    /// Category labels indexed by code.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The label for `code`.
    pub fn label(&self, code: usize) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Column {
    Continuous(Vec<f64>),
    Categorical(CategoricalColumn),
}

/// Named continuous and categorical columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<(String, Column)>,
}

impl Dataset {
    /// An empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, name: String, column: Column) {
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = column,
            None => self.columns.push((name, column)),
        }
    }

    /// Adds (or replaces) a continuous column.
    pub fn with_continuous(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.insert(name.into(), Column::Continuous(values));
        self
    }

    /// Adds (or replaces) a categorical column.
    pub fn with_categorical(mut self, name: impl Into<String>, column: CategoricalColumn) -> Self {
        self.insert(name.into(), Column::Categorical(column));
        self
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| GraphError::ColumnNotFound {
                name: name.into(),
            })
    }

    /// Values of a continuous column.
    pub fn continuous(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Continuous(values) => Ok(values),
            Column::Categorical(_) => Err(GraphError::ColumnTypeMismatch {
                name: name.into(),
                expected: "continuous",
            }),
        }
    }

    /// A categorical column.
    pub fn categorical(&self, name: &str) -> Result<&CategoricalColumn> {
        match self.column(name)? {
            Column::Categorical(column) => Ok(column),
            Column::Continuous(_) => Err(GraphError::ColumnTypeMismatch {
                name: name.into(),
                expected: "categorical",
            }),
        }
    }

    /// `(min, max)` over the finite values of a continuous column.
    pub fn continuous_range(&self, name: &str) -> Result<(f64, f64)> {
        self.continuous(name)?
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| {
                Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
            })
            .ok_or(GraphError::EmptyData)
    }
}
