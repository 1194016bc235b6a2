// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The floor, ceiling, power and logarithm calls used by range selection and pixel snapping.
//!
//! `core` has no `floor` or `log10` for `f64`; without `std` they come from `libm`.

/// `std`-named float methods backed by `libm`.
pub(crate) trait FloatExt {
    fn floor(self) -> Self;
    fn ceil(self) -> Self;
    fn log10(self) -> Self;
    fn powi(self, n: i32) -> Self;
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
impl FloatExt for f64 {
    fn floor(self) -> Self {
        libm::floor(self)
    }

    fn ceil(self) -> Self {
        libm::ceil(self)
    }

    fn log10(self) -> Self {
        libm::log10(self)
    }

    fn powi(self, n: i32) -> Self {
        libm::pow(self, f64::from(n))
    }
}

#[cfg(all(not(feature = "std"), not(feature = "libm")))]
compile_error!("plotwise_graph needs float math: enable the `std` or `libm` feature");
