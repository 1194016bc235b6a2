// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement plumbing for a layout cycle.
//!
//! The solver asks for the same strings many times per cycle (once per pass, plus the
//! stacking and font-fit evaluations). [`MeasureCache`] wraps the injected measurer so that
//! every repeated question within one cycle gets a bit-identical answer, even from backends
//! that are not perfectly deterministic.

extern crate alloc;

use alloc::string::String;
use core::cell::RefCell;

use hashbrown::HashMap;
use plotwise_text::{FontFamily, FontStyle, FontWeight, TextMeasurer, TextMetrics, TextStyle};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    font_size_bits: u64,
    family: FontFamily,
    weight: FontWeight,
    style: FontStyle,
}

impl CacheKey {
    fn new(text: &str, style: &TextStyle) -> Self {
        Self {
            text: text.into(),
            font_size_bits: style.font_size.to_bits(),
            family: style.font_family.clone(),
            weight: style.font_weight,
            style: style.font_style,
        }
    }
}

/// A memoizing wrapper around a [`TextMeasurer`], scoped to one layout cycle.
pub struct MeasureCache<'a> {
    inner: &'a dyn TextMeasurer,
    entries: RefCell<HashMap<CacheKey, TextMetrics>>,
}

impl<'a> MeasureCache<'a> {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: &'a dyn TextMeasurer) -> Self {
        Self {
            inner,
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Number of distinct (text, style) pairs measured so far.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if nothing has been measured yet.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl core::fmt::Debug for MeasureCache<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MeasureCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl TextMeasurer for MeasureCache<'_> {
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
        let key = CacheKey::new(text, &style);
        if let Some(hit) = self.entries.borrow().get(&key) {
            return *hit;
        }
        let metrics = self.inner.measure(text, style);
        self.entries.borrow_mut().insert(key, metrics);
        metrics
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::cell::Cell;

    use super::*;
    use plotwise_text::HeuristicTextMeasurer;

    struct Counting {
        calls: Cell<usize>,
    }

    impl TextMeasurer for Counting {
        fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
            self.calls.set(self.calls.get() + 1);
            HeuristicTextMeasurer.measure(text, style)
        }
    }

    #[test]
    fn repeated_measurements_hit_the_cache() {
        let counting = Counting {
            calls: Cell::new(0),
        };
        let cache = MeasureCache::new(&counting);
        let a = cache.measure("label", TextStyle::new(10.0));
        let b = cache.measure("label", TextStyle::new(10.0));
        let _ = cache.measure("label", TextStyle::new(11.0));
        assert_eq!(a, b);
        assert_eq!(counting.calls.get(), 2, "second identical query is cached");
        assert_eq!(cache.len(), 2);
    }
}
