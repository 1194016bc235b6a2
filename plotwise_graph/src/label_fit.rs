// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label stacking, font harmonization and bracket overlap resolution.
//!
//! These run between solver passes. Each one only reads the axes' current mapping and adjusts
//! their label state; the next pass picks the new sizes up.

extern crate alloc;

use alloc::vec::Vec;

use plotwise_text::TextMeasurer;

use crate::config::LayoutConfig;
use crate::custom_axis::CustomAxis;
use crate::solver::AxisSet;

/// Re-decides stacking for every main axis that allows it.
///
/// Returns `true` if any axis toggled, in which case the plot area must be solved again.
pub(crate) fn evaluate_stacking(axes: &mut AxisSet, measurer: &dyn TextMeasurer) -> bool {
    let mut changed = false;
    for axis in axes.main_mut() {
        if !axis.is_auto_stacking() {
            continue;
        }
        let stack = axis.should_labels_be_stacked_to_fit(measurer);
        if stack != axis.is_stacking() {
            tracing::debug!(axis = ?axis.axis_type(), stack, "label stacking toggled");
            axis.set_stacking_from_layout(stack);
            changed = true;
        }
    }
    changed
}

/// Shrinks every axis's labels to the smallest best-fit scale found on any axis.
///
/// Returns the common scale, or `None` if no axis shows labels.
pub(crate) fn harmonize_label_scaling(
    axes: &mut AxisSet,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> Option<f64> {
    let best = |axis: &crate::axis::Axis| {
        axis.calc_best_label_font_scale(measurer, config.min_label_scaling, config.label_padding)
    };
    let main = axes.main().into_iter().filter_map(best);
    let custom = axes.custom().iter().filter_map(|c| best(c.axis()));
    let common = main.chain(custom).reduce(f64::min)?;

    for axis in axes.main_mut() {
        let current = axis.label_font_scale();
        axis.apply_label_font_scale(common.min(current));
    }
    for custom in axes.custom_mut() {
        let axis = custom.axis_mut();
        let current = axis.label_font_scale();
        axis.apply_label_font_scale(common.min(current));
    }
    Some(common)
}

/// Shrinks bracket labels until neighbors stop overlapping, then applies the smallest scale
/// found to every custom axis.
///
/// Returns the applied scale.
pub(crate) fn resolve_bracket_overlaps(
    custom_axes: &mut [CustomAxis],
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> f64 {
    let mut smallest = f64::INFINITY;
    for custom in custom_axes.iter() {
        let vertical = custom.axis().axis_type().is_vertical();
        let mut layouts = custom.bracket_layouts(measurer);
        layouts.sort_by(|a, b| a.tip.total_cmp(&b.tip));
        let current = custom.bracket_scaling();
        smallest = smallest.min(current);
        let scales: Vec<f64> = layouts
            .windows(2)
            .filter_map(|pair| {
                let (a, b) = (pair[0].label_rect, pair[1].label_rect);
                let overlap = a.intersect(b);
                if overlap.width() <= 0.0 || overlap.height() <= 0.0 {
                    return None;
                }
                let (overlap_extent, extent) = if vertical {
                    (overlap.height(), a.height())
                } else {
                    (overlap.width(), a.width())
                };
                (extent > 0.0).then(|| {
                    (current * (1.0 - overlap_extent / extent)).max(config.min_bracket_scaling)
                })
            })
            .collect();
        for scale in scales {
            smallest = smallest.min(scale);
        }
    }
    if !smallest.is_finite() {
        return 1.0;
    }
    for custom in custom_axes.iter_mut() {
        custom.set_bracket_scaling(smallest);
    }
    smallest
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Rect;
    use plotwise_text::HeuristicTextMeasurer;

    use super::*;
    use crate::axis::AxisType;
    use crate::custom_axis::Bracket;

    #[test]
    fn crowded_bottom_axis_stacks_once() {
        let m = HeuristicTextMeasurer;
        let mut axes = AxisSet::new();
        axes.get_mut(AxisType::BottomX).set_range(0.0, 100_000.0, 0, 10_000.0, 1);
        axes.set_points(Rect::new(0.0, 0.0, 120.0, 400.0));
        assert!(evaluate_stacking(&mut axes, &m));
        assert!(axes.get(AxisType::BottomX).is_stacking());
        assert!(
            !evaluate_stacking(&mut axes, &m),
            "second evaluation is stable"
        );
    }

    #[test]
    fn manual_stacking_is_left_alone() {
        let m = HeuristicTextMeasurer;
        let mut axes = AxisSet::new();
        let bottom = axes.get_mut(AxisType::BottomX);
        bottom.set_range(0.0, 100_000.0, 0, 10_000.0, 1);
        bottom.set_stacking(false);
        axes.set_points(Rect::new(0.0, 0.0, 120.0, 400.0));
        assert!(!evaluate_stacking(&mut axes, &m));
        assert!(!axes.get(AxisType::BottomX).is_stacking());
    }

    #[test]
    fn harmonized_scale_is_shared_and_shrink_only() {
        let m = HeuristicTextMeasurer;
        let mut axes = AxisSet::new();
        axes.get_mut(AxisType::BottomX).set_range(0.0, 100_000.0, 0, 10_000.0, 1);
        axes.set_points(Rect::new(0.0, 0.0, 300.0, 400.0));
        let config = LayoutConfig::default();
        let common = harmonize_label_scaling(&mut axes, &config, &m).unwrap();
        assert!(common < 1.0 && common >= config.min_label_scaling);
        assert_eq!(axes.get(AxisType::LeftY).label_font_scale(), common);
        assert_eq!(axes.get(AxisType::BottomX).label_font_scale(), common);
        let again = harmonize_label_scaling(&mut axes, &config, &m).unwrap();
        assert!(again <= common);
    }

    #[test]
    fn overlapping_brackets_shrink_together() {
        let m = HeuristicTextMeasurer;
        let mut axes = AxisSet::new();
        let mut custom = CustomAxis::new(AxisType::LeftY, (0.0, 10.0));
        custom.add_bracket(Bracket::new(0.0, 5.0, 5.0, "first group"));
        custom.add_bracket(Bracket::new(5.0, 10.0, 5.2, "second group"));
        let mut far = CustomAxis::new(AxisType::LeftY, (5.0, 10.0));
        far.add_bracket(Bracket::new(0.0, 10.0, 5.0, "alone"));
        axes.add_custom(custom);
        axes.add_custom(far);
        axes.set_points(Rect::new(0.0, 0.0, 400.0, 400.0));
        let config = LayoutConfig::default();
        let scale = resolve_bracket_overlaps(axes.custom_mut(), &config, &m);
        assert!(
            scale < 1.0 && scale >= config.min_bracket_scaling,
            "{scale}"
        );
        for custom in axes.custom() {
            assert_eq!(custom.bracket_scaling(), scale);
        }
    }

    #[test]
    fn separate_brackets_keep_full_scale() {
        let m = HeuristicTextMeasurer;
        let mut axes = AxisSet::new();
        let mut custom = CustomAxis::new(AxisType::LeftY, (0.0, 10.0));
        custom.add_bracket(Bracket::centered(0.0, 2.0, "low"));
        custom.add_bracket(Bracket::centered(8.0, 10.0, "high"));
        axes.add_custom(custom);
        axes.set_points(Rect::new(0.0, 0.0, 400.0, 400.0));
        let scale = resolve_bracket_overlaps(axes.custom_mut(), &LayoutConfig::default(), &m);
        assert_eq!(scale, 1.0);
    }
}
