// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Automatic axis ranges.

use crate::axis::{AutorangeMode, Axis};
use crate::calc::CalcTrace;

/// Computes an axis range from the traces bound to it.
///
/// Implementations write `axis.range` and must be idempotent: calling twice with unchanged
/// calcdata gives the same range.
pub trait AutorangeRoutine {
    /// Updates `axis.range` from `calcdata`.
    fn compute_range(&self, calcdata: &[CalcTrace], axis: &mut Axis);
}

/// Default routine: the union of the bound traces' extents, padded on both ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaddedExtent {
    /// Padding as a fraction of the data span, added on each side.
    pub pad_fraction: f64,
}

impl Default for PaddedExtent {
    fn default() -> Self {
        Self { pad_fraction: 0.05 }
    }
}

impl PaddedExtent {
    /// Creates the routine with a custom padding fraction.
    pub fn new(pad_fraction: f64) -> Self {
        Self {
            pad_fraction: pad_fraction.max(0.0),
        }
    }
}

impl AutorangeRoutine for PaddedExtent {
    fn compute_range(&self, calcdata: &[CalcTrace], axis: &mut Axis) {
        let letter = axis.letter();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for trace in calcdata
            .iter()
            .filter(|t| t.info.visible && t.axis(letter) == axis.id)
        {
            if let Some([a, b]) = trace.extent(letter) {
                lo = lo.min(a);
                hi = hi.max(b);
            }
        }

        let range = if lo > hi {
            Axis::new(axis.id).range
        } else {
            let span = hi - lo;
            let pad = if span > 0.0 {
                span * self.pad_fraction
            } else {
                1.0
            };
            [lo - pad, hi + pad]
        };

        axis.range = match axis.autorange {
            AutorangeMode::Reversed => [range[1], range[0]],
            _ => range,
        };
        tracing::trace!(axis = %axis.id, r0 = axis.range[0], r1 = axis.range[1], "autorange");
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::id::AxisId;
    use crate::input::TraceInput;

    fn calc(traces: &[TraceInput]) -> alloc::vec::Vec<CalcTrace> {
        CalcTrace::calc_all(traces).unwrap()
    }

    #[test]
    fn pads_five_percent_of_the_span() {
        let data = calc(&[TraceInput::new("scatter").with_xy([1.0, 2.0, 3.0], [3.0, 1.0, 2.0])]);
        let mut ax = Axis::new(AxisId::X);
        PaddedExtent::default().compute_range(&data, &mut ax);
        assert!((ax.range[0] - 0.9).abs() < 1e-9, "low end: {:?}", ax.range);
        assert!((ax.range[1] - 3.1).abs() < 1e-9, "high end: {:?}", ax.range);

        let first = ax.range;
        PaddedExtent::default().compute_range(&data, &mut ax);
        assert_eq!(ax.range, first, "re-running with the same data is idempotent");
    }

    #[test]
    fn only_visible_bound_traces_count() {
        let data = calc(&[
            TraceInput::new("scatter").with_xy([0.0, 10.0], [0.0, 10.0]),
            TraceInput::new("scatter")
                .with_xy([0.0, 100.0], [0.0, 100.0])
                .with_visible(false),
            TraceInput::new("scatter")
                .with_xy([0.0, 1000.0], [0.0, 1000.0])
                .with_axes("x2", "y"),
        ]);
        let mut ax = Axis::new(AxisId::X);
        PaddedExtent::new(0.0).compute_range(&data, &mut ax);
        assert_eq!(ax.range, [0.0, 10.0]);
    }

    #[test]
    fn degenerate_and_empty_data() {
        let data = calc(&[TraceInput::new("scatter").with_xy([2.0], [2.0])]);
        let mut ax = Axis::new(AxisId::Y);
        ax.autorange = AutorangeMode::Reversed;
        PaddedExtent::default().compute_range(&data, &mut ax);
        assert_eq!(ax.range, [3.0, 1.0], "single value padded by one, then reversed");

        let mut ax = Axis::new(AxisId::y(2));
        PaddedExtent::default().compute_range(&data, &mut ax);
        assert_eq!(ax.range, [-1.0, 4.0], "no data falls back to the default range");
    }
}
