// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calculated trace data.
//!
//! A [`CalcTrace`] is produced once per trace, in declaration order, whenever the data changes.
//! Drawing code only reads it.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::Result;
use crate::id::{AxisId, AxisLetter, SubplotId};
use crate::input::{Fill, TraceInput};

/// Per-trace attributes the dispatcher needs without looking at the input again.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceInfo {
    /// Index of the trace in declaration order.
    pub index: usize,
    /// Trace type name.
    pub trace_type: String,
    /// Stable identifier.
    pub uid: String,
    /// Axis pair the trace is bound to.
    pub subplot: SubplotId,
    /// Fill mode.
    pub fill: Fill,
    /// Whether the trace is drawn.
    pub visible: bool,
    /// Id of the carpet this trace is drawn on.
    pub carpet: Option<String>,
    /// Whether the trace is clipped to its subplot's data area.
    pub cliponaxis: bool,
}

/// One computed data point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalcPoint {
    /// X value.
    pub x: f64,
    /// Y value.
    pub y: f64,
}

/// Calculated data for one trace.
#[derive(Clone, Debug, PartialEq)]
pub struct CalcTrace {
    /// Trace attributes.
    pub info: TraceInfo,
    /// Finite data points.
    pub points: Vec<CalcPoint>,
    x_extent: Option<[f64; 2]>,
    y_extent: Option<[f64; 2]>,
}

impl CalcTrace {
    /// Computes the calcdata of one trace.
    ///
    /// Missing x values default to the point index. Points with a non-finite coordinate are
    /// dropped.
    pub fn from_input(index: usize, input: &TraceInput) -> Result<Self> {
        let x = AxisId::parse(&input.xaxis)?;
        let y = AxisId::parse(&input.yaxis)?;
        let points: Vec<CalcPoint> = input
            .y
            .iter()
            .enumerate()
            .map(|(i, &y)| CalcPoint {
                x: input.x.get(i).copied().unwrap_or(i as f64),
                y,
            })
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        let info = TraceInfo {
            index,
            trace_type: input.trace_type.clone(),
            uid: input.uid.clone().unwrap_or_else(|| index.to_string()),
            subplot: SubplotId::new(x, y),
            fill: input.fill,
            visible: input.visible,
            carpet: input.carpet.clone(),
            cliponaxis: input.cliponaxis,
        };
        Ok(Self::new(info, points))
    }

    /// Creates calcdata from already computed points.
    pub fn new(info: TraceInfo, points: Vec<CalcPoint>) -> Self {
        let x_extent = extent(points.iter().map(|p| p.x));
        let y_extent = extent(points.iter().map(|p| p.y));
        Self {
            info,
            points,
            x_extent,
            y_extent,
        }
    }

    /// Computes calcdata for every trace, in order.
    pub fn calc_all(traces: &[TraceInput]) -> Result<Vec<Self>> {
        traces
            .iter()
            .enumerate()
            .map(|(i, t)| Self::from_input(i, t))
            .collect()
    }

    /// Data extent `[min, max]` along one letter, `None` without points.
    pub fn extent(&self, letter: AxisLetter) -> Option<[f64; 2]> {
        match letter {
            AxisLetter::X => self.x_extent,
            AxisLetter::Y => self.y_extent,
        }
    }

    /// The axis this trace is bound to along `letter`.
    pub fn axis(&self, letter: AxisLetter) -> AxisId {
        self.info.subplot.axis(letter)
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<[f64; 2]> {
    values.fold(None, |acc, v| match acc {
        None => Some([v, v]),
        Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
    })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::error::Error;

    #[test]
    fn extents_skip_non_finite_points() {
        let input = TraceInput::new("scatter").with_xy([1.0, f64::NAN, 3.0], [3.0, 7.0, 1.0]);
        let calc = CalcTrace::from_input(0, &input).unwrap();
        assert_eq!(calc.points.len(), 2);
        assert_eq!(calc.extent(AxisLetter::X), Some([1.0, 3.0]));
        assert_eq!(calc.extent(AxisLetter::Y), Some([1.0, 3.0]));
        assert_eq!(calc.info.uid, "0", "uid defaults to the index");
    }

    #[test]
    fn missing_x_uses_point_index() {
        let input = TraceInput::new("bar").with_xy(Vec::new(), [5.0, 6.0]);
        let calc = CalcTrace::from_input(2, &input).unwrap();
        assert_eq!(calc.extent(AxisLetter::X), Some([0.0, 1.0]));
    }

    #[test]
    fn invalid_axis_binding_is_an_error() {
        let input = TraceInput::new("scatter").with_axes("x0", "y");
        assert_eq!(
            CalcTrace::from_input(0, &input).unwrap_err(),
            Error::InvalidAxisId("x0".into())
        );
    }
}
