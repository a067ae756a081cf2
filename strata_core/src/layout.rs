// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plot-area arrangement.
//!
//! The chart is a `width` x `height` canvas. Margins are reserved on each side and the
//! remaining rectangle is the plot area that axis domains are fractions of. Axis lines and
//! backgrounds sit `pad` pixels outside of the data area.

use kurbo::Rect;

/// Margins around the plot area, plus the gap between data area and axis lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
    /// Left margin.
    pub l: f64,
    /// Right margin.
    pub r: f64,
    /// Top margin (the default title sits in here).
    pub t: f64,
    /// Bottom margin.
    pub b: f64,
    /// Padding between the data area and the axis lines.
    pub pad: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            l: 80.0,
            r: 80.0,
            t: 100.0,
            b: 80.0,
            pad: 0.0,
        }
    }
}

impl Margin {
    /// Uniform margins with no padding.
    pub fn uniform(m: f64) -> Self {
        Self {
            l: m,
            r: m,
            t: m,
            b: m,
            pad: 0.0,
        }
    }

    /// Sets the padding.
    pub fn with_pad(mut self, pad: f64) -> Self {
        self.pad = pad;
        self
    }
}

/// Output of the arrange step: the plot area in chart pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlotSize {
    /// Left edge of the plot area.
    pub l: f64,
    /// Top edge of the plot area.
    pub t: f64,
    /// Right margin width.
    pub r: f64,
    /// Bottom margin height.
    pub b: f64,
    /// Plot area width.
    pub w: f64,
    /// Plot area height.
    pub h: f64,
    /// Padding between data area and axis lines.
    pub p: f64,
}

impl PlotSize {
    /// Computes the plot area for a chart of the given size.
    ///
    /// Negative inputs are clamped, and margins that do not fit leave a zero-sized plot area.
    pub fn arrange(width: f64, height: f64, margin: &Margin) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let l = margin.l.max(0.0);
        let r = margin.r.max(0.0);
        let t = margin.t.max(0.0);
        let b = margin.b.max(0.0);
        Self {
            l,
            t,
            r,
            b,
            w: (width - l - r).max(0.0),
            h: (height - t - b).max(0.0),
            p: margin.pad.max(0.0),
        }
    }

    /// Returns the plot area rectangle.
    pub fn plot_rect(&self) -> Rect {
        Rect::new(self.l, self.t, self.l + self.w, self.t + self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margins_are_reserved_on_every_side() {
        let size = PlotSize::arrange(700.0, 450.0, &Margin::default());
        assert!((size.w - 540.0).abs() < 1e-9, "700 - 80 - 80");
        assert!((size.h - 270.0).abs() < 1e-9, "450 - 100 - 80");
        let rect = size.plot_rect();
        assert!((rect.x0 - 80.0).abs() < 1e-9, "left edge");
        assert!((rect.y1 - 370.0).abs() < 1e-9, "bottom edge");
    }

    #[test]
    fn oversized_margins_collapse_the_plot_area() {
        let size = PlotSize::arrange(100.0, 100.0, &Margin::uniform(80.0));
        assert_eq!(size.w, 0.0, "no room left horizontally");
        assert_eq!(size.h, 0.0, "no room left vertically");
    }
}
