// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved axis objects.

extern crate alloc;

use alloc::vec::Vec;

use peniko::Color;

use crate::id::{AxisId, AxisLetter, SubplotId};
use crate::layout::PlotSize;

/// Whether (and how) an axis range is computed from the data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AutorangeMode {
    /// The range is fixed by the user.
    Off,
    /// The range covers the data, ascending.
    #[default]
    On,
    /// The range covers the data, descending.
    Reversed,
}

impl AutorangeMode {
    /// Whether the range is computed from the data.
    pub fn is_on(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// What an axis is positioned against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Positioned on the paper at [`Axis::position`].
    Free,
    /// Positioned along the given perpendicular axis.
    Axis(AxisId),
}

/// Side of the plot area an axis is drawn on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Below the data area (x axes).
    Bottom,
    /// Above the data area (x axes).
    Top,
    /// Left of the data area (y axes).
    Left,
    /// Right of the data area (y axes).
    Right,
}

impl Side {
    /// Index into a `[low, high]` domain counted from the bottom-left corner.
    pub fn from_bl(self) -> usize {
        match self {
            Self::Bottom | Self::Left => 0,
            Self::Top | Self::Right => 1,
        }
    }

    /// The side across the data area.
    pub fn opposite(self) -> Self {
        match self {
            Self::Bottom => Self::Top,
            Self::Top => Self::Bottom,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Mirroring of the axis line (and ticks) onto the opposite side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mirror {
    /// No mirror.
    #[default]
    Off,
    /// Mirror the line on the main subplot.
    On,
    /// Mirror line and ticks on the main subplot.
    Ticks,
    /// Mirror the line on every subplot the axis appears in.
    All,
    /// Mirror line and ticks on every subplot the axis appears in.
    AllTicks,
}

impl Mirror {
    /// Whether any mirroring is enabled.
    pub fn is_on(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Whether mirroring applies to every subplot, not only the main one.
    pub fn is_all(self) -> bool {
        matches!(self, Self::All | Self::AllTicks)
    }
}

/// Whether axis lines and ticks are drawn above or below traces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisLayer {
    /// Above traces.
    #[default]
    AboveTraces,
    /// Below traces.
    BelowTraces,
}

impl AxisLayer {
    /// Class suffix of the layer group this value selects.
    pub fn class_suffix(self) -> &'static str {
        match self {
            Self::AboveTraces => "above",
            Self::BelowTraces => "below",
        }
    }
}

/// A fully defaulted axis for one layout computation.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    /// The axis id.
    pub id: AxisId,
    /// Fraction of the plot area spanned, `[low, high]`.
    pub domain: [f64; 2],
    /// Data range; descending when `range[0] > range[1]`.
    pub range: [f64; 2],
    /// Autorange mode.
    pub autorange: AutorangeMode,
    /// Declared anchor.
    pub anchor: Anchor,
    /// Declared overlaid axis, when it names an existing same-letter axis.
    pub overlaying: Option<AxisId>,
    /// Paper position of a free axis.
    pub position: f64,
    /// Side the axis is drawn on.
    pub side: Side,
    /// Whether the axis line is drawn.
    pub showline: bool,
    /// Axis line width before crisp rounding.
    pub linewidth: f64,
    /// Axis line color.
    pub linecolor: Color,
    /// Line mirroring.
    pub mirror: Mirror,
    /// Whether tick marks are drawn.
    pub ticks: bool,
    /// Layer of lines and ticks.
    pub layer: AxisLayer,

    /// The anchor resolved to an existing counter axis; `None` for free axes.
    pub anchor_axis: Option<AxisId>,
    /// Canonical axis of this overlay chain (itself when not overlaying).
    pub main_axis: AxisId,
    /// Subplot on which this axis draws its line and ticks.
    pub main_subplot: Option<SubplotId>,
    /// Counter axes this axis is paired with, in subplot order.
    pub counter_axes: Vec<AxisId>,

    /// Pixel offset of the data area along this axis' direction.
    pub offset: f64,
    /// Pixel length of the data area along this axis' direction.
    pub length: f64,
    m: f64,
    b: f64,
}

impl Axis {
    /// Creates an axis with defaults for its letter.
    pub fn new(id: AxisId) -> Self {
        let (range, side, anchor) = match id.letter() {
            AxisLetter::X => ([-1.0, 6.0], Side::Bottom, Anchor::Axis(AxisId::Y)),
            AxisLetter::Y => ([-1.0, 4.0], Side::Left, Anchor::Axis(AxisId::X)),
        };
        Self {
            id,
            domain: [0.0, 1.0],
            range,
            autorange: AutorangeMode::On,
            anchor,
            overlaying: None,
            position: 0.0,
            side,
            showline: false,
            linewidth: 1.0,
            linecolor: Color::from_rgba8(0x44, 0x44, 0x44, 0xff),
            mirror: Mirror::Off,
            ticks: false,
            layer: AxisLayer::AboveTraces,
            anchor_axis: None,
            main_axis: id,
            main_subplot: None,
            counter_axes: Vec::new(),
            offset: 0.0,
            length: 0.0,
            m: 0.0,
            b: 0.0,
        }
    }

    /// The axis letter.
    pub fn letter(&self) -> AxisLetter {
        self.id.letter()
    }

    /// Whether the range runs from high to low.
    pub fn is_reversed(&self) -> bool {
        self.range[0] > self.range[1]
    }

    /// Whether this axis draws lines or ticks on the given subplot.
    pub fn shows_lines_or_ticks(&self, subplot: SubplotId) -> bool {
        (self.ticks || self.showline)
            && (self.main_subplot == Some(subplot) || self.mirror.is_all())
    }

    /// Recomputes pixel offset/length and the linear data-to-pixel transform.
    pub fn set_scale(&mut self, size: &PlotSize) {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        match self.letter() {
            AxisLetter::X => {
                self.offset = size.l + d0 * size.w;
                self.length = (d1 - d0) * size.w;
                self.m = if r1 != r0 { self.length / (r1 - r0) } else { 0.0 };
                self.b = -self.m * r0;
            }
            AxisLetter::Y => {
                self.offset = size.t + (1.0 - d1) * size.h;
                self.length = (d1 - d0) * size.h;
                self.m = if r1 != r0 { self.length / (r0 - r1) } else { 0.0 };
                self.b = -self.m * r1;
            }
        }
    }

    /// Maps a data value to a pixel position relative to [`Axis::offset`].
    pub fn l2p(&self, v: f64) -> f64 {
        self.m * v + self.b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Margin;

    #[test]
    fn x_scale_maps_range_onto_domain_pixels() {
        let size = PlotSize::arrange(300.0, 200.0, &Margin::uniform(50.0));
        let mut ax = Axis::new(AxisId::X);
        ax.domain = [0.5, 1.0];
        ax.range = [0.0, 10.0];
        ax.set_scale(&size);
        assert!((ax.offset - 150.0).abs() < 1e-9, "offset starts halfway: {}", ax.offset);
        assert!((ax.length - 100.0).abs() < 1e-9, "half of 200px");
        assert!((ax.l2p(10.0) - 100.0).abs() < 1e-9, "range end at length");
    }

    #[test]
    fn y_scale_grows_upwards() {
        let size = PlotSize::arrange(300.0, 200.0, &Margin::uniform(50.0));
        let mut ax = Axis::new(AxisId::Y);
        ax.range = [0.0, 4.0];
        ax.set_scale(&size);
        assert!((ax.l2p(4.0)).abs() < 1e-9, "range top maps to offset");
        assert!((ax.l2p(0.0) - 100.0).abs() < 1e-9, "range bottom maps to length");
    }

    #[test]
    fn lines_and_ticks_need_main_subplot_or_all_mirror() {
        let mut ax = Axis::new(AxisId::X);
        ax.showline = true;
        ax.main_subplot = Some(SubplotId::XY);
        let other = SubplotId::new(AxisId::X, AxisId::y(2));
        assert!(ax.shows_lines_or_ticks(SubplotId::XY), "main subplot");
        assert!(!ax.shows_lines_or_ticks(other), "not main, not mirrored");
        ax.mirror = Mirror::AllTicks;
        assert!(ax.shows_lines_or_ticks(other), "mirrored on all subplots");
    }
}
