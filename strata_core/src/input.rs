// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw, partial user input.
//!
//! Everything here is what the user wrote, before defaults are filled in. Axis references are
//! kept as strings so that malformed or dangling references survive until the lookup that
//! reports them.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use peniko::Color;
use peniko::color::palette::css;

use crate::axis::{AutorangeMode, AxisLayer, Mirror, Side};
use crate::layout::Margin;

/// The user layout: chart size, colors, title and axis declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutInput {
    /// Total chart width in pixels.
    pub width: f64,
    /// Total chart height in pixels.
    pub height: f64,
    /// Margins around the plot area.
    pub margin: Margin,
    /// Color of the whole chart canvas.
    pub paper_bgcolor: Color,
    /// Color behind each subplot's data area.
    pub plot_bgcolor: Color,
    /// Main chart title.
    pub title: TitleInput,
    /// Axis declarations keyed by attribute name (`xaxis`, `yaxis2`, ...).
    ///
    /// Keys that are not valid axis attribute names are ignored.
    pub axes: BTreeMap<String, AxisInput>,
}

impl Default for LayoutInput {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 450.0,
            margin: Margin::default(),
            paper_bgcolor: css::WHITE,
            plot_bgcolor: css::WHITE,
            title: TitleInput::default(),
            axes: BTreeMap::new(),
        }
    }
}

impl LayoutInput {
    /// Creates a layout with default size, margins and colors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chart size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the margins.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Sets paper and plot background colors.
    pub fn with_colors(mut self, paper_bgcolor: Color, plot_bgcolor: Color) -> Self {
        self.paper_bgcolor = paper_bgcolor;
        self.plot_bgcolor = plot_bgcolor;
        self
    }

    /// Sets the main title.
    pub fn with_title(mut self, title: TitleInput) -> Self {
        self.title = title;
        self
    }

    /// Declares (or replaces) an axis under the given attribute name.
    pub fn with_axis(mut self, name: impl Into<String>, axis: AxisInput) -> Self {
        self.axes.insert(name.into(), axis);
        self
    }

    /// Returns the declaration for the given attribute name, if any.
    pub fn axis(&self, name: &str) -> Option<&AxisInput> {
        self.axes.get(name)
    }
}

/// A partial axis declaration. Unset fields take defaults when the registry is built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisInput {
    /// Perpendicular axis id this axis is positioned against, or `"free"`.
    pub anchor: Option<String>,
    /// Same-letter axis id whose domain this axis shares.
    pub overlaying: Option<String>,
    /// Fraction of the plot area this axis spans.
    pub domain: Option<[f64; 2]>,
    /// Explicit data range. Setting one turns autorange off unless `autorange` says otherwise.
    pub range: Option<[f64; 2]>,
    /// Autorange mode.
    pub autorange: Option<AutorangeMode>,
    /// Axis id whose range this axis is synchronized with.
    pub matches: Option<String>,
    /// Axis id whose pixels-per-unit this axis is locked to.
    pub scaleanchor: Option<String>,
    /// Ratio applied to `scaleanchor`.
    pub scaleratio: Option<f64>,
    /// Which side of the plot the axis is drawn on.
    pub side: Option<Side>,
    /// Position on the paper (fraction) for free axes.
    pub position: Option<f64>,
    /// Whether the axis line is drawn.
    pub showline: Option<bool>,
    /// Axis line width in pixels.
    pub linewidth: Option<f64>,
    /// Axis line color.
    pub linecolor: Option<Color>,
    /// Mirroring of the axis line onto the opposite side.
    pub mirror: Option<Mirror>,
    /// Whether tick marks are drawn.
    pub ticks: Option<bool>,
    /// Whether lines and ticks are drawn above or below traces.
    pub layer: Option<AxisLayer>,
}

impl AxisInput {
    /// Creates an empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the anchor (`"free"` or a counter-axis id).
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    /// Sets the overlaid axis id.
    pub fn with_overlaying(mut self, overlaying: impl Into<String>) -> Self {
        self.overlaying = Some(overlaying.into());
        self
    }

    /// Sets the domain.
    pub fn with_domain(mut self, domain: [f64; 2]) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Sets an explicit range.
    pub fn with_range(mut self, range: [f64; 2]) -> Self {
        self.range = Some(range);
        self
    }

    /// Sets the autorange mode.
    pub fn with_autorange(mut self, autorange: AutorangeMode) -> Self {
        self.autorange = Some(autorange);
        self
    }

    /// Synchronizes this axis' range with another axis.
    pub fn with_matches(mut self, matches: impl Into<String>) -> Self {
        self.matches = Some(matches.into());
        self
    }

    /// Locks this axis' scale to another axis with the given ratio.
    pub fn with_scaleanchor(mut self, anchor: impl Into<String>, ratio: f64) -> Self {
        self.scaleanchor = Some(anchor.into());
        self.scaleratio = Some(ratio);
        self
    }

    /// Sets the side.
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Sets the free position.
    pub fn with_position(mut self, position: f64) -> Self {
        self.position = Some(position);
        self
    }

    /// Turns the axis line on with the given width.
    pub fn with_line(mut self, linewidth: f64) -> Self {
        self.showline = Some(true);
        self.linewidth = Some(linewidth);
        self
    }

    /// Sets the axis line color.
    pub fn with_linecolor(mut self, color: Color) -> Self {
        self.linecolor = Some(color);
        self
    }

    /// Sets mirroring.
    pub fn with_mirror(mut self, mirror: Mirror) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Enables or disables tick marks.
    pub fn with_ticks(mut self, ticks: bool) -> Self {
        self.ticks = Some(ticks);
        self
    }

    /// Sets the drawing layer of lines and ticks.
    pub fn with_layer(mut self, layer: AxisLayer) -> Self {
        self.layer = Some(layer);
        self
    }
}

/// Fill mode of a trace. The `ToNext*` modes depend on the previous trace's geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Fill {
    /// No fill.
    #[default]
    None,
    /// Fill down to `y = 0`.
    ToZeroY,
    /// Fill across to `x = 0`.
    ToZeroX,
    /// Fill to the previous trace, vertically.
    ToNextY,
    /// Fill to the previous trace, horizontally.
    ToNextX,
    /// Fill to the previous trace, closing the shape.
    ToNext,
    /// Fill the closed shape of the trace itself.
    ToSelf,
}

impl Fill {
    /// Whether this fill references the previous trace on the same subplot.
    pub fn is_to_next(self) -> bool {
        matches!(self, Self::ToNextY | Self::ToNextX | Self::ToNext)
    }
}

/// A user trace: its type, axis binding and raw data.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceInput {
    /// Trace type name used to look up the plot module (`scatter`, `bar`, ...).
    pub trace_type: String,
    /// Stable identifier; defaults to the trace index.
    pub uid: Option<String>,
    /// X axis id.
    pub xaxis: String,
    /// Y axis id.
    pub yaxis: String,
    /// Fill mode.
    pub fill: Fill,
    /// Whether the trace is drawn.
    pub visible: bool,
    /// Id of the carpet this trace is drawn on, if any.
    pub carpet: Option<String>,
    /// Whether the trace is clipped to its subplot's data area.
    pub cliponaxis: bool,
    /// X values.
    pub x: Vec<f64>,
    /// Y values.
    pub y: Vec<f64>,
}

impl TraceInput {
    /// Creates a visible trace of the given type on the default axes.
    pub fn new(trace_type: impl Into<String>) -> Self {
        Self {
            trace_type: trace_type.into(),
            uid: None,
            xaxis: "x".to_string(),
            yaxis: "y".to_string(),
            fill: Fill::None,
            visible: true,
            carpet: None,
            cliponaxis: true,
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    /// Sets the data arrays.
    pub fn with_xy(mut self, x: impl Into<Vec<f64>>, y: impl Into<Vec<f64>>) -> Self {
        self.x = x.into();
        self.y = y.into();
        self
    }

    /// Binds the trace to an axis pair.
    pub fn with_axes(mut self, xaxis: impl Into<String>, yaxis: impl Into<String>) -> Self {
        self.xaxis = xaxis.into();
        self.yaxis = yaxis.into();
        self
    }

    /// Sets the fill mode.
    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    /// Sets visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Links the trace to a carpet.
    pub fn with_carpet(mut self, carpet: impl Into<String>) -> Self {
        self.carpet = Some(carpet.into());
        self
    }

    /// Lets the trace draw outside of its subplot's data area.
    pub fn without_clip(mut self) -> Self {
        self.cliponaxis = false;
        self
    }

    /// Sets the stable identifier.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }
}

/// Where the main title's coordinates are measured from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TitleRef {
    /// The whole chart.
    #[default]
    Container,
    /// The plot area inside the margins.
    Paper,
}

/// Horizontal anchor of the main title.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TitleXAnchor {
    /// Derived from `x`: left third anchors left, right third anchors right.
    #[default]
    Auto,
    /// Anchor at the text start.
    Left,
    /// Anchor at the text middle.
    Center,
    /// Anchor at the text end.
    Right,
}

/// Vertical anchor of the main title.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TitleYAnchor {
    /// Derived from `y`.
    #[default]
    Auto,
    /// Anchor at the cap height.
    Top,
    /// Anchor at the middle.
    Middle,
    /// Anchor at the baseline.
    Bottom,
}

/// Padding around the main title.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TitlePad {
    /// Top padding.
    pub t: f64,
    /// Right padding.
    pub r: f64,
    /// Bottom padding.
    pub b: f64,
    /// Left padding.
    pub l: f64,
}

/// The main chart title.
#[derive(Clone, Debug, PartialEq)]
pub struct TitleInput {
    /// Title text; `None` hides the title.
    pub text: Option<String>,
    /// Horizontal position as a fraction of the reference.
    pub x: f64,
    /// Vertical position as a fraction of the reference; `None` centers in the top margin.
    pub y: Option<f64>,
    /// Reference for `x`.
    pub xref: TitleRef,
    /// Reference for `y`.
    pub yref: TitleRef,
    /// Horizontal anchor.
    pub xanchor: TitleXAnchor,
    /// Vertical anchor.
    pub yanchor: TitleYAnchor,
    /// Padding.
    pub pad: TitlePad,
}

impl Default for TitleInput {
    fn default() -> Self {
        Self {
            text: None,
            x: 0.5,
            y: None,
            xref: TitleRef::Container,
            yref: TitleRef::Container,
            xanchor: TitleXAnchor::Auto,
            yanchor: TitleYAnchor::Auto,
            pad: TitlePad::default(),
        }
    }
}

impl TitleInput {
    /// Creates a title with the given text and default placement.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}
