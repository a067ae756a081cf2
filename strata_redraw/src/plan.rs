// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choosing the passes an edit needs.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

/// One redraw pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Recalculate every trace and redraw from scratch.
    NewPlot,
    /// Rebuild the layout and redraw, reusing the calcdata.
    Replot,
    /// Rebuild the layout and calcdata from the inputs and redraw everything.
    LayoutReplot,
    /// Chart background, size and subplot styles.
    LayoutStyles,
    /// The main title.
    DrawMainTitle,
    /// Trace styles without relayout.
    DoTraceStyle,
    /// Color bars.
    DoColorBars,
    /// The legend.
    DoLegend,
    /// Axis ticks and the main title.
    DoTicksRelayout,
    /// The mode bar and interactions.
    DoModeBar,
    /// 3D cameras.
    DoCamera,
    /// Every trace, then shapes, annotations and images.
    DrawData,
    /// GL scenes only.
    RedrawReglTraces,
    /// Axis ranges and their constraints.
    DoAutorangeAndConstraints,
    /// Range sliders and selectors.
    FinalDraw,
    /// Decorations that reserve margin space.
    DrawMarginPushers,
}

impl Pass {
    /// Name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::NewPlot => "new_plot",
            Self::Replot => "replot",
            Self::LayoutReplot => "layout_replot",
            Self::LayoutStyles => "layout_styles",
            Self::DrawMainTitle => "draw_main_title",
            Self::DoTraceStyle => "do_trace_style",
            Self::DoColorBars => "do_color_bars",
            Self::DoLegend => "do_legend",
            Self::DoTicksRelayout => "do_ticks_relayout",
            Self::DoModeBar => "do_mode_bar",
            Self::DoCamera => "do_camera",
            Self::DrawData => "draw_data",
            Self::RedrawReglTraces => "redraw_regl_traces",
            Self::DoAutorangeAndConstraints => "do_autorange_and_constraints",
            Self::FinalDraw => "final_draw",
            Self::DrawMarginPushers => "draw_margin_pushers",
        }
    }
}

/// What an edit touched.
///
/// Set the flags of every attribute that changed; [`plan_passes`] picks the passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditFlags {
    /// Trace data changed and must be recalculated.
    pub calc: bool,
    /// The layout changed in a way only a full layout rebuild handles.
    pub layout_replot: bool,
    /// Traces must be redrawn, the calcdata is still valid.
    pub plot: bool,
    /// Axis ranges changed.
    pub axrange: bool,
    /// Tick settings or the main title changed.
    pub ticks: bool,
    /// Chart or subplot backgrounds, sizes or axis lines changed.
    pub layout_style: bool,
    /// Trace styles changed.
    pub style: bool,
    /// Color bars changed.
    pub colorbars: bool,
    /// The legend changed.
    pub legend: bool,
    /// Mode bar settings changed.
    pub modebar: bool,
    /// A 3D camera moved.
    pub camera: bool,
}

impl EditFlags {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Picks the shortest pass sequence covering `flags`.
///
/// A recalculation beats a layout replot, which beats a trace redraw; each of them redraws
/// everything and ends the plan. Otherwise the decoration passes run in a fixed order.
pub fn plan_passes(flags: EditFlags) -> Vec<Pass> {
    if flags.calc {
        return vec![Pass::NewPlot];
    }
    if flags.layout_replot {
        return vec![Pass::LayoutReplot];
    }
    if flags.plot {
        return vec![Pass::Replot];
    }

    let mut passes = Vec::new();
    if flags.legend {
        passes.push(Pass::DoLegend);
    }
    if flags.layout_style {
        passes.push(Pass::LayoutStyles);
    }
    if flags.axrange {
        passes.extend([
            Pass::DoAutorangeAndConstraints,
            Pass::DoTicksRelayout,
            Pass::DrawData,
            Pass::FinalDraw,
        ]);
    } else if flags.ticks {
        passes.push(Pass::DoTicksRelayout);
    }
    if flags.style {
        passes.push(Pass::DoTraceStyle);
    }
    if flags.modebar {
        passes.push(Pass::DoModeBar);
    }
    if flags.camera {
        passes.push(Pass::DoCamera);
    }
    if flags.colorbars {
        passes.push(Pass::DoColorBars);
    }
    passes
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn full_redraws_win_and_end_the_plan() {
        let everything = EditFlags {
            calc: true,
            layout_replot: true,
            plot: true,
            style: true,
            legend: true,
            ..EditFlags::default()
        };
        assert_eq!(plan_passes(everything), [Pass::NewPlot]);

        let layout = EditFlags {
            calc: false,
            ..everything
        };
        assert_eq!(plan_passes(layout), [Pass::LayoutReplot]);

        let plot = EditFlags {
            layout_replot: false,
            ..layout
        };
        assert_eq!(plan_passes(plot), [Pass::Replot]);
    }

    #[test]
    fn decorations_run_in_a_fixed_order() {
        let flags = EditFlags {
            colorbars: true,
            style: true,
            legend: true,
            camera: true,
            ..EditFlags::default()
        };
        assert_eq!(
            plan_passes(flags),
            [
                Pass::DoLegend,
                Pass::DoTraceStyle,
                Pass::DoCamera,
                Pass::DoColorBars
            ]
        );
    }

    #[test]
    fn range_changes_redraw_ticks_once() {
        let flags = EditFlags {
            axrange: true,
            ticks: true,
            ..EditFlags::default()
        };
        let plan = plan_passes(flags);
        assert_eq!(
            plan.iter()
                .filter(|p| **p == Pass::DoTicksRelayout)
                .count(),
            1
        );
        assert_eq!(plan[0], Pass::DoAutorangeAndConstraints);
        assert_eq!(plan.last(), Some(&Pass::FinalDraw));
    }

    #[test]
    fn no_flags_no_passes() {
        assert!(EditFlags::default().is_empty());
        assert!(plan_passes(EditFlags::default()).is_empty());
    }
}
