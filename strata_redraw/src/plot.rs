// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart runtime: inputs, registries and the persistent [`Graph`].

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use futures::FutureExt;
use futures::future::join_all;
use strata_cartesian::{FullLayout, GlCanvas, Graph, ModuleRegistry, clean, draw_framework};
use strata_core::{
    AutorangeRoutine, CalcTrace, LayoutInput, PaddedExtent, Result, Settle, TraceInput,
};

use crate::component::{Component, ComponentRegistry};
use crate::config::Config;
use crate::plan::{EditFlags, Pass, plan_passes};
use crate::subroutines;
use crate::surface::{DetachedSurface, RenderSurface};

/// A chart and everything needed to redraw it.
pub struct Plot {
    /// The persistent chart state.
    pub graph: Graph,
    pub(crate) layout: LayoutInput,
    pub(crate) data: Vec<TraceInput>,
    pub(crate) modules: ModuleRegistry,
    pub(crate) components: ComponentRegistry,
    pub(crate) surface: Box<dyn RenderSurface>,
    pub(crate) autorange: Box<dyn AutorangeRoutine>,
    pub(crate) config: Config,
}

impl core::fmt::Debug for Plot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Plot")
            .field("graph", &self.graph)
            .field("layout", &self.layout)
            .field("data", &self.data)
            .field("modules", &self.modules)
            .field("components", &self.components)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Plot {
    /// Creates an empty chart drawing with `modules`.
    ///
    /// `uid` identifies the chart in clip path ids and must be unique per document.
    pub fn new(uid: impl Into<String>, modules: ModuleRegistry) -> Result<Self> {
        let config = Config::default();
        Ok(Self {
            graph: Graph::new(uid)?,
            layout: LayoutInput::default(),
            data: Vec::new(),
            modules,
            components: ComponentRegistry::new(),
            surface: Box::new(DetachedSurface),
            autorange: Box::new(PaddedExtent::new(config.autorange_padding)),
            config,
        })
    }

    /// Applies chart-wide settings. Resets the autorange routine to the default one.
    pub fn with_config(mut self, config: Config) -> Self {
        self.graph.static_plot = config.static_plot;
        self.autorange = Box::new(PaddedExtent::new(config.autorange_padding));
        self.config = config;
        self
    }

    /// Mounts the chart on a host surface.
    pub fn with_surface(mut self, surface: impl RenderSurface + 'static) -> Self {
        self.surface = Box::new(surface);
        self
    }

    /// Replaces the autorange routine.
    pub fn with_autorange(mut self, routine: impl AutorangeRoutine + 'static) -> Self {
        self.autorange = Box::new(routine);
        self
    }

    /// Attaches the shared GL canvas.
    pub fn with_gl_canvas(mut self, canvas: impl GlCanvas + 'static) -> Self {
        self.graph.gl_canvas = Some(Box::new(canvas));
        self
    }

    /// Registers a decoration component.
    pub fn with_component(
        mut self,
        name: impl Into<String>,
        component: impl Component + 'static,
    ) -> Self {
        self.components.insert(name, component);
        self
    }

    /// Decoration components.
    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    /// The current layout input.
    pub fn layout(&self) -> &LayoutInput {
        &self.layout
    }

    /// Edits the layout input. Nothing is redrawn until a pass runs.
    pub fn layout_mut(&mut self) -> &mut LayoutInput {
        &mut self.layout
    }

    /// The current trace inputs.
    pub fn data(&self) -> &[TraceInput] {
        &self.data
    }

    /// Edits the trace inputs. Nothing is redrawn until a pass runs.
    pub fn data_mut(&mut self) -> &mut Vec<TraceInput> {
        &mut self.data
    }

    /// Chart-wide settings.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Draws `data` with `layout` from scratch.
    ///
    /// Layers of subplots that survive from the previous state are kept, everything the
    /// previous state drew and this one does not is removed. The returned future resolves
    /// once every deferred draw of the pipeline has finished.
    pub fn new_plot(&mut self, layout: LayoutInput, data: Vec<TraceInput>) -> Result<Settle> {
        self.layout = layout;
        self.data = data;
        self.pipeline(true)
    }

    /// Runs one pass.
    pub fn run(&mut self, pass: Pass) -> Result<Settle> {
        tracing::debug!(pass = pass.name(), "running pass");
        match pass {
            Pass::NewPlot => self.pipeline(true),
            Pass::Replot => self.pipeline(false),
            Pass::LayoutReplot => subroutines::layout_replot(self),
            Pass::LayoutStyles => subroutines::layout_styles(self),
            Pass::DrawMainTitle => subroutines::draw_main_title(self),
            Pass::DoTraceStyle => subroutines::do_trace_style(self),
            Pass::DoColorBars => subroutines::do_color_bars(self),
            Pass::DoLegend => subroutines::do_legend(self),
            Pass::DoTicksRelayout => subroutines::do_ticks_relayout(self),
            Pass::DoModeBar => subroutines::do_mode_bar(self),
            Pass::DoCamera => subroutines::do_camera(self),
            Pass::DrawData => subroutines::draw_data(self),
            Pass::RedrawReglTraces => subroutines::redraw_regl_traces(self),
            Pass::DoAutorangeAndConstraints => subroutines::do_autorange_and_constraints(self),
            Pass::FinalDraw => subroutines::final_draw(self),
            Pass::DrawMarginPushers => subroutines::draw_margin_pushers(self),
        }
    }

    /// Runs `plan` in order, waiting for each pass to settle before starting the next.
    ///
    /// A failing pass stops the plan; the passes after it do not run.
    pub async fn apply(&mut self, plan: &[Pass]) -> Result<()> {
        for &pass in plan {
            self.run(pass)?.await;
        }
        Ok(())
    }

    /// Redraws whatever `flags` require.
    pub async fn edit(&mut self, flags: EditFlags) -> Result<()> {
        let plan = plan_passes(flags);
        self.apply(&plan).await
    }

    /// Rebuilds the full layout and draws everything.
    ///
    /// Calcdata is computed before the previous full layout hands over its subplot state, so
    /// any input error leaves the chart as it was.
    pub(crate) fn pipeline(&mut self, recalc: bool) -> Result<Settle> {
        self.graph.completions.supersede();

        let calcdata = if recalc || self.graph.calcdata.len() != self.data.len() {
            Some(CalcTrace::calc_all(&self.data)?)
        } else {
            None
        };

        let mut old = core::mem::take(&mut self.graph.full_layout);
        self.graph.full_layout =
            match FullLayout::supply_defaults(&self.layout, &self.data, &self.modules, Some(&mut old))
            {
                Ok(full) => full,
                Err(err) => {
                    self.graph.full_layout = old;
                    return Err(err);
                }
            };

        if let Some(calcdata) = calcdata {
            self.graph.calcdata = calcdata;
            let graph = &mut self.graph;
            for cd in &mut graph.calcdata {
                if let Some(module) = graph.full_layout.trace_module(cd.info.index) {
                    module.plotter().arrays_to_calcdata(cd);
                }
            }
        }

        clean(&mut self.graph, &mut old);
        drop(old);

        if self.graph.full_layout.has_cartesian {
            draw_framework(&mut self.graph)?;
        }
        let settles = [
            subroutines::draw_margin_pushers(self)?,
            subroutines::do_autorange_and_constraints(self)?,
            subroutines::layout_styles(self)?,
            subroutines::do_ticks_relayout(self)?,
            subroutines::draw_data(self)?,
            subroutines::final_draw(self)?,
        ];
        tracing::debug!(
            subplots = self.graph.full_layout.subplot_ids().len(),
            traces = self.graph.calcdata.len(),
            recalc,
            "drew chart"
        );
        Ok(join_all(settles).map(|_| ()).boxed())
    }
}
