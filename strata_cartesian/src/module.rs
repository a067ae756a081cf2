// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace modules: the contract between the dispatcher and per-trace-type drawing code.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;

use hashbrown::HashMap;
use strata_core::{AxisRegistry, CalcTrace, Completions, LayerId, LayerTree, Result};

use crate::full_layout::PlotInfo;

/// What a trace module can do and where it draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Categories {
    /// Lives on cartesian subplots.
    pub cartesian: bool,
    /// Draws into the layer tree.
    pub svg: bool,
    /// Draws into the shared GL canvas.
    pub gl: bool,
    /// Uses the batched GL redraw.
    pub regl: bool,
    /// Its points and text are rescaled directly while zooming.
    pub zoom_scale: bool,
}

impl Categories {
    /// A cartesian module drawing into the layer tree.
    pub fn svg() -> Self {
        Self {
            cartesian: true,
            svg: true,
            ..Self::default()
        }
    }

    /// A cartesian module drawing into the shared GL canvas.
    pub fn regl() -> Self {
        Self {
            cartesian: true,
            gl: true,
            regl: true,
            ..Self::default()
        }
    }

    /// Marks the module as zoom-scalable.
    pub fn with_zoom_scale(mut self) -> Self {
        self.zoom_scale = true;
        self
    }
}

/// Options of an animated redraw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// Duration in milliseconds.
    pub duration: f64,
    /// Whether a full redraw follows the transition.
    pub redraw: bool,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration: 500.0,
            redraw: true,
        }
    }
}

/// Everything a [`TracePlotter`] gets to draw one subplot's traces.
#[derive(Debug)]
pub struct PlotCall<'a> {
    /// The layer tree.
    pub layers: &'a mut LayerTree,
    /// The subplot being drawn. GL modules keep their scene here.
    pub plotinfo: &'a mut PlotInfo,
    /// Axes of the current layout.
    pub axes: &'a AxisRegistry,
    /// The module's traces on this subplot, in declaration order.
    pub calcdata: &'a [&'a CalcTrace],
    /// The module's layer group; `None` for GL modules.
    pub layer: Option<LayerId>,
    /// Set during animated redraws.
    pub transition: Option<&'a Transition>,
    /// Register asynchronous completions here.
    pub completions: &'a mut Completions,
}

/// Drawing code for one or more trace types.
///
/// Several trace types may share one plotter (e.g. a `bar` and a `histogram` module). The
/// dispatcher recognizes shared plotters by identity and calls each one once per subplot.
pub trait TracePlotter {
    /// Draws the traces in `call.calcdata` into `call.layer`.
    fn plot(&self, call: PlotCall<'_>) -> Result<()>;

    /// Restyles already drawn traces in place.
    fn style(&self, layers: &mut LayerTree, root: LayerId, calcdata: &[&CalcTrace]) -> Result<()> {
        let _ = (layers, root, calcdata);
        Ok(())
    }

    /// Applies style edits directly to the calcdata.
    ///
    /// Returns whether anything was edited; GL scenes are then redrawn.
    fn edit_style(&self, calcdata: &mut CalcTrace) -> bool {
        let _ = calcdata;
        false
    }

    /// Copies per-point style arrays into the calcdata.
    fn arrays_to_calcdata(&self, calcdata: &mut CalcTrace) {
        let _ = calcdata;
    }
}

/// A registered trace type.
pub struct TraceModule {
    name: String,
    layer_name: Option<String>,
    categories: Categories,
    plotter: Arc<dyn TracePlotter>,
}

impl core::fmt::Debug for TraceModule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TraceModule")
            .field("name", &self.name)
            .field("layer_name", &self.layer_name)
            .field("categories", &self.categories)
            .finish_non_exhaustive()
    }
}

impl TraceModule {
    /// Creates a module for the trace type `name`.
    pub fn new(
        name: impl Into<String>,
        categories: Categories,
        plotter: Arc<dyn TracePlotter>,
    ) -> Self {
        Self {
            name: name.into(),
            layer_name: None,
            categories,
            plotter,
        }
    }

    /// Overrides the layer class (defaults to `{name}layer`).
    pub fn with_layer_name(mut self, layer_name: impl Into<String>) -> Self {
        self.layer_name = Some(layer_name.into());
        self
    }

    /// The trace type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class of the module's layer group.
    pub fn layer_class(&self) -> String {
        match &self.layer_name {
            Some(layer) => layer.clone(),
            None => format!("{}layer", self.name),
        }
    }

    /// Capability flags.
    pub fn categories(&self) -> Categories {
        self.categories
    }

    /// The drawing code.
    pub fn plotter(&self) -> &Arc<dyn TracePlotter> {
        &self.plotter
    }

    /// Whether this module draws with `plotter`.
    pub fn uses(&self, plotter: &Arc<dyn TracePlotter>) -> bool {
        Arc::ptr_eq(&self.plotter, plotter)
    }
}

/// Trace modules by trace type name.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<TraceModule>>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module under its name, replacing any previous one.
    pub fn register(&mut self, module: TraceModule) -> &mut Self {
        tracing::debug!(module = module.name(), "registering trace module");
        self.modules
            .insert(module.name.clone(), Arc::new(module));
        self
    }

    /// Registers a plotter for a trace type in one go.
    pub fn register_plotter(
        &mut self,
        name: &str,
        categories: Categories,
        plotter: impl TracePlotter + 'static,
    ) -> &mut Self {
        self.register(TraceModule::new(name, categories, shared(plotter)))
    }

    /// Looks up the module of a trace type.
    pub fn get(&self, trace_type: &str) -> Option<&Arc<TraceModule>> {
        self.modules.get(trace_type)
    }

    /// Whether a trace type is registered.
    pub fn contains(&self, trace_type: &str) -> bool {
        self.modules.contains_key(trace_type)
    }
}

/// A plotter that draws nothing, for trace types that only take part in layout.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPlotter;

impl TracePlotter for NoopPlotter {
    fn plot(&self, _call: PlotCall<'_>) -> Result<()> {
        Ok(())
    }
}

/// Boxes a plotter for sharing between several modules.
pub fn shared(plotter: impl TracePlotter + 'static) -> Arc<dyn TracePlotter> {
    Arc::new(plotter)
}
