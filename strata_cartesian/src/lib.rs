// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cartesian subplots for `strata`.
//!
//! This crate turns a [`FullLayout`] into layers of a [`strata_core::LayerTree`]:
//! - **Framework**: one `g.subplot` group per subplot with a fixed set of sub-layers, kept
//!   alive across redraws while the subplot's structure is unchanged ([`draw_framework`]).
//! - **Cleanup** of whatever the previous layout drew and the new one does not ([`clean`]).
//! - **Styling**: minimal backgrounds, clip paths and crisp axis lines ([`style_subplots`]).
//! - **Dispatch** of calcdata to registered trace modules ([`plot`]).
//!
//! Trace geometry is drawn by [`TracePlotter`] implementations, GL traces by [`GlScene`]s.
//! Both are supplied by the host.

#![no_std]

extern crate alloc;

#[cfg(test)]
mod cartesian_tests;
mod constants;
#[cfg(not(feature = "std"))]
mod float;
mod framework;
mod full_layout;
mod gl;
mod graph;
mod module;
mod plot;
mod style;

pub use constants::{
    CLIP_ON_AXIS_FALSE_CLASSES, TRACE_LAYER_CLASSES, allows_clip_on_axis_false, layer_priority,
};
pub use framework::{
    SubplotDatum, clean, draw_framework, make_subplot_data, make_subplot_layer, plot_clip_id,
    purge_subplot_layers, remove_descendants_with_class, remove_subplot_extras,
};
pub use full_layout::{FullLayout, PlotInfo, SubplotLayers};
pub use gl::{Camera, CameraScene, GlCanvas, GlScene};
pub use graph::{CameraBinding, Graph, RootLayers};
pub use module::{
    Categories, ModuleRegistry, NoopPlotter, PlotCall, TraceModule, TracePlotter, Transition,
    shared,
};
pub use plot::{get_module_calcdata, plot, select_subplot_calcdata};
pub use style::{
    crisp_round, draw_axis_lines, draw_backgrounds, line_position, make_clip_paths,
    set_plot_clips, style_subplots,
};
