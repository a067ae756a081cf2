// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Redraw orchestration for `strata` charts.
//!
//! A [`Plot`] owns the chart inputs, the trace module and decoration registries, and the
//! persistent [`strata_cartesian::Graph`]. It redraws in passes:
//! - [`Plot::new_plot`] runs the whole pipeline: layout defaults, calcdata, cleanup of the
//!   previous state, the subplot framework, ranges, styles, ticks, data and final decorations.
//! - The passes in [`subroutines`] redraw one aspect each (trace styles, the legend, ticks,
//!   GL scenes, ...) and can be sequenced with [`Plot::apply`].
//! - [`plan_passes`] turns the [`EditFlags`] of an edit into the shortest pass sequence.
//!
//! Every pass returns a [`strata_core::Settle`] that resolves once the deferred draws it
//! started have finished. [`Plot::apply`] awaits each one before starting the next pass.

#![no_std]

extern crate alloc;

mod component;
mod config;
mod plan;
mod plot;
pub mod subroutines;
mod surface;
mod title;

pub use component::{
    ANNOTATIONS, AXES, COLORBAR, Component, ComponentRegistry, FX, IMAGES, LEGEND, MODEBAR,
    Method, RANGESELECTOR, RANGESLIDER, SHAPES, SLIDERS, UPDATEMENUS,
};
pub use config::Config;
pub use plan::{EditFlags, Pass, plan_passes};
pub use plot::Plot;
pub use surface::{DetachedSurface, RenderSurface};
pub use title::{CAP_SHIFT, MAIN_TITLE_CLASS, MID_SHIFT, TitlePlacement, place_main_title};
