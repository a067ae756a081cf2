// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Redraw passes.
//!
//! Each pass redraws one aspect of the chart from the current full layout and calcdata, and
//! returns a [`Settle`] joining the deferred completions its draws registered. Passes assume
//! the framework exists; [`Plot::new_plot`](crate::Plot::new_plot) builds it.

use smallvec::SmallVec;
use strata_cartesian::{
    Graph, get_module_calcdata, plot as plot_cartesian, select_subplot_calcdata, style_subplots,
};
use strata_core::{Result, Settle, SubplotId};

use crate::component::{
    ANNOTATIONS, AXES, COLORBAR, FX, IMAGES, LEGEND, MODEBAR, Method, RANGESELECTOR, RANGESLIDER,
    SHAPES, SLIDERS, UPDATEMENUS,
};
use crate::plot::Plot;
use crate::title;

/// Paints the chart background, sizes the chart and restyles every subplot.
pub fn layout_styles(plot: &mut Plot) -> Result<Settle> {
    let full = &plot.graph.full_layout;
    let (paper, width, height) = (full.paper_bgcolor, full.width, full.height);
    plot.surface.set_background(&plot.graph, paper);
    plot.surface.size(width, height);
    if plot.graph.full_layout.has_cartesian {
        style_subplots(&mut plot.graph)?;
    }
    plot.components
        .call(MODEBAR, Method::Draw, &mut plot.graph)?;
    Ok(plot.graph.completions.settle())
}

/// Places the main title.
pub fn draw_main_title(plot: &mut Plot) -> Result<Settle> {
    title::draw_title(&mut plot.graph, plot.config.title_font_size)?;
    Ok(plot.graph.completions.settle())
}

/// Restyles traces without touching layout or geometry.
///
/// Style arrays are copied into the calcdata first. When any module edited its calcdata in
/// place, the GL canvas is cleared and every GL scene redrawn.
pub fn do_trace_style(plot: &mut Plot) -> Result<Settle> {
    let graph = &mut plot.graph;
    let mut edited = false;
    for cd in &mut graph.calcdata {
        let Some(module) = graph.full_layout.trace_module(cd.info.index) else {
            continue;
        };
        module.plotter().arrays_to_calcdata(cd);
        edited |= module.plotter().edit_style(cd);
    }
    if edited {
        clear_gl_canvases(graph);
        draw_regl_scenes(graph);
    }
    style_traces(graph)?;
    plot.components
        .call(LEGEND, Method::Draw, &mut plot.graph)?;
    Ok(plot.graph.completions.settle())
}

/// Redraws color bars.
pub fn do_color_bars(plot: &mut Plot) -> Result<Settle> {
    plot.components
        .call(COLORBAR, Method::Draw, &mut plot.graph)?;
    Ok(plot.graph.completions.settle())
}

/// Redraws everything from the inputs, recomputing calcdata.
///
/// The current full layout stays the previous state of the rebuild: surviving subplots keep
/// their layers and GL scenes, and `clean` tears down what the inputs no longer describe.
pub fn layout_replot(plot: &mut Plot) -> Result<Settle> {
    plot.pipeline(true)
}

/// Redraws the legend.
pub fn do_legend(plot: &mut Plot) -> Result<Settle> {
    plot.components
        .call(LEGEND, Method::Draw, &mut plot.graph)?;
    Ok(plot.graph.completions.settle())
}

/// Redraws axis ticks and the main title.
pub fn do_ticks_relayout(plot: &mut Plot) -> Result<Settle> {
    plot.components.call(AXES, Method::Draw, &mut plot.graph)?;
    title::draw_title(&mut plot.graph, plot.config.title_font_size)?;
    Ok(plot.graph.completions.settle())
}

/// Redraws the mode bar and refreshes interactions.
pub fn do_mode_bar(plot: &mut Plot) -> Result<Settle> {
    plot.components
        .call(MODEBAR, Method::Draw, &mut plot.graph)?;
    if plot.graph.full_layout.has_cartesian {
        plot.components.call(FX, Method::UpdateFx, &mut plot.graph)?;
    }
    Ok(plot.graph.completions.settle())
}

/// Moves every 3D scene to its camera.
pub fn do_camera(plot: &mut Plot) -> Result<Settle> {
    for binding in &mut plot.graph.cameras {
        binding.scene.set_camera(&binding.camera);
    }
    Ok(plot.graph.completions.settle())
}

/// Redraws every trace, then shapes, annotations and images.
pub fn draw_data(plot: &mut Plot) -> Result<Settle> {
    let graph = &mut plot.graph;
    clear_gl_canvases(graph);
    if graph.full_layout.has_cartesian {
        plot_cartesian(graph, None, None)?;
    }
    draw_regl_scenes(graph);
    style_traces(graph)?;
    plot.components
        .draw_all(&[SHAPES, ANNOTATIONS, IMAGES], &mut plot.graph)?;
    Ok(plot.graph.completions.settle())
}

/// Clears the GL canvas and redraws every GL scene.
pub fn redraw_regl_traces(plot: &mut Plot) -> Result<Settle> {
    if plot.graph.full_layout.has_regl() {
        clear_gl_canvases(&mut plot.graph);
        draw_regl_scenes(&mut plot.graph);
    }
    Ok(plot.graph.completions.settle())
}

/// Recomputes automatic ranges and applies scale anchors and match groups.
pub fn do_autorange_and_constraints(plot: &mut Plot) -> Result<Settle> {
    let full = &mut plot.graph.full_layout;
    strata_core::do_autorange_and_constraints(
        &mut full.axes,
        &full.size,
        &plot.graph.calcdata,
        &*plot.autorange,
        &full.constraints,
    )?;
    Ok(plot.graph.completions.settle())
}

/// Draws range sliders and selectors, which depend on final axis ranges.
pub fn final_draw(plot: &mut Plot) -> Result<Settle> {
    plot.components
        .draw_all(&[RANGESLIDER, RANGESELECTOR], &mut plot.graph)?;
    Ok(plot.graph.completions.settle())
}

/// Draws the decorations that may push the margins.
pub fn draw_margin_pushers(plot: &mut Plot) -> Result<Settle> {
    plot.components.draw_all(
        &[LEGEND, RANGESELECTOR, SLIDERS, UPDATEMENUS, COLORBAR],
        &mut plot.graph,
    )?;
    Ok(plot.graph.completions.settle())
}

/// Clears the shared GL canvas, if the chart has one.
pub fn clear_gl_canvases(graph: &mut Graph) {
    graph.clear_gl_canvas();
}

/// Draws the scene of every subplot holding a visible, non-empty GL trace.
///
/// The canvas must have been cleared before: scenes draw on top of what is there.
fn draw_regl_scenes(graph: &mut Graph) {
    let full = &mut graph.full_layout;
    if !full.has_regl() {
        return;
    }
    let mut ids: SmallVec<[SubplotId; 4]> = SmallVec::new();
    for cd in &graph.calcdata {
        let regl = full
            .trace_module(cd.info.index)
            .is_some_and(|m| m.categories().regl);
        if regl && cd.info.visible && !cd.is_empty() && !ids.contains(&cd.info.subplot) {
            ids.push(cd.info.subplot);
        }
    }
    for id in ids {
        if let Some(scene) = full.plots.get_mut(&id).and_then(|p| p.scene.as_mut()) {
            tracing::trace!(subplot = %id, "redrawing GL scene");
            scene.draw();
        }
    }
}

/// Lets every layer-tree module restyle the traces it drew.
fn style_traces(graph: &mut Graph) -> Result<()> {
    let full = &graph.full_layout;
    for &id in full.subplot_ids() {
        let Some(plot) = full.plot(id)?.layers.plot else {
            continue;
        };
        let mut remaining = select_subplot_calcdata(&graph.calcdata, id, None);
        for module in full.modules.iter().filter(|m| m.categories().svg) {
            let (mine, rest) = get_module_calcdata(&full.modules, &remaining, module.plotter());
            remaining = rest;
            if mine.is_empty() {
                continue;
            }
            if let Some(layer) = graph.layers.child(plot, &module.layer_class()) {
                module.plotter().style(&mut graph.layers, layer, &mine)?;
            }
        }
    }
    Ok(())
}
