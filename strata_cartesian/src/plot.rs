// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatching calcdata to trace modules, one subplot at a time.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use strata_core::{
    AxisRegistry, CalcTrace, Completions, Error, LayerKind, LayerTree, Result, SubplotId,
};

use crate::constants::{allows_clip_on_axis_false, layer_priority};
use crate::full_layout::PlotInfo;
use crate::graph::Graph;
use crate::module::{PlotCall, TraceModule, TracePlotter, Transition};

/// Draws the traces of every cartesian subplot.
///
/// With `traces` set only those trace indices are redrawn, along with traces drawn on a
/// carpet and the trace preceding a listed `tonext*` fill on the same subplot. `None` redraws
/// everything and removes layers of modules no longer in use.
pub fn plot(
    graph: &mut Graph,
    traces: Option<&[usize]>,
    transition: Option<&Transition>,
) -> Result<()> {
    let full = &mut graph.full_layout;
    for &id in &full.topology.cartesian {
        let cd_subplot = select_subplot_calcdata(&graph.calcdata, id, traces);
        let info = full.plots.get_mut(&id).ok_or(Error::UnknownSubplot(id))?;
        plot_one(
            &mut graph.layers,
            info,
            &full.axes,
            &full.modules,
            cd_subplot,
            transition,
            &mut graph.completions,
        )?;
    }
    Ok(())
}

/// Picks the calcdata drawn on `subplot`, in declaration order.
pub fn select_subplot_calcdata<'a>(
    calcdata: &'a [CalcTrace],
    subplot: SubplotId,
    traces: Option<&[usize]>,
) -> Vec<&'a CalcTrace> {
    let mut out: Vec<&CalcTrace> = Vec::new();
    let mut previous: Option<&CalcTrace> = None;
    for cd in calcdata.iter().filter(|cd| cd.info.subplot == subplot) {
        let listed = traces.is_none_or(|t| t.contains(&cd.info.index)) || cd.info.carpet.is_some();
        if listed {
            if let Some(prev) = previous
                && cd.info.fill.is_to_next()
                && !out.iter().any(|c| core::ptr::eq(*c, prev))
            {
                out.push(prev);
            }
            out.push(cd);
        }
        previous = Some(cd);
    }
    out
}

/// Splits visible calcdata into the traces drawn by `plotter` and the rest.
///
/// Invisible traces and traces of unknown types end up in neither list.
pub fn get_module_calcdata<'a>(
    modules: &[Arc<TraceModule>],
    calcdata: &[&'a CalcTrace],
    plotter: &Arc<dyn TracePlotter>,
) -> (Vec<&'a CalcTrace>, Vec<&'a CalcTrace>) {
    let mut mine = Vec::new();
    let mut rest = Vec::new();
    for &cd in calcdata {
        if !cd.info.visible {
            continue;
        }
        let Some(module) = modules.iter().find(|m| m.name() == cd.info.trace_type) else {
            continue;
        };
        if module.uses(plotter) {
            mine.push(cd);
        } else {
            rest.push(cd);
        }
    }
    (mine, rest)
}

struct LayerDatum<'a> {
    priority: i32,
    class: String,
    plotter: Arc<dyn TracePlotter>,
    calcdata: Vec<&'a CalcTrace>,
}

/// Draws one subplot.
///
/// Every layer-tree module claims its traces by plotter identity, so a plotter shared by
/// several trace types draws all of them in one call. Module layers are joined by class and
/// painted in trace layer priority order. GL modules draw afterwards, without a layer.
fn plot_one(
    layers: &mut LayerTree,
    plotinfo: &mut PlotInfo,
    axes: &AxisRegistry,
    modules: &[Arc<TraceModule>],
    cd_subplot: Vec<&CalcTrace>,
    transition: Option<&Transition>,
    completions: &mut Completions,
) -> Result<()> {
    let plot = plotinfo
        .layers
        .plot
        .ok_or(Error::UnknownSubplot(plotinfo.id))?;

    let mut remaining = cd_subplot;
    let mut layer_data: Vec<LayerDatum<'_>> = Vec::new();
    for module in modules.iter().filter(|m| m.categories().svg) {
        let (mine, rest) = get_module_calcdata(modules, &remaining, module.plotter());
        remaining = rest;
        if !mine.is_empty() {
            let class = module.layer_class();
            layer_data.push(LayerDatum {
                priority: layer_priority(&class),
                class,
                plotter: Arc::clone(module.plotter()),
                calcdata: mine,
            });
        }
    }
    layer_data.sort_by_key(|d| d.priority);

    let keys: Vec<&str> = layer_data.iter().map(|d| d.class.as_str()).collect();
    let plan = layers.join(plot, "mlayer", &keys)?;
    let joined = layers.apply(plot, LayerKind::Group, "mlayer", &plan)?;
    for (class, layer) in &joined {
        layers.add_class(*layer, class)?;
    }
    let order: Vec<_> = joined.iter().map(|(_, layer)| *layer).collect();
    layers.order(plot, &order)?;

    for (datum, (_, layer)) in layer_data.iter().zip(&joined) {
        tracing::trace!(
            subplot = %plotinfo.id,
            layer = datum.class.as_str(),
            traces = datum.calcdata.len(),
            "plotting module layer"
        );
        datum.plotter.plot(PlotCall {
            layers: &mut *layers,
            plotinfo: &mut *plotinfo,
            axes,
            calcdata: &datum.calcdata,
            layer: Some(*layer),
            transition,
            completions: &mut *completions,
        })?;
        if !allows_clip_on_axis_false(&datum.class) {
            let clip = plotinfo.layer_clip_id.clone();
            layers.update(*layer, |a| a.clip_path = clip)?;
        }
    }

    for module in modules
        .iter()
        .filter(|m| m.categories().gl && !m.categories().svg)
    {
        let (mine, _) = get_module_calcdata(modules, &remaining, module.plotter());
        module.plotter().plot(PlotCall {
            layers: &mut *layers,
            plotinfo: &mut *plotinfo,
            axes,
            calcdata: &mine,
            layer: None,
            transition,
            completions: &mut *completions,
        })?;
    }
    Ok(())
}
