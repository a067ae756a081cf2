// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconciling the subplot layer groups with the current topology.
//!
//! Every subplot owns one `g.subplot` group under the cartesian layer, keyed by its id plus
//! everything that changes the group's internal structure (axis layers, overlay relations).
//! When that key is unchanged the group and all of its children are reused as they are; when
//! it changes the group is purged and rebuilt from scratch.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;
use strata_core::{
    AxisId, AxisLayer, Constraints, Error, LayerId, LayerKind, LayerTree, Result, SubplotId,
};

use crate::full_layout::{FullLayout, PlotInfo, SubplotLayers};
use crate::graph::{Graph, RootLayers};

/// One entry of the subplot join.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubplotDatum {
    /// Subplot id.
    pub id: SubplotId,
    /// Join key.
    pub key: String,
}

/// Splits the subplots into main subplots and overlays and computes the join keys.
///
/// Main subplots come first, overlays after, each in topology order. Updates `mainplot`
/// and `overlays` of every [`PlotInfo`] on the way.
pub fn make_subplot_data(full_layout: &mut FullLayout) -> Vec<SubplotDatum> {
    let mut regulars = Vec::new();
    let mut overlays = Vec::new();
    for &id in &full_layout.topology.cartesian {
        let main = match (full_layout.axes.get(id.x), full_layout.axes.get(id.y)) {
            (Ok(xa), Ok(ya)) => SubplotId::new(xa.main_axis, ya.main_axis),
            _ => id,
        };
        let is_overlay = main != id && full_layout.plots.contains_key(&main);
        if let Some(info) = full_layout.plots.get_mut(&id) {
            info.overlays.clear();
            info.mainplot = is_overlay.then_some(main);
        }
        if is_overlay {
            overlays.push((id, main));
        } else {
            regulars.push(id);
        }
    }
    for &(id, main) in &overlays {
        if let Some(info) = full_layout.plots.get_mut(&main) {
            info.overlays.push(id);
        }
    }

    regulars
        .into_iter()
        .chain(overlays.into_iter().map(|(id, _)| id))
        .map(|id| {
            let layer = |axis: AxisId| {
                full_layout
                    .axes
                    .get(axis)
                    .map(|a| (a.layer.class_suffix(), a.overlaying))
                    .unwrap_or(("above", None))
            };
            let (xlayer, xover) = layer(id.x);
            let (ylayer, yover) = layer(id.y);
            let mut key = format!(
                "{id},{xlayer},{ylayer},{},{}",
                xover.map(|a| a.to_string()).unwrap_or_default(),
                yover.map(|a| a.to_string()).unwrap_or_default(),
            );
            if let Some(info) = full_layout.plots.get(&id) {
                for overlay in &info.overlays {
                    key.push(',');
                    key.push_str(&overlay.to_string());
                }
            }
            SubplotDatum { id, key }
        })
        .collect()
}

/// Converges the subplot layer groups to the current topology.
pub fn draw_framework(graph: &mut Graph) -> Result<()> {
    let data = make_subplot_data(&mut graph.full_layout);
    let roots = graph.roots;
    let keys: Vec<&str> = data.iter().map(|d| d.key.as_str()).collect();
    let plan = graph.layers.join(roots.cartesianlayer, "subplot", &keys)?;

    purge_subplot_layers(
        &mut graph.layers,
        &roots,
        &graph.uid,
        &graph.full_layout.plots,
        &plan.destroy,
    );
    let joined = graph
        .layers
        .apply(roots.cartesianlayer, LayerKind::Group, "subplot", &plan)?;
    for (datum, (key, layer)) in data.iter().zip(&joined) {
        if plan.create.contains(key) {
            graph.layers.add_class(*layer, &datum.id.to_string())?;
            tracing::debug!(subplot = %datum.id, "created subplot layers");
        }
    }
    let order: Vec<LayerId> = joined.iter().map(|(_, id)| *id).collect();
    graph.layers.order(roots.cartesianlayer, &order)?;

    for (datum, (_, layer)) in data.iter().zip(&joined) {
        let full_layout = &mut graph.full_layout;
        let xlayer = full_layout.axes.get(datum.id.x)?.layer;
        let ylayer = full_layout.axes.get(datum.id.y)?.layer;
        let main_layers = full_layout
            .plot(datum.id)?
            .mainplot
            .map(|main| full_layout.plot(main).map(|p| (main, p.layers)))
            .transpose()?;
        let info = full_layout.plot_mut(datum.id)?;
        info.layers.plotgroup = Some(*layer);
        make_subplot_layer(&mut graph.layers, info, main_layers, xlayer, ylayer)?;
        info.layers.draglayer = Some(graph.layers.ensure_single(
            roots.draggers,
            LayerKind::Group,
            &datum.id.to_string(),
        )?);
    }
    Ok(())
}

/// Builds the fixed set of sub-layers of one subplot.
///
/// A main subplot gets its own groups in paint order: back layer (shapes, images), grid,
/// zero lines, lines and tick labels below traces, traces, overlay traces, then lines and
/// tick labels above traces. An overlay gets no groups of its own; it adds its lines, tick
/// label groups and trace layer to the containers of its main subplot.
pub fn make_subplot_layer(
    tree: &mut LayerTree,
    info: &mut PlotInfo,
    main: Option<(SubplotId, SubplotLayers)>,
    xlayer: AxisLayer,
    ylayer: AxisLayer,
) -> Result<()> {
    let id = info.id;
    let xsuffix = xlayer.class_suffix();
    let ysuffix = ylayer.class_suffix();
    let layers = &mut info.layers;

    match main {
        None => {
            let pg = layers.plotgroup.ok_or(Error::UnknownSubplot(id))?;
            let back = tree.ensure_single(pg, LayerKind::Group, "layer-subplot")?;
            layers.shapelayer = Some(tree.ensure_single(back, LayerKind::Group, "shapelayer")?);
            layers.imagelayer = Some(tree.ensure_single(back, LayerKind::Group, "imagelayer")?);

            layers.gridlayer = Some(tree.ensure_single(pg, LayerKind::Group, "gridlayer")?);
            layers.zerolinelayer =
                Some(tree.ensure_single(pg, LayerKind::Group, "zerolinelayer")?);

            tree.ensure_single(pg, LayerKind::Path, "xlines-below")?;
            tree.ensure_single(pg, LayerKind::Path, "ylines-below")?;
            layers.overlines_below =
                Some(tree.ensure_single(pg, LayerKind::Group, "overlines-below")?);

            tree.ensure_single(pg, LayerKind::Group, "xaxislayer-below")?;
            tree.ensure_single(pg, LayerKind::Group, "yaxislayer-below")?;
            layers.overaxes_below =
                Some(tree.ensure_single(pg, LayerKind::Group, "overaxes-below")?);

            layers.plot = Some(tree.ensure_single(pg, LayerKind::Group, "plot")?);
            layers.overplot = Some(tree.ensure_single(pg, LayerKind::Group, "overplot")?);

            tree.ensure_single(pg, LayerKind::Path, "xlines-above")?;
            tree.ensure_single(pg, LayerKind::Path, "ylines-above")?;
            layers.overlines_above =
                Some(tree.ensure_single(pg, LayerKind::Group, "overlines-above")?);

            tree.ensure_single(pg, LayerKind::Group, "xaxislayer-above")?;
            tree.ensure_single(pg, LayerKind::Group, "yaxislayer-above")?;
            layers.overaxes_above =
                Some(tree.ensure_single(pg, LayerKind::Group, "overaxes-above")?);

            layers.xlines = tree.child(pg, &format!("xlines-{xsuffix}"));
            layers.ylines = tree.child(pg, &format!("ylines-{ysuffix}"));
            layers.xaxislayer = tree.child(pg, &format!("xaxislayer-{xsuffix}"));
            layers.yaxislayer = tree.child(pg, &format!("yaxislayer-{ysuffix}"));
        }
        Some((main_id, main)) => {
            let missing = || Error::UnknownSubplot(main_id);
            let x_id = format!("{id}-x");
            let y_id = format!("{id}-y");

            layers.gridlayer = main.gridlayer;
            layers.zerolinelayer = main.zerolinelayer;

            let overlines_below = main.overlines_below.ok_or_else(missing)?;
            let overaxes_below = main.overaxes_below.ok_or_else(missing)?;
            let overlines_above = main.overlines_above.ok_or_else(missing)?;
            let overaxes_above = main.overaxes_above.ok_or_else(missing)?;
            let overplot = main.overplot.ok_or_else(missing)?;

            let xl_below = tree.ensure_single(overlines_below, LayerKind::Path, &x_id)?;
            let yl_below = tree.ensure_single(overlines_below, LayerKind::Path, &y_id)?;
            let xa_below = tree.ensure_single(overaxes_below, LayerKind::Group, &x_id)?;
            let ya_below = tree.ensure_single(overaxes_below, LayerKind::Group, &y_id)?;

            layers.plot = Some(tree.ensure_single(overplot, LayerKind::Group, &id.to_string())?);

            let xl_above = tree.ensure_single(overlines_above, LayerKind::Path, &x_id)?;
            let yl_above = tree.ensure_single(overlines_above, LayerKind::Path, &y_id)?;
            let xa_above = tree.ensure_single(overaxes_above, LayerKind::Group, &x_id)?;
            let ya_above = tree.ensure_single(overaxes_above, LayerKind::Group, &y_id)?;

            let pick = |layer: AxisLayer, below: LayerId, above: LayerId| match layer {
                AxisLayer::BelowTraces => below,
                AxisLayer::AboveTraces => above,
            };
            layers.xlines = Some(pick(xlayer, xl_below, xl_above));
            layers.ylines = Some(pick(ylayer, yl_below, yl_above));
            layers.xaxislayer = Some(pick(xlayer, xa_below, xa_above));
            layers.yaxislayer = Some(pick(ylayer, ya_below, ya_above));
        }
    }

    if let Some(grid) = layers.gridlayer {
        tree.ensure_single(grid, LayerKind::Group, &id.x.to_string())?;
        tree.ensure_single(grid, LayerKind::Group, &id.y.to_string())?;
        let mut children: Vec<(Option<AxisId>, LayerId)> = tree
            .children(grid)
            .iter()
            .map(|&c| {
                let axis = tree.get(c).and_then(|n| AxisId::parse(n.class()).ok());
                (axis, c)
            })
            .collect();
        children.sort_by(|a, b| match (a.0, b.0) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => core::cmp::Ordering::Less,
            (None, Some(_)) => core::cmp::Ordering::Greater,
            (None, None) => core::cmp::Ordering::Equal,
        });
        let sorted: Vec<LayerId> = children.into_iter().map(|(_, c)| c).collect();
        tree.order(grid, &sorted)?;
    }

    for lines in [layers.xlines, layers.ylines].into_iter().flatten() {
        tree.add_class(lines, "crisp")?;
        tree.update(lines, |a| a.fill = None)?;
    }
    Ok(())
}

/// Removes exiting subplot groups and everything keyed by their ids.
///
/// Trace nodes of overlays whose main subplot was purged are removed as well, since they
/// lived inside the purged group. Axis clip paths are left alone; other subplots use them.
pub fn purge_subplot_layers(
    tree: &mut LayerTree,
    roots: &RootLayers,
    uid: &str,
    plots: &HashMap<SubplotId, PlotInfo>,
    groups: &[LayerId],
) {
    let mut purged = Vec::new();
    for &group in groups {
        let id = tree
            .get(group)
            .and_then(|n| n.classes.get(1))
            .and_then(|c| SubplotId::parse(c).ok());
        tree.remove(group);
        if let Some(id) = id {
            remove_subplot_extras(tree, roots, uid, id);
            tracing::debug!(subplot = %id, "purged subplot layers");
            purged.push(id);
        }
    }

    for info in plots.values() {
        for overlay in info.overlays.iter().filter(|o| purged.contains(o)) {
            if let Some(plot) = plots.get(overlay).and_then(|o| o.layers.plot) {
                remove_descendants_with_class(tree, plot, "trace");
            }
        }
    }
}

/// Removes the drag layer and the data-area clip path of a subplot.
pub fn remove_subplot_extras(tree: &mut LayerTree, roots: &RootLayers, uid: &str, id: SubplotId) {
    tree.remove_class(roots.draggers, &id.to_string());
    if let Some(clip) = tree.child_by_dom_id(roots.clips, &plot_clip_id(uid, id)) {
        tree.remove(clip);
    }
}

/// Id of a subplot's data-area clip path.
pub fn plot_clip_id(uid: &str, id: SubplotId) -> String {
    format!("clip{uid}{id}plot")
}

/// Removes every node below `root` (not `root` itself) carrying `class`.
pub fn remove_descendants_with_class(tree: &mut LayerTree, root: LayerId, class: &str) {
    let victims: Vec<LayerId> = tree
        .descendants(root)
        .into_iter()
        .skip(1)
        .filter(|&d| tree.get(d).is_some_and(|n| n.has_class(class)))
        .collect();
    for victim in victims {
        tree.remove(victim);
    }
}

/// Tears down what the previous layout drew and the new one no longer needs.
///
/// `old` is the previous full layout after [`FullLayout::supply_defaults`] took the state of
/// surviving subplots out of it.
pub fn clean(graph: &mut Graph, old: &mut FullLayout) {
    let roots = graph.roots;
    let tree = &mut graph.layers;
    let new = &mut graph.full_layout;

    if old.has_gl && !new.has_gl {
        for info in old.plots.values_mut().chain(new.plots.values_mut()) {
            info.destroy_scene();
        }
    }

    if !old.topology.xaxis.is_empty() && !old.topology.yaxis.is_empty() {
        for axis in old.topology.axis_ids() {
            if !new.axes.contains(axis) {
                tree.remove_class(roots.infolayer, &format!("g-{axis}title"));
            }
        }
    }

    if old.has_cartesian && !new.has_cartesian {
        let groups = tree.children_with_class(roots.cartesianlayer, "subplot");
        purge_subplot_layers(tree, &roots, &graph.uid, &old.plots, &groups);
        tree.remove_class(roots.clips, "axesclip");
        old.constraints = Constraints::default();
        for info in old.plots.values_mut() {
            info.destroy_scene();
        }
        tracing::debug!("removed all cartesian subplots");
        return;
    }

    for &id in &old.topology.cartesian {
        if new.plots.contains_key(&id) {
            continue;
        }
        let name = id.to_string();
        for class in [name.clone(), format!("{name}-x"), format!("{name}-y")] {
            remove_descendants_with_class(tree, roots.cartesianlayer, &class);
        }
        remove_subplot_extras(tree, &roots, &graph.uid, id);
        if let Some(info) = old.plots.get_mut(&id) {
            info.destroy_scene();
        }
        tracing::debug!(subplot = %id, "removed vanished subplot");
    }
}
