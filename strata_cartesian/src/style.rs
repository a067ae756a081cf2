// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subplot styling: backgrounds, clip paths, plot translation and axis lines.
//!
//! Runs after [`draw_framework`](crate::draw_framework) and after the axes have their final
//! pixel offsets, on every full or layout-only redraw.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{BezPath, Rect, Vec2};
use peniko::Color;
use strata_core::{
    Axis, AxisId, AxisLetter, AxisRegistry, LayerKind, PlotSize, Result, Side,
    SubplotId,
};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::framework::plot_clip_id;
use crate::graph::Graph;

/// Rounds a line width so strokes land on whole pixels.
///
/// Zero or non-finite widths fall back to 1. Static charts keep widths as given.
pub fn crisp_round(width: f64, static_plot: bool) -> f64 {
    if width == 0.0 || !width.is_finite() {
        return 1.0;
    }
    if static_plot {
        return width;
    }
    if width < 1.0 {
        return 1.0;
    }
    width.round()
}

fn is_opaque(color: Color) -> bool {
    color.components[3] >= 1.0
}

fn overlapping_domain(x: [f64; 2], y: [f64; 2], domains: &[([f64; 2], [f64; 2])]) -> bool {
    domains.iter().any(|(ex, ey)| {
        let x_overlaps = !(ex[0] >= x[1] || ex[1] <= x[0]);
        x_overlaps && ey[0] < y[1] && ey[1] > y[0]
    })
}

/// Styles every subplot: backgrounds, clip paths, translation, axis lines, axis clip paths.
pub fn style_subplots(graph: &mut Graph) -> Result<()> {
    draw_backgrounds(graph)?;
    set_plot_clips(graph)?;
    draw_axis_lines(graph)?;
    make_clip_paths(graph)
}

/// Gives each main subplot the background it needs, and no more.
///
/// A subplot whose domain does not overlap any subplot handled before it draws its background
/// in the shared background layer, below everything, and skips it entirely when paper and
/// plot colors are the same opaque color. A subplot overlapping an earlier one needs its
/// background inside its own group to hide what lies below. Overlays never get one.
pub fn draw_backgrounds(graph: &mut Graph) -> Result<()> {
    let roots = graph.roots;
    let tree = &mut graph.layers;
    let full = &mut graph.full_layout;
    let pad = full.size.p;
    let no_need_for_bg = is_opaque(full.paper_bgcolor)
        && is_opaque(full.plot_bgcolor)
        && full.paper_bgcolor == full.plot_bgcolor;

    let mut lower_ids: Vec<SubplotId> = Vec::new();
    let mut background_ids: Vec<SubplotId> = Vec::new();
    let mut lower_domains: Vec<([f64; 2], [f64; 2])> = Vec::new();

    for id in full.topology.cartesian.clone() {
        let (xdomain, ydomain) = {
            let (xa, ya) = full.subplot_axes(id)?;
            (xa.domain, ya.domain)
        };
        let info = full.plot_mut(id)?;
        if info.mainplot.is_some() {
            if let Some(bg) = info.layers.bg.take() {
                tree.remove(bg);
            }
            continue;
        }
        let Some(plotgroup) = info.layers.plotgroup else {
            continue;
        };
        if overlapping_domain(xdomain, ydomain, &lower_domains) {
            let bg = tree.ensure_first(plotgroup, LayerKind::Rect, "bg")?;
            info.layers.bg = Some(bg);
            background_ids.push(id);
        } else {
            tree.remove_class(plotgroup, "bg");
            info.layers.bg = None;
            lower_domains.push((xdomain, ydomain));
            if !no_need_for_bg {
                lower_ids.push(id);
                background_ids.push(id);
            }
        }
    }

    let keys: Vec<String> = lower_ids.iter().map(ToString::to_string).collect();
    let plan = tree.join(roots.bglayer, "bg", &keys)?;
    let joined = tree.apply(roots.bglayer, LayerKind::Rect, "bg", &plan)?;
    for (&id, (_, layer)) in lower_ids.iter().zip(&joined) {
        full.plot_mut(id)?.layers.bg = Some(*layer);
    }
    let order: Vec<_> = joined.iter().map(|(_, layer)| *layer).collect();
    tree.order(roots.bglayer, &order)?;

    let color = full.plot_bgcolor;
    for &id in &background_ids {
        let rect = {
            let (xa, ya) = full.subplot_axes(id)?;
            Rect::new(
                xa.offset - pad,
                ya.offset - pad,
                xa.offset + xa.length + pad,
                ya.offset + ya.length + pad,
            )
        };
        if let Some(bg) = full.plot(id)?.layers.bg {
            tree.update(bg, |a| {
                a.rect = Some(rect);
                a.fill = Some(color);
                a.stroke_width = Some(0.0);
            })?;
        }
    }
    tracing::debug!(
        backgrounds = background_ids.len(),
        lower = lower_ids.len(),
        "drew subplot backgrounds"
    );
    Ok(())
}

/// Creates each subplot's data-area clip path, translates its plot layer into place and
/// decides whether the plot layer or the trace layers get clipped.
pub fn set_plot_clips(graph: &mut Graph) -> Result<()> {
    let clips = graph.roots.clips;
    let tree = &mut graph.layers;
    let full = &mut graph.full_layout;

    for id in full.topology.cartesian.clone() {
        let (offset, extent) = {
            let (xa, ya) = full.subplot_axes(id)?;
            (
                Vec2::new(xa.offset, ya.offset),
                Rect::new(0.0, 0.0, xa.length, ya.length),
            )
        };
        let clip_id = plot_clip_id(&graph.uid, id);
        let clip = match tree.child_by_dom_id(clips, &clip_id) {
            Some(clip) => clip,
            None => {
                let clip = tree.append(clips, LayerKind::ClipPath, "plotclip")?;
                let dom_id = clip_id.clone();
                tree.update(clip, |a| a.dom_id = Some(dom_id))?;
                clip
            }
        };
        tree.update(clip, |a| a.rect = Some(extent))?;

        let info = full.plot_mut(id)?;
        let (plot_clip, layer_clip) = if info.has_clip_on_axis_false {
            (None, Some(clip_id.clone()))
        } else {
            (Some(clip_id.clone()), None)
        };
        if let Some(plot) = info.layers.plot {
            tree.update(plot, |a| {
                a.translate = Some(offset);
                a.clip_path = plot_clip;
            })?;
        }
        info.clip_id = Some(clip_id);
        info.layer_clip_id = layer_clip;
    }
    Ok(())
}

/// Position of an axis line on the given side of the data area.
///
/// Anchored lines sit `pad` plus half their width outside the counter axis' data area. Free
/// axes sit at their paper `position`.
pub fn line_position(
    ax: &Axis,
    counter: Option<&Axis>,
    side: Side,
    size: &PlotSize,
    static_plot: bool,
) -> f64 {
    let half = crisp_round(ax.linewidth, static_plot) / 2.0;
    let pad = size.p;
    match (ax.letter(), counter) {
        (AxisLetter::X, None) => size.t + size.h * (1.0 - ax.position) + half % 1.0,
        (AxisLetter::X, Some(c)) if side == Side::Top => c.offset - pad - half,
        (AxisLetter::X, Some(c)) => c.offset + c.length + pad + half,
        (AxisLetter::Y, None) => size.l + size.w * ax.position + half % 1.0,
        (AxisLetter::Y, Some(c)) if side == Side::Right => c.offset + c.length + pad + half,
        (AxisLetter::Y, Some(c)) => c.offset - pad - half,
    }
}

/// Whether `counter` draws a line on `side` of `ax`'s subplot.
fn shows_line_this_side(
    ax: &Axis,
    side: Side,
    counter: &Axis,
    axes: &AxisRegistry,
    static_plot: bool,
) -> bool {
    if !counter.showline || crisp_round(ax.linewidth, static_plot) == 0.0 {
        return false;
    }
    if counter.mirror.is_all() {
        return true;
    }
    let Some(anchor) = counter.anchor_axis.and_then(|id| axes.get(id).ok()) else {
        return false;
    };
    let i = side.from_bl();
    if counter.side == side {
        return anchor.domain[i] == ax.domain[i];
    }
    counter.mirror.is_on() && anchor.domain[1 - i] == ax.domain[1 - i]
}

/// Width of the line meeting `side` of `ax`, or 0 when none does.
///
/// Looks at `counter` first, then at every axis sharing its main axis.
fn counter_line_width(
    ax: &Axis,
    side: Side,
    counter: &Axis,
    axes: &AxisRegistry,
    static_plot: bool,
) -> f64 {
    if shows_line_this_side(ax, side, counter, axes, static_plot) {
        return crisp_round(counter.linewidth, static_plot);
    }
    axes.iter()
        .find(|other| {
            other.main_axis == counter.main_axis
                && shows_line_this_side(ax, side, other, axes, static_plot)
        })
        .map(|other| crisp_round(other.linewidth, static_plot))
        .unwrap_or(0.0)
}

fn horizontal(path: &mut BezPath, x0: f64, x1: f64, y: f64) {
    path.move_to((x0, y));
    path.line_to((x1, y));
}

fn vertical(path: &mut BezPath, x: f64, y0: f64, y1: f64) {
    path.move_to((x, y0));
    path.line_to((x, y1));
}

/// Builds the axis line paths of one subplot. Returns `(path, stroke width, stroke)` per letter,
/// `None` when the axis draws neither lines nor ticks here.
fn subplot_line_paths(
    id: SubplotId,
    axes: &AxisRegistry,
    size: &PlotSize,
    static_plot: bool,
) -> Result<[Option<(BezPath, f64, Color)>; 2]> {
    let xa = axes.get(id.x)?;
    let ya = axes.get(id.y)?;
    let pad = size.p;
    let anchor = |ax: &Axis| ax.anchor_axis.and_then(|a| axes.get(a).ok());
    let stroke = |ax: &Axis| {
        (
            crisp_round(ax.linewidth, static_plot),
            if ax.showline {
                ax.linecolor
            } else {
                Color::TRANSPARENT
            },
        )
    };

    let mut out = [None, None];

    if xa.shows_lines_or_ticks(id) {
        let left = counter_line_width(xa, Side::Left, ya, axes, static_plot);
        let right = counter_line_width(xa, Side::Right, ya, axes, static_plot);
        let x0 = xa.offset - if left != 0.0 { pad + left } else { 0.0 };
        let x1 = xa.offset + xa.length + if right != 0.0 { pad + right } else { 0.0 };
        let mut path = BezPath::new();
        if xa.showline && xa.main_subplot == Some(id) {
            let anchor_axis = anchor(xa);
            let main = line_position(xa, anchor_axis, xa.side, size, static_plot);
            match anchor_axis {
                None => horizontal(&mut path, xa.offset, xa.offset + xa.length, main),
                Some(_) => {
                    horizontal(&mut path, x0, x1, main);
                    if xa.mirror.is_on() {
                        let mirror =
                            line_position(xa, anchor_axis, xa.side.opposite(), size, static_plot);
                        horizontal(&mut path, x0, x1, mirror);
                    }
                }
            }
        }
        let extra = xa.anchor_axis.is_none() || xa.main_subplot != Some(id);
        if extra && xa.showline && xa.mirror.is_all() {
            let bottom = line_position(xa, Some(ya), Side::Bottom, size, static_plot);
            let top = line_position(xa, Some(ya), Side::Top, size, static_plot);
            horizontal(&mut path, x0, x1, bottom);
            horizontal(&mut path, x0, x1, top);
        }
        let (width, color) = stroke(xa);
        out[0] = Some((path, width, color));
    }

    if ya.shows_lines_or_ticks(id) {
        let bottom = counter_line_width(ya, Side::Bottom, xa, axes, static_plot);
        let top = counter_line_width(ya, Side::Top, xa, axes, static_plot);
        let y1 = ya.offset + ya.length + if bottom != 0.0 { pad } else { 0.0 };
        let y0 = ya.offset - if top != 0.0 { pad } else { 0.0 };
        let mut path = BezPath::new();
        if ya.showline && ya.main_subplot == Some(id) {
            let anchor_axis = anchor(ya);
            let main = line_position(ya, anchor_axis, ya.side, size, static_plot);
            match anchor_axis {
                None => vertical(&mut path, main, ya.offset, ya.offset + ya.length),
                Some(_) => {
                    vertical(&mut path, main, y0, y1);
                    if ya.mirror.is_on() {
                        let mirror =
                            line_position(ya, anchor_axis, ya.side.opposite(), size, static_plot);
                        vertical(&mut path, mirror, y0, y1);
                    }
                }
            }
        }
        let extra = ya.anchor_axis.is_none() || ya.main_subplot != Some(id);
        if extra && ya.showline && ya.mirror.is_all() {
            let left = line_position(ya, Some(xa), Side::Left, size, static_plot);
            let right = line_position(ya, Some(xa), Side::Right, size, static_plot);
            vertical(&mut path, left, y0, y1);
            vertical(&mut path, right, y0, y1);
        }
        let (width, color) = stroke(ya);
        out[1] = Some((path, width, color));
    }

    Ok(out)
}

/// Draws the x and y axis lines of every subplot.
///
/// Anchored x lines extend past the data area by `pad` plus the width of a y line meeting them,
/// so corners come out crisp. Y lines only extend by `pad`. Free axes span exactly the data
/// area. Mirror lines go on the opposite side; `all` mirrors repeat on every subplot.
pub fn draw_axis_lines(graph: &mut Graph) -> Result<()> {
    let tree = &mut graph.layers;
    let full = &graph.full_layout;
    for id in full.topology.cartesian.clone() {
        let info = full.plot(id)?;
        let paths = subplot_line_paths(id, &full.axes, &full.size, graph.static_plot)?;
        for (lines, drawn) in [info.layers.xlines, info.layers.ylines]
            .into_iter()
            .zip(paths)
        {
            let Some(lines) = lines else { continue };
            match drawn {
                Some((path, width, color)) => {
                    tree.update(lines, |a| {
                        a.path = Some(path);
                        a.stroke_width = Some(width);
                        a.stroke = Some(color);
                    })?;
                }
                None => {
                    tree.update(lines, |a| a.path = Some(BezPath::new()))?;
                }
            }
        }
    }
    Ok(())
}

/// Creates the clip paths tick labels and grid lines are clipped with.
///
/// One per axis pair, plus one per x axis spanning the full chart height and one per y axis
/// spanning the full chart width. Ids are `clip{uid}{xid}{yid}`, where a full-span side
/// contributes an empty id.
pub fn make_clip_paths(graph: &mut Graph) -> Result<()> {
    let clips = graph.roots.clips;
    let full = &graph.full_layout;
    let tree = &mut graph.layers;

    let mut entries: Vec<(Option<AxisId>, Option<AxisId>)> = Vec::new();
    for (i, &x) in full.topology.xaxis.iter().enumerate() {
        entries.push((Some(x), None));
        for &y in &full.topology.yaxis {
            if i == 0 {
                entries.push((None, Some(y)));
            }
            entries.push((Some(x), Some(y)));
        }
    }

    let span = |axis: Option<AxisId>, full_length: f64| -> Result<(f64, f64)> {
        Ok(match axis {
            Some(id) => {
                let ax = full.axes.get(id)?;
                let length = if ax.length != 0.0 { ax.length } else { 1.0 };
                (ax.offset, length)
            }
            None => (0.0, if full_length != 0.0 { full_length } else { 1.0 }),
        })
    };
    let name = |axis: Option<AxisId>| axis.map(|a| a.to_string()).unwrap_or_default();

    let keys: Vec<String> = entries
        .iter()
        .map(|&(x, y)| format!("{}{}", name(x), name(y)))
        .collect();
    let plan = tree.join(clips, "axesclip", &keys)?;
    let joined = tree.apply(clips, LayerKind::ClipPath, "axesclip", &plan)?;
    for (&(x, y), (key, clip)) in entries.iter().zip(&joined) {
        let (x0, w) = span(x, full.width)?;
        let (y0, h) = span(y, full.height)?;
        let dom_id = format!("clip{}{key}", graph.uid);
        tree.update(*clip, |a| {
            a.dom_id = Some(dom_id);
            a.rect = Some(Rect::new(x0, y0, x0 + w, y0 + h));
        })?;
    }
    Ok(())
}
