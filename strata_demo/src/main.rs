// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draws a two-subplot chart with `strata`, redraws it twice and dumps the layer tree as SVG.
//!
//! After each pass the demo prints how many layers entered, changed and exited: an unchanged
//! replot only updates, dropping a subplot removes exactly its layers.

mod svg;

use futures::executor::block_on;
use kurbo::{BezPath, Point};
use peniko::Color;
use peniko::color::palette::css;
use strata_cartesian::{Categories, ModuleRegistry, PlotCall, TracePlotter};
use strata_core::{AxisInput, LayerDiff, LayerKind, LayoutInput, TitleInput, TraceInput};
use strata_redraw::{EditFlags, Plot};

const PALETTE: [Color; 3] = [
    Color::from_rgb8(0x1f, 0x77, 0xb4),
    Color::from_rgb8(0xff, 0x7f, 0x0e),
    Color::from_rgb8(0x2c, 0xa0, 0x2c),
];

/// Draws each trace as one polyline.
#[derive(Debug)]
struct LinePlotter;

impl TracePlotter for LinePlotter {
    fn plot(&self, call: PlotCall<'_>) -> strata_core::Result<()> {
        let Some(layer) = call.layer else {
            return Ok(());
        };
        let xa = call.axes.get(call.plotinfo.xaxis())?;
        let ya = call.axes.get(call.plotinfo.yaxis())?;
        let keys: Vec<&str> = call.calcdata.iter().map(|c| c.info.uid.as_str()).collect();
        let plan = call.layers.join(layer, "trace", &keys)?;
        let joined = call.layers.apply(layer, LayerKind::Path, "trace", &plan)?;
        for ((_, node), cd) in joined.iter().zip(call.calcdata) {
            let mut path = BezPath::new();
            for (i, p) in cd.points.iter().enumerate() {
                let pt = Point::new(xa.l2p(p.x), ya.l2p(p.y));
                if i == 0 {
                    path.move_to(pt);
                } else {
                    path.line_to(pt);
                }
            }
            let color = PALETTE[cd.info.index % PALETTE.len()];
            call.layers.update(*node, |a| {
                a.path = Some(path);
                a.stroke = Some(color);
                a.stroke_width = Some(2.0);
            })?;
        }
        Ok(())
    }
}

fn report(label: &str, plot: &mut Plot) {
    let (mut enter, mut update, mut exit) = (0, 0, 0);
    for diff in plot.graph.layers.take_diffs() {
        match diff {
            LayerDiff::Enter { .. } => enter += 1,
            LayerDiff::Update { .. } => update += 1,
            LayerDiff::Exit { .. } => exit += 1,
        }
    }
    println!(
        "{label}: {} subplot(s), {enter} entered, {update} updated, {exit} exited",
        plot.graph.full_layout.subplot_ids().len()
    );
}

fn write_svg(plot: &Plot, path: &str) -> std::io::Result<()> {
    let full = &plot.graph.full_layout;
    std::fs::write(
        path,
        svg::to_svg_string(&plot.graph.layers, full.width, full.height),
    )?;
    println!("wrote {path}");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut modules = ModuleRegistry::new();
    modules.register_plotter("scatter", Categories::svg(), LinePlotter);
    let mut plot = Plot::new("demo", modules)?;

    let layout = LayoutInput::new()
        .with_size(800.0, 400.0)
        .with_colors(css::WHITE, Color::from_rgb8(0xe5, 0xec, 0xf6))
        .with_title(TitleInput::new("strata demo"))
        .with_axis("xaxis", AxisInput::new().with_domain([0.0, 0.45]).with_line(1.0))
        .with_axis("yaxis", AxisInput::new().with_line(1.0))
        .with_axis(
            "xaxis2",
            AxisInput::new()
                .with_domain([0.55, 1.0])
                .with_anchor("y2")
                .with_line(1.0),
        )
        .with_axis("yaxis2", AxisInput::new().with_anchor("x2").with_line(1.0));
    let data = vec![
        TraceInput::new("scatter").with_xy([1.0, 2.0, 3.0, 4.0], [3.0, 1.0, 2.0, 4.0]),
        TraceInput::new("scatter").with_xy([1.0, 2.0, 3.0, 4.0], [2.0, 2.5, 1.5, 3.0]),
        TraceInput::new("scatter")
            .with_xy([0.0, 10.0, 20.0], [100.0, 300.0, 200.0])
            .with_axes("x2", "y2"),
    ];

    block_on(plot.new_plot(layout, data)?);
    report("initial draw", &mut plot);
    write_svg(&plot, "strata_demo.svg")?;

    block_on(plot.edit(EditFlags {
        plot: true,
        ..EditFlags::default()
    }))?;
    report("unchanged replot", &mut plot);

    plot.data_mut().truncate(2);
    for name in ["xaxis", "xaxis2", "yaxis2"] {
        plot.layout_mut().axes.remove(name);
    }
    block_on(plot.edit(EditFlags {
        calc: true,
        ..EditFlags::default()
    }))?;
    report("second subplot dropped", &mut plot);
    write_svg(&plot, "strata_demo_single.svg")?;
    Ok(())
}
