// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use peniko::color::palette::css;
use strata_core::{
    AxisId, AxisInput, CalcTrace, Fill, LayerId, LayerKind, LayoutInput, PaddedExtent, Result,
    Side, SubplotId, TraceInput, do_autorange_and_constraints,
};

use crate::{
    Categories, FullLayout, GlScene, Graph, ModuleRegistry, PlotCall, TraceModule, TracePlotter,
    clean, draw_framework, plot, shared, style_subplots,
};

type Calls = Rc<RefCell<Vec<Vec<usize>>>>;

/// Records the trace indices of every call and keeps one `g.trace` per trace.
struct Painter {
    calls: Calls,
}

impl TracePlotter for Painter {
    fn plot(&self, call: PlotCall<'_>) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(call.calcdata.iter().map(|c| c.info.index).collect());
        let Some(layer) = call.layer else {
            return Ok(());
        };
        let keys: Vec<&str> = call.calcdata.iter().map(|c| c.info.uid.as_str()).collect();
        let plan = call.layers.join(layer, "trace", &keys)?;
        call.layers.apply(layer, LayerKind::Group, "trace", &plan)?;
        Ok(())
    }
}

struct Scene {
    destroyed: Rc<Cell<usize>>,
}

impl GlScene for Scene {
    fn draw(&mut self) {}

    fn destroy(&mut self) {
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

/// Creates a scene on the first subplot it has traces on.
struct GlPainter {
    destroyed: Rc<Cell<usize>>,
}

impl TracePlotter for GlPainter {
    fn plot(&self, call: PlotCall<'_>) -> Result<()> {
        if !call.calcdata.is_empty() && call.plotinfo.scene.is_none() {
            call.plotinfo.scene = Some(Box::new(Scene {
                destroyed: Rc::clone(&self.destroyed),
            }));
        }
        Ok(())
    }
}

struct Fixture {
    graph: Graph,
    registry: ModuleRegistry,
    calls: Calls,
    destroyed: Rc<Cell<usize>>,
}

impl Fixture {
    fn new() -> Self {
        let calls: Calls = Rc::default();
        let destroyed = Rc::new(Cell::new(0));
        let mut registry = ModuleRegistry::new();
        registry
            .register_plotter(
                "scatter",
                Categories::svg(),
                Painter {
                    calls: Rc::clone(&calls),
                },
            )
            .register_plotter(
                "scattergl",
                Categories::regl(),
                GlPainter {
                    destroyed: Rc::clone(&destroyed),
                },
            );
        Self {
            graph: Graph::new("g0").unwrap(),
            registry,
            calls,
            destroyed,
        }
    }

    fn draw(&mut self, layout: &LayoutInput, data: &[TraceInput]) {
        let graph = &mut self.graph;
        let mut old = core::mem::take(&mut graph.full_layout);
        graph.full_layout =
            FullLayout::supply_defaults(layout, data, &self.registry, Some(&mut old)).unwrap();
        graph.calcdata = CalcTrace::calc_all(data).unwrap();
        clean(graph, &mut old);
        draw_framework(graph).unwrap();
        let full = &mut graph.full_layout;
        do_autorange_and_constraints(
            &mut full.axes,
            &full.size,
            &graph.calcdata,
            &PaddedExtent::default(),
            &full.constraints,
        )
        .unwrap();
        style_subplots(graph).unwrap();
        plot(graph, None, None).unwrap();
    }

    fn subplot_group(&self, id: SubplotId) -> Option<LayerId> {
        let cartesian = self.graph.roots.cartesianlayer;
        self.graph.layers.child(cartesian, &id.to_string())
    }

    fn plot_layer(&self, id: SubplotId) -> LayerId {
        self.graph.full_layout.plot(id).unwrap().layers.plot.unwrap()
    }
}

fn x2y2() -> SubplotId {
    SubplotId::new(AxisId::x(2), AxisId::y(2))
}

#[test]
fn surviving_subplots_keep_their_layers_and_vanished_ones_release_their_scene() {
    let mut f = Fixture::new();
    let layout = LayoutInput::default();
    f.draw(
        &layout,
        &[
            TraceInput::new("scatter").with_xy([0.0, 1.0], [1.0, 2.0]),
            TraceInput::new("scattergl")
                .with_axes("x2", "y2")
                .with_xy([0.0], [1.0]),
        ],
    );
    let xy_group = f.subplot_group(SubplotId::XY).unwrap();
    let xy_plot = f.plot_layer(SubplotId::XY);
    assert!(f.subplot_group(x2y2()).is_some());
    assert!(f.graph.full_layout.plot(x2y2()).unwrap().scene.is_some());

    f.draw(
        &layout,
        &[TraceInput::new("scatter").with_xy([0.0, 1.0], [1.0, 2.0])],
    );
    assert_eq!(f.subplot_group(SubplotId::XY), Some(xy_group), "identity kept");
    assert_eq!(f.plot_layer(SubplotId::XY), xy_plot);
    assert!(f.subplot_group(x2y2()).is_none(), "vanished subplot removed");
    assert_eq!(f.destroyed.get(), 1, "scene destroyed exactly once");

    let roots = f.graph.roots;
    assert!(f.graph.layers.child(roots.draggers, "x2y2").is_none());
    assert!(
        f.graph
            .layers
            .child_by_dom_id(roots.clips, "clipg0x2y2plot")
            .is_none()
    );
    assert_eq!(f.graph.layers.count_class(roots.cartesianlayer, "subplot"), 1);
}

#[test]
fn redrawing_the_same_chart_changes_no_structure() {
    let mut f = Fixture::new();
    let layout = LayoutInput::default().with_colors(css::WHITE, css::LIGHT_GRAY);
    let data = [TraceInput::new("scatter").with_xy([1.0, 3.0], [2.0, 4.0])];
    f.draw(&layout, &data);
    let nodes = f.graph.layers.len();
    f.graph.layers.take_diffs();

    f.draw(&layout, &data);
    assert_eq!(f.graph.layers.len(), nodes);
    assert!(
        f.graph
            .layers
            .take_diffs()
            .iter()
            .all(|d| matches!(d, strata_core::LayerDiff::Update { .. })),
        "no enters or exits on an unchanged redraw"
    );
}

fn side_by_side(second_x: [f64; 2]) -> LayoutInput {
    LayoutInput::default()
        .with_axis("xaxis", AxisInput::new().with_domain([0.0, 0.5]))
        .with_axis("xaxis2", AxisInput::new().with_domain(second_x).with_anchor("y2"))
        .with_axis("yaxis2", AxisInput::new().with_anchor("x2"))
}

fn two_subplots() -> [TraceInput; 2] {
    [
        TraceInput::new("scatter"),
        TraceInput::new("scatter").with_axes("x2", "y2"),
    ]
}

#[test]
fn equal_opaque_colors_need_no_background() {
    let mut f = Fixture::new();
    f.draw(&side_by_side([0.5, 1.0]), &two_subplots());
    let root = f.graph.layers.root();
    assert_eq!(f.graph.layers.count_class(root, "bg"), 0);
}

#[test]
fn differing_colors_put_lower_backgrounds_in_the_shared_layer() {
    let mut f = Fixture::new();
    let layout = side_by_side([0.5, 1.0]).with_colors(css::WHITE, css::LIGHT_GRAY);
    f.draw(&layout, &two_subplots());
    let bglayer = f.graph.roots.bglayer;
    assert_eq!(f.graph.layers.children_with_class(bglayer, "bg").len(), 2);

    let bg = f.graph.full_layout.plot(SubplotId::XY).unwrap().layers.bg.unwrap();
    let attrs = f.graph.layers.attrs(bg).unwrap();
    assert_eq!(attrs.fill, Some(css::LIGHT_GRAY));
    assert_eq!(attrs.stroke_width, Some(0.0));
    let rect = attrs.rect.unwrap();
    assert_eq!((rect.x0, rect.y0), (80.0, 100.0));
    assert_eq!(rect.width(), 270.0, "half of the 540 pixel plot width");
}

#[test]
fn overlapping_subplots_get_their_own_background() {
    let mut f = Fixture::new();
    f.draw(&side_by_side([0.25, 1.0]), &two_subplots());
    let root = f.graph.layers.root();
    assert_eq!(f.graph.layers.count_class(root, "bg"), 1, "only the overlapping one");

    let group = f.subplot_group(x2y2()).unwrap();
    let bg = f.graph.full_layout.plot(x2y2()).unwrap().layers.bg.unwrap();
    assert_eq!(f.graph.layers.children(group).first(), Some(&bg), "painted first");
    assert!(f.graph.full_layout.plot(SubplotId::XY).unwrap().layers.bg.is_none());

    f.draw(&side_by_side([0.5, 1.0]), &two_subplots());
    assert_eq!(f.graph.layers.count_class(root, "bg"), 0, "removed once no longer needed");
}

#[test]
fn overlays_draw_into_their_main_subplot() {
    let mut f = Fixture::new();
    let layout = LayoutInput::default()
        .with_colors(css::WHITE, css::LIGHT_GRAY)
        .with_axis(
            "yaxis2",
            AxisInput::new().with_overlaying("y").with_side(Side::Right),
        );
    let xy2 = SubplotId::new(AxisId::X, AxisId::y(2));
    f.draw(
        &layout,
        &[
            TraceInput::new("scatter"),
            TraceInput::new("scatter").with_axes("x", "y2"),
        ],
    );

    let main = f.graph.full_layout.plot(SubplotId::XY).unwrap();
    assert_eq!(main.overlays.as_slice(), [xy2]);
    let overlay = f.graph.full_layout.plot(xy2).unwrap();
    assert_eq!(overlay.mainplot, Some(SubplotId::XY));
    assert!(overlay.layers.bg.is_none(), "overlays never get a background");

    let overplot = main.layers.overplot.unwrap();
    assert_eq!(f.graph.layers.children(overplot), [overlay.layers.plot.unwrap()]);
    assert_eq!(overlay.layers.gridlayer, main.layers.gridlayer, "grid is shared");
    let grid = main.layers.gridlayer.unwrap();
    let classes: Vec<&str> = f
        .graph
        .layers
        .children(grid)
        .iter()
        .map(|&c| f.graph.layers.get(c).unwrap().class())
        .collect();
    assert_eq!(classes, ["x", "y", "y2"], "sorted by axis id");

    let bglayer = f.graph.roots.bglayer;
    assert_eq!(f.graph.layers.children_with_class(bglayer, "bg").len(), 1);
}

#[test]
fn a_listed_fill_to_next_redraws_its_predecessor() {
    let mut f = Fixture::new();
    let data = [
        TraceInput::new("scatter").with_xy([0.0], [1.0]),
        TraceInput::new("scatter")
            .with_fill(Fill::ToNextY)
            .with_xy([0.0], [2.0]),
    ];
    f.draw(&LayoutInput::default(), &data);
    f.calls.borrow_mut().clear();

    plot(&mut f.graph, Some(&[1][..]), None).unwrap();
    assert_eq!(*f.calls.borrow(), vec![vec![0, 1]]);
}

#[test]
fn a_plotter_shared_by_two_types_is_called_once_per_subplot() {
    let calls: Calls = Rc::default();
    let mut f = Fixture::new();
    let bars = shared(Painter {
        calls: Rc::clone(&calls),
    });
    f.registry
        .register(TraceModule::new("bar", Categories::svg(), Arc::clone(&bars)))
        .register(
            TraceModule::new("histogram", Categories::svg(), bars).with_layer_name("barlayer"),
        );
    f.draw(
        &LayoutInput::default(),
        &[TraceInput::new("bar"), TraceInput::new("histogram")],
    );
    assert_eq!(*calls.borrow(), vec![vec![0, 1]], "one call with both traces");

    let plot_layer = f.plot_layer(SubplotId::XY);
    assert_eq!(f.graph.layers.count_class(plot_layer, "mlayer"), 1);
    assert_eq!(f.graph.layers.count_class(plot_layer, "trace"), 2);
}

#[test]
fn module_layers_are_painted_in_priority_order() {
    let mut f = Fixture::new();
    let calls: Calls = Rc::default();
    f.registry.register_plotter(
        "bar",
        Categories::svg(),
        Painter {
            calls: Rc::clone(&calls),
        },
    );
    f.draw(
        &LayoutInput::default(),
        &[TraceInput::new("scatter"), TraceInput::new("bar")],
    );
    let plot_layer = f.plot_layer(SubplotId::XY);
    let layers = &f.graph.layers;
    let order: Vec<bool> = layers
        .children(plot_layer)
        .iter()
        .map(|&c| layers.get(c).unwrap().has_class("barlayer"))
        .collect();
    assert_eq!(order, [true, false], "bars below scatter");

    f.draw(&LayoutInput::default(), &[TraceInput::new("bar")]);
    let layers = &f.graph.layers;
    assert_eq!(layers.count_class(plot_layer, "scatterlayer"), 0, "unused layer removed");
    assert_eq!(layers.count_class(plot_layer, "barlayer"), 1);
}

#[test]
fn removing_every_cartesian_trace_purges_all_subplots() {
    let mut f = Fixture::new();
    f.registry
        .register_plotter("pie", Categories::default(), crate::NoopPlotter);
    f.draw(&LayoutInput::default(), &two_subplots());
    f.draw(&LayoutInput::default(), &[TraceInput::new("pie")]);
    let roots = f.graph.roots;
    assert_eq!(f.graph.layers.count_class(roots.cartesianlayer, "subplot"), 0);
    assert_eq!(f.graph.layers.count_class(roots.clips, "axesclip"), 0);
    assert!(f.graph.layers.children(roots.draggers).is_empty());
}
