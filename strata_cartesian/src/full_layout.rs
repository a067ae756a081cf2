// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The computed layout: every default filled in, every subplot known.
//!
//! A [`FullLayout`] is rebuilt from the user input whenever the layout or the data changes.
//! Per-subplot state that has to survive a rebuild ([`PlotInfo`]: layer ids, clip ids, the GL
//! scene) is taken over from the previous full layout for every subplot that still exists.
//! Whatever is left in the previous layout afterwards belongs to vanished subplots, and
//! [`clean`](crate::clean) tears it down.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;
use peniko::Color;
use peniko::color::palette::css;
use smallvec::SmallVec;
use strata_core::{
    Axis, AxisId, AxisRegistry, Constraints, Error, LayerId, LayoutInput, Margin, PlotSize,
    Result, SubplotId, SubplotTopology, TitleInput, TraceInput,
};

use crate::gl::GlScene;
use crate::module::{ModuleRegistry, TraceModule};

/// Layer ids of one subplot. Overlays point into their main subplot's containers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubplotLayers {
    /// `g.subplot` group of a main subplot.
    pub plotgroup: Option<LayerId>,
    /// Trace layer.
    pub plot: Option<LayerId>,
    /// Container for the trace layers of overlays.
    pub overplot: Option<LayerId>,
    /// Grid lines.
    pub gridlayer: Option<LayerId>,
    /// Zero lines.
    pub zerolinelayer: Option<LayerId>,
    /// X axis line path.
    pub xlines: Option<LayerId>,
    /// Y axis line path.
    pub ylines: Option<LayerId>,
    /// X tick labels.
    pub xaxislayer: Option<LayerId>,
    /// Y tick labels.
    pub yaxislayer: Option<LayerId>,
    /// Overlay axis lines below traces.
    pub overlines_below: Option<LayerId>,
    /// Overlay axis lines above traces.
    pub overlines_above: Option<LayerId>,
    /// Overlay tick labels below traces.
    pub overaxes_below: Option<LayerId>,
    /// Overlay tick labels above traces.
    pub overaxes_above: Option<LayerId>,
    /// Shapes drawn below traces.
    pub shapelayer: Option<LayerId>,
    /// Images drawn below traces.
    pub imagelayer: Option<LayerId>,
    /// Background rectangle, when the subplot needs one.
    pub bg: Option<LayerId>,
    /// Drag handles, in the chart-wide dragger layer.
    pub draglayer: Option<LayerId>,
}

/// Per-subplot state that lives across layout rebuilds.
pub struct PlotInfo {
    /// Subplot id.
    pub id: SubplotId,
    /// The main subplot this one overlays.
    pub mainplot: Option<SubplotId>,
    /// Subplots overlaying this one.
    pub overlays: SmallVec<[SubplotId; 2]>,
    /// Layer ids.
    pub layers: SubplotLayers,
    /// Id of the data-area clip path.
    pub clip_id: Option<String>,
    /// Clip applied to trace layer groups instead of the whole plot layer.
    pub layer_clip_id: Option<String>,
    /// Some trace on this subplot may draw outside of the data area.
    pub has_clip_on_axis_false: bool,
    /// GL scene of this subplot.
    pub scene: Option<Box<dyn GlScene>>,
}

impl core::fmt::Debug for PlotInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlotInfo")
            .field("id", &self.id)
            .field("mainplot", &self.mainplot)
            .field("overlays", &self.overlays)
            .field("layers", &self.layers)
            .field("clip_id", &self.clip_id)
            .field("layer_clip_id", &self.layer_clip_id)
            .field("has_clip_on_axis_false", &self.has_clip_on_axis_false)
            .field("scene", &self.scene.is_some())
            .finish()
    }
}

impl PlotInfo {
    /// Fresh state for a new subplot.
    pub fn new(id: SubplotId) -> Self {
        Self {
            id,
            mainplot: None,
            overlays: SmallVec::new(),
            layers: SubplotLayers::default(),
            clip_id: None,
            layer_clip_id: None,
            has_clip_on_axis_false: false,
            scene: None,
        }
    }

    /// X axis id.
    pub fn xaxis(&self) -> AxisId {
        self.id.x
    }

    /// Y axis id.
    pub fn yaxis(&self) -> AxisId {
        self.id.y
    }

    /// Destroys and drops the GL scene. Returns whether there was one.
    pub fn destroy_scene(&mut self) -> bool {
        match self.scene.take() {
            Some(mut scene) => {
                scene.destroy();
                tracing::debug!(subplot = %self.id, "destroyed GL scene");
                true
            }
            None => false,
        }
    }
}

/// The computed layout of one chart state.
#[derive(Debug)]
pub struct FullLayout {
    /// Chart width.
    pub width: f64,
    /// Chart height.
    pub height: f64,
    /// Margins.
    pub margin: Margin,
    /// Plot area.
    pub size: PlotSize,
    /// Chart background.
    pub paper_bgcolor: Color,
    /// Data area background.
    pub plot_bgcolor: Color,
    /// Main title.
    pub title: TitleInput,
    /// Subplots and axis lists.
    pub topology: SubplotTopology,
    /// Axes.
    pub axes: AxisRegistry,
    /// Match and scale-anchor groups.
    pub constraints: Constraints,
    /// Per-subplot state, keyed by subplot id.
    pub plots: HashMap<SubplotId, PlotInfo>,
    /// Modules of the visible traces, in order of first use.
    pub modules: Vec<Arc<TraceModule>>,
    /// Whether cartesian subplots are drawn at all.
    pub has_cartesian: bool,
    /// Whether any module draws into the GL canvas.
    pub has_gl: bool,
    trace_modules: Vec<Option<Arc<TraceModule>>>,
}

impl Default for FullLayout {
    fn default() -> Self {
        let margin = Margin::default();
        Self {
            width: 0.0,
            height: 0.0,
            margin,
            size: PlotSize::default(),
            paper_bgcolor: css::WHITE,
            plot_bgcolor: css::WHITE,
            title: TitleInput::default(),
            topology: SubplotTopology::default(),
            axes: AxisRegistry::new(),
            constraints: Constraints::default(),
            plots: HashMap::new(),
            modules: Vec::new(),
            has_cartesian: false,
            has_gl: false,
            trace_modules: Vec::new(),
        }
    }
}

impl FullLayout {
    /// Computes the full layout for `layout` and `data`.
    ///
    /// Visible traces must use a registered trace type. Subplot state is taken over from
    /// `old` for every subplot that still exists.
    pub fn supply_defaults(
        layout: &LayoutInput,
        data: &[TraceInput],
        registry: &ModuleRegistry,
        old: Option<&mut Self>,
    ) -> Result<Self> {
        let mut trace_modules = Vec::with_capacity(data.len());
        let mut modules: Vec<Arc<TraceModule>> = Vec::new();
        for (index, trace) in data.iter().enumerate() {
            let module = registry.get(&trace.trace_type).cloned();
            if trace.visible {
                let Some(module) = &module else {
                    return Err(Error::UnknownTraceType {
                        index,
                        trace_type: trace.trace_type.clone(),
                    });
                };
                if !modules.iter().any(|m| Arc::ptr_eq(m, module)) {
                    modules.push(Arc::clone(module));
                }
            }
            trace_modules.push(module);
        }

        let any_visible = data.iter().any(|t| t.visible);
        let declares_axes = layout
            .axes
            .keys()
            .any(|k| AxisId::from_attr_name(k).is_some());
        let has_cartesian =
            !any_visible || declares_axes || modules.iter().any(|m| m.categories().cartesian);
        let has_gl = modules.iter().any(|m| m.categories().gl);

        let topology = if has_cartesian {
            SubplotTopology::build(layout, data)?
        } else {
            SubplotTopology::default()
        };
        let axes = AxisRegistry::build(layout, &topology);
        let constraints = Constraints::from_layout(layout)?;

        let mut old_plots = old.map(|o| &mut o.plots);
        let mut plots = HashMap::with_capacity(topology.cartesian.len());
        for &id in &topology.cartesian {
            let mut info = old_plots
                .as_mut()
                .and_then(|p| p.remove(&id))
                .unwrap_or_else(|| PlotInfo::new(id));
            info.mainplot = None;
            info.overlays.clear();
            info.has_clip_on_axis_false = data.iter().any(|t| {
                t.visible
                    && !t.cliponaxis
                    && AxisId::parse(&t.xaxis).is_ok_and(|x| x == id.x)
                    && AxisId::parse(&t.yaxis).is_ok_and(|y| y == id.y)
            });
            plots.insert(id, info);
        }

        tracing::debug!(
            subplots = topology.cartesian.len(),
            axes = axes.len(),
            modules = modules.len(),
            "supplied layout defaults"
        );

        Ok(Self {
            width: layout.width,
            height: layout.height,
            margin: layout.margin,
            size: PlotSize::arrange(layout.width, layout.height, &layout.margin),
            paper_bgcolor: layout.paper_bgcolor,
            plot_bgcolor: layout.plot_bgcolor,
            title: layout.title.clone(),
            topology,
            axes,
            constraints,
            plots,
            modules,
            has_cartesian,
            has_gl,
            trace_modules,
        })
    }

    /// The module of trace `index`, when its type is registered.
    pub fn trace_module(&self, index: usize) -> Option<&Arc<TraceModule>> {
        self.trace_modules.get(index).and_then(Option::as_ref)
    }

    /// Whether a module with this name is in use.
    pub fn has_module(&self, name: &str) -> bool {
        self.modules.iter().any(|m| m.name() == name)
    }

    /// Whether any module in use takes part in the batched GL redraw.
    pub fn has_regl(&self) -> bool {
        self.modules.iter().any(|m| m.categories().regl)
    }

    /// Looks up a subplot.
    pub fn plot(&self, id: SubplotId) -> Result<&PlotInfo> {
        self.plots.get(&id).ok_or(Error::UnknownSubplot(id))
    }

    /// Looks up a subplot for mutation.
    pub fn plot_mut(&mut self, id: SubplotId) -> Result<&mut PlotInfo> {
        self.plots.get_mut(&id).ok_or(Error::UnknownSubplot(id))
    }

    /// The x and y axes of a subplot.
    pub fn subplot_axes(&self, id: SubplotId) -> Result<(&Axis, &Axis)> {
        Ok((self.axes.get(id.x)?, self.axes.get(id.y)?))
    }

    /// Data area of a subplot in chart pixels.
    pub fn subplot_rect(&self, id: SubplotId) -> Result<Rect> {
        let (xa, ya) = self.subplot_axes(id)?;
        Ok(Rect::new(
            xa.offset,
            ya.offset,
            xa.offset + xa.length,
            ya.offset + ya.length,
        ))
    }

    /// Subplot ids in draw order.
    pub fn subplot_ids(&self) -> &[SubplotId] {
        &self.topology.cartesian
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::module::{Categories, NoopPlotter};

    fn registry() -> ModuleRegistry {
        let mut reg = ModuleRegistry::new();
        reg.register_plotter("scatter", Categories::svg(), NoopPlotter);
        reg.register_plotter("pie", Categories::default(), NoopPlotter);
        reg
    }

    #[test]
    fn unregistered_visible_trace_types_are_errors() {
        let data = [
            TraceInput::new("scatter"),
            TraceInput::new("sankey").with_visible(false),
            TraceInput::new("treemap"),
        ];
        let err = FullLayout::supply_defaults(&LayoutInput::default(), &data, &registry(), None)
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnknownTraceType {
                index: 2,
                trace_type: "treemap".into()
            }
        );
    }

    #[test]
    fn surviving_subplots_keep_their_state() {
        let reg = registry();
        let layout = LayoutInput::default();
        let data = [
            TraceInput::new("scatter"),
            TraceInput::new("scatter").with_axes("x2", "y2"),
        ];
        let mut old = FullLayout::supply_defaults(&layout, &data, &reg, None).unwrap();
        old.plot_mut(SubplotId::XY).unwrap().clip_id = Some("kept".into());

        let new = FullLayout::supply_defaults(&layout, &data[..1], &reg, Some(&mut old)).unwrap();
        assert_eq!(
            new.plot(SubplotId::XY).unwrap().clip_id.as_deref(),
            Some("kept")
        );
        assert!(!old.plots.contains_key(&SubplotId::XY), "taken over");
        let x2y2 = SubplotId::new(AxisId::x(2), AxisId::y(2));
        assert!(old.plots.contains_key(&x2y2), "vanished subplot stays behind");
    }

    #[test]
    fn non_cartesian_charts_have_no_subplots() {
        let data = [TraceInput::new("pie")];
        let full =
            FullLayout::supply_defaults(&LayoutInput::default(), &data, &registry(), None).unwrap();
        assert!(!full.has_cartesian);
        assert!(full.plots.is_empty());

        let full =
            FullLayout::supply_defaults(&LayoutInput::default(), &[], &registry(), None).unwrap();
        assert!(full.has_cartesian, "an empty chart shows default axes");
        assert_eq!(full.subplot_ids(), [SubplotId::XY]);
    }

    #[test]
    fn clip_on_axis_false_is_tracked_per_subplot() {
        let data = [
            TraceInput::new("scatter").without_clip(),
            TraceInput::new("scatter").with_axes("x2", "y2"),
        ];
        let full =
            FullLayout::supply_defaults(&LayoutInput::default(), &data, &registry(), None).unwrap();
        assert!(full.plot(SubplotId::XY).unwrap().has_clip_on_axis_false);
        let x2y2 = SubplotId::new(AxisId::x(2), AxisId::y(2));
        assert!(!full.plot(x2y2).unwrap().has_clip_on_axis_false);
    }
}
