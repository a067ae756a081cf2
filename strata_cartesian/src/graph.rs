// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart state threaded through every pass.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use strata_core::{CalcTrace, Completions, LayerId, LayerKind, LayerTree, Result};

use crate::full_layout::FullLayout;
use crate::gl::{Camera, CameraScene, GlCanvas};

/// Chart-wide layer groups, created once per chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RootLayers {
    /// Definitions (clip paths live in `clips`).
    pub defs: LayerId,
    /// Clip path definitions.
    pub clips: LayerId,
    /// Backgrounds of subplots that do not overlap anything drawn before them.
    pub bglayer: LayerId,
    /// One `g.subplot` per main subplot.
    pub cartesianlayer: LayerId,
    /// Titles, legend and other decorations.
    pub infolayer: LayerId,
    /// Per-subplot drag layers, on top of everything.
    pub draggers: LayerId,
}

impl RootLayers {
    /// Creates (or finds) the root groups, in paint order.
    pub fn create(tree: &mut LayerTree) -> Result<Self> {
        let root = tree.root();
        let defs = tree.ensure_single(root, LayerKind::Group, "defs")?;
        let clips = tree.ensure_single(defs, LayerKind::Group, "clips")?;
        let bglayer = tree.ensure_single(root, LayerKind::Group, "bglayer")?;
        let cartesianlayer = tree.ensure_single(root, LayerKind::Group, "cartesianlayer")?;
        let infolayer = tree.ensure_single(root, LayerKind::Group, "infolayer")?;
        let draggers = tree.ensure_single(root, LayerKind::Group, "draglayer")?;
        Ok(Self {
            defs,
            clips,
            bglayer,
            cartesianlayer,
            infolayer,
            draggers,
        })
    }
}

/// A 3D scene and the viewpoint the layout asks for.
pub struct CameraBinding {
    /// The scene.
    pub scene: Box<dyn CameraScene>,
    /// Requested viewpoint.
    pub camera: Camera,
}

impl core::fmt::Debug for CameraBinding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CameraBinding")
            .field("camera", &self.camera)
            .finish_non_exhaustive()
    }
}

/// Everything a chart owns between passes.
pub struct Graph {
    /// The persistent layer tree.
    pub layers: LayerTree,
    /// Chart-wide layer groups.
    pub roots: RootLayers,
    /// The current full layout.
    pub full_layout: FullLayout,
    /// Calculated traces, in declaration order.
    pub calcdata: Vec<CalcTrace>,
    /// Completions registered during the current pass.
    pub completions: Completions,
    /// The shared GL canvas, if the host provides one.
    pub gl_canvas: Option<Box<dyn GlCanvas>>,
    /// 3D scenes following the layout's camera.
    pub cameras: Vec<CameraBinding>,
    /// Chart id, part of every clip path id.
    pub uid: String,
    /// Static charts draw line widths as given, without crisp rounding.
    pub static_plot: bool,
}

impl core::fmt::Debug for Graph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Graph")
            .field("uid", &self.uid)
            .field("layers", &self.layers.len())
            .field("full_layout", &self.full_layout)
            .field("calcdata", &self.calcdata.len())
            .field("completions", &self.completions)
            .field("gl_canvas", &self.gl_canvas.is_some())
            .field("cameras", &self.cameras)
            .field("static_plot", &self.static_plot)
            .finish_non_exhaustive()
    }
}

impl Graph {
    /// Creates an empty chart.
    pub fn new(uid: impl Into<String>) -> Result<Self> {
        let mut layers = LayerTree::new();
        let roots = RootLayers::create(&mut layers)?;
        Ok(Self {
            layers,
            roots,
            full_layout: FullLayout::default(),
            calcdata: Vec::new(),
            completions: Completions::new(),
            gl_canvas: None,
            cameras: Vec::new(),
            uid: uid.into(),
            static_plot: false,
        })
    }

    /// Attaches the shared GL canvas.
    pub fn with_gl_canvas(mut self, canvas: impl GlCanvas + 'static) -> Self {
        self.gl_canvas = Some(Box::new(canvas));
        self
    }

    /// Disables crisp rounding of line widths.
    pub fn with_static_plot(mut self, static_plot: bool) -> Self {
        self.static_plot = static_plot;
        self
    }

    /// Binds a 3D scene to a camera.
    pub fn add_camera(&mut self, scene: impl CameraScene + 'static, camera: Camera) {
        self.cameras.push(CameraBinding {
            scene: Box::new(scene),
            camera,
        });
    }

    /// Clears the shared GL canvas, if any.
    pub fn clear_gl_canvas(&mut self) {
        if let Some(canvas) = self.gl_canvas.as_mut() {
            canvas.clear();
        }
    }
}
