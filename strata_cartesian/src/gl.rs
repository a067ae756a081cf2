// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts for GL-backed drawing.
//!
//! GL traces do not draw into the layer tree. They render into a canvas shared by every GL
//! trace of the chart, one [`GlScene`] per subplot. Since clearing the canvas wipes every
//! scene at once, scenes are only ever redrawn as a batch, right after a clear.

/// A GL scene bound to one subplot.
pub trait GlScene {
    /// Redraws the whole scene from its current buffers.
    fn draw(&mut self);

    /// Releases GPU resources. The scene is dropped afterwards.
    fn destroy(&mut self);
}

/// The canvas shared by every GL scene of a chart.
pub trait GlCanvas {
    /// Clears the whole canvas.
    fn clear(&mut self);
}

/// Viewpoint of a 3D scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub eye: [f64; 3],
    /// Look-at point.
    pub center: [f64; 3],
    /// Up direction.
    pub up: [f64; 3],
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: [1.25, 1.25, 1.25],
            center: [0.0, 0.0, 0.0],
            up: [0.0, 0.0, 1.0],
        }
    }
}

/// A 3D scene whose viewpoint follows the layout.
pub trait CameraScene {
    /// Moves the viewpoint.
    fn set_camera(&mut self, camera: &Camera);
}
