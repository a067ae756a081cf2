// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host surface a chart is mounted on.

use peniko::Color;
use strata_cartesian::Graph;

/// What the host does with chart-wide paint and size.
///
/// The layer tree does not cover the chart background or its outer size; the host applies
/// those to whatever element or window the chart lives in.
pub trait RenderSurface {
    /// Paints the chart background.
    fn set_background(&mut self, graph: &Graph, color: Color);

    /// Resizes the chart.
    fn size(&mut self, width: f64, height: f64);
}

/// A surface that ignores everything, for headless rendering.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedSurface;

impl RenderSurface for DetachedSurface {
    fn set_background(&mut self, _graph: &Graph, _color: Color) {}

    fn size(&mut self, _width: f64, _height: f64) {}
}
