// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart-wide settings that are not part of the layout.

/// Settings of a [`Plot`](crate::Plot).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Draw line widths as given instead of rounding them to whole pixels.
    pub static_plot: bool,
    /// Autorange padding as a fraction of the data span, added on each side.
    pub autorange_padding: f64,
    /// Font size of the main title, used to turn its em shifts into pixels.
    pub title_font_size: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            static_plot: false,
            autorange_padding: 0.05,
            title_font_size: 16.8,
        }
    }
}

impl Config {
    /// Sets the static plot flag.
    pub fn with_static_plot(mut self, static_plot: bool) -> Self {
        self.static_plot = static_plot;
        self
    }

    /// Sets the autorange padding.
    pub fn with_autorange_padding(mut self, padding: f64) -> Self {
        self.autorange_padding = padding;
        self
    }

    /// Sets the main title's font size.
    pub fn with_title_font_size(mut self, size: f64) -> Self {
        self.title_font_size = size;
        self
    }
}
