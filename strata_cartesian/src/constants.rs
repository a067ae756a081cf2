// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer class conventions for cartesian subplots.
//!
//! Trace modules draw into one `mlayer` group per module inside a subplot's `plot` layer. The
//! groups are painted in the order of [`TRACE_LAYER_CLASSES`], so images end up below
//! heatmaps, bars below boxes, and scatter traces on top of everything else.

/// Trace layer classes in paint order, bottom first.
pub const TRACE_LAYER_CLASSES: [&str; 13] = [
    "imagelayer",
    "heatmaplayer",
    "contourcarpetlayer",
    "contourlayer",
    "funnellayer",
    "waterfalllayer",
    "barlayer",
    "carpetlayer",
    "violinlayer",
    "boxlayer",
    "ohlclayer",
    "scattercarpetlayer",
    "scatterlayer",
];

/// Trace layer classes whose traces may opt out of clipping to the data area.
///
/// These layers clip each trace themselves, so the layer group is left unclipped.
pub const CLIP_ON_AXIS_FALSE_CLASSES: [&str; 4] =
    ["scatterlayer", "barlayer", "funnellayer", "waterfalllayer"];

/// Paint priority of a trace layer class; unknown classes sort first.
pub fn layer_priority(class: &str) -> i32 {
    TRACE_LAYER_CLASSES
        .iter()
        .position(|c| *c == class)
        .and_then(|i| i32::try_from(i).ok())
        .unwrap_or(-1)
}

/// Whether the layer group of `class` is left unclipped.
pub fn allows_clip_on_axis_false(class: &str) -> bool {
    CLIP_ON_AXIS_FALSE_CLASSES.contains(&class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_classes_sort_before_known_ones() {
        assert_eq!(layer_priority("imagelayer"), 0);
        assert_eq!(layer_priority("scatterlayer"), 12);
        assert_eq!(layer_priority("sankeylayer"), -1);
        assert!(layer_priority("barlayer") < layer_priority("boxlayer"));
    }

    #[test]
    fn only_listed_classes_skip_the_layer_clip() {
        assert!(allows_clip_on_axis_false("barlayer"));
        assert!(!allows_clip_on_axis_false("heatmaplayer"));
        assert!(!allows_clip_on_axis_false("mystery"));
    }
}
