// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core data model for `strata` cartesian charts.
//!
//! This crate holds the parts of a chart that do not depend on how anything is drawn:
//! - **Ids** for axes and subplots ([`AxisId`], [`SubplotId`]).
//! - **Topology**: deriving the full subplot set from partial input ([`SubplotTopology`]).
//! - **Axes**: the per-layout [`AxisRegistry`] and its resolved anchor/overlay relations.
//! - **Constraints**: autorange, scale anchors and match groups ([`do_autorange_and_constraints`]).
//! - **Layers**: a generational arena of keyed drawing layers that records
//!   [`LayerDiff`]s, used as the opaque rendering surface by the cartesian crate.
//! - **Completions**: deferred draw completions joined at the end of a pass.
//!
//! Rendering of individual traces is out of scope; trace modules only see the layer ids
//! they are handed.

#![no_std]

extern crate alloc;

mod autorange;
mod axis;
mod calc;
mod completion;
mod constraints;
mod error;
mod id;
mod input;
mod layer;
mod layout;
mod registry;
mod topology;

pub use autorange::{AutorangeRoutine, PaddedExtent};
pub use axis::{Anchor, AutorangeMode, Axis, AxisLayer, Mirror, Side};
pub use calc::{CalcPoint, CalcTrace, TraceInfo};
pub use completion::{Completions, Settle, settled};
pub use constraints::{
    Constraints, MatchGroup, ScaleGroup, do_autorange_and_constraints, enforce_scale_groups,
    match_groups, merge_match_ranges, scale_groups,
};
pub use error::{Error, Result};
pub use id::{AxisId, AxisLetter, SubplotId};
pub use input::{
    AxisInput, Fill, LayoutInput, TitleInput, TitlePad, TitleRef, TitleXAnchor, TitleYAnchor,
    TraceInput,
};
pub use layer::{JoinPlan, LayerAttrs, LayerDiff, LayerId, LayerKind, LayerNode, LayerTree};
pub use layout::{Margin, PlotSize};
pub use registry::AxisRegistry;
pub use topology::SubplotTopology;
