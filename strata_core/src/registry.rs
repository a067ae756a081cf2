// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The axis registry for one layout computation.
//!
//! Built from the topology's axis lists plus the user's declarations. After the defaults are
//! filled in, the registry resolves the relations between axes: which counter axis each one is
//! anchored to, which axis is canonical for an overlay chain, and on which subplot an axis
//! draws its own line and ticks.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::axis::{Anchor, Axis, Side};
use crate::error::{Error, Result};
use crate::id::{AxisId, AxisLetter, SubplotId};
use crate::input::{AxisInput, LayoutInput};
use crate::topology::SubplotTopology;

/// Owns every [`Axis`] of the current layout, ordered by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisRegistry {
    axes: BTreeMap<AxisId, Axis>,
}

impl AxisRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry for `topology`, applying the declarations found in `layout`.
    pub fn build(layout: &LayoutInput, topology: &SubplotTopology) -> Self {
        let mut registry = Self::new();
        for id in topology.axis_ids() {
            let mut axis = Axis::new(id);
            if let Some(input) = layout.axis(&id.attr_name()) {
                apply_input(&mut axis, input);
            }
            registry.axes.insert(id, axis);
        }
        registry.resolve(topology);
        registry
    }

    /// Inserts (or replaces) an axis. Call [`AxisRegistry::resolve`] afterwards.
    pub fn insert(&mut self, axis: Axis) {
        self.axes.insert(axis.id, axis);
    }

    /// Looks up an axis.
    pub fn get(&self, id: AxisId) -> Result<&Axis> {
        self.axes.get(&id).ok_or(Error::UnknownAxis(id))
    }

    /// Looks up an axis for mutation.
    pub fn get_mut(&mut self, id: AxisId) -> Result<&mut Axis> {
        self.axes.get_mut(&id).ok_or(Error::UnknownAxis(id))
    }

    /// Resolves an axis id given as text (as found in user input).
    pub fn get_from_str(&self, id: &str) -> Result<&Axis> {
        self.get(AxisId::parse(id)?)
    }

    /// Whether the axis exists.
    pub fn contains(&self, id: AxisId) -> bool {
        self.axes.contains_key(&id)
    }

    /// Number of axes.
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    /// Whether there are no axes.
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// All axes, x axes first, each letter in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Axis> + '_ {
        self.axes.values()
    }

    /// All axes, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Axis> + '_ {
        self.axes.values_mut()
    }

    /// All axis ids in order.
    pub fn ids(&self) -> Vec<AxisId> {
        self.axes.keys().copied().collect()
    }

    /// Axes of one letter.
    pub fn list(&self, letter: AxisLetter) -> impl Iterator<Item = &Axis> + '_ {
        self.axes.values().filter(move |a| a.letter() == letter)
    }

    /// Resolves anchors, overlay chains, counter axes and main subplots.
    pub fn resolve(&mut self, topology: &SubplotTopology) {
        let ids = self.ids();

        for id in &ids {
            let (anchor, overlaying) = {
                let ax = &self.axes[id];
                (ax.anchor, ax.overlaying)
            };
            let anchor_axis = match anchor {
                Anchor::Axis(a) if self.contains(a) => Some(a),
                _ => None,
            };
            let overlaying = overlaying.filter(|o| self.contains(*o));
            if let Some(ax) = self.axes.get_mut(id) {
                ax.anchor_axis = anchor_axis;
                ax.overlaying = overlaying;
            }
        }

        for id in &ids {
            let main = self.follow_overlays(*id);
            let main_domain = self.axes[&main].domain;
            if let Some(ax) = self.axes.get_mut(id) {
                ax.main_axis = main;
                if main != *id {
                    ax.domain = main_domain;
                }
            }
        }

        for ax in self.axes.values_mut() {
            ax.counter_axes.clear();
        }
        for sp in &topology.cartesian {
            if let Some(ax) = self.axes.get_mut(&sp.x) {
                push_unique(&mut ax.counter_axes, sp.y);
            }
            if let Some(ax) = self.axes.get_mut(&sp.y) {
                push_unique(&mut ax.counter_axes, sp.x);
            }
        }

        for id in &ids {
            let main_subplot = self.find_main_subplot(*id, topology);
            if let Some(ax) = self.axes.get_mut(id) {
                ax.main_subplot = main_subplot;
            }
        }
    }

    /// Walks `overlaying` links to the root axis. Cycles stop at the first repeated axis.
    fn follow_overlays(&self, id: AxisId) -> AxisId {
        let mut current = id;
        for _ in 0..self.axes.len() {
            match self.axes.get(&current).and_then(|a| a.overlaying) {
                Some(next) if next != id => current = next,
                _ => break,
            }
        }
        current
    }

    fn find_main_subplot(&self, id: AxisId, topology: &SubplotTopology) -> Option<SubplotId> {
        let ax = self.axes.get(&id)?;
        let is_x = ax.letter() == AxisLetter::X;
        let pair = |counter: AxisId| {
            if is_x {
                SubplotId::new(id, counter)
            } else {
                SubplotId::new(counter, id)
            }
        };

        let anchor_id = self
            .axes
            .get(&ax.main_axis)
            .and_then(|main| main.anchor_axis)
            .and_then(|anchor| self.axes.get(&anchor))
            .map(|anchor| anchor.main_axis);

        if let Some(anchor_id) = anchor_id {
            let candidate = pair(anchor_id);
            if topology.contains(candidate) {
                return Some(candidate);
            }
        }

        let mut next_best = None;
        for &counter in &ax.counter_axes {
            let candidate = pair(counter);
            if next_best.is_none() {
                next_best = Some(candidate);
            }
            let overlays_anchor = self
                .axes
                .get(&counter)
                .is_some_and(|c| anchor_id.is_some() && c.overlaying == anchor_id);
            if overlays_anchor {
                return Some(candidate);
            }
        }
        next_best
    }
}

fn apply_input(axis: &mut Axis, input: &AxisInput) {
    let letter = axis.letter();

    if let Some([d0, d1]) = input.domain {
        let d0 = d0.clamp(0.0, 1.0);
        let d1 = d1.clamp(0.0, 1.0);
        if d0 < d1 {
            axis.domain = [d0, d1];
        } else {
            tracing::warn!(axis = %axis.id, d0, d1, "ignoring empty domain");
        }
    }

    if let Some(range) = input.range {
        axis.range = range;
        axis.autorange = crate::axis::AutorangeMode::Off;
    }
    if let Some(autorange) = input.autorange {
        axis.autorange = autorange;
    }

    match input.anchor.as_deref() {
        None => {}
        Some("free") => axis.anchor = Anchor::Free,
        Some(text) => match AxisId::parse(text) {
            Ok(id) if id.letter() == letter.counter() => axis.anchor = Anchor::Axis(id),
            _ => tracing::warn!(axis = %axis.id, anchor = text, "ignoring invalid anchor"),
        },
    }

    if let Some(text) = input.overlaying.as_deref() {
        match AxisId::parse(text) {
            Ok(id) if id.letter() == letter && id != axis.id => axis.overlaying = Some(id),
            _ => tracing::warn!(axis = %axis.id, overlaying = text, "ignoring invalid overlaying"),
        }
    }

    if let Some(side) = input.side {
        let fits = match letter {
            AxisLetter::X => matches!(side, Side::Bottom | Side::Top),
            AxisLetter::Y => matches!(side, Side::Left | Side::Right),
        };
        if fits {
            axis.side = side;
        }
    }

    if let Some(position) = input.position {
        axis.position = position.clamp(0.0, 1.0);
    }
    if let Some(showline) = input.showline {
        axis.showline = showline;
    }
    if let Some(linewidth) = input.linewidth {
        axis.linewidth = linewidth.max(0.0);
    }
    if let Some(linecolor) = input.linecolor {
        axis.linecolor = linecolor;
    }
    if let Some(mirror) = input.mirror {
        axis.mirror = mirror;
    }
    if let Some(ticks) = input.ticks {
        axis.ticks = ticks;
    }
    if let Some(layer) = input.layer {
        axis.layer = layer;
    }
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::axis::AutorangeMode;
    use crate::input::TraceInput;

    fn build(layout: &LayoutInput, traces: &[TraceInput]) -> AxisRegistry {
        let topology = SubplotTopology::build(layout, traces).unwrap();
        AxisRegistry::build(layout, &topology)
    }

    #[test]
    fn lookups_report_unknown_axes() {
        let reg = build(&LayoutInput::default(), &[TraceInput::new("scatter")]);
        assert!(reg.get(AxisId::X).is_ok(), "default x axis exists");
        assert_eq!(reg.get(AxisId::x(4)).unwrap_err(), Error::UnknownAxis(AxisId::x(4)));
        assert!(reg.get_from_str("x1").is_err(), "malformed id");
    }

    #[test]
    fn explicit_range_turns_autorange_off() {
        let layout = LayoutInput::default()
            .with_axis("xaxis", AxisInput::new().with_range([0.0, 5.0]))
            .with_axis(
                "yaxis",
                AxisInput::new()
                    .with_range([0.0, 5.0])
                    .with_autorange(AutorangeMode::Reversed),
            );
        let reg = build(&layout, &[TraceInput::new("scatter")]);
        assert_eq!(reg.get(AxisId::X).unwrap().autorange, AutorangeMode::Off);
        assert_eq!(reg.get(AxisId::Y).unwrap().autorange, AutorangeMode::Reversed);
    }

    #[test]
    fn overlay_axes_resolve_to_their_main_axis() {
        let layout = LayoutInput::default()
            .with_axis("yaxis", AxisInput::new().with_domain([0.2, 0.8]))
            .with_axis(
                "yaxis2",
                AxisInput::new()
                    .with_overlaying("y")
                    .with_side(Side::Right)
                    .with_anchor("x"),
            );
        let traces = [
            TraceInput::new("scatter"),
            TraceInput::new("scatter").with_axes("x", "y2"),
        ];
        let reg = build(&layout, &traces);
        let y2 = reg.get(AxisId::y(2)).unwrap();
        assert_eq!(y2.main_axis, AxisId::Y, "overlay points at y");
        assert_eq!(y2.domain, [0.2, 0.8], "overlay shares the main domain");
        assert_eq!(y2.main_subplot, Some(SubplotId::new(AxisId::X, AxisId::y(2))));
        let x = reg.get(AxisId::X).unwrap();
        assert_eq!(x.main_subplot, Some(SubplotId::XY), "x draws on its anchor subplot");
        assert_eq!(x.counter_axes, [AxisId::Y, AxisId::y(2)]);
    }

    #[test]
    fn overlay_cycles_do_not_loop() {
        let layout = LayoutInput::default()
            .with_axis("xaxis", AxisInput::new().with_overlaying("x2"))
            .with_axis("xaxis2", AxisInput::new().with_overlaying("x"));
        let reg = build(&layout, &[TraceInput::new("scatter")]);
        let x = reg.get(AxisId::X).unwrap();
        assert!(
            x.main_axis == AxisId::X || x.main_axis == AxisId::x(2),
            "main axis stays inside the cycle"
        );
    }

    #[test]
    fn free_axes_have_no_anchor_axis() {
        let layout = LayoutInput::default().with_axis(
            "yaxis2",
            AxisInput::new().with_anchor("free").with_position(0.1),
        );
        let reg = build(&layout, &[TraceInput::new("scatter").with_axes("x", "y2")]);
        let y2 = reg.get(AxisId::y(2)).unwrap();
        assert_eq!(y2.anchor_axis, None);
        assert_eq!(y2.main_subplot, Some(SubplotId::new(AxisId::X, AxisId::y(2))));
    }
}
