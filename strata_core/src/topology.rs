// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subplot topology: which (x, y) axis pairs get drawn.
//!
//! Traces name the subplots they need directly. Axes declared in the layout without a trace
//! still have to be drawn somewhere, so each one is paired with its anchor (or the default
//! counter axis). The result is deterministic: the same input always produces the same lists,
//! in the same order.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::error::{Error, Result};
use crate::id::{AxisId, AxisLetter, SubplotId};
use crate::input::{LayoutInput, TraceInput};

/// The complete set of cartesian subplots and the axes they use.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubplotTopology {
    /// Subplots in draw order.
    pub cartesian: Vec<SubplotId>,
    /// Every x axis, each belonging to at least one subplot.
    pub xaxis: Vec<AxisId>,
    /// Every y axis, each belonging to at least one subplot.
    pub yaxis: Vec<AxisId>,
}

impl SubplotTopology {
    /// Derives the full topology from the layout declarations and the visible traces.
    pub fn build(layout: &LayoutInput, traces: &[TraceInput]) -> Result<Self> {
        let mut topology = Self::default();

        for trace in traces.iter().filter(|t| t.visible) {
            let x = parse_letter(&trace.xaxis, AxisLetter::X)?;
            let y = parse_letter(&trace.yaxis, AxisLetter::Y)?;
            push_unique(&mut topology.cartesian, SubplotId::new(x, y));
            push_unique(&mut topology.xaxis, x);
            push_unique(&mut topology.yaxis, y);
        }

        for name in layout.axes.keys() {
            match AxisId::from_attr_name(name) {
                Some(id) => push_unique(topology.list_mut(id.letter()), id),
                None => tracing::trace!(key = %name, "ignoring non-axis layout key"),
            }
        }

        topology.xaxis.sort();
        topology.yaxis.sort();
        topology.finalize_subplots(layout);
        Ok(topology)
    }

    /// Completes a partial topology so every listed axis belongs to a subplot.
    ///
    /// Unpaired x axes pair with their anchor (or `y`), unpaired y axes with theirs (or `x`).
    /// When no subplot exists at all, the lowest-numbered x and y axes declared in `layout`
    /// form one (falling back to `xy`).
    pub fn finalize_subplots(&mut self, layout: &LayoutInput) {
        let mut all_x: HashSet<AxisId> = self.cartesian.iter().map(|s| s.x).collect();
        let mut all_y: HashSet<AxisId> = self.cartesian.iter().map(|s| s.y).collect();

        for i in 0..self.xaxis.len() {
            let xi = self.xaxis[i];
            if all_x.contains(&xi) {
                continue;
            }
            let yi = declared_anchor(layout, xi).unwrap_or(AxisId::Y);
            tracing::debug!(subplot = %SubplotId::new(xi, yi), "pairing x axis with its anchor");
            self.cartesian.push(SubplotId::new(xi, yi));
            if all_y.insert(yi) {
                push_unique(&mut self.yaxis, yi);
            }
        }

        for i in 0..self.yaxis.len() {
            let yi = self.yaxis[i];
            if all_y.contains(&yi) {
                continue;
            }
            let xi = declared_anchor(layout, yi).unwrap_or(AxisId::X);
            tracing::debug!(subplot = %SubplotId::new(xi, yi), "pairing y axis with its anchor");
            self.cartesian.push(SubplotId::new(xi, yi));
            if all_x.insert(xi) {
                push_unique(&mut self.xaxis, xi);
            }
        }

        if self.cartesian.is_empty() {
            let xi = lowest_declared(layout, AxisLetter::X).unwrap_or(AxisId::X);
            let yi = lowest_declared(layout, AxisLetter::Y).unwrap_or(AxisId::Y);
            push_unique(&mut self.xaxis, xi);
            push_unique(&mut self.yaxis, yi);
            self.cartesian.push(SubplotId::new(xi, yi));
        }
    }

    /// Returns the axis list for the given letter.
    pub fn list(&self, letter: AxisLetter) -> &[AxisId] {
        match letter {
            AxisLetter::X => &self.xaxis,
            AxisLetter::Y => &self.yaxis,
        }
    }

    /// Every axis id, x axes first.
    pub fn axis_ids(&self) -> impl Iterator<Item = AxisId> + '_ {
        self.xaxis.iter().chain(self.yaxis.iter()).copied()
    }

    /// Whether the subplot is part of this topology.
    pub fn contains(&self, id: SubplotId) -> bool {
        self.cartesian.contains(&id)
    }

    fn list_mut(&mut self, letter: AxisLetter) -> &mut Vec<AxisId> {
        match letter {
            AxisLetter::X => &mut self.xaxis,
            AxisLetter::Y => &mut self.yaxis,
        }
    }
}

fn parse_letter(s: &str, letter: AxisLetter) -> Result<AxisId> {
    let id = AxisId::parse(s)?;
    if id.letter() != letter {
        return Err(Error::InvalidAxisId(s.into()));
    }
    Ok(id)
}

/// The declared anchor of `id`, when it is a valid counter-axis id.
fn declared_anchor(layout: &LayoutInput, id: AxisId) -> Option<AxisId> {
    let anchor = layout.axis(&id.attr_name())?.anchor.as_deref()?;
    AxisId::parse(anchor)
        .ok()
        .filter(|a| a.letter() == id.letter().counter())
}

fn lowest_declared(layout: &LayoutInput, letter: AxisLetter) -> Option<AxisId> {
    layout
        .axes
        .keys()
        .filter_map(|k| AxisId::from_attr_name(k))
        .filter(|id| id.letter() == letter)
        .min()
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::input::AxisInput;

    fn ids(list: &[SubplotId]) -> Vec<alloc::string::String> {
        use alloc::string::ToString;
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn trace_bindings_become_subplots_in_declaration_order() {
        let traces = [
            TraceInput::new("scatter").with_axes("x2", "y2"),
            TraceInput::new("scatter"),
            TraceInput::new("bar").with_axes("x2", "y2"),
        ];
        let t = SubplotTopology::build(&LayoutInput::default(), &traces).unwrap();
        assert_eq!(ids(&t.cartesian), ["x2y2", "xy"], "unique, in trace order");
        assert_eq!(t.xaxis, vec![AxisId::X, AxisId::x(2)], "idSort order");
    }

    #[test]
    fn unpaired_axes_pair_with_their_anchor_or_the_default() {
        let layout = LayoutInput::default()
            .with_axis("xaxis2", AxisInput::new().with_anchor("y3"))
            .with_axis("xaxis3", AxisInput::new().with_anchor("free"))
            .with_axis("yaxis2", AxisInput::new().with_anchor("x2"));
        let traces = [TraceInput::new("scatter")];
        let t = SubplotTopology::build(&layout, &traces).unwrap();
        assert_eq!(ids(&t.cartesian), ["xy", "x2y3", "x3y", "x2y2"]);
        assert!(t.yaxis.contains(&AxisId::y(3)), "anchor target is registered");
    }

    #[test]
    fn building_twice_gives_the_same_topology() {
        let layout = LayoutInput::default()
            .with_axis("xaxis2", AxisInput::new().with_anchor("y2"))
            .with_axis("yaxis3", AxisInput::new());
        let traces = [
            TraceInput::new("scatter").with_axes("x", "y2"),
            TraceInput::new("scatter"),
        ];
        let first = SubplotTopology::build(&layout, &traces).unwrap();
        let second = SubplotTopology::build(&layout, &traces).unwrap();
        assert_eq!(first, second, "topology must be idempotent");

        let mut again = first.clone();
        again.finalize_subplots(&layout);
        assert_eq!(again, first, "finalizing a complete topology changes nothing");
    }

    #[test]
    fn empty_topology_uses_lowest_declared_axes() {
        let layout = LayoutInput::default()
            .with_axis("xaxis3", AxisInput::new())
            .with_axis("xaxis2", AxisInput::new())
            .with_axis("yaxis5", AxisInput::new())
            .with_axis("xaxis_title", AxisInput::new());
        let mut t = SubplotTopology::default();
        t.finalize_subplots(&layout);
        assert_eq!(ids(&t.cartesian), ["x2y5"]);
        assert_eq!(t.xaxis, vec![AxisId::x(2)]);

        let t = SubplotTopology::build(&LayoutInput::default(), &[]).unwrap();
        assert_eq!(t.cartesian, vec![SubplotId::XY], "nothing declared: default xy");
    }

    #[test]
    fn trace_axes_must_have_the_right_letter() {
        let traces = [TraceInput::new("scatter").with_axes("y", "y")];
        let err = SubplotTopology::build(&LayoutInput::default(), &traces).unwrap_err();
        assert_eq!(err, Error::InvalidAxisId("y".into()));
    }
}
