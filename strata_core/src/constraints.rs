// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linked axis ranges: autorange, scale anchors and match groups.
//!
//! The solver runs in three steps over the whole [`AxisRegistry`]:
//!
//! 1. every axis is autoranged on its own (when enabled) and rescaled;
//! 2. scale-anchor groups are brought to a common pixels-per-unit scale;
//! 3. match groups are merged into one shared range.
//!
//! Match groups are all or nothing. If a member cannot be found the pass fails before any
//! member is written, and if any member has a fixed range the group is left alone.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::autorange::AutorangeRoutine;
use crate::axis::Axis;
use crate::calc::CalcTrace;
use crate::error::Result;
use crate::id::AxisId;
use crate::input::LayoutInput;
use crate::layout::PlotSize;
use crate::registry::AxisRegistry;

/// Axes declared to share one range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchGroup {
    /// Members in id order.
    pub axes: Vec<AxisId>,
}

/// Axes declared to share one pixels-per-unit scale.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleGroup {
    /// Members in id order, each with the factor normalizing its scale to the group's.
    ///
    /// `factor * length / |span|` is equal for every member once the group is enforced.
    pub axes: Vec<(AxisId, f64)>,
}

/// Derives match groups from the `matches` declarations of `layout`.
///
/// Links are transitive: `x2 -> x` and `x3 -> x2` give one group `[x, x2, x3]`.
/// Groups are returned in the order of their lowest member.
pub fn match_groups(layout: &LayoutInput) -> Result<Vec<MatchGroup>> {
    let mut groups: Vec<Vec<AxisId>> = Vec::new();
    for (id, target) in declared_links(layout, true, |input| input.matches.as_deref())? {
        let a = groups.iter().position(|g| g.contains(&id));
        let b = groups.iter().position(|g| g.contains(&target));
        match (a, b) {
            (Some(a), Some(b)) if a == b => {}
            (Some(a), Some(b)) => {
                let (keep, drop) = (a.min(b), a.max(b));
                let moved = groups.remove(drop);
                groups[keep].extend(moved);
            }
            (Some(a), None) => groups[a].push(target),
            (None, Some(b)) => groups[b].push(id),
            (None, None) => groups.push(alloc::vec![id, target]),
        }
    }
    for group in &mut groups {
        group.sort();
    }
    groups.sort();
    Ok(groups.into_iter().map(|axes| MatchGroup { axes }).collect())
}

/// Derives scale groups from the `scaleanchor`/`scaleratio` declarations of `layout`.
///
/// `scaleratio = r` on axis `a` anchored to `b` means one unit of `a` spans `r` times as many
/// pixels as one unit of `b`. Links that would contradict an earlier one (cycles) are ignored.
pub fn scale_groups(layout: &LayoutInput) -> Result<Vec<ScaleGroup>> {
    let mut edges: Vec<(AxisId, AxisId, f64)> = Vec::new();
    for (id, target) in declared_links(layout, false, |input| input.scaleanchor.as_deref())? {
        let ratio = layout
            .axis(&id.attr_name())
            .and_then(|input| input.scaleratio)
            .unwrap_or(1.0);
        if !(ratio > 0.0 && ratio.is_finite()) {
            tracing::warn!(axis = %id, ratio, "ignoring non-positive scaleratio");
            continue;
        }
        edges.push((id, target, ratio));
    }

    let mut nodes: Vec<AxisId> = edges.iter().flat_map(|&(a, b, _)| [a, b]).collect();
    nodes.sort();
    nodes.dedup();

    let mut factors: BTreeMap<AxisId, f64> = BTreeMap::new();
    let mut groups = Vec::new();
    for root in nodes {
        if factors.contains_key(&root) {
            continue;
        }
        factors.insert(root, 1.0);
        let mut members = alloc::vec![(root, 1.0)];
        let mut i = 0;
        while i < members.len() {
            let (current, factor) = members[i];
            for &(a, b, ratio) in &edges {
                // factor(a) * scale(a) == factor(b) * scale(b), with scale(a) == ratio * scale(b)
                let next = if a == current {
                    (b, factor * ratio)
                } else if b == current {
                    (a, factor / ratio)
                } else {
                    continue;
                };
                if !factors.contains_key(&next.0) {
                    factors.insert(next.0, next.1);
                    members.push(next);
                }
            }
            i += 1;
        }
        members.sort_by(|l, r| l.0.cmp(&r.0));
        groups.push(ScaleGroup { axes: members });
    }
    Ok(groups)
}

/// All constraints declared by a layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Constraints {
    /// Match groups.
    pub matches: Vec<MatchGroup>,
    /// Scale-anchor groups.
    pub scales: Vec<ScaleGroup>,
}

impl Constraints {
    /// Derives every constraint group declared in `layout`.
    pub fn from_layout(layout: &LayoutInput) -> Result<Self> {
        Ok(Self {
            matches: match_groups(layout)?,
            scales: scale_groups(layout)?,
        })
    }
}

/// Autoranges every axis, then applies scale-anchor and match constraints.
///
/// Lookup errors in a constraint group abort the pass.
pub fn do_autorange_and_constraints(
    registry: &mut AxisRegistry,
    size: &PlotSize,
    calcdata: &[CalcTrace],
    routine: &dyn AutorangeRoutine,
    constraints: &Constraints,
) -> Result<()> {
    for axis in registry.iter_mut() {
        if axis.length == 0.0 {
            axis.set_scale(size);
        }
        if axis.autorange.is_on() {
            routine.compute_range(calcdata, axis);
        }
        axis.set_scale(size);
    }
    enforce_scale_groups(registry, size, &constraints.scales)?;
    merge_match_ranges(registry, size, &constraints.matches)
}

/// Brings every scale group to a common scale.
///
/// A member with a fixed range sets the target scale; otherwise the target is the smallest
/// member scale, so autoranged members only ever zoom out and keep all of their data visible.
pub fn enforce_scale_groups(
    registry: &mut AxisRegistry,
    size: &PlotSize,
    groups: &[ScaleGroup],
) -> Result<()> {
    for group in groups {
        let mut scales = Vec::with_capacity(group.axes.len());
        for &(id, factor) in &group.axes {
            let axis = registry.get(id)?;
            scales.push((id, factor * norm_scale(axis), axis.autorange.is_on()));
        }

        let mut target: Option<f64> = None;
        for &(id, scale, auto) in &scales {
            if !auto {
                if let Some(fixed) = target.filter(|t| (t - scale).abs() > 1e-9 * t.abs()) {
                    tracing::warn!(axis = %id, scale, fixed, "conflicting fixed ranges in scale group");
                    continue;
                }
                target = Some(scale);
            }
        }
        let target = match target {
            Some(t) => t,
            None => scales
                .iter()
                .map(|s| s.1)
                .filter(|s| *s > 0.0)
                .fold(f64::INFINITY, f64::min),
        };
        if !(target.is_finite() && target > 0.0) {
            continue;
        }

        for &(id, scale, auto) in &scales {
            if !auto || scale <= 0.0 || (scale - target).abs() <= 1e-9 * target {
                continue;
            }
            let axis = registry.get_mut(id)?;
            zoom_about_center(axis, scale / target);
            axis.set_scale(size);
            tracing::debug!(axis = %id, factor = scale / target, "zoomed to scale group");
        }
    }
    Ok(())
}

/// Merges every match group into one shared range.
///
/// Members are resolved before anything is written. A group with any fixed-range member is
/// skipped entirely. Ranges combine by the direction of the range accumulated so far: while
/// it ascends the lows take the minimum and the highs the maximum, otherwise the lows take the
/// maximum and the highs the minimum.
pub fn merge_match_ranges(
    registry: &mut AxisRegistry,
    size: &PlotSize,
    groups: &[MatchGroup],
) -> Result<()> {
    'groups: for group in groups {
        let members = group
            .axes
            .iter()
            .map(|&id| registry.get(id))
            .collect::<Result<Vec<&Axis>>>()?;

        let mut merged: Option<[f64; 2]> = None;
        for axis in &members {
            if !axis.autorange.is_on() {
                tracing::debug!(axis = %axis.id, "match group has a fixed range; not merging");
                continue 'groups;
            }
            let range = axis.range;
            merged = Some(match merged {
                None => range,
                Some([lo, hi]) if lo < hi => [lo.min(range[0]), hi.max(range[1])],
                Some([lo, hi]) => [lo.max(range[0]), hi.min(range[1])],
            });
        }

        let Some(merged) = merged else { continue };
        for &id in &group.axes {
            let axis = registry.get_mut(id)?;
            axis.range = merged;
            axis.set_scale(size);
        }
        tracing::debug!(members = group.axes.len(), r0 = merged[0], r1 = merged[1], "merged match group");
    }
    Ok(())
}

fn norm_scale(axis: &Axis) -> f64 {
    let span = (axis.range[1] - axis.range[0]).abs();
    if span > 0.0 { axis.length / span } else { 0.0 }
}

fn zoom_about_center(axis: &mut Axis, factor: f64) {
    let [r0, r1] = axis.range;
    let center = (r0 + r1) / 2.0;
    let half = (r1 - r0) / 2.0 * factor;
    axis.range = [center - half, center + half];
}

/// Collects `(axis, target)` links for one string attribute, in axis order.
///
/// With `same_letter`, targets of the other letter are ignored. Whether they exist is only checked
/// when the group is applied, so dangling links surface as lookup errors there.
fn declared_links(
    layout: &LayoutInput,
    same_letter: bool,
    attr: impl Fn(&crate::input::AxisInput) -> Option<&str>,
) -> Result<Vec<(AxisId, AxisId)>> {
    let mut links = Vec::new();
    for (name, input) in &layout.axes {
        let Some(id) = AxisId::from_attr_name(name) else {
            continue;
        };
        let Some(target) = attr(input) else {
            continue;
        };
        let target = AxisId::parse(target)?;
        if same_letter && target.letter() != id.letter() {
            tracing::debug!(axis = %id, %target, "ignoring cross-letter link");
            continue;
        }
        if target != id {
            links.push((id, target));
        }
    }
    links.sort();
    Ok(links)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::autorange::PaddedExtent;
    use crate::error::Error;
    use crate::axis::AutorangeMode;
    use crate::input::{AxisInput, TraceInput};
    use crate::layout::Margin;
    use crate::topology::SubplotTopology;

    fn size() -> PlotSize {
        PlotSize::arrange(700.0, 450.0, &Margin::default())
    }

    fn registry_with(ranges: &[(AxisId, [f64; 2], AutorangeMode)]) -> AxisRegistry {
        let mut reg = AxisRegistry::new();
        for &(id, range, autorange) in ranges {
            let mut ax = Axis::new(id);
            ax.range = range;
            ax.autorange = autorange;
            ax.set_scale(&size());
            reg.insert(ax);
        }
        reg
    }

    fn group(ids: &[AxisId]) -> MatchGroup {
        MatchGroup { axes: ids.to_vec() }
    }

    #[test]
    fn ascending_group_widens_to_the_union() {
        let mut reg = registry_with(&[
            (AxisId::X, [0.0, 10.0], AutorangeMode::On),
            (AxisId::x(2), [5.0, 20.0], AutorangeMode::On),
        ]);
        merge_match_ranges(&mut reg, &size(), &[group(&[AxisId::X, AxisId::x(2)])]).unwrap();
        assert_eq!(reg.get(AxisId::X).unwrap().range, [0.0, 20.0]);
        assert_eq!(reg.get(AxisId::x(2)).unwrap().range, [0.0, 20.0]);
    }

    #[test]
    fn descending_group_takes_max_lows_and_min_highs() {
        let mut reg = registry_with(&[
            (AxisId::Y, [10.0, 0.0], AutorangeMode::Reversed),
            (AxisId::y(2), [20.0, 5.0], AutorangeMode::Reversed),
        ]);
        merge_match_ranges(&mut reg, &size(), &[group(&[AxisId::Y, AxisId::y(2)])]).unwrap();
        assert_eq!(reg.get(AxisId::Y).unwrap().range, [20.0, 0.0]);
        assert_eq!(reg.get(AxisId::y(2)).unwrap().range, [20.0, 0.0]);
    }

    #[test]
    fn one_fixed_member_abandons_the_whole_group() {
        let mut reg = registry_with(&[
            (AxisId::X, [0.0, 10.0], AutorangeMode::On),
            (AxisId::x(2), [5.0, 20.0], AutorangeMode::Off),
            (AxisId::x(3), [-5.0, 1.0], AutorangeMode::On),
        ]);
        let before = reg.clone();
        let g = group(&[AxisId::X, AxisId::x(2), AxisId::x(3)]);
        merge_match_ranges(&mut reg, &size(), &[g]).unwrap();
        assert_eq!(reg, before, "no member is altered");
    }

    #[test]
    fn missing_member_fails_before_writing() {
        let mut reg = registry_with(&[(AxisId::X, [0.0, 10.0], AutorangeMode::On)]);
        let before = reg.clone();
        let err = merge_match_ranges(&mut reg, &size(), &[group(&[AxisId::X, AxisId::x(7)])])
            .unwrap_err();
        assert_eq!(err, Error::UnknownAxis(AxisId::x(7)));
        assert_eq!(reg, before, "no partial application");
    }

    #[test]
    fn match_links_are_transitive() {
        let layout = LayoutInput::default()
            .with_axis("xaxis3", AxisInput::new().with_matches("x2"))
            .with_axis("xaxis2", AxisInput::new().with_matches("x"))
            .with_axis("yaxis2", AxisInput::new().with_matches("y"));
        let groups = match_groups(&layout).unwrap();
        assert_eq!(
            groups,
            vec![
                group(&[AxisId::X, AxisId::x(2), AxisId::x(3)]),
                group(&[AxisId::Y, AxisId::y(2)]),
            ]
        );

        let cross = LayoutInput::default()
            .with_axis("xaxis2", AxisInput::new().with_matches("y"))
            .with_axis("yaxis2", AxisInput::new().with_matches("y"));
        assert_eq!(
            match_groups(&cross).unwrap(),
            vec![group(&[AxisId::Y, AxisId::y(2)])],
            "cross-letter matches are ignored"
        );
    }

    #[test]
    fn scale_anchor_zooms_out_the_denser_axis() {
        let layout = LayoutInput::default()
            .with_size(400.0, 400.0)
            .with_margin(Margin::uniform(0.0))
            .with_axis("yaxis", AxisInput::new().with_scaleanchor("x", 1.0));
        let traces = [TraceInput::new("scatter").with_xy([0.0, 10.0], [0.0, 2.0])];
        let topology = SubplotTopology::build(&layout, &traces).unwrap();
        let mut reg = AxisRegistry::build(&layout, &topology);
        let size = PlotSize::arrange(400.0, 400.0, &Margin::uniform(0.0));
        let calcdata = CalcTrace::calc_all(&traces).unwrap();
        let constraints = Constraints::from_layout(&layout).unwrap();
        assert_eq!(constraints.scales.len(), 1);

        do_autorange_and_constraints(
            &mut reg,
            &size,
            &calcdata,
            &PaddedExtent::new(0.0),
            &constraints,
        )
        .unwrap();
        let x = reg.get(AxisId::X).unwrap();
        let y = reg.get(AxisId::Y).unwrap();
        assert_eq!(x.range, [0.0, 10.0], "sparser axis keeps its range");
        assert!((y.range[0] + 4.0).abs() < 1e-9, "y zoomed about 1: {:?}", y.range);
        assert!((y.range[1] - 6.0).abs() < 1e-9, "y zoomed about 1: {:?}", y.range);
    }

    #[test]
    fn scale_ratio_factors_follow_the_links() {
        let layout = LayoutInput::default()
            .with_axis("yaxis", AxisInput::new().with_scaleanchor("y2", 2.0))
            .with_axis("yaxis2", AxisInput::new());
        let groups = scale_groups(&layout).unwrap();
        assert_eq!(
            groups,
            vec![ScaleGroup {
                axes: vec![(AxisId::Y, 1.0), (AxisId::y(2), 2.0)],
            }]
        );
    }
}
