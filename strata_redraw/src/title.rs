// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Main title placement.

use kurbo::Vec2;
use strata_cartesian::{FullLayout, Graph};
use strata_core::{LayerKind, Result, TitleInput, TitleRef, TitleXAnchor, TitleYAnchor};

/// Baseline shift, in em, that puts the cap height on the anchor.
pub const CAP_SHIFT: f64 = 0.70;
/// Baseline shift, in em, that centers the text on the anchor.
pub const MID_SHIFT: f64 = 0.35;

/// Class of the main title node in the info layer.
pub const MAIN_TITLE_CLASS: &str = "g-gtitle";

/// Where the main title's text run goes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TitlePlacement {
    /// Anchor x in chart pixels.
    pub x: f64,
    /// Baseline y in chart pixels, before `dy`.
    pub y: f64,
    /// `start`, `middle` or `end`.
    pub text_anchor: &'static str,
    /// Baseline shift in em.
    pub dy: f64,
}

fn is_left(title: &TitleInput) -> bool {
    match title.xanchor {
        TitleXAnchor::Left => true,
        TitleXAnchor::Auto => title.x <= 1.0 / 3.0,
        _ => false,
    }
}

fn is_right(title: &TitleInput) -> bool {
    match title.xanchor {
        TitleXAnchor::Right => true,
        TitleXAnchor::Auto => title.x >= 2.0 / 3.0,
        _ => false,
    }
}

fn is_top(title: &TitleInput) -> bool {
    match (title.yanchor, title.y) {
        (TitleYAnchor::Top, _) => true,
        (TitleYAnchor::Auto, Some(y)) => y >= 2.0 / 3.0,
        _ => false,
    }
}

fn is_middle(title: &TitleInput) -> bool {
    match (title.yanchor, title.y) {
        (TitleYAnchor::Middle, _) => true,
        (TitleYAnchor::Auto, Some(y)) => y > 1.0 / 3.0 && y < 2.0 / 3.0,
        _ => false,
    }
}

/// Computes the main title placement for a layout.
///
/// Padding only applies on the anchored side: left padding for start-anchored text, right
/// padding for end-anchored text, top padding for middle-anchored text and bottom padding for
/// baseline-anchored text. An automatic `y` centers the baseline in the top margin.
pub fn place_main_title(full: &FullLayout) -> TitlePlacement {
    let title = &full.title;
    let gs = &full.size;

    let text_anchor = if is_right(title) {
        "end"
    } else if is_left(title) {
        "start"
    } else {
        "middle"
    };
    let middle = is_middle(title);
    let dy = if is_top(title) {
        CAP_SHIFT
    } else if middle {
        MID_SHIFT
    } else {
        0.0
    };

    let h_pad = match text_anchor {
        "start" => title.pad.l,
        "end" => title.pad.r,
        _ => 0.0,
    };
    let x = match title.xref {
        TitleRef::Paper => gs.l + gs.w * title.x + h_pad,
        TitleRef::Container => full.width * title.x + h_pad,
    };

    let v_pad = if dy == 0.0 {
        -title.pad.b
    } else if middle {
        title.pad.t
    } else {
        0.0
    };
    let y = match (title.y, title.yref) {
        (None, _) => gs.t / 2.0,
        (Some(y), TitleRef::Paper) => gs.t - gs.h * y + v_pad,
        (Some(y), TitleRef::Container) => full.height * (1.0 - y) + v_pad,
    };

    TitlePlacement {
        x,
        y,
        text_anchor,
        dy,
    }
}

/// Draws (or removes) the main title text in the info layer.
pub(crate) fn draw_title(graph: &mut Graph, font_size: f64) -> Result<()> {
    let info = graph.roots.infolayer;
    let Some(text) = graph.full_layout.title.text.clone() else {
        graph.layers.remove_class(info, MAIN_TITLE_CLASS);
        return Ok(());
    };
    let placement = place_main_title(&graph.full_layout);
    let node = graph
        .layers
        .ensure_single(info, LayerKind::Text, MAIN_TITLE_CLASS)?;
    graph.layers.update(node, |a| {
        a.text = Some(text);
        a.text_anchor = Some(placement.text_anchor);
        a.translate = Some(Vec2::new(
            placement.x,
            placement.y + placement.dy * font_size,
        ));
    })?;
    tracing::trace!(x = placement.x, y = placement.y, "placed main title");
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use strata_core::{LayoutInput, Margin, TitlePad};

    use super::*;

    fn full(title: TitleInput) -> FullLayout {
        let layout = LayoutInput::new()
            .with_size(700.0, 450.0)
            .with_margin(Margin::default())
            .with_title(title);
        let registry = strata_cartesian::ModuleRegistry::new();
        FullLayout::supply_defaults(&layout, &[], &registry, None).unwrap()
    }

    #[test]
    fn default_title_is_centered_in_the_top_margin() {
        let p = place_main_title(&full(TitleInput::new("t")));
        assert_eq!(p.text_anchor, "middle");
        assert_eq!(p.x, 350.0);
        assert_eq!(p.y, 50.0);
        assert_eq!(p.dy, 0.0);
    }

    #[test]
    fn auto_anchors_follow_position_and_pad_their_side() {
        let mut title = TitleInput::new("t");
        title.x = 0.1;
        title.y = Some(0.9);
        title.pad = TitlePad {
            t: 3.0,
            r: 5.0,
            b: 7.0,
            l: 11.0,
        };
        let p = place_main_title(&full(title.clone()));
        assert_eq!(p.text_anchor, "start");
        assert_eq!(p.x, 70.0 + 11.0);
        assert_eq!(p.dy, CAP_SHIFT);
        assert!((p.y - 45.0).abs() < 1e-9, "top anchored: no vertical pad");

        title.x = 0.9;
        title.y = Some(0.5);
        let p = place_main_title(&full(title.clone()));
        assert_eq!(p.text_anchor, "end");
        assert!((p.x - 635.0).abs() < 1e-9);
        assert_eq!(p.dy, MID_SHIFT);
        assert_eq!(p.y, 225.0 + 3.0);

        title.y = Some(0.1);
        let p = place_main_title(&full(title));
        assert_eq!(p.dy, 0.0);
        assert!((p.y - (405.0 - 7.0)).abs() < 1e-9, "baseline anchored: bottom pad");
    }

    #[test]
    fn paper_reference_measures_from_the_plot_area() {
        let mut title = TitleInput::new("t");
        title.xref = TitleRef::Paper;
        title.yref = TitleRef::Paper;
        title.xanchor = TitleXAnchor::Center;
        title.yanchor = TitleYAnchor::Bottom;
        title.x = 0.0;
        title.y = Some(1.0);
        let p = place_main_title(&full(title));
        assert_eq!(p.text_anchor, "middle");
        assert_eq!(p.x, 80.0);
        assert_eq!(p.y, 100.0 - 270.0);
    }

    #[test]
    fn the_title_node_follows_the_text() {
        let mut graph = Graph::new("g").unwrap();
        graph.full_layout = full(TitleInput::new("Sales"));
        draw_title(&mut graph, 10.0).unwrap();
        draw_title(&mut graph, 10.0).unwrap();
        let info = graph.roots.infolayer;
        let nodes = graph.layers.children_with_class(info, MAIN_TITLE_CLASS);
        assert_eq!(nodes.len(), 1, "redraws reuse the node");
        let attrs = graph.layers.attrs(nodes[0]).unwrap();
        assert_eq!(attrs.text.as_deref(), Some("Sales"));
        assert_eq!(attrs.translate, Some(Vec2::new(350.0, 50.0)));

        graph.full_layout.title.text = None;
        draw_title(&mut graph, 10.0).unwrap();
        assert_eq!(graph.layers.count_class(info, MAIN_TITLE_CLASS), 0);
    }
}
