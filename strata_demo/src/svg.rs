// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a layer tree.

use peniko::Color;
use strata_core::{LayerAttrs, LayerId, LayerKind, LayerTree};

/// Serializes the whole tree, children in paint order.
pub(crate) fn to_svg_string(tree: &LayerTree, width: f64, height: f64) -> String {
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    out.push_str(&format!(
        r#"viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#
    ));
    out.push('\n');
    for &child in tree.children(tree.root()) {
        write_node(tree, child, &mut out, 1);
    }
    out.push_str("</svg>\n");
    out
}

fn write_node(tree: &LayerTree, id: LayerId, out: &mut String, depth: usize) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let attrs = &node.attrs;
    if attrs.hidden {
        return;
    }
    let indent = "  ".repeat(depth);
    let class = node.classes.join(" ");
    match node.kind {
        LayerKind::Group => {
            let tag = if node.has_class("defs") { "defs" } else { "g" };
            out.push_str(&format!(r#"{indent}<{tag} class="{class}""#));
            write_placement(out, attrs);
            out.push_str(">\n");
            for &child in &node.children {
                write_node(tree, child, out, depth + 1);
            }
            out.push_str(&format!("{indent}</{tag}>\n"));
        }
        LayerKind::ClipPath => {
            let dom_id = attrs.dom_id.as_deref().unwrap_or_default();
            out.push_str(&format!(r#"{indent}<clipPath id="{dom_id}" class="{class}">"#));
            if let Some(r) = attrs.rect {
                out.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
                    r.x0,
                    r.y0,
                    r.width(),
                    r.height()
                ));
            }
            out.push_str("</clipPath>\n");
        }
        LayerKind::Rect => {
            let Some(r) = attrs.rect else {
                return;
            };
            out.push_str(&format!(
                r#"{indent}<rect class="{class}" x="{}" y="{}" width="{}" height="{}""#,
                r.x0,
                r.y0,
                r.width(),
                r.height()
            ));
            write_paint(out, node.kind, attrs);
            write_placement(out, attrs);
            out.push_str("/>\n");
        }
        LayerKind::Path => {
            let d = attrs.path.as_ref().map(|p| p.to_svg()).unwrap_or_default();
            out.push_str(&format!(r#"{indent}<path class="{class}" d="{d}""#));
            write_paint(out, node.kind, attrs);
            write_placement(out, attrs);
            out.push_str("/>\n");
        }
        LayerKind::Text => {
            let text = attrs.text.as_deref().unwrap_or_default();
            out.push_str(&format!(r#"{indent}<text class="{class}""#));
            if let Some(anchor) = attrs.text_anchor {
                out.push_str(&format!(r#" text-anchor="{anchor}""#));
            }
            write_paint(out, node.kind, attrs);
            write_placement(out, attrs);
            out.push('>');
            out.push_str(&escape_xml(text));
            out.push_str("</text>\n");
        }
    }
}

fn write_placement(out: &mut String, attrs: &LayerAttrs) {
    if let Some(t) = attrs.translate {
        out.push_str(&format!(r#" transform="translate({},{})""#, t.x, t.y));
    }
    if let Some(clip) = &attrs.clip_path {
        out.push_str(&format!(r#" clip-path="url(#{clip})""#));
    }
}

fn write_paint(out: &mut String, kind: LayerKind, attrs: &LayerAttrs) {
    match attrs.fill {
        Some(color) => write_color_attr(out, "fill", color),
        None if kind == LayerKind::Path => out.push_str(r#" fill="none""#),
        None => {}
    }
    if let Some(color) = attrs.stroke {
        write_color_attr(out, "stroke", color);
    }
    if let Some(width) = attrs.stroke_width {
        out.push_str(&format!(r#" stroke-width="{width}""#));
    }
}

fn write_color_attr(out: &mut String, name: &str, color: Color) {
    let rgba = color.to_rgba8();
    out.push_str(&format!(
        r##" {name}="#{:02x}{:02x}{:02x}""##,
        rgba.r, rgba.g, rgba.b
    ));
    if rgba.a != 255 {
        out.push_str(&format!(
            r#" {name}-opacity="{}""#,
            f64::from(rgba.a) / 255.0
        ));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
