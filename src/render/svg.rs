use std::fmt::Write as _;

use crate::{
    chart::node::{AxisOrient, AxisSpec, Layer, Node, NodeKind, TextAnchor},
    chart::surface::ChartSurface,
    encode::palette::INK,
};

const HEADER_HEIGHT: f64 = 56.0;
const FONT: &str = "sans-serif";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn anchor(a: TextAnchor) -> &'static str {
    match a {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

/// Serialize the visible state of a chart surface as a standalone SVG document.
///
/// The header sits in a band above the chart; hidden nodes are skipped and layer opacity is
/// applied per group. Output is deterministic for a given surface state.
pub fn to_svg<S: ChartSurface + ?Sized>(surface: &S) -> String {
    let g = surface.geometry();
    let total_h = g.height + HEADER_HEIGHT;
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT}">"#,
        w = g.width,
        h = total_h,
    );
    let _ = writeln!(
        out,
        r##"<rect width="{}" height="{total_h}" fill="#ffffff"/>"##,
        g.width
    );

    let header = surface.header();
    let _ = writeln!(
        out,
        r#"<text x="{:.2}" y="24" font-size="20" font-weight="bold" fill="{}">{}</text>"#,
        g.margin.left,
        INK.to_hex(),
        escape(&header.title)
    );
    if let Some(sub) = &header.subtitle {
        let _ = writeln!(
            out,
            r#"<text x="{:.2}" y="44" font-size="13" fill="{}">{}</text>"#,
            g.margin.left,
            INK.to_hex(),
            escape(sub)
        );
    }
    if surface.methodology_visible() {
        let _ = writeln!(
            out,
            r#"<text x="{:.2}" y="44" font-size="11" text-anchor="end" fill="{}">Methodology</text>"#,
            g.width - g.margin.right,
            INK.to_hex()
        );
    }

    let _ = writeln!(out, r#"<g transform="translate(0 {HEADER_HEIGHT})">"#);
    for layer in Layer::ALL {
        if !surface.has_layer(layer) {
            continue;
        }
        let _ = writeln!(
            out,
            r#"<g class="{layer:?}" opacity="{:.3}">"#,
            surface.layer_opacity(layer)
        );
        for id in surface.ids(layer) {
            if let Some(node) = surface.node(id).filter(|n| n.displayed) {
                write_node(&mut out, node);
            }
        }
        out.push_str("</g>\n");
    }
    out.push_str("</g>\n</svg>\n");
    out
}

fn write_node(out: &mut String, n: &Node) {
    let p = &n.props;
    let fill = p.fill.to_hex();
    match n.kind {
        NodeKind::Dot | NodeKind::LegendSwatch => {
            let _ = writeln!(
                out,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{fill}" opacity="{:.3}"/>"#,
                p.x, p.y, p.radius, p.opacity
            );
        }
        NodeKind::Bar => {
            let _ = writeln!(
                out,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{fill}" opacity="{:.3}"/>"#,
                p.x, p.y, p.width, p.height, p.opacity
            );
        }
        NodeKind::Guide => {
            let _ = writeln!(
                out,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{fill}" stroke-dasharray="4 4" opacity="{:.3}"/>"#,
                p.x,
                p.y,
                p.x + p.width,
                p.y + p.height,
                p.opacity
            );
        }
        NodeKind::Axis => {
            if let Some(axis) = &n.axis {
                write_axis(out, n, axis);
            }
        }
        NodeKind::DotLabel
        | NodeKind::BarLabel
        | NodeKind::GuideLabel
        | NodeKind::MeanLabel
        | NodeKind::LegendLabel
        | NodeKind::Note => {
            let text = n.text.as_deref().unwrap_or(&n.key);
            let _ = writeln!(
                out,
                r#"<text x="{:.2}" y="{:.2}" font-size="{:.1}" text-anchor="{}" fill="{fill}" opacity="{:.3}">{}</text>"#,
                p.x,
                p.y,
                p.font_size,
                anchor(n.anchor),
                p.opacity,
                escape(text)
            );
        }
    }
}

fn write_axis(out: &mut String, n: &Node, axis: &AxisSpec) {
    let p = &n.props;
    let ink = INK.to_hex();
    let _ = writeln!(
        out,
        r#"<g class="axis" opacity="{:.3}" font-size="11" fill="{ink}">"#,
        p.opacity
    );
    let _ = writeln!(
        out,
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{ink}"/>"#,
        p.x,
        p.y,
        p.x + p.width,
        p.y + p.height
    );
    for t in &axis.ticks {
        match axis.orient {
            AxisOrient::Bottom => {
                let _ = writeln!(
                    out,
                    r#"<line x1="{x:.2}" y1="{y:.2}" x2="{x:.2}" y2="{:.2}" stroke="{ink}"/><text x="{x:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                    p.y + 6.0,
                    p.y + 20.0,
                    escape(&t.label),
                    x = t.pos,
                    y = p.y,
                );
            }
            AxisOrient::Left => {
                let _ = writeln!(
                    out,
                    r#"<line x1="{:.2}" y1="{y:.2}" x2="{x:.2}" y2="{y:.2}" stroke="{ink}"/><text x="{:.2}" y="{:.2}" text-anchor="end">{}</text>"#,
                    p.x - 6.0,
                    p.x - 9.0,
                    t.pos + 4.0,
                    escape(&t.label),
                    x = p.x,
                    y = t.pos,
                );
            }
        }
    }
    if !axis.title.is_empty() {
        let (x, y, rotate) = match axis.orient {
            AxisOrient::Bottom => (p.x + p.width / 2.0, p.y + 42.0, String::new()),
            AxisOrient::Left => {
                let (x, y) = (p.x - 52.0, p.y + p.height / 2.0);
                (x, y, format!(r#" transform="rotate(-90 {x:.2} {y:.2})""#))
            }
        };
        let _ = writeln!(
            out,
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle"{rotate}>{}</text>"#,
            escape(&axis.title)
        );
    }
    out.push_str("</g>\n");
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
