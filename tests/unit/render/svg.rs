use super::*;
use crate::{
    chart::node::{Datum, NodeKind},
    chart::surface::{Chart, Header},
    foundation::core::ChartGeometry,
};

#[test]
fn escapes_text_and_skips_hidden_nodes() {
    let mut chart = Chart::new(ChartGeometry::default());
    chart.set_header(Header {
        title: "Sci-Fi & <Fantasy>".into(),
        subtitle: None,
    });
    chart.draw(
        Layer::Marks,
        Node::new(NodeKind::Dot, "A")
            .at(10.0, 20.0)
            .radius(5.0)
            .datum(Datum::Fear { count: 1 }),
    );
    let mut hidden = Node::new(NodeKind::Dot, "B").radius(99.0);
    hidden.displayed = false;
    chart.draw(Layer::Marks, hidden);

    let svg = to_svg(&chart);
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Sci-Fi &amp; &lt;Fantasy&gt;"));
    assert!(svg.contains(r#"cx="10.00" cy="20.00" r="5.00""#));
    assert!(!svg.contains(r#"r="99.00""#));
    assert!(!svg.contains("Methodology"));
}

#[test]
fn layer_opacity_and_methodology_are_exported() {
    let mut chart = Chart::new(ChartGeometry::default());
    chart.set_layer_opacity(Layer::Legend, 0.5);
    chart.set_methodology_visible(true);
    let svg = to_svg(&chart);
    assert!(svg.contains(r#"class="Legend" opacity="0.500""#));
    assert!(svg.contains("Methodology"));
}
