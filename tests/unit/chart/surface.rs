use super::*;
use crate::chart::node::NodeKind;

#[test]
fn clear_removes_only_that_layer() {
    let mut chart = Chart::new(ChartGeometry::default());
    let dot = chart.draw(Layer::Marks, Node::new(NodeKind::Dot, "A")).unwrap();
    let axis = chart.draw(Layer::Axes, Node::new(NodeKind::Axis, "")).unwrap();
    chart.clear(Layer::Marks);
    assert!(chart.node(dot).is_none());
    assert!(chart.node(axis).is_some());
    assert!(chart.ids(Layer::Marks).is_empty());
}

#[test]
fn ids_are_never_reused_after_clear() {
    let mut chart = Chart::new(ChartGeometry::default());
    let a = chart.draw(Layer::Marks, Node::new(NodeKind::Dot, "A")).unwrap();
    chart.clear(Layer::Marks);
    let b = chart.draw(Layer::Marks, Node::new(NodeKind::Dot, "A")).unwrap();
    assert_ne!(a, b);
}

#[test]
fn missing_layer_refuses_draws() {
    let mut chart = Chart::with_layers(ChartGeometry::default(), &[Layer::Marks, Layer::Axes]);
    assert!(!chart.has_layer(Layer::Legend));
    assert!(
        chart
            .draw(Layer::Legend, Node::new(NodeKind::LegendSwatch, ""))
            .is_none()
    );
    chart.set_layer_opacity(Layer::Legend, 1.0);
    assert_eq!(chart.layer_opacity(Layer::Legend), 0.0);
}

#[test]
fn remove_detaches_from_layer() {
    let mut chart = Chart::new(ChartGeometry::default());
    let a = chart.draw(Layer::Axes, Node::new(NodeKind::Note, "")).unwrap();
    chart.remove(a);
    assert!(chart.ids(Layer::Axes).is_empty());
    chart.remove(a);
}

#[test]
fn layer_opacity_is_clamped() {
    let mut chart = Chart::new(ChartGeometry::default());
    chart.set_layer_opacity(Layer::Marks, 1.7);
    assert_eq!(chart.layer_opacity(Layer::Marks), 1.0);
}
