use super::*;
use crate::{
    chart::surface::Chart,
    fixtures::genre_rows,
    render::scene::SceneRenderer,
};

struct Fixture {
    opts: EngineOpts,
    model: ScatterModel,
    chart: Chart,
    engine: TransitionEngine<()>,
    overlay: OverlayController,
}

fn rendered() -> Fixture {
    let opts = EngineOpts::default();
    let model = ScatterModel::build(&genre_rows(), &opts);
    let mut chart = Chart::new(opts.geometry);
    let mut engine = TransitionEngine::new();
    SceneRenderer::new(opts.clone()).render_scatter(&mut chart, &mut engine, &model);
    engine.advance(&mut chart, opts.durations.grow);
    Fixture {
        overlay: OverlayController::new(&opts),
        opts,
        model,
        chart,
        engine,
    }
}

fn snapshot(chart: &Chart) -> (Vec<Node>, Vec<Node>, f64) {
    (
        chart.nodes(Layer::Marks).map(|(_, n)| n.clone()).collect(),
        chart.nodes(Layer::Axes).map(|(_, n)| n.clone()).collect(),
        chart.layer_opacity(Layer::Legend),
    )
}

fn node<'a>(chart: &'a Chart, kind: NodeKind, key: &str) -> &'a Node {
    chart
        .nodes(Layer::Marks)
        .map(|(_, n)| n)
        .find(|n| n.kind == kind && n.key == key)
        .unwrap()
}

#[test]
fn quadrant_guides_are_drawn_once() {
    let mut f = rendered();
    let before = f.chart.nodes(Layer::Axes).count();
    let visible = f
        .overlay
        .add_quadrant_guides(&mut f.chart, &mut f.engine, false, &f.model);
    assert!(visible);
    let after = f.chart.nodes(Layer::Axes).count();
    assert_eq!(after - before, 8);

    assert!(
        f.overlay
            .add_quadrant_guides(&mut f.chart, &mut f.engine, visible, &f.model)
    );
    assert_eq!(f.chart.nodes(Layer::Axes).count(), after);
}

#[test]
fn guides_need_the_axes_layer() {
    let opts = EngineOpts::default();
    let model = ScatterModel::build(&genre_rows(), &opts);
    let mut chart = Chart::with_layers(opts.geometry, &[Layer::Marks]);
    let mut engine = TransitionEngine::<()>::new();
    let mut overlay = OverlayController::new(&opts);
    assert!(!overlay.add_quadrant_guides(&mut chart, &mut engine, false, &model));
}

#[test]
fn new_dim_replaces_the_previous_one() {
    let mut f = rendered();
    let horror = DimPredicate::ExceptLabel("Horror".into());
    f.overlay.set_dim(&mut f.chart, &mut f.engine, &horror);
    assert_eq!(node(&f.chart, NodeKind::Dot, "Drama").emphasis, Emphasis::Dimmed);
    assert!(node(&f.chart, NodeKind::Dot, "Horror").interactive());

    let drama = DimPredicate::ExceptLabel("Drama".into());
    let dimmed = f.overlay.set_dim(&mut f.chart, &mut f.engine, &drama);
    assert_eq!(node(&f.chart, NodeKind::Dot, "Horror").emphasis, Emphasis::Dimmed);
    assert!(node(&f.chart, NodeKind::Dot, "Drama").interactive());
    // Five other dots and their labels; the label count covers all six categories.
    assert_eq!(dimmed, 5 + 5);

    f.engine.advance(&mut f.chart, f.opts.durations.dim);
    assert_eq!(
        node(&f.chart, NodeKind::Dot, "Horror").props.opacity,
        f.opts.dim_opacity
    );
    assert_eq!(node(&f.chart, NodeKind::Dot, "Drama").props.opacity, 0.85);
}

#[test]
fn zoom_isolates_one_category() {
    let mut f = rendered();
    assert!(
        f.overlay
            .zoom_to_single_category(&mut f.chart, &mut f.engine, "Horror", &f.model)
    );
    f.engine.advance(&mut f.chart, f.opts.durations.zoom);

    let horror = node(&f.chart, NodeKind::Dot, "Horror");
    assert_eq!(horror.props.radius, f.opts.zoom_radius);
    assert_eq!(horror.props.fill, ZOOM_COLOR);
    assert!(horror.displayed);
    let plot = f.opts.geometry.plot_rect();
    assert!((horror.props.x - plot.center().x).abs() < 1e-9);

    assert!(!node(&f.chart, NodeKind::Dot, "Drama").displayed);
    assert!(
        f.chart
            .nodes(Layer::Marks)
            .filter(|(_, n)| n.kind == NodeKind::DotLabel)
            .all(|(_, n)| !n.displayed)
    );
    assert_eq!(f.chart.layer_opacity(Layer::Legend), 0.0);
    assert!(
        f.chart
            .nodes(Layer::Axes)
            .any(|(_, n)| n.kind == NodeKind::Note && n.text.as_deref() == Some("HORROR"))
    );
}

#[test]
fn unknown_zoom_target_changes_nothing() {
    let mut f = rendered();
    let before = snapshot(&f.chart);
    assert!(
        !f.overlay
            .zoom_to_single_category(&mut f.chart, &mut f.engine, "Western", &f.model)
    );
    assert_eq!(snapshot(&f.chart), before);
}

#[test]
fn restore_returns_every_node_to_its_pre_zoom_values() {
    let mut f = rendered();
    let visible = f
        .overlay
        .add_quadrant_guides(&mut f.chart, &mut f.engine, false, &f.model);
    f.engine.advance(&mut f.chart, f.opts.durations.dim);
    let before = snapshot(&f.chart);

    f.overlay
        .zoom_to_single_category(&mut f.chart, &mut f.engine, "Horror", &f.model);
    f.engine.advance(&mut f.chart, f.opts.durations.zoom);
    assert_ne!(snapshot(&f.chart), before);

    assert!(
        f.overlay
            .restore_from_zoom(&mut f.chart, &mut f.engine, &f.model, visible)
    );
    f.engine.advance(&mut f.chart, f.opts.durations.zoom);
    assert_eq!(snapshot(&f.chart), before);
}

#[test]
fn restore_mid_zoom_still_lands_exactly() {
    let mut f = rendered();
    let before = snapshot(&f.chart);
    f.overlay
        .zoom_to_single_category(&mut f.chart, &mut f.engine, "Horror", &f.model);
    f.engine.advance(&mut f.chart, Millis(200));
    f.overlay
        .restore_from_zoom(&mut f.chart, &mut f.engine, &f.model, false);
    f.engine.advance(&mut f.chart, f.opts.durations.zoom);
    assert_eq!(snapshot(&f.chart), before);
}

#[test]
fn restore_without_zoom_is_a_no_op() {
    let mut f = rendered();
    let before = snapshot(&f.chart);
    assert!(
        !f.overlay
            .restore_from_zoom(&mut f.chart, &mut f.engine, &f.model, false)
    );
    assert_eq!(snapshot(&f.chart), before);
    assert!(f.engine.is_idle());
}
