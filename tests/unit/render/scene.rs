use super::*;
use crate::{
    chart::surface::Chart,
    data::fear::count_fears,
    fixtures::{fear_rows, genre_rows},
};

fn model() -> (EngineOpts, ScatterModel) {
    let opts = EngineOpts::default();
    let model = ScatterModel::build(&genre_rows(), &opts);
    (opts, model)
}

fn radius_of(chart: &Chart, key: &str) -> f64 {
    chart
        .nodes(Layer::Marks)
        .find(|(_, n)| n.kind == NodeKind::Dot && n.key == key)
        .map(|(_, n)| n.props.radius)
        .unwrap()
}

#[test]
fn scatter_draws_one_dot_per_surviving_category() {
    let (opts, model) = model();
    let mut chart = Chart::new(opts.geometry);
    let mut engine = TransitionEngine::<()>::new();
    SceneRenderer::new(opts).render_scatter(&mut chart, &mut engine, &model);

    let dots: Vec<_> = chart
        .nodes(Layer::Marks)
        .filter(|(_, n)| n.kind == NodeKind::Dot)
        .map(|(_, n)| n.key.clone())
        .collect();
    assert_eq!(dots.len(), 6);
    assert!(!dots.iter().any(|k| k == "Thriller"));
}

#[test]
fn radii_grow_from_zero_to_area_true_size() {
    let (opts, model) = model();
    let mut chart = Chart::new(opts.geometry);
    let mut engine = TransitionEngine::<()>::new();
    SceneRenderer::new(opts.clone()).render_scatter(&mut chart, &mut engine, &model);
    assert_eq!(radius_of(&chart, "Drama"), 0.0);

    engine.advance(&mut chart, opts.durations.grow);
    assert_eq!(radius_of(&chart, "Drama"), opts.radius_max);
    // 40 vs 10 memberships: four times the count, twice the radius.
    let ratio = radius_of(&chart, "Drama") / radius_of(&chart, "Documentary");
    assert!((ratio - 2.0).abs() < 1e-12);
}

#[test]
fn small_categories_are_drawn_at_the_radius_floor() {
    let opts = EngineOpts {
        radius_min: 30.0,
        ..EngineOpts::default()
    };
    let model = ScatterModel::build(&genre_rows(), &opts);
    let mut chart = Chart::new(opts.geometry);
    let mut engine = TransitionEngine::<()>::new();
    SceneRenderer::new(opts.clone()).render_scatter(&mut chart, &mut engine, &model);
    engine.advance(&mut chart, opts.durations.grow);

    assert_eq!(radius_of(&chart, "Drama"), 50.0);
    assert_eq!(radius_of(&chart, "Documentary"), 30.0);
}

#[test]
fn legend_has_six_entries_and_labels_follow_reach() {
    let (opts, model) = model();
    let mut chart = Chart::new(opts.geometry);
    let mut engine = TransitionEngine::<()>::new();
    SceneRenderer::new(EngineOpts {
        label_top_n: 2,
        ..opts
    })
    .render_scatter(&mut chart, &mut engine, &model);

    let swatches = chart
        .nodes(Layer::Legend)
        .filter(|(_, n)| n.kind == NodeKind::LegendSwatch)
        .count();
    assert_eq!(swatches, 6);

    let labels: Vec<_> = chart
        .nodes(Layer::Marks)
        .filter(|(_, n)| n.kind == NodeKind::DotLabel)
        .map(|(_, n)| n.key.clone())
        .collect();
    assert_eq!(labels, ["Drama", "Comedy"]);
}

#[test]
fn missing_layers_do_not_stop_the_render() {
    let (opts, model) = model();
    let mut chart = Chart::with_layers(opts.geometry, &[Layer::Marks]);
    let mut engine = TransitionEngine::<()>::new();
    SceneRenderer::new(opts).render_scatter(&mut chart, &mut engine, &model);
    assert!(chart.nodes(Layer::Marks).count() > 0);
    assert_eq!(chart.nodes(Layer::Axes).count(), 0);
}

#[test]
fn means_split_the_fixture_as_expected() {
    let (_, model) = model();
    let m = model.means().unwrap();
    assert!((m.quality - 6.75).abs() < 1e-9);
    assert!(model.find("Thriller").is_none());
}

#[test]
fn bars_are_ordered_and_grow_to_proportional_widths() {
    let opts = EngineOpts::default();
    let bars = BarsModel {
        dataset: BarsDataset::Flat,
        counts: count_fears(&fear_rows()),
    };
    let mut chart = Chart::new(opts.geometry);
    let mut engine = TransitionEngine::<()>::new();
    SceneRenderer::new(opts.clone()).render_bars(&mut chart, &mut engine, &bars);
    engine.advance(&mut chart, opts.durations.grow);

    let drawn: Vec<_> = chart
        .nodes(Layer::Marks)
        .filter(|(_, n)| n.kind == NodeKind::Bar)
        .map(|(_, n)| (n.key.clone(), n.props.y, n.props.width, n.props.x))
        .collect();
    assert_eq!(drawn.len(), 7);
    assert_eq!(drawn[0].0, "Death");
    assert!(drawn.windows(2).all(|w| w[0].1 < w[1].1 && w[0].2 >= w[1].2));
    assert!(drawn.iter().all(|b| b.3 == opts.bars_left_margin));

    // Width is linear in count from a zero baseline.
    let per_unit = drawn[0].2 / 9.0;
    assert!((drawn[6].2 - per_unit * 2.0).abs() < 1e-9);
}
