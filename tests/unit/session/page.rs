use super::*;
use crate::{
    chart::node::Layer,
    data::source::InMemorySource,
    fixtures::{fear_rows, genre_rows},
    router::state::{SceneMode, VisualState},
};

fn cards() -> Vec<NarrativeCard> {
    vec![
        NarrativeCard::new("intro", 0.0, 600.0, SceneId::Baseline),
        NarrativeCard::new("popular", 700.0, 600.0, SceneId::HighViews).with_title("Crowd favorites"),
        NarrativeCard::new("fears", 1400.0, 600.0, SceneId::Bars).with_title("Ignored in bars"),
    ]
}

fn page() -> Page<InMemorySource> {
    let source = InMemorySource::new(genre_rows(), fear_rows(), fear_rows());
    Page::new(source, cards(), EngineOpts::default(), 800.0).unwrap()
}

fn visible(ratio: f64) -> IntersectionEntry {
    IntersectionEntry {
        is_intersecting: true,
        ratio,
    }
}

#[test]
fn nothing_renders_until_the_chart_is_visible_enough() {
    let mut p = page();
    p.handle(PageEvent::Intersection(visible(0.2)));
    p.handle(PageEvent::Scroll(600.0));
    assert_eq!(p.state().mode(), SceneMode::None);
    assert_eq!(p.state().active_card(), None);
    assert_eq!(p.surface().nodes(Layer::Marks).count(), 0);

    p.handle(PageEvent::Intersection(visible(0.3)));
    assert_eq!(p.state().mode(), SceneMode::Scatter);
    assert_eq!(p.surface().header().title, "The Hit Matrix");
    assert_eq!(p.router().source().genre_loads(), 1);
}

#[test]
fn initial_render_happens_once() {
    let mut p = page();
    p.on_intersection(visible(0.5));
    p.settle();
    let marks = p.surface().nodes(Layer::Marks).count();
    p.on_intersection(visible(0.0));
    p.on_intersection(visible(0.9));
    assert_eq!(p.surface().nodes(Layer::Marks).count(), marks);
    assert!(p.router().is_idle());
}

#[test]
fn scrolling_activates_cards_and_applies_headers() {
    let mut p = page();
    p.on_intersection(visible(1.0));
    p.settle();

    p.on_scroll(600.0);
    assert_eq!(p.state().active_card(), Some(1));
    assert!(p.cards()[1].is_active());
    assert!(!p.cards()[0].is_active());
    assert_eq!(p.surface().header().title, "Crowd favorites");
    assert_eq!(
        p.state().visual_state(),
        VisualState::ScatterFocused(crate::router::state::ScatterFocus::HighViews)
    );

    p.on_scroll(1300.0);
    p.settle();
    assert_eq!(p.state().active_card(), Some(2));
    assert_eq!(p.state().mode(), SceneMode::Bars);
    assert_eq!(p.surface().header().title, "What Scares Us");
    assert!(p.surface().methodology_visible());
}

#[test]
fn bars_card_title_never_shows_during_the_fade_out() {
    let mut p = page();
    p.on_intersection(visible(1.0));
    p.settle();
    p.on_scroll(600.0);
    p.settle();

    p.on_scroll(1300.0);
    assert_eq!(p.state().pending(), Some(SceneMode::Bars));
    assert_eq!(p.surface().header().title, "Crowd favorites");
    p.tick(Millis(100));
    assert_ne!(p.surface().header().title, "Ignored in bars");
    p.settle();
    assert_eq!(p.surface().header().title, "What Scares Us");
}

#[test]
fn resize_can_change_the_active_card() {
    let mut p = page();
    p.on_intersection(visible(1.0));
    p.on_scroll(300.0);
    // Viewport 300..1100, center 700: intro center 300, popular center 1000.
    assert_eq!(p.state().active_card(), Some(1));
    p.on_resize(200.0);
    // Viewport 300..500, center 400: only intro intersects.
    assert_eq!(p.state().active_card(), Some(0));
}

#[test]
fn hover_through_the_page_returns_a_tooltip() {
    let mut p = page();
    p.on_intersection(visible(1.0));
    p.settle();
    let id = p
        .surface()
        .nodes(Layer::Marks)
        .find(|(_, n)| n.key == "Drama")
        .map(|(id, _)| id)
        .unwrap();
    let tip = p.hover(id).unwrap();
    assert_eq!(tip.title, "Drama");
    p.handle(PageEvent::Unhover);
    assert!(p.surface().tooltip().is_none());
}
