use super::*;
use crate::chart::node::NodeKind;

fn dot(label: &str, quality: f64, reach: f64) -> Node {
    Node::new(NodeKind::Dot, label).datum(Datum::Category {
        count: 10,
        quality,
        reach,
    })
}

const MEANS: Means = Means {
    quality: 6.0,
    reach: 1000.0,
};

#[test]
fn quadrant_boundaries_belong_to_upper_right() {
    assert_eq!(Quadrant::of(MEANS, 6.0, 1000.0), Quadrant::Hits);
    assert_eq!(Quadrant::of(MEANS, 6.0, 999.0), Quadrant::CriticalDarlings);
    assert_eq!(Quadrant::of(MEANS, 5.9, 5000.0), Quadrant::GuiltyPleasures);
    assert_eq!(Quadrant::of(MEANS, 1.0, 1.0), Quadrant::Flops);
}

#[test]
fn critical_darlings_keeps_high_quality_low_reach() {
    let p = DimPredicate::ExceptQuadrant {
        quadrant: Quadrant::CriticalDarlings,
        means: MEANS,
    };
    assert!(!p.dims(&dot("Documentary", 7.5, 200.0)));
    assert!(p.dims(&dot("Drama", 7.5, 9000.0)));
    assert!(p.dims(&dot("Horror", 4.5, 200.0)));
}

#[test]
fn label_predicates_match_keys() {
    let p = DimPredicate::ExceptLabels(vec!["Drama".into(), "Comedy".into()]);
    assert!(!p.dims(&dot("Drama", 1.0, 1.0)));
    assert!(p.dims(&dot("Horror", 1.0, 1.0)));
    assert!(!DimPredicate::ExceptLabel("Horror".into()).dims(&dot("Horror", 1.0, 1.0)));
    assert!(!DimPredicate::Clear.dims(&dot("Horror", 1.0, 1.0)));
}

#[test]
fn group_predicate_accepts_flat_and_grouped_keys() {
    let p = DimPredicate::ExceptGroup(Supergroup::Body);
    assert!(!p.dims(&Node::new(NodeKind::Bar, "Disease")));
    assert!(!p.dims(&Node::new(NodeKind::BarLabel, "Body")));
    assert!(p.dims(&Node::new(NodeKind::Bar, "Madness")));
    assert!(p.dims(&Node::new(NodeKind::Bar, "Cosmic")));
}

#[test]
fn decorations_are_never_dimmed() {
    let p = DimPredicate::ExceptLabel("nothing".into());
    assert!(!p.dims(&Node::new(NodeKind::Axis, "")));
    assert!(!p.dims(&Node::new(NodeKind::LegendSwatch, "< 50")));
}
