use super::*;
use crate::{
    chart::node::{Node, NodeKind},
    chart::surface::Chart,
    foundation::core::ChartGeometry,
};

fn chart() -> Chart {
    Chart::new(ChartGeometry::default())
}

#[test]
fn crossfade_completion_fires_once_for_many_layers() {
    let mut c = chart();
    let mut eng = TransitionEngine::new();
    eng.crossfade_out(&mut c, &Layer::ALL, Millis(400), "render");
    assert!(eng.advance(&mut c, Millis(200)).is_empty());
    assert!(c.layer_opacity(Layer::Marks) > 0.0);
    assert_eq!(eng.advance(&mut c, Millis(200)), vec!["render"]);
    assert!(eng.advance(&mut c, Millis(1000)).is_empty());
    for l in Layer::ALL {
        assert_eq!(c.layer_opacity(l), 0.0);
    }
    assert!(eng.is_idle());
}

#[test]
fn interrupted_crossfade_never_completes() {
    let mut c = chart();
    let mut eng = TransitionEngine::new();
    eng.crossfade_out(&mut c, &Layer::ALL, Millis(400), "bars");
    eng.advance(&mut c, Millis(100));
    eng.crossfade_out(&mut c, &Layer::ALL, Millis(400), "scatter");
    let mut fired = Vec::new();
    for _ in 0..10 {
        fired.extend(eng.advance(&mut c, Millis(100)));
    }
    assert_eq!(fired, vec!["scatter"]);
}

#[test]
fn crossfade_in_interrupts_pending_fade_out() {
    let mut c = chart();
    let mut eng = TransitionEngine::new();
    eng.crossfade_out(&mut c, &[Layer::Marks], Millis(400), 1);
    eng.crossfade_in(&mut c, &[Layer::Marks], Millis(400));
    let mut fired = Vec::new();
    for _ in 0..5 {
        fired.extend(eng.advance(&mut c, Millis(100)));
    }
    assert!(fired.is_empty());
    assert_eq!(c.layer_opacity(Layer::Marks), 1.0);
}

#[test]
fn finished_tween_lands_exactly_on_target() {
    let mut c = chart();
    let id = c.draw(Layer::Marks, Node::new(NodeKind::Dot, "A")).unwrap();
    let mut eng: TransitionEngine<()> = TransitionEngine::new();
    let target = 0.1 + 0.2;
    eng.animate(
        &mut c,
        Target::Node(id),
        Prop::Radius,
        Value::Scalar(target),
        Millis(333),
        Ease::OutBack,
    );
    eng.advance(&mut c, Millis(100));
    eng.advance(&mut c, Millis(500));
    assert_eq!(c.node(id).unwrap().props.radius.to_bits(), target.to_bits());
}

#[test]
fn direct_set_wins_over_running_tween() {
    let mut c = chart();
    let id = c.draw(Layer::Marks, Node::new(NodeKind::Dot, "A")).unwrap();
    let mut eng: TransitionEngine<()> = TransitionEngine::new();
    let t = Target::Node(id);
    eng.animate(&mut c, t, Prop::X, Value::Scalar(100.0), Millis(400), Ease::Linear);
    eng.advance(&mut c, Millis(100));
    eng.set(&mut c, t, Prop::X, Value::Scalar(7.0));
    eng.advance(&mut c, Millis(1000));
    assert_eq!(c.node(id).unwrap().props.x, 7.0);
}

#[test]
fn tween_on_cleared_node_is_dropped() {
    let mut c = chart();
    let id = c.draw(Layer::Marks, Node::new(NodeKind::Dot, "A")).unwrap();
    let mut eng: TransitionEngine<()> = TransitionEngine::new();
    eng.animate(
        &mut c,
        Target::Node(id),
        Prop::Opacity,
        Value::Scalar(0.1),
        Millis(300),
        Ease::Linear,
    );
    c.clear(Layer::Marks);
    assert!(eng.advance(&mut c, Millis(10)).is_empty());
    assert!(eng.is_idle());
}

#[test]
fn timers_release_in_due_order() {
    let mut c = chart();
    let mut eng = TransitionEngine::new();
    eng.schedule(Millis(600), "late");
    eng.schedule(Millis(100), "early");
    assert_eq!(eng.next_event_in(), Some(Millis(100)));
    assert_eq!(eng.advance(&mut c, Millis(1000)), vec!["early", "late"]);
}

#[test]
fn cancelled_timer_never_fires() {
    let mut c = chart();
    let mut eng = TransitionEngine::new();
    let focus = eng.schedule(Millis(600), "focus");
    eng.schedule(Millis(600), "other");
    assert!(eng.cancel(focus));
    assert!(!eng.cancel(focus));
    assert_eq!(eng.advance(&mut c, Millis(1000)), vec!["other"]);
    assert!(eng.is_idle());
}

#[test]
fn zero_duration_crossfade_completes_next_tick() {
    let mut c = chart();
    let mut eng = TransitionEngine::new();
    eng.crossfade_out(&mut c, &[Layer::Axes], Millis::ZERO, "now");
    assert_eq!(c.layer_opacity(Layer::Axes), 0.0);
    assert_eq!(eng.advance(&mut c, Millis::ZERO), vec!["now"]);
}

#[test]
fn display_flag_switches_at_end() {
    let mut c = chart();
    let id = c.draw(Layer::Marks, Node::new(NodeKind::Dot, "A")).unwrap();
    let mut eng: TransitionEngine<()> = TransitionEngine::new();
    eng.animate(
        &mut c,
        Target::Node(id),
        Prop::Display,
        Value::Flag(false),
        Millis(200),
        Ease::Linear,
    );
    eng.advance(&mut c, Millis(100));
    assert!(c.node(id).unwrap().displayed);
    eng.advance(&mut c, Millis(100));
    assert!(!c.node(id).unwrap().displayed);
}
