use std::collections::HashMap;

use crate::{
    chart::node::{Layer, NodeId},
    chart::surface::ChartSurface,
    foundation::core::{Millis, Rgba8},
    foundation::math::Lerp,
    transition::ease::Ease,
};

/// What a tween writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// Layer-wide property (opacity only).
    Layer(Layer),
    /// Property of one node.
    Node(NodeId),
}

/// Animatable property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prop {
    /// Opacity.
    Opacity,
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Circle radius.
    Radius,
    /// Bar width.
    Width,
    /// Fill color.
    Fill,
    /// Display flag; switches when the tween ends.
    Display,
}

/// A property value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// Numeric property.
    Scalar(f64),
    /// Color property.
    Color(Rgba8),
    /// Boolean property.
    Flag(bool),
}

impl Value {
    fn interpolate(from: Value, to: Value, t: f64) -> Value {
        match (from, to) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(f64::lerp(&a, &b, t)),
            (Value::Color(a), Value::Color(b)) => Value::Color(Rgba8::lerp(&a, &b, t)),
            _ => from,
        }
    }
}

fn read<S: ChartSurface + ?Sized>(surface: &S, target: Target, prop: Prop) -> Option<Value> {
    match target {
        Target::Layer(layer) => match prop {
            Prop::Opacity if surface.has_layer(layer) => {
                Some(Value::Scalar(surface.layer_opacity(layer)))
            }
            _ => None,
        },
        Target::Node(id) => {
            let node = surface.node(id)?;
            let p = &node.props;
            Some(match prop {
                Prop::Opacity => Value::Scalar(p.opacity),
                Prop::X => Value::Scalar(p.x),
                Prop::Y => Value::Scalar(p.y),
                Prop::Radius => Value::Scalar(p.radius),
                Prop::Width => Value::Scalar(p.width),
                Prop::Fill => Value::Color(p.fill),
                Prop::Display => Value::Flag(node.displayed),
            })
        }
    }
}

fn write<S: ChartSurface + ?Sized>(surface: &mut S, target: Target, prop: Prop, v: Value) -> bool {
    match target {
        Target::Layer(layer) => match (prop, v) {
            (Prop::Opacity, Value::Scalar(o)) if surface.has_layer(layer) => {
                surface.set_layer_opacity(layer, o);
                true
            }
            _ => false,
        },
        Target::Node(id) => {
            let Some(node) = surface.node_mut(id) else {
                return false;
            };
            match (prop, v) {
                (Prop::Opacity, Value::Scalar(o)) => node.props.opacity = o.clamp(0.0, 1.0),
                (Prop::X, Value::Scalar(x)) => node.props.x = x,
                (Prop::Y, Value::Scalar(y)) => node.props.y = y,
                (Prop::Radius, Value::Scalar(r)) => node.props.radius = r.max(0.0),
                (Prop::Width, Value::Scalar(w)) => node.props.width = w.max(0.0),
                (Prop::Fill, Value::Color(c)) => node.props.fill = c,
                (Prop::Display, Value::Flag(d)) => node.displayed = d,
                _ => return false,
            }
            true
        }
    }
}

/// Handle for a scheduled completion (crossfade end or timer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CompletionToken(u64);

/// Payload released at most once.
#[derive(Debug)]
struct OneShot<A> {
    payload: Option<A>,
}

impl<A> OneShot<A> {
    fn new(payload: A) -> Self {
        Self {
            payload: Some(payload),
        }
    }

    fn fire(&mut self) -> Option<A> {
        self.payload.take()
    }
}

#[derive(Clone, Debug)]
struct Tween {
    target: Target,
    prop: Prop,
    from: Value,
    to: Value,
    start: Millis,
    duration: Millis,
    ease: Ease,
    group: Option<u64>,
}

impl Tween {
    fn end(&self) -> Millis {
        self.start.after(self.duration)
    }
}

#[derive(Debug)]
struct Timer<A> {
    due: Millis,
    token: u64,
    action: A,
}

/// Timed property changes and delayed actions on a virtual clock.
///
/// At most one tween runs per `(target, prop)`. Starting a new tween, or setting the
/// property directly, interrupts the old one: the fresher write wins and the interrupted
/// tween never signals completion. Crossfade completions are released through a one-shot
/// latch, so a group of faded layers produces exactly one action.
#[derive(Debug)]
pub struct TransitionEngine<A> {
    now: Millis,
    tweens: Vec<Tween>,
    latches: HashMap<u64, OneShot<A>>,
    timers: Vec<Timer<A>>,
    next_token: u64,
}

impl<A> Default for TransitionEngine<A> {
    fn default() -> Self {
        Self {
            now: Millis::ZERO,
            tweens: Vec::new(),
            latches: HashMap::new(),
            timers: Vec::new(),
            next_token: 0,
        }
    }
}

impl<A> TransitionEngine<A> {
    /// Engine at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// No running tweens and no pending timers.
    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty() && self.timers.is_empty()
    }

    /// Number of running tweens.
    pub fn running(&self) -> usize {
        self.tweens.len()
    }

    /// Time until the next tween end or timer, if any.
    pub fn next_event_in(&self) -> Option<Millis> {
        self.tweens
            .iter()
            .map(Tween::end)
            .chain(self.timers.iter().map(|t| t.due))
            .min()
            .map(|at| at.since(self.now))
    }

    fn token(&mut self) -> u64 {
        let t = self.next_token;
        self.next_token += 1;
        t
    }

    fn interrupt(&mut self, target: Target, prop: Prop) {
        let Some(i) = self
            .tweens
            .iter()
            .position(|t| t.target == target && t.prop == prop)
        else {
            return;
        };
        let old = self.tweens.swap_remove(i);
        if let Some(g) = old.group {
            if !self.tweens.iter().any(|t| t.group == Some(g)) {
                self.latches.remove(&g);
            }
        }
    }

    /// Write `value` now, interrupting any tween on the same property.
    pub fn set<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        target: Target,
        prop: Prop,
        value: Value,
    ) {
        self.interrupt(target, prop);
        write(surface, target, prop, value);
    }

    /// Tween the current value toward `to`.
    pub fn animate<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        target: Target,
        prop: Prop,
        to: Value,
        duration: Millis,
        ease: Ease,
    ) {
        self.animate_in_group(surface, target, prop, to, duration, ease, None);
    }

    #[allow(clippy::too_many_arguments)]
    fn animate_in_group<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        target: Target,
        prop: Prop,
        to: Value,
        duration: Millis,
        ease: Ease,
        group: Option<u64>,
    ) -> bool {
        self.interrupt(target, prop);
        let Some(from) = read(surface, target, prop) else {
            return false;
        };
        if duration == Millis::ZERO {
            write(surface, target, prop, to);
            return false;
        }
        self.tweens.push(Tween {
            target,
            prop,
            from,
            to,
            start: self.now,
            duration,
            ease,
            group,
        });
        true
    }

    /// Fade `layers` to zero opacity; `on_done` is released once, when the first faded layer
    /// finishes. If every fade is later interrupted, `on_done` is dropped.
    pub fn crossfade_out<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        layers: &[Layer],
        duration: Millis,
        on_done: A,
    ) -> CompletionToken {
        let token = self.token();
        self.latches.insert(token, OneShot::new(on_done));
        let mut started = false;
        for layer in layers {
            started |= self.animate_in_group(
                surface,
                Target::Layer(*layer),
                Prop::Opacity,
                Value::Scalar(0.0),
                duration,
                Ease::InOutCubic,
                Some(token),
            );
        }
        if !started {
            // Nothing to wait on (zero duration or no such layers): complete on the next tick.
            if let Some(action) = self.latches.remove(&token).and_then(|mut l| l.fire()) {
                self.timers.push(Timer {
                    due: self.now,
                    token,
                    action,
                });
            }
        }
        CompletionToken(token)
    }

    /// Snap `layers` to zero opacity, then fade them to full.
    pub fn crossfade_in<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        layers: &[Layer],
        duration: Millis,
    ) {
        for layer in layers {
            let target = Target::Layer(*layer);
            self.set(surface, target, Prop::Opacity, Value::Scalar(0.0));
            self.animate(
                surface,
                target,
                Prop::Opacity,
                Value::Scalar(1.0),
                duration,
                Ease::InOutCubic,
            );
        }
    }

    /// Release `action` after `delay`.
    pub fn schedule(&mut self, delay: Millis, action: A) -> CompletionToken {
        let token = self.token();
        self.timers.push(Timer {
            due: self.now.after(delay),
            token,
            action,
        });
        CompletionToken(token)
    }

    /// Withdraw a pending completion. Returns `false` if it already fired or was dropped.
    pub fn cancel(&mut self, token: CompletionToken) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.token != token.0);
        let latched = self.latches.remove(&token.0).is_some();
        latched || self.timers.len() != before
    }

    /// Advance the clock by `dt`, writing tween values and returning released actions in
    /// order: crossfade completions first, then timers by due time.
    pub fn advance<S: ChartSurface + ?Sized>(&mut self, surface: &mut S, dt: Millis) -> Vec<A> {
        self.now = self.now.after(dt);
        let now = self.now;
        let mut out = Vec::new();
        let mut ended_groups = Vec::new();

        let mut i = 0;
        while i < self.tweens.len() {
            let tw = &self.tweens[i];
            let elapsed = now.since(tw.start).0 as f64;
            let t = (elapsed / tw.duration.0 as f64).min(1.0);
            let value = if t >= 1.0 {
                tw.to
            } else {
                Value::interpolate(tw.from, tw.to, tw.ease.apply(t))
            };
            let alive = write(surface, tw.target, tw.prop, value);
            if !alive {
                // Target vanished mid-flight (layer cleared): drop without signalling.
                self.tweens.swap_remove(i);
                continue;
            }
            if t >= 1.0 {
                let done = self.tweens.swap_remove(i);
                if let Some(g) = done.group {
                    ended_groups.push(g);
                }
                continue;
            }
            i += 1;
        }

        for g in ended_groups {
            if let Some(action) = self.latches.get_mut(&g).and_then(OneShot::fire) {
                out.push(action);
            }
            if !self.tweens.iter().any(|t| t.group == Some(g)) {
                self.latches.remove(&g);
            }
        }

        let mut due: Vec<Timer<A>> = Vec::new();
        let mut k = 0;
        while k < self.timers.len() {
            if self.timers[k].due <= now {
                due.push(self.timers.swap_remove(k));
            } else {
                k += 1;
            }
        }
        due.sort_by_key(|t| (t.due, t.token));
        out.extend(due.into_iter().map(|t| t.action));

        // Orphaned latches (all member tweens dropped) can never fire.
        let tweens = &self.tweens;
        self.latches
            .retain(|g, _| tweens.iter().any(|t| t.group == Some(*g)));
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/engine.rs"]
mod tests;
