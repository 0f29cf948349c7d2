use crate::{
    chart::node::{Emphasis, Layer, Node, NodeId, NodeKind, TextAnchor},
    chart::surface::ChartSurface,
    encode::palette::{GUIDE_COLOR, ZOOM_COLOR},
    encode::scales::LinearScale,
    foundation::core::{Millis, Rect},
    foundation::math::format_thousands,
    overlay::predicate::{DimPredicate, Quadrant},
    render::scene::{DotEncoding, ScatterModel, scatter_axes},
    session::opts::EngineOpts,
    transition::ease::Ease,
    transition::engine::{Prop, Target, TransitionEngine, Value},
};

/// Half-width of the zoomed quality window, in rating points.
const ZOOM_QUALITY_PAD: f64 = 1.0;
/// Half-height of the zoomed reach window, as a share of the full reach domain.
const ZOOM_REACH_PAD: f64 = 0.25;
const NOTE_OPACITY: f64 = 0.15;

#[derive(Clone, Debug)]
struct Zoom {
    label: String,
    note: Option<NodeId>,
}

/// Applies emphasis on top of a rendered chart: quadrant guides, dimming, and the
/// single-category zoom. Never clears a layer.
#[derive(Clone, Debug)]
pub struct OverlayController {
    dim_opacity: f64,
    dim: Millis,
    zoom: Millis,
    zoom_radius: f64,
    ease: Ease,
    guides: Vec<NodeId>,
    zoomed: Option<Zoom>,
}

impl OverlayController {
    /// Controller using the dim opacity, timings, and zoom radius from `opts`.
    pub fn new(opts: &EngineOpts) -> Self {
        Self {
            dim_opacity: opts.dim_opacity,
            dim: opts.durations.dim,
            zoom: opts.durations.zoom,
            zoom_radius: opts.zoom_radius,
            ease: opts.ease,
            guides: Vec::new(),
            zoomed: None,
        }
    }

    /// Forget drawn overlays after the renderer cleared the layers.
    pub(crate) fn reset(&mut self) {
        self.guides.clear();
        self.zoomed = None;
    }

    /// Category currently zoomed onto.
    pub fn zoomed_label(&self) -> Option<&str> {
        self.zoomed.as_ref().map(|z| z.label.as_str())
    }

    /// Draw mean guides, mean annotations, and quadrant captions on the axes layer.
    ///
    /// `visible` is the caller's current flag; when set this is a no-op. Returns the new flag:
    /// `false` if the axes layer is missing or there is no data to split.
    #[tracing::instrument(skip_all, fields(visible = visible))]
    pub fn add_quadrant_guides<S: ChartSurface + ?Sized, A>(
        &mut self,
        surface: &mut S,
        engine: &mut TransitionEngine<A>,
        visible: bool,
        model: &ScatterModel,
    ) -> bool {
        if visible {
            return true;
        }
        if !surface.has_layer(Layer::Axes) {
            tracing::warn!("axes layer missing; quadrant guides skipped");
            return false;
        }
        let Some(means) = model.means() else {
            return false;
        };
        let plot = surface.geometry().plot_rect();
        let gx = model.scales().x.map(means.quality);
        let gy = model.scales().y.map(means.reach);

        let mut nodes = vec![
            Node::new(NodeKind::Guide, "quality-mean")
                .at(gx, plot.y0)
                .sized(0.0, plot.height())
                .fill(GUIDE_COLOR),
            Node::new(NodeKind::Guide, "reach-mean")
                .at(plot.x0, gy)
                .sized(plot.width(), 0.0)
                .fill(GUIDE_COLOR),
            Node::new(NodeKind::MeanLabel, "quality-mean")
                .at(gx + 4.0, plot.y0 + 12.0)
                .text(
                    format!("avg rating {:.2}", means.quality),
                    10.0,
                    TextAnchor::Start,
                ),
            Node::new(NodeKind::MeanLabel, "reach-mean")
                .at(plot.x1 - 4.0, gy - 4.0)
                .text(
                    format!("avg votes {}", format_thousands(means.reach)),
                    10.0,
                    TextAnchor::End,
                ),
        ];
        nodes.extend(Quadrant::ALL.into_iter().map(|q| caption(q, plot)));

        for mut node in nodes {
            let to = node.kind.base_opacity();
            node.props.opacity = 0.0;
            let Some(id) = surface.draw(Layer::Axes, node) else {
                continue;
            };
            self.guides.push(id);
            self.fade(surface, engine, id, to, self.dim);
        }
        true
    }

    /// Dim every mark the predicate selects and undim the rest. Replaces any previous dim.
    ///
    /// Emphasis (and therefore hover) flips immediately; opacity fades. Returns how many marks
    /// are dimmed.
    #[tracing::instrument(skip_all, fields(predicate = ?predicate))]
    pub fn set_dim<S: ChartSurface + ?Sized, A>(
        &mut self,
        surface: &mut S,
        engine: &mut TransitionEngine<A>,
        predicate: &DimPredicate,
    ) -> usize {
        let mut dimmed = 0;
        for id in surface.ids(Layer::Marks) {
            let to = {
                let Some(node) = surface.node_mut(id) else {
                    continue;
                };
                if !node.kind.is_mark() {
                    continue;
                }
                let dim = predicate.dims(node);
                dimmed += usize::from(dim);
                node.emphasis = if dim {
                    Emphasis::Dimmed
                } else {
                    Emphasis::Normal
                };
                // Hidden marks pick up their opacity when a restore shows them again.
                if !node.displayed {
                    continue;
                }
                node.resting_opacity(self.dim_opacity)
            };
            self.fade(surface, engine, id, to, self.dim);
        }
        dimmed
    }

    /// Zoom onto one category: it moves to the center and grows, every other mark and label
    /// fades out, axes switch to a local window, the legend and guides fade, and a large
    /// caption appears. Returns `false` (and changes nothing) if the category is unknown.
    #[tracing::instrument(skip(self, surface, engine, model))]
    pub fn zoom_to_single_category<S: ChartSurface + ?Sized, A>(
        &mut self,
        surface: &mut S,
        engine: &mut TransitionEngine<A>,
        label: &str,
        model: &ScatterModel,
    ) -> bool {
        let Some(agg) = model.find(label) else {
            tracing::warn!(label, "zoom target not in dataset");
            return false;
        };
        if self.zoomed_label() == Some(label) {
            return true;
        }
        let base = model.scales();
        let (d0, d1) = base.y.domain();
        let reach_pad = (d1 - d0) * ZOOM_REACH_PAD;
        let x = LinearScale::new(
            (agg.avg_quality - ZOOM_QUALITY_PAD, agg.avg_quality + ZOOM_QUALITY_PAD),
            base.x.range(),
        );
        let y = LinearScale::new(
            (agg.total_reach - reach_pad, agg.total_reach + reach_pad),
            base.y.range(),
        );
        let d = self.zoom;

        for id in surface.ids(Layer::Marks) {
            let Some((kind, is_target)) = surface.node(id).map(|n| (n.kind, n.key == label))
            else {
                continue;
            };
            match kind {
                NodeKind::Dot if is_target => {
                    let t = Target::Node(id);
                    engine.set(surface, t, Prop::Display, Value::Flag(true));
                    self.tween(surface, engine, t, Prop::X, Value::Scalar(x.map(agg.avg_quality)));
                    self.tween(surface, engine, t, Prop::Y, Value::Scalar(y.map(agg.total_reach)));
                    self.tween(surface, engine, t, Prop::Radius, Value::Scalar(self.zoom_radius));
                    self.tween(surface, engine, t, Prop::Fill, Value::Color(ZOOM_COLOR));
                }
                NodeKind::Dot | NodeKind::DotLabel => self.hide(surface, engine, id),
                _ => {}
            }
        }

        let plot = surface.geometry().plot_rect();
        retarget_axes(surface, scatter_axes(&x, &y, plot));
        engine.animate(
            surface,
            Target::Layer(Layer::Legend),
            Prop::Opacity,
            Value::Scalar(0.0),
            d,
            self.ease,
        );
        for id in self.guides.clone() {
            self.hide(surface, engine, id);
        }

        let mut note = Node::new(NodeKind::Note, label)
            .at(plot.center().x, plot.y0 + plot.height() * 0.3)
            .text(label.to_uppercase(), 64.0, TextAnchor::Middle)
            .fill(ZOOM_COLOR);
        note.props.opacity = 0.0;
        let note = surface.draw(Layer::Axes, note);
        if let Some(id) = note {
            self.fade(surface, engine, id, NOTE_OPACITY, d);
        }

        self.zoomed = Some(Zoom {
            label: label.to_string(),
            note,
        });
        true
    }

    /// Undo [`Self::zoom_to_single_category`]. Every mark returns to the values the renderer
    /// would give it; guides come back only if `quadrants_visible`. No-op when not zoomed.
    #[tracing::instrument(skip_all)]
    pub fn restore_from_zoom<S: ChartSurface + ?Sized, A>(
        &mut self,
        surface: &mut S,
        engine: &mut TransitionEngine<A>,
        model: &ScatterModel,
        quadrants_visible: bool,
    ) -> bool {
        let Some(zoom) = self.zoomed.take() else {
            return false;
        };
        let scales = model.scales();

        for id in surface.ids(Layer::Marks) {
            let Some(node) = surface.node(id) else {
                continue;
            };
            let (kind, resting) = (node.kind, node.resting_opacity(self.dim_opacity));
            let Some(enc) = node.datum.and_then(|d| DotEncoding::of(scales, d)) else {
                continue;
            };
            let t = Target::Node(id);
            match kind {
                NodeKind::Dot => {
                    engine.set(surface, t, Prop::Display, Value::Flag(true));
                    self.tween(surface, engine, t, Prop::X, Value::Scalar(enc.x));
                    self.tween(surface, engine, t, Prop::Y, Value::Scalar(enc.y));
                    self.tween(surface, engine, t, Prop::Radius, Value::Scalar(enc.radius));
                    self.tween(surface, engine, t, Prop::Fill, Value::Color(enc.fill));
                    self.tween(surface, engine, t, Prop::Opacity, Value::Scalar(resting));
                }
                NodeKind::DotLabel => {
                    let (lx, ly) = enc.label_anchor();
                    engine.set(surface, t, Prop::Display, Value::Flag(true));
                    self.tween(surface, engine, t, Prop::X, Value::Scalar(lx));
                    self.tween(surface, engine, t, Prop::Y, Value::Scalar(ly));
                    self.tween(surface, engine, t, Prop::Opacity, Value::Scalar(resting));
                }
                _ => {}
            }
        }

        let plot = surface.geometry().plot_rect();
        retarget_axes(surface, scatter_axes(&scales.x, &scales.y, plot));
        engine.animate(
            surface,
            Target::Layer(Layer::Legend),
            Prop::Opacity,
            Value::Scalar(1.0),
            self.zoom,
            self.ease,
        );
        if quadrants_visible {
            for id in self.guides.clone() {
                let Some(to) = surface.node(id).map(|n| n.kind.base_opacity()) else {
                    continue;
                };
                engine.set(surface, Target::Node(id), Prop::Display, Value::Flag(true));
                self.fade(surface, engine, id, to, self.zoom);
            }
        }
        if let Some(id) = zoom.note {
            surface.remove(id);
        }
        true
    }

    fn tween<S: ChartSurface + ?Sized, A>(
        &self,
        surface: &mut S,
        engine: &mut TransitionEngine<A>,
        target: Target,
        prop: Prop,
        to: Value,
    ) {
        engine.animate(surface, target, prop, to, self.zoom, self.ease);
    }

    fn fade<S: ChartSurface + ?Sized, A>(
        &self,
        surface: &mut S,
        engine: &mut TransitionEngine<A>,
        id: NodeId,
        to: f64,
        duration: Millis,
    ) {
        engine.animate(
            surface,
            Target::Node(id),
            Prop::Opacity,
            Value::Scalar(to),
            duration,
            self.ease,
        );
    }

    /// Fade out, then drop from display (and hit testing) when the fade ends.
    fn hide<S: ChartSurface + ?Sized, A>(
        &self,
        surface: &mut S,
        engine: &mut TransitionEngine<A>,
        id: NodeId,
    ) {
        self.fade(surface, engine, id, 0.0, self.zoom);
        self.tween(
            surface,
            engine,
            Target::Node(id),
            Prop::Display,
            Value::Flag(false),
        );
    }
}

fn caption(q: Quadrant, plot: Rect) -> Node {
    let (x, y, anchor) = match q {
        Quadrant::Hits => (plot.x1 - 8.0, plot.y0 + 18.0, TextAnchor::End),
        Quadrant::GuiltyPleasures => (plot.x0 + 8.0, plot.y0 + 18.0, TextAnchor::Start),
        Quadrant::CriticalDarlings => (plot.x1 - 8.0, plot.y1 - 8.0, TextAnchor::End),
        Quadrant::Flops => (plot.x0 + 8.0, plot.y1 - 8.0, TextAnchor::Start),
    };
    Node::new(NodeKind::GuideLabel, q.caption())
        .at(x, y)
        .text(q.caption(), 13.0, anchor)
        .fill(GUIDE_COLOR)
}

/// Swap tick contents on the existing axis nodes, matched by orientation.
fn retarget_axes<S: ChartSurface + ?Sized>(surface: &mut S, axes: [Node; 2]) {
    for id in surface.ids(Layer::Axes) {
        let Some(node) = surface.node_mut(id) else {
            continue;
        };
        let Some(current) = node.axis.as_ref().map(|a| a.orient) else {
            continue;
        };
        if let Some(spec) = axes
            .iter()
            .filter_map(|a| a.axis.as_ref())
            .find(|a| a.orient == current)
        {
            node.axis = Some(spec.clone());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/controller.rs"]
mod tests;
