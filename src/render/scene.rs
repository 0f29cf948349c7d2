use crate::{
    chart::node::{
        AxisOrient, AxisSpec, AxisTick, Datum, Layer, Node, NodeId, NodeKind, TextAnchor,
    },
    chart::surface::ChartSurface,
    data::aggregate::{CategoryAggregate, aggregate_categories},
    data::fear::FearCount,
    data::rows::GenreRow,
    encode::palette::{BAR_COLOR, BUCKET_COLORS},
    encode::scales::{BandScale, ColorBuckets, LinearScale, ScatterScales},
    foundation::core::{Millis, Rect, Rgba8},
    foundation::math,
    overlay::predicate::Means,
    router::state::BarsDataset,
    session::opts::EngineOpts,
    transition::ease::Ease,
    transition::engine::{Prop, Target, TransitionEngine, Value},
};

const LABEL_GAP: f64 = 6.0;
const X_TICKS: usize = 10;
const Y_TICKS: usize = 6;
const BAR_TICKS: usize = 5;

/// Scatter data plus frozen scales, built once when the genre table loads.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterModel {
    aggregates: Vec<CategoryAggregate>,
    scales: ScatterScales,
}

impl ScatterModel {
    /// Aggregate `rows` and fit scales to `opts.geometry`.
    pub fn build(rows: &[GenreRow], opts: &EngineOpts) -> Self {
        let aggregates = aggregate_categories(rows);
        let scales = ScatterScales::from_aggregates(
            &aggregates,
            &opts.geometry,
            (opts.radius_min, opts.radius_max),
        );
        Self { aggregates, scales }
    }

    /// Aggregates in first-appearance order.
    pub fn aggregates(&self) -> &[CategoryAggregate] {
        &self.aggregates
    }

    /// Scatter encodings.
    pub fn scales(&self) -> &ScatterScales {
        &self.scales
    }

    /// Look up one category.
    pub fn find(&self, label: &str) -> Option<&CategoryAggregate> {
        self.aggregates.iter().find(|a| a.label == label)
    }

    /// Quadrant split point; `None` for an empty dataset.
    pub fn means(&self) -> Option<Means> {
        Some(Means {
            quality: math::mean(self.aggregates.iter().map(|a| a.avg_quality))?,
            reach: math::mean(self.aggregates.iter().map(|a| a.total_reach))?,
        })
    }

    /// The `n` categories with the highest reach; these get text labels.
    pub fn labelled(&self, n: usize) -> Vec<&CategoryAggregate> {
        let mut by_reach: Vec<&CategoryAggregate> = self.aggregates.iter().collect();
        by_reach.sort_by(|a, b| b.total_reach.total_cmp(&a.total_reach));
        by_reach.truncate(n);
        by_reach
    }
}

/// Bar data for one render.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BarsModel {
    /// Source table.
    pub dataset: BarsDataset,
    /// Bars, sorted descending by count.
    pub counts: Vec<FearCount>,
}

/// Resting encoding of one scatter mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DotEncoding {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) radius: f64,
    pub(crate) fill: Rgba8,
}

impl DotEncoding {
    pub(crate) fn of(scales: &ScatterScales, datum: Datum) -> Option<Self> {
        let Datum::Category {
            count,
            quality,
            reach,
        } = datum
        else {
            return None;
        };
        Some(Self {
            x: scales.x.map(quality),
            y: scales.y.map(reach),
            radius: scales.r.map(f64::from(count)),
            fill: ColorBuckets::color(count),
        })
    }

    /// Where the mark's text label sits: centered above the circle.
    pub(crate) fn label_anchor(&self) -> (f64, f64) {
        (self.x, self.y - self.radius - LABEL_GAP)
    }
}

fn datum_of(agg: &CategoryAggregate) -> Datum {
    Datum::Category {
        count: agg.count,
        quality: agg.avg_quality,
        reach: agg.total_reach,
    }
}

fn format_tick(v: f64) -> String {
    if v.fract().abs() < 1e-9 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

fn axis_node(orient: AxisOrient, plot: Rect, ticks: Vec<AxisTick>, title: &str) -> Node {
    let spec = AxisSpec {
        orient,
        ticks,
        title: title.to_string(),
    };
    match orient {
        AxisOrient::Bottom => Node::new(NodeKind::Axis, "x")
            .at(plot.x0, plot.y1)
            .sized(plot.width(), 0.0)
            .axis(spec),
        AxisOrient::Left => Node::new(NodeKind::Axis, "y")
            .at(plot.x0, plot.y0)
            .sized(0.0, plot.height())
            .axis(spec),
    }
}

/// Bottom and left axes for a pair of scatter scales.
pub(crate) fn scatter_axes(x: &LinearScale, y: &LinearScale, plot: Rect) -> [Node; 2] {
    let x_ticks = x
        .ticks(X_TICKS)
        .into_iter()
        .map(|v| AxisTick {
            pos: x.map(v),
            label: format_tick(v),
        })
        .collect();
    let y_ticks = y
        .ticks(Y_TICKS)
        .into_iter()
        .map(|v| AxisTick {
            pos: y.map(v),
            label: math::format_thousands(v),
        })
        .collect();
    [
        axis_node(AxisOrient::Bottom, plot, x_ticks, "Average rating"),
        axis_node(AxisOrient::Left, plot, y_ticks, "Total votes"),
    ]
}

fn clear_layers<S: ChartSurface + ?Sized>(surface: &mut S) {
    for layer in Layer::ALL {
        if surface.has_layer(layer) {
            surface.clear(layer);
        } else {
            tracing::warn!(?layer, "chart layer missing; its content is skipped");
        }
    }
}

/// Draws a full chart into the three layers. Rendering always starts from cleared layers.
#[derive(Clone, Debug)]
pub struct SceneRenderer {
    opts: EngineOpts,
}

impl SceneRenderer {
    /// Renderer using `opts` for geometry, timings, and label count.
    pub fn new(opts: EngineOpts) -> Self {
        Self { opts }
    }

    /// Scatter: one circle per category growing from zero radius, labels on the highest-reach
    /// categories, axes, and the six-bucket legend.
    #[tracing::instrument(skip_all, fields(marks = model.aggregates.len()))]
    pub fn render_scatter<S: ChartSurface + ?Sized, A>(
        &self,
        surface: &mut S,
        engine: &mut TransitionEngine<A>,
        model: &ScatterModel,
    ) {
        clear_layers(surface);
        let plot = self.opts.geometry.plot_rect();
        let scales = model.scales();

        // Largest first so small circles paint on top.
        let mut order: Vec<&CategoryAggregate> = model.aggregates.iter().collect();
        order.sort_by(|a, b| b.count.cmp(&a.count));
        for agg in order {
            let datum = datum_of(agg);
            let Some(enc) = DotEncoding::of(scales, datum) else {
                continue;
            };
            let node = Node::new(NodeKind::Dot, agg.label.clone())
                .at(enc.x, enc.y)
                .radius(0.0)
                .fill(enc.fill)
                .datum(datum);
            if let Some(id) = surface.draw(Layer::Marks, node) {
                engine.animate(
                    surface,
                    Target::Node(id),
                    Prop::Radius,
                    Value::Scalar(enc.radius),
                    self.opts.durations.grow,
                    Ease::OutCubic,
                );
            }
        }

        for agg in model.labelled(self.opts.label_top_n) {
            let datum = datum_of(agg);
            let Some(enc) = DotEncoding::of(scales, datum) else {
                continue;
            };
            let (lx, ly) = enc.label_anchor();
            surface.draw(
                Layer::Marks,
                Node::new(NodeKind::DotLabel, agg.label.clone())
                    .at(lx, ly)
                    .text(agg.label.clone(), 11.0, TextAnchor::Middle)
                    .datum(datum),
            );
        }

        for axis in scatter_axes(&scales.x, &scales.y, plot) {
            surface.draw(Layer::Axes, axis);
        }

        let (lx, ly) = (plot.x1 - 110.0, plot.y0 + 10.0);
        for i in 0..ColorBuckets::len() {
            let label = ColorBuckets::legend_label(i);
            let y = ly + 20.0 * i as f64;
            surface.draw(
                Layer::Legend,
                Node::new(NodeKind::LegendSwatch, label.clone())
                    .at(lx, y)
                    .radius(6.0)
                    .fill(BUCKET_COLORS[i]),
            );
            surface.draw(
                Layer::Legend,
                Node::new(NodeKind::LegendLabel, label.clone())
                    .at(lx + 14.0, y + 4.0)
                    .text(label, 11.0, TextAnchor::Start),
            );
        }
    }

    /// Horizontal bars in the given (already sorted) order, widths growing from zero.
    #[tracing::instrument(skip_all, fields(dataset = ?bars.dataset, bars = bars.counts.len()))]
    pub fn render_bars<S: ChartSurface + ?Sized, A>(
        &self,
        surface: &mut S,
        engine: &mut TransitionEngine<A>,
        bars: &BarsModel,
    ) {
        clear_layers(surface);
        let plot = self
            .opts
            .geometry
            .with_left_margin(self.opts.bars_left_margin)
            .plot_rect();
        let y = BandScale::new(
            bars.counts.iter().map(|c| c.label.clone()).collect(),
            (plot.y0, plot.y1),
            self.opts.bar_padding,
        );
        let max = bars.counts.iter().map(|c| c.count).max().unwrap_or(0).max(1);
        let x = LinearScale::new((0.0, f64::from(max)), (plot.x0, plot.x1)).nice(BAR_TICKS);
        let bw = y.bandwidth();
        let grow = self.opts.durations.grow;

        for c in &bars.counts {
            let Some(top) = y.position(&c.label) else {
                continue;
            };
            let datum = Datum::Fear { count: c.count };
            let end = x.map(f64::from(c.count));
            if let Some(id) = surface.draw(
                Layer::Marks,
                Node::new(NodeKind::Bar, c.label.clone())
                    .at(plot.x0, top)
                    .sized(0.0, bw)
                    .fill(BAR_COLOR)
                    .datum(datum),
            ) {
                self.grow(surface, engine, id, Prop::Width, end - plot.x0, grow);
            }
            if let Some(id) = surface.draw(
                Layer::Marks,
                Node::new(NodeKind::BarLabel, c.label.clone())
                    .at(plot.x0 + LABEL_GAP, top + bw / 2.0 + 4.0)
                    .text(c.count.to_string(), 11.0, TextAnchor::Start)
                    .datum(datum),
            ) {
                self.grow(surface, engine, id, Prop::X, end + LABEL_GAP, grow);
            }
        }

        let category_ticks = y
            .labels()
            .iter()
            .filter_map(|l| {
                Some(AxisTick {
                    pos: y.position(l)? + bw / 2.0,
                    label: l.clone(),
                })
            })
            .collect();
        let count_ticks = x
            .ticks(BAR_TICKS)
            .into_iter()
            .map(|v| AxisTick {
                pos: x.map(v),
                label: math::format_thousands(v),
            })
            .collect();
        let title = match bars.dataset {
            BarsDataset::Flat => "Synopses mentioning the fear",
            BarsDataset::Grouped => "Synopses mentioning a fear in the family",
        };
        surface.draw(
            Layer::Axes,
            axis_node(AxisOrient::Bottom, plot, count_ticks, title),
        );
        surface.draw(Layer::Axes, axis_node(AxisOrient::Left, plot, category_ticks, ""));
    }

    fn grow<S: ChartSurface + ?Sized, A>(
        &self,
        surface: &mut S,
        engine: &mut TransitionEngine<A>,
        id: NodeId,
        prop: Prop,
        to: f64,
        duration: Millis,
    ) {
        engine.animate(
            surface,
            Target::Node(id),
            prop,
            Value::Scalar(to),
            duration,
            self.opts.ease,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
