use crate::{
    chart::node::{Layer, Node, NodeId},
    chart::surface::{Chart, ChartSurface, Header, Tooltip},
    foundation::core::ChartGeometry,
};

/// One structural call made against a surface.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    /// `clear(layer)`.
    Clear(Layer),
    /// `draw(layer, ..)`.
    Draw(Layer),
    /// `remove(id)`.
    Remove(NodeId),
    /// `set_layer_opacity(layer, value)`.
    LayerOpacity(Layer, f64),
    /// `set_header(..)` with the new title.
    Header(String),
    /// `set_methodology_visible(..)`.
    Methodology(bool),
}

/// Surface wrapper that logs structural calls and delegates to an inner surface.
#[derive(Clone, Debug)]
pub struct RecordingSurface<S = Chart> {
    inner: S,
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface<Chart> {
    /// Recording wrapper over a fresh [`Chart`].
    pub fn new(geometry: ChartGeometry) -> Self {
        Self::wrap(Chart::new(geometry))
    }
}

impl<S: ChartSurface> RecordingSurface<S> {
    /// Wrap an existing surface.
    pub fn wrap(inner: S) -> Self {
        Self {
            inner,
            calls: Vec::new(),
        }
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Drop the recorded calls.
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Wrapped surface.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ChartSurface> ChartSurface for RecordingSurface<S> {
    fn geometry(&self) -> ChartGeometry {
        self.inner.geometry()
    }

    fn has_layer(&self, layer: Layer) -> bool {
        self.inner.has_layer(layer)
    }

    fn clear(&mut self, layer: Layer) {
        self.calls.push(SurfaceCall::Clear(layer));
        self.inner.clear(layer);
    }

    fn draw(&mut self, layer: Layer, node: Node) -> Option<NodeId> {
        self.calls.push(SurfaceCall::Draw(layer));
        self.inner.draw(layer, node)
    }

    fn remove(&mut self, id: NodeId) {
        self.calls.push(SurfaceCall::Remove(id));
        self.inner.remove(id);
    }

    fn ids(&self, layer: Layer) -> Vec<NodeId> {
        self.inner.ids(layer)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.inner.node(id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.inner.node_mut(id)
    }

    fn layer_opacity(&self, layer: Layer) -> f64 {
        self.inner.layer_opacity(layer)
    }

    fn set_layer_opacity(&mut self, layer: Layer, opacity: f64) {
        self.calls.push(SurfaceCall::LayerOpacity(layer, opacity));
        self.inner.set_layer_opacity(layer, opacity);
    }

    fn header(&self) -> &Header {
        self.inner.header()
    }

    fn set_header(&mut self, header: Header) {
        self.calls.push(SurfaceCall::Header(header.title.clone()));
        self.inner.set_header(header);
    }

    fn methodology_visible(&self) -> bool {
        self.inner.methodology_visible()
    }

    fn set_methodology_visible(&mut self, visible: bool) {
        self.calls.push(SurfaceCall::Methodology(visible));
        self.inner.set_methodology_visible(visible);
    }

    fn tooltip(&self) -> Option<&Tooltip> {
        self.inner.tooltip()
    }

    fn set_tooltip(&mut self, tooltip: Option<Tooltip>) {
        self.inner.set_tooltip(tooltip);
    }
}
