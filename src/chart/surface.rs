use std::collections::BTreeMap;

use crate::{
    chart::node::{Layer, Node, NodeId},
    foundation::core::ChartGeometry,
};

/// Chart title block.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Header {
    /// Title text.
    pub title: String,
    /// Optional subtitle.
    pub subtitle: Option<String>,
}

/// Hover tooltip content.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Tooltip {
    /// Bold first line.
    pub title: String,
    /// Detail lines.
    pub lines: Vec<String>,
}

/// Capability interface over the shared chart surface.
///
/// Scene renderer, overlay controller, transition engine, and router only touch the chart
/// through this trait, so a recording fake can stand in for the real surface.
pub trait ChartSurface {
    /// Geometry the surface was created with.
    fn geometry(&self) -> ChartGeometry;

    /// Whether `layer` exists on this surface.
    fn has_layer(&self, layer: Layer) -> bool;

    /// Remove every node on `layer`.
    fn clear(&mut self, layer: Layer);

    /// Append `node` to `layer`. Drawing to a missing layer returns `None`.
    fn draw(&mut self, layer: Layer, node: Node) -> Option<NodeId>;

    /// Delete one node. Unknown ids are ignored.
    fn remove(&mut self, id: NodeId);

    /// Node ids on `layer` in paint order.
    fn ids(&self, layer: Layer) -> Vec<NodeId>;

    /// Read a node.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Mutate a node.
    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node>;

    /// Layer-wide opacity.
    fn layer_opacity(&self, layer: Layer) -> f64;

    /// Set layer-wide opacity.
    fn set_layer_opacity(&mut self, layer: Layer, opacity: f64);

    /// Current header.
    fn header(&self) -> &Header;

    /// Replace the header.
    fn set_header(&mut self, header: Header);

    /// Whether the methodology affordance is shown.
    fn methodology_visible(&self) -> bool;

    /// Show or hide the methodology affordance.
    fn set_methodology_visible(&mut self, visible: bool);

    /// Current tooltip.
    fn tooltip(&self) -> Option<&Tooltip>;

    /// Show or clear the tooltip.
    fn set_tooltip(&mut self, tooltip: Option<Tooltip>);
}

#[derive(Clone, Debug)]
struct LayerState {
    opacity: f64,
    nodes: Vec<NodeId>,
}

/// Retained in-memory chart: three layers of nodes plus header, tooltip, and the
/// methodology flag. Exported by [`crate::to_svg`].
#[derive(Clone, Debug)]
pub struct Chart {
    geometry: ChartGeometry,
    layers: BTreeMap<Layer, LayerState>,
    nodes: BTreeMap<NodeId, Node>,
    next_id: u64,
    header: Header,
    methodology_visible: bool,
    tooltip: Option<Tooltip>,
}

impl Chart {
    /// Chart with all three layers.
    pub fn new(geometry: ChartGeometry) -> Self {
        Self::with_layers(geometry, &Layer::ALL)
    }

    /// Chart with only the given layers; drawing to the others is refused.
    pub fn with_layers(geometry: ChartGeometry, layers: &[Layer]) -> Self {
        Self {
            geometry,
            layers: layers
                .iter()
                .map(|l| {
                    (
                        *l,
                        LayerState {
                            opacity: 1.0,
                            nodes: Vec::new(),
                        },
                    )
                })
                .collect(),
            nodes: BTreeMap::new(),
            next_id: 0,
            header: Header::default(),
            methodology_visible: false,
            tooltip: None,
        }
    }

    /// Nodes on `layer` in paint order.
    pub fn nodes(&self, layer: Layer) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.layers
            .get(&layer)
            .into_iter()
            .flat_map(|l| l.nodes.iter())
            .filter_map(|id| self.nodes.get(id).map(|n| (*id, n)))
    }
}

impl ChartSurface for Chart {
    fn geometry(&self) -> ChartGeometry {
        self.geometry
    }

    fn has_layer(&self, layer: Layer) -> bool {
        self.layers.contains_key(&layer)
    }

    fn clear(&mut self, layer: Layer) {
        if let Some(state) = self.layers.get_mut(&layer) {
            for id in state.nodes.drain(..) {
                self.nodes.remove(&id);
            }
        }
    }

    fn draw(&mut self, layer: Layer, node: Node) -> Option<NodeId> {
        let state = self.layers.get_mut(&layer)?;
        let id = NodeId(self.next_id);
        self.next_id += 1;
        state.nodes.push(id);
        self.nodes.insert(id, node);
        Some(id)
    }

    fn remove(&mut self, id: NodeId) {
        if self.nodes.remove(&id).is_some() {
            for state in self.layers.values_mut() {
                state.nodes.retain(|n| *n != id);
            }
        }
    }

    fn ids(&self, layer: Layer) -> Vec<NodeId> {
        self.layers
            .get(&layer)
            .map(|l| l.nodes.clone())
            .unwrap_or_default()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    fn layer_opacity(&self, layer: Layer) -> f64 {
        self.layers.get(&layer).map_or(0.0, |l| l.opacity)
    }

    fn set_layer_opacity(&mut self, layer: Layer, opacity: f64) {
        if let Some(state) = self.layers.get_mut(&layer) {
            state.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    fn header(&self) -> &Header {
        &self.header
    }

    fn set_header(&mut self, header: Header) {
        self.header = header;
    }

    fn methodology_visible(&self) -> bool {
        self.methodology_visible
    }

    fn set_methodology_visible(&mut self, visible: bool) {
        self.methodology_visible = visible;
    }

    fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    fn set_tooltip(&mut self, tooltip: Option<Tooltip>) {
        self.tooltip = tooltip;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chart/surface.rs"]
mod tests;
