use crate::foundation::core::Rgba8;

/// The three chart layers. Each is cleared and rebuilt only by the scene renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum Layer {
    /// Data marks and their text labels.
    Marks,
    /// Axes, quadrant guides, and overlay notes.
    Axes,
    /// Color legend.
    Legend,
}

impl Layer {
    /// All layers in paint order.
    pub const ALL: [Layer; 3] = [Self::Marks, Self::Axes, Self::Legend];
}

/// Stable handle to a node on a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Raw identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// What a node depicts; drives export and which overlays touch it.
pub enum NodeKind {
    /// Scatter circle.
    Dot,
    /// Text label attached to a scatter circle.
    DotLabel,
    /// Horizontal bar.
    Bar,
    /// Value label attached to a bar.
    BarLabel,
    /// Axis with ticks.
    Axis,
    /// Quadrant guide line (`width`/`height` hold the line extent).
    Guide,
    /// Quadrant corner label.
    GuideLabel,
    /// Numeric mean annotation next to a guide.
    MeanLabel,
    /// Legend color swatch.
    LegendSwatch,
    /// Legend text.
    LegendLabel,
    /// Large centered overlay text.
    Note,
}

impl NodeKind {
    /// Data marks (and their labels) are the only nodes dim predicates apply to.
    pub fn is_mark(self) -> bool {
        matches!(self, Self::Dot | Self::DotLabel | Self::Bar | Self::BarLabel)
    }

    /// Opacity of an undimmed node of this kind.
    pub fn base_opacity(self) -> f64 {
        match self {
            Self::Dot => 0.85,
            Self::Guide => 0.7,
            _ => 1.0,
        }
    }
}

/// Data carried by a mark, used by hover and dim predicates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum Datum {
    /// Scatter aggregate.
    Category {
        /// Membership count.
        count: u32,
        /// Mean quality.
        quality: f64,
        /// Total reach.
        reach: f64,
    },
    /// Bar frequency.
    Fear {
        /// Frequency.
        count: u32,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Emphasis state; a dimmed mark never receives pointer events.
pub enum Emphasis {
    /// Full opacity, interactive.
    #[default]
    Normal,
    /// De-emphasized, non-interactive.
    Dimmed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Horizontal text alignment.
pub enum TextAnchor {
    /// Left aligned.
    #[default]
    Start,
    /// Centered.
    Middle,
    /// Right aligned.
    End,
}

/// Animatable visual properties.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Props {
    /// Center x (dots), left edge (bars), anchor x (text), start x (lines).
    pub x: f64,
    /// Center y (dots), top edge (bars), baseline y (text), start y (lines).
    pub y: f64,
    /// Circle radius.
    pub radius: f64,
    /// Bar width or line dx.
    pub width: f64,
    /// Bar height or line dy.
    pub height: f64,
    /// Fill / stroke color.
    pub fill: Rgba8,
    /// Node opacity in `[0, 1]`.
    pub opacity: f64,
    /// Text size in pixels.
    pub font_size: f64,
}

impl Default for Props {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            radius: 0.0,
            width: 0.0,
            height: 0.0,
            fill: crate::encode::palette::INK,
            opacity: 1.0,
            font_size: 12.0,
        }
    }
}

/// Axis placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum AxisOrient {
    /// Horizontal axis below the plot.
    Bottom,
    /// Vertical axis left of the plot.
    Left,
}

/// One tick mark.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AxisTick {
    /// Pixel position along the axis.
    pub pos: f64,
    /// Tick label.
    pub label: String,
}

/// Axis contents; the node's `x`/`y` is the axis origin and `width`/`height` its extent.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AxisSpec {
    /// Placement.
    pub orient: AxisOrient,
    /// Ticks in axis order.
    pub ticks: Vec<AxisTick>,
    /// Axis title.
    pub title: String,
}

/// A retained chart element.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Node {
    /// Kind.
    pub kind: NodeKind,
    /// Data-join key (category or fear label); empty for decorations.
    pub key: String,
    /// Text content for text kinds.
    pub text: Option<String>,
    /// Text alignment.
    pub anchor: TextAnchor,
    /// Bound datum for marks.
    pub datum: Option<Datum>,
    /// Axis contents for [`NodeKind::Axis`].
    pub axis: Option<AxisSpec>,
    /// Visual properties.
    pub props: Props,
    /// Dim state.
    pub emphasis: Emphasis,
    /// `false` removes the node from display and hit testing without deleting it.
    pub displayed: bool,
}

impl Node {
    /// Node of `kind` joined on `key`, at base opacity.
    pub fn new(kind: NodeKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            text: None,
            anchor: TextAnchor::Start,
            datum: None,
            axis: None,
            props: Props {
                opacity: kind.base_opacity(),
                ..Props::default()
            },
            emphasis: Emphasis::Normal,
            displayed: true,
        }
    }

    /// Set position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.props.x = x;
        self.props.y = y;
        self
    }

    /// Set width/height.
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.props.width = width;
        self.props.height = height;
        self
    }

    /// Set radius.
    pub fn radius(mut self, r: f64) -> Self {
        self.props.radius = r;
        self
    }

    /// Set fill.
    pub fn fill(mut self, c: Rgba8) -> Self {
        self.props.fill = c;
        self
    }

    /// Set text, size, and alignment.
    pub fn text(mut self, text: impl Into<String>, font_size: f64, anchor: TextAnchor) -> Self {
        self.text = Some(text.into());
        self.props.font_size = font_size;
        self.anchor = anchor;
        self
    }

    /// Bind a datum.
    pub fn datum(mut self, d: Datum) -> Self {
        self.datum = Some(d);
        self
    }

    /// Attach axis contents.
    pub fn axis(mut self, axis: AxisSpec) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Whether pointer events reach this node.
    pub fn interactive(&self) -> bool {
        self.displayed && self.kind.is_mark() && self.emphasis == Emphasis::Normal
    }

    /// Opacity this node should settle at given its current emphasis.
    pub fn resting_opacity(&self, dim_opacity: f64) -> f64 {
        match self.emphasis {
            Emphasis::Normal => self.kind.base_opacity(),
            Emphasis::Dimmed => dim_opacity,
        }
    }
}
