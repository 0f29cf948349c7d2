use std::fmt;

use crate::data::fear::Supergroup;

/// Named chart configuration a narrative card asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SceneId {
    /// Plain scatter.
    Baseline,
    /// Scatter with mean guides.
    Quadrants,
    /// Focus on the widely seen categories.
    HighViews,
    /// Focus on well rated, rarely seen categories.
    CriticalDarlings,
    /// Focus on horror.
    Horror,
    /// Zoom onto horror.
    HorrorZoom,
    /// Flat fear bars.
    Bars,
    /// Supergroup bars.
    BarsGrouped,
    /// Bars with one supergroup emphasized.
    BarsFocus(Supergroup),
    /// Unknown or missing identifier: ignored.
    #[default]
    Noop,
}

/// Chart kind a scene needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneKind {
    /// Needs the scatter.
    Scatter,
    /// Needs a bar chart.
    Bars,
    /// Needs nothing.
    Noop,
}

impl SceneId {
    /// Parse a scene identifier. Unknown identifiers yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Some(match s {
            "baseline" => Self::Baseline,
            "quadrants" => Self::Quadrants,
            "high-views" => Self::HighViews,
            "critical-darlings" => Self::CriticalDarlings,
            "horror" => Self::Horror,
            "horror-zoom" => Self::HorrorZoom,
            "bars" => Self::Bars,
            "bars_grouped" => Self::BarsGrouped,
            _ => Self::BarsFocus(s.strip_prefix("bars_").and_then(Supergroup::parse)?),
        })
    }

    /// Identifier from a card attribute; missing or unknown values become [`SceneId::Noop`].
    pub fn from_attr(s: Option<&str>) -> Self {
        match s {
            None => Self::Noop,
            Some(s) => Self::parse(s).unwrap_or_else(|| {
                tracing::warn!(scene = s, "unknown scene identifier; ignoring");
                Self::Noop
            }),
        }
    }

    /// Every routable scene.
    pub fn all() -> Vec<SceneId> {
        let mut out = vec![
            Self::Baseline,
            Self::Quadrants,
            Self::HighViews,
            Self::CriticalDarlings,
            Self::Horror,
            Self::HorrorZoom,
            Self::Bars,
            Self::BarsGrouped,
        ];
        out.extend(Supergroup::ALL.into_iter().map(Self::BarsFocus));
        out
    }

    /// Chart kind this scene needs.
    pub fn kind(self) -> SceneKind {
        match self {
            Self::Baseline
            | Self::Quadrants
            | Self::HighViews
            | Self::CriticalDarlings
            | Self::Horror
            | Self::HorrorZoom => SceneKind::Scatter,
            Self::Bars | Self::BarsGrouped | Self::BarsFocus(_) => SceneKind::Bars,
            Self::Noop => SceneKind::Noop,
        }
    }

    /// Bar scenes.
    pub fn is_bars(self) -> bool {
        self.kind() == SceneKind::Bars
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => f.write_str("baseline"),
            Self::Quadrants => f.write_str("quadrants"),
            Self::HighViews => f.write_str("high-views"),
            Self::CriticalDarlings => f.write_str("critical-darlings"),
            Self::Horror => f.write_str("horror"),
            Self::HorrorZoom => f.write_str("horror-zoom"),
            Self::Bars => f.write_str("bars"),
            Self::BarsGrouped => f.write_str("bars_grouped"),
            Self::BarsFocus(g) => write!(f, "bars_{}", g.slug()),
            Self::Noop => f.write_str("noop"),
        }
    }
}

impl serde::Serialize for SceneId {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for SceneId {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(Self::from_attr(raw.as_deref()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/router/scene_id.rs"]
mod tests;
