use crate::{
    chart::node::{Datum, Node},
    data::fear::{FearLabel, Supergroup},
};

/// Dataset means splitting the scatter into quadrants.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Means {
    /// Mean of category average quality.
    pub quality: f64,
    /// Mean of category total reach.
    pub reach: f64,
}

/// One quadrant of the quality (x) / reach (y) plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Quadrant {
    /// Loved and widely seen.
    Hits,
    /// Widely seen, poorly rated.
    GuiltyPleasures,
    /// Well rated, rarely seen.
    CriticalDarlings,
    /// Neither.
    Flops,
}

impl Quadrant {
    /// Every quadrant, clockwise from top right.
    pub const ALL: [Quadrant; 4] = [
        Self::Hits,
        Self::CriticalDarlings,
        Self::Flops,
        Self::GuiltyPleasures,
    ];

    /// Corner caption.
    pub fn caption(self) -> &'static str {
        match self {
            Self::Hits => "Hits",
            Self::GuiltyPleasures => "Guilty Pleasures",
            Self::CriticalDarlings => "Critical Darlings",
            Self::Flops => "Flops",
        }
    }

    /// Values on a mean fall into the upper / right half.
    pub fn of(means: Means, quality: f64, reach: f64) -> Self {
        match (quality >= means.quality, reach >= means.reach) {
            (true, true) => Self::Hits,
            (false, true) => Self::GuiltyPleasures,
            (true, false) => Self::CriticalDarlings,
            (false, false) => Self::Flops,
        }
    }
}

/// Which marks a focus leaves undimmed. Everything else is dimmed.
#[derive(Clone, Debug, PartialEq)]
pub enum DimPredicate {
    /// Dim nothing.
    Clear,
    /// Keep one category.
    ExceptLabel(String),
    /// Keep the listed categories.
    ExceptLabels(Vec<String>),
    /// Keep categories in one quadrant.
    ExceptQuadrant {
        /// Kept quadrant.
        quadrant: Quadrant,
        /// Split point.
        means: Means,
    },
    /// Keep bars belonging to a supergroup (flat labels in it, or its grouped bar).
    ExceptGroup(Supergroup),
}

impl DimPredicate {
    /// Whether `node` should be dimmed. Non-mark nodes are never dimmed.
    pub fn dims(&self, node: &Node) -> bool {
        if !node.kind.is_mark() {
            return false;
        }
        match self {
            Self::Clear => false,
            Self::ExceptLabel(label) => node.key != *label,
            Self::ExceptLabels(labels) => !labels.iter().any(|l| *l == node.key),
            Self::ExceptQuadrant { quadrant, means } => match node.datum {
                Some(Datum::Category {
                    quality, reach, ..
                }) => Quadrant::of(*means, quality, reach) != *quadrant,
                _ => true,
            },
            Self::ExceptGroup(group) => {
                let flat = FearLabel::parse(&node.key).and_then(FearLabel::supergroup);
                let grouped = Supergroup::parse(&node.key);
                flat != Some(*group) && grouped != Some(*group)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/predicate.rs"]
mod tests;
