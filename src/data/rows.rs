/// A raw cell that may arrive as a JSON number or as display text (`"1,234"`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RawField {
    /// Numeric cell.
    Number(f64),
    /// Text cell, possibly with thousands separators.
    Text(String),
}

impl RawField {
    /// Parse into a finite number. Blank or malformed cells yield `None`.
    pub fn to_f64(&self) -> Option<f64> {
        let v = match self {
            Self::Number(v) => *v,
            Self::Text(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                if cleaned.is_empty() {
                    return None;
                }
                cleaned.parse::<f64>().ok()?
            }
        };
        v.is_finite().then_some(v)
    }
}

impl From<&str> for RawField {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for RawField {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

/// One title from the genre table: multi-valued category field plus reach and quality metrics.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenreRow {
    /// Comma-separated categories (`"Horror,Thriller"`).
    #[serde(default, alias = "genres", alias = "genre")]
    pub categories: Option<String>,
    /// Reach metric (vote count).
    #[serde(default, alias = "votes", alias = "num_votes", alias = "numVotes")]
    pub reach: Option<RawField>,
    /// Quality metric (average rating).
    #[serde(default, alias = "rating", alias = "average_rating", alias = "averageRating")]
    pub quality: Option<RawField>,
}

impl GenreRow {
    /// Convenience constructor from text cells.
    pub fn new(categories: &str, reach: &str, quality: &str) -> Self {
        Self {
            categories: Some(categories.to_string()),
            reach: Some(reach.into()),
            quality: Some(quality.into()),
        }
    }
}

/// One row from a fear-label table.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FearRow {
    /// Free-text fear label; only the canonical vocabulary is honored.
    #[serde(default, alias = "fear", alias = "category", alias = "fear_category")]
    pub label: Option<String>,
}

impl FearRow {
    /// Row with the given label.
    pub fn new(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
        }
    }
}
