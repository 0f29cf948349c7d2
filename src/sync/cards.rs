use crate::{
    foundation::error::{HitMatrixError, HitMatrixResult},
    router::scene_id::SceneId,
    router::scene_router::HeaderOverride,
};

/// A narrative card in document coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NarrativeCard {
    /// Stable identifier.
    pub id: String,
    /// Top edge in document pixels.
    pub top: f64,
    /// Height in pixels.
    pub height: f64,
    /// Scene to show while the card is active.
    #[serde(default)]
    pub scene: SceneId,
    /// Title override.
    #[serde(default)]
    pub title: Option<String>,
    /// Subtitle override.
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Reserved effect identifier; carried but not interpreted.
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(skip)]
    active: bool,
}

impl NarrativeCard {
    /// Card without overrides.
    pub fn new(id: impl Into<String>, top: f64, height: f64, scene: SceneId) -> Self {
        Self {
            id: id.into(),
            top,
            height,
            scene,
            title: None,
            subtitle: None,
            effect: None,
            active: false,
        }
    }

    /// Builder: title override.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: subtitle override.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Whether this card is highlighted as the active one.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Bottom edge in document pixels.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Vertical center in document pixels.
    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Declared header overrides.
    pub fn header_override(&self) -> HeaderOverride {
        HeaderOverride {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
        }
    }

    pub(crate) fn validate(&self) -> HitMatrixResult<()> {
        if self.id.trim().is_empty() {
            return Err(HitMatrixError::validation("card id must be non-empty"));
        }
        if !self.top.is_finite() || !self.height.is_finite() || self.height <= 0.0 {
            return Err(HitMatrixError::validation(format!(
                "card '{}' needs a finite top and a height > 0",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/cards.rs"]
mod tests;
