use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

use crate::{
    data::source::JsonFileSource,
    foundation::error::{HitMatrixError, HitMatrixResult},
    session::opts::EngineOpts,
    sync::cards::NarrativeCard,
};

/// Dataset files, relative to the story file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DataPaths {
    /// Genre table (one row per title).
    pub genres: String,
    /// Manually corrected fear labels.
    pub fears_corrected: String,
    /// Base fear labels, used by the grouped view.
    pub fears_base: String,
}

fn default_viewport_height() -> f64 {
    800.0
}

/// A narrative page: its datasets, cards, and engine options.
///
/// This is the JSON-facing description of a page. Paths are resolved against the directory the
/// story was loaded from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StoryConfig {
    /// Dataset files.
    pub data: DataPaths,
    /// Narrative cards in document order.
    pub cards: Vec<NarrativeCard>,
    /// Engine options; omitted fields take their defaults.
    #[serde(default)]
    pub opts: EngineOpts,
    /// Initial viewport height in pixels.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
}

impl StoryConfig {
    /// Parse a story from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> HitMatrixResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| HitMatrixError::serde(format!("parse story JSON: {e}")))
    }

    /// Parse a story from a JSON string.
    pub fn from_json_str(s: &str) -> HitMatrixResult<Self> {
        serde_json::from_str(s).map_err(|e| HitMatrixError::serde(format!("parse story JSON: {e}")))
    }

    /// Parse a story from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> HitMatrixResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            HitMatrixError::validation(format!("open story JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check options, cards, and dataset paths.
    pub fn validate(&self) -> HitMatrixResult<()> {
        self.opts.validate()?;
        if !self.viewport_height.is_finite() || self.viewport_height <= 0.0 {
            return Err(HitMatrixError::validation(
                "viewport_height must be finite and > 0",
            ));
        }

        validate_rel_path(&self.data.genres, "data.genres")?;
        validate_rel_path(&self.data.fears_corrected, "data.fears_corrected")?;
        validate_rel_path(&self.data.fears_base, "data.fears_base")?;

        let mut seen = HashSet::new();
        for card in &self.cards {
            card.validate()?;
            if !seen.insert(card.id.as_str()) {
                return Err(HitMatrixError::validation(format!(
                    "duplicate card id '{}'",
                    card.id
                )));
            }
        }
        Ok(())
    }

    /// File-backed source for this story's datasets, resolved against `root`.
    pub fn data_source(&self, root: &Path) -> JsonFileSource {
        JsonFileSource::new(
            root.join(&self.data.genres),
            root.join(&self.data.fears_corrected),
            root.join(&self.data.fears_base),
        )
    }
}

fn validate_rel_path(path: &str, field: &str) -> HitMatrixResult<()> {
    if path.trim().is_empty() {
        return Err(HitMatrixError::validation(format!(
            "{field} must be non-empty"
        )));
    }
    let s = path.replace('\\', "/");
    if s.starts_with('/') {
        return Err(HitMatrixError::validation(format!(
            "{field} must be a relative path"
        )));
    }
    if s.split('/').any(|part| part == "..") {
        return Err(HitMatrixError::validation(format!(
            "{field} must not contain '..'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/session/story.rs"]
mod tests;
