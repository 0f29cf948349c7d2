use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    data::rows::{FearRow, GenreRow},
    foundation::error::{HitMatrixError, HitMatrixResult},
};

/// Which fear table to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FearTable {
    /// Manually corrected labels, used by the ungrouped view.
    Corrected,
    /// Base labels, used by the grouped view.
    Base,
}

/// Provider of the raw tables. Implementations may perform IO; callers cache results.
pub trait DataSource {
    /// Load the genre table.
    fn load_genre_rows(&mut self) -> HitMatrixResult<Vec<GenreRow>>;

    /// Load one of the fear tables.
    fn load_fear_rows(&mut self, table: FearTable) -> HitMatrixResult<Vec<FearRow>>;
}

impl<D: DataSource + ?Sized> DataSource for Box<D> {
    fn load_genre_rows(&mut self) -> HitMatrixResult<Vec<GenreRow>> {
        (**self).load_genre_rows()
    }

    fn load_fear_rows(&mut self, table: FearTable) -> HitMatrixResult<Vec<FearRow>> {
        (**self).load_fear_rows(table)
    }
}

/// Reads JSON arrays of rows from disk.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    genres: PathBuf,
    fears_corrected: PathBuf,
    fears_base: PathBuf,
}

impl JsonFileSource {
    /// Source reading the three tables from the given files.
    pub fn new(
        genres: impl Into<PathBuf>,
        fears_corrected: impl Into<PathBuf>,
        fears_base: impl Into<PathBuf>,
    ) -> Self {
        Self {
            genres: genres.into(),
            fears_corrected: fears_corrected.into(),
            fears_base: fears_base.into(),
        }
    }

    fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> HitMatrixResult<Vec<T>> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read table '{}'", path.display()))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            HitMatrixError::data(format!("parse table '{}': {e}", path.display()))
        })
    }
}

impl DataSource for JsonFileSource {
    #[tracing::instrument(skip(self), fields(path = %self.genres.display()))]
    fn load_genre_rows(&mut self) -> HitMatrixResult<Vec<GenreRow>> {
        Self::read_rows(&self.genres)
    }

    #[tracing::instrument(skip(self))]
    fn load_fear_rows(&mut self, table: FearTable) -> HitMatrixResult<Vec<FearRow>> {
        match table {
            FearTable::Corrected => Self::read_rows(&self.fears_corrected),
            FearTable::Base => Self::read_rows(&self.fears_base),
        }
    }
}

/// In-memory tables with load counters and failure injection.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    genres: Vec<GenreRow>,
    fears_corrected: Vec<FearRow>,
    fears_base: Vec<FearRow>,
    genre_loads: u32,
    fear_loads: u32,
    fail_genre_loads: u32,
    fail_fear_loads: u32,
}

impl InMemorySource {
    /// Source serving the given tables.
    pub fn new(
        genres: Vec<GenreRow>,
        fears_corrected: Vec<FearRow>,
        fears_base: Vec<FearRow>,
    ) -> Self {
        Self {
            genres,
            fears_corrected,
            fears_base,
            ..Self::default()
        }
    }

    /// Make the next `n` genre loads fail.
    pub fn fail_next_genre_loads(mut self, n: u32) -> Self {
        self.fail_genre_loads = n;
        self
    }

    /// Make the next `n` fear loads fail.
    pub fn fail_next_fear_loads(mut self, n: u32) -> Self {
        self.fail_fear_loads = n;
        self
    }

    /// Number of genre loads issued so far.
    pub fn genre_loads(&self) -> u32 {
        self.genre_loads
    }

    /// Number of fear loads issued so far.
    pub fn fear_loads(&self) -> u32 {
        self.fear_loads
    }
}

impl DataSource for InMemorySource {
    fn load_genre_rows(&mut self) -> HitMatrixResult<Vec<GenreRow>> {
        self.genre_loads += 1;
        if self.fail_genre_loads > 0 {
            self.fail_genre_loads -= 1;
            return Err(HitMatrixError::data("genre table unavailable"));
        }
        Ok(self.genres.clone())
    }

    fn load_fear_rows(&mut self, table: FearTable) -> HitMatrixResult<Vec<FearRow>> {
        self.fear_loads += 1;
        if self.fail_fear_loads > 0 {
            self.fail_fear_loads -= 1;
            return Err(HitMatrixError::data("fear table unavailable"));
        }
        Ok(match table {
            FearTable::Corrected => self.fears_corrected.clone(),
            FearTable::Base => self.fears_base.clone(),
        })
    }
}

/// A dataset loaded at most once per session.
///
/// A successful load is cached for the rest of the session. A failed load is not cached, so
/// the next request retries.
#[derive(Debug)]
pub struct LazyDataset<T> {
    value: Option<Arc<T>>,
    attempts: u32,
}

impl<T> Default for LazyDataset<T> {
    fn default() -> Self {
        Self {
            value: None,
            attempts: 0,
        }
    }
}

impl<T> LazyDataset<T> {
    /// Cached value, if loaded.
    pub fn get(&self) -> Option<&Arc<T>> {
        self.value.as_ref()
    }

    /// Number of load attempts so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Return the cached value or run `load` once to produce it.
    pub fn get_or_try_load(
        &mut self,
        load: impl FnOnce() -> HitMatrixResult<T>,
    ) -> HitMatrixResult<Arc<T>> {
        if let Some(v) = &self.value {
            return Ok(Arc::clone(v));
        }
        self.attempts += 1;
        let v = Arc::new(load()?);
        self.value = Some(Arc::clone(&v));
        Ok(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/source.rs"]
mod tests;
