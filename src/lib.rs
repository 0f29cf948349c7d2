//! Hitmatrix is a scroll-driven scene engine for a two-chart data narrative.
//!
//! A genre scatterplot (reach against average rating, sized and colored by title count) and a
//! horror fear-category bar chart share one chart surface. Narrative cards declare which scene
//! they want; as the reader scrolls, the card nearest the viewport center becomes active and the
//! scene router moves the chart there, crossfading whenever the chart kind changes.
//!
//! # Pipeline overview
//!
//! 1. **Load**: a [`DataSource`] yields raw rows; each dataset is loaded at most once per session.
//! 2. **Aggregate**: genre rows explode into per-category aggregates; fear rows are tallied per
//!    canonical label or per supergroup.
//! 3. **Encode**: [`ScatterScales`] and [`BandScale`] map values to pixels, area and color.
//! 4. **Route**: [`SceneRouter`] turns a [`SceneId`] into renders, dims, guides, zooms, and
//!    crossfades on a [`ChartSurface`], all timed by a virtual clock.
//! 5. **Sync**: [`ScrollSync`] picks the active [`NarrativeCard`] and gates scene changes on the
//!    chart being visible enough.
//! 6. **Export** (optional): [`to_svg`] serializes the retained [`Chart`]; [`write_png`]
//!    rasterizes it.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded, event-driven**: every host event runs to completion; there are no locks.
//! - **Deterministic**: transitions advance only when the host ticks the clock.
//! - **Chart access through one trait**: renderer, overlays, and transitions only see
//!   [`ChartSurface`], so tests run against [`RecordingSurface`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod chart;
mod data;
mod encode;
mod foundation;
mod overlay;
mod render;
mod router;
mod session;
mod sync;
mod transition;

#[cfg(test)]
#[path = "../tests/unit/fixtures.rs"]
pub(crate) mod fixtures;

pub use chart::node::{
    AxisOrient, AxisSpec, AxisTick, Datum, Emphasis, Layer, Node, NodeId, NodeKind, Props,
    TextAnchor,
};
pub use chart::recording::{RecordingSurface, SurfaceCall};
pub use chart::surface::{Chart, ChartSurface, Header, Tooltip};
pub use data::aggregate::{
    CategoryAggregate, MIN_CATEGORY_COUNT, Membership, aggregate_categories, explode_memberships,
};
pub use data::fear::{
    FearCount, FearLabel, SUPERGROUP_MAPPING, Supergroup, count_fears, count_fears_grouped,
    count_fears_grouped_with, validate_mapping, validate_supergroup_mapping,
};
pub use data::rows::{FearRow, GenreRow, RawField};
pub use data::source::{DataSource, FearTable, InMemorySource, JsonFileSource, LazyDataset};
pub use encode::palette::{BAR_COLOR, BUCKET_COLORS, GUIDE_COLOR, INK, ZOOM_COLOR};
pub use encode::scales::{
    BUCKET_THRESHOLDS, BandScale, ColorBuckets, LinearScale, ScatterScales, SqrtScale,
};
pub use foundation::core::{ChartGeometry, Edges, Millis, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{HitMatrixError, HitMatrixResult};
pub use overlay::controller::OverlayController;
pub use overlay::predicate::{DimPredicate, Means, Quadrant};
pub use render::raster::{RasterImage, rasterize_svg, write_png};
pub use render::scene::{BarsModel, ScatterModel, SceneRenderer};
pub use render::svg::to_svg;
pub use render::tooltip::{bar_tooltip, scatter_tooltip};
pub use router::scene_id::{SceneId, SceneKind};
pub use router::scene_router::{HeaderOverride, SceneRouter};
pub use router::state::{BarsDataset, ScatterFocus, SceneMode, SceneState, VisualState};
pub use session::opts::{Durations, EngineOpts, LayerToggles};
pub use session::page::{Page, PageEvent};
pub use session::story::{DataPaths, StoryConfig};
pub use sync::cards::NarrativeCard;
pub use sync::scroll::{CardChange, IntersectionEntry, ScrollSync, Viewport, select_active_card};
pub use transition::ease::Ease;
pub use transition::engine::{CompletionToken, Prop, Target, TransitionEngine, Value};
