use std::sync::Arc;

use crate::{
    chart::node::{Layer, NodeId},
    chart::surface::{ChartSurface, Header, Tooltip},
    data::fear::{Supergroup, count_fears, count_fears_grouped, validate_supergroup_mapping},
    data::rows::FearRow,
    data::source::{DataSource, FearTable, LazyDataset},
    foundation::core::Millis,
    foundation::error::HitMatrixResult,
    overlay::controller::OverlayController,
    overlay::predicate::{DimPredicate, Quadrant},
    render::scene::{BarsModel, ScatterModel, SceneRenderer},
    render::tooltip::tooltip_for,
    router::scene_id::{SceneId, SceneKind},
    router::state::{BarsDataset, SceneMode, SceneState, ScatterFocus},
    session::opts::EngineOpts,
    transition::engine::{CompletionToken, TransitionEngine},
};

const HORROR: &str = "Horror";
const HIGH_VIEWS: [&str; 3] = ["Drama", "Comedy", "Action"];
const SETTLE_LIMIT: usize = 10_000;

const HORROR_TITLE: &str = "The Horror Exception";
const HORROR_SUBTITLE: &str = "Rated low, watched anyway";
const BARS_TITLE: &str = "What Scares Us";
const BARS_SUBTITLE: &str = "Horror synopses by core fear";
const GROUPED_TITLE: &str = "Four Families of Fear";
const GROUPED_SUBTITLE: &str = "Horror synopses by fear family";

/// Work deferred until a crossfade or delay completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PendingAction {
    /// Render the scatter, fade it in, then run `resume`.
    EnterScatter { resume: SceneId },
    /// Render bars from `dataset`, fade them in, then run `resume`.
    EnterBars {
        dataset: BarsDataset,
        resume: SceneId,
    },
    /// Emphasize one supergroup if bars are still shown.
    ApplyBarFocus(Supergroup),
}

type SceneHandler<D, S> = fn(&mut SceneRouter<D>, &mut S, SceneId) -> HitMatrixResult<()>;

/// Title / subtitle overrides declared by the active narrative card.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderOverride {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement subtitle.
    pub subtitle: Option<String>,
}

impl HeaderOverride {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.subtitle.is_none()
    }

    fn apply_to(&self, header: &Header) -> Header {
        Header {
            title: self.title.clone().unwrap_or_else(|| header.title.clone()),
            subtitle: self.subtitle.clone().or_else(|| header.subtitle.clone()),
        }
    }
}

/// Scene state machine: maps scene identifiers onto renders, overlays, and crossfades.
///
/// Owns the session's datasets (each loaded at most once), the transition clock, and the
/// [`SceneState`]. Chart-kind swaps always go crossfade out, render, crossfade in; requests
/// arriving mid-crossfade retarget it and the latest request wins.
pub struct SceneRouter<D> {
    source: D,
    opts: EngineOpts,
    scatter: LazyDataset<ScatterModel>,
    fears_corrected: LazyDataset<Vec<FearRow>>,
    fears_base: LazyDataset<Vec<FearRow>>,
    bars: Option<BarsModel>,
    card_header: HeaderOverride,
    state: SceneState,
    renderer: SceneRenderer,
    overlay: OverlayController,
    engine: TransitionEngine<PendingAction>,
    focus_timer: Option<CompletionToken>,
}

impl<D: DataSource> SceneRouter<D> {
    /// Router over `source`. Fails on invalid options or an incomplete supergroup mapping.
    pub fn new(source: D, opts: EngineOpts) -> HitMatrixResult<Self> {
        opts.validate()?;
        validate_supergroup_mapping()?;
        Ok(Self {
            renderer: SceneRenderer::new(opts.clone()),
            overlay: OverlayController::new(&opts),
            source,
            opts,
            scatter: LazyDataset::default(),
            fears_corrected: LazyDataset::default(),
            fears_base: LazyDataset::default(),
            bars: None,
            card_header: HeaderOverride::default(),
            state: SceneState::default(),
            engine: TransitionEngine::new(),
            focus_timer: None,
        })
    }

    /// Current scene state.
    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut SceneState {
        &mut self.state
    }

    /// Options in effect.
    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    /// Underlying data source.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// Transition clock.
    pub fn now(&self) -> Millis {
        self.engine.now()
    }

    /// No transitions or delayed actions outstanding.
    pub fn is_idle(&self) -> bool {
        self.engine.is_idle()
    }

    /// Scatter data, once loaded.
    pub fn scatter_model(&self) -> Option<&ScatterModel> {
        self.scatter.get().map(Arc::as_ref)
    }

    /// Bars currently rendered.
    pub fn bars_model(&self) -> Option<&BarsModel> {
        self.bars.as_ref()
    }

    /// Load attempts per dataset: (genres, corrected fears, base fears).
    pub fn load_attempts(&self) -> (u32, u32, u32) {
        (
            self.scatter.attempts(),
            self.fears_corrected.attempts(),
            self.fears_base.attempts(),
        )
    }

    /// Move to `scene`. Failures are logged and leave the current chart in place.
    #[tracing::instrument(skip(self, surface))]
    pub fn go<S: ChartSurface + ?Sized>(&mut self, surface: &mut S, scene: SceneId) {
        if let Err(err) = self.try_go(surface, scene) {
            tracing::warn!(%err, "scene change failed; keeping the current chart");
        }
    }

    /// Like [`Self::go`], but reports a failed data load.
    pub fn try_go<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        scene: SceneId,
    ) -> HitMatrixResult<()> {
        let kind = scene.kind();
        if kind == SceneKind::Noop {
            return Ok(());
        }
        // Load before touching the chart so a failure leaves it untouched.
        self.load_for(scene)?;
        tracing::debug!(from = ?self.state.visual_state(), "entering scene");
        // A newer request supersedes any group focus still waiting on its delay.
        self.cancel_focus();

        if scene != SceneId::HorrorZoom {
            self.restore_zoom(surface);
        }
        surface.set_tooltip(None);
        surface.set_methodology_visible(kind == SceneKind::Bars);
        Self::handler::<S>(scene)(self, surface, scene)
    }

    /// Record the active card's header overrides and show them unless bars own the header.
    pub fn set_card_header<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        overrides: HeaderOverride,
    ) {
        self.card_header = overrides;
        if self.state.effective_mode() != SceneMode::Bars && !self.card_header.is_empty() {
            let header = self.card_header.apply_to(surface.header());
            surface.set_header(header);
        }
    }

    /// Activate a narrative card: record its header overrides, then move to its scene.
    ///
    /// Overrides are not painted when the card leads into bars, which own the header from the
    /// moment the fade out starts.
    pub fn enter_card<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        overrides: HeaderOverride,
        scene: SceneId,
    ) {
        if scene.is_bars() {
            self.card_header = overrides;
        } else {
            self.set_card_header(surface, overrides);
        }
        self.go(surface, scene);
    }

    /// Advance the transition clock and run whatever completed.
    pub fn tick<S: ChartSurface + ?Sized>(&mut self, surface: &mut S, dt: Millis) {
        for action in self.engine.advance(surface, dt) {
            self.complete(surface, action);
        }
    }

    /// Run the clock until no transitions or delayed actions remain.
    pub fn settle<S: ChartSurface + ?Sized>(&mut self, surface: &mut S) {
        for _ in 0..SETTLE_LIMIT {
            let Some(dt) = self.engine.next_event_in() else {
                return;
            };
            self.tick(surface, dt);
        }
        tracing::warn!("transitions did not settle");
    }

    /// Show the tooltip for `id`, or clear it if the node is not a live, hoverable mark.
    pub fn hover<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        id: NodeId,
    ) -> Option<Tooltip> {
        let tooltip = self.tooltip(surface, id);
        surface.set_tooltip(tooltip.clone());
        tooltip
    }

    /// Clear the tooltip.
    pub fn unhover<S: ChartSurface + ?Sized>(&mut self, surface: &mut S) {
        surface.set_tooltip(None);
    }

    fn tooltip<S: ChartSurface + ?Sized>(&self, surface: &S, id: NodeId) -> Option<Tooltip> {
        if self.state.pending.is_some() {
            return None;
        }
        let bars = match self.state.mode {
            SceneMode::None => return None,
            SceneMode::Scatter => None,
            SceneMode::Bars => Some(self.state.bars_dataset?),
        };
        tooltip_for(surface.node(id)?, bars)
    }

    fn handler<S: ChartSurface + ?Sized>(scene: SceneId) -> SceneHandler<D, S> {
        match scene {
            SceneId::Baseline | SceneId::Quadrants => Self::scene_baseline::<S>,
            SceneId::HighViews => Self::scene_high_views::<S>,
            SceneId::CriticalDarlings => Self::scene_critical_darlings::<S>,
            SceneId::Horror => Self::scene_horror::<S>,
            SceneId::HorrorZoom => Self::scene_horror_zoom::<S>,
            SceneId::Bars => Self::scene_bars::<S>,
            SceneId::BarsGrouped => Self::scene_bars_grouped::<S>,
            SceneId::BarsFocus(_) => Self::scene_bars_focus::<S>,
            SceneId::Noop => Self::scene_noop::<S>,
        }
    }

    fn scene_noop<S: ChartSurface + ?Sized>(&mut self, _: &mut S, _: SceneId) -> HitMatrixResult<()> {
        Ok(())
    }

    fn scene_baseline<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        scene: SceneId,
    ) -> HitMatrixResult<()> {
        if self.scatter_scene(surface, scene, None)? {
            surface.set_header(self.default_header());
        }
        Ok(())
    }

    fn scene_high_views<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        scene: SceneId,
    ) -> HitMatrixResult<()> {
        self.scatter_scene(surface, scene, Some(ScatterFocus::HighViews))?;
        Ok(())
    }

    fn scene_critical_darlings<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        scene: SceneId,
    ) -> HitMatrixResult<()> {
        self.scatter_scene(surface, scene, Some(ScatterFocus::CriticalDarlings))?;
        Ok(())
    }

    fn scene_horror<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        scene: SceneId,
    ) -> HitMatrixResult<()> {
        if self.scatter_scene(surface, scene, Some(ScatterFocus::Horror))? {
            surface.set_header(horror_header());
        }
        Ok(())
    }

    fn scene_horror_zoom<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        scene: SceneId,
    ) -> HitMatrixResult<()> {
        let Some(model) = self.ensure_scatter(surface, scene)? else {
            return Ok(());
        };
        self.show_guides(surface, &model);
        let zoomed = self
            .overlay
            .zoom_to_single_category(surface, &mut self.engine, HORROR, &model);
        self.state.zoomed = zoomed;
        if zoomed {
            surface.set_header(horror_header());
        }
        Ok(())
    }

    fn scene_bars<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        scene: SceneId,
    ) -> HitMatrixResult<()> {
        if self.ensure_bars(surface, BarsDataset::Flat, scene)? {
            self.focus_group(surface, None);
        }
        Ok(())
    }

    fn scene_bars_grouped<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        scene: SceneId,
    ) -> HitMatrixResult<()> {
        if self.ensure_bars(surface, BarsDataset::Grouped, scene)? {
            self.focus_group(surface, None);
        }
        Ok(())
    }

    fn scene_bars_focus<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        scene: SceneId,
    ) -> HitMatrixResult<()> {
        let SceneId::BarsFocus(group) = scene else {
            return Ok(());
        };
        match (self.state.mode, self.state.pending) {
            (SceneMode::Bars, None) => self.focus_group(surface, Some(group)),
            (SceneMode::None, None) => {
                self.render_bars(surface, BarsDataset::Flat)?;
                self.schedule_focus(group);
            }
            _ => self.begin_crossfade(
                surface,
                SceneMode::Bars,
                PendingAction::EnterBars {
                    dataset: BarsDataset::Flat,
                    resume: scene,
                },
            ),
        }
        Ok(())
    }

    /// Ensure the scatter, guides, and the dim for `focus`. Returns `false` when a crossfade was
    /// started instead; the scene then resumes after the fade.
    fn scatter_scene<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        scene: SceneId,
        focus: Option<ScatterFocus>,
    ) -> HitMatrixResult<bool> {
        let Some(model) = self.ensure_scatter(surface, scene)? else {
            return Ok(false);
        };
        self.show_guides(surface, &model);
        let predicate = match focus {
            None => DimPredicate::Clear,
            Some(ScatterFocus::HighViews) => {
                DimPredicate::ExceptLabels(HIGH_VIEWS.iter().map(|s| s.to_string()).collect())
            }
            Some(ScatterFocus::CriticalDarlings) => match model.means() {
                Some(means) => DimPredicate::ExceptQuadrant {
                    quadrant: Quadrant::CriticalDarlings,
                    means,
                },
                None => DimPredicate::Clear,
            },
            Some(ScatterFocus::Horror) => DimPredicate::ExceptLabel(HORROR.to_string()),
        };
        self.overlay.set_dim(surface, &mut self.engine, &predicate);
        self.state.scatter_focus = focus;
        self.state.horror_focused = focus == Some(ScatterFocus::Horror);
        Ok(true)
    }

    fn show_guides<S: ChartSurface + ?Sized>(&mut self, surface: &mut S, model: &ScatterModel) {
        self.state.quadrants_visible = self.overlay.add_quadrant_guides(
            surface,
            &mut self.engine,
            self.state.quadrants_visible,
            model,
        );
    }

    fn focus_group<S: ChartSurface + ?Sized>(&mut self, surface: &mut S, group: Option<Supergroup>) {
        let predicate = group.map_or(DimPredicate::Clear, DimPredicate::ExceptGroup);
        self.overlay.set_dim(surface, &mut self.engine, &predicate);
        self.state.bar_focus = group;
    }

    fn schedule_focus(&mut self, group: Supergroup) {
        self.cancel_focus();
        self.focus_timer = Some(self.engine.schedule(
            self.opts.durations.group_focus_delay,
            PendingAction::ApplyBarFocus(group),
        ));
    }

    fn cancel_focus(&mut self) {
        if let Some(token) = self.focus_timer.take()
            && self.engine.cancel(token)
        {
            tracing::debug!("pending group focus superseded");
        }
    }

    /// Scatter model if the scatter is on screen (rendering it directly from a cold start).
    fn ensure_scatter<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        resume: SceneId,
    ) -> HitMatrixResult<Option<Arc<ScatterModel>>> {
        let model = self.scatter_data()?;
        match (self.state.mode, self.state.pending) {
            (SceneMode::Scatter, None) => Ok(Some(model)),
            (SceneMode::None, None) => {
                self.render_scatter(surface, &model);
                Ok(Some(model))
            }
            _ => {
                self.begin_crossfade(surface, SceneMode::Scatter, PendingAction::EnterScatter {
                    resume,
                });
                Ok(None)
            }
        }
    }

    /// `true` if bars from `dataset` are on screen (rendering them directly from a cold start).
    fn ensure_bars<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        dataset: BarsDataset,
        resume: SceneId,
    ) -> HitMatrixResult<bool> {
        match (self.state.mode, self.state.pending, self.state.bars_dataset) {
            (SceneMode::Bars, None, Some(shown)) if shown == dataset => Ok(true),
            (SceneMode::None, None, _) => {
                self.render_bars(surface, dataset)?;
                Ok(true)
            }
            _ => {
                self.begin_crossfade(surface, SceneMode::Bars, PendingAction::EnterBars {
                    dataset,
                    resume,
                });
                Ok(false)
            }
        }
    }

    fn begin_crossfade<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        to: SceneMode,
        action: PendingAction,
    ) {
        tracing::debug!(?to, ?action, "crossfade out");
        self.state.pending = Some(to);
        self.engine
            .crossfade_out(surface, &Layer::ALL, self.opts.durations.crossfade, action);
    }

    fn complete<S: ChartSurface + ?Sized>(&mut self, surface: &mut S, action: PendingAction) {
        tracing::debug!(?action, "transition complete");
        match action {
            PendingAction::EnterScatter { resume } => {
                let Some(model) = self.scatter.get().cloned() else {
                    self.state.pending = None;
                    return;
                };
                self.render_scatter(surface, &model);
                self.engine
                    .crossfade_in(surface, &Layer::ALL, self.opts.durations.crossfade);
                self.resume(surface, resume);
            }
            PendingAction::EnterBars { dataset, resume } => {
                if let Err(err) = self.render_bars(surface, dataset) {
                    tracing::warn!(%err, "bars render failed");
                    self.state.pending = None;
                    return;
                }
                self.engine
                    .crossfade_in(surface, &Layer::ALL, self.opts.durations.crossfade);
                match resume {
                    SceneId::BarsFocus(group) => self.schedule_focus(group),
                    other => self.resume(surface, other),
                }
            }
            PendingAction::ApplyBarFocus(group) => {
                self.focus_timer = None;
                if self.state.mode == SceneMode::Bars && self.state.pending.is_none() {
                    self.focus_group(surface, Some(group));
                } else {
                    tracing::debug!(?group, "bars left before focus; dropping");
                }
            }
        }
    }

    fn resume<S: ChartSurface + ?Sized>(&mut self, surface: &mut S, scene: SceneId) {
        if let Err(err) = Self::handler::<S>(scene)(self, surface, scene) {
            tracing::warn!(%err, %scene, "resumed scene failed");
        }
    }

    fn render_scatter<S: ChartSurface + ?Sized>(&mut self, surface: &mut S, model: &ScatterModel) {
        self.renderer.render_scatter(surface, &mut self.engine, model);
        self.overlay.reset();
        self.bars = None;
        self.state.rendered(SceneMode::Scatter, None);
        let header = self.card_header.apply_to(&self.default_header());
        surface.set_header(header);
    }

    fn render_bars<S: ChartSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        dataset: BarsDataset,
    ) -> HitMatrixResult<()> {
        let bars = self.bar_counts(dataset)?;
        self.renderer.render_bars(surface, &mut self.engine, &bars);
        self.overlay.reset();
        self.state.rendered(SceneMode::Bars, Some(dataset));
        surface.set_header(bars_header(dataset));
        self.bars = Some(bars);
        Ok(())
    }

    fn restore_zoom<S: ChartSurface + ?Sized>(&mut self, surface: &mut S) {
        let Some(model) = self.scatter.get().cloned() else {
            return;
        };
        if self.overlay.restore_from_zoom(
            surface,
            &mut self.engine,
            &model,
            self.state.quadrants_visible,
        ) {
            self.state.zoomed = false;
        }
    }

    fn load_for(&mut self, scene: SceneId) -> HitMatrixResult<()> {
        match scene {
            SceneId::Bars | SceneId::BarsFocus(_) => {
                self.fear_rows(FearTable::Corrected)?;
            }
            SceneId::BarsGrouped => {
                self.fear_rows(FearTable::Base)?;
            }
            SceneId::Noop => {}
            _ => {
                self.scatter_data()?;
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn scatter_data(&mut self) -> HitMatrixResult<Arc<ScatterModel>> {
        let (source, opts) = (&mut self.source, &self.opts);
        self.scatter.get_or_try_load(|| {
            let rows = source.load_genre_rows()?;
            let model = ScatterModel::build(&rows, opts);
            tracing::info!(
                rows = rows.len(),
                categories = model.aggregates().len(),
                "genre table loaded"
            );
            Ok(model)
        })
    }

    #[tracing::instrument(skip(self))]
    fn fear_rows(&mut self, table: FearTable) -> HitMatrixResult<Arc<Vec<FearRow>>> {
        let source = &mut self.source;
        let cache = match table {
            FearTable::Corrected => &mut self.fears_corrected,
            FearTable::Base => &mut self.fears_base,
        };
        cache.get_or_try_load(|| {
            let rows = source.load_fear_rows(table)?;
            tracing::info!(rows = rows.len(), "fear table loaded");
            Ok(rows)
        })
    }

    fn bar_counts(&mut self, dataset: BarsDataset) -> HitMatrixResult<BarsModel> {
        let counts = match dataset {
            BarsDataset::Flat => count_fears(&self.fear_rows(FearTable::Corrected)?),
            BarsDataset::Grouped => count_fears_grouped(&self.fear_rows(FearTable::Base)?)?,
        };
        Ok(BarsModel { dataset, counts })
    }

    fn default_header(&self) -> Header {
        Header {
            title: self.opts.default_title.clone(),
            subtitle: self.opts.default_subtitle.clone(),
        }
    }
}

fn horror_header() -> Header {
    Header {
        title: HORROR_TITLE.to_string(),
        subtitle: Some(HORROR_SUBTITLE.to_string()),
    }
}

fn bars_header(dataset: BarsDataset) -> Header {
    let (title, subtitle) = match dataset {
        BarsDataset::Flat => (BARS_TITLE, BARS_SUBTITLE),
        BarsDataset::Grouped => (GROUPED_TITLE, GROUPED_SUBTITLE),
    };
    Header {
        title: title.to_string(),
        subtitle: Some(subtitle.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/router/scene_router.rs"]
mod tests;
