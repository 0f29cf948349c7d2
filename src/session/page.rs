use crate::{
    chart::node::NodeId,
    chart::surface::{Chart, ChartSurface, Tooltip},
    data::source::DataSource,
    foundation::core::Millis,
    foundation::error::HitMatrixResult,
    router::scene_id::SceneId,
    router::scene_router::SceneRouter,
    router::state::SceneState,
    session::opts::EngineOpts,
    sync::cards::NarrativeCard,
    sync::scroll::{CardChange, IntersectionEntry, ScrollSync},
};

/// Host event delivered to a [`Page`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PageEvent {
    /// Visibility report for the sticky chart.
    Intersection(IntersectionEntry),
    /// New scroll offset.
    Scroll(f64),
    /// New viewport height.
    Resize(f64),
    /// Time passed.
    Tick(Millis),
    /// Pointer entered a node.
    Hover(NodeId),
    /// Pointer left the hovered node.
    Unhover,
}

/// One page session: the chart surface, the scene router, and scroll sync.
///
/// All host events funnel through here on a single thread, so each handler runs to completion
/// before the next event is seen.
pub struct Page<D, S = Chart> {
    surface: S,
    router: SceneRouter<D>,
    scroll: ScrollSync,
}

impl<D: DataSource> Page<D, Chart> {
    /// Page over a fresh chart with the layers `opts` enables.
    pub fn new(
        source: D,
        cards: Vec<NarrativeCard>,
        opts: EngineOpts,
        viewport_height: f64,
    ) -> HitMatrixResult<Self> {
        let surface = Chart::with_layers(opts.geometry, &opts.layers.layers());
        Self::with_surface(source, cards, opts, viewport_height, surface)
    }
}

impl<D: DataSource, S: ChartSurface> Page<D, S> {
    /// Page drawing onto `surface`.
    pub fn with_surface(
        source: D,
        cards: Vec<NarrativeCard>,
        opts: EngineOpts,
        viewport_height: f64,
        surface: S,
    ) -> HitMatrixResult<Self> {
        for card in &cards {
            card.validate()?;
        }
        let scroll = ScrollSync::new(cards, viewport_height, opts.arm_threshold);
        let router = SceneRouter::new(source, opts)?;
        Ok(Self {
            surface,
            router,
            scroll,
        })
    }

    /// Chart surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Scene state.
    pub fn state(&self) -> &SceneState {
        self.router.state()
    }

    /// Cards with their active flags.
    pub fn cards(&self) -> &[NarrativeCard] {
        self.scroll.cards()
    }

    /// Scene router.
    pub fn router(&self) -> &SceneRouter<D> {
        &self.router
    }

    /// Dispatch one host event.
    pub fn handle(&mut self, event: PageEvent) {
        match event {
            PageEvent::Intersection(entry) => self.on_intersection(entry),
            PageEvent::Scroll(y) => self.on_scroll(y),
            PageEvent::Resize(h) => self.on_resize(h),
            PageEvent::Tick(dt) => self.tick(dt),
            PageEvent::Hover(id) => {
                self.hover(id);
            }
            PageEvent::Unhover => self.unhover(),
        }
    }

    /// Chart visibility changed. The first report at or above the arm threshold renders the
    /// baseline scene.
    pub fn on_intersection(&mut self, entry: IntersectionEntry) {
        if self.scroll.on_intersection(self.router.state_mut(), entry) {
            tracing::debug!(ratio = entry.ratio, "initial render");
            self.router.go(&mut self.surface, SceneId::Baseline);
        }
    }

    /// Page scrolled.
    pub fn on_scroll(&mut self, scroll_y: f64) {
        let change = self.scroll.on_scroll(self.router.state_mut(), scroll_y);
        self.apply(change);
    }

    /// Viewport resized.
    pub fn on_resize(&mut self, height: f64) {
        let change = self.scroll.on_resize(self.router.state_mut(), height);
        self.apply(change);
    }

    /// Advance transitions by `dt`.
    pub fn tick(&mut self, dt: Millis) {
        self.router.tick(&mut self.surface, dt);
    }

    /// Run transitions to completion.
    pub fn settle(&mut self) {
        self.router.settle(&mut self.surface);
    }

    /// Pointer entered `id`.
    pub fn hover(&mut self, id: NodeId) -> Option<Tooltip> {
        self.router.hover(&mut self.surface, id)
    }

    /// Pointer left the hovered node.
    pub fn unhover(&mut self) {
        self.router.unhover(&mut self.surface);
    }

    /// Consume the page, returning its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    fn apply(&mut self, change: Option<CardChange>) {
        let Some(change) = change else {
            return;
        };
        self.router
            .enter_card(&mut self.surface, change.header, change.scene);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/page.rs"]
mod tests;
