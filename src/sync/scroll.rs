use crate::{
    router::scene_id::SceneId,
    router::scene_router::HeaderOverride,
    router::state::SceneState,
    sync::cards::NarrativeCard,
};

/// Visible window in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Document offset of the window's top edge.
    pub scroll_y: f64,
    /// Window height.
    pub height: f64,
}

impl Viewport {
    /// Bottom edge in document coordinates.
    pub fn bottom(&self) -> f64 {
        self.scroll_y + self.height
    }

    /// Vertical center in document coordinates.
    pub fn center(&self) -> f64 {
        self.scroll_y + self.height / 2.0
    }
}

/// Visibility report for the sticky chart container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// Whether any part of the container is on screen.
    pub is_intersecting: bool,
    /// Visible fraction of the container in `[0, 1]`.
    pub ratio: f64,
}

/// Outcome of a scroll or resize that picked a different card.
#[derive(Clone, Debug, PartialEq)]
pub struct CardChange {
    /// Previously active card.
    pub previous: Option<usize>,
    /// Newly active card.
    pub current: usize,
    /// Scene the new card declares.
    pub scene: SceneId,
    /// Header overrides the new card declares.
    pub header: HeaderOverride,
}

/// Index of the card whose center is nearest the viewport center, ignoring cards entirely
/// outside the viewport. On a tie the earlier card wins.
pub fn select_active_card(cards: &[NarrativeCard], viewport: Viewport) -> Option<usize> {
    let center = viewport.center();
    let mut best: Option<(usize, f64)> = None;
    for (i, card) in cards.iter().enumerate() {
        if card.bottom() <= viewport.scroll_y || card.top >= viewport.bottom() {
            continue;
        }
        let distance = (card.center() - center).abs();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

/// Tracks the viewport, gates scene changes on chart visibility, and reports card changes.
#[derive(Clone, Debug)]
pub struct ScrollSync {
    cards: Vec<NarrativeCard>,
    viewport: Viewport,
    arm_threshold: f64,
}

impl ScrollSync {
    /// Sync over `cards` with the page scrolled to the top.
    pub fn new(cards: Vec<NarrativeCard>, viewport_height: f64, arm_threshold: f64) -> Self {
        Self {
            cards,
            viewport: Viewport {
                scroll_y: 0.0,
                height: viewport_height,
            },
            arm_threshold,
        }
    }

    /// Cards with their active flags.
    pub fn cards(&self) -> &[NarrativeCard] {
        &self.cards
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update `state.armed` from a chart intersection report. Returns `true` exactly once: on
    /// the first report that arms the engine, when the initial render is due.
    pub fn on_intersection(&mut self, state: &mut SceneState, entry: IntersectionEntry) -> bool {
        let armed = entry.is_intersecting && entry.ratio >= self.arm_threshold;
        if armed != state.armed {
            tracing::debug!(armed, ratio = entry.ratio, "scroll sync arming changed");
        }
        state.armed = armed;
        if armed && !state.initial_rendered {
            state.initial_rendered = true;
            return true;
        }
        false
    }

    /// Record a scroll position and re-select the active card.
    pub fn on_scroll(&mut self, state: &mut SceneState, scroll_y: f64) -> Option<CardChange> {
        self.viewport.scroll_y = scroll_y;
        self.sync(state)
    }

    /// Record a viewport height and re-select the active card.
    pub fn on_resize(&mut self, state: &mut SceneState, height: f64) -> Option<CardChange> {
        self.viewport.height = height;
        self.sync(state)
    }

    /// Re-select the active card; `None` while disarmed or when the selection is unchanged.
    pub fn sync(&mut self, state: &mut SceneState) -> Option<CardChange> {
        if !state.armed {
            return None;
        }
        let next = select_active_card(&self.cards, self.viewport)?;
        if state.active_card == Some(next) {
            return None;
        }
        let previous = state.active_card.replace(next);
        if let Some(old) = previous.and_then(|i| self.cards.get_mut(i)) {
            old.set_active(false);
        }
        let card = self.cards.get_mut(next)?;
        card.set_active(true);
        tracing::debug!(card = %card.id, scene = %card.scene, "card activated");
        Some(CardChange {
            previous,
            current: next,
            scene: card.scene,
            header: card.header_override(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/scroll.rs"]
mod tests;
