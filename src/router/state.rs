use crate::data::fear::Supergroup;

/// Which chart kind is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum SceneMode {
    /// Nothing rendered yet.
    #[default]
    None,
    /// Category scatter.
    Scatter,
    /// Fear bar chart.
    Bars,
}

/// Which fear table the bar chart shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum BarsDataset {
    /// One bar per canonical label, from the corrected table.
    Flat,
    /// One bar per supergroup, from the base table.
    Grouped,
}

/// Emphasis applied on top of the scatter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ScatterFocus {
    /// Allow-listed high-reach categories.
    HighViews,
    /// High quality, low reach quadrant.
    CriticalDarlings,
    /// The horror category alone.
    Horror,
}

/// Flattened view of what the reader currently sees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum VisualState {
    /// Nothing rendered.
    None,
    /// A crossfade toward `to` is in flight.
    Transitioning {
        /// Target chart kind.
        to: SceneMode,
    },
    /// Plain scatter.
    ScatterBase,
    /// Scatter with quadrant guides.
    ScatterQuadrants,
    /// Scatter with a dim focus.
    ScatterFocused(ScatterFocus),
    /// Scatter zoomed onto one category.
    ScatterZoomed,
    /// Bars without focus.
    Bars(BarsDataset),
    /// Bars with one supergroup emphasized.
    BarsFocused(BarsDataset, Supergroup),
}

/// Scene state shared by the router, overlay, and scroll sync.
///
/// `mode` is what is drawn; `pending` is the chart kind a running crossfade will switch to.
/// Only the router changes either.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct SceneState {
    pub(crate) mode: SceneMode,
    pub(crate) pending: Option<SceneMode>,
    pub(crate) bars_dataset: Option<BarsDataset>,
    pub(crate) quadrants_visible: bool,
    pub(crate) horror_focused: bool,
    pub(crate) scatter_focus: Option<ScatterFocus>,
    pub(crate) bar_focus: Option<Supergroup>,
    pub(crate) zoomed: bool,
    pub(crate) active_card: Option<usize>,
    pub(crate) armed: bool,
    pub(crate) initial_rendered: bool,
}

impl SceneState {
    /// Rendered chart kind.
    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    /// Chart kind of an in-flight crossfade.
    pub fn pending(&self) -> Option<SceneMode> {
        self.pending
    }

    /// Where the chart is headed: the pending kind if a crossfade runs, else the rendered one.
    pub fn effective_mode(&self) -> SceneMode {
        self.pending.unwrap_or(self.mode)
    }

    /// Dataset shown while in bars mode.
    pub fn bars_dataset(&self) -> Option<BarsDataset> {
        self.bars_dataset
    }

    /// Quadrant guides are drawn.
    pub fn quadrants_visible(&self) -> bool {
        self.quadrants_visible
    }

    /// Horror focus is applied.
    pub fn horror_focused(&self) -> bool {
        self.horror_focused
    }

    /// Current scatter dim focus.
    pub fn scatter_focus(&self) -> Option<ScatterFocus> {
        self.scatter_focus
    }

    /// Emphasized supergroup in bars mode.
    pub fn bar_focus(&self) -> Option<Supergroup> {
        self.bar_focus
    }

    /// Scatter is zoomed onto one category.
    pub fn zoomed(&self) -> bool {
        self.zoomed
    }

    /// Index of the active narrative card.
    pub fn active_card(&self) -> Option<usize> {
        self.active_card
    }

    /// Scroll is allowed to drive scenes.
    pub fn armed(&self) -> bool {
        self.armed
    }

    /// The first scene has been rendered.
    pub fn initial_rendered(&self) -> bool {
        self.initial_rendered
    }

    /// Collapse the flags into one value.
    pub fn visual_state(&self) -> VisualState {
        if let Some(to) = self.pending {
            return VisualState::Transitioning { to };
        }
        match self.mode {
            SceneMode::None => VisualState::None,
            SceneMode::Scatter if self.zoomed => VisualState::ScatterZoomed,
            SceneMode::Scatter => match self.scatter_focus {
                Some(f) => VisualState::ScatterFocused(f),
                None if self.quadrants_visible => VisualState::ScatterQuadrants,
                None => VisualState::ScatterBase,
            },
            SceneMode::Bars => {
                let dataset = self.bars_dataset.unwrap_or(BarsDataset::Flat);
                match self.bar_focus {
                    Some(g) => VisualState::BarsFocused(dataset, g),
                    None => VisualState::Bars(dataset),
                }
            }
        }
    }

    /// Reset everything the renderer discards when it redraws.
    pub(crate) fn rendered(&mut self, mode: SceneMode, bars_dataset: Option<BarsDataset>) {
        self.mode = mode;
        self.pending = None;
        self.bars_dataset = bars_dataset;
        self.quadrants_visible = false;
        self.horror_focused = false;
        self.scatter_focus = None;
        self.bar_focus = None;
        self.zoomed = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/router/state.rs"]
mod tests;
