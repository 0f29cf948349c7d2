use crate::{
    chart::node::Layer,
    foundation::core::{ChartGeometry, Millis},
    foundation::error::{HitMatrixError, HitMatrixResult},
    transition::ease::Ease,
};

/// Transition timings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Durations {
    /// Fade-out and fade-in when swapping chart kind.
    pub crossfade: Millis,
    /// Radius / bar-width growth after a render.
    pub grow: Millis,
    /// Dim and undim fades.
    pub dim: Millis,
    /// Zoom in / restore.
    pub zoom: Millis,
    /// Delay before a group focus is applied after a bars render; outlasts the crossfade.
    pub group_focus_delay: Millis,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            crossfade: Millis(400),
            grow: Millis(800),
            dim: Millis(300),
            zoom: Millis(750),
            group_focus_delay: Millis(600),
        }
    }
}

/// Which optional layers the page provides. Marks are always present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayerToggles {
    /// Axes / guides / notes layer.
    pub axes: bool,
    /// Legend layer.
    pub legend: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            axes: true,
            legend: true,
        }
    }
}

impl LayerToggles {
    /// Layers to create on the chart surface.
    pub fn layers(&self) -> Vec<Layer> {
        let mut out = vec![Layer::Marks];
        if self.axes {
            out.push(Layer::Axes);
        }
        if self.legend {
            out.push(Layer::Legend);
        }
        out
    }
}

/// Engine configuration. Every field has a default, so a story may omit `opts` entirely.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// Chart size and scatter margins.
    pub geometry: ChartGeometry,
    /// Largest scatter radius.
    pub radius_max: f64,
    /// Smallest scatter radius; tiny categories are raised to it so they stay visible and
    /// hoverable. Marks above it keep the exact area-to-count ratio.
    pub radius_min: f64,
    /// Radius of the zoomed mark.
    pub zoom_radius: f64,
    /// Left margin for bar charts (room for category labels).
    pub bars_left_margin: f64,
    /// Band padding for bar charts.
    pub bar_padding: f64,
    /// Minimum intersection ratio of the sticky chart for scroll to drive scenes.
    pub arm_threshold: f64,
    /// Number of highest-reach scatter marks that get text labels.
    pub label_top_n: usize,
    /// Opacity of dimmed marks.
    pub dim_opacity: f64,
    /// Transition timings.
    pub durations: Durations,
    /// Easing for mark transitions.
    pub ease: Ease,
    /// Title shown by the baseline scene.
    pub default_title: String,
    /// Subtitle shown by the baseline scene.
    pub default_subtitle: Option<String>,
    /// Optional layers.
    pub layers: LayerToggles,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            geometry: ChartGeometry::default(),
            radius_max: 50.0,
            radius_min: 5.0,
            zoom_radius: 120.0,
            bars_left_margin: 280.0,
            bar_padding: 0.2,
            arm_threshold: 0.30,
            label_top_n: 10,
            dim_opacity: 0.12,
            durations: Durations::default(),
            ease: Ease::InOutCubic,
            default_title: "The Hit Matrix".to_string(),
            default_subtitle: Some("Genre reach against average rating".to_string()),
            layers: LayerToggles::default(),
        }
    }
}

impl EngineOpts {
    /// Reject values that would make scales or gating meaningless.
    pub fn validate(&self) -> HitMatrixResult<()> {
        self.geometry.validate()?;
        for (name, v) in [
            ("radius_max", self.radius_max),
            ("zoom_radius", self.zoom_radius),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(HitMatrixError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.radius_min.is_finite() || self.radius_min < 0.0 || self.radius_min > self.radius_max
        {
            return Err(HitMatrixError::validation(
                "radius_min must be finite and within [0, radius_max]",
            ));
        }
        if !self.bars_left_margin.is_finite()
            || self.bars_left_margin < 0.0
            || self.bars_left_margin >= self.geometry.width - self.geometry.margin.right
        {
            return Err(HitMatrixError::validation(
                "bars_left_margin must leave room for bars",
            ));
        }
        if !(0.0..1.0).contains(&self.bar_padding) {
            return Err(HitMatrixError::validation("bar_padding must be in [0, 1)"));
        }
        if !(self.arm_threshold > 0.0 && self.arm_threshold <= 1.0) {
            return Err(HitMatrixError::validation(
                "arm_threshold must be in (0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.dim_opacity) {
            return Err(HitMatrixError::validation("dim_opacity must be in [0, 1]"));
        }
        if self.durations.group_focus_delay < self.durations.crossfade {
            return Err(HitMatrixError::validation(
                "durations.group_focus_delay must be >= durations.crossfade",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;
