use crate::foundation::error::{HitMatrixError, HitMatrixResult};

pub use kurbo::{Point, Rect, Vec2};

/// Milliseconds on the session's virtual clock.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Zero duration.
    pub const ZERO: Self = Self(0);

    /// Saturating addition.
    pub fn after(self, delta: Millis) -> Self {
        Self(self.0.saturating_add(delta.0))
    }

    /// Elapsed time since `earlier`, saturating at zero.
    pub fn since(self, earlier: Millis) -> Self {
        Self(self.0.saturating_sub(earlier.0))
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> HitMatrixResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 && hex.len() != 8 {
            return Err(HitMatrixError::validation(format!(
                "color '{s}' must be #rrggbb or #rrggbbaa"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| HitMatrixError::validation(format!("color '{s}' is not hex")))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 255 },
        })
    }

    /// `#rrggbb` form (alpha is carried separately as opacity in exports).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Margins around the plotting area, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Edges {
    /// Left margin.
    #[serde(default)]
    pub left: f64,
    /// Right margin.
    #[serde(default)]
    pub right: f64,
    /// Top margin.
    #[serde(default)]
    pub top: f64,
    /// Bottom margin.
    #[serde(default)]
    pub bottom: f64,
}

/// Outer chart size plus margins; scales map into the inner plotting area.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChartGeometry {
    /// Outer width in pixels.
    pub width: f64,
    /// Outer height in pixels.
    pub height: f64,
    /// Plot margins.
    pub margin: Edges,
}

impl ChartGeometry {
    /// Width of the plotting area.
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Height of the plotting area.
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// Plotting area in outer coordinates.
    pub fn plot_rect(&self) -> Rect {
        Rect::new(
            self.margin.left,
            self.margin.top,
            self.margin.left + self.inner_width(),
            self.margin.top + self.inner_height(),
        )
    }

    /// Same outer size with a different left margin (bar charts need room for labels).
    pub fn with_left_margin(self, left: f64) -> Self {
        Self {
            margin: Edges { left, ..self.margin },
            ..self
        }
    }

    pub(crate) fn validate(&self) -> HitMatrixResult<()> {
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(HitMatrixError::validation(format!(
                    "chart {name} must be finite and > 0"
                )));
            }
        }
        for (name, v) in [
            ("left", self.margin.left),
            ("right", self.margin.right),
            ("top", self.margin.top),
            ("bottom", self.margin.bottom),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(HitMatrixError::validation(format!(
                    "chart margin.{name} must be finite and >= 0"
                )));
            }
        }
        if self.inner_width() <= 0.0 || self.inner_height() <= 0.0 {
            return Err(HitMatrixError::validation(
                "chart margins leave no plotting area",
            ));
        }
        Ok(())
    }
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 600.0,
            margin: Edges {
                left: 70.0,
                right: 40.0,
                top: 40.0,
                bottom: 60.0,
            },
        }
    }
}
