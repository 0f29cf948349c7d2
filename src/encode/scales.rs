use crate::{
    data::aggregate::CategoryAggregate,
    encode::palette::BUCKET_COLORS,
    foundation::core::{ChartGeometry, Rgba8},
    foundation::math,
};

/// Continuous linear map from a data domain to a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Scale over `domain` -> `range`. An inverted range (`range.0 > range.1`) flips the axis.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Extend the domain to round tick boundaries.
    pub fn nice(self, count: usize) -> Self {
        Self {
            domain: math::nice_domain(self.domain.0, self.domain.1, count),
            ..self
        }
    }

    /// Data domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Pixel range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a data value to pixels. A degenerate domain maps to the middle of the range.
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Inverse of [`LinearScale::map`].
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Round tick values within the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        math::ticks(self.domain.0, self.domain.1, count)
    }
}

/// Zero-anchored square-root map: `radius = r_max * sqrt(v / max)`.
///
/// Area is proportional to the value, so quadrupling a count exactly doubles the radius.
/// An optional floor raises positive values whose radius would fall below it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SqrtScale {
    max: f64,
    r_min: f64,
    r_max: f64,
}

impl SqrtScale {
    /// Domain `[0, max]` onto radii `[0, r_max]`.
    pub fn new(max: f64, r_max: f64) -> Self {
        Self {
            max,
            r_min: 0.0,
            r_max,
        }
    }

    /// Same scale, with positive values drawn at least `r_min` wide.
    pub fn with_floor(mut self, r_min: f64) -> Self {
        self.r_min = r_min.max(0.0).min(self.r_max);
        self
    }

    /// Radius for value `v` (non-positive values map to zero).
    pub fn map(&self, v: f64) -> f64 {
        if self.max <= 0.0 || v <= 0.0 {
            return 0.0;
        }
        (self.r_max * (v / self.max).sqrt()).max(self.r_min)
    }

    /// Upper bound of the domain.
    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Ordinal bands for a categorical axis.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    labels: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Bands for `labels` (in the given order) across `range`, with equal inner/outer padding.
    pub fn new(labels: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        let n = labels.len() as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n - padding + padding * 2.0).max(1.0);
        let start = r0 + ((r1 - r0) - step * (n - padding)) / 2.0;
        Self {
            labels,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Top edge of the band for `label`.
    pub fn position(&self, label: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == label)?;
        Some(self.start + self.step * i as f64)
    }

    /// Band thickness.
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Labels in band order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Ascending count thresholds partitioning categories into six legend buckets.
pub const BUCKET_THRESHOLDS: [u32; 5] = [50, 200, 500, 1000, 2000];

/// Threshold color encoding keyed by count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorBuckets;

impl ColorBuckets {
    /// Bucket index in `0..6` (number of thresholds <= `count`).
    pub fn bucket(count: u32) -> usize {
        BUCKET_THRESHOLDS.partition_point(|t| *t <= count)
    }

    /// Fill color for `count`.
    pub fn color(count: u32) -> Rgba8 {
        BUCKET_COLORS[Self::bucket(count)]
    }

    /// Legend text for bucket `i`.
    pub fn legend_label(i: usize) -> String {
        let t = BUCKET_THRESHOLDS;
        match i {
            0 => format!("< {}", t[0]),
            i if i >= t.len() => format!("{}+", t[t.len() - 1]),
            i => format!("{}-{}", t[i - 1], t[i] - 1),
        }
    }

    /// Number of buckets.
    pub const fn len() -> usize {
        BUCKET_THRESHOLDS.len() + 1
    }
}

/// Frozen scatter encodings built once from the aggregate dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterScales {
    /// Quality -> horizontal pixels.
    pub x: LinearScale,
    /// Reach -> vertical pixels (inverted).
    pub y: LinearScale,
    /// Count -> radius.
    pub r: SqrtScale,
}

impl ScatterScales {
    /// Headroom multiplier on the reach axis.
    pub const REACH_HEADROOM: f64 = 1.1;

    /// Build from aggregates. Positions are in outer chart coordinates.
    pub fn from_aggregates(
        aggs: &[CategoryAggregate],
        geometry: &ChartGeometry,
        (r_min, r_max): (f64, f64),
    ) -> Self {
        let plot = geometry.plot_rect();
        let (q_min, q_max) = aggs.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, a| {
            (acc.0.min(a.avg_quality), acc.1.max(a.avg_quality))
        });
        let (q_min, q_max) = if q_min.is_finite() {
            (q_min, q_max)
        } else {
            (0.0, 10.0)
        };
        let reach_max = aggs.iter().map(|a| a.total_reach).fold(0.0, f64::max);
        let count_max = aggs.iter().map(|a| a.count).max().unwrap_or(0);

        Self {
            x: LinearScale::new((q_min, q_max), (plot.x0, plot.x1)).nice(10),
            y: LinearScale::new((0.0, reach_max * Self::REACH_HEADROOM), (plot.y1, plot.y0)),
            r: SqrtScale::new(f64::from(count_max), r_max).with_floor(r_min),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/scales.rs"]
mod tests;
