use crate::foundation::core::Rgba8;

pub(crate) trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

/// Tick step for `count` ticks over `[start, stop]`.
///
/// Positive results are the step itself; negative results encode `1 / -step` so that
/// fractional steps stay exact when multiplied back out.
pub(crate) fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / (count.max(1) as f64);
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Extend `[min, max]` outward to round tick boundaries.
pub(crate) fn nice_domain(mut min: f64, mut max: f64, count: usize) -> (f64, f64) {
    if !(min.is_finite() && max.is_finite()) || min >= max {
        return (min, max);
    }
    let mut prev = 0.0;
    for _ in 0..10 {
        let step = tick_increment(min, max, count);
        if step == prev || step == 0.0 {
            break;
        }
        if step > 0.0 {
            min = (min / step).floor() * step;
            max = (max / step).ceil() * step;
        } else {
            let inv = -step;
            min = (min * inv).floor() / inv;
            max = (max * inv).ceil() / inv;
        }
        prev = step;
    }
    (min, max)
}

/// Round tick values inside `[min, max]`.
pub(crate) fn ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let step = tick_increment(lo, hi, count);
    if step == 0.0 {
        return if lo == hi && lo.is_finite() {
            vec![lo]
        } else {
            Vec::new()
        };
    }
    let mut out = Vec::new();
    if step > 0.0 {
        let i0 = (lo / step).ceil() as i64;
        let i1 = (hi / step).floor() as i64;
        for i in i0..=i1 {
            out.push(i as f64 * step);
        }
    } else {
        let inv = -step;
        let i0 = (lo * inv).ceil() as i64;
        let i1 = (hi * inv).floor() as i64;
        for i in i0..=i1 {
            out.push(i as f64 / inv);
        }
    }
    out
}

pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// `1234567.0 -> "1,234,567"` (rounded to an integer).
pub(crate) fn format_thousands(v: f64) -> String {
    let n = v.round() as i64;
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
