// File: crates/correl-core/src/mapping.rs
// Summary: Bidirectional axis mapping built from a correspondence set
// (piecewise linear or monotonicity-preserving cubic Hermite).

use crate::anchor::CorrespondenceSet;
use crate::error::CorrelError;

/// Interpolation mode for the axis mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingMode {
    Linear,
    MonotonicCubic,
}

impl MappingMode {
    pub fn name(self) -> &'static str {
        match self {
            MappingMode::Linear => "Linear",
            MappingMode::MonotonicCubic => "MonotonicCubic",
        }
    }
}

/// One direction of the mapping: sorted source coordinates to sorted target
/// coordinates. Outside the anchor domain both modes continue linearly with
/// the secant slope of the nearest boundary segment; the cubic is never
/// extrapolated (it can diverge sharply).
#[derive(Clone, Debug)]
struct DirectedMap {
    xs: Vec<f64>,
    ys: Vec<f64>,
    // Hermite slopes at each knot; empty in Linear mode.
    slopes: Vec<f64>,
}

impl DirectedMap {
    fn build(xs: Vec<f64>, ys: Vec<f64>, mode: MappingMode) -> Self {
        let slopes = match mode {
            MappingMode::Linear => Vec::new(),
            MappingMode::MonotonicCubic => pchip_slopes(&xs, &ys),
        };
        Self { xs, ys, slopes }
    }

    fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        // Boundary-segment secant continuation on both sides.
        if x < self.xs[0] {
            let slope = (self.ys[1] - self.ys[0]) / (self.xs[1] - self.xs[0]);
            return self.ys[0] + slope * (x - self.xs[0]);
        }
        if x > self.xs[n - 1] {
            let slope = (self.ys[n - 1] - self.ys[n - 2]) / (self.xs[n - 1] - self.xs[n - 2]);
            return self.ys[n - 1] + slope * (x - self.xs[n - 1]);
        }

        let i = find_segment(&self.xs, x);
        // exact inverse at the anchors themselves
        if x == self.xs[i] { return self.ys[i]; }
        if x == self.xs[i + 1] { return self.ys[i + 1]; }
        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;

        if self.slopes.is_empty() {
            return self.ys[i] + t * (self.ys[i + 1] - self.ys[i]);
        }

        // Cubic Hermite basis.
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;
        h00 * self.ys[i]
            + h10 * h * self.slopes[i]
            + h01 * self.ys[i + 1]
            + h11 * h * self.slopes[i + 1]
    }
}

/// Immutable bidirectional mapping between axis A and axis B.
///
/// Both directions are derived from the same correspondence snapshot, so
/// `a_to_b` and `b_to_a` are exact inverses at the anchors and approximate
/// inverses between them.
#[derive(Clone, Debug)]
pub struct Mapping {
    a_to_b: DirectedMap,
    b_to_a: DirectedMap,
    mode: MappingMode,
}

impl Mapping {
    /// Build both directions from `set`. Requires at least two anchors.
    pub fn build(set: &CorrespondenceSet, mode: MappingMode) -> Result<Self, CorrelError> {
        if set.len() < 2 {
            return Err(CorrelError::InsufficientAnchors { have: set.len() });
        }
        let a = set.sorted_by_a();
        let b = set.sorted_by_b();
        Ok(Self {
            a_to_b: DirectedMap::build(a.clone(), b.clone(), mode),
            b_to_a: DirectedMap::build(b, a, mode),
            mode,
        })
    }

    pub fn mode(&self) -> MappingMode { self.mode }

    /// Translate an axis-A position into axis-B coordinates.
    pub fn a_to_b(&self, pos_a: f64) -> f64 {
        self.a_to_b.eval(pos_a)
    }

    /// Translate an axis-B position into axis-A coordinates.
    pub fn b_to_a(&self, pos_b: f64) -> f64 {
        self.b_to_a.eval(pos_b)
    }
}

/// Binary search: segment index `i` with `xs[i] <= x <= xs[i+1]`.
fn find_segment(xs: &[f64], x: f64) -> usize {
    let n = xs.len();
    if x >= xs[n - 1] {
        return n - 2;
    }
    let mut lo = 0usize;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if x < xs[mid] { hi = mid } else { lo = mid }
    }
    lo
}

/// Fritsch-Carlson slopes for a monotonicity-preserving cubic Hermite.
///
/// Interior slopes are the weighted harmonic mean of adjacent secants, zeroed
/// where the secants change sign; endpoint slopes use the one-sided
/// three-point estimate clamped to preserve the boundary trend.
fn pchip_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    debug_assert!(n >= 2);

    let h: Vec<f64> = (0..n - 1).map(|i| xs[i + 1] - xs[i]).collect();
    let delta: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

    if n == 2 {
        return vec![delta[0], delta[0]];
    }

    let mut m = vec![0.0f64; n];
    for i in 1..n - 1 {
        if delta[i - 1] * delta[i] <= 0.0 {
            m[i] = 0.0;
        } else {
            let w1 = 2.0 * h[i] + h[i - 1];
            let w2 = h[i] + 2.0 * h[i - 1];
            m[i] = (w1 + w2) / (w1 / delta[i - 1] + w2 / delta[i]);
        }
    }
    m[0] = edge_slope(h[0], h[1], delta[0], delta[1]);
    m[n - 1] = edge_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    m
}

/// One-sided three-point endpoint slope with the Fritsch-Carlson clamps.
fn edge_slope(h0: f64, h1: f64, d0: f64, d1: f64) -> f64 {
    let m = ((2.0 * h0 + h1) * d0 - h0 * d1) / (h0 + h1);
    if m.signum() != d0.signum() || d0 == 0.0 {
        0.0
    } else if d0.signum() != d1.signum() && m.abs() > 3.0 * d0.abs() {
        3.0 * d0
    } else {
        m
    }
}
