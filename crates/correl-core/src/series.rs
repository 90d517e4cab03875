// File: crates/correl-core/src/series.rs
// Summary: Series model: ordered position -> value data with dedup-by-averaging.
// Notes:
// - Positions are unique and sorted after construction. Derived series are
//   snapshots; operations return a new Series and never mutate the source.

/// One measured series: unique, ascending positions with one value each.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    points: Vec<(f64, f64)>,
}

impl Series {
    /// Build a series from raw (position, value) pairs.
    ///
    /// Non-finite pairs are dropped, positions are sorted ascending, and
    /// values sharing a position are averaged into a single point.
    pub fn from_points(raw: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut pts: Vec<(f64, f64)> = raw
            .into_iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        pts.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut points: Vec<(f64, f64)> = Vec::with_capacity(pts.len());
        let mut i = 0usize;
        while i < pts.len() {
            let x = pts[i].0;
            let mut sum = 0.0f64;
            let mut n = 0usize;
            while i < pts.len() && pts[i].0 == x {
                sum += pts[i].1;
                n += 1;
                i += 1;
            }
            points.push((x, sum / n as f64));
        }
        Self { points }
    }

    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    /// Sorted (position, value) pairs.
    pub fn points(&self) -> &[(f64, f64)] { &self.points }

    pub fn positions(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.0)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.1)
    }

    /// Domain of the series as (min, max) positions; None when empty.
    pub fn domain(&self) -> Option<(f64, f64)> {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => Some((a.0, b.0)),
            _ => None,
        }
    }

    /// Centred moving average over `window_size` points (valid region only).
    ///
    /// The output keeps the source positions trimmed by half a window on each
    /// side; each value is the mean of the surrounding `window_size` values.
    /// A window of 1 returns the series unchanged.
    pub fn moving_average(&self, window_size: usize) -> Series {
        let w = window_size.max(1);
        if w == 1 || self.points.len() < w {
            return self.clone();
        }
        let half = w / 2;
        let mut out = Vec::with_capacity(self.points.len() - w + 1);
        let mut sum = 0.0f64;
        for i in 0..self.points.len() {
            sum += self.points[i].1;
            if i + 1 >= w {
                if i + 1 > w { sum -= self.points[i - w].1; }
                // window covers [i+1-w, i]; take the position at its centre
                let x = self.points[i + 1 - w + half].0;
                out.push((x, sum / w as f64));
            }
        }
        Series { points: out }
    }

    /// Re-express every position through `f`, keeping values.
    ///
    /// Used to carry a series into the other axis' coordinate system; the
    /// result is re-sorted (an order-preserving map keeps order, but the
    /// constructor re-establishes the invariant regardless).
    pub fn map_positions(&self, mut f: impl FnMut(f64) -> f64) -> Series {
        Series::from_points(self.points.iter().map(|&(x, y)| (f(x), y)))
    }
}
