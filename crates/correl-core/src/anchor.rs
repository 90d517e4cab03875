// File: crates/correl-core/src/anchor.rs
// Summary: Anchor points and the order-preserving correspondence set.

use crate::error::CorrelError;

/// One correlated pair of positions: the same physical event expressed in
/// axis-A and axis-B coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorPoint {
    pub pos_a: f64,
    pub pos_b: f64,
}

impl AnchorPoint {
    pub fn new(pos_a: f64, pos_b: f64) -> Self {
        Self { pos_a, pos_b }
    }
}

/// Ordered set of distinct anchors.
///
/// Invariant: the rank of every anchor's `pos_a` among all `pos_a` values
/// equals the rank of its `pos_b` among all `pos_b` values (connections never
/// cross), and no coordinate is duplicated on either axis. Anchors are stored
/// sorted by `pos_a`, which under the invariant is also sorted by `pos_b`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorrespondenceSet {
    anchors: Vec<AnchorPoint>,
}

impl CorrespondenceSet {
    pub fn new() -> Self {
        Self { anchors: Vec::new() }
    }

    pub fn len(&self) -> usize { self.anchors.len() }
    pub fn is_empty(&self) -> bool { self.anchors.is_empty() }

    /// Reconstruct a set from two persisted parallel columns.
    ///
    /// Both columns must have the same length and be strictly increasing
    /// (which also makes them unique); a violation rejects the whole
    /// correlation item with `MalformedPersistedData`.
    pub fn from_columns(pos_a: &[f64], pos_b: &[f64]) -> Result<Self, CorrelError> {
        if pos_a.len() != pos_b.len() {
            return Err(CorrelError::MalformedPersistedData {
                reason: format!("column lengths differ: {} vs {}", pos_a.len(), pos_b.len()),
            });
        }
        for (name, col) in [("A", pos_a), ("B", pos_b)] {
            for w in col.windows(2) {
                if !(w[1] > w[0]) {
                    return Err(CorrelError::MalformedPersistedData {
                        reason: format!(
                            "axis-{name} coordinates are not strictly increasing ({} then {})",
                            w[0], w[1]
                        ),
                    });
                }
            }
            if let Some(bad) = col.iter().find(|v| !v.is_finite()) {
                return Err(CorrelError::MalformedPersistedData {
                    reason: format!("axis-{name} contains non-finite value {bad}"),
                });
            }
        }
        let anchors = pos_a
            .iter()
            .zip(pos_b.iter())
            .map(|(&a, &b)| AnchorPoint::new(a, b))
            .collect();
        Ok(Self { anchors })
    }

    /// Attempt to insert an anchor, preserving the non-crossing invariant.
    ///
    /// The insertion rank of `anchor.pos_a` among existing A coordinates must
    /// equal the rank of `anchor.pos_b` among existing B coordinates, and
    /// neither coordinate may duplicate an existing one. On failure the set
    /// is left unchanged.
    pub fn try_add(&mut self, anchor: AnchorPoint) -> Result<(), CorrelError> {
        if !anchor.pos_a.is_finite() || !anchor.pos_b.is_finite() {
            return Err(CorrelError::domain(format!(
                "anchor coordinates must be finite, got ({}, {})",
                anchor.pos_a, anchor.pos_b
            )));
        }

        let rank_a = self.anchors.partition_point(|p| p.pos_a < anchor.pos_a);
        let rank_b = self.anchors.partition_point(|p| p.pos_b < anchor.pos_b);

        let dup_a = self.anchors.get(rank_a).is_some_and(|p| p.pos_a == anchor.pos_a);
        let dup_b = self.anchors.get(rank_b).is_some_and(|p| p.pos_b == anchor.pos_b);

        if rank_a != rank_b || dup_a || dup_b {
            return Err(CorrelError::Crossing { pos_a: anchor.pos_a, pos_b: anchor.pos_b });
        }

        self.anchors.insert(rank_a, anchor);
        Ok(())
    }

    /// Remove an anchor by value equality. Removal cannot introduce a
    /// crossing, so no invariant check is needed. Returns whether an anchor
    /// was removed.
    pub fn remove(&mut self, anchor: AnchorPoint) -> bool {
        match self.anchors.iter().position(|p| *p == anchor) {
            Some(i) => {
                self.anchors.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    pub fn contains(&self, anchor: AnchorPoint) -> bool {
        self.anchors.iter().any(|p| *p == anchor)
    }

    pub fn anchors(&self) -> &[AnchorPoint] { &self.anchors }

    /// Axis-A coordinates, ascending.
    pub fn sorted_by_a(&self) -> Vec<f64> {
        self.anchors.iter().map(|p| p.pos_a).collect()
    }

    /// Axis-B coordinates, ascending (equal to storage order by invariant).
    pub fn sorted_by_b(&self) -> Vec<f64> {
        self.anchors.iter().map(|p| p.pos_b).collect()
    }
}
