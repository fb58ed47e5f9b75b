//! Bound extraction and clipping for box observation spaces
//!
//! Some environments declare infinite bounds on individual observation
//! dimensions (CartPole's velocities, for instance). Downstream consumers of
//! the augmented observation space need every dimension finitely bounded, so
//! unbounded dimensions are clamped to a configured magnitude before the
//! initial bounds vector is built.

use ibmdp_core::BoxSpace;

/// Magnitude at or beyond which a declared bound is treated as unbounded
pub const UNBOUNDED_SENTINEL: f64 = 1e20;

/// Identify dimensions with no effective lower or upper bound.
///
/// Returns the indices whose low bound is at or below the negative sentinel
/// and the indices whose high bound is at or above the positive sentinel.
#[must_use]
pub fn unbounded_dims(space: &BoxSpace) -> (Vec<usize>, Vec<usize>) {
    let mut unbounded_low = Vec::new();
    let mut unbounded_high = Vec::new();
    for (idx, (&low, &high)) in space.low.iter().zip(&space.high).enumerate() {
        if low <= -UNBOUNDED_SENTINEL {
            unbounded_low.push(idx);
        }
        if high >= UNBOUNDED_SENTINEL {
            unbounded_high.push(idx);
        }
    }
    (unbounded_low, unbounded_high)
}

/// Produce a fully finite (low, high) pair for a box space.
///
/// Bounded dimensions are copied unchanged; unbounded ones are replaced with
/// `-bounding_value` / `+bounding_value`. The input space is not mutated.
#[must_use]
pub fn clip_to_finite(space: &BoxSpace, bounding_value: f64) -> (Vec<f64>, Vec<f64>) {
    let (unbounded_low, unbounded_high) = unbounded_dims(space);
    let mut low = space.low.clone();
    let mut high = space.high.clone();

    for idx in unbounded_low {
        low[idx] = -bounding_value;
    }
    for idx in unbounded_high {
        high[idx] = bounding_value;
    }
    (low, high)
}
