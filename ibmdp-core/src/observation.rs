//! Vector observations and box observation spaces

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A vector-valued observation from a factored environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorObservation {
    /// The observation data
    pub data: Vec<f64>,
}

impl VectorObservation {
    /// Create a new observation from a feature vector
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Number of features in the observation
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the observation holds no features
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<f64>> for VectorObservation {
    fn from(data: Vec<f64>) -> Self {
        Self { data }
    }
}

/// Continuous bounded space with per-dimension bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    /// Lower bound for each dimension
    pub low: Vec<f64>,
    /// Upper bound for each dimension
    pub high: Vec<f64>,
}

impl BoxSpace {
    /// Create a new box space
    ///
    /// # Errors
    ///
    /// Returns [`crate::RlError::DimensionMismatch`] when the bound vectors
    /// have different lengths.
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> crate::Result<Self> {
        if low.len() != high.len() {
            return Err(crate::RlError::DimensionMismatch {
                expected: low.len(),
                actual: high.len(),
            });
        }
        Ok(Self { low, high })
    }

    /// Number of dimensions
    #[must_use]
    pub fn len(&self) -> usize {
        self.low.len()
    }

    /// Whether the space has zero dimensions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }

    /// Sample a value uniformly from the space.
    ///
    /// Only meaningful when every dimension is finitely bounded.
    #[must_use]
    pub fn sample(&self) -> Vec<f64> {
        let mut rng = rand::thread_rng();
        self.low
            .iter()
            .zip(&self.high)
            .map(|(l, h)| rng.gen_range(*l..*h))
            .collect()
    }

    /// Check if an observation lies within the per-dimension bounds
    #[must_use]
    pub fn contains(&self, observation: &VectorObservation) -> bool {
        observation.data.len() == self.low.len()
            && observation
                .data
                .iter()
                .zip(&self.low)
                .zip(&self.high)
                .all(|((x, l), h)| x >= l && x <= h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_bounds() {
        assert!(BoxSpace::new(vec![0.0, 0.0], vec![1.0]).is_err());
    }

    #[test]
    fn contains_checks_bounds_and_length() {
        let space = BoxSpace::new(vec![-1.0, -1.0], vec![1.0, 1.0]).unwrap();
        assert!(space.contains(&VectorObservation::new(vec![0.0, 0.5])));
        assert!(!space.contains(&VectorObservation::new(vec![0.0, 1.5])));
        assert!(!space.contains(&VectorObservation::new(vec![0.0])));
    }

    #[test]
    fn sample_lies_within_bounds() {
        let space = BoxSpace::new(vec![-2.0, 0.0], vec![2.0, 1.0]).unwrap();
        for _ in 0..100 {
            let value = VectorObservation::new(space.sample());
            assert!(space.contains(&value));
        }
    }
}
