use serde::Serialize;

use crate::{Error, Normalized};

/// Weights index-aligned to a priority order, most important first.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeightVector(Vec<Normalized>);

impl WeightVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Normalized> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Normalized> + '_ {
        self.0.iter().copied()
    }

    /// Unsaturated sum of the weights, for checking that they add up to 1.
    pub fn sum(&self) -> f64 {
        self.0.iter().map(|w| w.as_f64()).sum()
    }
}

/// [Rank order centroid](https://en.wikipedia.org/wiki/Rank_order_centroid) weights for `n`
/// ranked criteria. The weight at priority rank `i` (1-indexed) is `(1/n) * Σ_{k=i}^{n} (1/k)`.
///
/// Only the position in the priority order matters. The weights are strictly decreasing and sum
/// to 1.
pub fn roc_weights(n: usize) -> Result<WeightVector, Error> {
    if n < 1 {
        return Err(Error::InvalidArgument(format!(
            "criterion count must be positive, got {n}"
        )));
    }
    // Accumulate the harmonic tail from the least important rank upward, so each weight reuses
    // the previous partial sum.
    let mut tail = 0.0;
    let mut weights: Vec<Normalized> = (1..=n)
        .rev()
        .map(|k| {
            tail += (k as f64).recip();
            Normalized::ratio(tail, n as f64)
        })
        .collect();
    weights.reverse();
    Ok(WeightVector(weights))
}
