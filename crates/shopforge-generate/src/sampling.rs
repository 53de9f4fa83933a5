//! Shared draw helpers for the generation phases.

use rand::Rng;
use rand::distr::weighted::WeightedIndex;

use crate::errors::GenerationError;

/// Uniform draw in `[lo, hi)`, degenerating to `lo` when the range is empty.
pub(crate) fn uniform_f64<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Categorical distribution over unnormalized weights. Weights must be
/// positive; configuration validation enforces that before generation runs.
pub(crate) fn weighted_index(
    weights: &[f64],
    field: &'static str,
) -> Result<WeightedIndex<f64>, GenerationError> {
    WeightedIndex::new(weights.iter().copied())
        .map_err(|err| GenerationError::InvalidConfig(format!("{field}: {err}")))
}
