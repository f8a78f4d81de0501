use std::hash::{Hash, Hasher};

use fnv::FnvHasher;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Reducer, StatsError};

/// Bootstrap resampling engine.
///
/// Owns a deterministically seeded random generator that is threaded through
/// every resampling call. The generator is seeded exactly once when the
/// resampler is created; identical inputs therefore always yield identical
/// bootstrap distributions across runs.
#[derive(Debug, Clone)]
pub struct Resampler {
    rng: StdRng,
}

impl Resampler {
    /// Create a resampler seeded with the given value.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a resampler whose seed is derived from a base seed and a stable
    /// combination key (FNV hash of the key).
    ///
    /// Batch drivers that process one (benchmark, issue, severity) combination
    /// per resampler get output that does not depend on the order in which
    /// combinations are visited, which keeps results reproducible even if the
    /// batch is later parallelized.
    pub fn for_key(base_seed: u64, key: impl Hash) -> Self {
        let mut hasher = FnvHasher::default();
        key.hash(&mut hasher);
        Self::seeded(base_seed ^ hasher.finish())
    }

    /// Draw `sample.len()` elements from `sample` uniformly at random with
    /// replacement, into `buf`.
    fn resample_into(&mut self, sample: &[f64], buf: &mut Vec<f64>) {
        buf.clear();
        for _ in 0..sample.len() {
            buf.push(sample[self.rng.gen_range(0..sample.len())]);
        }
    }

    /// Empirical bootstrap distribution of a statistic.
    ///
    /// For each of `iterations` rounds, draws one resample of `sample` (with
    /// replacement, same size) and applies `reducer` to it.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::EmptySample` if `sample` is empty.
    pub fn distribution(
        &mut self,
        sample: &[f64],
        reducer: Reducer,
        iterations: usize,
    ) -> Result<Vec<f64>, StatsError> {
        if sample.is_empty() {
            return Err(StatsError::EmptySample);
        }

        let mut draw = Vec::with_capacity(sample.len());
        let mut dist = Vec::with_capacity(iterations);
        for _ in 0..iterations {
            self.resample_into(sample, &mut draw);
            dist.push(reducer.apply(&draw)?);
        }
        Ok(dist)
    }

    /// Empirical bootstrap distribution of the ratio of a statistic between
    /// two populations: element `i` is
    /// `reducer(resample_i of sample_b) / reducer(resample_i of sample_a)`.
    ///
    /// The two sides are resampled independently each round (unpaired
    /// bootstrap); the samples come from independently run experiments with no
    /// natural pairing between observations. A zero-valued denominator
    /// statistic yields infinity or NaN, which is passed through unchanged so
    /// the interval computation can surface it as a degenerate result.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::EmptySample` if either sample is empty.
    pub fn ratio_distribution(
        &mut self,
        sample_a: &[f64],
        sample_b: &[f64],
        reducer: Reducer,
        iterations: usize,
    ) -> Result<Vec<f64>, StatsError> {
        if sample_a.is_empty() || sample_b.is_empty() {
            return Err(StatsError::EmptySample);
        }

        let mut draw = Vec::with_capacity(sample_a.len().max(sample_b.len()));
        let mut dist = Vec::with_capacity(iterations);
        for _ in 0..iterations {
            self.resample_into(sample_a, &mut draw);
            let stat_a = reducer.apply(&draw)?;
            self.resample_into(sample_b, &mut draw);
            let stat_b = reducer.apply(&draw)?;
            dist.push(stat_b / stat_a);
        }
        Ok(dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::mean;

    #[test]
    fn test_distribution_length() {
        let mut resampler = Resampler::seeded(42);
        let dist = resampler
            .distribution(&[1.0, 2.0, 3.0], Reducer::Mean, 500)
            .unwrap();
        assert_eq!(dist.len(), 500);
    }

    #[test]
    fn test_distribution_empty_sample() {
        let mut resampler = Resampler::seeded(42);
        let result = resampler.distribution(&[], Reducer::Mean, 100);
        assert!(matches!(result, Err(StatsError::EmptySample)));
    }

    #[test]
    fn test_ratio_distribution_empty_sample() {
        let mut resampler = Resampler::seeded(42);
        let result = resampler.ratio_distribution(&[1.0], &[], Reducer::Median, 100);
        assert!(matches!(result, Err(StatsError::EmptySample)));
    }

    /// The same seed must yield the same distribution, bit for bit.
    #[test]
    fn test_determinism_under_fixed_seed() {
        let sample = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];

        let first = Resampler::seeded(42)
            .distribution(&sample, Reducer::Median, 1000)
            .unwrap();
        let second = Resampler::seeded(42)
            .distribution(&sample, Reducer::Median, 1000)
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let sample = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];

        let first = Resampler::seeded(1)
            .distribution(&sample, Reducer::Mean, 100)
            .unwrap();
        let second = Resampler::seeded(2)
            .distribution(&sample, Reducer::Mean, 100)
            .unwrap();

        assert_ne!(first, second);
    }

    /// Per-key derivation must depend only on the key, not on any prior draws.
    #[test]
    fn test_for_key_is_order_independent() {
        let sample = [10.0, 12.0, 11.0, 13.0, 9.0];
        let key = ("bench_a", "basic-auth", 64u64);

        let first = Resampler::for_key(42, key)
            .distribution(&sample, Reducer::Median, 200)
            .unwrap();

        // Burn an unrelated resampler in between; the keyed one is unaffected.
        let _ = Resampler::for_key(42, ("bench_b", "clean-path", 2u64))
            .distribution(&sample, Reducer::Median, 200)
            .unwrap();

        let second = Resampler::for_key(42, key)
            .distribution(&sample, Reducer::Median, 200)
            .unwrap();

        assert_eq!(first, second);
    }

    /// Resampling a constant sample yields a constant distribution.
    #[test]
    fn test_constant_sample_constant_distribution() {
        let mut resampler = Resampler::seeded(42);
        let dist = resampler
            .distribution(&[7.0, 7.0, 7.0, 7.0], Reducer::Median, 300)
            .unwrap();
        assert!(dist.iter().all(|&x| x == 7.0));
    }

    /// Degenerate constant inputs: [1; 5] vs [2; 5] gives the constant ratio
    /// distribution [2.0, 2.0, ...].
    #[test]
    fn test_constant_ratio_distribution() {
        let mut resampler = Resampler::seeded(42);
        let dist = resampler
            .ratio_distribution(&[1.0; 5], &[2.0; 5], Reducer::Median, 1000)
            .unwrap();
        assert_eq!(dist.len(), 1000);
        assert!(dist.iter().all(|&x| x == 2.0));
    }

    /// Identical input samples: the ratio distribution centers near 1.0.
    #[test]
    fn test_ratio_identity_centers_near_one() {
        let sample = [5.0, 6.0, 7.0, 8.0, 9.0];
        let mut resampler = Resampler::seeded(42);
        let dist = resampler
            .ratio_distribution(&sample, &sample, Reducer::Median, 10_000)
            .unwrap();

        let center = mean(&dist).unwrap();
        assert!(
            (0.9..=1.1).contains(&center),
            "ratio distribution centered at {center}"
        );
    }

    /// A bootstrap-reachable zero median produces non-finite ratios, which are
    /// passed through rather than sanitized.
    #[test]
    fn test_zero_denominator_passes_through() {
        let mut resampler = Resampler::seeded(42);
        let dist = resampler
            .ratio_distribution(&[0.0; 4], &[2.0; 4], Reducer::Median, 100)
            .unwrap();
        assert!(dist.iter().all(|x| !x.is_finite()));
    }
}
