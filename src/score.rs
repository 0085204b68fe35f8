//! Pollution scoring for a freshly drawn region.
//!
//! There is no sensor data behind the score: it mixes two uniform random
//! components with an area-derived term, then floors into `0..=100`.

use rand::{rngs::StdRng, Rng, SeedableRng};

pub const MAX_SCORE: u8 = 100;

const BASE_RANGE: f64 = 40.0;
const LOCATION_RANGE: f64 = 30.0;
const AREA_WEIGHT: f64 = 5.0;
const AREA_CAP: f64 = 30.0;

/// Maps a region's area in km² to a score in `0..=MAX_SCORE`.
///
/// Implementations may be stochastic, hence `&mut self`.
pub trait Scorer {
    fn score(&mut self, area_km2: f64) -> u8;
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn score(&mut self, area_km2: f64) -> u8 {
        (**self).score(area_km2)
    }
}

/// Area influence on the score, capped at 30 points.
pub fn area_factor(area_km2: f64) -> f64 {
    if area_km2.is_finite() && area_km2 > 0.0 {
        (area_km2 * AREA_WEIGHT).min(AREA_CAP)
    } else {
        0.0
    }
}

/// Reference scorer: `floor(U(0,40) + min(area·5, 30) + U(0,30))`.
#[derive(Debug)]
pub struct RandomScorer {
    rng: StdRng,
}

impl RandomScorer {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible score sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Scorer for RandomScorer {
    fn score(&mut self, area_km2: f64) -> u8 {
        let base = self.rng.gen::<f64>() * BASE_RANGE;
        let location = self.rng.gen::<f64>() * LOCATION_RANGE;
        let raw = (base + area_factor(area_km2) + location).floor();
        raw.clamp(0.0, MAX_SCORE as f64) as u8
    }
}

/// Always returns the same score. Used to pin runs and in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedScorer(u8);

impl FixedScorer {
    pub fn new(score: u8) -> Self {
        Self(score.min(MAX_SCORE))
    }
}

impl Scorer for FixedScorer {
    fn score(&mut self, _area_km2: f64) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_factor_is_capped() {
        assert_eq!(area_factor(0.0), 0.0);
        assert_eq!(area_factor(2.0), 10.0);
        assert_eq!(area_factor(6.0), 30.0);
        assert_eq!(area_factor(1e9), 30.0);
        assert_eq!(area_factor(-3.0), 0.0);
        assert_eq!(area_factor(f64::NAN), 0.0);
    }

    #[test]
    fn random_scores_stay_in_range() {
        let mut s = RandomScorer::seeded(7);
        for i in 0..2_000 {
            let area = (i % 50) as f64 * 0.5;
            let score = s.score(area);
            assert!(score <= MAX_SCORE);
            // the area term is a floor on the score
            assert!(score as f64 >= area_factor(area).floor());
        }
    }

    #[test]
    fn large_areas_never_score_below_the_cap() {
        let mut s = RandomScorer::seeded(11);
        for _ in 0..500 {
            assert!(s.score(100.0) >= 30);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomScorer::seeded(42);
        let mut b = RandomScorer::seeded(42);
        let xs: Vec<u8> = (0..20).map(|_| a.score(1.5)).collect();
        let ys: Vec<u8> = (0..20).map(|_| b.score(1.5)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn fixed_scorer_clamps_and_repeats() {
        let mut s = FixedScorer::new(250);
        assert_eq!(s.score(0.0), MAX_SCORE);
        let mut boxed: Box<dyn Scorer> = Box::new(FixedScorer::new(25));
        assert_eq!(boxed.score(3.0), 25);
        assert_eq!(boxed.score(99.0), 25);
    }
}
