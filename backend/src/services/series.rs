//! Bounded random-walk generation for the fortune categories.
//!
//! Each category owns one [`LongSeries`] built once at startup. Requests only
//! ever read from the bank, so it is shared behind an `Arc` without locking.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::models::{
    Category, LongSeries, MAX_STEP, SERIES_LEN, SERIES_START, VALUE_MAX, VALUE_MIN,
};

/// Generate one long series of [`SERIES_LEN`] values.
///
/// Starts at [`SERIES_START`]; every step adds a uniform draw in
/// `[-MAX_STEP, MAX_STEP]` and clamps into `[VALUE_MIN, VALUE_MAX]`.
pub fn generate_long_series<R: Rng + ?Sized>(rng: &mut R) -> LongSeries {
    generate_series_with_len(rng, SERIES_LEN)
}

/// Same walk as [`generate_long_series`] with an arbitrary length.
pub fn generate_series_with_len<R: Rng + ?Sized>(rng: &mut R, len: usize) -> LongSeries {
    let lo = i32::from(VALUE_MIN);
    let hi = i32::from(VALUE_MAX);

    let mut values = Vec::with_capacity(len);
    let mut value = i32::from(SERIES_START);
    for _ in 0..len {
        // value is always within [lo, hi] here
        values.push(value as u8);
        let step = rng.gen_range(-MAX_STEP..=MAX_STEP);
        value = (value + step).clamp(lo, hi);
    }
    LongSeries::from_values(values)
}

/// The three category series, generated once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesBank {
    health: LongSeries,
    career: LongSeries,
    love: LongSeries,
}

impl SeriesBank {
    /// Build the bank from an optional seed.
    ///
    /// With `Some(seed)` the bank is identical across restarts; with `None`
    /// the generator is seeded from OS entropy.
    pub fn generate(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let bank = Self::from_rng(&mut rng, SERIES_LEN);
        info!(
            seeded = seed.is_some(),
            len = SERIES_LEN,
            "Generated fortune series for health, career and love"
        );
        bank
    }

    /// Draw the three series one after another from the same source.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Self {
        let health = generate_series_with_len(rng, len);
        let career = generate_series_with_len(rng, len);
        let love = generate_series_with_len(rng, len);
        Self {
            health,
            career,
            love,
        }
    }

    pub fn get(&self, category: Category) -> &LongSeries {
        match category {
            Category::Health => &self.health,
            Category::Career => &self.career,
            Category::Love => &self.love,
        }
    }

    /// Length shared by the three series.
    pub fn len(&self) -> usize {
        self.health.len()
    }

    pub fn is_empty(&self) -> bool {
        self.health.is_empty()
    }
}
