use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Number of samples held by every long series (one hundred years of days).
pub const SERIES_LEN: usize = 36_500;
/// First value of every long series.
pub const SERIES_START: u8 = 80;
/// Inclusive lower bound of a series value.
pub const VALUE_MIN: u8 = 60;
/// Inclusive upper bound of a series value.
pub const VALUE_MAX: u8 = 100;
/// Largest absolute step between two consecutive raw values.
pub const MAX_STEP: i32 = 5;

/// Days covered by one analysis window.
pub const WINDOW_DAYS: usize = 90;
/// Hours between two time points.
pub const SAMPLE_INTERVAL_HOURS: u32 = 2;
/// Hour of day of the first time point of each day.
pub const FIRST_SAMPLE_HOUR: u32 = 1;
/// Time points emitted per calendar day.
pub const SAMPLES_PER_DAY: usize = 24 / SAMPLE_INTERVAL_HOURS as usize;
/// Number of samples returned per category (90 days x 12 points).
pub const WINDOW_LEN: usize = WINDOW_DAYS * SAMPLES_PER_DAY;
/// Modulus applied to the birthday hash to obtain the window offset.
pub const OFFSET_MODULUS: i64 = 34_000;

/// Fortune category. Each category owns an independent long series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    Career,
    Love,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Health, Category::Career, Category::Love];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Career => "career",
            Category::Love => "love",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded random walk generated once per category at startup.
///
/// The inner vector is private so a series can only be produced by the
/// generator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongSeries(Vec<u8>);

impl LongSeries {
    pub(crate) fn from_values(values: Vec<u8>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for LongSeries {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

/// A single sample instant formatted as `MM-DD HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimePoint(String);

impl TimePoint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parallel time/value lists for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeValuePair {
    pub time: Vec<TimePoint>,
    pub value: Vec<u8>,
}

/// Response of the birthday analysis: one pair per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub health: TimeValuePair,
    pub career: TimeValuePair,
    pub love: TimeValuePair,
}

impl AnalysisResult {
    pub fn get(&self, category: Category) -> &TimeValuePair {
        match category {
            Category::Health => &self.health,
            Category::Career => &self.career,
            Category::Love => &self.love,
        }
    }
}
