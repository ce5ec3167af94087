//! Birthday analysis: pick a window out of each long series and pair it
//! with the timestamp grid.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use super::series::SeriesBank;
use super::time_points::generate_time_points;
use crate::models::{AnalysisResult, Category, TimeValuePair, OFFSET_MODULUS, WINDOW_LEN};

/// Accepted birthday format.
pub const BIRTHDAY_FORMAT: &str = "%Y-%m-%d";

/// Errors raised by [`FortuneAnalyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid birthday '{input}': expected YYYY-MM-DD ({reason})")]
    InvalidBirthday { input: String, reason: String },
}

/// What to do when a window would run past the end of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// Return the shorter slice.
    #[default]
    Truncate,
    /// Move the start back so the window always has full length.
    Clamp,
}

impl FromStr for WindowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "truncate" => Ok(Self::Truncate),
            "clamp" => Ok(Self::Clamp),
            other => Err(format!(
                "Unknown window policy '{}'. Use truncate or clamp.",
                other
            )),
        }
    }
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncate => f.write_str("truncate"),
            Self::Clamp => f.write_str("clamp"),
        }
    }
}

/// Parse a `YYYY-MM-DD` birthday.
pub fn parse_birthday(input: &str) -> Result<NaiveDate, AnalysisError> {
    NaiveDate::parse_from_str(input, BIRTHDAY_FORMAT).map_err(|e| {
        AnalysisError::InvalidBirthday {
            input: input.to_string(),
            reason: e.to_string(),
        }
    })
}

/// `10*year + 100*month + 10000*day`.
pub fn birthday_hash(date: NaiveDate) -> i64 {
    10 * i64::from(date.year()) + 100 * i64::from(date.month()) + 10_000 * i64::from(date.day())
}

/// Window start derived from a birthday, in `[0, OFFSET_MODULUS)`.
pub fn window_offset(date: NaiveDate) -> usize {
    birthday_hash(date).rem_euclid(OFFSET_MODULUS) as usize
}

/// Index range of a `window_len` slice starting at `offset` in a series of
/// `series_len` elements.
pub fn window_range(
    offset: usize,
    series_len: usize,
    window_len: usize,
    policy: WindowPolicy,
) -> Range<usize> {
    let start = match policy {
        WindowPolicy::Truncate => offset.min(series_len),
        WindowPolicy::Clamp => offset.min(series_len.saturating_sub(window_len)),
    };
    let end = start.saturating_add(window_len).min(series_len);
    start..end
}

/// Serves birthday analyses from a shared [`SeriesBank`].
#[derive(Debug, Clone)]
pub struct FortuneAnalyzer {
    bank: Arc<SeriesBank>,
    policy: WindowPolicy,
}

impl FortuneAnalyzer {
    pub fn new(bank: Arc<SeriesBank>, policy: WindowPolicy) -> Self {
        Self { bank, policy }
    }

    pub fn bank(&self) -> &SeriesBank {
        &self.bank
    }

    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Analyze a birthday.
    ///
    /// The value window depends only on `birthday`; the timestamps depend
    /// only on `reference_date`.
    ///
    /// # Errors
    /// [`AnalysisError::InvalidBirthday`] when `birthday` is not `YYYY-MM-DD`.
    pub fn analyze(
        &self,
        birthday: &str,
        reference_date: NaiveDate,
    ) -> Result<AnalysisResult, AnalysisError> {
        let date = parse_birthday(birthday)?;
        let offset = window_offset(date);
        let range = window_range(offset, self.bank.len(), WINDOW_LEN, self.policy);
        debug!(%birthday, offset, start = range.start, end = range.end, "Selected window");

        if range.len() < WINDOW_LEN {
            warn!(
                %birthday,
                offset,
                returned = range.len(),
                "Window truncated at end of series"
            );
        }

        let times = generate_time_points(reference_date);
        let pair = |category: Category| TimeValuePair {
            time: times.clone(),
            value: self.bank.get(category)[range.clone()].to_vec(),
        };

        Ok(AnalysisResult {
            health: pair(Category::Health),
            career: pair(Category::Career),
            love: pair(Category::Love),
        })
    }
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod analysis_tests;
