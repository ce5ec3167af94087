//! Timestamp grid paired with every analysis window.

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::models::{
    TimePoint, FIRST_SAMPLE_HOUR, SAMPLES_PER_DAY, SAMPLE_INTERVAL_HOURS, WINDOW_DAYS,
};

/// Display format of a [`TimePoint`].
pub const TIME_POINT_FORMAT: &str = "%m-%d %H:%M";

/// Build the 90-day, 2-hour grid starting at 01:00 on `reference_date`.
///
/// Yields `SAMPLES_PER_DAY` points per calendar day (01:00, 03:00, ... 23:00).
pub fn generate_time_points(reference_date: NaiveDate) -> Vec<TimePoint> {
    let anchor = reference_date.and_time(NaiveTime::default())
        + Duration::hours(i64::from(FIRST_SAMPLE_HOUR));
    let step = Duration::hours(i64::from(SAMPLE_INTERVAL_HOURS));

    (0..WINDOW_DAYS * SAMPLES_PER_DAY)
        .map(|i| {
            let instant = anchor + step * i as i32;
            TimePoint::new(instant.format(TIME_POINT_FORMAT).to_string())
        })
        .collect()
}
