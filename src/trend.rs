// Time ordering, windowing and improvement rates for dated records.
use chrono::{Datelike, Duration, NaiveDate};

use crate::aggregate::Buckets;
use crate::stats::mean;
use crate::types::{Dated, TrendPoint};

/// Stable ascending sort by date; undated records come first.
pub fn sorted_by_date<T: Dated>(records: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = records.iter().collect();
    sorted.sort_by_key(|r| r.date());
    sorted
}

/// Percentage change between the mean of the first and last thirds of a
/// date-ordered series.
///
/// The boundary is `floor(n / 3)` records at both ends, by index rather than
/// by elapsed time. Returns `0` for fewer than two records, when a third is
/// empty, or when the first-third mean is not positive.
pub fn improvement_rate<T, F>(records: &[T], value: F) -> f64
where
    T: Dated,
    F: Fn(&T) -> f64,
{
    let n = records.len();
    let third = n / 3;
    if n < 2 || third == 0 {
        return 0.0;
    }
    let values: Vec<f64> = sorted_by_date(records).into_iter().map(&value).collect();
    let first = mean(&values[..third]);
    let last = mean(&values[n - third..]);
    if first <= 0.0 || !first.is_finite() {
        return 0.0;
    }
    (last - first) / first * 100.0
}

/// Mean value per calendar day, ascending. Undated records are skipped.
pub fn daily_average<T, F>(records: &[T], value: F) -> Vec<TrendPoint>
where
    T: Dated,
    F: Fn(&T) -> f64,
{
    let mut buckets = Buckets::new();
    let mut dates: Vec<NaiveDate> = Vec::new();
    for record in sorted_by_date(records) {
        let Some(date) = record.date() else {
            continue;
        };
        if dates.last() != Some(&date) {
            dates.push(date);
        }
        buckets.add(&date.to_string(), value(record));
    }
    dates
        .into_iter()
        .zip(buckets.finish())
        .map(|(date, bucket)| TrendPoint {
            date,
            value: bucket.sum / bucket.count as f64,
        })
        .collect()
}

/// Records dated within `days` of the most recent record, ascending.
pub fn within_days_of_latest<T: Dated + Clone>(records: &[T], days: i64) -> Vec<T> {
    let sorted = sorted_by_date(records);
    let Some(latest) = sorted.last().and_then(|r| r.date()) else {
        return Vec::new();
    };
    let start = latest - Duration::days(days);
    sorted
        .into_iter()
        .filter(|r| r.date().is_some_and(|d| d >= start && d <= latest))
        .cloned()
        .collect()
}

/// Records dated in `[today - days, today]`.
pub fn within_days_of<T: Dated + Clone>(records: &[T], today: NaiveDate, days: i64) -> Vec<T> {
    let start = today - Duration::days(days);
    records
        .iter()
        .filter(|r| r.date().is_some_and(|d| d >= start && d <= today))
        .cloned()
        .collect()
}

/// The most recent `count` records, newest first.
pub fn most_recent<T: Dated>(records: &[T], count: usize) -> Vec<&T> {
    let mut sorted = sorted_by_date(records);
    sorted.reverse();
    sorted.truncate(count);
    sorted
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// `"{calendar year}-W{ISO week}"`. Early-January dates that belong to the
/// previous ISO year keep their calendar year (`2021-01-01` is `2021-W53`).
pub fn week_key(date: NaiveDate) -> String {
    format!("{}-W{}", date.year(), date.iso_week().week())
}
