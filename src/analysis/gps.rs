// Load and demand metrics over GPS session records.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{count_by, group_by, sum_by};
use crate::stats::{mean, percentile_score};
use crate::trend::{week_key, within_days_of};
use crate::types::{CategoryBucket, GpsRecord};
use crate::util::hms_to_minutes;

pub const MATCH_DAY_CODE: &str = "0";

/// Distance covered above 21 km/h (sum of the 21/24/27 bands).
pub fn sprint_distance(r: &GpsRecord) -> f64 {
    r.distance_over_21 + r.distance_over_24 + r.distance_over_27
}

pub fn accelerations(r: &GpsRecord) -> f64 {
    r.accel_decel_over_2_5 + r.accel_decel_over_3_5 + r.accel_decel_over_4_5
}

/// Minutes spent in heart-rate zones 4 and 5.
pub fn high_intensity_minutes(r: &GpsRecord) -> f64 {
    hms_to_minutes(&r.hr_zone_4_hms) + hms_to_minutes(&r.hr_zone_5_hms)
}

pub fn is_match_day(r: &GpsRecord) -> bool {
    r.md_minus_code == MATCH_DAY_CODE
}

/// `MD-3`, `MD+1`, `Match Day`, or `Other` when no code is present.
pub fn session_label(r: &GpsRecord) -> String {
    if r.md_minus_code.is_empty() && r.md_plus_code.is_empty() {
        return "Other".to_string();
    }
    if is_match_day(r) {
        return "Match Day".to_string();
    }
    if !r.md_minus_code.is_empty() {
        return format!("MD{}", r.md_minus_code);
    }
    format!("MD+{}", r.md_plus_code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Date,
    Season,
    Opposition,
}

/// Partition sessions by date, season or opposition code, first-seen order.
/// Undated sessions group under an empty date key.
pub fn group_sessions(records: &[GpsRecord], by: GroupKey) -> Vec<(String, Vec<&GpsRecord>)> {
    match by {
        GroupKey::Date => group_by(records, |r| {
            r.date.map(|d| d.to_string()).unwrap_or_default()
        }),
        GroupKey::Season => group_by(records, |r| r.season.as_str()),
        GroupKey::Opposition => group_by(records, |r| r.opposition_code.as_str()),
    }
}

/// Total distance per `"{year}-W{iso week}"`. Undated sessions are skipped.
pub fn weekly_load(records: &[GpsRecord]) -> Vec<CategoryBucket> {
    let dated: Vec<(NaiveDate, f64)> = records
        .iter()
        .filter_map(|r| r.date.map(|d| (d, r.distance)))
        .collect();
    sum_by(&dated, |(d, _)| week_key(*d), |(_, distance)| *distance)
}

/// Session counts per label (`MD-1`, `Match Day`, ...).
pub fn session_mix(records: &[GpsRecord]) -> Vec<CategoryBucket> {
    count_by(records, session_label)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileMetric {
    Distance,
    PeakSpeed,
    HighIntensity,
    Accelerations,
    DayDuration,
}

impl ProfileMetric {
    pub const ALL: [ProfileMetric; 5] = [
        ProfileMetric::Distance,
        ProfileMetric::PeakSpeed,
        ProfileMetric::HighIntensity,
        ProfileMetric::Accelerations,
        ProfileMetric::DayDuration,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProfileMetric::Distance => "Distance",
            ProfileMetric::PeakSpeed => "Peak Speed",
            ProfileMetric::HighIntensity => "High Intensity",
            ProfileMetric::Accelerations => "Accelerations",
            ProfileMetric::DayDuration => "Duration",
        }
    }

    pub fn value(&self, r: &GpsRecord) -> f64 {
        match self {
            ProfileMetric::Distance => r.distance,
            ProfileMetric::PeakSpeed => r.peak_speed,
            ProfileMetric::HighIntensity => sprint_distance(r),
            ProfileMetric::Accelerations => accelerations(r),
            ProfileMetric::DayDuration => r.day_duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub metric: ProfileMetric,
    pub label: String,
    pub score: f64,
}

/// Radar-chart profile: the percentile score of each metric.
pub fn performance_profile(records: &[GpsRecord]) -> Vec<ProfilePoint> {
    ProfileMetric::ALL
        .iter()
        .map(|metric| {
            let values: Vec<f64> = records.iter().map(|r| metric.value(r)).collect();
            ProfilePoint {
                metric: *metric,
                label: metric.label().to_string(),
                score: percentile_score(&values),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    pub sessions: usize,
    pub total_distance: f64,
    pub mean_distance: f64,
    pub mean_peak_speed: f64,
    pub high_intensity_minutes: f64,
    pub match_days: usize,
}

pub fn load_summary(records: &[GpsRecord]) -> LoadSummary {
    let distances: Vec<f64> = records.iter().map(|r| r.distance).collect();
    let speeds: Vec<f64> = records.iter().map(|r| r.peak_speed).collect();
    LoadSummary {
        sessions: records.len(),
        total_distance: distances.iter().sum(),
        mean_distance: mean(&distances),
        mean_peak_speed: mean(&speeds),
        high_intensity_minutes: records.iter().map(high_intensity_minutes).sum(),
        match_days: records.iter().filter(|r| is_match_day(r)).count(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "7days")]
    Last7,
    #[default]
    #[serde(rename = "30days")]
    Last30,
    #[serde(rename = "90days")]
    Last90,
    #[serde(rename = "all")]
    All,
}

impl Timeframe {
    pub fn days(&self) -> Option<i64> {
        match self {
            Timeframe::Last7 => Some(7),
            Timeframe::Last30 => Some(30),
            Timeframe::Last90 => Some(90),
            Timeframe::All => None,
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7days" | "7" => Ok(Timeframe::Last7),
            "30days" | "30" => Ok(Timeframe::Last30),
            "90days" | "90" => Ok(Timeframe::Last90),
            "all" => Ok(Timeframe::All),
            other => Err(format!("unknown timeframe {other:?} (7days, 30days, 90days, all)")),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Last7 => "7days",
            Timeframe::Last30 => "30days",
            Timeframe::Last90 => "90days",
            Timeframe::All => "all",
        };
        f.write_str(s)
    }
}

/// Sessions within the timeframe ending at `today` (inclusive). `All`
/// returns every session, undated ones included.
pub fn filter_timeframe(records: &[GpsRecord], timeframe: Timeframe, today: NaiveDate) -> Vec<GpsRecord> {
    match timeframe.days() {
        Some(days) => within_days_of(records, today, days),
        None => records.to_vec(),
    }
}
