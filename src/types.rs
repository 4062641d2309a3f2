use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::scale::{Composite, Percent};

/// A dated observation. Every per-domain record implements this so the
/// trend helpers can sort and window any of them.
pub trait Dated {
    fn date(&self) -> Option<NaiveDate>;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GpsRecord {
    pub date: Option<NaiveDate>,
    pub opposition_code: String,
    pub opposition_full: String,
    pub md_plus_code: String,
    pub md_minus_code: String,
    pub season: String,
    pub distance: f64,
    pub distance_over_21: f64,
    pub distance_over_24: f64,
    pub distance_over_27: f64,
    pub accel_decel_over_2_5: f64,
    pub accel_decel_over_3_5: f64,
    pub accel_decel_over_4_5: f64,
    pub day_duration: f64,
    pub peak_speed: f64,
    pub hr_zone_1_hms: String,
    pub hr_zone_2_hms: String,
    pub hr_zone_3_hms: String,
    pub hr_zone_4_hms: String,
    pub hr_zone_5_hms: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecoveryRecord {
    pub date: Option<NaiveDate>,
    pub bio_completeness: f64,
    pub bio_composite: Composite,
    pub msk_joint_range_completeness: f64,
    pub msk_joint_range_composite: Composite,
    pub msk_load_tolerance_completeness: f64,
    pub msk_load_tolerance_composite: Composite,
    pub subjective_completeness: f64,
    pub subjective_composite: Composite,
    pub soreness_completeness: f64,
    pub soreness_composite: Composite,
    pub sleep_completeness: f64,
    pub sleep_composite: Composite,
    /// `None` when the source row carries no baseline column at all.
    pub emboss_baseline_score: Option<Composite>,
    pub stress_load_composite: Composite,
}

impl RecoveryRecord {
    pub fn composites(&self) -> [Composite; 6] {
        [
            self.bio_composite,
            self.msk_joint_range_composite,
            self.msk_load_tolerance_composite,
            self.subjective_composite,
            self.soreness_composite,
            self.sleep_composite,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicalRecord {
    pub date: Option<NaiveDate>,
    pub movement: String,
    pub quality: String,
    pub expression: String,
    #[serde(rename = "benchmarkPct")]
    pub benchmark_pct: Percent,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriorityArea {
    #[serde(rename = "Priority")]
    pub priority: i64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Area")]
    pub area: String,
    #[serde(rename = "Target")]
    pub target: String,
    #[serde(rename = "Performance Type")]
    pub performance_type: String,
    #[serde(rename = "Target set")]
    pub target_set: Option<NaiveDate>,
    #[serde(rename = "Review Date")]
    pub review_date: Option<NaiveDate>,
    /// Kept as the raw label; see `classify::TrackingStatus::parse`.
    #[serde(rename = "Tracking")]
    pub tracking: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Minor => 1.0,
            Severity::Moderate => 2.0,
            Severity::Severe => 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryRecord {
    pub date: Option<NaiveDate>,
    pub body_part: String,
    pub injury_type: String,
    pub severity: Severity,
    pub days_out: u32,
    pub recurrence: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelRecord {
    pub departure: String,
    pub destination: String,
    pub distance: f64,
    pub date: Option<NaiveDate>,
    pub competition: String,
    pub time_zone_diff: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchRecord {
    pub venue: String,
    pub quality: f64,
    pub firmness: f64,
    pub wetness: f64,
}

/// One player-season row of the squad biography table. Counts arrive as
/// strings upstream and are coerced by the normalizer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub season: String,
    pub player: String,
    pub nationality: String,
    pub position: String,
    pub age: i64,
    pub games: i64,
    pub games_starts: i64,
    pub minutes: i64,
    pub minutes_90s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Windy,
    Cold,
    Hot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub date: Option<NaiveDate>,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub rainfall: f64,
    pub condition: WeatherCondition,
}

/// A periodic squad-dynamics assessment. Scores are 0..100; a lower
/// `conflict_score` is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDynamicsRecord {
    pub date: Option<NaiveDate>,
    pub cohesion_score: f64,
    pub communication_score: f64,
    pub leadership_score: f64,
    pub motivation_score: f64,
    pub conflict_score: f64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CareerStage {
    Early,
    Peak,
    Late,
}

impl CareerStage {
    pub const ALL: [CareerStage; 3] = [CareerStage::Early, CareerStage::Peak, CareerStage::Late];

    pub fn as_str(&self) -> &'static str {
        match self {
            CareerStage::Early => "Early",
            CareerStage::Peak => "Peak",
            CareerStage::Late => "Late",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotivationTrend {
    Increasing,
    Stable,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotivationRecord {
    pub player: String,
    pub intrinsic_score: f64,
    pub extrinsic_score: f64,
    pub team_score: f64,
    pub personal_goal_alignment: f64,
    pub career_stage: CareerStage,
    pub trend: MotivationTrend,
}

impl Dated for GpsRecord {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Dated for RecoveryRecord {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Dated for PhysicalRecord {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Dated for InjuryRecord {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Dated for TravelRecord {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Dated for WeatherRecord {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Dated for TeamDynamicsRecord {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// One point of a chart series. Series are produced in ascending date order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A derived aggregate keyed by category, status, week or movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBucket {
    pub key: String,
    pub count: usize,
    pub sum: f64,
    pub percent_of_total: f64,
}

// Console/CSV report rows. Numbers are pre-formatted strings so the markdown
// preview and the exported CSV show identical values.

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BucketRow {
    #[serde(rename = "Key")]
    #[tabled(rename = "Key")]
    pub key: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: String,
    #[serde(rename = "Percent")]
    #[tabled(rename = "Percent")]
    pub percent: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ScoreRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "Band")]
    #[tabled(rename = "Band")]
    pub band: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MovementRow {
    #[serde(rename = "Movement")]
    #[tabled(rename = "Movement")]
    pub movement: String,
    #[serde(rename = "AvgBenchmark")]
    #[tabled(rename = "AvgBenchmark")]
    pub avg_benchmark: String,
    #[serde(rename = "ImprovementRate")]
    #[tabled(rename = "ImprovementRate")]
    pub improvement_rate: String,
    #[serde(rename = "PercentileScore")]
    #[tabled(rename = "PercentileScore")]
    pub percentile_score: String,
    #[serde(rename = "Strengths")]
    #[tabled(rename = "Strengths")]
    pub strengths: String,
    #[serde(rename = "Weaknesses")]
    #[tabled(rename = "Weaknesses")]
    pub weaknesses: String,
}

impl From<&CategoryBucket> for BucketRow {
    fn from(bucket: &CategoryBucket) -> Self {
        BucketRow {
            key: bucket.key.clone(),
            count: bucket.count,
            total: crate::util::format_number(bucket.sum, 2),
            percent: crate::util::format_number(bucket.percent_of_total, 1),
        }
    }
}
