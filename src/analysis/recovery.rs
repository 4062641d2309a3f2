// Recovery scores from daily wellness composites.

use serde::{Deserialize, Serialize};

use crate::classify::RiskLevel;
use crate::scale::{Composite, Percent};
use crate::stats::mean;
use crate::trend::{daily_average, within_days_of_latest};
use crate::types::{RecoveryRecord, TrendPoint};

/// Overall recovery on the 0..100 scale.
///
/// Uses the baseline composite when the record carries one, otherwise the
/// mean of the six component composites. Both are clamped.
pub fn recovery_score(r: &RecoveryRecord) -> Percent {
    let composite = match r.emboss_baseline_score {
        Some(baseline) => baseline,
        None => {
            let values: Vec<f64> = r.composites().iter().map(|c| c.value()).collect();
            Composite::new(mean(&values))
        }
    };
    composite.to_percent().clamped()
}

/// Records within `days` of the most recent one, ascending.
pub fn recent_window(records: &[RecoveryRecord], days: i64) -> Vec<RecoveryRecord> {
    within_days_of_latest(records, days)
}

/// Mean scores for a period. Component averages are normalised but not
/// clamped; `overall` averages the clamped per-record score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryAverages {
    pub overall: f64,
    pub sleep: f64,
    pub soreness: f64,
    pub subjective: f64,
    pub bio: f64,
}

impl RecoveryAverages {
    pub fn readiness(&self) -> RiskLevel {
        RiskLevel::from_readiness(self.overall)
    }
}

fn normalised_mean<F>(records: &[RecoveryRecord], field: F) -> f64
where
    F: Fn(&RecoveryRecord) -> Composite,
{
    let values: Vec<f64> = records
        .iter()
        .map(|r| field(r).to_percent().value())
        .collect();
    mean(&values)
}

pub fn average_scores(records: &[RecoveryRecord]) -> RecoveryAverages {
    if records.is_empty() {
        return RecoveryAverages::default();
    }
    let overall: Vec<f64> = records.iter().map(|r| recovery_score(r).value()).collect();
    RecoveryAverages {
        overall: mean(&overall),
        sleep: normalised_mean(records, |r| r.sleep_composite),
        soreness: normalised_mean(records, |r| r.soreness_composite),
        subjective: normalised_mean(records, |r| r.subjective_composite),
        bio: normalised_mean(records, |r| r.bio_composite),
    }
}

/// Daily recovery score, ascending by date.
pub fn score_trend(records: &[RecoveryRecord]) -> Vec<TrendPoint> {
    daily_average(records, |r| recovery_score(r).value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, composite: f64, baseline: Option<f64>) -> RecoveryRecord {
        let c = Composite::new(composite);
        RecoveryRecord {
            date: NaiveDate::from_ymd_opt(2023, 4, day),
            bio_composite: c,
            msk_joint_range_composite: c,
            msk_load_tolerance_composite: c,
            subjective_composite: c,
            soreness_composite: c,
            sleep_composite: c,
            emboss_baseline_score: baseline.map(Composite::new),
            ..RecoveryRecord::default()
        }
    }

    #[test]
    fn baseline_takes_precedence() {
        assert_eq!(recovery_score(&record(1, -1.0, Some(0.6))).value(), 80.0);
        assert_eq!(recovery_score(&record(1, 0.5, None)).value(), 75.0);
    }

    #[test]
    fn zero_baseline_is_still_a_baseline() {
        assert_eq!(recovery_score(&record(1, 1.0, Some(0.0))).value(), 50.0);
    }

    #[test]
    fn score_is_clamped() {
        assert_eq!(recovery_score(&record(1, 0.0, Some(1.8))).value(), 100.0);
        assert_eq!(recovery_score(&record(1, -3.0, None)).value(), 0.0);
    }

    #[test]
    fn averages_leave_components_unclamped() {
        let records = vec![record(1, 1.5, Some(0.0)), record(2, 1.5, Some(0.0))];
        let avg = average_scores(&records);
        assert_eq!(avg.overall, 50.0);
        assert_eq!(avg.sleep, 125.0);
        assert_eq!(avg.readiness(), RiskLevel::Moderate);
        assert_eq!(average_scores(&[]), RecoveryAverages::default());
    }

    #[test]
    fn window_and_trend() {
        let records: Vec<RecoveryRecord> = (1..=30).map(|d| record(d, 0.0, Some(0.5))).collect();
        assert_eq!(recent_window(&records, 7).len(), 8);
        let trend = score_trend(&records);
        assert_eq!(trend.len(), 30);
        assert!(trend.iter().all(|p| p.value == 75.0));
    }
}
