// Properties of the aggregation layer, checked over seeded random inputs.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use performance_insights::aggregate::count_by;
use performance_insights::analysis::priority::tracking_breakdown;
use performance_insights::classify::{
    CapabilityBand, FatigueLevel, RiskLevel, SleepQuality, TrackingStatus, TravelImpactBand,
};
use performance_insights::stats::{mean, pearson_correlation, percentile_score};
use performance_insights::trend::improvement_rate;
use performance_insights::types::{PhysicalRecord, PriorityArea};
use performance_insights::scale::Percent;

fn random_series(rng: &mut ChaCha8Rng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.gen_range(-500.0..500.0)).collect()
}

fn physical_series(values: &[f64]) -> Vec<PhysicalRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| PhysicalRecord {
            date: Some(start + Duration::days(i as i64)),
            movement: "Sprint".into(),
            quality: "Acceleration".into(),
            expression: "Dynamic".into(),
            benchmark_pct: Percent::new(*v),
        })
        .collect()
}

#[test]
fn mean_of_zeroed_series_is_zero() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for len in 1..50 {
        let zeroed: Vec<f64> = random_series(&mut rng, len).iter().map(|v| v * 0.0).collect();
        assert_eq!(mean(&zeroed), 0.0);
    }
}

#[test]
fn empty_input_is_zero_not_nan() {
    assert_eq!(mean(&[]), 0.0);
    assert_eq!(percentile_score(&[]), 0.0);
    assert_eq!(pearson_correlation(&[], &[]), 0.0);
}

#[test]
fn correlation_is_symmetric() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    for len in 2..40 {
        let xs = random_series(&mut rng, len);
        let ys = random_series(&mut rng, len);
        assert_eq!(pearson_correlation(&xs, &ys), pearson_correlation(&ys, &xs));
    }
}

#[test]
fn correlation_extremes() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for len in 2..40 {
        let xs = random_series(&mut rng, len);
        if xs.windows(2).all(|w| w[0] == w[1]) {
            continue;
        }
        assert_eq!(pearson_correlation(&xs, &xs), 1.0);
        let negated: Vec<f64> = xs.iter().map(|x| 3.0 - 2.0 * x).collect();
        assert_eq!(pearson_correlation(&xs, &negated), -1.0);
    }
    let flat = vec![4.2; 10];
    let ys: Vec<f64> = (0..10).map(f64::from).collect();
    assert_eq!(pearson_correlation(&flat, &ys), 0.0);
}

#[test]
fn distance_against_recovery_is_perfectly_negative() {
    assert_eq!(pearson_correlation(&[10.0, 20.0, 30.0], &[90.0, 80.0, 70.0]), -1.0);
}

#[test]
fn bucket_counts_cover_every_record() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let labels = ["Achieved", "On Track", "Behind", "Not Started", "Paused"];
    for len in 0..60 {
        let areas: Vec<PriorityArea> = (0..len)
            .map(|_| PriorityArea {
                tracking: labels[rng.gen_range(0..labels.len())].to_string(),
                ..PriorityArea::default()
            })
            .collect();
        let buckets = count_by(&areas, |a| a.tracking.as_str());
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), len);
    }
}

#[test]
fn tracking_shares_for_four_areas() {
    let areas: Vec<PriorityArea> = ["Achieved", "On Track", "Behind", "Achieved"]
        .iter()
        .map(|t| PriorityArea {
            tracking: t.to_string(),
            ..PriorityArea::default()
        })
        .collect();
    let shares: Vec<(String, usize, f64)> = tracking_breakdown(&areas)
        .into_iter()
        .map(|b| (b.key, b.count, b.percent_of_total))
        .collect();
    assert_eq!(
        shares,
        vec![
            ("Achieved".to_string(), 2, 50.0),
            ("On Track".to_string(), 1, 25.0),
            ("Behind".to_string(), 1, 25.0),
        ]
    );
}

#[test]
fn improvement_rate_degenerate_inputs() {
    assert_eq!(improvement_rate(&physical_series(&[]), |r| r.benchmark_pct.value()), 0.0);
    assert_eq!(improvement_rate(&physical_series(&[80.0]), |r| r.benchmark_pct.value()), 0.0);
    let from_zero = physical_series(&[0.0, 0.0, 50.0, 60.0, 70.0, 80.0]);
    assert_eq!(improvement_rate(&from_zero, |r| r.benchmark_pct.value()), 0.0);
    let rising = physical_series(&[50.0, 50.0, 60.0, 70.0, 75.0, 75.0]);
    assert_eq!(improvement_rate(&rising, |r| r.benchmark_pct.value()), 50.0);
}

#[test]
fn percentile_score_scenario() {
    assert_eq!(percentile_score(&[70.0, 75.0, 80.0, 85.0, 90.0]), 91.0);
}

#[test]
fn classifiers_are_total_and_consistent() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut scores: Vec<f64> = (0..2000).map(|_| rng.gen_range(-50.0..150.0)).collect();
    scores.extend([
        f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
        0.0,
        4.0,
        8.0,
        50.0,
        60.0,
        70.0,
        80.0,
        100.0,
        5000.0,
        10000.0,
    ]);

    for s in scores {
        let readiness = RiskLevel::from_readiness(s);
        let expected = if s >= 80.0 {
            RiskLevel::Low
        } else if s >= 50.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        };
        assert_eq!(readiness, expected, "readiness {}", s);

        let injury = RiskLevel::from_injury_score(s);
        assert_eq!(injury == RiskLevel::High, s >= 8.0, "injury {}", s);
        assert_eq!(injury == RiskLevel::Moderate, (4.0..8.0).contains(&s), "injury {}", s);

        assert_eq!(FatigueLevel::from_score(s) == FatigueLevel::Low, s > 70.0);
        assert_eq!(SleepQuality::from_score(s) == SleepQuality::Poor, s < 50.0);
        assert_eq!(
            CapabilityBand::from_benchmark(s) == CapabilityBand::Strength,
            s >= CapabilityBand::STRENGTH_MIN
        );
        assert_eq!(
            TravelImpactBand::from_total_distance(s) == TravelImpactBand::Low,
            s < 5000.0
        );

        let status = TrackingStatus::from_progress(s);
        assert!(TrackingStatus::ALL.contains(&status));
        assert_eq!(status == TrackingStatus::Achieved, s >= 100.0);
    }
}
