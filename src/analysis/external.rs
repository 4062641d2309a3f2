// External factors: travel, pitches, weather, squad dynamics and player
// motivation.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::classify::{CohesionTrend, TravelImpactBand};
use crate::stats::{mean, pearson_correlation, round_half_up};
use crate::trend::sorted_by_date;
use crate::types::{
    CareerStage, MotivationRecord, MotivationTrend, PitchRecord, RecoveryRecord,
    TeamDynamicsRecord, TravelRecord, WeatherCondition, WeatherRecord,
};

use super::recovery::recovery_score;

/// Recovery assumed for a trip with no record on the following day.
pub const DEFAULT_NEXT_DAY_RECOVERY: f64 = 75.0;
pub const HOME_VENUE: &str = "Stamford Bridge";
/// Conflict scores above this add "Conflict Management" to the focus areas.
pub const CONFLICT_ALERT: f64 = 15.0;
/// Points below the squad mean that count against a motivation category.
pub const MOTIVATION_GAP: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelPoint {
    pub distance: f64,
    pub recovery: f64,
    pub date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelImpact {
    pub correlation: f64,
    pub data_points: Vec<TravelPoint>,
}

/// Correlate each trip's distance with the recovery score of the day after.
pub fn travel_impact(travel: &[TravelRecord], recovery: &[RecoveryRecord]) -> TravelImpact {
    let data_points: Vec<TravelPoint> = travel
        .iter()
        .map(|trip| {
            let next_day = trip.date.map(|d| d + Duration::days(1));
            let recovery = next_day
                .and_then(|day| recovery.iter().find(|r| r.date == Some(day)))
                .map(|r| recovery_score(r).value())
                .unwrap_or(DEFAULT_NEXT_DAY_RECOVERY);
            TravelPoint {
                distance: trip.distance,
                recovery,
                date: trip.date,
            }
        })
        .collect();

    let distances: Vec<f64> = data_points.iter().map(|p| p.distance).collect();
    let scores: Vec<f64> = data_points.iter().map(|p| p.recovery).collect();
    TravelImpact {
        correlation: pearson_correlation(&distances, &scores),
        data_points,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongestTrip {
    pub destination: String,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelStats {
    pub total_distance: f64,
    pub average_distance_per_trip: f64,
    pub longest_trip: LongestTrip,
    pub impact_rating: TravelImpactBand,
}

pub fn travel_stats(travel: &[TravelRecord]) -> TravelStats {
    let distances: Vec<f64> = travel.iter().map(|t| t.distance).collect();
    let total_distance: f64 = distances.iter().sum();

    let mut longest_trip = LongestTrip {
        destination: String::new(),
        distance: 0.0,
    };
    for trip in travel {
        if trip.distance > longest_trip.distance {
            longest_trip = LongestTrip {
                destination: trip.destination.clone(),
                distance: trip.distance,
            };
        }
    }

    TravelStats {
        total_distance,
        average_distance_per_trip: round_half_up(mean(&distances), 0),
        longest_trip,
        impact_rating: TravelImpactBand::from_total_distance(total_distance),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneImpact {
    pub impact: i32,
    pub occurrences: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZoneImpact {
    pub none: ZoneImpact,
    pub one: ZoneImpact,
    pub two: ZoneImpact,
    pub three_plus: ZoneImpact,
}

/// Trips bucketed by absolute time-zone shift with a fixed expected impact.
pub fn time_zone_impact(travel: &[TravelRecord]) -> TimeZoneImpact {
    let count = |pred: &dyn Fn(u32) -> bool| {
        travel
            .iter()
            .filter(|t| pred(t.time_zone_diff.unsigned_abs()))
            .count()
    };
    TimeZoneImpact {
        none: ZoneImpact {
            impact: 0,
            occurrences: count(&|d| d == 0),
        },
        one: ZoneImpact {
            impact: -2,
            occurrences: count(&|d| d == 1),
        },
        two: ZoneImpact {
            impact: -5,
            occurrences: count(&|d| d == 2),
        },
        three_plus: ZoneImpact {
            impact: -8,
            occurrences: count(&|d| d >= 3),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchStats {
    pub average_quality: f64,
    pub best_venue: String,
    pub worst_venue: String,
    pub home_pitch_quality: f64,
}

/// Empty input yields zero quality and empty venue names.
pub fn pitch_stats(pitches: &[PitchRecord]) -> PitchStats {
    let qualities: Vec<f64> = pitches.iter().map(|p| p.quality).collect();

    let mut best: Option<&PitchRecord> = None;
    let mut worst: Option<&PitchRecord> = None;
    for pitch in pitches {
        if best.map_or(true, |b| pitch.quality > b.quality) {
            best = Some(pitch);
        }
        if worst.map_or(true, |w| pitch.quality < w.quality) {
            worst = Some(pitch);
        }
    }

    PitchStats {
        average_quality: round_half_up(mean(&qualities), 1),
        best_venue: best.map(|p| p.venue.clone()).unwrap_or_default(),
        worst_venue: worst.map(|p| p.venue.clone()).unwrap_or_default(),
        home_pitch_quality: pitches
            .iter()
            .find(|p| p.venue == HOME_VENUE)
            .map(|p| p.quality)
            .unwrap_or(0.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionImpact {
    /// Expected performance change, in percent.
    pub impact: i32,
    /// Mean of the reading that defines the condition: temperature for hot
    /// and cold, wind speed for windy, rainfall for rainy.
    pub avg_value: f64,
    pub match_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherImpact {
    pub hot: ConditionImpact,
    pub cold: ConditionImpact,
    pub windy: ConditionImpact,
    pub rainy: ConditionImpact,
}

pub fn weather_impact(weather: &[WeatherRecord]) -> WeatherImpact {
    let condition = |wanted: WeatherCondition, impact: i32, reading: fn(&WeatherRecord) -> f64| {
        let values: Vec<f64> = weather
            .iter()
            .filter(|w| w.condition == wanted)
            .map(reading)
            .collect();
        ConditionImpact {
            impact,
            avg_value: mean(&values),
            match_count: values.len(),
        }
    };
    WeatherImpact {
        hot: condition(WeatherCondition::Hot, -8, |w| w.temperature),
        cold: condition(WeatherCondition::Cold, -3, |w| w.temperature),
        windy: condition(WeatherCondition::Windy, -5, |w| w.wind_speed),
        rainy: condition(WeatherCondition::Rainy, -6, |w| w.rainfall),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicsPoint {
    pub date: Option<chrono::NaiveDate>,
    pub cohesion: f64,
    pub communication: f64,
    pub leadership: f64,
    pub motivation: f64,
    pub conflict: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDynamics {
    pub current_cohesion: f64,
    pub cohesion_trend: CohesionTrend,
    pub latest_assessment: TeamDynamicsRecord,
    pub key_strengths: Vec<String>,
    pub key_areas: Vec<String>,
    /// Every assessment, oldest first.
    pub trend: Vec<DynamicsPoint>,
}

/// `None` without any assessment.
pub fn team_dynamics(assessments: &[TeamDynamicsRecord]) -> Option<TeamDynamics> {
    let ordered = sorted_by_date(assessments);
    let earliest = *ordered.first()?;
    let latest = *ordered.last()?;

    // Conflict is excluded from the ranking: lower is better there.
    let mut ranked = [
        ("Team Cohesion", latest.cohesion_score),
        ("Communication", latest.communication_score),
        ("Leadership", latest.leadership_score),
        ("Motivation", latest.motivation_score),
    ];
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let key_strengths = ranked[..2].iter().map(|(name, _)| name.to_string()).collect();
    let mut key_areas: Vec<String> = ranked[ranked.len() - 2..]
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    if latest.conflict_score > CONFLICT_ALERT {
        key_areas.push("Conflict Management".to_string());
    }

    Some(TeamDynamics {
        current_cohesion: latest.cohesion_score,
        cohesion_trend: CohesionTrend::from_change(latest.cohesion_score - earliest.cohesion_score),
        latest_assessment: latest.clone(),
        key_strengths,
        key_areas,
        trend: ordered
            .iter()
            .map(|a| DynamicsPoint {
                date: a.date,
                cohesion: a.cohesion_score,
                communication: a.communication_score,
                leadership: a.leadership_score,
                motivation: a.motivation_score,
                conflict: a.conflict_score,
            })
            .collect(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageMotivation {
    pub stage: CareerStage,
    pub intrinsic: f64,
    pub extrinsic: f64,
    pub team: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMotivation {
    /// Rounded mean of the intrinsic and team means.
    pub team_motivation_avg: f64,
    pub by_career_stage: Vec<StageMotivation>,
    pub increasing: Vec<String>,
    pub requiring_attention: Vec<String>,
    pub most_motivated: Vec<String>,
}

fn composite_motivation(p: &MotivationRecord) -> f64 {
    (p.intrinsic_score + p.team_score + p.personal_goal_alignment) / 3.0
}

pub fn player_motivation(players: &[MotivationRecord]) -> PlayerMotivation {
    let mean_of = |score: fn(&MotivationRecord) -> f64| {
        mean(&players.iter().map(score).collect::<Vec<f64>>())
    };
    let intrinsic_avg = mean_of(|p| p.intrinsic_score);
    let extrinsic_avg = mean_of(|p| p.extrinsic_score);
    let team_avg = mean_of(|p| p.team_score);
    let goal_avg = mean_of(|p| p.personal_goal_alignment);

    let by_career_stage = CareerStage::ALL
        .into_iter()
        .map(|stage| {
            let in_stage: Vec<&MotivationRecord> =
                players.iter().filter(|p| p.career_stage == stage).collect();
            let stage_mean = |score: fn(&MotivationRecord) -> f64| {
                mean(&in_stage.iter().map(|p| score(p)).collect::<Vec<f64>>())
            };
            StageMotivation {
                stage,
                intrinsic: stage_mean(|p| p.intrinsic_score),
                extrinsic: stage_mean(|p| p.extrinsic_score),
                team: stage_mean(|p| p.team_score),
            }
        })
        .collect();

    let requiring_attention = players
        .iter()
        .filter(|p| {
            let below = [
                p.intrinsic_score < intrinsic_avg - MOTIVATION_GAP,
                p.extrinsic_score < extrinsic_avg - MOTIVATION_GAP,
                p.team_score < team_avg - MOTIVATION_GAP,
                p.personal_goal_alignment < goal_avg - MOTIVATION_GAP,
            ]
            .into_iter()
            .filter(|b| *b)
            .count();
            below >= 2 || p.trend == MotivationTrend::Decreasing
        })
        .map(|p| p.player.clone())
        .collect();

    let mut ranked: Vec<&MotivationRecord> = players.iter().collect();
    ranked.sort_by(|a, b| {
        composite_motivation(b)
            .partial_cmp(&composite_motivation(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    PlayerMotivation {
        team_motivation_avg: round_half_up((intrinsic_avg + team_avg) / 2.0, 0),
        by_career_stage,
        increasing: players
            .iter()
            .filter(|p| p.trend == MotivationTrend::Increasing)
            .map(|p| p.player.clone())
            .collect(),
        requiring_attention,
        most_motivated: ranked.iter().take(3).map(|p| p.player.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Composite;
    use chrono::NaiveDate;

    fn trip(destination: &str, distance: f64, date: &str, tz: i32) -> TravelRecord {
        TravelRecord {
            departure: "London".to_string(),
            destination: destination.to_string(),
            distance,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            competition: "Premier League".to_string(),
            time_zone_diff: tz,
        }
    }

    fn recovery_on(date: &str, baseline: f64) -> RecoveryRecord {
        RecoveryRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            emboss_baseline_score: Some(Composite::new(baseline)),
            ..RecoveryRecord::default()
        }
    }

    #[test]
    fn travel_impact_pairs_next_day_recovery() {
        let travel = vec![
            trip("Manchester", 10.0, "2025-04-02", 0),
            trip("Madrid", 20.0, "2025-04-09", 1),
            trip("Munich", 30.0, "2025-04-30", 1),
        ];
        let recovery = vec![
            recovery_on("2025-04-03", 0.8),
            recovery_on("2025-04-10", 0.6),
            recovery_on("2025-05-01", 0.4),
        ];
        let impact = travel_impact(&travel, &recovery);
        assert_eq!(impact.data_points[0].recovery, 90.0);
        assert_eq!(impact.correlation, -1.0);
    }

    #[test]
    fn missing_recovery_defaults() {
        let travel = vec![trip("Newcastle", 450.0, "2025-04-13", 0)];
        let impact = travel_impact(&travel, &[]);
        assert_eq!(impact.data_points[0].recovery, DEFAULT_NEXT_DAY_RECOVERY);
        assert_eq!(impact.correlation, 0.0);
    }

    #[test]
    fn stats_and_bands() {
        let travel = vec![
            trip("Manchester", 320.0, "2025-04-02", 0),
            trip("Madrid", 1750.0, "2025-04-09", 1),
            trip("Newcastle", 450.0, "2025-04-13", 0),
            trip("Liverpool", 350.0, "2025-04-20", 0),
            trip("Munich", 1560.0, "2025-04-30", 1),
        ];
        let stats = travel_stats(&travel);
        assert_eq!(stats.total_distance, 4430.0);
        assert_eq!(stats.average_distance_per_trip, 886.0);
        assert_eq!(stats.longest_trip.destination, "Madrid");
        assert_eq!(stats.impact_rating, TravelImpactBand::Low);

        let zones = time_zone_impact(&travel);
        assert_eq!(zones.none.occurrences, 3);
        assert_eq!(zones.one.occurrences, 2);
        assert_eq!(zones.three_plus.occurrences, 0);
    }

    #[test]
    fn three_plus_sums_every_large_shift() {
        let travel = vec![
            trip("Doha", 5200.0, "2025-01-01", 3),
            trip("Tokyo", 9500.0, "2025-01-10", -9),
            trip("New York", 5500.0, "2025-01-20", -5),
        ];
        assert_eq!(time_zone_impact(&travel).three_plus.occurrences, 3);
        assert_eq!(travel_stats(&travel).impact_rating, TravelImpactBand::High);
    }

    #[test]
    fn pitch_summary() {
        let pitches = vec![
            PitchRecord { venue: "Stamford Bridge".into(), quality: 9.5, firmness: 8.5, wetness: 2.0 },
            PitchRecord { venue: "Old Trafford".into(), quality: 8.2, firmness: 7.8, wetness: 4.0 },
            PitchRecord { venue: "Anfield".into(), quality: 8.7, firmness: 8.0, wetness: 3.0 },
        ];
        let stats = pitch_stats(&pitches);
        assert_eq!(stats.average_quality, 8.8);
        assert_eq!(stats.best_venue, "Stamford Bridge");
        assert_eq!(stats.worst_venue, "Old Trafford");
        assert_eq!(stats.home_pitch_quality, 9.5);
        assert_eq!(pitch_stats(&[]).average_quality, 0.0);
    }

    #[test]
    fn weather_means_use_the_defining_reading() {
        let impact = weather_impact(crate::mock::weather());
        assert_eq!(impact.hot.match_count, 1);
        assert_eq!(impact.hot.avg_value, 24.0);
        assert_eq!(impact.cold.avg_value, 4.0);
        assert_eq!(impact.windy.avg_value, 21.5);
        assert_eq!(impact.windy.impact, -5);
        assert_eq!(impact.rainy.match_count, 3);
        assert!((impact.rainy.avg_value - 23.0 / 3.0).abs() < 1e-9);

        let empty = weather_impact(&[]);
        assert_eq!(empty.hot.match_count, 0);
        assert_eq!(empty.hot.avg_value, 0.0);
    }

    #[test]
    fn team_dynamics_ranks_latest_assessment() {
        let dynamics = team_dynamics(crate::mock::team_dynamics()).unwrap();
        assert_eq!(dynamics.current_cohesion, 90.0);
        assert_eq!(dynamics.cohesion_trend, CohesionTrend::Improving);
        assert_eq!(dynamics.key_strengths, vec!["Motivation", "Leadership"]);
        assert_eq!(dynamics.key_areas, vec!["Team Cohesion", "Communication"]);
        assert_eq!(dynamics.trend.len(), 5);
        assert!(dynamics.trend.windows(2).all(|w| w[0].date <= w[1].date));
        assert!(team_dynamics(&[]).is_none());
    }

    #[test]
    fn high_conflict_becomes_a_focus_area() {
        // newest first, to check ordering is by date rather than position
        let mut early: Vec<TeamDynamicsRecord> = crate::mock::team_dynamics()[..3].to_vec();
        early.reverse();
        let dynamics = team_dynamics(&early).unwrap();
        assert_eq!(dynamics.current_cohesion, 82.0);
        assert_eq!(dynamics.cohesion_trend, CohesionTrend::Declining);
        assert_eq!(dynamics.key_strengths, vec!["Leadership", "Motivation"]);
        assert_eq!(
            dynamics.key_areas,
            vec!["Team Cohesion", "Communication", "Conflict Management"]
        );
    }

    #[test]
    fn motivation_summary() {
        let players = crate::mock::player_motivation();
        let summary = player_motivation(players);
        assert_eq!(summary.team_motivation_avg, 89.0);
        assert_eq!(summary.requiring_attention, vec!["Mykhailo Mudryk"]);
        assert_eq!(summary.increasing.len(), 4);
        assert_eq!(
            summary.most_motivated,
            vec!["Reece James", "Cole Palmer", "Thiago Silva"]
        );

        let early = &summary.by_career_stage[0];
        assert_eq!(early.stage, CareerStage::Early);
        assert!((early.intrinsic - 88.6).abs() < 1e-9);
        let peak = &summary.by_career_stage[1];
        assert_eq!(peak.team, 91.5);
    }

    #[test]
    fn decreasing_trend_always_needs_attention() {
        let mut players = crate::mock::player_motivation().to_vec();
        players[0].trend = MotivationTrend::Decreasing;
        let summary = player_motivation(&players);
        assert_eq!(
            summary.requiring_attention,
            vec!["Reece James", "Mykhailo Mudryk"]
        );

        let none = player_motivation(&[]);
        assert_eq!(none.team_motivation_avg, 0.0);
        assert!(none.by_career_stage.iter().all(|s| s.intrinsic == 0.0));
    }
}
