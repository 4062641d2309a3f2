// Mock datasets.
//
// Generated series come from a ChaCha8 stream seeded by the calendar date
// (or an explicit seed), so the same day always yields the same data.
// Fixed fixtures are embedded at compile time and parsed once.
use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::analysis::physical::{Movement, EXPRESSIONS};
use crate::errors::Result;
use crate::loader::{normalize, parse_csv_rows, parse_json_rows, FromRaw, RawRecord};
use crate::scale::{Composite, Percent};
use crate::stats::round_half_up;
use crate::types::{
    GpsRecord, InjuryRecord, MotivationRecord, PhysicalRecord, PitchRecord, PlayerRecord,
    PriorityArea, RecoveryRecord, TeamDynamicsRecord, TravelRecord, WeatherRecord,
};

/// Days covered by the GPS and physical series (sampled every other day).
pub const SERIES_DAYS: i64 = 90;
/// Days before today covered by the recovery series (101 records).
pub const RECOVERY_DAYS: i64 = 100;
const MATCH_EVERY: usize = 7;

pub fn seed_for_date(date: NaiveDate) -> u64 {
    date.num_days_from_ce().max(0) as u64
}

fn every_other_day(today: NaiveDate) -> Vec<NaiveDate> {
    (0..=SERIES_DAYS)
        .rev()
        .step_by(2)
        .map(|i| today - Duration::days(i))
        .collect()
}

pub struct MockGenerator {
    today: NaiveDate,
    rng: ChaCha8Rng,
}

impl MockGenerator {
    pub fn new(today: NaiveDate, seed: u64) -> Self {
        Self {
            today,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn for_date(today: NaiveDate) -> Self {
        Self::new(today, seed_for_date(today))
    }

    /// Explicit seed when given, else the date-derived one.
    pub fn with_seed(today: NaiveDate, seed: Option<u64>) -> Self {
        Self::new(today, seed.unwrap_or_else(|| seed_for_date(today)))
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Sessions every second day with a match every seventh entry. Load
    /// scales with proximity to the match.
    pub fn simple_gps(&mut self) -> Vec<GpsRecord> {
        every_other_day(self.today)
            .into_iter()
            .enumerate()
            .map(|(index, date)| {
                let base_distance = 5000.0 + self.rng.gen_range(0.0..2000.0);
                let base_high_intensity = 150.0 + self.rng.gen_range(0.0..100.0);
                let base_accel = 100.0 + self.rng.gen_range(0.0..50.0);

                let cycle = index % MATCH_EVERY;
                let is_match = cycle == 0;
                let (md_minus_code, factor) = if is_match {
                    ("0".to_string(), 1.5)
                } else {
                    let to_match = (MATCH_EVERY - cycle) as f64;
                    (format!("-{}", MATCH_EVERY - cycle), 1.0 - to_match * 0.05)
                };

                GpsRecord {
                    date: Some(date),
                    opposition_code: if is_match { "OPP".into() } else { String::new() },
                    opposition_full: if is_match { "Opposition".into() } else { String::new() },
                    md_plus_code: "0".into(),
                    md_minus_code,
                    season: "2023/2024".into(),
                    distance: base_distance * factor,
                    distance_over_21: base_high_intensity * factor * 0.5,
                    distance_over_24: base_high_intensity * factor * 0.3,
                    distance_over_27: base_high_intensity * factor * 0.2,
                    accel_decel_over_2_5: base_accel * factor * 0.6,
                    accel_decel_over_3_5: base_accel * factor * 0.3,
                    accel_decel_over_4_5: base_accel * factor * 0.1,
                    day_duration: 60.0 + self.rng.gen_range(0.0..60.0),
                    peak_speed: 27.0 + self.rng.gen_range(0.0..5.0),
                    hr_zone_1_hms: format!("00:{:02}:00", self.rng.gen_range(3..10)),
                    hr_zone_2_hms: format!("00:{:02}:00", self.rng.gen_range(10..25)),
                    hr_zone_3_hms: format!("00:{:02}:00", self.rng.gen_range(10..25)),
                    hr_zone_4_hms: format!("00:{:02}:00", self.rng.gen_range(2..10)),
                    hr_zone_5_hms: format!("00:00:{:02}", self.rng.gen_range(0..30)),
                }
            })
            .collect()
    }

    /// Every movement and quality on every second day, drifting upwards by
    /// up to ten points over the period and capped at 95.
    pub fn physical(&mut self) -> Vec<PhysicalRecord> {
        let dates = every_other_day(self.today);
        let n = dates.len() as f64;
        let mut records = Vec::with_capacity(dates.len() * Movement::ALL.len() * 4);
        for (day_index, date) in dates.iter().enumerate() {
            let improvement = day_index as f64 / n * 10.0;
            for movement in Movement::ALL {
                for quality in movement.qualities() {
                    let base = 70.0 + self.rng.gen_range(0.0..20.0);
                    let pct = round_half_up((base + improvement).min(95.0), 1);
                    let expression = EXPRESSIONS[self.rng.gen_range(0..EXPRESSIONS.len())];
                    records.push(PhysicalRecord {
                        date: Some(*date),
                        movement: movement.as_str().to_string(),
                        quality: quality.to_string(),
                        expression: expression.to_string(),
                        benchmark_pct: Percent::new(pct),
                    });
                }
            }
        }
        records
    }

    /// Daily wellness composites with a slow improvement, a weekly match
    /// dip and a little noise. Baselines stay within `0.5..=0.9`.
    pub fn recovery(&mut self) -> Vec<RecoveryRecord> {
        (0..=RECOVERY_DAYS)
            .rev()
            .map(|i| {
                let day_index = (RECOVERY_DAYS - i) as f64;
                let improvement = day_index / 200.0;
                let wave = (i as f64 * 0.7).sin() * 0.1;
                let match_dip = if i % 7 == 0 { -0.1 } else { 0.0 };
                let noise = (self.rng.gen::<f64>() - 0.5) * 0.05;
                let baseline = (0.7 + improvement + wave + match_dip + noise).clamp(0.5, 0.9);

                let mut jitter = |scale: f64| self.rng.gen::<f64>() * scale;
                let bio_completeness = baseline + jitter(0.1);
                let bio_composite = baseline - jitter(0.1);
                let msk_joint_range_completeness = baseline + jitter(0.15);
                let msk_load_tolerance_completeness = baseline - jitter(0.05);
                let msk_load_tolerance_composite = baseline - jitter(0.1);
                let subjective_completeness = baseline + jitter(0.2);
                let subjective_composite = baseline + jitter(0.1);
                let soreness_composite = baseline - jitter(0.05);
                let sleep_completeness = baseline + jitter(0.1);
                let emboss = baseline + jitter(0.05) - 0.025;
                let stress_load = baseline - jitter(0.1);

                RecoveryRecord {
                    date: Some(self.today - Duration::days(i)),
                    bio_completeness,
                    bio_composite: Composite::new(bio_composite),
                    msk_joint_range_completeness,
                    msk_joint_range_composite: Composite::new(baseline),
                    msk_load_tolerance_completeness,
                    msk_load_tolerance_composite: Composite::new(msk_load_tolerance_composite),
                    subjective_completeness,
                    subjective_composite: Composite::new(subjective_composite),
                    soreness_completeness: baseline,
                    soreness_composite: Composite::new(soreness_composite),
                    sleep_completeness,
                    sleep_composite: Composite::new(baseline),
                    emboss_baseline_score: Some(Composite::new(emboss)),
                    stress_load_composite: Composite::new(stress_load),
                }
            })
            .collect()
    }
}

const PRIORITY_JSON: &str = include_str!("../fixtures/priority_areas.json");
const PHYSICAL_JSON: &str = include_str!("../fixtures/physical_capability.json");
const RECOVERY_CSV: &str = include_str!("../fixtures/recovery.csv");
const INJURY_JSON: &str = include_str!("../fixtures/injury_history.json");
const TRAVEL_JSON: &str = include_str!("../fixtures/travel_log.json");
const PITCHES_JSON: &str = include_str!("../fixtures/pitches.json");
const PLAYERS_CSV: &str = include_str!("../fixtures/players.csv");
const WEATHER_JSON: &str = include_str!("../fixtures/weather.json");
const TEAM_DYNAMICS_JSON: &str = include_str!("../fixtures/team_dynamics.json");
const MOTIVATION_JSON: &str = include_str!("../fixtures/player_motivation.json");

fn normalized_fixture<T: FromRaw>(name: &str, rows: Result<Vec<RawRecord>>) -> Vec<T> {
    match rows {
        Ok(rows) => normalize(&rows).0,
        Err(e) => {
            error!(fixture = name, error = %e, "embedded fixture failed to parse");
            Vec::new()
        }
    }
}

fn typed_fixture<T: DeserializeOwned>(name: &str, text: &str) -> Vec<T> {
    serde_json::from_str(text).unwrap_or_else(|e| {
        error!(fixture = name, error = %e, "embedded fixture failed to parse");
        Vec::new()
    })
}

static PRIORITY_AREAS: Lazy<Vec<PriorityArea>> =
    Lazy::new(|| normalized_fixture("priority_areas", parse_json_rows(PRIORITY_JSON)));
static PHYSICAL_SAMPLE: Lazy<Vec<PhysicalRecord>> =
    Lazy::new(|| normalized_fixture("physical_capability", parse_json_rows(PHYSICAL_JSON)));
static RECOVERY_SAMPLE: Lazy<Vec<RecoveryRecord>> =
    Lazy::new(|| normalized_fixture("recovery", parse_csv_rows(RECOVERY_CSV)));
static INJURY_HISTORY: Lazy<Vec<InjuryRecord>> =
    Lazy::new(|| typed_fixture("injury_history", INJURY_JSON));
static TRAVEL_LOG: Lazy<Vec<TravelRecord>> = Lazy::new(|| typed_fixture("travel_log", TRAVEL_JSON));
static PITCHES: Lazy<Vec<PitchRecord>> = Lazy::new(|| typed_fixture("pitches", PITCHES_JSON));
static PLAYERS: Lazy<Vec<PlayerRecord>> =
    Lazy::new(|| normalized_fixture("players", parse_csv_rows(PLAYERS_CSV)));
static WEATHER: Lazy<Vec<WeatherRecord>> = Lazy::new(|| typed_fixture("weather", WEATHER_JSON));
static TEAM_DYNAMICS: Lazy<Vec<TeamDynamicsRecord>> =
    Lazy::new(|| typed_fixture("team_dynamics", TEAM_DYNAMICS_JSON));
static MOTIVATION: Lazy<Vec<MotivationRecord>> =
    Lazy::new(|| typed_fixture("player_motivation", MOTIVATION_JSON));

/// The fifteen tracked development areas.
pub fn priority_areas() -> &'static [PriorityArea] {
    &PRIORITY_AREAS
}

/// A single-day capability assessment.
pub fn physical_sample() -> &'static [PhysicalRecord] {
    &PHYSICAL_SAMPLE
}

/// April 2023, one record per day.
pub fn recovery_sample() -> &'static [RecoveryRecord] {
    &RECOVERY_SAMPLE
}

pub fn injury_history() -> &'static [InjuryRecord] {
    &INJURY_HISTORY
}

pub fn travel_log() -> &'static [TravelRecord] {
    &TRAVEL_LOG
}

pub fn pitches() -> &'static [PitchRecord] {
    &PITCHES
}

/// Two seasons of squad appearances, one row per player and season.
pub fn players() -> &'static [PlayerRecord] {
    &PLAYERS
}

pub fn weather() -> &'static [WeatherRecord] {
    &WEATHER
}

/// Fortnightly squad assessments, March to April 2025.
pub fn team_dynamics() -> &'static [TeamDynamicsRecord] {
    &TEAM_DYNAMICS
}

pub fn player_motivation() -> &'static [MotivationRecord] {
    &MOTIVATION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::gps::is_match_day;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn same_seed_same_data() {
        let a = MockGenerator::new(today(), 7).simple_gps();
        let b = MockGenerator::new(today(), 7).simple_gps();
        assert_eq!(a, b);
        let c = MockGenerator::new(today(), 8).simple_gps();
        assert_ne!(a, c);
    }

    #[test]
    fn date_seed_is_stable_for_a_day() {
        let a = MockGenerator::for_date(today()).recovery();
        let b = MockGenerator::with_seed(today(), None).recovery();
        assert_eq!(a, b);
    }

    #[test]
    fn gps_series_shape() {
        let gps = MockGenerator::new(today(), 1).simple_gps();
        assert_eq!(gps.len(), 46);
        assert_eq!(gps[0].date, Some(today() - Duration::days(90)));
        assert_eq!(gps.last().and_then(|r| r.date), Some(today()));
        assert_eq!(gps.iter().filter(|r| is_match_day(r)).count(), 7);
        assert_eq!(gps[1].md_minus_code, "-6");
        for r in &gps {
            assert!((27.0..32.0).contains(&r.peak_speed));
            assert!((60.0..120.0).contains(&r.day_duration));
            assert!(r.distance > 0.0);
        }
    }

    #[test]
    fn physical_series_is_bounded() {
        let physical = MockGenerator::new(today(), 2).physical();
        assert_eq!(physical.len(), 46 * 5 * 4);
        assert!(physical
            .iter()
            .all(|r| (70.0..=95.0).contains(&r.benchmark_pct.value())));
        assert!(physical.iter().all(|r| EXPRESSIONS.contains(&r.expression.as_str())));
    }

    #[test]
    fn recovery_series_baselines_in_range() {
        let recovery = MockGenerator::new(today(), 3).recovery();
        assert_eq!(recovery.len(), 101);
        for r in &recovery {
            assert!((0.5..=0.9).contains(&r.msk_joint_range_composite.value()));
            let emboss = r.emboss_baseline_score.map(|c| c.value()).unwrap_or_default();
            assert!((0.475..=0.925).contains(&emboss));
        }
    }

    #[test]
    fn fixtures_parse() {
        assert_eq!(priority_areas().len(), 15);
        assert_eq!(priority_areas()[0].area, "Sprint Speed");
        assert_eq!(physical_sample().len(), 5);
        assert_eq!(physical_sample()[0].benchmark_pct.value(), 78.5);
        assert_eq!(recovery_sample().len(), 30);
        assert_eq!(
            recovery_sample()[0].emboss_baseline_score,
            Some(Composite::new(0.76))
        );
        assert_eq!(injury_history().len(), 5);
        assert_eq!(travel_log().len(), 5);
        assert_eq!(pitches().len(), 7);
        assert_eq!(players().len(), 20);
        assert_eq!(players()[1].player, "Thiago Silva");
        assert_eq!(players()[9].position, "FW,MF");
        assert_eq!(players()[0].minutes, 1184);
        assert_eq!(weather().len(), 13);
        assert_eq!(team_dynamics().len(), 5);
        assert_eq!(player_motivation().len(), 8);
    }
}
