// Per-domain report builders.
//
// Each report is one exported table (the rows shown in the console preview
// and written to CSV) plus a JSON summary carrying the full analysis. The
// HTTP insight endpoints serve the same summaries.
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::analysis::gps::{self, GroupKey, Timeframe};
use crate::analysis::{biography, external, injury, physical, priority, recovery};
use crate::classify::{FatigueLevel, SleepQuality};
use crate::errors::Result;
use crate::loader::{load_or_fallback, load_typed_or_fallback};
use crate::mock::{self, MockGenerator};
use crate::output;
use crate::types::{
    BucketRow, GpsRecord, InjuryRecord, MotivationRecord, MovementRow, PhysicalRecord,
    PitchRecord, PlayerRecord, PriorityArea, RecoveryRecord, ScoreRow, TeamDynamicsRecord,
    TravelRecord, WeatherRecord,
};
use crate::util::{format_int, format_number};

/// Days of recovery data summarised by the recovery report.
pub const RECOVERY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Load,
    Recovery,
    Physical,
    Priority,
    Injury,
    Travel,
    Biography,
}

impl Domain {
    pub const ALL: [Domain; 7] = [
        Domain::Load,
        Domain::Recovery,
        Domain::Physical,
        Domain::Priority,
        Domain::Injury,
        Domain::Travel,
        Domain::Biography,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Load => "load",
            Domain::Recovery => "recovery",
            Domain::Physical => "physical",
            Domain::Priority => "priority",
            Domain::Injury => "injury",
            Domain::Travel => "travel",
            Domain::Biography => "biography",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Domain::Load => "Training Load Summary",
            Domain::Recovery => "Recovery Readiness",
            Domain::Physical => "Physical Development by Movement",
            Domain::Priority => "Priority Area Tracking",
            Domain::Injury => "Injury Risk Factors",
            Domain::Travel => "External Factors",
            Domain::Biography => "Squad Biography by Position",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Domain::ALL.iter().map(|d| d.as_str()).collect();
                format!("unknown domain '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// Every dataset the reports read, passed around explicitly.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub today: NaiveDate,
    pub gps: Vec<GpsRecord>,
    pub recovery: Vec<RecoveryRecord>,
    pub physical: Vec<PhysicalRecord>,
    pub priority: Vec<PriorityArea>,
    pub injuries: Vec<InjuryRecord>,
    pub travel: Vec<TravelRecord>,
    pub pitches: Vec<PitchRecord>,
    pub weather: Vec<WeatherRecord>,
    pub team_dynamics: Vec<TeamDynamicsRecord>,
    pub motivation: Vec<MotivationRecord>,
    pub players: Vec<PlayerRecord>,
}

impl Datasets {
    /// Generated series plus the fixed fixtures. Each series gets its own
    /// generator so it matches the corresponding data endpoint.
    pub fn mock(today: NaiveDate, seed: Option<u64>) -> Self {
        let generator = || MockGenerator::with_seed(today, seed);
        Self {
            today,
            gps: generator().simple_gps(),
            recovery: generator().recovery(),
            physical: generator().physical(),
            priority: mock::priority_areas().to_vec(),
            injuries: mock::injury_history().to_vec(),
            travel: mock::travel_log().to_vec(),
            pitches: mock::pitches().to_vec(),
            weather: mock::weather().to_vec(),
            team_dynamics: mock::team_dynamics().to_vec(),
            motivation: mock::player_motivation().to_vec(),
            players: mock::players().to_vec(),
        }
    }

    /// Replace the dataset `domain` is driven by with the file at `path`.
    /// Mock data stays in place when the file cannot be used.
    pub fn with_input(mut self, domain: Domain, path: &Path) -> Self {
        match domain {
            Domain::Load => {
                let mock = std::mem::take(&mut self.gps);
                self.gps = load_or_fallback(Some(path), move || mock);
            }
            Domain::Recovery => {
                let mock = std::mem::take(&mut self.recovery);
                self.recovery = load_or_fallback(Some(path), move || mock);
            }
            Domain::Physical => {
                let mock = std::mem::take(&mut self.physical);
                self.physical = load_or_fallback(Some(path), move || mock);
            }
            Domain::Priority => {
                let mock = std::mem::take(&mut self.priority);
                self.priority = load_or_fallback(Some(path), move || mock);
            }
            Domain::Injury => {
                let mock = std::mem::take(&mut self.injuries);
                self.injuries = load_typed_or_fallback(Some(path), move || mock);
            }
            Domain::Travel => {
                let mock = std::mem::take(&mut self.travel);
                self.travel = load_typed_or_fallback(Some(path), move || mock);
            }
            Domain::Biography => {
                let mock = std::mem::take(&mut self.players);
                self.players = load_or_fallback(Some(path), move || mock);
            }
        }
        self
    }
}

#[derive(Debug, Clone)]
pub enum ReportTable {
    Buckets(Vec<BucketRow>),
    Scores(Vec<ScoreRow>),
    Movements(Vec<MovementRow>),
}

impl ReportTable {
    pub fn len(&self) -> usize {
        match self {
            ReportTable::Buckets(rows) => rows.len(),
            ReportTable::Scores(rows) => rows.len(),
            ReportTable::Movements(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Print the title, an optional note and the first `max_rows` rows.
    pub fn preview(&self, title: &str, note: Option<&str>, max_rows: usize) {
        match self {
            ReportTable::Buckets(rows) => output::preview_table(title, note, rows, max_rows),
            ReportTable::Scores(rows) => output::preview_table(title, note, rows, max_rows),
            ReportTable::Movements(rows) => output::preview_table(title, note, rows, max_rows),
        }
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        match self {
            ReportTable::Buckets(rows) => output::write_csv(path, rows),
            ReportTable::Scores(rows) => output::write_csv(path, rows),
            ReportTable::Movements(rows) => output::write_csv(path, rows),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub domain: Domain,
    pub note: String,
    pub table: ReportTable,
    pub summary: Value,
}

impl Report {
    pub fn csv_file_name(&self) -> String {
        format!("{}_report.csv", self.domain)
    }

    pub fn json_file_name(&self) -> String {
        format!("{}_summary.json", self.domain)
    }

    /// Write the table and the summary under `out_dir`, returning both paths.
    pub fn export(&self, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
        let csv_path = out_dir.join(self.csv_file_name());
        let json_path = out_dir.join(self.json_file_name());
        self.table.write_csv(&csv_path)?;
        output::write_json(&json_path, &self.summary)?;
        Ok((csv_path, json_path))
    }
}

pub fn build(domain: Domain, data: &Datasets) -> Report {
    match domain {
        Domain::Load => load_report(data),
        Domain::Recovery => recovery_report(data),
        Domain::Physical => physical_report(data),
        Domain::Priority => priority_report(data),
        Domain::Injury => injury_report(data),
        Domain::Travel => travel_report(data),
        Domain::Biography => biography_report(data),
    }
}

fn score_row(metric: &str, value: String, band: &str) -> ScoreRow {
    ScoreRow {
        metric: metric.to_string(),
        value,
        band: band.to_string(),
    }
}

fn load_report(data: &Datasets) -> Report {
    let weekly = gps::weekly_load(&data.gps);
    let summary = gps::load_summary(&data.gps);
    let last_30 = gps::filter_timeframe(&data.gps, Timeframe::Last30, data.today);
    let opponents: Vec<Value> = gps::group_sessions(&data.gps, GroupKey::Opposition)
        .into_iter()
        .filter(|(code, _)| !code.is_empty())
        .map(|(code, sessions)| json!({ "opposition": code, "sessions": sessions.len() }))
        .collect();

    Report {
        domain: Domain::Load,
        note: format!(
            "{} sessions, {} m total, {} match days",
            format_int(summary.sessions),
            format_number(summary.total_distance, 0),
            format_int(summary.match_days)
        ),
        table: ReportTable::Buckets(weekly.iter().map(BucketRow::from).collect()),
        summary: json!({
            "summary": summary,
            "last30Days": gps::load_summary(&last_30),
            "weeklyLoad": weekly,
            "sessionMix": gps::session_mix(&data.gps),
            "opponents": opponents,
            "performanceProfile": gps::performance_profile(&data.gps),
        }),
    }
}

fn recovery_report(data: &Datasets) -> Report {
    let recent = recovery::recent_window(&data.recovery, RECOVERY_WINDOW_DAYS);
    let averages = recovery::average_scores(&recent);
    let readiness = averages.readiness();

    let rows = vec![
        score_row("Overall", format_number(averages.overall, 1), readiness.as_str()),
        score_row(
            "Sleep",
            format_number(averages.sleep, 1),
            SleepQuality::from_score(averages.sleep).as_str(),
        ),
        score_row(
            "Soreness",
            format_number(averages.soreness, 1),
            FatigueLevel::from_score(averages.soreness).as_str(),
        ),
        score_row("Subjective", format_number(averages.subjective, 1), ""),
        score_row(
            "Bio",
            format_number(averages.bio, 1),
            FatigueLevel::from_score(averages.bio).as_str(),
        ),
    ];

    Report {
        domain: Domain::Recovery,
        note: format!(
            "Last {} days, {} records",
            RECOVERY_WINDOW_DAYS,
            format_int(recent.len())
        ),
        table: ReportTable::Scores(rows),
        summary: json!({
            "windowDays": RECOVERY_WINDOW_DAYS,
            "averages": averages,
            "readiness": readiness,
            "recoveryRisk": injury::recovery_risk(&data.recovery),
            "trend": recovery::score_trend(&recent),
        }),
    }
}

fn physical_report(data: &Datasets) -> Report {
    let analysis = physical::analyze(&data.physical);
    let rows = analysis
        .iter()
        .map(|m| MovementRow {
            movement: m.movement.clone(),
            avg_benchmark: format_number(m.avg_benchmark, 1),
            improvement_rate: format_number(m.improvement_rate, 1),
            percentile_score: format_number(m.percentile_score, 0),
            strengths: m.strengths.join("; "),
            weaknesses: m.weaknesses.join("; "),
        })
        .collect();

    Report {
        domain: Domain::Physical,
        note: format!(
            "{} assessments across {} movements",
            format_int(data.physical.len()),
            format_int(analysis.len())
        ),
        table: ReportTable::Movements(rows),
        summary: json!({
            "overall": physical::strengths_and_weaknesses(&data.physical),
            "averageByQuality": physical::average_by_quality(&data.physical),
            "recommendedFocus": physical::recommended_focus(&analysis),
            "movements": analysis,
        }),
    }
}

fn priority_report(data: &Datasets) -> Report {
    let tracking = priority::tracking_breakdown(&data.priority);
    let progress = priority::progress(&data.priority);

    Report {
        domain: Domain::Priority,
        note: format!(
            "{} areas, {}% achieved",
            format_int(progress.total_areas),
            format_number(progress.achieved_percent, 1)
        ),
        table: ReportTable::Buckets(tracking.iter().map(BucketRow::from).collect()),
        summary: json!({
            "progress": progress,
            "tracking": tracking,
            "categories": priority::category_breakdown(&data.priority),
            "statusByCategory": priority::status_by_category(&data.priority),
            "areas": priority::sorted_by_priority(&data.priority),
        }),
    }
}

fn injury_report(data: &Datasets) -> Report {
    let analysis = injury::analyze(
        &data.injuries,
        &data.gps,
        &data.recovery,
        &data.physical,
        data.today,
    );
    let factors = &analysis.risk_factors;
    let spike = if factors.load_spikes { "Spike" } else { "" };

    let rows = vec![
        score_row(
            "Risk score",
            format_number(factors.risk_score, 1),
            factors.overall_risk.as_str(),
        ),
        score_row(
            "Acute:chronic ratio",
            format_number(factors.acute_chronic_ratio, 2),
            spike,
        ),
        score_row("Fatigue", String::new(), factors.fatigue_level.as_str()),
        score_row("Sleep", String::new(), factors.sleep_quality.as_str()),
        score_row(
            "Muscle imbalances",
            format_int(factors.muscle_imbalances.len()),
            "",
        ),
        score_row(
            "Low capabilities",
            format_int(factors.low_capabilities.len()),
            "",
        ),
        score_row(
            "Previous injuries",
            format_int(factors.previous_injuries.len()),
            "",
        ),
    ];

    Report {
        domain: Domain::Injury,
        note: format!("Assessed on {}", data.today.format("%Y-%m-%d")),
        table: ReportTable::Scores(rows),
        summary: json!(analysis),
    }
}

fn travel_report(data: &Datasets) -> Report {
    let stats = external::travel_stats(&data.travel);
    let impact = external::travel_impact(&data.travel, &data.recovery);
    let pitches = external::pitch_stats(&data.pitches);
    let dynamics = external::team_dynamics(&data.team_dynamics);
    let motivation = external::player_motivation(&data.motivation);

    let mut rows = vec![
        score_row(
            "Total distance (km)",
            format_number(stats.total_distance, 0),
            stats.impact_rating.as_str(),
        ),
        score_row(
            "Average per trip (km)",
            format_number(stats.average_distance_per_trip, 0),
            "",
        ),
        score_row(
            "Longest trip",
            format!(
                "{} ({} km)",
                stats.longest_trip.destination,
                format_number(stats.longest_trip.distance, 0)
            ),
            "",
        ),
        score_row(
            "Distance vs next-day recovery",
            format_number(impact.correlation, 2),
            "",
        ),
        score_row(
            "Average pitch quality",
            format_number(pitches.average_quality, 1),
            "",
        ),
        score_row(
            "Home pitch quality",
            format_number(pitches.home_pitch_quality, 1),
            "",
        ),
    ];
    if let Some(d) = &dynamics {
        rows.push(score_row(
            "Team cohesion",
            format_number(d.current_cohesion, 0),
            d.cohesion_trend.as_str(),
        ));
    }
    rows.push(score_row(
        "Team motivation",
        format_number(motivation.team_motivation_avg, 0),
        "",
    ));

    Report {
        domain: Domain::Travel,
        note: format!("{} trips, {} venues", format_int(data.travel.len()), format_int(data.pitches.len())),
        table: ReportTable::Scores(rows),
        summary: json!({
            "travelStats": stats,
            "travelImpact": impact,
            "timeZoneImpact": external::time_zone_impact(&data.travel),
            "pitchStats": pitches,
            "weatherImpact": external::weather_impact(&data.weather),
            "teamDynamics": dynamics,
            "playerMotivation": motivation,
        }),
    }
}

fn biography_report(data: &Datasets) -> Report {
    let totals = biography::squad_totals(&data.players);
    let positions = biography::position_distribution(&data.players);

    Report {
        domain: Domain::Biography,
        note: format!(
            "{} players, {} minutes, average age {}",
            format_int(totals.players),
            format_int(totals.total_minutes),
            format_number(totals.average_age, 1)
        ),
        table: ReportTable::Buckets(positions.iter().map(BucketRow::from).collect()),
        summary: json!({
            "totals": totals,
            "positions": positions,
            "ageBands": biography::age_distribution(&data.players),
            "nationalities": biography::nationality_breakdown(&data.players),
            "topPlayers": biography::top_players_by_minutes(&data.players, biography::TOP_PLAYERS),
            "players": biography::unique_players(&data.players),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Datasets {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        Datasets::mock(today, Some(42))
    }

    #[test]
    fn domain_names_round_trip() {
        for d in Domain::ALL {
            assert_eq!(d.as_str().parse::<Domain>(), Ok(d));
        }
        assert_eq!(" Load ".parse::<Domain>(), Ok(Domain::Load));
        assert_eq!("biography".parse::<Domain>(), Ok(Domain::Biography));
        assert!("weather".parse::<Domain>().is_err());
    }

    #[test]
    fn every_domain_builds_a_table() {
        let data = data();
        for d in Domain::ALL {
            let report = build(d, &data);
            assert_eq!(report.domain, d);
            assert!(!report.table.is_empty(), "{} table is empty", d);
            assert!(report.summary.is_object());
        }
    }

    #[test]
    fn priority_report_counts_fixture_statuses() {
        let report = build(Domain::Priority, &data());
        let ReportTable::Buckets(rows) = &report.table else {
            panic!("priority report should be a bucket table");
        };
        let total: usize = rows.iter().map(|r| r.count).sum();
        assert_eq!(total, 15);
        assert_eq!(report.summary["progress"]["totalAreas"], 15);
    }

    #[test]
    fn physical_report_has_one_row_per_movement() {
        let report = build(Domain::Physical, &data());
        assert_eq!(report.table.len(), 5);
        assert!(report.summary["recommendedFocus"].is_array());
    }

    #[test]
    fn missing_input_keeps_mock_data() {
        let data = data();
        let expected = data.gps.len();
        let data = data.with_input(Domain::Load, Path::new("does/not/exist.csv"));
        assert_eq!(data.gps.len(), expected);
    }

    #[test]
    fn export_writes_table_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let report = build(Domain::Travel, &data());
        let (csv_path, json_path) = report.export(dir.path()).unwrap();
        assert!(csv_path.ends_with("travel_report.csv"));
        let csv = std::fs::read_to_string(csv_path).unwrap();
        assert!(csv.starts_with("Metric,Value,Band"));
        let json: Value = serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(json["travelStats"]["longestTrip"]["destination"], "Madrid");
    }

    #[test]
    fn biography_report_rolls_up_the_squad() {
        let report = build(Domain::Biography, &data());
        let ReportTable::Buckets(rows) = &report.table else {
            panic!("biography report should be a bucket table");
        };
        assert_eq!(rows[0].key, "DF");
        assert_eq!(rows[0].count, 8);
        assert_eq!(rows.iter().map(|r| r.count).sum::<usize>(), 20);
        assert_eq!(report.summary["totals"]["players"], 16);
        assert_eq!(report.summary["ageBands"].as_array().map(Vec::len), Some(5));
        assert_eq!(report.summary["topPlayers"][0]["player"], "Thiago Silva");
        assert_eq!(report.summary["topPlayers"][0]["minutes"], 4606);
    }

    #[test]
    fn travel_report_carries_team_factors() {
        let report = build(Domain::Travel, &data());
        assert_eq!(report.table.len(), 8);
        assert_eq!(report.summary["teamDynamics"]["cohesionTrend"], "Improving");
        assert_eq!(report.summary["playerMotivation"]["teamMotivationAvg"], 89.0);
        assert_eq!(report.summary["weatherImpact"]["rainy"]["matchCount"], 3);
    }

    #[test]
    fn player_input_replaces_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.csv");
        std::fs::write(
            &path,
            "season,player,nationality,position,age,games,minutes\n2024-2025,Cole Palmer,eng ENG,FW,22,3,270\n",
        )
        .unwrap();
        let data = data().with_input(Domain::Biography, &path);
        assert_eq!(data.players.len(), 1);
        let report = build(Domain::Biography, &data);
        assert_eq!(report.summary["totals"]["totalMinutes"], 270);
    }
}
