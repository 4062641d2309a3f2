// Injury history and injury-risk assessment.
//
// Risk combines four signals: training-load spikes from GPS distance,
// recent recovery composites, physical imbalances from capability
// benchmarks, and the injury history itself.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::aggregate::count_by;
use crate::classify::{FatigueLevel, RiskLevel, SleepQuality};
use crate::scale::Composite;
use crate::stats::mean;
use crate::trend::{most_recent, sorted_by_date, week_start};
use crate::types::{GpsRecord, InjuryRecord, PhysicalRecord, RecoveryRecord};

use super::physical::{average_by_quality, by_movement, Movement};

pub const ACWR_SPIKE: f64 = 1.5;
pub const ACWR_ELEVATED: f64 = 1.3;
pub const IMBALANCE_GAP: f64 = 15.0;
pub const LOW_CAPABILITY_BELOW: f64 = 50.0;
pub const RECURRENCE_FACTOR: f64 = 1.5;
const RECOVERY_WINDOW: usize = 7;

pub const BODY_PARTS: [&str; 20] = [
    "Head",
    "Neck",
    "Shoulder",
    "Upper Arm",
    "Elbow",
    "Forearm",
    "Wrist",
    "Hand",
    "Chest",
    "Abdomen",
    "Back",
    "Hip",
    "Groin",
    "Quadriceps",
    "Hamstring",
    "Knee",
    "Calf",
    "Shin",
    "Ankle",
    "Foot",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyLoad {
    pub week_start: NaiveDate,
    pub load: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPatterns {
    pub has_load_spikes: bool,
    pub highest_load_week: Option<WeeklyLoad>,
    pub average_weekly_load: f64,
    pub acute_chronic_ratio: f64,
}

/// Total distance per Sunday-started week, ascending. Undated sessions are
/// skipped.
pub fn weekly_loads(gps: &[GpsRecord]) -> Vec<WeeklyLoad> {
    let mut weeks: Vec<WeeklyLoad> = Vec::new();
    for r in sorted_by_date(gps) {
        let Some(date) = r.date else {
            continue;
        };
        let start = week_start(date);
        match weeks.last_mut() {
            Some(week) if week.week_start == start => week.load += r.distance,
            _ => weeks.push(WeeklyLoad {
                week_start: start,
                load: r.distance,
            }),
        }
    }
    weeks
}

/// Last week's load over the mean of the three weeks before it. `1.0`
/// with fewer than four weeks or no chronic load.
pub fn acute_chronic_ratio(weeks: &[WeeklyLoad]) -> f64 {
    let n = weeks.len();
    if n < 4 {
        return 1.0;
    }
    let acute = weeks[n - 1].load;
    let chronic = (weeks[n - 2].load + weeks[n - 3].load + weeks[n - 4].load) / 3.0;
    if chronic > 0.0 {
        acute / chronic
    } else {
        1.0
    }
}

pub fn load_patterns(gps: &[GpsRecord]) -> LoadPatterns {
    let weeks = weekly_loads(gps);
    let highest_load_week = weeks
        .iter()
        .fold(None::<WeeklyLoad>, |best, w| match best {
            Some(b) if w.load <= b.load => Some(b),
            _ if w.load > 0.0 => Some(*w),
            other => other,
        });
    let loads: Vec<f64> = weeks.iter().map(|w| w.load).collect();
    let ratio = acute_chronic_ratio(&weeks);
    LoadPatterns {
        has_load_spikes: ratio > ACWR_SPIKE,
        highest_load_week,
        average_weekly_load: mean(&loads),
        acute_chronic_ratio: ratio,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryRisk {
    pub fatigue_level: FatigueLevel,
    pub sleep_quality: SleepQuality,
    pub overall_recovery_status: f64,
}

fn normalised_mean(values: &[f64]) -> f64 {
    Composite::new(mean(values)).to_percent().value()
}

/// Fatigue, sleep and baseline status over the seven most recent records.
pub fn recovery_risk(records: &[RecoveryRecord]) -> RecoveryRisk {
    let recent = most_recent(records, RECOVERY_WINDOW);
    let bio: Vec<f64> = recent.iter().map(|r| r.bio_composite.value()).collect();
    let soreness: Vec<f64> = recent.iter().map(|r| r.soreness_composite.value()).collect();
    let sleep: Vec<f64> = recent.iter().map(|r| r.sleep_composite.value()).collect();
    let baselines: Vec<f64> = recent
        .iter()
        .filter_map(|r| r.emboss_baseline_score.map(|b| b.value()))
        .collect();

    let fatigue_score = (normalised_mean(&bio) + normalised_mean(&soreness)) / 2.0;
    RecoveryRisk {
        fatigue_level: FatigueLevel::from_score(fatigue_score),
        sleep_quality: SleepQuality::from_score(normalised_mean(&sleep)),
        overall_recovery_status: normalised_mean(&baselines),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalFlags {
    pub muscle_imbalances: Vec<String>,
    pub low_capabilities: Vec<String>,
}

fn quality_means(records: &[PhysicalRecord], movement: Movement) -> Vec<(String, f64)> {
    let subset: Vec<PhysicalRecord> = by_movement(records, movement.as_str())
        .into_iter()
        .cloned()
        .collect();
    average_by_quality(&subset)
}

fn lookup(means: &[(String, f64)], quality: &str) -> Option<f64> {
    means
        .iter()
        .find(|(q, _)| q == quality)
        .map(|(_, v)| *v)
        .filter(|v| *v != 0.0)
}

fn imbalance(means: &[(String, f64)], a: &str, b: &str) -> Option<f64> {
    let gap = (lookup(means, a)? - lookup(means, b)?).abs();
    (gap > IMBALANCE_GAP).then_some(gap)
}

pub fn physical_flags(records: &[PhysicalRecord]) -> PhysicalFlags {
    let sprint = quality_means(records, Movement::Sprint);
    let agility = quality_means(records, Movement::Agility);
    let jump = quality_means(records, Movement::Jump);

    let mut muscle_imbalances = Vec::new();
    if let Some(gap) = imbalance(&sprint, "Acceleration", "Deceleration") {
        muscle_imbalances.push(format!(
            "Acceleration/Deceleration imbalance ({gap:.1}% difference)"
        ));
    }
    if let Some(gap) = imbalance(&jump, "Take off", "Land") {
        muscle_imbalances.push(format!(
            "Jump takeoff/landing imbalance ({gap:.1}% difference)"
        ));
    }

    let mut low_capabilities = Vec::new();
    for (movement, means) in [
        (Movement::Sprint, &sprint),
        (Movement::Agility, &agility),
        (Movement::Jump, &jump),
    ] {
        for (quality, score) in means.iter() {
            if *score < LOW_CAPABILITY_BELOW {
                low_capabilities.push(format!("{movement} {quality} ({score:.1}%)"));
            }
        }
    }

    PhysicalFlags {
        muscle_imbalances,
        low_capabilities,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub body_part: String,
    pub value: f64,
}

/// Weighted injury load per body part over the fixed body-part list.
/// Injuries to parts outside the list are ignored.
pub fn body_heatmap(history: &[InjuryRecord]) -> Vec<HeatmapCell> {
    BODY_PARTS
        .iter()
        .map(|part| {
            let value = history
                .iter()
                .filter(|i| i.body_part == *part)
                .map(|i| {
                    let recurrence = if i.recurrence { RECURRENCE_FACTOR } else { 1.0 };
                    i.severity.weight() * recurrence
                })
                .sum();
            HeatmapCell {
                body_part: part.to_string(),
                value,
            }
        })
        .collect()
}

fn prehab_for_body_part(part: &str) -> &'static [&'static str] {
    match part {
        "Hamstring" => &[
            "Nordic hamstring exercises (2-3x weekly)",
            "Hamstring flexibility routine (daily)",
        ],
        "Ankle" => &[
            "Ankle stability exercises with balance board (3x weekly)",
            "Ankle mobility exercises (daily)",
        ],
        "Quadriceps" => &["Eccentric quad strengthening (2x weekly)"],
        "Groin" => &[
            "Copenhagen adductor exercises (2-3x weekly)",
            "Groin flexibility routine (daily)",
        ],
        "Knee" => &["ACL prevention program (3x weekly)"],
        _ => &[],
    }
}

/// Prehab exercises for repeatedly injured body parts, imbalances and low
/// capabilities. Duplicates are dropped, first occurrence wins.
pub fn prehab_recommendations(history: &[InjuryRecord], flags: &PhysicalFlags) -> Vec<String> {
    let mut recommendations: Vec<&str> = Vec::new();

    for bucket in count_by(history, |i| i.body_part.as_str()) {
        if bucket.count >= 2 {
            recommendations.extend(prehab_for_body_part(&bucket.key));
        }
    }
    for imbalance in &flags.muscle_imbalances {
        if imbalance.contains("Acceleration/Deceleration") {
            recommendations.push("Deceleration training focus (2x weekly)");
        }
        if imbalance.contains("Jump takeoff/landing") {
            recommendations.push("Landing mechanics training (2x weekly)");
        }
    }
    for capability in &flags.low_capabilities {
        if capability.contains("Sprint Acceleration") {
            recommendations.push("Acceleration technique work (1x weekly)");
        }
        if capability.contains("Sprint Deceleration") {
            recommendations.push("Controlled deceleration drills (2x weekly)");
        }
        if capability.contains("Agility") {
            recommendations.push("Agility and change of direction training (2x weekly)");
        }
    }

    let mut unique: Vec<String> = Vec::new();
    for rec in recommendations {
        if !unique.iter().any(|u| u == rec) {
            unique.push(rec.to_string());
        }
    }
    unique
}

/// Accumulated risk points. `today` anchors the six-month window for
/// recent injuries.
pub fn risk_score(
    load: &LoadPatterns,
    recovery: &RecoveryRisk,
    physical: &PhysicalFlags,
    history: &[InjuryRecord],
    today: NaiveDate,
) -> f64 {
    let mut score = 0.0;
    if load.has_load_spikes {
        score += 2.0;
    }
    if load.acute_chronic_ratio > ACWR_ELEVATED {
        score += load.acute_chronic_ratio;
    }
    score += recovery.fatigue_level.risk_points();
    score += recovery.sleep_quality.risk_points();
    score += physical.muscle_imbalances.len() as f64;
    score += physical.low_capabilities.len().min(3) as f64;

    let six_months_ago = today.checked_sub_months(Months::new(6)).unwrap_or(today);
    let recent = history
        .iter()
        .filter(|i| i.date.is_some_and(|d| d >= six_months_ago))
        .count();
    score += recent as f64 * 1.5;
    score += history.iter().filter(|i| i.recurrence).count() as f64 * 2.0;
    score
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    Available,
    #[serde(rename = "Limited Training")]
    LimitedTraining,
    Injured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryRiskFactors {
    pub load_spikes: bool,
    pub acute_chronic_ratio: f64,
    pub fatigue_level: FatigueLevel,
    pub sleep_quality: SleepQuality,
    pub muscle_imbalances: Vec<String>,
    pub low_capabilities: Vec<String>,
    pub previous_injuries: Vec<String>,
    pub risk_score: f64,
    pub overall_risk: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryAnalysis {
    pub current_status: AvailabilityStatus,
    pub injury_history: Vec<InjuryRecord>,
    pub risk_factors: InjuryRiskFactors,
    pub body_heatmap: Vec<HeatmapCell>,
    pub recommended_prehab: Vec<String>,
}

pub fn analyze(
    history: &[InjuryRecord],
    gps: &[GpsRecord],
    recovery: &[RecoveryRecord],
    physical: &[PhysicalRecord],
    today: NaiveDate,
) -> InjuryAnalysis {
    let load = load_patterns(gps);
    let recovery_risk = recovery_risk(recovery);
    let flags = physical_flags(physical);
    let score = risk_score(&load, &recovery_risk, &flags, history, today);
    let recommended_prehab = prehab_recommendations(history, &flags);

    InjuryAnalysis {
        current_status: AvailabilityStatus::Available,
        injury_history: history.to_vec(),
        risk_factors: InjuryRiskFactors {
            load_spikes: load.has_load_spikes,
            acute_chronic_ratio: load.acute_chronic_ratio,
            fatigue_level: recovery_risk.fatigue_level,
            sleep_quality: recovery_risk.sleep_quality,
            previous_injuries: history
                .iter()
                .map(|i| format!("{} {}", i.body_part, i.injury_type))
                .collect(),
            muscle_imbalances: flags.muscle_imbalances,
            low_capabilities: flags.low_capabilities,
            risk_score: score,
            overall_risk: RiskLevel::from_injury_score(score),
        },
        body_heatmap: body_heatmap(history),
        recommended_prehab,
    }
}
