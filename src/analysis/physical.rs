// Physical capability benchmarks by movement and quality.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate::{distinct, mean_by};
use crate::classify::CapabilityBand;
use crate::stats::{mean, percentile_score};
use crate::trend::{daily_average, improvement_rate};
use crate::types::{PhysicalRecord, TrendPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    Sprint,
    Jump,
    Agility,
    Strength,
    Endurance,
}

impl Movement {
    pub const ALL: [Movement; 5] = [
        Movement::Sprint,
        Movement::Jump,
        Movement::Agility,
        Movement::Strength,
        Movement::Endurance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Movement::Sprint => "Sprint",
            Movement::Jump => "Jump",
            Movement::Agility => "Agility",
            Movement::Strength => "Strength",
            Movement::Endurance => "Endurance",
        }
    }

    /// Qualities assessed for this movement.
    pub fn qualities(&self) -> [&'static str; 4] {
        match self {
            Movement::Sprint => ["Acceleration", "Max velocity", "Technique", "Power"],
            Movement::Jump => ["Take off", "Land", "Vertical power", "Horizontal power"],
            Movement::Agility => ["Acceleration", "Deceleration", "Change of direction", "Balance"],
            Movement::Strength => ["Upper body", "Lower body", "Core", "Functional"],
            Movement::Endurance => ["Aerobic", "Anaerobic", "Recovery", "Stamina"],
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Movement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Movement::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown movement {s:?}"))
    }
}

pub const EXPRESSIONS: [&str; 4] = ["Dynamic", "Isometric", "Concentric", "Eccentric"];

pub fn by_movement<'a>(records: &'a [PhysicalRecord], movement: &str) -> Vec<&'a PhysicalRecord> {
    records.iter().filter(|r| r.movement == movement).collect()
}

pub fn by_quality<'a>(records: &'a [PhysicalRecord], quality: &str) -> Vec<&'a PhysicalRecord> {
    records.iter().filter(|r| r.quality == quality).collect()
}

pub fn by_expression<'a>(records: &'a [PhysicalRecord], expression: &str) -> Vec<&'a PhysicalRecord> {
    records.iter().filter(|r| r.expression == expression).collect()
}

fn owned(records: Vec<&PhysicalRecord>) -> Vec<PhysicalRecord> {
    records.into_iter().cloned().collect()
}

fn benchmark(r: &PhysicalRecord) -> f64 {
    r.benchmark_pct.value()
}

pub fn average_by_movement(records: &[PhysicalRecord]) -> Vec<(String, f64)> {
    mean_by(records, |r| r.movement.as_str(), benchmark)
}

pub fn average_by_quality(records: &[PhysicalRecord]) -> Vec<(String, f64)> {
    mean_by(records, |r| r.quality.as_str(), benchmark)
}

/// Improvement rate of each movement's benchmark, first-seen order.
pub fn improvement_rates(records: &[PhysicalRecord]) -> Vec<(String, f64)> {
    distinct(records, |r| r.movement.as_str())
        .into_iter()
        .map(|movement| {
            let subset = owned(by_movement(records, &movement));
            let rate = improvement_rate(&subset, benchmark);
            (movement, rate)
        })
        .collect()
}

/// Daily mean benchmark for one movement, ascending by date.
pub fn benchmark_trend(records: &[PhysicalRecord], movement: &str) -> Vec<TrendPoint> {
    let subset = owned(by_movement(records, movement));
    daily_average(&subset, benchmark)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthsWeaknesses {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Top `limit` qualities at or above the strength cut-off and the lowest
/// `limit` below the weakness cut-off, both listed best first.
fn rank_qualities(averages: Vec<(String, f64)>, limit: usize) -> StrengthsWeaknesses {
    let mut sorted = averages;
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let strengths = sorted
        .iter()
        .filter(|(_, v)| CapabilityBand::from_benchmark(*v) == CapabilityBand::Strength)
        .take(limit)
        .map(|(q, _)| q.clone())
        .collect();
    let weak: Vec<String> = sorted
        .iter()
        .filter(|(_, v)| CapabilityBand::from_benchmark(*v) == CapabilityBand::Weakness)
        .map(|(q, _)| q.clone())
        .collect();
    let weaknesses = weak[weak.len().saturating_sub(limit)..].to_vec();

    StrengthsWeaknesses {
        strengths,
        weaknesses,
    }
}

pub fn strengths_and_weaknesses(records: &[PhysicalRecord]) -> StrengthsWeaknesses {
    rank_qualities(average_by_quality(records), 3)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementAnalysis {
    pub movement: String,
    pub avg_benchmark: f64,
    pub improvement_rate: f64,
    pub percentile_score: f64,
    pub trends_over_time: Vec<TrendPoint>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// One bundle per movement present in the data, first-seen order.
pub fn analyze(records: &[PhysicalRecord]) -> Vec<MovementAnalysis> {
    let rates = improvement_rates(records);
    distinct(records, |r| r.movement.as_str())
        .into_iter()
        .map(|movement| {
            let subset = owned(by_movement(records, &movement));
            let values: Vec<f64> = subset.iter().map(benchmark).collect();
            let ranked = rank_qualities(average_by_quality(&subset), 2);
            let improvement_rate = rates
                .iter()
                .find(|(m, _)| *m == movement)
                .map(|(_, r)| *r)
                .unwrap_or(0.0);
            MovementAnalysis {
                avg_benchmark: mean(&values),
                improvement_rate,
                percentile_score: percentile_score(&values),
                trends_over_time: benchmark_trend(records, &movement),
                strengths: ranked.strengths,
                weaknesses: ranked.weaknesses,
                movement,
            }
        })
        .collect()
}

/// Training focus: the two weakest movements (by their weaknesses, or
/// overall) plus any movement declining by more than 5%.
pub fn recommended_focus(analysis: &[MovementAnalysis]) -> Vec<String> {
    let mut by_average: Vec<&MovementAnalysis> = analysis.iter().collect();
    by_average.sort_by(|a, b| {
        a.avg_benchmark
            .partial_cmp(&b.avg_benchmark)
            .unwrap_or(Ordering::Equal)
    });

    let mut focus = Vec::new();
    for m in by_average.iter().take(2) {
        if m.weaknesses.is_empty() {
            focus.push(format!("Improve overall {} performance", m.movement));
        } else {
            for weakness in &m.weaknesses {
                focus.push(format!("Improve {} {}", m.movement, weakness));
            }
        }
    }
    for m in analysis.iter().filter(|m| m.improvement_rate < -5.0) {
        focus.push(format!("Address declining trend in {} performance", m.movement));
    }
    focus
}
