// Ordinal label ladders.
//
// Each classifier is a descending chain of `if` thresholds ending in an
// unconditional `else`, so every f64 (NaN included) lands on exactly one label.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Moderate, RiskLevel::High];

    /// Readiness-style score where higher is better: `>= 80` Low,
    /// `50..80` Moderate, everything else High.
    pub fn from_readiness(score: f64) -> Self {
        if score >= 80.0 {
            RiskLevel::Low
        } else if score >= 50.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    /// Accumulated injury risk points where higher is worse: `>= 8` High,
    /// `4..8` Moderate, everything else Low.
    pub fn from_injury_score(score: f64) -> Self {
        if score >= 8.0 {
            RiskLevel::High
        } else if score >= 4.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatigueLevel {
    Low,
    Moderate,
    High,
}

impl FatigueLevel {
    /// Lower wellness means more fatigue.
    pub fn from_score(score: f64) -> Self {
        if score > 70.0 {
            FatigueLevel::Low
        } else if score < 50.0 {
            FatigueLevel::High
        } else {
            FatigueLevel::Moderate
        }
    }

    pub fn risk_points(&self) -> f64 {
        match self {
            FatigueLevel::Low => 0.0,
            FatigueLevel::Moderate => 1.0,
            FatigueLevel::High => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FatigueLevel::Low => "Low",
            FatigueLevel::Moderate => "Moderate",
            FatigueLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SleepQuality {
    Poor,
    Average,
    Good,
}

impl SleepQuality {
    pub fn from_score(score: f64) -> Self {
        if score > 70.0 {
            SleepQuality::Good
        } else if score < 50.0 {
            SleepQuality::Poor
        } else {
            SleepQuality::Average
        }
    }

    pub fn risk_points(&self) -> f64 {
        match self {
            SleepQuality::Good => 0.0,
            SleepQuality::Average => 1.0,
            SleepQuality::Poor => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SleepQuality::Poor => "Poor",
            SleepQuality::Average => "Average",
            SleepQuality::Good => "Good",
        }
    }
}

/// Progress label attached to a priority area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackingStatus {
    Achieved,
    #[serde(rename = "On Track")]
    OnTrack,
    Behind,
    #[serde(rename = "Not Started")]
    NotStarted,
}

impl TrackingStatus {
    pub const ALL: [TrackingStatus; 4] = [
        TrackingStatus::Achieved,
        TrackingStatus::OnTrack,
        TrackingStatus::Behind,
        TrackingStatus::NotStarted,
    ];

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Achieved" => Some(TrackingStatus::Achieved),
            "On Track" => Some(TrackingStatus::OnTrack),
            "Behind" => Some(TrackingStatus::Behind),
            "Not Started" => Some(TrackingStatus::NotStarted),
            _ => None,
        }
    }

    /// Derive a status from percentage progress towards a target.
    pub fn from_progress(progress_pct: f64) -> Self {
        if progress_pct >= 100.0 {
            TrackingStatus::Achieved
        } else if progress_pct >= 50.0 {
            TrackingStatus::OnTrack
        } else if progress_pct > 0.0 {
            TrackingStatus::Behind
        } else {
            TrackingStatus::NotStarted
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingStatus::Achieved => "Achieved",
            TrackingStatus::OnTrack => "On Track",
            TrackingStatus::Behind => "Behind",
            TrackingStatus::NotStarted => "Not Started",
        }
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelImpactBand {
    Low,
    Medium,
    High,
}

impl TravelImpactBand {
    /// Banding on total kilometres travelled.
    pub fn from_total_distance(total_km: f64) -> Self {
        if total_km < 5000.0 {
            TravelImpactBand::Low
        } else if total_km < 10000.0 {
            TravelImpactBand::Medium
        } else {
            TravelImpactBand::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelImpactBand::Low => "Low",
            TravelImpactBand::Medium => "Medium",
            TravelImpactBand::High => "High",
        }
    }
}

/// Where a quality's mean benchmark sits relative to the strength and
/// weakness cut-offs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityBand {
    Strength,
    Neutral,
    Weakness,
}

impl CapabilityBand {
    pub const STRENGTH_MIN: f64 = 60.0;
    pub const WEAKNESS_BELOW: f64 = 50.0;

    pub fn from_benchmark(mean_pct: f64) -> Self {
        if mean_pct >= Self::STRENGTH_MIN {
            CapabilityBand::Strength
        } else if mean_pct < Self::WEAKNESS_BELOW {
            CapabilityBand::Weakness
        } else {
            CapabilityBand::Neutral
        }
    }
}

/// Squad age groups. Ages are whole years; anything below 20 (including a
/// missing age read as `0`) is `Under 20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "Under 20")]
    Under20,
    #[serde(rename = "20-23")]
    From20To23,
    #[serde(rename = "24-27")]
    From24To27,
    #[serde(rename = "28-31")]
    From28To31,
    #[serde(rename = "32+")]
    From32,
}

impl AgeBand {
    pub const ALL: [AgeBand; 5] = [
        AgeBand::Under20,
        AgeBand::From20To23,
        AgeBand::From24To27,
        AgeBand::From28To31,
        AgeBand::From32,
    ];

    pub fn from_age(age: i64) -> Self {
        if age < 20 {
            AgeBand::Under20
        } else if age < 24 {
            AgeBand::From20To23
        } else if age < 28 {
            AgeBand::From24To27
        } else if age < 32 {
            AgeBand::From28To31
        } else {
            AgeBand::From32
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBand::Under20 => "Under 20",
            AgeBand::From20To23 => "20-23",
            AgeBand::From24To27 => "24-27",
            AgeBand::From28To31 => "28-31",
            AgeBand::From32 => "32+",
        }
    }
}

/// Direction of squad cohesion between the first and latest assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CohesionTrend {
    Improving,
    Stable,
    Declining,
}

impl CohesionTrend {
    pub const THRESHOLD: f64 = 3.0;

    pub fn from_change(change: f64) -> Self {
        if change >= Self::THRESHOLD {
            CohesionTrend::Improving
        } else if change <= -Self::THRESHOLD {
            CohesionTrend::Declining
        } else {
            CohesionTrend::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CohesionTrend::Improving => "Improving",
            CohesionTrend::Stable => "Stable",
            CohesionTrend::Declining => "Declining",
        }
    }
}
