// Priority-area progress tracking.

use serde::{Deserialize, Serialize};

use crate::aggregate::{count_by, distinct, Buckets};
use crate::classify::TrackingStatus;
use crate::types::{CategoryBucket, PriorityArea};

pub fn areas_in_category<'a>(areas: &'a [PriorityArea], category: &str) -> Vec<&'a PriorityArea> {
    areas.iter().filter(|a| a.category == category).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityProgress {
    pub total_areas: usize,
    pub achieved: usize,
    pub on_track: usize,
    pub behind: usize,
    pub not_started: usize,
    pub achieved_percent: f64,
    pub on_track_percent: f64,
    pub behind_percent: f64,
    pub not_started_percent: f64,
}

pub fn progress(areas: &[PriorityArea]) -> PriorityProgress {
    let total = areas.len();
    let count = |status: TrackingStatus| {
        areas
            .iter()
            .filter(|a| TrackingStatus::parse(&a.tracking) == Some(status))
            .count()
    };
    let percent = |n: usize| {
        if total == 0 {
            0.0
        } else {
            n as f64 / total as f64 * 100.0
        }
    };

    let achieved = count(TrackingStatus::Achieved);
    let on_track = count(TrackingStatus::OnTrack);
    let behind = count(TrackingStatus::Behind);
    let not_started = count(TrackingStatus::NotStarted);
    PriorityProgress {
        total_areas: total,
        achieved,
        on_track,
        behind,
        not_started,
        achieved_percent: percent(achieved),
        on_track_percent: percent(on_track),
        behind_percent: percent(behind),
        not_started_percent: percent(not_started),
    }
}

/// Counts per raw `Tracking` label, first-seen order.
pub fn tracking_breakdown(areas: &[PriorityArea]) -> Vec<CategoryBucket> {
    count_by(areas, |a| a.tracking.as_str())
}

pub fn category_breakdown(areas: &[PriorityArea]) -> Vec<CategoryBucket> {
    count_by(areas, |a| a.category.as_str())
}

pub fn area_breakdown(areas: &[PriorityArea], category: &str) -> Vec<CategoryBucket> {
    let within: Vec<PriorityArea> = areas_in_category(areas, category)
        .into_iter()
        .cloned()
        .collect();
    count_by(&within, |a| a.area.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStatus {
    pub category: String,
    pub statuses: Vec<CategoryBucket>,
}

/// Status counts per category. Every category lists the four known
/// statuses, zero when absent; unrecognised labels get their own bucket.
pub fn status_by_category(areas: &[PriorityArea]) -> Vec<CategoryStatus> {
    distinct(areas, |a| a.category.as_str())
        .into_iter()
        .map(|category| {
            let mut buckets = Buckets::with_keys(TrackingStatus::ALL.iter().map(|s| s.as_str()));
            for area in areas.iter().filter(|a| a.category == category) {
                buckets.add(&area.tracking, 0.0);
            }
            CategoryStatus {
                category,
                statuses: buckets.finish(),
            }
        })
        .collect()
}

/// Ascending by priority number; ties keep input order.
pub fn sorted_by_priority(areas: &[PriorityArea]) -> Vec<PriorityArea> {
    let mut sorted = areas.to_vec();
    sorted.sort_by_key(|a| a.priority);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(priority: i64, category: &str, name: &str, tracking: &str) -> PriorityArea {
        PriorityArea {
            priority,
            category: category.to_string(),
            area: name.to_string(),
            tracking: tracking.to_string(),
            ..PriorityArea::default()
        }
    }

    fn sample() -> Vec<PriorityArea> {
        vec![
            area(2, "Performance", "Speed", "Achieved"),
            area(1, "Recovery", "Sleep", "On Track"),
            area(3, "Performance", "Agility", "Behind"),
            area(1, "Performance", "Power", "Achieved"),
        ]
    }

    #[test]
    fn tracking_breakdown_matches_expected_shares() {
        let buckets = tracking_breakdown(&sample());
        let shares: Vec<(&str, usize, f64)> = buckets
            .iter()
            .map(|b| (b.key.as_str(), b.count, b.percent_of_total))
            .collect();
        assert_eq!(
            shares,
            vec![("Achieved", 2, 50.0), ("On Track", 1, 25.0), ("Behind", 1, 25.0)]
        );
    }

    #[test]
    fn progress_percentages() {
        let p = progress(&sample());
        assert_eq!(p.total_areas, 4);
        assert_eq!(p.achieved, 2);
        assert_eq!(p.not_started, 0);
        assert_eq!(p.achieved_percent, 50.0);
        assert_eq!(progress(&[]).achieved_percent, 0.0);
    }

    #[test]
    fn status_by_category_is_seeded() {
        let mut areas = sample();
        areas.push(area(4, "Recovery", "Hydration", "Paused"));
        let statuses = status_by_category(&areas);
        assert_eq!(statuses[0].category, "Performance");
        assert_eq!(statuses[0].statuses.len(), 4);
        let recovery = &statuses[1].statuses;
        assert_eq!(recovery.len(), 5);
        assert_eq!(recovery[3].key, "Not Started");
        assert_eq!(recovery[3].count, 0);
        assert_eq!(recovery[4].key, "Paused");
    }

    #[test]
    fn areas_and_categories() {
        let areas = sample();
        assert_eq!(category_breakdown(&areas)[0].count, 3);
        let perf = area_breakdown(&areas, "Performance");
        assert_eq!(perf.len(), 3);
        assert!(area_breakdown(&areas, "Mental").is_empty());
    }

    #[test]
    fn priority_sort_is_stable() {
        let sorted = sorted_by_priority(&sample());
        let names: Vec<&str> = sorted.iter().map(|a| a.area.as_str()).collect();
        assert_eq!(names, vec!["Sleep", "Power", "Speed", "Agility"]);
    }
}
