// Record normalizer.
//
// Raw rows (parsed JSON objects or CSV lines) carry numbers either as JSON
// numbers or as numeric-looking strings. Every designated numeric field is
// coerced; anything that does not parse becomes `0` and is counted in the
// `LoadReport` instead of failing the load.
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::errors::{InsightsError, Result};
use crate::scale::{Composite, Percent};
use crate::types::{GpsRecord, PhysicalRecord, PlayerRecord, PriorityArea, RecoveryRecord};
use crate::util::{parse_date_safe, parse_f64_safe, parse_i64_safe};

pub type RawRecord = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    /// Numeric fields that failed to parse and were set to zero.
    pub zeroed_fields: usize,
    /// Rows whose date could not be read; they are kept without a date.
    pub undated_rows: usize,
}

/// Field accessor over one raw row that tallies coercion failures.
pub struct FieldReader<'a> {
    raw: &'a RawRecord,
    report: &'a mut LoadReport,
}

impl<'a> FieldReader<'a> {
    pub fn new(raw: &'a RawRecord, report: &'a mut LoadReport) -> Self {
        Self { raw, report }
    }

    fn parse_number(value: Option<&Value>) -> Option<f64> {
        match value? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_f64_safe(Some(s)),
            _ => None,
        }
    }

    pub fn number(&mut self, key: &str) -> f64 {
        match Self::parse_number(self.raw.get(key)) {
            Some(v) => v,
            None => {
                self.report.zeroed_fields += 1;
                0.0
            }
        }
    }

    /// `None` when the key is absent; present but unparseable counts as zero.
    pub fn optional_number(&mut self, key: &str) -> Option<f64> {
        if self.raw.contains_key(key) {
            Some(self.number(key))
        } else {
            None
        }
    }

    pub fn integer(&mut self, key: &str) -> i64 {
        let parsed = match self.raw.get(key) {
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|v| v.trunc() as i64)),
            Some(Value::String(s)) => parse_i64_safe(Some(s)),
            _ => None,
        };
        parsed.unwrap_or_else(|| {
            self.report.zeroed_fields += 1;
            0
        })
    }

    pub fn text(&self, key: &str) -> String {
        match self.raw.get(key) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        match self.raw.get(key) {
            Some(Value::String(s)) => parse_date_safe(Some(s)),
            _ => None,
        }
    }

    fn mark_undated(&mut self) {
        self.report.undated_rows += 1;
    }
}

/// Conversion from a raw row into a typed domain record.
pub trait FromRaw: Sized {
    fn from_raw(fields: &mut FieldReader<'_>) -> Self;
}

impl FromRaw for GpsRecord {
    fn from_raw(f: &mut FieldReader<'_>) -> Self {
        let date = f.date("date");
        if date.is_none() {
            f.mark_undated();
        }
        GpsRecord {
            date,
            opposition_code: f.text("opposition_code"),
            opposition_full: f.text("opposition_full"),
            md_plus_code: f.text("md_plus_code"),
            md_minus_code: f.text("md_minus_code"),
            season: f.text("season"),
            distance: f.number("distance"),
            distance_over_21: f.number("distance_over_21"),
            distance_over_24: f.number("distance_over_24"),
            distance_over_27: f.number("distance_over_27"),
            accel_decel_over_2_5: f.number("accel_decel_over_2_5"),
            accel_decel_over_3_5: f.number("accel_decel_over_3_5"),
            accel_decel_over_4_5: f.number("accel_decel_over_4_5"),
            day_duration: f.number("day_duration"),
            peak_speed: f.number("peak_speed"),
            hr_zone_1_hms: f.text("hr_zone_1_hms"),
            hr_zone_2_hms: f.text("hr_zone_2_hms"),
            hr_zone_3_hms: f.text("hr_zone_3_hms"),
            hr_zone_4_hms: f.text("hr_zone_4_hms"),
            hr_zone_5_hms: f.text("hr_zone_5_hms"),
        }
    }
}

impl FromRaw for RecoveryRecord {
    fn from_raw(f: &mut FieldReader<'_>) -> Self {
        let date = f.date("date");
        if date.is_none() {
            f.mark_undated();
        }
        let mut composite = |key: &str| Composite::new(f.number(key));
        let bio_composite = composite("bio_composite");
        let msk_joint_range_composite = composite("msk_joint_range_composite");
        let msk_load_tolerance_composite = composite("msk_load_tolerance_composite");
        let subjective_composite = composite("subjective_composite");
        let soreness_composite = composite("soreness_composite");
        let sleep_composite = composite("sleep_composite");
        let stress_load_composite = composite("stress_load_composite");
        RecoveryRecord {
            date,
            bio_completeness: f.number("bio_completeness"),
            bio_composite,
            msk_joint_range_completeness: f.number("msk_joint_range_completeness"),
            msk_joint_range_composite,
            msk_load_tolerance_completeness: f.number("msk_load_tolerance_completeness"),
            msk_load_tolerance_composite,
            subjective_completeness: f.number("subjective_completeness"),
            subjective_composite,
            soreness_completeness: f.number("soreness_completeness"),
            soreness_composite,
            sleep_completeness: f.number("sleep_completeness"),
            sleep_composite,
            emboss_baseline_score: f.optional_number("emboss_baseline_score").map(Composite::new),
            stress_load_composite,
        }
    }
}

impl FromRaw for PhysicalRecord {
    fn from_raw(f: &mut FieldReader<'_>) -> Self {
        let date = f.date("date");
        if date.is_none() {
            f.mark_undated();
        }
        PhysicalRecord {
            date,
            movement: f.text("movement"),
            quality: f.text("quality"),
            expression: f.text("expression"),
            benchmark_pct: Percent::new(f.number("benchmarkPct")),
        }
    }
}

impl FromRaw for PriorityArea {
    fn from_raw(f: &mut FieldReader<'_>) -> Self {
        PriorityArea {
            priority: f.integer("Priority"),
            category: f.text("Category"),
            area: f.text("Area"),
            target: f.text("Target"),
            performance_type: f.text("Performance Type"),
            target_set: f.date("Target set"),
            review_date: f.date("Review Date"),
            tracking: f.text("Tracking"),
        }
    }
}

impl FromRaw for PlayerRecord {
    fn from_raw(f: &mut FieldReader<'_>) -> Self {
        PlayerRecord {
            season: f.text("season"),
            player: f.text("player"),
            nationality: f.text("nationality"),
            position: f.text("position"),
            age: f.integer("age"),
            games: f.integer("games"),
            games_starts: f.integer("games_starts"),
            minutes: f.integer("minutes"),
            minutes_90s: f.number("minutes_90s"),
        }
    }
}

pub fn normalize<T: FromRaw>(rows: &[RawRecord]) -> (Vec<T>, LoadReport) {
    let mut report = LoadReport {
        total_rows: rows.len(),
        ..LoadReport::default()
    };
    let records = rows
        .iter()
        .map(|raw| T::from_raw(&mut FieldReader::new(raw, &mut report)))
        .collect();
    if report.zeroed_fields > 0 || report.undated_rows > 0 {
        debug!(
            rows = report.total_rows,
            zeroed_fields = report.zeroed_fields,
            undated_rows = report.undated_rows,
            "normalized rows with degraded fields"
        );
    }
    (records, report)
}

/// Parse a JSON array of objects. Non-object elements become empty rows so
/// they still normalize (to all-zero records) instead of aborting the load.
pub fn parse_json_rows(text: &str) -> Result<Vec<RawRecord>> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => map,
                _ => RawRecord::new(),
            })
            .collect()),
        _ => Err(InsightsError::NotAnArray),
    }
}

/// Parse header + rows CSV text. All fields arrive as strings; ragged rows
/// are accepted and missing trailing fields are simply absent.
pub fn parse_csv_rows(text: &str) -> Result<Vec<RawRecord>> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: RawRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Read rows from a `.csv` file or, for any other extension, a JSON file.
pub fn read_rows(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(InsightsError::DataFileMissing(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        parse_csv_rows(&text)
    } else {
        parse_json_rows(&text)
    }
}

pub fn load_file<T: FromRaw>(path: &Path) -> Result<(Vec<T>, LoadReport)> {
    let rows = read_rows(path)?;
    let (records, report) = normalize(&rows);
    info!(path = %path.display(), rows = report.total_rows, "loaded records");
    Ok((records, report))
}

/// Read a JSON array straight into typed records, for domains whose input
/// already uses the exported field names (injury history, travel log).
pub fn load_typed<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(InsightsError::DataFileMissing(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let records: Vec<T> = serde_json::from_str(&text)?;
    info!(path = %path.display(), rows = records.len(), "loaded records");
    Ok(records)
}

/// Load `path` when given; on any error or an empty result, log and use the
/// generated fallback so a dashboard is never rendered empty.
pub fn load_or_fallback<T, F>(path: Option<&Path>, fallback: F) -> Vec<T>
where
    T: FromRaw,
    F: FnOnce() -> Vec<T>,
{
    with_fallback(path, |p| load_file::<T>(p).map(|(records, _)| records), fallback)
}

pub fn load_typed_or_fallback<T, F>(path: Option<&Path>, fallback: F) -> Vec<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    with_fallback(path, load_typed::<T>, fallback)
}

fn with_fallback<T, L, F>(path: Option<&Path>, load: L, fallback: F) -> Vec<T>
where
    L: FnOnce(&Path) -> Result<Vec<T>>,
    F: FnOnce() -> Vec<T>,
{
    let Some(path) = path else {
        return fallback();
    };
    match load(path) {
        Ok(records) if !records.is_empty() => records,
        Ok(_) => {
            warn!(path = %path.display(), "no records in input, using mock data");
            fallback()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load input, using mock data");
            fallback()
        }
    }
}
