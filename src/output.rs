use serde::Serialize;
use std::fs;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

use crate::errors::Result;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    info!(path = %path.display(), rows = rows.len(), "wrote csv");
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s)?;
    info!(path = %path.display(), "wrote json");
    Ok(())
}

/// Markdown table of the first `max_rows` rows, or `(no rows)`.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("\n{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    println!("{}\n", render_table(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BucketRow;

    fn rows() -> Vec<BucketRow> {
        vec![BucketRow {
            key: "Achieved".into(),
            count: 2,
            total: "0.00".into(),
            percent: "50.0".into(),
        }]
    }

    #[test]
    fn render_markdown() {
        let table = render_table(&rows(), 10);
        assert!(table.contains("| Key"));
        assert!(table.contains("Achieved"));
        assert_eq!(render_table::<BucketRow>(&[], 10), "(no rows)");
    }

    #[test]
    fn writes_csv_with_renamed_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("buckets.csv");
        write_csv(&path, &rows()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Key,Count,Total,Percent"));
        assert!(text.contains("Achieved,2,0.00,50.0"));
    }

    #[test]
    fn writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_json(&path, &serde_json::json!({"sessions": 3})).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"sessions\": 3"));
    }
}
