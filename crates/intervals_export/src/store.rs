//! Write-once persistence of a download run.
//!
//! Each run lands in its own subdirectory of the data root, named
//! `<sanitized-name>-<timestamp>`. The timestamp is UTC with nanosecond
//! precision and contains no colons or periods, so two runs in the same
//! process never collide and a prior run is never merged or overwritten.

use crate::download::DownloadResult;
use crate::error::ExportResult;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Restrict a run name to ASCII alphanumerics and hyphens.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.trim_matches('-').is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

fn run_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H-%M-%S-%9fZ")
        .to_string()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> ExportResult<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    std::fs::write(path, pretty)?;
    Ok(())
}

/// Persist `result` under `data_dir`, returning the run directory path.
///
/// One pretty-printed JSON file per aggregate field, a streams file only
/// when at least one stream was collected, and a combined file holding the
/// whole aggregate.
pub fn save(result: &DownloadResult, name: &str, data_dir: &Path) -> ExportResult<PathBuf> {
    let dir = data_dir.join(format!("{}-{}", sanitize_name(name), run_timestamp()));
    std::fs::create_dir_all(&dir)?;

    write_json(&dir.join("athlete.json"), &result.athlete)?;
    write_json(&dir.join("activities.json"), &result.activities)?;
    write_json(&dir.join("activities-detailed.json"), &result.activity_details)?;
    write_json(&dir.join("calendar-events.json"), &result.events)?;
    write_json(&dir.join("wellness.json"), &result.wellness)?;
    write_json(&dir.join("power-curve.json"), &result.power_curve)?;
    if !result.streams.is_empty() {
        write_json(&dir.join("activity-streams.json"), &result.streams)?;
    }
    write_json(&dir.join("combined.json"), result)?;

    tracing::info!("saved download to {}", dir.display());
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::DownloadResult;
    use intervals_client::Activity;

    fn activity(id: &str) -> Activity {
        Activity {
            id: id.to_string(),
            start_date_local: Some("2026-01-02T08:00:00".into()),
            activity_type: Some("Run".into()),
            distance: Some(5000.0),
            moving_time: Some(1800),
            elapsed_time: Some(1850),
            average_hr: Some(148.0),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn sanitize_name_strips_specials() {
        assert_eq!(sanitize_name("My Run (jan)"), "My-Run--jan-");
        assert_eq!(sanitize_name("plain-name1"), "plain-name1");
        assert_eq!(sanitize_name("///"), "download");
        assert_eq!(sanitize_name(""), "download");
    }

    #[test]
    fn save_writes_per_field_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut result = DownloadResult::default();
        result.activities.push(activity("a1"));
        result
            .streams
            .insert("a1".into(), serde_json::json!([{"type": "time", "data": [0, 1]}]));

        let dir = save(&result, "test run", tmp.path()).expect("save");
        for file in [
            "athlete.json",
            "activities.json",
            "activities-detailed.json",
            "calendar-events.json",
            "wellness.json",
            "power-curve.json",
            "activity-streams.json",
            "combined.json",
        ] {
            assert!(dir.join(file).exists(), "missing {file}");
        }

        let combined: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("combined.json")).unwrap())
                .unwrap();
        assert_eq!(combined["activities"][0]["id"], "a1");
        assert!(combined["athlete"].is_null());
    }

    #[test]
    fn save_skips_streams_file_when_empty() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let result = DownloadResult::default();
        let dir = save(&result, "empty", tmp.path()).expect("save");
        assert!(!dir.join("activity-streams.json").exists());
        assert!(dir.join("combined.json").exists());
    }

    #[test]
    fn save_twice_with_same_name_yields_distinct_dirs() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let result = DownloadResult::default();
        let first = save(&result, "same", tmp.path()).expect("first");
        let second = save(&result, "same", tmp.path()).expect("second");
        assert_ne!(first, second);
    }

    #[test]
    fn run_directory_name_has_no_colons_or_periods() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = save(&DownloadResult::default(), "clean", tmp.path()).expect("save");
        let leaf = dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(leaf.starts_with("clean-"));
        assert!(!leaf.contains(':'));
        assert!(!leaf.contains('.'));
    }
}
