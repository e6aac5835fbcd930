//! Console summary of a download run.

use crate::download::DownloadResult;
use intervals_client::Activity;
use std::collections::BTreeMap;

#[derive(Default)]
struct TypeTotals {
    count: usize,
    distance_m: f64,
    moving_secs: u64,
}

/// Build the report lines: one line per activity type (count, km to one
/// decimal, hours and whole minutes), then raw counts for the remaining
/// aggregate fields. Groups detailed activities, falling back to the summary
/// list when no details were captured.
pub fn summary_lines(result: &DownloadResult) -> Vec<String> {
    let source: &[Activity] = if result.activity_details.is_empty() {
        &result.activities
    } else {
        &result.activity_details
    };

    let mut groups: BTreeMap<String, TypeTotals> = BTreeMap::new();
    for activity in source {
        let kind = activity
            .activity_type
            .clone()
            .unwrap_or_else(|| "Other".to_string());
        let totals = groups.entry(kind).or_default();
        totals.count += 1;
        totals.distance_m += activity.distance.unwrap_or(0.0);
        totals.moving_secs += activity.moving_time.unwrap_or(0);
    }

    let mut lines = Vec::new();
    for (kind, totals) in &groups {
        let hours = totals.moving_secs / 3600;
        let minutes = (totals.moving_secs % 3600) / 60;
        lines.push(format!(
            "{}: {} activities, {:.1} km, {}h {}m",
            kind,
            totals.count,
            totals.distance_m / 1000.0,
            hours,
            minutes
        ));
    }
    lines.push(format!("Calendar events: {}", result.events.len()));
    lines.push(format!("Wellness records: {}", result.wellness.len()));
    lines.push(format!("Activities with streams: {}", result.streams.len()));
    lines
}

/// Print the report to stdout.
pub fn summarize(result: &DownloadResult) {
    for line in summary_lines(result) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::DownloadResult;
    use intervals_client::Activity;

    fn run(id: &str, distance: f64, moving_time: u64) -> Activity {
        Activity {
            id: id.to_string(),
            start_date_local: None,
            activity_type: Some("Run".into()),
            distance: Some(distance),
            moving_time: Some(moving_time),
            elapsed_time: None,
            average_hr: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn groups_runs_with_totals() {
        let mut result = DownloadResult::default();
        result.activity_details.push(run("a1", 5000.0, 1800));
        result.activity_details.push(run("a2", 10000.0, 3600));

        let lines = summary_lines(&result);
        assert_eq!(lines[0], "Run: 2 activities, 15.0 km, 1h 30m");
        assert_eq!(lines[1], "Calendar events: 0");
        assert_eq!(lines[2], "Wellness records: 0");
        assert_eq!(lines[3], "Activities with streams: 0");
    }

    #[test]
    fn falls_back_to_summary_list_when_details_empty() {
        let mut result = DownloadResult::default();
        result.activities.push(run("a1", 2000.0, 600));
        let lines = summary_lines(&result);
        assert_eq!(lines[0], "Run: 1 activities, 2.0 km, 0h 10m");
    }

    #[test]
    fn untyped_activities_group_as_other() {
        let mut result = DownloadResult::default();
        let mut a = run("a1", 0.0, 0);
        a.activity_type = None;
        result.activity_details.push(a);
        let lines = summary_lines(&result);
        assert_eq!(lines[0], "Other: 1 activities, 0.0 km, 0h 0m");
    }
}
