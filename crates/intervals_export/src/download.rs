//! Best-effort bulk download of an athlete's data over a date range.
//!
//! Fetches are ordered by dependency (the athlete id must resolve before
//! id-scoped queries) and otherwise independent: a failure in any one step
//! degrades that field to its default and the run continues. The per-activity
//! detail/stream loop is strictly sequential, so at most one request is in
//! flight at a time.

use intervals_client::{Activity, Athlete, CalendarEvent, DateRange, IntervalsApi};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate of one bulk run. List fields are always present (possibly
/// empty); `athlete` and `power_curve` stay `None` when their fetch failed.
#[derive(Debug, Default, Serialize)]
pub struct DownloadResult {
    pub athlete: Option<Athlete>,
    pub activities: Vec<Activity>,
    pub activity_details: Vec<Activity>,
    pub events: Vec<CalendarEvent>,
    pub wellness: Vec<serde_json::Value>,
    pub power_curve: Option<serde_json::Value>,
    /// Stream payloads keyed by activity id; an activity whose stream fetch
    /// failed is simply absent here.
    pub streams: BTreeMap<String, serde_json::Value>,
}

/// Fetch everything for `athlete_id` over `range`. Never fails as a whole;
/// each step logs its own failure and leaves its field at the default.
pub async fn download_all(
    client: &dyn IntervalsApi,
    athlete_id: &str,
    range: &DateRange,
) -> DownloadResult {
    let mut result = DownloadResult::default();

    // The service may resolve "me" (or a prefixed id) to a concrete athlete
    // id; use that for every subsequent call when available.
    let mut resolved_id = athlete_id.to_string();
    match client.get_athlete(athlete_id).await {
        Ok(athlete) => {
            if !athlete.id.is_empty() {
                resolved_id = athlete.id.clone();
            }
            result.athlete = Some(athlete);
        }
        Err(e) => tracing::warn!("failed to fetch athlete {}: {}", athlete_id, e),
    }

    match client.list_activities(&resolved_id, range).await {
        Ok(activities) => result.activities = activities,
        Err(e) => tracing::warn!("failed to fetch activities for {}: {}", resolved_id, e),
    }

    for activity in &result.activities {
        match client.get_activity(&activity.id).await {
            Ok(detail) => result.activity_details.push(detail),
            Err(e) => tracing::warn!("failed to fetch details for activity {}: {}", activity.id, e),
        }
        match client.get_activity_streams(&activity.id, None).await {
            Ok(streams) => {
                result.streams.insert(activity.id.clone(), streams);
            }
            Err(e) => tracing::warn!("failed to fetch streams for activity {}: {}", activity.id, e),
        }
    }

    match client.list_events(&resolved_id, range).await {
        Ok(events) => result.events = events,
        Err(e) => tracing::warn!("failed to fetch calendar events for {}: {}", resolved_id, e),
    }

    match client.list_wellness(&resolved_id, range).await {
        Ok(wellness) => result.wellness = wellness,
        Err(e) => tracing::warn!("failed to fetch wellness for {}: {}", resolved_id, e),
    }

    match client.get_power_curve(&resolved_id, range).await {
        Ok(curve) => result.power_curve = Some(curve),
        Err(e) => tracing::warn!("failed to fetch power curve for {}: {}", resolved_id, e),
    }

    result
}
