//! Command dispatch for the `intervals_export` binary.
//!
//! Every command takes a JSON payload (inline argument or stdin) and the
//! process emits a single JSON envelope `{ok, data?, error?}` on stdout.

use crate::download;
use crate::error::{ExportError, ExportResult};
use crate::store;
use crate::summary;
use chrono::NaiveDate;
use intervals_client::{DateRange, IntervalsApi, WorkoutPlan};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;

/// The single JSON object printed to stdout.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

fn default_athlete_id() -> String {
    "me".to_string()
}

fn default_run_name() -> String {
    "download".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Fill in a 30-day range when the payload omits one or both ends.
fn range_or_default(oldest: Option<NaiveDate>, newest: Option<NaiveDate>) -> DateRange {
    let newest = newest.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let oldest = oldest.unwrap_or(newest - chrono::Duration::days(30));
    DateRange { oldest, newest }
}

#[derive(Debug, Deserialize)]
struct AthleteArgs {
    #[serde(default = "default_athlete_id")]
    athlete_id: String,
}

#[derive(Debug, Deserialize)]
struct RangeArgs {
    #[serde(default = "default_athlete_id")]
    athlete_id: String,
    oldest: Option<NaiveDate>,
    newest: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct ActivityArgs {
    activity_id: String,
}

#[derive(Debug, Deserialize)]
struct StreamArgs {
    activity_id: String,
    types: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CreateWorkoutArgs {
    #[serde(default = "default_athlete_id")]
    athlete_id: String,
    #[serde(flatten)]
    plan: WorkoutPlan,
}

#[derive(Debug, Deserialize)]
struct DeleteEventArgs {
    #[serde(default = "default_athlete_id")]
    athlete_id: String,
    event_id: String,
}

#[derive(Debug, Deserialize)]
struct DownloadAllArgs {
    #[serde(default = "default_athlete_id")]
    athlete_id: String,
    oldest: Option<NaiveDate>,
    newest: Option<NaiveDate>,
    #[serde(default = "default_run_name")]
    name: String,
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
}

fn parse<T: serde::de::DeserializeOwned>(payload: &str) -> ExportResult<T> {
    let payload = if payload.trim().is_empty() {
        "{}"
    } else {
        payload
    };
    serde_json::from_str(payload).map_err(|e| ExportError::Payload(e.to_string()))
}

/// Execute `command` against `client` and return the `data` value for the
/// envelope.
pub async fn run(
    client: &dyn IntervalsApi,
    command: &str,
    payload: &str,
) -> ExportResult<serde_json::Value> {
    match command {
        "athlete" => {
            let args: AthleteArgs = parse(payload)?;
            let athlete = client.get_athlete(&args.athlete_id).await?;
            Ok(serde_json::to_value(athlete)?)
        }
        "activities" => {
            let args: RangeArgs = parse(payload)?;
            let range = range_or_default(args.oldest, args.newest);
            let activities = client.list_activities(&args.athlete_id, &range).await?;
            Ok(serde_json::to_value(activities)?)
        }
        "activity" => {
            let args: ActivityArgs = parse(payload)?;
            let activity = client.get_activity(&args.activity_id).await?;
            Ok(serde_json::to_value(activity)?)
        }
        "activity-streams" => {
            let args: StreamArgs = parse(payload)?;
            let streams = client
                .get_activity_streams(&args.activity_id, args.types.as_deref())
                .await?;
            Ok(streams)
        }
        "events" => {
            let args: RangeArgs = parse(payload)?;
            let range = range_or_default(args.oldest, args.newest);
            let events = client.list_events(&args.athlete_id, &range).await?;
            Ok(serde_json::to_value(events)?)
        }
        "create-workout" => {
            let args: CreateWorkoutArgs = parse(payload)?;
            let event = client.create_event(&args.athlete_id, args.plan).await?;
            Ok(serde_json::to_value(event)?)
        }
        "delete-event" => {
            let args: DeleteEventArgs = parse(payload)?;
            client.delete_event(&args.athlete_id, &args.event_id).await?;
            Ok(json!({"deleted": args.event_id}))
        }
        "wellness" => {
            let args: RangeArgs = parse(payload)?;
            let range = range_or_default(args.oldest, args.newest);
            let wellness = client.list_wellness(&args.athlete_id, &range).await?;
            Ok(serde_json::to_value(wellness)?)
        }
        "power-curve" => {
            let args: RangeArgs = parse(payload)?;
            let range = range_or_default(args.oldest, args.newest);
            let curve = client.get_power_curve(&args.athlete_id, &range).await?;
            Ok(curve)
        }
        "download-all" => {
            let args: DownloadAllArgs = parse(payload)?;
            let range = range_or_default(args.oldest, args.newest);
            let result = download::download_all(client, &args.athlete_id, &range).await;
            let path = store::save(&result, &args.name, &args.data_dir)?;
            summary::summarize(&result);
            Ok(json!({
                "path": path,
                "counts": {
                    "activities": result.activities.len(),
                    "activity_details": result.activity_details.len(),
                    "events": result.events.len(),
                    "wellness": result.wellness.len(),
                    "streams": result.streams.len(),
                }
            }))
        }
        other => Err(ExportError::UnknownCommand(other.to_string())),
    }
}
