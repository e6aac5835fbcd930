//! Typed models and the `IntervalsApi` trait for the intervals.icu API,
//! plus a reqwest-based client implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod utils;

#[derive(Debug, Error)]
pub enum IntervalsError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("api error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("configuration error: {0}")]
    Config(String),
}

impl IntervalsError {
    /// Map an HTTP status and body snippet to the matching error variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => IntervalsError::Auth(body),
            404 => IntervalsError::NotFound(body),
            422 => IntervalsError::InvalidInput(body),
            _ => IntervalsError::Api { status, body },
        }
    }
}

/// Inclusive date range sent as `oldest`/`newest` query parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub oldest: NaiveDate,
    pub newest: NaiveDate,
}

impl DateRange {
    /// Query pairs in `YYYY-MM-DD` form.
    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("oldest", self.oldest.to_string()),
            ("newest", self.newest.to_string()),
        ]
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Athlete {
    #[serde(deserialize_with = "deserialize_string")]
    pub id: String,
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Typed core of an activity; every field the service adds beyond these is
/// preserved in `extra` and round-trips through persistence untouched.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    #[serde(deserialize_with = "deserialize_string")]
    pub id: String,
    pub start_date_local: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub distance: Option<f64>,
    pub moving_time: Option<u64>,
    pub elapsed_time: Option<u64>,
    pub average_hr: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    #[default]
    Workout,
    RaceA,
    RaceB,
    RaceC,
    Note,
    Holiday,
    Sick,
    Injured,
    Target,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub id: Option<String>,
    pub start_date_local: String,
    pub name: Option<String>,
    pub category: Option<EventCategory>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Upload payload for a planned workout. Input only; the service responds
/// with a created [`CalendarEvent`] carrying an assigned id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlan {
    pub start_date_local: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub category: EventCategory,
}

/// Stream channels requested when the caller does not name any.
pub const DEFAULT_STREAM_TYPES: &[&str] = &[
    "time",
    "latlng",
    "distance",
    "altitude",
    "heartrate",
    "cadence",
    "watts",
    "temp",
];

fn deserialize_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn deserialize_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string().into()),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[async_trait]
pub trait IntervalsApi: Send + Sync + 'static {
    async fn get_athlete(&self, athlete_id: &str) -> Result<Athlete, IntervalsError>;
    async fn list_activities(
        &self,
        athlete_id: &str,
        range: &DateRange,
    ) -> Result<Vec<Activity>, IntervalsError>;
    async fn get_activity(&self, activity_id: &str) -> Result<Activity, IntervalsError>;
    async fn get_activity_streams(
        &self,
        activity_id: &str,
        types: Option<&[String]>,
    ) -> Result<serde_json::Value, IntervalsError>;
    async fn list_events(
        &self,
        athlete_id: &str,
        range: &DateRange,
    ) -> Result<Vec<CalendarEvent>, IntervalsError>;
    async fn create_event(
        &self,
        athlete_id: &str,
        plan: WorkoutPlan,
    ) -> Result<CalendarEvent, IntervalsError>;
    async fn delete_event(&self, athlete_id: &str, event_id: &str)
    -> Result<(), IntervalsError>;
    async fn list_wellness(
        &self,
        athlete_id: &str,
        range: &DateRange,
    ) -> Result<Vec<serde_json::Value>, IntervalsError>;
    async fn get_power_curve(
        &self,
        athlete_id: &str,
        range: &DateRange,
    ) -> Result<serde_json::Value, IntervalsError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    #[test]
    fn activity_id_from_number() {
        let payload = json!({"id": 987654, "type": "Run", "distance": 5000.0});
        let a: super::Activity = serde_json::from_value(payload).expect("deserialize number id");
        assert_eq!(a.id, "987654");
        assert_eq!(a.activity_type.as_deref(), Some("Run"));
    }

    #[test]
    fn activity_extra_fields_round_trip() {
        let payload = json!({
            "id": "a1",
            "type": "Ride",
            "moving_time": 3600,
            "icu_training_load": 85,
            "device_name": "wahoo"
        });
        let a: super::Activity = serde_json::from_value(payload.clone()).expect("deserialize");
        assert_eq!(a.extra.get("icu_training_load"), Some(&json!(85)));
        let back = serde_json::to_value(&a).expect("serialize");
        assert_eq!(back.get("device_name"), Some(&json!("wahoo")));
    }

    #[test]
    fn activity_invalid_id_type_errors() {
        let payload = json!({"id": {"nested": true}});
        let res: Result<super::Activity, _> = serde_json::from_value(payload);
        assert!(res.is_err());
    }

    #[test]
    fn event_unknown_category_maps_to_unknown() {
        let payload =
            json!({"id": 7, "start_date_local": "2026-01-05T00:00:00", "category": "NOT_A_KIND"});
        let ev: super::CalendarEvent = serde_json::from_value(payload).expect("deserialize event");
        assert_eq!(ev.id.as_deref(), Some("7"));
        assert_eq!(ev.category, Some(super::EventCategory::Unknown));
    }

    #[test]
    fn workout_plan_category_defaults_to_workout() {
        let payload = json!({"start_date_local": "2026-01-05", "type": "Run", "name": "Tempo"});
        let plan: super::WorkoutPlan = serde_json::from_value(payload).expect("deserialize plan");
        assert_eq!(plan.category, super::EventCategory::Workout);
        let ser = serde_json::to_value(&plan).expect("serialize plan");
        assert_eq!(ser.get("category"), Some(&json!("WORKOUT")));
    }

    #[test]
    fn date_range_query_uses_iso_dates() {
        let range = super::DateRange {
            oldest: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            newest: chrono::NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        };
        let q = range.query();
        assert_eq!(q[0], ("oldest", "2026-01-01".to_string()));
        assert_eq!(q[1], ("newest", "2026-01-31".to_string()));
    }
}
