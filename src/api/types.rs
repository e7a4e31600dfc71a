// Workout API wire types.
// Everything the server sends is normalized here, at the boundary: one identifier
// field, one list shape, one completion flag.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FitlogError, Result};
use crate::session::Credential;

/// Canonical workout identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A workout as the client keeps it.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutId,
    pub name: String,
    pub duration: String,
    pub completed: bool,
    pub added_at: Option<DateTime<Utc>>,
}

/// Name and duration as entered in the add/edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkoutDraft {
    pub name: String,
    pub duration: String,
}

impl WorkoutDraft {
    pub fn new(name: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: duration.into(),
        }
    }
}

/// Login/registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// What the server said after a successful registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterConfirmation {
    pub message: Option<String>,
}

/// Workout as the API sends it. Older endpoints use `id`, newer ones `_id`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawWorkout {
    #[serde(rename = "_id", default)]
    primary_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    duration: Option<Value>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "createdAt")]
    date_added: Option<String>,
}

impl TryFrom<RawWorkout> for Workout {
    type Error = FitlogError;

    fn try_from(raw: RawWorkout) -> Result<Self> {
        let id = raw
            .primary_id
            .as_ref()
            .and_then(id_text)
            .or_else(|| raw.id.as_ref().and_then(id_text))
            .ok_or_else(|| FitlogError::InvalidResponse("workout without an id".to_string()))?;

        let duration = match raw.duration {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        let completed = raw.completed.unwrap_or(false)
            || raw
                .status
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("completed"));

        let added_at = raw
            .date_added
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(Workout {
            id: WorkoutId::new(id),
            name: raw.name.unwrap_or_default(),
            duration,
            completed,
            added_at,
        })
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// List response: wrapped under `workouts`, or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkoutListEnvelope {
    Wrapped { workouts: Vec<RawWorkout> },
    Bare(Vec<RawWorkout>),
}

/// Single-workout response: wrapped under a named field, or the object itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkoutEnvelope {
    Wrapped {
        #[serde(alias = "updatedWorkout", alias = "newWorkout")]
        workout: RawWorkout,
    },
    Bare(RawWorkout),
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default, alias = "token", alias = "accessToken")]
    access: Option<String>,
}

/// Parse a workout list body into canonical workouts.
pub fn parse_workout_list(body: &str) -> Result<Vec<Workout>> {
    let raw = match serde_json::from_str::<WorkoutListEnvelope>(body)? {
        WorkoutListEnvelope::Wrapped { workouts } => workouts,
        WorkoutListEnvelope::Bare(workouts) => workouts,
    };
    raw.into_iter().map(Workout::try_from).collect()
}

/// Parse a single workout body.
pub fn parse_workout(body: &str) -> Result<Workout> {
    match serde_json::from_str::<WorkoutEnvelope>(body)? {
        WorkoutEnvelope::Wrapped { workout } => Workout::try_from(workout),
        WorkoutEnvelope::Bare(workout) => Workout::try_from(workout),
    }
}

/// Parse an update acknowledgement. Some deployments answer with only a message,
/// which yields `None`; a body that is not JSON is still an error.
pub fn parse_update(body: &str) -> Result<Option<Workout>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(body)?;
    let has_workout = ["workout", "updatedWorkout", "newWorkout", "_id", "id"]
        .iter()
        .any(|field| value.get(*field).is_some_and(|v| !v.is_null()));
    if !has_workout {
        return Ok(None);
    }
    parse_workout(body).map(Some)
}

/// Parse a login body into a token credential.
pub fn parse_login(body: &str) -> Result<Credential> {
    let response: LoginResponse = serde_json::from_str(body)?;
    response
        .access
        .filter(|token| !token.trim().is_empty())
        .map(Credential::token)
        .ok_or_else(|| {
            FitlogError::InvalidResponse("login response did not include an access token".into())
        })
}

/// Parse a registration body. Any JSON is accepted; only `message` is kept.
pub fn parse_register(body: &str) -> RegisterConfirmation {
    RegisterConfirmation {
        message: message_field(body),
    }
}

/// The `message` (or `error`) string from a JSON body, if there is one.
pub fn message_field(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|field| value.get(*field).and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}
