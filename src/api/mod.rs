// Workout API module.
// HTTP client, endpoint methods and wire types for the fitness app API.

pub mod client;
pub mod endpoints;
#[cfg(test)]
pub mod fake;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use crate::session::Credential;

pub use client::ApiClient;
pub use types::*;

/// Operations the views need from the remote API. Each call is a single
/// request/response exchange with no retry.
#[async_trait]
pub trait WorkoutApi: Send + Sync {
    /// Exchange email and password for a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<Credential>;

    /// Create an account. Does not log the user in.
    async fn register(&self, email: &str, password: &str) -> Result<RegisterConfirmation>;

    async fn list_workouts(&self, credential: &Credential) -> Result<Vec<Workout>>;

    async fn add_workout(&self, credential: &Credential, draft: &WorkoutDraft) -> Result<Workout>;

    /// `None` when the server acknowledged the edit without echoing the workout.
    async fn update_workout(
        &self,
        credential: &Credential,
        id: &WorkoutId,
        draft: &WorkoutDraft,
    ) -> Result<Option<Workout>>;

    async fn delete_workout(&self, credential: &Credential, id: &WorkoutId) -> Result<()>;

    async fn mark_workout_done(&self, credential: &Credential, id: &WorkoutId) -> Result<()>;
}
