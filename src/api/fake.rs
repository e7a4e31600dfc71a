// Scripted in-memory API used by controller tests.
// Keeps its own workout collection and records every call that would have hit the network.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;

use crate::error::{FitlogError, Result};
use crate::session::Credential;

use super::WorkoutApi;
use super::types::{RegisterConfirmation, Workout, WorkoutDraft, WorkoutId};

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    workouts: Mutex<Vec<Workout>>,
    next_id: AtomicU64,
    token: String,
    reject_auth: Mutex<Option<String>>,
    fail_next: Mutex<Option<String>>,
    bare_update_acks: AtomicBool,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            token: "tok123".to_string(),
            next_id: AtomicU64::new(100),
            ..Self::default()
        }
    }

    pub fn with_workouts(workouts: Vec<Workout>) -> Self {
        let api = Self::new();
        *api.workouts.lock().unwrap() = workouts;
        api
    }

    /// Reject the next login/register with this server message.
    pub fn reject_auth(&self, message: &str) {
        *self.reject_auth.lock().unwrap() = Some(message.to_string());
    }

    /// Fail the next workout call with this status text.
    pub fn fail_next(&self, status_text: &str) {
        *self.fail_next.lock().unwrap() = Some(status_text.to_string());
    }

    /// Acknowledge updates with a message only, without the stored workout.
    pub fn ack_updates_without_body(&self) {
        self.bare_update_acks.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Server-side state.
    pub fn workouts(&self) -> Vec<Workout> {
        self.workouts.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn authorize(&self, credential: &Credential) -> Result<()> {
        credential
            .bearer_token()
            .map(|_| ())
            .ok_or(FitlogError::NotAuthenticated)
    }

    fn check_failure(&self, action: &str) -> Result<()> {
        match self.fail_next.lock().unwrap().take() {
            Some(status) => Err(FitlogError::fetch(action, status)),
            None => Ok(()),
        }
    }

    fn check_auth_rejection(&self) -> Result<()> {
        match self.reject_auth.lock().unwrap().take() {
            Some(message) => Err(FitlogError::Authentication(message)),
            None => Ok(()),
        }
    }
}

pub fn workout(id: &str, name: &str, duration: &str, completed: bool) -> Workout {
    Workout {
        id: WorkoutId::new(id),
        name: name.to_string(),
        duration: duration.to_string(),
        completed,
        added_at: None,
    }
}

#[async_trait]
impl WorkoutApi for FakeApi {
    async fn login(&self, email: &str, _password: &str) -> Result<Credential> {
        self.record(format!("login:{}", email));
        self.check_auth_rejection()?;
        Ok(Credential::token(self.token.clone()))
    }

    async fn register(&self, email: &str, _password: &str) -> Result<RegisterConfirmation> {
        self.record(format!("register:{}", email));
        self.check_auth_rejection()?;
        Ok(RegisterConfirmation {
            message: Some("Registered Successfully".to_string()),
        })
    }

    async fn list_workouts(&self, credential: &Credential) -> Result<Vec<Workout>> {
        self.authorize(credential)?;
        self.record("list".to_string());
        self.check_failure("fetch workouts")?;
        Ok(self.workouts())
    }

    async fn add_workout(&self, credential: &Credential, draft: &WorkoutDraft) -> Result<Workout> {
        self.authorize(credential)?;
        self.record(format!("add:{}", draft.name));
        self.check_failure("add workout")?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = workout(&id.to_string(), &draft.name, &draft.duration, false);
        self.workouts.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_workout(
        &self,
        credential: &Credential,
        id: &WorkoutId,
        draft: &WorkoutDraft,
    ) -> Result<Option<Workout>> {
        self.authorize(credential)?;
        self.record(format!("update:{}", id));
        self.check_failure("update workout")?;
        let mut workouts = self.workouts.lock().unwrap();
        let stored = workouts
            .iter_mut()
            .find(|w| &w.id == id)
            .ok_or_else(|| FitlogError::fetch("update workout", "Not Found"))?;
        stored.name = draft.name.clone();
        stored.duration = draft.duration.clone();
        if self.bare_update_acks.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(stored.clone()))
    }

    async fn delete_workout(&self, credential: &Credential, id: &WorkoutId) -> Result<()> {
        self.authorize(credential)?;
        self.record(format!("delete:{}", id));
        self.check_failure("delete workout")?;
        self.workouts.lock().unwrap().retain(|w| &w.id != id);
        Ok(())
    }

    async fn mark_workout_done(&self, credential: &Credential, id: &WorkoutId) -> Result<()> {
        self.authorize(credential)?;
        self.record(format!("done:{}", id));
        self.check_failure("update workout status")?;
        if let Some(stored) = self.workouts.lock().unwrap().iter_mut().find(|w| &w.id == id) {
            stored.completed = true;
        }
        Ok(())
    }
}
