// Workouts view controller.
// Owns the client-side copy of the user's workouts and keeps it consistent with
// what the server acknowledges.

use ratatui::widgets::TableState;
use tracing::{debug, info, warn};

use crate::api::{Workout, WorkoutApi, WorkoutDraft, WorkoutId};
use crate::error::Result;
use crate::session::{Credential, SessionStore};

use super::form::{Field, Form};
use super::navigation::Route;
use super::validation::validate_draft;

/// Lifecycle of the view. The workout list lives beside the phase so that a
/// failure never discards the last known list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkoutsPhase {
    /// No session; the view has redirected to login and is inert.
    Unauthenticated,
    Loading,
    Ready,
    Error(String),
}

/// A request the view wants sent.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutCommand {
    List,
    Add(WorkoutDraft),
    Update(WorkoutId, WorkoutDraft),
    Delete(WorkoutId),
    MarkDone(WorkoutId),
}

/// What the server acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutOutcome {
    Listed(Vec<Workout>),
    Added(Workout),
    Updated(Workout),
    /// Update acknowledged without the stored entity; only the edited fields are known.
    Edited(WorkoutId, WorkoutDraft),
    Deleted(WorkoutId),
    MarkedDone(WorkoutId),
}

/// Command bound to the credential it must be sent with.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub credential: Credential,
    pub command: WorkoutCommand,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MountAction {
    Redirect(Route),
    Fetch(PendingRequest),
}

/// Which part of the view receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkoutsFocus {
    #[default]
    Table,
    AddForm,
}

/// Edit modal state for one workout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: WorkoutId,
    pub form: Form,
}

impl EditDraft {
    pub fn from_workout(workout: &Workout) -> Self {
        let mut form = draft_form();
        form.set_value(0, workout.name.clone());
        form.set_value(1, workout.duration.clone());
        Self {
            id: workout.id.clone(),
            form,
        }
    }
}

fn draft_form() -> Form {
    Form::new(vec![Field::text("Workout Name"), Field::text("Duration")])
}

/// Send one command and translate the reply into an outcome.
pub async fn execute<A>(
    api: &A,
    credential: &Credential,
    command: WorkoutCommand,
) -> Result<WorkoutOutcome>
where
    A: WorkoutApi + ?Sized,
{
    debug!(?command, "executing workout command");
    match command {
        WorkoutCommand::List => api.list_workouts(credential).await.map(WorkoutOutcome::Listed),
        WorkoutCommand::Add(draft) => api
            .add_workout(credential, &draft)
            .await
            .map(WorkoutOutcome::Added),
        WorkoutCommand::Update(id, draft) => {
            let outcome = match api.update_workout(credential, &id, &draft).await? {
                Some(workout) => WorkoutOutcome::Updated(workout),
                None => WorkoutOutcome::Edited(id, draft),
            };
            Ok(outcome)
        }
        WorkoutCommand::Delete(id) => {
            api.delete_workout(credential, &id).await?;
            Ok(WorkoutOutcome::Deleted(id))
        }
        WorkoutCommand::MarkDone(id) => {
            api.mark_workout_done(credential, &id).await?;
            Ok(WorkoutOutcome::MarkedDone(id))
        }
    }
}

const MSG_INVALID_TOKEN: &str = "Invalid token. Please log in again.";

#[derive(Debug, Clone)]
pub struct WorkoutsController {
    phase: WorkoutsPhase,
    workouts: Vec<Workout>,
    credential: Option<Credential>,
    email: Option<String>,
    /// Shown when nothing has gone wrong with a request, e.g. an unreadable token.
    notice: Option<String>,
    in_flight: bool,
    pub new_workout: Form,
    pub edit: Option<EditDraft>,
    pub focus: WorkoutsFocus,
    pub table_state: TableState,
}

impl Default for WorkoutsController {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutsController {
    pub fn new() -> Self {
        Self {
            phase: WorkoutsPhase::Loading,
            workouts: Vec::new(),
            credential: None,
            email: None,
            notice: None,
            in_flight: false,
            new_workout: draft_form(),
            edit: None,
            focus: WorkoutsFocus::default(),
            table_state: TableState::default(),
        }
    }

    pub fn phase(&self) -> &WorkoutsPhase {
        &self.phase
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            WorkoutsPhase::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or("User")
    }

    /// Enter the view. Without a session the view goes inert and asks for the
    /// login route; otherwise it starts loading the list.
    pub fn mount(&mut self, session: &SessionStore) -> MountAction {
        let Some(credential) = session.current().cloned() else {
            self.phase = WorkoutsPhase::Unauthenticated;
            return MountAction::Redirect(Route::Login);
        };

        self.email = credential.email();
        if self.email.is_none() {
            warn!("could not read the email claim from the session token");
            self.notice = Some(MSG_INVALID_TOKEN.to_string());
        }
        self.credential = Some(credential.clone());
        self.phase = WorkoutsPhase::Loading;
        self.in_flight = true;
        MountAction::Fetch(PendingRequest {
            credential,
            command: WorkoutCommand::List,
        })
    }

    /// Queue a command. `None` while another request is outstanding, when the
    /// view has no session, or when the draft fails validation.
    pub fn dispatch(&mut self, command: WorkoutCommand) -> Option<PendingRequest> {
        if self.in_flight || self.phase == WorkoutsPhase::Unauthenticated {
            return None;
        }
        let credential = self.credential.clone()?;

        if command == WorkoutCommand::List {
            self.phase = WorkoutsPhase::Loading;
        }
        self.in_flight = true;
        Some(PendingRequest {
            credential,
            command,
        })
    }

    pub fn refresh(&mut self) -> Option<PendingRequest> {
        self.dispatch(WorkoutCommand::List)
    }

    /// Submit the add form.
    pub fn submit_new(&mut self) -> Option<PendingRequest> {
        if self.in_flight {
            return None;
        }
        match validate_draft(self.new_workout.value(0), self.new_workout.value(1)) {
            Ok(draft) => self.dispatch(WorkoutCommand::Add(draft)),
            Err(e) => {
                self.phase = WorkoutsPhase::Error(e.to_string());
                None
            }
        }
    }

    /// Open the edit modal for the selected workout.
    pub fn begin_edit(&mut self) -> bool {
        match self.selected_workout() {
            Some(workout) => {
                self.edit = Some(EditDraft::from_workout(workout));
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Submit the edit modal.
    pub fn submit_edit(&mut self) -> Option<PendingRequest> {
        if self.in_flight {
            return None;
        }
        let edit = self.edit.as_ref()?;
        match validate_draft(edit.form.value(0), edit.form.value(1)) {
            Ok(draft) => {
                let id = edit.id.clone();
                self.dispatch(WorkoutCommand::Update(id, draft))
            }
            Err(e) => {
                self.phase = WorkoutsPhase::Error(e.to_string());
                None
            }
        }
    }

    pub fn delete_selected(&mut self) -> Option<PendingRequest> {
        let id = self.selected_workout()?.id.clone();
        self.dispatch(WorkoutCommand::Delete(id))
    }

    /// Mark the selected workout done. Already-completed workouts have no
    /// active control, so nothing is sent for them.
    pub fn mark_selected_done(&mut self) -> Option<PendingRequest> {
        let workout = self.selected_workout()?;
        if workout.completed {
            return None;
        }
        let id = workout.id.clone();
        self.dispatch(WorkoutCommand::MarkDone(id))
    }

    /// Apply a server reply. Success patches the list with exactly what the server
    /// acknowledged; failure keeps the list and any drafts and shows the message.
    pub fn complete(&mut self, result: Result<WorkoutOutcome>) {
        self.in_flight = false;
        if self.phase == WorkoutsPhase::Unauthenticated {
            return;
        }

        match result {
            Ok(outcome) => {
                self.apply(outcome);
                self.phase = WorkoutsPhase::Ready;
            }
            Err(e) => {
                warn!("workout request failed: {}", e);
                self.phase = WorkoutsPhase::Error(e.to_string());
            }
        }
        self.clamp_selection();
    }

    fn apply(&mut self, outcome: WorkoutOutcome) {
        match outcome {
            WorkoutOutcome::Listed(workouts) => {
                info!(count = workouts.len(), "workouts loaded");
                self.workouts = workouts;
            }
            WorkoutOutcome::Added(workout) => {
                self.upsert(workout);
                self.new_workout.clear();
                self.focus = WorkoutsFocus::Table;
            }
            WorkoutOutcome::Updated(workout) => {
                self.upsert(workout);
                self.edit = None;
            }
            WorkoutOutcome::Edited(id, draft) => {
                if let Some(workout) = self.workouts.iter_mut().find(|w| w.id == id) {
                    workout.name = draft.name;
                    workout.duration = draft.duration;
                }
                self.edit = None;
            }
            WorkoutOutcome::Deleted(id) => {
                self.workouts.retain(|w| w.id != id);
            }
            WorkoutOutcome::MarkedDone(id) => {
                if let Some(workout) = self.workouts.iter_mut().find(|w| w.id == id) {
                    workout.completed = true;
                }
            }
        }
    }

    /// Replace the entry with the same id, or append.
    fn upsert(&mut self, workout: Workout) {
        match self.workouts.iter_mut().find(|w| w.id == workout.id) {
            Some(existing) => *existing = workout,
            None => self.workouts.push(workout),
        }
    }

    /// Clear the session; the view goes inert. The in-memory session is gone even
    /// when the error reports that the stored copy could not be removed.
    pub fn logout(&mut self, session: &mut SessionStore) -> Result<()> {
        self.credential = None;
        self.phase = WorkoutsPhase::Unauthenticated;
        session.logout().inspect_err(|e| {
            warn!("could not remove stored session: {}", e);
        })
    }

    /// Send a request and apply the reply in place.
    #[cfg(test)]
    pub async fn perform<A>(&mut self, api: &A, request: PendingRequest)
    where
        A: WorkoutApi + ?Sized,
    {
        let result = execute(api, &request.credential, request.command).await;
        self.complete(result);
    }

    /// Mount and, if there is a session, load the list.
    #[cfg(test)]
    pub async fn load<A>(&mut self, api: &A, session: &SessionStore) -> Option<Route>
    where
        A: WorkoutApi + ?Sized,
    {
        match self.mount(session) {
            MountAction::Redirect(route) => Some(route),
            MountAction::Fetch(request) => {
                self.perform(api, request).await;
                None
            }
        }
    }

    pub fn selected_workout(&self) -> Option<&Workout> {
        self.workouts.get(self.table_state.selected()?)
    }

    pub fn select_next(&mut self) {
        if self.workouts.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i >= self.workouts.len() - 1 => i,
            Some(i) => i + 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn select_prev(&mut self) {
        if self.workouts.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn clamp_selection(&mut self) {
        if self.workouts.is_empty() {
            self.table_state.select(None);
        } else {
            let last = self.workouts.len() - 1;
            let i = self.table_state.selected().map_or(0, |i| i.min(last));
            self.table_state.select(Some(i));
        }
    }
}
