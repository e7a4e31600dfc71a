// App state and main event loop.
// Owns the current screen, the session and background requests; routes key input.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::api::{RegisterConfirmation, WorkoutApi};
use crate::error::Result;
use crate::session::{
    Credential, SESSION_KEY, SessionEvent, SessionStore, StorageWatcher, Subscription,
};
use crate::state::{
    LoginController, MountAction, PendingRequest, RegisterController, Route, WorkoutOutcome,
    WorkoutsController, WorkoutsFocus, execute,
};
use crate::ui;

/// The view currently on screen, with its controller.
pub enum Screen {
    Login(LoginController),
    Register(RegisterController),
    Workouts(WorkoutsController),
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Screen::Login(_) => Route::Login,
            Screen::Register(_) => Route::Register,
            Screen::Workouts(_) => Route::Workouts,
        }
    }
}

/// Reply from a background request.
enum TaskResult {
    Login(Result<Credential>),
    Register(Result<RegisterConfirmation>),
    Workouts(Result<WorkoutOutcome>),
}

/// A reply tagged with the screen instance that asked for it.
struct TaskMessage {
    epoch: u64,
    result: TaskResult,
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub session: SessionStore,
    api: Arc<dyn WorkoutApi>,
    watcher: Option<StorageWatcher>,
    session_events: Subscription,
    sender: mpsc::UnboundedSender<TaskMessage>,
    receiver: mpsc::UnboundedReceiver<TaskMessage>,
    /// Bumped on every navigation; replies from older screens are dropped.
    epoch: u64,
    tasks: Vec<AbortHandle>,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    pub fn new(api: Arc<dyn WorkoutApi>, mut session: SessionStore, sync_interval: Duration) -> Self {
        let watcher = session
            .storage_location()
            .map(|path| StorageWatcher::new(SESSION_KEY, path, sync_interval));
        let session_events = session.subscribe();
        let (sender, receiver) = mpsc::unbounded_channel();

        let mut app = Self {
            screen: Screen::Login(LoginController::new()),
            session,
            api,
            watcher,
            session_events,
            sender,
            receiver,
            epoch: 0,
            tasks: Vec::new(),
            should_quit: false,
        };
        app.navigate(Route::Workouts);
        app
    }

    pub fn route(&self) -> Route {
        self.screen.route()
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.tick();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        self.abort_tasks();
        self.session.unsubscribe(self.session_events.id);
        Ok(())
    }

    /// Apply everything that happened since the last frame: request replies,
    /// session changes from other processes, and the resulting redirects.
    pub fn tick(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            self.apply_task_message(message);
        }

        if let Some(watcher) = &mut self.watcher {
            match watcher.poll_if_due(Instant::now()) {
                Ok(Some(event)) => {
                    self.session.apply_storage_event(&event);
                }
                Ok(None) => {}
                Err(e) => warn!("could not check session file: {}", e),
            }
        }

        while let Some(event) = self.session_events.try_next() {
            self.on_session_event(event);
        }
    }

    /// Switch screens. The requested route is passed through the session guard,
    /// and any request still running for the old screen is abandoned.
    pub fn navigate(&mut self, route: Route) {
        let route = route.guard(self.session.is_authenticated());
        self.abort_tasks();
        self.epoch += 1;
        info!(path = route.path(), "navigate");

        match route {
            Route::Login => self.screen = Screen::Login(LoginController::new()),
            Route::Register => self.screen = Screen::Register(RegisterController::new()),
            Route::Workouts => {
                let mut workouts = WorkoutsController::new();
                let action = workouts.mount(&self.session);
                self.screen = Screen::Workouts(workouts);
                match action {
                    MountAction::Redirect(next) => self.navigate(next),
                    MountAction::Fetch(request) => self.spawn_workouts(request),
                }
            }
        }
    }

    fn on_session_event(&mut self, event: SessionEvent) {
        match &event {
            SessionEvent::LoggedIn(credential) | SessionEvent::Replaced(credential) => {
                debug!(email = ?credential.email(), "session event");
            }
            SessionEvent::LoggedOut => debug!("session event: logged out"),
        }

        match (&event, self.route()) {
            // Another process switched accounts under us: reload for the new user.
            (SessionEvent::Replaced(_), Route::Workouts) => self.navigate(Route::Workouts),
            _ => {
                let current = self.route();
                if current.guard(self.session.is_authenticated()) != current {
                    self.navigate(current);
                }
            }
        }
    }

    #[allow(clippy::collapsible_if)]
    fn apply_task_message(&mut self, message: TaskMessage) {
        if message.epoch != self.epoch {
            debug!("dropping reply for a closed screen");
            return;
        }

        match message.result {
            TaskResult::Login(result) => {
                let Screen::Login(login) = &mut self.screen else {
                    return;
                };
                if let Some(route) = login.complete(result, &mut self.session) {
                    self.resync_watcher();
                    self.navigate(route);
                }
            }
            TaskResult::Register(result) => {
                let Screen::Register(register) = &mut self.screen else {
                    return;
                };
                if register.complete(result) != Some(Route::Login) {
                    return;
                }
                let notice = register.take_confirmation();
                self.navigate(Route::Login);
                if let Some(notice) = notice {
                    if self.route() == Route::Login {
                        self.screen = Screen::Login(LoginController::with_notice(notice));
                    }
                }
            }
            TaskResult::Workouts(result) => {
                if let Screen::Workouts(workouts) = &mut self.screen {
                    workouts.complete(result);
                }
            }
        }
    }

    fn spawn_login(&mut self) {
        let Screen::Login(login) = &mut self.screen else {
            return;
        };
        let Some(request) = login.begin() else {
            return;
        };
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            TaskResult::Login(api.login(&request.email, &request.password).await)
        });
    }

    fn spawn_register(&mut self) {
        let Screen::Register(register) = &mut self.screen else {
            return;
        };
        let Some(request) = register.begin() else {
            return;
        };
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            TaskResult::Register(api.register(&request.email, &request.password).await)
        });
    }

    fn spawn_workouts(&mut self, request: PendingRequest) {
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            TaskResult::Workouts(execute(api.as_ref(), &request.credential, request.command).await)
        });
    }

    fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        let sender = self.sender.clone();
        let epoch = self.epoch;
        let handle = tokio::spawn(async move {
            let result = future.await;
            // The receiver only goes away when the app is shutting down.
            let _ = sender.send(TaskMessage { epoch, result });
        });
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(handle.abort_handle());
    }

    fn abort_tasks(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    fn resync_watcher(&mut self) {
        if let Some(watcher) = &mut self.watcher {
            watcher.resync();
        }
    }

    fn logout(&mut self) {
        let Screen::Workouts(workouts) = &mut self.screen else {
            return;
        };
        let result = workouts.logout(&mut self.session);
        self.resync_watcher();
        self.navigate(Route::Login);
        if let Err(e) = result {
            self.screen = Screen::Login(LoginController::with_error(format!(
                "Logged out, but the saved session could not be removed: {}",
                e
            )));
        }
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }

        match self.route() {
            Route::Login => self.handle_login_key(key, ctrl),
            Route::Register => self.handle_register_key(key, ctrl),
            Route::Workouts => self.handle_workouts_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent, ctrl: bool) {
        if ctrl && key.code == KeyCode::Char('r') {
            self.navigate(Route::Register);
            return;
        }
        let Screen::Login(login) = &mut self.screen else {
            return;
        };
        match key.code {
            KeyCode::Enter => self.spawn_login(),
            KeyCode::Tab | KeyCode::Down => login.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => login.form.focus_prev(),
            KeyCode::Backspace => login.form.backspace(),
            KeyCode::Char(c) if !ctrl => login.form.input(c),
            _ => {}
        }
    }

    fn handle_register_key(&mut self, key: KeyEvent, ctrl: bool) {
        if ctrl && key.code == KeyCode::Char('l') {
            self.navigate(Route::Login);
            return;
        }
        let Screen::Register(register) = &mut self.screen else {
            return;
        };
        match key.code {
            KeyCode::Enter => self.spawn_register(),
            KeyCode::Tab | KeyCode::Down => register.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => register.form.focus_prev(),
            KeyCode::Backspace => register.form.backspace(),
            KeyCode::Char(c) if !ctrl => register.form.input(c),
            _ => {}
        }
    }

    fn handle_workouts_key(&mut self, key: KeyEvent) {
        let Screen::Workouts(workouts) = &mut self.screen else {
            return;
        };

        // Edit modal captures all input while open
        if let Some(edit) = &mut workouts.edit {
            let request = match key.code {
                KeyCode::Esc => {
                    workouts.cancel_edit();
                    None
                }
                KeyCode::Enter => workouts.submit_edit(),
                KeyCode::Tab | KeyCode::Down => {
                    edit.form.focus_next();
                    None
                }
                KeyCode::BackTab | KeyCode::Up => {
                    edit.form.focus_prev();
                    None
                }
                KeyCode::Backspace => {
                    edit.form.backspace();
                    None
                }
                KeyCode::Char(c) => {
                    edit.form.input(c);
                    None
                }
                _ => None,
            };
            if let Some(request) = request {
                self.spawn_workouts(request);
            }
            return;
        }

        if workouts.focus == WorkoutsFocus::AddForm {
            let request = match key.code {
                KeyCode::Esc => {
                    workouts.focus = WorkoutsFocus::Table;
                    None
                }
                KeyCode::Enter => workouts.submit_new(),
                KeyCode::Tab | KeyCode::Down => {
                    workouts.new_workout.focus_next();
                    None
                }
                KeyCode::BackTab | KeyCode::Up => {
                    workouts.new_workout.focus_prev();
                    None
                }
                KeyCode::Backspace => {
                    workouts.new_workout.backspace();
                    None
                }
                KeyCode::Char(c) => {
                    workouts.new_workout.input(c);
                    None
                }
                _ => None,
            };
            if let Some(request) = request {
                self.spawn_workouts(request);
            }
            return;
        }

        let request = match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('o') => {
                self.logout();
                return;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                workouts.select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                workouts.select_next();
                None
            }
            KeyCode::Char('a') | KeyCode::Tab => {
                workouts.focus = WorkoutsFocus::AddForm;
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                workouts.begin_edit();
                None
            }
            KeyCode::Char('d') => workouts.mark_selected_done(),
            KeyCode::Char('x') | KeyCode::Delete => workouts.delete_selected(),
            KeyCode::Char('r') => workouts.refresh(),
            _ => None,
        };
        if let Some(request) = request {
            self.spawn_workouts(request);
        }
    }
}
