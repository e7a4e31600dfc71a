// Navigation routes.
// The three views and the redirects that keep them consistent with the session.

/// A top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Login,
    Register,
    Workouts,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Workouts => "/workouts",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Workouts => "Workouts",
        }
    }

    /// Where a request for this route actually lands. Workouts need a session;
    /// the login form is skipped when one exists.
    pub fn guard(self, authenticated: bool) -> Route {
        match (self, authenticated) {
            (Route::Workouts, false) => Route::Login,
            (Route::Login, true) => Route::Workouts,
            (route, _) => route,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_redirects() {
        assert_eq!(Route::Workouts.guard(false), Route::Login);
        assert_eq!(Route::Workouts.guard(true), Route::Workouts);
        assert_eq!(Route::Login.guard(true), Route::Workouts);
        assert_eq!(Route::Login.guard(false), Route::Login);
        assert_eq!(Route::Register.guard(false), Route::Register);
        assert_eq!(Route::Register.guard(true), Route::Register);
    }

    #[test]
    fn test_paths_and_titles() {
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Register.path(), "/register");
        assert_eq!(Route::Workouts.path(), "/workouts");
        assert_eq!(Route::Workouts.title(), "Workouts");
    }
}
