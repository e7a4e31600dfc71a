// State management module.
// Route guarding, form state and the Login/Register/Workouts controllers.

pub mod form;
pub mod login;
pub mod navigation;
pub mod register;
pub mod validation;
pub mod workouts;

pub use form::Form;
pub use login::LoginController;
pub use navigation::Route;
pub use register::RegisterController;
pub use workouts::{
    EditDraft, MountAction, PendingRequest, WorkoutOutcome, WorkoutsController, WorkoutsFocus,
    WorkoutsPhase, execute,
};
