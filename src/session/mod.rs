// Session module.
// Holds the authentication credential, persists it, and keeps it in step with other processes.

pub mod credential;
pub mod paths;
pub mod storage;
pub mod store;
pub mod watcher;

pub use credential::Credential;
pub use storage::FileStorage;
#[cfg(test)]
pub use storage::MemoryStorage;
pub use storage::SessionStorage;
pub use store::{SESSION_KEY, SessionEvent, SessionStore, Subscription};
pub use watcher::StorageWatcher;
