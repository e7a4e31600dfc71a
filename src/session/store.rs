// Session store.
// Single source of truth for "who is logged in", written through to storage and
// observable through explicit subscriptions.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::Result;

use super::credential::{Credential, decode_credential};
use super::SessionStorage;

/// Storage key holding the serialized credential.
pub const SESSION_KEY: &str = "user";

/// Change notification delivered to subscribers. Always carries the full new value.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LoggedIn(Credential),
    Replaced(Credential),
    LoggedOut,
}

/// A change to persisted storage made outside this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// New raw value, or `None` when the key was removed.
    pub new_value: Option<String>,
}

pub type SubscriptionId = u64;

/// Receiving end of a session subscription.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    receiver: mpsc::UnboundedReceiver<SessionEvent>,
}

impl Subscription {
    /// Next pending event, without waiting.
    pub fn try_next(&mut self) -> Option<SessionEvent> {
        self.receiver.try_recv().ok()
    }
}

pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    current: Option<Credential>,
    subscribers: Vec<(SubscriptionId, mpsc::UnboundedSender<SessionEvent>)>,
    next_id: SubscriptionId,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.current.is_some())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl SessionStore {
    /// Open the store, reading the persisted credential once.
    /// Unreadable or corrupt data starts the store logged out.
    pub fn open(storage: impl SessionStorage + 'static) -> Self {
        let current = match storage.get(SESSION_KEY) {
            Ok(Some(raw)) => match decode_credential(&raw) {
                Ok(credential) => Some(credential),
                Err(e) => {
                    warn!("ignoring stored session: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("could not read stored session: {}", e);
                None
            }
        };

        Self {
            storage: Box::new(storage),
            current,
            subscribers: Vec::new(),
            next_id: 1,
        }
    }

    pub fn current(&self) -> Option<&Credential> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// File holding the persisted credential, if storage is on disk.
    pub fn storage_location(&self) -> Option<PathBuf> {
        self.storage.location(SESSION_KEY)
    }

    /// Persist `credential` and make it the active session, replacing any prior one.
    pub fn login(&mut self, credential: Credential) -> Result<()> {
        self.storage.set(SESSION_KEY, &credential.encode()?)?;

        let event = if self.current.is_some() {
            SessionEvent::Replaced(credential.clone())
        } else {
            SessionEvent::LoggedIn(credential.clone())
        };
        self.current = Some(credential);
        info!("session started");
        self.notify(event);
        Ok(())
    }

    /// Clear the in-memory session and remove the persisted one.
    /// Memory is cleared even if removing the file fails.
    pub fn logout(&mut self) -> Result<()> {
        let was_authenticated = self.current.take().is_some();
        if was_authenticated {
            info!("session ended");
            self.notify(SessionEvent::LoggedOut);
        }
        self.storage.remove(SESSION_KEY)
    }

    /// Apply a storage change made elsewhere. The value replaces the session in full;
    /// a removal or an unparseable value logs the session out. Nothing is written back.
    /// Returns whether the in-memory session changed.
    pub fn apply_storage_event(&mut self, event: &StorageEvent) -> bool {
        if event.key != SESSION_KEY {
            return false;
        }

        let incoming = match event.new_value.as_deref() {
            None => None,
            Some(raw) => match decode_credential(raw) {
                Ok(credential) => Some(credential),
                Err(e) => {
                    warn!("treating external session change as logout: {}", e);
                    None
                }
            },
        };

        if incoming == self.current {
            return false;
        }

        let event = match (&self.current, &incoming) {
            (_, None) => SessionEvent::LoggedOut,
            (None, Some(credential)) => SessionEvent::LoggedIn(credential.clone()),
            (Some(_), Some(credential)) => SessionEvent::Replaced(credential.clone()),
        };
        info!("session changed by another process");
        self.current = incoming;
        self.notify(event);
        true
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, sender));
        Subscription { id, receiver }
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Deliver an event, dropping subscribers whose receiver is gone.
    fn notify(&mut self, event: SessionEvent) {
        self.subscribers
            .retain(|(_, sender)| sender.send(event.clone()).is_ok());
    }
}
