//! Process-wide session state.
//!
//! [`SessionState`] holds the "is authenticated" flag. It is computed once
//! from the credential store at construction and afterwards changes only on
//! explicit login, logout or forced logout.
//!
//! Logging out clears the credential store before the flag flips, so no
//! observer can see "logged out" while a stale token is still readable.

use super::credentials::CredentialStore;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

const EVENT_CAPACITY: usize = 16;

/// Session-wide events that a UI routes on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A credential refresh failed and the session was ended. The UI should
    /// return to the login surface.
    ForcedLogout {
        /// Message of the failed refresh.
        reason: String,
    },
}

/// Observable authentication flag backed by a credential store.
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct SessionState {
    store: Arc<dyn CredentialStore>,
    flag: Arc<watch::Sender<bool>>,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("authenticated", &*self.flag.borrow())
            .field("event_subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl SessionState {
    /// Create a session, deriving the initial flag from the store: the
    /// session starts authenticated iff the store holds a complete pair.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let authenticated = store.load().is_some();
        tracing::debug!(authenticated, "session state initialised");
        let (flag, _rx) = watch::channel(authenticated);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            flag: Arc::new(flag),
            events,
        }
    }

    /// The credential store this session clears on logout.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Snapshot of the flag.
    pub fn is_authenticated(&self) -> bool {
        *self.flag.borrow()
    }

    /// Observe the flag. The receiver is notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }

    /// Observe session events such as forced logout.
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Mark the session authenticated. Credentials must already be saved.
    pub fn set_logged_in(&self) {
        tracing::info!("session logged in");
        self.set_flag(true);
    }

    /// Clear the credential store, then mark the session logged out.
    ///
    /// A store that fails to clear is logged; the flag is flipped regardless
    /// so the user is never stuck in a session they asked to leave.
    pub fn set_logged_out(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!("failed to clear credentials on logout: {}", e);
        }
        tracing::info!("session logged out");
        self.set_flag(false);
    }

    /// End the session after a failed refresh and emit exactly one
    /// [`SessionEvent::ForcedLogout`].
    pub fn force_logout(&self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(%reason, "forcing logout");
        self.set_logged_out();
        // no subscribers is fine
        let _ = self.events.send(SessionEvent::ForcedLogout { reason });
    }

    fn set_flag(&self, value: bool) {
        self.flag.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::credentials::{CredentialPair, InMemoryCredentialStore};

    fn logged_in_store() -> Arc<dyn CredentialStore> {
        Arc::new(InMemoryCredentialStore::with_credentials(
            CredentialPair::new("acc", "ref"),
        ))
    }

    #[test]
    fn initial_flag_follows_store() {
        assert!(SessionState::new(logged_in_store()).is_authenticated());
        assert!(!SessionState::new(Arc::new(InMemoryCredentialStore::new())).is_authenticated());
    }

    #[test]
    fn initial_flag_ignores_half_pair() {
        let store = InMemoryCredentialStore::new();
        store.save(&CredentialPair::new("", "ref")).unwrap();
        assert!(!SessionState::new(Arc::new(store)).is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_store_then_notifies() {
        let session = SessionState::new(logged_in_store());
        let mut rx = session.subscribe();

        session.set_logged_out();

        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());
        assert!(session.store().access_token().is_none());
        assert!(session.store().refresh_token().is_none());
    }

    #[tokio::test]
    async fn login_notifies_true() {
        let session = SessionState::new(Arc::new(InMemoryCredentialStore::new()));
        let mut rx = session.subscribe();

        session.store().save(&CredentialPair::new("a", "r")).unwrap();
        session.set_logged_in();

        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn repeated_logout_does_not_renotify() {
        let session = SessionState::new(logged_in_store());
        let mut rx = session.subscribe();
        session.set_logged_out();
        rx.changed().await.unwrap();
        rx.borrow_and_update();

        session.set_logged_out();
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn force_logout_emits_one_event() {
        let session = SessionState::new(logged_in_store());
        let mut events = session.subscribe_events();

        session.force_logout("Refresh token revoked");

        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::ForcedLogout {
                reason: "Refresh token revoked".to_string()
            }
        );
        assert!(events.try_recv().is_err());
        assert!(!session.is_authenticated());
        assert!(session.store().load().is_none());
    }
}
