use shared::models::AuthToken;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Token state of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Set once the session has been confirmed against the backend.
    pub initialized: bool,
}

impl AuthState {
    /// The stored pair, when both halves are present.
    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        Some(AuthToken {
            access_token: self.access_token.clone()?,
            refresh_token: self.refresh_token.clone()?,
        })
    }
}

/// Observable holder of [`AuthState`]. Clones share the same state.
#[derive(Debug, Clone)]
pub struct AuthStore {
    state: Arc<watch::Sender<AuthState>>,
}

impl Default for AuthStore {
    fn default() -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            state: Arc::new(state),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

impl AuthStore {
    /// Stores a token pair. Empty halves are treated as missing.
    pub fn set_tokens(&self, token: AuthToken) {
        debug!("storing session tokens");
        self.state.send_modify(|state| {
            state.access_token = non_empty(token.access_token);
            state.refresh_token = non_empty(token.refresh_token);
        });
    }

    /// Drops both tokens and the initialized flag.
    pub fn clear_tokens(&self) {
        self.state.send_replace(AuthState::default());
    }

    pub fn mark_initialized(&self) {
        self.state.send_if_modified(|state| {
            let changed = !state.initialized;
            state.initialized = true;
            changed
        });
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token.clone()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    /// Receiver notified on every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
