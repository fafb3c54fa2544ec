//! Session state shared by the API client, the auth guard and the UI.

use shared::models::LoginResponse;
use tracing::info;

pub mod auth_store;
pub mod cookies;
pub mod guard;
pub mod user_store;

pub use auth_store::{AuthState, AuthStore};
pub use user_store::{UserState, UserStore};

/// Route of the login page.
pub const LOGIN_PATH: &str = "/login";

/// Storage key holding the URL to return to after signing in.
pub const LOGIN_FALLBACK_URL_KEY: &str = "LOGIN_FALLBACK_URL";

/// Routes reachable without a session.
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    path == LOGIN_PATH || path == "/register" || path.starts_with("/auth/callback")
}

/// Token and profile stores of the current session. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    auth: AuthStore,
    users: UserStore,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthStore {
        &self.auth
    }

    #[must_use]
    pub const fn users(&self) -> &UserStore {
        &self.users
    }

    /// Forgets the profile, then the tokens.
    pub fn clear_local(&self) {
        self.users.clear();
        self.auth.clear_tokens();
        info!("local session cleared");
    }

    /// Records a successful login.
    pub fn confirm(&self, login: &LoginResponse) {
        self.auth.set_tokens(login.token.clone());
        self.auth.mark_initialized();
        self.users
            .set_user(login.userinfo.clone(), login.role.clone());
        info!(user = login.userinfo.display_name(), "session established");
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        let state = self.auth.state();
        state.initialized && state.access_token.is_some()
    }

    #[must_use]
    pub fn auth_token(&self) -> Option<String> {
        self.auth.access_token()
    }
}
