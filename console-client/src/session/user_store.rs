use shared::models::UserInfo;
use std::sync::Arc;
use tokio::sync::watch;

/// Profile state of the current session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub userinfo: Option<UserInfo>,
    pub role: Option<String>,
}

/// Observable holder of [`UserState`]. Clones share the same state.
#[derive(Debug, Clone)]
pub struct UserStore {
    state: Arc<watch::Sender<UserState>>,
}

impl Default for UserStore {
    fn default() -> Self {
        let (state, _) = watch::channel(UserState::default());
        Self {
            state: Arc::new(state),
        }
    }
}

impl UserStore {
    /// Stores a profile. Without an explicit role the profile's own role is
    /// used, then `"user"`.
    pub fn set_user(&self, userinfo: UserInfo, role: Option<String>) {
        let role = role
            .filter(|role| !role.is_empty())
            .unwrap_or_else(|| userinfo.role_or_default().to_string());
        self.state.send_replace(UserState {
            userinfo: Some(userinfo),
            role: Some(role),
        });
    }

    pub fn clear(&self) {
        self.state.send_replace(UserState::default());
    }

    #[must_use]
    pub fn state(&self) -> UserState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn userinfo(&self) -> Option<UserInfo> {
        self.state.borrow().userinfo.clone()
    }

    #[must_use]
    pub fn role(&self) -> Option<String> {
        self.state.borrow().role.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UserState> {
        self.state.subscribe()
    }
}
