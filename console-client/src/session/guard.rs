//! Route guard: decides whether a protected route may render.

use super::{LOGIN_FALLBACK_URL_KEY, LOGIN_PATH, cookies::recover_token, is_public_path};
use crate::{ClientError, ConsoleClient};
use shared::models::{AuthToken, RefreshTokenResponse, UserInfo};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Result of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The route needs no session.
    Public,
    /// The session is confirmed; render the route.
    Authorized,
    /// Another check is running; render a loading state.
    Busy,
    /// No session could be established; the user was sent to the login page.
    Redirected,
}

impl GuardOutcome {
    /// Whether the guarded content may render.
    #[must_use]
    pub const fn may_render(self) -> bool {
        matches!(self, Self::Public | Self::Authorized)
    }
}

/// Confirms the session before protected content renders.
///
/// At most one check runs at a time; concurrent calls return
/// [`GuardOutcome::Busy`].
#[derive(Debug)]
pub struct AuthGuard {
    client: ConsoleClient,
    checking: AtomicBool,
}

struct CheckingFlag<'a>(&'a AtomicBool);

impl Drop for CheckingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AuthGuard {
    #[must_use]
    pub const fn new(client: ConsoleClient) -> Self {
        Self {
            client,
            checking: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_checking(&self) -> bool {
        self.checking.load(Ordering::Acquire)
    }

    /// Checks `path` and, when no session can be established, records the
    /// current location and navigates to the login page.
    pub async fn check(&self, path: &str) -> GuardOutcome {
        if is_public_path(path) {
            return GuardOutcome::Public;
        }

        let session = self.client.session();
        if session.auth().is_initialized() {
            return GuardOutcome::Authorized;
        }

        if self.checking.swap(true, Ordering::AcqRel) {
            debug!(%path, "auth check already running");
            return GuardOutcome::Busy;
        }
        let _flag = CheckingFlag(&self.checking);

        match self.establish().await {
            Ok(userinfo) => {
                session.auth().mark_initialized();
                let role = userinfo.role_or_default().to_string();
                info!(user = userinfo.display_name(), %role, "session confirmed");
                session.users().set_user(userinfo, Some(role));
                GuardOutcome::Authorized
            }
            Err(err) if session.auth().is_initialized() => {
                debug!(error = %err, "auth check failed after session was confirmed elsewhere");
                GuardOutcome::Authorized
            }
            Err(err) => {
                info!(error = %err, %path, "no session, redirecting to login");
                self.redirect_to_login();
                GuardOutcome::Redirected
            }
        }
    }

    async fn establish(&self) -> Result<UserInfo, ClientError> {
        let recovered = recover_token(self.client.platform().cookies.as_ref());
        if let Some(token) = &recovered {
            debug!(cookie = %token.cookie, "recovered token from cookie");
            self.client
                .session()
                .auth()
                .set_tokens(AuthToken::single(token.value.clone()));
        }

        match self.client.fetch_user_info().await {
            Ok(userinfo) => Ok(userinfo),
            Err(err) if recovered.is_none() => self.refresh_and_retry(err).await,
            Err(err) => Err(err),
        }
    }

    async fn refresh_and_retry(&self, original: ClientError) -> Result<UserInfo, ClientError> {
        match self.client.refresh_token().await {
            Ok(RefreshTokenResponse { token: Some(token) }) if !token.is_empty() => {
                debug!("token refreshed, retrying profile fetch");
                self.client
                    .session()
                    .auth()
                    .set_tokens(AuthToken::single(token));
                self.client.fetch_user_info().await
            }
            Ok(_) => {
                debug!("refresh returned no token");
                Err(original)
            }
            Err(err) => {
                debug!(error = %err, "token refresh failed");
                Err(original)
            }
        }
    }

    fn redirect_to_login(&self) {
        let platform = self.client.platform();
        let href = platform.navigator.current_href();
        if let Err(err) = platform.storage.set(LOGIN_FALLBACK_URL_KEY, &href) {
            warn!(error = %err, "could not remember the page to return to");
        }
        platform.navigator.navigate(LOGIN_PATH);
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;
