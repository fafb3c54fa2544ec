//! HTTP client for the Console backend.
//!
//! Every backend response is a `{code, detail | data, errMsg}` envelope. The
//! verbs on [`ConsoleClient`] unwrap it, clear the session on the codes that
//! say it is no longer valid and surface every other failure to the user
//! unless the call asks for silence.

use crate::{
    error::ClientError,
    platform::Platform,
    session::{LOGIN_PATH, Session, is_public_path},
};
use reqwest::{Client, RequestBuilder, StatusCode, multipart::Form};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use shared::{config::ClientConfig, models::Envelope};
use tracing::{debug, warn};
use url::Url;

pub mod auth;
pub mod dedupe;
pub mod issue;
pub mod system;
pub mod user;

mod transport;

use dedupe::Dedupe;

/// Envelope codes meaning the session is no longer accepted.
pub const SESSION_INVALID_CODES: [i64; 3] = [4401, 4403, 4406];

/// Envelope code for a missing token; expected on public routes.
pub const TOKEN_MISSING_CODE: i64 = 4405;

/// Messages that are expected on public routes and not worth a warning.
const PUBLIC_ROUTE_NOISE: [&str; 2] = ["Token cannot be empty", "Invalid token"];

/// Per-call options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Suppress the error notification for ordinary envelope failures.
    pub silence: bool,
}

impl RequestOptions {
    pub const SILENT: Self = Self { silence: true };
}

/// Session-aware API client. Cheap to clone; clones share the session,
/// the cookie jar and the in-flight request cache.
#[derive(Debug, Clone)]
pub struct ConsoleClient {
    base_url: String,
    client: Client,
    callback_client: Client,
    version_client: Client,
    version_url: Url,
    session: Session,
    platform: Platform,
    pending: Dedupe<Result<Value, ClientError>>,
    dev_mode: bool,
}

impl ConsoleClient {
    /// Creates a client with a fresh cookie jar.
    ///
    /// # Errors
    /// Returns an error if the configured URLs are malformed or the HTTP
    /// client cannot be built.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(
        config: &ClientConfig,
        session: Session,
        platform: Platform,
    ) -> Result<Self, ClientError> {
        Self::with_cookie_jar(config, session, platform, std::sync::Arc::default())
    }

    /// Creates a client that stores cookies in `jar`.
    ///
    /// # Errors
    /// Returns an error if the configured URLs are malformed or the HTTP
    /// client cannot be built.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_cookie_jar(
        config: &ClientConfig,
        session: Session,
        platform: Platform,
        jar: std::sync::Arc<reqwest::cookie::Jar>,
    ) -> Result<Self, ClientError> {
        let clients = transport::HttpClients::native(config, jar)?;
        Self::assemble(config, session, platform, clients)
    }

    /// Creates a client that relies on the browser's cookie store.
    ///
    /// # Errors
    /// Returns an error if the configured URLs are malformed.
    #[cfg(target_arch = "wasm32")]
    pub fn new(
        config: &ClientConfig,
        session: Session,
        platform: Platform,
    ) -> Result<Self, ClientError> {
        Self::assemble(config, session, platform, transport::HttpClients::browser())
    }

    fn assemble(
        config: &ClientConfig,
        session: Session,
        platform: Platform,
        clients: transport::HttpClients,
    ) -> Result<Self, ClientError> {
        let base_url = config.resolved_api_base()?;
        let version_url = config.version_url()?;
        debug!(%base_url, "API client ready");
        Ok(Self {
            base_url,
            client: clients.api,
            callback_client: clients.callback,
            version_client: clients.version,
            version_url,
            session,
            platform,
            pending: Dedupe::default(),
            dev_mode: config.dev_mode,
        })
    }

    /// Absolute API base without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Number of requests currently shared between callers.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.pending.pending_len()
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// # Errors
    /// See [`ClientError`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        decode(self.execute(self.client.get(self.api_url(path)), options).await?)
    }

    /// # Errors
    /// See [`ClientError`].
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let request = self.client.post(self.api_url(path)).json(body);
        decode(self.execute(request, options).await?)
    }

    /// # Errors
    /// See [`ClientError`].
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let request = self.client.put(self.api_url(path)).json(body);
        decode(self.execute(request, options).await?)
    }

    /// # Errors
    /// See [`ClientError`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        decode(self.execute(self.client.delete(self.api_url(path)), options).await?)
    }

    /// POSTs a multipart form.
    ///
    /// # Errors
    /// See [`ClientError`].
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let request = self.client.post(self.api_url(path)).multipart(form);
        decode(self.execute(request, options).await?)
    }

    /// Sends `request` with credentials and unwraps the envelope.
    async fn execute(
        &self,
        request: RequestBuilder,
        options: RequestOptions,
    ) -> Result<Value, ClientError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(%status, "request rejected, clearing session");
            self.expire_session();
            return Err(ClientError::Status(status));
        }
        if !status.is_success() {
            debug!(%status, "request failed before reaching the envelope");
            return Err(ClientError::Status(status));
        }

        let body = response.bytes().await?;
        let envelope: Envelope<Value> = serde_json::from_slice(&body)?;
        self.unwrap_envelope(envelope, options)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = transport::with_credentials(request);
        match self.session.auth_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn unwrap_envelope(
        &self,
        envelope: Envelope<Value>,
        options: RequestOptions,
    ) -> Result<Value, ClientError> {
        if envelope.is_success() {
            return Ok(envelope.into_payload().unwrap_or(Value::Null));
        }

        let code = envelope.code;
        let message = envelope
            .err_msg
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| format!("Request failed with code {code}"));
        if self.dev_mode {
            self.log_envelope_error(code, &message);
        }

        if SESSION_INVALID_CODES.contains(&code) {
            self.expire_session();
            return Err(ClientError::SessionExpired);
        }

        if !options.silence {
            self.platform.notifier.error(&message);
        }
        Err(ClientError::Api { code, message })
    }

    fn log_envelope_error(&self, code: i64, message: &str) {
        let path = self.platform.navigator.current_path();
        let expected = is_public_path(&path)
            && (code == TOKEN_MISSING_CODE
                || PUBLIC_ROUTE_NOISE
                    .iter()
                    .any(|noise| message.contains(noise)));
        if !expected {
            warn!(code, %message, %path, "API returned an error envelope");
        }
    }

    /// Drops the local session and reloads into the login page.
    fn expire_session(&self) {
        self.session.clear_local();
        self.platform.navigator.assign(LOGIN_PATH);
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod client_test;
