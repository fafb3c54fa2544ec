//! Sign-in and registration endpoints.

use super::{ConsoleClient, RequestOptions, decode, transport};
use crate::error::{CallbackError, ClientError, MIN_PASSWORD_LENGTH, ValidationError};
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{
    LdapLoginRequest, LoginRequest, LoginResponse, OAuthCallbackParams, RegisterRequest,
    RegisterResponse, SUCCESS_CODE,
};
use tracing::{debug, info};
use url::form_urlencoded;

/// Passwords travel base64-encoded.
#[must_use]
pub fn encode_password(password: &str) -> String {
    STANDARD.encode(password.as_bytes())
}

/// Registration form as the user filled it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// Checks the form and derives the request: the username is the local
    /// part of the email address.
    ///
    /// # Errors
    /// Returns the first rule the form breaks, passwords first.
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort);
        }
        let email = self.email.trim();
        let username = email.split('@').next().unwrap_or_default();
        if username.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        Ok(RegisterRequest {
            username: username.to_string(),
            password: self.password.clone(),
            email: email.to_string(),
        })
    }
}

impl ConsoleClient {
    /// Password login. Failures are returned, not notified.
    ///
    /// # Errors
    /// See [`ClientError`].
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let payload = LoginRequest {
            password: encode_password(&request.password),
            ..request.clone()
        };
        self.post("users/login", &payload, RequestOptions::SILENT)
            .await
    }

    /// LDAP login against `provider`. Failures are returned, not notified.
    ///
    /// # Errors
    /// See [`ClientError`].
    pub async fn login_with_ldap(
        &self,
        provider: &str,
        request: &LdapLoginRequest,
    ) -> Result<LoginResponse, ClientError> {
        let payload = LdapLoginRequest {
            username: request.username.clone(),
            password: encode_password(&request.password),
        };
        self.post(
            &format!("identity/ldap/login/{provider}"),
            &payload,
            RequestOptions::SILENT,
        )
        .await
    }

    /// URL to send the browser to for an OAuth2/OIDC login. The return
    /// address is sent under both spellings the backends accept.
    #[must_use]
    pub fn authorize_url(&self, provider: &str, redirect_uri: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("redirectUri", redirect_uri)
            .finish();
        format!(
            "{}?{query}",
            self.api_url(&format!("identity/authorize/{provider}"))
        )
    }

    /// Exchanges the provider's authorization code for a session.
    ///
    /// Redirects are not followed: a redirect here means the backend wants a
    /// browser navigation, which this call cannot perform.
    ///
    /// # Errors
    /// [`CallbackError`] for redirects, non-JSON bodies and rejected codes;
    /// otherwise see [`ClientError`].
    pub async fn handle_callback<T: DeserializeOwned>(
        &self,
        provider: &str,
        params: &OAuthCallbackParams,
    ) -> Result<T, ClientError> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("code", &params.code);
        if let Some(state) = &params.state {
            query.append_pair("state", state);
        }
        let url = format!(
            "{}?{}",
            self.api_url(&format!("identity/callback/{provider}")),
            query.finish()
        );

        let request = self
            .callback_client
            .get(url)
            .header(ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest");
        let response = transport::with_credentials(request).send().await?;

        if response.status().is_redirection() {
            debug!(status = %response.status(), %provider, "callback answered with a redirect");
            return Err(CallbackError::Redirected.into());
        }
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));
        if !is_json {
            return Err(CallbackError::NonJson.into());
        }

        let body: Value = serde_json::from_slice(&response.bytes().await?)?;
        let payload = callback_payload(body)?;
        info!(%provider, "OAuth callback accepted");
        decode(payload)
    }

    /// # Errors
    /// See [`ClientError`].
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<RegisterResponse, ClientError> {
        let payload = RegisterRequest {
            password: encode_password(&request.password),
            ..request.clone()
        };
        self.post("users/register", &payload, RequestOptions::SILENT)
            .await
    }

    /// Validates `form` locally, then registers. Nothing is sent when the
    /// form is invalid.
    ///
    /// # Errors
    /// [`ClientError::Validation`] for an invalid form; otherwise see [`ClientError`].
    pub async fn register_account(
        &self,
        form: &RegisterForm,
    ) -> Result<RegisterResponse, ClientError> {
        let request = form.validate()?;
        self.register(&request).await
    }
}

/// Picks the payload out of a callback body: `detail`, then a non-null
/// `data`, then the body itself. A present, non-zero, non-200 code rejects.
fn callback_payload(body: Value) -> Result<Value, CallbackError> {
    let code = body.get("code").and_then(Value::as_i64).unwrap_or(0);
    if code != 0 && code != SUCCESS_CODE {
        return Err(CallbackError::Rejected {
            code,
            message: body
                .get("errMsg")
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }

    let Value::Object(mut map) = body else {
        return Ok(body);
    };
    if let Some(detail) = map.remove("detail") {
        return Ok(detail);
    }
    if map.get("data").is_some_and(|data| !data.is_null()) {
        return Ok(map.remove("data").unwrap_or_default());
    }
    Ok(Value::Object(map))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;
