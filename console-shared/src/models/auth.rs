use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::user::UserInfo;

/// Access/refresh token pair issued by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthToken {
    /// Token pair for backends that hand out a single token.
    #[must_use]
    pub fn single(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            access_token: token.clone(),
            refresh_token: token,
        }
    }
}

/// How a credential was obtained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Standard,
    Ldap,
    Oauth2,
    Oidc,
}

impl AuthMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Ldap => "ldap",
            Self::Oauth2 => "oauth2",
            Self::Oidc => "oidc",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "standard" => Ok(Self::Standard),
            "ldap" => Ok(Self::Ldap),
            "oauth2" => Ok(Self::Oauth2),
            "oidc" => Ok(Self::Oidc),
            _ => Err("unknown auth method"),
        }
    }
}

/// Password login payload. Either `email` or `username` identifies the account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_method: Option<AuthMethod>,
}

/// Result of any successful login flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub userinfo: UserInfo,
    pub token: AuthToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// LDAP login payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LdapLoginRequest {
    pub username: String,
    pub password: String,
}

/// Account registration payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RegisterResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `users/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RefreshTokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Query parameters the identity provider hands back to the callback route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthCallbackParams {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}
