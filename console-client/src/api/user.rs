//! Profile and account endpoints.

use super::{ConsoleClient, RequestOptions, decode, dedupe::request_key};
use crate::error::ClientError;
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use shared::models::{
    AvatarUploadResponse, InviteUserRequest, LogoutResponse, RefreshTokenResponse,
    UpdateUserRequest, UserInfo,
};

/// Identity endpoint; concurrent fetches share one request.
pub const USER_FETCH_PATH: &str = "users/fetch";

fn empty_body() -> Value {
    Value::Object(Map::new())
}

impl ConsoleClient {
    /// Profile of the current session. Concurrent calls share one request.
    ///
    /// # Errors
    /// See [`ClientError`].
    pub async fn fetch_user_info(&self) -> Result<UserInfo, ClientError> {
        let client = self.clone();
        let value = self
            .pending
            .run(request_key(USER_FETCH_PATH, None), move || async move {
                let request = client.client.get(client.api_url(USER_FETCH_PATH));
                client.execute(request, RequestOptions::SILENT).await
            })
            .await?;
        decode(value)
    }

    /// # Errors
    /// See [`ClientError`].
    pub async fn update_user_info(
        &self,
        user_id: &str,
        update: &UpdateUserRequest,
    ) -> Result<UserInfo, ClientError> {
        self.put(&format!("users/{user_id}"), update, RequestOptions::default())
            .await
    }

    /// # Errors
    /// See [`ClientError`].
    pub async fn logout(&self) -> Result<LogoutResponse, ClientError> {
        self.post("users/logout", &empty_body(), RequestOptions::SILENT)
            .await
    }

    /// Calls the logout endpoint, then clears local state whatever it answered.
    ///
    /// # Errors
    /// Returns the logout endpoint's failure; local state is cleared anyway.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let outcome = self.logout().await;
        self.session.clear_local();
        outcome.map(|_| ())
    }

    /// # Errors
    /// See [`ClientError`].
    pub async fn refresh_token(&self) -> Result<RefreshTokenResponse, ClientError> {
        self.post("users/refresh", &empty_body(), RequestOptions::SILENT)
            .await
    }

    /// # Errors
    /// See [`ClientError`].
    pub async fn invite_user(&self, request: &InviteUserRequest) -> Result<Value, ClientError> {
        self.post("users/invite", request, RequestOptions::SILENT)
            .await
    }

    /// Uploads an avatar image as the multipart field `file`.
    ///
    /// # Errors
    /// See [`ClientError`].
    pub async fn upload_avatar(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<AvatarUploadResponse, ClientError> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        self.post_multipart("users/fetch/avatar", form, RequestOptions::default())
            .await
    }
}
