use reqwest::{Client, RequestBuilder};

/// The three HTTP clients a [`super::ConsoleClient`] drives: the API client,
/// the OAuth callback client (no redirect following) and the version client.
pub(super) struct HttpClients {
    pub api: Client,
    pub callback: Client,
    pub version: Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpClients {
    pub fn native(
        config: &shared::config::ClientConfig,
        jar: std::sync::Arc<reqwest::cookie::Jar>,
    ) -> Result<Self, reqwest::Error> {
        use reqwest::redirect::Policy;
        use std::time::Duration;

        let timeout = Duration::from_secs(config.request_timeout_secs);
        let user_agent = concat!("console-client/", env!("CARGO_PKG_VERSION"));
        Ok(Self {
            api: Client::builder()
                .cookie_provider(jar.clone())
                .timeout(timeout)
                .user_agent(user_agent)
                .build()?,
            callback: Client::builder()
                .cookie_provider(jar)
                .timeout(timeout)
                .user_agent(user_agent)
                .redirect(Policy::none())
                .build()?,
            version: Client::builder()
                .timeout(Duration::from_secs(config.version_timeout_secs))
                .user_agent(user_agent)
                .build()?,
        })
    }
}

#[cfg(target_arch = "wasm32")]
impl HttpClients {
    pub fn browser() -> Self {
        Self {
            api: Client::new(),
            callback: Client::new(),
            version: Client::new(),
        }
    }
}

/// Sends cookies with cross-origin requests in the browser. Native clients
/// carry their cookie jar already.
pub(super) fn with_credentials(request: RequestBuilder) -> RequestBuilder {
    #[cfg(target_arch = "wasm32")]
    {
        request.fetch_credentials_include()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        request
    }
}
