use crate::host::{
    FileStorage, JarCookies, StateDir, TerminalNavigator, TerminalNotifier, load_cookie_jar,
    load_token, persist_cookie_jar, save_token,
};
use anyhow::Result;
use client::{ConsoleClient, Platform, Session};
use reqwest::cookie::Jar;
use shared::config::ClientConfig;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Everything a command needs: the client wired to terminal host services
/// and the session restored from the state directory.
#[derive(Debug)]
pub struct AppContext {
    pub config: ClientConfig,
    pub client: ConsoleClient,
    pub navigator: Arc<TerminalNavigator>,
    pub storage: Arc<FileStorage>,
    state: StateDir,
    jar: Arc<Jar>,
    api_url: Url,
}

impl AppContext {
    /// Opens the context as if the user were on `path`.
    pub fn open(config: ClientConfig, path: &str) -> Result<Self> {
        let state = StateDir::resolve();
        state.ensure()?;

        let api_url = Url::parse(&config.resolved_api_base()?)?;
        let jar = load_cookie_jar(&api_url, &state.cookies_path())?;
        let navigator = Arc::new(TerminalNavigator::new(&config.app_origin, path));
        let storage = Arc::new(FileStorage::open(state.preferences_path()));
        let platform = Platform::new(
            navigator.clone(),
            Arc::new(TerminalNotifier),
            Arc::new(JarCookies::new(jar.clone(), api_url.clone())),
            storage.clone(),
        );

        let session = Session::new();
        if let Some(token) = load_token(&state.token_path())? {
            debug!("restored stored session tokens");
            session.auth().set_tokens(token);
        }

        let client = ConsoleClient::with_cookie_jar(&config, session, platform, jar.clone())?;
        Ok(Self {
            config,
            client,
            navigator,
            storage,
            state,
            jar,
            api_url,
        })
    }

    pub const fn session(&self) -> &Session {
        self.client.session()
    }

    /// Writes the current tokens and cookies back to the state directory.
    pub fn persist(&self) -> Result<()> {
        let token = self.session().auth().state().token();
        save_token(&self.state.token_path(), token.as_ref())?;
        persist_cookie_jar(&self.jar, &self.api_url, &self.state.cookies_path())
    }

    /// Forgets the stored session entirely.
    pub fn forget(&self) -> Result<()> {
        save_token(&self.state.token_path(), None)?;
        let cookies = self.state.cookies_path();
        if cookies.exists() {
            std::fs::remove_file(&cookies)?;
        }
        Ok(())
    }
}
