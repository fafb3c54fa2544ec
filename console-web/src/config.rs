//! Browser configuration.
//!
//! Values are baked in at build time from the same variables the terminal
//! client reads at run time; the origin comes from the page itself.

use shared::config::ClientConfig;

/// OAuth providers offered on the login page unless overridden at build time.
const DEFAULT_OAUTH_PROVIDERS: &str = "github";

fn build_time(primary: Option<&'static str>, alias: Option<&'static str>) -> Option<&'static str> {
    primary.or(alias).filter(|value| !value.trim().is_empty())
}

/// Configuration for a page served from `origin`.
pub fn config_for(origin: Option<String>, api_client_url: Option<&str>, dev_mode: bool) -> ClientConfig {
    let mut config = ClientConfig::with_defaults();
    if let Some(origin) = origin {
        config.app_origin = origin;
    }
    config.api_client_url = api_client_url.map(str::to_string);
    config.dev_mode = dev_mode;

    // A malformed build-time base would leave the app unable to start;
    // fall back to the proxied default instead.
    if config.resolved_api_base().is_err() {
        config.api_client_url = None;
    }
    config
}

/// Configuration of the running page.
pub fn web_config() -> ClientConfig {
    let origin = web_sys::window().and_then(|window| window.location().origin().ok());
    config_for(
        origin,
        build_time(
            option_env!("CONSOLE_API_CLIENT_URL"),
            option_env!("VITE_API_CLIENT_URL"),
        ),
        cfg!(debug_assertions),
    )
}

/// OAuth providers shown on the login page.
pub fn oauth_providers() -> Vec<String> {
    parse_providers(option_env!("CONSOLE_OAUTH_PROVIDERS").unwrap_or(DEFAULT_OAUTH_PROVIDERS))
}

/// LDAP provider offered on the login page, if any.
pub fn ldap_provider() -> Option<&'static str> {
    option_env!("CONSOLE_LDAP_PROVIDER").filter(|value| !value.trim().is_empty())
}

fn parse_providers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|provider| !provider.is_empty())
        .map(str::to_string)
        .collect()
}
