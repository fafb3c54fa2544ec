use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use thiserror::Error;
use url::Url;

/// Base path used when no API URL is configured; requests then go through
/// the reverse proxy on the application origin.
pub const DEFAULT_API_BASE: &str = "/api/v1";

/// Errors raised while loading or resolving the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yml::Error),
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported configuration format. Use 'yaml' or 'json'.")]
    UnsupportedFormat,
    #[error("invalid {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Normalises the configured API base URL.
///
/// * unset: [`DEFAULT_API_BASE`], served through the reverse proxy
/// * `http://` / `https://` prefixed: used as is, direct to the backend
/// * leading `/`: used as is, relative to the application origin
/// * anything else (`host:port/path`): `https://` is prepended
#[must_use]
pub fn normalize_base_url(url: Option<&str>) -> String {
    match url {
        None | Some("") => DEFAULT_API_BASE.to_string(),
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => url.to_string(),
        Some(url) if url.starts_with('/') => url.to_string(),
        Some(url) => format!("https://{url}"),
    }
}

/// Log line format of native front ends.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration shared by every Console front end.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// API base: absolute backend URL, bare `host/path`, or a path on the app origin.
    pub api_client_url: Option<String>,

    /// Backend the development proxy forwards `/api` to.
    pub api_url: String,

    /// Origin the application is served from.
    pub app_origin: String,

    /// Timeout of the main API client, in seconds.
    pub request_timeout_secs: u64,

    /// Timeout of the version-info client, in seconds.
    pub version_timeout_secs: u64,

    /// Emit envelope diagnostics.
    pub dev_mode: bool,

    /// Logging level
    pub log_level: String,

    /// Logging format
    pub log_format: LogFormat,

    /// Port the development proxy listens on.
    pub proxy_port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn env_value(primary: &str, alias: &str) -> Option<String> {
    env::var(primary)
        .or_else(|_| env::var(alias))
        .ok()
        .filter(|value| !value.trim().is_empty())
}

impl ClientConfig {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_client_url: None,
            api_url: "http://localhost:8080".to_string(),
            app_origin: "http://localhost:5173".to_string(),
            request_timeout_secs: 60,
            version_timeout_secs: 10,
            dev_mode: false,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            proxy_port: 5173,
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// File values win over the environment; the environment only fills in
    /// values still at their defaults. `api_override` beats both.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, an environment
    /// value is malformed, or the result fails validation.
    pub fn load_config(
        config_path: Option<PathBuf>,
        api_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::with_defaults();
        let mut config = Self::with_defaults();

        if let Some(path) = config_path {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            config = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => serde_yml::from_str(&content)?,
                Some("json") => serde_json::from_str(&content)?,
                _ => return Err(ConfigError::UnsupportedFormat),
            };
        }

        if config.api_client_url.is_none() {
            config.api_client_url = env_value("CONSOLE_API_CLIENT_URL", "VITE_API_CLIENT_URL");
        }
        if config.api_url == defaults.api_url {
            if let Some(api_url) = env_value("CONSOLE_API_URL", "VITE_API_URL") {
                config.api_url = api_url;
            }
        }
        if config.app_origin == defaults.app_origin {
            if let Ok(origin) = env::var("CONSOLE_APP_ORIGIN") {
                config.app_origin = origin;
            }
        }
        if config.dev_mode == defaults.dev_mode {
            if let Ok(flag) = env::var("CONSOLE_DEV_MODE") {
                config.dev_mode = matches!(flag.trim(), "1" | "true" | "yes");
            }
        }
        if config.log_level == defaults.log_level {
            if let Ok(level) = env::var("CONSOLE_LOG_LEVEL") {
                config.log_level = level;
            }
        }

        if config.log_format == defaults.log_format {
            if let Ok(format) = env::var("CONSOLE_LOG_FORMAT") {
                config.log_format = match format.trim() {
                    "json" => LogFormat::Json,
                    "text" => LogFormat::Text,
                    other => {
                        return Err(ConfigError::InvalidValue {
                            name: "CONSOLE_LOG_FORMAT",
                            message: format!("expected 'text' or 'json', got '{other}'"),
                        });
                    }
                };
            }
        }

        if let Some(api) = api_override {
            config.api_client_url = Some(api);
        }

        config.validate().map_err(|errors| ConfigError::InvalidValue {
            name: "configuration",
            message: errors.join("; "),
        })?;

        Ok(config)
    }

    /// Normalised API base, possibly relative to the application origin.
    #[must_use]
    pub fn api_base(&self) -> String {
        normalize_base_url(self.api_client_url.as_deref())
    }

    /// Parsed application origin.
    ///
    /// # Errors
    /// Returns an error if `app_origin` is not an absolute URL.
    pub fn origin(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&self.app_origin)?)
    }

    /// Absolute API base with any trailing slash removed.
    ///
    /// # Errors
    /// Returns an error if the base or the origin it is resolved against is malformed.
    pub fn resolved_api_base(&self) -> Result<String, ConfigError> {
        let base = self.api_base();
        let absolute = if base.starts_with('/') {
            self.origin()?.join(&base)?
        } else {
            Url::parse(&base)?
        };
        Ok(absolute.as_str().trim_end_matches('/').to_string())
    }

    /// Version endpoint, always served from the application origin.
    ///
    /// # Errors
    /// Returns an error if `app_origin` is malformed.
    pub fn version_url(&self) -> Result<Url, ConfigError> {
        Ok(self.origin()?.join("/api/v1/version")?)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.request_timeout_secs == 0 {
            errors.push("request timeout must be greater than 0".to_string());
        }
        if self.version_timeout_secs == 0 {
            errors.push("version timeout must be greater than 0".to_string());
        }
        if let Err(err) = Url::parse(&self.app_origin) {
            errors.push(format!("app origin is not a URL: {err}"));
        }
        if let Err(err) = Url::parse(&self.api_url) {
            errors.push(format!("API URL is not a URL: {err}"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
