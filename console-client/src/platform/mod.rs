//! Seams between the client core and the host it runs in.
//!
//! The browser front end implements these over `window`, `document` and
//! `localStorage`; the CLI implements them over its cookie jar and state
//! directory; tests use the in-memory versions in [`memory`].

use std::{fmt, sync::Arc};
use thiserror::Error;

pub mod memory;

/// A preference could not be persisted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("preference storage unavailable: {0}")]
pub struct StorageError(pub String);

/// Location and navigation.
pub trait Navigator: Send + Sync {
    /// Path of the current route, e.g. `/dashboard`.
    fn current_path(&self) -> String;

    /// Full URL of the current location.
    fn current_href(&self) -> String;

    /// In-app route change.
    fn navigate(&self, path: &str);

    /// Hard navigation that reloads the application.
    fn assign(&self, href: &str);
}

/// User-visible notifications.
pub trait Notifier: Send + Sync {
    fn error(&self, title: &str);
    fn success(&self, title: &str, description: Option<&str>);
}

/// Read access to the cookies visible to the application.
pub trait CookieSource: Send + Sync {
    /// Cookies in `name=value; name2=value2` form, in document order.
    fn cookie_header(&self) -> String;
}

/// Small persistent key-value store.
pub trait PreferenceStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns [`StorageError`] when the store rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str);
}

/// Class list of the document root element.
pub trait ThemeRoot: Send + Sync {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
}

/// Operating system colour-scheme preference.
pub trait ColorSchemeQuery: Send + Sync {
    fn prefers_dark(&self) -> bool;
}

/// Host services the API client and the auth guard need.
#[derive(Clone)]
pub struct Platform {
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub cookies: Arc<dyn CookieSource>,
    pub storage: Arc<dyn PreferenceStorage>,
}

impl Platform {
    #[must_use]
    pub fn new(
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        cookies: Arc<dyn CookieSource>,
        storage: Arc<dyn PreferenceStorage>,
    ) -> Self {
        Self {
            navigator,
            notifier,
            cookies,
            storage,
        }
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("path", &self.navigator.current_path())
            .finish_non_exhaustive()
    }
}
