//! Browser implementations of the client's host services.
//!
//! Every adapter is a unit struct that looks the browser objects up on each
//! call, so they satisfy the client's `Send + Sync` bounds.

use std::{ops::Deref, rc::Rc, sync::Arc};

use client::{
    ClientError, ConsoleClient, Platform, Session, ThemeStore,
    platform::{
        ColorSchemeQuery, CookieSource, Navigator, Notifier, PreferenceStorage, StorageError,
        ThemeRoot,
    },
};
use gloo_storage::{LocalStorage, Storage};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlDocument, window};
use yew_router::history::{BrowserHistory, History};

use crate::{
    config,
    state::{self, ToastKind},
};

/// Media query tracked for the `system` theme.
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

pub fn log_warning(message: &str) {
    web_sys::console::warn_1(&message.into());
}

/// Handle shared between components; equal when it points at the same value.
#[derive(Debug)]
pub struct Shared<T>(Rc<T>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(value))
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Deref for Shared<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

#[derive(Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        window()
            .and_then(|window| window.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn current_href(&self) -> String {
        window()
            .and_then(|window| window.location().href().ok())
            .unwrap_or_default()
    }

    fn navigate(&self, path: &str) {
        BrowserHistory::new().push(path);
    }

    fn assign(&self, href: &str) {
        if let Some(window) = window()
            && let Err(err) = window.location().set_href(href)
        {
            log_warning(&format!("navigation to {href} failed: {err:?}"));
        }
    }
}

/// Notifications become toasts.
#[derive(Debug, Default)]
pub struct ToastNotifier;

impl Notifier for ToastNotifier {
    fn error(&self, title: &str) {
        state::notify(ToastKind::Error, title, None);
    }

    fn success(&self, title: &str, description: Option<&str>) {
        state::notify(ToastKind::Success, title, description);
    }
}

/// Cookies visible to script through `document.cookie`.
#[derive(Debug, Default)]
pub struct DocumentCookies;

impl CookieSource for DocumentCookies {
    fn cookie_header(&self) -> String {
        window()
            .and_then(|window| window.document())
            .and_then(|document| document.dyn_into::<HtmlDocument>().ok())
            .and_then(|document| document.cookie().ok())
            .unwrap_or_default()
    }
}

/// Preferences in `localStorage`, stored as raw strings.
#[derive(Debug, Default)]
pub struct LocalPreferences;

impl PreferenceStorage for LocalPreferences {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| StorageError(format!("{err:?}")))
    }

    fn remove(&self, key: &str) {
        if let Err(err) = LocalStorage::raw().remove_item(key) {
            log_warning(&format!("failed to remove {key} from localStorage: {err:?}"));
        }
    }
}

/// Classes on `<html>`.
#[derive(Debug, Default)]
pub struct DocumentRoot;

impl DocumentRoot {
    fn element() -> Option<Element> {
        window()?.document()?.document_element()
    }
}

impl ThemeRoot for DocumentRoot {
    fn add_class(&self, class: &str) {
        if let Some(root) = Self::element()
            && let Err(err) = root.class_list().add_1(class)
        {
            log_warning(&format!("cannot add class {class}: {err:?}"));
        }
    }

    fn remove_class(&self, class: &str) {
        if let Some(root) = Self::element()
            && let Err(err) = root.class_list().remove_1(class)
        {
            log_warning(&format!("cannot remove class {class}: {err:?}"));
        }
    }
}

#[derive(Debug, Default)]
pub struct MediaColorScheme;

impl ColorSchemeQuery for MediaColorScheme {
    fn prefers_dark(&self) -> bool {
        window()
            .and_then(|window| window.match_media(DARK_SCHEME_QUERY).ok().flatten())
            .is_some_and(|query| query.matches())
    }
}

pub fn platform() -> Platform {
    Platform::new(
        Arc::new(BrowserNavigator),
        Arc::new(ToastNotifier),
        Arc::new(DocumentCookies),
        Arc::new(LocalPreferences),
    )
}

/// The page's API client with a fresh session.
///
/// # Errors
/// Returns an error if the configured URLs cannot be resolved.
pub fn build_client() -> Result<Shared<ConsoleClient>, ClientError> {
    ConsoleClient::new(&config::web_config(), Session::new(), platform()).map(Shared::new)
}

pub fn build_theme_store() -> Shared<ThemeStore> {
    Shared::new(ThemeStore::new(
        Arc::new(LocalPreferences),
        Arc::new(DocumentRoot),
        Arc::new(MediaColorScheme),
    ))
}
