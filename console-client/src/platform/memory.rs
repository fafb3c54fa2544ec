//! In-memory host services, for tests and headless hosts.

use super::{
    ColorSchemeQuery, CookieSource, Navigator, Notifier, Platform, PreferenceStorage,
    StorageError, ThemeRoot,
};
use std::{
    collections::{BTreeSet, HashMap},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct Location {
    origin: String,
    path: String,
    navigations: Vec<String>,
    assignments: Vec<String>,
}

/// Navigator that records every navigation.
#[derive(Debug)]
pub struct MemoryNavigator {
    location: Mutex<Location>,
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::at("/")
    }
}

impl MemoryNavigator {
    /// Navigator positioned at `path` on `http://localhost`.
    #[must_use]
    pub fn at(path: &str) -> Self {
        Self::with_origin("http://localhost", path)
    }

    #[must_use]
    pub fn with_origin(origin: &str, path: &str) -> Self {
        Self {
            location: Mutex::new(Location {
                origin: origin.trim_end_matches('/').to_string(),
                path: path.to_string(),
                navigations: Vec::new(),
                assignments: Vec::new(),
            }),
        }
    }

    /// In-app navigations, oldest first.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        lock(&self.location).navigations.clone()
    }

    /// Hard navigations, oldest first.
    #[must_use]
    pub fn assignments(&self) -> Vec<String> {
        lock(&self.location).assignments.clone()
    }

    /// Moves to `path` without recording a navigation.
    pub fn set_path(&self, path: &str) {
        lock(&self.location).path = path.to_string();
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        lock(&self.location).path.clone()
    }

    fn current_href(&self) -> String {
        let location = lock(&self.location);
        format!("{}{}", location.origin, location.path)
    }

    fn navigate(&self, path: &str) {
        let mut location = lock(&self.location);
        location.path = path.to_string();
        location.navigations.push(path.to_string());
    }

    fn assign(&self, href: &str) {
        let mut location = lock(&self.location);
        if let Some(path) = href.strip_prefix(&location.origin) {
            location.path = path.to_string();
        } else if href.starts_with('/') {
            location.path = href.to_string();
        }
        location.assignments.push(href.to_string());
    }
}

/// A notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Error(String),
    Success {
        title: String,
        description: Option<String>,
    },
}

/// Notifier that keeps every notification.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.shown).clone()
    }

    /// Titles of the error notifications, oldest first.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        lock(&self.shown)
            .iter()
            .filter_map(|notification| match notification {
                Notification::Error(title) => Some(title.clone()),
                Notification::Success { .. } => None,
            })
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn error(&self, title: &str) {
        lock(&self.shown).push(Notification::Error(title.to_string()));
    }

    fn success(&self, title: &str, description: Option<&str>) {
        lock(&self.shown).push(Notification::Success {
            title: title.to_string(),
            description: description.map(str::to_string),
        });
    }
}

/// Ordered cookie list.
#[derive(Debug, Default)]
pub struct MemoryCookies {
    cookies: Mutex<Vec<(String, String)>>,
}

impl MemoryCookies {
    #[must_use]
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        Self {
            cookies: Mutex::new(
                pairs
                    .iter()
                    .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                    .collect(),
            ),
        }
    }

    /// Sets a cookie, keeping its position when it already exists.
    pub fn set(&self, name: &str, value: &str) {
        let mut cookies = lock(&self.cookies);
        match cookies.iter_mut().find(|(existing, _)| existing == name) {
            Some(cookie) => cookie.1 = value.to_string(),
            None => cookies.push((name.to_string(), value.to_string())),
        }
    }

    pub fn clear(&self) {
        lock(&self.cookies).clear();
    }
}

impl CookieSource for MemoryCookies {
    fn cookie_header(&self) -> String {
        lock(&self.cookies)
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Preference store backed by a map. A failing store rejects every write.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    failing: bool,
}

impl MemoryStorage {
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing {
            return Err(StorageError(format!("write of {key} rejected")));
        }
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        lock(&self.values).remove(key);
    }
}

/// Root element class list.
#[derive(Debug, Default)]
pub struct MemoryThemeRoot {
    classes: Mutex<BTreeSet<String>>,
}

impl MemoryThemeRoot {
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        lock(&self.classes).iter().cloned().collect()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        lock(&self.classes).contains(class)
    }
}

impl ThemeRoot for MemoryThemeRoot {
    fn add_class(&self, class: &str) {
        lock(&self.classes).insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        lock(&self.classes).remove(class);
    }
}

/// Colour-scheme preference that can be flipped at runtime.
#[derive(Debug, Default)]
pub struct StaticColorScheme {
    dark: AtomicBool,
}

impl StaticColorScheme {
    #[must_use]
    pub const fn new(prefers_dark: bool) -> Self {
        Self {
            dark: AtomicBool::new(prefers_dark),
        }
    }

    pub fn set_prefers_dark(&self, dark: bool) {
        self.dark.store(dark, Ordering::Relaxed);
    }
}

impl ColorSchemeQuery for StaticColorScheme {
    fn prefers_dark(&self) -> bool {
        self.dark.load(Ordering::Relaxed)
    }
}

/// Every in-memory service, with typed handles for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryPlatform {
    pub navigator: Arc<MemoryNavigator>,
    pub notifier: Arc<MemoryNotifier>,
    pub cookies: Arc<MemoryCookies>,
    pub storage: Arc<MemoryStorage>,
}

impl MemoryPlatform {
    /// Platform positioned at `path`.
    #[must_use]
    pub fn at(path: &str) -> Self {
        Self {
            navigator: Arc::new(MemoryNavigator::at(path)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        Platform::new(
            self.navigator.clone(),
            self.notifier.clone(),
            self.cookies.clone(),
            self.storage.clone(),
        )
    }
}
