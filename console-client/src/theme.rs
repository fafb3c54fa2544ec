//! Colour theme preference and its application to the document root.

use crate::platform::{ColorSchemeQuery, PreferenceStorage, ThemeRoot};
use shared::models::Theme;
use std::{fmt, sync::Arc};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Storage key of the persisted preference.
pub const THEME_STORAGE_KEY: &str = "APP_THEME";

const LIGHT_CLASS: &str = "light";
const DARK_CLASS: &str = "dark";

/// Holds the theme preference, persists it and keeps the root classes in
/// line with it. Clones share state.
#[derive(Clone)]
pub struct ThemeStore {
    theme: Arc<watch::Sender<Theme>>,
    storage: Arc<dyn PreferenceStorage>,
    root: Arc<dyn ThemeRoot>,
    scheme: Arc<dyn ColorSchemeQuery>,
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("theme", &*self.theme.borrow())
            .finish_non_exhaustive()
    }
}

impl ThemeStore {
    /// Loads the stored preference (`system` when missing or unknown) and
    /// applies it.
    #[must_use]
    pub fn new(
        storage: Arc<dyn PreferenceStorage>,
        root: Arc<dyn ThemeRoot>,
        scheme: Arc<dyn ColorSchemeQuery>,
    ) -> Self {
        let initial = storage
            .get(THEME_STORAGE_KEY)
            .and_then(|stored| stored.parse().ok())
            .unwrap_or_default();
        let (theme, _) = watch::channel(initial);
        let store = Self {
            theme: Arc::new(theme),
            storage,
            root,
            scheme,
        };
        store.apply(initial);
        store
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        *self.theme.borrow()
    }

    /// Whether the dark palette is currently in effect.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.theme().is_dark(self.scheme.prefers_dark())
    }

    /// Stores, persists and applies `theme`. A failed write is logged and
    /// the theme still applies.
    pub fn set_theme(&self, theme: Theme) {
        self.theme.send_replace(theme);
        if let Err(err) = self.storage.set(THEME_STORAGE_KEY, theme.as_str()) {
            warn!(error = %err, %theme, "failed to persist theme preference");
        }
        self.apply(theme);
    }

    /// Reacts to an OS colour-scheme change; only `system` follows it.
    pub fn color_scheme_changed(&self) {
        let theme = self.theme();
        if theme == Theme::System {
            self.apply(theme);
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }

    fn apply(&self, theme: Theme) {
        self.root.remove_class(LIGHT_CLASS);
        self.root.remove_class(DARK_CLASS);
        let dark = theme.is_dark(self.scheme.prefers_dark());
        if dark {
            self.root.add_class(DARK_CLASS);
        }
        debug!(%theme, dark, "theme applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::{MemoryStorage, MemoryThemeRoot, StaticColorScheme};
    use test_case::test_case;

    struct Fixture {
        storage: Arc<MemoryStorage>,
        root: Arc<MemoryThemeRoot>,
        scheme: Arc<StaticColorScheme>,
    }

    impl Fixture {
        fn new(prefers_dark: bool) -> Self {
            Self {
                storage: Arc::new(MemoryStorage::default()),
                root: Arc::new(MemoryThemeRoot::default()),
                scheme: Arc::new(StaticColorScheme::new(prefers_dark)),
            }
        }

        fn store(&self) -> ThemeStore {
            ThemeStore::new(
                self.storage.clone(),
                self.root.clone(),
                self.scheme.clone(),
            )
        }
    }

    #[test]
    fn dark_adds_class_and_persists() {
        let fixture = Fixture::new(false);
        let store = fixture.store();
        store.set_theme(Theme::Dark);

        assert!(fixture.root.has_class("dark"));
        assert_eq!(
            fixture.storage.get(THEME_STORAGE_KEY).as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn light_removes_both_classes() {
        let fixture = Fixture::new(true);
        let store = fixture.store();
        fixture.root.add_class("light");
        store.set_theme(Theme::Dark);
        store.set_theme(Theme::Light);

        assert!(fixture.root.classes().is_empty());
        assert!(!store.is_dark());
    }

    #[test_case(true, true ; "os prefers dark")]
    #[test_case(false, false ; "os prefers light")]
    fn system_follows_os_preference(prefers_dark: bool, dark_class: bool) {
        let fixture = Fixture::new(prefers_dark);
        let store = fixture.store();

        assert_eq!(store.theme(), Theme::System);
        assert_eq!(fixture.root.has_class("dark"), dark_class);
    }

    #[test]
    fn initial_theme_comes_from_storage() {
        let fixture = Fixture::new(false);
        fixture.storage.set(THEME_STORAGE_KEY, "dark").unwrap();
        let store = fixture.store();

        assert_eq!(store.theme(), Theme::Dark);
        assert!(fixture.root.has_class("dark"));
    }

    #[test]
    fn unknown_stored_value_means_system() {
        let fixture = Fixture::new(false);
        fixture.storage.set(THEME_STORAGE_KEY, "sepia").unwrap();
        assert_eq!(fixture.store().theme(), Theme::System);
    }

    #[test]
    fn scheme_change_only_matters_for_system() {
        let fixture = Fixture::new(false);
        let store = fixture.store();

        fixture.scheme.set_prefers_dark(true);
        store.color_scheme_changed();
        assert!(fixture.root.has_class("dark"));

        store.set_theme(Theme::Light);
        fixture.scheme.set_prefers_dark(false);
        fixture.root.add_class("dark");
        store.color_scheme_changed();
        assert!(fixture.root.has_class("dark"), "explicit theme ignores OS changes");
    }

    #[test]
    fn failed_persist_still_applies() {
        let root = Arc::new(MemoryThemeRoot::default());
        let store = ThemeStore::new(
            Arc::new(MemoryStorage::failing()),
            root.clone(),
            Arc::new(StaticColorScheme::new(false)),
        );
        store.set_theme(Theme::Dark);

        assert_eq!(store.theme(), Theme::Dark);
        assert!(root.has_class("dark"));
    }

    #[test]
    fn subscribers_see_changes() {
        let store = Fixture::new(false).store();
        let mut changes = store.subscribe();
        store.set_theme(Theme::Light);
        assert!(changes.has_changed().unwrap());
        assert_eq!(*changes.borrow_and_update(), Theme::Light);
    }
}
