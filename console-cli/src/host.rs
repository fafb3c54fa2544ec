//! Terminal implementations of the client's host services, plus the files
//! that carry a session from one invocation to the next.

use anyhow::{Context, Result};
use client::{
    platform::{ColorSchemeQuery, CookieSource, Navigator, Notifier, PreferenceStorage, StorageError},
    session::LOGIN_PATH,
};
use colored::Colorize;
use directories::BaseDirs;
use reqwest::cookie::{CookieStore, Jar};
use shared::models::AuthToken;
use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};
use tracing::{debug, warn};
use url::Url;

/// Overrides the directory holding session and preference files.
pub const STATE_DIR_ENV: &str = "CONSOLE_STATE_DIR";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Directory holding the persisted session.
#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn resolve() -> Self {
        let root = env::var_os(STATE_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().join("console")))
            .unwrap_or_else(|| PathBuf::from("./.console"));
        Self { root }
    }

    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create state directory {}", self.root.display()))
    }

    pub fn cookies_path(&self) -> PathBuf {
        self.root.join("session.cookies")
    }

    pub fn token_path(&self) -> PathBuf {
        self.root.join("session.json")
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.root.join("preferences.json")
    }
}

fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn load_token(path: &Path) -> Result<Option<AuthToken>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let token = serde_json::from_str(&contents)
        .with_context(|| format!("corrupt session file {}", path.display()))?;
    Ok(Some(token))
}

/// Writes the token pair, or removes the file when there is none.
pub fn save_token(path: &Path, token: Option<&AuthToken>) -> Result<()> {
    match token {
        Some(token) => write_private(path, serde_json::to_string_pretty(token)?.as_bytes()),
        None => remove_if_exists(path),
    }
}

/// Cookie jar seeded from the `name=value; ...` file written by
/// [`persist_cookie_jar`]. A missing file yields an empty jar.
pub fn load_cookie_jar(origin: &Url, path: &Path) -> Result<Arc<Jar>> {
    let jar = Arc::new(Jar::default());
    if !path.exists() {
        return Ok(jar);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read session jar {}", path.display()))?;
    for entry in contents.split(';') {
        let cookie = entry.trim();
        if !cookie.is_empty() {
            jar.add_cookie_str(cookie, origin);
        }
    }
    Ok(jar)
}

pub fn persist_cookie_jar(jar: &Jar, origin: &Url, path: &Path) -> Result<()> {
    match jar.cookies(origin) {
        Some(header) => write_private(path, header.to_str()?.as_bytes()),
        None => remove_if_exists(path),
    }
}

/// Cookies the jar would send to the API.
#[derive(Debug)]
pub struct JarCookies {
    jar: Arc<Jar>,
    origin: Url,
}

impl JarCookies {
    pub const fn new(jar: Arc<Jar>, origin: Url) -> Self {
        Self { jar, origin }
    }
}

impl CookieSource for JarCookies {
    fn cookie_header(&self) -> String {
        self.jar
            .cookies(&self.origin)
            .and_then(|header| header.to_str().ok().map(str::to_string))
            .unwrap_or_default()
    }
}

/// Preferences kept in a JSON object on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "ignoring corrupt preferences file");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let serialized =
            serde_json::to_string_pretty(values).map_err(|err| StorageError(err.to_string()))?;
        fs::write(&self.path, serialized).map_err(|err| StorageError(err.to_string()))
    }
}

impl PreferenceStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = lock(&self.values);
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) {
        let mut values = lock(&self.values);
        if values.remove(key).is_some()
            && let Err(err) = self.flush(&values)
        {
            warn!(error = %err, key, "failed to persist preference removal");
        }
    }
}

/// Prints notifications: errors to stderr, successes to stdout.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn error(&self, title: &str) {
        eprintln!("{} {title}", "error:".red().bold());
    }

    fn success(&self, title: &str, description: Option<&str>) {
        println!("{} {title}", "ok:".green().bold());
        if let Some(description) = description {
            println!("    {}", description.dimmed());
        }
    }
}

/// Tracks the route a command acts as, and whether the client asked to be
/// sent to the login page.
#[derive(Debug)]
pub struct TerminalNavigator {
    origin: String,
    path: Mutex<String>,
    sent_to_login: AtomicBool,
}

impl TerminalNavigator {
    pub fn new(origin: &str, path: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            path: Mutex::new(path.to_string()),
            sent_to_login: AtomicBool::new(false),
        }
    }

    pub fn sent_to_login(&self) -> bool {
        self.sent_to_login.load(Ordering::Acquire)
    }

    fn go(&self, path: &str) {
        debug!(%path, "navigation requested");
        if path == LOGIN_PATH {
            self.sent_to_login.store(true, Ordering::Release);
        }
        *lock(&self.path) = path.to_string();
    }
}

impl Navigator for TerminalNavigator {
    fn current_path(&self) -> String {
        lock(&self.path).clone()
    }

    fn current_href(&self) -> String {
        format!("{}{}", self.origin, lock(&self.path))
    }

    fn navigate(&self, path: &str) {
        self.go(path);
    }

    fn assign(&self, href: &str) {
        let path = href.strip_prefix(self.origin.as_str()).unwrap_or(href);
        self.go(path);
    }
}

/// Reads the terminal background from `COLORFGBG` (`fg;bg`, dark palette
/// indices are 0-6 and 8).
#[derive(Debug, Default)]
pub struct TerminalColorScheme;

impl TerminalColorScheme {
    fn is_dark_background(value: &str) -> bool {
        value
            .rsplit(';')
            .next()
            .and_then(|bg| bg.trim().parse::<u8>().ok())
            .is_some_and(|bg| bg <= 6 || bg == 8)
    }
}

impl ColorSchemeQuery for TerminalColorScheme {
    fn prefers_dark(&self) -> bool {
        env::var("COLORFGBG").is_ok_and(|value| Self::is_dark_background(&value))
    }
}
