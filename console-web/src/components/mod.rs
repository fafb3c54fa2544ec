pub(crate) mod auth_guard;
pub(crate) mod header;
pub(crate) mod loading;
pub(crate) mod theme_switcher;
pub(crate) mod toaster;

pub use auth_guard::AuthGuard;
pub use header::Header;
pub use loading::Loading;
pub use theme_switcher::ThemeSwitcher;
pub use toaster::Toaster;
