#![cfg_attr(not(test), forbid(unsafe_code))]

//! Session-aware client for the Console backend.
//!
//! [`ConsoleClient`] wraps the HTTP client: it injects bearer tokens, unwraps
//! the `{code, detail | data, errMsg}` envelope, collapses concurrent identical
//! identity fetches and clears the session when the server stops accepting
//! it. [`AuthGuard`] gates protected routes, [`ThemeStore`] owns the colour
//! theme. Browser side effects go through the traits in [`platform`].

pub mod api;
pub mod error;
pub mod platform;
pub mod session;
pub mod theme;

pub use api::{ConsoleClient, RequestOptions, auth::RegisterForm};
pub use error::{CallbackError, ClientError, SESSION_EXPIRED_MESSAGE, ValidationError};
pub use platform::Platform;
pub use session::{
    Session,
    guard::{AuthGuard, GuardOutcome},
};
pub use theme::ThemeStore;

#[cfg(test)]
mod test_support;
