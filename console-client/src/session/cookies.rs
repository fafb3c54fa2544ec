//! Recovery of a session token the backend left in a readable cookie.

use crate::platform::CookieSource;
use cookie::Cookie;

/// Cookie names checked first, in priority order.
pub const TOKEN_COOKIE_NAMES: [&str; 9] = [
    "token",
    "access_token",
    "accessToken",
    "auth_token",
    "Authorization",
    "authorization",
    "jwt",
    "jwt_token",
    "bearer_token",
];

/// Substrings that mark a cookie as token-like when no known name matched.
const TOKEN_NAME_FRAGMENTS: [&str; 2] = ["token", "auth"];

/// How a cookie was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieMatcher {
    /// Exact, case-sensitive name.
    Named(&'static str),
    /// Case-insensitive name containing any of the fragments.
    Fragment(&'static [&'static str]),
}

impl CookieMatcher {
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Named(expected) => name == *expected,
            Self::Fragment(fragments) => {
                let name = name.to_lowercase();
                fragments.iter().any(|fragment| name.contains(fragment))
            }
        }
    }
}

/// Matchers in the order they are tried.
pub fn matchers() -> impl Iterator<Item = CookieMatcher> {
    TOKEN_COOKIE_NAMES
        .into_iter()
        .map(CookieMatcher::Named)
        .chain(std::iter::once(CookieMatcher::Fragment(&TOKEN_NAME_FRAGMENTS)))
}

/// A token found in a cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredToken {
    pub cookie: String,
    pub value: String,
    pub matched_by: CookieMatcher,
}

/// Splits a `Cookie` header into name/value pairs in document order.
/// Malformed segments are skipped.
#[must_use]
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
        .collect()
}

/// First non-empty cookie picked by the first matcher that picks anything.
#[must_use]
pub fn find_token(cookies: &[(String, String)]) -> Option<RecoveredToken> {
    matchers().find_map(|matcher| {
        cookies
            .iter()
            .find(|(name, value)| !value.is_empty() && matcher.matches(name))
            .map(|(name, value)| RecoveredToken {
                cookie: name.clone(),
                value: value.clone(),
                matched_by: matcher,
            })
    })
}

/// Looks for a session token among the cookies visible to the application.
#[must_use]
pub fn recover_token(source: &dyn CookieSource) -> Option<RecoveredToken> {
    find_token(&parse_cookie_header(&source.cookie_header()))
}
