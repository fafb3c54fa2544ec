use super::*;
use crate::{
    platform::{PreferenceStorage, memory::MemoryPlatform},
    test_support::{client_for, detail},
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

fn failing_fetch_body() -> String {
    json!({"code": 4001, "errMsg": "not signed in"}).to_string()
}

async fn guard_at(path: &str) -> (ServerGuard, MemoryPlatform, AuthGuard) {
    let server = Server::new_async().await;
    let platform = MemoryPlatform::at(path);
    let guard = AuthGuard::new(client_for(&server.url(), &platform));
    (server, platform, guard)
}

#[tokio::test]
async fn public_routes_pass_without_requests() {
    let (mut server, platform, guard) = guard_at("/login").await;
    let fetch = server
        .mock("GET", "/api/v1/users/fetch")
        .expect(0)
        .create_async()
        .await;

    for path in ["/login", "/register", "/auth/callback/github"] {
        assert_eq!(guard.check(path).await, GuardOutcome::Public);
    }
    assert!(platform.navigator.navigations().is_empty());
    fetch.assert_async().await;
}

#[tokio::test]
async fn initialized_session_is_authorized_immediately() {
    let (mut server, _platform, guard) = guard_at("/dashboard").await;
    let fetch = server
        .mock("GET", "/api/v1/users/fetch")
        .expect(0)
        .create_async()
        .await;

    guard.client.session().auth().mark_initialized();
    assert_eq!(guard.check("/dashboard").await, GuardOutcome::Authorized);
    fetch.assert_async().await;
}

#[tokio::test]
async fn cookie_token_is_recovered_and_used() {
    let (mut server, platform, guard) = guard_at("/dashboard").await;
    platform.cookies.set("session_id", "1");
    platform.cookies.set("access_token", "from-cookie");
    let fetch = server
        .mock("GET", "/api/v1/users/fetch")
        .match_header("authorization", "Bearer from-cookie")
        .with_status(200)
        .with_body(detail(json!({"name": "ada"})))
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/v1/users/refresh")
        .expect(0)
        .create_async()
        .await;

    assert_eq!(guard.check("/dashboard").await, GuardOutcome::Authorized);

    let session = guard.client.session();
    assert!(session.auth().is_initialized());
    assert_eq!(session.auth().state().refresh_token.as_deref(), Some("from-cookie"));
    assert_eq!(session.users().role().as_deref(), Some("user"));
    assert!(!guard.is_checking());
    fetch.assert_async().await;
    refresh.assert_async().await;
}

#[tokio::test]
async fn refresh_then_retry_when_no_cookie() {
    let (mut server, platform, guard) = guard_at("/dashboard").await;
    let anonymous = server
        .mock("GET", "/api/v1/users/fetch")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(failing_fetch_body())
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/v1/users/refresh")
        .with_status(200)
        .with_body(detail(json!({"token": "fresh"})))
        .expect(1)
        .create_async()
        .await;
    let retried = server
        .mock("GET", "/api/v1/users/fetch")
        .match_header("authorization", "Bearer fresh")
        .with_status(200)
        .with_body(detail(json!({"name": "ada", "role": "admin"})))
        .expect(1)
        .create_async()
        .await;

    assert_eq!(guard.check("/dashboard").await, GuardOutcome::Authorized);
    assert_eq!(guard.client.session().users().role().as_deref(), Some("admin"));
    assert!(platform.navigator.navigations().is_empty());
    anonymous.assert_async().await;
    refresh.assert_async().await;
    retried.assert_async().await;
}

#[tokio::test]
async fn failure_redirects_and_remembers_location() {
    let (mut server, platform, guard) = guard_at("/reports/42").await;
    server
        .mock("GET", "/api/v1/users/fetch")
        .with_status(200)
        .with_body(failing_fetch_body())
        .create_async()
        .await;
    server
        .mock("POST", "/api/v1/users/refresh")
        .with_status(200)
        .with_body(json!({"code": 4001, "errMsg": "no refresh token"}).to_string())
        .create_async()
        .await;

    assert_eq!(guard.check("/reports/42").await, GuardOutcome::Redirected);

    assert_eq!(platform.navigator.navigations(), vec!["/login"]);
    assert_eq!(
        platform.storage.get(LOGIN_FALLBACK_URL_KEY).as_deref(),
        Some("http://localhost/reports/42")
    );
    assert!(platform.notifier.errors().is_empty());
    assert!(!guard.client.session().auth().is_initialized());
}

#[tokio::test]
async fn recovered_cookie_failure_skips_refresh() {
    let (mut server, platform, guard) = guard_at("/dashboard").await;
    platform.cookies.set("jwt", "stale");
    server
        .mock("GET", "/api/v1/users/fetch")
        .with_status(200)
        .with_body(failing_fetch_body())
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/v1/users/refresh")
        .expect(0)
        .create_async()
        .await;

    assert_eq!(guard.check("/dashboard").await, GuardOutcome::Redirected);
    refresh.assert_async().await;
}

#[tokio::test]
async fn empty_refresh_token_redirects() {
    let (mut server, platform, guard) = guard_at("/dashboard").await;
    let fetch = server
        .mock("GET", "/api/v1/users/fetch")
        .with_status(200)
        .with_body(failing_fetch_body())
        .expect(1)
        .create_async()
        .await;
    server
        .mock("POST", "/api/v1/users/refresh")
        .with_status(200)
        .with_body(detail(json!({"token": ""})))
        .create_async()
        .await;

    assert_eq!(guard.check("/dashboard").await, GuardOutcome::Redirected);
    assert_eq!(platform.navigator.navigations(), vec!["/login"]);
    fetch.assert_async().await;
}

#[tokio::test]
async fn concurrent_check_reports_busy() {
    let (mut server, _platform, guard) = guard_at("/dashboard").await;
    server
        .mock("GET", "/api/v1/users/fetch")
        .with_status(200)
        .with_body(detail(json!({"name": "ada"})))
        .create_async()
        .await;

    let (first, second) = tokio::join!(guard.check("/dashboard"), guard.check("/dashboard"));

    assert_eq!(first, GuardOutcome::Authorized);
    assert_eq!(second, GuardOutcome::Busy);
    assert!(!guard.is_checking());
    assert_eq!(guard.check("/dashboard").await, GuardOutcome::Authorized);
}

#[test]
fn only_public_and_authorized_render() {
    assert!(GuardOutcome::Public.may_render());
    assert!(GuardOutcome::Authorized.may_render());
    assert!(!GuardOutcome::Busy.may_render());
    assert!(!GuardOutcome::Redirected.may_render());
}
