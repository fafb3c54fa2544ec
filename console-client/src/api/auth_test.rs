use super::*;
use crate::{
    platform::memory::MemoryPlatform,
    test_support::{client_for, detail},
};
use mockito::{Matcher, Server};
use serde_json::json;
use test_case::test_case;

fn callback_params() -> OAuthCallbackParams {
    OAuthCallbackParams {
        code: "abc".into(),
        state: Some("xyz".into()),
    }
}

fn login_body() -> Value {
    json!({
        "userinfo": {"name": "ada", "email": "ada@example.com"},
        "token": {"accessToken": "a", "refreshToken": "r"},
        "role": "admin"
    })
}

#[test]
fn password_is_base64_encoded() {
    assert_eq!(encode_password("secret"), "c2VjcmV0");
    assert_eq!(encode_password(""), "");
}

#[test_case("abc", "abc", ValidationError::PasswordTooShort ; "short password")]
#[test_case("abcdefgh", "abcdefgi", ValidationError::PasswordMismatch ; "mismatch")]
#[test_case("abc", "abd", ValidationError::PasswordMismatch ; "mismatch is checked first")]
fn register_form_rejects(password: &str, confirm: &str, expected: ValidationError) {
    let form = RegisterForm {
        email: "ada@example.com".into(),
        password: password.into(),
        confirm_password: confirm.into(),
    };
    assert_eq!(form.validate(), Err(expected));
}

#[test]
fn register_form_derives_username_from_email() {
    let form = RegisterForm {
        email: " ada.lovelace@example.com ".into(),
        password: "correct horse".into(),
        confirm_password: "correct horse".into(),
    };
    let request = form.validate().unwrap();
    assert_eq!(request.username, "ada.lovelace");
    assert_eq!(request.email, "ada.lovelace@example.com");

    let blank = RegisterForm {
        email: "@example.com".into(),
        ..form
    };
    assert_eq!(blank.validate(), Err(ValidationError::MissingEmail));
}

#[tokio::test]
async fn login_sends_encoded_password_and_returns_session() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/v1/users/login")
        .match_body(Matcher::Json(
            json!({"email": "ada@example.com", "password": "c2VjcmV0"}),
        ))
        .with_status(200)
        .with_body(detail(login_body()))
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let response = client
        .login(&LoginRequest {
            email: Some("ada@example.com".into()),
            password: "secret".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.token.access_token, "a");
    assert_eq!(response.role.as_deref(), Some("admin"));
    m.assert_async().await;
}

#[tokio::test]
async fn login_failure_is_not_notified() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/users/login")
        .with_status(200)
        .with_body(json!({"code": 4001, "errMsg": "invalid credentials"}).to_string())
        .create_async()
        .await;

    let platform = MemoryPlatform::at("/login");
    let client = client_for(&server.url(), &platform);
    let err = client
        .login(&LoginRequest {
            username: Some("ada".into()),
            password: "wrong".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "invalid credentials");
    assert!(platform.notifier.errors().is_empty());
}

#[tokio::test]
async fn ldap_login_targets_provider() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/v1/identity/ldap/login/corp")
        .match_body(Matcher::Json(json!({"username": "ada", "password": "c2VjcmV0"})))
        .with_status(200)
        .with_body(detail(login_body()))
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let response = client
        .login_with_ldap(
            "corp",
            &LdapLoginRequest {
                username: "ada".into(),
                password: "secret".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(response.userinfo.name.as_deref(), Some("ada"));
    m.assert_async().await;
}

#[tokio::test]
async fn authorize_url_carries_both_redirect_spellings() {
    let server = Server::new_async().await;
    let client = client_for(&server.url(), &MemoryPlatform::default());

    let url = client.authorize_url("github", "https://app.example/auth/callback/github");
    let encoded = "https%3A%2F%2Fapp.example%2Fauth%2Fcallback%2Fgithub";
    assert_eq!(
        url,
        format!(
            "{}/api/v1/identity/authorize/github?redirect_uri={encoded}&redirectUri={encoded}",
            server.url()
        )
    );
}

#[tokio::test]
async fn callback_success_returns_detail() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", Matcher::Regex("^/api/v1/identity/callback/github".into()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("code".into(), "abc".into()),
            Matcher::UrlEncoded("state".into(), "xyz".into()),
        ]))
        .match_header("accept", "application/json")
        .match_header("x-requested-with", "XMLHttpRequest")
        .with_status(200)
        .with_header("content-type", "application/json; charset=utf-8")
        .with_body(detail(login_body()))
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let response: LoginResponse = client
        .handle_callback("github", &callback_params())
        .await
        .unwrap();

    assert_eq!(response.token.refresh_token, "r");
    m.assert_async().await;
}

#[tokio::test]
async fn callback_without_envelope_returns_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Regex("^/api/v1/identity/callback/oidc".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(login_body().to_string())
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let response: LoginResponse = client
        .handle_callback(
            "oidc",
            &OAuthCallbackParams {
                code: "abc".into(),
                state: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(response.userinfo.email.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn callback_redirect_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Regex("^/api/v1/identity/callback/github".into()))
        .with_status(302)
        .with_header("location", "/login")
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let err = client
        .handle_callback::<Value>("github", &callback_params())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Callback(CallbackError::Redirected)));
}

#[tokio::test]
async fn callback_html_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Regex("^/api/v1/identity/callback/github".into()))
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html></html>")
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let err = client
        .handle_callback::<Value>("github", &callback_params())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "OAuth callback returned non-JSON response");
}

#[test_case(json!({"code": 4001, "errMsg": "state mismatch"}), "state mismatch" ; "server message")]
#[test_case(json!({"code": 500}), "OAuth callback failed" ; "fallback message")]
fn callback_rejections(body: Value, message: &str) {
    let err = callback_payload(body).unwrap_err();
    assert_eq!(err.to_string(), message);
}

#[test]
fn callback_payload_falls_back_through_fields() {
    assert_eq!(
        callback_payload(json!({"code": 200, "detail": 1, "data": 2})),
        Ok(json!(1))
    );
    assert_eq!(
        callback_payload(json!({"code": 200, "data": 2})),
        Ok(json!(2))
    );
    assert_eq!(
        callback_payload(json!({"code": 200, "data": null, "token": "t"})),
        Ok(json!({"code": 200, "data": null, "token": "t"}))
    );
}

#[tokio::test]
async fn invalid_registration_makes_no_request() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/v1/users/register")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let short = RegisterForm {
        email: "ada@example.com".into(),
        password: "abc".into(),
        confirm_password: "abc".into(),
    };
    let mismatched = RegisterForm {
        email: "ada@example.com".into(),
        password: "correct horse".into(),
        confirm_password: "correct horse battery".into(),
    };

    let err = client.register_account(&short).await.unwrap_err();
    assert_eq!(err.to_string(), "Password must be at least 8 characters long");
    let err = client.register_account(&mismatched).await.unwrap_err();
    assert_eq!(err.to_string(), "Passwords do not match");
    m.assert_async().await;
}

#[tokio::test]
async fn registration_sends_derived_username() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/v1/users/register")
        .match_body(Matcher::Json(json!({
            "username": "ada",
            "password": encode_password("correct horse"),
            "email": "ada@example.com"
        })))
        .with_status(200)
        .with_body(detail(json!({"message": "created"})))
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let response = client
        .register_account(&RegisterForm {
            email: "ada@example.com".into(),
            password: "correct horse".into(),
            confirm_password: "correct horse".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.message.as_deref(), Some("created"));
    m.assert_async().await;
}
