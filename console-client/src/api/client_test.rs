use super::*;
use crate::{
    platform::memory::MemoryPlatform,
    test_support::{client_for, detail},
};
use mockito::{Matcher, Server};
use serde_json::json;
use shared::models::{
    AuthToken, CreateIssueRequest, CreateIssueResponse, InviteUserRequest, UpdateUserRequest,
    UserInfo,
};

#[tokio::test]
async fn detail_payload_is_unwrapped() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/api/v1/users/fetch")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(detail(json!({"name": "ada", "role": "admin"})))
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let info = client.fetch_user_info().await.unwrap();

    assert_eq!(info.name.as_deref(), Some("ada"));
    assert_eq!(info.role.as_deref(), Some("admin"));
    m.assert_async().await;
}

#[tokio::test]
async fn data_payload_is_unwrapped() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/things")
        .with_status(200)
        .with_body(json!({"code": 200, "data": [1, 2, 3]}).to_string())
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let things: Vec<u32> = client.get("things", RequestOptions::default()).await.unwrap();
    assert_eq!(things, vec![1, 2, 3]);
}

#[tokio::test]
async fn session_invalid_codes_expire_the_session_even_when_silenced() {
    for (code, options) in [
        (4401, RequestOptions::default()),
        (4403, RequestOptions::SILENT),
        (4406, RequestOptions::default()),
    ] {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/things")
            .with_status(200)
            .with_body(json!({"code": code, "errMsg": "token expired"}).to_string())
            .create_async()
            .await;

        let platform = MemoryPlatform::at("/dashboard");
        let client = client_for(&server.url(), &platform);
        client.session().auth().set_tokens(AuthToken::single("t"));
        client.session().users().set_user(UserInfo::default(), None);

        let err = client.get::<Value>("things", options).await.unwrap_err();

        assert!(err.is_session_expired(), "code {code}");
        assert_eq!(err.to_string(), "Session expired, please login again");
        assert_eq!(client.session().auth_token(), None);
        assert_eq!(client.session().users().userinfo(), None);
        assert_eq!(platform.navigator.assignments(), vec!["/login"]);
        assert!(platform.notifier.errors().is_empty());
    }
}

#[tokio::test]
async fn envelope_failure_notifies_and_rejects_with_server_message() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/things")
        .with_status(200)
        .with_body(json!({"code": 500, "errMsg": "boom"}).to_string())
        .create_async()
        .await;

    let platform = MemoryPlatform::default();
    let client = client_for(&server.url(), &platform);
    let err = client
        .get::<Value>("things", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "boom");
    assert_eq!(err.code(), Some(500));
    assert_eq!(platform.notifier.errors(), vec!["boom"]);
    assert!(platform.navigator.assignments().is_empty());
}

#[tokio::test]
async fn silenced_failure_is_not_notified() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/things")
        .with_status(200)
        .with_body(json!({"code": 500, "errMsg": "boom"}).to_string())
        .create_async()
        .await;

    let platform = MemoryPlatform::default();
    let client = client_for(&server.url(), &platform);
    let err = client
        .get::<Value>("things", RequestOptions::SILENT)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "boom");
    assert!(platform.notifier.errors().is_empty());
}

#[tokio::test]
async fn http_unauthorized_expires_the_session() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/things")
        .with_status(401)
        .create_async()
        .await;

    let platform = MemoryPlatform::at("/dashboard");
    let client = client_for(&server.url(), &platform);
    client.session().auth().set_tokens(AuthToken::single("t"));

    let err = client
        .get::<Value>("things", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(client.session().auth_token(), None);
    assert_eq!(platform.navigator.assignments(), vec!["/login"]);
}

#[tokio::test]
async fn server_error_without_envelope_rejects_with_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/things")
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let platform = MemoryPlatform::default();
    let client = client_for(&server.url(), &platform);
    let err = client
        .get::<Value>("things", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    assert!(platform.navigator.assignments().is_empty());
}

#[tokio::test]
async fn error_status_ignores_success_envelope() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/things")
        .with_status(502)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":200,"data":5}"#)
        .create_async()
        .await;

    let platform = MemoryPlatform::default();
    let client = client_for(&server.url(), &platform);
    let err = client
        .get::<Value>("things", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
}

#[tokio::test]
async fn error_status_with_error_envelope_is_not_notified() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/things")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":500,"errMsg":"boom"}"#)
        .create_async()
        .await;

    let platform = MemoryPlatform::default();
    let client = client_for(&server.url(), &platform);
    let err = client
        .get::<Value>("things", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.code(), None);
    assert!(platform.notifier.errors().is_empty());
}

#[tokio::test]
async fn session_code_under_error_status_keeps_the_session() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/things")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":4401,"errMsg":"expired"}"#)
        .create_async()
        .await;

    let platform = MemoryPlatform::at("/dashboard");
    let client = client_for(&server.url(), &platform);
    client.session().auth().set_tokens(AuthToken::single("t"));

    let err = client
        .get::<Value>("things", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(client.session().auth_token().as_deref(), Some("t"));
    assert!(platform.navigator.assignments().is_empty());
}

#[tokio::test]
async fn bearer_token_is_attached_when_present() {
    let mut server = Server::new_async().await;
    let with_token = server
        .mock("GET", "/api/v1/things")
        .match_header("authorization", "Bearer abc")
        .with_status(200)
        .with_body(detail(json!(true)))
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    client.session().auth().set_tokens(AuthToken::single("abc"));
    let ok: bool = client.get("things", RequestOptions::default()).await.unwrap();

    assert!(ok);
    with_token.assert_async().await;
}

#[tokio::test]
async fn no_authorization_header_without_token() {
    let mut server = Server::new_async().await;
    let anonymous = server
        .mock("GET", "/api/v1/things")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(detail(json!(null)))
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let value: Value = client.get("things", RequestOptions::default()).await.unwrap();

    assert_eq!(value, Value::Null);
    anonymous.assert_async().await;
}

#[tokio::test]
async fn concurrent_user_fetches_share_one_request() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/api/v1/users/fetch")
        .with_status(200)
        .with_body(detail(json!({"name": "ada"})))
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let (a, b) = tokio::join!(client.fetch_user_info(), client.fetch_user_info());
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(client.pending_requests(), 0);

    // settled: the next call goes to the network again
    client.fetch_user_info().await.unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn shared_failure_reaches_every_caller() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/api/v1/users/fetch")
        .with_status(200)
        .with_body(json!({"code": 4001, "errMsg": "no session"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let platform = MemoryPlatform::default();
    let client = client_for(&server.url(), &platform);
    let (a, b) = tokio::join!(client.fetch_user_info(), client.fetch_user_info());

    assert_eq!(a.unwrap_err().to_string(), "no session");
    assert_eq!(b.unwrap_err().to_string(), "no session");
    assert!(platform.notifier.errors().is_empty());
    m.assert_async().await;
}

#[tokio::test]
async fn update_user_info_puts_and_notifies_failures() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("PUT", "/api/v1/users/u-1")
        .match_body(Matcher::Json(json!({"fullName": "Ada Lovelace"})))
        .with_status(200)
        .with_body(json!({"code": 4220, "errMsg": "email taken"}).to_string())
        .create_async()
        .await;

    let platform = MemoryPlatform::default();
    let client = client_for(&server.url(), &platform);
    let update = UpdateUserRequest {
        full_name: Some("Ada Lovelace".into()),
        ..Default::default()
    };
    let err = client.update_user_info("u-1", &update).await.unwrap_err();

    assert_eq!(err.to_string(), "email taken");
    assert_eq!(platform.notifier.errors(), vec!["email taken"]);
    m.assert_async().await;
}

#[tokio::test]
async fn sign_out_clears_local_state_even_on_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/users/logout")
        .with_status(200)
        .with_body(json!({"code": 500, "errMsg": "logout failed"}).to_string())
        .create_async()
        .await;

    let platform = MemoryPlatform::default();
    let client = client_for(&server.url(), &platform);
    client.session().auth().set_tokens(AuthToken::single("t"));
    client.session().auth().mark_initialized();

    assert!(client.sign_out().await.is_err());
    assert!(!client.session().is_authenticated());
    assert!(platform.notifier.errors().is_empty());
}

#[tokio::test]
async fn invite_and_issue_endpoints() {
    let mut server = Server::new_async().await;
    let invite = server
        .mock("POST", "/api/v1/users/invite")
        .match_body(Matcher::Json(json!({"email": "grace@example.com"})))
        .with_status(200)
        .with_body(detail(json!({"invited": true})))
        .create_async()
        .await;
    let issue = server
        .mock("POST", "/api/v1/issue/create")
        .match_body(Matcher::Json(json!({"title": "t", "description": "d"})))
        .with_status(200)
        .with_body(detail(json!({"issueUrl": "https://tracker/1", "issueNumber": 1})))
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let invited = client
        .invite_user(&InviteUserRequest {
            email: "grace@example.com".into(),
            role: None,
        })
        .await
        .unwrap();
    let created = client
        .create_issue(&CreateIssueRequest {
            title: "t".into(),
            description: "d".into(),
        })
        .await
        .unwrap();

    assert_eq!(invited, json!({"invited": true}));
    assert_eq!(
        created,
        CreateIssueResponse {
            issue_url: "https://tracker/1".into(),
            issue_number: 1,
        }
    );
    invite.assert_async().await;
    issue.assert_async().await;
}

#[tokio::test]
async fn avatar_upload_is_multipart() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/api/v1/users/fetch/avatar")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".into()),
        )
        .match_body(Matcher::Regex(r#"name="file"; filename="me.png""#.into()))
        .with_status(200)
        .with_body(detail(json!({"url": "https://cdn/me.png"})))
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    let uploaded = client
        .upload_avatar("me.png", b"avatar-bytes".to_vec())
        .await
        .unwrap();

    assert_eq!(uploaded.url, "https://cdn/me.png");
    m.assert_async().await;
}

#[tokio::test]
async fn version_info_reads_wrapped_and_raw_bodies() {
    let mut server = Server::new_async().await;
    let wrapped = server
        .mock("GET", "/api/v1/version")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(json!({"code": 200, "data": {"version": "1.4.0", "gitBranch": "main"}}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server.url(), &MemoryPlatform::default());
    client.session().auth().set_tokens(AuthToken::single("t"));
    let info = client.version_info().await.unwrap();
    assert_eq!(info.version, "1.4.0");
    assert_eq!(info.git_branch, "main");
    wrapped.assert_async().await;
    wrapped.remove_async().await;

    server
        .mock("GET", "/api/v1/version")
        .with_status(200)
        .with_body(json!({"version": "1.5.0"}).to_string())
        .create_async()
        .await;
    assert_eq!(client.version_info().await.unwrap().version, "1.5.0");
}

#[tokio::test]
async fn version_failure_has_no_session_side_effects() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/version")
        .with_status(401)
        .create_async()
        .await;

    let platform = MemoryPlatform::default();
    let client = client_for(&server.url(), &platform);
    client.session().auth().set_tokens(AuthToken::single("t"));

    let err = client.version_info().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(client.session().auth_token().as_deref(), Some("t"));
    assert!(platform.navigator.assignments().is_empty());
}

#[tokio::test]
async fn base_url_is_normalised() {
    let platform = MemoryPlatform::default();
    let config = ClientConfig {
        api_client_url: Some("backend.example.com/api/v1/".into()),
        ..ClientConfig::default()
    };
    let client = ConsoleClient::new(&config, Session::new(), platform.platform()).unwrap();
    assert_eq!(client.base_url(), "https://backend.example.com/api/v1");

    let proxied = ConsoleClient::new(&ClientConfig::default(), Session::new(), platform.platform())
        .unwrap();
    assert_eq!(proxied.base_url(), "http://localhost:5173/api/v1");
    assert_eq!(proxied.api_url("/users/fetch"), "http://localhost:5173/api/v1/users/fetch");
}
