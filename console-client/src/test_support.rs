use crate::{ConsoleClient, Session, platform::memory::MemoryPlatform};
use shared::config::ClientConfig;

/// Client pointed at a mock server, with in-memory host services.
pub fn client_for(server_url: &str, platform: &MemoryPlatform) -> ConsoleClient {
    let config = ClientConfig {
        api_client_url: Some(format!("{server_url}/api/v1")),
        app_origin: server_url.to_string(),
        dev_mode: true,
        ..ClientConfig::default()
    };
    ConsoleClient::new(&config, Session::new(), platform.platform()).unwrap()
}

/// Success envelope with the payload under `detail`.
pub fn detail(payload: serde_json::Value) -> String {
    serde_json::json!({"code": 200, "detail": payload}).to_string()
}
