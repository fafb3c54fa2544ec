//! Version endpoint, served from the application origin.

use super::{ConsoleClient, decode, dedupe::request_key};
use crate::error::ClientError;
use serde_json::Value;
use shared::models::{SUCCESS_CODE, VersionInfo};
use tracing::debug;

impl ConsoleClient {
    /// Build information of the backend.
    ///
    /// Goes through its own client without the session token or the
    /// envelope side effects. Concurrent calls share one request.
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses and undecodable bodies.
    pub async fn version_info(&self) -> Result<VersionInfo, ClientError> {
        let url = self.version_url.clone();
        let client = self.version_client.clone();
        let key = request_key(url.path(), None);
        let value = self
            .pending
            .run(key, move || async move {
                debug!(%url, "fetching version info");
                let response = client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ClientError::Status(status));
                }
                let body: Value = serde_json::from_slice(&response.bytes().await?)?;
                Ok::<_, ClientError>(version_payload(body))
            })
            .await?;
        decode(value)
    }
}

/// `{code: 200, data}` unwraps to `data`; any other body is the payload.
fn version_payload(body: Value) -> Value {
    let wrapped = body.get("code").and_then(Value::as_i64) == Some(SUCCESS_CODE)
        && body.get("data").is_some_and(|data| !data.is_null());
    match body {
        Value::Object(mut map) if wrapped => map.remove("data").unwrap_or_default(),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrapped_body_is_unwrapped() {
        assert_eq!(
            version_payload(json!({"code": 200, "data": {"version": "1.2.0"}})),
            json!({"version": "1.2.0"})
        );
    }

    #[test]
    fn raw_body_is_kept() {
        let raw = json!({"version": "1.2.0", "gitBranch": "main"});
        assert_eq!(version_payload(raw.clone()), raw);
        let failed = json!({"code": 500, "data": {"version": "x"}});
        assert_eq!(version_payload(failed.clone()), failed);
    }
}
