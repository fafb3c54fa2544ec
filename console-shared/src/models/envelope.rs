use serde::{Deserialize, Serialize};

/// Envelope code the backend uses for a successful call.
pub const SUCCESS_CODE: i64 = 200;

/// The `{code, detail | data, errMsg}` wrapper every backend response uses.
///
/// Two payload field names are in circulation; `detail` wins when both are
/// present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    /// Application-level status code, `200` on success.
    pub code: i64,

    /// Payload, newer API shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<T>,

    /// Payload, older API shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Server-provided error message for non-success codes.
    #[serde(
        default,
        rename = "errMsg",
        skip_serializing_if = "Option::is_none"
    )]
    pub err_msg: Option<String>,
}

impl<T> Envelope<T> {
    /// Wraps a payload in a successful envelope using the `detail` field.
    pub fn success(payload: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            detail: Some(payload),
            data: None,
            err_msg: None,
        }
    }

    /// Builds a failed envelope carrying `message`.
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            detail: None,
            data: None,
            err_msg: Some(message.into()),
        }
    }

    /// Whether the envelope reports success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Consumes the envelope and returns its payload, `detail` first.
    pub fn into_payload(self) -> Option<T> {
        self.detail.or(self.data)
    }
}
