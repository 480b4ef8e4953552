use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Status reported when no HTTP status exists (connect error, timeout, cancellation).
pub const NO_STATUS: i32 = -1;

/// Message used in failure envelopes when the server gave none.
pub const FALLBACK_MESSAGE: &str = "Sorry, something went wrong. Please try again later.";

/// Message used in notifications when the server gave none.
pub const NOTICE_FALLBACK: &str = "Something went wrong. Please try again later.";

/// Uniform result of every client operation.
///
/// `success` is true iff the HTTP status was 2xx and `data` decoded. Failures carry a
/// non-empty `message`; `status` is [`NO_STATUS`] when the request never got
/// an HTTP response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = JsonValue> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub status: i32,
}

impl<T> ApiResponse<T> {
    /// Build a failure envelope; an empty `message` is replaced by the fallback.
    #[must_use]
    pub fn failure(status: i32, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            data: None,
            message: if message.is_empty() {
                FALLBACK_MESSAGE.to_owned()
            } else {
                message
            },
            status,
        }
    }

    /// Failure without an HTTP status.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::failure(NO_STATUS, message)
    }

    /// Borrow the payload when the call succeeded.
    #[must_use]
    pub fn ok(&self) -> Option<&T> {
        if self.success { self.data.as_ref() } else { None }
    }

    /// Map the payload, keeping status and message.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
            status: self.status,
        }
    }
}

/// Wire shape of a response body: `{ data, message }`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Payload {
    #[serde(default)]
    pub(crate) data: Option<JsonValue>,
    #[serde(default)]
    pub(crate) message: Option<String>,
    /// Token refresh replies nest their pair here instead of under `data`.
    #[serde(default, rename = "responseData")]
    pub(crate) response_data: Option<JsonValue>,
}

impl Payload {
    /// Parse a body leniently: empty or non-JSON bodies yield an empty payload.
    pub(crate) fn parse(body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::default();
        }
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub(crate) fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    /// Envelope for a 2xx response.
    pub(crate) fn into_success<T: DeserializeOwned>(self, status: u16) -> ApiResponse<T> {
        let message = self.message.unwrap_or_default();
        let data = match self.data {
            None | Some(JsonValue::Null) => None,
            Some(value) => match serde_json::from_value(value) {
                Ok(data) => Some(data),
                Err(e) => {
                    tracing::warn!(status, error = %e, "Undecodable response payload");
                    return ApiResponse::failure(
                        i32::from(status),
                        format!("Failed to decode response: {e}"),
                    );
                }
            },
        };
        ApiResponse {
            success: true,
            data,
            message,
            status: i32::from(status),
        }
    }

    /// Envelope for a non-2xx response.
    pub(crate) fn into_failure<T>(self, status: u16) -> ApiResponse<T> {
        ApiResponse::failure(i32::from(status), self.message.unwrap_or_default())
    }
}
