use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio_util::sync::CancellationToken;

use crate::error::Error;

pub(crate) const APPLICATION_JSON: &str = "application/json";
pub(crate) const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Per-request overrides.
///
/// ```rust,ignore
/// let cancel = CancellationToken::new();
/// let config = RequestConfig::new()
///     .with_header(HeaderName::from_static("x-trace"), HeaderValue::from_static("1"))
///     .with_cancellation(cancel.clone());
/// let res = client.get("contacts", config).await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub(crate) headers: HeaderMap,
    pub(crate) timeout: Option<Duration>,
    pub(crate) cancel: Option<CancellationToken>,
}

impl RequestConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header. Applied last, so it wins over the client's own headers.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Override the client-wide timeout for this request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Abort this request when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Request body.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(JsonValue),
    Multipart(UploadForm),
}

impl RequestBody {
    /// Serialize `value` as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if `value` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }
}

impl From<JsonValue> for RequestBody {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl From<UploadForm> for RequestBody {
    fn from(form: UploadForm) -> Self {
        Self::Multipart(form)
    }
}

/// Multipart form that can be sent more than once.
///
/// `reqwest`'s own form is consumed on send; this one is rebuilt for every
/// attempt so a refreshed request can be replayed.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    parts: Vec<(String, UploadPart)>,
}

#[derive(Debug, Clone)]
enum UploadPart {
    Text(String),
    File {
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

impl UploadForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), UploadPart::Text(value.into())));
        self
    }

    /// Add a file field.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.parts.push((
            name.into(),
            UploadPart::File {
                file_name: file_name.into(),
                mime: None,
                bytes: bytes.into(),
            },
        ));
        self
    }

    /// Add a file field with an explicit MIME type (e.g. `image/png`).
    #[must_use]
    pub fn file_with_mime(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.parts.push((
            name.into(),
            UploadPart::File {
                file_name: file_name.into(),
                mime: Some(mime.into()),
                bytes: bytes.into(),
            },
        ));
        self
    }

    pub(crate) fn to_form(&self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for (name, part) in &self.parts {
            form = match part {
                UploadPart::Text(value) => form.text(name.clone(), value.clone()),
                UploadPart::File {
                    file_name,
                    mime,
                    bytes,
                } => {
                    let mut part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                    if let Some(mime) = mime {
                        part = part.mime_str(mime)?;
                    }
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}
