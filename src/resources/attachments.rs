use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::request::{RequestConfig, UploadForm};

/// File attachments.
pub struct Attachments<'a> {
    client: &'a ApiClient,
}

impl<'a> Attachments<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Sent as `multipart/form-data`.
    pub async fn upload(&self, form: UploadForm) -> ApiResponse {
        self.client
            .post("/attachment/upload", form, RequestConfig::new())
            .await
    }
}
