use serde_json::json;

use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::request::RequestConfig;

/// WhatsApp messaging.
pub struct WhatsApp<'a> {
    client: &'a ApiClient,
}

impl<'a> WhatsApp<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Inbound replies, newest first. This endpoint pages with `limit`, not `perPage`.
    pub async fn replies(&self, page: u32, limit: u32) -> ApiResponse {
        self.client
            .get(
                &format!("/whatsapp/replies?page={page}&limit={limit}"),
                RequestConfig::new(),
            )
            .await
    }

    /// Broadcast `body_text` to `numbers`.
    pub async fn send(&self, numbers: &[String], body_text: &str) -> ApiResponse {
        self.client
            .post(
                "/whatsapp/send",
                json!({ "numbers": numbers, "bodyText": body_text }),
                RequestConfig::new(),
            )
            .await
    }
}
