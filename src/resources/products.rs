use serde::Serialize;

use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::request::{RequestBody, RequestConfig, UploadForm};
use crate::types::RecordId;

/// Product-link message for a lead.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLink {
    pub lead_id: RecordId,
    pub product_link: String,
    /// Send now instead of at the scheduled time.
    pub immediate: bool,
    pub phone_number: String,
}

/// Product generation from form responses.
pub struct Products<'a> {
    client: &'a ApiClient,
}

impl<'a> Products<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Duplicate the template product with the response's cover and calendar images.
    ///
    /// Sent as `multipart/form-data`.
    pub async fn duplicate_printify_product(
        &self,
        response_id: &RecordId,
        title: &str,
        cover: (&str, Vec<u8>),
        calendar: (&str, Vec<u8>),
    ) -> ApiResponse {
        let form = UploadForm::new()
            .text("responseId", response_id.to_string())
            .text("title", title)
            .file("coverPhoto", cover.0, cover.1)
            // The server reads this field name as spelled.
            .file("calenderPhoto", calendar.0, calendar.1);
        self.client
            .post(
                "/product/duplicatePrintifyProduct",
                form,
                RequestConfig::new(),
            )
            .await
    }

    pub async fn send_product_link(&self, link: &ProductLink) -> ApiResponse {
        let body = match RequestBody::json(link) {
            Ok(body) => body,
            Err(e) => return ApiResponse::transport(e.to_string()),
        };
        self.client
            .post("/product/sendProductLink", body, RequestConfig::new())
            .await
    }
}
