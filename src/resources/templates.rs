use serde_json::json;

use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::request::{RequestBody, RequestConfig};
use crate::types::{PageQuery, RecordId};

/// Product templates are listed three per page.
const PRODUCT_TEMPLATES_PER_PAGE: u32 = 3;

/// SMS and product templates.
pub struct Templates<'a> {
    client: &'a ApiClient,
}

impl<'a> Templates<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn sms(&self) -> ApiResponse {
        self.client.get("/template/sms", RequestConfig::new()).await
    }

    pub async fn update_sms(&self, template_id: &RecordId, body: &str) -> ApiResponse {
        self.client
            .patch(
                &format!("/template/sms/{}", template_id.as_segment()),
                json!({ "body": body }),
                RequestConfig::new(),
            )
            .await
    }

    pub async fn product_templates(&self, page: u32) -> ApiResponse {
        let query = PageQuery::new(page, PRODUCT_TEMPLATES_PER_PAGE);
        self.client
            .get(
                &query.append_to("/template/product/printify"),
                RequestConfig::new(),
            )
            .await
    }

    /// Make `product_id` the default product template.
    pub async fn set_default_product(&self, product_id: &RecordId) -> ApiResponse {
        self.client
            .patch(
                &format!("/template/product/{}", product_id.as_segment()),
                RequestBody::Empty,
                RequestConfig::new(),
            )
            .await
    }

    pub async fn month_templates(&self) -> ApiResponse {
        self.client
            .get("/template/product/month", RequestConfig::new())
            .await
    }
}
