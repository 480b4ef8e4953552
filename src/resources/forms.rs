use serde_json::json;

use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::request::{RequestBody, RequestConfig};
use crate::types::{PageQuery, RecordId};

/// Intake forms and the responses submitted through them.
pub struct Forms<'a> {
    client: &'a ApiClient,
}

impl<'a> Forms<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResponse {
        self.client
            .get("/dashboard/forms", RequestConfig::new())
            .await
    }

    /// Responses to `form_id`, optionally filtered by `query.status`.
    pub async fn responses(&self, form_id: &RecordId, query: &PageQuery) -> ApiResponse {
        let path = query.append_to(&format!(
            "/dashboard/forms/{}/responses",
            form_id.as_segment()
        ));
        self.client.get(&path, RequestConfig::new()).await
    }

    pub async fn response(&self, response_id: &RecordId) -> ApiResponse {
        self.client
            .get(
                &format!("/dashboard/forms/responses/{}", response_id.as_segment()),
                RequestConfig::new(),
            )
            .await
    }

    /// Proxy an image attached to a response through the API.
    pub async fn fetch_image(&self, url: &str) -> ApiResponse {
        self.client
            .post(
                "dashboard/forms/responses/fetch-image",
                json!({ "url": url }),
                RequestConfig::new(),
            )
            .await
    }

    pub async fn confirm(&self, response_id: &RecordId) -> ApiResponse {
        self.client
            .patch(
                &format!(
                    "/dashboard/forms/responses/{}/confirm",
                    response_id.as_segment()
                ),
                RequestBody::Empty,
                RequestConfig::new(),
            )
            .await
    }

    /// Mark a response as inappropriate.
    pub async fn hide(&self, response_id: &RecordId) -> ApiResponse {
        self.client
            .patch(
                &format!("dashboard/forms/responses/{}/hide", response_id.as_segment()),
                RequestBody::Empty,
                RequestConfig::new(),
            )
            .await
    }
}
