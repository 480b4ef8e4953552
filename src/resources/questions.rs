use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::request::RequestConfig;
use crate::types::RecordId;

/// Q&A moderation.
pub struct Questions<'a> {
    client: &'a ApiClient,
}

impl<'a> Questions<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn delete(&self, question_id: &RecordId) -> ApiResponse {
        self.client
            .remove(
                &format!("api/questions/{}", question_id.as_segment()),
                RequestConfig::new(),
            )
            .await
    }

    /// Delete the answer to `question_id` created at `created_at`.
    pub async fn delete_answer(&self, question_id: &RecordId, created_at: &str) -> ApiResponse {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("createdAt", created_at)
            .finish();
        self.client
            .remove(
                &format!("api/questions/{}/answers?{query}", question_id.as_segment()),
                RequestConfig::new(),
            )
            .await
    }
}
