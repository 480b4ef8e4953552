use serde_json::Value as JsonValue;

use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::request::RequestConfig;
use crate::types::{PageQuery, RecordId};

/// CRUD endpoints of one record collection (`players`, `contacts`, ...).
///
/// `GET {base}?page&perPage`, `GET {base}/{id}`, `POST {base}`,
/// `PUT {base}/{id}`, `DELETE {base}/{id}`.
pub struct Collection<'a> {
    client: &'a ApiClient,
    base: &'static str,
    per_page: u32,
}

impl<'a> Collection<'a> {
    pub(crate) fn new(client: &'a ApiClient, base: &'static str, per_page: u32) -> Self {
        Self {
            client,
            base,
            per_page,
        }
    }

    /// Path of the collection relative to the base URL.
    #[must_use]
    pub fn base(&self) -> &'static str {
        self.base
    }

    /// Page size used by [`page`](Self::page).
    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Page `page` at the collection's default page size.
    pub async fn page(&self, page: u32) -> ApiResponse {
        self.list(&PageQuery::new(page, self.per_page)).await
    }

    /// One page of records. `status` and `category` filters are forwarded when set.
    pub async fn list(&self, query: &PageQuery) -> ApiResponse {
        self.client
            .get(&query.append_to(self.base), RequestConfig::new())
            .await
    }

    pub async fn get(&self, id: &RecordId) -> ApiResponse {
        self.client
            .get(&self.item(id), RequestConfig::new())
            .await
    }

    pub async fn create(&self, record: JsonValue) -> ApiResponse {
        self.client
            .post(self.base, record, RequestConfig::new())
            .await
    }

    /// Replace a record.
    pub async fn update(&self, id: &RecordId, record: JsonValue) -> ApiResponse {
        self.client
            .put(&self.item(id), record, RequestConfig::new())
            .await
    }

    pub async fn delete(&self, id: &RecordId) -> ApiResponse {
        self.client
            .remove(&self.item(id), RequestConfig::new())
            .await
    }

    fn item(&self, id: &RecordId) -> String {
        format!("{}/{}", self.base, id.as_segment())
    }
}
