use serde_json::{Value as JsonValue, json};

use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::request::{RequestConfig, UploadForm};

/// Signed-in admin profile and settings.
pub struct Admin<'a> {
    client: &'a ApiClient,
}

impl<'a> Admin<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn profile(&self) -> ApiResponse {
        self.client.get("/admin", RequestConfig::new()).await
    }

    /// Patch profile fields.
    pub async fn update_profile(&self, fields: JsonValue) -> ApiResponse {
        self.client
            .patch("/admin/", fields, RequestConfig::new())
            .await
    }

    pub async fn update_password(&self, old_password: &str, new_password: &str) -> ApiResponse {
        self.client
            .patch(
                "/admin/password",
                // Wire key is misspelled server-side.
                json!({ "oldPaasword": old_password, "newPassword": new_password }),
                RequestConfig::new(),
            )
            .await
    }

    /// Sent as `multipart/form-data`.
    pub async fn upload_profile_image(&self, form: UploadForm) -> ApiResponse {
        self.client
            .post("me/profileImage", form, RequestConfig::new())
            .await
    }
}
