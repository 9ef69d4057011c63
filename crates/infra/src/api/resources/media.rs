//! Media library and uploads

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use mentiq_domain::types::media::{file_extension, mime_for, upload_file_name};
use mentiq_domain::utils::payload::normalize_list;
use mentiq_domain::{MediaCategory, MediaKind, UploadedMedia};
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::segment;
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::request::MultipartForm;

/// `/v1/media/*`
#[derive(Debug, Clone)]
pub struct MediaApi {
    client: ApiClient,
}

impl MediaApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<UploadedMedia>, ApiError> {
        let raw: Value = self.client.get("/v1/media/").await?;
        Ok(normalize_list(&raw, UploadedMedia::from_payload))
    }

    /// Upload a prepared multipart form
    pub async fn upload(&self, form: MultipartForm) -> Result<UploadedMedia, ApiError> {
        let raw: Value = self.client.upload("/v1/media/upload/", form).await?;
        Ok(UploadedMedia::from_payload(&raw))
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: Value = self.client.delete(&format!("/v1/media/{}/", segment(id))).await?;
        Ok(())
    }

    /// Upload a local file and return its public URL
    ///
    /// The URL is empty when the backend did not report one.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        kind: MediaKind,
        category: MediaCategory,
    ) -> Result<String, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let form = upload_form(path, bytes, kind, category, unix_millis());
        debug!(size = form.len(), "uploading media");

        let uploaded = self.upload(form).await?;
        info!(%category, %kind, "media uploaded");
        Ok(uploaded.url)
    }
}

/// Multipart form with `file`, `category` and `type` parts
pub fn upload_form(
    path: &Path,
    bytes: Vec<u8>,
    kind: MediaKind,
    category: MediaCategory,
    unix_millis: u128,
) -> MultipartForm {
    let extension = file_extension(path);
    let mime = mime_for(&extension, kind);
    let file_name = upload_file_name(category, unix_millis, &extension);

    MultipartForm::new()
        .file("file", file_name, mime, bytes)
        .text("category", category.as_str())
        .text("type", kind.as_str())
}

fn unix_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|elapsed| elapsed.as_millis()).unwrap_or(0)
}
