//! HTTP client for the learning-path content API

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ContentError;
use super::loader::ContentSource;
use super::model::{Difficulty, Module, RawModule, keep_valid};
use crate::authoring::AdminApi;

/// A file to send to the upload endpoint
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// File name reported to the server
    pub file_name: String,
    /// MIME type, if known
    pub mime: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

/// Response of the upload endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(deserialize_with = "id_to_string")]
    pub id: String,
    pub file_url: String,
    pub size: u64,
}

fn id_to_string<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unexpected file id {other}"))),
    }
}

/// Body for module create/update requests
#[derive(Debug, Serialize)]
struct ModulePayload<'a> {
    id: &'a str,
    module: &'a Module,
}

/// Body for file delete requests
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteFilePayload<'a> {
    file_url: &'a str,
}

/// Content API client
pub struct ApiClient {
    /// HTTP client
    client: Client,
    /// Base URL without trailing slash, e.g. `http://localhost:5000`
    base_url: String,
}

impl ApiClient {
    /// Create a new client for the API at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ContentError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn modules_url(&self, difficulty: Difficulty) -> String {
        self.url(&format!("/api/admin/learning-paths/{}/modules", difficulty.as_str()))
    }

    /// Fetch the raw modules of a learning path
    pub async fn fetch_learning_path(
        &self,
        difficulty: Difficulty,
    ) -> Result<Vec<RawModule>, ContentError> {
        let url = self.url(&format!("/api/learning-paths/{}", difficulty.as_str()));
        tracing::debug!(%url, "fetching learning path");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_path_response(status, &body)
    }

    /// Create or update a module
    pub async fn save_module(
        &self,
        difficulty: Difficulty,
        module: &Module,
        is_new: bool,
    ) -> Result<(), ContentError> {
        let payload = ModulePayload { id: &module.id, module };
        let request = if is_new {
            self.client.post(self.modules_url(difficulty))
        } else {
            self.client.put(self.modules_url(difficulty))
        };

        let response = request.json(&payload).send().await?;
        check_status(response).await.map(|_| ())
    }

    /// Delete a module
    pub async fn delete_module(
        &self,
        difficulty: Difficulty,
        module_id: &str,
    ) -> Result<(), ContentError> {
        let url = format!("{}/{}", self.modules_url(difficulty), module_id);
        let response = self.client.delete(url).send().await?;
        check_status(response).await.map(|_| ())
    }

    /// Upload a lesson or question media file
    pub async fn upload_file(&self, upload: FileUpload) -> Result<UploadedFile, ContentError> {
        let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(mime) = upload.mime.as_deref() {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part("file", part);

        let response = self.client.post(self.url("/api/admin/upload")).multipart(form).send().await?;
        let body = check_status(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Delete a previously uploaded file
    pub async fn delete_file(&self, file_url: &str) -> Result<(), ContentError> {
        let response = self
            .client
            .post(self.url("/api/admin/delete-file"))
            .json(&DeleteFilePayload { file_url })
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }
}

/// Turn a non-success status into an `ApiError`, returning the body otherwise
async fn check_status(response: reqwest::Response) -> Result<String, ContentError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status.is_success() {
        Ok(body)
    } else {
        Err(ContentError::ApiError { status: status.as_u16(), message: error_message(&body) })
    }
}

/// Pull a `message` field out of an error body, or fall back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Interpret the status and body of a learning-path response
///
/// A 403, or a body of the form `{"error": true, "is_active": false}`, means
/// the path is deactivated. A JSON array is the module list; entries that
/// cannot be read as modules are skipped.
pub fn interpret_path_response(
    status: StatusCode,
    body: &str,
) -> Result<Vec<RawModule>, ContentError> {
    if status == StatusCode::FORBIDDEN {
        let mut message = error_message(body);
        if message.is_empty() {
            message = "This learning path has been deactivated".to_string();
        }
        return Err(ContentError::Deactivated { message });
    }

    if !status.is_success() {
        return Err(ContentError::ApiError { status: status.as_u16(), message: error_message(body) });
    }

    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Array(items) => Ok(keep_valid(items)),
        Value::Object(ref map) => {
            let flagged = map.get("error").and_then(Value::as_bool).unwrap_or(false);
            let inactive = map.get("is_active").and_then(Value::as_bool) == Some(false);
            if flagged && inactive {
                Err(ContentError::Deactivated { message: error_message(body) })
            } else {
                Err(ContentError::UnexpectedResponse("expected a module array".to_string()))
            }
        }
        _ => Err(ContentError::UnexpectedResponse("expected a module array".to_string())),
    }
}

impl ContentSource for ApiClient {
    async fn fetch_path(&self, difficulty: Difficulty) -> Result<Vec<RawModule>, ContentError> {
        self.fetch_learning_path(difficulty).await
    }
}

impl AdminApi for ApiClient {
    async fn save_module(
        &self,
        difficulty: Difficulty,
        module: &Module,
        is_new: bool,
    ) -> Result<(), ContentError> {
        ApiClient::save_module(self, difficulty, module, is_new).await
    }

    async fn delete_module(
        &self,
        difficulty: Difficulty,
        module_id: &str,
    ) -> Result<(), ContentError> {
        ApiClient::delete_module(self, difficulty, module_id).await
    }

    async fn upload_file(&self, upload: FileUpload) -> Result<UploadedFile, ContentError> {
        ApiClient::upload_file(self, upload).await
    }

    async fn delete_file(&self, file_url: &str) -> Result<(), ContentError> {
        ApiClient::delete_file(self, file_url).await
    }
}
