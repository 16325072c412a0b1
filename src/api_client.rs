// src/api_client.rs

use async_trait::async_trait;
use reqwest::{Client, StatusCode, multipart};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::models::{CategoryRecord, ProductRecord, UpdateProductPayload, UploadImageResponse};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The upstream answered with a non-success status. `message` carries the
    /// structured message from the response body when one was present.
    #[error("upstream returned status {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// The request never produced an upstream response.
    #[error("request to catalog API failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Message shown to the user: the server-supplied message when present,
    /// otherwise the generic error string.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Status { status, .. } => format!("Request failed with status {}", status),
            ApiError::Transport(message) => message.clone(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Pulls the structured message out of an upstream error body. The backend
/// reports either `{"message": ...}` or `{"error": ...}`.
fn extract_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let message = match response.json::<Value>().await {
        Ok(body) => extract_message(&body),
        Err(_) => None,
    };
    ApiError::Status { status, message }
}

/// The four operations this screen consumes. Object-safe so handlers and
/// tests can swap in a scripted implementation.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn get_product(&self, product_id: &str) -> Result<ProductRecord, ApiError>;

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, ApiError>;

    async fn update_product(&self, payload: &UpdateProductPayload) -> Result<(), ApiError>;

    async fn upload_image(
        &self,
        filename: String,
        bytes: Vec<u8>,
    ) -> Result<UploadImageResponse, ApiError>;
}

/// `CatalogApi` over HTTP against the configured upstream origin.
#[derive(Clone)]
pub struct HttpCatalogApi {
    client: Client,
    origin: Url,
}

impl HttpCatalogApi {
    pub fn new(client: Client, origin: Url) -> Self {
        HttpCatalogApi { client, origin }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.origin
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid upstream path '{}': {}", path, e)))
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn get_product(&self, product_id: &str) -> Result<ProductRecord, ApiError> {
        let url = self.endpoint(&format!("/api/products/{}", product_id))?;
        let response = self.client.get(url).send().await?;
        if response.status().is_success() {
            Ok(response.json::<ProductRecord>().await?)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, ApiError> {
        let url = self.endpoint("/api/categories")?;
        let response = self.client.get(url).send().await?;
        if response.status().is_success() {
            Ok(response.json::<Vec<CategoryRecord>>().await?)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn update_product(&self, payload: &UpdateProductPayload) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/api/products/{}", payload.product_id))?;
        let response = self.client.post(url).json(payload).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn upload_image(
        &self,
        filename: String,
        bytes: Vec<u8>,
    ) -> Result<UploadImageResponse, ApiError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("image/*")
            .map_err(|e| {
                tracing::error!("Failed to set MIME type on upload part: {}", e);
                ApiError::Transport("could not prepare the upload request".to_string())
            })?;
        let form = multipart::Form::new().part("image", part);

        let url = self.endpoint("/upload")?;
        let response = self.client.post(url).multipart(form).send().await?;
        if response.status().is_success() {
            Ok(response.json::<UploadImageResponse>().await?)
        } else {
            Err(error_from_response(response).await)
        }
    }
}
