// src/state.rs

use std::sync::Arc;

use reqwest::Client;
use url::Url;

use crate::api_client::CatalogApi;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CatalogApi>,
    pub http: Client,
    pub upstream: UpstreamConfig,
}

#[derive(Clone)]
pub struct UpstreamConfig {
    pub origin: Url,
}
