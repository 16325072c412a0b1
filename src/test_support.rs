// src/test_support.rs
//
// Scripted stand-in for the upstream catalog API. Responses are queued per
// operation and popped in call order; calls are recorded for assertions.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api_client::{ApiError, CatalogApi};
use crate::models::{CategoryRecord, ProductRecord, UpdateProductPayload, UploadImageResponse};

#[derive(Default)]
pub struct ScriptedApi {
    product_responses: Mutex<VecDeque<Result<ProductRecord, ApiError>>>,
    category_responses: Mutex<VecDeque<Result<Vec<CategoryRecord>, ApiError>>>,
    update_responses: Mutex<VecDeque<Result<(), ApiError>>>,
    upload_responses: Mutex<VecDeque<Result<UploadImageResponse, ApiError>>>,
    update_calls: Mutex<Vec<UpdateProductPayload>>,
    upload_calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_product(&self, response: Result<ProductRecord, ApiError>) {
        self.product_responses.lock().unwrap().push_back(response);
    }

    pub fn push_categories(&self, response: Result<Vec<CategoryRecord>, ApiError>) {
        self.category_responses.lock().unwrap().push_back(response);
    }

    pub fn push_update(&self, response: Result<(), ApiError>) {
        self.update_responses.lock().unwrap().push_back(response);
    }

    pub fn push_upload(&self, response: Result<UploadImageResponse, ApiError>) {
        self.upload_responses.lock().unwrap().push_back(response);
    }

    pub fn update_calls(&self) -> Vec<UpdateProductPayload> {
        self.update_calls.lock().unwrap().clone()
    }

    pub fn upload_calls(&self) -> Vec<String> {
        self.upload_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogApi for ScriptedApi {
    async fn get_product(&self, _product_id: &str) -> Result<ProductRecord, ApiError> {
        self.product_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted product response left")
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, ApiError> {
        self.category_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted category response left")
    }

    async fn update_product(&self, payload: &UpdateProductPayload) -> Result<(), ApiError> {
        self.update_calls.lock().unwrap().push(payload.clone());
        self.update_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted update response left")
    }

    async fn upload_image(
        &self,
        filename: String,
        _bytes: Vec<u8>,
    ) -> Result<UploadImageResponse, ApiError> {
        self.upload_calls.lock().unwrap().push(filename);
        self.upload_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted upload response left")
    }
}

pub fn sample_product() -> ProductRecord {
    ProductRecord {
        id: "p1".to_string(),
        name: "Widget".to_string(),
        image: "/img/w.png".to_string(),
        brand: "Acme".to_string(),
        category: "c1".to_string(),
        count_in_stock: Some(5),
        description: "desc".to_string(),
    }
}

pub fn sample_categories() -> Vec<CategoryRecord> {
    vec![
        CategoryRecord {
            id: "c1".to_string(),
            name: "Electronics".to_string(),
        },
        CategoryRecord {
            id: "c2".to_string(),
            name: "Garden".to_string(),
        },
    ]
}

pub fn status_error(status: StatusCode, message: Option<&str>) -> ApiError {
    ApiError::Status {
        status,
        message: message.map(str::to_string),
    }
}
