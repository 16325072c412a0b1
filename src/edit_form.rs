// src/edit_form.rs
//
// The product edit screen as an explicit component: two gated reads, a draft
// seeded once per successful product load, a side-channel image upload and a
// submit that hands back a navigation target. Handlers drive it; tests drive
// it with a scripted API.

use std::sync::Arc;

use crate::api_client::{ApiError, CatalogApi};
use crate::models::{
    CategoryRecord, FormDraft, FormField, ProductRecord, RefetchHints, UpdateProductPayload,
    UploadImageResponse,
};
use crate::notify::{NotificationLevel, Notifier};

pub const PRODUCT_LISTING_PATH: &str = "/admin/products";

/// Tri-state status of one asynchronous read.
#[derive(Debug)]
pub enum LoadState<T> {
    Pending,
    Ready(T),
    Failed(ApiError),
}

impl<T> LoadState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Where to go after a successful update, plus the state handed to the
/// target view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub path: &'static str,
    pub state: Option<RefetchHints>,
}

pub struct ProductEditForm {
    product_id: String,
    api: Arc<dyn CatalogApi>,
    notifier: Arc<dyn Notifier>,
    product: LoadState<ProductRecord>,
    categories: LoadState<Vec<CategoryRecord>>,
    draft: FormDraft,
    seeded: bool,
    upload_in_flight: bool,
}

impl ProductEditForm {
    pub fn new(
        product_id: impl Into<String>,
        api: Arc<dyn CatalogApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        ProductEditForm {
            product_id: product_id.into(),
            api,
            notifier,
            product: LoadState::Pending,
            categories: LoadState::Pending,
            draft: FormDraft::default(),
            seeded: false,
            upload_in_flight: false,
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn categories(&self) -> &LoadState<Vec<CategoryRecord>> {
        &self.categories
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn upload_in_flight(&self) -> bool {
        self.upload_in_flight
    }

    /// Rendering is gated on BOTH reads having completed successfully.
    pub fn is_ready(&self) -> bool {
        self.product.value().is_some() && self.categories.value().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.product.is_pending() || self.categories.is_pending()
    }

    pub fn has_failed(&self) -> bool {
        self.product.is_failed() || self.categories.is_failed()
    }

    /// Issues the product and category reads. The reads are independent, so
    /// one failing does not cancel the other; either failure raises an error
    /// notification and leaves the form unrendered.
    pub async fn load(&mut self) {
        let (product, categories) = tokio::join!(
            self.api.get_product(&self.product_id),
            self.api.list_categories(),
        );

        match product {
            Ok(record) => {
                // Seed the draft on the pending -> ready edge only. A reload
                // must not clobber edits already in progress.
                if !self.seeded {
                    self.draft = FormDraft::from_product(&record);
                    self.seeded = true;
                }
                self.product = LoadState::Ready(record);
            }
            Err(err) => {
                self.notifier
                    .notify(NotificationLevel::Error, &err.user_message());
                self.product = LoadState::Failed(err);
            }
        }

        match categories {
            Ok(list) => self.categories = LoadState::Ready(list),
            Err(err) => {
                self.notifier
                    .notify(NotificationLevel::Error, &err.user_message());
                self.categories = LoadState::Failed(err);
            }
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.draft.set_field(field, value.into());
    }

    /// Fire-and-forget upload of a replacement image. Other fields stay
    /// usable while the request is in flight. Returns whether the draft's
    /// image reference was replaced.
    pub async fn upload_image(&mut self, filename: String, bytes: Vec<u8>) -> bool {
        self.upload_in_flight = true;
        let result = self.api.upload_image(filename, bytes).await;
        self.apply_upload_result(result)
    }

    /// Completion event of an upload. Overlapping uploads are permitted to
    /// race; the draft keeps whichever response is applied last.
    pub fn apply_upload_result(&mut self, result: Result<UploadImageResponse, ApiError>) -> bool {
        self.upload_in_flight = false;
        match result {
            Ok(response) => {
                self.draft.image = response.image;
                self.notifier
                    .notify(NotificationLevel::Success, &response.message);
                true
            }
            Err(err) => {
                self.notifier
                    .notify(NotificationLevel::Error, &err.user_message());
                false
            }
        }
    }

    /// Sends the draft as a single update request. On success returns the
    /// navigation to the listing view with refetch hints; on failure the
    /// draft is left untouched and the user stays on the form.
    pub async fn submit(&mut self) -> Option<Navigation> {
        let payload = UpdateProductPayload::from_draft(&self.product_id, &self.draft);
        match self.api.update_product(&payload).await {
            Ok(()) => {
                tracing::info!("Product {} updated", self.product_id);
                self.notifier
                    .notify(NotificationLevel::Success, "Product Updated");
                Some(Navigation {
                    path: PRODUCT_LISTING_PATH,
                    state: Some(RefetchHints::for_product(&self.product_id)),
                })
            }
            Err(err) => {
                self.notifier
                    .notify(NotificationLevel::Error, &err.user_message());
                None
            }
        }
    }
}
