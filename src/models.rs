// src/models.rs

use serde::{Deserialize, Serialize};

/// Catalog item as served by the backend API. The id is assigned upstream and
/// never changes from this screen's point of view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    // Absent in older records; kept as None so the form can show "unset"
    // instead of "0".
    #[serde(default)]
    pub count_in_stock: Option<i64>,
    #[serde(default)]
    pub description: String,
}

/// Read-only classification entity referenced by a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// The editable fields of the product edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Image,
    Brand,
    Category,
    CountInStock,
    Description,
}

impl FormField {
    /// Maps a form input name to its field. Unknown names get dropped, so the
    /// draft never grows keys outside the editable set.
    pub fn from_name(name: &str) -> Option<FormField> {
        match name {
            "name" => Some(FormField::Name),
            "image" => Some(FormField::Image),
            "brand" => Some(FormField::Brand),
            "category" => Some(FormField::Category),
            "countInStock" => Some(FormField::CountInStock),
            "description" => Some(FormField::Description),
            _ => None,
        }
    }
}

/// Local editable snapshot of the product's editable fields. Every field is a
/// string; numeric coercion of the stock count is left to the backend at
/// submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub name: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub count_in_stock: String,
    pub description: String,
}

impl FormDraft {
    pub fn from_product(product: &ProductRecord) -> Self {
        FormDraft {
            name: product.name.clone(),
            image: product.image.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            count_in_stock: product
                .count_in_stock
                .map(|n| n.to_string())
                .unwrap_or_default(),
            description: product.description.clone(),
        }
    }

    /// Replaces a single field, leaving every other field untouched.
    pub fn set_field(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Image => self.image = value,
            FormField::Brand => self.brand = value,
            FormField::Category => self.category = value,
            FormField::CountInStock => self.count_in_stock = value,
            FormField::Description => self.description = value,
        }
    }
}

/// Update request body. Field values travel verbatim as strings from the
/// draft, countInStock included.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub count_in_stock: String,
    pub description: String,
}

impl UpdateProductPayload {
    pub fn from_draft(product_id: &str, draft: &FormDraft) -> Self {
        UpdateProductPayload {
            product_id: product_id.to_string(),
            name: draft.name.clone(),
            image: draft.image.clone(),
            brand: draft.brand.clone(),
            category: draft.category.clone(),
            count_in_stock: draft.count_in_stock.clone(),
            description: draft.description.clone(),
        }
    }
}

/// Upload endpoint response: a confirmation message plus the server-assigned
/// image reference.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UploadImageResponse {
    #[serde(default)]
    pub message: String,
    pub image: String,
}

/// State handed to the product listing view after a successful update so it
/// can refresh its cached copy of the record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefetchHints {
    pub refetch_product_id: String,
    pub refetch_home: bool,
    pub refetch: bool,
}

impl RefetchHints {
    pub fn for_product(product_id: &str) -> Self {
        RefetchHints {
            refetch_product_id: product_id.to_string(),
            refetch_home: true,
            refetch: true,
        }
    }
}
