// src/handlers.rs

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde_json::{Value, json};

use crate::edit_form::ProductEditForm;
use crate::errors::AppError;
use crate::models::{FormField, RefetchHints};
use crate::notify::{Notification, ToastQueue};
use crate::state::AppState;
use crate::views;

/// Builds the HX-Trigger payload: the most recent notification as a
/// `showMessage` toast, plus a `productUpdated` event carrying the refetch
/// hints after a successful update.
fn hx_trigger_value(notifications: &[Notification], hints: Option<&RefetchHints>) -> Option<String> {
    let mut payload = serde_json::Map::new();
    if let Some(last) = notifications.last() {
        payload.insert(
            "showMessage".to_string(),
            json!({
                "message": last.message,
                "type": last.level.as_str(),
            }),
        );
    }
    if let Some(hints) = hints {
        payload.insert(
            "productUpdated".to_string(),
            serde_json::to_value(hints).unwrap_or(Value::Null),
        );
    }
    if payload.is_empty() {
        None
    } else {
        Some(Value::Object(payload).to_string())
    }
}

fn toast_headers(notifications: &[Notification], hints: Option<&RefetchHints>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(payload) = hx_trigger_value(notifications, hints) {
        if let Ok(val) = HeaderValue::from_str(&payload) {
            headers.insert("HX-Trigger", val);
        }
    }
    headers
}

/// GET /admin/products/{id}/edit
///
/// Loads the product and the category list, then renders the edit screen.
/// Both reads must succeed for the form to render; a failed read leaves only
/// the error notification.
pub async fn edit_product_screen_handler(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
) -> Result<Markup, AppError> {
    tracing::info!("GET /admin/products/{}/edit", product_id);

    let toasts = Arc::new(ToastQueue::new());
    let mut form = ProductEditForm::new(product_id, app_state.api.clone(), toasts.clone());
    form.load().await;

    let notifications = toasts.drain();
    let content = html! {
        (views::edit_screen(&form))
        (views::toast_stack(&notifications))
    };

    if headers.contains_key("HX-Request") {
        Ok(content)
    } else {
        Ok(views::page("Edit Product", content))
    }
}

/// POST /htmx/admin/products/{id}
///
/// Accepts the submitted form fields as the draft, issues the update and, on
/// success, sends the browser to the product listing with refetch hints. On
/// failure the user stays on the form; nothing is swapped.
pub async fn update_product_handler(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, HeaderMap, String), AppError> {
    tracing::info!("POST /htmx/admin/products/{} - update", product_id);

    let mut text_fields: HashMap<String, String> = HashMap::new();
    while let Some(field) = multipart.next_field().await? {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => {
                tracing::warn!("Received a multipart field without a name, skipping");
                continue;
            }
        };
        if field.file_name().is_some() {
            // The replacement image travels through the side-channel upload;
            // the submitted draft carries only the stored reference.
            continue;
        }
        text_fields.insert(field_name, field.text().await?);
    }

    let toasts = Arc::new(ToastQueue::new());
    let mut form = ProductEditForm::new(product_id, app_state.api.clone(), toasts.clone());
    // Unknown input names are dropped here, keeping the draft inside the
    // editable field set.
    for (name, value) in text_fields {
        if let Some(field) = FormField::from_name(&name) {
            form.set_field(field, value);
        }
    }

    let navigation = form.submit().await;

    let hints = navigation.as_ref().and_then(|nav| nav.state.clone());
    let mut headers = toast_headers(&toasts.drain(), hints.as_ref());

    if let Some(nav) = navigation {
        let location_payload = json!({
            "path": nav.path,
            "target": "#content",
            "swap": "innerHTML"
        });
        if let Ok(val) = HeaderValue::from_str(&location_payload.to_string()) {
            headers.insert("HX-Location", val);
        }
    }

    Ok((StatusCode::OK, headers, String::new()))
}

/// POST /htmx/admin/products/{id}/image
///
/// Side-channel image upload. On success the response fragment replaces the
/// hidden image input with the new server-assigned reference; on failure a
/// 204 leaves the form untouched and only the error toast fires.
pub async fn upload_product_image_handler(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    tracing::info!("POST /htmx/admin/products/{}/image - upload", product_id);

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await? {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        if field_name == "image" {
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "upload.jpg".to_string());
            let bytes = field.bytes().await?;
            if !bytes.is_empty() {
                upload = Some((filename, bytes.to_vec()));
            }
        }
    }

    let Some((filename, bytes)) = upload else {
        return Err(AppError::UnprocessableEntity(
            "Missing 'image' file field".to_string(),
        ));
    };

    let toasts = Arc::new(ToastQueue::new());
    let mut form = ProductEditForm::new(product_id, app_state.api.clone(), toasts.clone());
    let succeeded = form.upload_image(filename, bytes).await;

    let headers = toast_headers(&toasts.drain(), None);
    if succeeded {
        let fragment = views::image_ref_input(&form.draft().image);
        Ok((StatusCode::OK, headers, fragment).into_response())
    } else {
        Ok((StatusCode::NO_CONTENT, headers).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationLevel;

    fn note(level: NotificationLevel, message: &str) -> Notification {
        Notification {
            level,
            message: message.to_string(),
        }
    }

    #[test]
    fn hx_trigger_carries_the_most_recent_toast() {
        let notifications = vec![
            note(NotificationLevel::Success, "first"),
            note(NotificationLevel::Error, "second"),
        ];

        let payload = hx_trigger_value(&notifications, None).expect("expected a payload");
        let value: Value = serde_json::from_str(&payload).expect("invalid JSON");

        assert_eq!(value["showMessage"]["message"], "second");
        assert_eq!(value["showMessage"]["type"], "error");
        assert!(value.get("productUpdated").is_none());
    }

    #[test]
    fn hx_trigger_includes_refetch_hints_after_update() {
        let notifications = vec![note(NotificationLevel::Success, "Product Updated")];
        let hints = RefetchHints::for_product("p1");

        let payload = hx_trigger_value(&notifications, Some(&hints)).expect("expected a payload");
        let value: Value = serde_json::from_str(&payload).expect("invalid JSON");

        assert_eq!(value["productUpdated"]["refetchProductId"], "p1");
        assert_eq!(value["productUpdated"]["refetchHome"], true);
        assert_eq!(value["productUpdated"]["refetch"], true);
        assert_eq!(value["showMessage"]["type"], "success");
    }

    #[test]
    fn hx_trigger_is_absent_when_nothing_happened() {
        assert_eq!(hx_trigger_value(&[], None), None);
    }
}
