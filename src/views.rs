// src/views.rs

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::edit_form::{PRODUCT_LISTING_PATH, ProductEditForm};
use crate::notify::{Notification, NotificationLevel};

/// Full-page shell for non-HTMX requests. Partial swaps replace `#content`.
pub fn page(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src="https://unpkg.com/htmx.org@1.9.12" {}
                script src="https://cdn.tailwindcss.com" {}
                style { ".htmx-indicator{display:none} .htmx-request .htmx-indicator, .htmx-request.htmx-indicator{display:inline-block}" }
            }
            body ."bg-gray-50 min-h-screen py-8" {
                div #content { (content) }
                // Toasts raised by later requests arrive as an HX-Trigger
                // showMessage event.
                (PreEscaped(r#"<script>
document.body.addEventListener('showMessage', function (evt) {
    var detail = evt.detail || {};
    var stack = document.getElementById('toast-stack');
    if (!stack) {
        stack = document.createElement('div');
        stack.id = 'toast-stack';
        stack.className = 'fixed bottom-4 right-4 space-y-2 z-50';
        document.body.appendChild(stack);
    }
    var toast = document.createElement('div');
    toast.className = (detail.type === 'success' ? 'bg-green-600' : 'bg-red-600')
        + ' text-white px-4 py-2 rounded-md shadow-lg';
    toast.textContent = detail.message || '';
    stack.appendChild(toast);
    setTimeout(function () { toast.remove(); }, 4000);
});
</script>"#))
            }
        }
    }
}

/// Server-rendered notifications for full page loads, where no HX-Trigger
/// header can reach the client.
pub fn toast_stack(notifications: &[Notification]) -> Markup {
    html! {
        @if !notifications.is_empty() {
            div #toast-stack ."fixed bottom-4 right-4 space-y-2 z-50" {
                @for notification in notifications {
                    @let color = match notification.level {
                        NotificationLevel::Success => "bg-green-600",
                        NotificationLevel::Error => "bg-red-600",
                    };
                    div class=(format!("{} text-white px-4 py-2 rounded-md shadow-lg", color)) {
                        (notification.message)
                    }
                }
            }
        }
    }
}

fn spinner() -> Markup {
    html! {
        span ."inline-block h-5 w-5 animate-spin rounded-full border-2 border-gray-300 border-t-blue-500" {}
    }
}

/// The hidden input carrying the current image reference. The upload response
/// swaps in a replacement bearing the new server-assigned URI, so the next
/// submit sends it verbatim.
pub fn image_ref_input(image: &str) -> Markup {
    html! {
        input #image-ref type="hidden" name="image" value=(image);
    }
}

/// The edit screen, gated on both reads: a busy indicator while either read
/// is pending, nothing beyond the (already raised) error toast when either
/// read failed, the form only when both succeeded.
pub fn edit_screen(form: &ProductEditForm) -> Markup {
    if form.has_failed() {
        return html! {};
    }
    if form.is_loading() || !form.is_ready() {
        return html! {
            div ."w-1/3 mx-auto flex justify-center py-12" { (spinner()) }
        };
    }

    // is_ready() above guarantees the category list is present.
    let categories = form
        .categories()
        .value()
        .map_or(&[][..], |list| list.as_slice());
    let draft = form.draft();
    let field_class = "w-full border border-gray-300 p-2 rounded-md";
    // Shown by htmx while an upload request is running, or outright when the
    // component already knows one is in flight.
    let upload_indicator_class = if form.upload_in_flight() {
        "inline-block"
    } else {
        "htmx-indicator"
    };

    html! {
        div ."w-1/3 mx-auto" {
            h2 ."text-2xl font-semibold mb-4" { "Edit Product." }
            form
                "hx-post"=(format!("/htmx/admin/products/{}", form.product_id()))
                "hx-encoding"="multipart/form-data"
                "hx-swap"="none"
                "hx-indicator"="#submit-indicator"
            {
                div ."mb-4" {
                    label for="name" ."block font-medium" { "Name:" }
                    input type="text" id="name" name="name" value=(draft.name) class=(field_class);
                }
                div ."mb-4" {
                    label for="image" ."block font-medium" { "Image:" }
                    (image_ref_input(&draft.image))
                    input type="file" id="image" name="image" accept="image/*"
                        "hx-post"=(format!("/htmx/admin/products/{}/image", form.product_id()))
                        "hx-encoding"="multipart/form-data"
                        "hx-trigger"="change"
                        "hx-target"="#image-ref"
                        "hx-swap"="outerHTML"
                        "hx-indicator"="#upload-indicator"
                        class=(field_class);
                }
                div ."mb-4" {
                    label for="brand" ."block font-medium" { "Brand:" }
                    input type="text" id="brand" name="brand" value=(draft.brand) class=(field_class);
                }
                div ."mb-4" {
                    label for="category" ."block font-medium" { "Category:" }
                    select id="category" name="category" class=(field_class) {
                        option value="" { "Select Category" }
                        @for category in categories {
                            option value=(category.id) selected[draft.category == category.id] {
                                (category.name)
                            }
                        }
                    }
                }
                div ."mb-4" {
                    label for="countInStock" ."block font-medium" { "Count In Stock:" }
                    input type="number" id="countInStock" name="countInStock"
                        value=(draft.count_in_stock) class=(field_class);
                }
                div ."mb-4" {
                    label for="description" ."block font-medium" { "Description:" }
                    textarea id="description" name="description" class=(field_class) {
                        (draft.description)
                    }
                }
                div ."mb-4 flex items-center" {
                    button type="submit"
                        class="bg-blue-500 text-white px-4 py-2 rounded-md hover:bg-blue-600 mr-4"
                    {
                        "Update Product"
                    }
                    a href=(PRODUCT_LISTING_PATH)
                        class="bg-gray-800 text-white py-2.5 px-4 rounded-md mr-4"
                    {
                        "Back"
                    }
                    span #submit-indicator ."htmx-indicator" { (spinner()) }
                    span #upload-indicator class=(upload_indicator_class) { (spinner()) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit_form::ProductEditForm;
    use crate::notify::ToastQueue;
    use crate::test_support::{ScriptedApi, sample_categories, sample_product, status_error};
    use reqwest::StatusCode;
    use std::sync::Arc;

    #[tokio::test]
    async fn ready_form_renders_all_labeled_controls() {
        let api = Arc::new(ScriptedApi::new());
        api.push_product(Ok(sample_product()));
        api.push_categories(Ok(sample_categories()));
        let mut form = ProductEditForm::new("p1", api, Arc::new(ToastQueue::new()));
        form.load().await;

        let markup = edit_screen(&form).into_string();

        assert!(markup.contains("Edit Product."));
        assert!(markup.contains("Name:"));
        assert!(markup.contains("Count In Stock:"));
        assert!(markup.contains(r#"value="Widget""#));
        assert!(markup.contains(r#"accept="image/*""#));
        assert!(markup.contains("Select Category"));
        assert!(markup.contains("Electronics"));
        assert!(markup.contains("Update Product"));
        assert!(markup.contains(r#"href="/admin/products""#));
    }

    #[tokio::test]
    async fn loaded_category_is_preselected() {
        let api = Arc::new(ScriptedApi::new());
        api.push_product(Ok(sample_product()));
        api.push_categories(Ok(sample_categories()));
        let mut form = ProductEditForm::new("p1", api, Arc::new(ToastQueue::new()));
        form.load().await;

        let markup = edit_screen(&form).into_string();

        assert!(markup.contains(r#"<option value="c1" selected>"#));
        assert!(!markup.contains(r#"<option value="c2" selected>"#));
    }

    #[test]
    fn pending_reads_render_only_a_busy_indicator() {
        let api = Arc::new(ScriptedApi::new());
        let form = ProductEditForm::new("p1", api, Arc::new(ToastQueue::new()));

        let markup = edit_screen(&form).into_string();

        assert!(markup.contains("animate-spin"));
        assert!(!markup.contains("<form"));
    }

    #[tokio::test]
    async fn failed_read_renders_nothing() {
        let api = Arc::new(ScriptedApi::new());
        api.push_product(Err(status_error(StatusCode::NOT_FOUND, None)));
        api.push_categories(Ok(sample_categories()));
        let mut form = ProductEditForm::new("p1", api, Arc::new(ToastQueue::new()));
        form.load().await;

        assert_eq!(edit_screen(&form).into_string(), "");
    }

    #[tokio::test]
    async fn hidden_image_input_carries_the_draft_reference() {
        let api = Arc::new(ScriptedApi::new());
        api.push_product(Ok(sample_product()));
        api.push_categories(Ok(sample_categories()));
        let mut form = ProductEditForm::new("p1", api, Arc::new(ToastQueue::new()));
        form.load().await;

        let markup = edit_screen(&form).into_string();
        assert!(markup.contains(r#"name="image" value="/img/w.png""#));
    }
}
