//! Order form route handlers (HTMX fragments).
//!
//! The form posts to `/products/{id}/order`. HTMX requests get the form
//! fragment back; plain form posts get the whole detail page. Changing the
//! quantity refreshes the summary through `/products/{id}/order/summary`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use refabry_core::{Courier, ProductId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::order::{OrderField, OrderForm, OrderFormValues, OrderSummary, Toast};
use crate::routes::products::{lookup_product, product_path, render_detail};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// One option of the courier select.
#[derive(Debug, Clone)]
pub struct CourierOption {
    pub code: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Price breakdown display data.
#[derive(Debug, Clone)]
pub struct OrderSummaryView {
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
    pub delivery_charge: String,
    pub total: String,
}

impl From<OrderSummary> for OrderSummaryView {
    fn from(summary: OrderSummary) -> Self {
        Self {
            unit_price: summary.unit_price.to_string(),
            quantity: summary.quantity,
            subtotal: summary.subtotal.to_string(),
            delivery_charge: summary.delivery_charge.to_string(),
            total: summary.total.to_string(),
        }
    }
}

/// Toast display data.
#[derive(Debug, Clone)]
pub struct ToastView {
    pub title: &'static str,
    pub description: &'static str,
    pub destructive: bool,
}

impl From<&Toast> for ToastView {
    fn from(toast: &Toast) -> Self {
        Self {
            title: toast.title,
            description: toast.description,
            destructive: toast.is_destructive(),
        }
    }
}

/// Order form display data.
#[derive(Debug, Clone)]
pub struct OrderFormView {
    pub action: String,
    pub summary_url: String,
    pub c_name: String,
    pub c_phone: String,
    pub address: String,
    pub quantity: String,
    pub couriers: Vec<CourierOption>,
    pub name_error: Option<String>,
    pub phone_error: Option<String>,
    pub address_error: Option<String>,
    pub courier_error: Option<String>,
    pub quantity_error: Option<String>,
    pub summary: OrderSummaryView,
    pub toast: Option<ToastView>,
}

impl OrderFormView {
    #[must_use]
    pub fn new(form: &OrderForm) -> Self {
        let values = form.values();
        let errors = form.errors();
        let error = |field| errors.get(field).map(String::from);
        let action = format!("{}/order", product_path(form.product_id()));

        Self {
            summary_url: format!("{action}/summary"),
            action,
            c_name: values.c_name.clone(),
            c_phone: values.c_phone.clone(),
            address: values.address.clone(),
            quantity: values.quantity.clone(),
            couriers: Courier::ALL
                .iter()
                .map(|courier| CourierOption {
                    code: courier.code(),
                    label: courier.label(),
                    selected: values.courier == courier.code(),
                })
                .collect(),
            name_error: error(OrderField::Name),
            phone_error: error(OrderField::Phone),
            address_error: error(OrderField::Address),
            courier_error: error(OrderField::Courier),
            quantity_error: error(OrderField::Quantity),
            summary: form.summary().into(),
            toast: form.toast().map(ToastView::from),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Order form fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_form.html")]
pub struct OrderFormTemplate {
    pub form: OrderFormView,
}

/// Order summary fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_summary.html")]
pub struct OrderSummaryTemplate {
    pub summary: OrderSummaryView,
}

/// Whether the request came from HTMX.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some_and(|v| v == "true")
}

// =============================================================================
// Handlers
// =============================================================================

/// Submit an order for a product.
///
/// The product must already be in the catalog (selected or in the
/// collection); its id and price are what the order is placed for.
#[instrument(skip(state, headers, values))]
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(values): Form<OrderFormValues>,
) -> Result<Response> {
    let id = ProductId::from(id);
    let catalog = state.catalog().snapshot().await;
    let product = lookup_product(&catalog, &id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut form = OrderForm::with_values(product.id.clone(), product.price, values);
    let outcome = form.submit(state.api()).await;
    tracing::debug!(?outcome, "Order form submitted");

    if is_htmx(&headers) {
        Ok(OrderFormTemplate {
            form: OrderFormView::new(&form),
        }
        .into_response())
    } else {
        Ok(render_detail(&state, &product, &form))
    }
}

/// Recompute the order summary for the posted quantity.
#[instrument(skip(state, values))]
pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(values): Form<OrderFormValues>,
) -> Result<impl IntoResponse> {
    let id = ProductId::from(id);
    let catalog = state.catalog().snapshot().await;
    let product = lookup_product(&catalog, &id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(OrderSummaryTemplate {
        summary: OrderSummary::new(product.price, &values).into(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;
    use refabry_core::Price;

    use super::*;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));

        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_blank_form_view() {
        let form = OrderForm::new(ProductId::from("42"), Price::from_whole(200));
        let view = OrderFormView::new(&form);

        assert_eq!(view.action, "/products/42/order");
        assert_eq!(view.summary_url, "/products/42/order/summary");
        assert_eq!(view.quantity, "1");
        assert_eq!(view.summary.total, "৳280");
        assert_eq!(view.couriers.len(), 4);
        assert!(view.couriers.iter().all(|c| !c.selected));
        assert!(view.toast.is_none());
    }

    #[test]
    fn test_form_view_marks_selected_courier() {
        let values = OrderFormValues {
            courier: "redx".to_string(),
            quantity: "3".to_string(),
            ..OrderFormValues::default()
        };
        let form = OrderForm::with_values(ProductId::from("42"), Price::from_whole(200), values);
        let view = OrderFormView::new(&form);

        let selected: Vec<_> = view.couriers.iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "RedX");
        assert_eq!(view.summary.subtotal, "৳600");
        assert_eq!(view.summary.total, "৳680");
    }

    #[test]
    fn test_toast_view() {
        let view = ToastView::from(&Toast::FAILED);
        assert!(view.destructive);
        assert_eq!(view.title, "Order placement failed");
    }
}
