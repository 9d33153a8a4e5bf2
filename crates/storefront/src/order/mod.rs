//! Order form: state, validation, and submission.
//!
//! The form talks to the order API directly and never touches the catalog
//! store. Submission borrows the form mutably for its whole duration, so a
//! form can not be submitted again while a submission is in flight.

use std::collections::BTreeMap;

use refabry_core::{
    Courier, DELIVERY_CHARGE, OrderPayload, Phone, Price, ProductId, cash_on_delivery,
};
use serde::Deserialize;
use serde_json::Value;

use crate::api::{ApiResponse, OrderApi};

const NAME_MIN_CHARS: usize = 2;
const ADDRESS_MIN_CHARS: usize = 5;

/// Form fields, by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderField {
    Name,
    Phone,
    Address,
    Courier,
    Quantity,
}

impl OrderField {
    /// Map an order API error key onto a form field.
    #[must_use]
    pub fn from_api_key(key: &str) -> Option<Self> {
        match key {
            "c_name" => Some(Self::Name),
            "c_phone" => Some(Self::Phone),
            "address" => Some(Self::Address),
            "courier" => Some(Self::Courier),
            "s_product_qty" | "quantity" => Some(Self::Quantity),
            _ => None,
        }
    }
}

/// First error message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<OrderField, String>);

impl FieldErrors {
    /// Record an error; the first message for a field wins.
    pub fn insert(&mut self, field: OrderField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: OrderField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Raw form input as posted by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderFormValues {
    #[serde(default)]
    pub c_name: String,
    #[serde(default)]
    pub c_phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub courier: String,
    #[serde(default = "default_quantity")]
    pub quantity: String,
}

fn default_quantity() -> String {
    "1".to_string()
}

impl Default for OrderFormValues {
    fn default() -> Self {
        Self {
            c_name: String::new(),
            c_phone: String::new(),
            address: String::new(),
            courier: String::new(),
            quantity: default_quantity(),
        }
    }
}

impl OrderFormValues {
    /// Quantity coerced to a whole number, if it is one.
    #[must_use]
    pub fn parsed_quantity(&self) -> Option<u32> {
        self.quantity.trim().parse().ok()
    }

    /// Check every field, collecting the first failure per field.
    ///
    /// # Errors
    ///
    /// Returns the field errors when any field is invalid.
    pub fn validate(&self) -> Result<ValidOrder, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = self.c_name.trim();
        if name.chars().count() < NAME_MIN_CHARS {
            errors.insert(OrderField::Name, "Name must be at least 2 characters");
        }

        let phone = Phone::parse(&self.c_phone)
            .map_err(|e| errors.insert(OrderField::Phone, e.to_string()))
            .ok();

        let address = self.address.trim();
        if address.chars().count() < ADDRESS_MIN_CHARS {
            errors.insert(OrderField::Address, "Address must be at least 5 characters");
        }

        let courier = self
            .courier
            .parse::<Courier>()
            .map_err(|e| errors.insert(OrderField::Courier, e.to_string()))
            .ok();

        let quantity = self.parsed_quantity().filter(|q| *q >= 1);
        if quantity.is_none() {
            errors.insert(OrderField::Quantity, "Quantity must be at least 1");
        }

        match (phone, courier, quantity) {
            (Some(phone), Some(courier), Some(quantity)) if errors.is_empty() => Ok(ValidOrder {
                name: name.to_owned(),
                phone,
                address: address.to_owned(),
                courier,
                quantity,
            }),
            _ => Err(errors),
        }
    }
}

/// Form input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidOrder {
    pub name: String,
    pub phone: Phone,
    pub address: String,
    pub courier: Courier,
    pub quantity: u32,
}

impl ValidOrder {
    /// Payload for ordering `product_id` at `price`.
    #[must_use]
    pub fn payload(&self, product_id: &ProductId, price: Price) -> OrderPayload {
        OrderPayload::new(
            product_id,
            price,
            self.quantity,
            &self.name,
            &self.phone,
            &self.address,
            self.courier,
        )
    }
}

/// Price breakdown shown under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub unit_price: Price,
    pub quantity: u32,
    pub subtotal: Price,
    pub delivery_charge: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Summary for `quantity` units; unparseable quantities count as zero.
    #[must_use]
    pub fn new(unit_price: Price, values: &OrderFormValues) -> Self {
        let quantity = values.parsed_quantity().unwrap_or(0);
        Self {
            unit_price,
            quantity,
            subtotal: unit_price.times(quantity),
            delivery_charge: Price::from_whole(DELIVERY_CHARGE),
            total: cash_on_delivery(unit_price, quantity),
        }
    }
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Destructive,
}

/// Transient notification shown after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: &'static str,
    pub description: &'static str,
    pub variant: ToastVariant,
}

impl Toast {
    pub const PLACED: Self = Self {
        title: "Order placed successfully!",
        description: "We'll contact you soon to confirm your order.",
        variant: ToastVariant::Success,
    };

    pub const CHECK_FIELDS: Self = Self {
        title: "Order placement failed",
        description: "Please check the form for errors and try again.",
        variant: ToastVariant::Destructive,
    };

    pub const FAILED: Self = Self {
        title: "Order placement failed",
        description: "There was an error placing your order. Please try again.",
        variant: ToastVariant::Destructive,
    };

    #[must_use]
    pub const fn is_destructive(&self) -> bool {
        matches!(self.variant, ToastVariant::Destructive)
    }
}

// =============================================================================
// Submission
// =============================================================================

/// How the order API answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Order accepted.
    Placed,
    /// The API rejected specific fields.
    Rejected(FieldErrors),
    /// Anything else.
    Failed,
}

impl SubmitOutcome {
    /// Classify an order API response.
    ///
    /// `data.status == false` with a `data.error` object is a field-level
    /// rejection; each field takes the first message of its list. A 2xx
    /// without that flag is a success; everything else is a failure.
    #[must_use]
    pub fn from_response(response: &ApiResponse) -> Self {
        let data = response.body.get("data");
        let flagged_failure = data
            .and_then(|d| d.get("status"))
            .is_some_and(|s| s == &Value::Bool(false));

        if flagged_failure
            && let Some(Value::Object(error_map)) = data.and_then(|d| d.get("error"))
        {
            let mut errors = FieldErrors::default();
            for (key, messages) in error_map {
                let first = messages
                    .as_array()
                    .and_then(|list| list.first())
                    .and_then(Value::as_str);
                match (OrderField::from_api_key(key), first) {
                    (Some(field), Some(message)) => errors.insert(field, message),
                    _ => tracing::debug!(key, "Ignoring order API error without a form field"),
                }
            }
            return Self::Rejected(errors);
        }

        if response.status.is_success() && !flagged_failure {
            Self::Placed
        } else {
            Self::Failed
        }
    }
}

/// An order form bound to one product.
#[derive(Debug, Clone)]
pub struct OrderForm {
    product_id: ProductId,
    unit_price: Price,
    values: OrderFormValues,
    errors: FieldErrors,
    toast: Option<Toast>,
}

impl OrderForm {
    /// A blank form for the product.
    #[must_use]
    pub fn new(product_id: ProductId, unit_price: Price) -> Self {
        Self::with_values(product_id, unit_price, OrderFormValues::default())
    }

    /// A form pre-filled with submitted input.
    #[must_use]
    pub fn with_values(product_id: ProductId, unit_price: Price, values: OrderFormValues) -> Self {
        Self {
            product_id,
            unit_price,
            values,
            errors: FieldErrors::default(),
            toast: None,
        }
    }

    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    #[must_use]
    pub const fn values(&self) -> &OrderFormValues {
        &self.values
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub const fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Current price breakdown.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary::new(self.unit_price, &self.values)
    }

    /// Validate and submit the order.
    ///
    /// Invalid input never reaches the API. On success the form is reset to
    /// its defaults; on any failure the entered values are kept.
    pub async fn submit<A: OrderApi>(&mut self, api: &A) -> Option<SubmitOutcome> {
        self.errors = FieldErrors::default();
        self.toast = None;

        let order = match self.values.validate() {
            Ok(order) => order,
            Err(errors) => {
                self.errors = errors;
                return None;
            }
        };

        let payload = order.payload(&self.product_id, self.unit_price);
        let outcome = match api.place_order(&payload).await {
            Ok(response) => SubmitOutcome::from_response(&response),
            Err(e) => {
                tracing::error!(error = %e, product_id = %self.product_id, "Order placement failed");
                SubmitOutcome::Failed
            }
        };

        match &outcome {
            SubmitOutcome::Placed => {
                tracing::info!(product_id = %self.product_id, "Order placed");
                self.values = OrderFormValues::default();
                self.toast = Some(Toast::PLACED);
            }
            SubmitOutcome::Rejected(errors) => {
                self.errors = errors.clone();
                self.toast = Some(Toast::CHECK_FIELDS);
            }
            SubmitOutcome::Failed => {
                self.toast = Some(Toast::FAILED);
            }
        }

        Some(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::api::ApiError;

    /// Order API double recording every payload it receives.
    struct FakeOrders {
        answer: Mutex<Option<ApiResponse>>,
        received: Mutex<Vec<OrderPayload>>,
    }

    impl FakeOrders {
        fn answering(status: StatusCode, body: Value) -> Self {
            Self {
                answer: Mutex::new(Some(ApiResponse::new(status, body))),
                received: Mutex::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                answer: Mutex::new(None),
                received: Mutex::new(Vec::new()),
            }
        }
    }

    impl OrderApi for FakeOrders {
        async fn place_order(&self, order: &OrderPayload) -> Result<ApiResponse, ApiError> {
            self.received.lock().unwrap().push(order.clone());
            self.answer
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ApiError::Parse(serde_json::from_str::<Value>("").unwrap_err()))
        }
    }

    fn valid_values() -> OrderFormValues {
        OrderFormValues {
            c_name: "Rahim Uddin".to_string(),
            c_phone: "01712345678".to_string(),
            address: "House 4, Road 7, Dhanmondi".to_string(),
            courier: "steadfast".to_string(),
            quantity: "3".to_string(),
        }
    }

    fn form() -> OrderForm {
        OrderForm::with_values(ProductId::from("42"), Price::from_whole(200), valid_values())
    }

    #[test]
    fn test_validate_accepts_valid_input() {
        let order = valid_values().validate().unwrap();
        assert_eq!(order.quantity, 3);
        assert_eq!(order.courier, Courier::Steadfast);
    }

    #[test]
    fn test_validate_reports_each_field() {
        let errors = OrderFormValues {
            c_name: "A".to_string(),
            c_phone: "0171234567".to_string(),
            address: "Road".to_string(),
            courier: String::new(),
            quantity: "0".to_string(),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.get(OrderField::Name), Some("Name must be at least 2 characters"));
        assert_eq!(
            errors.get(OrderField::Phone),
            Some("Phone number must be at least 11 digits")
        );
        assert_eq!(
            errors.get(OrderField::Address),
            Some("Address must be at least 5 characters")
        );
        assert_eq!(errors.get(OrderField::Courier), Some("Please select a courier service"));
        assert_eq!(errors.get(OrderField::Quantity), Some("Quantity must be at least 1"));
    }

    #[test]
    fn test_validate_phone_pattern() {
        let mut values = valid_values();
        values.c_phone = "01212345678".to_string();
        let errors = values.validate().unwrap_err();
        assert_eq!(
            errors.get(OrderField::Phone),
            Some("Must be a valid Bangladeshi phone number (e.g., 01712345678)")
        );
    }

    #[test]
    fn test_validate_quantity_coercion() {
        let mut values = valid_values();
        values.quantity = " 2 ".to_string();
        assert_eq!(values.validate().unwrap().quantity, 2);

        values.quantity = "two".to_string();
        assert!(values.validate().is_err());

        values.quantity = "1.5".to_string();
        assert!(values.validate().is_err());
    }

    #[test]
    fn test_summary_total() {
        let summary = form().summary();
        assert_eq!(summary.subtotal, Price::from_whole(600));
        assert_eq!(summary.total, Price::from_whole(680));

        let mut values = valid_values();
        values.quantity = "abc".to_string();
        let summary = OrderSummary::new(Price::from_whole(200), &values);
        assert_eq!(summary.quantity, 0);
        assert_eq!(summary.total, Price::from_whole(80));
    }

    #[test]
    fn test_outcome_field_errors_take_first_message() {
        let response = ApiResponse::new(
            StatusCode::OK,
            json!({ "data": { "status": false, "error": {
                "c_phone": ["invalid", "second"],
                "c_name": ["too short"],
                "unknown": ["ignored"]
            } } }),
        );

        let SubmitOutcome::Rejected(errors) = SubmitOutcome::from_response(&response) else {
            panic!("expected field rejection");
        };
        assert_eq!(errors.get(OrderField::Phone), Some("invalid"));
        assert_eq!(errors.get(OrderField::Name), Some("too short"));
        assert_eq!(errors.get(OrderField::Address), None);
    }

    #[test]
    fn test_outcome_success_and_failure() {
        let ok = ApiResponse::new(StatusCode::OK, json!({ "status": true }));
        assert_eq!(SubmitOutcome::from_response(&ok), SubmitOutcome::Placed);

        let flagged = ApiResponse::new(StatusCode::OK, json!({ "data": { "status": false } }));
        assert_eq!(SubmitOutcome::from_response(&flagged), SubmitOutcome::Failed);

        let server_error = ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, Value::Null);
        assert_eq!(SubmitOutcome::from_response(&server_error), SubmitOutcome::Failed);
    }

    #[tokio::test]
    async fn test_submit_success_resets_form() {
        let api = FakeOrders::answering(StatusCode::OK, json!({ "data": { "status": true } }));
        let mut form = form();

        let outcome = form.submit(&api).await;

        assert_eq!(outcome, Some(SubmitOutcome::Placed));
        assert_eq!(form.values(), &OrderFormValues::default());
        assert_eq!(form.values().quantity, "1");
        assert_eq!(form.toast(), Some(&Toast::PLACED));

        let received = api.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].cod_amount, "680");
        assert_eq!(received[0].delivery_charge, "80");
        assert_eq!(received[0].product_ids, "42");
    }

    #[tokio::test]
    async fn test_submit_field_rejection_keeps_values() {
        let api = FakeOrders::answering(
            StatusCode::OK,
            json!({ "data": { "status": false, "error": { "c_phone": ["invalid"] } } }),
        );
        let mut form = form();

        form.submit(&api).await;

        assert_eq!(form.errors().get(OrderField::Phone), Some("invalid"));
        assert_eq!(form.values(), &valid_values());
        assert_eq!(form.toast(), Some(&Toast::CHECK_FIELDS));
    }

    #[tokio::test]
    async fn test_submit_transport_error_shows_generic_failure() {
        let api = FakeOrders::unreachable();
        let mut form = form();

        let outcome = form.submit(&api).await;

        assert_eq!(outcome, Some(SubmitOutcome::Failed));
        assert_eq!(form.values(), &valid_values());
        assert_eq!(form.toast(), Some(&Toast::FAILED));
    }

    #[tokio::test]
    async fn test_submit_invalid_input_skips_api() {
        let api = FakeOrders::answering(StatusCode::OK, Value::Null);
        let mut form = OrderForm::new(ProductId::from("42"), Price::from_whole(200));

        let outcome = form.submit(&api).await;

        assert_eq!(outcome, None);
        assert!(!form.errors().is_empty());
        assert!(form.toast().is_none());
        assert!(api.received.lock().unwrap().is_empty());
    }
}
