//! Cash-on-delivery order payload.
//!
//! The order API takes every numeric field as a string and expects `advance`
//! and `discount_amount` to be present even though this storefront never
//! fills them.

use serde::{Deserialize, Serialize};

use super::courier::Courier;
use super::id::ProductId;
use super::phone::Phone;
use super::price::Price;

/// Flat delivery charge added to every order, in Taka.
pub const DELIVERY_CHARGE: i64 = 80;

/// Amount collected at delivery: `price * quantity + delivery charge`.
///
/// Saturates rather than overflowing on absurd prices.
///
/// ```
/// use refabry_core::{Price, cash_on_delivery};
///
/// assert_eq!(cash_on_delivery(Price::from_whole(200), 3), Price::from_whole(680));
/// ```
#[must_use]
pub fn cash_on_delivery(price: Price, quantity: u32) -> Price {
    price.times(quantity) + Price::from_whole(DELIVERY_CHARGE)
}

/// Request body for `POST /public/order/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub product_ids: String,
    pub s_product_qty: String,
    pub c_name: String,
    pub c_phone: String,
    pub address: String,
    pub courier: Courier,
    pub advance: Option<String>,
    pub cod_amount: String,
    pub discount_amount: Option<String>,
    pub delivery_charge: String,
}

impl OrderPayload {
    /// Build the payload for a single product ordered at `price`.
    #[must_use]
    pub fn new(
        product_id: &ProductId,
        price: Price,
        quantity: u32,
        name: &str,
        phone: &Phone,
        address: &str,
        courier: Courier,
    ) -> Self {
        Self {
            product_ids: product_id.to_string(),
            s_product_qty: quantity.to_string(),
            c_name: name.to_owned(),
            c_phone: phone.to_string(),
            address: address.to_owned(),
            courier,
            advance: None,
            cod_amount: cash_on_delivery(price, quantity).to_wire(),
            discount_amount: None,
            delivery_charge: DELIVERY_CHARGE.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_cash_on_delivery() {
        assert_eq!(cash_on_delivery(Price::from_whole(200), 3), Price::from_whole(680));
        assert_eq!(cash_on_delivery(Price::from_whole(200), 0), Price::from_whole(80));
        assert_eq!(
            cash_on_delivery(Price::parse("199.5").unwrap(), 2).to_wire(),
            "479"
        );
    }

    #[test]
    fn test_cash_on_delivery_saturates() {
        let huge = Price::new(rust_decimal::Decimal::MAX);
        assert_eq!(cash_on_delivery(huge, u32::MAX), huge);
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload = OrderPayload::new(
            &ProductId::from("42"),
            Price::from_whole(200),
            3,
            "Rahim",
            &Phone::parse("01712345678").unwrap(),
            "House 1, Road 2, Dhaka",
            Courier::Pathao,
        );

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "product_ids": "42",
                "s_product_qty": "3",
                "c_name": "Rahim",
                "c_phone": "01712345678",
                "address": "House 1, Road 2, Dhaka",
                "courier": "pathao",
                "advance": null,
                "cod_amount": "680",
                "discount_amount": null,
                "delivery_charge": "80"
            })
        );
    }
}
