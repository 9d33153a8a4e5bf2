//! Core types for the Refabry storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod courier;
pub mod id;
pub mod order;
pub mod phone;
pub mod price;
pub mod product;

pub use courier::{Courier, CourierError};
pub use id::*;
pub use order::{DELIVERY_CHARGE, OrderPayload, cash_on_delivery};
pub use phone::{Phone, PhoneError};
pub use price::{Price, PriceError};
pub use product::{Category, Product};
