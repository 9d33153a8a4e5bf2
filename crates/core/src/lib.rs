//! Refabry Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront and its tests:
//! products as the catalog API returns them, prices, customer phone numbers,
//! courier choices, and the order payload sent to the order API.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Anything that talks to the network lives in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers and domain records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
