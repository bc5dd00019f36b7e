//! Ayushyaa Core - Shared types library.
//!
//! This crate provides the domain types used across the Ayushyaa storefront
//! components:
//! - `storefront` - catalog loading, cart persistence, and checkout
//! - any rendering layer or tool that consumes the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no filesystem access. The cart merge semantics and order
//! assembly arithmetic live here so they can be tested without a backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and status enums
//! - [`catalog`] - Read-only product, category, and variant models
//! - [`cart`] - The cart and its merge-by-key operations
//! - [`order`] - Order assembly from a cart snapshot

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod types;

pub use cart::{Cart, CartItem};
pub use catalog::{Category, NoVariants, Product, ProductVariant, ProductWithVariants};
pub use order::{CustomerInfo, Order, OrderItem, OrderNumber};
pub use types::*;
