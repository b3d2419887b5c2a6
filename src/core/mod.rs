//! Core business logic - framework-agnostic pricing, cart, validation and
//! order history operations. The UI layer calls into these types directly.

/// Shopping cart lines and totals
pub mod cart;
/// Static product catalog with search and sorting
pub mod catalog;
/// Checkout lifecycle from cart to persisted order
pub mod checkout;
/// Opaque blob storage in the key-value table
pub mod kv;
/// Currency conversion and formatting
pub mod money;
/// Order history persistence
pub mod order_store;
/// Checkout form validation rules
pub mod validation;
/// Saved-for-later products
pub mod wishlist;
