/// Database configuration and connection management
pub mod database;

/// Storefront settings loading from storefront.toml
pub mod storefront;
