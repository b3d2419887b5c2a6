//! Shared test utilities for the storefront engine.
//!
//! This module provides common helper functions for setting up test databases
//! and building test orders with sensible defaults.

use crate::{
    core::order_store::OrderStore,
    errors::Result,
    models::{Order, OrderItem, OrderStatus, PaymentMethod, Product},
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Installs a `trace`-level subscriber that writes through the test harness.
/// Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all persistence tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// An order store over a fresh in-memory database.
pub async fn setup_order_store() -> Result<OrderStore> {
    Ok(OrderStore::new(setup_test_db().await?))
}

/// Creates a pending cash-on-delivery order with one item priced at `total`.
///
/// # Defaults
/// * item: "Test Product", quantity 1
/// * `shipping_address`: "1 Test Lane"
pub fn create_test_order(total: f64) -> Order {
    Order {
        id: Uuid::new_v4(),
        order_code: crate::core::checkout::generate_order_code(),
        items: vec![OrderItem {
            product: Product::new("Test Product", total, "test", 4, "A test product."),
            quantity: 1,
        }],
        total_amount: total,
        date: Utc::now(),
        status: OrderStatus::Pending,
        payment_method: PaymentMethod::CashOnDelivery,
        shipping_address: "1 Test Lane".to_string(),
    }
}
