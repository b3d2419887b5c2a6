//! Plain data types shared by the catalog, cart and order history.
//!
//! Orders are persisted as JSON, so the serialized field names here are the
//! on-disk schema of the `orderHistory` blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::errors::ValidationError;

/// A catalog product. Prices are in the base currency (INR).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier
    pub id: Uuid,
    /// Display name, also the field catalog search matches against
    pub name: String,
    /// Unit price in INR
    #[serde(rename = "priceINR")]
    pub price: f64,
    /// Asset name of the product image
    pub image_name: String,
    /// Star rating, 0 to 5
    pub rating: u8,
    /// Short marketing description
    pub description: String,
}

impl Product {
    /// Creates a product with a fresh id.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: f64,
        image_name: impl Into<String>,
        rating: u8,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            image_name: image_name.into(),
            rating,
            description: description.into(),
        }
    }
}

/// One product in a placed order, frozen at confirmation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product fields, stored flat alongside the quantity
    #[serde(flatten)]
    pub product: Product,
    /// Units ordered
    pub quantity: u32,
}

impl OrderItem {
    /// `price * quantity` in the base currency.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Fulfillment status. The engine only ever produces [`OrderStatus::Pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Placed, not yet shipped
    Pending,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Cancelled before delivery
    Cancelled,
}

impl OrderStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the customer pays. Serialized as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Credit card
    #[serde(rename = "Credit Card")]
    CreditCard,
    /// Debit card
    #[serde(rename = "Debit Card")]
    DebitCard,
    /// Unified Payments Interface
    #[serde(rename = "UPI")]
    Upi,
    /// Paid in cash on delivery
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// All methods in picker order.
    pub const ALL: [Self; 4] = [
        Self::CreditCard,
        Self::DebitCard,
        Self::Upi,
        Self::CashOnDelivery,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::Upi => "UPI",
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.label() == s)
            .ok_or(ValidationError::UnknownPaymentMethod)
    }
}

/// A placed order as stored in the order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier
    pub id: Uuid,
    /// Customer-facing code, `ORD` followed by six digits
    #[serde(rename = "orderID")]
    pub order_code: String,
    /// Snapshot of the cart at confirmation time
    pub items: Vec<OrderItem>,
    /// Total in the currency selected at confirmation, rounded to cents
    pub total_amount: f64,
    /// When the order was placed
    pub date: DateTime<Utc>,
    /// Fulfilment status
    pub status: OrderStatus,
    /// How the customer pays
    pub payment_method: PaymentMethod,
    /// Delivery address from the checkout form
    pub shipping_address: String,
}

impl Order {
    /// Total number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// `"Name (qty), Name (qty)"` as shown in the history list.
    #[must_use]
    pub fn item_summary(&self) -> String {
        self.items
            .iter()
            .map(|i| format!("{} ({})", i.product.name, i.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
