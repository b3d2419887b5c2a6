//! Shopping cart - transient, session-scoped collection of product lines.
//!
//! Lines keep insertion order. Each line has its own id so the same product
//! can appear twice (the default [`DuplicatePolicy::AppendLine`]) and still be
//! addressed individually by `set_quantity` and `remove`.

use crate::{
    core::money::{Currency, ExchangeRates},
    models::{OrderItem, Product},
};
use serde::Deserialize;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Smallest quantity a line can hold.
pub const MIN_QUANTITY: u32 = 1;
/// Largest quantity a line can hold.
pub const MAX_QUANTITY: u32 = 10;

/// What `add` does when the product is already in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Append a separate line with quantity 1
    #[default]
    AppendLine,
    /// Bump the existing line's quantity by one, up to the maximum
    MergeQuantity,
}

/// A product in the cart with its chosen quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Identifies this line, independent of the product id
    pub line_id: Uuid,
    /// Product as it was when added
    pub product: Product,
    /// Units on this line, within the quantity bounds
    pub quantity: u32,
}

impl CartLine {
    /// `price * quantity` in the base currency.
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// The active session's cart.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    policy: DuplicatePolicy,
}

impl Cart {
    /// Empty cart using the given duplicate policy.
    #[must_use]
    pub const fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            lines: Vec::new(),
            policy,
        }
    }

    /// Adds `product` and returns the id of the line that now holds it.
    pub fn add(&mut self, product: Product) -> Uuid {
        let existing = match self.policy {
            DuplicatePolicy::MergeQuantity => {
                self.lines.iter_mut().find(|l| l.product.id == product.id)
            }
            DuplicatePolicy::AppendLine => None,
        };
        if let Some(line) = existing {
            line.quantity = clamp_quantity(line.quantity.saturating_add(1));
            return line.line_id;
        }

        let line_id = Uuid::new_v4();
        tracing::debug!("Adding '{}' to cart as line {}", product.name, line_id);
        self.lines.push(CartLine {
            line_id,
            product,
            quantity: MIN_QUANTITY,
        });
        line_id
    }

    /// Sets a line's quantity, clamped to `[1, 10]`. Returns the stored
    /// quantity, or `None` if the line does not exist.
    pub fn set_quantity(&mut self, line_id: Uuid, quantity: u32) -> Option<u32> {
        let line = self.lines.iter_mut().find(|l| l.line_id == line_id)?;
        line.quantity = clamp_quantity(quantity);
        Some(line.quantity)
    }

    /// Removes a line. Returns it if it existed.
    pub fn remove(&mut self, line_id: Uuid) -> Option<CartLine> {
        let index = self.lines.iter().position(|l| l.line_id == line_id)?;
        Some(self.lines.remove(index))
    }

    /// Removes the lines at `indices`; out-of-range indices are ignored.
    /// Returns how many lines were removed.
    pub fn remove_at(&mut self, indices: &[usize]) -> usize {
        let doomed: BTreeSet<usize> = indices
            .iter()
            .copied()
            .filter(|i| *i < self.lines.len())
            .collect();

        let mut index = 0;
        self.lines.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
        doomed.len()
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of line subtotals in the base currency. A non-finite or
    /// non-positive sum is reported as 0.
    #[must_use]
    pub fn base_total(&self) -> f64 {
        let total: f64 = self.lines.iter().map(CartLine::subtotal).sum();
        if total.is_finite() && total > 0.0 {
            total
        } else {
            0.0
        }
    }

    /// Cart total converted into `currency` and rounded to cents.
    #[must_use]
    pub fn total(&self, currency: Currency, rates: &ExchangeRates) -> f64 {
        rates.convert(self.base_total(), currency)
    }

    /// Deep copy of the lines as order items.
    #[must_use]
    pub fn snapshot(&self) -> Vec<OrderItem> {
        self.lines
            .iter()
            .map(|l| OrderItem {
                product: l.product.clone(),
                quantity: l.quantity,
            })
            .collect()
    }
}

fn clamp_quantity(quantity: u32) -> u32 {
    quantity.clamp(MIN_QUANTITY, MAX_QUANTITY)
}
