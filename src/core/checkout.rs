//! Checkout lifecycle - turns the cart into a persisted order.
//!
//! A [`CheckoutSession`] moves through
//! `Editing -> Confirmed -> CartCleared`. `confirm` validates the form,
//! snapshots the cart, prices it in the selected currency, and saves the order.
//! A failed save does not block the confirmation; it is reported on the
//! returned [`Confirmation`] instead. The cart is only cleared by `finalize`,
//! once the caller has dismissed the confirmation.

use crate::{
    core::{
        cart::Cart,
        money::{Currency, ExchangeRates},
        order_store::OrderStore,
        validation::{self, DeliveryInfo, PaymentInfo},
    },
    errors::ValidationError,
    models::{Order, OrderStatus},
};
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Whether a confirmed order reached the order history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Appended to the history
    Saved,
    /// Could not be written; the order exists only in this confirmation
    NotSaved {
        /// Why the write failed
        reason: String,
    },
}

/// The result of a successful `confirm`.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    /// The order that was placed
    pub order: Order,
    /// Whether it reached the order history
    pub persistence: PersistOutcome,
}

impl Confirmation {
    /// Whether the order was appended to the history.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.persistence == PersistOutcome::Saved
    }
}

/// Where a checkout attempt currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
    /// Form is being filled in
    Editing {
        /// The last rejection, if any
        last_error: Option<ValidationError>,
    },
    /// Order built and handed to the store, confirmation on screen
    Confirmed(Confirmation),
    /// Confirmation dismissed and cart emptied
    CartCleared,
}

/// Drives one customer's checkout against a shared order store.
#[derive(Debug)]
pub struct CheckoutSession {
    store: Arc<OrderStore>,
    rates: ExchangeRates,
    state: CheckoutState,
}

impl CheckoutSession {
    /// Starts a session in the editing state.
    #[must_use]
    pub fn new(store: Arc<OrderStore>, rates: ExchangeRates) -> Self {
        Self {
            store,
            rates,
            state: CheckoutState::Editing { last_error: None },
        }
    }

    /// Current checkout state.
    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Validates the form and places the order.
    ///
    /// The stored total is the cart total in `currency`, the currency selected
    /// on the checkout screen at this moment. Calling `confirm` again while a
    /// confirmation is pending returns that same confirmation without placing
    /// a second order.
    ///
    /// # Errors
    /// Returns the [`ValidationError`] for an incomplete form. The cart is
    /// untouched and nothing is persisted.
    pub async fn confirm(
        &mut self,
        cart: &Cart,
        delivery: &DeliveryInfo,
        payment: &PaymentInfo,
        currency: Currency,
    ) -> Result<Confirmation, ValidationError> {
        if let CheckoutState::Confirmed(pending) = &self.state {
            warn!(
                "Order {} already confirmed; ignoring repeated confirm",
                pending.order.order_code
            );
            return Ok(pending.clone());
        }

        if let Err(e) = validation::validate(delivery, payment.method, &payment.details) {
            info!("Order validation failed: {}", e);
            self.state = CheckoutState::Editing {
                last_error: Some(e),
            };
            return Err(e);
        }

        let order = Order {
            id: Uuid::new_v4(),
            order_code: generate_order_code(),
            items: cart.snapshot(),
            total_amount: cart.total(currency, &self.rates),
            date: Utc::now(),
            status: OrderStatus::Pending,
            payment_method: payment.method,
            shipping_address: delivery.address.clone(),
        };
        info!(
            "Placing order {} for {} item(s), total {} {}",
            order.order_code,
            order.item_count(),
            order.total_amount,
            currency
        );

        let persistence = match self.store.append(order.clone()).await {
            Ok(()) => PersistOutcome::Saved,
            Err(e) => {
                error!("Order {} was not saved: {}", order.order_code, e);
                PersistOutcome::NotSaved {
                    reason: e.to_string(),
                }
            }
        };

        let confirmation = Confirmation { order, persistence };
        self.state = CheckoutState::Confirmed(confirmation.clone());
        Ok(confirmation)
    }

    /// Dismisses a pending confirmation and empties the cart.
    ///
    /// Returns the dismissed confirmation, or `None` (leaving the cart alone)
    /// when there is nothing to finalize.
    pub fn finalize(&mut self, cart: &mut Cart) -> Option<Confirmation> {
        match std::mem::replace(&mut self.state, CheckoutState::CartCleared) {
            CheckoutState::Confirmed(confirmation) => {
                cart.clear();
                info!("Checkout for {} finalized", confirmation.order.order_code);
                Some(confirmation)
            }
            other => {
                self.state = other;
                None
            }
        }
    }
}

/// `ORD` followed by a random number in `100000..=999999`.
#[must_use]
pub fn generate_order_code() -> String {
    let number: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    format!("ORD{number}")
}
