//! Per-session wiring of the storefront services.
//!
//! A [`Storefront`] is built once when the app starts and handed to the UI,
//! which reads the catalog, edits the cart and wishlist, and drives checkout
//! through it.

use crate::{
    config::{
        database,
        storefront::{self as settings, StorefrontConfig},
    },
    core::{
        cart::Cart,
        catalog::Catalog,
        checkout::{CheckoutSession, Confirmation},
        money::{self, Currency, ExchangeRates},
        order_store::OrderStore,
        validation::{DeliveryInfo, PaymentInfo},
        wishlist::Wishlist,
    },
    errors::{Result, ValidationError},
};
use sea_orm::DatabaseConnection;
use std::{path::Path, sync::Arc};
use tracing::info;

/// All session state for one storefront user.
#[derive(Debug)]
pub struct Storefront {
    /// Products on sale
    pub catalog: Catalog,
    /// Current cart
    pub cart: Cart,
    /// Saved products
    pub wishlist: Wishlist,
    /// Persisted order history, shared with checkout
    pub orders: Arc<OrderStore>,
    /// Checkout state for the current cart
    pub checkout: CheckoutSession,
    rates: ExchangeRates,
}

impl Storefront {
    /// Builds the services from `config` over an initialized database.
    ///
    /// # Errors
    /// Returns an error if the configured currencies or products are invalid.
    pub fn from_config(config: &StorefrontConfig, db: DatabaseConnection) -> Result<Self> {
        let rates = config.exchange_rates()?;
        let catalog = config.catalog()?;
        let orders =
            Arc::new(OrderStore::new(db).with_load_delay(config.history_load_delay()));

        info!("Storefront ready with {} products", catalog.len());
        Ok(Self {
            catalog,
            cart: Cart::with_policy(config.duplicate_policy),
            wishlist: Wishlist::default(),
            checkout: CheckoutSession::new(Arc::clone(&orders), rates.clone()),
            orders,
            rates,
        })
    }

    /// Loads `./storefront.toml` (defaults when absent), connects to
    /// `DATABASE_URL`, and builds the services.
    ///
    /// # Errors
    /// Returns an error if the config file is invalid or the database cannot
    /// be opened.
    pub async fn open() -> Result<Self> {
        let config = if Path::new("storefront.toml").exists() {
            settings::load_default_config()?
        } else {
            info!("No storefront.toml found, using built-in settings");
            StorefrontConfig::default()
        };
        let db = database::create_connection().await?;
        Self::from_config(&config, db)
    }

    /// Exchange rates in effect for this session.
    #[must_use]
    pub const fn rates(&self) -> &ExchangeRates {
        &self.rates
    }

    /// Cart total in `currency`.
    #[must_use]
    pub fn cart_total(&self, currency: Currency) -> f64 {
        self.cart.total(currency, &self.rates)
    }

    /// Cart total in `currency`, formatted for display.
    #[must_use]
    pub fn formatted_cart_total(&self, currency: Currency) -> String {
        money::format(self.cart_total(currency), currency)
    }

    /// Confirms the current cart as an order.
    ///
    /// # Errors
    /// Returns the [`ValidationError`] for an incomplete checkout form.
    pub async fn place_order(
        &mut self,
        delivery: &DeliveryInfo,
        payment: &PaymentInfo,
        currency: Currency,
    ) -> std::result::Result<Confirmation, ValidationError> {
        self.checkout
            .confirm(&self.cart, delivery, payment, currency)
            .await
    }

    /// Dismisses the confirmation and empties the cart.
    pub fn finish_checkout(&mut self) -> Option<Confirmation> {
        self.checkout.finalize(&mut self.cart)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::catalog::SortOrder;
    use crate::test_utils::{init_test_tracing, setup_test_db};

    #[tokio::test]
    async fn test_browse_add_and_check_out() -> Result<()> {
        init_test_tracing();
        let mut shop = Storefront::from_config(&StorefrontConfig::default(), setup_test_db().await?)?;

        let cheapest = shop.catalog.search("apple", SortOrder::PriceAscending)[0].clone();
        assert_eq!(cheapest.name, "Apple TV 4K");
        let line = shop.cart.add(cheapest.clone());
        shop.cart.set_quantity(line, 2);
        shop.wishlist.add(cheapest);

        assert_eq!(shop.cart_total(Currency::Inr), 29800.0);
        assert_eq!(shop.formatted_cart_total(Currency::Inr), "₹29,800.00");
        assert_eq!(shop.formatted_cart_total(Currency::Usd), "USD 357.60");

        let confirmation = shop
            .place_order(
                &DeliveryInfo::new("Ravi", "7 Park Street, Kolkata"),
                &PaymentInfo::upi("ravi@upi"),
                Currency::Inr,
            )
            .await
            .unwrap();
        assert!(confirmation.is_saved());
        assert_eq!(confirmation.order.item_summary(), "Apple TV 4K (2)");

        shop.finish_checkout();
        assert!(shop.cart.is_empty());
        assert_eq!(shop.wishlist.products().len(), 1);
        assert_eq!(shop.orders.load_recent().await, vec![confirmation.order]);
        Ok(())
    }

    #[tokio::test]
    async fn test_config_drives_services() -> Result<()> {
        let config: StorefrontConfig = toml::from_str(
            r#"
            duplicate_policy = "merge_quantity"
            [currencies]
            USD = 0.01
            [[products]]
            name = "Lightning Cable"
            price = 1900.0
            "#,
        )
        .unwrap();
        let mut shop = Storefront::from_config(&config, setup_test_db().await?)?;

        assert_eq!(shop.catalog.len(), 1);
        let cable = shop.catalog.list()[0].clone();
        shop.cart.add(cable.clone());
        shop.cart.add(cable);
        assert_eq!(shop.cart.lines().len(), 1);
        assert_eq!(shop.cart_total(Currency::Usd), 38.0);
        Ok(())
    }
}
