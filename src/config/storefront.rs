//! Storefront configuration loading from storefront.toml
//!
//! Every section is optional. Missing currency rates keep their built-in
//! values, an empty `[[products]]` list means the built-in catalog, and the
//! history load delay defaults to none.

use crate::{
    core::{
        cart::DuplicatePolicy,
        catalog::Catalog,
        money::{Currency, ExchangeRates},
    },
    errors::{Error, Result},
    models::Product,
};
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path, time::Duration};
use tracing::warn;

/// Configuration structure representing the entire storefront.toml file
#[derive(Debug, Default, Deserialize)]
pub struct StorefrontConfig {
    /// Multipliers from INR keyed by currency code
    #[serde(default)]
    pub currencies: BTreeMap<String, f64>,
    /// Catalog products; the built-in catalog is used when empty
    #[serde(default)]
    pub products: Vec<ProductConfig>,
    /// Artificial delay before order history loads, in milliseconds
    #[serde(default)]
    pub history_load_delay_ms: u64,
    /// Cart behaviour when a product is added twice
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

/// Configuration for a single catalog product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    /// Display name
    pub name: String,
    /// Unit price in INR
    pub price: f64,
    /// Image asset name
    #[serde(default)]
    pub image_name: String,
    /// Star rating, 0 to 5
    #[serde(default)]
    pub rating: u8,
    /// Short description
    #[serde(default)]
    pub description: String,
}

impl StorefrontConfig {
    /// Built-in rates overridden by the `[currencies]` table.
    ///
    /// # Errors
    /// Returns `Error::Config` for a currency code the storefront does not support.
    pub fn exchange_rates(&self) -> Result<ExchangeRates> {
        let mut rates = ExchangeRates::default();
        for (code, rate) in &self.currencies {
            let currency: Currency = code.parse()?;
            if !rate.is_finite() || *rate <= 0.0 {
                warn!("Rate {} for {} is unusable; conversions will use 1.0", rate, code);
            }
            rates = rates.with_rate(currency, *rate);
        }
        Ok(rates)
    }

    /// The configured catalog, or the built-in one when no products are listed.
    ///
    /// # Errors
    /// - `Error::Config` if a product name is blank or its rating exceeds 5
    /// - `Error::InvalidAmount` if a price is negative or not finite
    pub fn catalog(&self) -> Result<Catalog> {
        if self.products.is_empty() {
            return Ok(Catalog::default());
        }

        let products = self
            .products
            .iter()
            .map(ProductConfig::to_product)
            .collect::<Result<Vec<_>>>()?;
        Ok(Catalog::from_products(products))
    }

    /// How long order history loading should pause.
    #[must_use]
    pub const fn history_load_delay(&self) -> Duration {
        Duration::from_millis(self.history_load_delay_ms)
    }
}

impl ProductConfig {
    fn to_product(&self) -> Result<Product> {
        if self.name.trim().is_empty() {
            return Err(Error::Config {
                message: "Product name cannot be empty".to_string(),
            });
        }

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::InvalidAmount { amount: self.price });
        }

        if self.rating > 5 {
            return Err(Error::Config {
                message: format!("Rating for '{}' must be between 0 and 5", self.name),
            });
        }

        Ok(Product::new(
            self.name.trim(),
            self.price,
            self.image_name.clone(),
            self.rating,
            self.description.clone(),
        ))
    }
}

/// Loads storefront configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StorefrontConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse storefront.toml: {e}"),
    })
}

/// Loads storefront configuration from the default location (./storefront.toml)
pub fn load_default_config() -> Result<StorefrontConfig> {
    load_config("storefront.toml")
}
