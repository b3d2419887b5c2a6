//! Product catalog - a fixed, in-memory product list with search and sorting.
//!
//! The catalog is loaded once per session, either from the built-in product
//! list or from `[[products]]` entries in `storefront.toml`. All operations
//! are pure and return owned snapshots so the UI can hold them freely.

use crate::models::Product;
use uuid::Uuid;

/// Price ordering applied to catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Keep catalog order
    #[default]
    None,
    /// Cheapest first
    PriceAscending,
    /// Most expensive first
    PriceDescending,
}

/// Static product list.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_products(builtin_products())
    }
}

impl Catalog {
    /// Builds a catalog from an explicit product list, keeping its order.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Every product in catalog order.
    #[must_use]
    pub fn list(&self) -> Vec<Product> {
        self.products.clone()
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products whose name contains `query`, ignoring case. An empty query
    /// matches everything.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// All products ordered by price. Equal prices keep catalog order.
    #[must_use]
    pub fn sort(&self, order: SortOrder) -> Vec<Product> {
        sort_by_price(self.list(), order)
    }

    /// Filter by `query`, then order by price.
    #[must_use]
    pub fn search(&self, query: &str, order: SortOrder) -> Vec<Product> {
        sort_by_price(self.filter(query), order)
    }

    /// Looks a product up by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

fn sort_by_price(mut products: Vec<Product>, order: SortOrder) -> Vec<Product> {
    match order {
        SortOrder::None => {}
        SortOrder::PriceAscending => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOrder::PriceDescending => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }
    products
}

fn builtin_products() -> Vec<Product> {
    vec![
        Product::new("iPhone 16", 69999.0, "iphone16", 5, "The latest iPhone with A17 chip."),
        Product::new(
            "iPhone 16 Pro",
            119_000.0,
            "iphone16pro",
            5,
            "Premium flagship with advanced camera.",
        ),
        Product::new(
            "iPhone 16 Pro Max",
            144_900.0,
            "iphone16promax",
            5,
            "Best of the best.",
        ),
        Product::new(
            "MacBook Pro M3",
            239_000.0,
            "macbookpro3",
            4,
            "Powerful laptop for professionals.",
        ),
        Product::new(
            "AirPods Pro 2",
            24900.0,
            "airpods",
            5,
            "Noise-cancelling wireless earbuds.",
        ),
        Product::new(
            "Apple Watch Series 9",
            41900.0,
            "applewatch",
            4,
            "Stay connected and healthy.",
        ),
        Product::new(
            "iPad Pro M2",
            128_000.0,
            "ipadprom2",
            5,
            "A powerful tablet for work and creativity.",
        ),
        Product::new(
            "HomePod (2nd Gen)",
            32900.0,
            "homepods",
            4,
            "Smart speaker with spatial audio.",
        ),
        Product::new(
            "Apple TV 4K",
            14900.0,
            "appletv4k",
            4,
            "Streaming device with high-quality visuals.",
        ),
        Product::new(
            "Apple Vision Pro",
            299_999.0,
            "applevisionpro",
            5,
            "A revolutionary AR/VR headset.",
        ),
    ]
}
