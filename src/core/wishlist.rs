//! Wishlist - products saved for later, at most once each.

use crate::models::Product;
use uuid::Uuid;

/// Products saved for later, in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct Wishlist {
    products: Vec<Product>,
}

impl Wishlist {
    /// Adds `product` unless a product with the same id is already present.
    /// Returns whether it was added.
    pub fn add(&mut self, product: Product) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.products.push(product);
        true
    }

    /// Removes the product with `product_id`, returning it if present.
    pub fn remove(&mut self, product_id: Uuid) -> Option<Product> {
        let index = self.products.iter().position(|p| p.id == product_id)?;
        Some(self.products.remove(index))
    }

    /// Whether the product with `product_id` is saved.
    #[must_use]
    pub fn contains(&self, product_id: Uuid) -> bool {
        self.products.iter().any(|p| p.id == product_id)
    }

    /// Saved products, oldest first.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_add_is_idempotent_per_product() {
        let mut wishlist = Wishlist::default();
        let watch = Product::new("Apple Watch Series 9", 41900.0, "applewatch", 4, "");

        assert!(wishlist.add(watch.clone()));
        assert!(!wishlist.add(watch.clone()));
        assert_eq!(wishlist.products().len(), 1);
        assert!(wishlist.contains(watch.id));
    }

    #[test]
    fn test_remove() {
        let mut wishlist = Wishlist::default();
        let tv = Product::new("Apple TV 4K", 14900.0, "appletv4k", 4, "");
        let pod = Product::new("HomePod (2nd Gen)", 32900.0, "homepods", 4, "");
        wishlist.add(tv.clone());
        wishlist.add(pod.clone());

        assert_eq!(wishlist.remove(tv.id).unwrap().name, "Apple TV 4K");
        assert!(wishlist.remove(tv.id).is_none());
        assert_eq!(wishlist.products(), &[pod]);
    }
}
