//! Favorite products, unique by id.

use pazar_core::{Product, ProductId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    items: Vec<Product>,
}

impl Favorites {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `product` if present, otherwise add it. Returns whether the
    /// product is a favorite afterwards.
    pub fn toggle(&mut self, product: Product) -> bool {
        if let Some(idx) = self.items.iter().position(|p| p.id == product.id) {
            self.items.remove(idx);
            false
        } else {
            self.items.push(product);
            true
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn is_favorite(&self, id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == id)
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
