//! Product snapshots.
//!
//! A [`Product`] is an immutable copy of a catalog record at the time it was
//! fetched. Cart and favorite entries hold their own copies and never track
//! later catalog changes.

use serde::{Deserialize, Serialize};

use crate::types::id::{CategoryId, ProductId};
use crate::types::price::Price;

/// Errors that can occur when constructing an [`ImageList`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageListError {
    /// No image URLs were supplied.
    #[error("a product needs at least one image")]
    Empty,
}

/// Ordered, non-empty list of image URLs. The first entry is the cover image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ImageList(Vec<String>);

impl ImageList {
    /// Build an image list, dropping blank URLs.
    ///
    /// # Errors
    ///
    /// Returns `ImageListError::Empty` if no non-blank URL remains.
    pub fn new(urls: Vec<String>) -> Result<Self, ImageListError> {
        let urls: Vec<String> = urls
            .into_iter()
            .filter(|url| !url.trim().is_empty())
            .collect();
        if urls.is_empty() {
            return Err(ImageListError::Empty);
        }
        Ok(Self(urls))
    }

    /// A list holding exactly one image.
    ///
    /// # Errors
    ///
    /// Returns `ImageListError::Empty` if `url` is blank.
    pub fn single(url: impl Into<String>) -> Result<Self, ImageListError> {
        Self::new(vec![url.into()])
    }

    /// The cover image.
    #[must_use]
    pub fn cover(&self) -> &str {
        self.0.first().map_or("", String::as_str)
    }

    /// All image URLs in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of images (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<String>> for ImageList {
    type Error = ImageListError;

    fn try_from(urls: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(urls)
    }
}

impl From<ImageList> for Vec<String> {
    fn from(list: ImageList) -> Self {
        list.0
    }
}

/// A browsing category as stamped onto products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// An immutable product snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Externally assigned, unique per catalog.
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    pub images: ImageList,
    /// The category the product was requested under, not the upstream one.
    pub category: Category,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_image_list_rejects_empty() {
        assert_eq!(ImageList::new(vec![]), Err(ImageListError::Empty));
        assert_eq!(
            ImageList::new(vec!["  ".to_string()]),
            Err(ImageListError::Empty)
        );
    }

    #[test]
    fn test_image_list_cover() {
        let list = ImageList::new(vec!["a.png".into(), String::new(), "b.png".into()]).unwrap();
        assert_eq!(list.cover(), "a.png");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_product_json_shape() {
        let json = r#"{
            "id": 7,
            "title": "Phone",
            "price": "9.99",
            "description": "A phone",
            "images": ["https://cdn.example.com/7.png"],
            "category": {"id": 1, "name": "Elektronik"}
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.price, Price::from_cents(999));
        assert_eq!(product.images.cover(), "https://cdn.example.com/7.png");
        assert_eq!(product.category.name, "Elektronik");
    }

    #[test]
    fn test_product_without_images_is_rejected() {
        let json = r#"{
            "id": 1, "title": "x", "price": 1, "images": [],
            "category": {"id": 1, "name": "c"}
        }"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
