//! Catalog wire types: products and categories.
//!
//! These mirror the JSON shapes served by the backend REST API
//! (`/api/products/` and `/api/categories/`). The backend is the source of
//! truth for stock; the storefront only snapshots these values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};

/// A product as returned by `GET /api/products/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in the store currency's standard unit.
    pub price: Decimal,
    /// Units available. Never negative on the wire; stock checks treat
    /// zero as out of stock.
    pub stock: i32,
    #[serde(default)]
    pub description: Option<String>,
    /// Relative image path, e.g. `/static/images/products/xyz.jpg`.
    pub image: String,
    pub category_id: CategoryId,
}

impl Product {
    /// Whether any units are available for purchase.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A category as returned by `GET /api/categories/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    /// Populated on detail responses; empty on list responses.
    #[serde(default)]
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product_json() -> &'static str {
        r#"{
            "id": 12,
            "name": "Heather Grey T-Shirt",
            "price": 499.0,
            "stock": 3,
            "description": null,
            "image": "/static/images/products/grey-tee.jpg",
            "category_id": 2
        }"#
    }

    #[test]
    fn test_product_deserializes_backend_shape() {
        let product: Product = serde_json::from_str(sample_product_json()).expect("deserialize");
        assert_eq!(product.id, ProductId::new(12));
        assert_eq!(product.price, Decimal::new(499, 0));
        assert!(product.in_stock());
    }

    #[test]
    fn test_out_of_stock() {
        let mut product: Product =
            serde_json::from_str(sample_product_json()).expect("deserialize");
        product.stock = 0;
        assert!(!product.in_stock());
    }

    #[test]
    fn test_category_products_default_empty() {
        let category: Category =
            serde_json::from_str(r#"{"id": 1, "name": "Men", "slug": "men"}"#)
                .expect("deserialize");
        assert!(category.products.is_empty());
    }
}
