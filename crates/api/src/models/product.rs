//! Product catalog document.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product as stored in the `products` collection.
///
/// `manufacturer` references the owning seller; `reviews` holds review ids
/// appended as customers post them. `rating` is the externally-maintained
/// average used by the seller rating rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub product_code: String,
    pub title: String,
    /// Primary image URL on the external image host.
    pub image_url: String,
    /// Three thumbnail URLs, in display order.
    pub thumbnail_urls: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    /// List price before discount.
    pub mrp: f64,
    pub price: f64,
    pub stock: i64,
    pub brand: String,
    pub manufacturer: ObjectId,
    pub available: bool,
    pub category: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub sold: i64,
    #[serde(default)]
    pub reviews: Vec<ObjectId>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether at least one review references this product.
    #[must_use]
    pub fn has_reviews(&self) -> bool {
        !self.reviews.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_document_shape() {
        let product = Product {
            id: ObjectId::new(),
            product_code: "ORB-100".to_owned(),
            title: "Ion Charger".to_owned(),
            image_url: "https://img.example.com/orb-100.jpg".to_owned(),
            thumbnail_urls: vec![
                "https://img.example.com/orb-100-t1.jpg".to_owned(),
                "https://img.example.com/orb-100-t2.jpg".to_owned(),
                "https://img.example.com/orb-100-t3.jpg".to_owned(),
            ],
            description: "Fast charger".to_owned(),
            features: vec!["65W".to_owned(), "GaN".to_owned()],
            mrp: 59.99,
            price: 44.99,
            stock: 12,
            brand: "Orbit".to_owned(),
            manufacturer: ObjectId::new(),
            available: true,
            category: "chargers".to_owned(),
            rating: 4.5,
            sold: 3,
            reviews: vec![],
            created_at: Utc::now(),
        };

        let doc = bson::to_document(&product).unwrap();
        assert!(doc.contains_key("productCode"));
        assert!(doc.contains_key("imageUrl"));
        assert!(doc.contains_key("thumbnailUrls"));
        assert!(doc.contains_key("manufacturer"));
        assert!(!product.has_reviews());
    }
}
