//! Checkout (completed order) document.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single line item within a checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product: ObjectId,
    pub quantity: i64,
}

/// A completed order as stored in the `checkouts` collection.
///
/// `createdAt` drives the time-bucketed sales report, so it must be stored
/// as a BSON datetime (not a string) for `$dateToString` to work server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user: ObjectId,
    pub items: Vec<CheckoutItem>,
    pub total_cost: f64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_created_at_is_bson_datetime() {
        let checkout = Checkout {
            id: ObjectId::new(),
            user: ObjectId::new(),
            items: vec![CheckoutItem {
                product: ObjectId::new(),
                quantity: 2,
            }],
            total_cost: 89.98,
            created_at: Utc::now(),
        };

        let doc = bson::to_document(&checkout).unwrap();
        assert!(matches!(
            doc.get("createdAt"),
            Some(bson::Bson::DateTime(_))
        ));
        assert!(doc.contains_key("totalCost"));
    }
}
