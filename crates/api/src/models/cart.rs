//! Shopping cart document.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: ObjectId,
    pub quantity: i64,
}

/// A user's cart as stored in the `carts` collection. One document per user;
/// items are `$push`ed on add and `$pull`ed on remove.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user: ObjectId,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}
