//! Seller account document.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A seller account as stored in the `sellers` collection.
///
/// `products` is the denormalized list of product ids owned by this seller;
/// it is `$push`ed on product creation and `$pull`ed on product deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    /// Argon2id password hash. Never serialized to clients - see [`SellerView`].
    pub password: String,
    pub company_name: String,
    pub address: String,
    pub is_seller: bool,
    pub approved: bool,
    #[serde(default)]
    pub products: Vec<ObjectId>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Client-facing view of a seller, with the password hash stripped and the
/// id rendered as a hex string.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub company_name: String,
    pub address: String,
    pub is_seller: bool,
    pub approved: bool,
    pub products: Vec<String>,
}

impl From<&Seller> for SellerView {
    fn from(seller: &Seller) -> Self {
        Self {
            id: seller.id.to_hex(),
            username: seller.username.clone(),
            email: seller.email.clone(),
            company_name: seller.company_name.clone(),
            address: seller.address.clone(),
            is_seller: seller.is_seller,
            approved: seller.approved,
            products: seller.products.iter().map(|id| id.to_hex()).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_seller() -> Seller {
        Seller {
            id: ObjectId::new(),
            username: "astro".to_owned(),
            email: "astro@example.com".to_owned(),
            password: "$argon2id$v=19$m=19456,t=2,p=1$salt$hash".to_owned(),
            company_name: "Astro Gadgets".to_owned(),
            address: "1 Orbit Way".to_owned(),
            is_seller: true,
            approved: false,
            products: vec![ObjectId::new()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_view_strips_password_hash() {
        let seller = sample_seller();
        let view = SellerView::from(&seller);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains(&seller.id.to_hex()));
    }

    #[test]
    fn test_document_field_names_are_camel_case() {
        let seller = sample_seller();
        let doc = bson::to_document(&seller).unwrap();
        assert!(doc.contains_key("_id"));
        assert!(doc.contains_key("companyName"));
        assert!(doc.contains_key("isSeller"));
        assert!(doc.contains_key("createdAt"));
    }
}
