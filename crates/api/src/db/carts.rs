//! Cart repository.

use bson::doc;
use mongodb::{Collection, Database};
use tracing::instrument;

use orbit_market_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItem};

/// Repository for cart documents. One cart per user, created lazily on the
/// first add via upsert.
pub struct CartRepository {
    collection: Collection<Cart>,
}

impl CartRepository {
    /// Create a new cart repository.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("carts"),
        }
    }

    /// Get a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_user(&self, user: UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart = self
            .collection
            .find_one(doc! { "user": user.as_object_id() })
            .await?;
        Ok(cart)
    }

    /// Push a line onto the user's cart, creating the cart if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: i64,
    ) -> Result<(), RepositoryError> {
        let item = bson::to_bson(&CartItem {
            product: product.as_object_id(),
            quantity,
        })
        .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        self.collection
            .update_one(
                doc! { "user": user.as_object_id() },
                doc! {
                    "$push": { "items": item },
                    "$set": { "updatedAt": bson::DateTime::now() },
                },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    /// Pull every line for the given product from the user's cart.
    ///
    /// # Returns
    ///
    /// Returns `true` if the cart existed, `false` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "user": user.as_object_id() },
                doc! {
                    "$pull": { "items": { "product": product.as_object_id() } },
                    "$set": { "updatedAt": bson::DateTime::now() },
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}
