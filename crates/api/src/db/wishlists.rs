//! Wishlist repository.

use bson::doc;
use mongodb::{Collection, Database};
use tracing::instrument;

use orbit_market_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::Wishlist;

/// Repository for wishlist documents. One wishlist per user, created lazily
/// on the first add via upsert.
pub struct WishlistRepository {
    collection: Collection<Wishlist>,
}

impl WishlistRepository {
    /// Create a new wishlist repository.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("wishlists"),
        }
    }

    /// Get a user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_user(&self, user: UserId) -> Result<Option<Wishlist>, RepositoryError> {
        let wishlist = self
            .collection
            .find_one(doc! { "user": user.as_object_id() })
            .await?;
        Ok(wishlist)
    }

    /// Add a product to the user's wishlist (set semantics: re-adding an
    /// already-listed product is a no-op).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self))]
    pub async fn add_product(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<(), RepositoryError> {
        self.collection
            .update_one(
                doc! { "user": user.as_object_id() },
                doc! {
                    "$addToSet": { "products": product.as_object_id() },
                    "$set": { "updatedAt": bson::DateTime::now() },
                },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    /// Remove a product from the user's wishlist.
    ///
    /// # Returns
    ///
    /// Returns `true` if the wishlist existed, `false` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self))]
    pub async fn remove_product(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "user": user.as_object_id() },
                doc! {
                    "$pull": { "products": product.as_object_id() },
                    "$set": { "updatedAt": bson::DateTime::now() },
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}
