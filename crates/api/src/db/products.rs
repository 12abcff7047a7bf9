//! Product repository.

use bson::{doc, oid::ObjectId};
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use tracing::instrument;

use orbit_market_core::{ProductId, SellerId};

use super::RepositoryError;
use crate::models::Product;

/// Repository for product documents.
pub struct ProductRepository {
    collection: Collection<Product>,
}

impl ProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("products"),
        }
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = self
            .collection
            .find_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(product)
    }

    /// All products owned by a seller, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_manufacturer(
        &self,
        seller: SellerId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let cursor = self
            .collection
            .find(doc! { "manufacturer": seller.as_object_id() })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Resolve a set of product ids into documents.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Product>, RepositoryError> {
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids } })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Insert a new product document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self, product), fields(code = %product.product_code))]
    pub async fn insert(&self, product: &Product) -> Result<(), RepositoryError> {
        self.collection.insert_one(product).await?;
        Ok(())
    }

    /// Delete a product by id.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
