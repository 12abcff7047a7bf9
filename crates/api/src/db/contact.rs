//! Contact-message repository.

use bson::doc;
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use tracing::instrument;

use orbit_market_core::MessageId;

use super::RepositoryError;
use crate::models::ContactMessage;

/// Repository for contact-form messages.
pub struct ContactRepository {
    collection: Collection<ContactMessage>,
}

impl ContactRepository {
    /// Create a new contact-message repository.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("contactMessages"),
        }
    }

    /// List every message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Insert a new message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn insert(&self, message: &ContactMessage) -> Result<(), RepositoryError> {
        self.collection.insert_one(message).await?;
        Ok(())
    }

    /// Delete a message by id.
    ///
    /// # Returns
    ///
    /// Returns `true` if the message was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: MessageId) -> Result<bool, RepositoryError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
