//! User repository.

use bson::doc;
use mongodb::{Collection, Database};
use tracing::instrument;

use orbit_market_core::UserId;

use super::RepositoryError;
use crate::models::User;

/// Repository for customer documents.
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = self
            .collection
            .find_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(user)
    }

    /// Delete a user by id.
    ///
    /// # Returns
    ///
    /// Returns `true` if the user was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
