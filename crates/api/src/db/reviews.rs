//! Review repository.

use bson::{doc, oid::ObjectId};
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};

use super::RepositoryError;
use crate::models::{Review, ReviewSummary};

/// Repository for review documents.
pub struct ReviewRepository {
    collection: Collection<Review>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("reviews"),
        }
    }

    /// Resolve review ids into their projected summaries:
    /// only `{product, reviewText, reviewRating, createdAt}` is fetched.
    ///
    /// Duplicate ids in the input are harmless; `$in` matches each stored
    /// document once.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_summaries_by_ids(
        &self,
        ids: &[ObjectId],
    ) -> Result<Vec<ReviewSummary>, RepositoryError> {
        let cursor = self
            .collection
            .clone_with_type::<ReviewSummary>()
            .find(doc! { "_id": { "$in": ids } })
            .projection(doc! {
                "product": 1,
                "reviewText": 1,
                "reviewRating": 1,
                "createdAt": 1,
            })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Insert a new review document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn insert(&self, review: &Review) -> Result<(), RepositoryError> {
        self.collection.insert_one(review).await?;
        Ok(())
    }
}
