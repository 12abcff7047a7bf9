//! Seller repository.
//!
//! Owns the `sellers` collection, including the `$push`/`$pull` maintenance
//! of the denormalized product-id list.

use bson::doc;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{Collection, Database, options::ReturnDocument};
use tracing::instrument;

use orbit_market_core::{ProductId, SellerId};

use super::RepositoryError;
use crate::models::Seller;

/// Repository for seller documents.
pub struct SellerRepository {
    collection: Collection<Seller>,
}

impl SellerRepository {
    /// Create a new seller repository.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("sellers"),
        }
    }

    /// List every seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Seller>, RepositoryError> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Get a seller by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: SellerId) -> Result<Option<Seller>, RepositoryError> {
        let seller = self
            .collection
            .find_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(seller)
    }

    /// Get a seller by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Seller>, RepositoryError> {
        let seller = self.collection.find_one(doc! { "email": email }).await?;
        Ok(seller)
    }

    /// Insert a new seller document.
    ///
    /// The email-uniqueness check lives in the auth service; a unique index
    /// on `email` backs it up, and an index violation surfaces as `Conflict`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate-key write error,
    /// `RepositoryError::Database` otherwise.
    #[instrument(skip(self, seller), fields(email = %seller.email))]
    pub async fn insert(&self, seller: &Seller) -> Result<(), RepositoryError> {
        self.collection.insert_one(seller).await.map_err(|e| {
            if is_duplicate_key(&e) {
                RepositoryError::Conflict("email already registered".to_owned())
            } else {
                RepositoryError::Database(e)
            }
        })?;
        Ok(())
    }

    /// Set the approval flag on a seller, returning the updated document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id does not resolve,
    /// `RepositoryError::Database` otherwise.
    #[instrument(skip(self))]
    pub async fn set_approved(
        &self,
        id: SellerId,
        approved: bool,
    ) -> Result<Seller, RepositoryError> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id.as_object_id() },
                doc! { "$set": { "approved": approved } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        updated.ok_or(RepositoryError::NotFound)
    }

    /// Append a product id to the seller's product list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the seller does not exist,
    /// `RepositoryError::Database` otherwise.
    #[instrument(skip(self))]
    pub async fn push_product(
        &self,
        seller: SellerId,
        product: ProductId,
    ) -> Result<(), RepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": seller.as_object_id() },
                doc! { "$push": { "products": product.as_object_id() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove a product id from the seller's product list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the seller does not exist,
    /// `RepositoryError::Database` otherwise.
    #[instrument(skip(self))]
    pub async fn pull_product(
        &self,
        seller: SellerId,
        product: ProductId,
    ) -> Result<(), RepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": seller.as_object_id() },
                doc! { "$pull": { "products": product.as_object_id() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count sellers registered with the given email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_email(&self, email: &str) -> Result<u64, RepositoryError> {
        let count = self
            .collection
            .count_documents(doc! { "email": email })
            .await?;
        Ok(count)
    }
}

/// Build a new seller document with fresh id and timestamp.
#[must_use]
pub fn new_seller(
    username: String,
    email: String,
    password_hash: String,
    company_name: String,
    address: String,
) -> Seller {
    Seller {
        id: bson::oid::ObjectId::new(),
        username,
        email,
        password: password_hash,
        company_name,
        address,
        is_seller: true,
        approved: false,
        products: Vec::new(),
        created_at: Utc::now(),
    }
}

/// Whether a driver error is a duplicate-key (E11000) write error.
fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => false,
    }
}
