//! Catalog/order service: product creation with joint image uploads,
//! product deletion with seller unlink, and seller checkout resolution.

use std::collections::HashMap;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use mongodb::Database;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use orbit_market_core::{ProductId, SellerId, UserId};

use crate::db::{
    CheckoutRepository, ProductRepository, RepositoryError, SellerRepository, UserRepository,
};
use crate::models::{Product, User};
use crate::services::uploads::{ImageHostClient, UploadError};

/// Errors that can occur in catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The product id does not resolve.
    #[error("product not found")]
    ProductNotFound,

    /// The owning seller does not resolve.
    #[error("seller not found")]
    SellerNotFound,

    /// One of the image uploads failed.
    #[error("image upload failed: {0}")]
    Upload(#[from] UploadError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Structured fields of a new product, before images are attached.
#[derive(Debug)]
pub struct NewProduct {
    pub product_code: String,
    pub title: String,
    pub description: String,
    pub features: Vec<String>,
    pub mrp: f64,
    pub price: f64,
    pub stock: i64,
    pub brand: String,
    pub manufacturer: SellerId,
    pub available: bool,
    pub category: String,
    pub rating: f64,
}

/// One raw image asset from the multipart request.
#[derive(Debug)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Exactly four image assets: the primary image plus three thumbnails.
#[derive(Debug)]
pub struct ProductImages {
    pub primary: ImageUpload,
    pub thumbnails: [ImageUpload; 3],
}

/// A checkout with its user and product references resolved into documents.
///
/// References that no longer resolve (deleted user/product) come back as
/// `None` rather than failing the whole listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCheckout {
    pub id: String,
    pub user: Option<User>,
    pub items: Vec<ResolvedItem>,
    pub total_cost: f64,
    pub created_at: DateTime<Utc>,
}

/// A checkout line with its product reference resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedItem {
    pub product: Option<Product>,
    pub quantity: i64,
}

/// Catalog service over the product, seller, checkout, and user collections
/// plus the image host.
pub struct CatalogService<'a> {
    products: ProductRepository,
    sellers: SellerRepository,
    checkouts: CheckoutRepository,
    users: UserRepository,
    uploader: &'a ImageHostClient,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(db: &Database, uploader: &'a ImageHostClient) -> Self {
        Self {
            products: ProductRepository::new(db),
            sellers: SellerRepository::new(db),
            checkouts: CheckoutRepository::new(db),
            users: UserRepository::new(db),
            uploader,
        }
    }

    /// Create a product: upload all four images concurrently, then persist
    /// the document and link it to the owning seller.
    ///
    /// The uploads are jointly awaited with eager-fail semantics - the first
    /// failure aborts the whole operation and nothing is written to the
    /// store. The product insert and the seller `$push` are two separate
    /// writes with no transaction around them; a crash between the two
    /// leaves an orphaned product document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Upload` if any upload fails and
    /// `CatalogError::SellerNotFound` if the owner does not resolve.
    #[instrument(skip(self, new_product, images), fields(code = %new_product.product_code))]
    pub async fn add_product(
        &self,
        new_product: NewProduct,
        images: ProductImages,
    ) -> Result<Product, CatalogError> {
        let folder = new_product.product_code.clone();
        let [thumb1, thumb2, thumb3] = images.thumbnails;

        let (primary, thumb1, thumb2, thumb3) = tokio::try_join!(
            self.uploader
                .upload(images.primary.bytes, images.primary.filename, &folder),
            self.uploader.upload(thumb1.bytes, thumb1.filename, &folder),
            self.uploader.upload(thumb2.bytes, thumb2.filename, &folder),
            self.uploader.upload(thumb3.bytes, thumb3.filename, &folder),
        )?;

        let product = Product {
            id: ObjectId::new(),
            product_code: new_product.product_code,
            title: new_product.title,
            image_url: primary.url,
            thumbnail_urls: vec![thumb1.url, thumb2.url, thumb3.url],
            description: new_product.description,
            features: new_product.features,
            mrp: new_product.mrp,
            price: new_product.price,
            stock: new_product.stock,
            brand: new_product.brand,
            manufacturer: new_product.manufacturer.as_object_id(),
            available: new_product.available,
            category: new_product.category,
            rating: new_product.rating,
            sold: 0,
            reviews: Vec::new(),
            created_at: Utc::now(),
        };

        self.products.insert(&product).await?;

        self.sellers
            .push_product(new_product.manufacturer, ProductId::from(product.id))
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CatalogError::SellerNotFound,
                other => CatalogError::Repository(other),
            })?;

        Ok(product)
    }

    /// Delete a product and unlink it from its owning seller.
    ///
    /// The lookup happens first so a missing product fails before any
    /// seller-list mutation; a second delete of the same id is therefore
    /// NotFound with the seller list untouched.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if the id does not resolve.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: ProductId) -> Result<(), CatalogError> {
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;

        if !self.products.delete(product_id).await? {
            return Err(CatalogError::ProductNotFound);
        }

        let owner = SellerId::from(product.manufacturer);
        match self.sellers.pull_product(owner, product_id).await {
            // The owner may have been deleted out from under the product;
            // the unlink is then a no-op, matching the store's $pull.
            Ok(()) | Err(RepositoryError::NotFound) => Ok(()),
            Err(other) => Err(CatalogError::Repository(other)),
        }
    }

    /// All products owned by a seller.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn seller_products(&self, seller_id: SellerId) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.find_by_manufacturer(seller_id).await?)
    }

    /// Every checkout containing at least one of the seller's products,
    /// with user and product references resolved. Empty list when none match.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if any query fails.
    #[instrument(skip(self))]
    pub async fn seller_checkouts(
        &self,
        seller_id: SellerId,
    ) -> Result<Vec<ResolvedCheckout>, CatalogError> {
        let seller_products = self.products.find_by_manufacturer(seller_id).await?;
        let seller_product_ids: Vec<ObjectId> = seller_products.iter().map(|p| p.id).collect();

        if seller_product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let checkouts = self
            .checkouts
            .find_by_product_ids(&seller_product_ids)
            .await?;

        // Resolve all referenced products in one query, then users one by one
        // (checkout lists are small and users rarely repeat).
        let referenced: Vec<ObjectId> = checkouts
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.product))
            .collect();
        let products_by_id: HashMap<ObjectId, Product> = self
            .products
            .find_by_ids(&referenced)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut resolved = Vec::with_capacity(checkouts.len());
        for checkout in checkouts {
            let user = self.users.find_by_id(UserId::from(checkout.user)).await?;

            let items = checkout
                .items
                .iter()
                .map(|item| ResolvedItem {
                    product: products_by_id.get(&item.product).cloned(),
                    quantity: item.quantity,
                })
                .collect();

            resolved.push(ResolvedCheckout {
                id: checkout.id.to_hex(),
                user,
                items,
                total_cost: checkout.total_cost,
                created_at: checkout.created_at,
            });
        }

        Ok(resolved)
    }
}
