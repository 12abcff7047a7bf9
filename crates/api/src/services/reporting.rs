//! Reporting engine: time-bucketed sales totals and per-seller rollups.

use bson::oid::ObjectId;
use chrono::Utc;
use mongodb::Database;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use orbit_market_core::{SalesPeriod, SellerId};

use crate::db::checkouts::DailySales;
use crate::db::{CheckoutRepository, ProductRepository, RepositoryError, ReviewRepository, SellerRepository};
use crate::models::{Product, ReviewSummary};

/// Errors that can occur while computing reports.
#[derive(Debug, Error)]
pub enum ReportingError {
    /// The seller id does not resolve.
    #[error("seller not found")]
    SellerNotFound,

    /// The seller owns no products, so there is nothing to average.
    #[error("no products found for this seller")]
    NoProducts,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// The sales report: two index-aligned sequences, labels ascending by date.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

/// The seller review rollup: products that have at least one review, plus
/// the resolved review summaries across all of the seller's products.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerReviews {
    pub products_data: Vec<Product>,
    pub reviews_data: Vec<ReviewSummary>,
}

/// Reporting service over the checkout, product, seller, and review
/// collections.
pub struct ReportingService {
    checkouts: CheckoutRepository,
    products: ProductRepository,
    sellers: SellerRepository,
    reviews: ReviewRepository,
}

impl ReportingService {
    /// Create a new reporting service.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            checkouts: CheckoutRepository::new(db),
            products: ProductRepository::new(db),
            sellers: SellerRepository::new(db),
            reviews: ReviewRepository::new(db),
        }
    }

    /// Sales totals bucketed by calendar day over the trailing period.
    ///
    /// An empty window produces two empty sequences, not an error.
    ///
    /// # Errors
    ///
    /// Returns `ReportingError::Repository` if the aggregation fails.
    #[instrument(skip(self))]
    pub async fn sales_by_period(
        &self,
        period: SalesPeriod,
    ) -> Result<SalesReport, ReportingError> {
        let (start, end) = period.window_ending(Utc::now());
        let rows = self.checkouts.sales_by_day(start, end).await?;
        Ok(split_buckets(rows))
    }

    /// Average product rating for a seller, rounded to one decimal place.
    ///
    /// # Errors
    ///
    /// Returns `ReportingError::SellerNotFound` if the id does not resolve
    /// and `ReportingError::NoProducts` if the seller owns no products.
    #[instrument(skip(self))]
    pub async fn seller_rating(&self, seller_id: SellerId) -> Result<f64, ReportingError> {
        let seller = self
            .sellers
            .find_by_id(seller_id)
            .await?
            .ok_or(ReportingError::SellerNotFound)?;

        let products = self.products.find_by_ids(&seller.products).await?;
        let ratings: Vec<f64> = products.iter().map(|p| p.rating).collect();

        average_rating(&ratings).ok_or(ReportingError::NoProducts)
    }

    /// Reviewed products and resolved review summaries for a seller.
    ///
    /// The review-id list is a straight concatenation across the seller's
    /// products, duplicates included; resolution projects only the summary
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns `ReportingError::Repository` if any query fails.
    #[instrument(skip(self))]
    pub async fn seller_reviews(
        &self,
        seller_id: SellerId,
    ) -> Result<SellerReviews, ReportingError> {
        let products = self.products.find_by_manufacturer(seller_id).await?;

        let review_ids = concat_review_ids(&products);
        let reviews_data = self.reviews.find_summaries_by_ids(&review_ids).await?;

        let products_data = products.into_iter().filter(Product::has_reviews).collect();

        Ok(SellerReviews {
            products_data,
            reviews_data,
        })
    }
}

/// Split aggregation rows into the two parallel report sequences.
fn split_buckets(rows: Vec<DailySales>) -> SalesReport {
    let mut labels = Vec::with_capacity(rows.len());
    let mut data = Vec::with_capacity(rows.len());
    for row in rows {
        labels.push(row.date);
        data.push(row.total_sales);
    }
    SalesReport { labels, data }
}

/// Mean of the given ratings, rounded half-away-from-zero at the tenths
/// digit. `None` when there are no ratings.
#[allow(clippy::cast_precision_loss)] // product counts are tiny
fn average_rating(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

/// Concatenate review ids across products in product-iteration order.
///
/// Intentionally no deduplication: the list mirrors the per-product arrays
/// exactly, and the `$in` resolution downstream is unaffected by repeats.
fn concat_review_ids(products: &[Product]) -> Vec<ObjectId> {
    products
        .iter()
        .filter(|p| p.has_reviews())
        .flat_map(|p| p.reviews.iter().copied())
        .collect()
}
