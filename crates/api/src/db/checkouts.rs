//! Checkout repository, including the sales aggregation used by reporting.

use bson::{Document, doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use serde::Deserialize;
use tracing::instrument;

use super::RepositoryError;
use crate::models::Checkout;

/// One `$group` row of the sales aggregation: a calendar date and the summed
/// `totalCost` of checkouts created on it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailySales {
    /// `YYYY-MM-DD` group key.
    #[serde(rename = "_id")]
    pub date: String,
    #[serde(rename = "totalSales")]
    pub total_sales: f64,
}

/// Repository for checkout documents.
pub struct CheckoutRepository {
    collection: Collection<Checkout>,
}

impl CheckoutRepository {
    /// Create a new checkout repository.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("checkouts"),
        }
    }

    /// List every checkout.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Checkout>, RepositoryError> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Insert a new checkout document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self, checkout), fields(total = checkout.total_cost))]
    pub async fn insert(&self, checkout: &Checkout) -> Result<(), RepositoryError> {
        self.collection.insert_one(checkout).await?;
        Ok(())
    }

    /// Per-day sales sums over the half-open window `[start, end)`,
    /// ascending by date.
    ///
    /// The grouping and summing run server-side:
    /// `$match` on `createdAt` → `$group` on `$dateToString "%Y-%m-%d"`
    /// summing `totalCost` → `$sort` by the date key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the aggregation fails, or
    /// `RepositoryError::DataCorruption` if a group row cannot be decoded.
    #[instrument(skip(self))]
    pub async fn sales_by_day(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailySales>, RepositoryError> {
        let cursor = self
            .collection
            .aggregate(sales_by_day_pipeline(start, end))
            .await?;
        let rows: Vec<Document> = cursor.try_collect().await?;

        rows.into_iter()
            .map(|row| {
                bson::from_document(row)
                    .map_err(|e| RepositoryError::DataCorruption(format!("bad sales row: {e}")))
            })
            .collect()
    }

    /// All checkouts containing at least one of the given product ids.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_product_ids(
        &self,
        product_ids: &[ObjectId],
    ) -> Result<Vec<Checkout>, RepositoryError> {
        let cursor = self
            .collection
            .find(doc! { "items.product": { "$in": product_ids } })
            .await?;
        Ok(cursor.try_collect().await?)
    }
}

/// Build the sales-by-day aggregation pipeline.
///
/// Kept as a free function so the document shape is unit-testable without a
/// running server.
#[must_use]
pub fn sales_by_day_pipeline(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Document> {
    vec![
        doc! {
            "$match": {
                "createdAt": {
                    "$gte": bson::DateTime::from_chrono(start),
                    "$lt": bson::DateTime::from_chrono(end),
                },
            },
        },
        doc! {
            "$group": {
                "_id": {
                    "$dateToString": { "format": "%Y-%m-%d", "date": "$createdAt" },
                },
                "totalSales": { "$sum": "$totalCost" },
            },
        },
        doc! {
            "$sort": { "_id": 1 },
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_pipeline_stages_in_order() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let pipeline = sales_by_day_pipeline(start, end);

        assert_eq!(pipeline.len(), 3);
        assert!(pipeline[0].contains_key("$match"));
        assert!(pipeline[1].contains_key("$group"));
        assert!(pipeline[2].contains_key("$sort"));
    }

    #[test]
    fn test_pipeline_match_is_half_open() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let pipeline = sales_by_day_pipeline(start, end);

        let range = pipeline[0]
            .get_document("$match")
            .unwrap()
            .get_document("createdAt")
            .unwrap();
        assert_eq!(
            range.get("$gte").unwrap(),
            &bson::Bson::DateTime(bson::DateTime::from_chrono(start))
        );
        assert_eq!(
            range.get("$lt").unwrap(),
            &bson::Bson::DateTime(bson::DateTime::from_chrono(end))
        );
    }

    #[test]
    fn test_pipeline_groups_by_day_string() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let pipeline = sales_by_day_pipeline(start, end);

        let group = pipeline[1].get_document("$group").unwrap();
        let key = group.get_document("_id").unwrap();
        let date_to_string = key.get_document("$dateToString").unwrap();
        assert_eq!(date_to_string.get_str("format").unwrap(), "%Y-%m-%d");

        let sum = group.get_document("totalSales").unwrap();
        assert_eq!(sum.get_str("$sum").unwrap(), "$totalCost");
    }

    #[test]
    fn test_daily_sales_decodes_group_row() {
        let row = doc! { "_id": "2024-01-15", "totalSales": 129.5 };
        let decoded: DailySales = bson::from_document(row).unwrap();
        assert_eq!(decoded.date, "2024-01-15");
        assert!((decoded.total_sales - 129.5).abs() < f64::EPSILON);
    }
}
