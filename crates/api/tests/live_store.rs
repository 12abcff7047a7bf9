//! Integration tests against a live MongoDB.
//!
//! Each test runs in its own throwaway database and drops it on the way
//! out. Run them with a local server:
//!
//! ```bash
//! MONGODB_URL=mongodb://localhost:27017 cargo test -p orbit-market-api -- --ignored
//! ```

#![allow(clippy::unwrap_used)]

use bson::oid::ObjectId;
use chrono::Utc;
use mongodb::Database;
use secrecy::SecretString;

use orbit_market_core::{ProductId, SalesPeriod, SellerId};
use orbit_market_api::config::UploadsConfig;
use orbit_market_api::db::{self, CheckoutRepository, ProductRepository, SellerRepository};
use orbit_market_api::models::{Checkout, CheckoutItem, Product};
use orbit_market_api::services::auth::{AuthError, Registration, SellerAuthService};
use orbit_market_api::services::catalog::{
    CatalogError, CatalogService, ImageUpload, NewProduct, ProductImages,
};
use orbit_market_api::services::reporting::{ReportingError, ReportingService};
use orbit_market_api::services::uploads::ImageHostClient;

struct TestContext {
    db: Database,
}

impl TestContext {
    async fn new() -> Self {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_owned());
        let name = format!("orbit_test_{}", uuid::Uuid::new_v4().simple());
        let db = db::connect(&SecretString::from(url), &name)
            .await
            .expect("MongoDB must be reachable for live-store tests");
        Self { db }
    }

    async fn teardown(self) {
        self.db.drop().await.expect("failed to drop test database");
    }

    /// An image-host client pointing at a dead endpoint; every upload fails.
    fn unreachable_uploader() -> ImageHostClient {
        ImageHostClient::new(&UploadsConfig {
            base_url: "http://127.0.0.1:9".to_owned(),
            api_key: "test".to_owned(),
            api_secret: SecretString::from("test"),
        })
    }

    async fn register_seller(&self, email: &str) -> SellerId {
        let seller = SellerAuthService::new(&self.db)
            .register(Registration {
                username: "tester".to_owned(),
                email: email.to_owned(),
                password: "hunter2hunter2".to_owned(),
                company_name: "Test Co".to_owned(),
                address: "1 Test Street".to_owned(),
            })
            .await
            .unwrap();
        SellerId::from(seller.id)
    }

    async fn insert_product(&self, seller: SellerId, rating: f64) -> ProductId {
        let product = Product {
            id: ObjectId::new(),
            product_code: format!("T-{}", ObjectId::new().to_hex()),
            title: "Test Product".to_owned(),
            image_url: "https://img.test/main.jpg".to_owned(),
            thumbnail_urls: vec![],
            description: String::new(),
            features: vec![],
            mrp: 10.0,
            price: 8.0,
            stock: 5,
            brand: "Test".to_owned(),
            manufacturer: seller.as_object_id(),
            available: true,
            category: "test".to_owned(),
            rating,
            sold: 0,
            reviews: vec![],
            created_at: Utc::now(),
        };
        let id = ProductId::from(product.id);
        ProductRepository::new(&self.db)
            .insert(&product)
            .await
            .unwrap();
        SellerRepository::new(&self.db)
            .push_product(seller, id)
            .await
            .unwrap();
        id
    }
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn duplicate_registration_is_conflict_and_leaves_one_seller() {
    let ctx = TestContext::new().await;
    let auth = SellerAuthService::new(&ctx.db);

    ctx.register_seller("dup@example.com").await;

    let second = auth
        .register(Registration {
            username: "other".to_owned(),
            email: "dup@example.com".to_owned(),
            password: "hunter2hunter2".to_owned(),
            company_name: "Other Co".to_owned(),
            address: "2 Test Street".to_owned(),
        })
        .await;
    assert!(matches!(second, Err(AuthError::SellerAlreadyExists)));

    let count = SellerRepository::new(&ctx.db)
        .count_by_email("dup@example.com")
        .await
        .unwrap();
    assert_eq!(count, 1);

    ctx.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn login_distinguishes_unknown_email_from_wrong_password() {
    let ctx = TestContext::new().await;
    let auth = SellerAuthService::new(&ctx.db);

    ctx.register_seller("login@example.com").await;

    let wrong_password = auth.login("login@example.com", "not-the-password").await;
    assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));

    let unknown_email = auth.login("nobody@example.com", "hunter2hunter2").await;
    assert!(matches!(unknown_email, Err(AuthError::SellerNotFound)));

    let ok = auth.login("login@example.com", "hunter2hunter2").await;
    assert!(ok.is_ok());

    ctx.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn delete_product_unlinks_seller_and_second_delete_is_not_found() {
    let ctx = TestContext::new().await;
    let uploader = TestContext::unreachable_uploader();
    let catalog = CatalogService::new(&ctx.db, &uploader);
    let sellers = SellerRepository::new(&ctx.db);

    let seller = ctx.register_seller("owner@example.com").await;
    let product = ctx.insert_product(seller, 4.0).await;
    let keeper = ctx.insert_product(seller, 3.0).await;

    catalog.delete_product(product).await.unwrap();

    let stored = ProductRepository::new(&ctx.db)
        .find_by_id(product)
        .await
        .unwrap();
    assert!(stored.is_none());

    let seller_doc = sellers.find_by_id(seller).await.unwrap().unwrap();
    assert_eq!(seller_doc.products, vec![keeper.as_object_id()]);

    // Second delete: NotFound, list unchanged
    let second = catalog.delete_product(product).await;
    assert!(matches!(second, Err(CatalogError::ProductNotFound)));
    let seller_doc = sellers.find_by_id(seller).await.unwrap().unwrap();
    assert_eq!(seller_doc.products, vec![keeper.as_object_id()]);

    ctx.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn deleting_missing_product_touches_nothing() {
    let ctx = TestContext::new().await;
    let uploader = TestContext::unreachable_uploader();
    let catalog = CatalogService::new(&ctx.db, &uploader);

    let seller = ctx.register_seller("untouched@example.com").await;
    let keeper = ctx.insert_product(seller, 4.0).await;

    let missing = ProductId::from(ObjectId::new());
    let result = catalog.delete_product(missing).await;
    assert!(matches!(result, Err(CatalogError::ProductNotFound)));

    let seller_doc = SellerRepository::new(&ctx.db)
        .find_by_id(seller)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seller_doc.products, vec![keeper.as_object_id()]);

    ctx.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn failed_image_upload_persists_no_product() {
    let ctx = TestContext::new().await;
    let uploader = TestContext::unreachable_uploader();
    let catalog = CatalogService::new(&ctx.db, &uploader);

    let seller = ctx.register_seller("uploads@example.com").await;

    let image = || ImageUpload {
        filename: "img.jpg".to_owned(),
        bytes: vec![0xFF, 0xD8],
    };
    let result = catalog
        .add_product(
            NewProduct {
                product_code: "FAIL-1".to_owned(),
                title: "Doomed".to_owned(),
                description: String::new(),
                features: vec![],
                mrp: 1.0,
                price: 1.0,
                stock: 1,
                brand: String::new(),
                manufacturer: seller,
                available: true,
                category: String::new(),
                rating: 0.0,
            },
            ProductImages {
                primary: image(),
                thumbnails: [image(), image(), image()],
            },
        )
        .await;
    assert!(matches!(result, Err(CatalogError::Upload(_))));

    let products = ProductRepository::new(&ctx.db)
        .find_by_manufacturer(seller)
        .await
        .unwrap();
    assert!(products.is_empty());

    let seller_doc = SellerRepository::new(&ctx.db)
        .find_by_id(seller)
        .await
        .unwrap()
        .unwrap();
    assert!(seller_doc.products.is_empty());

    ctx.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn seller_rating_averages_and_rounds() {
    let ctx = TestContext::new().await;
    let reporting = ReportingService::new(&ctx.db);

    let seller = ctx.register_seller("rated@example.com").await;
    ctx.insert_product(seller, 4.2).await;
    ctx.insert_product(seller, 4.6).await;
    ctx.insert_product(seller, 5.0).await;

    let rating = reporting.seller_rating(seller).await.unwrap();
    assert!((rating - 4.6).abs() < f64::EPSILON);

    let bare = ctx.register_seller("bare@example.com").await;
    let empty = reporting.seller_rating(bare).await;
    assert!(matches!(empty, Err(ReportingError::NoProducts)));

    ctx.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn sales_report_buckets_and_empty_window() {
    let ctx = TestContext::new().await;
    let reporting = ReportingService::new(&ctx.db);
    let checkouts = CheckoutRepository::new(&ctx.db);

    // Empty window first: two empty sequences, not an error
    let empty = reporting.sales_by_period(SalesPeriod::Week).await.unwrap();
    assert!(empty.labels.is_empty());
    assert!(empty.data.is_empty());

    for total in [10.0, 15.5] {
        checkouts
            .insert(&Checkout {
                id: ObjectId::new(),
                user: ObjectId::new(),
                items: vec![CheckoutItem {
                    product: ObjectId::new(),
                    quantity: 1,
                }],
                total_cost: total,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    let report = reporting.sales_by_period(SalesPeriod::Day).await.unwrap();
    assert_eq!(report.labels.len(), report.data.len());
    assert_eq!(report.labels.len(), 1);
    let summed: f64 = report.data.iter().sum();
    assert!((summed - 25.5).abs() < 1e-9);

    // Labels ascend lexicographically
    let year = reporting.sales_by_period(SalesPeriod::Year).await.unwrap();
    assert!(year.labels.windows(2).all(|w| w[0] <= w[1]));

    ctx.teardown().await;
}
