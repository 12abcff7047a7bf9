//! Seed the database with demo catalog data.
//!
//! Creates a demo seller with a small product line, one customer, a
//! checkout, and a review, so the dashboard and portal have something to
//! show on a fresh install.

use bson::oid::ObjectId;
use chrono::Utc;
use tracing::info;

use orbit_market_core::{ProductId, SellerId};
use orbit_market_api::db::{
    CheckoutRepository, ProductRepository, ReviewRepository, SellerRepository,
};
use orbit_market_api::models::{Checkout, CheckoutItem, Product, Review, Seller, User};
use orbit_market_api::services::auth::{Registration, SellerAuthService};

use super::connect_from_env;

const DEMO_SELLER_EMAIL: &str = "demo-seller@orbitmarket.dev";

/// Seed demo documents, optionally clearing previous demo data first.
///
/// # Errors
///
/// Returns an error if environment variables are missing or any database
/// operation fails.
pub async fn run(clear: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect_from_env().await?;

    if clear {
        clear_demo_data(&db).await?;
        info!("Cleared previous demo data");
    }

    let sellers = SellerRepository::new(&db);
    if sellers.find_by_email(DEMO_SELLER_EMAIL).await?.is_some() {
        return Err("demo data already present (run with --clear to reseed)".into());
    }

    // Demo seller, registered through the same path the API uses
    let seller = SellerAuthService::new(&db)
        .register(Registration {
            username: "demo-seller".to_owned(),
            email: DEMO_SELLER_EMAIL.to_owned(),
            password: "demo-password-1".to_owned(),
            company_name: "Orbit Demo Gadgets".to_owned(),
            address: "1 Launchpad Road".to_owned(),
        })
        .await?;
    let seller_id = SellerId::from(seller.id);
    sellers.set_approved(seller_id, true).await?;

    // A small product line
    let products = ProductRepository::new(&db);
    let mut product_ids = Vec::new();
    for (code, title, price, rating) in [
        ("DEMO-100", "Ion Charger 65W", 44.99, 4.5),
        ("DEMO-200", "Nebula Earbuds", 79.99, 4.2),
        ("DEMO-300", "Comet Power Bank", 59.99, 4.8),
    ] {
        let product = demo_product(seller.id, code, title, price, rating);
        products.insert(&product).await?;
        sellers
            .push_product(seller_id, ProductId::from(product.id))
            .await?;
        product_ids.push(product.id);
    }

    // One customer with a checkout, so the sales report has a bucket
    let user = demo_user();
    db.collection::<User>("users").insert_one(&user).await?;

    let first_product = *product_ids.first().ok_or("no demo products inserted")?;
    CheckoutRepository::new(&db)
        .insert(&Checkout {
            id: ObjectId::new(),
            user: user.id,
            items: vec![CheckoutItem {
                product: first_product,
                quantity: 2,
            }],
            total_cost: 89.98,
            created_at: Utc::now(),
        })
        .await?;

    // One review, linked back onto the product's review list
    let review = Review {
        id: ObjectId::new(),
        product: first_product,
        review_text: "Charges my laptop faster than the stock brick.".to_owned(),
        review_rating: 5.0,
        created_at: Utc::now(),
    };
    ReviewRepository::new(&db).insert(&review).await?;
    db.collection::<Product>("products")
        .update_one(
            bson::doc! { "_id": first_product },
            bson::doc! { "$push": { "reviews": review.id } },
        )
        .await?;

    info!(
        seller = %seller.email,
        products = product_ids.len(),
        "Demo data seeded"
    );
    Ok(())
}

/// Remove the demo seller and everything hanging off it.
async fn clear_demo_data(db: &mongodb::Database) -> Result<(), Box<dyn std::error::Error>> {
    let sellers = SellerRepository::new(db);
    let Some(seller) = sellers.find_by_email(DEMO_SELLER_EMAIL).await? else {
        return Ok(());
    };

    db.collection::<Product>("products")
        .delete_many(bson::doc! { "manufacturer": seller.id })
        .await?;
    db.collection::<Seller>("sellers")
        .delete_one(bson::doc! { "_id": seller.id })
        .await?;
    Ok(())
}

fn demo_product(seller: ObjectId, code: &str, title: &str, price: f64, rating: f64) -> Product {
    Product {
        id: ObjectId::new(),
        product_code: code.to_owned(),
        title: title.to_owned(),
        image_url: format!("https://img.orbitmarket.dev/{code}/main.jpg"),
        thumbnail_urls: (1..=3)
            .map(|i| format!("https://img.orbitmarket.dev/{code}/thumb{i}.jpg"))
            .collect(),
        description: format!("{title} - demo catalog entry"),
        features: vec!["Demo".to_owned()],
        mrp: price * 1.25,
        price,
        stock: 25,
        brand: "Orbit Demo".to_owned(),
        manufacturer: seller,
        available: true,
        category: "gadgets".to_owned(),
        rating,
        sold: 0,
        reviews: Vec::new(),
        created_at: Utc::now(),
    }
}

fn demo_user() -> User {
    User {
        id: ObjectId::new(),
        username: "demo-customer".to_owned(),
        email: "demo-customer@orbitmarket.dev".to_owned(),
        phone: None,
        address: Some("42 Crater Lane".to_owned()),
        created_at: Utc::now(),
    }
}
