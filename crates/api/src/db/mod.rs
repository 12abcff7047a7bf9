//! Document store access for the marketplace MongoDB database.
//!
//! # Collections
//!
//! - `sellers` - seller accounts with their denormalized product-id list
//! - `products` - catalog entries referencing the owning seller
//! - `checkouts` - completed orders (drive the sales report)
//! - `reviews` - product reviews
//! - `users` - storefront customers
//! - `contactMessages` - contact-form submissions
//! - `carts` / `wishlists` - per-user storefront state
//!
//! Each collection gets a small repository struct over a typed
//! [`mongodb::Collection`]; handlers and services never touch the driver
//! directly.

pub mod carts;
pub mod checkouts;
pub mod contact;
pub mod products;
pub mod reviews;
pub mod sellers;
pub mod users;
pub mod wishlists;

use std::time::Duration;

use mongodb::{Client, Database, options::ClientOptions};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub use carts::CartRepository;
pub use checkouts::CheckoutRepository;
pub use contact::ContactRepository;
pub use products::ProductRepository;
pub use reviews::ReviewRepository;
pub use sellers::SellerRepository;
pub use users::UserRepository;
pub use wishlists::WishlistRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Driver error from the MongoDB client.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Connect to MongoDB and return the application [`Database`] handle.
///
/// Sets pool sizes and timeouts, then verifies the connection with a `ping`
/// so a bad URL fails at startup rather than on the first request.
///
/// # Errors
///
/// Returns `mongodb::error::Error` if the URL cannot be parsed or the
/// server is unreachable.
pub async fn connect(
    url: &SecretString,
    database_name: &str,
) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(url.expose_secret()).await?;

    options.max_pool_size = Some(20);
    options.min_pool_size = Some(2);
    options.connect_timeout = Some(Duration::from_secs(10));
    options.server_selection_timeout = Some(Duration::from_secs(30));
    options.app_name = Some("orbit-market-api".to_owned());

    let client = Client::with_options(options)?;
    let db = client.database(database_name);

    // Verify connectivity with a lightweight ping
    db.run_command(bson::doc! { "ping": 1 }).await?;

    tracing::info!(database = %database_name, "Connected to MongoDB");
    Ok(db)
}
