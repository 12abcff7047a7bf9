//! CLI command implementations.

pub mod seed;
pub mod seller;

use mongodb::Database;
use secrecy::SecretString;

/// Connect to the database using the same environment variables as the API.
pub async fn connect_from_env() -> Result<Database, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let url = std::env::var("ORBIT_MONGODB_URL")
        .or_else(|_| std::env::var("MONGODB_URL"))
        .map(SecretString::from)
        .map_err(|_| "ORBIT_MONGODB_URL not set")?;
    let name =
        std::env::var("ORBIT_DATABASE_NAME").unwrap_or_else(|_| "orbit_market".to_owned());

    Ok(orbit_market_api::db::connect(&url, &name).await?)
}
