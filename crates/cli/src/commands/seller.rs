//! Toggle a seller's approval flag from the command line.

use tracing::info;

use orbit_market_core::SellerId;
use orbit_market_api::db::SellerRepository;

use super::connect_from_env;

/// Approve or revoke a seller, looked up by email.
///
/// # Errors
///
/// Returns an error if environment variables are missing, the seller does
/// not exist, or the database operation fails.
pub async fn set_approval(email: &str, approved: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect_from_env().await?;
    let sellers = SellerRepository::new(&db);

    let seller = sellers
        .find_by_email(email)
        .await?
        .ok_or_else(|| format!("no seller registered under {email}"))?;

    let updated = sellers
        .set_approved(SellerId::from(seller.id), approved)
        .await?;

    info!(
        email = %updated.email,
        approved = updated.approved,
        "Seller approval updated"
    );
    Ok(())
}
