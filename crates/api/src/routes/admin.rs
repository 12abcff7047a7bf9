//! Admin dashboard route handlers.
//!
//! Sales reporting plus the moderation endpoints for contact messages and
//! user accounts.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::instrument;

use orbit_market_core::{MessageId, SalesPeriod, UserId};

use crate::db::{CheckoutRepository, ContactRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{Checkout, ContactMessage};
use crate::services::reporting::{ReportingService, SalesReport};
use crate::state::AppState;

/// Time-bucketed sales totals for the trailing day/week/month/year.
///
/// GET /api/admin/sales/{period}
#[instrument(skip(state))]
pub async fn sales(
    State(state): State<AppState>,
    Path(period): Path<String>,
) -> Result<Json<SalesReport>> {
    let period: SalesPeriod = period.parse()?;
    let report = ReportingService::new(state.db())
        .sales_by_period(period)
        .await?;
    Ok(Json(report))
}

/// Every checkout in the store.
///
/// GET /api/admin/orders
#[instrument(skip(state))]
pub async fn orders(State(state): State<AppState>) -> Result<Json<Vec<Checkout>>> {
    let checkouts = CheckoutRepository::new(state.db()).find_all().await?;
    Ok(Json(checkouts))
}

/// Every contact-form message.
///
/// GET /api/admin/messages
#[instrument(skip(state))]
pub async fn messages(State(state): State<AppState>) -> Result<Json<Vec<ContactMessage>>> {
    let messages = ContactRepository::new(state.db()).find_all().await?;
    Ok(Json(messages))
}

/// Remove a contact-form message.
///
/// DELETE /api/admin/contactUs/{id}
#[instrument(skip(state))]
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = MessageId::parse_str(&id)?;

    if !ContactRepository::new(state.db()).delete(id).await? {
        return Err(AppError::NotFound("Message not found".to_owned()));
    }

    Ok(Json(json!({ "message": "Message deleted successfully" })))
}

/// Remove a user account.
///
/// DELETE /api/admin/deleUser/{id}
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = UserId::parse_str(&id)?;

    if !UserRepository::new(state.db()).delete(id).await? {
        return Err(AppError::NotFound("User not found".to_owned()));
    }

    Ok(Json(json!({ "user": "User deleted successfully" })))
}
