//! Storefront user route handlers.
//!
//! Contact form, cart, wishlist, and checkout creation - the write side
//! that feeds the admin and seller reporting endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use orbit_market_core::{Email, ProductId, UserId};

use crate::db::{CartRepository, CheckoutRepository, ContactRepository, WishlistRepository};
use crate::error::{AppError, Result};
use crate::models::{Checkout, CheckoutItem, ContactMessage};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

/// Cart/wishlist mutation payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub user_id: String,
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// Checkout creation payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: String,
    pub items: Vec<CheckoutItemRequest>,
    pub total_cost: f64,
}

/// One checkout line in the request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItemRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

// =============================================================================
// Contact
// =============================================================================

/// Submit a contact-form message.
///
/// POST /api/user/contact
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<Value>)> {
    let email =
        Email::parse(form.email.trim()).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if form.name.trim().is_empty() || form.message.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Name and message are required".to_owned(),
        ));
    }

    let message = ContactMessage {
        id: ObjectId::new(),
        name: form.name.trim().to_owned(),
        email: email.into_inner(),
        subject: form.subject,
        message: form.message.trim().to_owned(),
        created_at: Utc::now(),
    };

    ContactRepository::new(state.db()).insert(&message).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Message received" })),
    ))
}

// =============================================================================
// Cart
// =============================================================================

/// Fetch a user's cart.
///
/// GET /api/user/cart/{userId}
#[instrument(skip(state))]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let user_id = UserId::parse_str(&user_id)?;
    let cart = CartRepository::new(state.db()).find_by_user(user_id).await?;
    Ok(Json(json!({ "cart": cart })))
}

/// Add an item to a user's cart.
///
/// POST /api/user/cart
#[instrument(skip(state, request))]
pub async fn add_cart_item(
    State(state): State<AppState>,
    Json(request): Json<ItemRequest>,
) -> Result<Json<Value>> {
    let user_id = UserId::parse_str(&request.user_id)?;
    let product_id = ProductId::parse_str(&request.product_id)?;

    if request.quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_owned(),
        ));
    }

    CartRepository::new(state.db())
        .add_item(user_id, product_id, request.quantity)
        .await?;

    Ok(Json(json!({ "message": "Item added to cart" })))
}

/// Remove a product from a user's cart.
///
/// DELETE /api/user/cart/{userId}/{productId}
#[instrument(skip(state))]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path((user_id, product_id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let user_id = UserId::parse_str(&user_id)?;
    let product_id = ProductId::parse_str(&product_id)?;

    if !CartRepository::new(state.db())
        .remove_item(user_id, product_id)
        .await?
    {
        return Err(AppError::NotFound("Cart not found".to_owned()));
    }

    Ok(Json(json!({ "message": "Item removed from cart" })))
}

// =============================================================================
// Wishlist
// =============================================================================

/// Fetch a user's wishlist.
///
/// GET /api/user/wishlist/{userId}
#[instrument(skip(state))]
pub async fn get_wishlist(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let user_id = UserId::parse_str(&user_id)?;
    let wishlist = WishlistRepository::new(state.db())
        .find_by_user(user_id)
        .await?;
    Ok(Json(json!({ "wishlist": wishlist })))
}

/// Add a product to a user's wishlist.
///
/// POST /api/user/wishlist
#[instrument(skip(state, request))]
pub async fn add_wishlist_product(
    State(state): State<AppState>,
    Json(request): Json<ItemRequest>,
) -> Result<Json<Value>> {
    let user_id = UserId::parse_str(&request.user_id)?;
    let product_id = ProductId::parse_str(&request.product_id)?;

    WishlistRepository::new(state.db())
        .add_product(user_id, product_id)
        .await?;

    Ok(Json(json!({ "message": "Product added to wishlist" })))
}

/// Remove a product from a user's wishlist.
///
/// DELETE /api/user/wishlist/{userId}/{productId}
#[instrument(skip(state))]
pub async fn remove_wishlist_product(
    State(state): State<AppState>,
    Path((user_id, product_id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let user_id = UserId::parse_str(&user_id)?;
    let product_id = ProductId::parse_str(&product_id)?;

    if !WishlistRepository::new(state.db())
        .remove_product(user_id, product_id)
        .await?
    {
        return Err(AppError::NotFound("Wishlist not found".to_owned()));
    }

    Ok(Json(json!({ "message": "Product removed from wishlist" })))
}

// =============================================================================
// Checkout
// =============================================================================

/// Create a checkout (completed order).
///
/// POST /api/user/checkout
#[instrument(skip(state, request), fields(total = request.total_cost))]
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let user_id = UserId::parse_str(&request.user_id)?;

    if request.items.is_empty() {
        return Err(AppError::BadRequest(
            "checkout must contain at least one item".to_owned(),
        ));
    }

    let mut items = Vec::with_capacity(request.items.len());
    for item in &request.items {
        if item.quantity < 1 {
            return Err(AppError::BadRequest(
                "quantity must be at least 1".to_owned(),
            ));
        }
        items.push(CheckoutItem {
            product: ProductId::parse_str(&item.product_id)?.as_object_id(),
            quantity: item.quantity,
        });
    }

    let checkout = Checkout {
        id: ObjectId::new(),
        user: user_id.as_object_id(),
        items,
        total_cost: request.total_cost,
        created_at: Utc::now(),
    };

    CheckoutRepository::new(state.db()).insert(&checkout).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "checkoutId": checkout.id.to_hex() })),
    ))
}
