//! Seller portal route handlers.
//!
//! Account lifecycle (register/login/approval), the product catalog
//! endpoints including the multipart add-product upload, and the seller's
//! order/review rollups.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use orbit_market_core::SellerId;

use crate::db::SellerRepository;
use crate::error::{AppError, Result};
use crate::middleware::session::SESSION_SELLER_KEY;
use crate::models::SellerView;
use crate::services::auth::{Registration, SellerAuthService};
use crate::services::catalog::{CatalogService, ImageUpload, NewProduct, ProductImages};
use crate::services::reporting::ReportingService;
use crate::state::AppState;

/// Multipart field names of the four required image assets.
const PRIMARY_IMAGE_FIELD: &str = "imagePath";
const THUMBNAIL_FIELDS: [&str; 3] = ["imagethumbnail1", "imagethumbnail2", "imagethumbnail3"];

// =============================================================================
// Request Types
// =============================================================================

/// Registration form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub address: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Account Handlers
// =============================================================================

/// List every seller.
///
/// GET /api/seller/
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let sellers = SellerRepository::new(state.db()).find_all().await?;
    let views: Vec<SellerView> = sellers.iter().map(SellerView::from).collect();
    Ok(Json(json!({ "sellers": views })))
}

/// Fetch one seller.
///
/// GET /api/seller/sellers/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SellerView>> {
    let id = SellerId::parse_str(&id)?;
    let seller = SellerRepository::new(state.db())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Seller not found".to_owned()))?;
    Ok(Json(SellerView::from(&seller)))
}

/// Average rating across the seller's products, one decimal place.
///
/// GET /api/seller/sellerRating/{sellerId}
#[instrument(skip(state))]
pub async fn rating(
    State(state): State<AppState>,
    Path(seller_id): Path<String>,
) -> Result<Json<Value>> {
    let seller_id = SellerId::parse_str(&seller_id)?;
    let average = ReportingService::new(state.db())
        .seller_rating(seller_id)
        .await?;
    Ok(Json(json!({ "sellerRating": average })))
}

/// Register a new seller account.
///
/// POST /api/seller/register
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    SellerAuthService::new(state.db())
        .register(Registration {
            username: request.username,
            email: request.email,
            password: request.password,
            company_name: request.company_name,
            address: request.address,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Seller registered successfully" })),
    ))
}

/// Authenticate a seller and store the id in the session.
///
/// POST /api/seller/login
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let seller = SellerAuthService::new(state.db())
        .login(&request.email, &request.password)
        .await?;

    session
        .insert(SESSION_SELLER_KEY, seller.id.to_hex())
        .await
        .map_err(|e| AppError::Internal(format!("session store failed: {e}")))?;

    Ok(Json(json!({
        "message": "Login successful",
        "seller": SellerView::from(&seller),
    })))
}

/// Approve a seller.
///
/// PUT /api/seller/{id}/approve
#[instrument(skip(state))]
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    set_approval(&state, &id, true, "Seller approved successfully").await
}

/// Revoke a seller's approval.
///
/// PUT /api/seller/{id}/revoke
#[instrument(skip(state))]
pub async fn revoke(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    set_approval(&state, &id, false, "Seller approval revoked successfully").await
}

async fn set_approval(
    state: &AppState,
    id: &str,
    approved: bool,
    message: &str,
) -> Result<Json<Value>> {
    let id = SellerId::parse_str(id)?;
    let seller = SellerAuthService::new(state.db())
        .set_approved(id, approved)
        .await?;

    Ok(Json(json!({
        "message": message,
        "seller": SellerView::from(&seller),
    })))
}

// =============================================================================
// Catalog Handlers
// =============================================================================

/// Create a product from a multipart form carrying the structured fields
/// plus exactly four image files.
///
/// POST /api/seller/addproduct
#[instrument(skip(state, multipart))]
pub async fn add_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>)> {
    let form = collect_multipart(multipart).await?;
    let new_product = build_new_product(&form.text, form.features)?;
    let images = take_images(form.images)?;

    let product = CatalogService::new(state.db(), state.uploader())
        .add_product(new_product, images)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Product created successfully",
            "productId": product.id.to_hex(),
        })),
    ))
}

/// Every checkout containing one of the seller's products, resolved.
///
/// GET /api/seller/checkouts/{id}
#[instrument(skip(state))]
pub async fn checkouts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let seller_id = SellerId::parse_str(&id)?;
    let checkouts = CatalogService::new(state.db(), state.uploader())
        .seller_checkouts(seller_id)
        .await?;
    Ok(Json(json!({ "success": true, "checkouts": checkouts })))
}

/// The seller's products.
///
/// GET /api/seller/products/{id}
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let seller_id = SellerId::parse_str(&id)?;
    let products = CatalogService::new(state.db(), state.uploader())
        .seller_products(seller_id)
        .await?;
    Ok(Json(json!({ "products": products })))
}

/// The seller's reviewed products plus the resolved reviews.
///
/// GET /api/seller/reviews/{id}
#[instrument(skip(state))]
pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let seller_id = SellerId::parse_str(&id)?;
    let rollup = ReportingService::new(state.db())
        .seller_reviews(seller_id)
        .await?;
    Ok(Json(serde_json::to_value(rollup).map_err(|e| {
        AppError::Internal(format!("serialization failed: {e}"))
    })?))
}

/// Delete a product and unlink it from its owning seller.
///
/// DELETE /api/seller/deleteProduct/{id}
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let product_id = orbit_market_core::ProductId::parse_str(&id)?;
    CatalogService::new(state.db(), state.uploader())
        .delete_product(product_id)
        .await?;
    Ok(Json(json!({ "product": "Product deleted successfully" })))
}

// =============================================================================
// Multipart Helpers
// =============================================================================

/// The raw pieces of the add-product form.
struct AddProductForm {
    text: HashMap<String, String>,
    features: Vec<String>,
    images: HashMap<String, ImageUpload>,
}

/// Drain the multipart stream into text fields, repeated `features` entries,
/// and the four named image files.
async fn collect_multipart(mut multipart: Multipart) -> Result<AddProductForm> {
    let mut text = HashMap::new();
    let mut features = Vec::new();
    let mut images = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };

        if name == PRIMARY_IMAGE_FIELD || THUMBNAIL_FIELDS.contains(&name.as_str()) {
            let filename = field
                .file_name()
                .map_or_else(|| format!("{name}.jpg"), ToOwned::to_owned);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("failed to read {name}: {e}")))?
                .to_vec();
            images.insert(name, ImageUpload { filename, bytes });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("failed to read {name}: {e}")))?;
            if name == "features" {
                features.push(value);
            } else {
                text.insert(name, value);
            }
        }
    }

    Ok(AddProductForm {
        text,
        features,
        images,
    })
}

/// Assemble the structured product payload from the text fields.
fn build_new_product(
    text: &HashMap<String, String>,
    features: Vec<String>,
) -> Result<NewProduct> {
    Ok(NewProduct {
        product_code: require(text, "productCode")?.to_owned(),
        title: require(text, "title")?.to_owned(),
        description: optional(text, "description"),
        features,
        mrp: parse_required(text, "mrp")?,
        price: parse_required(text, "price")?,
        stock: parse_required(text, "stock")?,
        brand: optional(text, "brand"),
        manufacturer: SellerId::parse_str(require(text, "manufacturer")?)?,
        available: parse_or_default(text, "available", true)?,
        category: optional(text, "category"),
        rating: parse_or_default(text, "rating", 0.0)?,
    })
}

/// Pull the four image assets out of the parsed files, failing when any of
/// them is missing.
fn take_images(mut images: HashMap<String, ImageUpload>) -> Result<ProductImages> {
    let mut take = |name: &str| {
        images
            .remove(name)
            .ok_or_else(|| AppError::BadRequest(format!("missing image file: {name}")))
    };

    let primary = take(PRIMARY_IMAGE_FIELD)?;
    let [t1, t2, t3] = THUMBNAIL_FIELDS;
    let thumbnails = [take(t1)?, take(t2)?, take(t3)?];

    Ok(ProductImages {
        primary,
        thumbnails,
    })
}

fn require<'a>(text: &'a HashMap<String, String>, key: &str) -> Result<&'a str> {
    text.get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("missing field: {key}")))
}

fn optional(text: &HashMap<String, String>, key: &str) -> String {
    text.get(key).cloned().unwrap_or_default()
}

fn parse_required<T>(text: &HashMap<String, String>, key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    require(text, key)?
        .parse()
        .map_err(|e| AppError::BadRequest(format!("invalid {key}: {e}")))
}

fn parse_or_default<T>(text: &HashMap<String, String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match text.get(key) {
        None => Ok(default),
        Some(value) if value.is_empty() => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|e| AppError::BadRequest(format!("invalid {key}: {e}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_fields() -> HashMap<String, String> {
        let manufacturer = bson::oid::ObjectId::new().to_hex();
        [
            ("productCode", "ORB-100"),
            ("title", "Ion Charger"),
            ("description", "Fast charger"),
            ("mrp", "59.99"),
            ("price", "44.99"),
            ("stock", "12"),
            ("brand", "Orbit"),
            ("category", "chargers"),
            ("rating", "4.5"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .chain(std::iter::once((
            "manufacturer".to_owned(),
            manufacturer,
        )))
        .collect()
    }

    fn image(name: &str) -> (String, ImageUpload) {
        (
            name.to_owned(),
            ImageUpload {
                filename: format!("{name}.jpg"),
                bytes: vec![0xFF, 0xD8],
            },
        )
    }

    #[test]
    fn test_build_new_product_from_fields() {
        let fields = valid_fields();
        let product = build_new_product(&fields, vec!["65W".to_owned()]).unwrap();

        assert_eq!(product.product_code, "ORB-100");
        assert_eq!(product.stock, 12);
        assert!((product.rating - 4.5).abs() < f64::EPSILON);
        assert!(product.available);
        assert_eq!(product.features, vec!["65W".to_owned()]);
    }

    #[test]
    fn test_build_new_product_missing_required_field() {
        let mut fields = valid_fields();
        fields.remove("price");
        let err = build_new_product(&fields, vec![]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_build_new_product_rejects_bad_number() {
        let mut fields = valid_fields();
        fields.insert("stock".to_owned(), "plenty".to_owned());
        let err = build_new_product(&fields, vec![]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_build_new_product_rejects_bad_manufacturer_id() {
        let mut fields = valid_fields();
        fields.insert("manufacturer".to_owned(), "not-hex".to_owned());
        let err = build_new_product(&fields, vec![]).unwrap_err();
        assert!(matches!(err, AppError::InvalidId(_)));
    }

    #[test]
    fn test_take_images_requires_all_four() {
        let images: HashMap<_, _> = [
            image(PRIMARY_IMAGE_FIELD),
            image("imagethumbnail1"),
            image("imagethumbnail2"),
        ]
        .into_iter()
        .collect();

        let err = take_images(images).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_take_images_complete_set() {
        let images: HashMap<_, _> = [
            image(PRIMARY_IMAGE_FIELD),
            image("imagethumbnail1"),
            image("imagethumbnail2"),
            image("imagethumbnail3"),
        ]
        .into_iter()
        .collect();

        let product_images = take_images(images).unwrap();
        assert_eq!(product_images.primary.filename, "imagePath.jpg");
        assert_eq!(product_images.thumbnails.len(), 3);
    }
}
