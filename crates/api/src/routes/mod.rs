//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                   - Banner
//! GET  /health                             - Liveness check
//! GET  /health/ready                       - Readiness check (MongoDB ping)
//!
//! # Admin dashboard
//! GET    /api/admin/sales/{period}         - Time-bucketed sales report
//! GET    /api/admin/orders                 - All checkouts
//! GET    /api/admin/messages               - All contact messages
//! DELETE /api/admin/contactUs/{id}         - Remove a message
//! DELETE /api/admin/deleUser/{id}          - Remove a user
//!
//! # Seller portal
//! GET    /api/seller/                      - List sellers
//! GET    /api/seller/sellers/{id}          - Fetch seller
//! GET    /api/seller/sellerRating/{sellerId} - Average product rating
//! POST   /api/seller/register              - Create seller account
//! POST   /api/seller/login                 - Authenticate seller
//! PUT    /api/seller/{id}/approve          - Approve seller
//! PUT    /api/seller/{id}/revoke           - Revoke approval
//! POST   /api/seller/addproduct            - Create product + 4 images (multipart)
//! GET    /api/seller/checkouts/{id}        - Seller's orders (resolved)
//! GET    /api/seller/products/{id}         - Seller's products
//! GET    /api/seller/reviews/{id}          - Seller's reviewed products + reviews
//! DELETE /api/seller/deleteProduct/{id}    - Remove product + unlink seller
//!
//! # Storefront user
//! POST   /api/user/contact                 - Submit contact message
//! GET    /api/user/cart/{userId}           - Fetch cart
//! POST   /api/user/cart                    - Add cart item
//! DELETE /api/user/cart/{userId}/{productId} - Remove cart item
//! GET    /api/user/wishlist/{userId}       - Fetch wishlist
//! POST   /api/user/wishlist                - Add wishlist product
//! DELETE /api/user/wishlist/{userId}/{productId} - Remove wishlist product
//! POST   /api/user/checkout                - Create checkout
//!
//! # Support
//! POST   /sendemail                        - Transactional reply email
//! GET    /api/getCSRFToken                 - Session CSRF token
//! ```

pub mod admin;
pub mod seller;
pub mod support;
pub mod user;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the admin dashboard router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/sales/{period}", get(admin::sales))
        .route("/orders", get(admin::orders))
        .route("/messages", get(admin::messages))
        .route("/contactUs/{id}", delete(admin::delete_message))
        .route("/deleUser/{id}", delete(admin::delete_user))
}

/// Create the seller portal router.
pub fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(seller::list))
        .route("/sellers/{id}", get(seller::show))
        .route("/sellerRating/{seller_id}", get(seller::rating))
        .route("/register", post(seller::register))
        .route("/login", post(seller::login))
        .route("/{id}/approve", put(seller::approve))
        .route("/{id}/revoke", put(seller::revoke))
        .route("/addproduct", post(seller::add_product))
        .route("/checkouts/{id}", get(seller::checkouts))
        .route("/products/{id}", get(seller::products))
        .route("/reviews/{id}", get(seller::reviews))
        .route("/deleteProduct/{id}", delete(seller::delete_product))
}

/// Create the storefront user router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(user::submit_contact))
        .route("/cart/{user_id}", get(user::get_cart))
        .route("/cart", post(user::add_cart_item))
        .route("/cart/{user_id}/{product_id}", delete(user::remove_cart_item))
        .route("/wishlist/{user_id}", get(user::get_wishlist))
        .route("/wishlist", post(user::add_wishlist_product))
        .route(
            "/wishlist/{user_id}/{product_id}",
            delete(user::remove_wishlist_product),
        )
        .route("/checkout", post(user::create_checkout))
}

/// Create all routes for the marketplace API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .nest("/api/admin", admin_routes())
        .nest("/api/seller", seller_routes())
        .nest("/api/user", user_routes())
        .route("/sendemail", post(support::send_email))
        .route("/api/getCSRFToken", get(support::csrf_token))
}

/// Root banner, kept for parity with uptime checks pointed at `/`.
async fn banner() -> &'static str {
    "Orbit Market API is running"
}
