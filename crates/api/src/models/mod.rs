//! BSON document models.
//!
//! One struct per collection, serialized with camelCase field names so the
//! stored documents match the wire format. `_id` fields are raw `ObjectId`s;
//! typed IDs from `orbit_market_core` are used at API and service boundaries.

pub mod cart;
pub mod checkout;
pub mod contact;
pub mod product;
pub mod review;
pub mod seller;
pub mod user;
pub mod wishlist;

pub use cart::{Cart, CartItem};
pub use checkout::{Checkout, CheckoutItem};
pub use contact::ContactMessage;
pub use product::Product;
pub use review::{Review, ReviewSummary};
pub use seller::{Seller, SellerView};
pub use user::User;
pub use wishlist::Wishlist;
