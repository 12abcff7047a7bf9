//! Application services.
//!
//! Services sit between route handlers and repositories: reporting rollups,
//! catalog/order orchestration, seller authentication, outbound email, and
//! the image-host client.

pub mod auth;
pub mod catalog;
pub mod email;
pub mod reporting;
pub mod uploads;

pub use auth::{AuthError, SellerAuthService};
pub use catalog::{CatalogError, CatalogService};
pub use email::{EmailError, EmailService};
pub use reporting::{ReportingError, ReportingService};
pub use uploads::{ImageHostClient, UploadError};
