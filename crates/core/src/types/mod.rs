//! Core types for Orbit Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod period;

pub use email::{Email, EmailError};
pub use id::*;
pub use period::{PeriodError, SalesPeriod};
