//! Seller authentication and approval service.
//!
//! Registration, password login, and the admin approve/revoke toggle.
//! Passwords are hashed with Argon2id.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use mongodb::Database;
use tracing::instrument;

use orbit_market_core::{Email, SellerId};

use crate::db::sellers::new_seller;
use crate::db::{RepositoryError, SellerRepository};
use crate::models::Seller;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Fields accepted at seller registration.
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub address: String,
}

/// Seller authentication service.
pub struct SellerAuthService {
    sellers: SellerRepository,
}

impl SellerAuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            sellers: SellerRepository::new(db),
        }
    }

    /// Register a new seller.
    ///
    /// The account starts unapproved; an admin flips the flag later.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::SellerAlreadyExists` if the email is already registered.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> Result<Seller, AuthError> {
        let email = Email::parse(&registration.email)?;

        validate_password(&registration.password)?;

        if self.sellers.find_by_email(email.as_str()).await?.is_some() {
            return Err(AuthError::SellerAlreadyExists);
        }

        let password_hash = hash_password(&registration.password)?;

        let seller = new_seller(
            registration.username,
            email.into_inner(),
            password_hash,
            registration.company_name,
            registration.address,
        );

        // The lookup above races with concurrent registrations; the unique
        // index on email turns the loser's insert into a Conflict.
        self.sellers.insert(&seller).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::SellerAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        Ok(seller)
    }

    /// Login with email and password.
    ///
    /// The two failure modes are deliberately distinct: an unknown email is
    /// `SellerNotFound` while a wrong password is `InvalidCredentials`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SellerNotFound` for an unregistered email.
    /// Returns `AuthError::InvalidCredentials` for a hash mismatch.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Seller, AuthError> {
        let email = Email::parse(email)?;

        let seller = self
            .sellers
            .find_by_email(email.as_str())
            .await?
            .ok_or(AuthError::SellerNotFound)?;

        verify_password(password, &seller.password)?;

        Ok(seller)
    }

    /// Set the approval flag on a seller, returning the updated document.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SellerNotFound` if the id does not resolve.
    #[instrument(skip(self))]
    pub async fn set_approved(
        &self,
        seller_id: SellerId,
        approved: bool,
    ) -> Result<Seller, AuthError> {
        self.sellers
            .set_approved(seller_id, approved)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::SellerNotFound,
                other => AuthError::Repository(other),
            })
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_rejects_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_accepts_long_enough() {
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
