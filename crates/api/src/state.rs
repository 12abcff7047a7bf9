//! Application state shared across handlers.

use std::sync::Arc;

use mongodb::Database;

use crate::config::AppConfig;
use crate::services::email::EmailService;
use crate::services::uploads::ImageHostClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to shared
/// resources: the document database handle, the mailer, the image-host
/// client, and configuration. It is constructed once at startup and passed
/// explicitly everywhere - there is no module-level connection or global
/// transporter.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    db: Database,
    mailer: EmailService,
    uploader: ImageHostClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be configured.
    pub fn new(
        config: AppConfig,
        db: Database,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let mailer = EmailService::new(&config.email)?;
        let uploader = ImageHostClient::new(&config.uploads);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                mailer,
                uploader,
            }),
        })
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the document database handle.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    /// Get a reference to the email service.
    #[must_use]
    pub fn mailer(&self) -> &EmailService {
        &self.inner.mailer
    }

    /// Get a reference to the image host client.
    #[must_use]
    pub fn uploader(&self) -> &ImageHostClient {
        &self.inner.uploader
    }
}
