use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::audit::AuditLogger;
use crate::config::{BootstrapSettings, SecretManager, SeedSettings};
use crate::errors::InternalError;
use crate::providers::{CryptoProvider, TokenProvider, UploadProvider};
use crate::stores::{
    ActivityLogStore, AdminRequestStore, PaymentStore, ProductStore, SettingsStore, UserStore,
    WarningStore,
};

/// Centralized application data
///
/// Everything is created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ↓ creates once
///   ├─ db (DatabaseConnection)
///   ├─ settings / seed_settings / secret_manager
///   ├─ one stateless store per table
///   ├─ audit_logger
///   └─ crypto, token and upload providers
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
///   └─ XCoordinator::new(app_data) → clones what it needs
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Arc<BootstrapSettings>,
    pub seed_settings: Arc<SeedSettings>,
    pub secret_manager: Arc<SecretManager>,
    pub user_store: Arc<UserStore>,
    pub product_store: Arc<ProductStore>,
    pub payment_store: Arc<PaymentStore>,
    pub admin_request_store: Arc<AdminRequestStore>,
    pub activity_log_store: Arc<ActivityLogStore>,
    pub settings_store: Arc<SettingsStore>,
    pub warning_store: Arc<WarningStore>,
    pub audit_logger: Arc<AuditLogger>,
    pub crypto_provider: Arc<CryptoProvider>,
    pub token_provider: Arc<TokenProvider>,
    pub upload_provider: Arc<UploadProvider>,
}

impl AppData {
    /// Initialize application data from the process environment
    ///
    /// The database should already be connected and migrated.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secrets or seed settings are missing or invalid
    pub fn init(db: DatabaseConnection, settings: BootstrapSettings) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secret_manager = SecretManager::init().map_err(|e| {
            InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e))
        })?;

        let seed_settings = SeedSettings::from_env()
            .map_err(|e| InternalError::parse("seed_settings", e.to_string()))?;

        let app_data = Self::new(db, settings, seed_settings, secret_manager);
        tracing::info!("AppData initialization complete");
        Ok(app_data)
    }

    /// Assemble application data from already-loaded configuration
    pub fn new(
        db: DatabaseConnection,
        settings: BootstrapSettings,
        seed_settings: SeedSettings,
        secret_manager: SecretManager,
    ) -> Self {
        let secret_manager = Arc::new(secret_manager);
        let activity_log_store = Arc::new(ActivityLogStore::new());

        let audit_logger = Arc::new(AuditLogger::new(db.clone(), activity_log_store.clone()));
        let crypto_provider = Arc::new(CryptoProvider::new(secret_manager.password_pepper()));
        let token_provider = Arc::new(TokenProvider::new(
            secret_manager.clone(),
            settings.jwt_expiration_minutes(),
        ));
        let upload_provider = Arc::new(UploadProvider::new(
            settings.upload_dir(),
            settings.max_upload_bytes(),
        ));

        Self {
            db,
            settings: Arc::new(settings),
            seed_settings: Arc::new(seed_settings),
            secret_manager,
            user_store: Arc::new(UserStore::new()),
            product_store: Arc::new(ProductStore::new()),
            payment_store: Arc::new(PaymentStore::new()),
            admin_request_store: Arc::new(AdminRequestStore::new()),
            activity_log_store,
            settings_store: Arc::new(SettingsStore::new()),
            warning_store: Arc::new(WarningStore::new()),
            audit_logger,
            crypto_provider,
            token_provider,
            upload_provider,
        }
    }
}
