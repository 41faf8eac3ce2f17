// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tempfile::TempDir;

use poem_openapi::auth::Bearer;

use crate::api::BearerAuth;
use crate::app_data::AppData;
use crate::config::{BootstrapSettings, MockEnvironment, SecretManager, SeedSettings};
use crate::stores::{ProductStore, UserStore};
use crate::types::db::{Role, product, user};
use crate::types::internal::auth::Claims;
use crate::types::internal::catalog::NewProduct;
use crate::types::internal::context::RequestContext;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PASSWORD_PEPPER: &str = "test-pepper-for-unit-tests";

/// In-memory SQLite database with all migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Insert a user with a placeholder hash; use `create_user_with_password` for login tests
pub async fn create_test_user(db: &DatabaseConnection, username: &str, role: Role) -> user::Model {
    UserStore::new()
        .create_user(db, username, "not-a-real-hash".to_string(), role)
        .await
        .expect("Failed to create test user")
}

pub fn sample_product(name: &str, price_cents: i64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: format!("{} description", name),
        price_cents,
        old_price_cents: None,
        image_url: "https://example.com/product.png".to_string(),
        is_active: true,
        is_featured: false,
        tags: vec![],
    }
}

pub async fn create_test_product(db: &DatabaseConnection, name: &str, price_cents: i64) -> product::Model {
    ProductStore::new()
        .create(db, sample_product(name, price_cents))
        .await
        .expect("Failed to create test product")
}

/// Test environment with valid secrets, an upload dir and seed accounts
pub fn test_environment(upload_dir: &str) -> MockEnvironment {
    MockEnvironment::empty().with_vars(&[
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("PASSWORD_PEPPER", TEST_PASSWORD_PEPPER),
        ("UPLOAD_DIR", upload_dir),
        ("MAX_UPLOAD_BYTES", "1024"),
        ("OWNER_USERNAME", "owner"),
        ("OWNER_PASSWORD", "owner-password"),
        ("ADMIN_USERNAME", "admin"),
        ("ADMIN_PASSWORD", "admin-password"),
        ("DEFAULT_PIX_KEY", "pix@example.com"),
    ])
}

/// Full AppData over an in-memory database
///
/// Returns the temp dir backing `UPLOAD_DIR`; keep it alive for the test.
pub async fn setup_test_app_data() -> (Arc<AppData>, TempDir) {
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
    let env = test_environment(&upload_dir.path().to_string_lossy());

    let app_data = build_app_data(&env).await;
    (app_data, upload_dir)
}

pub async fn build_app_data(env: &MockEnvironment) -> Arc<AppData> {
    let settings = BootstrapSettings::from_env_provider(env).expect("Invalid test settings");
    let seed_settings = SeedSettings::from_env_provider(env).expect("Invalid test seed settings");
    let secret_manager = SecretManager::from_env_provider(env).expect("Invalid test secrets");

    Arc::new(AppData::new(setup_test_db().await, settings, seed_settings, secret_manager))
}

/// Insert a user whose password actually verifies
pub async fn create_user_with_password(
    app_data: &AppData,
    username: &str,
    password: &str,
    role: Role,
) -> user::Model {
    let hash = app_data
        .crypto_provider
        .hash_password(password)
        .expect("Failed to hash test password");

    app_data
        .user_store
        .create_user(&app_data.db, username, hash, role)
        .await
        .expect("Failed to create test user")
}

/// Authenticated API context for the given user
pub fn context_for(user: &user::Model) -> RequestContext {
    RequestContext::new().with_claims(Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: user.role,
        exp: i64::MAX,
        iat: 0,
        jti: "test-jti".to_string(),
    })
}

/// Bearer credential carrying a freshly issued token for `user`
pub fn bearer_for(app_data: &AppData, user: &user::Model) -> BearerAuth {
    let (token, _claims) = app_data
        .token_provider
        .issue_token(user)
        .expect("Failed to issue test token");

    BearerAuth(Bearer { token })
}
