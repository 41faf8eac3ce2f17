// Common test utilities for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use migration::{Migrator, MigratorTrait};
use pixstore_backend::app_data::AppData;
use pixstore_backend::config::{BootstrapSettings, EnvironmentProvider, SecretManager, SeedSettings};
use poem::test::TestClient;
use poem::Endpoint;
use sea_orm::{Database, DatabaseConnection};
use serde_json::json;
use tempfile::TempDir;

pub const TEST_JWT_SECRET: &str = "integration-jwt-secret-at-least-32-chars";
pub const TEST_PASSWORD_PEPPER: &str = "integration-pepper";

/// Environment provider backed by a plain map
pub struct TestEnvironment {
    vars: HashMap<String, String>,
}

impl TestEnvironment {
    pub fn new(vars: &[(&str, &str)]) -> Self {
        Self {
            vars: vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl EnvironmentProvider for TestEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// AppData over an in-memory database with seeded credentials configured
///
/// The returned temp dir backs `UPLOAD_DIR`; keep it alive for the test.
pub async fn setup_app_data() -> (Arc<AppData>, TempDir) {
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
    let upload_path = upload_dir.path().to_string_lossy().to_string();
    let env = TestEnvironment::new(&[
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("PASSWORD_PEPPER", TEST_PASSWORD_PEPPER),
        ("UPLOAD_DIR", &upload_path),
        ("MAX_UPLOAD_BYTES", "4096"),
        ("OWNER_USERNAME", "owner"),
        ("OWNER_PASSWORD", "owner-password"),
        ("ADMIN_USERNAME", "admin"),
        ("ADMIN_PASSWORD", "admin-password"),
        ("DEFAULT_PIX_KEY", "pix@example.com"),
    ]);

    let settings = BootstrapSettings::from_env_provider(&env).expect("Invalid test settings");
    let seed_settings = SeedSettings::from_env_provider(&env).expect("Invalid seed settings");
    let secret_manager = SecretManager::from_env_provider(&env).expect("Invalid test secrets");

    let app_data = AppData::new(setup_test_db().await, settings, seed_settings, secret_manager);
    (Arc::new(app_data), upload_dir)
}

/// Log in through the HTTP API and return the bearer header value
pub async fn login<E: Endpoint>(client: &TestClient<E>, username: &str, password: &str) -> String {
    let resp = client
        .post("/api/auth/login")
        .body_json(&json!({ "username": username, "password": password }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body = resp.json().await;
    let token = body.value().object().get("access_token").string().to_string();
    format!("Bearer {}", token)
}

/// Register a customer and log them in
pub async fn register_and_login<E: Endpoint>(client: &TestClient<E>, username: &str, password: &str) -> String {
    let resp = client
        .post("/api/auth/register")
        .body_json(&json!({ "username": username, "password": password }))
        .send()
        .await;
    resp.assert_status(poem::http::StatusCode::CREATED);

    login(client, username, password).await
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
