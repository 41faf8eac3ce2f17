use std::sync::Arc;

use serde_json::json;

use crate::app_data::AppData;
use crate::config::SeedAccount;
use crate::coordinators::settings_coordinator::PIX_KEY_SETTING;
use crate::errors::InternalError;
use crate::types::db::Role;
use crate::types::internal::audit::ActivityAction;
use crate::types::internal::context::RequestContext;

/// What an initialization run changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitReport {
    /// Items created, e.g. `user:owner` or `setting:pixKey`
    pub created: Vec<String>,

    /// Passwords generated for accounts with none configured, as (username, password)
    pub generated_credentials: Vec<(String, String)>,
}

/// Seeds the owner and admin accounts and the default PIX key
pub struct SetupCoordinator {
    app_data: Arc<AppData>,
}

impl SetupCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self { app_data }
    }

    /// Create whatever seed data is missing
    ///
    /// Idempotent. With `generate_missing` an account without a configured
    /// password gets a random one (reported once in the result); without it
    /// such accounts are skipped.
    pub async fn initialize(&self, ctx: &RequestContext, generate_missing: bool) -> Result<InitReport, InternalError> {
        let mut report = InitReport::default();
        let seeds = self.app_data.seed_settings.clone();

        let owner_id = self
            .ensure_account(&seeds.owner, Role::Owner, generate_missing, &mut report)
            .await?;
        self.ensure_account(&seeds.admin, Role::Admin, generate_missing, &mut report)
            .await?;

        let db = &self.app_data.db;
        match &seeds.pix_key {
            Some(pix_key) if self.app_data.settings_store.get(db, PIX_KEY_SETTING).await?.is_none() => {
                self.app_data
                    .settings_store
                    .upsert(db, PIX_KEY_SETTING, &json!(pix_key), owner_id)
                    .await?;
                report.created.push(format!("setting:{}", PIX_KEY_SETTING));
            }
            Some(_) => {}
            None => tracing::debug!("DEFAULT_PIX_KEY not set, skipping {}", PIX_KEY_SETTING),
        }

        if report.created.is_empty() {
            tracing::info!("System already initialized");
            return Ok(report);
        }

        tracing::info!("System initialized: {}", report.created.join(", "));

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .builder(ActivityAction::SystemInitialized)
            .with_context(ctx)
            .add_field("created", &report.created)
            .write()
            .await
        {
            tracing::error!("Failed to log initialization: {:?}", audit_err);
        }

        Ok(report)
    }

    /// Returns the account id when it exists or was created
    async fn ensure_account(
        &self,
        seed: &SeedAccount,
        role: Role,
        generate_missing: bool,
        report: &mut InitReport,
    ) -> Result<Option<i32>, InternalError> {
        let db = &self.app_data.db;
        if let Some(existing) = self.app_data.user_store.find_by_username(db, &seed.username).await? {
            return Ok(Some(existing.id));
        }

        let password = match &seed.password {
            Some(password) => password.clone(),
            None if generate_missing => {
                let generated = self.app_data.crypto_provider.generate_secure_password();
                report
                    .generated_credentials
                    .push((seed.username.clone(), generated.clone()));
                generated
            }
            None => {
                tracing::warn!(
                    "No password configured for {} account '{}', skipping",
                    role.as_str(),
                    seed.username
                );
                return Ok(None);
            }
        };

        let password_hash = self.app_data.crypto_provider.hash_password(&password)?;
        let user = self
            .app_data
            .user_store
            .create_user(db, &seed.username, password_hash, role)
            .await?;

        report.created.push(format!("user:{}", user.username));
        Ok(Some(user.id))
    }
}
