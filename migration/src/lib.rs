pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_products;
mod m20250301_000003_create_payments;
mod m20250301_000004_create_admin_requests;
mod m20250301_000005_create_activity_logs;
mod m20250301_000006_create_settings_and_warnings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_products::Migration),
            Box::new(m20250301_000003_create_payments::Migration),
            Box::new(m20250301_000004_create_admin_requests::Migration),
            Box::new(m20250301_000005_create_activity_logs::Migration),
            Box::new(m20250301_000006_create_settings_and_warnings::Migration),
        ]
    }
}
