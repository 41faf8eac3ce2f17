// Coordinators layer - Workflow orchestration
//
// One coordinator per API area. Each operation validates input, composes
// store and provider calls, then writes the activity log entry.
pub mod admin_coordinator;
pub mod auth_coordinator;
pub mod catalog_coordinator;
pub mod payment_coordinator;
pub mod settings_coordinator;
pub mod setup_coordinator;

pub use admin_coordinator::AdminCoordinator;
pub use auth_coordinator::AuthCoordinator;
pub use catalog_coordinator::CatalogCoordinator;
pub use payment_coordinator::PaymentCoordinator;
pub use settings_coordinator::SettingsCoordinator;
pub use setup_coordinator::{InitReport, SetupCoordinator};
