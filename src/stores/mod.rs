// Stores layer - SeaORM data access, one store per table
//
// Stores hold no connection; callers pass `&impl ConnectionTrait` so the same
// method works on the pool or inside a transaction.
pub mod activity_log_store;
pub mod admin_request_store;
pub mod payment_store;
pub mod product_store;
pub mod settings_store;
pub mod user_store;
pub mod warning_store;

pub use activity_log_store::ActivityLogStore;
pub use admin_request_store::AdminRequestStore;
pub use payment_store::{PaymentStore, PaymentWithDetails};
pub use product_store::ProductStore;
pub use settings_store::SettingsStore;
pub use user_store::UserStore;
pub use warning_store::WarningStore;
