pub mod activity_log;
pub mod admin_request;
pub mod payment;
pub mod product;
pub mod review_status;
pub mod system_setting;
pub mod user;
pub mod warning;

pub use review_status::ReviewStatus;
pub use user::Role;
