pub mod audit_builder;
pub mod audit_logger;

pub use audit_builder::AuditBuilder;
pub use audit_logger::AuditLogger;
