use std::fmt;

/// Action codes written to the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityAction {
    LoginFailed,
    LoginSuccess,
    UserRegistered,
    AdminRequestCreated,
    AdminRequestApproved,
    AdminRequestRejected,
    ProductCreated,
    ProductUpdated,
    ProductDeleted,
    PaymentCreated,
    PaymentProofUploaded,
    PaymentApproved,
    PaymentRejected,
    SettingUpdated,
    UserRoleChanged,
    UserStatusChanged,
    WarningCreated,
    WarningUpdated,
    SystemInitialized,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::LoginFailed => "LOGIN_FAILED",
            ActivityAction::LoginSuccess => "LOGIN_SUCCESS",
            ActivityAction::UserRegistered => "USER_REGISTERED",
            ActivityAction::AdminRequestCreated => "ADMIN_REQUEST_CREATED",
            ActivityAction::AdminRequestApproved => "ADMIN_REQUEST_APPROVED",
            ActivityAction::AdminRequestRejected => "ADMIN_REQUEST_REJECTED",
            ActivityAction::ProductCreated => "PRODUCT_CREATED",
            ActivityAction::ProductUpdated => "PRODUCT_UPDATED",
            ActivityAction::ProductDeleted => "PRODUCT_DELETED",
            ActivityAction::PaymentCreated => "PAYMENT_CREATED",
            ActivityAction::PaymentProofUploaded => "PAYMENT_PROOF_UPLOADED",
            ActivityAction::PaymentApproved => "PAYMENT_APPROVED",
            ActivityAction::PaymentRejected => "PAYMENT_REJECTED",
            ActivityAction::SettingUpdated => "SETTING_UPDATED",
            ActivityAction::UserRoleChanged => "USER_ROLE_CHANGED",
            ActivityAction::UserStatusChanged => "USER_STATUS_CHANGED",
            ActivityAction::WarningCreated => "WARNING_CREATED",
            ActivityAction::WarningUpdated => "WARNING_UPDATED",
            ActivityAction::SystemInitialized => "SYSTEM_INITIALIZED",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single activity log row before it is persisted
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub action: String,
    pub user_id: Option<i32>,
    pub details: serde_json::Map<String, serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ActivityEntry {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            user_id: None,
            details: serde_json::Map::new(),
            ip_address: None,
            user_agent: None,
        }
    }
}
