use std::fmt;

/// Configuration loading failures
#[derive(Debug)]
pub enum ApplicationError {
    InvalidSetting { setting_name: String, reason: String },
    ParseError { setting_name: String, error: String },
}

impl ApplicationError {
    pub fn invalid(setting_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting_name: setting_name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(setting_name: &str, error: impl fmt::Display) -> Self {
        Self::ParseError {
            setting_name: setting_name.to_string(),
            error: error.to_string(),
        }
    }
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { setting_name, reason } => {
                write!(f, "Invalid setting '{}': {}", setting_name, reason)
            }
            Self::ParseError { setting_name, error } => {
                write!(f, "Failed to parse setting '{}': {}", setting_name, error)
            }
        }
    }
}

impl std::error::Error for ApplicationError {}
