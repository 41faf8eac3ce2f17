#[cfg(test)]
use std::collections::HashMap;

/// Trait for providing environment variable access
///
/// Lets settings be loaded from something other than the process environment,
/// so tests can run in parallel without mutating global state.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;

    /// Like `get_var`, but blank values count as unset
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_var(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Production environment provider that reads from system environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Test environment provider with configurable variables
#[cfg(test)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn empty() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
