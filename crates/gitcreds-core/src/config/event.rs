//! Event context written by the CI runner that triggered the job.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

/// The parts of the triggering event used to fill in missing inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventContext {
    pub provider: Option<String>,
    pub provider_url: Option<String>,
    pub repository: Option<String>,
}

impl EventContext {
    /// Read the event file. A missing, unreadable or malformed file is an
    /// empty context.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_json_str(&content),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no event context");
                Self::default()
            }
        }
    }

    pub fn from_json_str(content: &str) -> Self {
        match serde_json::from_str::<Value>(content) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                debug!(error = %e, "ignoring malformed event context");
                Self::default()
            }
        }
    }

    /// Non-string values are treated as absent.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            provider: field("provider"),
            provider_url: field("providerURL"),
            repository: field("repository"),
        }
    }

    /// Event provider, lowercased.
    pub fn provider_id(&self) -> Option<String> {
        self.provider.as_deref().map(str::to_lowercase)
    }
}
