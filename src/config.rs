//! Runtime settings
//!
//! Settings are read from the environment and can be overridden by CLI
//! flags. They only affect diagnostics and output formatting, never the
//! bytes that get encoded, hashed or signed.

use crate::utils::logging;

/// Environment variable enabling debug logging
pub const ENV_DEBUG: &str = "PERSONAL_SIGNER_DEBUG";
/// Environment variable selecting JSON output in the CLI
pub const ENV_JSON: &str = "PERSONAL_SIGNER_JSON";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// Emit debug log lines on stderr
    pub debug_logging: bool,
    /// Print `{success, data, error}` envelopes instead of plain text
    pub json_output: bool,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            debug_logging: lookup(ENV_DEBUG).map(|v| is_truthy(&v)).unwrap_or(false),
            json_output: lookup(ENV_JSON).map(|v| is_truthy(&v)).unwrap_or(false),
        }
    }

    /// Apply command-line flags; a flag can only switch a setting on
    pub fn with_overrides(mut self, debug: bool, json: bool) -> Self {
        self.debug_logging |= debug;
        self.json_output |= json;
        self
    }

    /// Push the settings into the process-wide logger
    pub fn apply(&self) {
        if self.debug_logging {
            logging::enable_debug();
        } else {
            logging::disable_debug();
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
